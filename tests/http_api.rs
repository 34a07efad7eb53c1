use serde_json::json;
use urbantap_admin::{
    AdminApi, AdminStatus, ApiError, Decision, HttpAdminApi, PageRequest, Role, Session,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session() -> Session {
    Session::new("tok-123", Role::Admin)
}

fn brokers_body(count: usize, page: u64, total: u64) -> serde_json::Value {
    let brokers: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "id": format!("b-{}", i),
                "name": format!("Broker {}", i),
                "email": format!("b{}@acme.test", i),
                "phone": "+15550100",
                "status": "Active",
                "createdAt": "2024-02-01T12:00:00.000Z",
                "updatedAt": "2024-02-02T12:00:00.000Z"
            })
        })
        .collect();

    json!({
        "status": "success",
        "message": "ok",
        "data": {
            "brokers": brokers,
            "pagination": { "page": page, "page_size": 10, "total": total, "total_pages": 3 }
        }
    })
}

#[tokio::test]
async fn login_posts_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({ "email": "admin@urbantap.io", "password": "secret1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "token": "jwt", "user": { "role": "ADMIN", "email": "admin@urbantap.io" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpAdminApi::new(server.uri()).unwrap();
    let grant = api.login("admin@urbantap.io", "secret1").await.unwrap();

    assert_eq!(grant.token, "jwt");
    assert_eq!(grant.role, "ADMIN");
}

#[tokio::test]
async fn login_failure_carries_server_error_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let api = HttpAdminApi::new(server.uri()).unwrap();
    let err = api.login("admin@urbantap.io", "secret1").await.unwrap_err();

    assert!(matches!(err, ApiError::Server { status: 400, .. }));
    assert_eq!(err.user_message(), "Invalid credentials");
}

#[tokio::test]
async fn brokers_request_carries_page_and_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/brokers"))
        .and(query_param("page", "1"))
        .and(query_param("page_size", "10"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(brokers_body(10, 1, 25)))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpAdminApi::new(server.uri()).unwrap();
    let page = api
        .list_brokers(&session(), &PageRequest::new(1, 10))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 10);
    assert_eq!(page.total_count, 25);
    assert_eq!(page.page_count, 3);
    assert_eq!(page.items[0].email.as_deref(), Some("b0@acme.test"));
    assert!(page.items[0].created_at.is_some());
}

#[tokio::test]
async fn page_past_the_end_returns_empty_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/brokers"))
        .and(query_param("page", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(brokers_body(0, 4, 25)))
        .mount(&server)
        .await;

    let api = HttpAdminApi::new(server.uri()).unwrap();
    let page = api
        .list_brokers(&session(), &PageRequest::new(4, 10))
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.page_number, 4);
    assert_eq!(page.page_count, 3);
}

#[tokio::test]
async fn listings_are_flattened() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/listings"))
        .and(query_param("page", "2"))
        .and(query_param("page_size", "5"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Listings fetched",
            "data": {
                "listings": [{
                    "listing": {
                        "id": "l-9",
                        "title": "Marina flat",
                        "description": "Sea view",
                        "image": "",
                        "image_urls": ["https://cdn/a.jpg"],
                        "min_price": 900000,
                        "max_price": 950000,
                        "sq_ft": 780,
                        "type": "Partner",
                        "category": "residential",
                        "looking_for": false,
                        "rental_frequency": null,
                        "no_of_bedrooms": "1",
                        "no_of_bathrooms": "1",
                        "furnished": "Furnished",
                        "city": "Dubai",
                        "address": "Marina",
                        "amenities": [],
                        "project_age": 5,
                        "payment_plan": "",
                        "sale_type": "Resale",
                        "broker_id": "b-1",
                        "created_at": "2024-05-01T09:00:00Z",
                        "admin_status": "Approved"
                    },
                    "broker": { "id": "b-1", "name": "Sam Lee", "profile_pic": "", "country_code": "+971", "w_number": "500000000" },
                    "company": { "name": "Acme Realty" }
                }],
                "pagination": { "page": 2, "page_size": 5, "total": 6, "total_pages": 2 }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpAdminApi::new(server.uri()).unwrap();
    let page = api
        .list_listings(&session(), &PageRequest::new(2, 5))
        .await
        .unwrap();

    assert_eq!(page.page_count, 2);
    let listing = &page.items[0];
    assert_eq!(listing.id, "l-9");
    assert_eq!(listing.admin_status, AdminStatus::Approved);
    assert_eq!(listing.images, vec!["https://cdn/a.jpg".to_string()]);
    assert_eq!(listing.broker.phone.as_deref(), Some("+971500000000"));
    assert_eq!(listing.company.name, "Acme Realty");
}

#[tokio::test]
async fn rejected_token_is_an_authorization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/listings"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })))
        .mount(&server)
        .await;

    let api = HttpAdminApi::new(server.uri()).unwrap();
    let err = api
        .list_listings(&session(), &PageRequest::new(1, 5))
        .await
        .unwrap_err();

    assert!(err.is_authorization());
    assert_eq!(err.user_message(), "Token expired");
}

#[tokio::test]
async fn server_error_without_body_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/listings"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let api = HttpAdminApi::new(server.uri()).unwrap();
    let err = api
        .list_listings(&session(), &PageRequest::new(1, 5))
        .await
        .unwrap_err();

    assert!(!err.is_authorization());
    assert_eq!(err.user_message(), "Failed to fetch data");
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/brokers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let api = HttpAdminApi::new(server.uri()).unwrap();
    let err = api
        .list_brokers(&session(), &PageRequest::new(1, 10))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn status_update_puts_decision() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/admin/listings/l-9/status"))
        .and(header("Authorization", "Bearer tok-123"))
        .and(body_json(json!({ "status": "Rejected" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpAdminApi::new(server.uri()).unwrap();
    api.set_listing_status(&session(), "l-9", Decision::Rejected)
        .await
        .unwrap();
}
