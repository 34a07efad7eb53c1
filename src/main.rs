use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use urbantap_admin::controllers::FetchState;
use urbantap_admin::{
    AdminApi, AdminStatus, ApiError, AppConfig, AuthGate, Broker, Decision, FileTokenStore,
    GateDecision, HttpAdminApi, ListFetchController, Listing, MutationController, PageFilters,
    PageRequest, PageView, Route, Session, TokenStore,
};

#[derive(Parser)]
#[command(name = "urbantap-admin", version, about = "Urbantap admin console")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in as an admin and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "URBANTAP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// List brokers
    Brokers {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// List property listings
    Listings {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Match broker name, email or status
        #[arg(long)]
        search: Option<String>,
        /// Listing type, e.g. Partner; "All" disables the filter
        #[arg(long = "type")]
        listing_type: Option<String>,
    },
    /// Show every field of one listing
    Show {
        id: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Approve a pending listing
    Approve {
        id: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Reject a pending listing
    Reject {
        id: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

struct Console {
    config: AppConfig,
    gate: AuthGate,
    brokers: ListFetchController<Broker>,
    listings: Arc<ListFetchController<Listing>>,
    mutations: MutationController,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!("Using API at {}", config.api.base_url);

    let api: Arc<dyn AdminApi> = Arc::new(HttpAdminApi::with_timeout(
        config.api.base_url.clone(),
        config.api.timeout(),
    )?);
    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.session.path.clone()));
    let listings = Arc::new(ListFetchController::new(api.clone()));

    let console = Console {
        gate: AuthGate::new(api.clone(), store),
        brokers: ListFetchController::new(api.clone()),
        mutations: MutationController::new(api, listings.clone()),
        listings,
        config,
    };

    console.run(cli.command).await
}

impl Console {
    async fn run(&self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Login { email, password } => {
                match self.gate.login(&email, &password).await {
                    Ok(_) => info!("✅ Logged in as {}", email),
                    Err(e) => eprintln!("{}", e.user_message()),
                }
            }
            Command::Logout => {
                self.gate.logout().await?;
                info!("👋 Logged out");
            }
            Command::Brokers { page } => {
                let Some(session) = self.enter(Route::Brokers).await? else {
                    return Ok(());
                };
                let request = PageRequest::new(page, self.config.pagination.brokers_page_size);
                if let Err(e) = self.brokers.set_request(&session, request).await {
                    return self.report(e).await;
                }
                print_brokers(&self.brokers.snapshot());
            }
            Command::Listings {
                page,
                search,
                listing_type,
            } => {
                let Some(session) = self.enter(Route::Listings).await? else {
                    return Ok(());
                };
                let request = self.listings_request(page).with_filters(PageFilters {
                    search_term: search,
                    listing_type,
                });
                if let Err(e) = self.listings.set_request(&session, request).await {
                    return self.report(e).await;
                }
                print_listings(&self.listings.snapshot());
            }
            Command::Show { id, page } => {
                let Some(session) = self.enter(Route::Listings).await? else {
                    return Ok(());
                };
                if let Err(e) = self
                    .listings
                    .set_request(&session, self.listings_request(page))
                    .await
                {
                    return self.report(e).await;
                }
                match self.listings.cached_listing(&id) {
                    Some(listing) => print_details(&listing),
                    None => eprintln!("Listing {} is not on page {}", id, page),
                }
            }
            Command::Approve { id, page } => self.review(id, page, Decision::Approved).await?,
            Command::Reject { id, page } => self.review(id, page, Decision::Rejected).await?,
        }

        Ok(())
    }

    fn listings_request(&self, page: u32) -> PageRequest {
        PageRequest::new(page, self.config.pagination.listings_page_size)
    }

    /// Run the auth gate for a protected view.
    async fn enter(&self, route: Route) -> anyhow::Result<Option<Session>> {
        match self.gate.resolve(route).await? {
            GateDecision::Render(session) => Ok(Some(session)),
            GateDecision::ShowLogin | GateDecision::Redirect(_) => {
                eprintln!("Not logged in. Run `urbantap-admin login --email <email>` first.");
                Ok(None)
            }
        }
    }

    async fn review(&self, id: String, page: u32, decision: Decision) -> anyhow::Result<()> {
        let Some(session) = self.enter(Route::Listings).await? else {
            return Ok(());
        };

        // Load the page first so terminal listings are refused locally.
        if let Err(e) = self
            .listings
            .set_request(&session, self.listings_request(page))
            .await
        {
            return self.report(e).await;
        }

        if let Err(e) = self
            .mutations
            .set_listing_status(&session, &id, decision)
            .await
        {
            return self.report(e).await;
        }

        info!("✅ Listing {} {}", id, AdminStatus::from(decision));
        print_listings(&self.listings.snapshot());
        Ok(())
    }

    async fn report(&self, error: ApiError) -> anyhow::Result<()> {
        eprintln!("{}", error.user_message());
        if self.gate.handle_failure(&error).await? == Some(Route::Login) {
            eprintln!("Your session has ended. Please log in again.");
        }
        Ok(())
    }
}

fn print_strip<T>(view: &PageView<T>) {
    let pages: Vec<String> = view
        .pages()
        .map(|p| {
            if p == u64::from(view.page_number) {
                format!("[{}]", p)
            } else {
                p.to_string()
            }
        })
        .collect();

    println!(
        "{} {} {}   ({} shown, {} total)",
        if view.has_previous() { "‹ prev" } else { "      " },
        pages.join(" "),
        if view.has_next() { "next ›" } else { "" },
        view.matched_count,
        view.total_count
    );
}

fn print_brokers(state: &FetchState<Broker>) {
    if let Some(error) = &state.error {
        eprintln!("{}", error);
    }
    let Some(view) = state.view() else {
        return;
    };

    if view.items.is_empty() {
        println!("No brokers on page {}", view.page_number);
    }
    for (i, broker) in view.items.iter().enumerate() {
        println!("{}. {}", i + 1, broker.name);
        println!("   Email: {}", broker.email.as_deref().unwrap_or("N/A"));
        println!("   Phone: {}", broker.phone.as_deref().unwrap_or("N/A"));
        println!("   Status: {}", broker.status.as_deref().unwrap_or("N/A"));
        if let Some(created_at) = broker.created_at {
            println!("   Created: {}", created_at.format("%Y-%m-%d"));
        }
        println!();
    }
    print_strip(&view);
}

fn print_listings(state: &FetchState<Listing>) {
    if let Some(error) = &state.error {
        eprintln!("{}", error);
    }
    let Some(view) = state.view() else {
        return;
    };

    if view.items.is_empty() {
        println!("No listings match on page {}", view.page_number);
    }
    for listing in &view.items {
        println!("{} [{}] {}", listing.id, listing.admin_status, listing.title);
        println!(
            "   {} · {} · {}",
            listing.broker.name, listing.company.name, listing.listing_type
        );
        println!("   {} · {}", listing.price_range, listing.location);
        if listing.admin_status == AdminStatus::Pending {
            println!("   → approve / reject {}", listing.id);
        }
        println!();
    }
    print_strip(&view);
}

fn print_details(listing: &Listing) {
    println!("{}", listing.title);
    println!("{}", "=".repeat(listing.title.chars().count().max(16)));
    for (label, value) in listing.detail_lines() {
        println!("{:>12}: {}", label, value);
    }
    if !listing.amenities.is_empty() {
        println!("{:>12}: {}", "Amenities", listing.amenities.join(", "));
    }
    for url in &listing.images {
        println!("{:>12}: {}", "Image", url);
    }
}
