pub mod list_fetch;
pub mod mutation;
pub mod view;

pub use list_fetch::{FetchState, ListFetchController, Resource, ResourceKind};
pub use mutation::MutationController;
pub use view::{PageView, Searchable};
