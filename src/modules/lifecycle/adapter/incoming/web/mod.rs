pub mod errors;
pub mod handlers;
pub mod metadata;
pub mod resource;
pub mod scope;

pub use errors::lifecycle_error_response;
pub use handlers::PageQuery;
pub use metadata::list_entities_handler;
pub use resource::LifecycleResource;
pub use scope::{create_route, lifecycle_scope, update_route};
