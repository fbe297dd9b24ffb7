pub mod lifecycle_store;
pub mod reference_lookup;

pub use lifecycle_store::{LifecycleStore, StoreError};
pub use reference_lookup::{resolve_names, ReferenceLookup};
