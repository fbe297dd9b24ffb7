pub mod entity;
pub mod field_errors;
pub mod lifecycle;
pub mod page;

pub use entity::{
    CategoryRef, ColumnSpec, EntityConfig, EntityKind, LifecycleEntity, Operation, RefTarget,
    Reference, Relations, ResolvedNames, UserRef,
};
pub use field_errors::FieldErrors;
pub use lifecycle::{Lifecycle, LifecycleState, Record, Stamp};
pub use page::{PageRequest, PageResult};

pub type EntityRecord<E> = Record<<E as LifecycleEntity>::Attrs>;
