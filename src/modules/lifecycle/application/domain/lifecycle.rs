use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Which side of the soft-delete partition a row lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Active,
    Deleted,
}

impl LifecycleState {
    pub fn is_deleted(self) -> bool {
        matches!(self, LifecycleState::Deleted)
    }
}

/// Who performed a mutation and when. Every state transition carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    pub actor: Uuid,
    pub at: DateTime<Utc>,
}

impl Stamp {
    pub fn now(actor: Uuid) -> Self {
        Self {
            actor,
            at: Utc::now(),
        }
    }
}

/// Audit and soft-delete columns shared by users, categories and products.
#[derive(Debug, Clone, PartialEq)]
pub struct Lifecycle {
    pub id: Uuid,
    pub is_deleted: bool,
    pub created_by: Uuid,
    pub modified_by: Uuid,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub deleted_date: Option<DateTime<Utc>>,
}

impl Lifecycle {
    pub fn new(id: Uuid, stamp: &Stamp) -> Self {
        Self {
            id,
            is_deleted: false,
            created_by: stamp.actor,
            modified_by: stamp.actor,
            created_date: stamp.at,
            modified_date: stamp.at,
            deleted_date: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        if self.is_deleted {
            LifecycleState::Deleted
        } else {
            LifecycleState::Active
        }
    }

    pub fn touch(&mut self, stamp: &Stamp) {
        self.modified_by = stamp.actor;
        self.modified_date = stamp.at;
    }

    pub fn mark_deleted(&mut self, stamp: &Stamp) {
        self.is_deleted = true;
        self.deleted_date = Some(stamp.at);
        self.touch(stamp);
    }

    pub fn restore(&mut self, stamp: &Stamp) {
        self.is_deleted = false;
        self.deleted_date = None;
        self.touch(stamp);
    }
}

/// A persisted row: lifecycle metadata plus the entity-specific attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<A> {
    pub meta: Lifecycle,
    pub attrs: A,
}

impl<A> Record<A> {
    pub fn is_active(&self) -> bool {
        !self.meta.is_deleted
    }
}
