use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::field_errors::FieldErrors;
use super::lifecycle::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    User,
    Category,
    Product,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::User, EntityKind::Category, EntityKind::Product];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Category => "category",
            EntityKind::Product => "product",
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown entity '{s}'"))
    }
}

/// Every gated lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Get,
    ListActive,
    ListDeleted,
    Update,
    SoftDelete,
    Restore,
    Purge,
    PurgeAllDeleted,
    RestoreAllDeleted,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::Create,
        Operation::Get,
        Operation::ListActive,
        Operation::ListDeleted,
        Operation::Update,
        Operation::SoftDelete,
        Operation::Restore,
        Operation::Purge,
        Operation::PurgeAllDeleted,
        Operation::RestoreAllDeleted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Get => "get",
            Operation::ListActive => "listActive",
            Operation::ListDeleted => "listDeleted",
            Operation::Update => "update",
            Operation::SoftDelete => "softDelete",
            Operation::Restore => "restore",
            Operation::Purge => "purge",
            Operation::PurgeAllDeleted => "purgeAllDeleted",
            Operation::RestoreAllDeleted => "restoreAllDeleted",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown operation '{s}'"))
    }
}

/// One column of the admin table for an entity.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ColumnSpec {
    pub field: &'static str,
    pub header: &'static str,
}

/// Compile-time description of an entity: routing, envelope keys and table layout.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityConfig {
    pub kind: EntityKind,
    pub label: &'static str,
    pub base_path: &'static str,
    pub singular: &'static str,
    pub plural: &'static str,
    pub columns: &'static [ColumnSpec],
}

impl EntityConfig {
    pub fn not_found_code(&self) -> String {
        format!("{}_NOT_FOUND", self.singular.to_ascii_uppercase())
    }
}

/// What kind of row a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefTarget {
    User,
    Category,
}

/// A reference that must resolve to an existing row before a write is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub field: &'static str,
    pub target: RefTarget,
    pub id: Uuid,
}

/// Ids whose display names a view wants resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relations {
    pub users: Vec<Uuid>,
    pub categories: Vec<Uuid>,
}

impl Relations {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.categories.is_empty()
    }

    pub fn extend(&mut self, other: Relations) {
        for id in other.users {
            if !self.users.contains(&id) {
                self.users.push(id);
            }
        }
        for id in other.categories {
            if !self.categories.contains(&id) {
                self.categories.push(id);
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResolvedNames {
    pub usernames: HashMap<Uuid, String>,
    pub category_titles: HashMap<Uuid, String>,
}

impl ResolvedNames {
    pub fn user(&self, id: Uuid) -> UserRef {
        UserRef {
            id,
            username: self.usernames.get(&id).cloned(),
        }
    }

    pub fn category(&self, id: Uuid) -> CategoryRef {
        CategoryRef {
            id,
            title: self.category_titles.get(&id).cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRef {
    pub id: Uuid,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub title: Option<String>,
}

/// An entity managed by the generic soft-delete lifecycle.
///
/// Implementors are marker types; all state lives in `Attrs`. Validation is pure:
/// `Draft`/`Patch` come from the caller and are turned into trusted attributes or
/// per-field messages.
pub trait LifecycleEntity: Send + Sync + 'static {
    type Attrs: Clone + Send + Sync + 'static;
    type Draft: Send + 'static;
    type Patch: Send + 'static;
    type Changes: Send + 'static;
    type View: Serialize + Send + 'static;

    const CONFIG: EntityConfig;

    /// Whether a plain get also returns soft-deleted rows.
    const GET_INCLUDES_DELETED: bool = false;

    fn validate_draft(draft: Self::Draft) -> Result<Self::Attrs, FieldErrors>;

    fn validate_patch(patch: Self::Patch) -> Result<Self::Changes, FieldErrors>;

    fn apply(attrs: &mut Self::Attrs, changes: Self::Changes);

    fn references(_attrs: &Self::Attrs) -> Vec<Reference> {
        Vec::new()
    }

    fn relations(_record: &Record<Self::Attrs>) -> Relations {
        Relations::default()
    }

    fn project(record: Record<Self::Attrs>, names: &ResolvedNames) -> Self::View;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_operations_parse_case_insensitively() {
        assert_eq!("Product".parse::<EntityKind>(), Ok(EntityKind::Product));
        assert_eq!("softdelete".parse::<Operation>(), Ok(Operation::SoftDelete));
        assert!("order".parse::<EntityKind>().is_err());
        assert!("archive".parse::<Operation>().is_err());
    }

    #[test]
    fn relations_extend_deduplicates() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut relations = Relations {
            users: vec![a],
            categories: vec![],
        };
        relations.extend(Relations {
            users: vec![a, b],
            categories: vec![b],
        });

        assert_eq!(relations.users, vec![a, b]);
        assert_eq!(relations.categories, vec![b]);
    }

    #[test]
    fn resolved_names_leave_missing_targets_null() {
        let known = Uuid::new_v4();
        let missing = Uuid::new_v4();
        let mut names = ResolvedNames::default();
        names.usernames.insert(known, "admin".into());

        assert_eq!(names.user(known).username.as_deref(), Some("admin"));
        assert_eq!(names.user(missing).username, None);
        assert_eq!(names.category(missing).title, None);
    }
}
