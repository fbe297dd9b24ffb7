use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::lifecycle::application::domain::{
    field_errors::{optional_text, required_text},
    ColumnSpec, EntityConfig, EntityKind, FieldErrors, LifecycleEntity, Record, Relations,
    ResolvedNames, UserRef,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryAttrs {
    pub title: String,
    pub description: Option<String>,
}

pub type CategoryRecord = Record<CategoryAttrs>;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CategoryDraft {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Absent fields are left alone; a blank description clears it.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CategoryPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub created_by: UserRef,
    pub modified_by: UserRef,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub deleted_date: Option<DateTime<Utc>>,
}

pub struct Category;

impl LifecycleEntity for Category {
    type Attrs = CategoryAttrs;
    type Draft = CategoryDraft;
    type Patch = CategoryPatch;
    type Changes = CategoryChanges;
    type View = CategoryView;

    const CONFIG: EntityConfig = EntityConfig {
        kind: EntityKind::Category,
        label: "Category",
        base_path: "/api/categories",
        singular: "category",
        plural: "categories",
        columns: &[
            ColumnSpec { field: "title", header: "Title" },
            ColumnSpec { field: "description", header: "Description" },
            ColumnSpec { field: "createdBy", header: "Created By" },
            ColumnSpec { field: "modifiedDate", header: "Last Modified" },
        ],
    };

    fn validate_draft(draft: CategoryDraft) -> Result<CategoryAttrs, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = required_text(&mut errors, "title", draft.title);

        errors.into_result(CategoryAttrs {
            title,
            description: optional_text(draft.description),
        })
    }

    fn validate_patch(patch: CategoryPatch) -> Result<CategoryChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = patch
            .title
            .map(|t| required_text(&mut errors, "title", Some(t)));

        errors.into_result(CategoryChanges {
            title,
            description: patch.description.map(|d| optional_text(Some(d))),
        })
    }

    fn apply(attrs: &mut CategoryAttrs, changes: CategoryChanges) {
        if let Some(title) = changes.title {
            attrs.title = title;
        }
        if let Some(description) = changes.description {
            attrs.description = description;
        }
    }

    fn relations(record: &CategoryRecord) -> Relations {
        Relations {
            users: vec![record.meta.created_by, record.meta.modified_by],
            categories: Vec::new(),
        }
    }

    fn project(record: CategoryRecord, names: &ResolvedNames) -> CategoryView {
        let Record { meta, attrs } = record;
        CategoryView {
            id: meta.id,
            title: attrs.title,
            description: attrs.description,
            is_deleted: meta.is_deleted,
            created_by: names.user(meta.created_by),
            modified_by: names.user(meta.modified_by),
            created_date: meta.created_date,
            modified_date: meta.modified_date,
            deleted_date: meta.deleted_date,
        }
    }
}
