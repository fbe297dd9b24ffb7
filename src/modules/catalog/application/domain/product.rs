use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::lifecycle::application::domain::{
    field_errors::{optional_text, required_text},
    CategoryRef, ColumnSpec, EntityConfig, EntityKind, FieldErrors, LifecycleEntity, Record,
    RefTarget, Reference, Relations, ResolvedNames, UserRef,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ProductAttrs {
    pub title: String,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub price: f64,
    pub loyalty_points: i64,
    pub product_quantity: i64,
    pub category_id: Uuid,
}

pub type ProductRecord = Record<ProductAttrs>;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub price: Option<f64>,
    pub loyalty_points: Option<i64>,
    pub product_quantity: Option<i64>,
    pub category: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub price: Option<f64>,
    pub loyalty_points: Option<i64>,
    pub product_quantity: Option<i64>,
    pub category: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub images: Option<Vec<String>>,
    pub price: Option<f64>,
    pub loyalty_points: Option<i64>,
    pub product_quantity: Option<i64>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub price: f64,
    pub loyalty_points: i64,
    pub product_quantity: i64,
    pub category: CategoryRef,
    pub is_deleted: bool,
    pub created_by: UserRef,
    pub modified_by: UserRef,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub deleted_date: Option<DateTime<Utc>>,
}

fn check_price(errors: &mut FieldErrors, price: f64) {
    if !price.is_finite() || price < 0.0 {
        errors.add("price", "price must be a non-negative number");
    }
}

fn check_count(errors: &mut FieldErrors, field: &str, value: i64) {
    if value < 0 {
        errors.add(field, format!("{field} must not be negative"));
    }
}

pub struct Product;

impl LifecycleEntity for Product {
    type Attrs = ProductAttrs;
    type Draft = ProductDraft;
    type Patch = ProductPatch;
    type Changes = ProductChanges;
    type View = ProductView;

    const CONFIG: EntityConfig = EntityConfig {
        kind: EntityKind::Product,
        label: "Product",
        base_path: "/api/products",
        singular: "product",
        plural: "products",
        columns: &[
            ColumnSpec { field: "title", header: "Title" },
            ColumnSpec { field: "category", header: "Category" },
            ColumnSpec { field: "price", header: "Price" },
            ColumnSpec { field: "productQuantity", header: "Quantity" },
            ColumnSpec { field: "loyaltyPoints", header: "Loyalty Points" },
        ],
    };

    fn validate_draft(draft: ProductDraft) -> Result<ProductAttrs, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = required_text(&mut errors, "title", draft.title);

        let price = draft.price.unwrap_or_else(|| {
            errors.add("price", "price is required");
            0.0
        });
        check_price(&mut errors, price);

        let product_quantity = draft.product_quantity.unwrap_or_else(|| {
            errors.add("productQuantity", "productQuantity is required");
            0
        });
        check_count(&mut errors, "productQuantity", product_quantity);

        let loyalty_points = draft.loyalty_points.unwrap_or(0);
        check_count(&mut errors, "loyaltyPoints", loyalty_points);

        let category_id = draft.category.unwrap_or_else(|| {
            errors.add("category", "category is required");
            Uuid::nil()
        });

        errors.into_result(ProductAttrs {
            title,
            description: optional_text(draft.description),
            images: draft.images.unwrap_or_default(),
            price,
            loyalty_points,
            product_quantity,
            category_id,
        })
    }

    fn validate_patch(patch: ProductPatch) -> Result<ProductChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = patch
            .title
            .map(|t| required_text(&mut errors, "title", Some(t)));
        if let Some(price) = patch.price {
            check_price(&mut errors, price);
        }
        if let Some(quantity) = patch.product_quantity {
            check_count(&mut errors, "productQuantity", quantity);
        }
        if let Some(points) = patch.loyalty_points {
            check_count(&mut errors, "loyaltyPoints", points);
        }

        errors.into_result(ProductChanges {
            title,
            description: patch.description.map(|d| optional_text(Some(d))),
            images: patch.images,
            price: patch.price,
            loyalty_points: patch.loyalty_points,
            product_quantity: patch.product_quantity,
            category_id: patch.category,
        })
    }

    fn apply(attrs: &mut ProductAttrs, changes: ProductChanges) {
        if let Some(title) = changes.title {
            attrs.title = title;
        }
        if let Some(description) = changes.description {
            attrs.description = description;
        }
        if let Some(images) = changes.images {
            attrs.images = images;
        }
        if let Some(price) = changes.price {
            attrs.price = price;
        }
        if let Some(points) = changes.loyalty_points {
            attrs.loyalty_points = points;
        }
        if let Some(quantity) = changes.product_quantity {
            attrs.product_quantity = quantity;
        }
        if let Some(category_id) = changes.category_id {
            attrs.category_id = category_id;
        }
    }

    fn references(attrs: &ProductAttrs) -> Vec<Reference> {
        vec![Reference {
            field: "category",
            target: RefTarget::Category,
            id: attrs.category_id,
        }]
    }

    fn relations(record: &ProductRecord) -> Relations {
        Relations {
            users: vec![record.meta.created_by, record.meta.modified_by],
            categories: vec![record.attrs.category_id],
        }
    }

    fn project(record: ProductRecord, names: &ResolvedNames) -> ProductView {
        let Record { meta, attrs } = record;
        ProductView {
            id: meta.id,
            title: attrs.title,
            description: attrs.description,
            images: attrs.images,
            price: attrs.price,
            loyalty_points: attrs.loyalty_points,
            product_quantity: attrs.product_quantity,
            category: names.category(attrs.category_id),
            is_deleted: meta.is_deleted,
            created_by: names.user(meta.created_by),
            modified_by: names.user(meta.modified_by),
            created_date: meta.created_date,
            modified_date: meta.modified_date,
            deleted_date: meta.deleted_date,
        }
    }
}
