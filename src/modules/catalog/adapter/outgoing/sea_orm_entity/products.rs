use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    // JSON array of image URLs, order preserved.
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub loyalty_points: i64,
    pub product_quantity: i64,
    // Not a foreign key: purging a category leaves products pointing at it.
    pub category_id: Uuid,
    pub is_deleted: bool,
    pub created_by: Uuid,
    pub modified_by: Uuid,
    pub created_date: DateTimeWithTimeZone,
    pub modified_date: DateTimeWithTimeZone,
    pub deleted_date: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
