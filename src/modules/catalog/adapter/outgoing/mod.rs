pub mod category_store_postgres;
pub mod product_store_postgres;
pub mod sea_orm_entity;

pub use category_store_postgres::CategoryStorePostgres;
pub use product_store_postgres::ProductStorePostgres;
