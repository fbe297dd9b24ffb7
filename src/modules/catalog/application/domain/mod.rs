pub mod category;
pub mod product;

pub use category::{Category, CategoryAttrs, CategoryDraft, CategoryPatch, CategoryRecord, CategoryView};
pub use product::{Product, ProductAttrs, ProductDraft, ProductPatch, ProductRecord, ProductView};
