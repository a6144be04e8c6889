//! `storecms-catalog` — catalog domain model.
//!
//! Stores, categories, variants (with options), products (with purchasable
//! items). All constructors and mutators validate and normalize their input;
//! nothing in this crate touches storage or HTTP.

pub mod category;
pub mod product;
pub mod store;
pub mod variant;

pub use category::Category;
pub use product::{item_combinations, validate_item_options, Product, ProductItem};
pub use store::Store;
pub use variant::{Variant, VariantOption};
