//! Domain records for the inventory catalog.

pub mod product;
pub mod profile;

pub use product::{NewProduct, Product, DEFAULT_REORDER_LEVEL};
pub use profile::{Gender, ProfileUpdate, UserProfile};
