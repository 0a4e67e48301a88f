//! Product catalog resource.

pub mod product;

pub use product::{NewProduct, Product, ProductPatch};
