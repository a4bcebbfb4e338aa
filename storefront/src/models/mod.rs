// vitrina/storefront/src/models/mod.rs

pub mod product;

pub use product::{NewProduct, Product, Projection};
