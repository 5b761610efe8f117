pub mod catalog;

pub use catalog::{Catalog, HttpCatalog, ProductInfo};
