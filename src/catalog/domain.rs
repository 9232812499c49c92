pub mod model;

pub use model::Catalog;
