pub mod model;

pub use model::Patron;
