pub mod model;
pub mod service;

pub use model::{BookElement, FetchOutcome};
pub use service::WebScraper;
