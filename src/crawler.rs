pub mod domain;
pub mod factory;
pub mod fetcher;
pub mod parser;
