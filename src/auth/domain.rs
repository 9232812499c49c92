pub mod service;

pub use service::Login;
