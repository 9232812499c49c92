pub mod core;
pub mod utils;
pub mod books;
pub mod patrons;
pub mod loans;
pub mod catalog;
pub mod lending;
pub mod auth;
pub mod crawler;
pub mod menu;
