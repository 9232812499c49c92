pub mod date;
pub mod logs;
pub mod password;
