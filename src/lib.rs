pub mod books;
pub mod catalog;
pub mod core;
pub mod uploads;
pub mod utils;
