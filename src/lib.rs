pub mod catalog;
pub mod config;
pub mod errors;
pub mod scraping;
pub mod upstream;
pub mod utils;
pub mod web;
