//! HTTP handlers, one module per endpoint group

pub mod catalog;
pub mod debug;
pub mod health;
pub mod scraping;
pub mod themes;
