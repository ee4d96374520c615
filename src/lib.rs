pub mod analysis;
pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod report;
pub mod utils;
