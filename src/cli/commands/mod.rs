pub mod analyze;
pub mod config;
pub mod generate;
