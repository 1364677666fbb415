//! CLI library for testing purposes

pub mod build;
pub mod config;
pub mod diff;
pub mod loader;
pub mod logging;
pub mod validation;

pub use config::Config;
pub use loader::load_documents;
