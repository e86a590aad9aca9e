pub mod config;
pub mod converter;
pub mod error;
pub mod navigation;
pub mod snapshot;
pub mod templates;

pub use config::{Config, NotebookEntry};
pub use error::ConfigError;
