//! Configuration system: schema, loading, and env var fallback.
//!
//! # Usage
//! ```no_run
//! use agentkit_core::config;
//!
//! let settings = config::load_settings(None);
//! println!("Generation deployment: {}", settings.ll_model);
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{get_config_path, load_settings};
pub use schema::Settings;
