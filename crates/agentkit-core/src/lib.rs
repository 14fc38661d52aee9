//! Core pieces shared by the agentkit crates.
//!
//! - [`config`]: the [`config::Settings`] schema and its loader
//! - [`utils`]: data-path and small string helpers

pub mod config;
pub mod utils;
