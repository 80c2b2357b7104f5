//! Configuration Module
//!
//! Handles backend configuration loading and validation.

pub mod backend;
pub mod loader;

pub use backend::{BackendConfig, BackendOverrides, DEFAULT_BASE_URL_ENV};
pub use loader::{ConfigLoader, CONFIG_PATH_ENV};
