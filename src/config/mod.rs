//! Configuration module for subtitle search
//!
//! This module provides the `SearchConfig` struct, its builder, and
//! environment loading with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::SearchConfigBuilder;
pub use types::{ConfigError, SearchConfig};
