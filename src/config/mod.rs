//! Configuration module for harvest runs
//!
//! This module provides the `HarvestConfig` struct and its builder with
//! validation and defaults matching the retailer constants.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::HarvestConfigBuilder;
pub use types::HarvestConfig;
