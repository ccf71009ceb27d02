//! ArrayIO Common - Shared types and configuration
//!
//! This crate provides the array geometry, typed identifiers, and
//! configuration structures used across all ArrayIO components.

pub mod config;
pub mod types;

pub use config::{CacheConfig, RemoteConfig, VolumeConfig};
pub use types::*;
