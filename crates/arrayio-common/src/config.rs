//! Configuration types for ArrayIO
//!
//! This module defines configuration structures consumed when a volume is
//! brought up against a live remote array.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Root configuration for an ArrayIO volume
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Remote array endpoint configuration
    pub remote: RemoteConfig,
    /// Block cache configuration
    pub cache: CacheConfig,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            remote: RemoteConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

/// Remote array endpoint configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Address of the remote array service
    pub addr: SocketAddr,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9010".parse().expect("static default address"),
        }
    }
}

/// Block cache configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Number of block entries the cache holds (valid range 2..=4096)
    pub entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { entries: 1024 }
    }
}
