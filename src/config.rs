//! Configuration for memrep
//!
//! Centralized configuration with sensible defaults.

use crate::error::{MemRepError, Result};
use crate::factory::RepKind;

/// Configuration for creating table representations
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Representation Configuration
    // -------------------------------------------------------------------------
    /// Which representation variant the factory builds
    pub rep_kind: RepKind,

    /// Expected number of entries per table (capacity hint, may be 0)
    pub expected_entries: usize,

    // -------------------------------------------------------------------------
    // Arena Configuration
    // -------------------------------------------------------------------------
    /// Size of each arena block (in bytes)
    pub arena_block_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rep_kind: RepKind::Vector,
            expected_entries: 0,
            arena_block_size: 4 * 1024 * 1024, // 4 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the configuration can back a working arena
    pub fn validate(&self) -> Result<()> {
        if self.arena_block_size == 0 {
            return Err(MemRepError::Config(
                "arena_block_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the representation variant
    pub fn rep_kind(mut self, kind: RepKind) -> Self {
        self.config.rep_kind = kind;
        self
    }

    /// Set the representation variant by its registered name
    pub fn rep_name(mut self, name: &str) -> Result<Self> {
        self.config.rep_kind = name.parse()?;
        Ok(self)
    }

    /// Set the expected entry count (capacity hint)
    pub fn expected_entries(mut self, count: usize) -> Self {
        self.config.expected_entries = count;
        self
    }

    /// Set the arena block size (in bytes)
    pub fn arena_block_size(mut self, size: usize) -> Self {
        self.config.arena_block_size = size;
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
