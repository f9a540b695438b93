use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{XetError, XetResult};
use crate::types::MerkleHash;

/// Default chunker target: 64 KiB
pub const DEFAULT_TARGET_CHUNK_SIZE: usize = 64 * 1024;

/// Top-level engine configuration (loaded from xet.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct XetConfig {
    pub chunking: ChunkingConfig,
    pub parallel: ParallelConfig,
    pub verification: VerificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Expected chunk length; must be a power of 2 greater than 64
    pub target_chunk_size: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Worker thread count for multi-stream chunking (0 = cpu_count)
    pub workers: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Salt mixed into file hashes (zero salt when absent)
    pub file_hash_salt: Option<MerkleHash>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_chunk_size: DEFAULT_TARGET_CHUNK_SIZE,
        }
    }
}

impl VerificationConfig {
    pub fn salt(&self) -> MerkleHash {
        self.file_hash_salt.unwrap_or_default()
    }
}

impl XetConfig {
    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> XetResult<Self> {
        toml::from_str(content).map_err(|e| XetError::Config(e.to_string()))
    }

    /// Load configuration from `path`, falling back to defaults when the file is missing.
    pub fn load(path: &Path) -> XetResult<Self> {
        if !path.exists() {
            tracing::warn!(
                "config file not found: {}  (using defaults)",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| XetError::Config(format!("parsing config {}: {e}", path.display())))
    }
}
