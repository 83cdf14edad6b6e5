//! Configuration for huffpack

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HuffError, Result};
use crate::header::HeaderFormat;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    pub header: HeaderFormat,
    pub max_input_size: u64,
    pub buffer_size: usize,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            header: HeaderFormat::Tree,
            max_input_size: 4 * 1024 * 1024 * 1024, // 4 GiB
            buffer_size: 64 * 1024,
        }
    }
}

impl CompressionConfig {
    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| HuffError::ConfigError(e.to_string()))
    }
}
