//! Intake pipeline configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the upload lifecycle controller and batch runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Name of the per-owner unsorted singleton folder.
    #[serde(default = "default_unsorted_name")]
    pub unsorted_folder_name: String,
    /// Maximum number of path segments accepted from a suggestion.
    #[serde(default = "default_max_segments")]
    pub max_path_segments: usize,
    /// Delay between tasks in batch mode, in milliseconds.
    #[serde(default = "default_batch_delay")]
    pub batch_delay_ms: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            unsorted_folder_name: default_unsorted_name(),
            max_path_segments: default_max_segments(),
            batch_delay_ms: default_batch_delay(),
        }
    }
}

fn default_unsorted_name() -> String {
    "Unsorted".to_string()
}

fn default_max_segments() -> usize {
    6
}

fn default_batch_delay() -> u64 {
    250
}
