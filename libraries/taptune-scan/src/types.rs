//! Core types for the scan pipeline

use crate::history::DEFAULT_HISTORY_CAPACITY;
use serde::{Deserialize, Serialize};

/// Configuration for the scan service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum scan history size (default: 10)
    pub history_capacity: usize,

    /// Whether resolving an external descriptor should also surface its URL
    /// for immediate opening (default: true)
    pub auto_open_links: bool,

    /// Command channel capacity (default: 64)
    pub command_capacity: usize,

    /// Event broadcast capacity; lagging subscribers lose the oldest
    /// events (default: 64)
    pub event_capacity: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            auto_open_links: true,
            command_capacity: 64,
            event_capacity: 64,
        }
    }
}
