//! Transport tolerances.

use serde::{Deserialize, Serialize};

/// Secure Session configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How far an inbound sequence number may stray from the last accepted one
    #[serde(default = "default_seq_window")]
    pub seq_window: u32,

    /// Largest accepted difference between a message timestamp and the local clock
    #[serde(default = "default_max_clock_skew_secs")]
    pub max_clock_skew_secs: u64,
}

fn default_seq_window() -> u32 {
    8
}

fn default_max_clock_skew_secs() -> u64 {
    86_400
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seq_window: default_seq_window(),
            max_clock_skew_secs: default_max_clock_skew_secs(),
        }
    }
}
