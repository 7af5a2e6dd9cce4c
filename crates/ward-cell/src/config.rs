//! Secure Cell tuning.

use serde::{Deserialize, Serialize};
use ward_soter::pbkdf::DEFAULT_ITERATIONS;

/// Secure Cell configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellConfig {
    /// PBKDF2 iteration count for new passphrase cells
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,
}

fn default_pbkdf2_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            pbkdf2_iterations: default_pbkdf2_iterations(),
        }
    }
}
