//! Configuration file support.
//!
//! ```toml
//! [cell]
//! pbkdf2_iterations = 200000
//!
//! [session]
//! seq_window = 8
//! max_clock_skew_secs = 86400
//! ```
//!
//! Missing sections and keys take their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ward_cell::CellConfig;
use ward_session::SessionConfig;

/// WARD configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Secure Cell configuration
    #[serde(default)]
    pub cell: CellConfig,
    /// Secure Session configuration
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse or fails validation.
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;
        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a value would make the cell or session unusable.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.cell.pbkdf2_iterations == 0 {
            anyhow::bail!("PBKDF2 iteration count must be at least 1");
        }

        if self.session.seq_window == 0 {
            anyhow::bail!("Sequence window must be at least 1");
        }

        if self.session.max_clock_skew_secs == 0 {
            anyhow::bail!("Maximum clock skew must be at least 1 second");
        }

        Ok(())
    }
}
