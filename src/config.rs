//! Engine configuration.
//!
//! TOML-deserializable settings for the lifecycle engine.

use serde::Deserialize;

use crate::error::{CoreError, Result};
use crate::subscription::status::EXPIRING_SOON_WINDOW_DAYS;

/// Configuration for the lifecycle engine.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Days before the end date at which a subscription shows as expiring
    /// soon.
    #[serde(default = "default_expiring_window")]
    pub expiring_soon_window_days: u32,

    /// Days of lookahead used by the list statistics. Wider than the badge
    /// window so the overview warns earlier.
    #[serde(default = "default_stats_lookahead")]
    pub stats_lookahead_days: u32,
}

fn default_expiring_window() -> u32 {
    EXPIRING_SOON_WINDOW_DAYS
}

fn default_stats_lookahead() -> u32 {
    30
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            expiring_soon_window_days: default_expiring_window(),
            stats_lookahead_days: default_stats_lookahead(),
        }
    }
}

impl EngineConfig {
    /// Validates the configuration.
    ///
    /// Both windows must be at least one day; a zero window would make
    /// `ExpiringSoon` unreachable and silently turn the warning off.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Configuration` if a window is zero.
    pub fn validate(&self) -> Result<()> {
        if self.expiring_soon_window_days == 0 {
            return Err(CoreError::Configuration(
                "expiring_soon_window_days must be at least 1".to_owned(),
            ));
        }
        if self.stats_lookahead_days == 0 {
            return Err(CoreError::Configuration(
                "stats_lookahead_days must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}
