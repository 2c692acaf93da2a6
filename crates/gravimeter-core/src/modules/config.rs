//! Watcher configuration.
//!
//! Owned and persisted by whatever front-end embeds the core; the core only
//! consumes it. Every field has a serde default so configs written by older
//! versions keep deserializing.

use gravimeter_types::ClockMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default seconds between poll cycles.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Floor on the poll interval. Anything faster hammers the language server
/// without the quota data actually changing.
pub const MIN_POLL_INTERVAL_SECS: u64 = 10;

/// Settings the watcher honors for polling and that front-ends honor for
/// rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Seconds between poll cycles.
    pub poll_interval_secs: u64,
    /// How absolute reset times are rendered.
    pub clock_mode: ClockMode,
    /// Whether reset countdowns are rendered at all.
    pub show_reset_countdown: bool,
    /// Workspace folder used to pick among several IDE windows.
    pub workspace_hint: Option<PathBuf>,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            clock_mode: ClockMode::default(),
            show_reset_countdown: true,
            workspace_hint: None,
        }
    }
}

impl WatcherConfig {
    /// Poll interval with the floor applied. The stored value is left as the
    /// user wrote it; only the effective cadence is clamped.
    pub fn effective_poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(MIN_POLL_INTERVAL_SECS))
    }
}
