//! Streaming connection settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_connect_timeout_secs() -> u64 {
    10
}

const fn default_idle_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Time allowed for the WebSocket handshake. `0` waits forever.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Longest gap allowed between two frames. `0` waits forever.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub const fn connect_timeout(&self) -> Option<Duration> {
        secs(self.connect_timeout_secs)
    }

    #[must_use]
    pub const fn idle_timeout(&self) -> Option<Duration> {
        secs(self.idle_timeout_secs)
    }
}

const fn secs(value: u64) -> Option<Duration> {
    if value == 0 {
        None
    } else {
        Some(Duration::from_secs(value))
    }
}
