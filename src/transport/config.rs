// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport settings.

use std::time::Duration;

/// Interval between heartbeat frames.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Pause before reopening a closed stream.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Attempts per outbound frame.
pub const DEFAULT_SEND_RETRIES: u32 = 3;

/// Pause between attempts to send one frame.
pub const DEFAULT_SEND_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Settings of the command stream.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use dreo_lib::transport::TransportConfig;
///
/// let config = TransportConfig::default()
///     .with_endpoint("ws://127.0.0.1:9000/websocket")
///     .with_reconnect_delay(Duration::from_millis(100));
///
/// assert_eq!(config.endpoint(), Some("ws://127.0.0.1:9000/websocket"));
/// assert!(config.auto_reconnect());
/// assert_eq!(config.heartbeat_interval(), Duration::from_secs(15));
/// ```
#[derive(Debug, Clone)]
pub struct TransportConfig {
    endpoint: Option<String>,
    heartbeat_interval: Duration,
    auto_reconnect: bool,
    reconnect_delay: Duration,
    send_retries: u32,
    send_retry_delay: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            auto_reconnect: true,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            send_retries: DEFAULT_SEND_RETRIES,
            send_retry_delay: DEFAULT_SEND_RETRY_DELAY,
        }
    }
}

impl TransportConfig {
    /// Overrides the stream endpoint (without query string).
    ///
    /// By default it is derived from the account region.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the heartbeat interval.
    #[must_use]
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Enables or disables reopening the stream after it closes.
    #[must_use]
    pub fn with_auto_reconnect(mut self, enabled: bool) -> Self {
        self.auto_reconnect = enabled;
        self
    }

    /// Sets the pause before reopening the stream.
    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Sets the number of attempts per outbound frame (at least one).
    #[must_use]
    pub fn with_send_retries(mut self, retries: u32) -> Self {
        self.send_retries = retries.max(1);
        self
    }

    /// Sets the pause between send attempts.
    #[must_use]
    pub fn with_send_retry_delay(mut self, delay: Duration) -> Self {
        self.send_retry_delay = delay;
        self
    }

    /// Endpoint override, if any.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Heartbeat interval.
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        self.heartbeat_interval
    }

    /// Whether the stream is reopened after it closes.
    #[must_use]
    pub fn auto_reconnect(&self) -> bool {
        self.auto_reconnect
    }

    /// Pause before reopening the stream.
    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        self.reconnect_delay
    }

    /// Attempts per outbound frame.
    #[must_use]
    pub fn send_retries(&self) -> u32 {
        self.send_retries
    }

    /// Pause between send attempts.
    #[must_use]
    pub fn send_retry_delay(&self) -> Duration {
        self.send_retry_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TransportConfig::default();
        assert_eq!(config.endpoint(), None);
        assert_eq!(config.reconnect_delay(), Duration::from_secs(1));
        assert_eq!(config.send_retries(), 3);
        assert_eq!(config.send_retry_delay(), Duration::from_secs(5));
    }

    #[test]
    fn at_least_one_send_attempt() {
        assert_eq!(TransportConfig::default().with_send_retries(0).send_retries(), 1);
    }
}
