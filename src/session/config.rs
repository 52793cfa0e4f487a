// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session settings.

use std::fmt;
use std::time::Duration;

use crate::cloud::{DEFAULT_TIMEOUT, Region};
use crate::codec::{REDACTED, Redactor};
use crate::transport::TransportConfig;
use crate::types::TemperatureUnit;

/// Account credentials and tuning for a [`Session`](super::Session).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use dreo_lib::{Region, SessionConfig};
///
/// let config = SessionConfig::new("me@example.com", "secret")
///     .with_region(Region::Eu)
///     .with_timeout(Duration::from_secs(10))
///     .with_redaction(true);
///
/// assert_eq!(config.region(), Region::Eu);
/// assert!(config.redactor().is_enabled());
/// assert!(!format!("{config:?}").contains("secret"));
/// ```
#[derive(Clone)]
pub struct SessionConfig {
    email: String,
    password: String,
    region: Region,
    base_url: Option<String>,
    timeout: Duration,
    redact: bool,
    temperature_unit: Option<TemperatureUnit>,
    transport: TransportConfig,
}

impl SessionConfig {
    /// Creates a configuration for the given account.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            region: Region::default(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            redact: false,
            temperature_unit: None,
            transport: TransportConfig::default(),
        }
    }

    /// Sets the region used until login reports the account's own.
    #[must_use]
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Sends REST calls to `base` instead of the regional host.
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = Some(base.into());
        self
    }

    /// Sets the REST request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables masking of credentials and identifiers in logged bodies.
    #[must_use]
    pub fn with_redaction(mut self, enabled: bool) -> Self {
        self.redact = enabled;
        self
    }

    /// Sets the host's temperature unit instead of detecting it per device.
    #[must_use]
    pub fn with_temperature_unit(mut self, unit: TemperatureUnit) -> Self {
        self.temperature_unit = Some(unit);
        self
    }

    /// Sets the command stream settings.
    #[must_use]
    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    /// Account e-mail.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Region before login.
    #[must_use]
    pub fn region(&self) -> Region {
        self.region
    }

    /// REST root override.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// REST request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Log redaction policy.
    #[must_use]
    pub fn redactor(&self) -> Redactor {
        Redactor::new(self.redact)
    }

    /// Host temperature unit, if fixed.
    #[must_use]
    pub fn temperature_unit(&self) -> Option<TemperatureUnit> {
        self.temperature_unit
    }

    /// Command stream settings.
    #[must_use]
    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("email", &self.email)
            .field("password", &REDACTED)
            .field("region", &self.region)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("redact", &self.redact)
            .field("temperature_unit", &self.temperature_unit)
            .field("transport", &self.transport)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::new("me@example.com", "pw");
        assert_eq!(config.region(), Region::Us);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(!config.redactor().is_enabled());
        assert_eq!(config.temperature_unit(), None);
        assert_eq!(config.base_url(), None);
        assert_eq!(config.password(), "pw");
    }

    #[test]
    fn debug_masks_password() {
        let config = SessionConfig::new("me@example.com", "hunter2");
        let text = format!("{config:?}");
        assert!(!text.contains("hunter2"));
        assert!(text.contains(REDACTED));
    }
}
