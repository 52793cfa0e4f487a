// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `dreo_lib` library.
//!
//! Errors fall into three groups:
//!
//! - **Value errors** are raised synchronously by property setters before any
//!   command is emitted (out of range, invalid choice, invalid configuration).
//! - **Protocol and parse errors** come from the REST client and the stream
//!   transport. The transport recovers from them internally; REST callers see
//!   them wrapped in one of the session-level variants.
//! - **Session errors** describe which cloud operation failed (login, device
//!   list, device state).

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A setter rejected its argument.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// REST or stream communication failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A response body could not be interpreted.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The device cannot perform the requested operation.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// Login was rejected or returned no access token.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// A REST call other than login was attempted without a bearer.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The device list call did not succeed.
    #[error("device list unavailable: {0}")]
    ListUnavailable(String),

    /// The state call for one device did not succeed.
    #[error("state unavailable for {serial}: {reason}")]
    StateUnavailable {
        /// Serial number of the device whose state was requested.
        serial: String,
        /// Description of the failure.
        reason: String,
    },

    /// A setting read or write did not succeed.
    #[error("setting {key} unavailable: {reason}")]
    SettingUnavailable {
        /// The setting data key.
        key: String,
        /// Description of the failure.
        reason: String,
    },

    /// No device with this serial number is known to the session.
    #[error("device not found: {0}")]
    DeviceNotFound(String),
}

/// Errors raised when a setter validates its argument.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the declared range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The value that was provided.
        actual: i64,
    },

    /// An enumerated value is not one of the accepted choices.
    #[error("invalid choice {value:?}, expected one of {choices:?}")]
    InvalidChoice {
        /// The value that was provided.
        value: String,
        /// The accepted choices.
        choices: Vec<String>,
    },

    /// A composite configuration violates its constraints.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl ValueError {
    /// Builds an [`InvalidChoice`](Self::InvalidChoice) from any list of names.
    pub(crate) fn invalid_choice<I, S>(value: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::InvalidChoice {
            value: value.into(),
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }
}

/// Errors related to REST and stream communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// WebSocket connection or frame exchange failed.
    #[error("websocket error: {0}")]
    WebSocket(String),

    /// The stream was closed.
    #[error("connection closed")]
    ConnectionClosed,

    /// A local file could not be read (replay mode).
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for ProtocolError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        match err {
            tokio_tungstenite::tungstenite::Error::ConnectionClosed
            | tokio_tungstenite::tungstenite::Error::AlreadyClosed => Self::ConnectionClosed,
            other => Self::WebSocket(other.to_string()),
        }
    }
}

/// Errors related to interpreting response bodies and frames.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing.
    #[error("missing field: {0}")]
    MissingField(String),

    /// The payload does not have the expected shape.
    #[error("unexpected format: {0}")]
    UnexpectedFormat(String),
}

/// Errors related to device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device does not expose the attribute a setter writes.
    #[error("device does not support {capability}")]
    UnsupportedCapability {
        /// The capability that is not supported.
        capability: String,
    },
}

impl DeviceError {
    pub(crate) fn unsupported(capability: impl Into<String>) -> Self {
        Self::UnsupportedCapability {
            capability: capability.into(),
        }
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 1,
            max: 12,
            actual: 13,
        };
        assert_eq!(err.to_string(), "value 13 is out of range [1, 12]");
    }

    #[test]
    fn invalid_choice_lists_choices() {
        let err = ValueError::invalid_choice("turbo", ["normal", "sleep"]);
        assert_eq!(
            err,
            ValueError::InvalidChoice {
                value: "turbo".to_string(),
                choices: vec!["normal".to_string(), "sleep".to_string()],
            }
        );
        assert!(err.to_string().contains("turbo"));
    }

    #[test]
    fn error_from_value_error() {
        let err: Error = ValueError::InvalidConfiguration("too narrow".into()).into();
        assert!(matches!(
            err,
            Error::Value(ValueError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn device_error_display() {
        let err = DeviceError::unsupported("windlevel");
        assert_eq!(err.to_string(), "device does not support windlevel");
    }

    #[test]
    fn closed_websocket_maps_to_connection_closed() {
        let err: ProtocolError = tokio_tungstenite::tungstenite::Error::ConnectionClosed.into();
        assert!(matches!(err, ProtocolError::ConnectionClosed));
    }

    #[test]
    fn state_unavailable_display() {
        let err = Error::StateUnavailable {
            serial: "SN1".to_string(),
            reason: "code 1".to_string(),
        };
        assert_eq!(err.to_string(), "state unavailable for SN1: code 1");
    }
}
