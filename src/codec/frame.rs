// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stream frames exchanged over the command websocket.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ParseError;

/// Client to server heartbeat, sent as a bare text frame.
pub const HEARTBEAT: &str = "2";

/// Outbound control command for one device.
///
/// # Examples
///
/// ```
/// use dreo_lib::codec::ControlFrame;
/// use serde_json::{Map, json};
///
/// let mut params = Map::new();
/// params.insert("windlevel".into(), json!(6));
///
/// let frame = ControlFrame::with_timestamp("SN1", params, "1700000000000");
/// let text = frame.to_text().unwrap();
/// let value: serde_json::Value = serde_json::from_str(&text).unwrap();
/// assert_eq!(value["method"], "control");
/// assert_eq!(value["params"]["windlevel"], 6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlFrame {
    /// Target device serial number.
    pub devicesn: String,
    /// Always `"control"`.
    pub method: String,
    /// Attribute writes.
    pub params: Map<String, Value>,
    /// Milliseconds since the epoch, as a string.
    pub timestamp: String,
}

impl ControlFrame {
    /// Builds a control frame stamped with the current time.
    #[must_use]
    pub fn new(serial: impl Into<String>, params: Map<String, Value>) -> Self {
        Self::with_timestamp(serial, params, super::now_ms())
    }

    /// Builds a control frame with an explicit timestamp.
    #[must_use]
    pub fn with_timestamp(
        serial: impl Into<String>,
        params: Map<String, Value>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            devicesn: serial.into(),
            method: "control".to_string(),
            params,
            timestamp: timestamp.into(),
        }
    }

    /// Serializes the frame as websocket text.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] if serialization fails.
    pub fn to_text(&self) -> Result<String, ParseError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Inbound state delta for one device.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeltaFrame {
    /// Serial number of the device that changed.
    pub devicesn: String,
    /// Changed attributes and their new values.
    #[serde(default)]
    pub reported: Map<String, Value>,
}

impl DeltaFrame {
    /// Parses a websocket text frame.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] for malformed JSON and
    /// [`ParseError::MissingField`] when `devicesn` is absent.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Interprets an already decoded JSON value.
    ///
    /// # Errors
    ///
    /// See [`parse`](Self::parse).
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        if value.get("devicesn").and_then(Value::as_str).is_none() {
            return Err(ParseError::MissingField("devicesn".to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn control_frame_shape() {
        let mut params = Map::new();
        params.insert("poweron".into(), json!(true));
        let frame = ControlFrame::with_timestamp("SN1", params, "42");
        let value: Value = serde_json::from_str(&frame.to_text().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "devicesn": "SN1",
                "method": "control",
                "params": {"poweron": true},
                "timestamp": "42",
            })
        );
    }

    #[test]
    fn new_frame_is_stamped() {
        let frame = ControlFrame::new("SN1", Map::new());
        assert!(frame.timestamp.parse::<i64>().is_ok());
    }

    #[test]
    fn delta_frame_ignores_extra_fields() {
        let frame = DeltaFrame::parse(
            r#"{"devicesn":"SN1","method":"report","reported":{"windlevel":6},"timestamp":1}"#,
        )
        .unwrap();
        assert_eq!(frame.devicesn, "SN1");
        assert_eq!(frame.reported.get("windlevel"), Some(&json!(6)));
    }

    #[test]
    fn delta_frame_without_reported_is_empty() {
        let frame = DeltaFrame::parse(r#"{"devicesn":"SN1"}"#).unwrap();
        assert!(frame.reported.is_empty());
    }

    #[test]
    fn delta_frame_requires_serial() {
        let err = DeltaFrame::parse(r#"{"reported":{}}"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingField(_)));
        assert!(matches!(
            DeltaFrame::parse("not json"),
            Err(ParseError::Json(_))
        ));
    }
}
