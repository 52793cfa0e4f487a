// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! REST response envelope and the payloads carried inside it.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::ParseError;

/// Uniform `{code, msg, data}` wrapper of every REST response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope {
    /// Vendor status code; `0` means success.
    #[serde(default = "missing_code")]
    pub code: i64,
    /// Human-readable status.
    #[serde(default)]
    pub msg: Option<String>,
    /// Payload.
    #[serde(default)]
    pub data: Value,
}

fn missing_code() -> i64 {
    -1
}

impl Envelope {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] for malformed JSON.
    pub fn parse(body: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Returns `true` if the vendor code is `0`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// `code`/`msg` summary used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.msg {
            Some(msg) => format!("code {} ({msg})", self.code),
            None => format!("code {}", self.code),
        }
    }
}

/// `data` payload of a login response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginData {
    /// Bearer for all later calls.
    pub access_token: Option<String>,
    /// Account region tag (`NA`, `EU`).
    #[serde(default)]
    pub region: Option<String>,
}

/// One entry of the device list.
///
/// # Examples
///
/// ```
/// use dreo_lib::codec::DeviceRecord;
/// use serde_json::json;
///
/// let record: DeviceRecord = serde_json::from_value(json!({
///     "deviceId": 1234567890,
///     "sn": "SN1",
///     "model": "DR-HTF005S",
///     "deviceName": "Bedroom Fan",
/// }))
/// .unwrap();
/// assert_eq!(record.device_id, "1234567890");
/// assert_eq!(record.name(), "Bedroom Fan");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    /// Opaque numeric id, kept as text.
    #[serde(deserialize_with = "string_or_number")]
    pub device_id: String,
    /// Serial number; routing key for stream frames.
    pub sn: String,
    /// Model string, e.g. `DR-HTF005S`.
    pub model: String,
    /// Product family name as shown in the vendor app.
    #[serde(default)]
    pub product_name: Option<String>,
    /// Brand.
    #[serde(default)]
    pub brand: Option<String>,
    /// Series code.
    #[serde(default)]
    pub series: Option<String>,
    /// Series display name.
    #[serde(default)]
    pub series_name: Option<String>,
    /// User-assigned name.
    #[serde(default)]
    pub device_name: Option<String>,
    /// Capability descriptor reported by the firmware.
    #[serde(default)]
    pub controls_conf: Option<Value>,
}

impl DeviceRecord {
    /// Display name: user name, else product name, else model.
    #[must_use]
    pub fn name(&self) -> &str {
        self.device_name
            .as_deref()
            .or(self.product_name.as_deref())
            .unwrap_or(&self.model)
    }

    /// Builds a record by hand, mostly for tests.
    #[must_use]
    pub fn new(
        sn: impl Into<String>,
        device_id: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            sn: sn.into(),
            model: model.into(),
            product_name: None,
            brand: None,
            series: None,
            series_name: None,
            device_name: None,
            controls_conf: None,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Extracts `{attr: {state: v, ...}}` into `{attr: v}`.
///
/// Entries without a `state` member are skipped.
///
/// # Errors
///
/// Returns [`ParseError::UnexpectedFormat`] if `mixed` is not an object.
pub fn extract_snapshot(mixed: &Value) -> Result<Map<String, Value>, ParseError> {
    let object = mixed
        .as_object()
        .ok_or_else(|| ParseError::UnexpectedFormat("data.mixed is not an object".to_string()))?;
    Ok(object
        .iter()
        .filter_map(|(key, entry)| {
            entry
                .get("state")
                .filter(|state| !state.is_null())
                .map(|state| (key.clone(), state.clone()))
        })
        .collect())
}
