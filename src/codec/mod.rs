// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire codec for the vendor REST API and the command stream.
//!
//! This module builds request bodies and headers, parses response
//! envelopes and stream frames, and redacts sensitive fields before
//! anything is logged.
//!
//! # Examples
//!
//! ```
//! use dreo_lib::codec::{build_headers, build_list_body};
//!
//! let body = build_list_body();
//! assert_eq!(body["method"], "devices");
//! assert_eq!(body["size"], 100);
//!
//! let headers = build_headers(Some("abc"));
//! assert!(headers.contains(&("authorization", "Bearer abc".to_string())));
//! ```

mod envelope;
mod frame;
mod redact;

pub use envelope::{DeviceRecord, Envelope, LoginData, extract_snapshot};
pub use frame::{ControlFrame, DeltaFrame, HEARTBEAT};
pub use redact::{REDACTED, Redactor};

use md5::{Digest, Md5};
use serde_json::{Value, json};

/// OAuth client id of the vendor mobile app.
const CLIENT_ID: &str = "7de37c362ee54dcf9c4561812309347a";

/// OAuth client secret of the vendor mobile app.
const CLIENT_SECRET: &str = "32dfa0764f25451d99f94e1693498791";

/// Fixed handset identifier expected by the login endpoint.
const HIMEI: &str = "faede31549d649f58864093158787ec9";

/// Language tag sent with every request.
const LANGUAGE: &str = "en";

/// App user agent.
const APP_UA: &str = "dreo/2.8.2";

/// HTTP user agent.
const HTTP_USER_AGENT: &str = "okhttp/4.9.1";

/// Page size used when listing devices.
pub const DEVICE_PAGE_SIZE: u32 = 100;

/// Hex-encoded MD5 of the UTF-8 password, as the login endpoint expects.
#[must_use]
pub fn hash_password(password: &str) -> String {
    hex::encode(Md5::digest(password.as_bytes()))
}

/// Builds the JSON body of the login call.
///
/// # Examples
///
/// ```
/// use dreo_lib::codec::build_login_body;
///
/// let body = build_login_body("u", "p");
/// assert_eq!(body["grant_type"], "email-password");
/// assert_eq!(body["password"], "83878c91171338902e0fe0fb97a8c47a");
/// ```
#[must_use]
pub fn build_login_body(email: &str, password: &str) -> Value {
    json!({
        "client_id": CLIENT_ID,
        "client_secret": CLIENT_SECRET,
        "email": email,
        "password": hash_password(password),
        "encrypt": "ciphertext",
        "grant_type": "email-password",
        "himei": HIMEI,
        "acceptLanguage": LANGUAGE,
        "scope": "all",
    })
}

/// Builds the device list body; also the base of the state query.
#[must_use]
pub fn build_list_body() -> Value {
    json!({
        "method": "devices",
        "page": 1,
        "size": DEVICE_PAGE_SIZE,
    })
}

/// Flattens a JSON object into query pairs. Non-object input yields nothing.
#[must_use]
pub fn to_query(body: &Value) -> Vec<(String, String)> {
    body.as_object()
        .map(|object| {
            object
                .iter()
                .map(|(key, value)| {
                    let text = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (key.clone(), text)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Fixed request headers, plus the bearer line when a token is known.
#[must_use]
pub fn build_headers(bearer: Option<&str>) -> Vec<(&'static str, String)> {
    let mut headers = vec![
        ("ua", APP_UA.to_string()),
        ("lang", LANGUAGE.to_string()),
        ("content-type", "application/json; charset=UTF-8".to_string()),
        ("user-agent", HTTP_USER_AGENT.to_string()),
    ];
    if let Some(token) = bearer {
        headers.push(("authorization", format!("Bearer {token}")));
    }
    headers
}

/// Current wall-clock time in milliseconds, as a decimal string.
#[must_use]
pub fn now_ms() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_is_md5_hex() {
        assert_eq!(hash_password(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(hash_password("p"), "83878c91171338902e0fe0fb97a8c47a");
    }

    #[test]
    fn login_body_carries_fixed_identifiers() {
        let body = build_login_body("user@example.com", "secret");
        assert_eq!(body["client_id"], CLIENT_ID);
        assert_eq!(body["client_secret"], CLIENT_SECRET);
        assert_eq!(body["himei"], HIMEI);
        assert_eq!(body["scope"], "all");
        assert_eq!(body["email"], "user@example.com");
        assert_ne!(body["password"], "secret");
    }

    #[test]
    fn query_pairs_from_list_body() {
        let pairs = to_query(&build_list_body());
        assert!(pairs.contains(&("method".to_string(), "devices".to_string())));
        assert!(pairs.contains(&("page".to_string(), "1".to_string())));
        assert!(pairs.contains(&("size".to_string(), "100".to_string())));
    }

    #[test]
    fn headers_without_bearer() {
        let headers = build_headers(None);
        assert!(headers.iter().all(|(name, _)| *name != "authorization"));
        assert!(headers.contains(&("ua", APP_UA.to_string())));
    }

    #[test]
    fn now_ms_is_numeric() {
        let now = now_ms();
        assert!(now.parse::<i64>().unwrap() > 1_600_000_000_000);
    }
}
