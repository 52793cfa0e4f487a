// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Log redaction of credentials and identifiers.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Replacement written in place of a sensitive value.
pub const REDACTED: &str = "**REDACTED**";

/// Matches `"key": value` for sensitive keys, capturing everything up to the
/// value so the key and spacing survive.
static SENSITIVE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)("(?:token|access_token|refresh_token|accesstoken|password|email|sn|devicesn|accountid|userid|deviceid|authkey|macid|mac)"\s*:\s*)("(?:[^"\\]|\\.)*"|-?\d+(?:\.\d+)?)"#,
    )
    .expect("redaction pattern compiles")
});

/// Redaction policy applied to every body and frame before it is logged.
///
/// The policy is a value owned by whoever logs (the cloud client and the
/// transport), not process-wide state. It is off by default.
///
/// # Examples
///
/// ```
/// use dreo_lib::codec::Redactor;
///
/// let redactor = Redactor::new(true);
/// let text = redactor.redact(r#"{"access_token": "abc", "code": 0}"#);
/// assert_eq!(text, r#"{"access_token": "**REDACTED**", "code": 0}"#);
///
/// let passthrough = Redactor::default();
/// assert_eq!(passthrough.redact(r#"{"sn": "X1"}"#), r#"{"sn": "X1"}"#);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Redactor {
    enabled: bool,
}

impl Redactor {
    /// Creates a policy.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Returns `true` if values are being replaced.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Replaces the value of every sensitive JSON field in `text`.
    #[must_use]
    pub fn redact<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !self.enabled {
            return Cow::Borrowed(text);
        }
        SENSITIVE_FIELD.replace_all(text, format!("${{1}}\"{REDACTED}\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_policy_is_identity() {
        let text = r#"{"password":"hunter2"}"#;
        assert!(matches!(Redactor::default().redact(text), Cow::Borrowed(_)));
    }

    #[test]
    fn replaces_strings_and_numbers() {
        let redactor = Redactor::new(true);
        let text = r#"{"deviceId": 123456, "deviceSn":"ABC","model":"DR-HTF005S"}"#;
        assert_eq!(
            redactor.redact(text),
            r#"{"deviceId": "**REDACTED**", "deviceSn":"**REDACTED**","model":"DR-HTF005S"}"#
        );
    }

    #[test]
    fn key_match_is_case_insensitive_and_exact() {
        let redactor = Redactor::new(true);
        let text = r#"{"EMAIL":"a@b.c","snapshot":"keep","devicesn":"X"}"#;
        assert_eq!(
            redactor.redact(text),
            r#"{"EMAIL":"**REDACTED**","snapshot":"keep","devicesn":"**REDACTED**"}"#
        );
    }

    #[test]
    fn escaped_quotes_inside_value() {
        let redactor = Redactor::new(true);
        let text = r#"{"password":"a\"b","code":0}"#;
        assert_eq!(
            redactor.redact(text),
            r#"{"password":"**REDACTED**","code":0}"#
        );
    }
}
