// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scalar snapshot of one device.

use serde_json::{Map, Value};

use super::attribute::AttrKind;

/// Current reported values of one device, keyed by wire symbol.
///
/// Absent keys mean the device has not reported the attribute. Values are
/// stored exactly as received once they pass the type guard of
/// [`AttrKind`].
///
/// # Examples
///
/// ```
/// use dreo_lib::state::DeviceState;
/// use serde_json::json;
///
/// let mut state = DeviceState::new();
/// assert!(state.apply("windlevel", json!(6)));
/// assert!(!state.apply("windlevel", json!("fast")));
/// assert_eq!(state.int("windlevel"), Some(6));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceState {
    values: Map<String, Value>,
}

impl DeviceState {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key` if its type matches the attribute kind.
    ///
    /// Returns `true` if the value was stored, even when it equals the
    /// previous one.
    pub fn apply(&mut self, key: &str, value: Value) -> bool {
        if !AttrKind::of(key).accepts(&value) {
            return false;
        }
        self.values.insert(key.to_string(), value);
        true
    }

    /// Returns `true` if the attribute has been reported.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Raw stored value.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Boolean attribute.
    #[must_use]
    pub fn bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    /// Integer attribute.
    #[must_use]
    pub fn int(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(Value::as_i64)
    }

    /// String attribute.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Reported symbols, in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of reported attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copies the snapshot out as a JSON object.
    #[must_use]
    pub fn to_map(&self) -> Map<String, Value> {
        self.values.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_state_is_empty() {
        let state = DeviceState::new();
        assert!(state.is_empty());
        assert!(!state.contains("poweron"));
        assert!(state.bool("poweron").is_none());
    }

    #[test]
    fn type_guard_keeps_previous_value() {
        let mut state = DeviceState::new();
        assert!(state.apply("poweron", json!(true)));
        assert!(!state.apply("poweron", json!(0)));
        assert_eq!(state.bool("poweron"), Some(true));
    }

    #[test]
    fn reapplying_same_value_is_accepted() {
        let mut state = DeviceState::new();
        assert!(state.apply("windlevel", json!(3)));
        assert!(state.apply("windlevel", json!(3)));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn opaque_values_are_kept_verbatim() {
        let mut state = DeviceState::new();
        assert!(state.apply("ctlstatus", json!("busy")));
        assert!(state.apply("cooldown", json!(12)));
        assert_eq!(state.raw("ctlstatus"), Some(&json!("busy")));
        assert_eq!(state.int("cooldown"), Some(12));
    }

    #[test]
    fn mode_keeps_its_wire_form() {
        let mut state = DeviceState::new();
        state.apply("mode", json!("hotair"));
        assert_eq!(state.text("mode"), Some("hotair"));
        assert!(state.int("mode").is_none());
    }

    #[test]
    fn keys_preserve_report_order() {
        let mut state = DeviceState::new();
        state.apply("windlevel", json!(1));
        state.apply("poweron", json!(true));
        assert_eq!(state.keys().collect::<Vec<_>>(), vec!["windlevel", "poweron"]);
    }
}
