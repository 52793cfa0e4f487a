// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability discovery from the firmware's `controlsConf` descriptor.
//!
//! Used for models that are missing from the catalog. The descriptor looks
//! like:
//!
//! ```json
//! {
//!   "control": [
//!     {"type": "Speed", "items": [{"value": 1}, {"value": 9}]},
//!     {"type": "Mode", "items": [{"text": "Normal", "value": 1}]}
//!   ],
//!   "schedule": {"modes": [{"text": "Sleep", "value": 3}]},
//!   "swingAngle": {"fixedAngle": {
//!     "horizontal": {"Angle": 120, "ZeroAngle": 60},
//!     "vertical": {"Angle": 90, "ZeroAngle": 0}
//!   }}
//! }
//! ```

use serde_json::Value;

use super::catalog::{DeviceFamily, ModelSpec};
use crate::types::{IntRange, Oscillation, PresetList, PresetMode};

/// Control item types that carry preset modes.
const PRESET_CONTROL_TYPES: [&str; 2] = ["Mode", "CFFan"];

fn int_of(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn controls(conf: &Value) -> impl Iterator<Item = &Value> {
    conf.get("control")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn items(control: &Value) -> &[Value] {
    control
        .get("items")
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}

fn preset_of(item: &Value) -> Option<PresetMode> {
    let code = item.get("value").and_then(int_of)?;
    let name = item
        .get("text")
        .or_else(|| item.get("title"))
        .and_then(Value::as_str)?;
    Some(PresetMode::new(name, code))
}

/// Speed range from the first `Speed` control's two items.
#[must_use]
pub fn speed_range(conf: &Value) -> Option<IntRange> {
    let control = controls(conf).find(|c| c.get("type").and_then(Value::as_str) == Some("Speed"))?;
    match items(control) {
        [low, high, ..] => {
            let lo = low.get("value").and_then(int_of)?;
            let hi = high.get("value").and_then(int_of)?;
            Some(IntRange::new(lo, hi))
        }
        _ => None,
    }
}

/// Preset modes from `Mode`/`CFFan` controls and `schedule.modes`,
/// deduplicated by code and sorted by code.
#[must_use]
pub fn presets(conf: &Value) -> PresetList {
    let from_controls = controls(conf)
        .filter(|c| {
            c.get("type")
                .and_then(Value::as_str)
                .is_some_and(|t| PRESET_CONTROL_TYPES.contains(&t))
        })
        .flat_map(items)
        .filter_map(preset_of);
    let from_schedule = conf
        .pointer("/schedule/modes")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(preset_of);
    PresetList::normalized(from_controls.chain(from_schedule))
}

/// `[-zero, angle - zero]` for one axis of `swingAngle.fixedAngle`.
#[must_use]
pub fn angle_range(conf: &Value, axis: &str) -> Option<IntRange> {
    let entry = conf.pointer(&format!("/swingAngle/fixedAngle/{axis}"))?;
    let angle = entry.get("Angle").and_then(int_of)?;
    let zero = entry.get("ZeroAngle").and_then(int_of)?;
    Some(IntRange::new(zero.checked_neg()?, angle.checked_sub(zero)?))
}

/// Builds a capability descriptor from `controlsConf`.
///
/// Returns `None` when the descriptor yields no speed range, no presets and
/// no oscillation ranges. A model whose family cannot be inferred from its
/// name but which does carry hints is treated as a tower fan, the most
/// common shape for such descriptors.
#[must_use]
pub fn discover(model: &str, conf: Option<&Value>) -> Option<ModelSpec> {
    let conf = conf?;
    let speed = speed_range(conf);
    let presets = presets(conf);
    let horizontal = angle_range(conf, "horizontal");
    let vertical = angle_range(conf, "vertical");

    if speed.is_none() && presets.is_empty() && horizontal.is_none() && vertical.is_none() {
        return None;
    }

    let family = match DeviceFamily::from_model(model) {
        DeviceFamily::Unknown => DeviceFamily::TowerFan,
        family => family,
    };
    let oscillation = match (horizontal, vertical) {
        (_, Some(_)) => Oscillation::Both,
        (Some(_), None) => Oscillation::Horizontal,
        (None, None) => Oscillation::None,
    };

    let mut spec = ModelSpec::new(family).with_oscillation(oscillation);
    spec.speed_range = speed;
    spec.presets = presets;
    spec.horizontal_angle_range = horizontal;
    spec.vertical_angle_range = vertical;
    Some(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn conf() -> Value {
        json!({
            "control": [
                {"type": "Power"},
                {"type": "Speed", "items": [{"value": 1}, {"value": "9"}]},
                {"type": "Speed", "items": [{"value": 2}, {"value": 4}]},
                {"type": "Mode", "items": [
                    {"text": "Sleep", "value": 3},
                    {"text": "Normal", "value": 1}
                ]},
                {"type": "CFFan", "items": [{"title": "Reverse", "value": 5}]}
            ],
            "schedule": {"modes": [
                {"text": "Auto", "value": 4},
                {"text": "Duplicate", "value": 1}
            ]},
            "swingAngle": {"fixedAngle": {
                "horizontal": {"Angle": 120, "ZeroAngle": 60},
                "vertical": {"Angle": 90, "ZeroAngle": 0}
            }}
        })
    }

    #[test]
    fn speed_from_first_speed_control() {
        assert_eq!(speed_range(&conf()), Some(IntRange::new(1, 9)));
    }

    #[test]
    fn presets_are_merged_deduplicated_and_sorted() {
        let list = presets(&conf());
        assert_eq!(list.names(), vec!["normal", "sleep", "auto", "reverse"]);
        assert_eq!(list.code_of("reverse").unwrap(), 5);
    }

    #[test]
    fn angle_interval_is_shifted_by_zero() {
        assert_eq!(angle_range(&conf(), "horizontal"), Some(IntRange::new(-60, 60)));
        assert_eq!(angle_range(&conf(), "vertical"), Some(IntRange::new(0, 90)));
    }

    #[test]
    fn unrepresentable_angles_are_ignored() {
        let conf = json!({"swingAngle": {"fixedAngle": {
            "horizontal": {"Angle": i64::MAX, "ZeroAngle": -1},
            "vertical": {"Angle": 90, "ZeroAngle": i64::MIN},
        }}});
        assert_eq!(angle_range(&conf, "horizontal"), None);
        assert_eq!(angle_range(&conf, "vertical"), None);
    }

    #[test]
    fn discover_unknown_model_with_hints() {
        let spec = discover("DR-ZZZ100S", Some(&conf())).unwrap();
        assert_eq!(spec.family, DeviceFamily::TowerFan);
        assert_eq!(spec.oscillation, Oscillation::Both);
        assert_eq!(spec.speed_range, Some(IntRange::new(1, 9)));
    }

    #[test]
    fn discover_keeps_inferred_family() {
        let spec = discover("DR-HAF099S", Some(&conf())).unwrap();
        assert_eq!(spec.family, DeviceFamily::AirCirculator);
    }

    #[test]
    fn discover_without_hints() {
        assert!(discover("DR-ZZZ100S", Some(&json!({"control": []}))).is_none());
        assert!(discover("DR-ZZZ100S", None).is_none());
    }
}
