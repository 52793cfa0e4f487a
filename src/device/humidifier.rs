// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Humidifiers.

use serde_json::Value;

use super::binding::{Binding, Check, Declare, Limit, Property};
use super::Device;
use crate::error::Error;
use crate::state::keys;
use crate::types::{IntRange, RgbThreshold};

pub(crate) const BINDINGS: &[Binding] = &[
    Binding::new(Property::Power, &[keys::POWER_ON], Check::Bool).declared(Declare::Always),
    Binding::new(Property::Preset, &[keys::MODE], Check::Preset).declared(Declare::WithPresets),
    Binding::read_only(Property::Humidity, &[keys::RH]),
    Binding::new(
        Property::TargetHumidity,
        &[keys::RH_AUTO_LEVEL],
        Check::Range(Limit::Humidity),
    )
    .declared(Declare::WithRange),
    Binding::read_only(Property::WaterLevel, &[keys::WATER_LEVEL]),
    Binding::read_only(Property::WorkTime, &[keys::WORK_TIME]),
    Binding::read_only(Property::FilterLife, &[keys::FILTER_TIME]),
    Binding::read_only(Property::TemperatureOffset, &[keys::TEMP_OFFSET]),
    Binding::new(Property::RgbThreshold, &[keys::RGB_THRESHOLD], Check::Custom),
    Binding::new(Property::Mute, &[keys::MUTE_ON], Check::Bool),
    Binding::new(Property::AtmosphereLight, &[keys::ATM_ON], Check::Bool),
    Binding::new(
        Property::AtmosphereColor,
        &[keys::ATM_COLOR],
        Check::Range(Limit::Fixed(IntRange::new(1, 7))),
    ),
    Binding::new(
        Property::AtmosphereBrightness,
        &[keys::ATM_BRI],
        Check::Range(Limit::Fixed(IntRange::new(1, 5))),
    ),
];

impl Device {
    /// Humidity band that drives the ambient light color.
    #[must_use]
    pub fn rgb_threshold(&self) -> Option<RgbThreshold> {
        let text = self.read_text(Property::RgbThreshold)?;
        match text.parse() {
            Ok(threshold) => Some(threshold),
            Err(e) => {
                tracing::warn!(serial = %self.serial_number(), raw = %text, error = %e, "unreadable RGB threshold");
                None
            }
        }
    }

    /// Sets the humidity band that drives the ambient light color.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] if a bound is outside the humidity range or
    /// `low` is not below `high`.
    pub fn set_rgb_threshold(&self, low: i64, high: i64) -> Result<(), Error> {
        let limits = self.humidity_range().unwrap_or(IntRange::new(0, 100));
        let threshold = RgbThreshold::new(low, high, limits)?;
        self.write_value(Property::RgbThreshold, Value::String(threshold.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{Map, Value, json};

    use crate::codec::DeviceRecord;
    use crate::device::Device;
    use crate::error::{Error, ValueError};
    use crate::registry::catalog;
    use crate::transport::RecordingSender;
    use crate::types::RgbThreshold;

    fn humidifier(state: Value) -> (Device, Arc<RecordingSender>) {
        let sender = Arc::new(RecordingSender::new());
        let spec = catalog::lookup("DR-HHM001S").unwrap().clone();
        let device = Device::new(DeviceRecord::new("HM1", "2", "DR-HHM001S"), spec, sender.clone());
        device.apply_state(&object(state));
        (device, sender)
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn threshold_round_trip_through_state() {
        let (device, sender) = humidifier(json!({"rgbth": "40,60"}));
        assert_eq!(device.rgb_threshold(), Some(RgbThreshold { low: 40, high: 60 }));

        device.set_rgb_threshold(35, 70).unwrap();
        assert_eq!(sender.sent()[0].1, object(json!({"rgbth": "35,70"})));
        assert_eq!(device.rgb_threshold(), Some(RgbThreshold { low: 35, high: 70 }));
    }

    #[test]
    fn threshold_validated_against_humidity_range() {
        let (device, sender) = humidifier(json!({"rgbth": "40,60"}));
        assert!(matches!(
            device.set_rgb_threshold(20, 60),
            Err(Error::Value(ValueError::OutOfRange { .. }))
        ));
        assert!(matches!(
            device.set_rgb_threshold(60, 40),
            Err(Error::Value(ValueError::InvalidConfiguration(_)))
        ));
        assert!(sender.sent().is_empty());
    }

    #[test]
    fn presets_start_at_zero() {
        let (device, sender) = humidifier(json!({"mode": 0}));
        assert_eq!(device.preset_mode().as_deref(), Some("manual"));
        device.set_preset_mode("sleep").unwrap();
        assert_eq!(sender.sent()[0].1, object(json!({"mode": 2})));
    }

    #[test]
    fn target_humidity_uses_rhautolevel() {
        let (device, sender) = humidifier(json!({"rh": 45}));
        device.set_target_humidity(90).unwrap();
        assert!(device.set_target_humidity(91).is_err());
        assert_eq!(sender.sent()[0].1, object(json!({"rhautolevel": 90})));
        assert_eq!(device.humidity(), Some(45));
    }
}
