// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dehumidifiers.
//!
//! Fan speeds 1–3 are named `low`/`medium`/`high`; modes 1–2 are
//! `auto`/`continuous`.

use serde_json::Value;

use super::binding::{Binding, Check, Declare, Limit, Property};
use super::Device;
use crate::error::Error;
use crate::state::keys;
use crate::types::LevelNames;

pub(crate) const BINDINGS: &[Binding] = &[
    Binding::new(Property::Power, &[keys::POWER_ON], Check::Bool).declared(Declare::Always),
    Binding::new(Property::FanSpeed, &[keys::WIND_LEVEL], Check::Range(Limit::Speed))
        .declared(Declare::WithRange),
    Binding::new(Property::Mode, &[keys::MODE], Check::Custom).declared(Declare::Always),
    Binding::new(
        Property::TargetHumidity,
        &[keys::RH_AUTO_LEVEL],
        Check::Range(Limit::Humidity),
    )
    .declared(Declare::WithRange),
    Binding::read_only(Property::Humidity, &[keys::RH]),
    Binding::read_only(Property::WaterLevel, &[keys::WATER_LEVEL]),
    Binding::new(Property::ChildLock, &[keys::CHILD_LOCK_ON], Check::Bool),
];

impl Device {
    /// Named fan speed.
    #[must_use]
    pub fn dehumidifier_fan_speed(&self) -> Option<&'static str> {
        self.read_int(Property::FanSpeed)
            .and_then(|level| LevelNames::DEHUMIDIFIER_FAN.name(level))
    }

    /// Selects a named fan speed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] for unknown names.
    pub fn set_dehumidifier_fan_speed(&self, name: &str) -> Result<(), Error> {
        let level = LevelNames::DEHUMIDIFIER_FAN.level(name)?;
        self.write_int(Property::FanSpeed, level)
    }

    /// Named operating mode.
    #[must_use]
    pub fn dehumidifier_mode(&self) -> Option<&'static str> {
        self.read_int(Property::Mode)
            .and_then(|code| LevelNames::DEHUMIDIFIER_MODE.name(code))
    }

    /// Selects a named operating mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] for unknown names.
    pub fn set_dehumidifier_mode(&self, name: &str) -> Result<(), Error> {
        let code = LevelNames::DEHUMIDIFIER_MODE.level(name)?;
        self.write_value(Property::Mode, Value::from(code))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{Map, Value, json};

    use crate::codec::DeviceRecord;
    use crate::device::Device;
    use crate::registry::catalog;
    use crate::transport::RecordingSender;
    use crate::types::WaterLevel;

    fn dehumidifier(state: Value) -> (Device, Arc<RecordingSender>) {
        let sender = Arc::new(RecordingSender::new());
        let spec = catalog::lookup("DR-HDH002S").unwrap().clone();
        let device = Device::new(DeviceRecord::new("DH1", "4", "DR-HDH002S"), spec, sender.clone());
        device.apply_state(&object(state));
        (device, sender)
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn named_fan_speeds() {
        let (device, sender) = dehumidifier(json!({"windlevel": 3}));
        assert_eq!(device.dehumidifier_fan_speed(), Some("high"));
        device.set_dehumidifier_fan_speed("low").unwrap();
        assert_eq!(sender.sent()[0].1, object(json!({"windlevel": 1})));
        assert!(device.set_dehumidifier_fan_speed("turbo").is_err());
        assert_eq!(sender.sent().len(), 1);
    }

    #[test]
    fn named_modes() {
        let (device, sender) = dehumidifier(json!({"mode": 1}));
        assert_eq!(device.dehumidifier_mode(), Some("auto"));
        device.set_dehumidifier_mode("Continuous").unwrap();
        assert_eq!(sender.sent()[0].1, object(json!({"mode": 2})));
        assert_eq!(device.dehumidifier_mode(), Some("continuous"));
    }

    #[test]
    fn tank_status() {
        let (device, _) = dehumidifier(json!({"wrong": 0}));
        assert_eq!(device.water_level(), Some(WaterLevel::Ok));
    }
}
