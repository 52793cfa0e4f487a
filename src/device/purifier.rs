// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Air purifiers.

use super::binding::{Binding, Check, Declare, Limit, Property};
use super::Device;
use crate::error::Error;
use crate::state::keys;

pub(crate) const BINDINGS: &[Binding] = &[
    Binding::new(Property::Power, &[keys::POWER_ON], Check::Bool).declared(Declare::Always),
    Binding::new(Property::FanSpeed, &[keys::WIND_LEVEL], Check::Range(Limit::Speed))
        .declared(Declare::WithRange),
    Binding::new(
        Property::Preset,
        &[keys::WIND_MODE, keys::MODE],
        Check::Preset,
    )
    .declared(Declare::WithPresets),
    Binding::new(Property::DisplayAutoOff, &[keys::DISPLAY_AUTO_OFF], Check::Bool),
    Binding::new(Property::LightSensor, &[keys::LIGHT_SENSOR_ON], Check::Bool),
    Binding::new(Property::Mute, &[keys::MUTE_ON], Check::Bool),
    Binding::new(Property::ChildLock, &[keys::CHILD_LOCK_ON], Check::Bool),
    Binding::read_only(Property::Pm25, &[keys::PM25]),
    Binding::read_only(Property::FilterLife, &[keys::FILTER_TIME]),
];

impl Device {
    /// Display switches itself off after a while.
    #[must_use]
    pub fn display_auto_off(&self) -> Option<bool> {
        self.read_bool(Property::DisplayAutoOff)
    }

    /// Enables or disables display auto-off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the device has no such switch.
    pub fn set_display_auto_off(&self, on: bool) -> Result<(), Error> {
        self.write_bool(Property::DisplayAutoOff, on)
    }

    /// Adaptive display brightness.
    #[must_use]
    pub fn light_sensor(&self) -> Option<bool> {
        self.read_bool(Property::LightSensor)
    }

    /// Enables or disables adaptive display brightness.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the device has no light sensor.
    pub fn set_light_sensor(&self, on: bool) -> Result<(), Error> {
        self.write_bool(Property::LightSensor, on)
    }

    /// Panel sound enabled; the inverse of [`is_muted`](Self::is_muted).
    #[must_use]
    pub fn panel_sound(&self) -> Option<bool> {
        self.is_muted().map(|muted| !muted)
    }

    /// Enables or disables panel sound.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the device has no mute attribute.
    pub fn set_panel_sound(&self, on: bool) -> Result<(), Error> {
        self.set_mute(!on)
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

    fn purifier(state: Value) -> (Device, Arc<RecordingSender>) {
        let sender = Arc::new(RecordingSender::new());
        let spec = catalog::lookup("DR-HAP003S").unwrap().clone();
        let device = Device::new(DeviceRecord::new("AP1", "8", "DR-HAP003S"), spec, sender.clone());
        device.apply_state(&object(state));
        (device, sender)
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn panel_sound_is_inverted_mute() {
        let (device, sender) = purifier(json!({"muteon": true}));
        assert_eq!(device.panel_sound(), Some(false));
        device.set_panel_sound(true).unwrap();
        assert_eq!(sender.sent()[0].1, object(json!({"muteon": false})));
        assert_eq!(device.panel_sound(), Some(true));
    }

    #[test]
    fn display_switches() {
        let (device, sender) = purifier(json!({"displayautooff": false, "lightsensoron": true}));
        device.set_display_auto_off(true).unwrap();
        device.set_light_sensor(false).unwrap();
        assert_eq!(device.display_auto_off(), Some(true));
        assert_eq!(device.light_sensor(), Some(false));
        assert_eq!(sender.sent().len(), 2);
    }

    #[test]
    fn unreported_switch_is_unsupported() {
        let (device, sender) = purifier(json!({}));
        assert!(device.set_display_auto_off(true).is_err());
        assert!(sender.sent().is_empty());
    }

    #[test]
    fn preset_uses_windmode() {
        let (device, sender) = purifier(json!({}));
        device.set_preset_mode("turbo").unwrap();
        assert_eq!(sender.sent()[0].1, object(json!({"windmode": 4})));
    }
}
