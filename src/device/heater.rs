// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Space heaters.
//!
//! The heater mode travels as a string (`off`, `coolair`, `hotair`, `eco`).
//! Power off forces the observed mode to [`HeaterMode::Off`]; power on
//! restores the last non-off mode kept in the device's slot.

use serde_json::Value;

use super::binding::{Binding, Check, Declare, Limit, Property};
use super::Device;
use crate::error::Error;
use crate::state::keys;
use crate::types::{HeaterMode, Oscillation};

pub(crate) const BINDINGS: &[Binding] = &[
    Binding::new(Property::Power, &[keys::POWER_ON], Check::Bool).declared(Declare::Always),
    Binding::new(Property::Mode, &[keys::MODE], Check::Custom).declared(Declare::Always),
    Binding::new(
        Property::HeatLevel,
        &[keys::HTA_LEVEL],
        Check::Range(Limit::HeatLevel),
    )
    .declared(Declare::WithRange),
    Binding::new(Property::EcoLevel, &[keys::ECO_LEVEL], Check::Range(Limit::EcoLevel))
        .declared(Declare::WithRange),
    Binding::new(Property::HorizontalOscillation, &[keys::OSC_ON], Check::Bool)
        .declared(Declare::WithOscillation(Oscillation::Horizontal)),
    Binding::new(
        Property::OscillationAngle,
        &[keys::OSC_ANGLE],
        Check::Range(Limit::HorizontalAngle),
    ),
    Binding::read_only(Property::Temperature, &[keys::TEMPERATURE]),
    Binding::new(Property::ChildLock, &[keys::CHILD_LOCK_ON], Check::Bool),
    Binding::new(Property::Mute, &[keys::MUTE_ON], Check::Bool),
    Binding::new(Property::DisplayOn, &[keys::LED_ALWAYS_ON], Check::Bool),
    Binding::read_only(Property::TemperatureOffset, &[keys::TEMP_OFFSET]),
];

impl Device {
    // ========== Mode ==========

    /// Current heater mode; [`HeaterMode::Off`] whenever power is off.
    #[must_use]
    pub fn heater_mode(&self) -> Option<HeaterMode> {
        if self.is_on() == Some(false) {
            return Some(HeaterMode::Off);
        }
        let text = self.read_text(Property::Mode)?;
        match text.parse() {
            Ok(mode) => Some(mode),
            Err(e) => {
                tracing::debug!(serial = %self.serial_number(), raw = %text, error = %e, "unknown heater mode");
                None
            }
        }
    }

    /// Selects a heater mode.
    ///
    /// [`HeaterMode::Off`] powers the heater down. Any other mode powers it
    /// up first if needed, is written as a string and becomes the mode
    /// restored on the next power-on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the device is not a heater.
    pub fn set_heater_mode(&self, mode: HeaterMode) -> Result<(), Error> {
        if mode == HeaterMode::Off {
            return self.set_power(false);
        }
        self.require(Property::Mode)?;
        if self.is_on() == Some(false) {
            self.write_bool(Property::Power, true)?;
        }
        self.slots.lock().last_heater_mode = Some(mode);
        self.write_value(Property::Mode, Value::from(mode.as_str()))
    }

    /// Mode restored on the next power-on.
    #[must_use]
    pub fn last_heater_mode(&self) -> Option<HeaterMode> {
        self.slots.lock().last_heater_mode
    }

    /// Stores the mode restored on the next power-on. `Off` clears it.
    pub fn set_last_heater_mode(&self, mode: Option<HeaterMode>) {
        self.slots.lock().last_heater_mode = mode.filter(|m| *m != HeaterMode::Off);
    }

    /// Resends the remembered mode after power comes back on.
    pub(super) fn restore_heater_mode(&self) -> Result<(), Error> {
        let Some(mode) = self.last_heater_mode() else {
            return Ok(());
        };
        tracing::debug!(serial = %self.serial_number(), mode = %mode, "restoring heater mode");
        self.write_value(Property::Mode, Value::from(mode.as_str()))
    }

    // ========== Levels ==========

    /// Heat level.
    #[must_use]
    pub fn heat_level(&self) -> Option<i64> {
        self.read_int(Property::HeatLevel)
    }

    /// Sets the heat level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] outside the model's heat range.
    pub fn set_heat_level(&self, level: i64) -> Result<(), Error> {
        self.write_int(Property::HeatLevel, level)
    }

    /// Eco level, the target temperature used in eco mode.
    #[must_use]
    pub fn eco_level(&self) -> Option<i64> {
        self.read_int(Property::EcoLevel)
    }

    /// Sets the eco level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] outside the model's eco range.
    pub fn set_eco_level(&self, level: i64) -> Result<(), Error> {
        self.write_int(Property::EcoLevel, level)
    }

    // ========== Oscillation Angle ==========

    /// Heater oscillation angle.
    #[must_use]
    pub fn oscillation_angle(&self) -> Option<i64> {
        self.read_int(Property::OscillationAngle)
    }

    /// Sets the heater oscillation angle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] outside the model's angle range.
    pub fn set_oscillation_angle(&self, angle: i64) -> Result<(), Error> {
        self.write_int(Property::OscillationAngle, angle)
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
    use crate::types::HeaterMode;

    fn heater(state: Value) -> (Device, Arc<RecordingSender>) {
        let sender = Arc::new(RecordingSender::new());
        let spec = catalog::lookup("DR-HSH004S").unwrap().clone();
        let device = Device::new(DeviceRecord::new("HT1", "7", "DR-HSH004S"), spec, sender.clone());
        device.apply_state(&object(state));
        (device, sender)
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn power_off_forces_off_mode() {
        let (device, _) = heater(json!({"poweron": false, "mode": "hotair"}));
        assert_eq!(device.heater_mode(), Some(HeaterMode::Off));

        device.apply_delta(&object(json!({"poweron": true})));
        assert_eq!(device.heater_mode(), Some(HeaterMode::HotAir));
    }

    #[test]
    fn selecting_mode_powers_on_and_remembers() {
        let (device, sender) = heater(json!({"poweron": false, "mode": "coolair"}));
        device.set_heater_mode(HeaterMode::Eco).unwrap();

        let sent: Vec<_> = sender.sent().into_iter().map(|(_, p)| p).collect();
        assert_eq!(
            sent,
            vec![object(json!({"poweron": true})), object(json!({"mode": "eco"}))]
        );
        assert_eq!(device.last_heater_mode(), Some(HeaterMode::Eco));
        assert_eq!(device.heater_mode(), Some(HeaterMode::Eco));
    }

    #[test]
    fn off_mode_powers_down_only() {
        let (device, sender) = heater(json!({"poweron": true, "mode": "hotair"}));
        device.set_heater_mode(HeaterMode::Off).unwrap();
        assert_eq!(sender.sent().len(), 1);
        assert_eq!(sender.sent()[0].1, object(json!({"poweron": false})));
    }

    #[test]
    fn power_on_restores_last_mode() {
        let (device, sender) = heater(json!({"poweron": false, "mode": "coolair"}));
        device.set_last_heater_mode(Some(HeaterMode::HotAir));
        device.turn_on().unwrap();

        let sent: Vec<_> = sender.sent().into_iter().map(|(_, p)| p).collect();
        assert_eq!(
            sent,
            vec![object(json!({"poweron": true})), object(json!({"mode": "hotair"}))]
        );
    }

    #[test]
    fn power_on_without_slot_sends_power_only() {
        let (device, sender) = heater(json!({"poweron": false}));
        device.set_last_heater_mode(Some(HeaterMode::Off));
        device.turn_on().unwrap();
        assert_eq!(sender.sent().len(), 1);
    }

    #[test]
    fn level_ranges() {
        let (device, sender) = heater(json!({}));
        device.set_heat_level(3).unwrap();
        assert!(device.set_heat_level(4).is_err());
        device.set_eco_level(41).unwrap();
        assert!(device.set_eco_level(40).is_err());
        assert_eq!(sender.sent().len(), 2);
        assert_eq!(device.heat_level(), Some(3));
    }

    #[test]
    fn oscillation_uses_oscon() {
        let (device, sender) = heater(json!({"oscon": false, "oscangle": 60}));
        device.set_oscillating(true).unwrap();
        device.set_oscillation_angle(120).unwrap();
        assert!(device.set_oscillation_angle(121).is_err());
        let sent: Vec<_> = sender.sent().into_iter().map(|(_, p)| p).collect();
        assert_eq!(
            sent,
            vec![object(json!({"oscon": true})), object(json!({"oscangle": 120}))]
        );
    }

    #[test]
    fn opaque_attributes_are_kept() {
        let (device, _) = heater(json!({"ptcon": {"state": 1}}));
        assert_eq!(device.raw("ptcon"), Some(json!(1)));
    }
}
