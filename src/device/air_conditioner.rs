// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Portable air conditioners.
//!
//! The `mode` attribute keeps the raw vendor code (cool 1, dry 2, fan 3,
//! sleep 4, eco 5). Hosts see it as an [`HvacMode`] plus an [`AcPreset`].
//! The setpoint always travels in Fahrenheit; a Celsius host goes through
//! the discrete 16–30 °C table. While the sleep profile is active the
//! setpoint is written as an offset from the temperature captured when
//! sleep was selected.

use serde_json::Value;

use super::binding::{Binding, Check, Declare, Limit, Property};
use super::Device;
use crate::error::{Error, ValueError};
use crate::state::keys;
use crate::types::{
    AcMode, AcPreset, CELSIUS_SETPOINT_MAX, CELSIUS_SETPOINT_MIN, HvacMode, IntRange, LevelNames,
    Oscillation, TemperatureUnit, celsius_to_fahrenheit, fahrenheit_to_celsius,
};

/// `oscmode` value while swinging.
const SWING_ON: i64 = 2;
/// `oscmode` value while still.
const SWING_OFF: i64 = 0;

pub(crate) const BINDINGS: &[Binding] = &[
    Binding::new(Property::Power, &[keys::POWER_ON], Check::Bool).declared(Declare::Always),
    Binding::new(Property::FanSpeed, &[keys::WIND_LEVEL], Check::Range(Limit::Speed))
        .declared(Declare::WithRange),
    Binding::new(Property::Mode, &[keys::MODE], Check::Custom).declared(Declare::Always),
    Binding::new(
        Property::TargetTemperature,
        &[keys::TEMP_LEVEL],
        Check::Range(Limit::TargetTemperature),
    )
    .declared(Declare::WithRange),
    Binding::new(
        Property::SleepTemperatureOffset,
        &[keys::SLEEP_TEMP_OFFSET],
        Check::Custom,
    )
    .declared(Declare::Always),
    Binding::new(Property::OscillationMode, &[keys::OSC_MODE], Check::Custom)
        .declared(Declare::WithOscillation(Oscillation::Horizontal)),
    Binding::read_only(Property::Temperature, &[keys::TEMPERATURE]),
    Binding::read_only(Property::Humidity, &[keys::RH]),
    Binding::new(Property::ChildLock, &[keys::CHILD_LOCK_ON], Check::Bool),
    Binding::new(Property::Mute, &[keys::MUTE_ON], Check::Bool),
    Binding::new(Property::DisplayOn, &[keys::LED_ALWAYS_ON], Check::Bool),
];

impl Device {
    // ========== Mode ==========

    /// Raw vendor mode.
    #[must_use]
    pub fn ac_mode(&self) -> Option<AcMode> {
        self.read_int(Property::Mode).and_then(AcMode::from_code)
    }

    /// Host-facing HVAC mode; [`HvacMode::Off`] whenever power is off.
    #[must_use]
    pub fn hvac_mode(&self) -> Option<HvacMode> {
        if self.is_on() == Some(false) {
            return Some(HvacMode::Off);
        }
        self.ac_mode().map(|m| m.hvac())
    }

    /// HVAC modes the model offers.
    #[must_use]
    pub fn hvac_modes(&self) -> &[HvacMode] {
        &self.spec.hvac_modes
    }

    /// Selects an HVAC mode.
    ///
    /// `Off` powers down. Other modes power up first if needed. Selecting
    /// `Cool` while a sleep or eco profile is active keeps the profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the device is not an air conditioner.
    pub fn set_hvac_mode(&self, mode: HvacMode) -> Result<(), Error> {
        let code = match mode {
            HvacMode::Off => return self.set_power(false),
            HvacMode::Cool => match self.ac_mode() {
                Some(current @ (AcMode::Cool | AcMode::Sleep | AcMode::Eco)) => current,
                _ => AcMode::Cool,
            },
            HvacMode::Dry => AcMode::Dry,
            HvacMode::FanOnly => AcMode::Fan,
        };
        self.require(Property::Mode)?;
        if self.is_on() == Some(false) {
            self.write_bool(Property::Power, true)?;
        }
        self.write_value(Property::Mode, Value::from(code.code()))
    }

    // ========== Preset ==========

    /// Active cooling profile.
    #[must_use]
    pub fn ac_preset(&self) -> Option<AcPreset> {
        self.ac_mode().map(|m| m.preset())
    }

    /// Selects a cooling profile; this also switches the unit to cooling.
    ///
    /// Selecting [`AcPreset::Sleep`] captures the current setpoint, which
    /// later setpoint changes are written relative to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the device is not an air conditioner.
    pub fn set_ac_preset(&self, preset: AcPreset) -> Result<(), Error> {
        let mode = match preset {
            AcPreset::None => AcMode::Cool,
            AcPreset::Sleep => AcMode::Sleep,
            AcPreset::Eco => AcMode::Eco,
        };
        self.require(Property::Mode)?;
        let initial = if preset == AcPreset::Sleep {
            self.read_int(Property::TargetTemperature)
        } else {
            None
        };
        self.slots.lock().sleep_initial_temperature = initial;
        self.write_value(Property::Mode, Value::from(mode.code()))
    }

    /// Setpoint captured when the sleep profile was selected, in Fahrenheit.
    #[must_use]
    pub fn sleep_initial_temperature(&self) -> Option<i64> {
        self.slots.lock().sleep_initial_temperature
    }

    // ========== Fan Mode ==========

    /// Fan mode name (`low`, `medium`, `high`, `auto`).
    #[must_use]
    pub fn fan_mode(&self) -> Option<&'static str> {
        self.read_int(Property::FanSpeed)
            .and_then(|level| LevelNames::AC_FAN.name(level))
    }

    /// Fan mode names in level order.
    #[must_use]
    pub fn fan_modes(&self) -> &'static [&'static str] {
        LevelNames::AC_FAN.names()
    }

    /// Selects a fan mode by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] for unknown names.
    pub fn set_fan_mode(&self, name: &str) -> Result<(), Error> {
        let level = LevelNames::AC_FAN.level(name)?;
        self.write_int(Property::FanSpeed, level)
    }

    // ========== Setpoint ==========

    /// Setpoint in the effective host unit.
    #[must_use]
    pub fn target_temperature(&self) -> Option<i64> {
        let fahrenheit = self.read_int(Property::TargetTemperature)?;
        Some(match self.effective_unit() {
            TemperatureUnit::Celsius => fahrenheit_to_celsius(fahrenheit),
            TemperatureUnit::Fahrenheit => fahrenheit,
        })
    }

    /// Setpoint range in the effective host unit.
    #[must_use]
    pub fn target_temperature_range(&self) -> Option<IntRange> {
        let range = self.range_of(Property::TargetTemperature)?;
        Some(match self.effective_unit() {
            TemperatureUnit::Celsius => IntRange::new(CELSIUS_SETPOINT_MIN, CELSIUS_SETPOINT_MAX),
            TemperatureUnit::Fahrenheit => range,
        })
    }

    /// Sets the setpoint, given in the effective host unit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] outside the setpoint range.
    pub fn set_target_temperature(&self, value: i64) -> Result<(), Error> {
        let fahrenheit = match self.effective_unit() {
            TemperatureUnit::Celsius => celsius_to_fahrenheit(value)?,
            TemperatureUnit::Fahrenheit => value,
        };
        if let Some(range) = self.range_of(Property::TargetTemperature) {
            range.check(fahrenheit)?;
        }

        if self.ac_mode() == Some(AcMode::Sleep) {
            let base = self
                .sleep_initial_temperature()
                .or_else(|| self.read_int(Property::TargetTemperature));
            if let Some(base) = base {
                let offset = fahrenheit.checked_sub(base).ok_or_else(|| {
                    ValueError::InvalidConfiguration(format!(
                        "sleep base {base} is out of range"
                    ))
                })?;
                return self.write_value(Property::SleepTemperatureOffset, Value::from(offset));
            }
        }
        self.write_value(Property::TargetTemperature, Value::from(fahrenheit))
    }

    // ========== Swing ==========

    /// Louver swing.
    #[must_use]
    pub fn swing(&self) -> Option<bool> {
        self.read_int(Property::OscillationMode)
            .map(|mode| mode != SWING_OFF)
    }

    /// Swing mode names.
    #[must_use]
    pub fn swing_modes(&self) -> &[String] {
        &self.spec.swing_modes
    }

    /// Starts or stops the louver swing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the device cannot swing.
    pub fn set_swing(&self, on: bool) -> Result<(), Error> {
        let mode = if on { SWING_ON } else { SWING_OFF };
        self.write_value(Property::OscillationMode, Value::from(mode))
    }
}
