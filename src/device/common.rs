// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Properties shared by several families.

use serde_json::Value;

use super::{Device, Property};
use crate::error::Error;
use crate::registry::DeviceFamily;
use crate::types::{IntRange, WaterLevel};

impl Device {
    // ========== Power ==========

    /// Power state (fan motor power on ceiling fans).
    #[must_use]
    pub fn is_on(&self) -> Option<bool> {
        self.read_bool(Property::Power)
    }

    /// Switches power.
    ///
    /// On heaters, switching on also restores the last non-off mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the family has no power attribute.
    pub fn set_power(&self, on: bool) -> Result<(), Error> {
        self.write_bool(Property::Power, on)?;
        if on && self.family() == DeviceFamily::Heater {
            self.restore_heater_mode()?;
        }
        Ok(())
    }

    /// Switches power on.
    ///
    /// # Errors
    ///
    /// See [`set_power`](Self::set_power).
    pub fn turn_on(&self) -> Result<(), Error> {
        self.set_power(true)
    }

    /// Switches power off.
    ///
    /// # Errors
    ///
    /// See [`set_power`](Self::set_power).
    pub fn turn_off(&self) -> Result<(), Error> {
        self.set_power(false)
    }

    // ========== Speed ==========

    /// Fan speed level.
    #[must_use]
    pub fn fan_speed(&self) -> Option<i64> {
        self.read_int(Property::FanSpeed)
    }

    /// Declared speed range.
    #[must_use]
    pub fn speed_range(&self) -> Option<IntRange> {
        self.range_of(Property::FanSpeed)
    }

    /// Sets the fan speed level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] outside [`speed_range`](Self::speed_range)
    /// and [`Error::Device`] if the device has no speed attribute.
    pub fn set_fan_speed(&self, speed: i64) -> Result<(), Error> {
        self.write_int(Property::FanSpeed, speed)
    }

    // ========== Preset ==========

    /// Names of the presets the model offers, in code order.
    #[must_use]
    pub fn preset_modes(&self) -> Vec<String> {
        self.spec.presets.names()
    }

    /// Current preset name, if the reported code is known.
    #[must_use]
    pub fn preset_mode(&self) -> Option<String> {
        let code = self.read_int(Property::Preset)?;
        self.spec.presets.name_of(code).map(str::to_string)
    }

    /// Selects a preset by name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] for names the model does not offer and
    /// [`Error::Device`] if the device has no preset attribute.
    pub fn set_preset_mode(&self, name: &str) -> Result<(), Error> {
        self.write_preset(Property::Preset, name)
    }

    // ========== Climate Readings ==========

    /// Measured temperature, in the unit the device reports.
    #[must_use]
    pub fn temperature(&self) -> Option<i64> {
        self.read_int(Property::Temperature)
    }

    /// Measured relative humidity.
    #[must_use]
    pub fn humidity(&self) -> Option<i64> {
        self.read_int(Property::Humidity)
    }

    /// Target relative humidity.
    #[must_use]
    pub fn target_humidity(&self) -> Option<i64> {
        self.read_int(Property::TargetHumidity)
    }

    /// Declared target humidity range.
    #[must_use]
    pub fn humidity_range(&self) -> Option<IntRange> {
        self.range_of(Property::TargetHumidity)
    }

    /// Sets the target relative humidity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] outside the declared range.
    pub fn set_target_humidity(&self, humidity: i64) -> Result<(), Error> {
        self.write_int(Property::TargetHumidity, humidity)
    }

    // ========== Panel ==========

    /// Panel sound muted.
    #[must_use]
    pub fn is_muted(&self) -> Option<bool> {
        self.read_bool(Property::Mute)
    }

    /// Mutes or unmutes the panel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the device has no mute attribute.
    pub fn set_mute(&self, muted: bool) -> Result<(), Error> {
        self.write_bool(Property::Mute, muted)
    }

    /// Child lock engaged.
    #[must_use]
    pub fn child_lock(&self) -> Option<bool> {
        self.read_bool(Property::ChildLock)
    }

    /// Engages or releases the child lock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the device has no child lock.
    pub fn set_child_lock(&self, locked: bool) -> Result<(), Error> {
        self.write_bool(Property::ChildLock, locked)
    }

    /// Display kept lit.
    #[must_use]
    pub fn display_on(&self) -> Option<bool> {
        self.read_bool(Property::DisplayOn)
    }

    /// Keeps the display lit or lets it dim.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the device has no display switch.
    pub fn set_display_on(&self, on: bool) -> Result<(), Error> {
        self.write_bool(Property::DisplayOn, on)
    }

    // ========== Atmosphere Light ==========

    /// Atmosphere light on.
    #[must_use]
    pub fn atmosphere_light(&self) -> Option<bool> {
        self.read_bool(Property::AtmosphereLight)
    }

    /// Switches the atmosphere light.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the device has no atmosphere light.
    pub fn set_atmosphere_light(&self, on: bool) -> Result<(), Error> {
        self.write_bool(Property::AtmosphereLight, on)
    }

    /// Atmosphere light color code.
    #[must_use]
    pub fn atmosphere_color(&self) -> Option<i64> {
        self.read_int(Property::AtmosphereColor)
    }

    /// Sets the atmosphere light color code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] outside the accepted codes.
    pub fn set_atmosphere_color(&self, color: i64) -> Result<(), Error> {
        self.write_int(Property::AtmosphereColor, color)
    }

    /// Atmosphere light brightness.
    #[must_use]
    pub fn atmosphere_brightness(&self) -> Option<i64> {
        self.read_int(Property::AtmosphereBrightness)
    }

    /// Sets the atmosphere light brightness.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] outside the accepted levels.
    pub fn set_atmosphere_brightness(&self, level: i64) -> Result<(), Error> {
        self.write_int(Property::AtmosphereBrightness, level)
    }

    // ========== Read-only Readings ==========

    /// Water tank status.
    #[must_use]
    pub fn water_level(&self) -> Option<WaterLevel> {
        self.read_int(Property::WaterLevel).map(WaterLevel::from_code)
    }

    /// Accumulated work time as reported.
    #[must_use]
    pub fn work_time(&self) -> Option<i64> {
        self.read_int(Property::WorkTime)
    }

    /// Remaining filter life as reported.
    #[must_use]
    pub fn filter_life(&self) -> Option<i64> {
        self.read_int(Property::FilterLife)
    }

    /// PM2.5 reading.
    #[must_use]
    pub fn pm25(&self) -> Option<i64> {
        self.read_int(Property::Pm25)
    }

    /// Temperature calibration offset, stored as reported.
    #[must_use]
    pub fn temperature_offset(&self) -> Option<Value> {
        let key = self.key(Property::TemperatureOffset)?;
        self.state.read().raw(key).cloned()
    }
}
