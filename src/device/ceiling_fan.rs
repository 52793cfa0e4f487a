// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ceiling fans with an integrated light.
//!
//! The fan motor is switched by `fanon`; `poweron` is not used.

use super::binding::{Binding, Check, Declare, Limit, Property};
use super::Device;
use crate::error::Error;
use crate::state::keys;
use crate::types::IntRange;

const LIGHT_RANGE: IntRange = IntRange::new(1, 100);

pub(crate) const BINDINGS: &[Binding] = &[
    Binding::new(Property::Power, &[keys::FAN_ON], Check::Bool).declared(Declare::Always),
    Binding::new(Property::FanSpeed, &[keys::WIND_LEVEL], Check::Range(Limit::Speed))
        .declared(Declare::WithRange),
    Binding::new(Property::Preset, &[keys::MODE], Check::Preset).declared(Declare::WithPresets),
    Binding::new(Property::Light, &[keys::LIGHT_ON], Check::Bool).declared(Declare::Always),
    Binding::new(
        Property::Brightness,
        &[keys::BRIGHTNESS],
        Check::Range(Limit::Fixed(LIGHT_RANGE)),
    )
    .declared(Declare::WithRange),
    Binding::new(
        Property::ColorTemperature,
        &[keys::COLOR_TEMP],
        Check::Range(Limit::Fixed(LIGHT_RANGE)),
    )
    .declared(Declare::WithRange),
];

impl Device {
    /// Light on.
    #[must_use]
    pub fn light_on(&self) -> Option<bool> {
        self.read_bool(Property::Light)
    }

    /// Switches the light.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the device has no light.
    pub fn set_light(&self, on: bool) -> Result<(), Error> {
        self.write_bool(Property::Light, on)
    }

    /// Light brightness, 1–100.
    #[must_use]
    pub fn brightness(&self) -> Option<i64> {
        self.read_int(Property::Brightness)
    }

    /// Sets the light brightness.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] outside 1–100.
    pub fn set_brightness(&self, brightness: i64) -> Result<(), Error> {
        self.write_int(Property::Brightness, brightness)
    }

    /// Light color temperature, 1–100.
    #[must_use]
    pub fn color_temperature(&self) -> Option<i64> {
        self.read_int(Property::ColorTemperature)
    }

    /// Sets the light color temperature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] outside 1–100.
    pub fn set_color_temperature(&self, value: i64) -> Result<(), Error> {
        self.write_int(Property::ColorTemperature, value)
    }
}
