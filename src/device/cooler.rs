// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Evaporative coolers.

use serde_json::Value;

use super::binding::{Binding, Check, Declare, Limit, Property};
use super::Device;
use crate::error::Error;
use crate::state::keys;
use crate::types::{LevelNames, Oscillation};

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
    Binding::new(
        Property::HorizontalOscillation,
        &[keys::H_OSC_ON, keys::SHAKE_HORIZON],
        Check::Bool,
    )
    .declared(Declare::WithOscillation(Oscillation::Horizontal)),
    Binding::new(Property::Humidify, &[keys::HUMIDIFY], Check::Bool),
    Binding::new(
        Property::TargetHumidity,
        &[keys::RH_AUTO_LEVEL],
        Check::Range(Limit::Humidity),
    )
    .declared(Declare::WithRange),
    Binding::read_only(Property::WaterLevel, &[keys::WATER_LEVEL]),
    Binding::read_only(Property::WorkTime, &[keys::WORK_TIME]),
    Binding::read_only(Property::Temperature, &[keys::TEMPERATURE]),
];

impl Device {
    /// Named cooler mode (`normal`, `auto`, `sleep`, `natural`).
    #[must_use]
    pub fn cooler_mode(&self) -> Option<&'static str> {
        self.read_int(Property::Preset)
            .and_then(|code| LevelNames::COOLER_MODE.name(code))
    }

    /// Selects a named cooler mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] for unknown names.
    pub fn set_cooler_mode(&self, name: &str) -> Result<(), Error> {
        let code = LevelNames::COOLER_MODE.level(name)?;
        self.write_value(Property::Preset, Value::from(code))
    }

    /// Humidification running.
    #[must_use]
    pub fn humidify(&self) -> Option<bool> {
        self.read_bool(Property::Humidify)
    }

    /// Starts or stops humidification.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the device cannot humidify.
    pub fn set_humidify(&self, on: bool) -> Result<(), Error> {
        self.write_bool(Property::Humidify, on)
    }
}
