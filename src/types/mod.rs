// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the catalog and the device model.
//!
//! Composite wire strings (cruise, fixed aim, RGB threshold) are decoded
//! into typed values here; validation runs on the typed form.

mod angle;
mod modes;
mod preset;
mod range;
mod temperature;
mod threshold;

pub use angle::{CruiseConfig, FixedConfig, MIN_CRUISE_SPAN};
pub use modes::{
    AcMode, AcPreset, HeaterMode, HvacMode, LevelNames, Oscillation, OscillationMode, WaterLevel,
};
pub use preset::{PresetList, PresetMode};
pub use range::IntRange;
pub use temperature::{
    CELSIUS_SETPOINT_MAX, CELSIUS_SETPOINT_MIN, TemperatureUnit, celsius_to_fahrenheit,
    fahrenheit_to_celsius,
};
pub use threshold::RgbThreshold;
