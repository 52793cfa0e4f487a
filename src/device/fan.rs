// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tower fans, air circulators and pedestal fans.
//!
//! Older tower fans report horizontal oscillation as `shakehorizon`; newer
//! ones use `hoscon`/`voscon`. Air circulators pack both axes into the
//! `oscmode` bitfield and, on recent firmware, expose the cruise and fixed
//! angle configurations instead of single-axis angles.

use super::binding::{Binding, Check, Declare, Limit, Property};
use crate::state::keys;
use crate::types::{IntRange, Oscillation};

pub(crate) const BINDINGS: &[Binding] = &[
    Binding::new(Property::Power, &[keys::POWER_ON], Check::Bool).declared(Declare::Always),
    Binding::new(Property::FanSpeed, &[keys::WIND_LEVEL], Check::Range(Limit::Speed))
        .declared(Declare::WithRange),
    Binding::new(
        Property::Preset,
        &[keys::WIND_TYPE, keys::WIND_MODE, keys::MODE],
        Check::Preset,
    )
    .declared(Declare::WithPresets),
    Binding::new(
        Property::HorizontalOscillation,
        &[keys::SHAKE_HORIZON, keys::H_OSC_ON],
        Check::Bool,
    )
    .declared(Declare::WithOscillation(Oscillation::Horizontal)),
    Binding::new(Property::VerticalOscillation, &[keys::V_OSC_ON], Check::Bool),
    Binding::new(Property::OscillationMode, &[keys::OSC_MODE], Check::Custom)
        .declared(Declare::WithOscillation(Oscillation::Both)),
    Binding::new(
        Property::HorizontalAngle,
        &[keys::H_OSC_ANGLE],
        Check::Range(Limit::HorizontalAngle),
    ),
    Binding::new(
        Property::VerticalAngle,
        &[keys::V_OSC_ANGLE],
        Check::Range(Limit::VerticalAngle),
    ),
    Binding::new(Property::Cruise, &[keys::CRUISE_CONF], Check::Custom),
    Binding::new(Property::Fixed, &[keys::FIXED_CONF], Check::Custom),
    Binding::read_only(Property::Temperature, &[keys::TEMPERATURE]),
    Binding::new(Property::Mute, &[keys::MUTE_ON], Check::Bool),
    Binding::new(Property::ChildLock, &[keys::CHILD_LOCK_ON], Check::Bool),
    Binding::new(Property::DisplayOn, &[keys::LED_ALWAYS_ON], Check::Bool),
    Binding::new(Property::LightSensor, &[keys::LIGHT_SENSOR_ON], Check::Bool),
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
    Binding::read_only(Property::TemperatureOffset, &[keys::TEMP_OFFSET]),
];
