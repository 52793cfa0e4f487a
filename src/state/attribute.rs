// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire attribute symbols and the value kind each one accepts.
//!
//! The vendor cloud names every scalar property of a device with a short
//! lowercase symbol (`poweron`, `windlevel`, ...). Incoming values are only
//! stored if their JSON type matches the kind registered here; symbols that
//! are not listed are kept as opaque scalars.

use serde_json::Value;

/// Wire attribute symbols.
pub mod keys {
    /// Main power.
    pub const POWER_ON: &str = "poweron";
    /// Ceiling fan motor power, separate from the light.
    pub const FAN_ON: &str = "fanon";
    /// Fan speed level.
    pub const WIND_LEVEL: &str = "windlevel";
    /// Preset mode on tower and pedestal fans.
    pub const WIND_TYPE: &str = "windtype";
    /// Preset mode on purifiers and coolers.
    pub const WIND_MODE: &str = "windmode";
    /// Operating mode (integer or string depending on family).
    pub const MODE: &str = "mode";
    /// Horizontal oscillation on older tower fans.
    pub const SHAKE_HORIZON: &str = "shakehorizon";
    /// Horizontal oscillation.
    pub const H_OSC_ON: &str = "hoscon";
    /// Vertical oscillation.
    pub const V_OSC_ON: &str = "voscon";
    /// Oscillation bitfield.
    pub const OSC_MODE: &str = "oscmode";
    /// Heater oscillation.
    pub const OSC_ON: &str = "oscon";
    /// Heater oscillation angle.
    pub const OSC_ANGLE: &str = "oscangle";
    /// Horizontal oscillation angle (older firmware).
    pub const H_OSC_ANGLE: &str = "hoscangle";
    /// Vertical oscillation angle (older firmware).
    pub const V_OSC_ANGLE: &str = "voscangle";
    /// Cruise rectangle, `"vTop,hRight,vBottom,hLeft"`.
    pub const CRUISE_CONF: &str = "cruiseconf";
    /// Fixed aim, `"vertical,horizontal"`.
    pub const FIXED_CONF: &str = "fixedconf";
    /// Measured temperature.
    pub const TEMPERATURE: &str = "temperature";
    /// Air conditioner setpoint, always Fahrenheit.
    pub const TEMP_LEVEL: &str = "templevel";
    /// Setpoint offset while the AC runs its sleep profile.
    pub const SLEEP_TEMP_OFFSET: &str = "sleeptempoffset";
    /// Measured relative humidity.
    pub const RH: &str = "rh";
    /// Target relative humidity.
    pub const RH_AUTO_LEVEL: &str = "rhautolevel";
    /// Panel sound muted.
    pub const MUTE_ON: &str = "muteon";
    /// Child lock.
    pub const CHILD_LOCK_ON: &str = "childlockon";
    /// Display turns itself off after a while.
    pub const DISPLAY_AUTO_OFF: &str = "displayautooff";
    /// Display stays lit.
    pub const LED_ALWAYS_ON: &str = "ledalwayson";
    /// Adaptive display brightness.
    pub const LIGHT_SENSOR_ON: &str = "lightsensoron";
    /// Ceiling fan light.
    pub const LIGHT_ON: &str = "lighton";
    /// Ceiling fan light brightness.
    pub const BRIGHTNESS: &str = "brightness";
    /// Ceiling fan light color temperature.
    pub const COLOR_TEMP: &str = "colortemp";
    /// Atmosphere light.
    pub const ATM_ON: &str = "atmon";
    /// Atmosphere light color.
    pub const ATM_COLOR: &str = "atmcolor";
    /// Atmosphere light brightness.
    pub const ATM_BRI: &str = "atmbri";
    /// Water tank status (0 = ok, 1 = empty).
    pub const WATER_LEVEL: &str = "wrong";
    /// Accumulated work time.
    pub const WORK_TIME: &str = "worktime";
    /// Remaining filter life.
    pub const FILTER_TIME: &str = "filtertime";
    /// PM2.5 reading.
    pub const PM25: &str = "pm25";
    /// Heater heat level.
    pub const HTA_LEVEL: &str = "htalevel";
    /// Heater eco target temperature.
    pub const ECO_LEVEL: &str = "ecolevel";
    /// Humidifier ambient light thresholds, `"lo,hi"`.
    pub const RGB_THRESHOLD: &str = "rgbth";
    /// Cooler humidification.
    pub const HUMIDIFY: &str = "humidify";
    /// Temperature calibration offset.
    pub const TEMP_OFFSET: &str = "tempoffset";
}

/// JSON type an attribute accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    /// JSON boolean.
    Bool,
    /// JSON integer.
    Int,
    /// JSON string.
    Text,
    /// JSON integer or string (`mode` differs per family).
    Mode,
    /// Any scalar; stored as received.
    Opaque,
}

impl AttrKind {
    /// Kind registered for a wire symbol.
    #[must_use]
    #[allow(clippy::wildcard_imports)]
    pub fn of(key: &str) -> Self {
        use keys::*;
        match key {
            POWER_ON | FAN_ON | SHAKE_HORIZON | H_OSC_ON | V_OSC_ON | OSC_ON | MUTE_ON
            | CHILD_LOCK_ON | DISPLAY_AUTO_OFF | LED_ALWAYS_ON | LIGHT_SENSOR_ON | LIGHT_ON
            | ATM_ON | HUMIDIFY => Self::Bool,
            WIND_LEVEL | WIND_TYPE | WIND_MODE | OSC_MODE | OSC_ANGLE | H_OSC_ANGLE
            | V_OSC_ANGLE | TEMPERATURE | TEMP_LEVEL | SLEEP_TEMP_OFFSET | RH | RH_AUTO_LEVEL
            | BRIGHTNESS | COLOR_TEMP | ATM_COLOR | ATM_BRI | WATER_LEVEL | WORK_TIME
            | FILTER_TIME | PM25 | HTA_LEVEL | ECO_LEVEL => Self::Int,
            CRUISE_CONF | FIXED_CONF | RGB_THRESHOLD => Self::Text,
            MODE => Self::Mode,
            _ => Self::Opaque,
        }
    }

    /// Returns `true` if `value` has an acceptable JSON type.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Bool => value.is_boolean(),
            Self::Int => value.is_i64(),
            Self::Text => value.is_string(),
            Self::Mode => value.is_i64() || value.is_string(),
            Self::Opaque => !value.is_null(),
        }
    }
}
