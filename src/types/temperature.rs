// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temperature units and the discrete Celsius to Fahrenheit setpoint table.
//!
//! Air conditioners only accept whole Fahrenheit setpoints. When the host
//! works in Celsius, setpoints go through a fixed lookup table instead of a
//! rounded conversion so they land on the steps the unit itself offers.

use std::fmt;

use crate::error::ValueError;

/// Lowest Celsius setpoint in the lookup table.
pub const CELSIUS_SETPOINT_MIN: i64 = 16;

/// Highest Celsius setpoint in the lookup table.
pub const CELSIUS_SETPOINT_MAX: i64 = 30;

/// Fahrenheit value for each Celsius setpoint from 16 to 30.
const CELSIUS_TO_FAHRENHEIT: [i64; 15] = [61, 63, 64, 66, 68, 70, 72, 73, 75, 77, 79, 81, 83, 84, 86];

/// Readings above this value are taken to be Fahrenheit.
const FAHRENHEIT_DETECTION_THRESHOLD: i64 = 50;

/// Unit a temperature value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TemperatureUnit {
    /// Degrees Celsius.
    Celsius,
    /// Degrees Fahrenheit.
    Fahrenheit,
}

impl TemperatureUnit {
    /// Guesses the unit of a reported reading.
    ///
    /// # Examples
    ///
    /// ```
    /// use dreo_lib::types::TemperatureUnit;
    ///
    /// assert_eq!(TemperatureUnit::detect(72), TemperatureUnit::Fahrenheit);
    /// assert_eq!(TemperatureUnit::detect(22), TemperatureUnit::Celsius);
    /// ```
    #[must_use]
    pub const fn detect(reading: i64) -> Self {
        if reading > FAHRENHEIT_DETECTION_THRESHOLD {
            Self::Fahrenheit
        } else {
            Self::Celsius
        }
    }

    /// Short symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Maps a Celsius setpoint onto the vendor's Fahrenheit step.
///
/// # Errors
///
/// Returns [`ValueError::OutOfRange`] outside 16..=30 °C.
///
/// # Examples
///
/// ```
/// use dreo_lib::types::celsius_to_fahrenheit;
///
/// assert_eq!(celsius_to_fahrenheit(20).unwrap(), 68);
/// assert_eq!(celsius_to_fahrenheit(22).unwrap(), 72);
/// assert_eq!(celsius_to_fahrenheit(28).unwrap(), 83);
/// assert!(celsius_to_fahrenheit(31).is_err());
/// ```
pub fn celsius_to_fahrenheit(celsius: i64) -> Result<i64, ValueError> {
    if !(CELSIUS_SETPOINT_MIN..=CELSIUS_SETPOINT_MAX).contains(&celsius) {
        return Err(ValueError::OutOfRange {
            min: CELSIUS_SETPOINT_MIN,
            max: CELSIUS_SETPOINT_MAX,
            actual: celsius,
        });
    }
    let index = usize::try_from(celsius - CELSIUS_SETPOINT_MIN).unwrap_or_default();
    Ok(CELSIUS_TO_FAHRENHEIT[index])
}

/// Maps a Fahrenheit setpoint back to the closest Celsius table entry.
///
/// Ties resolve to the lower Celsius value.
#[must_use]
pub fn fahrenheit_to_celsius(fahrenheit: i64) -> i64 {
    let mut best = CELSIUS_SETPOINT_MIN;
    let mut best_distance = u64::MAX;
    for (celsius, f) in (CELSIUS_SETPOINT_MIN..).zip(CELSIUS_TO_FAHRENHEIT) {
        let distance = f.abs_diff(fahrenheit);
        if distance < best_distance {
            best = celsius;
            best_distance = distance;
        }
    }
    best
}
