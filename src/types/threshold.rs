// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Humidity thresholds that drive a humidifier's ambient light color.

use std::fmt;
use std::str::FromStr;

use crate::error::{ParseError, ValueError};
use crate::types::IntRange;

/// Threshold pair encoded on the wire as `"lo,hi"`.
///
/// # Examples
///
/// ```
/// use dreo_lib::types::RgbThreshold;
///
/// let threshold: RgbThreshold = "40,60".parse().unwrap();
/// assert_eq!((threshold.low, threshold.high), (40, 60));
/// assert_eq!(threshold.to_string(), "40,60");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbThreshold {
    /// Lower humidity bound.
    pub low: i64,
    /// Upper humidity bound.
    pub high: i64,
}

impl RgbThreshold {
    /// Creates a threshold pair, checking order and limits.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::OutOfRange`] if either bound is outside `limits`
    /// and [`ValueError::InvalidConfiguration`] if `low >= high`.
    pub fn new(low: i64, high: i64, limits: IntRange) -> Result<Self, ValueError> {
        limits.check(low)?;
        limits.check(high)?;
        if low >= high {
            return Err(ValueError::InvalidConfiguration(format!(
                "threshold low {low} must be below high {high}"
            )));
        }
        Ok(Self { low, high })
    }
}

impl FromStr for RgbThreshold {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (low, high) = s
            .split_once(',')
            .ok_or_else(|| ParseError::UnexpectedFormat(format!("threshold {s:?} has no comma")))?;
        let parse = |part: &str| {
            part.trim().parse::<i64>().map_err(|_| {
                ParseError::UnexpectedFormat(format!("threshold field {part:?} is not an integer"))
            })
        };
        Ok(Self {
            low: parse(low)?,
            high: parse(high)?,
        })
    }
}

impl fmt::Display for RgbThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_validates_order() {
        let limits = IntRange::new(30, 90);
        assert!(RgbThreshold::new(60, 40, limits).is_err());
        assert!(RgbThreshold::new(50, 50, limits).is_err());
        assert!(RgbThreshold::new(40, 60, limits).is_ok());
    }

    #[test]
    fn new_validates_limits() {
        let err = RgbThreshold::new(20, 60, IntRange::new(30, 90)).unwrap_err();
        assert!(matches!(err, ValueError::OutOfRange { actual: 20, .. }));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("40".parse::<RgbThreshold>().is_err());
        assert!("x,60".parse::<RgbThreshold>().is_err());
    }
}
