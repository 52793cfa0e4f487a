// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Composite angle configurations reported by newer circulator firmware.
//!
//! Both values travel as comma-separated strings of signed integers:
//!
//! - cruise: `"vTop,hRight,vBottom,hLeft"`, the rectangle the fan sweeps
//! - fixed: `"vertical,horizontal"`, a static aim
//!
//! They are decoded on receipt and only re-encoded when a command is built.

use std::fmt;
use std::str::FromStr;

use crate::error::{ParseError, ValueError};

/// Minimum separation between opposing cruise bounds, in degrees.
pub const MIN_CRUISE_SPAN: i64 = 30;

fn parse_fields<const N: usize>(text: &str, what: &str) -> Result<[i64; N], ParseError> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(ParseError::UnexpectedFormat(format!(
            "{what} expects {N} fields, got {text:?}"
        )));
    }
    let mut out = [0_i64; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part.parse().map_err(|_| {
            ParseError::UnexpectedFormat(format!("{what} field {part:?} is not an integer"))
        })?;
    }
    Ok(out)
}

/// Oscillation rectangle: vertical top/bottom and horizontal right/left.
///
/// # Examples
///
/// ```
/// use dreo_lib::types::CruiseConfig;
///
/// let cruise: CruiseConfig = "90,45,0,-45".parse().unwrap();
/// assert_eq!(cruise.top, 90);
/// assert_eq!(cruise.left, -45);
/// assert_eq!(cruise.to_string(), "90,45,0,-45");
///
/// // Opposing bounds must stay at least 30 degrees apart
/// assert!(cruise.with_bottom(70).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CruiseConfig {
    /// Upper vertical bound.
    pub top: i64,
    /// Right horizontal bound.
    pub right: i64,
    /// Lower vertical bound.
    pub bottom: i64,
    /// Left horizontal bound.
    pub left: i64,
}

impl CruiseConfig {
    /// Checks the 30° minimum separation between opposing bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidConfiguration`] when top-bottom or
    /// right-left are closer than [`MIN_CRUISE_SPAN`], or too far apart to
    /// compute.
    pub fn validate(&self) -> Result<(), ValueError> {
        check_span("vertical", self.bottom, self.top)?;
        check_span("horizontal", self.left, self.right)
    }

    /// Returns a copy with a new top bound, validated.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn with_top(self, top: i64) -> Result<Self, ValueError> {
        let next = Self { top, ..self };
        next.validate().map(|()| next)
    }

    /// Returns a copy with a new right bound, validated.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn with_right(self, right: i64) -> Result<Self, ValueError> {
        let next = Self { right, ..self };
        next.validate().map(|()| next)
    }

    /// Returns a copy with a new bottom bound, validated.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn with_bottom(self, bottom: i64) -> Result<Self, ValueError> {
        let next = Self { bottom, ..self };
        next.validate().map(|()| next)
    }

    /// Returns a copy with a new left bound, validated.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn with_left(self, left: i64) -> Result<Self, ValueError> {
        let next = Self { left, ..self };
        next.validate().map(|()| next)
    }
}

impl FromStr for CruiseConfig {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [top, right, bottom, left] = parse_fields::<4>(s, "cruise configuration")?;
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

impl fmt::Display for CruiseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.top, self.right, self.bottom, self.left)
    }
}

/// Static aim: vertical and horizontal angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedConfig {
    /// Vertical angle.
    pub vertical: i64,
    /// Horizontal angle.
    pub horizontal: i64,
}

impl FromStr for FixedConfig {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [vertical, horizontal] = parse_fields::<2>(s, "fixed configuration")?;
        Ok(Self {
            vertical,
            horizontal,
        })
    }
}

impl fmt::Display for FixedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.vertical, self.horizontal)
    }
}

fn check_span(axis: &str, low: i64, high: i64) -> Result<(), ValueError> {
    match high.checked_sub(low) {
        Some(span) if span >= MIN_CRUISE_SPAN => Ok(()),
        Some(_) => Err(ValueError::InvalidConfiguration(format!(
            "{axis} cruise span {low}..{high} is narrower than {MIN_CRUISE_SPAN}°"
        ))),
        None => Err(ValueError::InvalidConfiguration(format!(
            "{axis} cruise span {low}..{high} is out of range"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cruise_with_spaces() {
        let cruise: CruiseConfig = " 60, 30 ,0,-30".parse().unwrap();
        assert_eq!(
            cruise,
            CruiseConfig {
                top: 60,
                right: 30,
                bottom: 0,
                left: -30
            }
        );
    }

    #[test]
    fn parse_cruise_wrong_arity() {
        assert!("1,2,3".parse::<CruiseConfig>().is_err());
        assert!("a,b,c,d".parse::<CruiseConfig>().is_err());
    }

    #[test]
    fn exact_minimum_span_is_accepted() {
        let cruise: CruiseConfig = "30,15,0,-15".parse().unwrap();
        assert!(cruise.validate().is_ok());
    }

    #[test]
    fn narrowing_horizontal_span_is_rejected() {
        let cruise: CruiseConfig = "90,45,0,-45".parse().unwrap();
        let err = cruise.with_left(20).unwrap_err();
        assert!(matches!(err, ValueError::InvalidConfiguration(_)));
        assert!(cruise.with_left(15).is_ok());
    }

    #[test]
    fn inverted_vertical_bounds_are_rejected() {
        let cruise: CruiseConfig = "90,45,0,-45".parse().unwrap();
        assert!(cruise.with_top(-10).is_err());
    }

    #[test]
    fn extreme_bounds_are_rejected() {
        let cruise: CruiseConfig = "90,45,0,-45".parse().unwrap();
        assert!(matches!(
            cruise.with_top(i64::MAX).and_then(|c| c.with_bottom(i64::MIN)),
            Err(ValueError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            cruise.with_left(i64::MIN).and_then(|c| c.with_right(i64::MAX)),
            Err(ValueError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn fixed_round_trip_text() {
        let fixed: FixedConfig = "-15,30".parse().unwrap();
        assert_eq!(fixed.vertical, -15);
        assert_eq!(fixed.horizontal, 30);
        assert_eq!(fixed.to_string(), "-15,30");
    }
}
