// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed integer intervals used for speed, temperature, humidity and angle
//! limits.

use std::fmt;

use crate::error::ValueError;

/// A closed integer interval `[lo, hi]`.
///
/// # Examples
///
/// ```
/// use dreo_lib::types::IntRange;
///
/// let speed = IntRange::new(1, 12);
/// assert!(speed.contains(1));
/// assert!(speed.contains(12));
/// assert!(speed.check(13).is_err());
/// assert_eq!(speed.len(), 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct IntRange {
    lo: i64,
    hi: i64,
}

impl IntRange {
    /// Creates a range. The bounds are swapped if given in reverse order.
    #[must_use]
    pub const fn new(lo: i64, hi: i64) -> Self {
        if lo <= hi {
            Self { lo, hi }
        } else {
            Self { lo: hi, hi: lo }
        }
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub const fn lo(&self) -> i64 {
        self.lo
    }

    /// Upper bound (inclusive).
    #[must_use]
    pub const fn hi(&self) -> i64 {
        self.hi
    }

    /// Returns `true` if `value` lies within the interval.
    #[must_use]
    pub const fn contains(&self, value: i64) -> bool {
        value >= self.lo && value <= self.hi
    }

    /// Number of integers in the interval.
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> u64 {
        self.hi.abs_diff(self.lo) + 1
    }

    /// Validates `value` against the interval.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::OutOfRange`] when `value` is outside the bounds.
    pub fn check(&self, value: i64) -> Result<i64, ValueError> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(ValueError::OutOfRange {
                min: self.lo,
                max: self.hi,
                actual: value,
            })
        }
    }
}

impl From<(i64, i64)> for IntRange {
    fn from((lo, hi): (i64, i64)) -> Self {
        Self::new(lo, hi)
    }
}

impl fmt::Display for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let range = IntRange::new(30, 85);
        assert!(range.contains(30));
        assert!(range.contains(85));
        assert!(!range.contains(29));
        assert!(!range.contains(86));
    }

    #[test]
    fn reversed_bounds_are_normalized() {
        let range = IntRange::new(60, -60);
        assert_eq!(range.lo(), -60);
        assert_eq!(range.hi(), 60);
        assert_eq!(range.len(), 121);
    }

    #[test]
    fn check_reports_limits() {
        let err = IntRange::new(1, 4).check(0).unwrap_err();
        assert_eq!(
            err,
            ValueError::OutOfRange {
                min: 1,
                max: 4,
                actual: 0
            }
        );
    }

    #[test]
    fn display_format() {
        assert_eq!(IntRange::from((1, 12)).to_string(), "[1, 12]");
    }
}
