// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Oscillation flags, the `oscmode` bitfield and angle controls.

use serde_json::Value;

use super::{Device, Property};
use crate::error::{DeviceError, Error};
use crate::registry::DeviceFamily;
use crate::types::{CruiseConfig, FixedConfig, IntRange, OscillationMode};

impl Device {
    /// Returns `true` when oscillation is carried by the `oscmode` bitfield.
    fn uses_bitfield(&self) -> bool {
        self.family() != DeviceFamily::AirConditioner && self.has(Property::OscillationMode)
    }

    // ========== Flags ==========

    /// Oscillating on any axis.
    #[must_use]
    pub fn oscillating(&self) -> Option<bool> {
        if self.family() == DeviceFamily::AirConditioner {
            return self.swing();
        }
        if self.uses_bitfield() {
            return self.oscillation_mode().map(|m| m != OscillationMode::OFF);
        }
        self.read_bool(Property::HorizontalOscillation)
    }

    /// Starts or stops oscillation.
    ///
    /// Bitfield devices switch to horizontal-only (or off); others toggle the
    /// horizontal flag. Air conditioners toggle swing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the device cannot oscillate.
    pub fn set_oscillating(&self, on: bool) -> Result<(), Error> {
        if self.family() == DeviceFamily::AirConditioner {
            return self.set_swing(on);
        }
        if self.uses_bitfield() {
            let mode = if on {
                OscillationMode::HORIZONTAL
            } else {
                OscillationMode::OFF
            };
            return self.set_oscillation_mode(mode);
        }
        self.write_bool(Property::HorizontalOscillation, on)
    }

    /// Oscillating horizontally.
    #[must_use]
    pub fn horizontally_oscillating(&self) -> Option<bool> {
        if self.uses_bitfield() {
            return self.oscillation_mode().map(OscillationMode::horizontal);
        }
        self.read_bool(Property::HorizontalOscillation)
    }

    /// Starts or stops horizontal oscillation, leaving the vertical axis
    /// alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the device cannot oscillate horizontally.
    pub fn set_horizontal_oscillation(&self, on: bool) -> Result<(), Error> {
        if self.uses_bitfield() {
            let current = self.oscillation_mode().unwrap_or_default();
            return self.set_oscillation_mode(current.with_horizontal(on));
        }
        self.write_bool(Property::HorizontalOscillation, on)
    }

    /// Oscillating vertically.
    #[must_use]
    pub fn vertically_oscillating(&self) -> Option<bool> {
        if self.uses_bitfield() {
            return self.oscillation_mode().map(OscillationMode::vertical);
        }
        self.read_bool(Property::VerticalOscillation)
    }

    /// Starts or stops vertical oscillation, leaving the horizontal axis
    /// alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the device cannot oscillate vertically.
    pub fn set_vertical_oscillation(&self, on: bool) -> Result<(), Error> {
        if self.uses_bitfield() {
            let current = self.oscillation_mode().unwrap_or_default();
            return self.set_oscillation_mode(current.with_vertical(on));
        }
        self.write_bool(Property::VerticalOscillation, on)
    }

    /// Raw oscillation bitfield.
    #[must_use]
    pub fn oscillation_mode(&self) -> Option<OscillationMode> {
        self.read_int(Property::OscillationMode)
            .map(OscillationMode::from_bits)
    }

    /// Writes the oscillation bitfield.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] if the device has no bitfield.
    pub fn set_oscillation_mode(&self, mode: OscillationMode) -> Result<(), Error> {
        self.write_value(Property::OscillationMode, Value::from(mode.bits()))
    }

    // ========== Single-axis Angles ==========

    /// Horizontal oscillation angle (older firmware).
    #[must_use]
    pub fn horizontal_angle(&self) -> Option<i64> {
        self.read_int(Property::HorizontalAngle)
    }

    /// Sets the horizontal oscillation angle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] outside the declared angle range.
    pub fn set_horizontal_angle(&self, angle: i64) -> Result<(), Error> {
        self.write_int(Property::HorizontalAngle, angle)
    }

    /// Vertical oscillation angle (older firmware).
    #[must_use]
    pub fn vertical_angle(&self) -> Option<i64> {
        self.read_int(Property::VerticalAngle)
    }

    /// Sets the vertical oscillation angle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] outside the declared angle range.
    pub fn set_vertical_angle(&self, angle: i64) -> Result<(), Error> {
        self.write_int(Property::VerticalAngle, angle)
    }

    /// Declared horizontal angle range.
    #[must_use]
    pub fn horizontal_angle_range(&self) -> Option<IntRange> {
        self.spec.horizontal_angle_range
    }

    /// Declared vertical angle range.
    #[must_use]
    pub fn vertical_angle_range(&self) -> Option<IntRange> {
        self.spec.vertical_angle_range
    }

    // ========== Cruise ==========

    /// Cruise rectangle, if the firmware reports one and it parses.
    #[must_use]
    pub fn cruise(&self) -> Option<CruiseConfig> {
        let text = self.read_text(Property::Cruise)?;
        match text.parse() {
            Ok(cruise) => Some(cruise),
            Err(e) => {
                tracing::warn!(serial = %self.serial_number(), raw = %text, error = %e, "unreadable cruise configuration");
                None
            }
        }
    }

    /// Writes a complete cruise rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] if opposing bounds are closer than 30°.
    pub fn set_cruise(&self, cruise: CruiseConfig) -> Result<(), Error> {
        cruise.validate()?;
        self.write_value(Property::Cruise, Value::String(cruise.to_string()))
    }

    fn current_cruise(&self) -> Result<CruiseConfig, Error> {
        let text = self
            .read_text(Property::Cruise)
            .ok_or_else(|| DeviceError::unsupported(Property::Cruise.as_str()))?;
        text.parse::<CruiseConfig>().map_err(Error::from)
    }

    /// Moves the upper vertical bound.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] if the change narrows the vertical span below
    /// 30°; the stored configuration is left untouched.
    pub fn set_cruise_top(&self, top: i64) -> Result<(), Error> {
        let next = self.current_cruise()?.with_top(top)?;
        self.set_cruise(next)
    }

    /// Moves the right horizontal bound.
    ///
    /// # Errors
    ///
    /// See [`set_cruise_top`](Self::set_cruise_top).
    pub fn set_cruise_right(&self, right: i64) -> Result<(), Error> {
        let next = self.current_cruise()?.with_right(right)?;
        self.set_cruise(next)
    }

    /// Moves the lower vertical bound.
    ///
    /// # Errors
    ///
    /// See [`set_cruise_top`](Self::set_cruise_top).
    pub fn set_cruise_bottom(&self, bottom: i64) -> Result<(), Error> {
        let next = self.current_cruise()?.with_bottom(bottom)?;
        self.set_cruise(next)
    }

    /// Moves the left horizontal bound.
    ///
    /// # Errors
    ///
    /// See [`set_cruise_top`](Self::set_cruise_top).
    pub fn set_cruise_left(&self, left: i64) -> Result<(), Error> {
        let next = self.current_cruise()?.with_left(left)?;
        self.set_cruise(next)
    }

    // ========== Fixed Aim ==========

    /// Fixed aim, if the firmware reports one and it parses.
    #[must_use]
    pub fn fixed(&self) -> Option<FixedConfig> {
        let text = self.read_text(Property::Fixed)?;
        match text.parse() {
            Ok(fixed) => Some(fixed),
            Err(e) => {
                tracing::warn!(serial = %self.serial_number(), raw = %text, error = %e, "unreadable fixed configuration");
                None
            }
        }
    }

    /// Aims the fan at a fixed position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] if an angle falls outside the declared axis
    /// range.
    pub fn set_fixed(&self, fixed: FixedConfig) -> Result<(), Error> {
        if let Some(range) = self.spec.vertical_angle_range {
            range.check(fixed.vertical)?;
        }
        if let Some(range) = self.spec.horizontal_angle_range {
            range.check(fixed.horizontal)?;
        }
        self.write_value(Property::Fixed, Value::String(fixed.to_string()))
    }
}
