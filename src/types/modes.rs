// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vendor mode enumerations and their host-facing translations.
//!
//! The vendor value stays canonical inside the device state; each family
//! gets one translation table at the host-facing edge.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// How far a model can oscillate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Oscillation {
    /// No oscillation.
    #[default]
    None,
    /// Horizontal only.
    Horizontal,
    /// Horizontal and vertical.
    Both,
}

/// Oscillation bitfield used by air circulators (`oscmode`).
///
/// # Examples
///
/// ```
/// use dreo_lib::types::OscillationMode;
///
/// let mode = OscillationMode::VERTICAL.with_horizontal(true);
/// assert_eq!(mode, OscillationMode::BOTH);
/// assert_eq!(mode.with_vertical(false).bits(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OscillationMode(u8);

impl OscillationMode {
    /// Not oscillating.
    pub const OFF: Self = Self(0);
    /// Horizontal sweep.
    pub const HORIZONTAL: Self = Self(1);
    /// Vertical sweep.
    pub const VERTICAL: Self = Self(2);
    /// Both axes.
    pub const BOTH: Self = Self(3);

    /// Decodes a reported value, ignoring unknown bits.
    #[must_use]
    pub fn from_bits(bits: i64) -> Self {
        Self(u8::try_from(bits & 0b11).unwrap_or_default())
    }

    /// Raw wire value.
    #[must_use]
    pub const fn bits(self) -> i64 {
        self.0 as i64
    }

    /// Horizontal bit set.
    #[must_use]
    pub const fn horizontal(self) -> bool {
        self.0 & 1 != 0
    }

    /// Vertical bit set.
    #[must_use]
    pub const fn vertical(self) -> bool {
        self.0 & 2 != 0
    }

    /// Returns the mode with the horizontal bit changed.
    #[must_use]
    pub const fn with_horizontal(self, on: bool) -> Self {
        if on { Self(self.0 | 1) } else { Self(self.0 & !1) }
    }

    /// Returns the mode with the vertical bit changed.
    #[must_use]
    pub const fn with_vertical(self, on: bool) -> Self {
        if on { Self(self.0 | 2) } else { Self(self.0 & !2) }
    }
}

/// Heater operating mode, sent as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaterMode {
    /// Heater off.
    Off,
    /// Fan only.
    CoolAir,
    /// Heating.
    HotAir,
    /// Heating to a target temperature.
    Eco,
}

impl HeaterMode {
    /// All modes in display order.
    pub const ALL: [Self; 4] = [Self::Off, Self::CoolAir, Self::HotAir, Self::Eco];

    /// Wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::CoolAir => "coolair",
            Self::HotAir => "hotair",
            Self::Eco => "eco",
        }
    }
}

impl fmt::Display for HeaterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeaterMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| ValueError::invalid_choice(s, Self::ALL.map(|m| m.as_str())))
    }
}

/// Raw air conditioner mode code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcMode {
    /// Cooling (1).
    Cool,
    /// Drying (2).
    Dry,
    /// Fan only (3).
    Fan,
    /// Cooling with the sleep profile (4).
    Sleep,
    /// Cooling with the eco profile (5).
    Eco,
}

impl AcMode {
    /// Wire code.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Cool => 1,
            Self::Dry => 2,
            Self::Fan => 3,
            Self::Sleep => 4,
            Self::Eco => 5,
        }
    }

    /// Decodes a wire code.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Cool),
            2 => Some(Self::Dry),
            3 => Some(Self::Fan),
            4 => Some(Self::Sleep),
            5 => Some(Self::Eco),
            _ => None,
        }
    }

    /// Host-facing HVAC mode; sleep and eco collapse to cool.
    #[must_use]
    pub const fn hvac(&self) -> HvacMode {
        match self {
            Self::Cool | Self::Sleep | Self::Eco => HvacMode::Cool,
            Self::Dry => HvacMode::Dry,
            Self::Fan => HvacMode::FanOnly,
        }
    }

    /// Host-facing preset.
    #[must_use]
    pub const fn preset(&self) -> AcPreset {
        match self {
            Self::Sleep => AcPreset::Sleep,
            Self::Eco => AcPreset::Eco,
            Self::Cool | Self::Dry | Self::Fan => AcPreset::None,
        }
    }
}

/// Host-facing HVAC mode of an air conditioner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HvacMode {
    /// Powered off.
    Off,
    /// Cooling.
    Cool,
    /// Drying.
    Dry,
    /// Fan only.
    FanOnly,
}

impl HvacMode {
    /// Name used by the host.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Cool => "cool",
            Self::Dry => "dry",
            Self::FanOnly => "fan_only",
        }
    }
}

/// Host-facing air conditioner preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcPreset {
    /// Plain cooling.
    None,
    /// Sleep profile.
    Sleep,
    /// Eco profile.
    Eco,
}

impl AcPreset {
    /// Name used by the host.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Sleep => "sleep",
            Self::Eco => "eco",
        }
    }
}

impl FromStr for AcPreset {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "sleep" => Ok(Self::Sleep),
            "eco" => Ok(Self::Eco),
            _ => Err(ValueError::invalid_choice(s, ["none", "sleep", "eco"])),
        }
    }
}

/// Names for a fixed set of numbered levels starting at 1.
///
/// Used for AC fan modes (`low`, `medium`, `high`, `auto`), dehumidifier fan
/// speeds and evaporative cooler modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelNames(&'static [&'static str]);

impl LevelNames {
    /// AC fan modes 1..=4.
    pub const AC_FAN: Self = Self(&["low", "medium", "high", "auto"]);
    /// Dehumidifier fan speeds 1..=3.
    pub const DEHUMIDIFIER_FAN: Self = Self(&["low", "medium", "high"]);
    /// Dehumidifier modes 1..=2.
    pub const DEHUMIDIFIER_MODE: Self = Self(&["auto", "continuous"]);
    /// Evaporative cooler modes 1..=4.
    pub const COOLER_MODE: Self = Self(&["normal", "auto", "sleep", "natural"]);

    /// Name for a level.
    #[must_use]
    pub fn name(&self, level: i64) -> Option<&'static str> {
        usize::try_from(level - 1)
            .ok()
            .and_then(|index| self.0.get(index))
            .copied()
    }

    /// Level for a name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidChoice`] for unknown names.
    pub fn level(&self, name: &str) -> Result<i64, ValueError> {
        let wanted = name.trim().to_lowercase();
        self.0
            .iter()
            .position(|n| *n == wanted)
            .and_then(|index| i64::try_from(index + 1).ok())
            .ok_or_else(|| ValueError::invalid_choice(name, self.0.iter().copied()))
    }

    /// All names in level order.
    #[must_use]
    pub const fn names(&self) -> &'static [&'static str] {
        self.0
    }
}

/// Water tank status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaterLevel {
    /// Tank has water (0).
    Ok,
    /// Tank is empty (1).
    Empty,
}

impl WaterLevel {
    /// Decodes the reported status code.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        if code == 0 { Self::Ok } else { Self::Empty }
    }
}
