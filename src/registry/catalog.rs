// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Known-model catalog.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::types::{HvacMode, IntRange, Oscillation, PresetList};

/// Product family of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFamily {
    /// Tower fan.
    TowerFan,
    /// Air circulator.
    AirCirculator,
    /// Pedestal fan.
    PedestalFan,
    /// Ceiling fan with light.
    CeilingFan,
    /// Air purifier.
    AirPurifier,
    /// Space heater.
    Heater,
    /// Portable air conditioner.
    AirConditioner,
    /// Humidifier.
    Humidifier,
    /// Dehumidifier.
    Dehumidifier,
    /// Evaporative cooler.
    EvaporativeCooler,
    /// Chef maker (cooker).
    ChefMaker,
    /// Unrecognised model.
    Unknown,
}

impl DeviceFamily {
    /// Infers the family from the model string's product code.
    ///
    /// # Examples
    ///
    /// ```
    /// use dreo_lib::registry::DeviceFamily;
    ///
    /// assert_eq!(DeviceFamily::from_model("DR-HTF010S"), DeviceFamily::TowerFan);
    /// assert_eq!(DeviceFamily::from_model("DR-XYZ001"), DeviceFamily::Unknown);
    /// ```
    #[must_use]
    pub fn from_model(model: &str) -> Self {
        const PREFIXES: [(&str, DeviceFamily); 11] = [
            ("HTF", DeviceFamily::TowerFan),
            ("HAF", DeviceFamily::AirCirculator),
            ("HPF", DeviceFamily::PedestalFan),
            ("HCF", DeviceFamily::CeilingFan),
            ("HAP", DeviceFamily::AirPurifier),
            ("HSH", DeviceFamily::Heater),
            ("WH", DeviceFamily::Heater),
            ("HAC", DeviceFamily::AirConditioner),
            ("HHM", DeviceFamily::Humidifier),
            ("HDH", DeviceFamily::Dehumidifier),
            ("HEC", DeviceFamily::EvaporativeCooler),
        ];

        let code = model.trim().to_uppercase();
        let code = code.strip_prefix("DR-").unwrap_or(&code);
        if code.starts_with("KCM") {
            return Self::ChefMaker;
        }
        PREFIXES
            .iter()
            .find(|(prefix, _)| code.starts_with(prefix))
            .map_or(Self::Unknown, |(_, family)| *family)
    }

    /// Returns `true` for tower, circulator and pedestal fans.
    #[must_use]
    pub const fn is_fan(&self) -> bool {
        matches!(self, Self::TowerFan | Self::AirCirculator | Self::PedestalFan)
    }

    /// Short label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TowerFan => "tower fan",
            Self::AirCirculator => "air circulator",
            Self::PedestalFan => "pedestal fan",
            Self::CeilingFan => "ceiling fan",
            Self::AirPurifier => "air purifier",
            Self::Heater => "heater",
            Self::AirConditioner => "air conditioner",
            Self::Humidifier => "humidifier",
            Self::Dehumidifier => "dehumidifier",
            Self::EvaporativeCooler => "evaporative cooler",
            Self::ChefMaker => "chef maker",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability descriptor for one model.
///
/// Built with [`ModelSpec::new`] and the `with_*` methods; absent ranges mean
/// the model does not declare the capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    /// Device family.
    pub family: DeviceFamily,
    /// Fan speed range.
    pub speed_range: Option<IntRange>,
    /// Preset modes, sorted by code.
    pub presets: PresetList,
    /// Oscillation capability.
    pub oscillation: Oscillation,
    /// Measured temperature range.
    pub temperature_range: Option<IntRange>,
    /// Settable target temperature range.
    pub target_temperature_range: Option<IntRange>,
    /// Settable target humidity range.
    pub humidity_range: Option<IntRange>,
    /// Horizontal angle range.
    pub horizontal_angle_range: Option<IntRange>,
    /// Vertical angle range.
    pub vertical_angle_range: Option<IntRange>,
    /// Heater heat level range.
    pub heat_range: Option<IntRange>,
    /// Heater eco level range.
    pub eco_range: Option<IntRange>,
    /// Swing modes offered to the host.
    pub swing_modes: Vec<String>,
    /// HVAC modes offered to the host.
    pub hvac_modes: Vec<HvacMode>,
}

impl ModelSpec {
    /// Empty descriptor for a family.
    #[must_use]
    pub fn new(family: DeviceFamily) -> Self {
        Self {
            family,
            speed_range: None,
            presets: PresetList::default(),
            oscillation: Oscillation::None,
            temperature_range: None,
            target_temperature_range: None,
            humidity_range: None,
            horizontal_angle_range: None,
            vertical_angle_range: None,
            heat_range: None,
            eco_range: None,
            swing_modes: Vec::new(),
            hvac_modes: Vec::new(),
        }
    }

    /// Sets the speed range.
    #[must_use]
    pub fn with_speed(mut self, lo: i64, hi: i64) -> Self {
        self.speed_range = Some(IntRange::new(lo, hi));
        self
    }

    /// Sets the preset list from `(name, code)` pairs.
    #[must_use]
    pub fn with_presets(mut self, pairs: &[(&str, i64)]) -> Self {
        self.presets = PresetList::from_pairs(pairs);
        self
    }

    /// Sets the oscillation capability.
    #[must_use]
    pub fn with_oscillation(mut self, oscillation: Oscillation) -> Self {
        self.oscillation = oscillation;
        self
    }

    /// Sets the measured temperature range.
    #[must_use]
    pub fn with_temperature(mut self, lo: i64, hi: i64) -> Self {
        self.temperature_range = Some(IntRange::new(lo, hi));
        self
    }

    /// Sets the target temperature range.
    #[must_use]
    pub fn with_target_temperature(mut self, lo: i64, hi: i64) -> Self {
        self.target_temperature_range = Some(IntRange::new(lo, hi));
        self
    }

    /// Sets the target humidity range.
    #[must_use]
    pub fn with_humidity(mut self, lo: i64, hi: i64) -> Self {
        self.humidity_range = Some(IntRange::new(lo, hi));
        self
    }

    /// Sets the horizontal angle range.
    #[must_use]
    pub fn with_horizontal_angle(mut self, lo: i64, hi: i64) -> Self {
        self.horizontal_angle_range = Some(IntRange::new(lo, hi));
        self
    }

    /// Sets the vertical angle range.
    #[must_use]
    pub fn with_vertical_angle(mut self, lo: i64, hi: i64) -> Self {
        self.vertical_angle_range = Some(IntRange::new(lo, hi));
        self
    }

    /// Sets the heat level range.
    #[must_use]
    pub fn with_heat(mut self, lo: i64, hi: i64) -> Self {
        self.heat_range = Some(IntRange::new(lo, hi));
        self
    }

    /// Sets the eco level range.
    #[must_use]
    pub fn with_eco(mut self, lo: i64, hi: i64) -> Self {
        self.eco_range = Some(IntRange::new(lo, hi));
        self
    }

    /// Sets the swing modes.
    #[must_use]
    pub fn with_swing_modes(mut self, modes: &[&str]) -> Self {
        self.swing_modes = modes.iter().map(|m| (*m).to_string()).collect();
        self
    }

    /// Sets the HVAC modes.
    #[must_use]
    pub fn with_hvac_modes(mut self, modes: &[HvacMode]) -> Self {
        self.hvac_modes = modes.to_vec();
        self
    }
}

const FAN_PRESETS: &[(&str, i64)] = &[("normal", 1), ("natural", 2), ("sleep", 3), ("auto", 4)];
const CIRCULATOR_PRESETS: &[(&str, i64)] = &[
    ("normal", 1),
    ("natural", 2),
    ("sleep", 3),
    ("auto", 4),
    ("turbo", 5),
];
const PURIFIER_PRESETS: &[(&str, i64)] = &[("manual", 1), ("auto", 2), ("sleep", 3), ("turbo", 4)];
const HUMIDIFIER_PRESETS: &[(&str, i64)] = &[("manual", 0), ("auto", 1), ("sleep", 2)];
const COOLER_PRESETS: &[(&str, i64)] = &[("normal", 1), ("auto", 2), ("sleep", 3), ("natural", 4)];
const CEILING_PRESETS: &[(&str, i64)] = &[("normal", 1), ("natural", 2), ("sleep", 3), ("reverse", 4)];

static CATALOG: LazyLock<HashMap<&'static str, ModelSpec>> = LazyLock::new(|| {
    use DeviceFamily as F;

    let tower = |hi| {
        ModelSpec::new(F::TowerFan)
            .with_speed(1, hi)
            .with_presets(FAN_PRESETS)
            .with_oscillation(Oscillation::Horizontal)
            .with_temperature(32, 104)
    };
    let circulator = |hi| {
        ModelSpec::new(F::AirCirculator)
            .with_speed(1, hi)
            .with_presets(CIRCULATOR_PRESETS)
            .with_oscillation(Oscillation::Both)
            .with_horizontal_angle(-60, 60)
            .with_vertical_angle(0, 90)
    };
    let heater = || {
        ModelSpec::new(F::Heater)
            .with_heat(1, 3)
            .with_eco(41, 95)
            .with_temperature(32, 104)
            .with_horizontal_angle(0, 120)
            .with_oscillation(Oscillation::Horizontal)
    };
    let ac = || {
        ModelSpec::new(F::AirConditioner)
            .with_speed(1, 4)
            .with_target_temperature(61, 86)
            .with_temperature(32, 104)
            .with_oscillation(Oscillation::Horizontal)
            .with_swing_modes(&["off", "on"])
            .with_hvac_modes(&[HvacMode::Off, HvacMode::Cool, HvacMode::Dry, HvacMode::FanOnly])
    };

    HashMap::from([
        ("DR-HTF001S", tower(6)),
        ("DR-HTF002S", tower(6)),
        ("DR-HTF004S", tower(12)),
        ("DR-HTF005S", tower(12)),
        ("DR-HTF007S", tower(4)),
        ("DR-HTF008S", tower(5)),
        ("DR-HAF001S", circulator(4)),
        ("DR-HAF003S", circulator(8)),
        ("DR-HAF004S", circulator(9)),
        (
            "DR-HPF001S",
            ModelSpec::new(F::PedestalFan)
                .with_speed(1, 8)
                .with_presets(FAN_PRESETS)
                .with_oscillation(Oscillation::Horizontal),
        ),
        (
            "DR-HCF001S",
            ModelSpec::new(F::CeilingFan)
                .with_speed(1, 12)
                .with_presets(CEILING_PRESETS),
        ),
        (
            "DR-HAP003S",
            ModelSpec::new(F::AirPurifier)
                .with_speed(1, 4)
                .with_presets(PURIFIER_PRESETS),
        ),
        ("DR-HSH004S", heater()),
        ("DR-HSH009S", heater()),
        ("DR-HAC005S", ac()),
        ("DR-HAC006S", ac()),
        (
            "DR-HHM001S",
            ModelSpec::new(F::Humidifier)
                .with_presets(HUMIDIFIER_PRESETS)
                .with_humidity(30, 90),
        ),
        (
            "DR-HDH002S",
            ModelSpec::new(F::Dehumidifier)
                .with_speed(1, 3)
                .with_humidity(30, 85),
        ),
        (
            "DR-HEC002S",
            ModelSpec::new(F::EvaporativeCooler)
                .with_speed(1, 4)
                .with_presets(COOLER_PRESETS)
                .with_oscillation(Oscillation::Horizontal)
                .with_humidity(30, 90),
        ),
        ("DR-KCM001S", ModelSpec::new(F::ChefMaker)),
    ])
});

/// Looks up a model in the catalog (case-insensitive).
#[must_use]
pub fn lookup(model: &str) -> Option<&'static ModelSpec> {
    CATALOG.get(model.trim().to_uppercase().as_str())
}

/// Models present in the catalog.
pub fn known_models() -> impl Iterator<Item = &'static str> {
    CATALOG.keys().copied()
}
