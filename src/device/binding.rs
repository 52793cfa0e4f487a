// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-family attribute tables.
//!
//! Each family lists, for every host-facing [`Property`] it has, the wire
//! symbols that may carry it, how a written value is validated, when the
//! catalog declares it.

use crate::registry::{DeviceFamily, ModelSpec};
use crate::types::{IntRange, Oscillation};

/// Host-facing property of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Main power (or fan motor power on ceiling fans).
    Power,
    /// Fan speed level.
    FanSpeed,
    /// Named preset mode.
    Preset,
    /// Family-specific mode enumeration (heater string, AC code, ...).
    Mode,
    /// Horizontal oscillation flag.
    HorizontalOscillation,
    /// Vertical oscillation flag.
    VerticalOscillation,
    /// Oscillation bitfield.
    OscillationMode,
    /// Heater oscillation angle.
    OscillationAngle,
    /// Horizontal oscillation angle.
    HorizontalAngle,
    /// Vertical oscillation angle.
    VerticalAngle,
    /// Cruise rectangle.
    Cruise,
    /// Fixed aim.
    Fixed,
    /// Measured temperature.
    Temperature,
    /// Target temperature.
    TargetTemperature,
    /// AC sleep profile setpoint offset.
    SleepTemperatureOffset,
    /// Measured humidity.
    Humidity,
    /// Target humidity.
    TargetHumidity,
    /// Panel sound muted.
    Mute,
    /// Child lock.
    ChildLock,
    /// Display auto-off.
    DisplayAutoOff,
    /// Display always on.
    DisplayOn,
    /// Adaptive display brightness.
    LightSensor,
    /// Ceiling fan light.
    Light,
    /// Light brightness.
    Brightness,
    /// Light color temperature.
    ColorTemperature,
    /// Atmosphere light.
    AtmosphereLight,
    /// Atmosphere light color.
    AtmosphereColor,
    /// Atmosphere light brightness.
    AtmosphereBrightness,
    /// Water tank status.
    WaterLevel,
    /// Work time.
    WorkTime,
    /// Filter life.
    FilterLife,
    /// PM2.5 reading.
    Pm25,
    /// Heater heat level.
    HeatLevel,
    /// Heater eco level.
    EcoLevel,
    /// Humidifier light thresholds.
    RgbThreshold,
    /// Cooler humidification.
    Humidify,
    /// Temperature calibration offset.
    TemperatureOffset,
}

impl Property {
    /// Name used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::FanSpeed => "fan speed",
            Self::Preset => "preset mode",
            Self::Mode => "mode",
            Self::HorizontalOscillation => "horizontal oscillation",
            Self::VerticalOscillation => "vertical oscillation",
            Self::OscillationMode => "oscillation mode",
            Self::OscillationAngle => "oscillation angle",
            Self::HorizontalAngle => "horizontal angle",
            Self::VerticalAngle => "vertical angle",
            Self::Cruise => "cruise configuration",
            Self::Fixed => "fixed configuration",
            Self::Temperature => "temperature",
            Self::TargetTemperature => "target temperature",
            Self::SleepTemperatureOffset => "sleep temperature offset",
            Self::Humidity => "humidity",
            Self::TargetHumidity => "target humidity",
            Self::Mute => "mute",
            Self::ChildLock => "child lock",
            Self::DisplayAutoOff => "display auto-off",
            Self::DisplayOn => "display",
            Self::LightSensor => "light sensor",
            Self::Light => "light",
            Self::Brightness => "brightness",
            Self::ColorTemperature => "color temperature",
            Self::AtmosphereLight => "atmosphere light",
            Self::AtmosphereColor => "atmosphere color",
            Self::AtmosphereBrightness => "atmosphere brightness",
            Self::WaterLevel => "water level",
            Self::WorkTime => "work time",
            Self::FilterLife => "filter life",
            Self::Pm25 => "PM2.5",
            Self::HeatLevel => "heat level",
            Self::EcoLevel => "eco level",
            Self::RgbThreshold => "RGB threshold",
            Self::Humidify => "humidify",
            Self::TemperatureOffset => "temperature offset",
        }
    }
}

/// Catalog range a numeric property is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Limit {
    Speed,
    TargetTemperature,
    Humidity,
    HorizontalAngle,
    VerticalAngle,
    HeatLevel,
    EcoLevel,
    Fixed(IntRange),
}

impl Limit {
    pub(crate) fn range(self, spec: &ModelSpec) -> Option<IntRange> {
        match self {
            Self::Speed => spec.speed_range,
            Self::TargetTemperature => spec.target_temperature_range,
            Self::Humidity => spec.humidity_range,
            Self::HorizontalAngle => spec.horizontal_angle_range,
            Self::VerticalAngle => spec.vertical_angle_range,
            Self::HeatLevel => spec.heat_range,
            Self::EcoLevel => spec.eco_range,
            Self::Fixed(range) => Some(range),
        }
    }
}

/// How a written value is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Check {
    Bool,
    Range(Limit),
    Preset,
    /// Validated by the typed setter before it reaches the table.
    Custom,
    ReadOnly,
}

/// When the catalog declares the property without it being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Declare {
    Always,
    WithRange,
    WithPresets,
    WithOscillation(Oscillation),
    Never,
}

/// One row of a family table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Binding {
    pub property: Property,
    /// Candidate symbols; the first one the device reported wins.
    pub keys: &'static [&'static str],
    pub check: Check,
    pub declare: Declare,
}

impl Binding {
    pub(crate) const fn new(
        property: Property,
        keys: &'static [&'static str],
        check: Check,
    ) -> Self {
        Self {
            property,
            keys,
            check,
            declare: Declare::Never,
        }
    }

    pub(crate) const fn read_only(property: Property, keys: &'static [&'static str]) -> Self {
        Self::new(property, keys, Check::ReadOnly)
    }

    pub(crate) const fn declared(self, declare: Declare) -> Self {
        Self { declare, ..self }
    }

    pub(crate) fn is_declared(&self, spec: &ModelSpec) -> bool {
        match self.declare {
            Declare::Always => true,
            Declare::WithRange => match self.check {
                Check::Range(limit) => limit.range(spec).is_some(),
                _ => false,
            },
            Declare::WithPresets => !spec.presets.is_empty(),
            Declare::WithOscillation(min) => spec.oscillation >= min,
            Declare::Never => false,
        }
    }
}

/// Attribute table of a family.
pub(crate) fn table(family: DeviceFamily) -> &'static [Binding] {
    match family {
        DeviceFamily::TowerFan | DeviceFamily::AirCirculator | DeviceFamily::PedestalFan => {
            super::fan::BINDINGS
        }
        DeviceFamily::CeilingFan => super::ceiling_fan::BINDINGS,
        DeviceFamily::AirPurifier => super::purifier::BINDINGS,
        DeviceFamily::Heater => super::heater::BINDINGS,
        DeviceFamily::AirConditioner => super::air_conditioner::BINDINGS,
        DeviceFamily::Humidifier => super::humidifier::BINDINGS,
        DeviceFamily::Dehumidifier => super::dehumidifier::BINDINGS,
        DeviceFamily::EvaporativeCooler => super::cooler::BINDINGS,
        DeviceFamily::ChefMaker => super::chef_maker::BINDINGS,
        DeviceFamily::Unknown => &[],
    }
}
