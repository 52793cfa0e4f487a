// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named preset modes and their wire codes.

use std::fmt;

use crate::error::ValueError;

/// A named operating profile, encoded on the wire as a small integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PresetMode {
    /// Lower-case display name (`"normal"`, `"sleep"`, ...).
    pub name: String,
    /// Numeric code sent to and reported by the device.
    pub code: i64,
}

impl PresetMode {
    /// Creates a preset. The name is lower-cased.
    #[must_use]
    pub fn new(name: impl AsRef<str>, code: i64) -> Self {
        Self {
            name: name.as_ref().trim().to_lowercase(),
            code,
        }
    }
}

impl fmt::Display for PresetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.code)
    }
}

/// Ordered list of presets supported by one model.
///
/// # Examples
///
/// ```
/// use dreo_lib::types::PresetList;
///
/// let presets = PresetList::from_pairs(&[("normal", 1), ("natural", 2), ("sleep", 3)]);
/// assert_eq!(presets.code_of("sleep").unwrap(), 3);
/// assert_eq!(presets.name_of(2), Some("natural"));
/// assert!(presets.code_of("turbo").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PresetList(Vec<PresetMode>);

impl PresetList {
    /// Creates a list from `(name, code)` pairs, keeping their order.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, i64)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(name, code)| PresetMode::new(name, *code))
                .collect(),
        )
    }

    /// Creates a list from presets, dropping duplicate codes (first wins)
    /// and sorting by code.
    #[must_use]
    pub fn normalized(presets: impl IntoIterator<Item = PresetMode>) -> Self {
        let mut out: Vec<PresetMode> = Vec::new();
        for preset in presets {
            if !out.iter().any(|p| p.code == preset.code) {
                out.push(preset);
            }
        }
        out.sort_by_key(|p| p.code);
        Self(out)
    }

    /// Returns `true` if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of presets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates the presets in order.
    pub fn iter(&self) -> impl Iterator<Item = &PresetMode> {
        self.0.iter()
    }

    /// Preset names in order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|p| p.name.clone()).collect()
    }

    /// Looks up the wire code for a name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidChoice`] when the name is not in the list.
    pub fn code_of(&self, name: &str) -> Result<i64, ValueError> {
        let wanted = name.trim().to_lowercase();
        self.0
            .iter()
            .find(|p| p.name == wanted)
            .map(|p| p.code)
            .ok_or_else(|| ValueError::invalid_choice(name, self.names()))
    }

    /// Looks up the name for a wire code.
    #[must_use]
    pub fn name_of(&self, code: i64) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.code == code)
            .map(|p| p.name.as_str())
    }
}

impl FromIterator<PresetMode> for PresetList {
    fn from_iter<T: IntoIterator<Item = PresetMode>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
