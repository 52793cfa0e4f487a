// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Notification passed to device listeners.

/// Where a state mutation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeOrigin {
    /// Initial REST state fetch.
    Snapshot,
    /// Delta frame pushed by the cloud.
    Delta,
    /// Optimistic update by a local setter.
    Local,
}

/// One successful state mutation of one device.
///
/// Listeners receive this after the new values are already stored, so
/// reading the device from inside a listener observes every attribute the
/// mutation carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    /// Serial number of the device.
    pub serial: String,
    /// Wire symbols that were written, in frame order.
    pub attributes: Vec<String>,
    /// Source of the mutation.
    pub origin: ChangeOrigin,
}

impl StateChange {
    /// Creates a change notification.
    #[must_use]
    pub fn new(serial: impl Into<String>, attributes: Vec<String>, origin: ChangeOrigin) -> Self {
        Self {
            serial: serial.into(),
            attributes,
            origin,
        }
    }

    /// Returns `true` if the mutation wrote `key`.
    #[must_use]
    pub fn touches(&self, key: &str) -> bool {
        self.attributes.iter().any(|a| a == key)
    }
}
