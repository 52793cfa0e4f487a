// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device registry.
//!
//! Turns listing records into [`Device`] instances and indexes them by
//! serial number for stream dispatch. A model's capabilities come from the
//! [`catalog`] first, then from the firmware descriptor via [`discovery`],
//! and otherwise the device is created as [`DeviceFamily::Unknown`] with
//! nothing declared.

pub mod catalog;
pub mod discovery;

pub use catalog::{DeviceFamily, ModelSpec};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::codec::{DeltaFrame, DeviceRecord};
use crate::device::Device;
use crate::transport::CommandSender;

/// Resolves the capability descriptor of a listing record.
#[must_use]
pub fn resolve(record: &DeviceRecord) -> ModelSpec {
    if let Some(spec) = catalog::lookup(&record.model) {
        return spec.clone();
    }
    if let Some(spec) = discovery::discover(&record.model, record.controls_conf.as_ref()) {
        tracing::info!(
            model = %record.model,
            family = %spec.family,
            "model not in catalog, using firmware descriptor"
        );
        return spec;
    }
    tracing::warn!(model = %record.model, "unknown model, no capabilities declared");
    ModelSpec::new(DeviceFamily::Unknown)
}

/// Devices of one account, in listing order.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: Vec<Arc<Device>>,
    by_serial: HashMap<String, usize>,
    device_ids: HashSet<String>,
}

impl DeviceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a device from a listing record and registers it.
    ///
    /// Returns `None` and logs a warning if the serial number or device id
    /// is already registered; the earlier entry is kept.
    pub fn insert(
        &mut self,
        record: DeviceRecord,
        sender: Arc<dyn CommandSender>,
    ) -> Option<Arc<Device>> {
        if self.by_serial.contains_key(&record.sn) {
            tracing::warn!(serial = %record.sn, "duplicate serial number in device list, dropping");
            return None;
        }
        if self.device_ids.contains(&record.device_id) {
            tracing::warn!(
                serial = %record.sn,
                device_id = %record.device_id,
                "duplicate device id in device list, dropping"
            );
            return None;
        }

        let spec = resolve(&record);
        self.by_serial.insert(record.sn.clone(), self.devices.len());
        self.device_ids.insert(record.device_id.clone());
        let device = Arc::new(Device::new(record, spec, sender));
        self.devices.push(Arc::clone(&device));
        Some(device)
    }

    /// Looks up a device by serial number.
    #[must_use]
    pub fn get(&self, serial: &str) -> Option<&Arc<Device>> {
        self.by_serial.get(serial).map(|&index| &self.devices[index])
    }

    /// Devices in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Device>> {
        self.devices.iter()
    }

    /// Clones the device handles in listing order.
    #[must_use]
    pub fn devices(&self) -> Vec<Arc<Device>> {
        self.devices.clone()
    }

    /// Number of registered devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns `true` if no device is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Resolves the device a delta frame is addressed to.
    ///
    /// The handle is cloned so the frame can be applied after the registry
    /// lock is released.
    #[must_use]
    pub fn route(&self, frame: &DeltaFrame) -> Option<Arc<Device>> {
        let device = self.get(&frame.devicesn).cloned();
        if device.is_none() {
            tracing::debug!(serial = %frame.devicesn, "frame for unknown device");
        }
        device
    }
}
