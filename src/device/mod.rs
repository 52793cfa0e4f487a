// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device model.
//!
//! A [`Device`] holds the identity of one appliance, the capability
//! descriptor the registry resolved for it, its reported state and its
//! listeners. Typed getters read the state; typed setters validate, update
//! local state optimistically and hand a `{attr: value}` command to the
//! [`CommandSender`].
//!
//! Which wire symbol backs a property, how its value is validated and
//! whether the model declares it come from one table per family (see the
//! `BINDINGS` constant in each family module). Setters for a property the
//! family table lacks fail with
//! [`DeviceError::UnsupportedCapability`](crate::DeviceError).
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use dreo_lib::codec::DeviceRecord;
//! use dreo_lib::device::Device;
//! use dreo_lib::registry::catalog;
//! use dreo_lib::transport::RecordingSender;
//!
//! let sender = Arc::new(RecordingSender::new());
//! let spec = catalog::lookup("DR-HTF005S").unwrap().clone();
//! let device = Device::new(DeviceRecord::new("SN1", "1", "DR-HTF005S"), spec, sender.clone());
//!
//! device.set_fan_speed(6).unwrap();
//! assert_eq!(device.fan_speed(), Some(6));
//! assert_eq!(sender.sent().len(), 1);
//! assert!(device.set_fan_speed(13).is_err());
//! ```

mod air_conditioner;
pub(crate) mod binding;
mod ceiling_fan;
mod chef_maker;
mod common;
mod cooler;
mod dehumidifier;
mod fan;
mod heater;
mod humidifier;
mod oscillation;
mod purifier;

pub use binding::Property;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};

use crate::codec::DeviceRecord;
use crate::error::{DeviceError, Error, ValueError};
use crate::registry::{DeviceFamily, ModelSpec};
use crate::state::{ChangeOrigin, DeviceState, StateChange, keys};
use crate::subscription::{CallbackRegistry, SubscriptionId};
use crate::transport::CommandSender;
use crate::types::{HeaterMode, TemperatureUnit};

use binding::{Binding, Check};

/// Values the core keeps for callers between writes.
#[derive(Debug, Default)]
struct Slots {
    /// Heater mode restored when power comes back on.
    last_heater_mode: Option<HeaterMode>,
    /// AC setpoint captured when the sleep preset was selected.
    sleep_initial_temperature: Option<i64>,
}

/// One appliance known to the session.
pub struct Device {
    record: DeviceRecord,
    spec: ModelSpec,
    bindings: &'static [Binding],
    declared: BTreeSet<&'static str>,
    state: RwLock<DeviceState>,
    slots: Mutex<Slots>,
    host_unit: RwLock<Option<TemperatureUnit>>,
    callbacks: CallbackRegistry,
    sender: Arc<dyn CommandSender>,
}

impl Device {
    /// Creates a device from its listing record and capability descriptor.
    ///
    /// Commands produced by setters are handed to `sender`.
    #[must_use]
    pub fn new(record: DeviceRecord, spec: ModelSpec, sender: Arc<dyn CommandSender>) -> Self {
        let bindings = binding::table(spec.family);
        let declared = bindings
            .iter()
            .filter(|b| b.is_declared(&spec))
            .map(|b| b.keys[0])
            .collect();
        Self {
            record,
            spec,
            bindings,
            declared,
            state: RwLock::new(DeviceState::new()),
            slots: Mutex::new(Slots::default()),
            host_unit: RwLock::new(None),
            callbacks: CallbackRegistry::new(),
            sender,
        }
    }

    // ========== Identity ==========

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.record.name()
    }

    /// Serial number; the routing key for stream frames.
    #[must_use]
    pub fn serial_number(&self) -> &str {
        &self.record.sn
    }

    /// Opaque device id.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.record.device_id
    }

    /// Model string.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.record.model
    }

    /// Brand, if the listing carried one.
    #[must_use]
    pub fn brand(&self) -> Option<&str> {
        self.record.brand.as_deref()
    }

    /// The listing record this device was built from.
    #[must_use]
    pub fn record(&self) -> &DeviceRecord {
        &self.record
    }

    /// Product family.
    #[must_use]
    pub fn family(&self) -> DeviceFamily {
        self.spec.family
    }

    /// Capability descriptor.
    #[must_use]
    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    // ========== Capabilities ==========

    /// Returns `true` if the attribute has been reported or is declared by
    /// the model.
    ///
    /// Accepts any wire symbol, including ones without a typed accessor.
    #[must_use]
    pub fn supports(&self, attribute: &str) -> bool {
        self.declared.contains(attribute) || self.state.read().contains(attribute)
    }

    /// Returns `true` if the typed accessor for `property` is usable.
    #[must_use]
    pub fn has(&self, property: Property) -> bool {
        self.binding(property)
            .and_then(|b| self.resolve(b))
            .is_some()
    }

    /// Wire symbols declared by the model, whether reported yet or not.
    pub fn declared_attributes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.declared.iter().copied()
    }

    // ========== State ==========

    /// Returns a copy of the reported state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state.read().clone()
    }

    /// Raw value of any attribute, including opaque ones.
    #[must_use]
    pub fn raw(&self, attribute: &str) -> Option<Value> {
        self.state.read().raw(attribute).cloned()
    }

    /// Applies the initial state snapshot.
    ///
    /// Accepts both the REST form `{attr: {state: v, ...}}` and plain
    /// `{attr: v}`. Listeners fire once if anything was stored.
    pub fn apply_state(&self, snapshot: &Map<String, Value>) {
        let entries = snapshot.iter().map(|(key, value)| {
            let scalar = match value {
                Value::Object(entry) if entry.contains_key("state") => {
                    entry.get("state").cloned().unwrap_or(Value::Null)
                }
                other => other.clone(),
            };
            (key, scalar)
        });
        self.apply(entries, ChangeOrigin::Snapshot);
    }

    /// Applies the `reported` mapping of a delta frame.
    ///
    /// Only the listed attributes change, each guarded by its value kind.
    /// Every listener fires exactly once if at least one value was stored.
    /// Returns `true` in that case.
    pub fn apply_delta(&self, reported: &Map<String, Value>) -> bool {
        self.apply(
            reported.iter().map(|(key, value)| (key, value.clone())),
            ChangeOrigin::Delta,
        )
    }

    fn apply<'a>(
        &self,
        entries: impl Iterator<Item = (&'a String, Value)>,
        origin: ChangeOrigin,
    ) -> bool {
        let mut applied = Vec::new();
        {
            let mut state = self.state.write();
            for (key, value) in entries {
                if state.apply(key, value) {
                    applied.push(key.clone());
                } else {
                    tracing::debug!(
                        serial = %self.record.sn,
                        attribute = %key,
                        "ignoring value of unexpected type"
                    );
                }
            }
        }
        if applied.is_empty() {
            return false;
        }
        self.callbacks
            .dispatch(&StateChange::new(&self.record.sn, applied, origin));
        true
    }

    // ========== Listeners ==========

    /// Registers a listener, invoked after every applied mutation.
    pub fn on_change<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.callbacks.on_change(callback)
    }

    /// Removes a listener. Returns `true` if it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.callbacks.len()
    }

    // ========== Commands ==========

    /// Sends raw attribute writes without validation or local update.
    pub fn send_command(&self, params: Map<String, Value>) {
        tracing::debug!(serial = %self.record.sn, ?params, "sending raw command");
        self.sender.send_command(&self.record.sn, params);
    }

    // ========== Temperature Unit ==========

    /// Asserts the unit the host works in.
    pub fn set_host_temperature_unit(&self, unit: Option<TemperatureUnit>) {
        *self.host_unit.write() = unit;
    }

    /// Unit asserted by the host, if any.
    #[must_use]
    pub fn host_temperature_unit(&self) -> Option<TemperatureUnit> {
        *self.host_unit.read()
    }

    /// Unit of the reported temperature, detected from its magnitude.
    #[must_use]
    pub fn temperature_unit(&self) -> Option<TemperatureUnit> {
        self.state
            .read()
            .int(keys::TEMPERATURE)
            .map(TemperatureUnit::detect)
    }

    /// Host unit if asserted, otherwise the detected one, otherwise
    /// Fahrenheit.
    fn effective_unit(&self) -> TemperatureUnit {
        self.host_temperature_unit()
            .or_else(|| self.temperature_unit())
            .unwrap_or(TemperatureUnit::Fahrenheit)
    }

    // ========== Table Access ==========

    fn binding(&self, property: Property) -> Option<&'static Binding> {
        self.bindings.iter().find(|b| b.property == property)
    }

    /// First candidate symbol the device reported, else the declared one.
    fn resolve(&self, binding: &Binding) -> Option<&'static str> {
        let state = self.state.read();
        binding
            .keys
            .iter()
            .copied()
            .find(|key| state.contains(key))
            .or_else(|| {
                binding
                    .keys
                    .iter()
                    .copied()
                    .find(|key| self.declared.contains(key))
            })
    }

    fn key(&self, property: Property) -> Option<&'static str> {
        self.binding(property).and_then(|b| self.resolve(b))
    }

    fn require(&self, property: Property) -> Result<(&'static Binding, &'static str), Error> {
        let binding = self
            .binding(property)
            .filter(|b| b.check != Check::ReadOnly)
            .ok_or_else(|| DeviceError::unsupported(property.as_str()))?;
        let key = self
            .resolve(binding)
            .ok_or_else(|| DeviceError::unsupported(property.as_str()))?;
        Ok((binding, key))
    }

    fn read_bool(&self, property: Property) -> Option<bool> {
        let key = self.key(property)?;
        self.state.read().bool(key)
    }

    fn read_int(&self, property: Property) -> Option<i64> {
        let key = self.key(property)?;
        self.state.read().int(key)
    }

    fn read_text(&self, property: Property) -> Option<String> {
        let key = self.key(property)?;
        self.state.read().text(key).map(str::to_string)
    }

    fn range_of(&self, property: Property) -> Option<crate::types::IntRange> {
        match self.binding(property)?.check {
            Check::Range(limit) => limit.range(&self.spec),
            _ => None,
        }
    }

    // ========== Writes ==========

    fn write_bool(&self, property: Property, on: bool) -> Result<(), Error> {
        let (binding, key) = self.require(property)?;
        if binding.check != Check::Bool {
            return Err(DeviceError::unsupported(property.as_str()).into());
        }
        self.emit(key, Value::Bool(on));
        Ok(())
    }

    fn write_int(&self, property: Property, value: i64) -> Result<(), Error> {
        let (binding, key) = self.require(property)?;
        if let Check::Range(limit) = binding.check
            && let Some(range) = limit.range(&self.spec)
        {
            range.check(value)?;
        }
        self.emit(key, Value::from(value));
        Ok(())
    }

    fn write_preset(&self, property: Property, name: &str) -> Result<(), Error> {
        let (_, key) = self.require(property)?;
        let code = self.spec.presets.code_of(name)?;
        self.emit(key, Value::from(code));
        Ok(())
    }

    /// Writes a value the typed setter has already validated.
    fn write_value(&self, property: Property, value: Value) -> Result<(), Error> {
        let (_, key) = self.require(property)?;
        self.emit(key, value);
        Ok(())
    }

    /// Stores the value locally, notifies listeners, then sends it.
    fn emit(&self, key: &'static str, value: Value) {
        let stored = self.state.write().apply(key, value.clone());
        if stored {
            self.callbacks.dispatch(&StateChange::new(
                &self.record.sn,
                vec![key.to_string()],
                ChangeOrigin::Local,
            ));
        }
        tracing::debug!(serial = %self.record.sn, attribute = key, %value, "sending command");
        let mut params = Map::new();
        params.insert(key.to_string(), value);
        self.sender.send_command(&self.record.sn, params);
    }

    fn invalid_choice(value: &str, choices: &[&str]) -> Error {
        ValueError::invalid_choice(value, choices.iter().copied()).into()
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("serial", &self.record.sn)
            .field("model", &self.record.model)
            .field("family", &self.spec.family)
            .field("state", &*self.state.read())
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}
