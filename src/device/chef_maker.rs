// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Chef makers: power only.

use super::binding::{Binding, Check, Declare, Property};
use crate::state::keys;

pub(crate) const BINDINGS: &[Binding] =
    &[Binding::new(Property::Power, &[keys::POWER_ON], Check::Bool).declared(Declare::Always)];

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::codec::DeviceRecord;
    use crate::device::{Device, Property};
    use crate::registry::catalog;
    use crate::transport::RecordingSender;

    #[test]
    fn only_power_is_available() {
        let sender = Arc::new(RecordingSender::new());
        let spec = catalog::lookup("DR-KCM001S").unwrap().clone();
        let device = Device::new(DeviceRecord::new("KC1", "1", "DR-KCM001S"), spec, sender.clone());

        device.turn_on().unwrap();
        assert!(device.has(Property::Power));
        assert!(!device.has(Property::FanSpeed));
        assert!(device.set_fan_speed(1).is_err());
        assert_eq!(sender.sent().len(), 1);
    }
}
