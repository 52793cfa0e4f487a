// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state storage.
//!
//! [`DeviceState`] holds the scalar values a device has reported, keyed by
//! wire symbol (see [`keys`]). [`StateChange`] describes one applied
//! mutation and is what listeners receive.
//!
//! # Examples
//!
//! ```
//! use dreo_lib::state::{DeviceState, keys};
//! use serde_json::json;
//!
//! let mut state = DeviceState::new();
//! state.apply(keys::POWER_ON, json!(true));
//!
//! assert_eq!(state.bool(keys::POWER_ON), Some(true));
//! ```

mod attribute;
mod device_state;
mod state_change;

pub use attribute::{AttrKind, keys};
pub use device_state::DeviceState;
pub use state_change::{ChangeOrigin, StateChange};
