// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for device state changes.
//!
//! Every device owns a [`CallbackRegistry`]. Listeners are invoked once per
//! applied mutation (initial snapshot, pushed delta, or optimistic local
//! write) in the order they were registered.
//!
//! # Usage
//!
//! ```no_run
//! use dreo_lib::{Session, SessionConfig};
//!
//! # async fn example() -> dreo_lib::Result<()> {
//! let session = Session::new(SessionConfig::new("user@example.com", "secret"))?;
//! session.login().await?;
//! session.load_devices().await?;
//!
//! for device in session.devices() {
//!     let sub_id = device.on_change(|change| {
//!         println!("{} changed {:?}", change.serial, change.attributes);
//!     });
//!     // Later, unsubscribe
//!     device.unsubscribe(sub_id);
//! }
//! # Ok(())
//! # }
//! ```

mod callback;

pub use callback::{CallbackRegistry, SubscriptionId};
