// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `dreo_lib` - A Rust library to observe and control Dreo appliances.
//!
//! The library logs into the vendor cloud over REST, lists the account's
//! devices, builds a typed model for each of them and keeps those models in
//! sync over a long-lived websocket stream that also carries commands.
//!
//! # Supported Families
//!
//! - **Fans**: tower, pedestal, air circulator and ceiling fans
//! - **Climate**: space heaters and portable air conditioners
//! - **Air quality**: purifiers, humidifiers, dehumidifiers and
//!   evaporative coolers
//! - **Kitchen**: chef makers (power only)
//!
//! Unknown models are still created; their capabilities are derived from
//! the descriptor the firmware reports, if any.
//!
//! # Quick Start
//!
//! ```no_run
//! use dreo_lib::{Session, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> dreo_lib::Result<()> {
//!     let session = Session::new(SessionConfig::new("me@example.com", "secret"))?;
//!     session.login().await?;
//!     session.load_devices().await?;
//!     session.start_monitoring()?;
//!
//!     for device in session.devices() {
//!         if device.supports("windlevel") {
//!             device.set_fan_speed(4)?;
//!         }
//!     }
//!
//!     session.stop_monitoring().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Listening for Changes
//!
//! ```no_run
//! # async fn example(session: dreo_lib::Session) {
//! for device in session.devices() {
//!     device.on_change(|change| {
//!         println!("{} changed {:?}", change.serial, change.attributes);
//!     });
//! }
//! # }
//! ```
//!
//! ## Offline Replay
//!
//! ```no_run
//! use dreo_lib::cloud::ReplayApi;
//! use dreo_lib::{Session, SessionConfig};
//!
//! # async fn example() -> dreo_lib::Result<()> {
//! let session = Session::with_api(
//!     SessionConfig::new("me@example.com", "unused"),
//!     ReplayApi::new("./captures"),
//! );
//! session.login().await?;
//! session.load_devices().await?;
//! # Ok(())
//! # }
//! ```

pub mod cloud;
pub mod codec;
pub mod device;
pub mod error;
pub mod registry;
pub mod session;
pub mod state;
pub mod subscription;
pub mod transport;
pub mod types;

pub use cloud::{CloudApi, CloudClient, HttpApi, Region, ReplayApi};
pub use device::{Device, Property};
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
pub use registry::{DeviceFamily, DeviceRegistry, ModelSpec};
pub use session::{Session, SessionConfig};
pub use state::{ChangeOrigin, StateChange};
pub use subscription::SubscriptionId;
pub use transport::TransportConfig;
pub use types::{
    AcPreset, CruiseConfig, FixedConfig, HeaterMode, HvacMode, OscillationMode, RgbThreshold,
    TemperatureUnit,
};
