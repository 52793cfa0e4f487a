// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing entry point tying the cloud client, the device registry and
//! the command stream together.

mod config;

pub use config::SessionConfig;

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde_json::Value;

use crate::cloud::{CloudApi, CloudClient, HttpApi, Region};
use crate::device::Device;
use crate::error::{Error, Result};
use crate::registry::DeviceRegistry;
use crate::transport::{CommandQueue, CommandSender, FrameHandler, Transport};

/// One logged-in account and its devices.
///
/// # Lifecycle
///
/// 1. [`login`](Self::login) obtains the bearer and the account region.
/// 2. [`load_devices`](Self::load_devices) builds the device registry and
///    applies each device's initial state.
/// 3. [`start_monitoring`](Self::start_monitoring) opens the command stream;
///    deltas update devices and setter commands flow out.
/// 4. [`stop_monitoring`](Self::stop_monitoring) closes it.
///
/// # Examples
///
/// ```no_run
/// use dreo_lib::{Session, SessionConfig};
///
/// #[tokio::main]
/// async fn main() -> dreo_lib::Result<()> {
///     let session = Session::new(SessionConfig::new("me@example.com", "secret"))?;
///     session.login().await?;
///     session.load_devices().await?;
///     session.start_monitoring()?;
///
///     for device in session.devices() {
///         println!("{} ({})", device.name(), device.model());
///         device.on_change(|change| println!("changed: {:?}", change.attributes));
///     }
///
///     if let Some(fan) = session.devices().first() {
///         fan.set_power(true)?;
///     }
///
///     session.stop_monitoring().await;
///     Ok(())
/// }
/// ```
pub struct Session<A: CloudApi = HttpApi> {
    config: SessionConfig,
    cloud: CloudClient<A>,
    registry: Arc<RwLock<DeviceRegistry>>,
    queue: Arc<CommandQueue>,
    transport: Mutex<Option<Transport>>,
}

impl Session<HttpApi> {
    /// Creates a session that talks to the vendor cloud over HTTPS.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: SessionConfig) -> Result<Self> {
        let api = HttpApi::new(config.timeout())?;
        Ok(Self::with_api(config, api))
    }
}

impl<A: CloudApi> Session<A> {
    /// Creates a session over any REST carrier, e.g. a
    /// [`ReplayApi`](crate::cloud::ReplayApi).
    #[must_use]
    pub fn with_api(config: SessionConfig, api: A) -> Self {
        let mut cloud = CloudClient::new(api)
            .with_region(config.region())
            .with_redactor(config.redactor());
        if let Some(base) = config.base_url() {
            cloud = cloud.with_base_url(base);
        }
        let queue = Arc::new(CommandQueue::new(config.redactor()));
        Self {
            config,
            cloud,
            registry: Arc::new(RwLock::new(DeviceRegistry::new())),
            queue,
            transport: Mutex::new(None),
        }
    }

    // ========== Account ==========

    /// Logs in with the configured credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthFailed`] if the credentials are rejected.
    pub async fn login(&self) -> Result<()> {
        self.cloud
            .login(self.config.email(), self.config.password())
            .await
    }

    /// Returns `true` once logged in.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.cloud.is_logged_in()
    }

    /// Account region; reported by login.
    #[must_use]
    pub fn region(&self) -> Region {
        self.cloud.region()
    }

    /// The REST client.
    pub fn cloud(&self) -> &CloudClient<A> {
        &self.cloud
    }

    /// Session settings.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ========== Devices ==========

    /// Lists the account's devices and fetches their initial state.
    ///
    /// Calling it again rebuilds the registry; devices obtained earlier stop
    /// receiving stream updates. A device whose state cannot be fetched is
    /// kept with an empty state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] before login and
    /// [`Error::ListUnavailable`] if the device list cannot be fetched.
    pub async fn load_devices(&self) -> Result<()> {
        let records = self.cloud.fetch_devices().await?;
        let sender: Arc<dyn CommandSender> = self.queue.clone();

        let mut registry = DeviceRegistry::new();
        for record in records {
            let Some(device) = registry.insert(record, Arc::clone(&sender)) else {
                continue;
            };
            device.set_host_temperature_unit(self.config.temperature_unit());
            match self.cloud.fetch_state(device.serial_number()).await {
                Ok(snapshot) => device.apply_state(&snapshot),
                Err(e) => tracing::warn!(
                    serial = %device.serial_number(),
                    error = %e,
                    "initial state unavailable"
                ),
            }
            tracing::info!(
                serial = %device.serial_number(),
                model = %device.model(),
                family = %device.family(),
                "device loaded"
            );
        }

        let count = registry.len();
        *self.registry.write() = registry;
        tracing::info!(count, "device registry ready");
        Ok(())
    }

    /// Devices in listing order.
    #[must_use]
    pub fn devices(&self) -> Vec<Arc<Device>> {
        self.registry.read().devices()
    }

    /// Looks up a device by serial number.
    #[must_use]
    pub fn device(&self, serial: &str) -> Option<Arc<Device>> {
        self.registry.read().get(serial).cloned()
    }

    // ========== Settings ==========

    /// Reads a per-device setting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] for an unknown serial number and
    /// [`Error::SettingUnavailable`] if the call fails.
    pub async fn get_setting(&self, serial: &str, data_key: &str) -> Result<Value> {
        self.require_device(serial)?;
        self.cloud.get_setting(serial, data_key).await
    }

    /// Writes a per-device setting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] for an unknown serial number and
    /// [`Error::SettingUnavailable`] if the call fails.
    pub async fn set_setting(&self, serial: &str, data_key: &str, value: Value) -> Result<()> {
        self.require_device(serial)?;
        self.cloud.set_setting(serial, data_key, value).await
    }

    fn require_device(&self, serial: &str) -> Result<()> {
        if self.registry.read().get(serial).is_some() {
            Ok(())
        } else {
            Err(Error::DeviceNotFound(serial.to_string()))
        }
    }

    // ========== Monitoring ==========

    /// Opens the command stream on the current tokio runtime.
    ///
    /// Does nothing if monitoring is already running.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] before login.
    pub fn start_monitoring(&self) -> Result<()> {
        let token = self.cloud.token().ok_or(Error::NotAuthenticated)?;
        let mut slot = self.transport.lock();
        if slot.as_ref().is_some_and(|t| !t.is_stopped()) {
            tracing::debug!("monitoring already running");
            return Ok(());
        }

        let endpoint = self
            .config
            .transport()
            .endpoint()
            .map_or_else(|| self.region().ws_endpoint(), str::to_string);
        if let Some(previous) = slot.take() {
            previous.stop();
        }

        *slot = Some(Transport::start(
            endpoint,
            token,
            self.config.transport().clone(),
            Arc::clone(&self.queue),
            frame_handler(Arc::clone(&self.registry)),
            self.config.redactor(),
        ));
        Ok(())
    }

    /// Closes the command stream and waits for its worker to finish.
    pub async fn stop_monitoring(&self) {
        let transport = self.transport.lock().take();
        if let Some(transport) = transport {
            transport.stop();
            transport.join().await;
        }
    }

    /// Returns `true` while the command stream worker is active.
    #[must_use]
    pub fn is_monitoring(&self) -> bool {
        self.transport
            .lock()
            .as_ref()
            .is_some_and(|t| !t.is_stopped())
    }

    /// Forces the open stream closed so the worker reconnects.
    #[doc(hidden)]
    pub fn testonly_interrupt_stream(&self) {
        if let Some(transport) = self.transport.lock().as_ref() {
            transport.testonly_interrupt();
        }
    }
}

/// Applies each delta frame to its device.
///
/// Listeners may call back into the session, so the registry lock is
/// released before the frame is applied.
fn frame_handler(registry: Arc<RwLock<DeviceRegistry>>) -> FrameHandler {
    Arc::new(move |frame| {
        let device = registry.read().route(&frame);
        if let Some(device) = device {
            device.apply_delta(&frame.reported);
        }
    })
}

impl<A: CloudApi> std::fmt::Debug for Session<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("logged_in", &self.is_logged_in())
            .field("devices", &self.registry.read().len())
            .field("monitoring", &self.is_monitoring())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::{REPLAY_TOKEN, ReplayApi};
    use crate::codec::DeltaFrame;

    fn replay_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("get_devices.json"),
            r#"{"code":0,"data":{"list":[
                {"deviceId":1,"sn":"FAN1","model":"DR-HTF005S","deviceName":"Tower"},
                {"deviceId":2,"sn":"FAN1","model":"DR-HTF005S"},
                {"deviceId":3,"sn":"HTR1","model":"DR-HSH004S"}
            ]}}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("get_device_state_FAN1.json"),
            r#"{"code":0,"data":{"mixed":{
                "poweron":{"state":true},
                "windlevel":{"state":3}
            }}}"#,
        )
        .unwrap();
        dir
    }

    #[tokio::test]
    async fn replay_session_loads_devices() {
        let dir = replay_dir();
        let session = Session::with_api(
            SessionConfig::new("me@example.com", "pw"),
            ReplayApi::new(dir.path()),
        );
        session.login().await.unwrap();
        assert_eq!(session.cloud().token().as_deref(), Some(REPLAY_TOKEN));
        assert_eq!(session.region(), Region::Us);

        session.load_devices().await.unwrap();
        let devices = session.devices();
        assert_eq!(devices.len(), 2);

        let fan = session.device("FAN1").unwrap();
        assert_eq!(fan.name(), "Tower");
        assert_eq!(fan.raw("windlevel"), Some(serde_json::json!(3)));

        // missing state file leaves the device empty but present
        let heater = session.device("HTR1").unwrap();
        assert!(heater.state().is_empty());
    }

    #[tokio::test]
    async fn load_before_login_is_refused() {
        let dir = replay_dir();
        let session = Session::with_api(
            SessionConfig::new("me@example.com", "pw"),
            ReplayApi::new(dir.path()),
        );
        assert!(matches!(
            session.load_devices().await,
            Err(Error::NotAuthenticated)
        ));
        assert!(matches!(
            session.start_monitoring(),
            Err(Error::NotAuthenticated)
        ));
        assert!(!session.is_monitoring());
    }

    #[tokio::test]
    async fn settings_require_known_device() {
        let dir = replay_dir();
        let session = Session::with_api(
            SessionConfig::new("me@example.com", "pw"),
            ReplayApi::new(dir.path()),
        );
        session.login().await.unwrap();
        session.load_devices().await.unwrap();

        assert!(matches!(
            session.get_setting("NOPE", "k").await,
            Err(Error::DeviceNotFound(_))
        ));
        session
            .set_setting("FAN1", "k", serde_json::json!(1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn listeners_run_without_the_registry_lock() {
        let dir = replay_dir();
        let session = Session::with_api(
            SessionConfig::new("me@example.com", "pw"),
            ReplayApi::new(dir.path()),
        );
        session.login().await.unwrap();
        session.load_devices().await.unwrap();

        let writable = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&writable);
        let registry = Arc::clone(&session.registry);
        session.device("FAN1").unwrap().on_change(move |_| {
            seen.lock().push(registry.try_write().is_some());
        });

        let handler = frame_handler(Arc::clone(&session.registry));
        handler(DeltaFrame::parse(r#"{"devicesn":"FAN1","reported":{"windlevel":7}}"#).unwrap());

        assert_eq!(*writable.lock(), [true]);
        assert_eq!(session.device("FAN1").unwrap().fan_speed(), Some(7));
    }

    #[tokio::test]
    async fn host_unit_is_applied_to_devices() {
        let dir = replay_dir();
        let session = Session::with_api(
            SessionConfig::new("me@example.com", "pw")
                .with_temperature_unit(crate::types::TemperatureUnit::Celsius),
            ReplayApi::new(dir.path()),
        );
        session.login().await.unwrap();
        session.load_devices().await.unwrap();
        assert_eq!(
            session.device("HTR1").unwrap().host_temperature_unit(),
            Some(crate::types::TemperatureUnit::Celsius)
        );
    }
}
