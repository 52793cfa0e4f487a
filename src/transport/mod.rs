// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command transport.
//!
//! Devices never talk to the network directly: a setter hands `{attr: value}`
//! to a [`CommandSender`]. In a live session that sender is the
//! [`CommandQueue`], which wraps the write in a control frame and forwards it
//! to the [`Transport`] worker owning the websocket.
//!
//! The worker keeps one stream open, sends a heartbeat every 15 seconds,
//! delivers every delta frame to a consumer callback in stream order and
//! reconnects after errors or closes unless stopped.

mod config;
mod queue;
mod websocket;

pub use config::{
    DEFAULT_HEARTBEAT_INTERVAL, DEFAULT_RECONNECT_DELAY, DEFAULT_SEND_RETRIES,
    DEFAULT_SEND_RETRY_DELAY, TransportConfig,
};
pub use queue::CommandQueue;
pub use websocket::{FrameHandler, Transport};

use parking_lot::Mutex;
use serde_json::{Map, Value};

/// Sink for attribute writes produced by device setters.
///
/// Sending is fire-and-forget: delivery failures are logged by the
/// implementation and never reported back to the setter.
pub trait CommandSender: Send + Sync {
    /// Queues `params` for the device with serial number `serial`.
    fn send_command(&self, serial: &str, params: Map<String, Value>);
}

/// [`CommandSender`] that records every command in memory.
///
/// Useful for exercising the device model without a connection.
///
/// # Examples
///
/// ```
/// use dreo_lib::transport::{CommandSender, RecordingSender};
/// use serde_json::{Map, json};
///
/// let sender = RecordingSender::new();
/// let mut params = Map::new();
/// params.insert("poweron".into(), json!(true));
/// sender.send_command("SN1", params);
///
/// assert_eq!(sender.sent()[0].0, "SN1");
/// ```
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(String, Map<String, Value>)>>,
}

impl RecordingSender {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<(String, Map<String, Value>)> {
        self.sent.lock().clone()
    }

    /// Forgets every recorded command.
    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

impl CommandSender for RecordingSender {
    fn send_command(&self, serial: &str, params: Map<String, Value>) {
        self.sent.lock().push((serial.to_string(), params));
    }
}
