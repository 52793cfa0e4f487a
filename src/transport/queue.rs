// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thread-safe hand-off from device setters to the transport worker.

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use super::CommandSender;
use crate::codec::{ControlFrame, Redactor};

/// Wraps attribute writes in control frames and queues them for the
/// transport worker.
///
/// While no worker is attached (before monitoring starts, or after it
/// stops) commands are logged and dropped.
#[derive(Debug, Default)]
pub struct CommandQueue {
    outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
    redactor: Redactor,
}

impl CommandQueue {
    /// Creates a detached queue.
    #[must_use]
    pub fn new(redactor: Redactor) -> Self {
        Self {
            outbound: Mutex::new(None),
            redactor,
        }
    }

    /// Connects the queue to a worker's outbound channel.
    pub(crate) fn attach(&self, outbound: mpsc::UnboundedSender<String>) {
        *self.outbound.lock() = Some(outbound);
    }

    /// Disconnects the queue only if it still feeds `outbound`.
    ///
    /// A newer worker that already re-attached the queue keeps it.
    pub(crate) fn detach_from(&self, outbound: &mpsc::UnboundedSender<String>) {
        let mut guard = self.outbound.lock();
        if guard.as_ref().is_some_and(|tx| tx.same_channel(outbound)) {
            guard.take();
        }
    }

    /// Returns `true` while a worker is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.outbound
            .lock()
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }
}

impl CommandSender for CommandQueue {
    fn send_command(&self, serial: &str, params: Map<String, Value>) {
        let text = match ControlFrame::new(serial, params).to_text() {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(serial = %serial, error = %e, "failed to encode command");
                return;
            }
        };
        let guard = self.outbound.lock();
        let Some(tx) = guard.as_ref() else {
            tracing::warn!(serial = %serial, "transport not running, dropping command");
            return;
        };
        tracing::debug!(frame = %self.redactor.redact(&text), "queueing command");
        if tx.send(text).is_err() {
            tracing::warn!(serial = %serial, "transport stopped, dropping command");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params() -> Map<String, Value> {
        json!({"windlevel": 6}).as_object().cloned().unwrap()
    }

    #[test]
    fn detached_queue_drops_commands() {
        let queue = CommandQueue::default();
        assert!(!queue.is_attached());
        queue.send_command("SN1", params());
    }

    #[test]
    fn attached_queue_forwards_control_frames() {
        let queue = CommandQueue::new(Redactor::new(true));
        let (tx, mut rx) = mpsc::unbounded_channel();
        queue.attach(tx.clone());
        assert!(queue.is_attached());

        queue.send_command("SN1", params());
        let text = rx.try_recv().unwrap();
        let frame: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(frame["devicesn"], "SN1");
        assert_eq!(frame["method"], "control");
        assert_eq!(frame["params"], json!({"windlevel": 6}));
        assert!(frame["timestamp"].is_string());

        queue.detach_from(&tx);
        queue.send_command("SN1", params());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn stale_worker_does_not_detach_its_successor() {
        let queue = CommandQueue::default();
        let (old_tx, _old_rx) = mpsc::unbounded_channel();
        let (new_tx, mut new_rx) = mpsc::unbounded_channel();

        queue.attach(old_tx.clone());
        queue.attach(new_tx.clone());
        queue.detach_from(&old_tx);
        assert!(queue.is_attached());

        queue.send_command("SN1", params());
        assert!(new_rx.try_recv().is_ok());

        queue.detach_from(&new_tx);
        assert!(!queue.is_attached());
    }
}
