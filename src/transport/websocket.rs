// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Websocket worker: connect, heartbeat, receive, send, reconnect.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;

use super::{CommandQueue, TransportConfig};
use crate::codec::{self, DeltaFrame, HEARTBEAT, Redactor};
use crate::error::ProtocolError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Consumer of inbound delta frames.
///
/// Called from the worker task, one frame at a time, in stream order.
pub type FrameHandler = Arc<dyn Fn(DeltaFrame) + Send + Sync>;

/// State shared by the worker tasks and the handle.
struct Shared {
    endpoint: String,
    token: String,
    config: TransportConfig,
    redactor: Redactor,
    /// Write half of the open stream; the lock serializes every send.
    sink: tokio::sync::Mutex<Option<WsSink>>,
    stop: CancellationToken,
    /// Cancelled to drop the current connection only.
    interrupt: parking_lot::Mutex<CancellationToken>,
    attempts: AtomicU64,
    running: AtomicBool,
}

/// Handle to a running command stream.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use dreo_lib::transport::{CommandQueue, Transport, TransportConfig};
///
/// # async fn example() {
/// let queue = Arc::new(CommandQueue::default());
/// let transport = Transport::start(
///     "wss://wsb-us.dreo-cloud.com/websocket",
///     "access-token",
///     TransportConfig::default(),
///     Arc::clone(&queue),
///     Arc::new(|frame| println!("{} changed", frame.devicesn)),
///     Default::default(),
/// );
///
/// // ... later
/// transport.stop();
/// transport.join().await;
/// # }
/// ```
pub struct Transport {
    shared: Arc<Shared>,
    queue: Arc<CommandQueue>,
    /// Sender this transport attached to `queue`.
    outbound: mpsc::UnboundedSender<String>,
    tasks: parking_lot::Mutex<Vec<JoinHandle<()>>>,
}

impl Transport {
    /// Spawns the worker on the current tokio runtime and attaches `queue`
    /// to it.
    ///
    /// Returns immediately; the first connection attempt happens in the
    /// background.
    pub fn start(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        config: TransportConfig,
        queue: Arc<CommandQueue>,
        on_frame: FrameHandler,
        redactor: Redactor,
    ) -> Self {
        let stop = CancellationToken::new();
        let shared = Arc::new(Shared {
            endpoint: endpoint.into(),
            token: token.into(),
            config,
            redactor,
            sink: tokio::sync::Mutex::new(None),
            interrupt: parking_lot::Mutex::new(stop.child_token()),
            stop,
            attempts: AtomicU64::new(0),
            running: AtomicBool::new(true),
        });

        let (tx, rx) = mpsc::unbounded_channel();
        queue.attach(tx.clone());

        let worker = tokio::spawn(run(Arc::clone(&shared), on_frame));
        let pump = tokio::spawn(pump(Arc::clone(&shared), rx));

        Self {
            shared,
            queue,
            outbound: tx,
            tasks: parking_lot::Mutex::new(vec![worker, pump]),
        }
    }

    /// Requests shutdown. Idempotent; callable from any thread.
    ///
    /// The worker exits at its next opportunity without reopening the
    /// stream. Commands sent afterwards are dropped.
    pub fn stop(&self) {
        if !self.shared.stop.is_cancelled() {
            tracing::info!("stopping command transport");
        }
        self.queue.detach_from(&self.outbound);
        self.shared.stop.cancel();
    }

    /// Waits for the worker tasks to finish.
    pub async fn join(&self) {
        let tasks: Vec<_> = self.tasks.lock().drain(..).collect();
        for task in tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "transport task failed");
            }
        }
    }

    /// Returns `true` until the worker loop has exited.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Returns `true` once [`stop`](Self::stop) has been called or the
    /// worker gave up reconnecting.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.shared.stop.is_cancelled()
    }

    /// Number of connection attempts made so far.
    #[must_use]
    pub fn connection_attempts(&self) -> u64 {
        self.shared.attempts.load(Ordering::SeqCst)
    }

    /// Forces the current stream closed, leaving reconnection to the worker.
    #[doc(hidden)]
    pub fn testonly_interrupt(&self) {
        self.shared.interrupt.lock().cancel();
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("endpoint", &self.shared.endpoint)
            .field("running", &self.is_running())
            .field("attempts", &self.connection_attempts())
            .finish_non_exhaustive()
    }
}

impl Shared {
    /// Stream URL with the bearer and a fresh timestamp.
    fn url(&self) -> String {
        format!(
            "{}?accessToken={}&timestamp={}",
            self.endpoint,
            urlencoding::encode(&self.token),
            codec::now_ms()
        )
    }

    async fn send_text(&self, text: String) -> Result<(), ProtocolError> {
        let mut guard = self.sink.lock().await;
        let sink = guard.as_mut().ok_or(ProtocolError::ConnectionClosed)?;
        sink.send(Message::Text(text.into())).await?;
        Ok(())
    }
}

// ========== Worker Loop ==========

async fn run(shared: Arc<Shared>, on_frame: FrameHandler) {
    loop {
        if shared.stop.is_cancelled() {
            break;
        }

        let url = shared.url();
        let attempt = shared.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(endpoint = %shared.endpoint, attempt, "connecting command stream");

        let connected = tokio::select! {
            biased;
            () = shared.stop.cancelled() => break,
            result = connect_async(url) => result,
        };

        match connected {
            Ok((stream, _response)) => {
                tracing::info!("command stream connected");
                serve(&shared, stream, &on_frame).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "command stream connection failed");
            }
        }

        if shared.stop.is_cancelled() {
            break;
        }
        if !shared.config.auto_reconnect() {
            tracing::info!("command stream closed, auto-reconnect disabled");
            break;
        }

        tracing::info!(
            delay_ms = u64::try_from(shared.config.reconnect_delay().as_millis()).unwrap_or(u64::MAX),
            "reconnecting command stream"
        );
        tokio::select! {
            biased;
            () = shared.stop.cancelled() => break,
            () = tokio::time::sleep(shared.config.reconnect_delay()) => {}
        }
    }

    // releases the pump when the worker gave up on its own
    shared.stop.cancel();
    shared.running.store(false, Ordering::SeqCst);
    tracing::info!("command transport stopped");
}

/// Runs one connection until it ends, then releases the write half.
async fn serve(shared: &Shared, stream: WsStream, on_frame: &FrameHandler) {
    let (sink, source) = stream.split();
    *shared.sink.lock().await = Some(sink);

    let interrupt = shared.stop.child_token();
    *shared.interrupt.lock() = interrupt.clone();

    tokio::select! {
        biased;
        () = interrupt.cancelled() => {
            tracing::debug!("command stream interrupted");
        }
        result = receive(shared, source, on_frame) => {
            match result {
                Ok(()) => tracing::info!("command stream closed by server"),
                Err(e) => tracing::warn!(error = %e, "command stream receive failed"),
            }
        }
        e = heartbeat(shared) => {
            tracing::warn!(error = %e, "heartbeat failed");
        }
    }

    if let Some(mut sink) = shared.sink.lock().await.take()
        && let Err(e) = sink.close().await
    {
        tracing::debug!(error = %e, "error closing command stream");
    }
}

async fn receive(
    shared: &Shared,
    mut source: WsSource,
    on_frame: &FrameHandler,
) -> Result<(), ProtocolError> {
    while let Some(message) = source.next().await {
        match message? {
            Message::Text(text) => handle_text(shared, text.as_str(), on_frame),
            Message::Close(frame) => {
                tracing::debug!(?frame, "close frame received");
                return Ok(());
            }
            _ => {}
        }
    }
    Ok(())
}

fn handle_text(shared: &Shared, text: &str, on_frame: &FrameHandler) {
    tracing::debug!(frame = %shared.redactor.redact(text), "frame received");
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        tracing::debug!("ignoring non-JSON frame");
        return;
    };
    match DeltaFrame::from_value(value) {
        Ok(frame) => on_frame(frame),
        Err(e) => tracing::debug!(error = %e, "ignoring frame without device"),
    }
}

/// Sends a heartbeat every interval; returns the error that ended it.
async fn heartbeat(shared: &Shared) -> ProtocolError {
    loop {
        tokio::time::sleep(shared.config.heartbeat_interval()).await;
        if let Err(e) = shared.send_text(HEARTBEAT.to_string()).await {
            return e;
        }
        tracing::trace!("heartbeat sent");
    }
}

// ========== Outbound Pump ==========

/// Forwards queued frames to the stream, retrying failed sends.
async fn pump(shared: Arc<Shared>, mut rx: mpsc::UnboundedReceiver<String>) {
    loop {
        let text = tokio::select! {
            biased;
            () = shared.stop.cancelled() => break,
            next = rx.recv() => match next {
                Some(text) => text,
                None => break,
            },
        };
        if !send_with_retry(&shared, text).await {
            break;
        }
    }
}

/// Returns `false` if the transport stopped while retrying.
async fn send_with_retry(shared: &Shared, text: String) -> bool {
    let attempts = shared.config.send_retries();
    for attempt in 1..=attempts {
        match shared.send_text(text.clone()).await {
            Ok(()) => {
                tracing::debug!(frame = %shared.redactor.redact(&text), "command sent");
                return true;
            }
            Err(e) if attempt < attempts => {
                tracing::warn!(error = %e, attempt, "command send failed, retrying");
                tokio::select! {
                    biased;
                    () = shared.stop.cancelled() => return false,
                    () = tokio::time::sleep(shared.config.send_retry_delay()) => {}
                }
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    attempts,
                    frame = %shared.redactor.redact(&text),
                    "command dropped after repeated send failures"
                );
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared(endpoint: &str, token: &str) -> Shared {
        Shared {
            endpoint: endpoint.to_string(),
            token: token.to_string(),
            config: TransportConfig::default(),
            redactor: Redactor::default(),
            sink: tokio::sync::Mutex::new(None),
            interrupt: parking_lot::Mutex::new(CancellationToken::new()),
            stop: CancellationToken::new(),
            attempts: AtomicU64::new(0),
            running: AtomicBool::new(true),
        }
    }

    #[test]
    fn url_carries_encoded_token_and_timestamp() {
        let url = shared("wss://wsb-us.dreo-cloud.com/websocket", "a b/c").url();
        assert!(url.starts_with("wss://wsb-us.dreo-cloud.com/websocket?accessToken=a%20b%2Fc&timestamp="));
        let timestamp = url.rsplit('=').next().unwrap();
        assert!(timestamp.parse::<u64>().is_ok());
    }

    #[tokio::test]
    async fn send_without_connection_is_closed_error() {
        let shared = shared("ws://127.0.0.1:1/websocket", "t");
        let err = shared.send_text("2".to_string()).await.unwrap_err();
        assert!(matches!(err, ProtocolError::ConnectionClosed));
    }

    #[test]
    fn non_json_and_foreign_frames_are_ignored() {
        let shared = shared("ws://localhost/websocket", "t");
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let handler: FrameHandler = Arc::new(move |frame: DeltaFrame| {
            seen_clone.lock().push(frame.devicesn);
        });

        handle_text(&shared, "3", &handler);
        handle_text(&shared, r#"{"method":"ack"}"#, &handler);
        handle_text(&shared, r#"{"devicesn":"SN1","reported":{"poweron":true}}"#, &handler);
        assert_eq!(*seen.lock(), vec!["SN1".to_string()]);
    }
}
