// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the command stream against a local websocket server.

use std::sync::Arc;
use std::time::Duration;

use dreo_lib::cloud::ReplayApi;
use dreo_lib::codec::DeltaFrame;
use dreo_lib::transport::{CommandQueue, CommandSender, FrameHandler, Transport, TransportConfig};
use dreo_lib::{Session, SessionConfig};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

const TOKEN: &str = "stream-token";
const WAIT: Duration = Duration::from_secs(5);

/// Local websocket server recording handshake URIs and inbound text.
struct TestServer {
    endpoint: String,
    uris: Arc<Mutex<Vec<String>>>,
    received: mpsc::UnboundedReceiver<String>,
}

impl TestServer {
    /// Starts a server that sends `greeting` on every new connection.
    async fn start(greeting: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let uris = Arc::new(Mutex::new(Vec::new()));
        let (tx, received) = mpsc::unbounded_channel();

        let accept_uris = Arc::clone(&uris);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let uris = Arc::clone(&accept_uris);
                let tx = tx.clone();
                let greeting = greeting.clone();
                tokio::spawn(async move {
                    let callback = move |request: &Request,
                                         response: Response|
                          -> Result<Response, ErrorResponse> {
                        uris.lock().push(request.uri().to_string());
                        Ok(response)
                    };
                    let Ok(mut ws) = accept_hdr_async(stream, callback).await else {
                        return;
                    };
                    for text in greeting {
                        if ws.send(Message::text(text)).await.is_err() {
                            return;
                        }
                    }
                    while let Some(Ok(message)) = ws.next().await {
                        if let Message::Text(text) = message {
                            let _ = tx.send(text.as_str().to_string());
                        }
                    }
                });
            }
        });

        Self {
            endpoint: format!("ws://{addr}/websocket"),
            uris,
            received,
        }
    }

    fn connections(&self) -> usize {
        self.uris.lock().len()
    }

    fn uri(&self, index: usize) -> String {
        self.uris.lock()[index].clone()
    }

    /// Next inbound text that is not a heartbeat.
    async fn next_command(&mut self) -> String {
        loop {
            let text = tokio::time::timeout(WAIT, self.received.recv())
                .await
                .expect("command within timeout")
                .expect("server running");
            if text != "2" {
                return text;
            }
        }
    }
}

fn greeting(serial: &str) -> Vec<String> {
    vec![json!({"devicesn": serial, "reported": {"poweron": true}}).to_string()]
}

fn query_value(uri: &str, key: &str) -> Option<String> {
    uri.split_once('?')?
        .1
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.to_string())
}

/// Handler forwarding frames into a channel.
fn frame_channel() -> (FrameHandler, mpsc::UnboundedReceiver<DeltaFrame>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handler: FrameHandler = Arc::new(move |frame| {
        let _ = tx.send(frame);
    });
    (handler, rx)
}

async fn next_frame(frames: &mut mpsc::UnboundedReceiver<DeltaFrame>) -> DeltaFrame {
    tokio::time::timeout(WAIT, frames.recv())
        .await
        .expect("frame within timeout")
        .expect("handler alive")
}

fn fast_config(server: &TestServer) -> TransportConfig {
    TransportConfig::default()
        .with_endpoint(server.endpoint.clone())
        .with_heartbeat_interval(Duration::from_secs(60))
        .with_reconnect_delay(Duration::from_millis(50))
        .with_send_retry_delay(Duration::from_millis(50))
        .with_send_retries(20)
}

/// Polls `condition` until it holds or the wait runs out.
async fn wait_until(condition: impl Fn() -> bool) {
    tokio::time::timeout(WAIT, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition within timeout");
}

fn start(
    server: &TestServer,
    config: TransportConfig,
) -> (
    Transport,
    Arc<CommandQueue>,
    mpsc::UnboundedReceiver<DeltaFrame>,
) {
    let queue = Arc::new(CommandQueue::default());
    let (handler, frames) = frame_channel();
    let transport = Transport::start(
        server.endpoint.clone(),
        TOKEN,
        config,
        Arc::clone(&queue),
        handler,
        Default::default(),
    );
    (transport, queue, frames)
}

// ============================================================================
// Traffic
// ============================================================================

#[tokio::test]
async fn delta_frames_reach_the_handler() {
    let server = TestServer::start(greeting("SN1")).await;
    let (transport, _queue, mut frames) = start(&server, fast_config(&server));

    let frame = next_frame(&mut frames).await;
    assert_eq!(frame.devicesn, "SN1");
    assert_eq!(frame.reported["poweron"], true);

    let uri = server.uri(0);
    assert!(uri.starts_with("/websocket?"));
    assert_eq!(query_value(&uri, "accessToken").as_deref(), Some(TOKEN));

    transport.stop();
    transport.join().await;
}

#[tokio::test]
async fn commands_are_sent_as_control_frames() {
    let mut server = TestServer::start(greeting("SN1")).await;
    let (transport, queue, mut frames) = start(&server, fast_config(&server));
    next_frame(&mut frames).await;

    let params = json!({"windlevel": 6}).as_object().cloned().unwrap();
    queue.send_command("SN1", params);

    let frame: Value = serde_json::from_str(&server.next_command().await).unwrap();
    assert_eq!(frame["devicesn"], "SN1");
    assert_eq!(frame["method"], "control");
    assert_eq!(frame["params"], json!({"windlevel": 6}));

    transport.stop();
    transport.join().await;
}

#[tokio::test]
async fn heartbeat_is_sent() {
    let mut server = TestServer::start(Vec::new()).await;
    let config = fast_config(&server).with_heartbeat_interval(Duration::from_millis(50));
    let (transport, _queue, _frames) = start(&server, config);

    let text = tokio::time::timeout(WAIT, server.received.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(text, "2");

    transport.stop();
    transport.join().await;
}

// ============================================================================
// Reconnect
// ============================================================================

#[tokio::test]
async fn forced_close_reconnects_once_with_fresh_timestamp() {
    let server = TestServer::start(greeting("SN1")).await;
    let (transport, _queue, mut frames) = start(&server, fast_config(&server));
    next_frame(&mut frames).await;
    assert_eq!(server.connections(), 1);

    transport.testonly_interrupt();
    next_frame(&mut frames).await;
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(server.connections(), 2);
    assert_eq!(transport.connection_attempts(), 2);

    let (first, second) = (server.uri(0), server.uri(1));
    assert_eq!(first.split_once('?').unwrap().0, second.split_once('?').unwrap().0);
    assert_eq!(query_value(&first, "accessToken"), query_value(&second, "accessToken"));
    let t0: u64 = query_value(&first, "timestamp").unwrap().parse().unwrap();
    let t1: u64 = query_value(&second, "timestamp").unwrap().parse().unwrap();
    assert!(t1 > t0);

    transport.stop();
    transport.join().await;
    assert!(!transport.is_running());
}

#[tokio::test]
async fn stop_during_close_does_not_reopen() {
    let server = TestServer::start(greeting("SN1")).await;
    let config = fast_config(&server).with_reconnect_delay(Duration::from_millis(200));
    let (transport, queue, mut frames) = start(&server, config);
    next_frame(&mut frames).await;

    transport.testonly_interrupt();
    transport.stop();
    transport.join().await;
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(server.connections(), 1);
    assert!(!transport.is_running());
    assert!(transport.is_stopped());
    assert!(!queue.is_attached());
}

#[tokio::test]
async fn no_reconnect_when_disabled() {
    let server = TestServer::start(greeting("SN1")).await;
    let config = fast_config(&server).with_auto_reconnect(false);
    let (transport, _queue, mut frames) = start(&server, config);
    next_frame(&mut frames).await;

    transport.testonly_interrupt();
    transport.join().await;

    assert!(!transport.is_running());
    assert!(transport.is_stopped());
    assert_eq!(server.connections(), 1);
}

#[tokio::test]
async fn unreachable_endpoint_keeps_retrying_until_stopped() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let queue = Arc::new(CommandQueue::default());
    let (handler, _frames) = frame_channel();
    let transport = Transport::start(
        format!("ws://{addr}/websocket"),
        TOKEN,
        TransportConfig::default().with_reconnect_delay(Duration::from_millis(20)),
        queue,
        handler,
        Default::default(),
    );

    tokio::time::timeout(WAIT, async {
        while transport.connection_attempts() < 3 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    assert!(transport.is_running());

    transport.stop();
    transport.join().await;
    assert!(!transport.is_running());
}

// ============================================================================
// Send Failures
// ============================================================================

#[tokio::test]
async fn command_is_dropped_after_retries_and_pump_keeps_serving() {
    let mut server = TestServer::start(greeting("SN1")).await;
    let config = fast_config(&server)
        .with_send_retries(3)
        .with_send_retry_delay(Duration::from_millis(50))
        .with_reconnect_delay(Duration::from_secs(1));
    let (transport, queue, mut frames) = start(&server, config);
    next_frame(&mut frames).await;

    transport.testonly_interrupt();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(server.connections(), 1);

    // every attempt lands while the stream is down
    queue.send_command("SN1", json!({"windlevel": 1}).as_object().cloned().unwrap());

    wait_until(|| server.connections() == 2).await;
    next_frame(&mut frames).await;
    queue.send_command("SN1", json!({"windlevel": 2}).as_object().cloned().unwrap());

    let frame: Value = serde_json::from_str(&server.next_command().await).unwrap();
    assert_eq!(frame["params"], json!({"windlevel": 2}));

    transport.stop();
    transport.join().await;
}

// ============================================================================
// Session Restart
// ============================================================================

#[tokio::test]
async fn commands_flow_after_monitoring_restart() {
    let mut server = TestServer::start(greeting("FAN1")).await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("get_devices.json"),
        r#"{"code":0,"data":{"list":[{"deviceId":1,"sn":"FAN1","model":"DR-HTF005S"}]}}"#,
    )
    .unwrap();

    let config = SessionConfig::new("me@example.com", "pw")
        .with_transport(fast_config(&server).with_auto_reconnect(false));
    let session = Session::with_api(config, ReplayApi::new(dir.path()));
    session.login().await.unwrap();
    session.load_devices().await.unwrap();

    session.start_monitoring().unwrap();
    wait_until(|| server.connections() == 1).await;

    session.testonly_interrupt_stream();
    wait_until(|| !session.is_monitoring()).await;

    session.start_monitoring().unwrap();
    assert!(session.is_monitoring());
    wait_until(|| server.connections() == 2).await;

    session.device("FAN1").unwrap().set_power(true).unwrap();
    let frame: Value = serde_json::from_str(&server.next_command().await).unwrap();
    assert_eq!(frame["devicesn"], "FAN1");
    assert_eq!(frame["params"], json!({"poweron": true}));

    session.stop_monitoring().await;
    assert!(!session.is_monitoring());
}
