// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests of the listener and coordinator against a local
//! WebSocket server.

#![cfg(feature = "websocket")]

use std::sync::Arc;
use std::time::Duration;

use futures_util::SinkExt;
use mystrom_lib::event::{DomainEvent, EventCoordinator};
use mystrom_lib::Bridge;
use mystrom_lib::error::TransportError;
use mystrom_lib::listener::{
    ConnectionState, EventListener, ListenerConfig, Transport, TungsteniteTransport,
};
use mystrom_lib::types::{ActionKind, ComponentKind};
use tokio::net::TcpListener;
use tokio::sync::{Notify, mpsc};
use tokio::time::{Instant, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use url::Url;

const MAC: &str = "A4CF12F0E5D6";
const WAIT: Duration = Duration::from_secs(5);
const RECONNECT: Duration = Duration::from_millis(150);

fn event_json(index: &str, action: &str) -> String {
    format!(r#"{{"mac":"{MAC}","index":{index},"action":{action},"bat":3.1,"temp":21.5,"rh":45}}"#)
}

/// WebSocket server playing one scripted session per accepted connection.
///
/// Each session waits for `release` before sending, then closes. Once the
/// script is exhausted, further connections are reported and dropped.
struct TestServer {
    url: String,
    connections: mpsc::UnboundedReceiver<usize>,
    release: Arc<Notify>,
}

impl TestServer {
    async fn start(sessions: Vec<Vec<Message>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, connections) = mpsc::unbounded_channel();
        let release = Arc::new(Notify::new());
        let gate = Arc::clone(&release);

        tokio::spawn(async move {
            let mut count = 0;
            for messages in sessions {
                let (stream, _) = listener.accept().await.unwrap();
                let _ = tx.send(count);
                count += 1;

                let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
                    continue;
                };
                gate.notified().await;
                for message in messages {
                    if ws.send(message).await.is_err() {
                        break;
                    }
                }
                let _ = ws.close(None).await;
            }

            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                let _ = tx.send(count);
                count += 1;
                drop(stream);
            }
        });

        Self {
            url: format!("ws://{addr}/events"),
            connections,
            release,
        }
    }

    fn config(&self) -> ListenerConfig {
        ListenerConfig::new(&self.url)
            .unwrap()
            .with_reconnect_delay(RECONNECT)
    }

    async fn next_connection(&mut self) -> usize {
        timeout(WAIT, self.connections.recv())
            .await
            .expect("no connection attempt")
            .unwrap()
    }
}

fn collecting_observer(coordinator: &EventCoordinator) -> mpsc::UnboundedReceiver<DomainEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    coordinator.subscribe(move |event| {
        let _ = tx.send(event.clone());
    });
    rx
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<DomainEvent>) -> DomainEvent {
    timeout(WAIT, rx.recv())
        .await
        .expect("no event delivered")
        .unwrap()
}

#[tokio::test]
async fn text_and_binary_frames_reach_observers() {
    let mut server = TestServer::start(vec![vec![
        Message::text(event_json("\"1\"", "\"1\"")),
        Message::binary(event_json("2", "3").into_bytes()),
    ]])
    .await;

    let coordinator = EventCoordinator::new();
    let mut events = collecting_observer(&coordinator);

    let listener = EventListener::new(server.config(), TungsteniteTransport, CancellationToken::new());
    coordinator.attach(&listener);
    listener.start();

    server.next_connection().await;
    server.release.notify_one();

    let first = next_event(&mut events).await;
    assert_eq!(first.mac, MAC);
    assert_eq!(first.component, ComponentKind::Button1);
    assert_eq!(first.action, ActionKind::Single);

    let second = next_event(&mut events).await;
    assert_eq!(second.component, ComponentKind::Button2);
    assert_eq!(second.action, ActionKind::Long);
    assert_eq!(second.humidity, Some(45.0));

    assert_eq!(coordinator.current(), Some(second));
    listener.kill();
}

#[tokio::test]
async fn unknown_codes_are_dropped_without_breaking_the_stream() {
    let mut server = TestServer::start(vec![vec![
        Message::text(event_json("\"9\"", "\"1\"")),
        Message::text("not json at all"),
        Message::text(event_json("\"5\"", "\"28\"")),
    ]])
    .await;

    let coordinator = EventCoordinator::new();
    let mut events = collecting_observer(&coordinator);

    let listener = EventListener::new(server.config(), TungsteniteTransport, CancellationToken::new());
    coordinator.attach(&listener);
    listener.start();

    server.next_connection().await;
    server.release.notify_one();

    let event = next_event(&mut events).await;
    assert_eq!(event.component, ComponentKind::Temperature);
    assert_eq!(event.action, ActionKind::OverValue);
    assert!(events.try_recv().is_err());

    listener.kill();
}

#[tokio::test]
async fn reconnects_after_server_closes() {
    let mut server = TestServer::start(vec![
        vec![Message::text(event_json("\"1\"", "\"2\""))],
        vec![Message::text(event_json("\"3\"", "\"2\""))],
    ])
    .await;

    let coordinator = EventCoordinator::new();
    let mut events = collecting_observer(&coordinator);

    let listener = EventListener::new(server.config(), TungsteniteTransport, CancellationToken::new());
    coordinator.attach(&listener);
    listener.start();

    assert_eq!(server.next_connection().await, 0);
    server.release.notify_one();
    assert_eq!(next_event(&mut events).await.component, ComponentKind::Button1);
    let closed_at = Instant::now();

    assert_eq!(server.next_connection().await, 1);
    assert!(closed_at.elapsed() >= RECONNECT / 2);
    server.release.notify_one();
    assert_eq!(next_event(&mut events).await.component, ComponentKind::Button3);

    listener.kill();
    listener.join().await;
    assert_eq!(listener.state(), ConnectionState::Stopped);
}

#[tokio::test]
async fn no_reconnect_after_kill() {
    let mut server = TestServer::start(vec![vec![Message::text(event_json("1", "1"))]]).await;

    let coordinator = EventCoordinator::new();
    let mut events = collecting_observer(&coordinator);

    let listener = EventListener::new(server.config(), TungsteniteTransport, CancellationToken::new());
    coordinator.attach(&listener);
    listener.start();

    server.next_connection().await;
    listener.kill();
    listener.kill();
    server.release.notify_one();
    listener.join().await;

    tokio::time::sleep(RECONNECT * 4).await;
    assert!(server.connections.try_recv().is_err());
    assert!(events.try_recv().is_err());
    assert_eq!(listener.state(), ConnectionState::Stopped);
}

/// Default transport that reports every connection attempt.
struct CountingTransport {
    attempts: mpsc::UnboundedSender<Instant>,
}

impl Transport for CountingTransport {
    type Stream = <TungsteniteTransport as Transport>::Stream;

    async fn connect(&self, url: &Url) -> Result<Self::Stream, TransportError> {
        let _ = self.attempts.send(Instant::now());
        TungsteniteTransport.connect(url).await
    }
}

#[tokio::test]
async fn unreachable_endpoint_keeps_retrying() {
    // Bind and drop to get a port nobody listens on.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let delay = Duration::from_millis(50);
    let config = ListenerConfig::new(&format!("ws://127.0.0.1:{port}/events"))
        .unwrap()
        .with_reconnect_delay(delay);

    let (tx, mut attempts) = mpsc::unbounded_channel();
    let listener = EventListener::new(
        config,
        CountingTransport { attempts: tx },
        CancellationToken::new(),
    );
    listener.start();

    let mut previous = timeout(WAIT, attempts.recv()).await.unwrap().unwrap();
    for _ in 0..3 {
        let next = timeout(WAIT, attempts.recv()).await.unwrap().unwrap();
        assert!(next - previous >= delay);
        previous = next;
    }

    assert!(!listener.is_stopped());
    listener.kill();
    listener.join().await;
    assert!(attempts.try_recv().is_err());
}

#[tokio::test]
async fn bridge_wires_listener_to_observers() {
    let mut server = TestServer::start(vec![vec![Message::text(event_json("\"4\"", "\"2\""))]]).await;

    let shutdown = CancellationToken::new();
    let bridge = Bridge::start(server.config(), TungsteniteTransport, shutdown.clone());

    let (tx, mut events) = mpsc::unbounded_channel();
    bridge.subscribe(move |event| {
        if event.concerns(MAC, ComponentKind::Button4) {
            let _ = tx.send(event.action);
        }
    });
    let mut latest = bridge.coordinator().watch();

    server.next_connection().await;
    server.release.notify_one();

    let action = timeout(WAIT, events.recv()).await.unwrap().unwrap();
    assert_eq!(action, ActionKind::Double);

    timeout(WAIT, latest.wait_for(Option::is_some))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bridge.current().and_then(|e| e.button_index()), Some(4));

    shutdown.cancel();
    bridge.join().await;
    assert_eq!(bridge.state(), ConnectionState::Stopped);
}
