// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Self-healing WebSocket event listener.
//!
//! [`EventListener`] keeps one connection to the device's event endpoint open
//! and hands every text or binary message, undecoded, to its callbacks. When
//! the connection cannot be established or drops, it waits a fixed delay
//! and tries again, forever, until [`EventListener::kill`] is called.
//!
//! ```text
//! Disconnected ─start─▶ Connecting ─ok─▶ Connected
//!                          ▲   │ fail        │ close / error / end
//!                          │   ▼             ▼
//!                          └── ReconnectWait ◀┘
//!
//! kill() from any state ─▶ Stopped (terminal)
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use mystrom_lib::listener::{EventListener, ListenerConfig, TungsteniteTransport};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> mystrom_lib::Result<()> {
//! let config = ListenerConfig::new("ws://192.168.1.10:8765/events")?;
//! let listener = EventListener::new(config, TungsteniteTransport, CancellationToken::new());
//!
//! listener.subscribe(|frame| async move {
//!     println!("received {} bytes", frame.len());
//! });
//! listener.start();
//!
//! // ... later
//! listener.kill();
//! # Ok(())
//! # }
//! ```

mod config;
mod transport;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::future::BoxFuture;
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

pub use config::ListenerConfig;
pub use transport::{Transport, TungsteniteTransport};

pub use crate::types::RawFrame;
use crate::error::TransportError;

/// Connection lifecycle of an [`EventListener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Created but not started.
    Disconnected,
    /// A connection attempt is in progress.
    Connecting,
    /// Connected and reading messages.
    Connected,
    /// Waiting before the next connection attempt.
    ReconnectWait,
    /// Killed. No further connection attempts happen.
    Stopped,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::ReconnectWait => "reconnect-wait",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Type alias for frame callbacks.
type FrameCallback = Arc<dyn Fn(RawFrame) -> BoxFuture<'static, ()> + Send + Sync>;

struct Shared<T> {
    config: ListenerConfig,
    transport: T,
    callbacks: RwLock<Vec<FrameCallback>>,
    state: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
}

impl<T> Shared<T> {
    /// Moves to `next` unless already stopped.
    fn set_state(&self, next: ConnectionState) {
        self.state.send_if_modified(|state| {
            if *state == ConnectionState::Stopped || *state == next {
                return false;
            }
            tracing::trace!(from = %state, to = %next, "Listener state change");
            *state = next;
            true
        });
    }

    /// Hands a frame to every callback in turn, awaiting each.
    async fn dispatch(&self, frame: RawFrame) {
        let callbacks: Vec<FrameCallback> = self.callbacks.read().clone();

        tracing::debug!(
            callbacks = callbacks.len(),
            len = frame.len(),
            "New message, distributing to callbacks"
        );

        for callback in callbacks {
            callback(frame.clone()).await;
        }
    }
}

/// Listener for the device's WebSocket event stream.
///
/// Owns the single connection and the task that maintains it. Dropping the
/// listener stops the task.
pub struct EventListener<T: Transport = TungsteniteTransport> {
    shared: Arc<Shared<T>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Transport> EventListener<T> {
    /// Creates a listener. Nothing connects until [`EventListener::start`].
    ///
    /// Cancelling `shutdown` stops the listener like [`EventListener::kill`];
    /// `kill` does not cancel `shutdown` itself.
    #[must_use]
    pub fn new(config: ListenerConfig, transport: T, shutdown: CancellationToken) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            shared: Arc::new(Shared {
                config,
                transport,
                callbacks: RwLock::new(Vec::new()),
                state,
                cancel: shutdown.child_token(),
            }),
            task: Mutex::new(None),
        }
    }

    /// Registers a callback invoked once per received text or binary message.
    ///
    /// Callbacks run in registration order and each one is awaited before the
    /// next runs, so a slow callback delays reading the next message.
    pub fn subscribe<F, Fut>(&self, callback: F)
    where
        F: Fn(RawFrame) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let callback: FrameCallback = Arc::new(move |frame| Box::pin(callback(frame)));
        self.shared.callbacks.write().push(callback);
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.shared.callbacks.read().len()
    }

    /// Spawns the connection task on the current Tokio runtime.
    ///
    /// Does nothing if the listener was already started or killed.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start(&self) {
        let mut task = self.task.lock();
        if task.is_some() {
            tracing::debug!("Listener already started");
            return;
        }
        if self.shared.cancel.is_cancelled() {
            tracing::debug!("Listener was killed, not starting");
            return;
        }

        let shared = Arc::clone(&self.shared);
        *task = Some(tokio::spawn(run(shared)));
    }

    /// Stops the listener for good.
    ///
    /// Cancels any connection attempt, read or reconnect wait at its next
    /// suspension point. Safe to call repeatedly or after the task ended.
    pub fn kill(&self) {
        if !self.shared.cancel.is_cancelled() {
            tracing::debug!(url = %self.shared.config.url(), "Killing WebSocket listener");
        }
        self.shared.cancel.cancel();
        self.shared.state.send_replace(ConnectionState::Stopped);
    }

    /// Returns the current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.shared.state.borrow()
    }

    /// Returns a receiver that observes state changes.
    #[must_use]
    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state.subscribe()
    }

    /// Returns `true` once the listener has been killed.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// Waits until the connection task has finished after a kill.
    ///
    /// Returns immediately if the task was never started.
    pub async fn join(&self) {
        let handle = self.task.lock().take();
        if let Some(handle) = handle
            && let Err(e) = handle.await
        {
            tracing::warn!(error = %e, "Listener task ended abnormally");
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ListenerConfig {
        &self.shared.config
    }
}

impl<T: Transport> Drop for EventListener<T> {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
    }
}

impl<T: Transport> fmt::Debug for EventListener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListener")
            .field("url", &self.shared.config.url().as_str())
            .field("state", &self.state())
            .field("callbacks", &self.callback_count())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Connection task
// ============================================================================

/// Connect, read until the connection ends, wait, repeat. Exits only on cancel.
async fn run<T: Transport>(shared: Arc<Shared<T>>) {
    let delay = shared.config.reconnect_delay();

    loop {
        shared.set_state(ConnectionState::Connecting);

        let outcome = tokio::select! {
            biased;
            () = shared.cancel.cancelled() => break,
            outcome = connect_and_read(&shared) => outcome,
        };

        if shared.cancel.is_cancelled() {
            break;
        }

        match outcome {
            Err(TransportError::Connect(reason)) => {
                tracing::warn!(
                    url = %shared.config.url(),
                    error = %reason,
                    delay_secs = delay.as_secs(),
                    "WebSocket connection failed, retrying"
                );
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    delay_secs = delay.as_secs(),
                    "WebSocket died, retrying connection"
                );
            }
            Ok(()) => {
                tracing::error!(
                    delay_secs = delay.as_secs(),
                    "WebSocket closed, retrying connection"
                );
            }
        }

        shared.set_state(ConnectionState::ReconnectWait);

        tokio::select! {
            biased;
            () = shared.cancel.cancelled() => break,
            () = tokio::time::sleep(delay) => {}
        }
    }

    shared.set_state(ConnectionState::Stopped);
    tracing::debug!("Shutdown requested, stopping WebSocket listener");
}

/// One connection lifecycle: connect, then forward messages until the stream ends.
async fn connect_and_read<T: Transport>(shared: &Shared<T>) -> Result<(), TransportError> {
    tracing::info!(url = %shared.config.url(), "Connecting to WebSocket");

    let mut stream = shared.transport.connect(shared.config.url()).await?;

    shared.set_state(ConnectionState::Connected);
    tracing::info!("WebSocket connected");

    while let Some(message) = stream.next().await {
        match message.map_err(|e| TransportError::Stream(e.to_string()))? {
            Message::Text(text) => {
                shared.dispatch(RawFrame::Text(text.as_str().to_owned())).await;
            }
            Message::Binary(data) => {
                shared.dispatch(RawFrame::Binary(data.to_vec())).await;
            }
            Message::Close(frame) => {
                match frame {
                    Some(cf) => tracing::info!(
                        code = %cf.code,
                        reason = %cf.reason,
                        "WebSocket close frame received"
                    ),
                    None => tracing::info!("WebSocket close frame received"),
                }
                return Ok(());
            }
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {
                tracing::trace!("WebSocket control frame");
            }
        }
    }

    tracing::info!("WebSocket stream ended");
    Ok(())
}
