// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event pipeline of one device.
//!
//! A [`Bridge`] owns the [`EventListener`] of one device and the
//! [`EventCoordinator`] registered as its only callback. The host passes the
//! transport and its shutdown token in; nothing is looked up globally.
//!
//! # Examples
//!
//! ```no_run
//! use mystrom_lib::Bridge;
//! use mystrom_lib::types::ComponentKind;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> mystrom_lib::Result<()> {
//! let shutdown = CancellationToken::new();
//! let bridge = Bridge::connect("ws://192.168.1.10:8765/events", shutdown.clone())?;
//!
//! bridge.subscribe(|event| {
//!     if event.concerns("A4CF12F0E5D6", ComponentKind::Button2) {
//!         println!("button 2: {}", event.action);
//!     }
//! });
//!
//! // On host shutdown
//! shutdown.cancel();
//! bridge.join().await;
//! # Ok(())
//! # }
//! ```

use tokio_util::sync::CancellationToken;

use crate::error::TransportError;
use crate::event::{DomainEvent, EventCoordinator};
use crate::listener::{ConnectionState, EventListener, ListenerConfig, Transport, TungsteniteTransport};
use crate::subscription::{Subscribable, SubscriptionId};

/// Listener and coordinator of one device, wired together and running.
#[derive(Debug)]
pub struct Bridge<T: Transport = TungsteniteTransport> {
    listener: EventListener<T>,
    coordinator: EventCoordinator,
}

impl Bridge<TungsteniteTransport> {
    /// Starts a bridge to `url` over the default WebSocket transport.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidUrl`] if `url` is not a WebSocket URL.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn connect(url: &str, shutdown: CancellationToken) -> Result<Self, TransportError> {
        let config = ListenerConfig::new(url)?;
        Ok(Self::start(config, TungsteniteTransport, shutdown))
    }
}

impl<T: Transport> Bridge<T> {
    /// Creates the listener, attaches a fresh coordinator and starts connecting.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn start(config: ListenerConfig, transport: T, shutdown: CancellationToken) -> Self {
        let listener = EventListener::new(config, transport, shutdown);
        let coordinator = EventCoordinator::new();
        coordinator.attach(&listener);

        tracing::debug!(url = %listener.config().url(), "Starting event bridge");
        listener.start();

        Self {
            listener,
            coordinator,
        }
    }

    /// Returns the coordinator observers register with.
    #[must_use]
    pub fn coordinator(&self) -> &EventCoordinator {
        &self.coordinator
    }

    /// Returns the underlying listener.
    #[must_use]
    pub fn listener(&self) -> &EventListener<T> {
        &self.listener
    }

    /// Registers an observer called for every decoded event.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DomainEvent) + Send + Sync + 'static,
    {
        self.coordinator.subscribe(callback)
    }

    /// Returns the most recently decoded event.
    #[must_use]
    pub fn current(&self) -> Option<DomainEvent> {
        self.coordinator.current()
    }

    /// Returns the listener's connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.listener.state()
    }

    /// Stops the listener for good. Idempotent.
    pub fn kill(&self) {
        self.listener.kill();
    }

    /// Waits for the listener task to finish after a kill or host shutdown.
    pub async fn join(&self) {
        self.listener.join().await;
    }
}

impl<T: Transport> Subscribable for Bridge<T> {
    fn on_event<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DomainEvent) + Send + Sync + 'static,
    {
        self.coordinator.subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.coordinator.unsubscribe(id)
    }
}
