// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan-out of decoded events to observers.

use std::sync::Arc;

use tokio::sync::watch;

use super::DomainEvent;
use crate::error::DecodeError;
use crate::subscription::{ObserverRegistry, Subscribable, SubscriptionId};
use crate::types::RawFrame;

#[cfg(feature = "websocket")]
use crate::listener::{EventListener, Transport};

/// Decodes raw frames and republishes them as [`DomainEvent`]s.
///
/// The coordinator keeps a single current-event slot. Each published event
/// overwrites it, then every observer is notified synchronously in
/// registration order. Nothing is queued: an observer registered after an
/// event was published only sees the next one.
///
/// Cloning is cheap and yields a handle to the same slot and observers.
///
/// # Examples
///
/// ```
/// use mystrom_lib::event::EventCoordinator;
/// use mystrom_lib::types::{ComponentKind, RawFrame};
///
/// let coordinator = EventCoordinator::new();
/// coordinator.subscribe(|event| {
///     if event.concerns("A4CF12F0E5D6", ComponentKind::Button1) {
///         println!("{}", event.action);
///     }
/// });
///
/// let frame = RawFrame::from(
///     r#"{"mac":"A4CF12F0E5D6","index":"1","action":"1","bat":3.0,"temp":null,"rh":null}"#,
/// );
/// coordinator.handle_frame(&frame)?;
///
/// assert!(coordinator.current().is_some());
/// # Ok::<(), mystrom_lib::error::DecodeError>(())
/// ```
#[derive(Clone, Default)]
pub struct EventCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    observers: ObserverRegistry<DomainEvent>,
    current: watch::Sender<Option<DomainEvent>>,
}

impl Default for Inner {
    fn default() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            observers: ObserverRegistry::new(),
            current,
        }
    }
}

impl EventCoordinator {
    /// Creates a coordinator with no observers and an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer called for every published event.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DomainEvent) + Send + Sync + 'static,
    {
        self.inner.observers.on_event(callback)
    }

    /// Removes an observer. Returns `true` if it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.observers.unsubscribe(id)
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }

    /// Returns the most recently published event.
    #[must_use]
    pub fn current(&self) -> Option<DomainEvent> {
        self.inner.current.borrow().clone()
    }

    /// Returns a receiver of the current-event slot.
    ///
    /// The receiver only ever holds the latest event; intermediate events
    /// published between two reads are skipped.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Option<DomainEvent>> {
        self.inner.current.subscribe()
    }

    /// Stores `event` in the slot and notifies every observer.
    pub fn publish(&self, event: DomainEvent) {
        tracing::trace!(
            mac = %event.mac,
            component = %event.component,
            action = %event.action,
            observers = self.observer_count(),
            "Publishing event"
        );

        self.inner.current.send_replace(Some(event.clone()));
        self.inner.observers.dispatch(&event);
    }

    /// Decodes a frame and publishes the resulting event.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the frame does not decode. The slot and the
    /// observers are left untouched in that case.
    pub fn handle_frame(&self, frame: &RawFrame) -> Result<DomainEvent, DecodeError> {
        let event = DomainEvent::decode(frame)?;
        self.publish(event.clone());
        Ok(event)
    }

    /// Like [`EventCoordinator::handle_frame`], but logs and drops frames that
    /// fail to decode.
    pub fn process_frame(&self, frame: &RawFrame) {
        if let Err(e) = self.handle_frame(frame) {
            tracing::warn!(error = %e, len = frame.len(), "Dropping undecodable event frame");
        }
    }

    /// Registers this coordinator as a frame callback of `listener`.
    #[cfg(feature = "websocket")]
    pub fn attach<T: Transport>(&self, listener: &EventListener<T>) {
        let coordinator = self.clone();
        listener.subscribe(move |frame| {
            let coordinator = coordinator.clone();
            async move { coordinator.process_frame(&frame) }
        });
    }
}

impl Subscribable for EventCoordinator {
    fn on_event<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DomainEvent) + Send + Sync + 'static,
    {
        self.subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        EventCoordinator::unsubscribe(self, id)
    }
}

impl std::fmt::Debug for EventCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventCoordinator")
            .field("observer_count", &self.observer_count())
            .field("current", &*self.inner.current.borrow())
            .finish()
    }
}
