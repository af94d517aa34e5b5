// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observer callback storage.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`ObserverRegistry`] - Ordered registry that stores and dispatches callbacks

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Unique identifier for a subscription.
///
/// Returned when registering an observer and used to unsubscribe later. IDs
/// are unique within one registry and increase in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for observer callbacks.
type Observer<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Registry of observers for events of type `E`.
///
/// Observers are notified synchronously, in registration order. The registry
/// holds no lock while a callback runs, so callbacks may subscribe or
/// unsubscribe; such changes take effect from the next dispatch.
pub struct ObserverRegistry<E> {
    next_id: AtomicU64,
    observers: RwLock<BTreeMap<SubscriptionId, Observer<E>>>,
}

impl<E> ObserverRegistry<E> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            observers: RwLock::new(BTreeMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers an observer.
    pub fn on_event<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.observers.write().insert(id, Arc::new(callback));
        id
    }

    /// Removes an observer.
    ///
    /// Returns `true` if an observer was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.write().remove(&id).is_some()
    }

    /// Removes all observers.
    pub fn clear(&self) {
        self.observers.write().clear();
    }

    /// Notifies every observer of `event`.
    pub fn dispatch(&self, event: &E) {
        let observers: Vec<Observer<E>> = self.observers.read().values().cloned().collect();
        for observer in observers {
            observer(event);
        }
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    /// Returns `true` if there are no observers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Default for ObserverRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for ObserverRegistry<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observer_count", &self.len())
            .finish()
    }
}
