// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that publish decoded device events.

use crate::event::DomainEvent;
use crate::subscription::SubscriptionId;

/// Trait for types that deliver [`DomainEvent`]s to observers.
///
/// Every observer receives every event. Observers pick out the events meant
/// for them with [`DomainEvent::concerns`].
///
/// # Examples
///
/// ```
/// use mystrom_lib::event::EventCoordinator;
/// use mystrom_lib::subscription::Subscribable;
/// use mystrom_lib::types::ComponentKind;
///
/// let coordinator = EventCoordinator::new();
///
/// let sub_id = coordinator.on_event(|event| {
///     if event.concerns("A4CF12F0E5D6", ComponentKind::Button1) {
///         println!("button 1: {}", event.action);
///     }
/// });
///
/// coordinator.unsubscribe(sub_id);
/// ```
pub trait Subscribable {
    /// Registers an observer called for every published event.
    fn on_event<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DomainEvent) + Send + Sync + 'static;

    /// Removes an observer. Returns `true` if it was registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
