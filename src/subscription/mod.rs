// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observer subscriptions for decoded device events.
//!
//! # Overview
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`ObserverRegistry`] - Registry that stores observers and dispatches events
//! - [`Subscribable`] - Trait for types that accept observers
//!
//! There is no filtering at registration time. Every observer sees every
//! event and decides for itself whether the event is relevant.

mod callback;
mod subscribable;

pub use callback::{ObserverRegistry, SubscriptionId};
pub use subscribable::Subscribable;
