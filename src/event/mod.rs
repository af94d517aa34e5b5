// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoded device events and their distribution.
//!
//! The [`EventCoordinator`] is the single consumer of the listener's raw
//! frames. It turns each frame into a [`DomainEvent`], keeps it as the current
//! value and notifies every observer.
//!
//! # Examples
//!
//! ```
//! use mystrom_lib::event::EventCoordinator;
//! use mystrom_lib::types::RawFrame;
//!
//! let coordinator = EventCoordinator::new();
//! let mut rx = coordinator.watch();
//!
//! coordinator.process_frame(&RawFrame::from(
//!     r#"{"mac":"A4CF12F0E5D6","index":5,"action":28,"bat":3.0,"temp":30.5,"rh":40}"#,
//! ));
//!
//! let latest = rx.borrow_and_update().clone().unwrap();
//! assert_eq!(latest.temperature, Some(30.5));
//! ```

mod coordinator;
mod domain_event;

pub use coordinator::EventCoordinator;
pub use domain_event::DomainEvent;

pub use crate::subscription::SubscriptionId;
