// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the REST client, discovery and the event pipeline.
//!
//! # Types
//!
//! - [`ComponentKind`] - Sub-part of the device that produced an event
//! - [`ActionKind`] - Kind of event (press type, battery report, threshold)
//! - [`MacAddress`] - Canonical device identity
//! - [`RawFrame`] - Undecoded event stream message

mod component;
mod mac_address;
mod raw_frame;

pub use component::{ActionKind, ComponentKind};
pub use mac_address::MacAddress;
pub use raw_frame::RawFrame;
