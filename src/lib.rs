// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `myStrom` Lib - A Rust library to talk to myStrom Button Plus devices.
//!
//! This library provides async APIs to find, configure and observe Button
//! Plus devices on the local network.
//!
//! # Supported Features
//!
//! - **REST control**: Device info, settings, Wi-Fi scan and join, sensor data, action URLs
//! - **Discovery**: Decoding of the UDP broadcasts devices send on port 7979
//! - **Event stream**: Self-healing WebSocket listener with a fixed reconnect delay
//! - **Event fan-out**: Decoded button presses and sensor reports delivered to observers
//!
//! # Quick Start
//!
//! ## Configure a Device
//!
//! ```no_run
//! use mystrom_lib::RestClient;
//!
//! #[tokio::main]
//! async fn main() -> mystrom_lib::Result<()> {
//!     let client = RestClient::new("192.168.1.10")?;
//!
//!     if let Some(info) = client.probe().await? {
//!         println!("Button Plus {} at {}", info.mac, info.ip);
//!         client.register_webhook("http://192.168.1.2:8765/hook").await?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Observe Events
//!
//! ```no_run
//! use mystrom_lib::Bridge;
//! use mystrom_lib::types::ComponentKind;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> mystrom_lib::Result<()> {
//!     let shutdown = CancellationToken::new();
//!     let bridge = Bridge::connect("ws://192.168.1.2:8765/events", shutdown.clone())?;
//!
//!     bridge.subscribe(|event| {
//!         if let Some(button) = event.button_index() {
//!             println!("{}: button {button} {}", event.mac, event.action);
//!         }
//!     });
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(60)).await;
//!     shutdown.cancel();
//!     bridge.join().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Discover Devices
//!
//! Capturing link-layer frames is left to the host, which implements
//! [`discovery::FrameCapture`]. The decoder then works on the captured bytes:
//!
//! ```
//! use mystrom_lib::discovery::decode_frames;
//!
//! let captured: Vec<Vec<u8>> = Vec::new();
//! let devices = decode_frames(captured.iter().map(Vec::as_slice));
//! assert!(devices.is_empty());
//! ```

#[cfg(feature = "websocket")]
mod bridge;
pub mod discovery;
pub mod error;
pub mod event;
#[cfg(feature = "websocket")]
pub mod listener;
#[cfg(feature = "http")]
pub mod rest;
pub mod subscription;
pub mod types;

#[cfg(feature = "websocket")]
pub use bridge::Bridge;
pub use discovery::{DeviceDescriptor, DeviceStatus, FrameCapture, NetworkAdapter};
pub use error::{DecodeError, Error, RequestError, RequestFailure, Result, TransportError};
pub use event::{DomainEvent, EventCoordinator};
#[cfg(feature = "websocket")]
pub use listener::{ConnectionState, EventListener, ListenerConfig, Transport};
#[cfg(feature = "http")]
pub use rest::{AccessPoint, ActionTarget, DeviceInfo, NetworkConfig, RequestBody, RestClient, RestConfig};
pub use subscription::{Subscribable, SubscriptionId};
pub use types::{ActionKind, ComponentKind, MacAddress, RawFrame};
