// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Passive discovery of devices from their UDP broadcasts.
//!
//! Devices periodically broadcast a small UDP datagram on port
//! [`DISCOVERY_PORT`]. Discovery listens on every enabled interface that has
//! an IPv4 address, for a caller-chosen duration, and turns each captured
//! frame into a [`DeviceDescriptor`]:
//!
//! - MAC address from the Ethernet source field
//! - IPv4 address from the IP source field
//! - device type from payload byte 6
//! - status flags from the last payload byte
//!
//! Capturing is done by the host through [`FrameCapture`]; decoding works on
//! any sequence of raw frames via [`decode_frames`].
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//! use mystrom_lib::discovery::{self, FrameCapture, NetworkAdapter};
//!
//! # async fn example(capture: impl FrameCapture, adapters: Vec<NetworkAdapter>) -> mystrom_lib::Result<()> {
//! let devices = discovery::discover(&capture, &adapters, Duration::from_secs(11)).await?;
//!
//! for device in discovery::button_plus_only(devices) {
//!     println!("{} at {}", device.mac, device.ip);
//! }
//! # Ok(())
//! # }
//! ```

mod capture;
mod descriptor;
mod packet;

use std::time::Duration;

pub use capture::{FrameCapture, NetworkAdapter};
pub use descriptor::{DeviceDescriptor, DeviceStatus, decode_frame, decode_frames};

use crate::error::Result;

/// UDP port of discovery broadcasts.
pub const DISCOVERY_PORT: u16 = 7979;

/// Capture filter handed to [`FrameCapture::capture`].
pub const CAPTURE_FILTER: &str = "udp and port 7979";

/// Product family code of the Button Plus.
pub const BUTTON_PLUS_DEVICE_TYPE: u16 = 118;

/// Listening time used when the caller has no preference.
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(11);

/// Captures broadcasts for `timeout` and returns the devices seen.
///
/// Returns an empty list immediately, without capturing, if no adapter is
/// eligible. Each call performs a fresh capture.
///
/// # Errors
///
/// Returns error if the capture itself fails. Undecodable frames are skipped.
pub async fn discover<C: FrameCapture>(
    capture: &C,
    adapters: &[NetworkAdapter],
    timeout: Duration,
) -> Result<Vec<DeviceDescriptor>> {
    let interfaces: Vec<String> = adapters
        .iter()
        .filter(|adapter| adapter.is_eligible())
        .map(|adapter| adapter.name.clone())
        .collect();

    if interfaces.is_empty() {
        tracing::debug!("No eligible network interface, skipping discovery");
        return Ok(Vec::new());
    }

    tracing::info!(
        interfaces = ?interfaces,
        timeout_secs = timeout.as_secs(),
        "Listening for discovery broadcasts"
    );

    let frames = capture.capture(&interfaces, CAPTURE_FILTER, timeout).await?;
    let devices = decode_frames(frames.iter().map(Vec::as_slice));

    tracing::info!(
        frames = frames.len(),
        devices = devices.len(),
        "Discovery finished"
    );

    Ok(devices)
}

/// Keeps only Button Plus devices, preserving order.
#[must_use]
pub fn button_plus_only(devices: Vec<DeviceDescriptor>) -> Vec<DeviceDescriptor> {
    devices
        .into_iter()
        .filter(DeviceDescriptor::is_button_plus)
        .collect()
}
