// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-provided capture capability and network adapter description.

use std::future::Future;
use std::net::Ipv4Addr;
use std::time::Duration;

use crate::error::TransportError;

/// A local network interface as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkAdapter {
    /// Interface name (e.g. `eth0`).
    pub name: String,
    /// Whether the host has the interface enabled.
    pub enabled: bool,
    /// IPv4 addresses assigned to the interface.
    pub ipv4: Vec<Ipv4Addr>,
}

impl NetworkAdapter {
    /// Creates an enabled adapter with the given addresses.
    #[must_use]
    pub fn new(name: impl Into<String>, ipv4: Vec<Ipv4Addr>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            ipv4,
        }
    }

    /// Returns `true` if discovery should listen on this interface.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.enabled && !self.ipv4.is_empty()
    }
}

/// Link-layer packet capture, supplied by the host.
///
/// Implementations start a capture on every listed interface with the given
/// BPF-style `filter`, keep it running for `duration`, then stop it and
/// return every captured frame (raw Ethernet bytes) in arrival order.
pub trait FrameCapture: Send + Sync {
    /// Captures frames for `duration` and returns them.
    fn capture(
        &self,
        interfaces: &[String],
        filter: &str,
        duration: Duration,
    ) -> impl Future<Output = Result<Vec<Vec<u8>>, TransportError>> + Send;
}
