// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration of the event listener.

use std::time::Duration;

use url::Url;

use crate::error::TransportError;

/// Where to connect and how long to wait between connection attempts.
///
/// # Examples
///
/// ```
/// use mystrom_lib::listener::ListenerConfig;
/// use std::time::Duration;
///
/// let config = ListenerConfig::new("ws://192.168.1.10:8765/events")?
///     .with_reconnect_delay(Duration::from_secs(5));
///
/// assert_eq!(config.url().host_str(), Some("192.168.1.10"));
/// assert_eq!(config.reconnect_delay(), Duration::from_secs(5));
/// # Ok::<(), mystrom_lib::error::TransportError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    url: Url,
    reconnect_delay: Duration,
}

impl ListenerConfig {
    /// Fixed wait between a lost connection and the next attempt.
    pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(10);

    /// Creates a configuration for a `ws://` or `wss://` URL.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidUrl`] if the URL cannot be parsed or
    /// does not use a WebSocket scheme.
    pub fn new(url: &str) -> Result<Self, TransportError> {
        let url = Url::parse(url).map_err(|e| TransportError::InvalidUrl(format!("{url}: {e}")))?;

        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(TransportError::InvalidUrl(format!(
                "{url}: scheme must be ws or wss"
            )));
        }

        Ok(Self {
            url,
            reconnect_delay: Self::DEFAULT_RECONNECT_DELAY,
        })
    }

    /// Sets the wait between connection attempts.
    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Returns the event stream URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the wait between connection attempts.
    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        self.reconnect_delay
    }
}
