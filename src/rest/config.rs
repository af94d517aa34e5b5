// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection parameters for the REST client.

use std::time::Duration;

use reqwest::Client;

use super::RestClient;
use crate::error::TransportError;

/// Configuration for the device control API.
///
/// The API is plain HTTP and stateless: every call is an independent request
/// against `http://<host>[:port]/api/v1`.
///
/// # Examples
///
/// ```
/// use mystrom_lib::rest::RestConfig;
/// use std::time::Duration;
///
/// let config = RestConfig::new("192.168.1.42")
///     .with_port(8080)
///     .with_timeout(Duration::from_secs(3));
///
/// assert_eq!(config.base_url(), "http://192.168.1.42:8080/api/v1");
/// ```
#[derive(Debug, Clone)]
pub struct RestConfig {
    host: String,
    port: u16,
    timeout: Duration,
}

impl RestConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Path prefix of every API endpoint.
    pub const API_PREFIX: &'static str = "/api/v1";

    /// Creates a configuration for the given host name or IP address.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the API base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = self
            .host
            .trim_start_matches("http://")
            .trim_end_matches('/');
        if self.port == Self::DEFAULT_PORT {
            format!("http://{host}{}", Self::API_PREFIX)
        } else {
            format!("http://{host}:{}{}", self.port, Self::API_PREFIX)
        }
    }

    /// Creates a [`RestClient`] with its own HTTP session.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<RestClient, TransportError> {
        let client = Client::builder().timeout(self.timeout).build()?;
        Ok(RestClient::from_parts(self.base_url(), client))
    }

    /// Creates a [`RestClient`] that shares a session owned by the caller.
    ///
    /// The session's own timeout settings apply; [`RestConfig::timeout`] is ignored.
    #[must_use]
    pub fn with_session(self, client: Client) -> RestClient {
        RestClient::from_parts(self.base_url(), client)
    }
}
