// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the device control API.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::models::{ConnectRequest, pair_access_points};
use super::{AccessPoint, ActionTarget, DeviceInfo, NetworkConfig, RequestBody, RestConfig};
use crate::error::{DecodeError, RequestError, RequestFailure, Result, TransportError};

/// Client for the REST API at `http://<device-ip>/api/v1`.
///
/// Stateless: each method issues one request and returns its decoded body.
/// Failures are returned as [`RequestError`](crate::error::RequestError);
/// nothing is retried at this layer.
///
/// # Examples
///
/// ```no_run
/// use mystrom_lib::rest::{ActionTarget, RestClient};
///
/// # async fn example() -> mystrom_lib::Result<()> {
/// let client = RestClient::new("192.168.1.42")?;
///
/// if client.is_online().await {
///     let info = client.device_info().await?;
///     println!("{} at {}", info.mac, info.ip);
///
///     client
///         .set_specific_action("generic", "generic", &ActionTarget::post("http://10.0.0.2/hook"))
///         .await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    client: Client,
}

impl RestClient {
    /// Upper bound for [`RestClient::is_online`].
    pub const ONLINE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a client for the given host with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(host: impl Into<String>) -> std::result::Result<Self, TransportError> {
        RestConfig::new(host).into_client()
    }

    /// Creates a client that uses a session owned by the caller.
    #[must_use]
    pub fn with_http_client(host: impl Into<String>, client: Client) -> Self {
        RestConfig::new(host).with_session(client)
    }

    pub(crate) fn from_parts(base_url: String, client: Client) -> Self {
        Self { base_url, client }
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a request to `path` (relative to `/api/v1`) and returns the body text.
    ///
    /// Non-success status codes are reported as [`RequestFailure::Status`].
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] carrying the method, path and cause.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> std::result::Result<String, RequestError> {
        let url = format!("{}{path}", self.base_url);
        let fail = |kind| RequestError::new(method.as_str(), path, kind);

        tracing::debug!(method = %method, url = %url, "Sending HTTP request");

        let builder = self.client.request(method.clone(), &url);
        let builder = match body {
            RequestBody::None => builder,
            RequestBody::Raw(raw) => builder
                .header(CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(raw),
            RequestBody::Json(json) => builder.json(&json),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| fail(RequestFailure::Transport(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fail(RequestFailure::Status(status.as_u16())));
        }

        let text = response
            .text()
            .await
            .map_err(|e| fail(RequestFailure::Transport(e)))?;

        tracing::debug!(body = %text, "Received HTTP response");

        Ok(text)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<T> {
        let text = self.request(method, path, body).await?;
        Ok(serde_json::from_str(&text).map_err(DecodeError::from)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.fetch(Method::GET, path, RequestBody::None).await
    }

    /// Checks whether the device answers within [`RestClient::ONLINE_TIMEOUT`].
    ///
    /// Any HTTP response counts as online. Timeouts and transport errors
    /// yield `false`; this method never fails.
    pub async fn is_online(&self) -> bool {
        let probe = self.request(Method::GET, "/info", RequestBody::None);
        match tokio::time::timeout(Self::ONLINE_TIMEOUT, probe).await {
            Ok(Ok(_)) => true,
            Ok(Err(RequestError {
                kind: RequestFailure::Status(status),
                ..
            })) => {
                tracing::debug!(status, "Device answered with an error status");
                true
            }
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "Device is offline");
                false
            }
            Err(_) => {
                tracing::debug!(
                    timeout_secs = Self::ONLINE_TIMEOUT.as_secs(),
                    "Device did not answer in time"
                );
                false
            }
        }
    }

    /// Fetches `GET /info`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not valid JSON.
    pub async fn device_info(&self) -> Result<DeviceInfo> {
        self.get("/info").await
    }

    /// Fetches `GET /settings`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not valid JSON.
    pub async fn get_settings(&self) -> Result<Value> {
        self.get("/settings").await
    }

    /// Updates settings with `POST /settings` and returns the device's answer.
    ///
    /// # Errors
    ///
    /// Returns error if the settings cannot be serialized, the request fails,
    /// or the answer is not valid JSON.
    pub async fn set_setting<S: Serialize + ?Sized>(&self, settings: &S) -> Result<Value> {
        let json = serde_json::to_value(settings).map_err(DecodeError::from)?;
        self.fetch(Method::POST, "/settings", RequestBody::Json(json))
            .await
    }

    /// Lists wireless networks in range (`GET /scan`).
    ///
    /// Entries with an empty SSID are dropped.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the scan result is malformed.
    pub async fn get_access_points(&self) -> Result<Vec<AccessPoint>> {
        let values: Vec<Value> = self.get("/scan").await?;
        Ok(pair_access_points(&values)?)
    }

    /// Joins a wireless network (`POST /connect`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn connect_to_access_point(
        &self,
        ssid: &str,
        password: &str,
        ifconfig: &NetworkConfig,
    ) -> Result<String> {
        let body = serde_json::to_value(ConnectRequest::new(ssid, password, ifconfig))
            .map_err(DecodeError::from)?;
        Ok(self
            .request(Method::POST, "/connect", RequestBody::Json(body))
            .await?)
    }

    /// Fetches current sensor readings (`GET /sensors`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not valid JSON.
    pub async fn get_sensor_data(&self) -> Result<Value> {
        self.get("/sensors").await
    }

    /// Fetches stored measurements (`GET /meas`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not valid JSON.
    pub async fn get_past_measurements(&self) -> Result<Value> {
        self.get("/meas").await
    }

    /// Fetches every configured action (`GET /actions`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not valid JSON.
    pub async fn get_all_actions(&self) -> Result<Value> {
        self.get("/actions").await
    }

    /// Fetches the actions of one component (`GET /actions/{component}`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not valid JSON.
    pub async fn get_component_actions(&self, component: &str) -> Result<Value> {
        let path = format!("/actions/{}", urlencoding::encode(component));
        self.get(&path).await
    }

    /// Fetches a single action (`GET /action/{component}/{action}`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not valid JSON.
    pub async fn get_specific_action(&self, component: &str, action: &str) -> Result<Value> {
        self.get(&action_path(component, action)).await
    }

    /// Registers a callback request for an action (`POST /action/{component}/{action}`).
    ///
    /// The body is the [`ActionTarget::encode`] form, e.g. `post://10.0.0.5/hook`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn set_specific_action(
        &self,
        component: &str,
        action: &str,
        target: &ActionTarget,
    ) -> Result<String> {
        let body = RequestBody::Raw(target.encode());
        Ok(self
            .request(Method::POST, &action_path(component, action), body)
            .await?)
    }

    /// Points the catch-all `generic/generic` action at `webhook_url` via `POST`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn register_webhook(&self, webhook_url: &str) -> Result<String> {
        tracing::info!(webhook = %webhook_url, "Registering device webhook");
        self.set_specific_action("generic", "generic", &ActionTarget::post(webhook_url))
            .await
    }

    /// Checks that a manually entered device is reachable and a Button Plus.
    ///
    /// Returns `Ok(None)` if the device is offline or of another product family.
    ///
    /// # Errors
    ///
    /// Returns error if `/info` answers but cannot be decoded.
    pub async fn probe(&self) -> Result<Option<DeviceInfo>> {
        if !self.is_online().await {
            return Ok(None);
        }

        let info = self.device_info().await?;
        if !info.is_button_plus() {
            tracing::info!(
                device_type = info.device_type,
                mac = %info.mac,
                "Device is not a Button Plus"
            );
            return Ok(None);
        }

        Ok(Some(info))
    }
}

fn action_path(component: &str, action: &str) -> String {
    format!(
        "/action/{}/{}",
        urlencoding::encode(component),
        urlencoding::encode(action)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_builds_base_url() {
        let client = RestClient::new("192.168.1.42").unwrap();
        assert_eq!(client.base_url(), "http://192.168.1.42/api/v1");
    }

    #[test]
    fn action_path_encodes_segments() {
        assert_eq!(action_path("generic", "generic"), "/action/generic/generic");
        assert_eq!(action_path("a b", "x/y"), "/action/a%20b/x%2Fy");
    }

    #[test]
    fn online_timeout_is_five_seconds() {
        assert_eq!(RestClient::ONLINE_TIMEOUT, Duration::from_secs(5));
    }
}
