// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `mystrom_lib` library.
//!
//! Failures fall into three families:
//!
//! - [`TransportError`]: the network could not be reached or the stream broke.
//!   The event listener recovers from these by reconnecting.
//! - [`DecodeError`]: a payload (event frame, REST body, captured packet) could
//!   not be interpreted. Only the offending message is affected.
//! - [`RequestError`]: a REST call failed. Propagated to the caller, never retried.
//!
//! An empty discovery result is not an error.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred while connecting to or reading from the device.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Error occurred while decoding a payload.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A REST request failed.
    #[error("request error: {0}")]
    Request(#[from] RequestError),
}

/// Errors related to reaching the device (HTTP, WebSocket, packet capture).
#[derive(Debug, Error)]
pub enum TransportError {
    /// Establishing the connection failed.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The established stream reported an error.
    #[error("stream error: {0}")]
    Stream(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidUrl(String),

    /// The packet capture collaborator failed.
    #[error("capture failed: {0}")]
    Capture(String),

    /// The HTTP client could not be built.
    #[cfg(feature = "http")]
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Errors related to decoding device payloads.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field is missing from the payload.
    #[error("missing field in payload: {0}")]
    MissingField(String),

    /// The payload does not have the expected shape.
    #[error("unexpected payload format: {0}")]
    UnexpectedFormat(String),

    /// A field is present but holds an unusable value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },

    /// The `index` code is not in the component table.
    #[error("unknown component code: {0}")]
    UnknownComponent(String),

    /// The `action` code is not in the action table.
    #[error("unknown action code: {0}")]
    UnknownAction(String),

    /// A captured packet ended before a protocol layer was complete.
    #[error("truncated {layer} data: need {needed} bytes, got {actual}")]
    Truncated {
        /// The protocol layer being decoded.
        layer: &'static str,
        /// Minimum number of bytes required.
        needed: usize,
        /// Number of bytes available.
        actual: usize,
    },
}

/// What went wrong with a REST request.
#[derive(Debug, Error)]
pub enum RequestFailure {
    /// The HTTP transport failed (connect, timeout, body read).
    #[cfg(feature = "http")]
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The device answered with a non-success status code.
    #[error("HTTP status {0}")]
    Status(u16),
}

/// A failed REST call, carrying the request line that produced it.
#[derive(Debug, Error)]
#[error("{method} {path} failed: {kind}")]
pub struct RequestError {
    /// HTTP method of the failed request.
    pub method: String,
    /// API path of the failed request, relative to `/api/v1`.
    pub path: String,
    /// The underlying cause.
    #[source]
    pub kind: RequestFailure,
}

impl RequestError {
    /// Creates a request error for the given request line.
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>, kind: RequestFailure) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            kind,
        }
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display() {
        let err = DecodeError::MissingField("mac".to_string());
        assert_eq!(err.to_string(), "missing field in payload: mac");
    }

    #[test]
    fn unknown_code_display() {
        assert_eq!(
            DecodeError::UnknownComponent("9".to_string()).to_string(),
            "unknown component code: 9"
        );
        assert_eq!(
            DecodeError::UnknownAction("42".to_string()).to_string(),
            "unknown action code: 42"
        );
    }

    #[test]
    fn truncated_display() {
        let err = DecodeError::Truncated {
            layer: "ethernet",
            needed: 14,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "truncated ethernet data: need 14 bytes, got 3"
        );
    }

    #[test]
    fn request_error_carries_method_and_path() {
        let err = RequestError::new("GET", "/info", RequestFailure::Status(500));
        assert_eq!(err.to_string(), "GET /info failed: HTTP status 500");
        assert_eq!(err.method, "GET");
        assert_eq!(err.path, "/info");
    }

    #[test]
    fn error_from_decode_error() {
        let err: Error = DecodeError::UnknownAction("7".to_string()).into();
        assert!(matches!(err, Error::Decode(DecodeError::UnknownAction(code)) if code == "7"));
    }

    #[test]
    fn error_from_transport_error() {
        let err: Error = TransportError::Connect("refused".to_string()).into();
        assert_eq!(err.to_string(), "transport error: connection failed: refused");
    }
}
