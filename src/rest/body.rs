// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request bodies and the action-target wire encoding.

use serde_json::Value;

/// Body of a REST request: nothing, a raw string, or a JSON document.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body.
    #[default]
    None,
    /// Raw text body.
    Raw(String),
    /// JSON body.
    Json(Value),
}

impl RequestBody {
    /// Selects a body from optional raw and JSON parts.
    ///
    /// Exactly one non-empty part selects that part. Both or neither selects
    /// [`RequestBody::None`]. An empty string and an empty JSON object count
    /// as absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use mystrom_lib::rest::RequestBody;
    /// use serde_json::json;
    ///
    /// let raw = RequestBody::from_parts(Some("x".into()), None);
    /// assert_eq!(raw, RequestBody::Raw("x".into()));
    ///
    /// let both = RequestBody::from_parts(Some("x".into()), Some(json!({"a": 1})));
    /// assert_eq!(both, RequestBody::None);
    /// ```
    #[must_use]
    pub fn from_parts(raw: Option<String>, json: Option<Value>) -> Self {
        let raw = raw.filter(|s| !s.is_empty());
        let json = json.filter(|v| !v.as_object().is_some_and(serde_json::Map::is_empty));

        match (raw, json) {
            (Some(raw), None) => Self::Raw(raw),
            (None, Some(json)) => Self::Json(json),
            _ => Self::None,
        }
    }

    /// Returns `true` if no body is sent.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// A callback request the device performs when an action fires.
///
/// The device stores the target as `"<method>://<host-and-path>"`: the HTTP
/// method, lower-cased, takes the place of the URL scheme.
///
/// # Examples
///
/// ```
/// use mystrom_lib::rest::ActionTarget;
///
/// let target = ActionTarget::post("http://10.0.0.5/hook");
/// assert_eq!(target.encode(), "post://10.0.0.5/hook");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTarget {
    method: String,
    url: String,
}

impl ActionTarget {
    /// Creates a target for an arbitrary method.
    #[must_use]
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
        }
    }

    /// Creates a `POST` target.
    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new("POST", url)
    }

    /// Creates a `GET` target.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the target URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Encodes the target in the device's `method://host/path` format.
    #[must_use]
    pub fn encode(&self) -> String {
        let rest = self.url.replace("http://", "").replace("https://", "");
        format!("{}://{rest}", self.method.to_lowercase())
    }
}
