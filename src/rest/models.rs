// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed request and response documents of the control API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::discovery::BUTTON_PLUS_DEVICE_TYPE;
use crate::error::DecodeError;

/// Response of `GET /info`.
///
/// Fields this library does not interpret are kept in [`DeviceInfo::extra`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Product family code (118 for the Button Plus).
    #[serde(rename = "type")]
    pub device_type: u16,
    /// MAC address as reported by the device.
    pub mac: String,
    /// Current IPv4 address.
    pub ip: String,
    /// Remaining fields (firmware version, SSID, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeviceInfo {
    /// Returns `true` if the device belongs to the Button Plus family.
    #[must_use]
    pub fn is_button_plus(&self) -> bool {
        self.device_type == BUTTON_PLUS_DEVICE_TYPE
    }
}

/// A wireless network seen by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPoint {
    /// Network name.
    pub ssid: String,
    /// Signal strength as reported by the device.
    pub strength: i64,
}

/// Pairs the flat `[ssid0, strength0, ssid1, strength1, ...]` scan result.
///
/// Pairs whose SSID is empty or otherwise falsy are dropped.
pub(crate) fn pair_access_points(values: &[Value]) -> Result<Vec<AccessPoint>, DecodeError> {
    if values.len() % 2 != 0 {
        return Err(DecodeError::UnexpectedFormat(format!(
            "scan result has odd length {}",
            values.len()
        )));
    }

    values
        .chunks_exact(2)
        .filter(|pair| is_truthy(&pair[0]))
        .map(|pair| {
            let ssid = pair[0].as_str().ok_or_else(|| DecodeError::InvalidValue {
                field: "ssid".to_string(),
                message: format!("expected string, got {}", pair[0]),
            })?;
            let strength = pair[1].as_i64().ok_or_else(|| DecodeError::InvalidValue {
                field: "strength".to_string(),
                message: format!("expected integer, got {}", pair[1]),
            })?;
            Ok(AccessPoint {
                ssid: ssid.to_string(),
                strength,
            })
        })
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// IPv4 settings applied when joining a wireless network.
///
/// Empty strings leave the device on DHCP.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Static IPv4 address.
    pub ip: String,
    /// Network mask.
    pub netmask: String,
    /// Default gateway.
    pub gateway: String,
    /// DNS server.
    pub dns: String,
}

impl NetworkConfig {
    /// Creates a DHCP configuration (all fields empty).
    #[must_use]
    pub fn dhcp() -> Self {
        Self::default()
    }
}

/// Body of `POST /connect`.
#[derive(Debug, Serialize)]
pub(crate) struct ConnectRequest<'a> {
    pub ssid: &'a str,
    pub passwd: &'a str,
    pub ip: &'a str,
    pub mask: &'a str,
    pub gw: &'a str,
    pub dns: &'a str,
}

impl<'a> ConnectRequest<'a> {
    pub(crate) fn new(ssid: &'a str, password: &'a str, ifconfig: &'a NetworkConfig) -> Self {
        Self {
            ssid,
            passwd: password,
            ip: &ifconfig.ip,
            mask: &ifconfig.netmask,
            gw: &ifconfig.gateway,
            dns: &ifconfig.dns,
        }
    }
}
