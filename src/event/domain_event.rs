// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoded Button Plus event.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::types::{ActionKind, ComponentKind, MacAddress, RawFrame};

/// One event reported by a device, decoded from a [`RawFrame`].
///
/// Wire payloads look like:
///
/// ```json
/// {"mac": "A4CF12F0E5D6", "index": "1", "action": "2", "bat": 3.1, "temp": 21.4, "rh": 48.0}
/// ```
///
/// # Examples
///
/// ```
/// use mystrom_lib::event::DomainEvent;
/// use mystrom_lib::types::{ActionKind, ComponentKind};
///
/// let event = DomainEvent::from_json(
///     r#"{"mac":"A4CF12F0E5D6","index":"1","action":"2","bat":3.1,"temp":null,"rh":null}"#,
/// )?;
///
/// assert_eq!(event.component, ComponentKind::Button1);
/// assert_eq!(event.action, ActionKind::Double);
/// assert_eq!(event.battery, Some(3.1));
/// assert_eq!(event.temperature, None);
/// # Ok::<(), mystrom_lib::error::DecodeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainEvent {
    /// MAC address of the reporting device, as sent.
    pub mac: String,
    /// Component that produced the event.
    pub component: ComponentKind,
    /// What happened.
    pub action: ActionKind,
    /// Battery voltage.
    pub battery: Option<f64>,
    /// Temperature in degrees Celsius.
    pub temperature: Option<f64>,
    /// Relative humidity in percent.
    pub humidity: Option<f64>,
}

impl DomainEvent {
    /// Decodes a raw event stream message.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the payload is not UTF-8 JSON, misses one of
    /// `mac`, `index`, `action`, `bat`, `temp`, `rh`, or carries a component
    /// or action code outside the known tables.
    pub fn decode(frame: &RawFrame) -> Result<Self, DecodeError> {
        Self::from_json(&frame.as_text()?)
    }

    /// Decodes a JSON event payload.
    ///
    /// # Errors
    ///
    /// See [`DomainEvent::decode`].
    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(text)?;
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(DecodeError::UnexpectedFormat(format!(
                    "event must be a JSON object, got {}",
                    json_kind(&other)
                )));
            }
        };

        let mac = match required(&object, "mac")? {
            Value::String(mac) => mac.clone(),
            other => {
                return Err(DecodeError::InvalidValue {
                    field: "mac".to_string(),
                    message: format!("expected string, got {}", json_kind(other)),
                });
            }
        };

        let component = ComponentKind::parse_code(&code(&object, "index")?)?;
        let action = ActionKind::parse_code(&code(&object, "action")?)?;

        Ok(Self {
            mac,
            component,
            action,
            battery: reading(&object, "bat")?,
            temperature: reading(&object, "temp")?,
            humidity: reading(&object, "rh")?,
        })
    }

    /// Returns `true` if the event was sent by the device with this MAC.
    ///
    /// Both sides are compared in canonical form, so `a4:cf:12:f0:e5:d6`
    /// matches `A4CF12F0E5D6`.
    #[must_use]
    pub fn is_from(&self, mac: &str) -> bool {
        match self.mac.parse::<MacAddress>() {
            Ok(own) => own.matches(mac),
            Err(_) => self.mac.eq_ignore_ascii_case(mac),
        }
    }

    /// Returns `true` if the event was sent by `mac` for `component`.
    #[must_use]
    pub fn concerns(&self, mac: &str, component: ComponentKind) -> bool {
        self.component == component && self.is_from(mac)
    }

    /// Returns the 1-based button number for button events.
    #[must_use]
    pub fn button_index(&self) -> Option<u8> {
        self.component.button_number()
    }
}

fn required<'a>(object: &'a Map<String, Value>, field: &str) -> Result<&'a Value, DecodeError> {
    object
        .get(field)
        .ok_or_else(|| DecodeError::MissingField(field.to_string()))
}

/// Table codes arrive as strings or integers; both map to the decimal key.
fn code(object: &Map<String, Value>, field: &str) -> Result<String, DecodeError> {
    match required(object, field)? {
        Value::String(code) => Ok(code.trim().to_string()),
        Value::Number(code) if code.is_u64() => Ok(code.to_string()),
        other => Err(DecodeError::InvalidValue {
            field: field.to_string(),
            message: format!("expected code, got {other}"),
        }),
    }
}

fn reading(object: &Map<String, Value>, field: &str) -> Result<Option<f64>, DecodeError> {
    match required(object, field)? {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| DecodeError::InvalidValue {
                field: field.to_string(),
                message: format!("{s:?}: {e}"),
            }),
        other => Err(DecodeError::InvalidValue {
            field: field.to_string(),
            message: format!("expected number, got {}", json_kind(other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
