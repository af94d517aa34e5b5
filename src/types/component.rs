// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Component and action code tables of the Button Plus event stream.
//!
//! The device identifies the sub-part that produced an event with a small
//! `index` code and the kind of event with an `action` code. Both tables are
//! closed: any other code is rejected.

use std::fmt;

use serde::Serialize;

use crate::error::DecodeError;

/// A logical sub-part of the device.
///
/// # Examples
///
/// ```
/// use mystrom_lib::types::ComponentKind;
///
/// assert_eq!(ComponentKind::from_code("3"), Some(ComponentKind::Button3));
/// assert_eq!(ComponentKind::Button3.code(), "3");
/// assert_eq!(ComponentKind::from_code("9"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentKind {
    /// The device as a whole.
    Generic,
    /// First push button.
    Button1,
    /// Second push button.
    Button2,
    /// Third push button.
    Button3,
    /// Fourth push button.
    Button4,
    /// Temperature sensor.
    Temperature,
    /// Humidity sensor.
    Humidity,
}

impl ComponentKind {
    /// All components in code order.
    pub const ALL: [Self; 7] = [
        Self::Generic,
        Self::Button1,
        Self::Button2,
        Self::Button3,
        Self::Button4,
        Self::Temperature,
        Self::Humidity,
    ];

    /// Looks up a component by its wire code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Self::Generic),
            "1" => Some(Self::Button1),
            "2" => Some(Self::Button2),
            "3" => Some(Self::Button3),
            "4" => Some(Self::Button4),
            "5" => Some(Self::Temperature),
            "6" => Some(Self::Humidity),
            _ => None,
        }
    }

    /// Parses a wire code, failing on codes outside the table.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnknownComponent`] for unrecognized codes.
    pub fn parse_code(code: &str) -> Result<Self, DecodeError> {
        Self::from_code(code).ok_or_else(|| DecodeError::UnknownComponent(code.to_string()))
    }

    /// Returns the wire code of this component.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Generic => "0",
            Self::Button1 => "1",
            Self::Button2 => "2",
            Self::Button3 => "3",
            Self::Button4 => "4",
            Self::Temperature => "5",
            Self::Humidity => "6",
        }
    }

    /// Returns the upper-case name used in event payloads handed to hosts.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "GENERIC",
            Self::Button1 => "BUTTON1",
            Self::Button2 => "BUTTON2",
            Self::Button3 => "BUTTON3",
            Self::Button4 => "BUTTON4",
            Self::Temperature => "TEMPERATURE",
            Self::Humidity => "HUMIDITY",
        }
    }

    /// Returns the button component with the given 1-based number.
    #[must_use]
    pub const fn button(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::Button1),
            2 => Some(Self::Button2),
            3 => Some(Self::Button3),
            4 => Some(Self::Button4),
            _ => None,
        }
    }

    /// Returns the 1-based button number, or `None` for non-button components.
    #[must_use]
    pub const fn button_number(&self) -> Option<u8> {
        match self {
            Self::Button1 => Some(1),
            Self::Button2 => Some(2),
            Self::Button3 => Some(3),
            Self::Button4 => Some(4),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of event a component produced.
///
/// # Examples
///
/// ```
/// use mystrom_lib::types::ActionKind;
///
/// assert_eq!(ActionKind::from_code("2"), Some(ActionKind::Double));
/// assert_eq!(ActionKind::from_code("28"), Some(ActionKind::OverValue));
/// assert_eq!(ActionKind::from_code("4"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// Single short press.
    Single,
    /// Double press.
    Double,
    /// Long press.
    Long,
    /// Battery report.
    Battery,
    /// Catch-all action.
    Generic,
    /// A sensor reading crossed its upper threshold.
    OverValue,
    /// A sensor reading crossed its lower threshold.
    UnderValue,
}

impl ActionKind {
    /// All actions in code order.
    pub const ALL: [Self; 7] = [
        Self::Single,
        Self::Double,
        Self::Long,
        Self::Battery,
        Self::Generic,
        Self::OverValue,
        Self::UnderValue,
    ];

    /// Looks up an action by its wire code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::Single),
            "2" => Some(Self::Double),
            "3" => Some(Self::Long),
            "6" => Some(Self::Battery),
            "13" => Some(Self::Generic),
            "28" => Some(Self::OverValue),
            "29" => Some(Self::UnderValue),
            _ => None,
        }
    }

    /// Parses a wire code, failing on codes outside the table.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnknownAction`] for unrecognized codes.
    pub fn parse_code(code: &str) -> Result<Self, DecodeError> {
        Self::from_code(code).ok_or_else(|| DecodeError::UnknownAction(code.to_string()))
    }

    /// Returns the wire code of this action.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Single => "1",
            Self::Double => "2",
            Self::Long => "3",
            Self::Battery => "6",
            Self::Generic => "13",
            Self::OverValue => "28",
            Self::UnderValue => "29",
        }
    }

    /// Returns the upper-case name used in event payloads handed to hosts.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "SINGLE",
            Self::Double => "DOUBLE",
            Self::Long => "LONG",
            Self::Battery => "BATTERY",
            Self::Generic => "GENERIC",
            Self::OverValue => "OVER_VALUE",
            Self::UnderValue => "UNDER_VALUE",
        }
    }

    /// Returns `true` for the three press kinds a button can report.
    #[must_use]
    pub const fn is_press(&self) -> bool {
        matches!(self, Self::Single | Self::Double | Self::Long)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
