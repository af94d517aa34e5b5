// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical MAC address representation.

use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;

/// A MAC address in canonical form: twelve upper-case hex digits, no separators.
///
/// The canonical string is the device identity used by discovery, the event
/// stream and observers alike.
///
/// # Examples
///
/// ```
/// use mystrom_lib::types::MacAddress;
///
/// let mac: MacAddress = "a4:cf:12:0b:7e:01".parse().unwrap();
/// assert_eq!(mac.as_str(), "A4CF120B7E01");
///
/// let same = MacAddress::from_bytes([0xA4, 0xCF, 0x12, 0x0B, 0x7E, 0x01]);
/// assert_eq!(mac, same);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress(String);

impl MacAddress {
    /// Builds the canonical form from raw link-layer bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 6]) -> Self {
        use fmt::Write;

        let mut s = String::with_capacity(12);
        for b in bytes {
            let _ = write!(s, "{b:02X}");
        }
        Self(s)
    }

    /// Returns the canonical string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares against a MAC given in any accepted notation.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        other
            .parse::<Self>()
            .is_ok_and(|parsed| parsed.0 == self.0)
    }
}

impl FromStr for MacAddress {
    type Err = DecodeError;

    /// Accepts `:`/`-` separated or bare hex in either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex: String = s
            .chars()
            .filter(|c| *c != ':' && *c != '-')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if hex.len() != 12 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DecodeError::InvalidValue {
                field: "mac".to_string(),
                message: format!("not a MAC address: {s:?}"),
            });
        }

        Ok(Self(hex))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MacAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
