// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Undecoded payload of one event stream message.

use std::borrow::Cow;

use crate::error::DecodeError;

/// One text or binary message from the event stream, not yet interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFrame {
    /// A text message.
    Text(String),
    /// A binary message.
    Binary(Vec<u8>),
}

impl RawFrame {
    /// Returns the payload as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidValue`] if a binary payload is not UTF-8.
    pub fn as_text(&self) -> Result<Cow<'_, str>, DecodeError> {
        match self {
            Self::Text(text) => Ok(Cow::Borrowed(text)),
            Self::Binary(bytes) => std::str::from_utf8(bytes)
                .map(Cow::Borrowed)
                .map_err(|e| DecodeError::InvalidValue {
                    field: "frame".to_string(),
                    message: e.to_string(),
                }),
        }
    }

    /// Returns the payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Binary(bytes) => bytes.len(),
        }
    }

    /// Returns `true` if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<String> for RawFrame {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RawFrame {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<u8>> for RawFrame {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Binary(bytes)
    }
}
