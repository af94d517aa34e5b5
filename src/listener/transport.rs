// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WebSocket transport used by the listener.

use std::future::Future;

use futures_util::Stream;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::error::TransportError;

/// Opens WebSocket connections for the listener.
///
/// The listener calls [`Transport::connect`] once per connection attempt and
/// reads the returned stream until it ends. Hosts that own their network
/// stack (proxies, custom TLS) provide their own implementation; everyone
/// else uses [`TungsteniteTransport`].
pub trait Transport: Send + Sync + 'static {
    /// Stream of messages of one established connection.
    type Stream: Stream<Item = Result<Message, tungstenite::Error>> + Send + Unpin + 'static;

    /// Opens one connection to `url`.
    fn connect(
        &self,
        url: &Url,
    ) -> impl Future<Output = Result<Self::Stream, TransportError>> + Send;
}

/// Default transport built on `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteTransport;

impl Transport for TungsteniteTransport {
    type Stream = WebSocketStream<MaybeTlsStream<TcpStream>>;

    async fn connect(&self, url: &Url) -> Result<Self::Stream, TransportError> {
        let (stream, response) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        tracing::trace!(status = %response.status(), "WebSocket handshake complete");

        Ok(stream)
    }
}
