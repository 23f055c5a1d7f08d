use client_logging::client_warn;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::LinkError;

/// An established duplex text channel to the scan service.
#[async_trait::async_trait]
pub trait Transport: Send {
    async fn send_text(&mut self, text: String) -> Result<(), LinkError>;

    /// Next inbound text frame; `None` once the peer has closed.
    ///
    /// Must be cancel-safe: the connection task races it against outbound sends.
    async fn next_text(&mut self) -> Option<Result<String, LinkError>>;

    async fn close(&mut self);
}

/// Opens transports to an endpoint.
#[async_trait::async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, endpoint: &Url) -> Result<Box<dyn Transport>, LinkError>;
}

/// WebSocket connector backed by `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

#[async_trait::async_trait]
impl Connector for WsConnector {
    async fn connect(&self, endpoint: &Url) -> Result<Box<dyn Transport>, LinkError> {
        let (stream, _response) = connect_async(endpoint.as_str())
            .await
            .map_err(|err| LinkError::Connect(err.to_string()))?;
        Ok(Box::new(WsTransport { stream }))
    }
}

pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait::async_trait]
impl Transport for WsTransport {
    async fn send_text(&mut self, text: String) -> Result<(), LinkError> {
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(|err| LinkError::Transport(err.to_string()))
    }

    async fn next_text(&mut self) -> Option<Result<String, LinkError>> {
        while let Some(frame) = self.stream.next().await {
            match frame {
                Ok(Message::Text(text)) => return Some(Ok(text)),
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                    Ok(text) => return Some(Ok(text)),
                    Err(err) => client_warn!("dropping non-UTF-8 binary frame: {}", err),
                },
                Ok(Message::Close(_)) => return None,
                // Ping/pong are answered by tungstenite itself.
                Ok(_) => {}
                Err(err) => return Some(Err(LinkError::Transport(err.to_string()))),
            }
        }
        None
    }

    async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}
