use futures_util::{SinkExt, StreamExt};
use relay_logging::{relay_debug, relay_info};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::protocol::{encode_frame, parse_frame, parse_frame_bytes};
use crate::{
    InboundFrame, OutboundFrame, RelayConnection, RelayError, RelaySettings, RelayTransport,
    SessionToken,
};

/// WebSocket transport: JSON text frames, bearer token in the handshake.
#[derive(Debug, Default, Clone, Copy)]
pub struct WsTransport;

#[async_trait::async_trait]
impl RelayTransport for WsTransport {
    async fn open(
        &self,
        settings: &RelaySettings,
        token: &SessionToken,
    ) -> Result<Box<dyn RelayConnection>, RelayError> {
        let url = settings.connect_url()?;
        let mut request = url
            .as_str()
            .into_client_request()
            .map_err(|err| RelayError::InvalidSettings(err.to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
            .map_err(|err| RelayError::InvalidSettings(format!("token header: {err}")))?;
        request.headers_mut().insert(AUTHORIZATION, bearer);

        relay_info!("opening relay connection to {}", url.host_str().unwrap_or("?"));
        let (stream, _response) = connect_async(request).await.map_err(map_handshake_error)?;
        Ok(Box::new(WsConnection { stream }))
    }
}

struct WsConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait::async_trait]
impl RelayConnection for WsConnection {
    async fn send(&mut self, frame: &OutboundFrame) -> Result<(), RelayError> {
        let text = encode_frame(frame)?;
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(|err| RelayError::Transport(err.to_string()))
    }

    async fn next_frame(&mut self) -> Option<Result<InboundFrame, RelayError>> {
        loop {
            let message = match self.stream.next().await? {
                Ok(message) => message,
                Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => return None,
                Err(err) => return Some(Err(RelayError::Transport(err.to_string()))),
            };
            match message {
                Message::Text(text) => return Some(parse_frame(&text)),
                Message::Binary(bytes) => return Some(parse_frame_bytes(&bytes)),
                Message::Close(frame) => {
                    relay_debug!("relay sent close: {:?}", frame);
                    return None;
                }
                // Pings are answered by tungstenite.
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            }
        }
    }

    async fn close(&mut self) -> Result<(), RelayError> {
        match self.stream.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => Ok(()),
            Err(err) => Err(RelayError::Transport(err.to_string())),
        }
    }
}

fn map_handshake_error(err: WsError) -> RelayError {
    match err {
        WsError::Http(response) => RelayError::Rejected(format!("http status {}", response.status())),
        WsError::Url(err) => RelayError::InvalidSettings(err.to_string()),
        other => RelayError::Transport(other.to_string()),
    }
}
