// WebSocket transport to the controller's live XML interface
use crate::domain::error::{Error, Result};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

pub const SUBPROTOCOL: &str = "Lux_WS";
pub const PROTOCOL_HEADER: &str = "Sec-WebSocket-Protocol";

pub type LuxSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Client commands understood by the controller.
pub mod command {
    pub const REFRESH: &str = "REFRESH";

    /// A blank password logs in with `0`.
    pub fn login(password: &str) -> String {
        let password = password.trim();
        if password.is_empty() {
            "LOGIN;0".to_string()
        } else {
            format!("LOGIN;{}", password)
        }
    }
}

/// `ws://host:port`; a port already attached to `host` is replaced.
pub fn socket_url(host: &str, port: u16) -> String {
    let host = match host.parse::<SocketAddr>() {
        Ok(addr) => addr.ip().to_string(),
        Err(_) => host.to_string(),
    };
    format!("ws://{}:{}", host, port)
}

fn connection(e: impl std::fmt::Display) -> Error {
    Error::Connection(e.to_string())
}

pub async fn connect(host: &str, port: u16, timeout: Duration) -> Result<LuxSocket> {
    let url = socket_url(host, port);
    let mut request = url.as_str().into_client_request().map_err(connection)?;
    request
        .headers_mut()
        .insert(PROTOCOL_HEADER, HeaderValue::from_static(SUBPROTOCOL));

    let (socket, _) = tokio::time::timeout(timeout, tokio_tungstenite::connect_async(request))
        .await
        .map_err(|_| Error::Connection(format!("timed out connecting to {}", url)))?
        .map_err(connection)?;

    tracing::info!("WebSocket connected to {}", url);
    Ok(socket)
}
