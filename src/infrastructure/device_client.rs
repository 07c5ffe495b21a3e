// Controller access: snapshot download over HTTP, current values over the TCP service
use crate::application::device_repository::DeviceRepository;
use crate::domain::error::{Error, Result};
use crate::domain::frame::Frame;
use crate::infrastructure::config::DeviceSettings;
use crate::infrastructure::tcp;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// Path under which the controller serves its history buffer.
const SNAPSHOT_PATH: &str = "NewProc";

#[derive(Debug, Clone)]
pub struct DeviceClient {
    client: reqwest::Client,
    tcp_port: u16,
    timeout: Duration,
}

fn connection(e: impl std::fmt::Display) -> Error {
    Error::Connection(e.to_string())
}

pub fn snapshot_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{}/{}", host, SNAPSHOT_PATH)
    } else {
        format!("http://{}/{}", host, SNAPSHOT_PATH)
    }
}

impl DeviceClient {
    pub fn new(settings: &DeviceSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout())
            .build()
            .map_err(connection)?;
        Ok(Self {
            client,
            tcp_port: settings.tcp_port,
            timeout: settings.connect_timeout(),
        })
    }
}

#[async_trait]
impl DeviceRepository for DeviceClient {
    async fn fetch_snapshot(&self, host: &str) -> Result<Bytes> {
        let url = snapshot_url(host);
        tracing::debug!("Fetching snapshot from {}", url);

        let response = self.client.get(&url).send().await.map_err(connection)?;

        if !response.status().is_success() {
            return Err(Error::Connection(format!(
                "{} answered with status {}",
                url,
                response.status()
            )));
        }

        let bytes = response.bytes().await.map_err(connection)?;
        tracing::info!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes)
    }

    async fn read_values(&self, host: &str) -> Result<Frame> {
        let readout = tcp::fetch(host, self.tcp_port, self.timeout).await?;
        Ok(readout.to_frame())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn settings(tcp_port: u16) -> DeviceSettings {
        DeviceSettings {
            tcp_port,
            connect_timeout_secs: 2,
            ..DeviceSettings::default()
        }
    }

    #[test]
    fn test_snapshot_url() {
        assert_eq!(snapshot_url("192.168.1.50"), "http://192.168.1.50/NewProc");
        assert_eq!(snapshot_url("http://wp.local/"), "http://wp.local/NewProc");
    }

    #[tokio::test]
    async fn test_fetch_snapshot() {
        let router = Router::new().route("/NewProc", get(|| async { vec![0x11u8, 0x20, 0, 0] }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await });

        let client = DeviceClient::new(&settings(tcp::DEFAULT_PORT)).unwrap();
        let bytes = client.fetch_snapshot(&addr.to_string()).await.unwrap();

        assert_eq!(bytes.as_ref(), &[0x11, 0x20, 0, 0]);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_connection_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = DeviceClient::new(&settings(addr.port())).unwrap();

        assert!(matches!(
            client.fetch_snapshot(&addr.to_string()).await,
            Err(Error::Connection(_))
        ));
        assert!(matches!(
            client.read_values("127.0.0.1").await,
            Err(Error::Connection(_))
        ));
    }

    #[tokio::test]
    async fn test_read_values_uses_tcp_port() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            // Empty blocks for parameters, calculations and visibilities
            for status in [None, Some(0), None] {
                let command = socket.read_i32().await.unwrap();
                socket.read_i32().await.unwrap();
                socket.write_i32(command).await.unwrap();
                if let Some(status) = status {
                    socket.write_i32(status).await.unwrap();
                }
                socket.write_i32(0).await.unwrap();
            }
        });

        let client = DeviceClient::new(&settings(port)).unwrap();
        let frame = client.read_values("http://127.0.0.1:80/").await.unwrap();

        assert_eq!(frame.len(), 1);
        assert!(frame.time().is_some());
    }
}
