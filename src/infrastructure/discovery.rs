// UDP broadcast discovery of controllers on the local network
use crate::infrastructure::config::DiscoverySettings;
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::UdpSocket;

const MAGIC_PACKET: &str = "2000;111;1;\u{0}";
const RESPONSE_PREFIX: &str = "2500;111;";

/// Device port announced in a discovery answer.
///
/// `None` for our own broadcast echo, foreign packets and answers without a usable port.
pub fn parse_response(payload: &[u8]) -> Option<u16> {
    let text = String::from_utf8_lossy(payload);
    if text.starts_with(MAGIC_PACKET) {
        return None;
    }
    let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    if !text.starts_with(RESPONSE_PREFIX) {
        tracing::debug!("Ignoring unrelated discovery answer {:?}", text);
        return None;
    }
    match text.split(';').nth(2).and_then(|p| p.trim().parse::<u16>().ok()) {
        Some(port) if port >= 1 => Some(port),
        _ => {
            tracing::debug!("Discovery answer without a valid port: {:?}", text);
            None
        }
    }
}

async fn discover_on(port: u16, settings: &DiscoverySettings) -> std::io::Result<Vec<SocketAddr>> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, port)).await?;
    socket.set_broadcast(true)?;
    socket
        .send_to(MAGIC_PACKET.as_bytes(), (Ipv4Addr::BROADCAST, port))
        .await?;

    let mut found = Vec::new();
    let mut buf = [0u8; 1024];
    let deadline = tokio::time::Instant::now() + settings.timeout();
    loop {
        let received = tokio::time::timeout_at(deadline, socket.recv_from(&mut buf)).await;
        let Ok(result) = received else {
            break;
        };
        let (len, from) = result?;
        if let Some(device_port) = parse_response(&buf[..len]) {
            tracing::info!("Found controller at {}:{}", from.ip(), device_port);
            found.push(SocketAddr::new(from.ip(), device_port));
        }
    }
    Ok(found)
}

/// Broadcast on every configured port and collect the answers.
pub async fn discover(settings: &DiscoverySettings) -> Vec<SocketAddr> {
    let mut found: Vec<SocketAddr> = Vec::new();
    for &port in &settings.ports {
        match discover_on(port, settings).await {
            Ok(addresses) => {
                for address in addresses {
                    if !found.contains(&address) {
                        found.push(address);
                    }
                }
            }
            Err(e) => tracing::error!("Discovery on port {} failed: {}", port, e),
        }
    }
    found
}
