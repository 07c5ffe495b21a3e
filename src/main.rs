// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, path::Path, sync::Arc};
use tokio::sync::{broadcast, mpsc};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::live_service::{LiveFrame, LiveService};
use crate::application::session_service::SessionService;
use crate::infrastructure::config::load_settings;
use crate::infrastructure::device_client::DeviceClient;
use crate::infrastructure::merge_store::MergeStore;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::router;

/// Move frames of the current live session into the session and out to `/live` subscribers.
fn spawn_forwarder(
    mut frames: mpsc::Receiver<LiveFrame>,
    live_service: LiveService,
    session_service: SessionService,
    live_frames: broadcast::Sender<LiveFrame>,
) {
    tokio::spawn(async move {
        while let Some(live) = frames.recv().await {
            if !live_service.is_current(live.generation).await {
                tracing::debug!("Dropping frame of closed live session {}", live.generation);
                continue;
            }
            session_service.append(vec![live.frame.clone()]).await;
            // No subscribers is fine
            let _ = live_frames.send(live);
        }
    });
}

/// A missing or unreadable session file starts an empty session.
async fn restore_session(session_service: &SessionService, path: &Path) -> bool {
    match tokio::fs::try_exists(path).await {
        Ok(true) => {}
        Ok(false) => return false,
        Err(e) => {
            tracing::warn!("Cannot check session file {}: {}", path.display(), e);
            return false;
        }
    }

    match session_service.restore(path).await {
        Ok(restored) => {
            tracing::info!("Restored {} frames from {}", restored, path.display());
            true
        }
        Err(e) => {
            tracing::warn!("Starting with an empty session, {} is unusable: {}", path.display(), e);
            false
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let settings = load_settings()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(DeviceClient::new(&settings.device)?);
    let store = Arc::new(MergeStore::new());

    // Create services (application layer)
    let session_service = SessionService::new(repository, settings.chart.clone());
    let (live_service, frames) = LiveService::new(store, settings.device.clone());
    let (live_frames, _) = broadcast::channel(100);

    if let Some(path) = settings.session.path.as_deref() {
        restore_session(&session_service, path).await;
    }

    spawn_forwarder(
        frames,
        live_service.clone(),
        session_service.clone(),
        live_frames.clone(),
    );

    // Create application state
    let state = Arc::new(AppState {
        session_service: session_service.clone(),
        live_service: live_service.clone(),
        live_frames,
        settings: settings.clone(),
    });

    // Build router (presentation layer)
    // Note: responses are compressed by our own builders, so no CompressionLayer here
    let router = router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = settings.server.bind.parse()?;
    tracing::info!("Starting dtaplot service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    live_service.close().await;
    if let Some(path) = settings.session.path.as_deref() {
        session_service.save(path).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::device_repository::DeviceRepository;
    use crate::domain::error::{Error, Result};
    use crate::domain::frame::Frame;
    use crate::infrastructure::config::ChartSettings;
    use async_trait::async_trait;
    use bytes::Bytes;

    struct NoDevice;

    #[async_trait]
    impl DeviceRepository for NoDevice {
        async fn fetch_snapshot(&self, _host: &str) -> Result<Bytes> {
            Err(Error::Connection("no device".to_string()))
        }

        async fn read_values(&self, _host: &str) -> Result<Frame> {
            Err(Error::Connection("no device".to_string()))
        }
    }

    #[tokio::test]
    async fn test_corrupt_session_file_starts_empty() {
        let path = std::env::temp_dir().join(format!("dtaplot-main-{}.json", std::process::id()));
        tokio::fs::write(&path, b"{ not a session").await.unwrap();
        let session_service = SessionService::new(Arc::new(NoDevice), ChartSettings::default());

        assert!(!restore_session(&session_service, &path).await);
        assert_eq!(session_service.frame_count().await, 0);

        tokio::fs::remove_file(&path).await.unwrap();
        assert!(!restore_session(&session_service, &path).await);
    }
}
