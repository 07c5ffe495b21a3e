// Live service - one WebSocket session at a time, merged frames pushed over a channel
use crate::domain::error::{Error, Result};
use crate::domain::frame::Frame;
use crate::infrastructure::config::DeviceSettings;
use crate::infrastructure::merge_store::{Fragment, MergeStore};
use crate::infrastructure::websocket::{self, command, LuxSocket};
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::protocol::Message;

const FIRST_REFRESH: Duration = Duration::from_millis(10);
const REFRESH_PERIOD: Duration = Duration::from_secs(1);
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// A merged frame and the connection it came from.
#[derive(Debug, Clone)]
pub struct LiveFrame {
    pub generation: u64,
    pub frame: Frame,
}

struct Connection {
    generation: u64,
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

#[derive(Clone)]
pub struct LiveService {
    store: Arc<MergeStore>,
    settings: DeviceSettings,
    frames: mpsc::Sender<LiveFrame>,
    connection: Arc<Mutex<Option<Connection>>>,
    generation: Arc<AtomicU64>,
}

impl LiveService {
    pub fn new(store: Arc<MergeStore>, settings: DeviceSettings) -> (Self, mpsc::Receiver<LiveFrame>) {
        let (tx, rx) = mpsc::channel(100);
        let service = Self {
            store,
            settings,
            frames: tx,
            connection: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        };
        (service, rx)
    }

    /// Connect, log in and start refreshing. Returns the new generation.
    pub async fn open(&self, host: &str, password: &str) -> Result<u64> {
        let mut connection = self.connection.lock().await;
        if connection.as_ref().is_some_and(|c| !c.task.is_finished()) {
            return Err(Error::InvalidOperation(
                "live session already connected".to_string(),
            ));
        }

        let socket = websocket::connect(
            host,
            self.settings.ws_port,
            self.settings.connect_timeout(),
        )
        .await?;

        // ids are per controller, nothing carries over from an earlier session
        self.store.clear();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (stop, stopped) = oneshot::channel();
        let task = tokio::spawn(run(
            socket,
            command::login(password),
            self.store.clone(),
            self.frames.clone(),
            generation,
            stopped,
        ));

        *connection = Some(Connection {
            generation,
            stop,
            task,
        });
        tracing::info!("Live session {} opened to {}", generation, host);
        Ok(generation)
    }

    /// Stop refreshing and close the socket. Returns whether a session was open.
    pub async fn close(&self) -> bool {
        let Some(mut connection) = self.connection.lock().await.take() else {
            return false;
        };

        let _ = connection.stop.send(());
        if tokio::time::timeout(CLOSE_GRACE, &mut connection.task).await.is_err() {
            tracing::warn!(
                "Live session {} did not stop in time, aborting it",
                connection.generation
            );
            connection.task.abort();
        }
        tracing::info!("Live session {} closed", connection.generation);
        true
    }

    /// Generation of the running session, if any.
    pub async fn current_generation(&self) -> Option<u64> {
        self.connection
            .lock()
            .await
            .as_ref()
            .filter(|c| !c.task.is_finished())
            .map(|c| c.generation)
    }

    pub async fn is_current(&self, generation: u64) -> bool {
        self.current_generation().await == Some(generation)
    }
}

async fn run(
    socket: LuxSocket,
    login: String,
    store: Arc<MergeStore>,
    frames: mpsc::Sender<LiveFrame>,
    generation: u64,
    mut stop: oneshot::Receiver<()>,
) {
    let (mut sink, mut stream) = socket.split();

    if let Err(e) = sink.send(Message::Text(login.into())).await {
        tracing::error!("Live session {}: login failed: {}", generation, e);
        return;
    }

    let mut refresh = interval_at(Instant::now() + FIRST_REFRESH, REFRESH_PERIOD);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = &mut stop => {
                if let Err(e) = sink.send(Message::Close(None)).await {
                    tracing::debug!("Live session {}: close frame not sent: {}", generation, e);
                }
                break;
            }
            _ = refresh.tick() => {
                if let Err(e) = sink.send(Message::Text(command::REFRESH.into())).await {
                    tracing::warn!("Live session {}: refresh failed: {}", generation, e);
                    break;
                }
            }
            message = stream.next() => match message {
                Some(Ok(Message::Text(text))) => match store.on_fragment(&text) {
                    Ok(Fragment::Values(_)) => {
                        let live = LiveFrame { generation, frame: store.merge_now() };
                        if frames.send(live).await.is_err() {
                            tracing::debug!("Live session {}: no consumer left", generation);
                            break;
                        }
                    }
                    Ok(Fragment::Request(request)) => {
                        tracing::debug!("Live session {}: sending {}", generation, request);
                        if let Err(e) = sink.send(Message::Text(request.into())).await {
                            tracing::warn!("Live session {}: request failed: {}", generation, e);
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Live session {}: dropped fragment: {}", generation, e),
                },
                Some(Ok(Message::Close(reason))) => {
                    tracing::info!("Live session {}: closed by device {:?}", generation, reason);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("Live session {}: {}", generation, e);
                    break;
                }
                None => break,
            }
        }
    }
}
