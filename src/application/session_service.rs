// Session service - owns the frame collection, the reduction cache and the chart selection
use crate::application::device_repository::DeviceRepository;
use crate::domain::error::{Error, Result};
use crate::domain::frame::{append_unique, Frame};
use crate::domain::reduction::{Chart, ValidData};
use crate::domain::series::ChartSeries;
use crate::infrastructure::config::ChartSettings;
use crate::infrastructure::dta;
use crate::infrastructure::persistence::{self, Session};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct SessionState {
    frames: Vec<Frame>,
    /// Rebuilt lazily; dropped whenever `frames` changes.
    valid: Option<Arc<ValidData>>,
    chart: Chart,
}

impl SessionState {
    fn valid_data(&mut self) -> Arc<ValidData> {
        self.valid
            .get_or_insert_with(|| Arc::new(ValidData::reduce(&self.frames)))
            .clone()
    }

    /// Display every saved column that is still chartable.
    fn select(&mut self, names: &[String]) {
        let valid = self.valid_data();
        for name in names {
            if valid.has_column(name) {
                self.chart.display(name.as_str(), valid.unit(name), valid.series(name));
            } else {
                tracing::debug!("Saved column {} is not chartable, skipping it", name);
            }
        }
    }

    fn append(&mut self, frames: Vec<Frame>, default_column: &str) -> usize {
        let added = append_unique(&mut self.frames, frames);
        if added > 0 {
            self.valid = None;
            self.refresh_chart(default_column);
        }
        added
    }

    /// Re-extract every displayed column from the current reduction.
    fn refresh_chart(&mut self, default_column: &str) {
        let valid = self.valid_data();
        for name in self.chart.names() {
            if valid.has_column(&name) {
                self.chart.display(name.as_str(), valid.unit(&name), valid.series(&name));
            } else {
                tracing::debug!("Column {} no longer varies, hiding it", name);
                self.chart.hide(&name);
            }
        }
        if self.chart.is_empty() && valid.has_column(default_column) {
            self.chart.display(
                default_column,
                valid.unit(default_column),
                valid.series(default_column),
            );
        }
    }
}

#[derive(Clone)]
pub struct SessionService {
    repository: Arc<dyn DeviceRepository>,
    settings: ChartSettings,
    state: Arc<RwLock<SessionState>>,
}

impl SessionService {
    pub fn new(repository: Arc<dyn DeviceRepository>, settings: ChartSettings) -> Self {
        let state = SessionState {
            chart: Chart::new(settings.sample_interval),
            ..SessionState::default()
        };
        Self {
            repository,
            settings,
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Download, decode and append the controller's snapshot.
    ///
    /// A buffer that fails to decode contributes nothing; the session is left as it was.
    pub async fn load_from_device(&self, host: &str) -> Result<usize> {
        let bytes = self.repository.fetch_snapshot(host).await?;
        let frames = dta::parse(&bytes).inspect_err(|e| {
            tracing::warn!("Discarding snapshot from {}: {}", host, e);
        })?;
        Ok(self.append(frames).await)
    }

    /// Read the controller's current values over its TCP service and append them as one frame.
    pub async fn load_values(&self, host: &str) -> Result<usize> {
        let frame = self.repository.read_values(host).await?;
        Ok(self.append(vec![frame]).await)
    }

    /// Append frames whose time is not known yet. Returns how many were new.
    pub async fn append(&self, frames: Vec<Frame>) -> usize {
        let mut state = self.state.write().await;
        let added = state.append(frames, &self.settings.default_column);
        tracing::info!("Appended {} frames, {} total", added, state.frames.len());
        added
    }

    async fn valid_data(&self) -> Arc<ValidData> {
        if let Some(valid) = self.state.read().await.valid.clone() {
            return valid;
        }
        self.state.write().await.valid_data()
    }

    pub async fn valid_columns(&self) -> Vec<String> {
        self.valid_data().await.columns().to_vec()
    }

    pub async fn show(&self, name: &str) -> Result<ChartSeries> {
        let mut state = self.state.write().await;
        let valid = state.valid_data();
        if !valid.has_column(name) {
            return Err(Error::InvalidOperation(format!(
                "{} is not a chartable column",
                name
            )));
        }
        state.chart.display(name, valid.unit(name), valid.series(name));
        state
            .chart
            .get(name)
            .ok_or_else(|| Error::InvalidOperation(format!("{} is not displayed", name)))
    }

    pub async fn hide(&self, name: &str) -> bool {
        self.state.write().await.chart.hide(name)
    }

    pub async fn is_displayed(&self, name: &str) -> bool {
        self.state.read().await.chart.is_displayed(name)
    }

    pub async fn chart(&self) -> Vec<ChartSeries> {
        self.state.read().await.chart.series()
    }

    pub async fn format_tick(&self, index: i64) -> Option<String> {
        self.state
            .read()
            .await
            .chart
            .format_tick(index, &self.settings.tick_format)
    }

    pub async fn snapshot(&self) -> Vec<Frame> {
        self.state.read().await.frames.clone()
    }

    pub async fn frame_count(&self) -> usize {
        self.state.read().await.frames.len()
    }

    /// Frames together with the displayed column names.
    pub async fn session(&self) -> Session {
        let state = self.state.read().await;
        Session {
            frames: state.frames.clone(),
            displayed: state.chart.names(),
        }
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        let session = self.session().await;
        persistence::save(path, &session).await
    }

    pub async fn restore(&self, path: &Path) -> Result<usize> {
        let session = persistence::load(path).await?;
        Ok(self.apply(session).await)
    }

    /// Restore from serialized session bytes.
    pub async fn restore_bytes(&self, bytes: &[u8]) -> Result<usize> {
        let session = persistence::deserialize_session(bytes)?;
        Ok(self.apply(session).await)
    }

    async fn apply(&self, session: Session) -> usize {
        let mut state = self.state.write().await;
        let was_empty = state.chart.is_empty();
        let added = state.append(session.frames, &self.settings.default_column);
        // A saved selection replaces the default column, never a selection made here
        if was_empty && !session.displayed.is_empty() {
            state.chart.clear();
        }
        state.select(&session.displayed);
        tracing::info!(
            "Restored {} frames, {} total, {} columns displayed",
            added,
            state.frames.len(),
            state.chart.names().len()
        );
        added
    }
}
