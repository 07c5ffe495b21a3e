// HTTP request handlers
use crate::domain::error::Error;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_bytes_response, json_response};
use crate::infrastructure::{discovery, persistence};
use crate::presentation::app_state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct HostQuery {
    pub host: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct OpenRequest {
    pub host: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
struct Appended {
    added: usize,
    total: usize,
}

#[derive(Serialize)]
struct Opened {
    generation: u64,
}

#[derive(Serialize)]
struct Closed {
    closed: bool,
}

fn error_status(error: &Error) -> StatusCode {
    match error {
        Error::Connection(_) => StatusCode::BAD_GATEWAY,
        Error::InvalidOperation(_) => StatusCode::CONFLICT,
        Error::Parse { .. }
        | Error::Protocol(_)
        | Error::TypeMismatch { .. }
        | Error::Persistence(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn error_response(error: Error) -> Response {
    let status = error_status(&error);
    if status == StatusCode::BAD_GATEWAY {
        tracing::error!("{}", error);
    } else {
        tracing::warn!("{}", error);
    }
    (status, error.to_string()).into_response()
}

/// Requested host, falling back to the configured one. `None` when both are blank.
fn resolve_host(requested: Option<String>, configured: &str) -> Option<String> {
    requested
        .filter(|h| !h.trim().is_empty())
        .or_else(|| Some(configured.to_string()).filter(|h| !h.trim().is_empty()))
}

fn no_host() -> Response {
    (StatusCode::BAD_REQUEST, "no controller host given or configured").into_response()
}

async fn json<T: Serialize>(data: &T, compress: bool) -> Response {
    match json_response(data, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Download the controller's snapshot and append it to the session
pub async fn load(
    Query(query): Query<HostQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(host) = resolve_host(query.host, &state.settings.device.host) else {
        return no_host();
    };

    match state.session_service.load_from_device(&host).await {
        Ok(added) => {
            let total = state.session_service.frame_count().await;
            json(&Appended { added, total }, accepts_brotli(&headers)).await
        }
        Err(e) => error_response(e),
    }
}

/// Read the controller's current values and append them as one frame
pub async fn load_values(
    Query(query): Query<HostQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(host) = resolve_host(query.host, &state.settings.device.host) else {
        return no_host();
    };

    match state.session_service.load_values(&host).await {
        Ok(added) => {
            let total = state.session_service.frame_count().await;
            json(&Appended { added, total }, accepts_brotli(&headers)).await
        }
        Err(e) => error_response(e),
    }
}

pub async fn columns(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let columns = state.session_service.valid_columns().await;
    json(&columns, accepts_brotli(&headers)).await
}

pub async fn chart(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let series = state.session_service.chart().await;
    json(&series, accepts_brotli(&headers)).await
}

pub async fn show_series(
    Path(name): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.session_service.show(&name).await {
        Ok(series) => json(&series, accepts_brotli(&headers)).await,
        Err(Error::InvalidOperation(reason)) => (StatusCode::NOT_FOUND, reason).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn hide_series(Path(name): Path<String>, State(state): State<Arc<AppState>>) -> StatusCode {
    if state.session_service.hide(&name).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

pub async fn tick_label(Path(index): Path<i64>, State(state): State<Arc<AppState>>) -> Response {
    match state.session_service.format_tick(index).await {
        Some(label) => label.into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serialized session, brotli encoded when the client accepts it
pub async fn export_session(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let session = state.session_service.session().await;
    let bytes = match persistence::serialize_session(&session) {
        Ok(bytes) => bytes,
        Err(e) => return error_response(e),
    };

    match json_bytes_response(bytes, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

pub async fn import_session(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    match state.session_service.restore_bytes(&body).await {
        Ok(added) => {
            let total = state.session_service.frame_count().await;
            json(&Appended { added, total }, false).await
        }
        Err(e) => error_response(e),
    }
}

pub async fn open_live(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OpenRequest>,
) -> Response {
    let device = &state.settings.device;
    let Some(host) = resolve_host(request.host, &device.host) else {
        return no_host();
    };
    let password = request.password.unwrap_or_else(|| device.password.clone());

    match state.live_service.open(&host, &password).await {
        Ok(generation) => json(&Opened { generation }, false).await,
        Err(e) => error_response(e),
    }
}

pub async fn close_live(State(state): State<Arc<AppState>>) -> Response {
    let closed = state.live_service.close().await;
    json(&Closed { closed }, false).await
}

/// Stream live frames (progressive, length-prefixed chunks)
pub async fn stream_live(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);
    stream_from_receiver(state.live_frames.subscribe(), compress)
}

pub async fn discover(State(state): State<Arc<AppState>>) -> Response {
    let found: Vec<String> = discovery::discover(&state.settings.discovery)
        .await
        .into_iter()
        .map(|address| address.to_string())
        .collect();
    json(&found, false).await
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/load", post(load))
        .route("/values", post(load_values))
        .route("/columns", get(columns))
        .route("/chart", get(chart))
        .route("/chart/:name", put(show_series).delete(hide_series))
        .route("/ticks/:index", get(tick_label))
        .route("/session", get(export_session).post(import_session))
        .route("/live/open", post(open_live))
        .route("/live/close", post(close_live))
        .route("/live", get(stream_live))
        .route("/discover", get(discover))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::device_repository::DeviceRepository;
    use crate::application::live_service::LiveService;
    use crate::application::session_service::SessionService;
    use crate::domain::error::Result;
    use crate::domain::frame::Frame;
    use crate::infrastructure::config::Settings;
    use crate::infrastructure::merge_store::MergeStore;
    use async_trait::async_trait;
    use tokio::sync::broadcast;

    struct FixedRepository(Option<Bytes>);

    #[async_trait]
    impl DeviceRepository for FixedRepository {
        async fn fetch_snapshot(&self, _host: &str) -> Result<Bytes> {
            self.0
                .clone()
                .ok_or_else(|| Error::Connection("unreachable".to_string()))
        }

        async fn read_values(&self, _host: &str) -> Result<Frame> {
            self.0
                .as_ref()
                .map(|_| Frame::with_time(5_000))
                .ok_or_else(|| Error::Connection("unreachable".to_string()))
        }
    }

    /// 8209 snapshot; TVL is the only column that changes.
    fn snapshot() -> Bytes {
        let mut data = 8209u32.to_le_bytes().to_vec();
        data.extend_from_slice(&[0; 4]);
        for (time, raw) in [(1_000i32, 190i16), (1_120, 200), (1_240, 210)] {
            let mut record = vec![0u8; 168];
            record[0..4].copy_from_slice(&time.to_le_bytes());
            record[62..64].copy_from_slice(&raw.to_le_bytes());
            data.extend(record);
        }
        Bytes::from(data)
    }

    async fn serve(snapshot: Option<Bytes>, device_host: &str) -> String {
        let mut settings = Settings::default();
        settings.device.host = device_host.to_string();

        let session_service = SessionService::new(
            Arc::new(FixedRepository(snapshot)),
            settings.chart.clone(),
        );
        let (live_service, _frames) =
            LiveService::new(Arc::new(MergeStore::new()), settings.device.clone());
        let (live_frames, _) = broadcast::channel(16);
        let state = Arc::new(AppState {
            session_service,
            live_service,
            live_frames,
            settings,
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{}", address)
    }

    #[test]
    fn test_resolve_host() {
        assert_eq!(resolve_host(Some("wp".into()), "cfg"), Some("wp".to_string()));
        assert_eq!(resolve_host(Some(" ".into()), "cfg"), Some("cfg".to_string()));
        assert_eq!(resolve_host(None, ""), None);
    }

    #[test]
    fn test_error_status() {
        assert_eq!(
            error_status(&Error::Connection(String::new())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            error_status(&Error::parse(0, "short")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            error_status(&Error::InvalidOperation(String::new())),
            StatusCode::CONFLICT
        );
    }

    #[tokio::test]
    async fn test_load_and_chart() {
        let base = serve(Some(snapshot()), "wp").await;
        let client = reqwest::Client::new();

        let health = client.get(format!("{}/healthz", base)).send().await.unwrap();
        assert_eq!(health.text().await.unwrap(), "ok");

        let loaded: serde_json::Value = client
            .post(format!("{}/load", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(loaded["added"], 3);
        assert_eq!(loaded["total"], 3);

        let columns: Vec<String> = client
            .get(format!("{}/columns", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(columns, vec!["TVL"]);

        let chart: serde_json::Value = client
            .get(format!("{}/chart", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(chart[0]["name"], "TVL");
        assert_eq!(chart[0]["ticks"], serde_json::json!([0, 1, 2]));

        let tick = client.get(format!("{}/ticks/1", base)).send().await.unwrap();
        assert_eq!(tick.status(), reqwest::StatusCode::OK);
        let tick = client
            .get(format!("{}/ticks/{}", base, i64::MAX))
            .send()
            .await
            .unwrap();
        assert_eq!(tick.status(), reqwest::StatusCode::NOT_FOUND);

        let unknown = client.put(format!("{}/chart/HUP", base)).send().await.unwrap();
        assert_eq!(unknown.status(), reqwest::StatusCode::NOT_FOUND);

        let hidden = client.delete(format!("{}/chart/TVL", base)).send().await.unwrap();
        assert_eq!(hidden.status(), reqwest::StatusCode::NO_CONTENT);
        let hidden = client.delete(format!("{}/chart/TVL", base)).send().await.unwrap();
        assert_eq!(hidden.status(), reqwest::StatusCode::NOT_FOUND);

        let shown = client.put(format!("{}/chart/TVL", base)).send().await.unwrap();
        assert_eq!(shown.status(), reqwest::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_load_errors() {
        let unconfigured = serve(Some(snapshot()), "").await;
        let client = reqwest::Client::new();
        let response = client.post(format!("{}/load", unconfigured)).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

        let unreachable = serve(None, "wp").await;
        let response = client.post(format!("{}/load", unreachable)).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);

        let garbage = serve(Some(Bytes::from_static(&[1, 2, 3])), "wp").await;
        let response = client.post(format!("{}/load", garbage)).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_values() {
        let client = reqwest::Client::new();
        let base = serve(Some(snapshot()), "wp").await;
        let loaded: serde_json::Value = client
            .post(format!("{}/values?host=10.0.0.2", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(loaded["added"], 1);
        assert_eq!(loaded["total"], 1);

        let unreachable = serve(None, "wp").await;
        let response = client.post(format!("{}/values", unreachable)).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_session_export_and_import() {
        let source = serve(Some(snapshot()), "wp").await;
        let client = reqwest::Client::new();
        client.post(format!("{}/load", source)).send().await.unwrap();

        let exported = client
            .get(format!("{}/session", source))
            .send()
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        let session = persistence::deserialize_session(&exported).unwrap();
        assert_eq!(session.frames.len(), 3);
        assert_eq!(session.displayed, vec!["TVL"]);

        let target = serve(None, "").await;
        let imported: serde_json::Value = client
            .post(format!("{}/session", target))
            .body(exported)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(imported["added"], 3);

        let rejected = client
            .post(format!("{}/session", target))
            .body("not json")
            .send()
            .await
            .unwrap();
        assert_eq!(rejected.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_live_close_without_session() {
        let base = serve(None, "").await;
        let client = reqwest::Client::new();

        let closed: serde_json::Value = client
            .post(format!("{}/live/close", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(closed["closed"], false);

        let response = client
            .post(format!("{}/live/open", base))
            .json(&serde_json::json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    }
}
