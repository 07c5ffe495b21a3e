// Application state for HTTP handlers
use crate::application::live_service::{LiveFrame, LiveService};
use crate::application::session_service::SessionService;
use crate::infrastructure::config::Settings;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct AppState {
    pub session_service: SessionService,
    pub live_service: LiveService,
    /// Frames of the current live session, fanned out to `/live` subscribers.
    pub live_frames: broadcast::Sender<LiveFrame>,
    pub settings: Settings,
}
