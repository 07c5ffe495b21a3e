// Repository trait for reads from the controller
use crate::domain::error::Result;
use crate::domain::frame::Frame;
use async_trait::async_trait;
use bytes::Bytes;

#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// Raw DTA snapshot currently held by the controller at `host`.
    async fn fetch_snapshot(&self, host: &str) -> Result<Bytes>;

    /// Current parameters, calculations and visibilities as one frame.
    async fn read_values(&self, host: &str) -> Result<Frame>;
}
