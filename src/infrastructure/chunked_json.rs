// Chunked JSON streaming of live frames
use crate::application::live_service::LiveFrame;
use crate::infrastructure::http_response::brotli;
use crate::infrastructure::persistence::frame_object;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};

/// One chunk as seen by the client.
#[derive(Debug, Serialize)]
pub struct FrameMessage {
    pub generation: u64,
    pub frame: serde_json::Value,
}

impl From<&LiveFrame> for FrameMessage {
    fn from(live: &LiveFrame) -> Self {
        Self {
            generation: live.generation,
            frame: frame_object(&live.frame),
        }
    }
}

/// Create a chunked streaming response
pub fn chunked_json_stream<S>(stream: S, compress: bool) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = FrameMessage> + Send + 'static,
{
    let byte_stream = stream.then(move |msg| async move { serialize_chunk(msg, compress).await });

    let body = Body::from_stream(byte_stream);

    // Chunks are compressed one by one, so no Content-Encoding for the response itself.
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serialize a single message to a `u32` big-endian length-prefixed chunk
pub async fn serialize_chunk(msg: FrameMessage, compress: bool) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(&msg)?;

    let payload = if compress { brotli(json).await? } else { json };

    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(payload.len() as u32);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

/// Stream live frames from a broadcast subscription; lagging clients skip what they missed.
pub fn stream_from_receiver(
    mut rx: broadcast::Receiver<LiveFrame>,
    compress: bool,
) -> impl IntoResponse {
    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(live) => yield FrameMessage::from(&live),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Live stream client lagged, skipped {} frames", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    match chunked_json_stream(stream, compress) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
