// Session files: frames as flat JSON objects, wrapped together with the chart selection
use crate::domain::error::{Error, Result};
use crate::domain::frame::{append_unique, Frame};
use crate::domain::value::{RawValue, Value};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number};
use std::path::Path;

type Object = Map<String, serde_json::Value>;

/// Frames plus the names of the columns on display when they were saved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub frames: Vec<Frame>,
    pub displayed: Vec<String>,
}

#[derive(Serialize)]
struct StoredSession<'a> {
    frames: Vec<serde_json::Value>,
    displayed: &'a [String],
}

/// Either the wrapped form or the bare frame array the desktop tool writes.
#[derive(Deserialize)]
#[serde(untagged)]
enum Stored {
    Frames(Vec<Object>),
    Session {
        frames: Vec<Object>,
        #[serde(default)]
        displayed: Vec<String>,
    },
}

fn persistence(e: impl std::fmt::Display) -> Error {
    Error::Persistence(e.to_string())
}

fn to_json(value: &Value) -> serde_json::Value {
    match value.get() {
        RawValue::Number(n) => Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        RawValue::Integer(i) => serde_json::Value::from(*i),
        RawValue::Text(s) => serde_json::Value::String(s.clone()),
        RawValue::Bool(b) => serde_json::Value::Bool(*b),
    }
}

/// Boolean arrays become one column per bit: `name[0]`, `name[1]`, ...
fn insert_bits(frame: &mut Frame, name: &str, items: &[serde_json::Value]) {
    let bits: Option<Vec<bool>> = items.iter().map(serde_json::Value::as_bool).collect();
    match bits {
        Some(bits) => {
            for (i, bit) in bits.into_iter().enumerate() {
                frame.insert(format!("{}[{}]", name, i), Value::bool(bit));
            }
        }
        None => tracing::warn!("Skipping column {}: array holds non-boolean items", name),
    }
}

fn insert_json(frame: &mut Frame, name: String, value: serde_json::Value) -> Result<()> {
    let value = match value {
        serde_json::Value::Null => return Ok(()),
        serde_json::Value::Bool(b) => Value::bool(b),
        serde_json::Value::String(s) => Value::text(s),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::integer(i),
            None => {
                let n = n
                    .as_f64()
                    .ok_or_else(|| persistence(format!("{} is out of range", name)))?;
                Value::number(n)
            }
        },
        serde_json::Value::Array(items) => {
            insert_bits(frame, &name, &items);
            return Ok(());
        }
        serde_json::Value::Object(_) => {
            tracing::warn!("Skipping column {}: nested object", name);
            return Ok(());
        }
    };
    frame.insert(name, value);
    Ok(())
}

fn frame_from_object(object: Object) -> Result<Frame> {
    let mut frame = Frame::new();
    for (name, value) in object {
        insert_json(&mut frame, name, value)?;
    }
    Ok(frame)
}

/// Flat JSON object of one frame.
pub fn frame_object(frame: &Frame) -> serde_json::Value {
    let object: Object = frame
        .iter()
        .map(|(name, value)| (name.to_string(), to_json(value)))
        .collect();
    serde_json::Value::Object(object)
}

/// Bare frame array, readable by the desktop tool.
pub fn serialize(frames: &[Frame]) -> Result<Vec<u8>> {
    let array: Vec<serde_json::Value> = frames.iter().map(frame_object).collect();
    serde_json::to_vec(&array).map_err(persistence)
}

pub fn serialize_session(session: &Session) -> Result<Vec<u8>> {
    let stored = StoredSession {
        frames: session.frames.iter().map(frame_object).collect(),
        displayed: &session.displayed,
    };
    serde_json::to_vec(&stored).map_err(persistence)
}

pub fn deserialize_session(bytes: &[u8]) -> Result<Session> {
    let (objects, displayed) = match serde_json::from_slice(bytes).map_err(persistence)? {
        Stored::Frames(frames) => (frames, Vec::new()),
        Stored::Session { frames, displayed } => (frames, displayed),
    };
    let frames = objects
        .into_iter()
        .map(frame_from_object)
        .collect::<Result<Vec<_>>>()?;
    Ok(Session { frames, displayed })
}

pub fn deserialize(bytes: &[u8]) -> Result<Vec<Frame>> {
    Ok(deserialize_session(bytes)?.frames)
}

/// Write `session` next to `path` and rename over it.
pub async fn save(path: &Path, session: &Session) -> Result<()> {
    let bytes = serialize_session(session)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(persistence)?;
    }

    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, &bytes).await.map_err(persistence)?;
    tokio::fs::rename(&tmp, path).await.map_err(persistence)?;

    tracing::info!(
        "Saved {} frames and {} displayed columns to {}",
        session.frames.len(),
        session.displayed.len(),
        path.display()
    );
    Ok(())
}

pub async fn load(path: &Path) -> Result<Session> {
    let bytes = tokio::fs::read(path).await.map_err(persistence)?;
    deserialize_session(&bytes)
}

/// Merge `frames` into the file at `path`, creating it when missing. The stored selection is kept.
pub async fn append(path: &Path, frames: Vec<Frame>) -> Result<usize> {
    let mut session = match tokio::fs::try_exists(path).await.map_err(persistence)? {
        true => load(path).await?,
        false => Session::default(),
    };
    let added = append_unique(&mut session.frames, frames);
    save(path, &session).await?;
    Ok(added)
}
