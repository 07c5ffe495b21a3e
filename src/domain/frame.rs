// Frame domain model - one timestamped snapshot of named datapoints
use super::value::Value;
use std::collections::{BTreeMap, HashSet};

pub const TIME_COLUMN: &str = "time";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    columns: BTreeMap<String, Value>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time(time: i64) -> Self {
        let mut frame = Self::new();
        frame.insert(TIME_COLUMN, Value::integer(time));
        frame
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.columns.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.columns.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Numeric time column in whole seconds, if present.
    pub fn time(&self) -> Option<i64> {
        self.get(TIME_COLUMN)
            .and_then(Value::as_f64)
            .map(|t| t as i64)
    }

    /// Numeric value of `name`, if present and numeric.
    pub fn numeric(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FromIterator<(String, Value)> for Frame {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

/// Append the frames of `incoming` whose time is not in `frames` yet.
///
/// Frames without a numeric time are dropped. Returns how many were appended.
pub fn append_unique(frames: &mut Vec<Frame>, incoming: impl IntoIterator<Item = Frame>) -> usize {
    let mut seen: HashSet<i64> = frames.iter().filter_map(Frame::time).collect();
    let before = frames.len();
    for frame in incoming {
        match frame.time() {
            Some(time) if seen.insert(time) => frames.push(frame),
            Some(_) => {}
            None => tracing::warn!("Dropping frame without a time column"),
        }
    }
    frames.len() - before
}
