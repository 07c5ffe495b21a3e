// Incremental id -> name / id -> value resolver for the live XML protocol
use crate::domain::error::{Error, Result};
use crate::domain::frame::Frame;
use crate::domain::value::{RawValue, Value};
use quick_xml::events::Event;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Navigation entry whose content holds the readings.
const INFORMATION_PAGE: &str = "Informationen";

#[derive(Debug, Deserialize)]
struct ValuesXml {
    #[serde(rename = "item", default)]
    items: Vec<ValueItem>,
}

#[derive(Debug, Deserialize)]
struct ValueItem {
    #[serde(rename = "@id")]
    id: String,
    #[serde(default)]
    value: Option<String>,
}

/// Shared shape of `Content` and `Navigation`: items nest arbitrarily deep.
#[derive(Debug, Deserialize)]
struct TreeXml {
    #[serde(rename = "item", default)]
    items: Vec<TreeItem>,
}

#[derive(Debug, Deserialize)]
struct TreeItem {
    #[serde(rename = "@id")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "item", default)]
    items: Vec<TreeItem>,
}

impl TreeItem {
    fn walk<'a>(&'a self, out: &mut Vec<&'a TreeItem>) {
        out.push(self);
        for child in &self.items {
            child.walk(out);
        }
    }
}

fn flatten(items: &[TreeItem]) -> Vec<&TreeItem> {
    let mut out = Vec::new();
    for item in items {
        item.walk(&mut out);
    }
    out
}

/// What a fragment did to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Number of value pairs applied.
    Values(usize),
    /// Number of name pairs applied.
    Names(usize),
    /// Message the caller should send back to the device.
    Request(String),
    /// Root tag that carries nothing for the store.
    Ignored(String),
}

#[derive(Debug, Default)]
struct Maps {
    id_to_value: HashMap<String, String>,
    id_to_name: HashMap<String, String>,
}

#[derive(Debug, Default)]
pub struct MergeStore {
    maps: RwLock<Maps>,
}

fn protocol(e: impl std::fmt::Display) -> Error {
    Error::Protocol(e.to_string())
}

fn root_tag(xml: &str) -> Result<String> {
    let mut reader = quick_xml::Reader::from_str(xml);
    loop {
        match reader.read_event().map_err(protocol)? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Event::Eof => return Err(Error::Protocol("fragment has no root element".to_string())),
            _ => {}
        }
    }
}

impl MergeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one XML fragment and apply it.
    ///
    /// Parsing completes before the write lock is taken, so a failed fragment leaves the
    /// store untouched and a reader never sees half of one.
    pub fn on_fragment(&self, xml: &str) -> Result<Fragment> {
        let root = root_tag(xml)?;
        match root.as_str() {
            "values" => {
                let parsed: ValuesXml = quick_xml::de::from_str(xml).map_err(protocol)?;
                let pairs: Vec<(String, String)> = parsed
                    .items
                    .into_iter()
                    .map(|item| (item.id, item.value.unwrap_or_default()))
                    .collect();
                let count = pairs.len();
                self.write().id_to_value.extend(pairs);
                tracing::debug!("Applied {} values", count);
                Ok(Fragment::Values(count))
            }
            "Content" => {
                let parsed: TreeXml = quick_xml::de::from_str(xml).map_err(protocol)?;
                let pairs: Vec<(String, String)> = flatten(&parsed.items)
                    .into_iter()
                    .filter_map(|item| item.name.clone().map(|name| (item.id.clone(), name)))
                    .collect();
                let count = pairs.len();
                self.write().id_to_name.extend(pairs);
                tracing::debug!("Applied {} names", count);
                Ok(Fragment::Names(count))
            }
            "Navigation" => {
                let parsed: TreeXml = quick_xml::de::from_str(xml).map_err(protocol)?;
                let page = flatten(&parsed.items)
                    .into_iter()
                    .find(|item| item.name.as_deref() == Some(INFORMATION_PAGE));
                match page {
                    Some(item) => Ok(Fragment::Request(format!("GET;{}", item.id))),
                    None => {
                        tracing::debug!("Navigation without an {} page", INFORMATION_PAGE);
                        Ok(Fragment::Ignored(root))
                    }
                }
            }
            _ => {
                tracing::info!("Ignoring fragment with root <{}>", root);
                Ok(Fragment::Ignored(root))
            }
        }
    }

    pub fn insert_value(&self, id: impl Into<String>, value: impl Into<String>) {
        self.write().id_to_value.insert(id.into(), value.into());
    }

    pub fn insert_name(&self, id: impl Into<String>, name: impl Into<String>) {
        self.write().id_to_name.insert(id.into(), name.into());
    }

    /// Frame of every id known by both name and value.
    pub fn merge(&self, time: i64) -> Frame {
        let maps = self.maps.read().unwrap_or_else(PoisonError::into_inner);
        let mut frame = Frame::with_time(time);
        for (id, name) in &maps.id_to_name {
            if let Some(text) = maps.id_to_value.get(id) {
                frame.insert(name.as_str(), reading(text));
            }
        }
        frame
    }

    pub fn merge_now(&self) -> Frame {
        self.merge(chrono::Utc::now().timestamp())
    }

    /// Forget every id, e.g. before talking to another controller.
    pub fn clear(&self) {
        let mut maps = self.write();
        maps.id_to_value.clear();
        maps.id_to_name.clear();
    }

    /// `(values, names)` currently held.
    pub fn counts(&self) -> (usize, usize) {
        let maps = self.maps.read().unwrap_or_else(PoisonError::into_inner);
        (maps.id_to_value.len(), maps.id_to_name.len())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Maps> {
        self.maps.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Display text from the device, e.g. `29.4°C`, `1250 l/h`, `12:30`, `Ein`.
pub fn reading(text: &str) -> Value {
    let text = text.trim();
    if let RawValue::Number(n) = RawValue::coerce(text) {
        return Value::number(n);
    }

    let split = text
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+')))
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split);
    let unit = unit.trim();
    let is_unit = !unit.is_empty() && !unit.chars().any(|c| c.is_ascii_digit() || c == ':');

    match number.trim().parse::<f64>() {
        Ok(n) if is_unit && n.is_finite() => Value::with_unit(RawValue::Number(n), unit),
        _ => Value::text(text),
    }
}
