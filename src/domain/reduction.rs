// Time-series reduction: valid-column filter, series extraction and tick normalization
use super::frame::{Frame, TIME_COLUMN};
use super::series::{ChartSeries, Series};
use chrono::{DateTime, Local};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Sample interval of the device history, in seconds.
pub const DEFAULT_SAMPLE_INTERVAL: i64 = 120;

/// Frames with every constant or never-numeric column removed.
#[derive(Debug, Clone, Default)]
pub struct ValidData {
    frames: Vec<Frame>,
    columns: Vec<String>,
}

impl ValidData {
    pub fn reduce(frames: &[Frame]) -> Self {
        let names: BTreeSet<&str> = frames.iter().flat_map(|f| f.names()).collect();

        let dropped: HashSet<&str> = names
            .iter()
            .copied()
            .filter(|name| !varies(frames, name))
            .collect();

        let reduced: Vec<Frame> = frames
            .iter()
            .map(|frame| {
                frame
                    .iter()
                    .filter(|(name, _)| !dropped.contains(name))
                    .map(|(name, value)| (name.to_string(), value.clone()))
                    .collect()
            })
            .collect();

        let columns = names
            .into_iter()
            .filter(|name| *name != TIME_COLUMN && !dropped.contains(name))
            .map(str::to_string)
            .collect();

        tracing::debug!(
            "Reduced {} frames: {} columns dropped",
            frames.len(),
            dropped.len()
        );

        Self {
            frames: reduced,
            columns,
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Names of the columns that survived the filter, sorted, without `time`.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.binary_search_by(|c| c.as_str().cmp(name)).is_ok()
    }

    /// Unit of the first occurrence of `name`.
    pub fn unit(&self, name: &str) -> String {
        self.frames
            .iter()
            .find_map(|f| f.get(name))
            .map(|v| v.unit().to_string())
            .unwrap_or_default()
    }

    /// `(time, value)` pairs of `name`, ordered by time. Frames where either side is not
    /// numeric contribute nothing.
    pub fn series(&self, name: &str) -> Series {
        extract_series(&self.frames, name)
    }
}

fn varies(frames: &[Frame], name: &str) -> bool {
    let mut seen = HashSet::new();
    for value in frames.iter().filter_map(|f| f.numeric(name)) {
        seen.insert(value.to_bits());
        if seen.len() > 1 {
            return true;
        }
    }
    false
}

pub fn extract_series(frames: &[Frame], name: &str) -> Series {
    let mut points: Vec<(i64, f64)> = frames
        .iter()
        .filter_map(|f| Some((f.time()?, f.numeric(name)?)))
        .collect();

    // stable: equal times keep frame order
    points.sort_by_key(|(time, _)| *time);

    let (times, values) = points.into_iter().unzip();
    Series::new(times, values)
}

#[derive(Debug, Clone)]
struct Displayed {
    unit: String,
    series: Series,
}

/// Columns currently selected for display, normalized to a shared time origin.
///
/// Series are kept in absolute time; ticks are derived from the minimum time across everything
/// displayed, so adding a series that starts earlier shifts every other series with it.
#[derive(Debug, Clone)]
pub struct Chart {
    sample_interval: i64,
    displayed: BTreeMap<String, Displayed>,
}

impl Chart {
    pub fn new(sample_interval: i64) -> Self {
        Self {
            sample_interval: sample_interval.max(1),
            displayed: BTreeMap::new(),
        }
    }

    pub fn sample_interval(&self) -> i64 {
        self.sample_interval
    }

    pub fn display(&mut self, name: impl Into<String>, unit: impl Into<String>, series: Series) {
        self.displayed.insert(
            name.into(),
            Displayed {
                unit: unit.into(),
                series,
            },
        );
    }

    pub fn hide(&mut self, name: &str) -> bool {
        self.displayed.remove(name).is_some()
    }

    pub fn is_displayed(&self, name: &str) -> bool {
        self.displayed.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.displayed.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.displayed.is_empty()
    }

    pub fn clear(&mut self) {
        self.displayed.clear();
    }

    /// Smallest time across all displayed series.
    pub fn min_time(&self) -> Option<i64> {
        self.displayed
            .values()
            .filter_map(|d| d.series.min_time())
            .min()
    }

    pub fn ticks(&self, series: &Series) -> Vec<i64> {
        let origin = self.min_time().unwrap_or(0);
        series
            .times
            .iter()
            .map(|t| (t - origin).div_euclid(self.sample_interval))
            .collect()
    }

    pub fn series(&self) -> Vec<ChartSeries> {
        self.displayed
            .iter()
            .map(|(name, d)| {
                ChartSeries::new(
                    name.clone(),
                    d.unit.clone(),
                    self.ticks(&d.series),
                    d.series.values.clone(),
                )
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<ChartSeries> {
        self.displayed.get(name).map(|d| {
            ChartSeries::new(
                name.to_string(),
                d.unit.clone(),
                self.ticks(&d.series),
                d.series.values.clone(),
            )
        })
    }

    /// Epoch seconds at tick `index`. `None` when nothing is displayed or the time overflows.
    pub fn tick_time(&self, index: i64) -> Option<i64> {
        let origin = self.min_time()?;
        index
            .checked_mul(self.sample_interval)
            .and_then(|offset| origin.checked_add(offset))
    }

    /// Label for tick `index` in local time.
    pub fn format_tick(&self, index: i64, format: &str) -> Option<String> {
        self.tick_time(index)
            .and_then(|time| format_epoch(time, format))
    }
}

impl Default for Chart {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_INTERVAL)
    }
}

pub fn format_epoch(epoch_secs: i64, format: &str) -> Option<String> {
    let utc = DateTime::from_timestamp(epoch_secs, 0)?;
    Some(utc.with_timezone(&Local).format(format).to_string())
}
