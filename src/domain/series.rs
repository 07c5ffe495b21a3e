// Series domain models
use serde::Serialize;

/// Absolute-time series extracted from the reduced frames of one column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    pub times: Vec<i64>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(times: Vec<i64>, values: Vec<f64>) -> Self {
        Self { times, values }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn min_time(&self) -> Option<i64> {
        self.times.first().copied()
    }
}

/// A displayed series as handed to the chart renderer: tick indexes instead of times.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub unit: String,
    pub ticks: Vec<i64>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn new(name: String, unit: String, ticks: Vec<i64>, values: Vec<f64>) -> Self {
        Self {
            name,
            unit,
            ticks,
            values,
        }
    }
}
