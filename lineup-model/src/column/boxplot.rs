//! Box plot summaries

use serde::Deserialize;
use serde::Serialize;

/// Five-number summary stored per row for box plot columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotData {
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
}

impl BoxPlotData {
    /// The statistic a box plot column sorts by.
    pub fn value_for(&self, sort: BoxPlotSort) -> f64 {
        match sort {
            BoxPlotSort::Min => self.min,
            BoxPlotSort::Max => self.max,
            BoxPlotSort::Median => self.median,
            BoxPlotSort::Q1 => self.q1,
            BoxPlotSort::Q3 => self.q3,
        }
    }
}

/// Sort method of a box plot column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxPlotSort {
    Min,
    Max,
    #[default]
    Median,
    Q1,
    Q3,
}

/// Box plot column settings.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlotColumn {
    /// Field holding a [`BoxPlotData`] object.
    pub accessor: String,
    /// Raw extent used to position the box within the cell.
    pub domain: [f64; 2],
    pub sort: BoxPlotSort,
}

impl BoxPlotColumn {
    /// Position of `raw` within the column's domain, clamped to `[0, 1]`.
    pub fn scale(&self, raw: f64) -> f64 {
        let [min, max] = self.domain;
        if raw.is_nan() {
            return f64::NAN;
        }
        if max == min {
            return 0.0;
        }
        ((raw - min) / (max - min)).clamp(0.0, 1.0)
    }
}
