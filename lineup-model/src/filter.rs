//! Range filter over raw number values

use serde::Deserialize;
use serde::Serialize;

use crate::error::FilterError;

/// Keeps rows whose raw value lies within `[min, max]`.
///
/// Infinite bounds mean "unbounded on that side". NaN raw values are missing
/// data and are dropped only when `filter_missing` is set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FilterDesc", into = "FilterDesc")]
pub struct NumberFilter {
    min: f64,
    max: f64,
    filter_missing: bool,
}

impl NumberFilter {
    /// Creates a filter, rejecting NaN bounds, `min > max`, and infinities
    /// that point inward (`min = +inf` or `max = -inf`).
    pub fn new(min: f64, max: f64, filter_missing: bool) -> Result<Self, FilterError> {
        if min.is_nan() || max.is_nan() {
            return Err(FilterError::NaNBound);
        }
        if min == f64::INFINITY || max == f64::NEG_INFINITY {
            return Err(FilterError::InfiniteBound { min, max });
        }
        if min > max {
            return Err(FilterError::Inverted { min, max });
        }
        Ok(Self {
            min,
            max,
            filter_missing,
        })
    }

    /// A filter that accepts everything.
    pub fn unbounded() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            filter_missing: false,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn filter_missing(&self) -> bool {
        self.filter_missing
    }

    /// Returns a copy with `filter_missing` replaced.
    pub fn with_filter_missing(self, filter_missing: bool) -> Self {
        Self {
            filter_missing,
            ..self
        }
    }

    /// Whether this filter can drop any row.
    pub fn is_filtered(&self) -> bool {
        self.min.is_finite() || self.max.is_finite() || self.filter_missing
    }

    pub fn accepts(&self, raw: f64) -> bool {
        if raw.is_nan() {
            return !self.filter_missing;
        }
        self.min <= raw && raw <= self.max
    }
}

impl Default for NumberFilter {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Persisted filter shape. Unbounded sides are written as `null`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilterDesc {
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
    #[serde(default)]
    filter_missing: bool,
}

impl TryFrom<FilterDesc> for NumberFilter {
    type Error = FilterError;

    fn try_from(desc: FilterDesc) -> Result<Self, Self::Error> {
        NumberFilter::new(
            desc.min.unwrap_or(f64::NEG_INFINITY),
            desc.max.unwrap_or(f64::INFINITY),
            desc.filter_missing,
        )
    }
}

impl From<NumberFilter> for FilterDesc {
    fn from(filter: NumberFilter) -> Self {
        FilterDesc {
            min: filter.min.is_finite().then_some(filter.min),
            max: filter.max.is_finite().then_some(filter.max),
            filter_missing: filter.filter_missing,
        }
    }
}
