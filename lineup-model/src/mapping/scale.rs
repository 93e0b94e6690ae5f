//! Piecewise scale mapping over user-managed control points.

use std::fmt;
use std::str::FromStr;

use crate::error::MappingError;

/// Interpolation shape applied inside a single segment between two control
/// points.
///
/// The scale type never changes which segment a value falls into; it only
/// bends the interpolation between the segment's end points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleType {
    Linear,
    /// Natural-log interpolation. Segments touching a non-positive domain
    /// value interpolate linearly.
    Log,
    /// `t^p` for the linear unit position `t`.
    Pow(f64),
    Sqrt,
}

impl ScaleType {
    /// Fails for a `Pow` exponent that is zero, negative or not finite.
    pub fn validate(self) -> Result<Self, MappingError> {
        match self {
            ScaleType::Pow(p) if !(p.is_finite() && p > 0.0) => {
                Err(MappingError::InvalidExponent(p))
            }
            _ => Ok(self),
        }
    }

    /// Unit position of `raw` inside `[d0, d1]`.
    fn unit(self, raw: f64, d0: f64, d1: f64) -> f64 {
        let span = d1 - d0;
        if span == 0.0 {
            return 0.0;
        }
        let t = ((raw - d0) / span).clamp(0.0, 1.0);
        match self {
            ScaleType::Linear => t,
            ScaleType::Log if d0 > 0.0 && d1 > 0.0 => {
                ((raw.ln() - d0.ln()) / (d1.ln() - d0.ln())).clamp(0.0, 1.0)
            }
            ScaleType::Log => t,
            ScaleType::Pow(p) => t.powf(p),
            ScaleType::Sqrt => t.sqrt(),
        }
    }

    /// Raw value at unit position `unit` inside `[d0, d1]`.
    fn raw(self, unit: f64, d0: f64, d1: f64) -> f64 {
        let unit = unit.clamp(0.0, 1.0);
        match self {
            ScaleType::Linear => d0 + unit * (d1 - d0),
            ScaleType::Log if d0 > 0.0 && d1 > 0.0 => (d0.ln() + unit * (d1.ln() - d0.ln())).exp(),
            ScaleType::Log => d0 + unit * (d1 - d0),
            ScaleType::Pow(p) => d0 + unit.powf(1.0 / p) * (d1 - d0),
            ScaleType::Sqrt => d0 + unit * unit * (d1 - d0),
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleType::Linear => f.write_str("linear"),
            ScaleType::Log => f.write_str("log"),
            ScaleType::Pow(p) => write!(f, "pow{p}"),
            ScaleType::Sqrt => f.write_str("sqrt"),
        }
    }
}

impl FromStr for ScaleType {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(ScaleType::Linear),
            "log" => Ok(ScaleType::Log),
            "sqrt" => Ok(ScaleType::Sqrt),
            _ => {
                let exponent = s
                    .strip_prefix("pow")
                    .and_then(|p| p.parse::<f64>().ok())
                    .and_then(|p| ScaleType::Pow(p).validate().ok());
                exponent.ok_or_else(|| MappingError::UnknownScaleType(s.to_string()))
            }
        }
    }
}

/// A piecewise mapping from raw data values to normalized `[0, 1]` scores.
///
/// Each `(domain[i], range[i])` pair is a control point. The domain is kept
/// sorted ascending after every edit; ties keep their insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleMapping {
    domain: Vec<f64>,
    range: Vec<f64>,
    scale_type: ScaleType,
}

impl ScaleMapping {
    /// Build a mapping from explicit control points.
    ///
    /// Control points are sorted by domain value. Fails when the lengths
    /// differ, fewer than two points are given, a value is not finite, or a
    /// range value lies outside `[0, 1]`, or the scale type has an invalid
    /// exponent.
    pub fn new(
        domain: Vec<f64>,
        range: Vec<f64>,
        scale_type: ScaleType,
    ) -> Result<Self, MappingError> {
        let scale_type = scale_type.validate()?;
        if domain.is_empty() {
            return Err(MappingError::EmptyDomain);
        }
        if domain.len() != range.len() {
            return Err(MappingError::LengthMismatch {
                domain: domain.len(),
                range: range.len(),
            });
        }
        if domain.len() < 2 {
            return Err(MappingError::TooFewPoints(domain.len()));
        }
        if let Some(&value) = domain.iter().find(|d| !d.is_finite()) {
            return Err(MappingError::NonFinite {
                field: "domain",
                value,
            });
        }
        if let Some(&value) = range.iter().find(|r| !r.is_finite()) {
            return Err(MappingError::NonFinite {
                field: "range",
                value,
            });
        }
        if let Some(&value) = range.iter().find(|r| !(0.0..=1.0).contains(*r)) {
            return Err(MappingError::RangeOutOfBounds(value));
        }

        let mut mapping = Self {
            domain,
            range,
            scale_type,
        };
        mapping.sort_points();
        Ok(mapping)
    }

    /// Two-point mapping of `[min, max]` onto `[0, 1]`.
    pub fn spanning(min: f64, max: f64, scale_type: ScaleType) -> Result<Self, MappingError> {
        Self::new(vec![min, max], vec![0.0, 1.0], scale_type)
    }

    /// Linear `[0, 1] -> [0, 1]`.
    pub fn identity() -> Self {
        Self {
            domain: vec![0.0, 1.0],
            range: vec![0.0, 1.0],
            scale_type: ScaleType::Linear,
        }
    }

    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    pub fn range(&self) -> &[f64] {
        &self.range
    }

    pub fn scale_type(&self) -> ScaleType {
        self.scale_type
    }

    /// Replace the scale type. An invalid exponent leaves the mapping
    /// untouched.
    pub fn set_scale_type(&mut self, scale_type: ScaleType) -> Result<(), MappingError> {
        self.scale_type = scale_type.validate()?;
        Ok(())
    }

    /// Number of control points. Always at least two.
    pub fn len(&self) -> usize {
        self.domain.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    /// Control points as `(raw, normalized)` pairs in domain order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.domain.iter().copied().zip(self.range.iter().copied())
    }

    pub fn point(&self, index: usize) -> Option<(f64, f64)> {
        Some((*self.domain.get(index)?, *self.range.get(index)?))
    }

    /// Map a raw value to its normalized score.
    ///
    /// Values outside the domain take the range value of the nearest end
    /// point; the outer segments are never extrapolated. NaN stays NaN.
    pub fn apply(&self, raw: f64) -> f64 {
        if raw.is_nan() {
            return f64::NAN;
        }
        let last = self.domain.len() - 1;
        if raw <= self.domain[0] {
            return self.range[0];
        }
        if raw >= self.domain[last] {
            return self.range[last];
        }

        let upper = self.domain.partition_point(|&d| d <= raw);
        let i = upper.saturating_sub(1).min(last - 1);
        let (d0, d1) = (self.domain[i], self.domain[i + 1]);
        let (r0, r1) = (self.range[i], self.range[i + 1]);
        let unit = self.scale_type.unit(raw, d0, d1);
        (r0 + unit * (r1 - r0)).clamp(0.0, 1.0)
    }

    /// Map a normalized score back to a raw value.
    ///
    /// The first segment whose range covers `normalized` wins, so
    /// non-monotone mappings resolve to the leftmost raw value. Scores no
    /// segment covers resolve to the control point with the nearest range
    /// value.
    pub fn invert(&self, normalized: f64) -> f64 {
        if normalized.is_nan() {
            return f64::NAN;
        }
        for i in 0..self.domain.len() - 1 {
            let (r0, r1) = (self.range[i], self.range[i + 1]);
            let (lo, hi) = if r0 <= r1 { (r0, r1) } else { (r1, r0) };
            if normalized < lo || normalized > hi {
                continue;
            }
            if r0 == r1 {
                return self.domain[i];
            }
            let unit = (normalized - r0) / (r1 - r0);
            return self
                .scale_type
                .raw(unit, self.domain[i], self.domain[i + 1]);
        }

        let mut nearest = 0;
        for (i, r) in self.range.iter().enumerate() {
            if (r - normalized).abs() < (self.range[nearest] - normalized).abs() {
                nearest = i;
            }
        }
        self.domain[nearest]
    }

    /// Insert a control point and return its index after re-sorting.
    ///
    /// `normalized` is clamped to `[0, 1]`. Returns `None` for a non-finite
    /// raw value.
    pub fn add_control_point(&mut self, raw: f64, normalized: f64) -> Option<usize> {
        if !raw.is_finite() || normalized.is_nan() {
            return None;
        }
        let index = self.domain.partition_point(|&d| d <= raw);
        self.domain.insert(index, raw);
        self.range.insert(index, normalized.clamp(0.0, 1.0));
        Some(index)
    }

    /// Remove the control point at `index`.
    ///
    /// Returns false and leaves the mapping untouched when the index is out
    /// of bounds or only two points remain.
    pub fn remove_control_point(&mut self, index: usize) -> bool {
        if self.domain.len() <= 2 || index >= self.domain.len() {
            return false;
        }
        self.domain.remove(index);
        self.range.remove(index);
        true
    }

    /// Move the control point at `index` and return where it ends up after
    /// re-sorting. Among equal raw values it keeps its previous relative
    /// order.
    pub fn move_control_point(&mut self, index: usize, raw: f64, normalized: f64) -> usize {
        if index >= self.domain.len() || !raw.is_finite() || normalized.is_nan() {
            return index;
        }
        self.domain.remove(index);
        self.range.remove(index);

        let mut to = self.domain.partition_point(|&d| d < raw);
        while to < index && to < self.domain.len() && self.domain[to] == raw {
            to += 1;
        }
        self.domain.insert(to, raw);
        self.range.insert(to, normalized.clamp(0.0, 1.0));
        to
    }

    /// Replace the raw value of the first control point.
    pub fn set_domain_min(&mut self, raw: f64) {
        if raw.is_finite() {
            self.domain[0] = raw;
            self.sort_points();
        }
    }

    /// Replace the raw value of the last control point.
    pub fn set_domain_max(&mut self, raw: f64) {
        if raw.is_finite() {
            let last = self.domain.len() - 1;
            self.domain[last] = raw;
            self.sort_points();
        }
    }

    fn sort_points(&mut self) {
        if self.domain.windows(2).all(|w| w[0] <= w[1]) {
            return;
        }
        let mut points: Vec<(f64, f64)> = self.points().collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (domain, range): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
        self.domain = domain;
        self.range = range;
    }
}

impl Default for ScaleMapping {
    fn default() -> Self {
        Self::identity()
    }
}
