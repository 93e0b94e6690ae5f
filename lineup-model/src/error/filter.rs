//! Number filter errors

/// Error raised when a filter's bounds are inconsistent.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum FilterError {
    #[error("filter min {min} is greater than max {max}")]
    Inverted { min: f64, max: f64 },

    #[error("filter bound is NaN")]
    NaNBound,

    /// `min` is `+inf` or `max` is `-inf`.
    #[error("filter min {min} or max {max} is infinite on the wrong side")]
    InfiniteBound { min: f64, max: f64 },
}
