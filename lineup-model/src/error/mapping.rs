//! Mapping function errors

use super::ScriptError;

/// Error raised while building or restoring a mapping function.
///
/// A mapping that fails to build is never partially constructed: callers
/// fall back to [`MappingFunction::identity`](crate::mapping::MappingFunction::identity).
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// The domain has no values.
    #[error("mapping domain is empty")]
    EmptyDomain,

    /// Domain and range have different lengths.
    #[error("domain has {domain} values but range has {range}")]
    LengthMismatch { domain: usize, range: usize },

    /// A scale mapping needs at least two control points.
    #[error("a mapping needs at least 2 control points, got {0}")]
    TooFewPoints(usize),

    /// A domain or range value is NaN or infinite.
    #[error("non-finite value {value} in {field}")]
    NonFinite { field: &'static str, value: f64 },

    /// A range value lies outside the unit interval.
    #[error("range value {0} is outside [0, 1]")]
    RangeOutOfBounds(f64),

    /// A power scale exponent is not a finite positive number.
    #[error("power exponent {0} must be finite and positive")]
    InvalidExponent(f64),

    /// The scale type string is not recognized.
    #[error("unknown scale type: {0}")]
    UnknownScaleType(String),

    /// The script code could not be compiled.
    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    /// The descriptor is not valid JSON or has the wrong shape.
    #[error("malformed mapping descriptor: {0}")]
    Json(#[from] serde_json::Error),
}
