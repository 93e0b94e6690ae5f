//! Script mapping: a user-written expression instead of control points.

use crate::error::{MappingError, ScriptError};

use super::expr::{Bindings, Expr};

/// Code a fresh script mapping starts with: plain linear normalization.
pub const DEFAULT_SCRIPT: &str = "return this.linear(value, this.value_min, this.value_max);";

/// Mapping that evaluates a script over `value`, `value_min` and `value_max`.
///
/// Inversion is not supported; [`ScriptMapping::invert`] falls back to a
/// linear interpolation over the domain so editors can still place handles.
#[derive(Debug, Clone)]
pub struct ScriptMapping {
    domain: Vec<f64>,
    code: String,
    compiled: Result<Expr, ScriptError>,
}

impl ScriptMapping {
    /// Create a script mapping. The code is kept even when it fails to
    /// compile so it can be shown and fixed in an editor; such a mapping
    /// evaluates to NaN.
    pub fn new(domain: Vec<f64>, code: impl Into<String>) -> Result<Self, MappingError> {
        if domain.is_empty() {
            return Err(MappingError::EmptyDomain);
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
        let mut mapping = Self {
            domain,
            code: String::new(),
            compiled: Err(ScriptError::UnexpectedEnd),
        };
        mapping.set_code(code);
        Ok(mapping)
    }

    /// Script mapping over `[min, max]` with [`DEFAULT_SCRIPT`].
    pub fn spanning(min: f64, max: f64) -> Result<Self, MappingError> {
        Self::new(vec![min, max], DEFAULT_SCRIPT)
    }

    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Replace the code, recompiling it.
    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
        self.compiled = Expr::parse(&self.code);
        if let Err(e) = &self.compiled {
            log::warn!("script mapping does not compile: {}", e);
        }
    }

    /// Compile error of the current code, if any.
    pub fn error(&self) -> Option<&ScriptError> {
        self.compiled.as_ref().err()
    }

    fn bounds(&self) -> (f64, f64) {
        (self.domain[0], self.domain[self.domain.len() - 1])
    }

    /// Evaluate the script for `raw`, clamping the result to `[0, 1]`.
    pub fn apply(&self, raw: f64) -> f64 {
        if raw.is_nan() {
            return f64::NAN;
        }
        let Ok(expr) = &self.compiled else {
            return f64::NAN;
        };
        let (value_min, value_max) = self.bounds();
        let result = expr.eval(&Bindings {
            value: raw,
            value_min,
            value_max,
        });
        if result.is_nan() {
            f64::NAN
        } else {
            result.clamp(0.0, 1.0)
        }
    }

    /// Linear position of `normalized` within the domain.
    pub fn invert(&self, normalized: f64) -> f64 {
        let (min, max) = self.bounds();
        min + normalized.clamp(0.0, 1.0) * (max - min)
    }

    pub fn set_domain_min(&mut self, raw: f64) {
        if raw.is_finite() {
            self.domain[0] = raw;
            self.domain.sort_by(f64::total_cmp);
        }
    }

    pub fn set_domain_max(&mut self, raw: f64) {
        if raw.is_finite() {
            let last = self.domain.len() - 1;
            self.domain[last] = raw;
            self.domain.sort_by(f64::total_cmp);
        }
    }
}

impl PartialEq for ScriptMapping {
    fn eq(&self, other: &Self) -> bool {
        self.domain == other.domain && self.code == other.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_script_is_linear() {
        let m = ScriptMapping::spanning(0.0, 50.0).unwrap();
        assert_eq!(m.apply(25.0), 0.5);
        assert_eq!(m.apply(100.0), 1.0);
        assert_eq!(m.apply(-1.0), 0.0);
        assert!(m.error().is_none());
    }

    #[test]
    fn test_broken_script_yields_nan() {
        let m = ScriptMapping::new(vec![0.0, 1.0], "value +").unwrap();
        assert!(m.apply(0.5).is_nan());
        assert_eq!(m.error(), Some(&ScriptError::UnexpectedEnd));
        assert_eq!(m.code(), "value +");
    }

    #[test]
    fn test_deeply_nested_script_yields_nan() {
        let code = "-".repeat(200_000) + "value";
        let m = ScriptMapping::new(vec![0.0, 1.0], code).unwrap();
        assert!(m.apply(0.5).is_nan());
        assert!(matches!(m.error(), Some(ScriptError::TooDeep(_))));
    }

    #[test]
    fn test_set_code_recompiles() {
        let mut m = ScriptMapping::spanning(0.0, 10.0).unwrap();
        m.set_code("1 - linear(value, value_min, value_max)");
        assert!((m.apply(2.0) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_invert_is_linear_over_domain() {
        let m = ScriptMapping::spanning(10.0, 20.0).unwrap();
        assert_eq!(m.invert(0.5), 15.0);
        assert_eq!(m.invert(2.0), 20.0);
    }

    #[test]
    fn test_equality_ignores_compiled_form() {
        let a = ScriptMapping::new(vec![0.0, 1.0], "value").unwrap();
        let b = a.clone();
        assert_eq!(a, b);
        let c = ScriptMapping::new(vec![0.0, 1.0], "value * 1").unwrap();
        assert_ne!(a, c);
    }
}
