//! Numeric mapping functions: raw data values to normalized `[0, 1]` scores.

mod desc;
pub mod expr;
mod scale;
mod script;

pub use desc::MappingDesc;
pub use scale::ScaleMapping;
pub use scale::ScaleType;
pub use script::DEFAULT_SCRIPT;
pub use script::ScriptMapping;

use crate::error::MappingError;

/// A value transform used by number columns.
///
/// Cloning is a deep copy. Editors work on a clone and replace the column's
/// live mapping only when the edit is committed.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingFunction {
    Scale(ScaleMapping),
    Script(ScriptMapping),
}

impl MappingFunction {
    /// Linear `[0, 1] -> [0, 1]`.
    pub fn identity() -> Self {
        MappingFunction::Scale(ScaleMapping::identity())
    }

    /// Linear mapping of `[min, max]` onto `[0, 1]`.
    pub fn linear(min: f64, max: f64) -> Result<Self, MappingError> {
        Ok(MappingFunction::Scale(ScaleMapping::spanning(
            min,
            max,
            ScaleType::Linear,
        )?))
    }

    pub fn apply(&self, raw: f64) -> f64 {
        match self {
            MappingFunction::Scale(scale) => scale.apply(raw),
            MappingFunction::Script(script) => script.apply(raw),
        }
    }

    /// Best-effort inverse. Exact for scale mappings; see
    /// [`ScriptMapping::invert`] for scripts.
    pub fn invert(&self, normalized: f64) -> f64 {
        match self {
            MappingFunction::Scale(scale) => scale.invert(normalized),
            MappingFunction::Script(script) => script.invert(normalized),
        }
    }

    /// Whether [`invert`](Self::invert) is a true inverse of
    /// [`apply`](Self::apply). Editors disable point dragging otherwise.
    pub fn supports_inversion(&self) -> bool {
        matches!(self, MappingFunction::Scale(_))
    }

    pub fn domain(&self) -> &[f64] {
        match self {
            MappingFunction::Scale(scale) => scale.domain(),
            MappingFunction::Script(script) => script.domain(),
        }
    }

    /// First and last domain value.
    pub fn domain_extent(&self) -> (f64, f64) {
        let domain = self.domain();
        (domain[0], domain[domain.len() - 1])
    }

    pub fn set_domain_min(&mut self, raw: f64) {
        match self {
            MappingFunction::Scale(scale) => scale.set_domain_min(raw),
            MappingFunction::Script(script) => script.set_domain_min(raw),
        }
    }

    pub fn set_domain_max(&mut self, raw: f64) {
        match self {
            MappingFunction::Scale(scale) => scale.set_domain_max(raw),
            MappingFunction::Script(script) => script.set_domain_max(raw),
        }
    }

    pub fn as_scale(&self) -> Option<&ScaleMapping> {
        match self {
            MappingFunction::Scale(scale) => Some(scale),
            MappingFunction::Script(_) => None,
        }
    }

    pub fn as_scale_mut(&mut self) -> Option<&mut ScaleMapping> {
        match self {
            MappingFunction::Scale(scale) => Some(scale),
            MappingFunction::Script(_) => None,
        }
    }

    pub fn as_script_mut(&mut self) -> Option<&mut ScriptMapping> {
        match self {
            MappingFunction::Script(script) => Some(script),
            MappingFunction::Scale(_) => None,
        }
    }

    /// Persisted shape of this mapping.
    pub fn dump(&self) -> MappingDesc {
        match self {
            MappingFunction::Scale(scale) => MappingDesc::Scale {
                domain: scale.domain().to_vec(),
                range: scale.range().to_vec(),
                scale_type: scale.scale_type().to_string(),
            },
            MappingFunction::Script(script) => MappingDesc::Script {
                domain: script.domain().to_vec(),
                code: script.code().to_string(),
            },
        }
    }

    /// Rebuild a mapping from its descriptor.
    pub fn restore(desc: &MappingDesc) -> Result<Self, MappingError> {
        match desc {
            MappingDesc::Scale {
                domain,
                range,
                scale_type,
            } => Ok(MappingFunction::Scale(ScaleMapping::new(
                domain.clone(),
                range.clone(),
                scale_type.parse()?,
            )?)),
            MappingDesc::Script { domain, code } => Ok(MappingFunction::Script(
                ScriptMapping::new(domain.clone(), code.clone())?,
            )),
        }
    }

    /// Like [`restore`](Self::restore), but a malformed descriptor yields
    /// the identity mapping instead of an error.
    pub fn restore_or_default(desc: &MappingDesc) -> Self {
        Self::restore(desc).unwrap_or_else(|e| {
            log::warn!("falling back to identity mapping: {}", e);
            Self::identity()
        })
    }

    pub fn to_json(&self) -> Result<String, MappingError> {
        Ok(serde_json::to_string(&self.dump())?)
    }

    pub fn from_json(json: &str) -> Result<Self, MappingError> {
        let desc: MappingDesc = serde_json::from_str(json)?;
        Self::restore(&desc)
    }
}

impl Default for MappingFunction {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<ScaleMapping> for MappingFunction {
    fn from(scale: ScaleMapping) -> Self {
        MappingFunction::Scale(scale)
    }
}

impl From<ScriptMapping> for MappingFunction {
    fn from(script: ScriptMapping) -> Self {
        MappingFunction::Script(script)
    }
}
