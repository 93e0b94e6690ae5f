use std::fmt;
use std::str::FromStr;

use lineup_model::error::MappingError;
use lineup_model::mapping::{ScaleMapping, ScaleType, ScriptMapping};
use lineup_model::MappingFunction;

/// Mapping shapes offered by the editor's type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingPreset {
    Linear,
    /// Linear from 1 down to 0.
    LinearInvert,
    /// 1 at both ends, 0 in the middle.
    LinearAbs,
    Log,
    Pow1_1,
    Pow2,
    Pow3,
    Sqrt,
    Script,
}

impl MappingPreset {
    pub const ALL: [MappingPreset; 9] = [
        MappingPreset::Linear,
        MappingPreset::LinearInvert,
        MappingPreset::LinearAbs,
        MappingPreset::Log,
        MappingPreset::Pow1_1,
        MappingPreset::Pow2,
        MappingPreset::Pow3,
        MappingPreset::Sqrt,
        MappingPreset::Script,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MappingPreset::Linear => "linear",
            MappingPreset::LinearInvert => "linear_invert",
            MappingPreset::LinearAbs => "linear_abs",
            MappingPreset::Log => "log",
            MappingPreset::Pow1_1 => "pow1.1",
            MappingPreset::Pow2 => "pow2",
            MappingPreset::Pow3 => "pow3",
            MappingPreset::Sqrt => "sqrt",
            MappingPreset::Script => "script",
        }
    }

    /// Builds the preset over the raw extent `[min, max]`.
    pub fn build(self, min: f64, max: f64) -> Result<MappingFunction, MappingError> {
        let two = |range: Vec<f64>, scale_type: ScaleType| {
            ScaleMapping::new(vec![min, max], range, scale_type).map(MappingFunction::from)
        };
        match self {
            MappingPreset::Linear => two(vec![0.0, 1.0], ScaleType::Linear),
            MappingPreset::LinearInvert => two(vec![1.0, 0.0], ScaleType::Linear),
            MappingPreset::LinearAbs => ScaleMapping::new(
                vec![min, (min + max) / 2.0, max],
                vec![1.0, 0.0, 1.0],
                ScaleType::Linear,
            )
            .map(MappingFunction::from),
            MappingPreset::Log => two(vec![0.0, 1.0], ScaleType::Log),
            MappingPreset::Pow1_1 => two(vec![0.0, 1.0], ScaleType::Pow(1.1)),
            MappingPreset::Pow2 => two(vec![0.0, 1.0], ScaleType::Pow(2.0)),
            MappingPreset::Pow3 => two(vec![0.0, 1.0], ScaleType::Pow(3.0)),
            MappingPreset::Sqrt => two(vec![0.0, 1.0], ScaleType::Sqrt),
            MappingPreset::Script => ScriptMapping::spanning(min, max).map(MappingFunction::from),
        }
    }

    /// The preset `mapping` looks like, if any.
    pub fn detect(mapping: &MappingFunction) -> Option<Self> {
        let scale = match mapping {
            MappingFunction::Script(_) => return Some(MappingPreset::Script),
            MappingFunction::Scale(scale) => scale,
        };
        match scale.scale_type() {
            ScaleType::Linear => match scale.range() {
                [a, b] if *a == 1.0 && *b == 0.0 => Some(MappingPreset::LinearInvert),
                [a, b, c] if *a == 1.0 && *b == 0.0 && *c == 1.0 => Some(MappingPreset::LinearAbs),
                _ => Some(MappingPreset::Linear),
            },
            ScaleType::Log => Some(MappingPreset::Log),
            ScaleType::Pow(p) if p == 1.1 => Some(MappingPreset::Pow1_1),
            ScaleType::Pow(p) if p == 2.0 => Some(MappingPreset::Pow2),
            ScaleType::Pow(p) if p == 3.0 => Some(MappingPreset::Pow3),
            ScaleType::Pow(_) => None,
            ScaleType::Sqrt => Some(MappingPreset::Sqrt),
        }
    }
}

impl fmt::Display for MappingPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MappingPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MappingPreset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown mapping preset: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for preset in MappingPreset::ALL {
            assert_eq!(preset.name().parse::<MappingPreset>(), Ok(preset));
        }
        assert!("quantile".parse::<MappingPreset>().is_err());
    }

    #[test]
    fn test_build_then_detect() {
        for preset in MappingPreset::ALL {
            let mapping = preset.build(0.0, 10.0).unwrap();
            assert_eq!(MappingPreset::detect(&mapping), Some(preset), "{}", preset);
        }
    }

    #[test]
    fn test_linear_abs_uses_midpoint() {
        let mapping = MappingPreset::LinearAbs.build(10.0, 20.0).unwrap();
        assert_eq!(mapping.domain(), &[10.0, 15.0, 20.0]);
        assert_eq!(mapping.apply(15.0), 0.0);
        assert_eq!(mapping.apply(20.0), 1.0);
    }
}
