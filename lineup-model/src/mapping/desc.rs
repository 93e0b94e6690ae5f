//! Persisted mapping descriptors.

use serde::{Deserialize, Serialize};

/// Serializable description of a [`MappingFunction`](super::MappingFunction).
///
/// ```json
/// {"domain": [0, 100], "range": [0, 1], "scaleType": "linear"}
/// {"domain": [0, 100], "code": "return this.linear(value, this.value_min, this.value_max);"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MappingDesc {
    Scale {
        domain: Vec<f64>,
        range: Vec<f64>,
        #[serde(rename = "scaleType")]
        scale_type: String,
    },
    Script {
        domain: Vec<f64>,
        code: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MappingError;
    use crate::mapping::{MappingFunction, ScaleMapping, ScaleType, ScriptMapping};

    #[test]
    fn test_scale_desc_shape() {
        let m = MappingFunction::from(
            ScaleMapping::new(vec![0.0, 50.0, 100.0], vec![0.0, 0.25, 1.0], ScaleType::Pow(1.1))
                .unwrap(),
        );
        let json = serde_json::to_value(m.dump()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"domain": [0.0, 50.0, 100.0], "range": [0.0, 0.25, 1.0], "scaleType": "pow1.1"})
        );
    }

    #[test]
    fn test_script_desc_shape() {
        let m = MappingFunction::from(ScriptMapping::new(vec![1.0, 2.0], "value").unwrap());
        let json = serde_json::to_value(m.dump()).unwrap();
        assert_eq!(json, serde_json::json!({"domain": [1.0, 2.0], "code": "value"}));
    }

    #[test]
    fn test_json_round_trip_is_exact() {
        let m = MappingFunction::from(
            ScaleMapping::new(
                vec![-3.3, 0.1 + 0.2, 17.123456789],
                vec![0.0, 1.0 / 3.0, 1.0],
                ScaleType::Log,
            )
            .unwrap(),
        );
        let json = m.to_json().unwrap();
        assert_eq!(MappingFunction::from_json(&json).unwrap(), m);
    }

    #[test]
    fn test_every_scale_type_reloads() {
        let types = [
            ScaleType::Linear,
            ScaleType::Log,
            ScaleType::Sqrt,
            ScaleType::Pow(0.5),
            ScaleType::Pow(1.1),
            ScaleType::Pow(2.0),
            ScaleType::Pow(3.0),
        ];
        for scale_type in types {
            let m = MappingFunction::from(
                ScaleMapping::spanning(1.0, 10.0, scale_type).unwrap(),
            );
            let json = m.to_json().unwrap();
            assert_eq!(MappingFunction::from_json(&json).unwrap(), m, "{json}");
        }
    }

    #[test]
    fn test_restore_rejects_malformed() {
        let missing_range = r#"{"domain": [0, 1], "scaleType": "linear"}"#;
        assert!(matches!(
            MappingFunction::from_json(missing_range),
            Err(MappingError::Json(_))
        ));

        let mismatch = MappingDesc::Scale {
            domain: vec![0.0, 1.0, 2.0],
            range: vec![0.0, 1.0],
            scale_type: "linear".into(),
        };
        assert!(matches!(
            MappingFunction::restore(&mismatch),
            Err(MappingError::LengthMismatch { .. })
        ));
        assert_eq!(
            MappingFunction::restore_or_default(&mismatch),
            MappingFunction::identity()
        );
    }

    #[test]
    fn test_restore_rejects_unknown_scale_type() {
        let desc = MappingDesc::Scale {
            domain: vec![0.0, 1.0],
            range: vec![0.0, 1.0],
            scale_type: "quantile".into(),
        };
        assert!(matches!(
            MappingFunction::restore(&desc),
            Err(MappingError::UnknownScaleType(_))
        ));
    }
}
