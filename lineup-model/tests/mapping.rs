use lineup_model::MappingFunction;
use lineup_model::mapping::MappingDesc;
use lineup_model::mapping::ScaleMapping;
use lineup_model::mapping::ScaleType;
use lineup_model::mapping::ScriptMapping;

const EPSILON: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn mappings() -> Vec<ScaleMapping> {
    vec![
        ScaleMapping::new(vec![0.0, 100.0], vec![0.0, 1.0], ScaleType::Linear).unwrap(),
        ScaleMapping::new(vec![1.0, 10.0, 1000.0], vec![0.0, 0.3, 1.0], ScaleType::Log).unwrap(),
        ScaleMapping::new(vec![-5.0, 5.0], vec![0.0, 1.0], ScaleType::Pow(2.0)).unwrap(),
        ScaleMapping::new(vec![-5.0, 0.0, 5.0], vec![0.0, 0.7, 1.0], ScaleType::Pow(1.1)).unwrap(),
        ScaleMapping::new(vec![0.0, 4.0, 16.0], vec![0.0, 0.5, 1.0], ScaleType::Sqrt).unwrap(),
        ScaleMapping::new(vec![10.0, 20.0], vec![1.0, 0.0], ScaleType::Linear).unwrap(),
    ]
}

// ============================================================================
// Apply / Invert Properties
// ============================================================================

#[test]
fn test_apply_invert_round_trip() {
    for mapping in mappings() {
        for step in 0..=20 {
            let x = step as f64 / 20.0;
            let raw = mapping.invert(x);
            assert!(
                approx(mapping.apply(raw), x),
                "apply(invert({x})) = {} for {:?}",
                mapping.apply(raw),
                mapping
            );
        }
    }
}

#[test]
fn test_apply_is_monotone_for_increasing_range() {
    for mapping in mappings() {
        let range: Vec<f64> = mapping.range().to_vec();
        if !range.windows(2).all(|w| w[0] <= w[1]) {
            continue;
        }
        let (min, max) = (mapping.domain()[0], mapping.domain()[mapping.len() - 1]);
        let mut previous = f64::NEG_INFINITY;
        for step in -10..=110 {
            let raw = min + (max - min) * step as f64 / 100.0;
            let value = mapping.apply(raw);
            assert!(value >= previous, "not monotone at {raw} for {:?}", mapping);
            assert!((0.0..=1.0).contains(&value));
            previous = value;
        }
    }
}

#[test]
fn test_out_of_domain_clamps_to_end_values() {
    let mapping =
        ScaleMapping::new(vec![0.0, 10.0], vec![0.2, 0.9], ScaleType::Linear).unwrap();
    assert_eq!(mapping.apply(-100.0), 0.2);
    assert_eq!(mapping.apply(1e9), 0.9);
}

// ============================================================================
// Control Point Editing
// ============================================================================

#[test]
fn test_remove_from_two_points_is_noop() {
    let mut mapping = ScaleMapping::spanning(0.0, 1.0, ScaleType::Linear).unwrap();
    let before = mapping.clone();
    assert!(!mapping.remove_control_point(0));
    assert!(!mapping.remove_control_point(1));
    assert_eq!(mapping, before);
    assert_eq!(mapping.len(), 2);
}

#[test]
fn test_add_then_remove_restores_points() {
    for original in mappings() {
        let mut mapping = original.clone();
        let index = mapping.add_control_point(3.5, 0.42).unwrap();
        assert_eq!(mapping.len(), original.len() + 1);
        assert!(mapping.domain().windows(2).all(|w| w[0] <= w[1]));
        assert!(mapping.remove_control_point(index));
        assert_eq!(mapping, original);
    }
}

#[test]
fn test_editing_a_clone_leaves_original() {
    let original = MappingFunction::linear(0.0, 10.0).unwrap();
    let mut edited = original.clone();
    if let Some(scale) = edited.as_scale_mut() {
        scale.add_control_point(5.0, 0.9);
    }
    assert_eq!(original.domain(), &[0.0, 10.0]);
    assert_eq!(edited.domain(), &[0.0, 5.0, 10.0]);
    assert_ne!(original, edited);
}

// ============================================================================
// Descriptors
// ============================================================================

#[test]
fn test_dump_restore_round_trip() {
    let functions: Vec<MappingFunction> = mappings()
        .into_iter()
        .map(MappingFunction::from)
        .chain([MappingFunction::from(
            ScriptMapping::new(vec![0.0, 3.0], "abs(value - 1.5) / 1.5").unwrap(),
        )])
        .collect();
    for function in functions {
        let desc = function.dump();
        assert_eq!(MappingFunction::restore(&desc).unwrap(), function);

        let json = function.to_json().unwrap();
        assert_eq!(MappingFunction::from_json(&json).unwrap(), function);
    }
}

#[test]
fn test_restore_sorts_unsorted_points() {
    let desc: MappingDesc = serde_json::from_str(
        r#"{"domain": [10, 0, 5], "range": [1, 0, 0.5], "scaleType": "linear"}"#,
    )
    .unwrap();
    let mapping = MappingFunction::restore(&desc).unwrap();
    assert_eq!(mapping.domain(), &[0.0, 5.0, 10.0]);
    assert_eq!(mapping.apply(7.5), 0.75);
}

#[test]
fn test_malformed_descriptor_falls_back_to_identity() {
    let desc: MappingDesc =
        serde_json::from_str(r#"{"domain": [0], "range": [0], "scaleType": "linear"}"#).unwrap();
    assert!(MappingFunction::restore(&desc).is_err());
    assert_eq!(
        MappingFunction::restore_or_default(&desc),
        MappingFunction::identity()
    );
}

// ============================================================================
// Script Mappings
// ============================================================================

#[test]
fn test_script_mapping_contract() {
    let function = MappingFunction::from(
        ScriptMapping::new(vec![0.0, 100.0], "return this.linear(value, this.value_min, this.value_max) ^ 2;")
            .unwrap(),
    );
    assert!(!function.supports_inversion());
    assert!(approx(function.apply(50.0), 0.25));
    assert_eq!(function.apply(200.0), 1.0);
    assert_eq!(function.invert(0.5), 50.0);
}
