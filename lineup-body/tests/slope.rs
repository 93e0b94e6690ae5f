use lineup_body::{correlate, BodyContext, BodyOptions, Correlation, RendererRegistry, RowLayout, SlopeGraph, VisibleRange};
use lineup_model::RowId;

// ============================================================================
// Correlation Tests
// ============================================================================

#[test]
fn test_correlate_shared_rows() {
    let left: Vec<RowId> = vec![5, 6, 7];
    let right: Vec<RowId> = vec![7, 5, 9];
    assert_eq!(
        correlate(&left, &right),
        vec![
            Correlation {
                id: 5,
                lpos: 0,
                rpos: 1
            },
            Correlation {
                id: 7,
                lpos: 2,
                rpos: 0
            },
        ]
    );
}

#[test]
fn test_correlate_disjoint() {
    assert!(correlate(&[1, 2], &[3, 4]).is_empty());
    assert!(correlate(&[], &[3, 4]).is_empty());
}

// ============================================================================
// Slope Graph Tests
// ============================================================================

#[test]
fn test_slope_lines_join_row_middles() {
    let rows = RowLayout::uniform(20.0, 3);
    let options = BodyOptions::default().row_padding(2.0);
    let renderers = RendererRegistry::new();
    let ctx = BodyContext::new(&rows, &options, &renderers, VisibleRange::new(0, 3));

    let graph = SlopeGraph::between(0, 1, &[5, 6, 7], &[7, 5, 9], &ctx, 300.0, 150.0, 60.0);
    assert_eq!(graph.x, 150.0);
    assert_eq!(graph.width, 150.0);
    assert_eq!(graph.lines.len(), 2);
    // middle of a 20px row minus 2px padding
    assert_eq!(graph.lines[0].y1, 9.0);
    assert_eq!(graph.lines[0].y2, 29.0);
    assert_eq!(graph.lines[1].y1, 49.0);
    assert_eq!(graph.lines[1].y2, 9.0);
}

#[test]
fn test_slope_context_is_shifted_by_visible_start() {
    let rows = RowLayout::uniform(10.0, 100);
    let options = BodyOptions::default().row_padding(0.0);
    let renderers = RendererRegistry::new();
    let ctx = BodyContext::new(&rows, &options, &renderers, VisibleRange::new(10, 12));

    let graph = SlopeGraph::between(0, 1, &[1, 2], &[2, 1], &ctx, 0.0, 50.0, 20.0);
    assert_eq!(graph.lines[0].y1, 105.0);
    assert_eq!(graph.lines[0].y2, 115.0);
}
