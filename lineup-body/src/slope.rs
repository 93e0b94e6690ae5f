//! Slope graphs between adjacent rankings.

use std::collections::HashMap;

use lineup_model::RowId;

use crate::context::RenderContext;

/// A row shown in both rankings, with its position in each order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correlation {
    pub id: RowId,
    pub lpos: usize,
    pub rpos: usize,
}

/// Pairs up rows present in both `left` and `right`, ordered by their
/// position in `left`. Rows missing on either side are dropped.
pub fn correlate(left: &[RowId], right: &[RowId]) -> Vec<Correlation> {
    let index: HashMap<RowId, usize> = right
        .iter()
        .enumerate()
        .map(|(pos, &id)| (id, pos))
        .collect();
    left.iter()
        .enumerate()
        .filter_map(|(lpos, &id)| {
            index.get(&id).map(|&rpos| Correlation { id, lpos, rpos })
        })
        .collect()
}

/// One connecting line of a slope graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeLine {
    pub id: RowId,
    pub lpos: usize,
    pub rpos: usize,
    /// Row middle on the left side.
    pub y1: f64,
    /// Row middle on the right side.
    pub y2: f64,
}

/// Lines between two adjacent rankings, drawn in the gap left of `right`.
#[derive(Debug, Clone, PartialEq)]
pub struct SlopeGraph {
    /// Index of the left ranking.
    pub left: usize,
    /// Index of the right ranking.
    pub right: usize,
    /// Left edge of the gap.
    pub x: f64,
    pub width: f64,
    pub height: f64,
    pub lines: Vec<SlopeLine>,
}

impl SlopeGraph {
    /// Builds the graph between the rendered order slices of two rankings.
    ///
    /// Lines join row middles, `cell_y + row_height / 2` as reported by
    /// `ctx`. The gap of `slope_width` pixels ends at `right_shift`, the
    /// right ranking's offset.
    #[allow(clippy::too_many_arguments)]
    pub fn between(
        left: usize,
        right: usize,
        left_order: &[RowId],
        right_order: &[RowId],
        ctx: &dyn RenderContext,
        right_shift: f64,
        slope_width: f64,
        height: f64,
    ) -> Self {
        let mid = |pos: usize| ctx.cell_y(pos) + ctx.row_height(pos) / 2.0;
        let lines = correlate(left_order, right_order)
            .into_iter()
            .map(|c| SlopeLine {
                id: c.id,
                lpos: c.lpos,
                rpos: c.rpos,
                y1: mid(c.lpos),
                y2: mid(c.rpos),
            })
            .collect();
        Self {
            left,
            right,
            x: right_shift - slope_width,
            width: slope_width,
            height,
            lines,
        }
    }
}
