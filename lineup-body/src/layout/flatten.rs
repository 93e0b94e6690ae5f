use lineup_model::{ColumnId, Ranking, COMPRESSED_WIDTH};

/// How far [`flatten_column`] descends into multi-level columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlattenDepth {
    /// Every level. Expanded composites are emitted before their children.
    All,
    /// At most this many levels. `Levels(1)` keeps composites as single
    /// slots; at the last level a composite is emitted with the width of
    /// its laid out children.
    Levels(usize),
}

impl FlattenDepth {
    fn descend(self) -> Option<Self> {
        match self {
            FlattenDepth::All => Some(FlattenDepth::All),
            FlattenDepth::Levels(n) if n > 1 => Some(FlattenDepth::Levels(n - 1)),
            FlattenDepth::Levels(_) => None,
        }
    }
}

/// A column positioned within its ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatColumn {
    pub column: ColumnId,
    /// Pixel offset from the ranking's origin.
    pub shift: f64,
    pub width: f64,
}

/// Lays out a single column starting at `shift`.
///
/// Returns the width the column occupies, without trailing padding. A leaf,
/// collapsed or compressed column takes one slot of its own width (or
/// [`COMPRESSED_WIDTH`]). An expanded multi-level column lays its visible
/// children out next to each other, `padding` apart, so its width is the
/// sum of the children plus `padding * (children - 1)`.
///
/// Hidden columns take no space and produce no slot.
pub fn flatten_column(
    ranking: &Ranking,
    id: ColumnId,
    shift: f64,
    depth: FlattenDepth,
    padding: f64,
    out: &mut Vec<FlatColumn>,
) -> f64 {
    let Some(column) = ranking.column(id) else {
        return 0.0;
    };
    if column.is_hidden() {
        return 0.0;
    }
    if column.is_compressed() {
        out.push(FlatColumn {
            column: id,
            shift,
            width: COMPRESSED_WIDTH,
        });
        return COMPRESSED_WIDTH;
    }
    if !column.is_expanded() {
        out.push(FlatColumn {
            column: id,
            shift,
            width: column.width(),
        });
        return column.width();
    }

    match depth.descend() {
        None => {
            let width = children_width(ranking, id, padding);
            out.push(FlatColumn {
                column: id,
                shift,
                width,
            });
            width
        }
        Some(inner) => {
            let slot = out.len();
            if depth == FlattenDepth::All {
                out.push(FlatColumn {
                    column: id,
                    shift,
                    width: 0.0,
                });
            }
            let mut offset = 0.0;
            let mut laid_out = 0;
            for child in ranking.visible_children(id) {
                if laid_out > 0 {
                    offset += padding;
                }
                offset += flatten_column(ranking, child, shift + offset, inner, padding, out);
                laid_out += 1;
            }
            if depth == FlattenDepth::All {
                out[slot].width = offset;
            }
            offset
        }
    }
}

/// Width an expanded multi-level column would take when laid out.
fn children_width(ranking: &Ranking, id: ColumnId, padding: f64) -> f64 {
    let mut scratch = Vec::new();
    ranking
        .visible_children(id)
        .enumerate()
        .map(|(i, child)| {
            let gap = if i > 0 { padding } else { 0.0 };
            gap + flatten_column(
                ranking,
                child,
                0.0,
                FlattenDepth::All,
                padding,
                &mut scratch,
            )
        })
        .sum()
}

/// Lays out the visible top-level columns of a ranking starting at
/// `start_shift`, each followed by `padding`.
///
/// Returns the total width, trailing padding included, and the flattened
/// columns in display order.
pub fn flatten_ranking(
    ranking: &Ranking,
    start_shift: f64,
    depth: FlattenDepth,
    padding: f64,
) -> (f64, Vec<FlatColumn>) {
    let mut out = Vec::new();
    let mut offset = start_shift;
    for id in ranking.visible_top_level() {
        offset += flatten_column(ranking, id, offset, depth, padding, &mut out);
        offset += padding;
    }
    (offset - start_shift, out)
}

/// Number of header levels a column needs: 1 for a leaf or a collapsed or
/// compressed composite, one more than its deepest visible child otherwise.
pub fn count_levels(ranking: &Ranking, id: ColumnId) -> usize {
    match ranking.column(id) {
        None => 0,
        Some(column) if column.is_expanded() => {
            1 + ranking
                .visible_children(id)
                .map(|child| count_levels(ranking, child))
                .max()
                .unwrap_or(0)
        }
        Some(_) => 1,
    }
}

/// Header levels over all visible top-level columns; 0 without columns.
pub fn max_levels(ranking: &Ranking) -> usize {
    ranking
        .visible_top_level()
        .map(|id| count_levels(ranking, id))
        .max()
        .unwrap_or(0)
}
