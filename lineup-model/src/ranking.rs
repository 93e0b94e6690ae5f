//! Rankings: a column tree plus the materialized row order

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::RowId;
use crate::column::COMPRESSED_WIDTH;
use crate::column::Column;
use crate::column::ColumnId;
use crate::column::ColumnKind;
use crate::column::DataRow;
use crate::error::ColumnError;
use crate::filter::NumberFilter;
use crate::mapping::MappingFunction;

/// Column and direction the order is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortCriteria {
    pub column: ColumnId,
    pub ascending: bool,
}

/// An ordered set of columns and the current order of rows.
///
/// The ranking owns every column of its tree in an arena; composite columns
/// and parent links refer to each other by [`ColumnId`]. The order is a
/// permutation-with-removal of the row universe: no duplicates, every id
/// below the universe size.
///
/// # Example
///
/// ```
/// use lineup_model::{Column, DataRow, MappingFunction, Ranking};
/// use serde_json::json;
///
/// let mut ranking = Ranking::new("r0");
/// let score = ranking.push(Column::number("score", "score", MappingFunction::linear(0.0, 10.0).unwrap()));
/// ranking.sort_by(score).unwrap();
///
/// let rows = vec![
///     DataRow::new(0, json!({"score": 3})),
///     DataRow::new(1, json!({"score": 9})),
/// ];
/// assert_eq!(ranking.rank(&rows).unwrap(), &[1, 0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    id: String,
    arena: Vec<Option<Column>>,
    top: Vec<ColumnId>,
    order: Vec<RowId>,
    sort: Option<SortCriteria>,
}

impl Ranking {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn alloc(&mut self, mut column: Column, parent: Option<ColumnId>) -> ColumnId {
        let id = ColumnId(self.arena.len());
        column.parent = parent;
        if let Some(children) = column.kind.children_mut() {
            children.clear();
        }
        self.arena.push(Some(column));
        id
    }

    fn get(&self, id: ColumnId) -> Result<&Column, ColumnError> {
        self.column(id).ok_or(ColumnError::UnknownColumn(id))
    }

    fn get_mut(&mut self, id: ColumnId) -> Result<&mut Column, ColumnError> {
        self.column_mut(id).ok_or(ColumnError::UnknownColumn(id))
    }

    /// Appends a top-level column. Children listed by a composite column are
    /// discarded; add them with [`insert_child`](Self::insert_child).
    pub fn push(&mut self, column: Column) -> ColumnId {
        let id = self.alloc(column, None);
        self.top.push(id);
        id
    }

    /// Appends `column` to the children of the composite column `parent`.
    pub fn insert_child(&mut self, parent: ColumnId, column: Column) -> Result<ColumnId, ColumnError> {
        if !self.get(parent)?.is_composite() {
            return Err(ColumnError::NotComposite(parent));
        }
        let id = self.alloc(column, Some(parent));
        self.children_mut(parent)?.push(id);
        Ok(id)
    }

    fn children_mut(&mut self, parent: ColumnId) -> Result<&mut Vec<ColumnId>, ColumnError> {
        self.get_mut(parent)?
            .kind
            .children_mut()
            .ok_or(ColumnError::NotComposite(parent))
    }

    fn siblings_mut(&mut self, id: ColumnId) -> Result<&mut Vec<ColumnId>, ColumnError> {
        match self.get(id)?.parent {
            None => Ok(&mut self.top),
            Some(parent) => self.children_mut(parent),
        }
    }

    /// Removes a column and its whole subtree, returning the detached column.
    /// Sort criteria on a removed column are cleared.
    pub fn remove(&mut self, id: ColumnId) -> Result<Column, ColumnError> {
        self.siblings_mut(id)?.retain(|&c| c != id);

        let mut root = None;
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            let Some(mut column) = self.arena.get_mut(next.0).and_then(Option::take) else {
                continue;
            };
            if let Some(children) = column.kind.children_mut() {
                pending.append(children);
            }
            if next == id {
                column.parent = None;
                root = Some(column);
            }
        }

        if self.sort.is_some_and(|s| self.column(s.column).is_none()) {
            self.sort = None;
        }
        root.ok_or(ColumnError::UnknownColumn(id))
    }

    /// Moves a column to `index` among its siblings, clamping the index.
    pub fn move_to(&mut self, id: ColumnId, index: usize) -> Result<(), ColumnError> {
        let siblings = self.siblings_mut(id)?;
        let from = siblings
            .iter()
            .position(|&c| c == id)
            .ok_or(ColumnError::UnknownColumn(id))?;
        let moved = siblings.remove(from);
        let index = index.min(siblings.len());
        siblings.insert(index, moved);
        Ok(())
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.arena.get(id.0).and_then(Option::as_ref)
    }

    pub fn column_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        self.arena.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Every live column, in creation order.
    pub fn columns(&self) -> impl Iterator<Item = (ColumnId, &Column)> {
        self.arena
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|c| (ColumnId(i), c)))
    }

    /// Looks a column up by its string id.
    pub fn find(&self, id: &str) -> Option<ColumnId> {
        self.columns().find(|(_, c)| c.id == id).map(|(id, _)| id)
    }

    pub fn parent(&self, id: ColumnId) -> Option<ColumnId> {
        self.column(id)?.parent
    }

    /// Children of a composite column; empty for leaves and unknown ids.
    pub fn children(&self, id: ColumnId) -> &[ColumnId] {
        self.column(id)
            .and_then(|c| c.kind.children())
            .unwrap_or(&[])
    }

    pub fn visible_children(&self, id: ColumnId) -> impl Iterator<Item = ColumnId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&c| self.column(c).is_some_and(|c| !c.hidden))
    }

    pub fn top_level(&self) -> &[ColumnId] {
        &self.top
    }

    pub fn visible_top_level(&self) -> impl Iterator<Item = ColumnId> + '_ {
        self.top
            .iter()
            .copied()
            .filter(move |&c| self.column(c).is_some_and(|c| !c.hidden))
    }

    pub fn set_width(&mut self, id: ColumnId, width: f64) -> Result<(), ColumnError> {
        self.get_mut(id)?.set_width(width);
        Ok(())
    }

    pub fn set_hidden(&mut self, id: ColumnId, hidden: bool) -> Result<(), ColumnError> {
        self.get_mut(id)?.hidden = hidden;
        Ok(())
    }

    pub fn set_compressed(&mut self, id: ColumnId, compressed: bool) -> Result<(), ColumnError> {
        self.get_mut(id)?.compressed = compressed;
        Ok(())
    }

    pub fn set_collapsed(&mut self, id: ColumnId, collapsed: bool) -> Result<(), ColumnError> {
        self.get_mut(id)?.collapsed = collapsed;
        Ok(())
    }

    /// Width a column occupies, without padding.
    ///
    /// Compressed columns report [`COMPRESSED_WIDTH`]; expanded multi-level
    /// columns the sum of their visible children; everything else its own
    /// width.
    pub fn column_width(&self, id: ColumnId) -> f64 {
        let Some(column) = self.column(id) else {
            return 0.0;
        };
        if column.compressed {
            COMPRESSED_WIDTH
        } else if column.is_expanded() {
            self.visible_children(id).map(|c| self.column_width(c)).sum()
        } else {
            column.width
        }
    }

    pub fn mapping(&self, id: ColumnId) -> Option<&MappingFunction> {
        self.column(id)?.as_number().map(|n| &n.mapping)
    }

    /// Replaces the live mapping of a number column.
    pub fn set_mapping(&mut self, id: ColumnId, mapping: MappingFunction) -> Result<(), ColumnError> {
        self.get_mut(id)?
            .as_number_mut()
            .ok_or(ColumnError::NotNumeric(id))?
            .mapping = mapping;
        Ok(())
    }

    pub fn filter(&self, id: ColumnId) -> Option<&NumberFilter> {
        self.column(id)?.as_number().map(|n| &n.filter)
    }

    pub fn set_filter(&mut self, id: ColumnId, filter: NumberFilter) -> Result<(), ColumnError> {
        self.get_mut(id)?
            .as_number_mut()
            .ok_or(ColumnError::NotNumeric(id))?
            .filter = filter;
        Ok(())
    }

    /// Whether any number column filters rows.
    pub fn is_filtered(&self) -> bool {
        self.columns()
            .filter_map(|(_, c)| c.as_number())
            .any(|n| n.filter.is_filtered())
    }

    pub fn order(&self) -> &[RowId] {
        &self.order
    }

    /// Replaces the order after checking it against a universe of
    /// `universe` rows.
    pub fn set_order(&mut self, order: Vec<RowId>, universe: usize) -> Result<(), ColumnError> {
        if order.len() > universe {
            return Err(ColumnError::OrderTooLong {
                len: order.len(),
                universe,
            });
        }
        let mut seen = HashSet::with_capacity(order.len());
        for &row in &order {
            if row >= universe {
                return Err(ColumnError::RowOutOfRange { row, universe });
            }
            if !seen.insert(row) {
                return Err(ColumnError::DuplicateRow(row));
            }
        }
        self.order = order;
        Ok(())
    }

    pub fn sort_criteria(&self) -> Option<SortCriteria> {
        self.sort
    }

    pub fn set_sort_criteria(&mut self, column: ColumnId, ascending: bool) -> Result<(), ColumnError> {
        self.get(column)?;
        self.sort = Some(SortCriteria { column, ascending });
        Ok(())
    }

    /// Sorts descending by `column`, best rows first.
    pub fn sort_by(&mut self, column: ColumnId) -> Result<(), ColumnError> {
        self.set_sort_criteria(column, false)
    }

    pub fn clear_sort_criteria(&mut self) {
        self.sort = None;
    }

    /// Unmapped value of a column for `row`. Composite number columns
    /// report their combined value; non-numeric columns NaN.
    pub fn raw_value(&self, id: ColumnId, row: &DataRow) -> f64 {
        let Some(column) = self.column(id) else {
            return f64::NAN;
        };
        match &column.kind {
            ColumnKind::Number(number) => row.number(&number.accessor),
            ColumnKind::BoxPlot(boxplot) => row
                .boxplot(&boxplot.accessor)
                .map_or(f64::NAN, |d| d.value_for(boxplot.sort)),
            ColumnKind::Stack { .. } | ColumnKind::Mean { .. } => self.value(id, row),
            _ => f64::NAN,
        }
    }

    /// Normalized `[0, 1]` value of a column for `row`; NaN when missing.
    pub fn value(&self, id: ColumnId, row: &DataRow) -> f64 {
        let Some(column) = self.column(id) else {
            return f64::NAN;
        };
        match &column.kind {
            ColumnKind::Number(number) => number.mapping.apply(row.number(&number.accessor)),
            ColumnKind::BoxPlot(boxplot) => boxplot.scale(self.raw_value(id, row)),
            ColumnKind::Categorical {
                accessor,
                categories,
            } => {
                let index = row
                    .text(accessor)
                    .and_then(|t| categories.iter().position(|c| *c == t));
                match index {
                    None => f64::NAN,
                    Some(_) if categories.len() < 2 => 1.0,
                    Some(i) => i as f64 / (categories.len() - 1) as f64,
                }
            }
            ColumnKind::String { .. } => f64::NAN,
            ColumnKind::Stack { children } => self.stack_value(children, row),
            ColumnKind::Mean { children } => self.mean_value(children, row),
            ColumnKind::Nested { children } => children
                .first()
                .map_or(f64::NAN, |&c| self.value(c, row)),
        }
    }

    /// Children weighted by their share of the total width; missing child
    /// values count as 0 unless every child is missing.
    fn stack_value(&self, children: &[ColumnId], row: &DataRow) -> f64 {
        if children.is_empty() {
            return 0.0;
        }
        let widths: Vec<f64> = children
            .iter()
            .map(|&c| self.column(c).map_or(0.0, Column::width))
            .collect();
        let total: f64 = widths.iter().sum();
        let equal = 1.0 / children.len() as f64;

        let mut sum = 0.0;
        let mut any = false;
        for (&child, &width) in children.iter().zip(&widths) {
            let value = self.value(child, row);
            if value.is_nan() {
                continue;
            }
            let weight = if total > 0.0 { width / total } else { equal };
            sum += value * weight;
            any = true;
        }
        if any { sum } else { f64::NAN }
    }

    fn mean_value(&self, children: &[ColumnId], row: &DataRow) -> f64 {
        if children.is_empty() {
            return 0.0;
        }
        let values: Vec<f64> = children
            .iter()
            .map(|&c| self.value(c, row))
            .filter(|v| !v.is_nan())
            .collect();
        if values.is_empty() {
            f64::NAN
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }

    /// Text shown for a cell; `None` when missing or when the column draws
    /// its value graphically only.
    pub fn label(&self, id: ColumnId, row: &DataRow) -> Option<String> {
        let column = self.column(id)?;
        match &column.kind {
            ColumnKind::String { accessor } | ColumnKind::Categorical { accessor, .. } => {
                row.text(accessor)
            }
            ColumnKind::Number(_) => {
                let raw = self.raw_value(id, row);
                (!raw.is_nan()).then(|| raw.to_string())
            }
            ColumnKind::Stack { .. } | ColumnKind::Mean { .. } => {
                let value = self.value(id, row);
                (!value.is_nan()).then(|| format!("{:.2}", value))
            }
            ColumnKind::BoxPlot(_) | ColumnKind::Nested { .. } => None,
        }
    }

    /// Filters of every number column, hidden ones included.
    pub fn accepts(&self, row: &DataRow) -> bool {
        self.columns()
            .filter_map(|(_, c)| c.as_number())
            .all(|n| n.filter.accepts(row.number(&n.accessor)))
    }

    /// Compares two rows by the sort criteria. Missing values sort last in
    /// either direction; without criteria all rows are equal.
    pub fn compare(&self, a: &DataRow, b: &DataRow) -> Ordering {
        match self.sort {
            Some(sort) => self.compare_by(sort.column, a, b, sort.ascending),
            None => Ordering::Equal,
        }
    }

    fn compare_by(&self, id: ColumnId, a: &DataRow, b: &DataRow, ascending: bool) -> Ordering {
        let Some(column) = self.column(id) else {
            return Ordering::Equal;
        };
        match &column.kind {
            ColumnKind::Number(_) | ColumnKind::Stack { .. } | ColumnKind::Mean { .. } => {
                compare_numbers(self.value(id, a), self.value(id, b), ascending)
            }
            ColumnKind::BoxPlot(_) => {
                compare_numbers(self.raw_value(id, a), self.raw_value(id, b), ascending)
            }
            ColumnKind::String { accessor } => {
                compare_missing_last(a.text(accessor), b.text(accessor), ascending)
            }
            ColumnKind::Categorical {
                accessor,
                categories,
            } => {
                let key = |row: &DataRow| {
                    row.text(accessor).map(|t| {
                        let index = categories.iter().position(|c| *c == t);
                        (index.unwrap_or(usize::MAX), t)
                    })
                };
                compare_missing_last(key(a), key(b), ascending)
            }
            ColumnKind::Nested { children } => children
                .iter()
                .map(|&c| self.compare_by(c, a, b, ascending))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal),
        }
    }

    /// Filters and stably sorts `rows`, storing and returning the new order.
    pub fn rank(&mut self, rows: &[DataRow]) -> Result<&[RowId], ColumnError> {
        let universe = rows.iter().map(|r| r.id + 1).max().unwrap_or(0);
        let mut kept: Vec<&DataRow> = rows.iter().filter(|r| self.accepts(r)).collect();
        kept.sort_by(|a, b| self.compare(a, b));
        let order = kept.iter().map(|r| r.id).collect();
        self.set_order(order, universe)?;
        Ok(&self.order)
    }
}

fn compare_missing_last<T: Ord>(a: Option<T>, b: Option<T>, ascending: bool) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) if ascending => a.cmp(&b),
        (Some(a), Some(b)) => b.cmp(&a),
    }
}

fn compare_numbers(a: f64, b: f64, ascending: bool) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) if ascending => a.total_cmp(&b),
        (false, false) => b.total_cmp(&a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn number(id: &str) -> Column {
        Column::number(id, id, MappingFunction::linear(0.0, 10.0).unwrap())
    }

    fn rows() -> Vec<DataRow> {
        vec![
            DataRow::new(0, json!({"a": 2, "b": 8, "name": "delta"})),
            DataRow::new(1, json!({"a": 6, "b": 4, "name": "alpha"})),
            DataRow::new(2, json!({"b": 1, "name": "charlie"})),
            DataRow::new(3, json!({"a": 4, "b": 2})),
        ]
    }

    #[test]
    fn test_tree_building() {
        let mut ranking = Ranking::new("r");
        let stack = ranking.push(Column::stack("s"));
        let a = ranking.insert_child(stack, number("a")).unwrap();
        let b = ranking.insert_child(stack, number("b")).unwrap();
        let name = ranking.push(Column::string("name", "name"));

        assert_eq!(ranking.top_level(), &[stack, name]);
        assert_eq!(ranking.children(stack), &[a, b]);
        assert_eq!(ranking.parent(a), Some(stack));
        assert_eq!(ranking.parent(stack), None);
        assert_eq!(ranking.find("b"), Some(b));
        assert_eq!(
            ranking.insert_child(name, number("c")),
            Err(ColumnError::NotComposite(name))
        );
    }

    #[test]
    fn test_column_mut_leaves_tree_links_alone() {
        let mut ranking = Ranking::new("r");
        let stack = ranking.push(Column::stack("s"));
        let a = ranking.insert_child(stack, number("a")).unwrap();

        let column = ranking.column_mut(stack).unwrap();
        assert!(column.as_number_mut().is_none());
        column.set_width(40.0);
        assert!(ranking.column_mut(a).unwrap().as_number_mut().is_some());

        assert_eq!(ranking.children(stack), &[a]);
        assert_eq!(ranking.parent(a), Some(stack));
        assert_eq!(ranking.column(stack).unwrap().width(), 40.0);
    }

    #[test]
    fn test_push_drops_foreign_children() {
        let mut ranking = Ranking::new("r");
        let mut stack = Column::stack("s");
        if let Some(children) = stack.kind.children_mut() {
            children.push(ColumnId(42));
        }
        let id = ranking.push(stack);
        assert!(ranking.children(id).is_empty());
    }

    #[test]
    fn test_remove_subtree() {
        let mut ranking = Ranking::new("r");
        let stack = ranking.push(Column::stack("s"));
        let a = ranking.insert_child(stack, number("a")).unwrap();
        let other = ranking.push(number("other"));
        ranking.set_sort_criteria(a, true).unwrap();

        let removed = ranking.remove(stack).unwrap();
        assert_eq!(removed.id(), "s");
        assert!(ranking.column(a).is_none());
        assert_eq!(ranking.top_level(), &[other]);
        assert_eq!(ranking.sort_criteria(), None);
        assert_eq!(ranking.remove(stack), Err(ColumnError::UnknownColumn(stack)));
    }

    #[test]
    fn test_remove_child_detaches_from_parent() {
        let mut ranking = Ranking::new("r");
        let stack = ranking.push(Column::stack("s"));
        let a = ranking.insert_child(stack, number("a")).unwrap();
        let b = ranking.insert_child(stack, number("b")).unwrap();
        ranking.remove(a).unwrap();
        assert_eq!(ranking.children(stack), &[b]);
    }

    #[test]
    fn test_move_to_clamps() {
        let mut ranking = Ranking::new("r");
        let a = ranking.push(number("a"));
        let b = ranking.push(number("b"));
        let c = ranking.push(number("c"));
        ranking.move_to(a, 99).unwrap();
        assert_eq!(ranking.top_level(), &[b, c, a]);
        ranking.move_to(c, 0).unwrap();
        assert_eq!(ranking.top_level(), &[c, b, a]);
    }

    #[test]
    fn test_column_width() {
        let mut ranking = Ranking::new("r");
        let stack = ranking.push(Column::stack("s").with_width(300.0));
        ranking.insert_child(stack, number("a").with_width(50.0)).unwrap();
        let b = ranking.insert_child(stack, number("b").with_width(70.0)).unwrap();
        assert_eq!(ranking.column_width(stack), 120.0);

        ranking.set_hidden(b, true).unwrap();
        assert_eq!(ranking.column_width(stack), 50.0);

        ranking.set_collapsed(stack, true).unwrap();
        assert_eq!(ranking.column_width(stack), 300.0);

        ranking.set_compressed(stack, true).unwrap();
        assert_eq!(ranking.column_width(stack), COMPRESSED_WIDTH);
    }

    #[test]
    fn test_set_order_validates() {
        let mut ranking = Ranking::new("r");
        assert!(ranking.set_order(vec![2, 0], 3).is_ok());
        assert_eq!(ranking.order(), &[2, 0]);
        assert_eq!(
            ranking.set_order(vec![1, 1], 3),
            Err(ColumnError::DuplicateRow(1))
        );
        assert_eq!(
            ranking.set_order(vec![3], 3),
            Err(ColumnError::RowOutOfRange { row: 3, universe: 3 })
        );
        assert_eq!(
            ranking.set_order(vec![0, 1, 2], 2),
            Err(ColumnError::OrderTooLong { len: 3, universe: 2 })
        );
        assert_eq!(ranking.order(), &[2, 0]);
    }

    #[test]
    fn test_mapping_and_filter_need_number_column() {
        let mut ranking = Ranking::new("r");
        let a = ranking.push(number("a"));
        let name = ranking.push(Column::string("name", "name"));

        let mapping = MappingFunction::linear(0.0, 100.0).unwrap();
        ranking.set_mapping(a, mapping.clone()).unwrap();
        assert_eq!(ranking.mapping(a), Some(&mapping));
        assert_eq!(
            ranking.set_mapping(name, mapping),
            Err(ColumnError::NotNumeric(name))
        );

        assert!(!ranking.is_filtered());
        ranking
            .set_filter(a, NumberFilter::new(0.0, 50.0, false).unwrap())
            .unwrap();
        assert!(ranking.is_filtered());
    }

    #[test]
    fn test_stack_value_weights_by_width() {
        let mut ranking = Ranking::new("r");
        let stack = ranking.push(Column::stack("s"));
        ranking.insert_child(stack, number("a").with_width(30.0)).unwrap();
        ranking.insert_child(stack, number("b").with_width(10.0)).unwrap();
        let row = DataRow::new(0, json!({"a": 10, "b": 2}));
        // 1.0 * 0.75 + 0.2 * 0.25
        assert!((ranking.value(stack, &row) - 0.8).abs() < 1e-12);

        let missing = DataRow::new(1, json!({}));
        assert!(ranking.value(stack, &missing).is_nan());
    }

    #[test]
    fn test_stack_with_zero_widths_weights_equally() {
        let mut ranking = Ranking::new("r");
        let stack = ranking.push(Column::stack("s"));
        ranking.insert_child(stack, number("a").with_width(0.0)).unwrap();
        ranking.insert_child(stack, number("b").with_width(0.0)).unwrap();
        let row = DataRow::new(0, json!({"a": 10, "b": 0}));
        assert_eq!(ranking.value(stack, &row), 0.5);
    }

    #[test]
    fn test_mean_value() {
        let mut ranking = Ranking::new("r");
        let mean = ranking.push(Column::mean("m"));
        let row = DataRow::new(0, json!({"a": 10, "b": 5}));
        assert_eq!(ranking.value(mean, &row), 0.0);

        ranking.insert_child(mean, number("a")).unwrap();
        ranking.insert_child(mean, number("b")).unwrap();
        assert_eq!(ranking.value(mean, &row), 0.75);
    }

    #[test]
    fn test_rank_sorts_descending_missing_last() {
        let mut ranking = Ranking::new("r");
        let a = ranking.push(number("a"));
        ranking.sort_by(a).unwrap();
        assert_eq!(ranking.rank(&rows()).unwrap(), &[1, 3, 0, 2]);

        ranking.set_sort_criteria(a, true).unwrap();
        assert_eq!(ranking.rank(&rows()).unwrap(), &[0, 3, 1, 2]);
    }

    #[test]
    fn test_rank_applies_filters() {
        let mut ranking = Ranking::new("r");
        let a = ranking.push(number("a"));
        ranking
            .set_filter(a, NumberFilter::new(3.0, 10.0, true).unwrap())
            .unwrap();
        assert_eq!(ranking.rank(&rows()).unwrap(), &[1, 3]);
    }

    #[test]
    fn test_rank_without_criteria_keeps_input_order() {
        let mut ranking = Ranking::new("r");
        ranking.push(number("a"));
        assert_eq!(ranking.rank(&rows()).unwrap(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_string_sort() {
        let mut ranking = Ranking::new("r");
        let name = ranking.push(Column::string("name", "name"));
        ranking.set_sort_criteria(name, true).unwrap();
        assert_eq!(ranking.rank(&rows()).unwrap(), &[1, 2, 0, 3]);
    }

    #[test]
    fn test_categorical_sort_uses_category_order() {
        let mut ranking = Ranking::new("r");
        let cat = ranking.push(Column::categorical(
            "name",
            "name",
            vec!["delta".into(), "alpha".into()],
        ));
        ranking.set_sort_criteria(cat, true).unwrap();
        assert_eq!(ranking.rank(&rows()).unwrap(), &[0, 1, 2, 3]);
        assert_eq!(ranking.value(cat, &rows()[1]), 1.0);
    }

    #[test]
    fn test_nested_sort_breaks_ties_with_later_children() {
        let mut ranking = Ranking::new("r");
        let nested = ranking.push(Column::nested("n"));
        ranking.insert_child(nested, number("a")).unwrap();
        ranking.insert_child(nested, number("b")).unwrap();
        ranking.sort_by(nested).unwrap();
        let rows = vec![
            DataRow::new(0, json!({"a": 5, "b": 1})),
            DataRow::new(1, json!({"a": 5, "b": 9})),
            DataRow::new(2, json!({"a": 7, "b": 0})),
        ];
        assert_eq!(ranking.rank(&rows).unwrap(), &[2, 1, 0]);
    }

    #[test]
    fn test_boxplot_sort() {
        let mut ranking = Ranking::new("r");
        let bp = ranking.push(Column::boxplot("d", "d", [0.0, 10.0]));
        ranking.sort_by(bp).unwrap();
        let rows = vec![
            DataRow::new(0, json!({"d": {"min": 0, "max": 9, "median": 3, "q1": 1, "q3": 5}})),
            DataRow::new(1, json!({})),
            DataRow::new(2, json!({"d": {"min": 2, "max": 8, "median": 6, "q1": 4, "q3": 7}})),
        ];
        assert_eq!(ranking.rank(&rows).unwrap(), &[2, 0, 1]);
        assert_eq!(ranking.value(bp, &rows[2]), 0.6);
    }

    #[test]
    fn test_labels() {
        let mut ranking = Ranking::new("r");
        let a = ranking.push(number("a"));
        let name = ranking.push(Column::string("name", "name"));
        let rows = rows();
        assert_eq!(ranking.label(a, &rows[0]).as_deref(), Some("2"));
        assert_eq!(ranking.label(a, &rows[2]), None);
        assert_eq!(ranking.label(name, &rows[1]).as_deref(), Some("alpha"));
    }
}
