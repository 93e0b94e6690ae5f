//! Data provider contract: rankings, row data and selection.

use std::collections::BTreeSet;

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use lineup_model::error::ColumnError;
use lineup_model::{DataRow, Ranking, RowId};

use crate::events::{EventBus, Subscription};

/// Row data resolving at some later point.
pub type RowFuture = BoxFuture<'static, DataRow>;

/// Notifications a provider sends to the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderEvent {
    /// Row values or orders changed; the body must re-render.
    DirtyValues,
    SelectionChanged,
}

/// Source of rankings and row data for a body renderer.
pub trait DataProvider {
    fn rankings(&self) -> &[Ranking];

    /// One future per row id, per ranking, aligned with `orders`.
    fn fetch(&self, orders: &[&[RowId]]) -> Vec<Vec<RowFuture>>;

    fn is_selected(&self, row: RowId) -> bool;

    /// Selected rows in ascending id order.
    fn selection(&self) -> Vec<RowId>;

    /// Toggles `row` the way clicking it does: with `additional` the row is
    /// added to or removed from the selection, otherwise it becomes the only
    /// selected row, or clears the selection if it already was.
    fn toggle_selection(&mut self, row: RowId, additional: bool);

    fn subscribe(&self) -> Subscription<ProviderEvent>;
}

/// Set of selected rows with click-toggle semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    rows: BTreeSet<RowId>,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, row: RowId) -> bool {
        self.rows.contains(&row)
    }

    pub fn rows(&self) -> Vec<RowId> {
        self.rows.iter().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn toggle(&mut self, row: RowId, additional: bool) {
        if additional {
            if !self.rows.remove(&row) {
                self.rows.insert(row);
            }
        } else if self.rows.len() == 1 && self.rows.contains(&row) {
            self.rows.clear();
        } else {
            self.rows.clear();
            self.rows.insert(row);
        }
    }
}

/// Provider over rows held in memory.
///
/// Row ids are positions in the row vector. Rankings are ranked against
/// all rows when added and on [`refresh`](Self::refresh).
#[derive(Debug, Default)]
pub struct LocalDataProvider {
    rows: Vec<DataRow>,
    rankings: Vec<Ranking>,
    selection: RowSelection,
    bus: EventBus<ProviderEvent>,
}

impl LocalDataProvider {
    /// Takes `values` as rows `0..values.len()`.
    pub fn new(values: impl IntoIterator<Item = serde_json::Value>) -> Self {
        Self {
            rows: values
                .into_iter()
                .enumerate()
                .map(|(id, values)| DataRow::new(id, values))
                .collect(),
            ..Self::default()
        }
    }

    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    /// Ranks and adds a ranking, returning its index. Ranking ids must be
    /// unique within a provider.
    pub fn push_ranking(&mut self, mut ranking: Ranking) -> Result<usize, ColumnError> {
        if self.rankings.iter().any(|r| r.id() == ranking.id()) {
            return Err(ColumnError::DuplicateRanking(ranking.id().to_string()));
        }
        ranking.rank(&self.rows)?;
        self.rankings.push(ranking);
        self.bus.emit(ProviderEvent::DirtyValues);
        Ok(self.rankings.len() - 1)
    }

    pub fn remove_ranking(&mut self, index: usize) -> Option<Ranking> {
        if index >= self.rankings.len() {
            return None;
        }
        let ranking = self.rankings.remove(index);
        self.bus.emit(ProviderEvent::DirtyValues);
        Some(ranking)
    }

    /// Mutable access to a ranking; call [`refresh`](Self::refresh) after
    /// changing sort criteria, filters or mappings.
    pub fn ranking_mut(&mut self, index: usize) -> Option<&mut Ranking> {
        self.rankings.get_mut(index)
    }

    /// Re-ranks every ranking and notifies subscribers.
    pub fn refresh(&mut self) -> Result<(), ColumnError> {
        for ranking in &mut self.rankings {
            ranking.rank(&self.rows)?;
        }
        self.bus.emit(ProviderEvent::DirtyValues);
        Ok(())
    }

    fn row(&self, id: RowId) -> DataRow {
        self.rows
            .get(id)
            .cloned()
            .unwrap_or_else(|| DataRow::new(id, serde_json::Value::Null))
    }
}

impl DataProvider for LocalDataProvider {
    fn rankings(&self) -> &[Ranking] {
        &self.rankings
    }

    fn fetch(&self, orders: &[&[RowId]]) -> Vec<Vec<RowFuture>> {
        orders
            .iter()
            .map(|order| {
                order
                    .iter()
                    .map(|&id| future::ready(self.row(id)).boxed())
                    .collect()
            })
            .collect()
    }

    fn is_selected(&self, row: RowId) -> bool {
        self.selection.contains(row)
    }

    fn selection(&self) -> Vec<RowId> {
        self.selection.rows()
    }

    fn toggle_selection(&mut self, row: RowId, additional: bool) {
        self.selection.toggle(row, additional);
        self.bus.emit(ProviderEvent::SelectionChanged);
    }

    fn subscribe(&self) -> Subscription<ProviderEvent> {
        self.bus.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_single() {
        let mut selection = RowSelection::new();
        selection.toggle(3, false);
        assert_eq!(selection.rows(), vec![3]);
        selection.toggle(5, false);
        assert_eq!(selection.rows(), vec![5]);
        selection.toggle(5, false);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_additional() {
        let mut selection = RowSelection::new();
        selection.toggle(3, true);
        selection.toggle(1, true);
        assert_eq!(selection.rows(), vec![1, 3]);
        selection.toggle(3, true);
        assert_eq!(selection.rows(), vec![1]);
        selection.toggle(4, false);
        assert_eq!(selection.rows(), vec![4]);
    }

    #[tokio::test]
    async fn test_local_fetch_aligns_with_orders() {
        let provider = LocalDataProvider::new([
            serde_json::json!({"v": 0}),
            serde_json::json!({"v": 1}),
            serde_json::json!({"v": 2}),
        ]);
        let first: &[RowId] = &[2, 0];
        let second: &[RowId] = &[1, 7];
        let mut fetched = provider.fetch(&[first, second]);
        assert_eq!(fetched.len(), 2);

        let second_rows = futures::future::join_all(fetched.pop().unwrap_or_default()).await;
        assert_eq!(second_rows[0].number("v"), 1.0);
        assert_eq!(second_rows[1].id, 7);
        assert!(second_rows[1].number("v").is_nan());

        let first_rows = futures::future::join_all(fetched.pop().unwrap_or_default()).await;
        let ids: Vec<RowId> = first_rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 0]);
    }

    #[test]
    fn test_local_notifies_subscribers() {
        let mut provider = LocalDataProvider::new([serde_json::json!({})]);
        let mut events = provider.subscribe();
        provider.push_ranking(Ranking::new("r")).unwrap();
        provider.toggle_selection(0, false);
        assert_eq!(
            events.drain(),
            vec![ProviderEvent::DirtyValues, ProviderEvent::SelectionChanged]
        );
        assert!(provider.is_selected(0));
        assert_eq!(provider.rankings()[0].order(), &[0]);
    }

    #[test]
    fn test_push_ranking_rejects_duplicate_ids() {
        let mut provider = LocalDataProvider::new([serde_json::json!({})]);
        assert_eq!(provider.push_ranking(Ranking::new("r")), Ok(0));
        assert_eq!(
            provider.push_ranking(Ranking::new("r")),
            Err(ColumnError::DuplicateRanking("r".into()))
        );
        assert_eq!(provider.rankings().len(), 1);
    }
}
