use serde::{Deserialize, Serialize};

/// When the editor notifies its listener.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommitPolicy {
    /// On every edit, gesture moves included.
    #[default]
    EveryEdit,
    /// On discrete edits and when a gesture ends, never while dragging.
    GestureEnd,
}

/// Geometry and behavior of a [`MappingEditor`](super::MappingEditor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorOptions {
    pub width: f64,
    pub height: f64,
    pub padding_hor: f64,
    pub padding_ver: f64,
    /// Height of the filter handle band below the mapping area.
    pub filter_height: f64,
    /// Handle radius.
    pub radius: f64,
    pub commit: CommitPolicy,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            width: 370.0,
            height: 225.0,
            padding_hor: 7.0,
            padding_ver: 7.0,
            filter_height: 20.0,
            radius: 5.0,
            commit: CommitPolicy::default(),
        }
    }
}

impl EditorOptions {
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn padding(mut self, horizontal: f64, vertical: f64) -> Self {
        self.padding_hor = horizontal;
        self.padding_ver = vertical;
        self
    }

    pub fn commit(mut self, policy: CommitPolicy) -> Self {
        self.commit = policy;
        self
    }

    /// Width of the area both pixel scales map onto.
    pub fn inner_width(&self) -> f64 {
        (self.width - 2.0 * self.padding_hor).max(0.0)
    }

    /// Height between the normalized and the raw axis.
    pub fn inner_height(&self) -> f64 {
        (self.height - 2.0 * self.padding_ver - self.filter_height).max(0.0)
    }
}
