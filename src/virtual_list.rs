//! Virtual List Window Calculator
//!
//! Works out which slice of a long list is inside (or just below) the
//! viewport so only that slice needs rendering.
//!
//! Range math assumes uniform row height: per-item `height` is carried but
//! does not affect the window.

use serde::{Deserialize, Serialize};

// == Virtual List Item ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualListItem {
    pub id: String,
    pub height: f64,
}

impl VirtualListItem {
    pub fn new(id: impl Into<String>, height: f64) -> Self {
        Self {
            id: id.into(),
            height,
        }
    }
}

// == Visible Range ==
/// Half-open index range `[start, end)` of rows to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
}

impl VisibleRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// == Virtual List ==
#[derive(Debug, Clone)]
pub struct VirtualList {
    items: Vec<VirtualListItem>,
    item_height: f64,
    container_height: f64,
    scroll_position: f64,
}

impl VirtualList {
    pub fn new(item_height: f64, container_height: f64) -> Self {
        Self {
            items: Vec::new(),
            item_height,
            container_height,
            scroll_position: 0.0,
        }
    }

    pub fn set_items(&mut self, items: Vec<VirtualListItem>) {
        self.items = items;
    }

    pub fn set_scroll_position(&mut self, position: f64) {
        self.scroll_position = position;
    }

    pub fn items(&self) -> &[VirtualListItem] {
        &self.items
    }

    pub fn scroll_position(&self) -> f64 {
        self.scroll_position
    }

    /// Rows from the first one touching the top of the viewport through one
    /// row past the bottom edge, clamped to the item count.
    pub fn visible_range(&self) -> VisibleRange {
        let count = self.items.len();
        if !(self.item_height.is_finite() && self.item_height > 0.0) {
            return VisibleRange { start: 0, end: 0 };
        }

        let start = (self.scroll_position / self.item_height).floor().max(0.0);
        let end = ((self.scroll_position + self.container_height) / self.item_height).ceil() + 1.0;

        // `as` saturates, so NaN maps to 0 and huge values to usize::MAX
        let end = (end.max(0.0) as usize).min(count);
        let start = (start as usize).min(end);

        VisibleRange { start, end }
    }

    pub fn visible_items(&self) -> &[VirtualListItem] {
        let range = self.visible_range();
        &self.items[range.start..range.end]
    }

    /// Pixel offset at which row `index` is positioned.
    pub fn offset_y(&self, index: usize) -> f64 {
        index as f64 * self.item_height
    }

    /// Height of the full scroll container.
    pub fn total_height(&self) -> f64 {
        self.offset_y(self.items.len())
    }
}
