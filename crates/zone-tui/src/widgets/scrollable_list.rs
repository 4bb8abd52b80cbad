//! Scrollable cursor over a list of catalog indices.
//!
//! The list does not own the zones; it holds the indices the controller's
//! selection produced and remembers which one is highlighted.

#[derive(Debug, Default)]
pub struct ScrollableList {
    pub entries: Vec<usize>,
    pub selected: usize,
    pub scroll_offset: usize,
}

impl ScrollableList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entries, keeping the highlighted catalog index when it survives.
    pub fn set_entries(&mut self, entries: Vec<usize>) {
        let previous = self.selected_entry();
        self.entries = entries;
        self.selected = previous
            .and_then(|p| self.entries.iter().position(|&i| i == p))
            .unwrap_or(0);
        self.clamp();
    }

    fn clamp(&mut self) {
        if self.selected >= self.entries.len() {
            self.selected = self.entries.len().saturating_sub(1);
        }
        if self.scroll_offset > self.selected {
            self.scroll_offset = self.selected;
        }
    }

    pub fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = (self.selected + n).min(self.entries.len() - 1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.entries.len().saturating_sub(1);
    }

    /// Catalog index under the cursor.
    pub fn selected_entry(&self) -> Option<usize> {
        self.entries.get(self.selected).copied()
    }

    /// Entries visible in `height` rows. Call `ensure_visible` first.
    pub fn visible(&self, height: usize) -> &[usize] {
        if height == 0 || self.entries.is_empty() {
            return &[];
        }
        let start = self.scroll_offset.min(self.entries.len());
        let end = (start + height).min(self.entries.len());
        &self.entries[start..end]
    }

    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected + 1 - height;
        }
    }

    /// Select the row at `row` within the rendered area. Returns true on a hit.
    pub fn handle_click(&mut self, row: usize) -> bool {
        let target = self.scroll_offset + row;
        if target < self.entries.len() {
            self.selected = target;
            return true;
        }
        false
    }

    pub fn selected_in_view(&self) -> usize {
        self.selected.saturating_sub(self.scroll_offset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_follows_entry_across_reorder() {
        let mut l = ScrollableList::new();
        l.set_entries(vec![4, 7, 9]);
        l.select_down(1);
        assert_eq!(l.selected_entry(), Some(7));

        l.set_entries(vec![9, 7]);
        assert_eq!(l.selected_entry(), Some(7));

        l.set_entries(vec![1, 2]);
        assert_eq!(l.selected_entry(), Some(1));

        l.set_entries(Vec::new());
        assert_eq!(l.selected_entry(), None);
        l.select_down(3);
        assert_eq!(l.selected, 0);
    }

    #[test]
    fn scrolling_keeps_cursor_in_view() {
        let mut l = ScrollableList::new();
        l.set_entries((0..20).collect());
        l.select_down(12);
        l.ensure_visible(5);
        assert_eq!(l.scroll_offset, 8);
        assert_eq!(l.visible(5), &[8, 9, 10, 11, 12]);
        assert_eq!(l.selected_in_view(), 4);

        assert!(l.handle_click(0));
        assert_eq!(l.selected_entry(), Some(8));
        assert!(!l.handle_click(40));

        l.select_first();
        l.ensure_visible(5);
        assert_eq!(l.visible(5), &[0, 1, 2, 3, 4]);
    }
}
