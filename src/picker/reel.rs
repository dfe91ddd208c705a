//! A single scrollable wheel column and the offset/index arithmetic behind it.

use serde::Serialize;

use crate::config::PickerConfig;

/// Index of the row centered at scroll offset `offset_y`.
///
/// Offset zero centers the first item (spacer rows pad the top). Overscroll
/// past either end clamps to the first or last item. `None` only for an empty
/// reel.
pub fn index_from_offset(offset_y: f64, row_height: f64, item_count: usize) -> Option<usize> {
    if item_count == 0 {
        return None;
    }
    let max = (item_count - 1) as f64;
    let raw = (offset_y / row_height).round();
    if raw.is_nan() {
        return Some(0);
    }
    Some(raw.clamp(0.0, max) as usize)
}

/// Scroll offset at which `index` sits in the selection band.
pub fn offset_for_index(index: usize, row_height: f64) -> f64 {
    index as f64 * row_height
}

/// Opacity of a row `distance` rows away from the centered one.
pub fn row_opacity(distance: usize) -> f32 {
    match distance {
        0 => 1.0,
        1 => 0.6,
        2 => 0.35,
        _ => 0.2,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowWeight {
    Bold,
    Medium,
    Regular,
}

pub fn row_weight(distance: usize) -> RowWeight {
    match distance {
        0 => RowWeight::Bold,
        1 => RowWeight::Medium,
        _ => RowWeight::Regular,
    }
}

/// One rendered row. Spacer rows have no item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReelRow<'a, T> {
    pub item: Option<&'a T>,
    pub opacity: f32,
    pub weight: RowWeight,
}

/// A wheel column: its items, the raw scroll offset, and the index derived
/// from that offset.
#[derive(Debug, Clone)]
pub struct WheelReel<T> {
    items: Vec<T>,
    row_height: f64,
    spacer_rows: usize,
    offset_y: f64,
    centered_index: Option<usize>,
    committed_index: Option<usize>,
}

impl<T> WheelReel<T> {
    /// A reel that has not been laid out yet: nothing is centered.
    pub fn new(items: Vec<T>, config: &PickerConfig) -> Self {
        Self {
            items,
            row_height: config.row_height,
            spacer_rows: config.spacer_rows(),
            offset_y: 0.0,
            centered_index: None,
            committed_index: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    /// Index currently in the selection band; `None` before first layout.
    pub fn centered_index(&self) -> Option<usize> {
        self.centered_index
    }

    /// Index of the last discrete commit (momentum end, tap, or open).
    pub fn committed_index(&self) -> Option<usize> {
        self.committed_index
    }

    /// The index a save should use: the centered index, or one freshly
    /// derived from the last offset.
    pub fn selected_index(&self) -> Option<usize> {
        self.centered_index
            .or_else(|| index_from_offset(self.offset_y, self.row_height, self.items.len()))
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.selected_index().and_then(|i| self.items.get(i))
    }

    /// Jump to `index` without animating. The centered and committed index
    /// are set before returning.
    pub fn scroll_to_index(&mut self, index: usize) -> Option<usize> {
        if self.items.is_empty() {
            self.offset_y = 0.0;
            self.centered_index = None;
            self.committed_index = None;
            return None;
        }
        let index = index.min(self.items.len() - 1);
        self.offset_y = offset_for_index(index, self.row_height);
        self.centered_index = Some(index);
        self.committed_index = Some(index);
        Some(index)
    }

    /// Continuous scroll update.
    pub fn on_scroll(&mut self, offset_y: f64) -> Option<usize> {
        self.offset_y = offset_y;
        self.centered_index = index_from_offset(offset_y, self.row_height, self.items.len());
        self.centered_index
    }

    /// Momentum ended at `offset_y`: update and commit.
    pub fn on_momentum_end(&mut self, offset_y: f64) -> Option<usize> {
        self.on_scroll(offset_y);
        self.commit_center()
    }

    /// Tap on the selection band: commit whatever the last offset centers.
    pub fn commit_center(&mut self) -> Option<usize> {
        let index = index_from_offset(self.offset_y, self.row_height, self.items.len());
        self.centered_index = index;
        self.committed_index = index;
        index
    }

    /// Replace the items, keeping the selection in range. A selection past
    /// the new end moves to the last item.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        if let Some(index) = self.centered_index {
            self.scroll_to_index(index);
        }
    }

    /// Total scrollable height including spacer rows.
    pub fn content_height(&self) -> f64 {
        (self.items.len() + 2 * self.spacer_rows) as f64 * self.row_height
    }

    /// All rows top to bottom, spacers included, styled by distance from
    /// the centered row.
    pub fn rows(&self) -> Vec<ReelRow<'_, T>> {
        let centered = self.centered_index.unwrap_or(0);
        let spacer = || ReelRow {
            item: None,
            opacity: 0.0,
            weight: RowWeight::Regular,
        };
        let mut rows = Vec::with_capacity(self.items.len() + 2 * self.spacer_rows);
        rows.extend((0..self.spacer_rows).map(|_| spacer()));
        rows.extend(self.items.iter().enumerate().map(|(i, item)| {
            let distance = i.abs_diff(centered);
            ReelRow {
                item: Some(item),
                opacity: row_opacity(distance),
                weight: row_weight(distance),
            }
        }));
        rows.extend((0..self.spacer_rows).map(|_| spacer()));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: f64 = 44.0;

    fn reel(n: u32) -> WheelReel<u32> {
        WheelReel::new((1..=n).collect(), &PickerConfig::default())
    }

    #[test]
    fn index_matches_exact_row_offsets() {
        for k in 0..31 {
            assert_eq!(index_from_offset(k as f64 * H, H, 31), Some(k));
        }
    }

    #[test]
    fn index_is_idempotent_and_rounds() {
        let first = index_from_offset(130.0, H, 12);
        assert_eq!(first, index_from_offset(130.0, H, 12));
        assert_eq!(first, Some(3));
        assert_eq!(index_from_offset(65.0, H, 12), Some(1));
        assert_eq!(index_from_offset(67.0, H, 12), Some(2));
    }

    #[test]
    fn overscroll_clamps() {
        assert_eq!(index_from_offset(-500.0, H, 12), Some(0));
        assert_eq!(index_from_offset(10_000.0, H, 12), Some(11));
        assert_eq!(index_from_offset(f64::NAN, H, 12), Some(0));
        assert_eq!(index_from_offset(100.0, H, 0), None);
    }

    #[test]
    fn opacity_decreases_to_floor() {
        let values: Vec<f32> = (0..6).map(row_opacity).collect();
        for pair in values.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
        assert!(row_opacity(0) > row_opacity(1));
        assert!(row_opacity(1) > row_opacity(2));
        assert_eq!(row_opacity(3), row_opacity(40));
    }

    #[test]
    fn unlaid_reel_has_no_center() {
        let r = reel(12);
        assert_eq!(r.centered_index(), None);
        // save fallback derives from the raw offset
        assert_eq!(r.selected_index(), Some(0));
    }

    #[test]
    fn scroll_updates_center_and_momentum_commits() {
        let mut r = reel(12);
        assert_eq!(r.on_scroll(3.0 * H + 10.0), Some(3));
        assert_eq!(r.committed_index(), None);
        assert_eq!(r.on_momentum_end(5.0 * H), Some(5));
        assert_eq!(r.committed_index(), Some(5));
        assert_eq!(r.selected_item(), Some(&6));
    }

    #[test]
    fn tap_commits_current_center() {
        let mut r = reel(12);
        r.on_scroll(2.0 * H - 5.0);
        assert_eq!(r.commit_center(), Some(2));
        assert_eq!(r.committed_index(), Some(2));
    }

    #[test]
    fn shrinking_items_clamps_selection() {
        let mut r = reel(31);
        r.scroll_to_index(30);
        r.set_items((1..=28).collect());
        assert_eq!(r.centered_index(), Some(27));
        assert_eq!(r.offset_y(), 27.0 * H);
        assert_eq!(r.selected_item(), Some(&28));
    }

    #[test]
    fn rows_include_spacers() {
        let mut r = reel(5);
        r.scroll_to_index(2);
        let rows = r.rows();
        assert_eq!(rows.len(), 5 + 6);
        assert!(rows[0].item.is_none());
        assert_eq!(rows[3 + 2].item, Some(&3));
        assert_eq!(rows[3 + 2].weight, RowWeight::Bold);
        assert_eq!(rows[3 + 2].opacity, 1.0);
        assert_eq!(rows[3].opacity, row_opacity(2));
        assert_eq!(r.content_height(), 11.0 * H);
    }
}
