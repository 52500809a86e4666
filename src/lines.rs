//! Grouping of positioned items into ordered logical lines
//!
//! The grouper turns one page's projected fragments into the sequence of
//! logical lines the reading cursor walks. Clustering is a single linear
//! pass over items sorted into reading order, chaining pairwise-adjacent
//! vertical comparisons so gradually slanted lines still group together.

use crate::geometry::PositionedItem;

/// Clustering tolerances in logical pixels.
///
/// Both tolerances scale linearly with the viewport scale: what counts as
/// "the same row" grows with the displayed text, so clustering behaves the
/// same at every zoom level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupingParams {
    /// Items whose vertical positions differ by less than this are ordered
    /// by horizontal position (reading order within one visual row)
    pub row_tolerance: f32,
    /// Items whose vertical positions differ by less than this join the
    /// current line bucket
    pub grouping_tolerance: f32,
}

impl GroupingParams {
    /// Row tolerance at scale 1.0
    pub const BASE_ROW_TOLERANCE: f32 = 8.0;
    /// Grouping tolerance at scale 1.0
    pub const BASE_GROUPING_TOLERANCE: f32 = 12.0;

    /// Tolerances for a render at the given viewport scale. Non-finite or
    /// non-positive scales fall back to 1.0.
    pub fn for_scale(scale: f32) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self {
            row_tolerance: Self::BASE_ROW_TOLERANCE * scale,
            grouping_tolerance: Self::BASE_GROUPING_TOLERANCE * scale,
        }
    }
}

impl Default for GroupingParams {
    fn default() -> Self {
        Self::for_scale(1.0)
    }
}

/// Axis-aligned bounding box in viewport space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineBounds {
    /// Left edge X coordinate
    pub x0: f32,
    /// Top edge Y coordinate
    pub y0: f32,
    /// Right edge X coordinate
    pub x1: f32,
    /// Bottom edge Y coordinate
    pub y1: f32,
}

impl LineBounds {
    fn from_item(item: &PositionedItem) -> Self {
        Self {
            x0: item.x,
            y0: item.y,
            x1: item.right(),
            y1: item.bottom(),
        }
    }

    fn include(&mut self, item: &PositionedItem) {
        self.x0 = self.x0.min(item.x);
        self.y0 = self.y0.min(item.y);
        self.x1 = self.x1.max(item.right());
        self.y1 = self.y1.max(item.bottom());
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// An ordered cluster of items sharing an approximate vertical position.
///
/// One page's lines form an ordered sequence, index 0 = topmost. Recreated
/// on every render and discarded on the next one.
#[derive(Clone, Debug, PartialEq)]
pub struct LogicalLine {
    /// Member items in reading order
    pub items: Vec<PositionedItem>,
    /// Union of all member extents
    pub bounds: LineBounds,
}

impl LogicalLine {
    fn from_items(items: Vec<PositionedItem>) -> Self {
        debug_assert!(!items.is_empty());
        let mut bounds = LineBounds::from_item(&items[0]);
        for item in &items[1..] {
            bounds.include(item);
        }
        Self { items, bounds }
    }

    /// Concatenated text of the member items, in reading order. Fragments
    /// carry their own inter-word spacing, so no separator is inserted.
    pub fn text(&self) -> String {
        self.items.iter().map(|item| item.text.as_str()).collect()
    }
}

/// Clusters one page's items into ordered logical lines, topmost first.
///
/// Items are sorted into reading order, then bucketed in a single pass: an
/// item joins the current bucket when its vertical position is within the
/// grouping tolerance of the previously appended item (the running
/// reference follows each appended item, not the bucket's extremes).
/// Deterministic for a fixed input: the sort is stable and tie-breaks are
/// total.
pub fn group_lines(items: Vec<PositionedItem>, params: &GroupingParams) -> Vec<LogicalLine> {
    if items.is_empty() {
        return Vec::new();
    }

    let mut items = items;
    sort_reading_order(&mut items, params.row_tolerance);

    let mut lines = Vec::new();
    let mut bucket: Vec<PositionedItem> = Vec::new();
    let mut reference_y = 0.0_f32;

    for item in items {
        if bucket.is_empty() || (item.y - reference_y).abs() < params.grouping_tolerance {
            reference_y = item.y;
            bucket.push(item);
        } else {
            lines.push(LogicalLine::from_items(std::mem::take(&mut bucket)));
            reference_y = item.y;
            bucket.push(item);
        }
    }
    if !bucket.is_empty() {
        lines.push(LogicalLine::from_items(bucket));
    }

    lines
}

/// Sorts items top-to-bottom with a horizontal tie-break inside each
/// row-tolerance band.
///
/// Vertical positions are quantized into row-tolerance-wide bands so the
/// comparison is a total order (items within one band differ by less than
/// the tolerance and order by x; items straddling a band boundary order
/// vertically, as a plain y-sort would).
fn sort_reading_order(items: &mut [PositionedItem], row_tolerance: f32) {
    let band = |y: f32| (y / row_tolerance).floor() as i64;
    items.sort_by(|a, b| {
        band(a.y)
            .cmp(&band(b.y))
            .then_with(|| a.x.total_cmp(&b.x))
            .then_with(|| a.y.total_cmp(&b.y))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(text: &str, x: f32, y: f32) -> PositionedItem {
        PositionedItem {
            x,
            y,
            width: 10.0,
            height: 10.0,
            text: text.to_string(),
        }
    }

    #[test]
    fn empty_input_yields_no_lines() {
        assert!(group_lines(Vec::new(), &GroupingParams::default()).is_empty());
    }

    #[test]
    fn single_item_forms_single_line() {
        let lines = group_lines(vec![item("only", 5.0, 100.0)], &GroupingParams::default());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].items.len(), 1);
        assert_eq!(lines[0].text(), "only");
    }

    #[test]
    fn nearby_items_share_a_line_and_distant_items_split() {
        let lines = group_lines(
            vec![
                item("Hello", 10.0, 100.0),
                item(" World", 70.0, 105.0),
                item("Second", 10.0, 200.0),
            ],
            &GroupingParams::default(),
        );

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Hello World");
        assert_eq!(lines[1].text(), "Second");
    }

    #[test]
    fn lines_are_ordered_top_to_bottom() {
        let lines = group_lines(
            vec![
                item("c", 0.0, 300.0),
                item("a", 0.0, 50.0),
                item("b", 0.0, 175.0),
            ],
            &GroupingParams::default(),
        );

        assert_eq!(lines.len(), 3);
        for pair in lines.windows(2) {
            assert!(pair[0].bounds.y0 <= pair[1].bounds.y0);
        }
        assert_eq!(lines[0].text(), "a");
        assert_eq!(lines[2].text(), "c");
    }

    #[test]
    fn same_row_items_sort_by_horizontal_position() {
        let lines = group_lines(
            vec![
                item("right", 200.0, 101.0),
                item("left", 10.0, 100.5),
                item("mid", 90.0, 100.0),
            ],
            &GroupingParams::default(),
        );

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "leftmidright");
    }

    #[test]
    fn chained_reference_follows_gradual_slant() {
        // Each step is inside the tolerance, the total drift is not.
        let lines = group_lines(
            vec![
                item("a", 0.0, 100.0),
                item("b", 20.0, 110.0),
                item("c", 40.0, 120.0),
            ],
            &GroupingParams::default(),
        );
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].items.len(), 3);
    }

    #[test]
    fn grouping_is_deterministic() {
        let input = vec![
            item("a", 30.0, 100.0),
            item("b", 10.0, 104.0),
            item("c", 50.0, 240.0),
            item("d", 5.0, 97.0),
        ];
        let first = group_lines(input.clone(), &GroupingParams::default());
        let second = group_lines(input, &GroupingParams::default());
        assert_eq!(first, second);
    }

    #[test]
    fn every_item_lands_in_exactly_one_line() {
        let input = vec![
            item("a", 0.0, 100.0),
            item("b", 15.0, 102.0),
            item("c", 0.0, 130.0),
            item("d", 0.0, 160.0),
            item("e", 20.0, 161.0),
        ];
        let total = input.len();
        let lines = group_lines(input, &GroupingParams::default());

        let grouped: usize = lines.iter().map(|line| line.items.len()).sum();
        assert_eq!(grouped, total);

        let mut texts: Vec<&str> = lines
            .iter()
            .flat_map(|line| line.items.iter().map(|item| item.text.as_str()))
            .collect();
        texts.sort_unstable();
        assert_eq!(texts, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn tolerance_scales_with_viewport_scale() {
        // 20px apart: separate lines at scale 1, one line at scale 2.
        let input = vec![item("a", 0.0, 100.0), item("b", 0.0, 120.0)];

        let at_one = group_lines(input.clone(), &GroupingParams::for_scale(1.0));
        assert_eq!(at_one.len(), 2);

        let at_two = group_lines(input, &GroupingParams::for_scale(2.0));
        assert_eq!(at_two.len(), 1);
    }

    #[test]
    fn degenerate_scale_falls_back_to_base_tolerances() {
        let params = GroupingParams::for_scale(f32::NAN);
        assert_eq!(params.row_tolerance, GroupingParams::BASE_ROW_TOLERANCE);
        assert_eq!(
            params.grouping_tolerance,
            GroupingParams::BASE_GROUPING_TOLERANCE
        );
    }

    #[test]
    fn bounds_cover_all_member_items() {
        let lines = group_lines(
            vec![item("a", 10.0, 100.0), item("b", 80.0, 103.0)],
            &GroupingParams::default(),
        );

        assert_eq!(lines.len(), 1);
        let bounds = lines[0].bounds;
        assert_eq!(bounds.x0, 10.0);
        assert_eq!(bounds.x1, 90.0);
        assert_eq!(bounds.y0, 100.0);
        assert_eq!(bounds.y1, 113.0);
    }
}
