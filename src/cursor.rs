//! Reading cursor: current-line tracking over a page's hitbox sequence
//!
//! The cursor owns the single "current line" index and assigns the
//! read/current/unread tags. It never touches storage or navigation itself;
//! the session persists progress and performs page changes based on the
//! returned outcomes.

use std::cmp::Ordering;

use crate::hitbox::{LineHitbox, ReadState};

/// Validates a line index against the detected line count. Out-of-range
/// indices reset to line 0 (a replaced or re-laid-out document invalidates
/// old positions); already-valid indices pass through unchanged, so the
/// clamp is idempotent.
pub fn validate_line(line: usize, line_count: usize) -> usize {
    if line < line_count { line } else { 0 }
}

/// Outcome of an [`ReadingCursor::advance`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved to the given line on the current page
    Moved(usize),
    /// Already at the last line; the caller should navigate to the next page
    NextPage,
    /// Last line of the last page; deliberate no-op
    EndOfDocument,
}

/// Tracks the current line for the active page of the open document.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReadingCursor {
    current: usize,
}

impl ReadingCursor {
    /// Index of the line currently being read
    pub fn current(&self) -> usize {
        self.current
    }

    /// Marks `index` current, every hitbox before it read and every hitbox
    /// after it unread. Exactly one hitbox ends up `Current`. Returns the
    /// applied index (an out-of-range input validates down to 0), or `None`
    /// when the sequence is empty.
    pub fn set_current(&mut self, hitboxes: &mut [LineHitbox], index: usize) -> Option<usize> {
        if hitboxes.is_empty() {
            return None;
        }

        let index = validate_line(index, hitboxes.len());
        for hitbox in hitboxes.iter_mut() {
            hitbox.state = match hitbox.index.cmp(&index) {
                Ordering::Less => ReadState::Read,
                Ordering::Equal => ReadState::Current,
                Ordering::Greater => ReadState::Unread,
            };
        }
        self.current = index;
        Some(index)
    }

    /// Moves one line forward. At the last line of the page (or on a page
    /// with no lines at all) the caller is asked to navigate instead;
    /// `has_next_page` tells whether a next page exists.
    pub fn advance(&mut self, hitboxes: &mut [LineHitbox], has_next_page: bool) -> AdvanceOutcome {
        if self.current + 1 < hitboxes.len() {
            let next = self.current + 1;
            self.set_current(hitboxes, next);
            AdvanceOutcome::Moved(next)
        } else if has_next_page {
            AdvanceOutcome::NextPage
        } else {
            AdvanceOutcome::EndOfDocument
        }
    }

    /// Resets to line 0 for a page whose lines are not yet known.
    pub fn reset(&mut self) {
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::LineBounds;

    fn hitboxes(count: usize) -> Vec<LineHitbox> {
        (0..count)
            .map(|index| LineHitbox {
                index,
                rect: LineBounds {
                    x0: 0.0,
                    y0: index as f32 * 20.0,
                    x1: 100.0,
                    y1: index as f32 * 20.0 + 12.0,
                },
                state: ReadState::Unread,
            })
            .collect()
    }

    fn states(hitboxes: &[LineHitbox]) -> Vec<ReadState> {
        hitboxes.iter().map(|hitbox| hitbox.state).collect()
    }

    #[test]
    fn set_current_partitions_states_around_the_index() {
        let mut cursor = ReadingCursor::default();
        let mut boxes = hitboxes(4);

        assert_eq!(cursor.set_current(&mut boxes, 2), Some(2));
        assert_eq!(
            states(&boxes),
            vec![
                ReadState::Read,
                ReadState::Read,
                ReadState::Current,
                ReadState::Unread,
            ]
        );
        assert_eq!(cursor.current(), 2);
    }

    #[test]
    fn exactly_one_hitbox_is_current_after_any_set() {
        let mut cursor = ReadingCursor::default();
        let mut boxes = hitboxes(5);

        for index in [0, 3, 1, 4] {
            cursor.set_current(&mut boxes, index);
            let current = boxes
                .iter()
                .filter(|hitbox| hitbox.state == ReadState::Current)
                .count();
            assert_eq!(current, 1);
        }
    }

    #[test]
    fn empty_sequence_is_a_safe_no_op() {
        let mut cursor = ReadingCursor::default();
        let mut boxes = hitboxes(0);

        assert_eq!(cursor.set_current(&mut boxes, 0), None);
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn out_of_range_index_validates_to_line_zero() {
        let mut cursor = ReadingCursor::default();
        let mut boxes = hitboxes(3);

        assert_eq!(cursor.set_current(&mut boxes, 17), Some(0));
        assert_eq!(
            states(&boxes),
            vec![ReadState::Current, ReadState::Unread, ReadState::Unread]
        );
    }

    #[test]
    fn validate_line_is_idempotent() {
        assert_eq!(validate_line(2, 3), 2);
        assert_eq!(validate_line(validate_line(2, 3), 3), 2);

        assert_eq!(validate_line(7, 3), 0);
        assert_eq!(validate_line(validate_line(7, 3), 3), 0);
    }

    #[test]
    fn advance_walks_lines_then_pages_then_stops() {
        let mut cursor = ReadingCursor::default();
        let mut boxes = hitboxes(2);
        cursor.set_current(&mut boxes, 0);

        assert_eq!(cursor.advance(&mut boxes, true), AdvanceOutcome::Moved(1));
        assert_eq!(cursor.advance(&mut boxes, true), AdvanceOutcome::NextPage);
        assert_eq!(
            cursor.advance(&mut boxes, false),
            AdvanceOutcome::EndOfDocument
        );
        // Still parked on the last line after the no-op.
        assert_eq!(cursor.current(), 1);
    }

    #[test]
    fn advance_on_an_empty_page_asks_for_navigation() {
        let mut cursor = ReadingCursor::default();
        let mut boxes = hitboxes(0);

        assert_eq!(cursor.advance(&mut boxes, true), AdvanceOutcome::NextPage);
        assert_eq!(
            cursor.advance(&mut boxes, false),
            AdvanceOutcome::EndOfDocument
        );
    }

    #[test]
    fn reset_returns_to_line_zero() {
        let mut cursor = ReadingCursor::default();
        let mut boxes = hitboxes(3);
        cursor.set_current(&mut boxes, 2);

        cursor.reset();
        assert_eq!(cursor.current(), 0);
    }
}
