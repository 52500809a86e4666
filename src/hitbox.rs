//! Tappable hitboxes derived from logical lines
//!
//! Hitboxes are pure model data: the host's presentation layer observes them
//! and draws the overlay, the model never holds a UI handle. The sequence is
//! rebuilt from scratch whenever thickness, zoom, or page changes, never
//! mutated geometrically in place.

use crate::lines::{LineBounds, LogicalLine};

/// Fixed horizontal padding applied to both sides of every hitbox, in
/// logical pixels.
pub const HORIZONTAL_PADDING: f32 = 8.0;

/// Visual reading state of one line's hitbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadState {
    /// Not yet reached
    Unread,
    /// The single line being read right now
    Current,
    /// Already passed
    Read,
}

/// Screen-space tappable rectangle for one logical line.
#[derive(Clone, Debug, PartialEq)]
pub struct LineHitbox {
    /// Index of the matching logical line in the page sequence
    pub index: usize,
    /// Padded rectangle in logical pixels
    pub rect: LineBounds,
    /// Visual state tag
    pub state: ReadState,
}

/// Builds one hitbox: the line's bounding box expanded by `thickness / 2`
/// vertically on each side and [`HORIZONTAL_PADDING`] on each side
/// horizontally.
pub fn build_hitbox(line: &LogicalLine, index: usize, thickness: u16) -> LineHitbox {
    let vertical = f32::from(thickness) / 2.0;
    LineHitbox {
        index,
        rect: LineBounds {
            x0: line.bounds.x0 - HORIZONTAL_PADDING,
            y0: line.bounds.y0 - vertical,
            x1: line.bounds.x1 + HORIZONTAL_PADDING,
            y1: line.bounds.y1 + vertical,
        },
        state: ReadState::Unread,
    }
}

/// Builds the hitbox sequence for a page's lines. Fresh hitboxes all start
/// `Unread`; the reading cursor assigns states afterwards.
pub fn build_hitboxes(lines: &[LogicalLine], thickness: u16) -> Vec<LineHitbox> {
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| build_hitbox(line, index, thickness))
        .collect()
}
