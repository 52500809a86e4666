//! Native-to-viewport projection for positioned text fragments
//!
//! Rendering backends report text runs in the document's native coordinate
//! space: origin at the bottom-left, y increasing upward, positions measured
//! at the text baseline. Everything downstream (grouping, hitboxes, the
//! host's overlay) works in screen space: origin at the top-left, y
//! increasing downward, logical pixels.

/// A run of text as reported by the rendering backend for one page render.
#[derive(Clone, Debug, PartialEq)]
pub struct TextFragment {
    /// Text content of the run
    pub text: String,
    /// Baseline-left X coordinate in native units
    pub x: f32,
    /// Baseline Y coordinate in native units
    pub y: f32,
    /// Advance width in native units
    pub width: f32,
    /// Explicit glyph-box height, when the backend reports one
    pub height: Option<f32>,
    /// Vertical components of the glyph-scale transform, used to derive a
    /// height when the backend reports none
    pub glyph_scale: [f32; 2],
}

impl TextFragment {
    /// Glyph-box height in native units: the explicit height when reported,
    /// otherwise the Euclidean norm of the vertical glyph-scale components.
    pub fn glyph_height(&self) -> f32 {
        match self.height {
            Some(height) => height,
            None => self.glyph_scale[0].hypot(self.glyph_scale[1]),
        }
    }
}

/// Scale and page dimensions for one render pass.
///
/// `scale` is fit-to-width × zoom level. Dimensions are logical pixels for
/// the whole page at that scale. Device pixel ratio multiplies raster
/// dimensions only and never appears here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportTransform {
    /// Composite scale from native units to logical pixels
    pub scale: f32,
    /// Page width in logical pixels
    pub width: f32,
    /// Page height in logical pixels
    pub height: f32,
}

impl ViewportTransform {
    #[must_use]
    pub const fn new(scale: f32, width: f32, height: f32) -> Self {
        Self {
            scale,
            width,
            height,
        }
    }
}

/// A text fragment projected into viewport space.
///
/// `y` is the top edge and increases downward. Page-scoped: rebuilt on every
/// render, never reused across renders.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedItem {
    /// Left edge in logical pixels
    pub x: f32,
    /// Top edge in logical pixels
    pub y: f32,
    /// Width in logical pixels
    pub width: f32,
    /// Height in logical pixels
    pub height: f32,
    /// Text content carried over from the fragment
    pub text: String,
}

impl PositionedItem {
    /// Bottom edge in logical pixels
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Right edge in logical pixels
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Projects one fragment into viewport space.
///
/// Scales every spatial quantity, then flips the vertical axis: the native
/// glyph box spans `[y, y + height]` upward from the baseline, so after the
/// flip its top edge lands at `viewport.height - (y + height) * scale`. The
/// resulting corners are min/max-normalized so a degenerate transform can
/// never produce a negative extent.
pub fn project_fragment(fragment: &TextFragment, viewport: &ViewportTransform) -> PositionedItem {
    let scale = viewport.scale;
    let native_height = fragment.glyph_height();

    let edge_a = viewport.height - fragment.y * scale;
    let edge_b = viewport.height - (fragment.y + native_height) * scale;
    let top = edge_a.min(edge_b);
    let bottom = edge_a.max(edge_b);

    PositionedItem {
        x: fragment.x * scale,
        y: top,
        width: fragment.width * scale,
        height: bottom - top,
        text: fragment.text.clone(),
    }
}

/// Projects a page's fragments, dropping runs whose trimmed text is empty.
/// Such runs contribute no visual line and would corrupt vertical clustering
/// if they reached the grouper.
pub fn project_fragments(
    fragments: &[TextFragment],
    viewport: &ViewportTransform,
) -> Vec<PositionedItem> {
    fragments
        .iter()
        .filter(|fragment| !fragment.text.trim().is_empty())
        .map(|fragment| project_fragment(fragment, viewport))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(text: &str, x: f32, y: f32, width: f32, height: f32) -> TextFragment {
        TextFragment {
            text: text.to_string(),
            x,
            y,
            width,
            height: Some(height),
            glyph_scale: [0.0, height],
        }
    }

    #[test]
    fn flip_maps_native_baseline_to_screen_bottom() {
        let viewport = ViewportTransform::new(1.0, 600.0, 800.0);
        let item = project_fragment(&fragment("Hello", 50.0, 700.0, 50.0, 10.0), &viewport);

        // Baseline at native y=700 becomes the bottom edge at 800 - 700.
        assert!((item.bottom() - 100.0).abs() < f32::EPSILON);
        assert!((item.y - 90.0).abs() < f32::EPSILON);
        assert!((item.height - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn scale_applies_to_all_spatial_quantities() {
        let viewport = ViewportTransform::new(2.0, 1200.0, 1600.0);
        let item = project_fragment(&fragment("x", 10.0, 700.0, 40.0, 12.0), &viewport);

        assert!((item.x - 20.0).abs() < f32::EPSILON);
        assert!((item.width - 80.0).abs() < f32::EPSILON);
        assert!((item.height - 24.0).abs() < f32::EPSILON);
        assert!((item.bottom() - (1600.0 - 1400.0)).abs() < f32::EPSILON);
    }

    #[test]
    fn derived_height_is_glyph_scale_norm() {
        let frag = TextFragment {
            text: "q".to_string(),
            x: 0.0,
            y: 0.0,
            width: 5.0,
            height: None,
            glyph_scale: [3.0, 4.0],
        };
        assert!((frag.glyph_height() - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn explicit_height_wins_over_glyph_scale() {
        let mut frag = fragment("q", 0.0, 0.0, 5.0, 11.0);
        frag.glyph_scale = [3.0, 4.0];
        assert!((frag.glyph_height() - 11.0).abs() < f32::EPSILON);
    }

    #[test]
    fn whitespace_fragments_are_dropped() {
        let viewport = ViewportTransform::new(1.0, 600.0, 800.0);
        let fragments = vec![
            fragment("keep", 0.0, 700.0, 30.0, 10.0),
            fragment("   ", 40.0, 700.0, 10.0, 10.0),
            fragment("", 60.0, 700.0, 0.0, 10.0),
        ];

        let items = project_fragments(&fragments, &viewport);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "keep");
    }

    #[test]
    fn degenerate_extent_is_normalized() {
        let viewport = ViewportTransform::new(1.0, 600.0, 800.0);
        let item = project_fragment(&fragment("z", 0.0, 700.0, 10.0, 0.0), &viewport);
        assert!(item.height >= 0.0);
        assert!((item.y - 100.0).abs() < f32::EPSILON);
    }
}
