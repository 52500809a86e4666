//! Document engine abstraction
//!
//! The render worker talks to the document through these traits, so the
//! engine producing rasters and text positions stays swappable (and test
//! suites can script one without touching a real document).

use crate::geometry::TextFragment;

use super::request::RenderFault;

/// Page dimensions in layout pixels at a given scale
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageViewport {
    /// Scaled page width
    pub width: f32,
    /// Scaled page height
    pub height: f32,
    /// Scale the dimensions were computed at
    pub scale: f32,
}

impl PageViewport {
    #[must_use]
    pub const fn new(width: f32, height: f32, scale: f32) -> Self {
        Self {
            width,
            height,
            scale,
        }
    }
}

/// Packed RGB raster produced by a page render
#[derive(Clone)]
pub struct RasterSurface {
    /// Row-major RGB bytes
    pub pixels: Vec<u8>,
    /// Raster width in device pixels
    pub width_px: u32,
    /// Raster height in device pixels
    pub height_px: u32,
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .field("byte_count", &self.pixels.len())
            .finish()
    }
}

/// Opens documents from raw bytes
pub trait DocumentBackend: Send + Sync {
    /// Parse `data` into an open document
    fn open(&self, data: Vec<u8>) -> Result<Box<dyn DocumentHandle>, RenderFault>;
}

/// An open document
///
/// The handle moves onto the render worker thread after the session has read
/// the page count, so implementations must be `Send` but never need `Sync`.
pub trait DocumentHandle: Send {
    /// Total number of pages
    fn page_count(&self) -> usize;

    /// Look up a page by 1-based number
    fn page(&self, number: usize) -> Result<Box<dyn PageHandle + '_>, RenderFault>;
}

/// A single page of an open document
pub trait PageHandle {
    /// Page dimensions when drawn at `scale`
    fn viewport(&self, scale: f32) -> PageViewport;

    /// Rasterize the page at `viewport` dimensions, oversampled by
    /// `device_pixel_ratio` for high-DPI output
    fn render(
        &self,
        viewport: &PageViewport,
        device_pixel_ratio: f32,
    ) -> Result<RasterSurface, RenderFault>;

    /// Positioned text fragments in native (unscaled, bottom-origin) page
    /// coordinates
    fn text_content(&self) -> Result<Vec<TextFragment>, RenderFault>;
}
