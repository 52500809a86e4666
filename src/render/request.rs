//! Render request and response types

use std::sync::Arc;

use crate::geometry::TextFragment;

use super::backend::{PageViewport, RasterSurface};

/// Unique identifier for render requests
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

impl RequestId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Parameters for rendering a page
#[derive(Clone, Debug)]
pub struct RenderParams {
    /// Container width the page is fit to, in layout pixels
    pub container_width: f32,
    /// Discrete zoom applied on top of the fit-to-width scale
    pub zoom: f32,
    /// Raster oversampling factor for high-DPI displays
    pub device_pixel_ratio: f32,
}

/// Request sent to the render worker
#[derive(Debug)]
pub enum RenderRequest {
    /// Render a page and extract its text
    Page {
        id: RequestId,
        page: usize,
        params: RenderParams,
    },

    /// Shutdown the worker
    Shutdown,
}

/// Errors from the render worker
#[derive(Debug, thiserror::Error)]
pub enum RenderFault {
    #[error("document engine: {0}")]
    Backend(String),

    #[error("page {page} out of range 1..={page_count}")]
    PageOutOfRange { page: usize, page_count: usize },
}

impl RenderFault {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Finished product for one page: the raster plus its positioned text
#[derive(Clone)]
pub struct PageRender {
    /// Page number (1-indexed)
    pub page: usize,
    /// Scaled page dimensions the raster was drawn at
    pub viewport: PageViewport,
    /// RGB raster of the full page
    pub surface: RasterSurface,
    /// Text fragments in native page coordinates
    pub fragments: Vec<TextFragment>,
}

impl std::fmt::Debug for PageRender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRender")
            .field("page", &self.page)
            .field("viewport", &self.viewport)
            .field("surface", &self.surface)
            .field("fragment_count", &self.fragments.len())
            .finish()
    }
}

/// Response from the render worker
#[derive(Debug)]
pub enum RenderResponse {
    /// Rendered page data
    Page {
        id: RequestId,
        page: usize,
        data: Arc<PageRender>,
    },

    /// Error during rendering
    Error {
        id: RequestId,
        page: usize,
        error: RenderFault,
    },
}
