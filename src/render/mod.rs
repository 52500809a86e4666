//! Page rendering infrastructure

mod backend;
mod cache;
mod request;
mod service;
mod worker;

pub use backend::{DocumentBackend, DocumentHandle, PageHandle, PageViewport, RasterSurface};
pub use cache::{CacheKey, PageCache};
pub use request::{
    PageRender, RenderFault, RenderParams, RenderRequest, RenderResponse, RequestId,
};
pub use service::{DEFAULT_CACHE_CAPACITY, RenderService};
