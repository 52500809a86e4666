//! Render worker - runs in a separate thread
//!
//! The worker owns the open document handle. It fits each requested page to
//! the container width, rasterizes it, extracts its text fragments, and
//! answers through the response channel. Finished pages land in the shared
//! LRU cache so repeat requests (zoom toggles, thickness changes) skip the
//! engine entirely.

use std::sync::{Arc, Mutex};

use flume::{Receiver, Sender};

use super::backend::DocumentHandle;
use super::cache::{CacheKey, PageCache};
use super::request::{
    PageRender, RenderFault, RenderParams, RenderRequest, RenderResponse, RequestId,
};

pub fn render_worker(
    doc: Box<dyn DocumentHandle>,
    requests: Receiver<RenderRequest>,
    responses: Sender<RenderResponse>,
    cache: Arc<Mutex<PageCache>>,
) {
    for request in requests {
        match request {
            RenderRequest::Page { id, page, params } => {
                handle_page_request(doc.as_ref(), id, page, &params, &cache, &responses);
            }

            RenderRequest::Shutdown => break,
        }
    }
}

fn handle_page_request(
    doc: &dyn DocumentHandle,
    id: RequestId,
    page_num: usize,
    params: &RenderParams,
    cache: &Arc<Mutex<PageCache>>,
    responses: &Sender<RenderResponse>,
) {
    let key = CacheKey::from_params(page_num, params);

    let cached = cache
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .get(&key);
    if let Some(cached) = cached {
        log::debug!("render request {id:?}: page {page_num} served from cache");
        let _ = responses.send(RenderResponse::Page {
            id,
            page: page_num,
            data: Arc::clone(&cached),
        });
        return;
    }

    match render_page(doc, page_num, params) {
        Ok(data) => {
            let cached = cache
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .insert(key, data);
            let _ = responses.send(RenderResponse::Page {
                id,
                page: page_num,
                data: Arc::clone(&cached),
            });
        }
        Err(e) => {
            let _ = responses.send(RenderResponse::Error {
                id,
                page: page_num,
                error: e,
            });
        }
    }
}

/// Render a single page and extract its text content
fn render_page(
    doc: &dyn DocumentHandle,
    page_num: usize,
    params: &RenderParams,
) -> Result<PageRender, RenderFault> {
    let page = doc.page(page_num)?;

    let base = page.viewport(1.0);
    let scale = fit_scale(base.width, params.container_width) * params.zoom;
    let viewport = page.viewport(scale);

    let surface = page.render(&viewport, params.device_pixel_ratio)?;
    let fragments = page.text_content()?;

    Ok(PageRender {
        page: page_num,
        viewport,
        surface,
        fragments,
    })
}

/// Magnification that fits the page width to the container width
fn fit_scale(page_width: f32, container_width: f32) -> f32 {
    if page_width > 0.0 && container_width.is_finite() && container_width > 0.0 {
        container_width / page_width
    } else {
        1.0
    }
}
