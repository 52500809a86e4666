//! Render service - manages the worker thread and cache

use std::sync::{Arc, Mutex};

use flume::{Receiver, Sender};

use super::backend::DocumentHandle;
use super::cache::PageCache;
use super::request::{RenderParams, RenderRequest, RenderResponse, RequestId};
use super::worker::render_worker;

/// Default number of rendered pages kept in the cache
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

/// Manages page rendering on a background thread
///
/// One worker thread owns the document handle for the lifetime of the
/// service. Requests are tagged with monotonically increasing ids so callers
/// can match responses to requests and discard the ones that went stale.
pub struct RenderService {
    request_tx: Sender<RenderRequest>,
    response_rx: Receiver<RenderResponse>,
    next_request_id: u64,
}

impl RenderService {
    /// Spawn the render worker for an open document
    #[must_use]
    pub fn new(doc: Box<dyn DocumentHandle>) -> Self {
        Self::with_capacity(doc, DEFAULT_CACHE_CAPACITY)
    }

    /// Spawn the render worker with a custom cache capacity
    #[must_use]
    pub fn with_capacity(doc: Box<dyn DocumentHandle>, cache_capacity: usize) -> Self {
        let cache = Arc::new(Mutex::new(PageCache::new(cache_capacity)));
        let (request_tx, request_rx) = flume::unbounded();
        let (response_tx, response_rx) = flume::unbounded();

        std::thread::spawn(move || {
            render_worker(doc, request_rx, response_tx, cache);
        });

        Self {
            request_tx,
            response_rx,
            next_request_id: 1,
        }
    }

    /// Queue a page render, returning the id the matching response will carry
    pub fn request_page(&mut self, page: usize, params: RenderParams) -> RequestId {
        let id = self.next_id();
        let _ = self
            .request_tx
            .send(RenderRequest::Page { id, page, params });
        id
    }

    /// Drain all responses that have arrived since the last poll
    pub fn poll_responses(&mut self) -> Vec<RenderResponse> {
        let mut responses = vec![];

        while let Ok(response) = self.response_rx.try_recv() {
            responses.push(response);
        }

        responses
    }

    /// Ask the worker to exit once queued work is done
    pub fn shutdown(&self) {
        let _ = self.request_tx.send(RenderRequest::Shutdown);
    }

    fn next_id(&mut self) -> RequestId {
        let id = RequestId::new(self.next_request_id);
        self.next_request_id += 1;
        id
    }
}

impl Drop for RenderService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::render::backend::DocumentBackend;
    use crate::test_utils::{ScriptedBackend, ScriptedPage, fragment};

    fn test_params() -> RenderParams {
        RenderParams {
            container_width: 612.0,
            zoom: 1.0,
            device_pixel_ratio: 1.0,
        }
    }

    fn wait_for_responses(service: &mut RenderService) -> Vec<RenderResponse> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            let responses = service.poll_responses();
            if !responses.is_empty() {
                return responses;
            }
            assert!(Instant::now() < deadline, "no response from render worker");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn renders_requested_page() {
        let backend = ScriptedBackend::new(vec![
            ScriptedPage::new(612.0, 792.0)
                .with_fragments(vec![fragment("Hello", 50.0, 700.0, 40.0)]),
        ]);
        let doc = backend.open(vec![]).unwrap();
        let mut service = RenderService::new(doc);

        let id = service.request_page(1, test_params());
        let responses = wait_for_responses(&mut service);

        match &responses[0] {
            RenderResponse::Page { id: got, page, data } => {
                assert_eq!(*got, id);
                assert_eq!(*page, 1);
                assert_eq!(data.fragments.len(), 1);
                assert!((data.viewport.width - 612.0).abs() < 1e-3);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn reports_render_failure() {
        let mut page = ScriptedPage::new(612.0, 792.0);
        page.fail_render = true;
        let backend = ScriptedBackend::new(vec![page]);
        let doc = backend.open(vec![]).unwrap();
        let mut service = RenderService::new(doc);

        let id = service.request_page(1, test_params());
        let responses = wait_for_responses(&mut service);

        match &responses[0] {
            RenderResponse::Error { id: got, page, .. } => {
                assert_eq!(*got, id);
                assert_eq!(*page, 1);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_page_is_an_error() {
        let backend = ScriptedBackend::new(vec![ScriptedPage::new(612.0, 792.0)]);
        let doc = backend.open(vec![]).unwrap();
        let mut service = RenderService::new(doc);

        service.request_page(5, test_params());
        let responses = wait_for_responses(&mut service);

        assert!(matches!(&responses[0], RenderResponse::Error { page: 5, .. }));
    }
}
