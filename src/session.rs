//! Reader session: one open document and every piece of its reading state
//!
//! The session is the single owner of navigation, zoom, gesture, cursor, and
//! settings state. Hosts feed it [`Command`]s from their event sources and
//! drive [`ReaderSession::poll`] from their tick loop; it answers with
//! [`Effect`]s describing what the presentation layer should repaint. The
//! session never touches a UI handle, and nothing in here is global: two
//! sessions over two documents coexist without sharing anything.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cursor::{AdvanceOutcome, ReadingCursor};
use crate::debounce::Debounce;
use crate::gesture::{GestureOutcome, GestureReconciler, TouchPoint, VisualTransform};
use crate::geometry::{ViewportTransform, project_fragments};
use crate::hitbox::{LineHitbox, build_hitboxes};
use crate::lines::{GroupingParams, LogicalLine, group_lines};
use crate::progress::{ReadingProgress, load_progress, save_progress};
use crate::render::{
    DocumentBackend, PageRender, RenderFault, RenderParams, RenderResponse, RenderService,
    RequestId,
};
use crate::settings::HighlightSettings;
use crate::store::KeyValueStore;
use crate::zoom::Zoom;

/// Commands the host feeds into the session
#[derive(Clone, Debug)]
pub enum Command {
    /// Open a document from raw bytes, replacing any open one
    OpenDocument(Vec<u8>),
    /// Navigate to the next page
    NextPage,
    /// Navigate to the previous page
    PrevPage,
    /// Zoom in by one button step
    ZoomIn,
    /// Zoom out by one button step
    ZoomOut,
    /// The container was resized (coalesced before re-rendering)
    Resize { width: f32, device_pixel_ratio: f32 },
    /// Tap on a line's hitbox
    SelectLine(usize),
    /// Tap the advance control: move one line forward
    Advance,
    /// Change the highlight color
    SetColor(String),
    /// Change the highlight thickness (restyles now, re-renders after a
    /// quiet period)
    SetThickness(u16),
    /// Change the highlight opacity
    SetOpacity(u8),
    /// Contacts active after a touch-start event
    TouchStart(Vec<TouchPoint>),
    /// Contacts active after a touch-move event
    TouchMove(Vec<TouchPoint>),
    /// Contacts still active after a touch-end event
    TouchEnd(Vec<TouchPoint>),
}

/// What the presentation layer should do after a command or poll
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Navigation happened; update the page indicator and button states
    PageChanged { page: usize, page_count: usize },
    /// The page surface changed: a new raster is ready, or the surface was
    /// cleared after a render failure
    SurfaceChanged,
    /// The line overlay (hitboxes and their read states) must be redrawn
    OverlayChanged,
    /// Highlight styling changed without new geometry
    HighlightStyleChanged,
    /// Scroll the given line into the viewport center
    ScrollToLine(usize),
    /// Repaint the page element with a transient gesture transform
    VisualTransformChanged(VisualTransform),
    /// Advance was a no-op at the last line of the last page
    EndOfDocument,
    /// Surface a user-visible message
    Notify(String),
}

/// The reading session for one document.
pub struct ReaderSession {
    backend: Arc<dyn DocumentBackend>,
    store: Box<dyn KeyValueStore>,
    service: Option<RenderService>,

    /// Current page (1-indexed)
    page: usize,
    page_count: usize,

    zoom: Zoom,
    gesture: GestureReconciler,
    cursor: ReadingCursor,
    highlight: HighlightSettings,

    container_width: f32,
    device_pixel_ratio: f32,

    current_render: Option<Arc<PageRender>>,
    lines: Vec<LogicalLine>,
    hitboxes: Vec<LineHitbox>,

    /// Id of the newest render request; older responses are stale
    inflight: Option<RequestId>,

    resize_debounce: Debounce,
    restyle_debounce: Debounce,
}

impl ReaderSession {
    /// Quiet period for coalescing resize events
    pub const RESIZE_QUIET: Duration = Duration::from_millis(200);
    /// Quiet period for coalescing thickness-slider drags
    pub const RESTYLE_QUIET: Duration = Duration::from_millis(150);

    #[must_use]
    pub fn new(
        backend: Arc<dyn DocumentBackend>,
        store: Box<dyn KeyValueStore>,
        container_width: f32,
        device_pixel_ratio: f32,
    ) -> Self {
        let highlight = HighlightSettings::load(store.as_ref());
        Self {
            backend,
            store,
            service: None,
            page: 1,
            page_count: 0,
            zoom: Zoom::default(),
            gesture: GestureReconciler::new(),
            cursor: ReadingCursor::default(),
            highlight,
            container_width,
            device_pixel_ratio,
            current_render: None,
            lines: Vec::new(),
            hitboxes: Vec::new(),
            inflight: None,
            resize_debounce: Debounce::new(Self::RESIZE_QUIET),
            restyle_debounce: Debounce::new(Self::RESTYLE_QUIET),
        }
    }

    /// Apply a command and return the resulting effects
    #[must_use]
    pub fn apply(&mut self, cmd: Command, now: Instant) -> Vec<Effect> {
        match cmd {
            Command::OpenDocument(data) => self.open_document(data),

            Command::NextPage => self.go_to_page(self.page + 1),

            Command::PrevPage => self.go_to_page(self.page.saturating_sub(1)),

            Command::ZoomIn => {
                if self.service.is_none() {
                    return vec![];
                }
                let before = self.zoom.level();
                self.zoom.step_in();
                self.rerender_if_zoom_moved(before)
            }

            Command::ZoomOut => {
                if self.service.is_none() {
                    return vec![];
                }
                let before = self.zoom.level();
                self.zoom.step_out();
                self.rerender_if_zoom_moved(before)
            }

            Command::Resize {
                width,
                device_pixel_ratio,
            } => {
                self.container_width = width;
                self.device_pixel_ratio = device_pixel_ratio;
                if self.service.is_some() {
                    self.resize_debounce.schedule(now);
                }
                vec![]
            }

            Command::SelectLine(index) => {
                if self.service.is_none() {
                    return vec![];
                }
                match self.cursor.set_current(&mut self.hitboxes, index) {
                    Some(applied) => self.after_cursor_set(applied),
                    None => vec![],
                }
            }

            Command::Advance => {
                if self.service.is_none() {
                    return vec![];
                }
                let has_next = self.page < self.page_count;
                match self.cursor.advance(&mut self.hitboxes, has_next) {
                    AdvanceOutcome::Moved(next) => self.after_cursor_set(next),
                    AdvanceOutcome::NextPage => self.go_to_page(self.page + 1),
                    AdvanceOutcome::EndOfDocument => vec![Effect::EndOfDocument],
                }
            }

            Command::SetColor(color) => {
                self.highlight.set_color(self.store.as_mut(), color);
                vec![Effect::HighlightStyleChanged]
            }

            Command::SetThickness(value) => {
                self.highlight.set_thickness(self.store.as_mut(), value);
                if self.service.is_some() {
                    self.restyle_debounce.schedule(now);
                }
                vec![Effect::HighlightStyleChanged]
            }

            Command::SetOpacity(value) => {
                self.highlight.set_opacity(self.store.as_mut(), value);
                vec![Effect::HighlightStyleChanged]
            }

            Command::TouchStart(points) => {
                if self.service.is_none() {
                    return vec![];
                }
                let zoom_level = self.zoom.level();
                let outcome = self.gesture.touch_start(&points, zoom_level);
                self.gesture_effects(outcome)
            }

            Command::TouchMove(points) => {
                if self.service.is_none() {
                    return vec![];
                }
                let outcome = self.gesture.touch_move(&points);
                self.gesture_effects(outcome)
            }

            Command::TouchEnd(remaining) => {
                if self.service.is_none() {
                    return vec![];
                }
                let outcome = self.gesture.touch_end(&remaining);
                self.gesture_effects(outcome)
            }
        }
    }

    /// Fire due debounced work and apply arrived render responses. Hosts
    /// call this from their tick loop; `now` drives the debounce clock.
    #[must_use]
    pub fn poll(&mut self, now: Instant) -> Vec<Effect> {
        let resize_due = self.resize_debounce.fire(now);
        let restyle_due = self.restyle_debounce.fire(now);
        if resize_due || restyle_due {
            self.request_current_page();
        }

        let responses = match &mut self.service {
            Some(service) => service.poll_responses(),
            None => Vec::new(),
        };

        let mut effects = Vec::new();
        for response in responses {
            match response {
                RenderResponse::Page { id, data, .. } => {
                    if self.inflight == Some(id) {
                        self.inflight = None;
                        effects.extend(self.apply_render(data));
                    } else {
                        log::debug!("Dropping stale render response {id:?}");
                    }
                }
                RenderResponse::Error { id, page, error } => {
                    if self.inflight == Some(id) {
                        self.inflight = None;
                        effects.extend(self.apply_render_failure(page, &error));
                    } else {
                        log::debug!("Dropping stale render error for page {page}: {error}");
                    }
                }
            }
        }

        effects
    }

    /// Current page (1-indexed)
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Total page count, 0 before a document is open
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Durable zoom level
    #[must_use]
    pub fn zoom_level(&self) -> f32 {
        self.zoom.level()
    }

    /// Logical lines of the displayed page, topmost first
    #[must_use]
    pub fn lines(&self) -> &[LogicalLine] {
        &self.lines
    }

    /// Hitboxes of the displayed page, with their read states
    #[must_use]
    pub fn hitboxes(&self) -> &[LineHitbox] {
        &self.hitboxes
    }

    /// Index of the current line
    #[must_use]
    pub fn current_line(&self) -> usize {
        self.cursor.current()
    }

    /// The displayed page's render product, absent before the first render
    /// completes or after a render failure
    #[must_use]
    pub fn current_render(&self) -> Option<&Arc<PageRender>> {
        self.current_render.as_ref()
    }

    /// Highlight appearance settings
    #[must_use]
    pub fn highlight(&self) -> &HighlightSettings {
        &self.highlight
    }

    /// Transient visual transform of the page element
    #[must_use]
    pub fn visual_transform(&self) -> VisualTransform {
        self.gesture.visual()
    }

    fn open_document(&mut self, data: Vec<u8>) -> Vec<Effect> {
        let doc = match self.backend.open(data) {
            Ok(doc) => doc,
            Err(e) => {
                log::error!("Failed to open document: {e}");
                return vec![Effect::Notify("Failed to load PDF".to_string())];
            }
        };

        let page_count = doc.page_count();
        if page_count == 0 {
            log::error!("Document has no pages");
            return vec![Effect::Notify("Failed to load PDF".to_string())];
        }

        // Replacing the service shuts the previous worker down on drop.
        self.service = Some(RenderService::new(doc));
        self.page_count = page_count;
        self.zoom = Zoom::default();
        self.gesture.reset();
        self.cursor.reset();
        self.current_render = None;
        self.lines.clear();
        self.hitboxes.clear();
        self.inflight = None;
        self.resize_debounce.cancel();
        self.restyle_debounce.cancel();

        self.page = match load_progress(self.store.as_ref()) {
            Some(saved) => saved.page.clamp(1, page_count),
            None => 1,
        };
        self.request_current_page();

        vec![
            Effect::PageChanged {
                page: self.page,
                page_count,
            },
            Effect::SurfaceChanged,
            Effect::OverlayChanged,
        ]
    }

    fn go_to_page(&mut self, page: usize) -> Vec<Effect> {
        if self.service.is_none() {
            return vec![];
        }
        let clamped = page.clamp(1, self.page_count);
        if clamped == self.page {
            return vec![];
        }

        self.page = clamped;
        self.request_current_page();
        vec![Effect::PageChanged {
            page: self.page,
            page_count: self.page_count,
        }]
    }

    fn rerender_if_zoom_moved(&mut self, before: f32) -> Vec<Effect> {
        if (self.zoom.level() - before).abs() > f32::EPSILON {
            self.request_current_page();
        }
        vec![]
    }

    fn gesture_effects(&mut self, outcome: GestureOutcome) -> Vec<Effect> {
        match outcome {
            GestureOutcome::None => vec![],
            GestureOutcome::VisualChanged(visual) => {
                vec![Effect::VisualTransformChanged(visual)]
            }
            GestureOutcome::Reconcile { scale } => {
                self.zoom.apply_gesture(scale);
                self.request_current_page();
                vec![]
            }
        }
    }

    /// Persist and report a cursor move that `set_current` already applied
    fn after_cursor_set(&mut self, applied: usize) -> Vec<Effect> {
        save_progress(
            self.store.as_mut(),
            ReadingProgress::new(self.page, applied),
        );
        vec![Effect::OverlayChanged, Effect::ScrollToLine(applied)]
    }

    fn request_current_page(&mut self) {
        if let Some(service) = &mut self.service {
            let params = RenderParams {
                container_width: self.container_width,
                zoom: self.zoom.level(),
                device_pixel_ratio: self.device_pixel_ratio,
            };
            self.inflight = Some(service.request_page(self.page, params));
        }
    }

    /// Rebuild lines, hitboxes, and the cursor from a completed render
    fn apply_render(&mut self, data: Arc<PageRender>) -> Vec<Effect> {
        let viewport = ViewportTransform::new(
            data.viewport.scale,
            data.viewport.width,
            data.viewport.height,
        );
        let items = project_fragments(&data.fragments, &viewport);
        self.lines = group_lines(items, &GroupingParams::for_scale(viewport.scale));
        self.hitboxes = build_hitboxes(&self.lines, self.highlight.thickness);
        self.current_render = Some(data);

        let had_transform = !self.gesture.visual().is_identity();
        self.gesture.reset();

        let mut effects = vec![Effect::SurfaceChanged, Effect::OverlayChanged];

        // Saved progress only restores onto its own page; any other page
        // starts at its first line.
        let target = match load_progress(self.store.as_ref()) {
            Some(saved) if saved.page == self.page => saved.line,
            _ => 0,
        };
        match self.cursor.set_current(&mut self.hitboxes, target) {
            Some(applied) => {
                save_progress(
                    self.store.as_mut(),
                    ReadingProgress::new(self.page, applied),
                );
                effects.push(Effect::ScrollToLine(applied));
            }
            None => self.cursor.reset(),
        }

        if had_transform {
            effects.push(Effect::VisualTransformChanged(VisualTransform::IDENTITY));
        }

        effects
    }

    /// Clear the page content after a failed render, keeping navigation
    /// usable
    fn apply_render_failure(&mut self, page: usize, error: &RenderFault) -> Vec<Effect> {
        log::error!("Failed to render page {page}: {error}");

        self.current_render = None;
        self.lines.clear();
        self.hitboxes.clear();
        self.cursor.reset();

        let had_transform = !self.gesture.visual().is_identity();
        self.gesture.reset();

        let mut effects = vec![Effect::SurfaceChanged, Effect::OverlayChanged];
        if had_transform {
            effects.push(Effect::VisualTransformChanged(VisualTransform::IDENTITY));
        }
        effects
    }
}
