//! Scripted test doubles for the document backend and the key-value store

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::geometry::TextFragment;
use crate::render::{
    DocumentBackend, DocumentHandle, PageHandle, PageViewport, RasterSurface, RenderFault,
};
use crate::store::KeyValueStore;

/// Shorthand for a text fragment whose glyph box is 10 units tall
pub fn fragment(text: &str, x: f32, y: f32, width: f32) -> TextFragment {
    TextFragment {
        text: text.to_string(),
        x,
        y,
        width,
        height: None,
        glyph_scale: [0.0, 10.0],
    }
}

/// One canned page served by a [`ScriptedBackend`]
#[derive(Clone, Debug)]
pub struct ScriptedPage {
    /// Native page width
    pub width: f32,
    /// Native page height
    pub height: f32,
    /// Fragments returned by text extraction
    pub fragments: Vec<TextFragment>,
    /// When set, rasterizing this page fails
    pub fail_render: bool,
}

impl ScriptedPage {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            fragments: Vec::new(),
            fail_render: false,
        }
    }

    #[must_use]
    pub fn with_fragments(mut self, fragments: Vec<TextFragment>) -> Self {
        self.fragments = fragments;
        self
    }
}

/// Document backend serving canned pages, with scriptable failures
#[derive(Clone, Debug)]
pub struct ScriptedBackend {
    pages: Vec<ScriptedPage>,
    fail_open: bool,
}

impl ScriptedBackend {
    #[must_use]
    pub fn new(pages: Vec<ScriptedPage>) -> Self {
        Self {
            pages,
            fail_open: false,
        }
    }

    /// A backend whose `open` always fails
    #[must_use]
    pub fn failing() -> Self {
        Self {
            pages: Vec::new(),
            fail_open: true,
        }
    }
}

impl DocumentBackend for ScriptedBackend {
    fn open(&self, _data: Vec<u8>) -> Result<Box<dyn DocumentHandle>, RenderFault> {
        if self.fail_open {
            return Err(RenderFault::backend("scripted open failure"));
        }
        Ok(Box::new(ScriptedDocument {
            pages: self.pages.clone(),
        }))
    }
}

struct ScriptedDocument {
    pages: Vec<ScriptedPage>,
}

impl DocumentHandle for ScriptedDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, number: usize) -> Result<Box<dyn PageHandle + '_>, RenderFault> {
        match number.checked_sub(1).and_then(|index| self.pages.get(index)) {
            Some(page) => Ok(Box::new(ScriptedPageHandle { page })),
            None => Err(RenderFault::PageOutOfRange {
                page: number,
                page_count: self.pages.len(),
            }),
        }
    }
}

struct ScriptedPageHandle<'a> {
    page: &'a ScriptedPage,
}

impl PageHandle for ScriptedPageHandle<'_> {
    fn viewport(&self, scale: f32) -> PageViewport {
        PageViewport::new(self.page.width * scale, self.page.height * scale, scale)
    }

    fn render(
        &self,
        viewport: &PageViewport,
        device_pixel_ratio: f32,
    ) -> Result<RasterSurface, RenderFault> {
        if self.page.fail_render {
            return Err(RenderFault::backend("scripted render failure"));
        }
        let width_px = (viewport.width * device_pixel_ratio).floor().max(1.0) as u32;
        let height_px = (viewport.height * device_pixel_ratio).floor().max(1.0) as u32;
        Ok(RasterSurface {
            pixels: vec![0xFF; width_px as usize * height_px as usize * 3],
            width_px,
            height_px,
        })
    }

    fn text_content(&self) -> Result<Vec<TextFragment>, RenderFault> {
        Ok(self.page.fragments.clone())
    }
}

/// Clonable in-memory store whose clones share one map, so a test can watch
/// what a session persists
#[derive(Clone, Debug, Default)]
pub struct SharedStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl SharedStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
