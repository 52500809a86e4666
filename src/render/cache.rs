//! LRU cache for rendered pages

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use super::backend::{PageViewport, RasterSurface};
use super::request::{PageRender, RenderParams};

/// Cache key for rendered pages
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Page number
    pub page: usize,
    /// Container width in whole layout pixels
    pub container_width_px: u32,
    /// Zoom level (stored as millionths for stable hashing)
    pub zoom_millionths: u32,
    /// Device pixel ratio (stored as millionths for stable hashing)
    pub dpr_millionths: u32,
}

impl CacheKey {
    /// Create a cache key from render parameters
    #[must_use]
    pub fn from_params(page: usize, params: &RenderParams) -> Self {
        Self {
            page,
            container_width_px: params.container_width as u32,
            zoom_millionths: (params.zoom * 1_000_000.0) as u32,
            dpr_millionths: (params.device_pixel_ratio * 1_000_000.0) as u32,
        }
    }
}

/// LRU cache for rendered page data
pub struct PageCache {
    cache: LruCache<CacheKey, Arc<PageRender>>,
}

impl PageCache {
    /// Create a new cache with the given capacity
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).expect("1 is non-zero")),
            ),
        }
    }

    /// Get a cached page, promoting it in the LRU order
    #[must_use]
    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<PageRender>> {
        self.cache.get(key).cloned()
    }

    /// Insert a page into the cache, returning an Arc to the data
    pub fn insert(&mut self, key: CacheKey, data: PageRender) -> Arc<PageRender> {
        let arc = Arc::new(data);
        self.cache.put(key, arc.clone());
        arc
    }

    /// Number of cached pages
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Cache capacity
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params() -> RenderParams {
        RenderParams {
            container_width: 600.0,
            zoom: 1.0,
            device_pixel_ratio: 1.0,
        }
    }

    fn test_render(page: usize) -> PageRender {
        PageRender {
            page,
            viewport: PageViewport::new(600.0, 800.0, 1.0),
            surface: RasterSurface {
                pixels: vec![0; 300],
                width_px: 10,
                height_px: 10,
            },
            fragments: vec![],
        }
    }

    #[test]
    fn cache_insert_and_get() {
        let mut cache = PageCache::new(10);
        let params = test_params();
        let key = CacheKey::from_params(1, &params);

        cache.insert(key.clone(), test_render(1));

        assert!(cache.get(&key).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_lru_eviction() {
        let mut cache = PageCache::new(2);
        let params = test_params();

        for page in 1..=3 {
            let key = CacheKey::from_params(page, &params);
            cache.insert(key, test_render(page));
        }

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&CacheKey::from_params(1, &params)).is_none());
        assert!(cache.get(&CacheKey::from_params(2, &params)).is_some());
        assert!(cache.get(&CacheKey::from_params(3, &params)).is_some());
    }

    #[test]
    fn zoom_change_produces_distinct_key() {
        let params = test_params();
        let mut zoomed = test_params();
        zoomed.zoom = 1.25;

        assert_ne!(
            CacheKey::from_params(1, &params),
            CacheKey::from_params(1, &zoomed)
        );
    }

    #[test]
    fn capacity_has_floor_of_one() {
        let cache = PageCache::new(0);
        assert_eq!(cache.capacity(), 1);
        assert!(cache.is_empty());
    }
}
