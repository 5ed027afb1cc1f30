//! Glyph rasterization glue. The core never parses font
//! files or shapes text; it consumes an object-safe [`ScaledFont`] and
//! caches whatever it hands back.

use raster2d_path::{Path, Rect};
use std::cell::RefCell;
use std::collections::HashMap;

/// Advance/bearing/bounds for one glyph, already scaled by the font
/// matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphMetrics {
    pub advance: (f64, f64),
    pub bearing: (f64, f64),
    pub bounds: Rect,
}

/// A rasterized glyph a font produced directly (hinted/bitmap fonts),
/// consumed by the compositor as a mask without tessellation.
#[derive(Clone, Debug)]
pub struct AlphaBitmap {
    pub width: i32,
    pub height: i32,
    pub stride: i32,
    pub data: Vec<u8>,
}

/// One positioned glyph in a `Context::glyphs` call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub id: u32,
    pub x: f64,
    pub y: f64,
}

/// Object-safe font contract. A font gives either a vector
/// outline (routed through `fill`'s pipeline) or a bitmap (routed
/// through `mask`'s), never both for the same glyph.
pub trait ScaledFont {
    /// Opaque identity distinguishing this scaled font instance for
    /// cache keying; distinct (font, size, CTM) combinations must return
    /// distinct ids.
    fn font_id(&self) -> u64;
    fn glyph_extents(&self, glyph_id: u32) -> GlyphMetrics;
    fn glyph_outline(&self, glyph_id: u32) -> Option<Path>;
    fn glyph_bitmap(&self, glyph_id: u32) -> Option<AlphaBitmap>;
}

#[derive(Clone, Debug)]
enum CachedGlyph {
    Outline(Path),
    Bitmap(AlphaBitmap),
}

/// What a cache lookup hands back to `Context::glyphs` for rendering.
#[derive(Clone, Debug)]
pub enum RenderedGlyph {
    Outline(Path),
    Bitmap(AlphaBitmap),
}

type CacheKey = (u64, u32, u8);

/// A small LRU keyed by `(font_id, glyph_id, subpixel_phase)`, grounded
/// in cairo's `cairo-scaled-font.c` glyph cache but not a literal
/// translation of it. Evicted wholesale on a CTM-scale change, since
/// changing the CTM invalidates the cached scaled font.
pub struct GlyphCache {
    capacity: usize,
    entries: RefCell<HashMap<CacheKey, CachedGlyph>>,
    // Most-recently-used at the back; linear scan on touch is fine at
    // this cache's intended size (low hundreds of entries).
    order: RefCell<Vec<CacheKey>>,
}

impl GlyphCache {
    pub fn new(capacity: usize) -> Self {
        GlyphCache {
            capacity: capacity.max(1),
            entries: RefCell::new(HashMap::new()),
            order: RefCell::new(Vec::new()),
        }
    }

    fn touch(&self, key: CacheKey) {
        let mut order = self.order.borrow_mut();
        if let Some(pos) = order.iter().position(|k| *k == key) {
            order.remove(pos);
        }
        order.push(key);
    }

    fn evict_if_over_capacity(&self) {
        let mut order = self.order.borrow_mut();
        while order.len() > self.capacity {
            let evicted = order.remove(0);
            self.entries.borrow_mut().remove(&evicted);
            log::trace!("glyph cache evicted {:?}", evicted);
        }
    }

    /// Resolves `glyph_id` through `font`, caching whichever of
    /// outline/bitmap the font produces. Returns `None` if the font has
    /// neither (an empty glyph, e.g. a space).
    pub fn get_or_insert(&self, font: &dyn ScaledFont, glyph_id: u32, subpixel_phase: u8) -> Option<RenderedGlyph> {
        let key = (font.font_id(), glyph_id, subpixel_phase);
        if let Some(cached) = self.entries.borrow().get(&key) {
            log::trace!("glyph cache hit {:?}", key);
            self.touch(key);
            return Some(match cached {
                CachedGlyph::Outline(p) => RenderedGlyph::Outline(p.clone()),
                CachedGlyph::Bitmap(b) => RenderedGlyph::Bitmap(b.clone()),
            });
        }
        log::trace!("glyph cache miss {:?}", key);
        let resolved = if let Some(outline) = font.glyph_outline(glyph_id) {
            CachedGlyph::Outline(outline)
        } else if let Some(bitmap) = font.glyph_bitmap(glyph_id) {
            CachedGlyph::Bitmap(bitmap)
        } else {
            return None;
        };
        self.entries.borrow_mut().insert(key, resolved.clone());
        self.touch(key);
        self.evict_if_over_capacity();
        Some(match resolved {
            CachedGlyph::Outline(p) => RenderedGlyph::Outline(p),
            CachedGlyph::Bitmap(b) => RenderedGlyph::Bitmap(b),
        })
    }

    /// Drops every cached glyph: called when the gstate's CTM changes
    /// enough to invalidate the effective scale.
    pub fn invalidate_all(&self) {
        self.entries.borrow_mut().clear();
        self.order.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster2d_fixed::Point;

    struct StubFont {
        id: u64,
    }

    impl ScaledFont for StubFont {
        fn font_id(&self) -> u64 {
            self.id
        }
        fn glyph_extents(&self, _glyph_id: u32) -> GlyphMetrics {
            GlyphMetrics {
                advance: (1.0, 0.0),
                bearing: (0.0, 0.0),
                bounds: Rect { x0: 0.0, y0: 0.0, x1: 1.0, y1: 1.0 },
            }
        }
        fn glyph_outline(&self, glyph_id: u32) -> Option<Path> {
            if glyph_id == 0 {
                return None;
            }
            let mut p = Path::new();
            p.move_to(Point::from_f64(0.0, 0.0));
            p.line_to(Point::from_f64(1.0, 0.0));
            p.line_to(Point::from_f64(1.0, 1.0));
            p.close();
            Some(p)
        }
        fn glyph_bitmap(&self, _glyph_id: u32) -> Option<AlphaBitmap> {
            None
        }
    }

    #[test]
    fn repeated_lookup_is_a_cache_hit() {
        let cache = GlyphCache::new(4);
        let font = StubFont { id: 1 };
        assert!(cache.get_or_insert(&font, 5, 0).is_some());
        assert_eq!(cache.len(), 1);
        assert!(cache.get_or_insert(&font, 5, 0).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn empty_glyph_is_not_cached() {
        let cache = GlyphCache::new(4);
        let font = StubFont { id: 1 };
        assert!(cache.get_or_insert(&font, 0, 0).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn over_capacity_evicts_least_recently_used() {
        let cache = GlyphCache::new(2);
        let font = StubFont { id: 1 };
        cache.get_or_insert(&font, 1, 0);
        cache.get_or_insert(&font, 2, 0);
        cache.get_or_insert(&font, 3, 0);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn invalidate_all_clears_the_cache() {
        let cache = GlyphCache::new(4);
        let font = StubFont { id: 1 };
        cache.get_or_insert(&font, 1, 0);
        cache.invalidate_all();
        assert!(cache.is_empty());
    }
}
