//! Headless canvas.
//!
//! Paints every frame into a counting painter and reports population and
//! primitive counts through `tracing`, so a show can run without a window.

use ahash::AHashMap;
use pipedream_common::{AssetId, ItemId, Rect, Rgba, Vec2};
use pipedream_kernel::animation::Pose;
use pipedream_kernel::canvas::{Canvas, Drawable, Painter};
use tracing::{debug, trace};

/// Frames between two population reports.
const DEFAULT_REPORT_EVERY: u64 = 50;

/// Primitive counts of one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Items handed to the canvas
    pub items: usize,
    /// Filled ellipses
    pub ellipses: usize,
    /// Stroked segments
    pub lines: usize,
    /// Images
    pub images: usize,
}

#[derive(Default)]
struct CountingPainter {
    stats: FrameStats,
}

impl Painter for CountingPainter {
    fn fill_ellipse(&mut self, _rect: Rect, _color: Rgba) {
        self.stats.ellipses += 1;
    }

    fn stroke_line(&mut self, _from: Vec2, _to: Vec2, _color: Rgba, _width: f32) {
        self.stats.lines += 1;
    }

    fn draw_image(&mut self, _asset: &AssetId, _rect: Rect, _pose: &Pose) {
        self.stats.images += 1;
    }
}

/// Canvas that logs instead of drawing.
#[derive(Debug)]
pub struct TraceCanvas {
    items: AHashMap<ItemId, i32>,
    background: Rgba,
    frames: u64,
    report_every: u64,
    last: FrameStats,
}

impl Default for TraceCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceCanvas {
    /// Creates a canvas reporting every 50 frames.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: AHashMap::new(),
            background: Rgba::WHITE,
            frames: 0,
            report_every: DEFAULT_REPORT_EVERY,
            last: FrameStats::default(),
        }
    }

    /// Changes the report cadence (at least every frame).
    #[must_use]
    pub fn with_report_every(mut self, frames: u64) -> Self {
        self.report_every = frames.max(1);
        self
    }

    /// Registered items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Current background.
    #[must_use]
    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Frames presented.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Counts of the last frame.
    #[must_use]
    pub fn last_frame(&self) -> FrameStats {
        self.last
    }
}

impl Canvas for TraceCanvas {
    fn add_item(&mut self, id: ItemId, layer: i32) {
        self.items.insert(id, layer);
    }

    fn remove_item(&mut self, id: ItemId) {
        self.items.remove(&id);
    }

    fn set_background(&mut self, color: Rgba) {
        if color != self.background {
            trace!(gray = color.to_rgba8()[0], "Background changed");
        }
        self.background = color;
    }

    fn present(&mut self, items: &[&dyn Drawable]) {
        let mut painter = CountingPainter::default();
        for item in items {
            item.paint(&mut painter);
        }
        self.last = FrameStats {
            items: items.len(),
            ..painter.stats
        };
        self.frames += 1;

        if self.frames % self.report_every == 0 {
            debug!(
                frame = self.frames,
                registered = self.items.len(),
                items = self.last.items,
                ellipses = self.last.ellipses,
                lines = self.last.lines,
                images = self.last.images,
                "Frame"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipedream_kernel::canvas::{layer, PixmapItem};
    use pipedream_kernel::particle::{Particle, ParticleState};

    #[test]
    fn test_counts_primitives() {
        let mut canvas = TraceCanvas::new().with_report_every(1);
        let particle = Particle::new(
            ParticleState::moving(Vec2::new(10.0, 10.0), Vec2::ZERO, 0.0).with_lifetime(5),
        );
        let pixmap = PixmapItem::new(AssetId::new("bg"), Vec2::splat(4.0), Vec2::ZERO, layer::BACKGROUND);

        canvas.present(&[&particle, &pixmap]);
        assert_eq!(
            canvas.last_frame(),
            FrameStats {
                items: 2,
                ellipses: 1,
                lines: 0,
                images: 1,
            }
        );
        assert_eq!(canvas.frames(), 1);
    }

    #[test]
    fn test_registry() {
        let mut canvas = TraceCanvas::new();
        let id = ItemId::new();
        canvas.add_item(id, 0);
        assert_eq!(canvas.item_count(), 1);
        canvas.remove_item(id);
        assert_eq!(canvas.item_count(), 0);

        canvas.set_background(Rgba::BLACK);
        assert_eq!(canvas.background(), Rgba::BLACK);
    }
}
