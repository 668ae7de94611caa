//! Rendering collaborator interface.
//!
//! The kernel never rasterizes anything. Every live item implements
//! [`Drawable`]; once per tick the owner of the scene hands the full live
//! set to a [`Canvas`], which paints each item through a [`Painter`].
//! Acts also announce item creation and removal directly on the canvas.

use std::collections::BTreeMap;

use pipedream_common::{AssetId, ItemId, Rect, Rgba, Vec2};

use crate::animation::Pose;

/// Stacking layers (lower is drawn first).
pub mod layer {
    /// Scene background image.
    pub const BACKGROUND: i32 = -2;
    /// Items drawn behind the main population (bubbles).
    pub const BEHIND: i32 = -1;
    /// Default layer.
    pub const DEFAULT: i32 = 0;
    /// Controls drawn above everything.
    pub const OVERLAY: i32 = 10;
}

/// Drawing surface handed to [`Drawable::paint`].
pub trait Painter {
    /// Fills an ellipse inscribed in `rect`.
    fn fill_ellipse(&mut self, rect: Rect, color: Rgba);

    /// Strokes a round-capped line segment.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32);

    /// Draws an image asset into `rect`, transformed by `pose`.
    fn draw_image(&mut self, asset: &AssetId, rect: Rect, pose: &Pose);
}

/// Something that can be put on the canvas.
pub trait Drawable {
    /// Canvas item id.
    fn id(&self) -> ItemId;

    /// Stacking layer.
    fn layer(&self) -> i32 {
        layer::DEFAULT
    }

    /// Scene-space bounding box.
    fn bounding_rect(&self) -> Rect;

    /// Paints the item in scene coordinates.
    fn paint(&self, painter: &mut dyn Painter);
}

/// The rendering backend.
pub trait Canvas: Send {
    /// A new item joined the scene.
    fn add_item(&mut self, id: ItemId, layer: i32);

    /// An item left the scene.
    fn remove_item(&mut self, id: ItemId);

    /// Sets the background fill.
    fn set_background(&mut self, color: Rgba);

    /// Draws one frame from the full live set.
    fn present(&mut self, items: &[&dyn Drawable]);
}

/// A primitive captured by [`RecordingPainter`].
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// Filled ellipse
    Ellipse {
        /// Bounding rectangle
        rect: Rect,
        /// Fill color
        color: Rgba,
    },
    /// Line segment
    Line {
        /// Start point
        from: Vec2,
        /// End point
        to: Vec2,
        /// Stroke color
        color: Rgba,
        /// Stroke width
        width: f32,
    },
    /// Image
    Image {
        /// Asset drawn
        asset: AssetId,
        /// Target rectangle
        rect: Rect,
        /// Transform
        pose: Pose,
    },
}

/// Painter that records primitives instead of drawing them.
#[derive(Debug, Default)]
pub struct RecordingPainter {
    /// Recorded primitives, in paint order
    pub commands: Vec<PaintCommand>,
}

impl Painter for RecordingPainter {
    fn fill_ellipse(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(PaintCommand::Ellipse { rect, color });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        self.commands.push(PaintCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn draw_image(&mut self, asset: &AssetId, rect: Rect, pose: &Pose) {
        self.commands.push(PaintCommand::Image {
            asset: asset.clone(),
            rect,
            pose: *pose,
        });
    }
}

/// In-memory canvas that tracks the item registry and the last frame.
#[derive(Debug)]
pub struct RecordingCanvas {
    items: BTreeMap<ItemId, i32>,
    background: Rgba,
    frames: u64,
    last_frame: Vec<PaintCommand>,
    last_frame_items: usize,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            background: Rgba::WHITE,
            frames: 0,
            last_frame: Vec::new(),
            last_frame_items: 0,
        }
    }
}

impl RecordingCanvas {
    /// Creates an empty canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Whether the item is registered.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Current background color.
    #[must_use]
    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Frames presented so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Primitives painted in the last frame.
    #[must_use]
    pub fn last_frame(&self) -> &[PaintCommand] {
        &self.last_frame
    }

    /// Items handed to the last `present` call.
    #[must_use]
    pub fn last_frame_items(&self) -> usize {
        self.last_frame_items
    }
}

impl Canvas for RecordingCanvas {
    fn add_item(&mut self, id: ItemId, layer: i32) {
        self.items.insert(id, layer);
    }

    fn remove_item(&mut self, id: ItemId) {
        self.items.remove(&id);
    }

    fn set_background(&mut self, color: Rgba) {
        self.background = color;
    }

    fn present(&mut self, items: &[&dyn Drawable]) {
        let mut sorted: Vec<&&dyn Drawable> = items.iter().collect();
        sorted.sort_by_key(|item| item.layer());

        let mut painter = RecordingPainter::default();
        for item in sorted {
            item.paint(&mut painter);
        }
        self.last_frame = painter.commands;
        self.last_frame_items = items.len();
        self.frames += 1;
    }
}

/// A static image item (background, buttons).
#[derive(Debug, Clone)]
pub struct PixmapItem {
    /// Canvas id
    pub id: ItemId,
    /// Image drawn
    pub asset: AssetId,
    /// Image size
    pub size: Vec2,
    /// Position (center), rotation, opacity
    pub pose: Pose,
    /// Stacking layer
    pub layer: i32,
}

impl PixmapItem {
    /// Creates an item centered at `center`.
    #[must_use]
    pub fn new(asset: AssetId, size: Vec2, center: Vec2, layer: i32) -> Self {
        Self {
            id: ItemId::new(),
            asset,
            size,
            pose: Pose::at(center),
            layer,
        }
    }

    /// Whether a scene point hits the item.
    #[must_use]
    pub fn hit(&self, point: Vec2) -> bool {
        self.bounding_rect().contains(point)
    }
}

impl Drawable for PixmapItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn layer(&self) -> i32 {
        self.layer
    }

    fn bounding_rect(&self) -> Rect {
        Rect::from_center(self.pose.position, self.size.x, self.size.y)
    }

    fn paint(&self, painter: &mut dyn Painter) {
        painter.draw_image(&self.asset, self.bounding_rect(), &self.pose);
    }
}
