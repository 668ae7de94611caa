//! # PipeDream Common
//!
//! Common types, utilities, and shared abstractions for PipeDream.
//!
//! This crate provides foundational types used across the show:
//! - Geometry types (points, vectors, rectangles)
//! - RGBA colors with Qt-style lighten/darken helpers
//! - ID types for scene items and assets
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod color;
pub mod error;
pub mod geometry;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::color::*;
    pub use crate::error::*;
    pub use crate::geometry::*;
    pub use crate::ids::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_center() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(rect.contains(rect.center()));
        assert!(!rect.contains(Vec2::new(150.0, 25.0)));
    }

    #[test]
    fn test_item_id_generation() {
        let id1 = ItemId::new();
        let id2 = ItemId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_color_lighter_keeps_alpha() {
        let color = Rgba::from_rgba8(38, 191, 221, 128);
        let lighter = color.lighter();
        assert!((lighter.a - color.a).abs() < f32::EPSILON);
    }
}
