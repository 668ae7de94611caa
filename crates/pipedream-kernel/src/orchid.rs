//! Ink-brush orchid trails.
//!
//! An orchid is a precomputed parabolic track of colored, tapering segments.
//! It runs its own per-tick state machine:
//!
//! | Phase | Per tick |
//! |-------|----------|
//! | Waiting | count down, draw nothing |
//! | Revealing | draw the first `len - remaining` segments |
//! | Fading | draw every segment, width shrinking as `w - w / remaining` |
//! | Done | removed from the scene by its owner |

use pipedream_common::{ItemId, Rect, Rgba, Vec2};

use crate::canvas::{layer, Drawable, Painter};
use crate::rng;

/// Time between two track samples.
const TRACK_DT: f32 = 0.2;

/// Downward acceleration of the track.
const TRACK_GRAVITY: f32 = 6.0;

/// Paint region around the origin of an orchid.
const PAINT_EXTENT: Vec2 = Vec2::new(1920.0, 1080.0);

/// One segment endpoint of the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    /// Scene position
    pub point: Vec2,
    /// Stroke color of the segment starting here
    pub color: Rgba,
    /// Stroke width of the segment starting here
    pub width: f32,
}

/// Current phase of an orchid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchidPhase {
    /// Hidden, counting down
    Waiting,
    /// Segments appearing one by one
    Revealing,
    /// Whole track visible, thinning out
    Fading,
    /// Finished
    Done,
}

/// Shape parameters of one orchid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrchidShape {
    /// Track origin
    pub origin: Vec2,
    /// Initial velocity (truncated to whole units when sampled)
    pub velocity: Vec2,
    /// Color at the root
    pub color_start: Rgba,
    /// Color at the tip
    pub color_end: Rgba,
    /// Width at the root
    pub width_start: f32,
    /// Width at the tip
    pub width_end: f32,
    /// Number of track points
    pub length: u32,
}

/// Phase durations in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchidTiming {
    /// Ticks hidden
    pub wait: u32,
    /// Ticks to reveal (raised to at least the track length)
    pub reveal: u32,
    /// Ticks to fade
    pub fade: u32,
}

/// An ink trail item.
#[derive(Debug, Clone)]
pub struct OrchidItem {
    id: ItemId,
    shape: OrchidShape,
    timing: OrchidTiming,
    track: Vec<TrackPoint>,
    phase: OrchidPhase,
    frame: Vec<(Vec2, Vec2, Rgba, f32)>,
}

impl OrchidItem {
    /// Builds an orchid and precomputes its track.
    #[must_use]
    pub fn new(shape: OrchidShape, timing: OrchidTiming) -> Self {
        let mut orchid = Self {
            id: ItemId::new(),
            shape,
            timing,
            track: Vec::new(),
            phase: OrchidPhase::Waiting,
            frame: Vec::new(),
        };
        orchid.start();
        orchid
    }

    /// Random orchid rising from below the bottom center of `bounds`.
    #[must_use]
    pub fn random(bounds: Rect) -> Self {
        let origin = Vec2::new(
            bounds.width / 2.0 + rng::uniform_i32(-60, 60) as f32,
            bounds.height + rng::uniform_i32(100, 200) as f32,
        );
        let velocity = Vec2::new(rng::uniform(-20.0, 20.0), rng::uniform(-110.0, -80.0));

        let shape = OrchidShape {
            origin,
            velocity,
            color_start: Rgba::from_rgb8(0, rng::uniform_u8_from(128), rng::uniform_u8_from(128)),
            color_end: Rgba::from_rgb8(128, rng::uniform_u8_from(128), rng::uniform_u8_from(128)),
            width_start: 10.0 + rng::uniform(0.0, 10.0),
            width_end: 0.1,
            length: rng::uniform_u32(100, 150),
        };
        let timing = OrchidTiming {
            wait: rng::uniform_u32(5, 40),
            reveal: rng::uniform_u32(32, 40),
            fade: rng::uniform_u32(20, 35),
        };
        Self::new(shape, timing)
    }

    fn start(&mut self) {
        self.timing.reveal = self.timing.reveal.max(self.shape.length);

        let length = self.shape.length;
        // velocities are whole units on the track
        let vx = self.shape.velocity.x.trunc();
        let vy = self.shape.velocity.y.trunc();
        self.track = (0..length)
            .map(|i| {
                let t = TRACK_DT * i as f32;
                let offset = Vec2::new(vx * t, vy * t + 0.5 * TRACK_GRAVITY * t * t);
                TrackPoint {
                    point: self.shape.origin + offset,
                    color: gradient_color(self.shape.color_start, self.shape.color_end, length, i),
                    width: self.shape.width_start
                        + (self.shape.width_end - self.shape.width_start) * i as f32 / length as f32,
                }
            })
            .collect();
    }

    /// Canvas id.
    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> OrchidPhase {
        self.phase
    }

    /// Remaining phase durations.
    #[must_use]
    pub fn timing(&self) -> OrchidTiming {
        self.timing
    }

    /// Precomputed track.
    #[must_use]
    pub fn track(&self) -> &[TrackPoint] {
        &self.track
    }

    /// Segments drawn in the current frame.
    #[must_use]
    pub fn visible_segments(&self) -> usize {
        self.frame.len()
    }

    /// Whether the orchid finished and should leave the scene.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.phase == OrchidPhase::Done
    }

    /// Advances the state machine by one tick and prepares the frame.
    pub fn tick(&mut self) {
        self.frame.clear();
        if self.phase == OrchidPhase::Done {
            return;
        }

        if self.timing.wait > 0 {
            self.timing.wait -= 1;
            self.phase = OrchidPhase::Waiting;
            return;
        }

        let len = self.track.len();
        if self.timing.reveal > 0 {
            self.timing.reveal -= 1;
            self.phase = OrchidPhase::Revealing;
            let count = len.saturating_sub(self.timing.reveal as usize);
            let count = count.min(len.saturating_sub(1));
            self.push_segments(count, |width| width);
        } else if self.timing.fade > 1 {
            self.timing.fade -= 1;
            self.phase = OrchidPhase::Fading;
            let fade = self.timing.fade as f32;
            self.push_segments(len.saturating_sub(1), |width| width - width / fade);
        } else {
            self.phase = OrchidPhase::Done;
        }
    }

    fn push_segments(&mut self, count: usize, width: impl Fn(f32) -> f32) {
        self.frame.extend(self.track.windows(2).take(count).map(|pair| {
            (pair[0].point, pair[1].point, pair[0].color, width(pair[0].width))
        }));
    }
}

/// Integer RGB interpolation, `step` steps from `from` to `to`.
fn gradient_color(from: Rgba, to: Rgba, step: u32, n: u32) -> Rgba {
    let [r1, g1, b1, _] = from.to_rgba8();
    let [r2, g2, b2, _] = to.to_rgba8();
    let channel = |a: u8, b: u8| -> u8 {
        let a = i64::from(a);
        let b = i64::from(b);
        let v = a + (b - a) * i64::from(n) / i64::from(step.max(1));
        v.clamp(0, 255) as u8
    };
    Rgba::from_rgb8(channel(r1, r2), channel(g1, g2), channel(b1, b2))
}

impl Drawable for OrchidItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn layer(&self) -> i32 {
        layer::DEFAULT
    }

    fn bounding_rect(&self) -> Rect {
        Rect::from_center(self.shape.origin, PAINT_EXTENT.x, PAINT_EXTENT.y)
    }

    fn paint(&self, painter: &mut dyn Painter) {
        for &(from, to, color, width) in &self.frame {
            painter.stroke_line(from, to, color, width);
        }
    }
}
