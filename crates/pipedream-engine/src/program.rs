//! The show.
//!
//! Five scenes over a three-minute soundtrack: falling sakura petals by day,
//! fireflies after nightfall, a spiral of glowing particles, heart-shaped
//! fireworks, and ink orchids at daybreak. Scenes are separated by
//! "end of scene" cues so each one drains before the next takes over.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use pipedream_common::{AssetId, Rect, Rgba, Vec2};
use pipedream_kernel::affector::Affector;
use pipedream_kernel::custom_scenery::CustomScenery;
use pipedream_kernel::emitter::Emitter;
use pipedream_kernel::particle::Particle;
use pipedream_kernel::particle_system::ParticleSystem;
use pipedream_kernel::scenery::EnframedScenery;
use tracing::info;

use crate::config::ShowConfig;
use crate::desktop::{open_readme, Desktop};
use crate::sequencer::Script;
use crate::stage::sweep_background_gray;
use crate::timeline::Timeline;

/// Background image loaded on every start.
pub const BACKGROUND_ASSET: &str = "background";

/// Duration of the background fades.
pub const BACKGROUND_FADE: Duration = Duration::from_millis(2000);

/// Cue timestamps, in seconds.
pub mod cue {
    /// Background fades in
    pub const BACKGROUND_FADE_IN: u32 = 3;
    /// Petals start falling
    pub const SAKURA: u32 = 5;
    /// Petals stop
    pub const SAKURA_END: u32 = 50;
    /// White to black
    pub const NIGHTFALL: u32 = 55;
    /// Fireflies rise
    pub const FIREFLIES: u32 = 60;
    /// Background fades out
    pub const BACKGROUND_FADE_OUT: u32 = 65;
    /// Fireflies stop
    pub const FIREFLIES_END: u32 = 85;
    /// Spiral starts
    pub const SPIRAL: u32 = 90;
    /// Spiral stops
    pub const SPIRAL_END: u32 = 110;
    /// Fireworks start
    pub const FIREWORKS: u32 = 115;
    /// Fireworks stop
    pub const FIREWORKS_END: u32 = 180;
    /// Black to white
    pub const DAYBREAK: u32 = 182;
    /// Orchids and bubbles
    pub const ORCHIDS: u32 = 186;
}

/// The show's timeline.
pub struct ShowProgram {
    bounds: Rect,
    gray_step: Duration,
    readme_path: PathBuf,
    desktop: Arc<dyn Desktop>,
}

impl std::fmt::Debug for ShowProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShowProgram")
            .field("bounds", &self.bounds)
            .field("gray_step", &self.gray_step)
            .field("readme_path", &self.readme_path)
            .finish_non_exhaustive()
    }
}

impl ShowProgram {
    /// Program for a stage of the given size.
    pub fn new(bounds: Rect, desktop: Arc<dyn Desktop>) -> Self {
        Self {
            bounds,
            gray_step: Duration::from_millis(10),
            readme_path: PathBuf::from("./readme.txt"),
            desktop,
        }
    }

    /// Program configured from `config`.
    pub fn from_config(config: &ShowConfig, desktop: Arc<dyn Desktop>) -> Self {
        Self::new(config.stage_bounds(), desktop)
            .with_gray_step(config.gray_step())
            .with_readme(config.readme_path.clone())
    }

    /// Sleep between two gray levels of a sweep.
    #[must_use]
    pub fn with_gray_step(mut self, step: Duration) -> Self {
        self.gray_step = step;
        self
    }

    /// File opened with the orchids.
    #[must_use]
    pub fn with_readme(mut self, path: PathBuf) -> Self {
        self.readme_path = path;
        self
    }
}

impl Script for ShowProgram {
    fn populate(&self, timeline: &mut Timeline) {
        let bounds = self.bounds;
        let step = self.gray_step;

        timeline.add_event(cue::BACKGROUND_FADE_IN, "background fade-in", |stage| {
            stage.lock().fade_background(0.0, 1.0, BACKGROUND_FADE);
        });
        timeline.add_event(cue::SAKURA, "sakura", |stage| {
            stage.lock().push_act(sakura());
        });
        timeline.add_event(cue::SAKURA_END, "end of scene", |stage| {
            stage.lock().end_current_scene();
        });
        timeline.add_event(cue::NIGHTFALL, "nightfall", move |stage| {
            sweep_background_gray(stage, 255, 0, step);
        });
        timeline.add_event(cue::FIREFLIES, "fireflies", move |stage| {
            stage.lock().push_act(fireflies(bounds));
        });
        timeline.add_event(cue::BACKGROUND_FADE_OUT, "background fade-out", |stage| {
            stage.lock().fade_background(1.0, 0.0, BACKGROUND_FADE);
        });
        timeline.add_event(cue::FIREFLIES_END, "end of scene", |stage| {
            stage.lock().end_current_scene();
        });
        timeline.add_event(cue::SPIRAL, "spiral", move |stage| {
            stage.lock().push_act(spiral(bounds));
        });
        timeline.add_event(cue::SPIRAL_END, "end of scene", |stage| {
            stage.lock().end_current_scene();
        });
        timeline.add_event(cue::FIREWORKS, "fireworks", move |stage| {
            stage.lock().push_act(fireworks(bounds));
        });
        timeline.add_event(cue::FIREWORKS_END, "end of scene", |stage| {
            stage.lock().end_current_scene();
        });
        timeline.add_event(cue::DAYBREAK, "daybreak", move |stage| {
            sweep_background_gray(stage, 0, 255, step);
        });

        let desktop = Arc::clone(&self.desktop);
        let readme = self.readme_path.clone();
        timeline.add_event(cue::ORCHIDS, "orchids", move |stage| {
            stage.lock().push_act(orchids());
            open_readme(desktop.as_ref(), &readme);
        });
    }
}

/// Falling petals cut from the petal sheet.
#[must_use]
pub fn sakura() -> EnframedScenery {
    info!("Scene: sakura");
    EnframedScenery::new()
}

/// Fireflies rising from below the stage.
#[must_use]
pub fn fireflies(bounds: Rect) -> ParticleSystem {
    info!("Scene: fireflies");
    let emitter = Emitter::new(bounds, |state| Particle::glow(state, 5.0))
        .with_point_range(0.0, bounds.width, bounds.height, bounds.height + 20.0)
        .with_velocity(Vec2::new(0.0, -1.0), 2.0, 5.0)
        .with_color(Rgba::from_rgba8(200, 240, 50, 255), Rgba::from_rgba8(200, 240, 50, 0))
        .with_size_range(10.0, 15.0)
        .with_lifetime_range(150, 200);

    ParticleSystem::new("fireflies")
        .with_emitter(emitter)
        .with_affector(Affector::turbulence(bounds))
}

/// Vibrating particles swirling up from the middle.
#[must_use]
pub fn spiral(bounds: Rect) -> ParticleSystem {
    info!("Scene: spiral");
    let (w, h) = (bounds.width, bounds.height);
    let emitter = Emitter::new(bounds, |state| {
        Particle::glow(state, 10.0).with_vibration(500.0, 250.0, 0.01)
    })
    .with_point_range(w / 2.0 - 100.0, w / 2.0 + 100.0, h - 300.0, h - 250.0)
    .with_emitting_params(0, 3, 0)
    .with_velocity(Vec2::new(0.0, -1.0), 0.0, 0.1)
    .with_size_range(5.0, 8.0)
    .with_lifetime_range(400, 450)
    .with_color(Rgba::from_rgb8(38, 191, 221), Rgba::from_rgba8(38, 191, 221, 0));

    ParticleSystem::new("spiral")
        .with_emitter(emitter)
        .with_affector(Affector::turbulence(Rect::new(0.0, 0.0, w, h / 2.0)))
        .with_affector(Affector::force(
            Rect::new(w / 2.0 - 100.0, h - 350.0, 200.0, 100.0),
            Vec2::new(0.0, -0.3),
        ))
        .with_affector(Affector::amplitude_decay(bounds, 0.007))
}

/// Shells launched from the bottom edge, bursting into hearts.
#[must_use]
pub fn fireworks(bounds: Rect) -> ParticleSystem {
    info!("Scene: fireworks");
    let emitter = Emitter::new(bounds, |state| Particle::firework(state, 10.0))
        .with_point_range(50.0, bounds.width - 50.0, bounds.height - 100.0, bounds.height)
        .with_emitting_params(0, 1, 50)
        .with_velocity(Vec2::new(0.0, -1.0), 4.0, 6.0)
        .with_size_range(15.0, 20.0)
        .with_lifetime_range(100, 120);

    ParticleSystem::new("fireworks")
        .with_emitter(emitter)
        .with_affector(Affector::turbulence(bounds))
}

/// Ink orchids and bubbles.
#[must_use]
pub fn orchids() -> CustomScenery {
    info!("Scene: orchids");
    CustomScenery::new()
}

/// Asset id of the background image.
#[must_use]
pub fn background_asset() -> AssetId {
    AssetId::new(BACKGROUND_ASSET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Stage;
    use crate::trace_canvas::TraceCanvas;
    use crate::tween::TweenAnimator;
    use pipedream_kernel::act::ActState;
    use std::io;
    use std::path::Path;

    struct NoDesktop;

    impl Desktop for NoDesktop {
        fn open(&self, _path: &Path) -> io::Result<()> {
            Ok(())
        }
    }

    fn bounds() -> Rect {
        Rect::new(0.0, 0.0, 1440.0, 900.0)
    }

    fn program() -> ShowProgram {
        ShowProgram::new(bounds(), Arc::new(NoDesktop))
            .with_gray_step(Duration::ZERO)
            .with_readme(PathBuf::from("/nonexistent/readme.txt"))
    }

    #[test]
    fn test_timeline_cues() {
        let mut timeline = Timeline::new();
        program().populate(&mut timeline);
        assert_eq!(
            timeline.timestamps().collect::<Vec<_>>(),
            vec![3, 5, 50, 55, 60, 65, 85, 90, 110, 115, 180, 182, 186]
        );
    }

    #[test]
    fn test_whole_show_against_the_stage() {
        let stage = Stage::new(
            bounds(),
            Box::new(TraceCanvas::new()),
            Box::new(TweenAnimator::new()),
            Duration::from_millis(20),
        )
        .into_shared();
        stage.lock().reload_background(background_asset());

        let mut timeline = Timeline::new();
        program().populate(&mut timeline);

        let mut names = Vec::new();
        while let Some(event) = timeline.pop_due(u32::MAX) {
            event.fire(&stage);
            if let Some((name, state)) = stage.lock().front_act() {
                names.push((name.to_string(), state));
            }
        }

        // Nothing ticked, so the first act is still at the front, stopping.
        assert_eq!(names.last(), Some(&("enframed".to_string(), ActState::StopRequested)));
        assert_eq!(stage.lock().act_count(), 5);
        assert_eq!(stage.lock().background_gray(), 255);
    }

    #[test]
    fn test_scene_builders() {
        let b = bounds();
        let fireflies = fireflies(b);
        assert_eq!(fireflies.name(), "fireflies");
        assert_eq!(fireflies.affectors().len(), 1);

        let spiral = spiral(b);
        assert_eq!(spiral.affectors().len(), 3);

        let fireworks = fireworks(b);
        assert_eq!(fireworks.population(), 0);
    }
}
