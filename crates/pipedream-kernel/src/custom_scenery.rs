//! Ink orchids over rising bubbles.

use pipedream_common::{Rgba, Vec2};
use tracing::trace;

use crate::act::{Curtain, SceneContext};
use crate::canvas::{layer, Drawable};
use crate::orchid::OrchidItem;
use crate::particle::{Particle, ParticleState};
use crate::rng;

const ORCHID_PERIOD: u32 = 13;
const BUBBLE_PERIOD: u32 = 9;

/// Orchid trails plus background bubbles.
#[derive(Debug, Default)]
pub struct CustomScenery {
    curtain: Curtain,
    orchids: Vec<OrchidItem>,
    particles: Vec<Particle>,
    spawned: Vec<Particle>,
    orchid_counter: u32,
    bubble_counter: u32,
}

impl CustomScenery {
    /// Idle scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifecycle flags.
    #[must_use]
    pub fn curtain(&self) -> &Curtain {
        &self.curtain
    }

    /// Live orchids.
    #[must_use]
    pub fn orchids(&self) -> &[OrchidItem] {
        &self.orchids
    }

    /// Live bubbles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Orchids plus bubbles.
    #[must_use]
    pub fn population(&self) -> usize {
        self.orchids.len() + self.particles.len()
    }

    /// Idle -> Showing.
    pub fn start(&mut self) {
        self.curtain.start();
    }

    /// Stops spawning; exits once orchids and bubbles are gone.
    pub fn should_stop(&mut self) {
        self.curtain.request_stop();
    }

    /// Runs one tick.
    pub fn act_out(&mut self, ctx: &mut SceneContext<'_>) {
        if !self.curtain.is_showing() {
            return;
        }

        if !self.curtain.is_stopping() {
            self.spawn(ctx);
        }

        for particle in &mut self.particles {
            particle.step(&mut self.spawned);
        }
        self.particles.retain(|particle| {
            if particle.is_dead() {
                ctx.canvas.remove_item(particle.id());
                false
            } else {
                true
            }
        });
        for child in self.spawned.drain(..) {
            ctx.canvas.add_item(child.id(), child.layer());
            self.particles.push(child);
        }

        for orchid in &mut self.orchids {
            orchid.tick();
        }
        self.orchids.retain(|orchid| {
            if orchid.is_done() {
                trace!(item = orchid.id().raw(), "Orchid finished");
                ctx.canvas.remove_item(orchid.id());
                false
            } else {
                true
            }
        });

        self.curtain.exit_if_drained(self.population());
    }

    fn spawn(&mut self, ctx: &mut SceneContext<'_>) {
        self.orchid_counter += 1;
        if self.orchid_counter >= ORCHID_PERIOD {
            self.orchid_counter = 0;
            let orchid = OrchidItem::random(ctx.bounds);
            ctx.canvas.add_item(orchid.id(), orchid.layer());
            self.orchids.push(orchid);
        }

        self.bubble_counter += 1;
        if self.bubble_counter >= BUBBLE_PERIOD {
            self.bubble_counter = 0;
            let bubble = bubble(ctx.bounds.width, ctx.bounds.height);
            ctx.canvas.add_item(bubble.id(), bubble.layer());
            self.particles.push(bubble);
        }
    }

    /// Orchids and bubbles as drawables.
    #[must_use]
    pub fn drawables(&self) -> Vec<&dyn Drawable> {
        self.particles
            .iter()
            .map(|p| p as &dyn Drawable)
            .chain(self.orchids.iter().map(|o| o as &dyn Drawable))
            .collect()
    }
}

/// A translucent bubble drifting up and to the left or right.
fn bubble(width: f32, height: f32) -> Particle {
    let position = Vec2::new(rng::uniform(0.0, width), height + rng::uniform(0.0, 100.0));
    let heading = (-120.0 + rng::uniform(0.0, 60.0)).to_radians();
    let direction = Vec2::new(heading.cos(), heading.sin());

    let [r, g, b] = [rng::uniform_u8_from(0), rng::uniform_u8_from(0), rng::uniform_u8_from(0)];
    let alpha = rng::uniform_u8_from(128);

    let state = ParticleState::moving(position, direction, 2.0 + rng::uniform(0.0, 3.0))
        .with_colors(Rgba::from_rgba8(r, g, b, alpha), Rgba::from_rgba8(r, g, b, 0))
        .with_size(20.0 + rng::uniform(0.0, 20.0))
        .with_lifetime(rng::uniform_u32(100, 200));
    Particle::new(state).with_layer(layer::BEHIND)
}
