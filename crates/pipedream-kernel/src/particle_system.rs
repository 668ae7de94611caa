//! Emitter-driven particle act.
//!
//! One tick is two-phase: every live particle is affected and stepped first,
//! children spawned during the pass are buffered, then the dead are reaped
//! and the buffered children join the population. Nothing is removed from
//! the population while it is being iterated.

use tracing::trace;

use crate::act::{Curtain, SceneContext};
use crate::affector::Affector;
use crate::canvas::{Canvas, Drawable};
use crate::emitter::Emitter;
use crate::particle::Particle;

/// Emitters, affectors and the particles they produced.
#[derive(Debug)]
pub struct ParticleSystem {
    name: String,
    curtain: Curtain,
    emitters: Vec<Emitter>,
    affectors: Vec<Affector>,
    particles: Vec<Particle>,
    spawned: Vec<Particle>,
    ticks: u64,
}

impl ParticleSystem {
    /// Creates an empty, idle system.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            curtain: Curtain::new(),
            emitters: Vec::new(),
            affectors: Vec::new(),
            particles: Vec::new(),
            spawned: Vec::new(),
            ticks: 0,
        }
    }

    /// Registers an emitter.
    #[must_use]
    pub fn with_emitter(mut self, emitter: Emitter) -> Self {
        self.emitters.push(emitter);
        self
    }

    /// Registers an affector. Affectors run in registration order.
    #[must_use]
    pub fn with_affector(mut self, affector: Affector) -> Self {
        self.affectors.push(affector);
        self
    }

    /// Name for logs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lifecycle flags.
    #[must_use]
    pub fn curtain(&self) -> &Curtain {
        &self.curtain
    }

    /// Live particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    #[must_use]
    pub fn population(&self) -> usize {
        self.particles.len()
    }

    /// Registered affectors.
    #[must_use]
    pub fn affectors(&self) -> &[Affector] {
        &self.affectors
    }

    /// Idle -> Showing.
    pub fn start(&mut self) {
        self.curtain.start();
    }

    /// Stops emitting; the act exits once its population is drained.
    pub fn should_stop(&mut self) {
        self.curtain.request_stop();
    }

    /// Runs one tick.
    pub fn act_out(&mut self, ctx: &mut SceneContext<'_>) {
        if !self.curtain.is_showing() {
            return;
        }
        self.ticks += 1;

        if !self.curtain.is_stopping() {
            self.emit(&mut *ctx.canvas);
        }

        for particle in &mut self.particles {
            for affector in &self.affectors {
                affector.affect(particle);
            }
            particle.step(&mut self.spawned);
        }

        let before = self.particles.len();
        self.particles.retain(|particle| {
            if particle.is_dead() {
                ctx.canvas.remove_item(particle.id());
                false
            } else {
                true
            }
        });
        let reaped = before - self.particles.len();

        let spawned = self.spawned.len();
        for child in self.spawned.drain(..) {
            ctx.canvas.add_item(child.id(), child.layer());
            self.particles.push(child);
        }

        trace!(
            act = %self.name,
            tick = self.ticks,
            live = self.particles.len(),
            reaped,
            spawned,
            "Particle tick"
        );

        self.curtain.exit_if_drained(self.particles.len());
    }

    fn emit(&mut self, canvas: &mut dyn Canvas) {
        let first_new = self.particles.len();
        for emitter in &mut self.emitters {
            emitter.emit_into(&mut self.particles);
        }
        for particle in &self.particles[first_new..] {
            canvas.add_item(particle.id(), particle.layer());
        }
    }

    /// Live particles as drawables.
    #[must_use]
    pub fn drawables(&self) -> Vec<&dyn Drawable> {
        self.particles.iter().map(|p| p as &dyn Drawable).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::act::{Act, ActState};
    use crate::canvas::RecordingCanvas;
    use crate::particle::ParticleState;
    use crate::tests_support::NullAnimator;
    use pipedream_common::{Rect, Rgba, Vec2};

    fn stage() -> Rect {
        Rect::new(0.0, 0.0, 1440.0, 900.0)
    }

    fn tick(system: &mut ParticleSystem, canvas: &mut RecordingCanvas) {
        let mut animator = NullAnimator;
        let mut ctx = SceneContext::new(stage(), canvas, &mut animator);
        system.act_out(&mut ctx);
    }

    fn short_lived() -> Emitter {
        Emitter::basic(stage())
            .with_emitting_params(0, 3, 0)
            .with_lifetime_range(4, 5)
    }

    #[test]
    fn test_idle_system_does_nothing() {
        let mut system = ParticleSystem::new("idle").with_emitter(short_lived());
        let mut canvas = RecordingCanvas::new();
        tick(&mut system, &mut canvas);
        assert_eq!(system.population(), 0);
        assert_eq!(canvas.item_count(), 0);
    }

    #[test]
    fn test_population_reaches_steady_state() {
        let mut system = ParticleSystem::new("steady").with_emitter(short_lived());
        system.start();
        let mut canvas = RecordingCanvas::new();

        for _ in 0..20 {
            tick(&mut system, &mut canvas);
            assert!(system.particles().iter().all(|p| !p.is_dead()));
            assert_eq!(canvas.item_count(), system.population());
        }
        // lifetime 4, 3 per tick: the ages 1..=3 are alive after a tick
        assert_eq!(system.population(), 9);
    }

    #[test]
    fn test_drains_then_exits() {
        let mut system = ParticleSystem::new("drain").with_emitter(short_lived());
        system.start();
        let mut canvas = RecordingCanvas::new();
        for _ in 0..5 {
            tick(&mut system, &mut canvas);
        }

        system.should_stop();
        assert_eq!(system.curtain().state(), ActState::StopRequested);

        let mut ticks = 0;
        while !system.curtain().has_exited() {
            tick(&mut system, &mut canvas);
            ticks += 1;
            assert!(ticks <= 4);
        }
        assert_eq!(system.population(), 0);
        assert_eq!(canvas.item_count(), 0);
    }

    #[test]
    fn test_spawned_children_join_after_reap() {
        let emitter = Emitter::new(stage(), |state| Particle::flame(state, 10.0, false, true))
            .with_emitting_params(0, 1, 0)
            .with_lifetime_range(1, 2);
        let mut system = ParticleSystem::new("flames").with_emitter(emitter);
        system.start();
        system.should_stop();

        // stop was requested before anything was emitted
        let mut canvas = RecordingCanvas::new();
        tick(&mut system, &mut canvas);
        assert!(system.curtain().has_exited());

        let emitter = Emitter::new(stage(), |state| Particle::flame(state, 10.0, false, true))
            .with_emitting_params(0, 1, 0)
            .with_lifetime_range(1, 2);
        let mut system = ParticleSystem::new("flames").with_emitter(emitter);
        system.start();
        tick(&mut system, &mut canvas);

        // the flame died on its first step and left its burst behind
        assert_eq!(system.population(), crate::particle::EXPLODE_FRAGMENTS);
        assert!(system.particles().iter().all(|p| p.generation() == 1));
    }

    #[test]
    fn test_affectors_steer_population() {
        let emitter = Emitter::new(stage(), |state| {
            Particle::new(ParticleState { velocity: Vec2::ZERO, ..state })
        })
        .with_color(Rgba::WHITE, Rgba::WHITE)
        .with_lifetime_range(100, 101);
        let mut system = ParticleSystem::new("wind")
            .with_emitter(emitter)
            .with_affector(Affector::force(stage(), Vec2::new(1.0, 0.0)));
        system.start();

        let mut canvas = RecordingCanvas::new();
        tick(&mut system, &mut canvas);
        let first = &system.particles()[0];
        assert!((first.state().velocity.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_act_wrapper_delegates() {
        let mut act = Act::from(ParticleSystem::new("wrapped").with_emitter(short_lived()));
        assert_eq!(act.name(), "wrapped");
        assert_eq!(act.state(), ActState::Idle);
        act.start();
        assert!(act.is_showing());

        let mut canvas = RecordingCanvas::new();
        let mut animator = NullAnimator;
        let mut ctx = SceneContext::new(stage(), &mut canvas, &mut animator);
        act.act_out(&mut ctx);
        assert_eq!(act.drawables().len(), 3);
        assert_eq!(act.population(), 3);
    }
}
