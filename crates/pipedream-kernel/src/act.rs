//! Act lifecycle.
//!
//! Every act walks the same one-way state machine:
//!
//! ```text
//! Idle --start()--> Showing --should_stop()--> StopRequested --(population empty)--> Exeunt
//! ```
//!
//! While stop is requested the act keeps ticking to drain its population but
//! spawns nothing new. Once exited an act is discarded, never restarted.

use pipedream_common::Rect;
use tracing::debug;

use crate::animation::Animator;
use crate::canvas::{Canvas, Drawable};
use crate::custom_scenery::CustomScenery;
use crate::particle_system::ParticleSystem;
use crate::scenery::EnframedScenery;

/// Lifecycle state of an act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActState {
    /// Built, not started
    #[default]
    Idle,
    /// Running normally
    Showing,
    /// Draining, no new spawns
    StopRequested,
    /// Population drained; terminal
    Exeunt,
}

/// The lifecycle flags shared by every act kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Curtain {
    state: ActState,
}

impl Curtain {
    /// Idle curtain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ActState {
        self.state
    }

    /// Idle -> Showing. Ignored in any other state.
    pub fn start(&mut self) {
        if self.state == ActState::Idle {
            self.state = ActState::Showing;
        }
    }

    /// Showing -> StopRequested. Ignored in any other state.
    pub fn request_stop(&mut self) {
        if self.state == ActState::Showing {
            self.state = ActState::StopRequested;
        }
    }

    /// Enters the terminal state.
    pub fn exit(&mut self) {
        self.state = ActState::Exeunt;
    }

    /// Started and not yet exited.
    #[must_use]
    pub fn is_showing(&self) -> bool {
        matches!(self.state, ActState::Showing | ActState::StopRequested)
    }

    /// Stop was requested (or the act already exited).
    #[must_use]
    pub fn is_stopping(&self) -> bool {
        matches!(self.state, ActState::StopRequested | ActState::Exeunt)
    }

    /// Terminal.
    #[must_use]
    pub fn has_exited(&self) -> bool {
        self.state == ActState::Exeunt
    }

    /// Exits if stop was requested and nothing is left alive.
    pub fn exit_if_drained(&mut self, population: usize) -> bool {
        if self.state == ActState::StopRequested && population == 0 {
            self.exit();
            true
        } else {
            false
        }
    }
}

/// Collaborators an act works with during one tick.
pub struct SceneContext<'a> {
    /// Stage bounds
    pub bounds: Rect,
    /// Item registry of the rendering collaborator
    pub canvas: &'a mut dyn Canvas,
    /// Property animation collaborator
    pub animator: &'a mut dyn Animator,
}

impl<'a> SceneContext<'a> {
    /// Bundles the collaborators.
    pub fn new(bounds: Rect, canvas: &'a mut dyn Canvas, animator: &'a mut dyn Animator) -> Self {
        Self {
            bounds,
            canvas,
            animator,
        }
    }
}

/// A scene on the stage.
#[derive(Debug)]
pub enum Act {
    /// Emitters + affectors + particle population
    Particles(ParticleSystem),
    /// Falling decorative items driven by the animator
    Enframed(EnframedScenery),
    /// Ink-trail orchids and background bubbles
    Custom(CustomScenery),
}

impl Act {
    fn curtain(&self) -> &Curtain {
        match self {
            Self::Particles(act) => act.curtain(),
            Self::Enframed(act) => act.curtain(),
            Self::Custom(act) => act.curtain(),
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Particles(act) => act.name(),
            Self::Enframed(_) => "enframed",
            Self::Custom(_) => "custom",
        }
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> ActState {
        self.curtain().state()
    }

    /// Started and not yet exited.
    #[must_use]
    pub fn is_showing(&self) -> bool {
        self.curtain().is_showing()
    }

    /// Terminal.
    #[must_use]
    pub fn has_exited(&self) -> bool {
        self.curtain().has_exited()
    }

    /// Idle -> Showing.
    pub fn start(&mut self) {
        debug!(act = self.name(), "Act started");
        match self {
            Self::Particles(act) => act.start(),
            Self::Enframed(act) => act.start(),
            Self::Custom(act) => act.start(),
        }
    }

    /// Showing -> StopRequested.
    pub fn should_stop(&mut self) {
        debug!(act = self.name(), "Act asked to stop");
        match self {
            Self::Particles(act) => act.should_stop(),
            Self::Enframed(act) => act.should_stop(),
            Self::Custom(act) => act.should_stop(),
        }
    }

    /// Runs one tick.
    pub fn act_out(&mut self, ctx: &mut SceneContext<'_>) {
        match self {
            Self::Particles(act) => act.act_out(ctx),
            Self::Enframed(act) => act.act_out(ctx),
            Self::Custom(act) => act.act_out(ctx),
        }
        if self.has_exited() {
            debug!(act = self.name(), "Exeunt");
        }
    }

    /// Live items for the rendering collaborator.
    #[must_use]
    pub fn drawables(&self) -> Vec<&dyn Drawable> {
        match self {
            Self::Particles(act) => act.drawables(),
            Self::Enframed(act) => act.drawables(),
            Self::Custom(act) => act.drawables(),
        }
    }

    /// Live population (particles and decorative items).
    #[must_use]
    pub fn population(&self) -> usize {
        match self {
            Self::Particles(act) => act.population(),
            Self::Enframed(act) => act.population(),
            Self::Custom(act) => act.population(),
        }
    }
}

impl From<ParticleSystem> for Act {
    fn from(act: ParticleSystem) -> Self {
        Self::Particles(act)
    }
}

impl From<EnframedScenery> for Act {
    fn from(act: EnframedScenery) -> Self {
        Self::Enframed(act)
    }
}

impl From<CustomScenery> for Act {
    fn from(act: CustomScenery) -> Self {
        Self::Custom(act)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curtain_walks_forward_only() {
        let mut curtain = Curtain::new();
        assert_eq!(curtain.state(), ActState::Idle);
        assert!(!curtain.is_showing());

        curtain.request_stop();
        assert_eq!(curtain.state(), ActState::Idle);

        curtain.start();
        assert_eq!(curtain.state(), ActState::Showing);
        assert!(curtain.is_showing());

        curtain.request_stop();
        assert_eq!(curtain.state(), ActState::StopRequested);
        assert!(curtain.is_showing());
        assert!(curtain.is_stopping());

        curtain.start();
        assert_eq!(curtain.state(), ActState::StopRequested);
    }

    #[test]
    fn test_exit_requires_stop_and_empty_population() {
        let mut curtain = Curtain::new();
        curtain.start();
        assert!(!curtain.exit_if_drained(0));

        curtain.request_stop();
        assert!(!curtain.exit_if_drained(3));
        assert!(curtain.exit_if_drained(0));
        assert!(curtain.has_exited());
        assert!(!curtain.is_showing());
    }
}
