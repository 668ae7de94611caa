//! # PipeDream Kernel
//!
//! Particle simulation and act lifecycle for the PipeDream show.
//!
//! This crate owns everything that changes per tick:
//! - Particles with vibration, flicker and recursive splash/explode spawning
//! - Emitters sampling fresh particle states on a delay/quantity/interval cadence
//! - Affectors (force, turbulence, amplitude decay, heart repel)
//! - Acts: the `Idle → Showing → StopRequested → Exeunt` state machine and
//!   the three act kinds (particle system, falling petals, ink orchids)
//!
//! ## Collaborators
//!
//! Rendering and property animation are not implemented here. Acts talk to a
//! [`canvas::Canvas`] (item registry plus once-per-tick paint of the live set)
//! and to an [`animation::Animator`] (start/end pose interpolation). The
//! engine crate wires concrete implementations in.
//!
//! ## Tick model
//!
//! Each tick is two-phase: step every live entity, buffering any children,
//! then reap the dead and append the children. The live collection is never
//! mutated while it is iterated.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod act;
pub mod affector;
pub mod animation;
pub mod canvas;
pub mod custom_scenery;
pub mod emitter;
pub mod heart;
pub mod orchid;
pub mod particle;
pub mod particle_system;
pub mod rng;
pub mod scenery;

#[cfg(test)]
mod tests_support;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::act::*;
    pub use crate::affector::*;
    pub use crate::animation::*;
    pub use crate::canvas::*;
    pub use crate::custom_scenery::*;
    pub use crate::emitter::*;
    pub use crate::orchid::*;
    pub use crate::particle::*;
    pub use crate::particle_system::*;
    pub use crate::scenery::*;
}

pub use prelude::*;
