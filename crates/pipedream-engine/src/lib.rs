//! # PipeDream Engine
//!
//! Runs the PipeDream show: a timeline of scenes driven by a soundtrack
//! clock, played on a shared stage.
//!
//! This crate ties the kernel to the outside world:
//! - Configuration (`pipedream.toml`)
//! - Stage: act queue, background, overlay controls, collaborators
//! - Sequencer: the fixed-rate tick thread and the cue-firing timeline thread
//! - Show program: the five scenes and their transitions
//! - Theatre: media status handling and the replay control
//! - Headless collaborators: a tweening animator and a tracing canvas

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod clock;
pub mod config;
pub mod desktop;
pub mod media;
pub mod program;
pub mod sequencer;
pub mod stage;
pub mod theatre;
pub mod timeline;
pub mod trace_canvas;
pub mod tween;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::clock::PlaybackClock;
    pub use crate::config::ShowConfig;
    pub use crate::desktop::{Desktop, SystemDesktop};
    pub use crate::media::{MediaEvent, MediaStatus, Playback, SimulatedPlayback};
    pub use crate::program::ShowProgram;
    pub use crate::sequencer::{ClockSignal, Script, Sequencer};
    pub use crate::stage::{SharedStage, Stage};
    pub use crate::theatre::Theatre;
    pub use crate::timeline::{Timeline, TimelineEvent};
    pub use crate::trace_canvas::TraceCanvas;
    pub use crate::tween::TweenAnimator;
}

pub use prelude::*;
