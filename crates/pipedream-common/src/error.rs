//! Error types for PipeDream.

use thiserror::Error;

/// Top-level error type for PipeDream operations.
///
/// The simulation itself is infallible; these cover the surrounding
/// application (configuration, threads, files).
#[derive(Debug, Error)]
pub enum PipedreamError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A worker thread could not be spawned or panicked
    #[error("Thread error: {0}")]
    Thread(String),

    /// Scheduler misuse (e.g. starting a torn-down sequencer)
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
}

/// Scheduler-specific errors.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The timeline thread is still running
    #[error("Timeline is already running")]
    AlreadyRunning,

    /// The clock channel was closed
    #[error("Clock signal disconnected")]
    ClockDisconnected,

    /// The sequencer has been shut down
    #[error("Sequencer has been shut down")]
    ShutDown,
}

/// Result type alias for PipeDream operations.
pub type PipedreamResult<T> = Result<T, PipedreamError>;
