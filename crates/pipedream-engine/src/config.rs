//! Show configuration.
//!
//! Stage size, tick rate, transition pacing and the headless playback
//! settings. Loaded from a TOML file; a missing or broken file falls back to
//! defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use pipedream_common::{PipedreamError, PipedreamResult, Rect};

/// Configuration file name.
const CONFIG_FILE: &str = "pipedream.toml";

/// Default tracing directive.
pub const DEFAULT_LOG_FILTER: &str = "pipedream=info,pipedream_engine=info,pipedream_kernel=info";

/// Show configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    // === Stage ===
    /// Stage width in pixels
    pub width: u32,
    /// Stage height in pixels
    pub height: u32,

    // === Timing ===
    /// Fixed tick interval in milliseconds
    pub tick_interval_ms: u64,
    /// Duration of one step of the background gray sweep
    pub gray_step_ms: u64,

    // === Playback ===
    /// Speed of the simulated media clock (1.0 = real time)
    pub playback_rate: f32,
    /// Length of the soundtrack in seconds
    pub show_length_secs: u32,

    // === Misc ===
    /// File opened when the orchid scene starts
    pub readme_path: PathBuf,
    /// Default tracing filter (overridden by `RUST_LOG`)
    pub log_filter: String,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            width: 1440,
            height: 900,

            tick_interval_ms: 20,
            gray_step_ms: 10,

            playback_rate: 1.0,
            show_length_secs: 200,

            readme_path: PathBuf::from("./readme.txt"),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ShowConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match Self::try_load_from(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("{e}, using defaults");
                Self::default()
            },
        }
    }

    /// Load and validate configuration, reporting why a file is unusable.
    pub fn try_load_from<P: AsRef<Path>>(path: P) -> PipedreamResult<Self> {
        let path = path.as_ref();

        let mut contents = String::new();
        fs::File::open(path)?.read_to_string(&mut contents)?;

        let mut config = toml::from_str::<Self>(&contents).map_err(|e| {
            PipedreamError::Config(format!("failed to parse {}: {e}", path.display()))
        })?;
        config.validate();
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Default configuration file path.
    #[must_use]
    pub fn config_path() -> PathBuf {
        if let Some(config_dir) = dirs_config_path() {
            config_dir.join("pipedream").join(CONFIG_FILE)
        } else {
            PathBuf::from(CONFIG_FILE)
        }
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.width = self.width.clamp(320, 7680);
        self.height = self.height.clamp(240, 4320);

        self.tick_interval_ms = self.tick_interval_ms.clamp(5, 200);
        self.gray_step_ms = self.gray_step_ms.min(100);

        self.playback_rate = if self.playback_rate.is_finite() {
            self.playback_rate.clamp(0.1, 100.0)
        } else {
            1.0
        };
        self.show_length_secs = self.show_length_secs.max(1);

        if self.log_filter.trim().is_empty() {
            self.log_filter = DEFAULT_LOG_FILTER.to_string();
        }
    }

    /// Stage rectangle anchored at the origin.
    #[must_use]
    pub fn stage_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    /// Tick interval.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// One step of the gray sweep.
    #[must_use]
    pub fn gray_step(&self) -> Duration {
        Duration::from_millis(self.gray_step_ms)
    }
}

/// Get platform-specific config directory.
fn dirs_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Application Support"))
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        None
    }
}
