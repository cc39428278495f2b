use crate::constants::*;
use crate::utils::errors::AppError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default)]
    pub gestures: GestureConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_controls_hide_delay")]
    pub controls_hide_delay_ms: u64,

    #[serde(default = "default_countdown_seconds")]
    pub countdown_seconds: u32,

    #[serde(default = "default_countdown_tick")]
    pub countdown_tick_ms: u64,

    #[serde(default = "default_skip_seconds")]
    pub skip_seconds: f64,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_true")]
    pub autoplay: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    #[serde(default = "default_minimize_offset")]
    pub minimize_offset: f64,

    #[serde(default = "default_minimize_velocity")]
    pub minimize_velocity: f64,

    #[serde(default = "default_dismiss_offset")]
    pub dismiss_offset: f64,

    #[serde(default = "default_dismiss_velocity")]
    pub dismiss_velocity: f64,

    #[serde(default = "default_list_offset")]
    pub list_offset: f64,

    #[serde(default = "default_list_velocity")]
    pub list_velocity: f64,

    #[serde(default = "default_double_tap")]
    pub double_tap_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Config {
    /// Load from the user config directory, writing defaults on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config file found, using defaults");
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path).context("Failed to read config file")?;
        let config = Self::from_toml_str(&contents)?;
        info!("Config loaded successfully");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;

        debug!("Config saved to {:?}", path);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.player.countdown_seconds == 0 {
            return Err(AppError::Configuration(
                "player.countdown_seconds must be at least 1".into(),
            )
            .into());
        }
        if self.player.poll_interval_ms == 0 || self.player.countdown_tick_ms == 0 {
            return Err(
                AppError::Configuration("player timer intervals must be non-zero".into()).into(),
            );
        }
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("feedreel").join("config.toml"))
    }
}

impl PlayerConfig {
    pub fn controls_hide_delay(&self) -> Duration {
        Duration::from_millis(self.controls_hide_delay_ms)
    }

    pub fn countdown_tick(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl GestureConfig {
    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_ms)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            controls_hide_delay_ms: default_controls_hide_delay(),
            countdown_seconds: default_countdown_seconds(),
            countdown_tick_ms: default_countdown_tick(),
            skip_seconds: default_skip_seconds(),
            poll_interval_ms: default_poll_interval(),
            autoplay: default_true(),
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            minimize_offset: default_minimize_offset(),
            minimize_velocity: default_minimize_velocity(),
            dismiss_offset: default_dismiss_offset(),
            dismiss_velocity: default_dismiss_velocity(),
            list_offset: default_list_offset(),
            list_velocity: default_list_velocity(),
            double_tap_ms: default_double_tap(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

// Default value functions
fn default_controls_hide_delay() -> u64 { PLAYER_CONTROLS_HIDE_DELAY_MS }
fn default_countdown_seconds() -> u32 { COUNTDOWN_TOTAL_SECONDS }
fn default_countdown_tick() -> u64 { COUNTDOWN_TICK_MS }
fn default_skip_seconds() -> f64 { SKIP_SECONDS }
fn default_poll_interval() -> u64 { WIDGET_POLL_INTERVAL_MS }
fn default_true() -> bool { true }
fn default_minimize_offset() -> f64 { MINIMIZE_DRAG_OFFSET }
fn default_minimize_velocity() -> f64 { MINIMIZE_DRAG_VELOCITY }
fn default_dismiss_offset() -> f64 { DISMISS_SWIPE_OFFSET }
fn default_dismiss_velocity() -> f64 { DISMISS_SWIPE_VELOCITY }
fn default_list_offset() -> f64 { LIST_DRAG_OFFSET }
fn default_list_velocity() -> f64 { LIST_DRAG_VELOCITY }
fn default_double_tap() -> u64 { DOUBLE_TAP_THRESHOLD_MS }
fn default_log_filter() -> String { "feedreel=debug".to_string() }
