//! Application configuration
//!
//! Sources, lowest to highest priority:
//! 1. built-in defaults
//! 2. `config/default.toml`
//! 3. `config/user.toml`
//! 4. Environment variables (`COBRITA_SECTION__KEY`)

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::term::CELL_COLUMNS;

pub const ENV_PREFIX: &str = "COBRITA_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub log: LogConfig,
    /// Fixed RNG seed, random when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

impl AppConfig {
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // COBRITA_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: AppConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let w = &self.window;
        if w.square_side == 0 {
            return Err(Error::InvalidConfig("window.square_side must be positive".into()));
        }
        if w.pixel_width < w.square_side || w.pixel_height < w.square_side {
            return Err(Error::InvalidConfig(format!(
                "window of {}x{} pixels can't hold a {} pixel square",
                w.pixel_width, w.pixel_height, w.square_side
            )));
        }

        let (cols, rows) = w.grid_size();
        let cells = cols as u64 * rows as u64;
        if cells < 2 {
            return Err(Error::InvalidConfig("the grid needs at least two cells".into()));
        }
        if cols as u64 * CELL_COLUMNS as u64 > u16::MAX as u64 || rows > u16::MAX as u32 {
            return Err(Error::InvalidConfig(format!("a {}x{} grid doesn't fit in a terminal", cols, rows)));
        }

        if self.timing.update_interval_ms == 0 || self.timing.frame_interval_ms == 0 {
            return Err(Error::InvalidConfig("timing intervals must be positive".into()));
        }

        self.log.level_filter()?;
        Ok(())
    }

    /// Call only on a validated config.
    pub fn grid(&self) -> Grid {
        let (cols, rows) = self.window.grid_size();
        Grid::new(cols as u16, rows as u16)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub title: String,
    /// Logical window width in pixels
    pub pixel_width: u32,
    /// Logical window height in pixels
    pub pixel_height: u32,
    /// Side of one grid cell in pixels
    pub square_side: u32,
}

impl WindowConfig {
    /// Grid dimensions in cells; partial squares at the edges are dropped.
    pub fn grid_size(&self) -> (u32, u32) {
        (self.pixel_width / self.square_side, self.pixel_height / self.square_side)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: "La cobrita".to_string(), pixel_width: 800, pixel_height: 600, square_side: 20 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Time between simulation steps
    pub update_interval_ms: u64,
    /// Time between redraws
    pub frame_interval_ms: u64,
}

impl TimingConfig {
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { update_interval_ms: 150, frame_interval_ms: 16 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// off, error, warn, info, debug or trace
    pub level: String,
    /// The screen belongs to the game, so logs go to a file
    pub file: PathBuf,
}

impl LogConfig {
    pub fn level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.level)
            .map_err(|_| Error::InvalidConfig(format!("unknown log level '{}'", self.level)))
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), file: PathBuf::from("cobrita.log") }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.title, "La cobrita");
        assert_eq!(config.window.grid_size(), (40, 30));
        assert_eq!(config.timing.update_interval(), Duration::from_millis(150));
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
        assert_eq!(config.grid(), Grid::new(40, 30));
    }

    #[test]
    fn test_partial_squares_dropped() {
        let window = WindowConfig { pixel_width: 810, pixel_height: 619, ..Default::default() };
        assert_eq!(window.grid_size(), (40, 30));
    }

    #[test]
    fn test_rejects_zero_square() {
        let mut config = AppConfig::default();
        config.window.square_side = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_single_cell_grid() {
        let mut config = AppConfig::default();
        config.window.pixel_width = 20;
        config.window.pixel_height = 20;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_two_cell_grid_accepted() {
        let mut config = AppConfig::default();
        config.window.pixel_width = 40;
        config.window.pixel_height = 20;
        assert!(config.validate().is_ok());
        assert_eq!(config.grid(), Grid::new(2, 1));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let mut config = AppConfig::default();
        config.timing.update_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut log = LogConfig::default();
        assert_eq!(log.level_filter().unwrap(), LevelFilter::Info);
        log.level = "TRACE".into();
        assert_eq!(log.level_filter().unwrap(), LevelFilter::Trace);
        log.level = "loud".into();
        assert!(log.level_filter().is_err());
    }
}
