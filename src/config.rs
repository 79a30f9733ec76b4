//! Environment-driven settings. The binary takes no arguments or flags.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FPS: u64 = 30;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Simulation ticks per second.
    pub fps: u64,
    /// Custom layout file installed at startup.
    pub layout_path: Option<PathBuf>,
    /// Seed for a generated maze replacing the built-in one.
    pub maze_seed: Option<u64>,
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            layout_path: None,
            maze_seed: None,
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl Config {
    /// Environment variables:
    /// - `PACMAN_FPS` - simulation rate (default: 30)
    /// - `PACMAN_LAYOUT` - path to a custom layout file
    /// - `PACMAN_MAZE_SEED` - generate the maze from this seed
    /// - `PACMAN_LOG_DIR` - log directory (default: `logs`)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(fps) = parse::<u64>(lookup("PACMAN_FPS")).filter(|v| *v > 0) {
            config.fps = fps;
        }
        config.layout_path = lookup("PACMAN_LAYOUT")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        config.maze_seed = parse(lookup("PACMAN_MAZE_SEED"));
        if let Some(dir) = lookup("PACMAN_LOG_DIR").filter(|v| !v.trim().is_empty()) {
            config.log_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.fps.max(1))
    }
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}
