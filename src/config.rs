/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to defaults if the file is missing or incomplete. Problems are
/// collected in `warnings` rather than printed, because the terminal belongs
/// to the display; the binary logs them once logging is up.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;

use crate::domain::colour::Theme;
use crate::domain::geometry::Size;
use crate::logging::level_from_name;
use crate::sim::clock::{Idle, IdleKind};
use crate::sim::game_loop::{interval_for, DEFAULT_MAX_UPDATES, DEFAULT_UPDATE_HZ};
use crate::ui::layout::{Layout, UiPlacement};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub timing: TimingConfig,
    pub display: DisplayConfig,
    pub theme: Theme,
    pub world: WorldConfig,
    pub log: LogConfig,
    /// Problems met while loading, for the log.
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub update_hz: u32,
    pub max_updates_before_render: u32,
    pub idle: Idle,
}

impl TimingConfig {
    pub fn interval(&self) -> Duration {
        interval_for(self.update_hz)
    }
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub ui_location: UiPlacement,
    pub ui_size: usize,
    pub game_width: usize,
    pub game_height: usize,
    pub max_width: usize,
    pub max_height: usize,
}

impl DisplayConfig {
    pub fn layout(&self) -> Layout {
        Layout::new(
            self.ui_location,
            self.ui_size,
            self.game_width,
            self.game_height,
            Size::new(self.max_width, self.max_height),
        )
    }
}

#[derive(Clone, Debug)]
pub struct WorldConfig {
    pub object_size: Size,
    pub map: PathBuf,
    pub assets_dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub file: PathBuf,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    theme: Theme,
    #[serde(default)]
    world: TomlWorld,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_update_hz")]
    update_hz: u32,
    #[serde(default = "default_max_updates")]
    max_updates_before_render: u32,
    #[serde(default = "default_idle")]
    idle: IdleKind,
    #[serde(default = "default_idle_sleep_ms")]
    idle_sleep_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_ui_location")]
    ui_location: UiPlacement,
    #[serde(default = "default_ui_size")]
    ui_size: usize,
    #[serde(default = "default_game_width")]
    game_width: usize,
    #[serde(default = "default_game_height")]
    game_height: usize,
    #[serde(default = "default_max_width")]
    max_width: usize,
    #[serde(default = "default_max_height")]
    max_height: usize,
}

#[derive(Deserialize, Debug)]
struct TomlWorld {
    #[serde(default = "default_object_width")]
    object_width: usize,
    #[serde(default = "default_object_height")]
    object_height: usize,
    #[serde(default = "default_map")]
    map: String,
    #[serde(default = "default_assets_dir")]
    assets_dir: String,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_level")]
    level: String,
    #[serde(default = "default_log_file")]
    file: String,
}

// ── Defaults ──

fn default_update_hz() -> u32 { DEFAULT_UPDATE_HZ }
fn default_max_updates() -> u32 { DEFAULT_MAX_UPDATES }
fn default_idle() -> IdleKind { IdleKind::Yield }
fn default_idle_sleep_ms() -> u64 { 1 }

fn default_ui_location() -> UiPlacement { UiPlacement::Bottom }
fn default_ui_size() -> usize { 6 }
fn default_game_width() -> usize { 80 }
fn default_game_height() -> usize { 18 }
fn default_max_width() -> usize { 120 }
fn default_max_height() -> usize { 50 }

fn default_object_width() -> usize { 4 }
fn default_object_height() -> usize { 2 }
fn default_map() -> String { "levels/map1.txt".into() }
fn default_assets_dir() -> String { "assets".into() }

fn default_log_level() -> String { "info".into() }
fn default_log_file() -> String { "log/cellgrid.log".into() }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            update_hz: default_update_hz(),
            max_updates_before_render: default_max_updates(),
            idle: default_idle(),
            idle_sleep_ms: default_idle_sleep_ms(),
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay {
            ui_location: default_ui_location(),
            ui_size: default_ui_size(),
            game_width: default_game_width(),
            game_height: default_game_height(),
            max_width: default_max_width(),
            max_height: default_max_height(),
        }
    }
}

impl Default for TomlWorld {
    fn default() -> Self {
        TomlWorld {
            object_width: default_object_width(),
            object_height: default_object_height(),
            map: default_map(),
            assets_dir: default_assets_dir(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

// ── Loading ──

impl EngineConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let mut warnings = Vec::new();
        let toml_cfg = load_toml(&search_dirs, &mut warnings);
        EngineConfig::resolve(toml_cfg, &search_dirs, warnings)
    }

    /// Parse config text directly; relative paths are kept as given.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(EngineConfig::resolve(toml_cfg, &[], Vec::new()))
    }

    fn resolve(cfg: TomlConfig, search_dirs: &[PathBuf], mut warnings: Vec<String>) -> Self {
        if cfg.timing.update_hz == 0 {
            warnings.push("timing.update_hz = 0; using 1".into());
        }
        if cfg.world.object_width == 0 || cfg.world.object_height == 0 {
            warnings.push("world object size has a zero side; using 1".into());
        }
        let level = level_from_name(&cfg.log.level);
        if !cfg.log.level.eq_ignore_ascii_case(&level.to_string()) {
            warnings.push(format!("unknown log level {:?}; using info", cfg.log.level));
        }

        EngineConfig {
            timing: TimingConfig {
                update_hz: cfg.timing.update_hz.max(1),
                max_updates_before_render: cfg.timing.max_updates_before_render.max(1),
                idle: Idle::from_config(cfg.timing.idle, cfg.timing.idle_sleep_ms),
            },
            display: DisplayConfig {
                ui_location: cfg.display.ui_location,
                ui_size: cfg.display.ui_size,
                game_width: cfg.display.game_width,
                game_height: cfg.display.game_height,
                max_width: cfg.display.max_width,
                max_height: cfg.display.max_height,
            },
            theme: cfg.theme,
            world: WorldConfig {
                object_size: Size::new(cfg.world.object_width.max(1), cfg.world.object_height.max(1)),
                map: find_in(search_dirs, &cfg.world.map),
                assets_dir: find_in(search_dirs, &cfg.world.assets_dir),
            },
            log: LogConfig {
                level,
                file: PathBuf::from(&cfg.log.file),
            },
            warnings,
        }
    }
}

/// Absolute paths as-is; relative ones resolved against the first search
/// dir where they exist, else left relative to the CWD.
fn find_in(search_dirs: &[PathBuf], rel: &str) -> PathBuf {
    let path = Path::new(rel);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    search_dirs
        .iter()
        .map(|d| d.join(path))
        .find(|p| p.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        warnings.push(format!("{} parse error, using defaults: {e}", path.display()));
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    warnings.push(format!("could not read {}: {e}", path.display()));
                }
            }
        }
    }
    TomlConfig::default()
}
