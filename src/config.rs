use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub snakes: SnakesConfig,
    #[serde(default)]
    pub rewards: RewardsConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_cols")]
    pub cols: i32,
    #[serde(default = "default_rows")]
    pub rows: i32,
    #[serde(default = "default_stone_count")]
    pub stone_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SnakesConfig {
    #[serde(default = "default_snake_count")]
    pub count: usize,
    /// Fixed RNG seed for reproducible runs; omit for entropy seeding
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct RewardsConfig {
    #[serde(default = "default_spawn_interval")]
    pub spawn_interval_ticks: u64,
    #[serde(default = "default_max_active")]
    pub max_active: usize,
    #[serde(default = "default_min_value")]
    pub min_value: u8,
    #[serde(default = "default_max_value")]
    pub max_value: u8,
}

#[derive(Debug, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: f64,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_enable_decision_log")]
    pub enable_decision_log: bool,
    #[serde(default = "default_decision_log_path")]
    pub decision_log_path: String,
}

// Default values
fn default_cols() -> i32 { 30 }
fn default_rows() -> i32 { 30 }
fn default_stone_count() -> usize { 25 }
fn default_snake_count() -> usize { 2 }
fn default_spawn_interval() -> u64 { 8 }
fn default_max_active() -> usize { 6 }
fn default_min_value() -> u8 { 1 }
fn default_max_value() -> u8 { 9 }
fn default_cell_size() -> f32 { 24.0 }
fn default_tick_seconds() -> f64 { 0.12 }
fn default_bg_r() -> u8 { 30 }
fn default_bg_g() -> u8 { 30 }
fn default_bg_b() -> u8 { 30 }
fn default_enable_decision_log() -> bool { true }
fn default_decision_log_path() -> String { "decision_log.json".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: default_cols(),
            rows: default_rows(),
            stone_count: default_stone_count(),
        }
    }
}

impl Default for SnakesConfig {
    fn default() -> Self {
        Self {
            count: default_snake_count(),
            seed: None,
        }
    }
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ticks: default_spawn_interval(),
            max_active: default_max_active(),
            min_value: default_min_value(),
            max_value: default_max_value(),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            tick_seconds: default_tick_seconds(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_decision_log: default_enable_decision_log(),
            decision_log_path: default_decision_log_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            snakes: SnakesConfig::default(),
            rewards: RewardsConfig::default(),
            visual: VisualConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Self {
        match fs::read_to_string("config.toml") {
            Ok(contents) => {
                match toml::from_str(&contents) {
                    Ok(config) => {
                        println!("Loaded configuration from config.toml");
                        config
                    }
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config.toml: {}", e);
                        eprintln!("Using default configuration");
                        Config::default()
                    }
                }
            }
            Err(_) => {
                println!("No config.toml found, using default configuration");
                Config::default()
            }
        }
    }
}
