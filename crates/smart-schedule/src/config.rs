//! Configuration management for the SmartSchedule CLI.
//!
//! Configuration is loaded from (in order of precedence):
//! 1. Command-line arguments
//! 2. Environment variables (SMART_SCHEDULE_*)
//! 3. Config file (~/.config/smart-schedule/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Schedule data file.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Directory served under `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Server host.
    #[serde(default = "default_host")]
    pub server_host: String,

    /// Server port.
    #[serde(default = "default_port")]
    pub server_port: u16,

    /// Enable permissive CORS.
    #[serde(default = "default_cors")]
    pub cors: bool,
}

fn default_data_file() -> PathBuf {
    PathBuf::from(schedule_server::server::DEFAULT_DATA_FILE)
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(schedule_server::server::DEFAULT_STATIC_DIR)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            static_dir: default_static_dir(),
            server_host: default_host(),
            server_port: default_port(),
            cors: default_cors(),
        }
    }
}

impl Config {
    /// Loads configuration from all sources.
    ///
    /// Reports warnings for configuration errors but falls back to defaults.
    pub fn load() -> Self {
        let config_path = Self::config_path();

        match Self::figment(&config_path).extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                // Report the error clearly to the user
                eprintln!("\x1b[33mWarning:\x1b[0m Configuration error, using defaults");
                eprintln!("  Config file: {}", config_path.display());
                eprintln!("  Error: {}", e);
                eprintln!();
                eprintln!("  To fix, edit or delete the config file:");
                eprintln!("    rm {}", config_path.display());
                eprintln!();
                Config::default()
            }
        }
    }

    fn figment(config_path: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("SMART_SCHEDULE_"))
    }

    /// Returns the path to the config file.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Returns the path to the config directory.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("smart-schedule")
    }

    /// Saves the current configuration to the config file.
    pub fn save(&self) -> Result<(), std::io::Error> {
        std::fs::create_dir_all(Self::config_dir())?;
        self.save_to(&Self::config_path())
    }

    fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        std::fs::write(path, toml_str)?;
        Ok(())
    }

    /// Sets the data file and saves.
    pub fn set_data_file(&mut self, path: impl Into<PathBuf>) -> Result<(), std::io::Error> {
        self.data_file = path.into();
        self.save()
    }

    /// Resets the data file to the default and saves.
    pub fn clear_data_file(&mut self) -> Result<(), std::io::Error> {
        self.data_file = default_data_file();
        self.save()
    }
}

/// Prints the current configuration and its sources.
pub fn show_config() {
    let config = Config::load();
    let config_path = Config::config_path();

    println!("SmartSchedule Configuration");
    println!("===========================\n");

    println!("Config file: {}", config_path.display());
    if config_path.exists() {
        println!("Status: Found\n");
    } else {
        println!("Status: Not found (using defaults)\n");
    }

    println!("Current settings:");
    println!("  data_file: {}", config.data_file.display());
    println!("  static_dir: {}", config.static_dir.display());
    println!("  server_host: {}", config.server_host);
    println!("  server_port: {}", config.server_port);
    println!("  cors: {}", config.cors);

    println!("\nEnvironment variables:");
    println!("  SMART_SCHEDULE_DATA_FILE");
    println!("  SMART_SCHEDULE_STATIC_DIR");
    println!("  SMART_SCHEDULE_SERVER_HOST");
    println!("  SMART_SCHEDULE_SERVER_PORT");
    println!("  SMART_SCHEDULE_CORS");
}
