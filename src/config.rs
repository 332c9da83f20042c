use crate::errors::{ParleyError, ParleyResult};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

/// Overrides the configured chat endpoint when set.
pub const ENDPOINT_ENV_VAR: &str = "PARLEY_ENDPOINT";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub endpoint: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000/chat".to_string(),
            log_level: "info".to_string(),
        }
    }
}

static CONFIG: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::default()));

pub fn initialize_config() -> ParleyResult<()> {
    let config_path = get_config_path()?;

    // Load the config file, writing the defaults on first run
    let mut config = if config_path.exists() {
        load_config(&config_path)?
    } else {
        let config = Config::default();
        write_config(&config_path, &config)?;
        config
    };

    if let Ok(endpoint) = env::var(ENDPOINT_ENV_VAR) {
        config.endpoint = endpoint;
    }

    validate_config(&config)?;

    *CONFIG.write().unwrap() = config;
    Ok(())
}

fn get_config_path() -> ParleyResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| ParleyError::config_error("Could not determine home directory"))?;

    Ok(home_dir.join(".config").join("parley").join("config.json"))
}

fn load_config(path: &Path) -> ParleyResult<Config> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ParleyError::config_error(format!("Failed to read config file: {}", e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| ParleyError::config_error(format!("Failed to parse config: {}", e)))
}

fn write_config(path: &Path, config: &Config) -> ParleyResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ParleyError::config_error(format!("Failed to create config directory: {}", e))
        })?;
    }

    let contents = serde_json::to_string_pretty(config)
        .map_err(|e| ParleyError::config_error(format!("Failed to serialize config: {}", e)))?;

    fs::write(path, contents)
        .map_err(|e| ParleyError::config_error(format!("Failed to write config file: {}", e)))
}

fn validate_config(config: &Config) -> ParleyResult<()> {
    if config.endpoint.is_empty() {
        return Err(ParleyError::config_error("Chat endpoint is required"));
    }

    if !config.endpoint.starts_with("http://") && !config.endpoint.starts_with("https://") {
        return Err(ParleyError::config_error(
            "Chat endpoint must be an http(s) URL",
        ));
    }

    if config.log_level.is_empty() {
        return Err(ParleyError::config_error("Log level is required"));
    }

    Ok(())
}

pub fn get_config() -> Config {
    CONFIG.read().unwrap().clone()
}
