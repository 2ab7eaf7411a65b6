use super::entities::{GameSetup, PlayerType, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use super::errors::AppError;
use directories::ProjectDirs;
use log::info;
use serde::Deserialize;
use std::fs::File;
use std::io::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default = "get_default_general_config")]
    pub general: GeneralConfig,

    #[serde(default = "get_default_server_config")]
    pub server: ServerConfig,

    #[serde(default = "get_default_game_config")]
    pub game: GameConfig,
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "get_default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "get_default_server_url")]
    pub url: String,
    #[serde(default = "get_default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct GameConfig {
    #[serde(default = "get_default_board_size")]
    pub size: u8,
    #[serde(default = "get_default_white_type")]
    pub white_type: PlayerType,
    #[serde(default = "get_default_black_type")]
    pub black_type: PlayerType,
    #[serde(default = "get_default_computer_move_delay_ms")]
    pub computer_move_delay_ms: u64,
}

/// Values given on the command line, taking precedence over the config file.
#[derive(Debug, Default)]
pub struct ConfigOverrides<'a> {
    pub server_url: Option<&'a str>,
    pub size: Option<&'a str>,
    pub white_type: Option<&'a str>,
    pub black_type: Option<&'a str>,
}

impl AppConfig {
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<(), AppError> {
        if let Some(url) = overrides.server_url {
            self.server.url = url.to_string();
        }

        if let Some(size) = overrides.size {
            self.game.size = size
                .parse()
                .map_err(|_| AppError::config(format!("invalid board size: {}", size)))?;
        }

        if let Some(white_type) = overrides.white_type {
            self.game.white_type = white_type.parse().map_err(AppError::config)?;
        }

        if let Some(black_type) = overrides.black_type {
            self.game.black_type = black_type.parse().map_err(AppError::config)?;
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.game.size) {
            return Err(AppError::config(format!(
                "board size must be between {} and {}, got {}",
                MIN_BOARD_SIZE, MAX_BOARD_SIZE, self.game.size
            )));
        }

        if self.server.url.is_empty() {
            return Err(AppError::config("server url is empty"));
        }

        Ok(())
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.general.tick_rate_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.timeout_ms)
    }

    pub fn computer_move_delay(&self) -> Duration {
        Duration::from_millis(self.game.computer_move_delay_ms)
    }

    pub fn default_setup(&self) -> GameSetup {
        GameSetup {
            size: self.game.size,
            white_type: self.game.white_type,
            black_type: self.game.black_type,
        }
    }
}

pub fn get_app_config(config_path: Option<&str>) -> Result<AppConfig, AppError> {
    let config_file_path: PathBuf = if let Some(str_value) = config_path {
        PathBuf::from(&str_value)
    } else {
        get_default_app_config_path()?
    };

    info!(
        "loading config from '{}'",
        config_file_path.to_string_lossy()
    );

    let config_file_content: String = if config_file_path.exists() {
        let mut file = File::open(&config_file_path).map_err(|e| {
            AppError::config(format!(
                "Error opening the file '{}': {}",
                &config_file_path.to_string_lossy(),
                &e.to_string()
            ))
        })?;
        let mut contents = String::new();

        file.read_to_string(&mut contents).map_err(|e| {
            AppError::config(format!(
                "Error reading the file '{}': {}",
                &config_file_path.to_string_lossy(),
                &e.to_string()
            ))
        })?;

        contents
    } else {
        "empty: true".to_string()
    };

    parse_app_config(&config_file_content).map_err(|e| {
        AppError::config(format!(
            "Error parsing content of the file '{}': {}",
            &config_file_path.to_string_lossy(),
            &e.message
        ))
    })
}

pub fn parse_app_config(content: &str) -> Result<AppConfig, AppError> {
    let config: AppConfig =
        serde_yaml::from_str(content).map_err(|e| AppError::config(e.to_string()))?;

    config.validate()?;

    Ok(config)
}

fn get_default_app_config_path() -> Result<PathBuf, AppError> {
    match ProjectDirs::from("Com", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_NAME")) {
        Some(proj_dirs) => {
            let config_file_path = proj_dirs.config_dir().join("config.yml");

            Ok(config_file_path)
        }
        None => Err(AppError::config("Can't get app project dir")),
    }
}

fn get_default_general_config() -> GeneralConfig {
    GeneralConfig {
        tick_rate_ms: get_default_tick_rate_ms(),
    }
}

fn get_default_server_config() -> ServerConfig {
    ServerConfig {
        url: get_default_server_url(),
        timeout_ms: get_default_timeout_ms(),
    }
}

fn get_default_game_config() -> GameConfig {
    GameConfig {
        size: get_default_board_size(),
        white_type: get_default_white_type(),
        black_type: get_default_black_type(),
        computer_move_delay_ms: get_default_computer_move_delay_ms(),
    }
}

fn get_default_tick_rate_ms() -> u64 {
    250
}

fn get_default_server_url() -> String {
    "http://localhost:8001".to_string()
}

fn get_default_timeout_ms() -> u64 {
    10_000
}

fn get_default_board_size() -> u8 {
    5
}

fn get_default_white_type() -> PlayerType {
    PlayerType::Human
}

fn get_default_black_type() -> PlayerType {
    PlayerType::Computer
}

fn get_default_computer_move_delay_ms() -> u64 {
    200
}
