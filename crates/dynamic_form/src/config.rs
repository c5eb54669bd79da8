use std::{env, path::Path, path::PathBuf};

use lazy_static::lazy_static;
use paths::PathContext;
use serde::Deserialize;
use tracing::info;

const DEFAULT_CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

/// Terminal UI settings, section `ui`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiSettings {
    /// Tick events per second.
    pub tick_rate: f64,
    /// Render events per second.
    pub frame_rate: f64,
    /// Form type selected on start; empty keeps the placeholder.
    pub initial_form_type: String,
    pub mouse: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tick_rate: 4.0,
            frame_rate: 30.0,
            initial_form_type: String::new(),
            mouse: false,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub ui: UiSettings,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    /// Embedded defaults, then `config.json5` / `config.toml` from the config
    /// directory, then `DYNAMIC_FORM__<SECTION>__<KEY>` environment variables.
    pub fn new(paths: &PathContext) -> Result<Self, config::ConfigError> {
        Self::load(&get_data_dir(paths), &get_config_dir(paths), true)
    }

    fn load(
        data_dir: &Path,
        config_dir: &Path,
        with_env: bool,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Json5,
            ))
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.toml", config::FileFormat::Toml),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            info!(
                "No configuration file in {}, using defaults",
                config_dir.display()
            );
        }

        if with_env {
            builder = builder.add_source(
                config::Environment::with_prefix(&PROJECT_NAME)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        builder.build()?.try_deserialize()
    }
}

pub fn get_data_dir(paths: &PathContext) -> PathBuf {
    DATA_FOLDER.clone().unwrap_or_else(|| paths.data_dir())
}

pub fn get_config_dir(paths: &PathContext) -> PathBuf {
    CONFIG_FOLDER.clone().unwrap_or_else(|| paths.config_dir())
}
