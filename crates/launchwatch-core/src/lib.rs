mod app_config;
mod config;
mod model;
mod prompt;
mod settings;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use model::{DiscoveryPost, EngagementMetrics, ExtractionResult, ProductRecord};
pub use prompt::DEFAULT_SEARCH_PROMPT;
pub use settings::{load_settings, CategoryConfig, ExtractorSettings, SettingsFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read settings file {path}: {source}")]
    SettingsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file: {0}")]
    SettingsFileParse(#[from] serde_yaml::Error),

    #[error("settings validation failed: {0}")]
    Validation(String),
}
