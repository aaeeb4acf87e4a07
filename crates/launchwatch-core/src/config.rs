use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_key = require("BROWSER_USE_API_KEY")?;

    let api_base_url = or_default("LAUNCHWATCH_API_BASE_URL", "https://api.browser-use.com");
    let model = or_default("LAUNCHWATCH_MODEL", "claude-sonnet-4-20250514");
    let bind_addr = parse_addr("LAUNCHWATCH_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("LAUNCHWATCH_LOG_LEVEL", "info");
    let categories_path = PathBuf::from(or_default(
        "LAUNCHWATCH_CATEGORIES_PATH",
        "./config/categories.yaml",
    ));

    let client_request_timeout_secs = parse_u64("LAUNCHWATCH_CLIENT_REQUEST_TIMEOUT_SECS", "30")?;
    let client_max_retries = parse_u32("LAUNCHWATCH_CLIENT_MAX_RETRIES", "3")?;
    let client_retry_backoff_base_secs =
        parse_u64("LAUNCHWATCH_CLIENT_RETRY_BACKOFF_BASE_SECS", "5")?;
    let live_url_max_attempts = parse_u32("LAUNCHWATCH_LIVE_URL_MAX_ATTEMPTS", "10")?;
    let live_url_retry_interval_secs = parse_u64("LAUNCHWATCH_LIVE_URL_RETRY_INTERVAL_SECS", "3")?;
    let poll_interval_secs = parse_u64("LAUNCHWATCH_POLL_INTERVAL_SECS", "5")?;

    Ok(AppConfig {
        api_key,
        api_base_url,
        model,
        bind_addr,
        log_level,
        categories_path,
        client_request_timeout_secs,
        client_max_retries,
        client_retry_backoff_base_secs,
        live_url_max_attempts,
        live_url_retry_interval_secs,
        poll_interval_secs,
    })
}
