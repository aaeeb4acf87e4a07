use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_base_url: String,
    pub model: String,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub categories_path: PathBuf,
    pub client_request_timeout_secs: u64,
    pub client_max_retries: u32,
    pub client_retry_backoff_base_secs: u64,
    pub live_url_max_attempts: u32,
    pub live_url_retry_interval_secs: u64,
    pub poll_interval_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"[redacted]")
            .field("api_base_url", &self.api_base_url)
            .field("model", &self.model)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("categories_path", &self.categories_path)
            .field(
                "client_request_timeout_secs",
                &self.client_request_timeout_secs,
            )
            .field("client_max_retries", &self.client_max_retries)
            .field(
                "client_retry_backoff_base_secs",
                &self.client_retry_backoff_base_secs,
            )
            .field("live_url_max_attempts", &self.live_url_max_attempts)
            .field(
                "live_url_retry_interval_secs",
                &self.live_url_retry_interval_secs,
            )
            .field("poll_interval_secs", &self.poll_interval_secs)
            .finish()
    }
}
