use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by the task service (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("task creation response for prompt of {prompt_len} chars carried no task id")]
    MissingTaskId { prompt_len: usize },

    #[error("no live URL for task {task_id} after {attempts} attempts")]
    LiveUrlUnavailable { task_id: String, attempts: u32 },
}
