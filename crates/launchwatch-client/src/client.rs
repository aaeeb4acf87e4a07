use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};

use crate::error::ClientError;
use crate::retry::retry_with_backoff;
use crate::types::{TaskCreated, TaskStatus};

/// HTTP client for the browser-automation task service.
///
/// Covers the task lifecycle: create a run, poll its status, fetch the full
/// task detail, and wait for the live preview URL that the service attaches
/// once the browser session is up. Transient errors (429, network failures)
/// are retried with exponential backoff up to `max_retries` extra attempts.
pub struct BrowserTaskClient {
    client: Client,
    base_url: String,
    api_key: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl BrowserTaskClient {
    /// Creates a client with configured timeout and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Submits a new browser task running `prompt` under `llm_model`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::MissingTaskId`] — the service accepted the task but
    ///   returned no id to poll, which leaves the run unreachable.
    /// - [`ClientError::RateLimited`] / [`ClientError::Http`] — after all
    ///   retries are exhausted.
    /// - [`ClientError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`ClientError::Deserialize`] — the response body is not valid JSON.
    pub async fn run_task(&self, prompt: &str, llm_model: &str) -> Result<TaskCreated, ClientError> {
        let url = format!("{}/api/v1/run-task", self.base_url);
        let body = json!({ "task": prompt, "llm_model": llm_model });

        let value = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            let body = body.clone();
            async move {
                let response = self
                    .client
                    .post(&url)
                    .bearer_auth(&self.api_key)
                    .json(&body)
                    .send()
                    .await?;
                parse_json_response(response, "task creation").await
            }
        })
        .await?;

        let id = value
            .get("id")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(ClientError::MissingTaskId {
                prompt_len: prompt.len(),
            })?
            .to_owned();
        let live_url = value
            .get("live_url")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        tracing::info!(task_id = %id, live_url_present = live_url.is_some(), "task created");
        Ok(TaskCreated { id, live_url })
    }

    /// Fetches the task's lifecycle state. The service returns it as a bare
    /// JSON string (`"running"`).
    ///
    /// # Errors
    ///
    /// Same surface as [`Self::run_task`], minus `MissingTaskId`.
    pub async fn task_status(&self, task_id: &str) -> Result<TaskStatus, ClientError> {
        let url = format!("{}/api/v1/task/{task_id}/status", self.base_url);

        let value = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .bearer_auth(&self.api_key)
                    .send()
                    .await?;
                parse_json_response(response, "task status").await
            }
        })
        .await?;

        serde_json::from_value(value).map_err(|e| ClientError::Deserialize {
            context: format!("status of task {task_id}"),
            source: e,
        })
    }

    /// Fetches the full task detail payload.
    ///
    /// Returned as raw JSON: the shape varies across service versions and
    /// models, and the extraction pipeline is built to resolve it itself.
    ///
    /// # Errors
    ///
    /// Same surface as [`Self::task_status`].
    pub async fn task_detail(&self, task_id: &str) -> Result<Value, ClientError> {
        let url = format!("{}/api/v1/task/{task_id}", self.base_url);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .bearer_auth(&self.api_key)
                    .send()
                    .await?;
                parse_json_response(response, "task detail").await
            }
        })
        .await
    }

    /// Polls the task detail until a live preview URL appears.
    ///
    /// The service attaches `live_url` only once the browser session is up,
    /// typically a few seconds after creation. Polls at a fixed
    /// `interval_secs` cadence, up to `max_attempts` fetches.
    ///
    /// # Errors
    ///
    /// - [`ClientError::LiveUrlUnavailable`] — no URL after all attempts.
    /// - Any error from [`Self::task_detail`].
    pub async fn wait_for_live_url(
        &self,
        task_id: &str,
        max_attempts: u32,
        interval_secs: u64,
    ) -> Result<String, ClientError> {
        for attempt in 1..=max_attempts {
            let detail = self.task_detail(task_id).await?;
            if let Some(live_url) = detail
                .get("live_url")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
            {
                tracing::debug!(task_id, attempt, "live URL available");
                return Ok(live_url.to_owned());
            }
            if attempt < max_attempts {
                tokio::time::sleep(Duration::from_secs(interval_secs)).await;
            }
        }
        Err(ClientError::LiveUrlUnavailable {
            task_id: task_id.to_owned(),
            attempts: max_attempts,
        })
    }

    /// Polls the task status until it reaches a terminal state, then returns
    /// the final task detail. The caller bounds the wait (the CLI uses a
    /// `tokio::time::timeout` around this call).
    ///
    /// # Errors
    ///
    /// Any error from [`Self::task_status`] or [`Self::task_detail`].
    pub async fn wait_until_done(
        &self,
        task_id: &str,
        poll_interval_secs: u64,
    ) -> Result<Value, ClientError> {
        loop {
            let status = self.task_status(task_id).await?;
            tracing::debug!(task_id, status = status.as_str(), "polled task status");
            if status.is_terminal() {
                return self.task_detail(task_id).await;
            }
            tokio::time::sleep(Duration::from_secs(poll_interval_secs)).await;
        }
    }
}

/// Maps the HTTP status to the typed error surface and parses the body as
/// JSON on success.
async fn parse_json_response(
    response: reqwest::Response,
    context: &str,
) -> Result<Value, ClientError> {
    let status = response.status();
    let url = response.url().to_string();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);
        return Err(ClientError::RateLimited { retry_after_secs });
    }

    if !status.is_success() {
        return Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
            url,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}
