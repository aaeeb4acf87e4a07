//! Search lifecycle handlers.
//!
//! A search is one browser-automation task: created with a prompt, watched
//! through its live preview URL, and resolved into a canonical product list
//! once the task reaches a terminal state.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use launchwatch_client::ClientError;
use launchwatch_core::{ExtractionResult, DEFAULT_SEARCH_PROMPT};
use launchwatch_extract::extract_products;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;
use crate::store::SearchRecord;

#[derive(Debug, Default, Deserialize)]
pub(super) struct CreateSearchRequest {
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    llm_model: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchCreatedData {
    task_id: String,
    live_url: Option<String>,
    status: &'static str,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchStatusData {
    task_id: String,
    status: String,
    live_url: Option<String>,
    result: Option<ExtractionResult>,
}

#[derive(Debug, Serialize)]
pub(super) struct PromptData {
    prompt: &'static str,
}

/// `POST /api/v1/searches` — submits a discovery task.
///
/// An omitted or blank prompt falls back to the built-in discovery prompt;
/// an omitted model falls back to the configured one. The live preview URL
/// is best-effort: the task is usable without it, so a missing URL degrades
/// to `null` rather than failing the request.
pub(super) async fn create_search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Option<Json<CreateSearchRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<SearchCreatedData>>), ApiError> {
    let Json(body) = body.unwrap_or_default();

    let prompt = body
        .prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_SEARCH_PROMPT)
        .to_owned();
    let llm_model = body
        .llm_model
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(&state.config.model)
        .to_owned();

    let created = state
        .client
        .run_task(&prompt, &llm_model)
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;

    let live_url = match created.live_url {
        Some(url) => Some(url),
        None => {
            match state
                .client
                .wait_for_live_url(
                    &created.id,
                    state.config.live_url_max_attempts,
                    state.config.live_url_retry_interval_secs,
                )
                .await
            {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!(task_id = %created.id, error = %e, "live URL unavailable");
                    None
                }
            }
        }
    };

    state.store.insert(SearchRecord {
        task_id: created.id.clone(),
        prompt,
        llm_model,
        live_url: live_url.clone(),
        created_at: Utc::now(),
        final_status: None,
        result: None,
    });

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: SearchCreatedData {
                task_id: created.id,
                live_url,
                status: "created",
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// `GET /api/v1/searches/{task_id}` — reports a search's progress.
///
/// Completed searches come straight from the store cache. Otherwise the
/// upstream status is polled; on a terminal status the full task detail is
/// fetched, run through extraction, and cached for subsequent polls. Task
/// ids the store has never seen are still polled upstream, so searches
/// survive a server restart as long as the caller kept the id.
pub(super) async fn get_search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(task_id): Path<String>,
) -> Result<Json<ApiResponse<SearchStatusData>>, ApiError> {
    let record = state.store.get(&task_id);

    if let Some(rec) = &record {
        if let (Some(status), Some(result)) = (&rec.final_status, &rec.result) {
            return Ok(Json(ApiResponse {
                data: SearchStatusData {
                    task_id,
                    status: status.clone(),
                    live_url: rec.live_url.clone(),
                    result: Some(result.clone()),
                },
                meta: ResponseMeta::new(req_id.0),
            }));
        }
    }

    let status = state
        .client
        .task_status(&task_id)
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;

    if status.is_terminal() {
        let detail = state
            .client
            .task_detail(&task_id)
            .await
            .map_err(|e| map_client_error(req_id.0.clone(), &e))?;
        let result = extract_products(&detail, &state.settings);
        state.store.complete(&task_id, status.as_str(), result.clone());

        let live_url = record
            .and_then(|r| r.live_url)
            .or_else(|| live_url_from_detail(&detail));
        return Ok(Json(ApiResponse {
            data: SearchStatusData {
                task_id,
                status: status.as_str().to_owned(),
                live_url,
                result: Some(result),
            },
            meta: ResponseMeta::new(req_id.0),
        }));
    }

    // Still running. The stored live URL is preferred; failing that, one
    // detail fetch — the session may have come up since creation.
    let live_url = match record.and_then(|r| r.live_url) {
        Some(url) => Some(url),
        None => match state.client.task_detail(&task_id).await {
            Ok(detail) => live_url_from_detail(&detail),
            Err(e) => {
                tracing::warn!(task_id, error = %e, "detail fetch for live URL failed");
                None
            }
        },
    };

    Ok(Json(ApiResponse {
        data: SearchStatusData {
            task_id,
            status: status.as_str().to_owned(),
            live_url,
            result: None,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /api/v1/prompt` — exposes the built-in discovery prompt so clients
/// can show or pre-fill it.
pub(super) async fn get_prompt(
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<PromptData>> {
    Json(ApiResponse {
        data: PromptData {
            prompt: DEFAULT_SEARCH_PROMPT,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

fn live_url_from_detail(detail: &Value) -> Option<String> {
    detail
        .get("live_url")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn map_client_error(request_id: String, error: &ClientError) -> ApiError {
    match error {
        ClientError::UnexpectedStatus { status: 404, .. } => {
            ApiError::new(request_id, "not_found", "task not found")
        }
        ClientError::RateLimited { .. } => ApiError::new(
            request_id,
            "rate_limited",
            "task service rate limit exceeded",
        ),
        _ => {
            tracing::error!(error = %error, "task service call failed");
            ApiError::new(request_id, "upstream_error", "task service call failed")
        }
    }
}
