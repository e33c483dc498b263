pub mod files;
pub mod search;

use aether_core::{CancellationToken, CoreResult, RootConfig};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/browse", get(files::browse))
        .route("/info", get(files::info))
        .route("/preview", get(files::preview))
        .route("/download", get(files::download))
        .route("/raw", get(files::raw))
        .route("/search", get(search::search))
        .route("/health", get(health))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Runs a blocking core operation on the blocking pool under the request deadline.
///
/// The token handed to `op` is cancelled when the deadline passes or when
/// this future is dropped (client went away), so long walks and reads stop.
pub(crate) async fn run_blocking<T, F>(state: &AppState, op: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&RootConfig, &CancellationToken) -> CoreResult<T> + Send + 'static,
{
    let token = CancellationToken::new();
    let _cancel_on_drop = token.clone().drop_guard();

    let config = state.config.clone();
    let worker_token = token.clone();
    let task = tokio::task::spawn_blocking(move || op(&config, &worker_token));

    match tokio::time::timeout(state.request_timeout, task).await {
        Ok(Ok(result)) => result.map_err(AppError::from),
        Ok(Err(join_err)) => Err(AppError::Internal(format!(
            "filesystem worker failed: {join_err}"
        ))),
        Err(_) => {
            token.cancel();
            tracing::warn!("filesystem operation exceeded {:?}", state.request_timeout);
            Err(AppError::Timeout)
        }
    }
}

/// `?path=` query string for a root-relative path.
pub(crate) fn path_query(endpoint: &str, relative: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("path", relative)
        .finish();
    format!("/api/{endpoint}?{query}")
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn health_reports_ok() {
        let (_tmp, _config, router) = app(1024);
        let (status, body) = get_json(&router, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[test]
    fn path_query_encodes_reserved_characters() {
        assert_eq!(
            path_query("raw", "docs/a b&c.png"),
            "/api/raw?path=docs%2Fa+b%26c.png"
        );
    }

    #[tokio::test]
    async fn run_blocking_times_out_and_cancels() {
        let (_tmp, config, _router) = app(1024);
        let state = AppState {
            config,
            request_timeout: std::time::Duration::from_millis(50),
        };
        let (seen_tx, seen_rx) = std::sync::mpsc::channel();

        let result: Result<(), AppError> = run_blocking(&state, move |_, token| {
            while !token.is_cancelled() {
                std::thread::sleep(std::time::Duration::from_millis(5));
            }
            seen_tx.send(()).unwrap();
            Err(aether_core::CoreError::Cancelled)
        })
        .await;

        assert!(matches!(result, Err(AppError::Timeout)));
        seen_rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("worker observed cancellation");
    }
}
