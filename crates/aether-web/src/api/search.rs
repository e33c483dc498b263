use axum::extract::{Query, State};
use axum::Json;

use super::run_blocking;
use crate::dto::{SearchQuery, SearchResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Global name search. Failures degrade to an empty result set; a search
/// cut off by the request deadline is flagged `truncated` and `timed_out`.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<SearchResponse> {
    let query = params.query.trim().to_string();
    if query.is_empty() {
        return Json(SearchResponse::empty(query));
    }

    let needle = query.clone();
    let outcome = run_blocking(&state, move |config, cancel| {
        aether_core::search(config, &needle, cancel)
    })
    .await;

    match outcome {
        Ok(outcome) => Json(SearchResponse {
            query,
            results: outcome.hits.into_iter().map(Into::into).collect(),
            truncated: outcome.truncated,
            timed_out: false,
        }),
        Err(AppError::Timeout) => {
            tracing::warn!("search for {query:?} hit the request deadline");
            Json(SearchResponse {
                truncated: true,
                timed_out: true,
                ..SearchResponse::empty(query)
            })
        }
        Err(e) => {
            tracing::error!("search for {query:?} failed: {e:?}");
            Json(SearchResponse::empty(query))
        }
    }
}
