use aether_core::{Classification, OpenedFile};
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio_util::io::ReaderStream;

use super::{path_query, run_blocking};
use crate::dto::{BrowseResponse, FileEntryDto, FileInfoDto, PathQuery, PreviewResponse};
use crate::error::AppError;
use crate::state::AppState;

pub async fn browse(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<BrowseResponse>, AppError> {
    let (current, entries) = run_blocking(&state, move |config, _| {
        let resolved = aether_core::resolve(config, &query.path)?;
        let entries = aether_core::list_directory(config, &query.path)?;
        Ok((resolved.relative().to_string(), entries))
    })
    .await?;

    Ok(Json(BrowseResponse {
        parent_path: aether_core::parent_path(&current).to_string(),
        breadcrumbs: aether_core::breadcrumbs(&current)
            .into_iter()
            .map(Into::into)
            .collect(),
        entries: entries.iter().map(FileEntryDto::from).collect(),
        current_path: current,
    }))
}

pub async fn info(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<FileInfoDto>, AppError> {
    let dto = run_blocking(&state, move |config, _| {
        let info = aether_core::file_info(config, &query.path)?;
        let kind = if info.is_dir() {
            "directory"
        } else {
            let resolved = aether_core::resolve(config, &query.path)?;
            aether_core::classify(config, resolved.absolute()).as_str()
        };
        Ok(FileInfoDto::new(&info, kind))
    })
    .await?;

    Ok(Json(dto))
}

/// Picks a rendering mode: inline text, an image URL, or a download link.
pub async fn preview(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<PreviewResponse>, AppError> {
    let response = run_blocking(&state, move |config, cancel| {
        let info = aether_core::file_info(config, &query.path)?;
        if info.is_dir() {
            return Err(aether_core::CoreError::NotFound(query.path.clone()));
        }
        let path = info.relative_path().to_string();
        let name = info.name().to_string();
        let size = info.size();
        let download_url = path_query("download", &path);

        let resolved = aether_core::resolve(config, &path)?;
        let response = match aether_core::classify(config, resolved.absolute()) {
            Classification::Text => {
                let text = aether_core::read_preview(config, &path, cancel)?;
                PreviewResponse::Text {
                    content: text.content,
                    truncated: text.truncated,
                    path,
                    name,
                    size,
                    download_url,
                }
            }
            Classification::Image => {
                let dims = aether_core::read_image_info(config, &path)?;
                PreviewResponse::Image {
                    url: path_query("raw", &path),
                    width: dims.as_ref().map(|d| d.width),
                    height: dims.as_ref().map(|d| d.height),
                    format: dims.map(|d| d.format),
                    path,
                    name,
                    size,
                    download_url,
                }
            }
            Classification::Other => PreviewResponse::Download {
                path,
                name,
                size,
                download_url,
            },
        };
        Ok(response)
    })
    .await?;

    Ok(Json(response))
}

/// Streams a file as an attachment.
pub async fn download(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Response, AppError> {
    let opened = open(&state, query.path).await?;
    Ok(stream_file(opened, true))
}

/// Streams a file inline. Only images are rendered in place; anything else
/// is forced to download so the browser never executes served content.
pub async fn raw(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Response, AppError> {
    let opened = open(&state, query.path).await?;
    let attachment = opened.classification != Classification::Image;
    Ok(stream_file(opened, attachment))
}

async fn open(state: &AppState, path: String) -> Result<OpenedFile, AppError> {
    run_blocking(state, move |config, _| aether_core::open_file(config, &path)).await
}

fn stream_file(opened: OpenedFile, attachment: bool) -> Response {
    let disposition = content_disposition(opened.info.name(), attachment);
    let length = opened.info.size().to_string();
    let body = Body::from_stream(ReaderStream::new(tokio::fs::File::from_std(opened.file)));

    (
        [
            (header::CONTENT_TYPE, opened.content_type),
            (header::CONTENT_LENGTH, length),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

/// `Content-Disposition` with an ASCII fallback name and an RFC 5987 UTF-8 name.
fn content_disposition(name: &str, attachment: bool) -> String {
    let kind = if attachment { "attachment" } else { "inline" };
    let fallback: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let encoded = url::form_urlencoded::byte_serialize(name.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    format!("{kind}; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}
