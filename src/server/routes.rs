use crate::adapters::UploadSource;
use crate::core::{ColumnOption, Dataset, LoadedDataset, PlotSpec};
use crate::server::AppState;
use crate::utils::error::{ExplorerError, Result};
use axum::extract::{Multipart, Path, Query, State};
use axum::response::Html;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

const INDEX_HTML: &str = include_str!("../../assets/index.html");

#[derive(Debug, Deserialize)]
pub struct LoadUrlRequest {
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlotQuery {
    pub color_by: Option<String>,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn datasets(State(state): State<AppState>) -> Json<Vec<Dataset>> {
    Json(state.datasets.as_ref().clone())
}

pub async fn load_url(
    State(state): State<AppState>,
    Json(request): Json<LoadUrlRequest>,
) -> Result<Json<LoadedDataset>> {
    let loaded = state.engine.load_url(&request.url).await?;
    Ok(Json(loaded))
}

pub async fn load_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<LoadedDataset>> {
    while let Some(field) = multipart.next_field().await.map_err(invalid_upload)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.tsv").to_string();
        let bytes = field.bytes().await.map_err(invalid_upload)?;
        if bytes.is_empty() {
            return Err(ExplorerError::ValidationError {
                message: format!("{} is empty", file_name),
            });
        }

        let source = UploadSource::new(file_name, bytes.to_vec());
        let loaded = state.engine.load(&source).await?;
        return Ok(Json(loaded));
    }

    Err(ExplorerError::ValidationError {
        message: "multipart field 'file' is required".to_string(),
    })
}

pub async fn columns(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<ColumnOption>>> {
    Ok(Json(state.engine.columns(&session_id).await?))
}

pub async fn plot(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<PlotQuery>,
) -> Result<Json<PlotSpec>> {
    let plot = state
        .engine
        .plot(&session_id, query.color_by.as_deref())
        .await?;
    Ok(Json(plot))
}

fn invalid_upload(e: axum::extract::multipart::MultipartError) -> ExplorerError {
    ExplorerError::ValidationError {
        message: format!("invalid upload: {}", e.body_text()),
    }
}
