use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{GeneratedImage, OutputConfig, SceneConfig};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewImage {
    pub model_id: String,
    pub url: String,
    pub prompt: String,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub seed: Option<u32>,
    #[serde(default)]
    pub campaign_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageListParams {
    pub model_id: Option<String>,
    pub campaign_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagsRequest {
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignAssignment {
    pub campaign_id: Option<String>,
}

pub async fn create_images(
    State(state): State<AppState>,
    Json(request): Json<Vec<NewImage>>,
) -> ApiResult<(StatusCode, Json<Vec<GeneratedImage>>)> {
    let mut stored = Vec::with_capacity(request.len());
    for entry in request {
        let image = GeneratedImage {
            id: Uuid::new_v4().to_string(),
            model_id: entry.model_id,
            url: entry.url,
            prompt: entry.prompt,
            scene: entry.scene,
            output: entry.output,
            created_at: Utc::now(),
            tags: entry.tags,
            is_favorite: entry.is_favorite,
            seed: entry.seed,
            campaign_id: entry.campaign_id,
        };
        state.db.insert_image(&image).await?;
        stored.push(image);
    }
    info!("Stored {} gallery image(s)", stored.len());

    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn list_images(
    State(state): State<AppState>,
    Query(params): Query<ImageListParams>,
) -> ApiResult<Json<Vec<GeneratedImage>>> {
    let images = state
        .db
        .list_images(params.model_id.as_deref(), params.campaign_id.as_deref())
        .await?;
    Ok(Json(images))
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<GeneratedImage>> {
    let image = state
        .db
        .toggle_image_favorite(&id)
        .await?
        .ok_or(ApiError::NotFound("Image"))?;
    Ok(Json(image))
}

pub async fn set_tags(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<TagsRequest>,
) -> ApiResult<Json<GeneratedImage>> {
    if !state.db.set_image_tags(&id, &request.tags).await? {
        return Err(ApiError::NotFound("Image"));
    }
    let image = state
        .db
        .get_image(&id)
        .await?
        .ok_or(ApiError::NotFound("Image"))?;
    Ok(Json(image))
}

pub async fn assign_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CampaignAssignment>,
) -> ApiResult<Json<GeneratedImage>> {
    if !state
        .db
        .assign_image_campaign(&id, request.campaign_id.as_deref())
        .await?
    {
        return Err(ApiError::NotFound("Image"));
    }
    let image = state
        .db
        .get_image(&id)
        .await?
        .ok_or(ApiError::NotFound("Image"))?;
    Ok(Json(image))
}

pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.db.delete_image(&id).await? {
        return Err(ApiError::NotFound("Image"));
    }
    Ok(StatusCode::NO_CONTENT)
}
