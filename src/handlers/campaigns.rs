use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::handlers::generate::execute;
use crate::pipeline::GenerationRequest;
use crate::prompt::build_prompt;
use crate::replicate::{BackendVariant, GenerationOptions};
use crate::state::AppState;
use crate::types::{
    Campaign, GeneratedImage, ImageQuality, OutputConfig, OutputFormat, Persona, SceneConfig,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCampaignRequest {
    pub name: String,
    pub description: String,
    pub brand_name: String,
    pub brand_colors: Vec<String>,
    pub mood: String,
    pub target_platforms: Vec<String>,
    pub model_ids: Vec<String>,
    pub content_brief: String,
    pub product_images: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCampaignRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand_name: Option<String>,
    pub brand_colors: Option<Vec<String>>,
    pub mood: Option<String>,
    pub target_platforms: Option<Vec<String>>,
    pub model_ids: Option<Vec<String>>,
    pub content_brief: Option<String>,
    pub product_images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignGenerateRequest {
    pub api_key: String,
}

pub async fn create_campaign(
    State(state): State<AppState>,
    Json(request): Json<CreateCampaignRequest>,
) -> ApiResult<(StatusCode, Json<Campaign>)> {
    let now = Utc::now();
    let campaign = Campaign {
        id: Uuid::new_v4().to_string(),
        name: request.name,
        description: request.description,
        brand_name: request.brand_name,
        brand_colors: request.brand_colors,
        mood: request.mood,
        target_platforms: request.target_platforms,
        model_ids: request.model_ids,
        content_brief: request.content_brief,
        product_images: request.product_images,
        created_at: now,
        updated_at: now,
    };
    state.db.insert_campaign(&campaign).await?;
    info!("Campaign {} created", campaign.id);

    Ok((StatusCode::CREATED, Json(campaign)))
}

pub async fn list_campaigns(State(state): State<AppState>) -> ApiResult<Json<Vec<Campaign>>> {
    Ok(Json(state.db.list_campaigns().await?))
}

pub async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Campaign>> {
    let campaign = state
        .db
        .get_campaign(&id)
        .await?
        .ok_or(ApiError::NotFound("Campaign"))?;
    Ok(Json(campaign))
}

pub async fn update_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCampaignRequest>,
) -> ApiResult<Json<Campaign>> {
    let mut campaign = state
        .db
        .get_campaign(&id)
        .await?
        .ok_or(ApiError::NotFound("Campaign"))?;

    apply_updates(&mut campaign, request);
    campaign.updated_at = Utc::now();
    if !state.db.update_campaign(&campaign).await? {
        return Err(ApiError::NotFound("Campaign"));
    }

    Ok(Json(campaign))
}

pub async fn delete_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.db.delete_campaign(&id).await? {
        return Err(ApiError::NotFound("Campaign"));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn generate_for_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CampaignGenerateRequest>,
) -> ApiResult<(StatusCode, Json<GeneratedImage>)> {
    let campaign = state
        .db
        .get_campaign(&id)
        .await?
        .ok_or(ApiError::NotFound("Campaign"))?;

    let personas = state.db.list_personas().await?;
    let persona = pick_persona(&personas, &campaign).ok_or_else(|| {
        ApiError::BadRequest("No AI models available. Create one first.".to_string())
    })?;

    let scene = campaign_scene(&campaign);
    let prompt = build_prompt(persona, &scene);
    let generation = GenerationRequest {
        variant: BackendVariant::Kontext,
        options: GenerationOptions {
            prompt: prompt.clone(),
            aspect_ratio: "4:5".to_string(),
            seed: persona.seed,
            output_format: OutputFormat::Png,
            output_quality: 95,
            ..GenerationOptions::default()
        },
        enhance: true,
        overlay_text: None,
        product_image: None,
    };
    let outcome = execute(&request.api_key, generation).await?;

    let image = GeneratedImage {
        id: Uuid::new_v4().to_string(),
        model_id: persona.id.clone(),
        url: outcome.image,
        prompt,
        scene,
        output: OutputConfig {
            aspect_ratio: "4:5".to_string(),
            quality: ImageQuality::Hd,
            count: 1,
            format: OutputFormat::Png,
        },
        created_at: Utc::now(),
        tags: campaign_tags(&campaign),
        is_favorite: false,
        seed: None,
        campaign_id: Some(campaign.id.clone()),
    };
    state.db.insert_image(&image).await?;
    info!("Campaign {} image stored as {}", campaign.id, image.id);

    Ok((StatusCode::CREATED, Json(image)))
}

fn pick_persona<'a>(personas: &'a [Persona], campaign: &Campaign) -> Option<&'a Persona> {
    personas
        .iter()
        .find(|persona| campaign.model_ids.contains(&persona.id))
        .or_else(|| personas.first())
}

pub(crate) fn campaign_scene(campaign: &Campaign) -> SceneConfig {
    let mood = if campaign.mood.is_empty() {
        "Empowering".to_string()
    } else {
        campaign.mood.clone()
    };
    let custom_prompt = [
        campaign.content_brief.clone(),
        if campaign.brand_name.is_empty() {
            String::new()
        } else {
            format!("for {} brand campaign", campaign.brand_name)
        },
        if campaign.product_images.is_empty() {
            String::new()
        } else {
            "holding/showcasing a branded product".to_string()
        },
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(". ");

    SceneConfig {
        mood,
        lighting: "Natural Daylight".to_string(),
        pose: "Facing Camera Directly".to_string(),
        camera_distance: "Medium Shot (Waist)".to_string(),
        custom_prompt,
        ..SceneConfig::default()
    }
}

fn campaign_tags(campaign: &Campaign) -> Vec<String> {
    [campaign.mood.clone(), campaign.brand_name.clone()]
        .into_iter()
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn apply_updates(campaign: &mut Campaign, update: UpdateCampaignRequest) {
    if let Some(name) = update.name {
        campaign.name = name;
    }
    if let Some(description) = update.description {
        campaign.description = description;
    }
    if let Some(brand_name) = update.brand_name {
        campaign.brand_name = brand_name;
    }
    if let Some(brand_colors) = update.brand_colors {
        campaign.brand_colors = brand_colors;
    }
    if let Some(mood) = update.mood {
        campaign.mood = mood;
    }
    if let Some(target_platforms) = update.target_platforms {
        campaign.target_platforms = target_platforms;
    }
    if let Some(model_ids) = update.model_ids {
        campaign.model_ids = model_ids;
    }
    if let Some(content_brief) = update.content_brief {
        campaign.content_brief = content_brief;
    }
    if let Some(product_images) = update.product_images {
        campaign.product_images = product_images;
    }
}
