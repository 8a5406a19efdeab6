use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::handlers::generate::{execute, GenerateResponse};
use crate::pipeline::GenerationRequest;
use crate::prompt::{build_portrait_prompt, build_prompt, build_structured_prompt, StructuredPrompt};
use crate::replicate::{BackendVariant, GenerationOptions};
use crate::state::AppState;
use crate::types::{BodyConfig, FaceConfig, Persona, SceneConfig, StyleConfig};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePersonaRequest {
    pub name: String,
    pub face: Option<FaceConfig>,
    pub body: Option<BodyConfig>,
    pub style: Option<StyleConfig>,
    pub seed: Option<u32>,
    pub reference_images: Vec<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePersonaRequest {
    pub name: Option<String>,
    pub face: Option<FaceConfig>,
    pub body: Option<BodyConfig>,
    pub style: Option<StyleConfig>,
    pub seed: Option<u32>,
    pub thumbnail: Option<String>,
    pub reference_images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortraitRequest {
    pub api_key: String,
    pub enhance: bool,
}

impl Default for PortraitRequest {
    fn default() -> Self {
        PortraitRequest {
            api_key: String::new(),
            enhance: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptPreviewRequest {
    pub model: Persona,
    #[serde(default)]
    pub scene: SceneConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptPreviewResponse {
    pub prompt: String,
    pub structured: StructuredPrompt,
}

pub async fn create_persona(
    State(state): State<AppState>,
    Json(request): Json<CreatePersonaRequest>,
) -> ApiResult<(StatusCode, Json<Persona>)> {
    let now = Utc::now();
    let name = if request.name.trim().is_empty() {
        placeholder_name()
    } else {
        request.name.trim().to_string()
    };

    let persona = Persona {
        id: Uuid::new_v4().to_string(),
        name,
        created_at: now,
        updated_at: now,
        thumbnail: request.thumbnail,
        face: request.face.unwrap_or_default(),
        body: request.body.unwrap_or_default(),
        style: request.style.unwrap_or_default(),
        reference_images: request.reference_images,
        seed: request.seed,
    };
    state.db.insert_persona(&persona).await?;
    info!("Persona {} created", persona.id);

    Ok((StatusCode::CREATED, Json(persona)))
}

pub async fn list_personas(State(state): State<AppState>) -> ApiResult<Json<Vec<Persona>>> {
    Ok(Json(state.db.list_personas().await?))
}

pub async fn get_persona(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Persona>> {
    let persona = state
        .db
        .get_persona(&id)
        .await?
        .ok_or(ApiError::NotFound("Persona"))?;
    Ok(Json(persona))
}

pub async fn update_persona(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePersonaRequest>,
) -> ApiResult<Json<Persona>> {
    let mut persona = state
        .db
        .get_persona(&id)
        .await?
        .ok_or(ApiError::NotFound("Persona"))?;

    apply_updates(&mut persona, request);
    persona.updated_at = Utc::now();
    if !state.db.update_persona(&persona).await? {
        return Err(ApiError::NotFound("Persona"));
    }

    Ok(Json(persona))
}

pub async fn delete_persona(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.db.delete_persona(&id).await? {
        return Err(ApiError::NotFound("Persona"));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn generate_portrait(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<PortraitRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    let mut persona = state
        .db
        .get_persona(&id)
        .await?
        .ok_or(ApiError::NotFound("Persona"))?;

    let generation = GenerationRequest {
        variant: BackendVariant::Kontext,
        options: GenerationOptions {
            prompt: build_portrait_prompt(&persona),
            aspect_ratio: "1:1".to_string(),
            seed: persona.seed,
            ..GenerationOptions::default()
        },
        enhance: request.enhance,
        overlay_text: None,
        product_image: None,
    };
    let outcome = execute(&request.api_key, generation).await?;

    persona.thumbnail = Some(outcome.image.clone());
    if persona.reference_images.is_empty() {
        persona.reference_images = vec![outcome.image.clone()];
    }
    persona.updated_at = Utc::now();
    state.db.update_persona(&persona).await?;
    info!("Portrait stored for persona {}", persona.id);

    Ok(Json(GenerateResponse::from(outcome)))
}

pub async fn preview_prompt(
    Json(request): Json<PromptPreviewRequest>,
) -> ApiResult<Json<PromptPreviewResponse>> {
    let prompt = build_prompt(&request.model, &request.scene);
    let structured = build_structured_prompt(&request.model, &request.scene);
    Ok(Json(PromptPreviewResponse { prompt, structured }))
}

fn apply_updates(persona: &mut Persona, update: UpdatePersonaRequest) {
    if let Some(name) = update.name {
        persona.name = name;
    }
    if let Some(face) = update.face {
        persona.face = face;
    }
    if let Some(body) = update.body {
        persona.body = body;
    }
    if let Some(style) = update.style {
        persona.style = style;
    }
    if let Some(seed) = update.seed {
        persona.seed = Some(seed);
    }
    if let Some(thumbnail) = update.thumbnail {
        persona.thumbnail = Some(thumbnail);
    }
    if let Some(reference_images) = update.reference_images {
        persona.reference_images = reference_images;
    }
}

fn placeholder_name() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    format!("Model {}", base36_upper(millis))
}

fn base36_upper(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = String::new();
    while value > 0 {
        out.insert(0, DIGITS[(value % 36) as usize] as char);
        value /= 36;
    }
    out
}
