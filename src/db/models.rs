use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::types::{
    BodyConfig, Campaign, FaceConfig, GeneratedImage, OutputConfig, Persona, SceneConfig,
    StyleConfig,
};

#[derive(Debug, Clone, FromRow)]
pub struct PersonaRow {
    pub id: String,
    pub name: String,
    pub face_json: String,
    pub body_json: String,
    pub style_json: String,
    pub reference_images_json: String,
    pub thumbnail: Option<String>,
    pub seed: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PersonaRow {
    pub fn into_persona(self) -> Result<Persona> {
        Ok(Persona {
            id: self.id,
            name: self.name,
            created_at: self.created_at,
            updated_at: self.updated_at,
            thumbnail: self.thumbnail,
            face: serde_json::from_str::<FaceConfig>(&self.face_json)?,
            body: serde_json::from_str::<BodyConfig>(&self.body_json)?,
            style: serde_json::from_str::<StyleConfig>(&self.style_json)?,
            reference_images: serde_json::from_str::<Vec<String>>(&self.reference_images_json)?,
            seed: self.seed.and_then(|seed| u32::try_from(seed).ok()),
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ImageRow {
    pub id: String,
    pub model_id: String,
    pub url: String,
    pub prompt: String,
    pub scene_json: String,
    pub output_json: String,
    pub tags_json: String,
    pub is_favorite: bool,
    pub seed: Option<i64>,
    pub campaign_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ImageRow {
    pub fn into_image(self) -> Result<GeneratedImage> {
        Ok(GeneratedImage {
            id: self.id,
            model_id: self.model_id,
            url: self.url,
            prompt: self.prompt,
            scene: serde_json::from_str::<SceneConfig>(&self.scene_json)?,
            output: serde_json::from_str::<OutputConfig>(&self.output_json)?,
            created_at: self.created_at,
            tags: serde_json::from_str::<Vec<String>>(&self.tags_json)?,
            is_favorite: self.is_favorite,
            seed: self.seed.and_then(|seed| u32::try_from(seed).ok()),
            campaign_id: self.campaign_id,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CampaignRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub brand_name: String,
    pub brand_colors_json: String,
    pub mood: String,
    pub target_platforms_json: String,
    pub model_ids_json: String,
    pub content_brief: String,
    pub product_images_json: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CampaignRow {
    pub fn into_campaign(self) -> Result<Campaign> {
        Ok(Campaign {
            id: self.id,
            name: self.name,
            description: self.description,
            brand_name: self.brand_name,
            brand_colors: serde_json::from_str::<Vec<String>>(&self.brand_colors_json)?,
            mood: self.mood,
            target_platforms: serde_json::from_str::<Vec<String>>(&self.target_platforms_json)?,
            model_ids: serde_json::from_str::<Vec<String>>(&self.model_ids_json)?,
            content_brief: self.content_brief,
            product_images: serde_json::from_str::<Vec<String>>(&self.product_images_json)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
