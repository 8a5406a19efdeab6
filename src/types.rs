use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceConfig {
    pub ethnicity: String,
    pub age: String,
    pub gender: String,
    pub skin_tone: String,
    pub face_shape: String,
    pub eye_color: String,
    pub eye_shape: String,
    pub hair_color: String,
    pub hair_style: String,
    pub hair_length: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub expression: String,
}

impl Default for FaceConfig {
    fn default() -> Self {
        FaceConfig {
            ethnicity: "European".to_string(),
            age: "23-27".to_string(),
            gender: "Female".to_string(),
            skin_tone: "Medium".to_string(),
            face_shape: "Oval".to_string(),
            eye_color: "Brown".to_string(),
            eye_shape: "Almond".to_string(),
            hair_color: "Dark Brown".to_string(),
            hair_style: "Wavy".to_string(),
            hair_length: "Shoulder-Length".to_string(),
            features: Vec::new(),
            expression: "Neutral/Confident".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyConfig {
    pub body_type: String,
    pub height: String,
    pub build: String,
    pub skin_texture: String,
}

impl Default for BodyConfig {
    fn default() -> Self {
        BodyConfig {
            body_type: "Athletic".to_string(),
            height: "Average (5'4-5'6)".to_string(),
            build: "Toned".to_string(),
            skin_texture: "Glowing".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    pub aesthetic: String,
    pub fashion_style: String,
    #[serde(default)]
    pub color_palette: Vec<String>,
    #[serde(default)]
    pub vibe_keywords: Vec<String>,
    pub influencer_niche: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            aesthetic: "Clean Girl".to_string(),
            fashion_style: "Casual Chic".to_string(),
            color_palette: vec![
                "#000000".to_string(),
                "#FFFFFF".to_string(),
                "#D4A373".to_string(),
                "#2D6A4F".to_string(),
            ],
            vibe_keywords: vec!["Aspirational".to_string(), "Authentic".to_string()],
            influencer_niche: "Fashion & Style".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneConfig {
    pub setting: String,
    pub pose: String,
    pub outfit: String,
    #[serde(default)]
    pub outfit_details: String,
    pub lighting: String,
    pub camera_angle: String,
    pub camera_distance: String,
    pub mood: String,
    #[serde(default)]
    pub props: Vec<String>,
    pub background: String,
    pub time_of_day: String,
    #[serde(default)]
    pub custom_prompt: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            setting: "Studio (White Background)".to_string(),
            pose: "Standing Confident".to_string(),
            outfit: "Casual Streetwear".to_string(),
            outfit_details: String::new(),
            lighting: "Natural Daylight".to_string(),
            camera_angle: "Eye Level".to_string(),
            camera_distance: "Medium Shot (Waist)".to_string(),
            mood: "Empowering".to_string(),
            props: Vec::new(),
            background: "Clean/Minimal".to_string(),
            time_of_day: "Afternoon".to_string(),
            custom_prompt: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    Standard,
    Hd,
    Ultra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    pub aspect_ratio: String,
    pub quality: ImageQuality,
    pub count: u32,
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            aspect_ratio: "4:5".to_string(),
            quality: ImageQuality::Hd,
            count: 1,
            format: OutputFormat::Png,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpg,
    Webp,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Webp => "webp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub face: FaceConfig,
    pub body: BodyConfig,
    pub style: StyleConfig,
    #[serde(default)]
    pub reference_images: Vec<String>,
    #[serde(default)]
    pub seed: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub id: String,
    pub model_id: String,
    pub url: String,
    pub prompt: String,
    pub scene: SceneConfig,
    pub output: OutputConfig,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub seed: Option<u32>,
    #[serde(default)]
    pub campaign_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub brand_colors: Vec<String>,
    pub mood: String,
    #[serde(default)]
    pub target_platforms: Vec<String>,
    #[serde(default)]
    pub model_ids: Vec<String>,
    #[serde(default)]
    pub content_brief: String,
    #[serde(default)]
    pub product_images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
