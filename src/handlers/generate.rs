use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::CONFIG;
use crate::error::ApiResult;
use crate::pipeline::{run_generation, GenerateError, GenerationOutcome, GenerationRequest};
use crate::replicate::{BackendVariant, GenerationOptions, ReplicateClient};
use crate::types::OutputFormat;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateRequest {
    pub prompt: String,
    pub api_key: String,
    pub aspect_ratio: String,
    pub seed: Option<u32>,
    pub model: BackendVariant,
    pub output_format: OutputFormat,
    pub output_quality: u8,
    pub prompt_upsampling: Option<bool>,
    pub raw: Option<bool>,
    pub steps: Option<u32>,
    pub guidance: Option<f64>,
    pub enhance: bool,
    pub overlay_text: String,
    pub product_image: String,
}

impl Default for GenerateRequest {
    fn default() -> Self {
        GenerateRequest {
            prompt: String::new(),
            api_key: String::new(),
            aspect_ratio: "4:5".to_string(),
            seed: None,
            model: BackendVariant::default(),
            output_format: OutputFormat::Png,
            output_quality: 90,
            prompt_upsampling: None,
            raw: None,
            steps: None,
            guidance: None,
            enhance: true,
            overlay_text: String::new(),
            product_image: String::new(),
        }
    }
}

impl GenerateRequest {
    pub(crate) fn into_generation_request(self) -> GenerationRequest {
        GenerationRequest {
            variant: self.model,
            options: GenerationOptions {
                prompt: self.prompt,
                aspect_ratio: self.aspect_ratio,
                seed: self.seed,
                output_format: self.output_format,
                output_quality: self.output_quality,
                prompt_upsampling: self.prompt_upsampling,
                raw: self.raw,
                steps: self.steps,
                guidance: self.guidance,
            },
            enhance: self.enhance,
            overlay_text: (!self.overlay_text.is_empty()).then_some(self.overlay_text),
            product_image: (!self.product_image.is_empty()).then_some(self.product_image),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub output: String,
    pub model: String,
    pub enhanced: bool,
    pub has_overlay: bool,
}

impl From<GenerationOutcome> for GenerateResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        GenerateResponse {
            output: outcome.image,
            model: outcome.backend.wire_id().to_string(),
            enhanced: outcome.enhanced,
            has_overlay: outcome.has_overlay,
        }
    }
}

pub(crate) fn resolve_credential(
    api_key: &str,
    configured: &str,
) -> Result<String, GenerateError> {
    let requested = api_key.trim();
    if !requested.is_empty() {
        return Ok(requested.to_string());
    }
    let configured = configured.trim();
    if !configured.is_empty() {
        return Ok(configured.to_string());
    }
    Err(GenerateError::MissingCredential)
}

pub(crate) async fn execute(
    api_key: &str,
    request: GenerationRequest,
) -> Result<GenerationOutcome, GenerateError> {
    let credential = resolve_credential(api_key, &CONFIG.replicate_api_token)?;
    let client = ReplicateClient::new(credential);
    run_generation(&client, request).await
}

pub async fn generate(
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<Json<GenerateResponse>> {
    let Json(request) = payload?;
    info!("Generation requested via {}", request.model.wire_id());
    let api_key = request.api_key.clone();
    let outcome = execute(&api_key, request.into_generation_request()).await?;
    Ok(Json(GenerateResponse::from(outcome)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_take_the_studio_defaults() {
        let request: GenerateRequest =
            serde_json::from_value(json!({ "prompt": "studio portrait" })).unwrap();
        assert_eq!(request.prompt, "studio portrait");
        assert_eq!(request.aspect_ratio, "4:5");
        assert_eq!(request.model, BackendVariant::Kontext);
        assert_eq!(request.output_format, OutputFormat::Png);
        assert_eq!(request.output_quality, 90);
        assert!(request.enhance);
        assert!(request.overlay_text.is_empty());
        assert!(request.product_image.is_empty());
        assert!(request.seed.is_none());
    }

    #[test]
    fn unknown_model_ids_are_rejected_at_the_boundary() {
        let result = serde_json::from_value::<GenerateRequest>(json!({
            "prompt": "x",
            "model": "flux-unknown",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn variant_knobs_parse_from_the_wire_names() {
        let request: GenerateRequest = serde_json::from_value(json!({
            "prompt": "x",
            "model": "flux-2-flex",
            "outputFormat": "webp",
            "outputQuality": 80,
            "steps": 28,
            "guidance": 3.5,
            "promptUpsampling": true,
            "raw": false,
            "overlayText": "NEW IN",
            "productImage": "data:image/png;base64,AAAA",
        }))
        .unwrap();
        assert_eq!(request.model, BackendVariant::Flex);
        assert_eq!(request.output_format, OutputFormat::Webp);
        assert_eq!(request.output_quality, 80);
        assert_eq!(request.steps, Some(28));
        assert_eq!(request.guidance, Some(3.5));
        assert_eq!(request.prompt_upsampling, Some(true));
        assert_eq!(request.raw, Some(false));
    }

    #[test]
    fn blank_optional_passes_collapse_to_none() {
        let request: GenerateRequest = serde_json::from_value(json!({
            "prompt": "x",
            "overlayText": "",
            "productImage": "",
        }))
        .unwrap();
        let generation = request.into_generation_request();
        assert!(generation.overlay_text.is_none());
        assert!(generation.product_image.is_none());

        let request: GenerateRequest = serde_json::from_value(json!({
            "prompt": "x",
            "overlayText": "SALE",
            "productImage": "data:image/png;base64,AAAA",
        }))
        .unwrap();
        let generation = request.into_generation_request();
        assert_eq!(generation.overlay_text.as_deref(), Some("SALE"));
        assert!(generation.product_image.is_some());
    }

    #[test]
    fn request_credential_wins_over_the_configured_token() {
        assert_eq!(
            resolve_credential("  r8_abc  ", "r8_server").unwrap(),
            "r8_abc"
        );
        assert_eq!(resolve_credential("", "r8_server").unwrap(), "r8_server");
        assert!(matches!(
            resolve_credential("", "   "),
            Err(GenerateError::MissingCredential)
        ));
    }

    #[test]
    fn responses_use_the_original_wire_casing() {
        let response = GenerateResponse {
            output: "data:image/png;base64,AAAA".to_string(),
            model: "flux-2-pro".to_string(),
            enhanced: true,
            has_overlay: false,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "output": "data:image/png;base64,AAAA",
                "model": "flux-2-pro",
                "enhanced": true,
                "hasOverlay": false,
            })
        );
    }
}
