pub mod encode;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ENHANCEMENT_PROMPT, PRODUCT_DIRECTIVES};
use crate::replicate::{build_input, extract_url, BackendVariant, GenerationOptions, ImageBackend};
use crate::utils::timing::log_backend_timing;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Replicate API key is required. Set it in Settings.")]
    MissingCredential,
    #[error("Prompt is required.")]
    MissingPrompt,
    #[error("All models failed. Check your API key and billing at replicate.com. Errors: {}", .errors.join(" | "))]
    AllBackendsFailed { errors: Vec<String> },
    #[error("Generation completed but could not extract image URL. Raw type: {raw_type}")]
    ExtractionFailed { raw_type: &'static str },
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub variant: BackendVariant,
    pub options: GenerationOptions,
    pub enhance: bool,
    pub overlay_text: Option<String>,
    pub product_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    pub image: String,
    pub backend: BackendVariant,
    pub enhanced: bool,
    pub has_overlay: bool,
}

pub async fn run_generation(
    backend: &dyn ImageBackend,
    request: GenerationRequest,
) -> Result<GenerationOutcome, GenerateError> {
    if request.options.prompt.trim().is_empty() {
        return Err(GenerateError::MissingPrompt);
    }

    let mut errors: Vec<String> = Vec::new();
    let mut base: Option<(String, BackendVariant)> = None;

    let product_image = request
        .product_image
        .as_deref()
        .filter(|image| !image.is_empty());
    if let Some(product_image) = product_image {
        match run_product_pass(backend, &request.options, product_image).await {
            Ok(output) => {
                let Some(url) = extract_url(&output) else {
                    let raw_type = json_type_name(&output);
                    warn!(
                        "Could not extract URL from product output, raw type {raw_type}: {}",
                        preview(&output)
                    );
                    return Err(GenerateError::ExtractionFailed { raw_type });
                };
                base = Some((url, BackendVariant::Kontext));
            }
            Err(err) => {
                warn!("Product pass failed, falling back to standard generation: {err}");
                errors.push(format!("kontext-product: {err}"));
            }
        }
    }

    let (image, used) = match base {
        Some(committed) => committed,
        None => run_base_chain(backend, &request, &mut errors).await?,
    };
    info!("Base image generated by {}", used.wire_id());

    let mut image = image;
    let mut enhanced = false;
    if request.enhance {
        let (next, applied) =
            apply_edit_pass(backend, "enhance_pass", ENHANCEMENT_PROMPT, image).await;
        image = next;
        enhanced = applied;
    }

    let mut has_overlay = false;
    let overlay_text = request
        .overlay_text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());
    if let Some(text) = overlay_text {
        let overlay_prompt = build_overlay_prompt(text);
        let (next, applied) =
            apply_edit_pass(backend, "overlay_pass", &overlay_prompt, image).await;
        image = next;
        has_overlay = applied;
    }

    let image = encode::ensure_data_url(backend, image).await;

    Ok(GenerationOutcome {
        image,
        backend: used,
        enhanced,
        has_overlay,
    })
}

async fn run_base_chain(
    backend: &dyn ImageBackend,
    request: &GenerationRequest,
    errors: &mut Vec<String>,
) -> Result<(String, BackendVariant), GenerateError> {
    for variant in request.variant.fallback_chain() {
        let input = build_input(variant, &request.options);
        match invoke(backend, variant, "generate", input).await {
            Ok(output) => match extract_url(&output) {
                Some(url) => return Ok((url, variant)),
                None => {
                    warn!(
                        "{} output had no extractable URL: {}",
                        variant.wire_id(),
                        preview(&output)
                    );
                    errors.push(format!(
                        "{}: could not extract image URL from output",
                        variant.wire_id()
                    ));
                }
            },
            Err(err) => {
                warn!("{} failed: {err}", variant.wire_id());
                errors.push(format!("{}: {err}", variant.wire_id()));
            }
        }
    }

    Err(GenerateError::AllBackendsFailed {
        errors: std::mem::take(errors),
    })
}

async fn run_product_pass(
    backend: &dyn ImageBackend,
    options: &GenerationOptions,
    product_image: &str,
) -> anyhow::Result<Value> {
    let product_options = GenerationOptions {
        prompt: format!("{} {}", options.prompt, PRODUCT_DIRECTIVES),
        ..options.clone()
    };
    let mut input = build_input(BackendVariant::Kontext, &product_options);
    input["input_image"] = json!(product_image);
    invoke(backend, BackendVariant::Kontext, "product_pass", input).await
}

async fn apply_edit_pass(
    backend: &dyn ImageBackend,
    operation: &str,
    prompt: &str,
    image: String,
) -> (String, bool) {
    let input = edit_input(prompt, &image);
    match invoke(backend, BackendVariant::Kontext, operation, input).await {
        Ok(output) => match extract_url(&output) {
            Some(url) => (url, true),
            None => {
                warn!("{operation} output had no extractable URL, keeping prior image");
                (image, false)
            }
        },
        Err(err) => {
            warn!("{operation} failed, keeping prior image: {err}");
            (image, false)
        }
    }
}

async fn invoke(
    backend: &dyn ImageBackend,
    variant: BackendVariant,
    operation: &str,
    input: Value,
) -> anyhow::Result<Value> {
    log_backend_timing("replicate", variant.wire_id(), operation, None, || {
        backend.run_model(variant.model_path(), input)
    })
    .await
}

fn edit_input(prompt: &str, image: &str) -> Value {
    json!({
        "prompt": prompt,
        "input_image": image,
        "aspect_ratio": "match_input_image",
        "output_format": "png",
        "safety_tolerance": 2,
    })
}

pub fn build_overlay_prompt(text: &str) -> String {
    let spelled = text
        .chars()
        .map(|ch| {
            if ch == ' ' {
                "[space]".to_string()
            } else {
                ch.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    [
        format!("Add the exact text \"{text}\" as a professional advertising headline overlay on this image."),
        format!("EXACT SPELLING — the text must read character by character: {spelled}. Do not change, rearrange, drop, or add any letters. Every character must be exactly correct."),
        "TYPOGRAPHY: Bold, uppercase, modern sans-serif font similar to Helvetica Neue Bold or Montserrat Black. Clean thick high-impact lettering.".to_string(),
        "COLOR: White or bright text with a strong dark drop shadow for crisp contrast against any background.".to_string(),
        "PLACEMENT: Position the text horizontally centered in the bottom 15-20% of the image with comfortable padding from all edges. Never place text over the subject's face, eyes, or upper body.".to_string(),
        "SIZE: Large enough to read instantly — approximately 8-10% of the image height.".to_string(),
        "PRESERVE: Keep the entire photograph underneath completely unchanged — same person, pose, expression, skin, lighting, product, background, and composition. Only add the text overlay, nothing else.".to_string(),
    ]
    .join(" ")
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn preview(value: &Value) -> String {
    let rendered = value.to_string();
    if rendered.chars().count() <= 500 {
        return rendered;
    }
    rendered.chars().take(500).collect()
}
