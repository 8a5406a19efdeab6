use serde_json::{json, Value};

use crate::replicate::variant::BackendVariant;
use crate::types::OutputFormat;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub prompt: String,
    pub aspect_ratio: String,
    pub seed: Option<u32>,
    pub output_format: OutputFormat,
    pub output_quality: u8,
    pub prompt_upsampling: Option<bool>,
    pub raw: Option<bool>,
    pub steps: Option<u32>,
    pub guidance: Option<f64>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        GenerationOptions {
            prompt: String::new(),
            aspect_ratio: "4:5".to_string(),
            seed: None,
            output_format: OutputFormat::Png,
            output_quality: 90,
            prompt_upsampling: None,
            raw: None,
            steps: None,
            guidance: None,
        }
    }
}

pub fn build_input(variant: BackendVariant, opts: &GenerationOptions) -> Value {
    let mut input = json!({
        "prompt": opts.prompt,
        "output_format": opts.output_format.as_str(),
    });
    if let Some(seed) = opts.seed.filter(|seed| *seed > 0) {
        input["seed"] = json!(seed);
    }

    match variant {
        BackendVariant::Kontext => {
            input["aspect_ratio"] = json!(opts.aspect_ratio);
            input["output_format"] = json!(kontext_output_format(opts.output_format));
            input["safety_tolerance"] = json!(2);
        }
        BackendVariant::Pro => {
            input["aspect_ratio"] = json!(opts.aspect_ratio);
            input["output_quality"] = json!(opts.output_quality);
            if let Some(upsampling) = opts.prompt_upsampling {
                input["prompt_upsampling"] = json!(upsampling);
            }
            input["safety_tolerance"] = json!(2);
        }
        BackendVariant::Flex => {
            input["aspect_ratio"] = json!(opts.aspect_ratio);
            input["output_quality"] = json!(opts.output_quality);
            if let Some(steps) = opts.steps.filter(|steps| *steps > 0) {
                input["steps"] = json!(steps);
            }
            if let Some(guidance) = opts.guidance.filter(|guidance| *guidance != 0.0) {
                input["guidance"] = json!(guidance);
            }
        }
        BackendVariant::Ultra => {
            input["aspect_ratio"] = json!(opts.aspect_ratio);
            input["output_quality"] = json!(opts.output_quality);
            if let Some(raw) = opts.raw {
                input["raw"] = json!(raw);
            }
            input["safety_tolerance"] = json!(2);
        }
        BackendVariant::Schnell => {
            input["num_outputs"] = json!(1);
            input["aspect_ratio"] = json!(opts.aspect_ratio);
        }
    }

    input
}

pub(crate) fn kontext_output_format(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Webp => "jpg",
        other => other.as_str(),
    }
}
