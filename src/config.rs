use std::env;

use anyhow::Result;
use once_cell::sync::Lazy;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_dir: String,
    pub database_url: String,
    pub replicate_api_token: String,
    pub replicate_base_url: String,
    pub http_timeout_seconds: u64,
    pub poll_interval_seconds: u64,
    pub poll_max_attempts: u64,
    pub cors_origins: Vec<String>,
}

pub static CONFIG: Lazy<Config> =
    Lazy::new(|| Config::load().expect("Failed to load configuration"));

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_csv(name: &str, default: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

impl Config {
    pub fn load() -> Result<Self> {
        let replicate_base_url = env_string("REPLICATE_BASE_URL", "https://api.replicate.com/v1");
        if replicate_base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("REPLICATE_BASE_URL must not be empty"));
        }

        Ok(Config {
            host: env_string("HOST", "0.0.0.0"),
            port: env_u16("PORT", 8080),
            log_level: env_string("LOG_LEVEL", "info").to_lowercase(),
            log_dir: env_string("LOG_DIR", "logs"),
            database_url: env_string("DATABASE_URL", "sqlite://studio.db?mode=rwc"),
            replicate_api_token: env_string("REPLICATE_API_TOKEN", ""),
            replicate_base_url: replicate_base_url.trim_end_matches('/').to_string(),
            http_timeout_seconds: env_u64("HTTP_TIMEOUT_SECONDS", 120),
            poll_interval_seconds: env_u64("POLL_INTERVAL_SECONDS", 2),
            poll_max_attempts: env_u64("POLL_MAX_ATTEMPTS", 60),
            cors_origins: env_csv("CORS_ORIGINS", "*"),
        })
    }
}

pub const ENHANCEMENT_PROMPT: &str = "Retouch both eyes to look perfectly photorealistic with crystal-clear sharp irises, bright clean white sclera, round centered pupils, and natural catchlights. Sharpen all fine details including individual hair strands, skin pores, eyelashes, and fabric texture to 4K clarity. Remove all noise, grain, and compression artifacts while keeping the exact same pose, expression, outfit, background, lighting, and composition. Do not add any text, watermarks, or overlays.";

pub const PRODUCT_DIRECTIVES: &str = "The model is naturally holding and presenting the exact product visible in the input image. CRITICAL: Preserve the product's exact appearance — same shape, colors, logos, labels, branding, and all visual details. The product must be clearly visible, well-lit, and prominently featured in the model's hands or nearby. Professional advertising product photography with clean composition.";
