use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::CONFIG;
use crate::utils::http::get_http_client;

#[derive(Debug, Clone, PartialEq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[async_trait]
pub trait ImageBackend: Send + Sync {
    async fn run_model(&self, model_path: &str, input: Value) -> Result<Value>;
    async fn fetch_image(&self, url: &str) -> Result<FetchedImage>;
}

pub struct ReplicateClient {
    token: String,
    base_url: String,
}

impl ReplicateClient {
    pub fn new(token: impl Into<String>) -> Self {
        ReplicateClient {
            token: token.into(),
            base_url: CONFIG.replicate_base_url.clone(),
        }
    }

    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        ReplicateClient {
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn resolve_prediction(&self, mut prediction: Value) -> Result<Value> {
        for _ in 0..CONFIG.poll_max_attempts {
            match prediction.get("status").and_then(|value| value.as_str()) {
                Some("succeeded") => {
                    return Ok(prediction.get("output").cloned().unwrap_or(Value::Null));
                }
                Some(status @ ("failed" | "canceled")) => {
                    return Err(anyhow!(
                        "prediction {}: {}",
                        status,
                        prediction_error_detail(&prediction)
                    ));
                }
                _ => {}
            }

            let Some(poll_url) = prediction
                .pointer("/urls/get")
                .and_then(|value| value.as_str())
                .map(str::to_string)
            else {
                return Err(anyhow!("prediction response has no polling URL"));
            };

            tokio::time::sleep(Duration::from_secs(CONFIG.poll_interval_seconds)).await;
            debug!("Polling prediction at {poll_url}");

            let response = get_http_client()
                .get(&poll_url)
                .bearer_auth(&self.token)
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(anyhow!(
                    "Replicate API error {}: {}",
                    status.as_u16(),
                    summarize_error_body(&body)
                ));
            }
            prediction = response.json().await?;
        }

        Err(anyhow!("prediction did not complete within the polling budget"))
    }
}

#[async_trait]
impl ImageBackend for ReplicateClient {
    async fn run_model(&self, model_path: &str, input: Value) -> Result<Value> {
        let url = format!("{}/models/{}/predictions", self.base_url, model_path);
        let response = get_http_client()
            .post(&url)
            .bearer_auth(&self.token)
            .header("Prefer", "wait=60")
            .json(&json!({ "input": input }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Replicate API error {}: {}",
                status.as_u16(),
                summarize_error_body(&body)
            ));
        }

        let prediction: Value = response.json().await?;
        self.resolve_prediction(prediction).await
    }

    async fn fetch_image(&self, url: &str) -> Result<FetchedImage> {
        let response = get_http_client().get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("image fetch failed with status {}", status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let bytes = response.bytes().await?.to_vec();
        Ok(FetchedImage { bytes, content_type })
    }
}

fn prediction_error_detail(prediction: &Value) -> String {
    match prediction.get("error") {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        Some(Value::Null) | None => "no error detail".to_string(),
        Some(other) => other.to_string(),
    }
}

fn summarize_error_body(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<Value>(body) {
        if let Some(detail) = parsed.get("detail").and_then(|value| value.as_str()) {
            return detail.to_string();
        }
        if let Some(title) = parsed.get("title").and_then(|value| value.as_str()) {
            return title.to_string();
        }
    }
    truncate_for_log(body, 300)
}

fn truncate_for_log(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn returns_output_when_the_prediction_succeeds_immediately() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/black-forest-labs/flux-schnell/predictions"))
            .and(header("Authorization", "Bearer test-token"))
            .and(header("Prefer", "wait=60"))
            .and(body_partial_json(json!({ "input": { "prompt": "a portrait" } })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "p1",
                "status": "succeeded",
                "output": ["https://replicate.delivery/pbxt/p1/out.png"],
            })))
            .mount(&server)
            .await;

        let client = ReplicateClient::with_base_url("test-token", server.uri());
        let output = client
            .run_model("black-forest-labs/flux-schnell", json!({ "prompt": "a portrait" }))
            .await
            .unwrap();
        assert_eq!(output, json!(["https://replicate.delivery/pbxt/p1/out.png"]));
    }

    #[tokio::test]
    async fn polls_until_the_prediction_reaches_a_terminal_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/black-forest-labs/flux-2-pro/predictions"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "p2",
                "status": "processing",
                "urls": { "get": format!("{}/predictions/p2", server.uri()) },
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/predictions/p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "p2",
                "status": "succeeded",
                "output": "https://replicate.delivery/pbxt/p2/out.png",
            })))
            .mount(&server)
            .await;

        let client = ReplicateClient::with_base_url("test-token", server.uri());
        let output = client
            .run_model("black-forest-labs/flux-2-pro", json!({ "prompt": "a portrait" }))
            .await
            .unwrap();
        assert_eq!(output, json!("https://replicate.delivery/pbxt/p2/out.png"));
    }

    #[tokio::test]
    async fn surfaces_the_api_error_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/black-forest-labs/flux-kontext-pro/predictions"))
            .respond_with(ResponseTemplate::new(402).set_body_json(json!({
                "detail": "Insufficient credit",
                "status": 402,
            })))
            .mount(&server)
            .await;

        let client = ReplicateClient::with_base_url("test-token", server.uri());
        let err = client
            .run_model("black-forest-labs/flux-kontext-pro", json!({ "prompt": "x" }))
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("402"), "message: {message}");
        assert!(message.contains("Insufficient credit"), "message: {message}");
    }

    #[tokio::test]
    async fn failed_predictions_report_their_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/black-forest-labs/flux-2-flex/predictions"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "p3",
                "status": "failed",
                "error": "NSFW content detected",
            })))
            .mount(&server)
            .await;

        let client = ReplicateClient::with_base_url("test-token", server.uri());
        let err = client
            .run_model("black-forest-labs/flux-2-flex", json!({ "prompt": "x" }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("NSFW content detected"));
    }

    #[tokio::test]
    async fn fetch_image_returns_bytes_and_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pbxt/p1/out.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/jpeg")
                    .set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]),
            )
            .mount(&server)
            .await;

        let client = ReplicateClient::with_base_url("test-token", server.uri());
        let image = client
            .fetch_image(&format!("{}/pbxt/p1/out.png", server.uri()))
            .await
            .unwrap();
        assert_eq!(image.bytes, vec![0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(image.content_type.as_deref(), Some("image/jpeg"));
    }

    #[tokio::test]
    async fn fetch_image_rejects_error_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ReplicateClient::with_base_url("test-token", server.uri());
        let err = client
            .fetch_image(&format!("{}/gone.png", server.uri()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
