use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::warn;

use crate::replicate::ImageBackend;

pub async fn ensure_data_url(backend: &dyn ImageBackend, url: String) -> String {
    if url.starts_with("data:") {
        return url;
    }
    match to_data_url(backend, &url).await {
        Ok(data_url) => data_url,
        Err(err) => {
            warn!("Could not convert image to a data URL, returning the transient URL: {err}");
            url
        }
    }
}

async fn to_data_url(backend: &dyn ImageBackend, url: &str) -> Result<String> {
    let image = backend.fetch_image(url).await?;
    let media_type = image
        .content_type
        .as_deref()
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| sniff_media_type(&image.bytes));
    Ok(format!(
        "data:{};base64,{}",
        media_type,
        STANDARD.encode(&image.bytes)
    ))
}

fn sniff_media_type(bytes: &[u8]) -> String {
    infer::get(bytes)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| "image/png".to_string())
}
