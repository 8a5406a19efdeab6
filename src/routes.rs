use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::CONFIG;
use crate::handlers::{campaigns, generate, health, images, personas};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/generate", post(generate::generate))
        .route("/api/prompt/preview", post(personas::preview_prompt))
        .route(
            "/api/personas",
            get(personas::list_personas).post(personas::create_persona),
        )
        .route(
            "/api/personas/{id}",
            get(personas::get_persona)
                .put(personas::update_persona)
                .delete(personas::delete_persona),
        )
        .route(
            "/api/personas/{id}/portrait",
            post(personas::generate_portrait),
        )
        .route(
            "/api/images",
            get(images::list_images).post(images::create_images),
        )
        .route("/api/images/{id}", delete(images::delete_image))
        .route("/api/images/{id}/favorite", post(images::toggle_favorite))
        .route("/api/images/{id}/tags", put(images::set_tags))
        .route("/api/images/{id}/campaign", post(images::assign_campaign))
        .route(
            "/api/campaigns",
            get(campaigns::list_campaigns).post(campaigns::create_campaign),
        )
        .route(
            "/api/campaigns/{id}",
            get(campaigns::get_campaign)
                .put(campaigns::update_campaign)
                .delete(campaigns::delete_campaign),
        )
        .route(
            "/api/campaigns/{id}/generate",
            post(campaigns::generate_for_campaign),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if CONFIG.cors_origins.iter().any(|origin| origin == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = CONFIG
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}
