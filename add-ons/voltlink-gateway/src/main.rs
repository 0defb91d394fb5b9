//! Axum gateway: entry point for voice-platform intent events.
//!
//! Receives `POST /intent {"intent": ...}` from the platform's dispatcher and
//! returns the speech text to render. Skill evaluation is synchronous and
//! network-bound, so each dispatch runs on a blocking task.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use voltlink_core::{
    AssistantConfig, FleetClient, GeoProvider, GoogleMapsGeo, PlaceholderVehicle,
    SkillError, StaticGeo, VehicleApi,
};
use voltlink_skills::{default_registry, SkillContext, SkillRegistry};

struct AppState {
    registry: SkillRegistry,
    ctx: SkillContext,
}

#[derive(Debug, Deserialize)]
struct IntentRequest {
    intent: String,
}

#[derive(Debug, Serialize)]
struct SpeechResponse {
    speech: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AssistantConfig::from_env();
    let port = config.listen_port;

    // Provider construction uses blocking HTTP clients; keep it off the
    // async runtime threads.
    let state = tokio::task::spawn_blocking(move || build_state(config)).await??;
    let state = Arc::new(state);

    let app = Router::new()
        .route("/health", get(health))
        .route("/intent", post(handle_intent))
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(%addr, "voltlink gateway listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(config: AssistantConfig) -> anyhow::Result<AppState> {
    let vehicles: Vec<Arc<dyn VehicleApi>> = match &config.fleet_token {
        Some(token) => {
            let fleet = FleetClient::list_vehicles(&config.fleet_api_url, token)?;
            info!(count = fleet.len(), "fleet vehicles discovered");
            fleet
                .into_iter()
                .map(|car| Arc::new(car) as Arc<dyn VehicleApi>)
                .collect()
        }
        None => {
            warn!("VOLTLINK_FLEET_TOKEN not set, using placeholder vehicle");
            vec![Arc::new(PlaceholderVehicle::new("Your car")) as Arc<dyn VehicleApi>]
        }
    };

    let geo: Arc<dyn GeoProvider> = match &config.maps_api_key {
        Some(key) => Arc::new(GoogleMapsGeo::new(key.clone())?),
        None => {
            warn!("GOOGLE_MAPS_API_KEY not set, location phrases will be unknown");
            Arc::new(StaticGeo::new())
        }
    };

    let ctx = SkillContext {
        vehicles,
        geo,
        home: config.reference_address(),
        local_region: config.local_region.clone(),
    };

    Ok(AppState {
        registry: default_registry(),
        ctx,
    })
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "time": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn handle_intent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IntentRequest>,
) -> Result<Json<SpeechResponse>, (StatusCode, String)> {
    let intent = req.intent;
    info!(%intent, "intent received");

    let dispatch_state = Arc::clone(&state);
    let dispatch_intent = intent.clone();
    let speech = tokio::task::spawn_blocking(move || {
        dispatch_state
            .registry
            .dispatch(&dispatch_state.ctx, &dispatch_intent)
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
    .map_err(|e| match e {
        SkillError::UnknownIntent(_) => (StatusCode::NOT_FOUND, e.to_string()),
        other => {
            warn!(%intent, error = %other, "intent dispatch failed");
            (StatusCode::BAD_GATEWAY, other.to_string())
        }
    })?;

    Ok(Json(SpeechResponse { speech }))
}
