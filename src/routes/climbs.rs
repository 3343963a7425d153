use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::pipeline::{analyze, detect, profile};
use crate::state::AppState;
use crate::types::climb::{
    number_climbs, CategoryThresholds, Climb, DetectionConfig, DetectionStrategy,
};
use crate::types::profile::{AnalyzedProfile, ElevationSample, RouteCoordinate};

const MAX_BATCH_PROFILES: usize = 500;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/climbs", post(analyze_route))
        .route("/api/climbs/batch", post(analyze_batch))
        .route("/api/climbs/:profile_id", get(get_analysis))
}

/// Per-request changes to the server's detection settings.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DetectionOverrides {
    min_gradient: Option<f64>,
    min_length_m: Option<f64>,
    smoothing_window: Option<usize>,
    merge_gap_m: Option<f64>,
    min_downhill_gradient: Option<f64>,
    min_downhill_length_m: Option<f64>,
    lookahead_distance_m: Option<f64>,
    lookahead_stop_on_descent: Option<bool>,
    final_min_gradient: Option<f64>,
    categories: Option<CategoryThresholds>,
    strategy: Option<DetectionStrategy>,
    remove_overlaps: Option<bool>,
}

impl DetectionOverrides {
    fn apply(self, base: &DetectionConfig) -> DetectionConfig {
        DetectionConfig {
            min_gradient: self.min_gradient.unwrap_or(base.min_gradient),
            min_length_m: self.min_length_m.unwrap_or(base.min_length_m),
            smoothing_window: self.smoothing_window.unwrap_or(base.smoothing_window),
            merge_gap_m: self.merge_gap_m.unwrap_or(base.merge_gap_m),
            min_downhill_gradient: self
                .min_downhill_gradient
                .unwrap_or(base.min_downhill_gradient),
            min_downhill_length_m: self
                .min_downhill_length_m
                .unwrap_or(base.min_downhill_length_m),
            lookahead_distance_m: self
                .lookahead_distance_m
                .unwrap_or(base.lookahead_distance_m),
            lookahead_stop_on_descent: self
                .lookahead_stop_on_descent
                .unwrap_or(base.lookahead_stop_on_descent),
            final_min_gradient: self.final_min_gradient.unwrap_or(base.final_min_gradient),
            categories: self.categories.unwrap_or(base.categories),
            strategy: self.strategy.unwrap_or(base.strategy),
            remove_overlaps: self.remove_overlaps.unwrap_or(base.remove_overlaps),
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AnalyzeRequest {
    samples: Option<Vec<ElevationSample>>,
    coordinates: Option<Vec<RouteCoordinate>>,
    #[serde(default)]
    config: Option<DetectionOverrides>,
    max_profile_points: Option<usize>,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    profile_id: String,
    #[serde(flatten)]
    analysis: AnalyzedProfile,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BatchRequest {
    profiles: Vec<BatchProfile>,
    #[serde(default)]
    config: Option<DetectionOverrides>,
}

#[derive(Deserialize)]
struct BatchProfile {
    id: String,
    samples: Vec<ElevationSample>,
}

#[derive(Serialize)]
struct BatchResult {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    climbs: Option<Vec<Climb>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct BatchResponse {
    results: Vec<BatchResult>,
}

async fn analyze_route(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let config = resolve_config(&state, req.config)?;

    let samples = match (req.samples, req.coordinates) {
        (Some(samples), None) => samples,
        (None, Some(coordinates)) => profile::build_profile(&coordinates)?,
        (Some(_), Some(_)) => {
            return Err(AppError::BadRequest(
                "Provide either samples or coordinates, not both".to_string(),
            ))
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "No samples or coordinates provided".to_string(),
            ))
        }
    };

    let max_points = req
        .max_profile_points
        .unwrap_or(state.config().max_profile_points);

    let sample_count = samples.len();
    let analysis =
        tokio::task::spawn_blocking(move || analyze::analyze(&samples, &config, max_points))
            .await
            .map_err(|e| AppError::Internal(format!("Profile analysis failed: {}", e)))??;
    let profile_id = Uuid::new_v4().to_string();

    tracing::info!(
        "Analyzed profile {} ({} samples, {:.2} km, {} climbs)",
        profile_id,
        sample_count,
        analysis.stats.total_distance_m / 1000.0,
        analysis.climbs.len()
    );

    state.insert(profile_id.clone(), analysis.clone());

    Ok(Json(AnalyzeResponse {
        profile_id,
        analysis,
    }))
}

async fn get_analysis(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let analysis = state
        .get(&profile_id)
        .ok_or_else(|| AppError::NotFound(profile_id.clone()))?;

    Ok(Json(AnalyzeResponse {
        profile_id,
        analysis,
    }))
}

async fn analyze_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, AppError> {
    if req.profiles.len() > MAX_BATCH_PROFILES {
        return Err(AppError::BadRequest(format!(
            "Too many profiles: {} (max {})",
            req.profiles.len(),
            MAX_BATCH_PROFILES
        )));
    }

    let config = resolve_config(&state, req.config)?;
    let profiles = req.profiles;
    let count = profiles.len();

    let results = tokio::task::spawn_blocking(move || {
        profiles
            .into_par_iter()
            .map(|p| match detect::detect_climbs(&p.samples, &config) {
                Ok(mut climbs) => {
                    number_climbs(&mut climbs);
                    BatchResult {
                        id: p.id,
                        climbs: Some(climbs),
                        error: None,
                    }
                }
                Err(e) => BatchResult {
                    id: p.id,
                    climbs: None,
                    error: Some(e.to_string()),
                },
            })
            .collect::<Vec<_>>()
    })
    .await
    .map_err(|e| AppError::Internal(format!("Batch analysis failed: {}", e)))?;

    tracing::info!("Analyzed batch of {} profiles", count);

    Ok(Json(BatchResponse { results }))
}

fn resolve_config(
    state: &AppState,
    overrides: Option<DetectionOverrides>,
) -> Result<DetectionConfig, AppError> {
    let config = overrides
        .unwrap_or_default()
        .apply(&state.config().detection);
    config.validate()?;
    Ok(config)
}
