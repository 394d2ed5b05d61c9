use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::json;
use team_engine::{assign, run_fairness_check, EngineError, FairnessReport};
use team_types::{Roster, TeamAssignment};
use thiserror::Error;
use tracing::{info, warn};

use crate::state::{AppState, MAX_ITERATIONS, MAX_TEAMS};

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("iterations must be at most {max}, got {0}", max = MAX_ITERATIONS)]
    TooManyIterations(u64),
    #[error("team count must be at most {max}, got {0}", max = MAX_TEAMS)]
    TooManyTeams(u32),
    #[error("simulation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Engine(_) | ApiError::TooManyIterations(_) | ApiError::TooManyTeams(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!("Request rejected ({}): {}", status, self);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ─── Routes ───────────────────────────────────────────────────────────────────

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "team-backend ok" }))
        .route("/roster/default", get(default_roster))
        .route("/assign", post(assign_teams))
        .route("/simulate", post(simulate_fairness))
        .with_state(state)
}

async fn default_roster(State(state): State<AppState>) -> Json<Roster> {
    Json(state.config.roster())
}

fn check_team_count(roster: &Roster) -> Result<(), ApiError> {
    if roster.team_count > MAX_TEAMS {
        return Err(ApiError::TooManyTeams(roster.team_count));
    }
    Ok(())
}

async fn assign_teams(Json(roster): Json<Roster>) -> Result<Json<TeamAssignment>, ApiError> {
    check_team_count(&roster)?;
    let mut rng = StdRng::from_entropy();
    let teams = assign(&roster, &mut rng)?;
    info!("Assigned {} people into {} teams", teams.total_members(), roster.team_count);
    Ok(Json(teams))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    pub roster: Roster,
    pub iterations: Option<u64>,
    pub include_constrained: Option<bool>,
    pub tolerance_pct: Option<f64>,
}

async fn simulate_fairness(
    State(state): State<AppState>,
    Json(req): Json<SimulateRequest>,
) -> Result<Json<FairnessReport>, ApiError> {
    let mut settings = state.config.simulation.clone();
    if let Some(n) = req.iterations {
        settings.iterations = n;
    }
    if let Some(flag) = req.include_constrained {
        settings.include_constrained = flag;
    }
    if let Some(t) = req.tolerance_pct {
        settings.tolerance_pct = t;
    }
    check_team_count(&req.roster)?;
    if settings.iterations > MAX_ITERATIONS {
        return Err(ApiError::TooManyIterations(settings.iterations));
    }

    // CPU-bound; keep it off the async workers
    let roster = req.roster;
    let report = tokio::task::spawn_blocking(move || {
        let mut rng = StdRng::from_entropy();
        run_fairness_check(&roster, &settings, &mut rng)
    })
    .await??;

    Ok(Json(report))
}
