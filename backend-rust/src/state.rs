use std::sync::Arc;

use team_engine::EngineConfig;

/// Upper bound on trials per request, keeps one call inside a UI frame budget.
pub const MAX_ITERATIONS: u64 = 200_000;

/// Upper bound on groups per request. Assignment and trial tables allocate
/// per group, so an unchecked count could exhaust memory.
pub const MAX_TEAMS: u32 = 1_000;

/// Read-only data shared by all handlers. Requests never mutate it; every
/// call carries its own roster.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EngineConfig>,
}

impl AppState {
    pub fn new(config: EngineConfig) -> Self {
        Self { config: Arc::new(config) }
    }
}
