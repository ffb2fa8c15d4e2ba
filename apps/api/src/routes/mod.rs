pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::advisor::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile page action
        .route("/", post(handlers::handle_submit_profile))
        // JSON endpoints
        .route("/sat-advice", post(handlers::handle_sat_advice))
        .route("/sat-data", post(handlers::handle_sat_data))
        .route("/college-data", post(handlers::handle_college_data))
        .with_state(state)
}
