pub mod containers;
pub mod health;
pub mod records;

use axum::Router;

use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(containers::routes())
        .merge(records::routes())
        .with_state(state)
}
