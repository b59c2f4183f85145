use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{self, AppState};
use crate::middleware::{parse_token, require_auth};
use crate::{health, notifications, preferences};

/// All routes pass through `parse_token`; the protected ones also through
/// `require_auth`, which relies on the claims `parse_token` attached.
pub fn create_router(state: AppState) -> Router {
    let public_routes: Router<AppState> = Router::new()
        .route("/login", post(auth::login))
        .route("/healthz", get(health::healthz));

    let protected_routes: Router<AppState> = Router::new()
        .route("/notifications", get(notifications::list_notifications))
        .route("/preferences", post(preferences::update_preferences))
        .route_layer(middleware::from_fn(require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(state.clone(), parse_token))
        .with_state(state)
}
