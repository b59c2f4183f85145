use axum::{
    Extension, Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use courier_db::Database;
use courier_types::models::{Preferences, PreferencesUpdate};

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Stored preferences for `user_id`, or all channels allowed when the user
/// has never saved any. The default is not written back.
pub fn resolve(db: &Database, user_id: &str) -> anyhow::Result<Preferences> {
    Ok(db
        .get_preferences(user_id)?
        .unwrap_or_else(|| Preferences::allow_all(user_id)))
}

/// Apply the flags present in `update`. Returns `None` for an empty update,
/// which leaves the store untouched.
pub fn update(
    db: &Database,
    user_id: &str,
    update: &PreferencesUpdate,
) -> anyhow::Result<Option<Preferences>> {
    if update.is_empty() {
        return Ok(None);
    }
    db.upsert_preferences(user_id, update).map(Some)
}

/// POST /preferences: JSON body with optional `email`, `sms`, `push` booleans.
pub async fn update_preferences(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<Response, ApiError> {
    // Parsed by hand so a missing or odd Content-Type still gets a JSON read.
    let patch = serde_json::from_slice::<Option<PreferencesUpdate>>(&body)
        .map_err(|e| {
            debug!(error = %e, "Rejected preferences body");
            ApiError::Validation("invalid json")
        })?
        .unwrap_or_default();

    let updated = blocking::run(&state, move |db| update(db, &user.user_id, &patch)).await?;

    Ok(match updated {
        Some(prefs) => Json(prefs).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}
