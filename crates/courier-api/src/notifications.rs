use axum::{Extension, Json, extract::State};
use tracing::debug;

use courier_db::Database;
use courier_types::api::NotificationsResponse;
use courier_types::models::{Notification, Preferences};

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::preferences;

/// Notifications of `user_id` on the channels `prefs` allows, newest first.
/// With every channel switched off the store is never queried.
pub fn filter(db: &Database, user_id: &str, prefs: &Preferences) -> anyhow::Result<Vec<Notification>> {
    let allowed = prefs.allowed_channels();
    if allowed.is_empty() {
        return Ok(vec![]);
    }
    db.list_notifications(user_id, &allowed)
}

/// GET /notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let response = blocking::run(&state, move |db| {
        let preferences = preferences::resolve(db, &user.user_id)?;
        let notifications = filter(db, &user.user_id, &preferences)?;
        debug!(
            user_id = %user.user_id,
            email = user.email.as_deref().unwrap_or("-"),
            count = notifications.len(),
            "Listed notifications"
        );
        Ok(NotificationsResponse {
            notifications,
            preferences,
        })
    })
    .await?;

    Ok(Json(response))
}
