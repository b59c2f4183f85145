use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
};
use tracing::info;

use courier_db::Database;
use courier_types::api::{LoginForm, LoginResponse};

use crate::blocking;
use crate::error::ApiError;
use crate::token::TokenKeys;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub keys: TokenKeys,
}

/// POST /login: form field `email`. Knowing a stored email is the whole
/// credential check; there is no password.
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = form
        .ok()
        .and_then(|Form(form)| form.email)
        .filter(|email| !email.is_empty())
        .ok_or(ApiError::Validation("email required"))?;

    let lookup = email.clone();
    let user_id = blocking::run(&state, move |db| db.find_user_id_by_email(&lookup))
        .await?
        .ok_or(ApiError::UnknownEmail)?;

    let token = state.keys.issue(&user_id, &email)?;

    info!(%user_id, "Issued login token");
    Ok(Json(LoginResponse { token }))
}
