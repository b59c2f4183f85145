use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use courier_types::api::Claims;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::token::TokenKeys;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity resolved by [`require_auth`]; handlers take it as `Extension<AuthUser>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub email: Option<String>,
}

impl AuthUser {
    /// `None` unless the claims carry a non-empty `user_id`.
    pub fn from_claims(claims: &Claims) -> Option<Self> {
        let user_id = claims.user_id.as_deref().filter(|id| !id.is_empty())?;
        Some(Self {
            user_id: user_id.to_string(),
            email: claims.email.clone(),
        })
    }
}

/// Token after a case-insensitive `Bearer ` prefix.
pub fn bearer_token(value: &str) -> Option<&str> {
    let scheme = value.get(..BEARER_PREFIX.len())?;
    if scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        Some(&value[BEARER_PREFIX.len()..])
    } else {
        None
    }
}

/// Soft authentication, mounted on every route.
///
/// No (or an empty) `Authorization` header passes through anonymously. A
/// header that is present must hold a valid bearer token, whose [`Claims`]
/// are then stored in the request extensions.
pub async fn parse_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = match req.headers().get(header::AUTHORIZATION) {
        None => None,
        Some(value) if value.is_empty() => None,
        Some(value) => Some(verify_header(&state.keys, value)?),
    };

    if let Some(claims) = claims {
        req.extensions_mut().insert(claims);
    }

    Ok(next.run(req).await)
}

/// Hard authentication for protected routes. Runs inside [`parse_token`] and
/// requires the claims it attached to name a user.
pub async fn require_auth(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let user = req
        .extensions()
        .get::<Claims>()
        .and_then(AuthUser::from_claims)
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

fn verify_header(keys: &TokenKeys, value: &HeaderValue) -> Result<Claims, ApiError> {
    let value = value.to_str().map_err(|_| ApiError::Unauthorized)?;
    let token = bearer_token(value).ok_or_else(|| {
        debug!("Authorization header is not a bearer credential");
        ApiError::Unauthorized
    })?;

    keys.verify(token).map_err(|e| {
        debug!(error = %e, "Token rejected");
        ApiError::Unauthorized
    })
}
