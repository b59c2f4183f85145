pub mod auth;
pub mod blocking;
pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod notifications;
pub mod preferences;
pub mod routes;
pub mod token;

pub use auth::{AppState, AppStateInner};
pub use config::Config;
pub use error::ApiError;
pub use routes::create_router;
