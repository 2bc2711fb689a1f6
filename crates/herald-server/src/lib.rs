//! HTTP server for Herald.
//!
//! Serves the `herald-api` routes behind HTTP Basic auth, with request
//! tracing, backed by any [`Directory`].

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use herald_core::directory::Directory;
use herald_engine::EngineConfig;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_auth};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
  /// The `[notifications]` table; built-in defaults when absent.
  #[serde(default)]
  pub notifications:      EngineConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               "127.0.0.1".to_string(),
      port:               8080,
      store_path:         PathBuf::from("herald.db"),
      auth_username:      String::new(),
      auth_password_hash: String::new(),
      notifications:      EngineConfig::default(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the middleware stack.
pub struct AppState<D> {
  pub directory: Arc<D>,
  pub config:    Arc<ServerConfig>,
  pub auth:      Arc<AuthConfig>,
}

impl<D> AppState<D> {
  pub fn new(directory: Arc<D>, config: ServerConfig) -> Self {
    let auth = AuthConfig {
      username:      config.auth_username.clone(),
      password_hash: config.auth_password_hash.clone(),
    };
    Self { directory, config: Arc::new(config), auth: Arc::new(auth) }
  }
}

impl<D> Clone for AppState<D> {
  fn clone(&self) -> Self {
    Self {
      directory: self.directory.clone(),
      config:    self.config.clone(),
      auth:      self.auth.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: API routes, auth, and tracing.
pub fn router<D>(state: AppState<D>) -> Router
where
  D: Directory + 'static,
{
  let notifications = Arc::new(state.config.notifications.clone());
  herald_api::api_router(state.directory.clone(), notifications)
    .layer(middleware::from_fn_with_state(state, require_auth))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
