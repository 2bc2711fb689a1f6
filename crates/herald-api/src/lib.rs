//! JSON API for Herald.
//!
//! Exposes an axum [`Router`] backed by any [`Directory`]. Auth, TLS, and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", herald_api::api_router(directory.clone(), config.clone()))
//! ```

pub mod error;
pub mod expand;
pub mod recipients;

use std::sync::Arc;

use axum::{Router, routing::post};
use herald_core::directory::Directory;
use herald_engine::EngineConfig;

pub use error::ApiError;

/// State shared by every handler.
pub struct ApiState<D> {
  pub directory: Arc<D>,
  pub config:    Arc<EngineConfig>,
}

impl<D> Clone for ApiState<D> {
  fn clone(&self) -> Self {
    Self { directory: self.directory.clone(), config: self.config.clone() }
  }
}

/// Build the API router for `directory`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<D>(directory: Arc<D>, config: Arc<EngineConfig>) -> Router<()>
where
  D: Directory + 'static,
{
  Router::new()
    .route("/recipients", post(recipients::handler::<D>))
    .route("/expand", post(expand::handler::<D>))
    .with_state(ApiState { directory, config })
}
