//! `POST /expand`: flatten addressees without applying any preferences.
//!
//! Useful for checking what a group or project expands to, and through
//! which parent each recipient was reached.

use axum::{Json, extract::State};
use herald_core::{directory::Directory, participant::ParticipantRef};
use herald_engine::{expand::Expander, provenance::Provenance};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ExpandBody {
  #[serde(default)]
  pub to: Vec<ParticipantRef>,
}

#[derive(Debug, Serialize)]
pub struct ExpandResponse {
  pub recipients: Vec<ParticipantRef>,
  /// `child -> parent` for every identifier reached through a group or project.
  pub provenance: Provenance,
}

pub async fn handler<D>(
  State(state): State<ApiState<D>>,
  Json(body): Json<ExpandBody>,
) -> Result<Json<ExpandResponse>, ApiError>
where
  D: Directory,
{
  let expansion = Expander::new(state.directory.as_ref()).expand(&body.to).await?;
  Ok(Json(ExpandResponse {
    recipients: expansion.recipients,
    provenance: expansion.provenance,
  }))
}
