//! `POST /recipients`: who gets mail about an activity.
//!
//! Body: `{"activity": {...}, "to": ["alice", "swarm-group-qa", ...]}`.
//! Responds with `{"recipients": ["alice@example.com", ...]}`.

use axum::{Json, extract::State};
use herald_core::{activity::ActivityContext, directory::Directory, participant::ParticipantRef};
use herald_engine::RecipientResolver;
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RecipientsBody {
  pub activity: ActivityContext,
  #[serde(default)]
  pub to:       Vec<ParticipantRef>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecipientsResponse {
  pub recipients: Vec<String>,
}

pub async fn handler<D>(
  State(state): State<ApiState<D>>,
  Json(body): Json<RecipientsBody>,
) -> Result<Json<RecipientsResponse>, ApiError>
where
  D: Directory,
{
  let recipients = RecipientResolver::new(state.directory.as_ref(), &state.config)
    .resolve(&body.to, &body.activity)
    .await?;
  Ok(Json(RecipientsResponse { recipients }))
}
