//! Error types for `herald-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid participant identifier: {0:?}")]
  InvalidParticipant(String),

  #[error("invalid reviewer requirement: {0}")]
  InvalidRequirement(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
