//! Error types for `herald-engine`.
//!
//! Only an unreachable directory is an error. Missing groups and projects,
//! malformed addresses and looping provenance degrade to a smaller recipient
//! list and are reported through `tracing` instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("directory unavailable: {0}")]
  Directory(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn directory<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Directory(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
