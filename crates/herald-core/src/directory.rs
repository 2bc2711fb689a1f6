//! Directory records and the read-only [`Directory`] trait.
//!
//! The trait is implemented by backends (e.g. `herald-store-sqlite`). The
//! engine depends on this abstraction only and never writes through it.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{participant::ParticipantRef, preferences::NotificationPreferences};

// ─── Records ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:          String,
  #[serde(default)]
  pub full_name:   String,
  #[serde(default)]
  pub email:       String,
  #[serde(default)]
  pub preferences: NotificationPreferences,
  /// Ids of the users following this user.
  #[serde(default)]
  pub followers:   Vec<String>,
}

impl User {
  pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
    Self {
      id:          id.into(),
      full_name:   String::new(),
      email:       email.into(),
      preferences: NotificationPreferences::default(),
      followers:   Vec::new(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
  pub id:               String,
  #[serde(default)]
  pub name:             String,
  /// Address used when the group is mailed as a whole.
  #[serde(default)]
  pub email:            Option<String>,
  /// Mail the group's own address instead of its members.
  #[serde(default)]
  pub use_mailing_list: bool,
  /// Direct user members.
  #[serde(default)]
  pub users:            Vec<String>,
  /// Direct sub-group ids.
  #[serde(default)]
  pub subgroups:        Vec<String>,
  #[serde(default)]
  pub preferences:      NotificationPreferences,
}

impl Group {
  pub fn new(id: impl Into<String>) -> Self {
    let id = id.into();
    Self {
      name: id.clone(),
      id,
      email: None,
      use_mailing_list: false,
      users: Vec::new(),
      subgroups: Vec::new(),
      preferences: NotificationPreferences::default(),
    }
  }

  pub fn participant(&self) -> ParticipantRef {
    ParticipantRef::Group(self.id.clone())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
  pub id:         String,
  #[serde(default)]
  pub name:       String,
  /// Direct members: users, groups and nested projects.
  #[serde(default)]
  pub members:    Vec<ParticipantRef>,
  /// Moderating users and groups.
  #[serde(default)]
  pub moderators: Vec<ParticipantRef>,
  /// Ids of the users following this project.
  #[serde(default)]
  pub followers:  Vec<String>,
}

impl Project {
  pub fn new(id: impl Into<String>) -> Self {
    let id = id.into();
    Self {
      name: id.clone(),
      id,
      members: Vec::new(),
      moderators: Vec::new(),
      followers: Vec::new(),
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Read-only lookups over users, groups and projects.
///
/// `Ok(None)` means the record does not exist; `Err` means the directory
/// itself could not be reached.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait Directory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Retrieve a user by id.
  fn user(
    &self,
    id: &str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send;

  /// Retrieve many users in one round trip. Unknown ids are omitted; the
  /// order of the result is unspecified.
  fn users<'a>(
    &'a self,
    ids: &'a [String],
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + 'a;

  /// Whether a user with this id exists. Backends may answer this without
  /// loading the record.
  fn user_exists(&self, id: &str) -> impl Future<Output = Result<bool, Self::Error>> + Send {
    async move { Ok(self.user(id).await?.is_some()) }
  }

  // ── Groups ────────────────────────────────────────────────────────────

  fn group(
    &self,
    id: &str,
  ) -> impl Future<Output = Result<Option<Group>, Self::Error>> + Send;

  fn group_exists(&self, id: &str) -> impl Future<Output = Result<bool, Self::Error>> + Send {
    async move { Ok(self.group(id).await?.is_some()) }
  }

  // ── Projects ──────────────────────────────────────────────────────────

  fn project(
    &self,
    id: &str,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send;
}
