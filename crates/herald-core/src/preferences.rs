//! Roles and notification preferences.
//!
//! A recipient holds zero or more [`Role`]s for a given activity. Each user
//! and group carries a [`NotificationPreferences`] matrix that says, per
//! [`NotificationCategory`] and role, whether mail should be sent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

// ─── Roles ───────────────────────────────────────────────────────────────────

/// A named relationship between a recipient and an activity.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
  /// The recipient performed the activity.
  #[serde(rename = "self")]
  #[strum(serialize = "self")]
  Myself,
  Follower,
  Author,
  Commenter,
  Reviewer,
  Moderator,
  Member,
}

/// The set of roles a recipient holds for one activity. Roles are not
/// mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(std::collections::BTreeSet<Role>);

impl RoleSet {
  pub fn new() -> Self { Self::default() }

  pub fn insert(&mut self, role: Role) -> bool { self.0.insert(role) }

  pub fn contains(&self, role: Role) -> bool { self.0.contains(&role) }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
    self.0.iter().copied()
  }
}

impl FromIterator<Role> for RoleSet {
  fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
    Self(iter.into_iter().collect())
  }
}

// ─── Categories ──────────────────────────────────────────────────────────────

/// The preference bucket an action kind falls into. Several action kinds can
/// share one category (e.g. every review state transition).
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationCategory {
  ReviewNew,
  ReviewFiles,
  ReviewTests,
  ReviewVote,
  ReviewState,
  ReviewJoinLeave,
  ReviewCommentNew,
  ReviewCommentUpdate,
  ReviewCommentLiked,
  ReviewOpenedIssue,
  ReviewRequiredVote,
  ReviewOptionalVote,
  ChangeCommit,
}

// ─── Preferences ─────────────────────────────────────────────────────────────

/// `category -> role -> send?`
pub type PreferenceMatrix = BTreeMap<NotificationCategory, BTreeMap<Role, bool>>;

/// Per-user or per-group notification settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
  #[serde(default)]
  pub categories: PreferenceMatrix,
  /// Overrides that apply only to activities touching a given project id.
  #[serde(default)]
  pub projects:   BTreeMap<String, PreferenceMatrix>,
}

impl NotificationPreferences {
  /// Set a single cell of the main matrix; returns `self` for chaining.
  pub fn with(mut self, category: NotificationCategory, role: Role, send: bool) -> Self {
    self.categories.entry(category).or_default().insert(role, send);
    self
  }

  /// Set a single cell of a project override matrix.
  pub fn with_project(
    mut self,
    project: impl Into<String>,
    category: NotificationCategory,
    role: Role,
    send: bool,
  ) -> Self {
    self
      .projects
      .entry(project.into())
      .or_default()
      .entry(category)
      .or_default()
      .insert(role, send);
    self
  }

  /// The explicit setting for one cell, preferring a project override.
  pub fn setting(
    &self,
    category: NotificationCategory,
    role: Role,
    project: Option<&str>,
  ) -> Option<bool> {
    let from_project = project
      .and_then(|p| self.projects.get(p))
      .and_then(|m| m.get(&category))
      .and_then(|roles| roles.get(&role))
      .copied();
    from_project.or_else(|| {
      self.categories.get(&category).and_then(|roles| roles.get(&role)).copied()
    })
  }

  /// Decide whether a recipient holding `roles` gets mail for `category`.
  ///
  /// Cells missing here fall back to `defaults`, then to enabled. An empty
  /// role set always sends. A disabled [`Role::Myself`] vetoes the decision;
  /// otherwise any enabled role is enough.
  pub fn decide(
    &self,
    category: Option<NotificationCategory>,
    roles: &RoleSet,
    project: Option<&str>,
    defaults: &NotificationPreferences,
  ) -> bool {
    let Some(category) = category else {
      return true;
    };
    if roles.is_empty() {
      return true;
    }

    let enabled = |role: Role| {
      self
        .setting(category, role, project)
        .or_else(|| defaults.setting(category, role, project))
        .unwrap_or(true)
    };

    if roles.contains(Role::Myself) && !enabled(Role::Myself) {
      return false;
    }
    roles.iter().any(enabled)
  }
}
