//! Activities — the immutable snapshot of the event that triggers a
//! notification.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, participant::ParticipantRef, preferences::NotificationCategory};

// ─── Action kinds ────────────────────────────────────────────────────────────

/// The closed set of activity types that can trigger a notification.
///
/// Unrecognised wire values deserialise to [`ActionKind::Other`] rather than
/// failing; an `Other` activity carries no action-dependent roles.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[serde(from = "String", into = "&'static str")]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
  CommentAdded,
  CommentEdited,
  CommentLiked,
  ReviewRequested,
  ReviewApproved,
  ReviewArchived,
  ReviewRejected,
  ReviewNeedsReview,
  ReviewNeedsRevision,
  ReviewFilesUpdated,
  ReviewVotedUp,
  ReviewVotedDown,
  ReviewVoteCleared,
  ReviewJoined,
  ReviewLeft,
  ReviewTests,
  ChangeCommitted,
  ReviewIssueOpened,
  ReviewVoteRequired,
  ReviewVoteOptional,
  ReviewersEdited,
  Other,
}

impl From<String> for ActionKind {
  fn from(raw: String) -> Self { raw.parse().unwrap_or(Self::Other) }
}

impl ActionKind {
  /// The preference category this action is filed under, if any.
  pub fn category(self) -> Option<NotificationCategory> {
    use NotificationCategory as C;
    Some(match self {
      Self::CommentAdded => C::ReviewCommentNew,
      Self::CommentEdited => C::ReviewCommentUpdate,
      Self::CommentLiked => C::ReviewCommentLiked,
      Self::ReviewRequested => C::ReviewNew,
      Self::ReviewApproved
      | Self::ReviewArchived
      | Self::ReviewRejected
      | Self::ReviewNeedsReview
      | Self::ReviewNeedsRevision => C::ReviewState,
      Self::ReviewFilesUpdated => C::ReviewFiles,
      Self::ReviewVotedUp | Self::ReviewVotedDown | Self::ReviewVoteCleared => {
        C::ReviewVote
      }
      Self::ReviewJoined | Self::ReviewLeft | Self::ReviewersEdited => {
        C::ReviewJoinLeave
      }
      Self::ReviewTests => C::ReviewTests,
      Self::ChangeCommitted => C::ChangeCommit,
      Self::ReviewIssueOpened => C::ReviewOpenedIssue,
      Self::ReviewVoteRequired => C::ReviewRequiredVote,
      Self::ReviewVoteOptional => C::ReviewOptionalVote,
      Self::Other => return None,
    })
  }

  /// Whether this is a review-lifecycle action, for which moderator,
  /// reviewer and member roles are evaluated.
  pub fn is_review_lifecycle(self) -> bool {
    !matches!(
      self,
      Self::CommentAdded | Self::CommentEdited | Self::CommentLiked | Self::Other
    )
  }

  /// Whether project membership is a meaningful trigger for this action.
  pub fn member_role_applies(self) -> bool {
    !matches!(
      self,
      Self::ReviewTests
        | Self::ReviewIssueOpened
        | Self::ReviewVoteRequired
        | Self::ReviewVoteOptional
    )
  }
}

// ─── Reviewer requirement ────────────────────────────────────────────────────

/// Whether a reviewer's vote is needed for approval.
///
/// The legacy data encodes this as `true`/`false` (or their string forms) for
/// required/optional and as a numeric string for a partial quorum of a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRequirement", into = "RawRequirement")]
pub enum ReviewerRequirement {
  #[default]
  Optional,
  RequiredAll,
  /// Only this many members of a group need to vote.
  RequiredQuorum(u32),
}

impl ReviewerRequirement {
  pub fn is_required(self) -> bool { !matches!(self, Self::Optional) }

  fn quorum(n: u32) -> Result<Self, Error> {
    if n == 0 {
      return Err(Error::InvalidRequirement("quorum of zero".into()));
    }
    Ok(Self::RequiredQuorum(n))
  }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawRequirement {
  Flag(bool),
  Count(u32),
  Text(String),
}

impl TryFrom<RawRequirement> for ReviewerRequirement {
  type Error = Error;

  fn try_from(raw: RawRequirement) -> Result<Self, Self::Error> {
    match raw {
      RawRequirement::Flag(true) => Ok(Self::RequiredAll),
      RawRequirement::Flag(false) => Ok(Self::Optional),
      RawRequirement::Count(n) => Self::quorum(n),
      RawRequirement::Text(s) => match s.trim() {
        "true" => Ok(Self::RequiredAll),
        "false" | "" => Ok(Self::Optional),
        other => other
          .parse()
          .map_err(|_| Error::InvalidRequirement(format!("{other:?}")))
          .and_then(Self::quorum),
      },
    }
  }
}

impl From<ReviewerRequirement> for RawRequirement {
  fn from(req: ReviewerRequirement) -> Self {
    match req {
      ReviewerRequirement::Optional => Self::Flag(false),
      ReviewerRequirement::RequiredAll => Self::Flag(true),
      ReviewerRequirement::RequiredQuorum(n) => Self::Text(n.to_string()),
    }
  }
}

// ─── Review snapshot ─────────────────────────────────────────────────────────

/// What the review records about one participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantData {
  #[serde(default)]
  pub required:               ReviewerRequirement,
  /// Current vote value (`1`, `-1`), if any.
  #[serde(default)]
  pub vote:                   Option<i8>,
  /// The participant muted notifications for this review.
  #[serde(default, rename = "notificationsDisabled")]
  pub notifications_disabled: bool,
}

/// The review an activity refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
  pub id:           String,
  pub author:       String,
  /// Everyone on the review, author included.
  #[serde(default)]
  pub participants: BTreeMap<ParticipantRef, ParticipantData>,
}

impl Review {
  /// All participants except the author.
  pub fn reviewers(&self) -> Vec<ParticipantRef> {
    self
      .participants
      .keys()
      .filter(|p| p.as_user() != Some(self.author.as_str()))
      .cloned()
      .collect()
  }

  /// Whether `participant` muted notifications for this review.
  pub fn notifications_disabled(&self, participant: &ParticipantRef) -> bool {
    self
      .participants
      .get(participant)
      .is_some_and(|data| data.notifications_disabled)
  }
}

// ─── Activity ────────────────────────────────────────────────────────────────

/// An immutable snapshot of the triggering event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityContext {
  pub kind:           ActionKind,
  /// The user who performed the action.
  pub actor:          String,
  #[serde(default)]
  pub review:         Option<Review>,
  /// Author of the comment a `comment_liked` activity refers to.
  #[serde(default)]
  pub comment_author: Option<String>,
  /// Ids of the projects the activity affects.
  #[serde(default)]
  pub projects:       Vec<String>,
  /// Quiet events (e.g. inside a comment-batching window) notify nobody.
  #[serde(default)]
  pub quiet:          bool,
}

impl ActivityContext {
  /// Convenience constructor with all optional fields set to their defaults.
  pub fn new(kind: ActionKind, actor: impl Into<String>) -> Self {
    Self {
      kind,
      actor: actor.into(),
      review: None,
      comment_author: None,
      projects: Vec::new(),
      quiet: false,
    }
  }

  /// The review's non-author participants, or nothing without a review.
  pub fn reviewers(&self) -> Vec<ParticipantRef> {
    self.review.as_ref().map(Review::reviewers).unwrap_or_default()
  }
}
