//! Role resolution: which roles does a recipient hold for an activity?
//!
//! Roles inherited through group or project membership are attributed by
//! walking the expansion [`Provenance`] up to the nearest ancestor that
//! appears in the list being tested (reviewers, moderators, members).

use herald_core::{
  activity::{ActionKind, ActivityContext},
  directory::{Project, User},
  participant::ParticipantRef,
  preferences::{Role, RoleSet},
};

use crate::provenance::Provenance;

pub struct RoleResolver<'a> {
  activity:   &'a ActivityContext,
  /// The user who performed the activity, if known to the directory.
  actor:      Option<&'a User>,
  provenance: &'a Provenance,
  reviewers:  Vec<ParticipantRef>,
}

impl<'a> RoleResolver<'a> {
  pub fn new(
    activity: &'a ActivityContext,
    actor: Option<&'a User>,
    provenance: &'a Provenance,
  ) -> Self {
    Self {
      activity,
      actor,
      provenance,
      reviewers: activity.reviewers(),
    }
  }

  /// Compute the roles `recipient` holds, optionally in the context of one
  /// affected `project`.
  pub fn roles_for(&self, recipient: &ParticipantRef, project: Option<&Project>) -> RoleSet {
    let mut roles = RoleSet::new();

    if recipient.as_user() == Some(self.activity.actor.as_str()) {
      roles.insert(Role::Myself);
    }
    if self.is_follower(recipient, project) {
      roles.insert(Role::Follower);
    }

    let kind = self.activity.kind;
    match kind {
      ActionKind::CommentLiked => {
        if self.is_comment_author(recipient) {
          roles.insert(Role::Commenter);
        }
      }
      ActionKind::CommentAdded | ActionKind::CommentEdited => {
        if self.is_review_author(recipient) {
          roles.insert(Role::Author);
        }
        if self.provenance.attributes_to(recipient, &self.reviewers) {
          roles.insert(Role::Reviewer);
        }
      }
      kind if kind.is_review_lifecycle() => {
        if self.is_review_author(recipient) {
          roles.insert(Role::Author);
        }
        if let Some(project) = project
          && self.provenance.attributes_to(recipient, &project.moderators)
        {
          roles.insert(Role::Moderator);
        }
        if self.provenance.attributes_to(recipient, &self.reviewers) {
          roles.insert(Role::Reviewer);
        }
        if kind.member_role_applies()
          && let Some(project) = project
          && self.provenance.attributes_to(recipient, &project.members)
        {
          roles.insert(Role::Member);
        }

        // Someone who just left was a reviewer until a moment ago.
        if kind == ActionKind::ReviewLeft && roles.is_empty() {
          roles.insert(Role::Reviewer);
        }
      }
      _ => {}
    }

    roles
  }

  fn is_follower(&self, recipient: &ParticipantRef, project: Option<&Project>) -> bool {
    let Some(name) = recipient.as_user() else {
      return false;
    };
    let follows_actor = self
      .actor
      .is_some_and(|actor| actor.followers.iter().any(|f| f == name));
    let follows_project =
      project.is_some_and(|p| p.followers.iter().any(|f| f == name));
    follows_actor || follows_project
  }

  fn is_review_author(&self, recipient: &ParticipantRef) -> bool {
    let author = self.activity.review.as_ref().map(|r| r.author.as_str());
    author.is_some() && recipient.as_user() == author
  }

  /// Only the user who wrote the liked comment. Group membership never makes
  /// someone a comment's author.
  fn is_comment_author(&self, recipient: &ParticipantRef) -> bool {
    let author = self.activity.comment_author.as_deref();
    author.is_some() && recipient.as_user() == author
  }
}
