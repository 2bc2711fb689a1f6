//! Deliverable candidates: a user or a mailing-list group, seen through one
//! interface by the filter.

use herald_core::{
  activity::ActionKind,
  directory::{Group, User},
  participant::ParticipantRef,
  preferences::{NotificationPreferences, RoleSet},
};

/// A candidate recipient that owns an address and a preference matrix.
pub trait Participant {
  fn id(&self) -> &ParticipantRef;

  /// The address mail would go to; `None` if none is configured.
  fn address(&self) -> Option<&str>;

  fn preferences(&self) -> &NotificationPreferences;

  /// Installation-wide fallbacks for cells the participant left unset.
  fn defaults(&self) -> &NotificationPreferences;

  fn wants_email(&self, roles: &RoleSet, kind: ActionKind, project: Option<&str>) -> bool {
    self
      .preferences()
      .decide(kind.category(), roles, project, self.defaults())
  }
}

pub struct UserParticipant<'a> {
  id:       ParticipantRef,
  user:     &'a User,
  defaults: &'a NotificationPreferences,
}

impl<'a> UserParticipant<'a> {
  pub fn new(user: &'a User, defaults: &'a NotificationPreferences) -> Self {
    Self { id: ParticipantRef::user(&user.id), user, defaults }
  }
}

impl Participant for UserParticipant<'_> {
  fn id(&self) -> &ParticipantRef { &self.id }

  fn address(&self) -> Option<&str> { Some(self.user.email.as_str()) }

  fn preferences(&self) -> &NotificationPreferences { &self.user.preferences }

  fn defaults(&self) -> &NotificationPreferences { self.defaults }
}

/// A group addressed through its mailing list.
pub struct GroupParticipant<'a> {
  id:       ParticipantRef,
  group:    &'a Group,
  defaults: &'a NotificationPreferences,
}

impl<'a> GroupParticipant<'a> {
  pub fn new(group: &'a Group, defaults: &'a NotificationPreferences) -> Self {
    Self { id: group.participant(), group, defaults }
  }
}

impl Participant for GroupParticipant<'_> {
  fn id(&self) -> &ParticipantRef { &self.id }

  fn address(&self) -> Option<&str> { self.group.email.as_deref() }

  fn preferences(&self) -> &NotificationPreferences { &self.group.preferences }

  fn defaults(&self) -> &NotificationPreferences { self.defaults }
}

#[cfg(test)]
mod tests {
  use herald_core::preferences::{NotificationCategory, Role};

  use super::*;

  #[test]
  fn group_uses_its_own_matrix() {
    let defaults = NotificationPreferences::default();
    let group = Group {
      email: Some("qa@example.com".into()),
      use_mailing_list: true,
      preferences: NotificationPreferences::default()
        .with(NotificationCategory::ReviewVote, Role::Reviewer, false),
      ..Group::new("qa")
    };
    let participant = GroupParticipant::new(&group, &defaults);
    let reviewer: RoleSet = [Role::Reviewer].into_iter().collect();

    assert_eq!(participant.id(), &ParticipantRef::group("qa"));
    assert_eq!(participant.address(), Some("qa@example.com"));
    assert!(!participant.wants_email(&reviewer, ActionKind::ReviewVotedUp, None));
    assert!(participant.wants_email(&reviewer, ActionKind::ReviewApproved, None));
  }

  #[test]
  fn user_falls_back_to_defaults() {
    let defaults = NotificationPreferences::default()
      .with(NotificationCategory::ReviewFiles, Role::Member, false);
    let user = User::new("ann", "ann@example.com");
    let participant = UserParticipant::new(&user, &defaults);
    let member: RoleSet = [Role::Member].into_iter().collect();

    assert!(!participant.wants_email(&member, ActionKind::ReviewFilesUpdated, None));
    assert!(participant.wants_email(&member, ActionKind::ChangeCommitted, None));
  }
}
