//! Per-candidate notification decision.

use herald_core::{activity::ActivityContext, directory::Project};
use tracing::debug;

use crate::{participant::Participant, roles::RoleResolver};

/// Decides, for each candidate, whether the activity warrants an email.
pub struct NotificationFilter<'a> {
  activity: &'a ActivityContext,
  roles:    RoleResolver<'a>,
  /// Affected projects that exist in the directory, in activity order.
  projects: &'a [Project],
}

impl<'a> NotificationFilter<'a> {
  pub fn new(
    activity: &'a ActivityContext,
    roles: RoleResolver<'a>,
    projects: &'a [Project],
  ) -> Self {
    Self { activity, roles, projects }
  }

  /// Whether `participant` should be mailed about the activity.
  ///
  /// With affected projects, roles and preferences are evaluated project by
  /// project and the first project that says "send" decides. Projects in
  /// which the participant holds no role are skipped, so an unrelated project
  /// cannot override an opt-out expressed in a project that does apply. When
  /// no project yields a role, the participant is judged as if no project
  /// were affected.
  pub fn wants_email(&self, participant: &dyn Participant) -> bool {
    let id = participant.id();
    let kind = self.activity.kind;

    let muted = self
      .activity
      .review
      .as_ref()
      .is_some_and(|review| review.notifications_disabled(id));
    if muted {
      debug!(participant = %id, "notifications disabled for this review");
      return false;
    }

    let relevant: Vec<_> = self
      .projects
      .iter()
      .map(|project| (project, self.roles.roles_for(id, Some(project))))
      .filter(|(_, roles)| !roles.is_empty())
      .collect();

    if relevant.is_empty() {
      let roles = self.roles.roles_for(id, None);
      return participant.wants_email(&roles, kind, None);
    }

    relevant.iter().any(|(project, roles)| {
      let send = participant.wants_email(roles, kind, Some(&project.id));
      debug!(participant = %id, project = %project.id, ?roles, send, "evaluated preferences");
      send
    })
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, collections::BTreeMap};

  use herald_core::{
    activity::{ActionKind, ParticipantData, Review},
    participant::ParticipantRef,
    preferences::{NotificationCategory, NotificationPreferences, Role, RoleSet},
  };

  use super::*;
  use crate::provenance::Provenance;

  /// Records every project it is asked about; says "send" only for `yes`.
  struct Recorder {
    id:       ParticipantRef,
    yes:      &'static str,
    prefs:    NotificationPreferences,
    asked:    RefCell<Vec<Option<String>>>,
  }

  impl Recorder {
    fn new(yes: &'static str) -> Self {
      Self {
        id: ParticipantRef::user("u"),
        yes,
        prefs: NotificationPreferences::default(),
        asked: RefCell::new(Vec::new()),
      }
    }
  }

  impl Participant for Recorder {
    fn id(&self) -> &ParticipantRef { &self.id }
    fn address(&self) -> Option<&str> { Some("u@example.com") }
    fn preferences(&self) -> &NotificationPreferences { &self.prefs }
    fn defaults(&self) -> &NotificationPreferences { &self.prefs }

    fn wants_email(&self, _: &RoleSet, _: ActionKind, project: Option<&str>) -> bool {
      self.asked.borrow_mut().push(project.map(str::to_owned));
      project == Some(self.yes)
    }
  }

  #[test]
  fn first_sending_project_short_circuits() {
    let act = ActivityContext {
      projects: vec!["first".into(), "second".into()],
      ..ActivityContext::new(ActionKind::ReviewApproved, "actor")
    };
    let projects = [
      Project { members: vec![ParticipantRef::user("u")], ..Project::new("first") },
      Project { members: vec![ParticipantRef::user("u")], ..Project::new("second") },
    ];
    let prov = Provenance::new();
    let filter = NotificationFilter::new(&act, RoleResolver::new(&act, None, &prov), &projects);

    let rec = Recorder::new("first");
    assert!(filter.wants_email(&rec));
    assert_eq!(*rec.asked.borrow(), vec![Some("first".to_owned())]);

    let rec = Recorder::new("second");
    assert!(filter.wants_email(&rec));
    assert_eq!(rec.asked.borrow().len(), 2);
  }

  #[test]
  fn no_projects_evaluates_once_without_project() {
    let act = ActivityContext::new(ActionKind::ReviewApproved, "actor");
    let prov = Provenance::new();
    let filter = NotificationFilter::new(&act, RoleResolver::new(&act, None, &prov), &[]);

    let rec = Recorder::new("anything");
    assert!(!filter.wants_email(&rec));
    assert_eq!(*rec.asked.borrow(), vec![None]);
  }

  #[test]
  fn muted_participant_is_never_evaluated() {
    let mut participants = BTreeMap::new();
    participants.insert(
      ParticipantRef::user("u"),
      ParticipantData { notifications_disabled: true, ..Default::default() },
    );
    let act = ActivityContext {
      review: Some(Review { id: "7".into(), author: "a".into(), participants }),
      ..ActivityContext::new(ActionKind::CommentAdded, "actor")
    };
    let prov = Provenance::new();
    let filter = NotificationFilter::new(&act, RoleResolver::new(&act, None, &prov), &[]);

    let rec = Recorder::new("anything");
    assert!(!filter.wants_email(&rec));
    assert!(rec.asked.borrow().is_empty());
  }

  #[test]
  fn project_preferences_decide_per_project() {
    use crate::participant::UserParticipant;
    use herald_core::directory::User;

    let act = ActivityContext {
      projects: vec!["quiet".into(), "loud".into()],
      ..ActivityContext::new(ActionKind::ChangeCommitted, "actor")
    };
    let projects = [
      Project { members: vec![ParticipantRef::user("m")], ..Project::new("quiet") },
      Project { members: vec![ParticipantRef::user("m")], ..Project::new("loud") },
    ];
    let mut member = User::new("m", "m@example.com");
    member.preferences = NotificationPreferences::default()
      .with_project("quiet", NotificationCategory::ChangeCommit, Role::Member, false)
      .with_project("loud", NotificationCategory::ChangeCommit, Role::Member, false);
    let defaults = NotificationPreferences::default();
    let prov = Provenance::new();
    let filter = NotificationFilter::new(&act, RoleResolver::new(&act, None, &prov), &projects);

    assert!(!filter.wants_email(&UserParticipant::new(&member, &defaults)));

    member.preferences = NotificationPreferences::default()
      .with_project("quiet", NotificationCategory::ChangeCommit, Role::Member, false);
    assert!(filter.wants_email(&UserParticipant::new(&member, &defaults)));
  }

  #[test]
  fn projects_without_roles_are_skipped() {
    let act = ActivityContext {
      projects: vec!["other".into(), "mine".into()],
      ..ActivityContext::new(ActionKind::ReviewApproved, "actor")
    };
    let projects = [
      Project::new("other"),
      Project { members: vec![ParticipantRef::user("u")], ..Project::new("mine") },
    ];
    let prov = Provenance::new();
    let filter = NotificationFilter::new(&act, RoleResolver::new(&act, None, &prov), &projects);

    let rec = Recorder::new("other");
    assert!(!filter.wants_email(&rec));
    assert_eq!(*rec.asked.borrow(), vec![Some("mine".to_owned())]);
  }

  #[test]
  fn unrelated_project_does_not_override_opt_out() {
    use crate::participant::UserParticipant;
    use herald_core::directory::User;

    let act = ActivityContext {
      projects: vec!["other".into(), "mine".into()],
      ..ActivityContext::new(ActionKind::ChangeCommitted, "actor")
    };
    let projects = [
      Project::new("other"),
      Project { members: vec![ParticipantRef::user("m")], ..Project::new("mine") },
    ];
    let mut member = User::new("m", "m@example.com");
    member.preferences = NotificationPreferences::default()
      .with_project("mine", NotificationCategory::ChangeCommit, Role::Member, false);
    let defaults = NotificationPreferences::default();
    let prov = Provenance::new();
    let filter = NotificationFilter::new(&act, RoleResolver::new(&act, None, &prov), &projects);

    assert!(!filter.wants_email(&UserParticipant::new(&member, &defaults)));
  }
}
