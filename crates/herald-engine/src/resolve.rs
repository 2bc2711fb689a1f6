//! End-to-end recipient resolution for one activity.

use std::collections::{HashMap, HashSet};

use herald_core::{
  activity::ActivityContext,
  directory::{Directory, Project, User},
  participant::ParticipantRef,
};
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  address::is_valid_address,
  config::EngineConfig,
  expand::Expander,
  filter::NotificationFilter,
  participant::{GroupParticipant, Participant, UserParticipant},
  roles::RoleResolver,
};

/// Turns the addressees of an activity into the email addresses that should
/// be notified.
pub struct RecipientResolver<'a, D> {
  directory: &'a D,
  config:    &'a EngineConfig,
}

impl<'a, D: Directory> RecipientResolver<'a, D> {
  pub fn new(directory: &'a D, config: &'a EngineConfig) -> Self { Self { directory, config } }

  /// Resolve `to` into deduplicated addresses, in first-seen order.
  ///
  /// A quiet activity resolves to nothing without touching the directory.
  /// Unknown users and invalid addresses are skipped; only a failing
  /// directory aborts the resolution.
  pub async fn resolve(
    &self,
    to: &[ParticipantRef],
    activity: &ActivityContext,
  ) -> Result<Vec<String>> {
    if activity.quiet {
      debug!(kind = %activity.kind, "quiet activity; nobody is notified");
      return Ok(Vec::new());
    }

    let expansion = Expander::new(self.directory).expand(to).await?;
    let actor = self.actor(activity).await?;
    let projects = self.projects(activity).await?;
    let users = self.users(&expansion.recipients).await?;

    let roles = RoleResolver::new(activity, actor.as_ref(), &expansion.provenance);
    let filter = NotificationFilter::new(activity, roles, &projects);
    let defaults = &self.config.defaults;

    let mut seen = HashSet::new();
    let mut addresses = Vec::new();
    for candidate in &expansion.recipients {
      let participant: Box<dyn Participant + '_> = match candidate {
        ParticipantRef::User(name) => match users.get(name.as_str()) {
          Some(user) => Box::new(UserParticipant::new(user, defaults)),
          None => {
            warn!(user = %name, "unknown user; skipping");
            continue;
          }
        },
        ParticipantRef::Group(name) => match expansion.groups.get(name) {
          Some(group) => Box::new(GroupParticipant::new(group, defaults)),
          None => continue,
        },
        // Projects never survive expansion.
        ParticipantRef::Project(_) => continue,
      };

      let Some(address) = participant.address().map(str::trim).filter(|a| !a.is_empty())
      else {
        debug!(participant = %candidate, "no address configured; skipping");
        continue;
      };
      if !is_valid_address(address) {
        warn!(participant = %candidate, address, "invalid email address; skipping");
        continue;
      }
      if !filter.wants_email(participant.as_ref()) {
        continue;
      }
      if seen.insert(address.to_owned()) {
        addresses.push(address.to_owned());
      }
    }

    info!(
      kind = %activity.kind,
      candidates = expansion.recipients.len(),
      recipients = addresses.len(),
      "resolved notification recipients"
    );
    Ok(addresses)
  }

  async fn actor(&self, activity: &ActivityContext) -> Result<Option<User>> {
    if activity.actor.is_empty() {
      return Ok(None);
    }
    self
      .directory
      .user(&activity.actor)
      .await
      .map_err(Error::directory)
  }

  async fn projects(&self, activity: &ActivityContext) -> Result<Vec<Project>> {
    let mut projects = Vec::with_capacity(activity.projects.len());
    for id in &activity.projects {
      match self.directory.project(id).await.map_err(Error::directory)? {
        Some(project) => projects.push(project),
        None => warn!(project = %id, "affected project not found; ignoring"),
      }
    }
    Ok(projects)
  }

  async fn users(&self, recipients: &[ParticipantRef]) -> Result<HashMap<String, User>> {
    let ids: Vec<String> = recipients
      .iter()
      .filter_map(ParticipantRef::as_user)
      .map(str::to_owned)
      .collect();
    if ids.is_empty() {
      return Ok(HashMap::new());
    }

    let users = self.directory.users(&ids).await.map_err(Error::directory)?;
    Ok(users.into_iter().map(|u| (u.id.clone(), u)).collect())
  }
}
