//! Participant expansion: raw addressees → concrete recipients.
//!
//! Projects are replaced by their members, groups by their users and
//! (recursively) their sub-groups. A group that uses a mailing list is kept
//! as a single terminal address. Every identifier reached through a group or
//! project gets a [`Provenance`] entry pointing at that parent.
//!
//! Membership graphs may contain cycles; a visited set owned by the
//! [`Expander`] guarantees each group and project is expanded at most once.

use std::{
  collections::{HashMap, HashSet},
  future::Future,
  pin::Pin,
};

use herald_core::{
  directory::{Directory, Group},
  participant::ParticipantRef,
};
use tracing::{debug, warn};

use crate::{Error, Result, provenance::Provenance};

/// The flattened recipient list of one expansion.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
  /// Users and mailing-list groups, deduplicated in first-seen order.
  pub recipients: Vec<ParticipantRef>,
  pub provenance: Provenance,
  /// Every group fetched during expansion, keyed by id.
  pub groups:     HashMap<String, Group>,
}

type Expanded<'s> =
  Pin<Box<dyn Future<Output = Result<Vec<ParticipantRef>>> + Send + 's>>;

/// Single-use expansion state. Create one per top-level call; the visited
/// set and provenance must never leak into another event.
pub struct Expander<'d, D> {
  directory:  &'d D,
  seen:       HashSet<ParticipantRef>,
  provenance: Provenance,
  groups:     HashMap<String, Group>,
}

impl<'d, D: Directory> Expander<'d, D> {
  pub fn new(directory: &'d D) -> Self { Self::with_seen(directory, HashSet::new()) }

  /// Start with some groups or projects already marked as visited; they
  /// will expand to nothing.
  pub fn with_seen(directory: &'d D, seen: HashSet<ParticipantRef>) -> Self {
    Self {
      directory,
      seen,
      provenance: Provenance::new(),
      groups: HashMap::new(),
    }
  }

  /// Expand `refs` and consume the expander.
  pub async fn expand(mut self, refs: &[ParticipantRef]) -> Result<Expansion> {
    let expanded = self.expand_refs(refs.to_vec()).await?;

    let mut unique = HashSet::new();
    let recipients: Vec<ParticipantRef> = expanded
      .into_iter()
      .filter(|r| unique.insert(r.clone()))
      .collect();

    debug!(
      requested = refs.len(),
      recipients = recipients.len(),
      provenance = self.provenance.len(),
      "expanded participants"
    );

    Ok(Expansion {
      recipients,
      provenance: self.provenance,
      groups: self.groups,
    })
  }

  // Boxed so that group and project expansion can recurse through it.
  fn expand_refs<'s>(&'s mut self, refs: Vec<ParticipantRef>) -> Expanded<'s> {
    Box::pin(async move {
      let mut out = Vec::with_capacity(refs.len());
      for r in refs {
        match r {
          ParticipantRef::User(_) => out.push(r),
          ParticipantRef::Group(id) => out.extend(self.expand_group(&id).await?),
          ParticipantRef::Project(id) => out.extend(self.expand_project(&id).await?),
        }
      }
      Ok(out)
    })
  }

  async fn expand_project(&mut self, id: &str) -> Result<Vec<ParticipantRef>> {
    let key = ParticipantRef::project(id);
    if !self.seen.insert(key.clone()) {
      return Ok(Vec::new());
    }

    let project = self.directory.project(id).await.map_err(Error::directory)?;
    let Some(project) = project else {
      warn!(project = id, "project not found; skipping its members");
      return Ok(Vec::new());
    };

    for member in &project.members {
      self.provenance.record(member.clone(), key.clone());
    }
    self.expand_refs(project.members).await
  }

  async fn expand_group(&mut self, id: &str) -> Result<Vec<ParticipantRef>> {
    let key = ParticipantRef::group(id);
    if self.seen.contains(&key) {
      return Ok(Vec::new());
    }

    let Some(group) = self.fetch_group(id).await? else {
      warn!(group = id, "group not found; skipping its members");
      self.seen.insert(key);
      return Ok(Vec::new());
    };
    if group.use_mailing_list {
      return Ok(vec![key]);
    }
    self.seen.insert(key.clone());

    let users: Vec<ParticipantRef> = group.users.iter().map(ParticipantRef::user).collect();
    let subgroups: Vec<ParticipantRef> =
      group.subgroups.iter().map(ParticipantRef::group).collect();
    for child in users.iter().chain(&subgroups) {
      self.provenance.record(child.clone(), key.clone());
    }

    let mut out = users;
    out.extend(self.expand_refs(subgroups).await?);
    Ok(out)
  }

  async fn fetch_group(&mut self, id: &str) -> Result<Option<Group>> {
    if let Some(group) = self.groups.get(id) {
      return Ok(Some(group.clone()));
    }
    let group = self.directory.group(id).await.map_err(Error::directory)?;
    if let Some(group) = &group {
      self.groups.insert(id.to_owned(), group.clone());
    }
    Ok(group)
  }
}
