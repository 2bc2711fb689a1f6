//! In-memory [`Directory`] for engine tests.
//!
//! Counts every lookup so tests can assert how often the directory was
//! consulted, and can be switched offline to simulate an unreachable backend.

use std::{
  collections::HashMap,
  sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use herald_core::directory::{Directory, Group, Project, User};

#[derive(Debug, thiserror::Error)]
#[error("directory offline")]
pub struct Offline;

#[derive(Default)]
pub struct MemoryDirectory {
  users:    HashMap<String, User>,
  groups:   HashMap<String, Group>,
  projects: HashMap<String, Project>,
  calls:    AtomicUsize,
  offline:  AtomicBool,
}

impl MemoryDirectory {
  pub fn with_user(mut self, user: User) -> Self {
    self.users.insert(user.id.clone(), user);
    self
  }

  pub fn with_group(mut self, group: Group) -> Self {
    self.groups.insert(group.id.clone(), group);
    self
  }

  pub fn with_project(mut self, project: Project) -> Self {
    self.projects.insert(project.id.clone(), project);
    self
  }

  /// Number of lookups served (or refused) so far.
  pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

  pub fn go_offline(&self) { self.offline.store(true, Ordering::SeqCst); }

  fn touch(&self) -> Result<(), Offline> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    if self.offline.load(Ordering::SeqCst) {
      return Err(Offline);
    }
    Ok(())
  }
}

impl Directory for MemoryDirectory {
  type Error = Offline;

  async fn user(&self, id: &str) -> Result<Option<User>, Offline> {
    self.touch()?;
    Ok(self.users.get(id).cloned())
  }

  async fn users(&self, ids: &[String]) -> Result<Vec<User>, Offline> {
    self.touch()?;
    Ok(ids.iter().filter_map(|id| self.users.get(id).cloned()).collect())
  }

  async fn group(&self, id: &str) -> Result<Option<Group>, Offline> {
    self.touch()?;
    Ok(self.groups.get(id).cloned())
  }

  async fn project(&self, id: &str) -> Result<Option<Project>, Offline> {
    self.touch()?;
    Ok(self.projects.get(id).cloned())
  }
}
