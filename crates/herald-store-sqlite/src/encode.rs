//! Conversion between directory records and their SQLite rows.
//!
//! Lists and preference matrices are stored as compact JSON; participant
//! references inside project lists use their wire form.

use herald_core::directory::{Group, Project, User};
use serde::{Serialize, de::DeserializeOwned};

use crate::Result;

fn encode_json<T: Serialize>(value: &T) -> Result<String> {
  Ok(serde_json::to_string(value)?)
}

fn decode_json<T: DeserializeOwned>(s: &str) -> Result<T> { Ok(serde_json::from_str(s)?) }

// ─── Users ───────────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "id, full_name, email, preferences, followers";

/// A `users` row with JSON columns still encoded.
pub struct RawUser {
  pub id:          String,
  pub full_name:   String,
  pub email:       String,
  pub preferences: String,
  pub followers:   String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      full_name:   row.get(1)?,
      email:       row.get(2)?,
      preferences: row.get(3)?,
      followers:   row.get(4)?,
    })
  }

  pub fn from_user(user: &User) -> Result<Self> {
    Ok(Self {
      id:          user.id.clone(),
      full_name:   user.full_name.clone(),
      email:       user.email.clone(),
      preferences: encode_json(&user.preferences)?,
      followers:   encode_json(&user.followers)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:          self.id,
      full_name:   self.full_name,
      email:       self.email,
      preferences: decode_json(&self.preferences)?,
      followers:   decode_json(&self.followers)?,
    })
  }
}

// ─── Groups ──────────────────────────────────────────────────────────────────

pub const GROUP_COLUMNS: &str =
  "id, name, email, use_mailing_list, users, subgroups, preferences";

pub struct RawGroup {
  pub id:               String,
  pub name:             String,
  pub email:            Option<String>,
  pub use_mailing_list: bool,
  pub users:            String,
  pub subgroups:        String,
  pub preferences:      String,
}

impl RawGroup {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      name:             row.get(1)?,
      email:            row.get(2)?,
      use_mailing_list: row.get(3)?,
      users:            row.get(4)?,
      subgroups:        row.get(5)?,
      preferences:      row.get(6)?,
    })
  }

  pub fn from_group(group: &Group) -> Result<Self> {
    Ok(Self {
      id:               group.id.clone(),
      name:             group.name.clone(),
      email:            group.email.clone(),
      use_mailing_list: group.use_mailing_list,
      users:            encode_json(&group.users)?,
      subgroups:        encode_json(&group.subgroups)?,
      preferences:      encode_json(&group.preferences)?,
    })
  }

  pub fn into_group(self) -> Result<Group> {
    Ok(Group {
      id:               self.id,
      name:             self.name,
      email:            self.email,
      use_mailing_list: self.use_mailing_list,
      users:            decode_json(&self.users)?,
      subgroups:        decode_json(&self.subgroups)?,
      preferences:      decode_json(&self.preferences)?,
    })
  }
}

// ─── Projects ────────────────────────────────────────────────────────────────

pub const PROJECT_COLUMNS: &str = "id, name, members, moderators, followers";

pub struct RawProject {
  pub id:         String,
  pub name:       String,
  pub members:    String,
  pub moderators: String,
  pub followers:  String,
}

impl RawProject {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      members:    row.get(2)?,
      moderators: row.get(3)?,
      followers:  row.get(4)?,
    })
  }

  pub fn from_project(project: &Project) -> Result<Self> {
    Ok(Self {
      id:         project.id.clone(),
      name:       project.name.clone(),
      members:    encode_json(&project.members)?,
      moderators: encode_json(&project.moderators)?,
      followers:  encode_json(&project.followers)?,
    })
  }

  pub fn into_project(self) -> Result<Project> {
    Ok(Project {
      id:         self.id,
      name:       self.name,
      members:    decode_json(&self.members)?,
      moderators: decode_json(&self.moderators)?,
      followers:  decode_json(&self.followers)?,
    })
  }
}
