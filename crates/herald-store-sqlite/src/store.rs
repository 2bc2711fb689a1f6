//! [`SqliteDirectory`]: the SQLite implementation of [`Directory`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use serde::{Deserialize, Serialize};
use tracing::info;

use herald_core::directory::{Directory, Group, Project, User};

use crate::{
  Result,
  encode::{GROUP_COLUMNS, PROJECT_COLUMNS, RawGroup, RawProject, RawUser, USER_COLUMNS},
  schema::SCHEMA,
};

/// A bulk load of directory records, as read by `herald-server --import`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySeed {
  #[serde(default)]
  pub users:    Vec<User>,
  #[serde(default)]
  pub groups:   Vec<Group>,
  #[serde(default)]
  pub projects: Vec<Project>,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A user/group/project directory backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteDirectory {
  conn: tokio_rusqlite::Connection,
}

impl SqliteDirectory {
  /// Open (or create) a directory at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert or replace a user.
  pub async fn put_user(&self, user: &User) -> Result<()> {
    let raw = RawUser::from_user(user)?;
    self.conn.call(move |conn| Ok(write_user(conn, &raw)?)).await?;
    Ok(())
  }

  /// Insert or replace a group.
  pub async fn put_group(&self, group: &Group) -> Result<()> {
    let raw = RawGroup::from_group(group)?;
    self.conn.call(move |conn| Ok(write_group(conn, &raw)?)).await?;
    Ok(())
  }

  /// Insert or replace a project.
  pub async fn put_project(&self, project: &Project) -> Result<()> {
    let raw = RawProject::from_project(project)?;
    self.conn.call(move |conn| Ok(write_project(conn, &raw)?)).await?;
    Ok(())
  }

  /// Write every record of `seed` in one transaction. Existing records with
  /// the same id are replaced.
  pub async fn import(&self, seed: &DirectorySeed) -> Result<()> {
    let users = seed.users.iter().map(RawUser::from_user).collect::<Result<Vec<_>>>()?;
    let groups = seed.groups.iter().map(RawGroup::from_group).collect::<Result<Vec<_>>>()?;
    let projects = seed
      .projects
      .iter()
      .map(RawProject::from_project)
      .collect::<Result<Vec<_>>>()?;
    let counts = (users.len(), groups.len(), projects.len());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for raw in &users {
          write_user(&tx, raw)?;
        }
        for raw in &groups {
          write_group(&tx, raw)?;
        }
        for raw in &projects {
          write_project(&tx, raw)?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    info!(users = counts.0, groups = counts.1, projects = counts.2, "imported directory seed");
    Ok(())
  }

  /// `table` is one of the fixed schema table names, never user input.
  async fn exists(&self, table: &'static str, id: &str) -> Result<bool> {
    let id = id.to_owned();
    let found = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT 1 FROM {table} WHERE id = ?1"),
            rusqlite::params![id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false))
      })
      .await?;
    Ok(found)
  }
}

fn write_user(conn: &rusqlite::Connection, raw: &RawUser) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT OR REPLACE INTO users (id, full_name, email, preferences, followers)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![raw.id, raw.full_name, raw.email, raw.preferences, raw.followers],
  )?;
  Ok(())
}

fn write_group(conn: &rusqlite::Connection, raw: &RawGroup) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT OR REPLACE INTO groups
       (id, name, email, use_mailing_list, users, subgroups, preferences)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    rusqlite::params![
      raw.id,
      raw.name,
      raw.email,
      raw.use_mailing_list,
      raw.users,
      raw.subgroups,
      raw.preferences,
    ],
  )?;
  Ok(())
}

fn write_project(conn: &rusqlite::Connection, raw: &RawProject) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT OR REPLACE INTO projects (id, name, members, moderators, followers)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![raw.id, raw.name, raw.members, raw.moderators, raw.followers],
  )?;
  Ok(())
}

// ─── Directory impl ──────────────────────────────────────────────────────────

impl Directory for SqliteDirectory {
  type Error = crate::Error;

  async fn user(&self, id: &str) -> Result<Option<User>> {
    let id = id.to_owned();
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            rusqlite::params![id],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn users(&self, ids: &[String]) -> Result<Vec<User>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    // One bound JSON array keeps the statement under SQLite's variable limit.
    let ids = serde_json::to_string(ids)?;

    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users WHERE id IN (SELECT value FROM json_each(?1))"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![ids], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn user_exists(&self, id: &str) -> Result<bool> { self.exists("users", id).await }

  async fn group(&self, id: &str) -> Result<Option<Group>> {
    let id = id.to_owned();
    let raw: Option<RawGroup> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {GROUP_COLUMNS} FROM groups WHERE id = ?1"),
            rusqlite::params![id],
            RawGroup::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawGroup::into_group).transpose()
  }

  async fn group_exists(&self, id: &str) -> Result<bool> { self.exists("groups", id).await }

  async fn project(&self, id: &str) -> Result<Option<Project>> {
    let id = id.to_owned();
    let raw: Option<RawProject> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
            rusqlite::params![id],
            RawProject::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProject::into_project).transpose()
  }
}
