//! Integration tests for `SqliteDirectory` against an in-memory database.

use herald_core::{
  directory::{Directory, Group, Project, User},
  participant::ParticipantRef,
  preferences::{NotificationCategory, NotificationPreferences, Role},
};

use crate::{DirectorySeed, SqliteDirectory};

async fn store() -> SqliteDirectory {
  SqliteDirectory::open_in_memory()
    .await
    .expect("in-memory directory")
}

fn alice() -> User {
  User {
    full_name: "Alice Liddell".into(),
    preferences: NotificationPreferences::default()
      .with(NotificationCategory::ReviewVote, Role::Reviewer, false)
      .with_project("jam", NotificationCategory::ChangeCommit, Role::Member, false),
    followers: vec!["bob".into()],
    ..User::new("alice", "alice@example.com")
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn put_and_get_user() {
  let s = store().await;
  s.put_user(&alice()).await.unwrap();

  let fetched = s.user("alice").await.unwrap();
  assert_eq!(fetched, Some(alice()));
}

#[tokio::test]
async fn missing_user_is_none() {
  let s = store().await;
  assert!(s.user("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn existence_checks() {
  let s = store().await;
  s.put_user(&alice()).await.unwrap();
  s.put_group(&Group::new("qa")).await.unwrap();

  assert!(s.user_exists("alice").await.unwrap());
  assert!(!s.user_exists("qa").await.unwrap());
  assert!(s.group_exists("qa").await.unwrap());
  assert!(!s.group_exists("alice").await.unwrap());
}

#[tokio::test]
async fn put_user_replaces_existing() {
  let s = store().await;
  s.put_user(&alice()).await.unwrap();
  s.put_user(&User::new("alice", "new@example.com")).await.unwrap();

  let fetched = s.user("alice").await.unwrap().unwrap();
  assert_eq!(fetched.email, "new@example.com");
  assert!(fetched.followers.is_empty());
}

#[tokio::test]
async fn batched_users_skip_unknown_ids() {
  let s = store().await;
  s.put_user(&alice()).await.unwrap();
  s.put_user(&User::new("bob", "bob@example.com")).await.unwrap();
  s.put_user(&User::new("carol", "carol@example.com")).await.unwrap();

  let ids = vec!["bob".to_owned(), "ghost".to_owned(), "alice".to_owned()];
  let mut found: Vec<String> = s.users(&ids).await.unwrap().into_iter().map(|u| u.id).collect();
  found.sort();
  assert_eq!(found, vec!["alice", "bob"]);

  assert!(s.users(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn batched_users_handle_large_id_lists() {
  let s = store().await;
  let seed = DirectorySeed {
    users: (0..40_000)
      .map(|i| User::new(format!("u{i}"), format!("u{i}@example.com")))
      .collect(),
    ..Default::default()
  };
  s.import(&seed).await.unwrap();

  let mut ids: Vec<String> = seed.users.iter().map(|u| u.id.clone()).collect();
  ids.push("ghost".into());
  assert_eq!(s.users(&ids).await.unwrap().len(), 40_000);
}

// ─── Groups and projects ─────────────────────────────────────────────────────

#[tokio::test]
async fn group_round_trips_mailing_list_fields() {
  let s = store().await;
  let group = Group {
    email: Some("qa@example.com".into()),
    use_mailing_list: true,
    users: vec!["alice".into()],
    subgroups: vec!["inner".into()],
    ..Group::new("qa")
  };
  s.put_group(&group).await.unwrap();

  assert_eq!(s.group("qa").await.unwrap(), Some(group));
  assert!(s.group("inner").await.unwrap().is_none());
}

#[tokio::test]
async fn project_keeps_member_kinds() {
  let s = store().await;
  let project = Project {
    members: vec![
      ParticipantRef::user("alice"),
      ParticipantRef::group("devs"),
      ParticipantRef::project("child"),
    ],
    moderators: vec![ParticipantRef::group("leads")],
    followers: vec!["bob".into()],
    ..Project::new("jam")
  };
  s.put_project(&project).await.unwrap();

  assert_eq!(s.project("jam").await.unwrap(), Some(project));
}

// ─── Import ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn import_seed_from_json() {
  let seed: DirectorySeed = serde_json::from_str(
    r#"{
      "users": [{ "id": "alice", "email": "alice@example.com" }],
      "groups": [{ "id": "leads", "users": ["alice"] }],
      "projects": [{ "id": "jam", "moderators": ["swarm-group-leads"] }]
    }"#,
  )
  .unwrap();

  let s = store().await;
  s.import(&seed).await.unwrap();

  assert_eq!(s.user("alice").await.unwrap().unwrap().email, "alice@example.com");
  assert_eq!(s.group("leads").await.unwrap().unwrap().users, vec!["alice"]);
  assert_eq!(
    s.project("jam").await.unwrap().unwrap().moderators,
    vec![ParticipantRef::group("leads")]
  );
}
