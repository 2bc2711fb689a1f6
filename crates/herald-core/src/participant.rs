//! Participant references — the addressable targets of a notification.
//!
//! The legacy wire format packs users, groups and projects into one string
//! field and tells them apart by a structural prefix. [`ParticipantRef`] is
//! parsed from that form exactly once, at the boundary; nothing downstream
//! ever tests or strips a prefix again.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// Wire prefix marking a group identifier.
pub const GROUP_PREFIX: &str = "swarm-group-";
/// Wire prefix marking a project identifier.
pub const PROJECT_PREFIX: &str = "swarm-project-";

/// A user, group or project, identified by its bare name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParticipantRef {
  User(String),
  Group(String),
  /// Projects are always expanded into their members, never addressed.
  Project(String),
}

impl ParticipantRef {
  pub fn user(name: impl Into<String>) -> Self { Self::User(name.into()) }

  pub fn group(name: impl Into<String>) -> Self { Self::Group(name.into()) }

  pub fn project(name: impl Into<String>) -> Self {
    Self::Project(name.into())
  }

  /// The bare name, without any wire prefix.
  pub fn name(&self) -> &str {
    match self {
      Self::User(n) | Self::Group(n) | Self::Project(n) => n,
    }
  }

  pub fn is_user(&self) -> bool { matches!(self, Self::User(_)) }

  pub fn is_group(&self) -> bool { matches!(self, Self::Group(_)) }

  pub fn is_project(&self) -> bool { matches!(self, Self::Project(_)) }

  /// Returns the user name if this is a user reference.
  pub fn as_user(&self) -> Option<&str> {
    match self {
      Self::User(n) => Some(n),
      _ => None,
    }
  }
}

impl FromStr for ParticipantRef {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    let parsed = if let Some(rest) = s.strip_prefix(PROJECT_PREFIX) {
      Self::Project(rest.to_owned())
    } else if let Some(rest) = s.strip_prefix(GROUP_PREFIX) {
      Self::Group(rest.to_owned())
    } else {
      Self::User(s.to_owned())
    };

    if parsed.name().is_empty() {
      return Err(Error::InvalidParticipant(s.to_owned()));
    }
    Ok(parsed)
  }
}

impl fmt::Display for ParticipantRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::User(n) => f.write_str(n),
      Self::Group(n) => write!(f, "{GROUP_PREFIX}{n}"),
      Self::Project(n) => write!(f, "{PROJECT_PREFIX}{n}"),
    }
  }
}

// Serialised as the wire string so the type also works as a JSON map key.
impl Serialize for ParticipantRef {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for ParticipantRef {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use super::*;

  #[test]
  fn parses_each_kind() {
    assert_eq!("alice".parse::<ParticipantRef>().unwrap(), ParticipantRef::user("alice"));
    assert_eq!(
      "swarm-group-leads".parse::<ParticipantRef>().unwrap(),
      ParticipantRef::group("leads")
    );
    assert_eq!(
      "swarm-project-jam".parse::<ParticipantRef>().unwrap(),
      ParticipantRef::project("jam")
    );
  }

  #[test]
  fn display_restores_wire_form() {
    for wire in ["bob", "swarm-group-qa", "swarm-project-gui"] {
      let parsed: ParticipantRef = wire.parse().unwrap();
      assert_eq!(parsed.to_string(), wire);
    }
  }

  #[test]
  fn bare_prefix_is_rejected() {
    assert!(matches!(
      "swarm-group-".parse::<ParticipantRef>(),
      Err(Error::InvalidParticipant(_))
    ));
    assert!("".parse::<ParticipantRef>().is_err());
    assert!("   ".parse::<ParticipantRef>().is_err());
  }

  #[test]
  fn works_as_json_map_key() {
    let mut map = BTreeMap::new();
    map.insert(ParticipantRef::group("leads"), 1);
    map.insert(ParticipantRef::user("alice"), 2);

    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"alice":2,"swarm-group-leads":1}"#);

    let back: BTreeMap<ParticipantRef, i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, map);
  }
}
