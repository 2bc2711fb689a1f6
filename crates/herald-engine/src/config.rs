//! Engine configuration.

use herald_core::preferences::{NotificationCategory, NotificationPreferences, Role};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Installation-wide notification settings, deserialised from the
/// `[notifications]` table of the server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
  /// Fallback preference matrix for cells a user or group left unset.
  /// Replaces the built-in defaults entirely when given.
  #[serde(default = "default_preferences")]
  pub defaults: NotificationPreferences,
}

impl Default for EngineConfig {
  fn default() -> Self { Self { defaults: default_preferences() } }
}

/// Everything enabled, except mail about your own actions.
fn default_preferences() -> NotificationPreferences {
  NotificationCategory::iter().fold(NotificationPreferences::default(), |prefs, category| {
    prefs.with(category, Role::Myself, false)
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn self_disabled_by_default() {
    let config = EngineConfig::default();
    for category in NotificationCategory::iter() {
      assert_eq!(config.defaults.setting(category, Role::Myself, None), Some(false));
      assert_eq!(config.defaults.setting(category, Role::Reviewer, None), None);
    }
  }

  #[test]
  fn missing_defaults_use_builtin() {
    let config: EngineConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, EngineConfig::default());
  }
}
