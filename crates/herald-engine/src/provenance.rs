//! Provenance — which group or project an expanded identifier came from.

use std::collections::{BTreeMap, HashSet, btree_map::Entry};

use herald_core::participant::ParticipantRef;
use serde::Serialize;

/// Maps each expanded child to the immediate parent it was expanded from.
///
/// A child has at most one recorded parent: the first expansion path that
/// reached it wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Provenance(BTreeMap<ParticipantRef, ParticipantRef>);

impl Provenance {
  pub fn new() -> Self { Self::default() }

  /// Record `parent` for `child` unless a parent is already known.
  /// Returns `true` if this call wrote the entry.
  pub fn record(&mut self, child: ParticipantRef, parent: ParticipantRef) -> bool {
    match self.0.entry(child) {
      Entry::Vacant(slot) => {
        slot.insert(parent);
        true
      }
      Entry::Occupied(_) => false,
    }
  }

  pub fn parent(&self, child: &ParticipantRef) -> Option<&ParticipantRef> {
    self.0.get(child)
  }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Walk up from `start` until reaching an identifier in `targets`.
  ///
  /// Returns the identifier the walk stopped at: a member of `targets` when
  /// one is an ancestor of `start`, otherwise the topmost ancestor. A looping
  /// chain stops at the first repeated identifier.
  pub fn inherited_id<'a>(
    &'a self,
    start: &'a ParticipantRef,
    targets: &[ParticipantRef],
  ) -> &'a ParticipantRef {
    let mut current = start;
    let mut visited = HashSet::new();
    while !targets.contains(current) && visited.insert(current) {
      match self.0.get(current) {
        Some(parent) => current = parent,
        None => break,
      }
    }
    current
  }

  /// Whether `id` is in `targets`, directly or through an ancestor.
  pub fn attributes_to(&self, id: &ParticipantRef, targets: &[ParticipantRef]) -> bool {
    targets.contains(self.inherited_id(id, targets))
  }
}
