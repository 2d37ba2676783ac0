//! Profile activation.

use pom_model::PomProfile;
use std::collections::BTreeSet;

/// The set of profile ids a caller activated for a resolution.
///
/// A declared profile participates when its id is in this set or when it
/// declares `<activeByDefault>true</activeByDefault>`. No other activation
/// condition (OS, JDK, file presence) is evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveProfiles {
    ids: BTreeSet<String>,
}

impl ActiveProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&mut self, id: impl Into<String>) {
        self.ids.insert(id.into());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `profile` participates in resolution under this set.
    pub fn enables(&self, profile: &PomProfile) -> bool {
        profile
            .id
            .as_deref()
            .is_some_and(|id| self.ids.contains(id))
            || profile.active_by_default
    }

    /// Stable identity of this set, used to key per-profile-set caches.
    pub(crate) fn cache_key(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ActiveProfiles {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}
