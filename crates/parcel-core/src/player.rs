//! Player identity and whitelists.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A player reference: stable id plus the last known display name.
///
/// Equality and hashing use `id` only, so a renamed player is still the same
/// player.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlayerRef {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
}

impl PlayerRef {
    /// The "nobody" sentinel. An unowned claim has this as its owner.
    pub const NOBODY: Self = Self {
        id: Uuid::nil(),
        name: String::new(),
    };

    /// Create a player reference.
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// True for the unclaimed sentinel.
    #[must_use]
    pub fn is_nobody(&self) -> bool {
        self.id.is_nil()
    }
}

impl PartialEq for PlayerRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PlayerRef {}

impl Hash for PlayerRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for PlayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} ({})", self.name, self.id)
        }
    }
}

/// Players trusted inside a claim, in insertion order.
///
/// Membership is by id. Duplicates loaded from older data are tolerated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Whitelist(Vec<PlayerRef>);

impl Whitelist {
    /// Create an empty whitelist.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Whether a player with this id is listed.
    #[must_use]
    pub fn contains(&self, id: &Uuid) -> bool {
        self.0.iter().any(|p| p.id == *id)
    }

    /// Add a player. Returns `false` if the id was already present; the stored
    /// display name is refreshed in that case.
    pub fn add(&mut self, player: PlayerRef) -> bool {
        if let Some(existing) = self.0.iter_mut().find(|p| p.id == player.id) {
            existing.name = player.name;
            return false;
        }
        self.0.push(player);
        true
    }

    /// Remove every entry with this id. Returns `true` if any was removed.
    pub fn remove(&mut self, id: &Uuid) -> bool {
        let before = self.0.len();
        self.0.retain(|p| p.id != *id);
        self.0.len() < before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlayerRef> {
        self.0.iter()
    }
}

impl FromIterator<PlayerRef> for Whitelist {
    fn from_iter<I: IntoIterator<Item = PlayerRef>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Whitelist {
    type Item = &'a PlayerRef;
    type IntoIter = std::slice::Iter<'a, PlayerRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
