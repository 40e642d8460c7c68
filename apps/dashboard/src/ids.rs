use std::fmt;

use serde::{Deserialize, Serialize};

const PROVISIONAL_PREFIX: &str = "new-";

/// Identity of an item in an edit session.
///
/// `Persisted` ids come from the gateway. `Provisional` ids are handed out
/// locally for things the server has never seen: free-text skills bound for
/// the review queue and experience entries not yet created. On the wire a
/// provisional id is the string `"new-<n>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawId", into = "RawId")]
pub enum EntityId {
    Persisted(i64),
    Provisional(u32),
}

impl EntityId {
    pub fn persisted(self) -> Option<i64> {
        match self {
            EntityId::Persisted(id) => Some(id),
            EntityId::Provisional(_) => None,
        }
    }

    pub fn is_provisional(self) -> bool {
        matches!(self, EntityId::Provisional(_))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Persisted(id) => write!(f, "{id}"),
            EntityId::Provisional(n) => write!(f, "{PROVISIONAL_PREFIX}{n}"),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl TryFrom<RawId> for EntityId {
    type Error = String;

    fn try_from(raw: RawId) -> Result<Self, Self::Error> {
        match raw {
            RawId::Number(id) => Ok(EntityId::Persisted(id)),
            RawId::Text(text) => text
                .strip_prefix(PROVISIONAL_PREFIX)
                .and_then(|n| n.parse().ok())
                .map(EntityId::Provisional)
                .ok_or_else(|| format!("'{text}' is neither a number nor a 'new-<n>' id")),
        }
    }
}

impl From<EntityId> for RawId {
    fn from(id: EntityId) -> Self {
        match id {
            EntityId::Persisted(id) => RawId::Number(id),
            EntityId::Provisional(_) => RawId::Text(id.to_string()),
        }
    }
}

/// Per-session counter for provisional ids, starting at 1.
#[derive(Debug, Clone)]
pub struct ProvisionalIds {
    next: u32,
}

impl Default for ProvisionalIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl ProvisionalIds {
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId::Provisional(self.next);
        self.next += 1;
        id
    }
}
