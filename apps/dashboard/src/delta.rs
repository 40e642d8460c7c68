//! Delta sets for name-keyed collections (locations, skills).

use std::collections::HashSet;

use profile_board_common::{LocationRef, SkillRef};
use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// An item of a location or skill collection as edited in a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: EntityId,
    pub name: String,
}

impl Choice {
    pub fn persisted(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::Persisted(id),
            name: name.into(),
        }
    }
}

impl From<&LocationRef> for Choice {
    fn from(location: &LocationRef) -> Self {
        Choice::persisted(location.id, &location.name)
    }
}

impl From<&SkillRef> for Choice {
    fn from(skill: &SkillRef) -> Self {
        Choice::persisted(skill.id, &skill.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta<T> {
    pub to_add: Vec<T>,
    pub to_remove: Vec<T>,
    pub to_review: Vec<T>,
}

impl<T> Default for Delta<T> {
    fn default() -> Self {
        Self {
            to_add: Vec::new(),
            to_remove: Vec::new(),
            to_review: Vec::new(),
        }
    }
}

impl<T> Delta<T> {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty() && self.to_review.is_empty()
    }
}

/// Classifies `current` against the session-start snapshot `original`, by name.
///
/// New names go to `to_add` when the server knows their id and to
/// `to_review` when it is provisional. Names that disappeared go to
/// `to_remove`. A name repeated in either list counts once.
pub fn compute_delta(original: &[Choice], current: &[Choice]) -> Delta<Choice> {
    let original = dedup_by_name(original);
    let current = dedup_by_name(current);

    let original_names: HashSet<&str> = original.iter().map(|c| c.name.as_str()).collect();
    let current_names: HashSet<&str> = current.iter().map(|c| c.name.as_str()).collect();

    let mut delta = Delta::default();
    for choice in &current {
        if original_names.contains(choice.name.as_str()) {
            continue;
        }
        if choice.id.is_provisional() {
            delta.to_review.push((*choice).clone());
        } else {
            delta.to_add.push((*choice).clone());
        }
    }
    delta.to_remove = original
        .iter()
        .filter(|c| !current_names.contains(c.name.as_str()))
        .map(|c| (*c).clone())
        .collect();
    delta
}

fn dedup_by_name(choices: &[Choice]) -> Vec<&Choice> {
    let mut seen = HashSet::new();
    choices
        .iter()
        .filter(|c| seen.insert(c.name.as_str()))
        .collect()
}
