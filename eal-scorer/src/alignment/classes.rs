//! Equivalence classes of responses

use kbp_events::{KbpString, Realis, Response};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::normalizer::EntityNormalizer;

/// Key grouping responses that make the same claim: event type, role,
/// normalized filler and realis.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeRoleFillerRealis {
    pub doc_id: String,
    pub event_type: String,
    pub role: String,
    pub filler: KbpString,
    pub realis: Realis,
}

impl TypeRoleFillerRealis {
    /// Class of `response` with its filler normalized through `normalizer`
    pub fn extract(response: &Response, normalizer: &EntityNormalizer) -> Self {
        Self {
            doc_id: response.doc_id.clone(),
            event_type: response.event_type.clone(),
            role: response.role.clone(),
            filler: normalizer.normalize(&response.canonical_argument),
            realis: response.realis,
        }
    }
}

impl fmt::Display for TypeRoleFillerRealis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}",
            self.doc_id, self.event_type, self.role, self.filler, self.realis
        )
    }
}

/// Group items by the class of their response. Every item lands in exactly
/// one class.
pub fn group_by_class<T, I, F>(items: I, class_of: F) -> BTreeMap<TypeRoleFillerRealis, BTreeSet<T>>
where
    T: Ord,
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> TypeRoleFillerRealis,
{
    let mut classes: BTreeMap<TypeRoleFillerRealis, BTreeSet<T>> = BTreeMap::new();
    for item in items {
        classes.entry(class_of(&item)).or_default().insert(item);
    }
    classes
}
