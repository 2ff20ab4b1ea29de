//! Order in which a document's classes are visited

use kbp_events::CharOffsetSpan;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::answer_source::{AnswerKeyAnswerSource, AnswerSource, SystemOutputAnswerSource};
use super::classes::TypeRoleFillerRealis;

/// Orders classes by where their evidence first appears in the document.
///
/// A class is located at the earliest justification of any of its members in
/// either source. Located classes come first by (start, end); classes without
/// a location come after them. Remaining ties fall back to class order.
#[derive(Debug, Clone, Default)]
pub struct ByJustificationLocation {
    locations: BTreeMap<TypeRoleFillerRealis, CharOffsetSpan>,
}

impl ByJustificationLocation {
    pub fn new(
        key_source: &AnswerKeyAnswerSource,
        system_source: &SystemOutputAnswerSource,
    ) -> Self {
        let mut locations: BTreeMap<TypeRoleFillerRealis, CharOffsetSpan> = BTreeMap::new();
        let mut note = |class: &TypeRoleFillerRealis, span: CharOffsetSpan| {
            locations
                .entry(class.clone())
                .and_modify(|earliest| *earliest = (*earliest).min(span))
                .or_insert(span);
        };

        for (class, judged) in key_source.classes() {
            for answer in judged {
                note(class, answer.response.earliest_justification());
            }
        }
        for (class, responses) in system_source.classes() {
            for response in responses {
                note(class, response.earliest_justification());
            }
        }
        Self { locations }
    }

    pub fn location(&self, class: &TypeRoleFillerRealis) -> Option<CharOffsetSpan> {
        self.locations.get(class).copied()
    }

    pub fn compare(&self, a: &TypeRoleFillerRealis, b: &TypeRoleFillerRealis) -> Ordering {
        let by_location = match (self.location(a), self.location(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_location.then_with(|| a.cmp(b))
    }

    /// Distinct classes from `classes`, sorted
    pub fn sorted<'a>(
        &self,
        classes: impl IntoIterator<Item = &'a TypeRoleFillerRealis>,
    ) -> Vec<TypeRoleFillerRealis> {
        let mut ordered: Vec<TypeRoleFillerRealis> = classes.into_iter().cloned().collect();
        ordered.sort_by(|a, b| self.compare(a, b));
        ordered.dedup();
        ordered
    }
}
