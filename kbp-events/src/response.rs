//! System responses

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::span::{CharOffsetSpan, KbpString};

/// Whether an event mention is actual, generic, or otherwise non-actual
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Realis {
    Actual,
    Generic,
    Other,
}

impl Realis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Realis::Actual => "Actual",
            Realis::Generic => "Generic",
            Realis::Other => "Other",
        }
    }

    pub fn all() -> Vec<Realis> {
        vec![Realis::Actual, Realis::Generic, Realis::Other]
    }
}

impl fmt::Display for Realis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single event argument claim.
///
/// Responses are plain values: two responses are the same response exactly
/// when every field, justifications included, is equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Response {
    pub doc_id: String,
    pub event_type: String,
    pub role: String,
    pub canonical_argument: KbpString,
    pub base_filler: CharOffsetSpan,
    #[serde(default)]
    pub additional_argument_justifications: BTreeSet<CharOffsetSpan>,
    #[serde(default)]
    pub predicate_justifications: BTreeSet<CharOffsetSpan>,
    pub realis: Realis,
}

impl Response {
    pub fn new(
        doc_id: impl Into<String>,
        event_type: impl Into<String>,
        role: impl Into<String>,
        canonical_argument: KbpString,
        base_filler: CharOffsetSpan,
        realis: Realis,
    ) -> Self {
        Self {
            doc_id: doc_id.into(),
            event_type: event_type.into(),
            role: role.into(),
            canonical_argument,
            base_filler,
            additional_argument_justifications: BTreeSet::new(),
            predicate_justifications: BTreeSet::new(),
            realis,
        }
    }

    pub fn with_predicate_justification(mut self, span: CharOffsetSpan) -> Self {
        self.predicate_justifications.insert(span);
        self
    }

    pub fn with_additional_justification(mut self, span: CharOffsetSpan) -> Self {
        self.additional_argument_justifications.insert(span);
        self
    }

    /// Earliest span among all of the response's justifying evidence
    pub fn earliest_justification(&self) -> CharOffsetSpan {
        self.predicate_justifications
            .iter()
            .chain(self.additional_argument_justifications.iter())
            .copied()
            .fold(self.base_filler, |earliest, span| earliest.min(span))
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}",
            self.doc_id, self.event_type, self.role, self.canonical_argument, self.realis
        )
    }
}

/// A system response with the confidence the system assigned to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResponse {
    pub response: Response,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 { 1.0 }

impl ScoredResponse {
    pub fn new(response: Response, confidence: f64) -> Self {
        Self { response, confidence }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response() -> Response {
        Response::new(
            "doc1",
            "Life.Die",
            "Victim",
            KbpString::new("the mayor", 50, 58),
            CharOffsetSpan::new(54, 58),
            Realis::Actual,
        )
    }

    #[test]
    fn test_earliest_justification_defaults_to_base_filler() {
        assert_eq!(response().earliest_justification(), CharOffsetSpan::new(54, 58));
    }

    #[test]
    fn test_earliest_justification_uses_predicate_spans() {
        let r = response()
            .with_predicate_justification(CharOffsetSpan::new(30, 80))
            .with_additional_justification(CharOffsetSpan::new(60, 70));
        assert_eq!(r.earliest_justification(), CharOffsetSpan::new(30, 80));
    }

    #[test]
    fn test_value_identity() {
        let a = response();
        let b = response();
        assert_eq!(a, b);
        let c = response().with_predicate_justification(CharOffsetSpan::new(0, 3));
        assert_ne!(a, c);
    }

    #[test]
    fn test_scored_response_defaults_confidence() {
        let json = serde_json::to_value(response()).unwrap();
        let scored: ScoredResponse =
            serde_json::from_value(serde_json::json!({ "response": json })).unwrap();
        assert_eq!(scored.confidence, 1.0);
    }
}
