//! Per-document answer keys and system argument output

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::assessment::AssessedResponse;
use crate::response::{Response, ScoredResponse};
use crate::span::KbpString;

/// Annotator coreference between argument fillers, keyed by cluster id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorefAnnotation {
    #[serde(default)]
    pub clusters: BTreeMap<u32, BTreeSet<KbpString>>,
}

impl CorefAnnotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cluster(mut self, id: u32, mentions: impl IntoIterator<Item = KbpString>) -> Self {
        self.clusters.entry(id).or_default().extend(mentions);
        self
    }

    pub fn cluster_of(&self, mention: &KbpString) -> Option<u32> {
        self.clusters
            .iter()
            .find(|(_, members)| members.contains(mention))
            .map(|(id, _)| *id)
    }
}

/// Gold annotation for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerKey {
    pub doc_id: String,
    #[serde(default)]
    pub annotated: BTreeSet<AssessedResponse>,
    /// Responses pooled for this document but not yet judged
    #[serde(default)]
    pub unannotated: BTreeSet<Response>,
    #[serde(default)]
    pub coref: CorefAnnotation,
}

impl AnswerKey {
    pub fn new(
        doc_id: impl Into<String>,
        annotated: impl IntoIterator<Item = AssessedResponse>,
        unannotated: impl IntoIterator<Item = Response>,
        coref: CorefAnnotation,
    ) -> Self {
        Self {
            doc_id: doc_id.into(),
            annotated: annotated.into_iter().collect(),
            unannotated: unannotated.into_iter().collect(),
            coref,
        }
    }

    pub fn empty(doc_id: impl Into<String>) -> Self {
        Self::new(doc_id, Vec::new(), Vec::new(), CorefAnnotation::default())
    }

    pub fn is_empty(&self) -> bool {
        self.annotated.is_empty() && self.unannotated.is_empty()
    }

    /// Every response in the key, judged or not
    pub fn all_responses(&self) -> BTreeSet<&Response> {
        self.annotated
            .iter()
            .map(|a| &a.response)
            .chain(self.unannotated.iter())
            .collect()
    }

    pub fn assessment_for(&self, response: &Response) -> Option<&AssessedResponse> {
        AssessedResponse::find_annotation_for_argument(response, &self.annotated)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawArgumentOutput {
    doc_id: String,
    #[serde(default)]
    responses: Vec<ScoredResponse>,
}

/// A system's argument output for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawArgumentOutput")]
pub struct ArgumentOutput {
    pub doc_id: String,
    pub responses: Vec<ScoredResponse>,
}

impl From<RawArgumentOutput> for ArgumentOutput {
    fn from(raw: RawArgumentOutput) -> Self {
        ArgumentOutput::new(raw.doc_id, raw.responses)
    }
}

impl ArgumentOutput {
    /// Build an output; a response listed twice keeps its highest confidence
    pub fn new(
        doc_id: impl Into<String>,
        responses: impl IntoIterator<Item = ScoredResponse>,
    ) -> Self {
        let mut best: BTreeMap<Response, f64> = BTreeMap::new();
        for ScoredResponse { response, confidence } in responses {
            best.entry(response)
                .and_modify(|c| {
                    if confidence > *c {
                        *c = confidence;
                    }
                })
                .or_insert(confidence);
        }

        Self {
            doc_id: doc_id.into(),
            responses: best
                .into_iter()
                .map(|(response, confidence)| ScoredResponse::new(response, confidence))
                .collect(),
        }
    }

    pub fn empty(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            responses: Vec::new(),
        }
    }

    pub fn responses(&self) -> impl Iterator<Item = &Response> {
        self.responses.iter().map(|s| &s.response)
    }

    pub fn response_set(&self) -> BTreeSet<&Response> {
        self.responses().collect()
    }

    pub fn confidence(&self, response: &Response) -> Option<f64> {
        self.responses
            .iter()
            .find(|s| &s.response == response)
            .map(|s| s.confidence)
    }

    /// Copy of this output keeping only responses accepted by `keep`
    pub fn filter(&self, keep: impl Fn(&Response) -> bool) -> Self {
        Self {
            doc_id: self.doc_id.clone(),
            responses: self
                .responses
                .iter()
                .filter(|s| keep(&s.response))
                .cloned()
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::ResponseAssessment;
    use crate::response::Realis;
    use crate::span::CharOffsetSpan;

    fn response(filler: &str, start: usize) -> Response {
        Response::new(
            "doc1",
            "Movement.Transport",
            "Destination",
            KbpString::new(filler, start, start + filler.len() - 1),
            CharOffsetSpan::new(start, start + filler.len() - 1),
            Realis::Actual,
        )
    }

    #[test]
    fn test_duplicate_responses_keep_highest_confidence() {
        let output = ArgumentOutput::new(
            "doc1",
            vec![
                ScoredResponse::new(response("Paris", 10), 0.4),
                ScoredResponse::new(response("Paris", 10), 0.9),
                ScoredResponse::new(response("Lyon", 30), 0.2),
            ],
        );
        assert_eq!(output.len(), 2);
        assert_eq!(output.confidence(&response("Paris", 10)), Some(0.9));
    }

    #[test]
    fn test_deserialized_duplicates_keep_highest_confidence() {
        let listed = serde_json::json!({
            "doc_id": "doc1",
            "responses": [
                ScoredResponse::new(response("Paris", 10), 0.9),
                ScoredResponse::new(response("Lyon", 30), 0.5),
                ScoredResponse::new(response("Paris", 10), 0.1),
            ],
        });
        let output: ArgumentOutput = serde_json::from_value(listed).unwrap();
        assert_eq!(output.len(), 2);
        assert_eq!(output.confidence(&response("Paris", 10)), Some(0.9));
    }

    #[test]
    fn test_filter_keeps_doc_id() {
        let output = ArgumentOutput::new(
            "doc1",
            vec![
                ScoredResponse::new(response("Paris", 10), 0.4),
                ScoredResponse::new(response("Lyon", 30), 0.2),
            ],
        );
        let filtered = output.filter(|r| r.canonical_argument.text == "Lyon");
        assert_eq!(filtered.doc_id, "doc1");
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_answer_key_lookup() {
        let key = AnswerKey::new(
            "doc1",
            vec![AssessedResponse::new(
                response("Paris", 10),
                ResponseAssessment::correct(Realis::Actual),
            )],
            vec![response("Lyon", 30)],
            CorefAnnotation::new().with_cluster(1, vec![KbpString::new("Paris", 10, 14)]),
        );
        assert_eq!(key.all_responses().len(), 2);
        assert!(key.assessment_for(&response("Paris", 10)).is_some());
        assert!(key.assessment_for(&response("Lyon", 30)).is_none());
        assert_eq!(key.coref.cluster_of(&KbpString::new("Paris", 10, 14)), Some(1));
    }
}
