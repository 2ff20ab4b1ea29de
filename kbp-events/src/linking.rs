//! Event linking: partitions of a document's responses into "same event" clusters

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::answer_key::{AnswerKey, ArgumentOutput};
use crate::error::{Error, Result};
use crate::response::Response;

/// One linking cluster
pub type ResponseSet = BTreeSet<Response>;

#[derive(Debug, Clone, Deserialize)]
struct RawLinking {
    doc_id: String,
    #[serde(default)]
    response_sets: Vec<ResponseSet>,
    #[serde(default)]
    incomplete: BTreeSet<Response>,
}

/// A partition of a document's responses into disjoint event clusters.
///
/// Responses the linker has not placed yet may be listed as incomplete; they
/// belong to no cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLinking")]
pub struct ResponseLinking {
    doc_id: String,
    response_sets: Vec<ResponseSet>,
    incomplete: BTreeSet<Response>,
}

impl TryFrom<RawLinking> for ResponseLinking {
    type Error = Error;

    fn try_from(raw: RawLinking) -> Result<Self> {
        ResponseLinking::new(raw.doc_id, raw.response_sets, raw.incomplete)
    }
}

impl ResponseLinking {
    /// Build a linking, rejecting any response placed twice
    pub fn new(
        doc_id: impl Into<String>,
        response_sets: impl IntoIterator<Item = ResponseSet>,
        incomplete: impl IntoIterator<Item = Response>,
    ) -> Result<Self> {
        let doc_id = doc_id.into();
        let response_sets: Vec<ResponseSet> = response_sets
            .into_iter()
            .filter(|set| !set.is_empty())
            .collect();
        let incomplete: BTreeSet<Response> = incomplete.into_iter().collect();

        let mut seen: BTreeSet<&Response> = BTreeSet::new();
        for response in response_sets.iter().flatten().chain(incomplete.iter()) {
            if !seen.insert(response) {
                return Err(Error::OverlappingLinking {
                    doc_id,
                    response: response.to_string(),
                });
            }
        }

        Ok(Self {
            doc_id,
            response_sets,
            incomplete,
        })
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn response_sets(&self) -> &[ResponseSet] {
        &self.response_sets
    }

    pub fn incomplete(&self) -> &BTreeSet<Response> {
        &self.incomplete
    }

    /// Every response the linking mentions, clustered or incomplete
    pub fn all_responses(&self) -> BTreeSet<&Response> {
        self.response_sets
            .iter()
            .flatten()
            .chain(self.incomplete.iter())
            .collect()
    }

    fn check_contained_in(&self, source: &BTreeSet<&Response>) -> Result<()> {
        match self.all_responses().into_iter().find(|r| !source.contains(r)) {
            Some(foreign) => Err(Error::ForeignResponse {
                doc_id: self.doc_id.clone(),
                response: foreign.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Check that the linking only mentions responses of `key`
    pub fn check_against_answer_key(&self, key: &AnswerKey) -> Result<()> {
        self.check_contained_in(&key.all_responses())
    }

    /// Check that the linking only mentions responses of `output`
    pub fn check_against_argument_output(&self, output: &ArgumentOutput) -> Result<()> {
        self.check_contained_in(&output.response_set())
    }
}

/// Everything needed to score one document, bundled so no piece goes missing
#[derive(Debug, Clone)]
pub struct ScoringData {
    pub answer_key: AnswerKey,
    pub argument_output: ArgumentOutput,
    pub reference_linking: ResponseLinking,
    pub system_linking: ResponseLinking,
}

impl ScoringData {
    pub fn new(
        answer_key: AnswerKey,
        argument_output: ArgumentOutput,
        reference_linking: ResponseLinking,
        system_linking: ResponseLinking,
    ) -> Self {
        Self {
            answer_key,
            argument_output,
            reference_linking,
            system_linking,
        }
    }

    pub fn doc_id(&self) -> &str {
        &self.answer_key.doc_id
    }
}
