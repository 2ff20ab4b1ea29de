//! Per-document indexes of gold and system responses by equivalence class

use kbp_events::{AnswerKey, ArgumentOutput, AssessedResponse, Response};
use std::collections::{btree_map, BTreeMap, BTreeSet};

use super::classes::{group_by_class, TypeRoleFillerRealis};
use super::normalizer::EntityNormalizer;

static NO_RESPONSES: BTreeSet<Response> = BTreeSet::new();
static NO_ASSESSMENTS: BTreeSet<AssessedResponse> = BTreeSet::new();

/// Responses of one document grouped by equivalence class
pub trait AnswerSource {
    type Answer: Ord + 'static;

    fn doc_id(&self) -> &str;

    fn classes(&self) -> &BTreeMap<TypeRoleFillerRealis, BTreeSet<Self::Answer>>;

    fn response_of(answer: &Self::Answer) -> &Response;

    /// The classes present in this source, in key order
    fn answerables(&self) -> btree_map::Keys<'_, TypeRoleFillerRealis, BTreeSet<Self::Answer>> {
        self.classes().keys()
    }

    /// Responses of `class`, or an empty iterator if this source lacks it
    fn responses_in<'a>(
        &'a self,
        class: &TypeRoleFillerRealis,
    ) -> Box<dyn Iterator<Item = &'a Response> + 'a> {
        match self.classes().get(class) {
            Some(members) => Box::new(members.iter().map(Self::response_of)),
            None => Box::new(std::iter::empty()),
        }
    }
}

/// Gold side: judged responses of the answer key
#[derive(Debug, Clone)]
pub struct AnswerKeyAnswerSource {
    key: AnswerKey,
    classes: BTreeMap<TypeRoleFillerRealis, BTreeSet<AssessedResponse>>,
}

impl AnswerKeyAnswerSource {
    pub fn for_answer_key(key: AnswerKey, normalizer: &EntityNormalizer) -> Self {
        let classes = group_by_class(key.annotated.iter().cloned(), |a| {
            TypeRoleFillerRealis::extract(&a.response, normalizer)
        });
        Self { key, classes }
    }

    pub fn answer_key(&self) -> &AnswerKey {
        &self.key
    }

    pub fn answers(&self, class: &TypeRoleFillerRealis) -> &BTreeSet<AssessedResponse> {
        self.classes.get(class).unwrap_or(&NO_ASSESSMENTS)
    }

    /// Classes with at least one judgment correct up to inexact justification
    pub fn correct_classes(&self) -> BTreeSet<&TypeRoleFillerRealis> {
        self.classes
            .iter()
            .filter(|(_, judged)| {
                judged
                    .iter()
                    .any(|a| a.is_correct_up_to_inexact_justifications())
            })
            .map(|(class, _)| class)
            .collect()
    }
}

impl AnswerSource for AnswerKeyAnswerSource {
    type Answer = AssessedResponse;

    fn doc_id(&self) -> &str {
        &self.key.doc_id
    }

    fn classes(&self) -> &BTreeMap<TypeRoleFillerRealis, BTreeSet<AssessedResponse>> {
        &self.classes
    }

    fn response_of(answer: &AssessedResponse) -> &Response {
        &answer.response
    }
}

/// System side: the (filtered) argument output of one system
#[derive(Debug, Clone)]
pub struct SystemOutputAnswerSource {
    output: ArgumentOutput,
    confidences: BTreeMap<Response, f64>,
    classes: BTreeMap<TypeRoleFillerRealis, BTreeSet<Response>>,
}

impl SystemOutputAnswerSource {
    pub fn for_argument_output(output: ArgumentOutput, normalizer: &EntityNormalizer) -> Self {
        let mut confidences: BTreeMap<Response, f64> = BTreeMap::new();
        for scored in &output.responses {
            let best = confidences.entry(scored.response.clone()).or_insert(scored.confidence);
            *best = best.max(scored.confidence);
        }
        let classes = group_by_class(output.responses().cloned(), |r| {
            TypeRoleFillerRealis::extract(r, normalizer)
        });
        Self {
            output,
            confidences,
            classes,
        }
    }

    pub fn argument_output(&self) -> &ArgumentOutput {
        &self.output
    }

    pub fn answers(&self, class: &TypeRoleFillerRealis) -> &BTreeSet<Response> {
        self.classes.get(class).unwrap_or(&NO_RESPONSES)
    }

    pub fn confidence(&self, response: &Response) -> f64 {
        self.confidences.get(response).copied().unwrap_or(0.0)
    }

    /// Pick the one response that represents a class.
    ///
    /// Highest confidence wins; among equal confidences the smallest response
    /// in value order wins. `None` only for an empty input.
    pub fn select_from_multiple_system_responses<'a>(
        &self,
        responses: impl IntoIterator<Item = &'a Response>,
    ) -> Option<&'a Response> {
        let mut ordered: Vec<&Response> = responses.into_iter().collect();
        ordered.sort();
        ordered.into_iter().fold(None, |best, candidate| match best {
            Some(current) if self.confidence(candidate) <= self.confidence(current) => {
                Some(current)
            }
            _ => Some(candidate),
        })
    }
}

impl AnswerSource for SystemOutputAnswerSource {
    type Answer = Response;

    fn doc_id(&self) -> &str {
        &self.output.doc_id
    }

    fn classes(&self) -> &BTreeMap<TypeRoleFillerRealis, BTreeSet<Response>> {
        &self.classes
    }

    fn response_of(answer: &Response) -> &Response {
        answer
    }
}
