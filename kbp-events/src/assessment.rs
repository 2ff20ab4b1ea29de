//! Human judgments of system responses

use serde::{Deserialize, Serialize};

use crate::response::{Realis, Response};

/// Assessment of one field of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldAssessment {
    Correct,
    /// Right answer, but the justification span is not exact
    Inexact,
    Incorrect,
}

impl FieldAssessment {
    pub fn is_acceptable(self) -> bool {
        !matches!(self, FieldAssessment::Incorrect)
    }
}

/// Overall correctness derived from a [`ResponseAssessment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Correctness {
    FullyCorrect,
    CorrectUpToInexactJustification,
    Incorrect,
}

/// Per-field judgment of a response.
///
/// A field left as `None` was not assessed and never counts as correct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResponseAssessment {
    /// Does the justification support the event type?
    pub event_type: Option<FieldAssessment>,
    /// Does the justification support the argument's role?
    pub role: Option<FieldAssessment>,
    /// Is the canonical argument string a correct filler?
    pub filler: Option<FieldAssessment>,
    pub base_filler: Option<FieldAssessment>,
    pub realis: Option<Realis>,
    #[serde(default)]
    pub coreference_id: Option<u32>,
}

impl ResponseAssessment {
    fn uniform(field: FieldAssessment, realis: Realis) -> Self {
        Self {
            event_type: Some(field),
            role: Some(field),
            filler: Some(field),
            base_filler: Some(field),
            realis: Some(realis),
            coreference_id: None,
        }
    }

    pub fn correct(realis: Realis) -> Self {
        Self::uniform(FieldAssessment::Correct, realis)
    }

    /// Correct filler with inexact justifications for type, role and base filler
    pub fn inexact(realis: Realis) -> Self {
        Self {
            filler: Some(FieldAssessment::Correct),
            ..Self::uniform(FieldAssessment::Inexact, realis)
        }
    }

    pub fn incorrect(realis: Realis) -> Self {
        Self::uniform(FieldAssessment::Incorrect, realis)
    }

    pub fn with_coreference_id(mut self, id: u32) -> Self {
        self.coreference_id = Some(id);
        self
    }
}

/// A response together with its human judgment
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssessedResponse {
    pub response: Response,
    pub assessment: ResponseAssessment,
}

impl AssessedResponse {
    pub fn new(response: Response, assessment: ResponseAssessment) -> Self {
        Self { response, assessment }
    }

    fn realis_matches(&self) -> bool {
        self.assessment.realis == Some(self.response.realis)
    }

    pub fn is_completely_correct(&self) -> bool {
        let a = &self.assessment;
        a.event_type == Some(FieldAssessment::Correct)
            && a.role == Some(FieldAssessment::Correct)
            && a.filler == Some(FieldAssessment::Correct)
            && a.base_filler == Some(FieldAssessment::Correct)
            && self.realis_matches()
    }

    /// Correct ignoring whether justification spans were exact
    pub fn is_correct_up_to_inexact_justifications(&self) -> bool {
        let a = &self.assessment;
        let acceptable =
            |f: Option<FieldAssessment>| f.map_or(false, FieldAssessment::is_acceptable);
        acceptable(a.event_type)
            && acceptable(a.role)
            && a.filler == Some(FieldAssessment::Correct)
            && acceptable(a.base_filler)
            && self.realis_matches()
    }

    pub fn correctness(&self) -> Correctness {
        if self.is_completely_correct() {
            Correctness::FullyCorrect
        } else if self.is_correct_up_to_inexact_justifications() {
            Correctness::CorrectUpToInexactJustification
        } else {
            Correctness::Incorrect
        }
    }

    /// Find the judgment of exactly this response, if one was made
    pub fn find_annotation_for_argument<'a>(
        response: &Response,
        annotated: impl IntoIterator<Item = &'a AssessedResponse>,
    ) -> Option<&'a AssessedResponse> {
        annotated.into_iter().find(|a| &a.response == response)
    }
}
