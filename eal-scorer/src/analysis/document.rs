//! Per-document argument and linking scores

use kbp_events::{ResponseLinking, ScoringData};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::linking::{b_cubed, LinkingScore};
use crate::alignment::{
    AnswerKeyAnswerSource, AnswerSource, EntityNormalizer, OnlyMostSpecificTemporal,
    SystemOutputAnswerSource, TypeRoleFillerRealis,
};
use crate::config::ScoringConfig;
use crate::observers::any_answer_semantically_correct;

/// How the system classes of a document were judged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentTally {
    pub correct: usize,
    pub incorrect: usize,
    pub unassessed: usize,
}

/// Scores of one document, kept unscaled so a corpus can be aggregated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    pub doc_id: String,
    /// Argument credit minus penalties, never below zero
    pub unscaled_argument_score: f64,
    /// Number of gold-correct classes in the answer key
    pub argument_normalizer: f64,
    pub linking_score: LinkingScore,
    /// Number of reference linking items
    pub linking_normalizer: f64,
    pub lambda: f64,
    pub tally: ArgumentTally,
}

fn ratio(raw: f64, normalizer: f64) -> f64 {
    if normalizer > 0.0 {
        raw / normalizer
    } else {
        0.0
    }
}

impl DocumentResult {
    pub fn scaled_argument_score(&self) -> f64 {
        ratio(self.unscaled_argument_score, self.argument_normalizer)
    }

    pub fn unscaled_linking_score(&self) -> f64 {
        self.linking_score.f1 * self.linking_normalizer
    }

    pub fn unscaled_linking_precision(&self) -> f64 {
        self.linking_score.precision * self.linking_normalizer
    }

    pub fn unscaled_linking_recall(&self) -> f64 {
        self.linking_score.recall * self.linking_normalizer
    }

    pub fn scaled_linking_score(&self) -> f64 {
        ratio(self.unscaled_linking_score(), self.linking_normalizer)
    }

    /// `(1 - lambda) * argument + lambda * linking`
    pub fn scaled_score(&self) -> f64 {
        (1.0 - self.lambda) * self.scaled_argument_score()
            + self.lambda * self.scaled_linking_score()
    }
}

/// Scores documents for combined argument extraction and linking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EalScorer {
    lambda: f64,
    false_positive_penalty: f64,
}

impl Default for EalScorer {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}

impl EalScorer {
    pub fn new(lambda: f64, false_positive_penalty: f64) -> Self {
        Self {
            lambda,
            false_positive_penalty,
        }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(config.lambda, config.false_positive_penalty)
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn false_positive_penalty(&self) -> f64 {
        self.false_positive_penalty
    }

    pub fn score(&self, data: &ScoringData) -> DocumentResult {
        let key = &data.answer_key;
        let normalizer = EntityNormalizer::from_answer_key(key);
        let output = OnlyMostSpecificTemporal::for_answer_key(key).apply(&data.argument_output);

        let key_source = AnswerKeyAnswerSource::for_answer_key(key.clone(), &normalizer);
        let system_source = SystemOutputAnswerSource::for_argument_output(output, &normalizer);
        let correct: BTreeSet<TypeRoleFillerRealis> =
            key_source.correct_classes().into_iter().cloned().collect();

        let tally = self.tally_arguments(&key_source, &system_source);
        let raw_argument = (tally.correct as f64
            - self.false_positive_penalty * tally.incorrect as f64)
            .max(0.0);

        let reference_clusters = project(&data.reference_linking, &normalizer, &correct);
        let reference_items: BTreeSet<&TypeRoleFillerRealis> =
            reference_clusters.iter().flatten().collect();
        let system_items: BTreeSet<TypeRoleFillerRealis> = system_source
            .answerables()
            .filter(|class| reference_items.contains(class))
            .cloned()
            .collect();
        let system_clusters = project(&data.system_linking, &normalizer, &system_items);
        let linking_score = b_cubed(&reference_clusters, &system_clusters, &system_items);
        let linking_normalizer = reference_items.len() as f64;

        tracing::debug!(
            "{}: {} correct, {} incorrect, {} unassessed classes; linking F1 {:.3} over {} items",
            data.doc_id(),
            tally.correct,
            tally.incorrect,
            tally.unassessed,
            linking_score.f1,
            reference_items.len()
        );

        DocumentResult {
            doc_id: data.doc_id().to_string(),
            unscaled_argument_score: raw_argument,
            argument_normalizer: correct.len() as f64,
            linking_score,
            linking_normalizer,
            lambda: self.lambda,
            tally,
        }
    }

    fn tally_arguments(
        &self,
        key_source: &AnswerKeyAnswerSource,
        system_source: &SystemOutputAnswerSource,
    ) -> ArgumentTally {
        let mut tally = ArgumentTally::default();
        for class in system_source.answerables() {
            let judgments = key_source.answers(class);
            if judgments.is_empty() {
                tracing::warn!("System class {} has no assessment, scoring it as 0", class);
                tally.unassessed += 1;
            } else if any_answer_semantically_correct(judgments).is_present() {
                tally.correct += 1;
            } else {
                tally.incorrect += 1;
            }
        }
        tally
    }
}

/// Map a response linking onto classes, keeping only classes in `keep`
fn project(
    linking: &ResponseLinking,
    normalizer: &EntityNormalizer,
    keep: &BTreeSet<TypeRoleFillerRealis>,
) -> Vec<BTreeSet<TypeRoleFillerRealis>> {
    linking
        .response_sets()
        .iter()
        .map(|set| {
            set.iter()
                .map(|response| TypeRoleFillerRealis::extract(response, normalizer))
                .filter(|class| keep.contains(class))
                .collect::<BTreeSet<_>>()
        })
        .filter(|classes| !classes.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbp_events::{
        AnswerKey, ArgumentOutput, AssessedResponse, CharOffsetSpan, KbpString, Realis, Response,
        ResponseAssessment, ScoredResponse,
    };

    fn response(event_type: &str, filler: &str, start: usize) -> Response {
        Response::new(
            "doc1",
            event_type,
            "Victim",
            KbpString::new(filler, start, start + 3),
            CharOffsetSpan::new(start, start + 3),
            Realis::Actual,
        )
    }

    fn scoring_data(
        judged: Vec<(Response, ResponseAssessment)>,
        system: Vec<Response>,
        reference: Vec<Vec<Response>>,
        system_linking: Vec<Vec<Response>>,
    ) -> ScoringData {
        let key = AnswerKey::new(
            "doc1",
            judged.into_iter().map(|(r, a)| AssessedResponse::new(r, a)),
            Vec::new(),
            Default::default(),
        );
        let output = ArgumentOutput::new(
            "doc1",
            system.into_iter().map(|r| ScoredResponse::new(r, 1.0)),
        );
        let to_sets = |sets: Vec<Vec<Response>>| -> Vec<BTreeSet<Response>> {
            sets.into_iter().map(|s| s.into_iter().collect()).collect()
        };
        ScoringData::new(
            key,
            output,
            ResponseLinking::new("doc1", to_sets(reference), Vec::new()).unwrap(),
            ResponseLinking::new("doc1", to_sets(system_linking), Vec::new()).unwrap(),
        )
    }

    #[test]
    fn test_no_system_output_scores_zero() {
        let gold = response("Life.Die", "Bob", 10);
        let data = scoring_data(
            vec![(gold.clone(), ResponseAssessment::correct(Realis::Actual))],
            Vec::new(),
            vec![vec![gold]],
            Vec::new(),
        );
        let result = EalScorer::new(0.3, 0.25).score(&data);

        assert_eq!(result.argument_normalizer, 1.0);
        assert_eq!(result.scaled_argument_score(), 0.0);
        assert_eq!(result.scaled_linking_score(), 0.0);
        assert_eq!(result.scaled_score(), 0.0);
    }

    #[test]
    fn test_argument_penalty_and_floor() {
        let right = response("Life.Die", "Bob", 10);
        let wrong = response("Life.Die", "Tom", 20);
        let unjudged = response("Life.Die", "Sam", 30);
        let data = scoring_data(
            vec![
                (right.clone(), ResponseAssessment::correct(Realis::Actual)),
                (wrong.clone(), ResponseAssessment::incorrect(Realis::Actual)),
            ],
            vec![right.clone(), wrong.clone(), unjudged],
            vec![vec![right.clone()]],
            vec![vec![right]],
        );
        let result = EalScorer::new(0.25, 0.25).score(&data);

        assert_eq!(
            result.tally,
            ArgumentTally {
                correct: 1,
                incorrect: 1,
                unassessed: 1,
            }
        );
        assert_eq!(result.unscaled_argument_score, 0.75);
        assert_eq!(result.scaled_argument_score(), 0.75);
        assert_eq!(result.linking_score.f1, 1.0);

        let only_wrong = scoring_data(
            vec![(wrong.clone(), ResponseAssessment::incorrect(Realis::Actual))],
            vec![wrong],
            Vec::new(),
            Vec::new(),
        );
        let floored = EalScorer::default().score(&only_wrong);
        assert_eq!(floored.unscaled_argument_score, 0.0);
        assert_eq!(floored.scaled_score(), 0.0);
    }

    #[test]
    fn test_linking_over_correct_classes() {
        let a = response("Conflict.Attack", "Ann", 10);
        let b = response("Conflict.Attack", "Ben", 20);
        let c = response("Conflict.Attack", "Cal", 30);
        let judged = vec![
            (a.clone(), ResponseAssessment::correct(Realis::Actual)),
            (b.clone(), ResponseAssessment::correct(Realis::Actual)),
            (c.clone(), ResponseAssessment::incorrect(Realis::Actual)),
        ];
        // the incorrect class is dropped before B-cubed
        let data = scoring_data(
            judged,
            vec![a.clone(), b.clone(), c.clone()],
            vec![vec![a.clone(), b.clone()]],
            vec![vec![a], vec![b, c]],
        );
        let result = EalScorer::new(0.5, 0.25).score(&data);

        assert_eq!(result.linking_normalizer, 2.0);
        assert_eq!(result.linking_score.precision, 1.0);
        assert_eq!(result.linking_score.recall, 0.5);
        assert!((result.unscaled_linking_recall() - 1.0).abs() < 1e-9);
        assert!((result.scaled_linking_score() - 2.0 / 3.0).abs() < 1e-9);
    }
}
