//! Argument-level true/false positive counts by event type

use kbp_events::{AssessedResponse, Response};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::{
    any_answer_semantically_correct, precision_recall_f1, DocumentObserver, ScoringObserver,
};
use crate::alignment::{AnswerKeyAnswerSource, SystemOutputAnswerSource, TypeRoleFillerRealis};
use crate::error::Result;

/// Outcome counts for a set of classes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    /// Selected responses nobody judged; excluded from precision
    pub unassessed: usize,
    pub false_negatives: usize,
}

impl ArgumentCounts {
    pub fn merge(&mut self, other: &ArgumentCounts) {
        self.true_positives += other.true_positives;
        self.false_positives += other.false_positives;
        self.unassessed += other.unassessed;
        self.false_negatives += other.false_negatives;
    }

    pub fn scores(&self) -> (f64, f64, f64) {
        precision_recall_f1(
            self.true_positives,
            self.true_positives + self.false_positives,
            self.true_positives + self.false_negatives,
        )
    }
}

fn render(by_event_type: &BTreeMap<String, ArgumentCounts>) -> String {
    let mut total = ArgumentCounts::default();
    let mut out = String::new();
    writeln!(
        out,
        "{:<35}{:>6}{:>6}{:>6}{:>6}{:>8}{:>8}{:>8}",
        "Event type", "TP", "FP", "FN", "UNK", "P", "R", "F1"
    )
    .unwrap();
    let row = |label: &str, counts: &ArgumentCounts, out: &mut String| {
        let (p, r, f) = counts.scores();
        writeln!(
            out,
            "{:<35}{:>6}{:>6}{:>6}{:>6}{:>8.2}{:>8.2}{:>8.2}",
            label,
            counts.true_positives,
            counts.false_positives,
            counts.false_negatives,
            counts.unassessed,
            p * 100.0,
            r * 100.0,
            f * 100.0
        )
        .unwrap();
    };
    for (event_type, counts) in by_event_type {
        row(event_type.as_str(), counts, &mut out);
        total.merge(counts);
    }
    row("TOTAL", &total, &mut out);
    out
}

/// Scores selected system responses against their judgments
#[derive(Debug, Clone)]
pub struct ArgumentScoringObserver {
    name: String,
    by_event_type: BTreeMap<String, ArgumentCounts>,
}

impl ArgumentScoringObserver {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            by_event_type: BTreeMap::new(),
        }
    }

    pub fn by_event_type(&self) -> &BTreeMap<String, ArgumentCounts> {
        &self.by_event_type
    }

    pub fn totals(&self) -> ArgumentCounts {
        let mut total = ArgumentCounts::default();
        for counts in self.by_event_type.values() {
            total.merge(counts);
        }
        total
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArgumentDocument {
    by_event_type: BTreeMap<String, ArgumentCounts>,
}

impl ArgumentDocument {
    fn counts(&mut self, class: &TypeRoleFillerRealis) -> &mut ArgumentCounts {
        self.by_event_type.entry(class.event_type.clone()).or_default()
    }

    fn missed_if_correct(
        &mut self,
        class: &TypeRoleFillerRealis,
        judgments: &BTreeSet<AssessedResponse>,
    ) {
        if any_answer_semantically_correct(judgments).is_present() {
            self.counts(class).false_negatives += 1;
        }
    }
}

impl DocumentObserver for ArgumentDocument {
    fn annotated_selected_response(
        &mut self,
        class: &TypeRoleFillerRealis,
        _selected: &Response,
        judgment: &AssessedResponse,
        all_judgments: &BTreeSet<AssessedResponse>,
    ) {
        if judgment.is_correct_up_to_inexact_justifications() {
            self.counts(class).true_positives += 1;
        } else {
            self.counts(class).false_positives += 1;
            self.missed_if_correct(class, all_judgments);
        }
    }

    fn unannotated_selected_response(
        &mut self,
        class: &TypeRoleFillerRealis,
        selected: &Response,
        all_judgments: &BTreeSet<AssessedResponse>,
    ) {
        tracing::debug!("Selected response {} has no judgment", selected);
        self.counts(class).unassessed += 1;
        self.missed_if_correct(class, all_judgments);
    }

    fn responses_only(
        &mut self,
        class: &TypeRoleFillerRealis,
        _selected: &Response,
        _responses: &BTreeSet<Response>,
    ) {
        self.counts(class).unassessed += 1;
    }

    fn annotations_only(
        &mut self,
        class: &TypeRoleFillerRealis,
        judgments: &BTreeSet<AssessedResponse>,
    ) {
        self.missed_if_correct(class, judgments);
    }

    fn write_document_output(&self, dir: &Path) -> Result<()> {
        fs::write(dir.join("arguments.txt"), render(&self.by_event_type))?;
        Ok(())
    }
}

impl ScoringObserver for ArgumentScoringObserver {
    type Document = ArgumentDocument;

    fn name(&self) -> &str {
        &self.name
    }

    fn start_corpus(&mut self) {
        self.by_event_type.clear();
    }

    fn document_observer(
        &self,
        _doc_id: &str,
        _system: &SystemOutputAnswerSource,
        _key: &AnswerKeyAnswerSource,
    ) -> ArgumentDocument {
        ArgumentDocument::default()
    }

    fn end_document(&mut self, document: ArgumentDocument) {
        for (event_type, counts) in document.by_event_type {
            self.by_event_type.entry(event_type).or_default().merge(&counts);
        }
    }

    fn end_corpus(&mut self) {
        let (precision, recall, f1) = self.totals().scores();
        tracing::info!(
            "Argument scores: P={:.2} R={:.2} F1={:.2}",
            precision * 100.0,
            recall * 100.0,
            f1 * 100.0
        );
    }

    fn write_corpus_output(&self, dir: &Path) -> Result<()> {
        fs::write(dir.join("arguments.txt"), render(&self.by_event_type))?;
        fs::write(
            dir.join("arguments.json"),
            serde_json::to_string_pretty(&self.by_event_type)?,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::EntityNormalizer;
    use kbp_events::{CharOffsetSpan, KbpString, Realis, ResponseAssessment};

    fn response(filler: &str, start: usize) -> Response {
        Response::new(
            "doc1",
            "Movement.Transport",
            "Destination",
            KbpString::new(filler, start, start + 5),
            CharOffsetSpan::new(start, start + 5),
            Realis::Actual,
        )
    }

    fn class_of(response: &Response) -> TypeRoleFillerRealis {
        TypeRoleFillerRealis::extract(response, &EntityNormalizer::default())
    }

    #[test]
    fn test_outcomes() {
        let mut document = ArgumentDocument::default();

        let hit = response("Paris", 0);
        let hit_judgment =
            AssessedResponse::new(hit.clone(), ResponseAssessment::correct(Realis::Actual));
        document.annotated_selected_response(
            &class_of(&hit),
            &hit,
            &hit_judgment,
            &BTreeSet::from([hit_judgment.clone()]),
        );

        let miss = response("Texas", 20);
        let miss_judgment =
            AssessedResponse::new(miss.clone(), ResponseAssessment::incorrect(Realis::Actual));
        document.annotated_selected_response(
            &class_of(&miss),
            &miss,
            &miss_judgment,
            &BTreeSet::from([miss_judgment.clone()]),
        );

        let unjudged = response("Rome", 40);
        document.responses_only(
            &class_of(&unjudged),
            &unjudged,
            &BTreeSet::from([unjudged.clone()]),
        );

        let missed = response("Oslo", 60);
        let missed_judgment =
            AssessedResponse::new(missed.clone(), ResponseAssessment::inexact(Realis::Actual));
        document.annotations_only(&class_of(&missed), &BTreeSet::from([missed_judgment]));

        let mut observer = ArgumentScoringObserver::new("arguments");
        observer.end_document(document);
        let totals = observer.totals();

        assert_eq!(
            totals,
            ArgumentCounts {
                true_positives: 1,
                false_positives: 1,
                unassessed: 1,
                false_negatives: 1,
            }
        );
        let (precision, recall, _) = totals.scores();
        assert_eq!(precision, 0.5);
        assert_eq!(recall, 0.5);
    }

    #[test]
    fn test_render_has_total_row() {
        let mut by_type = BTreeMap::new();
        by_type.insert(
            "Life.Die".to_string(),
            ArgumentCounts {
                true_positives: 2,
                ..Default::default()
            },
        );
        let text = render(&by_type);
        assert!(text.contains("Life.Die"));
        assert!(text.lines().last().unwrap().starts_with("TOTAL"));
    }
}
