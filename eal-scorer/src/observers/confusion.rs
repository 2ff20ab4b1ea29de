//! System presence against gold presence, per class

use kbp_events::{AssessedResponse, Response};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::{
    any_answer_correct, any_answer_semantically_correct, is_present, precision_recall_f1,
    DocumentObserver, Presence, ScoringObserver,
};
use crate::alignment::{AnswerKeyAnswerSource, SystemOutputAnswerSource, TypeRoleFillerRealis};
use crate::error::Result;

/// Which judgments count as gold presence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectnessRule {
    /// Some judgment is completely correct
    Strict,
    /// Some judgment is correct up to inexact justification
    Lenient,
}

impl CorrectnessRule {
    pub fn gold_presence(self, judgments: &BTreeSet<AssessedResponse>) -> Presence {
        match self {
            CorrectnessRule::Strict => any_answer_correct(judgments),
            CorrectnessRule::Lenient => any_answer_semantically_correct(judgments),
        }
    }
}

/// 2x2 counts; rows are system presence, columns gold presence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub both: usize,
    pub system_only: usize,
    pub gold_only: usize,
    pub neither: usize,
}

impl ConfusionMatrix {
    pub fn record(&mut self, system: Presence, gold: Presence) {
        match (system, gold) {
            (Presence::Present, Presence::Present) => self.both += 1,
            (Presence::Present, Presence::Absent) => self.system_only += 1,
            (Presence::Absent, Presence::Present) => self.gold_only += 1,
            (Presence::Absent, Presence::Absent) => self.neither += 1,
        }
    }

    pub fn get(&self, system: Presence, gold: Presence) -> usize {
        match (system, gold) {
            (Presence::Present, Presence::Present) => self.both,
            (Presence::Present, Presence::Absent) => self.system_only,
            (Presence::Absent, Presence::Present) => self.gold_only,
            (Presence::Absent, Presence::Absent) => self.neither,
        }
    }

    pub fn merge(&mut self, other: &ConfusionMatrix) {
        self.both += other.both;
        self.system_only += other.system_only;
        self.gold_only += other.gold_only;
        self.neither += other.neither;
    }

    pub fn total(&self) -> usize {
        self.both + self.system_only + self.gold_only + self.neither
    }

    /// (precision, recall, F1) treating both-present as true positives
    pub fn scores(&self) -> (f64, f64, f64) {
        precision_recall_f1(
            self.both,
            self.both + self.system_only,
            self.both + self.gold_only,
        )
    }

    pub fn render(&self) -> String {
        let (precision, recall, f1) = self.scores();
        let mut out = String::new();
        writeln!(out, "{:>16}{:>14}{:>14}", "", "gold PRESENT", "gold ABSENT").unwrap();
        writeln!(out, "{:>16}{:>14}{:>14}", "system PRESENT", self.both, self.system_only).unwrap();
        writeln!(out, "{:>16}{:>14}{:>14}", "system ABSENT", self.gold_only, self.neither).unwrap();
        writeln!(out).unwrap();
        writeln!(
            out,
            "P = {:.2}, R = {:.2}, F1 = {:.2}",
            precision * 100.0,
            recall * 100.0,
            f1 * 100.0
        )
        .unwrap();
        out
    }
}

/// Counts system presence against gold presence for every class
#[derive(Debug, Clone)]
pub struct ConfusionMatrixObserver {
    name: String,
    rule: CorrectnessRule,
    corpus: ConfusionMatrix,
}

impl ConfusionMatrixObserver {
    pub fn new(name: impl Into<String>, rule: CorrectnessRule) -> Self {
        Self {
            name: name.into(),
            rule,
            corpus: ConfusionMatrix::default(),
        }
    }

    pub fn corpus_matrix(&self) -> &ConfusionMatrix {
        &self.corpus
    }
}

#[derive(Debug, Clone)]
pub struct ConfusionDocument {
    rule: CorrectnessRule,
    matrix: ConfusionMatrix,
}

impl DocumentObserver for ConfusionDocument {
    fn observe(
        &mut self,
        _class: &TypeRoleFillerRealis,
        responses: &BTreeSet<Response>,
        judgments: &BTreeSet<AssessedResponse>,
    ) {
        self.matrix
            .record(is_present(responses), self.rule.gold_presence(judgments));
    }

    fn write_document_output(&self, dir: &Path) -> Result<()> {
        fs::write(dir.join("confusion.txt"), self.matrix.render())?;
        Ok(())
    }
}

impl ScoringObserver for ConfusionMatrixObserver {
    type Document = ConfusionDocument;

    fn name(&self) -> &str {
        &self.name
    }

    fn start_corpus(&mut self) {
        self.corpus = ConfusionMatrix::default();
    }

    fn document_observer(
        &self,
        _doc_id: &str,
        _system: &SystemOutputAnswerSource,
        _key: &AnswerKeyAnswerSource,
    ) -> ConfusionDocument {
        ConfusionDocument {
            rule: self.rule,
            matrix: ConfusionMatrix::default(),
        }
    }

    fn end_document(&mut self, document: ConfusionDocument) {
        self.corpus.merge(&document.matrix);
    }

    fn write_corpus_output(&self, dir: &Path) -> Result<()> {
        fs::write(dir.join("confusion.txt"), self.corpus.render())?;
        fs::write(
            dir.join("confusion.json"),
            serde_json::to_string_pretty(&self.corpus)?,
        )?;
        Ok(())
    }
}
