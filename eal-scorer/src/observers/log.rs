//! Record of how each class was aligned

use kbp_events::{AssessedResponse, Response};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::{DocumentObserver, ScoringObserver};
use crate::alignment::{
    AlignmentCase, AnswerKeyAnswerSource, SystemOutputAnswerSource, TypeRoleFillerRealis,
};
use crate::error::Result;

/// Number of classes per alignment case
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CaseCounts {
    pub annotated_selected: usize,
    pub unannotated_selected: usize,
    pub responses_only: usize,
    pub annotations_only: usize,
}

impl CaseCounts {
    pub fn record(&mut self, case: AlignmentCase) {
        match case {
            AlignmentCase::AnnotatedSelected => self.annotated_selected += 1,
            AlignmentCase::UnannotatedSelected => self.unannotated_selected += 1,
            AlignmentCase::ResponsesOnly => self.responses_only += 1,
            AlignmentCase::AnnotationsOnly => self.annotations_only += 1,
        }
    }

    pub fn merge(&mut self, other: &CaseCounts) {
        self.annotated_selected += other.annotated_selected;
        self.unannotated_selected += other.unannotated_selected;
        self.responses_only += other.responses_only;
        self.annotations_only += other.annotations_only;
    }

    pub fn total(&self) -> usize {
        self.annotated_selected
            + self.unannotated_selected
            + self.responses_only
            + self.annotations_only
    }
}

#[derive(Debug, Clone)]
pub struct AlignmentLogObserver {
    name: String,
    counts: CaseCounts,
}

impl AlignmentLogObserver {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            counts: CaseCounts::default(),
        }
    }

    pub fn counts(&self) -> &CaseCounts {
        &self.counts
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlignmentLogDocument {
    entries: Vec<(TypeRoleFillerRealis, AlignmentCase)>,
}

impl AlignmentLogDocument {
    pub fn entries(&self) -> &[(TypeRoleFillerRealis, AlignmentCase)] {
        &self.entries
    }
}

impl DocumentObserver for AlignmentLogDocument {
    fn annotated_selected_response(
        &mut self,
        class: &TypeRoleFillerRealis,
        _selected: &Response,
        _judgment: &AssessedResponse,
        _all_judgments: &BTreeSet<AssessedResponse>,
    ) {
        self.entries.push((class.clone(), AlignmentCase::AnnotatedSelected));
    }

    fn unannotated_selected_response(
        &mut self,
        class: &TypeRoleFillerRealis,
        _selected: &Response,
        _all_judgments: &BTreeSet<AssessedResponse>,
    ) {
        self.entries.push((class.clone(), AlignmentCase::UnannotatedSelected));
    }

    fn responses_only(
        &mut self,
        class: &TypeRoleFillerRealis,
        _selected: &Response,
        _responses: &BTreeSet<Response>,
    ) {
        self.entries.push((class.clone(), AlignmentCase::ResponsesOnly));
    }

    fn annotations_only(
        &mut self,
        class: &TypeRoleFillerRealis,
        _judgments: &BTreeSet<AssessedResponse>,
    ) {
        self.entries.push((class.clone(), AlignmentCase::AnnotationsOnly));
    }

    fn write_document_output(&self, dir: &Path) -> Result<()> {
        let mut out = String::new();
        for (class, case) in &self.entries {
            writeln!(out, "{}\t{}", case, class).unwrap();
        }
        fs::write(dir.join("alignment.log"), out)?;
        Ok(())
    }
}

impl ScoringObserver for AlignmentLogObserver {
    type Document = AlignmentLogDocument;

    fn name(&self) -> &str {
        &self.name
    }

    fn start_corpus(&mut self) {
        self.counts = CaseCounts::default();
    }

    fn document_observer(
        &self,
        _doc_id: &str,
        _system: &SystemOutputAnswerSource,
        _key: &AnswerKeyAnswerSource,
    ) -> AlignmentLogDocument {
        AlignmentLogDocument::default()
    }

    fn end_document(&mut self, document: AlignmentLogDocument) {
        let mut counts = CaseCounts::default();
        for (_, case) in &document.entries {
            counts.record(*case);
        }
        self.counts.merge(&counts);
    }

    fn write_corpus_output(&self, dir: &Path) -> Result<()> {
        fs::write(
            dir.join("alignment_counts.json"),
            serde_json::to_string_pretty(&self.counts)?,
        )?;
        Ok(())
    }
}
