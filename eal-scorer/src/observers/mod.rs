//! Observers notified by the alignment driver
//!
//! A [`ScoringObserver`] lives for a whole corpus. For each document it hands
//! out a fresh [`DocumentObserver`] that receives the per-class events and is
//! merged back into the corpus observer when the document ends.
//!
//! The driver only deals in [`CorpusObserver`] trait objects; wrap a concrete
//! observer in [`Registered`] to get one.

mod arguments;
mod confusion;
mod log;

pub use arguments::{ArgumentCounts, ArgumentDocument, ArgumentScoringObserver};
pub use confusion::{ConfusionDocument, ConfusionMatrix, ConfusionMatrixObserver, CorrectnessRule};
pub use log::{AlignmentLogDocument, AlignmentLogObserver, CaseCounts};

use kbp_events::{AssessedResponse, Response};
use std::collections::BTreeSet;
use std::path::Path;

use crate::alignment::{AnswerKeyAnswerSource, SystemOutputAnswerSource, TypeRoleFillerRealis};
use crate::error::{Result, ScorerError};

/// Whether something is there or not
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Presence {
    Present,
    Absent,
}

impl Presence {
    pub fn from_bool(present: bool) -> Self {
        if present {
            Presence::Present
        } else {
            Presence::Absent
        }
    }

    pub fn is_present(self) -> bool {
        self == Presence::Present
    }
}

pub fn is_present<T>(items: &BTreeSet<T>) -> Presence {
    Presence::from_bool(!items.is_empty())
}

/// Present if any judgment is completely correct
pub fn any_answer_correct(judgments: &BTreeSet<AssessedResponse>) -> Presence {
    Presence::from_bool(judgments.iter().any(AssessedResponse::is_completely_correct))
}

/// Present if any judgment is correct up to inexact justification
pub fn any_answer_semantically_correct(judgments: &BTreeSet<AssessedResponse>) -> Presence {
    Presence::from_bool(
        judgments
            .iter()
            .any(AssessedResponse::is_correct_up_to_inexact_justifications),
    )
}

/// Per-document receiver of alignment events. Every method defaults to a no-op.
pub trait DocumentObserver {
    fn start(&mut self) {}

    fn start_answerable(&mut self, _class: &TypeRoleFillerRealis) {}

    /// Sent for every class before its alignment event
    fn observe(
        &mut self,
        _class: &TypeRoleFillerRealis,
        _responses: &BTreeSet<Response>,
        _judgments: &BTreeSet<AssessedResponse>,
    ) {
    }

    /// The selected system response has an exactly matching judgment
    fn annotated_selected_response(
        &mut self,
        _class: &TypeRoleFillerRealis,
        _selected: &Response,
        _judgment: &AssessedResponse,
        _all_judgments: &BTreeSet<AssessedResponse>,
    ) {
    }

    /// Judgments exist for the class but none matches the selected response
    fn unannotated_selected_response(
        &mut self,
        _class: &TypeRoleFillerRealis,
        _selected: &Response,
        _all_judgments: &BTreeSet<AssessedResponse>,
    ) {
    }

    fn responses_only(
        &mut self,
        _class: &TypeRoleFillerRealis,
        _selected: &Response,
        _responses: &BTreeSet<Response>,
    ) {
    }

    fn annotations_only(
        &mut self,
        _class: &TypeRoleFillerRealis,
        _judgments: &BTreeSet<AssessedResponse>,
    ) {
    }

    fn end_answerable(&mut self, _class: &TypeRoleFillerRealis) {}

    fn end(&mut self) {}

    /// Write this document's output under `dir`, which already exists
    fn write_document_output(&self, _dir: &Path) -> Result<()> {
        Ok(())
    }
}

/// Corpus-level observer with a per-document factory
pub trait ScoringObserver {
    type Document: DocumentObserver + 'static;

    /// Unique name, also the observer's output subdirectory
    fn name(&self) -> &str;

    fn start_corpus(&mut self) {}

    fn document_observer(
        &self,
        doc_id: &str,
        system: &SystemOutputAnswerSource,
        key: &AnswerKeyAnswerSource,
    ) -> Self::Document;

    /// Fold a finished document into the corpus totals
    fn end_document(&mut self, document: Self::Document);

    fn end_corpus(&mut self) {}

    fn write_corpus_output(&self, _dir: &Path) -> Result<()> {
        Ok(())
    }
}

/// Object-safe view of a [`ScoringObserver`] used by the driver
pub trait CorpusObserver {
    fn name(&self) -> &str;

    fn start_corpus(&mut self);

    fn begin_document(
        &mut self,
        doc_id: &str,
        system: &SystemOutputAnswerSource,
        key: &AnswerKeyAnswerSource,
    );

    /// The observer of the document in progress
    fn current(&mut self) -> Option<&mut dyn DocumentObserver>;

    /// Write the current document's output (when `dir` is given) and merge it
    fn finish_document(&mut self, dir: Option<&Path>) -> Result<()>;

    fn end_corpus(&mut self);

    fn write_corpus_output(&self, dir: &Path) -> Result<()>;
}

/// Adapter holding a corpus observer and its in-progress document observer
pub struct Registered<O: ScoringObserver> {
    observer: O,
    current: Option<O::Document>,
}

impl<O: ScoringObserver> Registered<O> {
    pub fn new(observer: O) -> Self {
        Self {
            observer,
            current: None,
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_inner(self) -> O {
        self.observer
    }
}

impl<O: ScoringObserver> CorpusObserver for Registered<O> {
    fn name(&self) -> &str {
        self.observer.name()
    }

    fn start_corpus(&mut self) {
        self.observer.start_corpus();
    }

    fn begin_document(
        &mut self,
        doc_id: &str,
        system: &SystemOutputAnswerSource,
        key: &AnswerKeyAnswerSource,
    ) {
        self.current = Some(self.observer.document_observer(doc_id, system, key));
    }

    fn current(&mut self) -> Option<&mut dyn DocumentObserver> {
        self.current.as_mut().map(|d| d as &mut dyn DocumentObserver)
    }

    fn finish_document(&mut self, dir: Option<&Path>) -> Result<()> {
        if let Some(document) = self.current.take() {
            if let Some(dir) = dir {
                document.write_document_output(dir)?;
            }
            self.observer.end_document(document);
        }
        Ok(())
    }

    fn end_corpus(&mut self) {
        self.observer.end_corpus();
    }

    fn write_corpus_output(&self, dir: &Path) -> Result<()> {
        self.observer.write_corpus_output(dir)
    }
}

/// Names accepted by [`built_in`]
pub const BUILT_IN_OBSERVERS: &[&str] = &["presence", "presence-lenient", "arguments", "log"];

/// Construct a built-in observer by name
pub fn built_in(name: &str) -> Result<Box<dyn CorpusObserver>> {
    let observer: Box<dyn CorpusObserver> = match name {
        "presence" => Box::new(Registered::new(ConfusionMatrixObserver::new(
            name,
            CorrectnessRule::Strict,
        ))),
        "presence-lenient" => Box::new(Registered::new(ConfusionMatrixObserver::new(
            name,
            CorrectnessRule::Lenient,
        ))),
        "arguments" => Box::new(Registered::new(ArgumentScoringObserver::new(name))),
        "log" => Box::new(Registered::new(AlignmentLogObserver::new(name))),
        other => return Err(ScorerError::UnknownObserver(other.to_string())),
    };
    Ok(observer)
}

/// Precision, recall and F1 from raw counts, each 0 when undefined
pub(crate) fn precision_recall_f1(
    true_positives: usize,
    system: usize,
    gold: usize,
) -> (f64, f64, f64) {
    let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
    let precision = ratio(true_positives, system);
    let recall = ratio(true_positives, gold);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    (precision, recall, f1)
}
