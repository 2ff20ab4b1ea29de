//! Walks every document's classes and notifies observers

use indexmap::IndexMap;
use kbp_events::{AnnotationStore, ArgumentStore, AssessedResponse, Response};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::answer_source::{AnswerKeyAnswerSource, AnswerSource, SystemOutputAnswerSource};
use super::classes::TypeRoleFillerRealis;
use super::normalizer::EntityNormalizer;
use super::ordering::ByJustificationLocation;
use super::temporal::OnlyMostSpecificTemporal;
use crate::error::{Result, ScorerError};
use crate::observers::{any_answer_semantically_correct, CorpusObserver, DocumentObserver};

/// The four ways a class can align
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AlignmentCase {
    AnnotatedSelected,
    UnannotatedSelected,
    ResponsesOnly,
    AnnotationsOnly,
}

impl AlignmentCase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlignmentCase::AnnotatedSelected => "ANNOTATED_SELECTED",
            AlignmentCase::UnannotatedSelected => "UNANNOTATED_SELECTED",
            AlignmentCase::ResponsesOnly => "RESPONSES_ONLY",
            AlignmentCase::AnnotationsOnly => "ANNOTATIONS_ONLY",
        }
    }
}

impl fmt::Display for AlignmentCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How one class aligned, with the responses involved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Alignment<'a> {
    AnnotatedSelected {
        selected: &'a Response,
        judgment: &'a AssessedResponse,
    },
    UnannotatedSelected {
        selected: &'a Response,
    },
    ResponsesOnly {
        selected: &'a Response,
    },
    AnnotationsOnly,
}

impl<'a> Alignment<'a> {
    pub fn case(&self) -> AlignmentCase {
        match self {
            Alignment::AnnotatedSelected { .. } => AlignmentCase::AnnotatedSelected,
            Alignment::UnannotatedSelected { .. } => AlignmentCase::UnannotatedSelected,
            Alignment::ResponsesOnly { .. } => AlignmentCase::ResponsesOnly,
            Alignment::AnnotationsOnly => AlignmentCase::AnnotationsOnly,
        }
    }

    /// Send the one event matching this alignment
    pub fn notify(
        &self,
        observer: &mut dyn DocumentObserver,
        class: &TypeRoleFillerRealis,
        responses: &BTreeSet<Response>,
        judgments: &BTreeSet<AssessedResponse>,
    ) {
        match *self {
            Alignment::AnnotatedSelected { selected, judgment } => {
                observer.annotated_selected_response(class, selected, judgment, judgments)
            }
            Alignment::UnannotatedSelected { selected } => {
                observer.unannotated_selected_response(class, selected, judgments)
            }
            Alignment::ResponsesOnly { selected } => {
                observer.responses_only(class, selected, responses)
            }
            Alignment::AnnotationsOnly => observer.annotations_only(class, judgments),
        }
    }
}

/// Classify `class` given both sources of its document
pub fn align_class<'a>(
    class: &TypeRoleFillerRealis,
    system: &'a SystemOutputAnswerSource,
    key: &'a AnswerKeyAnswerSource,
) -> Result<Alignment<'a>> {
    let responses = system.answers(class);
    let judgments = key.answers(class);
    let failure = || ScorerError::AlignmentFailure {
        doc_id: class.doc_id.clone(),
        class: class.to_string(),
    };

    if responses.is_empty() {
        return if judgments.is_empty() {
            Err(failure())
        } else {
            Ok(Alignment::AnnotationsOnly)
        };
    }

    let selected = system
        .select_from_multiple_system_responses(responses)
        .ok_or_else(failure)?;
    if judgments.is_empty() {
        return Ok(Alignment::ResponsesOnly { selected });
    }
    Ok(
        match AssessedResponse::find_annotation_for_argument(selected, judgments) {
            Some(judgment) => Alignment::AnnotatedSelected { selected, judgment },
            None => Alignment::UnannotatedSelected { selected },
        },
    )
}

/// What a driver run covered
#[derive(Debug, Clone, Default)]
pub struct AlignmentReport {
    pub documents: usize,
    pub classes: usize,
    /// Classes with a judgment correct up to inexact justification, per
    /// document in visiting order
    pub happy_answerables: BTreeMap<String, Vec<TypeRoleFillerRealis>>,
}

impl AlignmentReport {
    pub fn render_happy_answerables(&self) -> String {
        let mut out = String::new();
        for classes in self.happy_answerables.values() {
            let lines: Vec<String> = classes.iter().map(|c| c.to_string()).collect();
            out.push_str(&lines.join("\n"));
            out.push('\n');
        }
        out
    }
}

/// Aligns system output with an answer key document by document
#[derive(Debug, Clone, Default)]
pub struct AlignmentDriver {
    output_dir: Option<PathBuf>,
}

impl AlignmentDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write observer output and `happy_answerables.txt` under `dir`
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Run over every document either store knows about
    pub fn run(
        &self,
        arguments: &dyn ArgumentStore,
        annotations: &dyn AnnotationStore,
        observers: &mut [&mut dyn CorpusObserver],
    ) -> Result<AlignmentReport> {
        let mut documents = arguments.doc_ids()?;
        documents.extend(annotations.doc_ids()?);
        self.run_documents(arguments, annotations, &documents, observers)
    }

    pub fn run_documents(
        &self,
        arguments: &dyn ArgumentStore,
        annotations: &dyn AnnotationStore,
        documents: &BTreeSet<String>,
        observers: &mut [&mut dyn CorpusObserver],
    ) -> Result<AlignmentReport> {
        let mut observer_dirs: IndexMap<String, Option<PathBuf>> = IndexMap::new();
        for observer in observers.iter() {
            let name = observer.name().to_string();
            if observer_dirs.contains_key(&name) {
                return Err(ScorerError::DuplicateObserver(name));
            }
            let dir = self.output_dir.as_ref().map(|root| root.join(&name));
            observer_dirs.insert(name, dir);
        }

        for observer in observers.iter_mut() {
            observer.start_corpus();
        }

        let mut report = AlignmentReport::default();
        for doc_id in documents {
            let (classes, happy) = self
                .align_document(doc_id, arguments, annotations, observers, &observer_dirs)
                .map_err(|e| ScorerError::in_document(doc_id.as_str(), e))?;
            report.documents += 1;
            report.classes += classes;
            report.happy_answerables.insert(doc_id.clone(), happy);
        }

        tracing::info!("Reports for corpus:");
        for observer in observers.iter_mut() {
            observer.end_corpus();
        }
        for observer in observers.iter() {
            if let Some(Some(dir)) = observer_dirs.get(observer.name()) {
                fs::create_dir_all(dir)?;
                observer.write_corpus_output(dir)?;
            }
        }

        if let Some(root) = &self.output_dir {
            fs::create_dir_all(root)?;
            fs::write(happy_answerables_path(root), report.render_happy_answerables())?;
        }
        Ok(report)
    }

    fn align_document(
        &self,
        doc_id: &str,
        arguments: &dyn ArgumentStore,
        annotations: &dyn AnnotationStore,
        observers: &mut [&mut dyn CorpusObserver],
        observer_dirs: &IndexMap<String, Option<PathBuf>>,
    ) -> Result<(usize, Vec<TypeRoleFillerRealis>)> {
        tracing::info!("Scoring document: {}", doc_id);

        let key = annotations.read_or_empty(doc_id)?;
        let temporal = OnlyMostSpecificTemporal::for_answer_key(&key);
        let normalizer = EntityNormalizer::from_answer_key(&key);
        let output = temporal.apply(&arguments.read_or_empty(doc_id)?);

        let key_source = AnswerKeyAnswerSource::for_answer_key(key, &normalizer);
        let system_source = SystemOutputAnswerSource::for_argument_output(output, &normalizer);
        let order = ByJustificationLocation::new(&key_source, &system_source);
        let classes = order.sorted(system_source.answerables().chain(key_source.answerables()));

        for observer in observers.iter_mut() {
            observer.begin_document(doc_id, &system_source, &key_source);
        }

        let mut happy = Vec::new();
        {
            let mut documents: Vec<&mut dyn DocumentObserver> =
                observers.iter_mut().filter_map(|o| o.current()).collect();
            for document in documents.iter_mut() {
                document.start();
            }

            for class in &classes {
                tracing::debug!("Scoring equivalence class {}", class);
                for document in documents.iter_mut() {
                    document.start_answerable(class);
                }

                let responses = system_source.answers(class);
                let judgments = key_source.answers(class);
                if any_answer_semantically_correct(judgments).is_present() {
                    happy.push(class.clone());
                }
                for document in documents.iter_mut() {
                    document.observe(class, responses, judgments);
                }

                let alignment = align_class(class, &system_source, &key_source)?;
                for document in documents.iter_mut() {
                    alignment.notify(&mut **document, class, responses, judgments);
                }

                for document in documents.iter_mut() {
                    document.end_answerable(class);
                }
            }

            for document in documents.iter_mut() {
                document.end();
            }
        }

        for observer in observers.iter_mut() {
            let dir = observer_dirs
                .get(observer.name())
                .cloned()
                .flatten()
                .map(|dir| dir.join(doc_id));
            if let Some(dir) = &dir {
                fs::create_dir_all(dir)?;
            }
            observer.finish_document(dir.as_deref())?;
        }

        Ok((classes.len(), happy))
    }
}

/// Path of the happy-answerables file written under an output directory
pub fn happy_answerables_path(output_dir: &Path) -> PathBuf {
    output_dir.join("happy_answerables.txt")
}
