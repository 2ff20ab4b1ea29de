//! Scoring of whole systems against an answer key and reference linking

use indexmap::IndexMap;
use kbp_events::{
    AnnotationStore, ArgumentStore, JsonArgumentStore, JsonLinkingStore, LinkingStore,
    SameEventTypeLinker, ScoringData,
};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::analysis::{CorpusAggregate, DocumentResult, EalScorer};
use crate::config::{LinkingConfig, ScorerConfig};
use crate::error::{Result, ScorerError};
use crate::reporting;

/// The argument and linking stores of one system
pub struct SystemStores {
    pub arguments: Box<dyn ArgumentStore>,
    pub linking: Box<dyn LinkingStore>,
}

impl SystemStores {
    /// Open a system directory.
    ///
    /// Normally it holds `arguments/` and `linking/`. With default linking
    /// the directory itself is the argument store and responses are linked
    /// by event type.
    pub fn open(system_dir: &Path, linking: &LinkingConfig) -> Result<Self> {
        if linking.create_default_linking {
            Ok(Self {
                arguments: Box::new(JsonArgumentStore::open(system_dir)?),
                linking: Box::new(SameEventTypeLinker::new(
                    linking.default_linking_realis.iter().copied(),
                )),
            })
        } else {
            Ok(Self {
                arguments: Box::new(JsonArgumentStore::open(system_dir.join("arguments"))?),
                linking: Box::new(JsonLinkingStore::open(system_dir.join("linking"))?),
            })
        }
    }
}

/// Runs the document scorer over a corpus and writes the reports
#[derive(Debug, Clone)]
pub struct EalRunner {
    scorer: EalScorer,
    config: ScorerConfig,
}

impl EalRunner {
    pub fn new(config: ScorerConfig) -> Self {
        Self {
            scorer: EalScorer::from_config(&config.scoring),
            config,
        }
    }

    pub fn scorer(&self) -> &EalScorer {
        &self.scorer
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Score every listed document; the first failure aborts the run
    pub fn score_system(
        &self,
        answer_key: &dyn AnnotationStore,
        reference_linking: &dyn LinkingStore,
        arguments: &dyn ArgumentStore,
        system_linking: &dyn LinkingStore,
        documents: &BTreeSet<String>,
    ) -> Result<Vec<DocumentResult>> {
        documents
            .iter()
            .map(|doc_id| {
                self.score_document(
                    doc_id,
                    answer_key,
                    reference_linking,
                    arguments,
                    system_linking,
                )
                .map_err(|e| ScorerError::in_document(doc_id.as_str(), e))
            })
            .collect()
    }

    fn score_document(
        &self,
        doc_id: &str,
        answer_key: &dyn AnnotationStore,
        reference_linking: &dyn LinkingStore,
        arguments: &dyn ArgumentStore,
        system_linking: &dyn LinkingStore,
    ) -> Result<DocumentResult> {
        tracing::debug!("Scoring document {}", doc_id);
        let key = answer_key.read(doc_id)?;
        let output = arguments.read_or_empty(doc_id)?;

        let reference = reference_linking
            .read_for_answer_key(&key)?
            .ok_or_else(|| ScorerError::MissingReferenceLinking(doc_id.to_string()))?;
        let system = system_linking
            .read_for_argument_output(&output)?
            .ok_or_else(|| ScorerError::MissingSystemLinking(doc_id.to_string()))?;

        Ok(self.scorer.score(&ScoringData::new(key, output, reference, system)))
    }

    /// Score one system directory and write its reports into `output_dir`
    pub fn score_system_dir(
        &self,
        answer_key: &dyn AnnotationStore,
        reference_linking: &dyn LinkingStore,
        system_dir: &Path,
        documents: &BTreeSet<String>,
        output_dir: &Path,
    ) -> Result<CorpusAggregate> {
        let stores = SystemStores::open(system_dir, &self.config.linking)?;
        let results = self.score_system(
            answer_key,
            reference_linking,
            stores.arguments.as_ref(),
            stores.linking.as_ref(),
            documents,
        )?;

        let aggregate = CorpusAggregate::from_results(&results, self.scorer.lambda());
        reporting::write_reports(
            output_dir,
            &results,
            &aggregate,
            self.config.output.write_json_summary,
        )?;
        Ok(aggregate)
    }

    /// Score every subdirectory of `systems_dir` into `<output_root>/<name>/`
    pub fn score_systems_dir(
        &self,
        answer_key: &dyn AnnotationStore,
        reference_linking: &dyn LinkingStore,
        systems_dir: &Path,
        documents: &BTreeSet<String>,
        output_root: &Path,
    ) -> Result<IndexMap<String, CorpusAggregate>> {
        tracing::info!("Scoring all subdirectories of {}", systems_dir.display());

        let mut system_dirs = Vec::new();
        for entry in fs::read_dir(systems_dir)? {
            let path = entry?.path();
            if path.is_dir() {
                system_dirs.push(path);
            }
        }
        system_dirs.sort();

        let mut aggregates = IndexMap::new();
        for system_dir in system_dirs {
            let name = system_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            tracing::info!("Scoring system {}", system_dir.display());

            let aggregate = self
                .score_system_dir(
                    answer_key,
                    reference_linking,
                    &system_dir,
                    documents,
                    &output_root.join(&name),
                )
                .map_err(|e| ScorerError::in_system(&system_dir, e))?;
            aggregates.insert(name, aggregate);
        }
        Ok(aggregates)
    }
}
