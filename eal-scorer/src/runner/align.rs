//! Alignment runs with the built-in observers

use kbp_events::{AnnotationStore, ArgumentStore};
use std::collections::BTreeSet;
use std::path::Path;

use crate::alignment::{AlignmentDriver, AlignmentReport};
use crate::error::Result;
use crate::observers::{self, CorpusObserver};

/// Run the named built-in observers over `documents`, or over every document
/// of either store when `documents` is `None`.
pub fn run_alignment(
    arguments: &dyn ArgumentStore,
    annotations: &dyn AnnotationStore,
    documents: Option<&BTreeSet<String>>,
    observer_names: &[String],
    output_dir: &Path,
) -> Result<AlignmentReport> {
    let mut built: Vec<Box<dyn CorpusObserver>> = observer_names
        .iter()
        .map(|name| observers::built_in(name))
        .collect::<Result<_>>()?;
    let mut registered: Vec<&mut dyn CorpusObserver> = built
        .iter_mut()
        .map(|o| &mut **o as &mut dyn CorpusObserver)
        .collect();

    let driver = AlignmentDriver::new().with_output_dir(output_dir);
    let report = match documents {
        Some(documents) => {
            driver.run_documents(arguments, annotations, documents, &mut registered)?
        }
        None => driver.run(arguments, annotations, &mut registered)?,
    };
    tracing::info!(
        "Aligned {} classes over {} documents",
        report.classes,
        report.documents
    );
    Ok(report)
}
