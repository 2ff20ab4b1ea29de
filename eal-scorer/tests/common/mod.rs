//! Shared fixtures: JSON stores written into a temporary directory

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use kbp_events::{
    AnswerKey, ArgumentOutput, AssessedResponse, CharOffsetSpan, JsonAnnotationStore,
    JsonArgumentStore, JsonLinkingStore, KbpString, Realis, Response, ResponseAssessment,
    ResponseLinking, ResponseSet, ScoredResponse,
};
use tempfile::TempDir;

pub const ATTACK: &str = "Conflict.Attack";
pub const ARREST: &str = "Justice.Arrest-Jail";

/// An actual response whose filler and base filler share one span
pub fn response(
    doc_id: &str,
    event_type: &str,
    role: &str,
    filler: &str,
    start: usize,
) -> Response {
    let end = start + filler.len().max(1) - 1;
    Response::new(
        doc_id,
        event_type,
        role,
        KbpString::new(filler, start, end),
        CharOffsetSpan::new(start, end),
        Realis::Actual,
    )
}

pub fn correct(response: &Response) -> AssessedResponse {
    AssessedResponse::new(response.clone(), ResponseAssessment::correct(Realis::Actual))
}

pub fn incorrect(response: &Response) -> AssessedResponse {
    AssessedResponse::new(response.clone(), ResponseAssessment::incorrect(Realis::Actual))
}

pub fn key(doc_id: &str, annotated: Vec<AssessedResponse>) -> AnswerKey {
    AnswerKey::new(doc_id, annotated, Vec::new(), Default::default())
}

pub fn output(doc_id: &str, responses: &[&Response]) -> ArgumentOutput {
    ArgumentOutput::new(
        doc_id,
        responses.iter().map(|r| ScoredResponse::new((*r).clone(), 1.0)),
    )
}

pub fn linking(doc_id: &str, clusters: Vec<Vec<&Response>>) -> ResponseLinking {
    let sets = clusters
        .into_iter()
        .map(|cluster| cluster.into_iter().cloned().collect::<ResponseSet>());
    ResponseLinking::new(doc_id, sets, Vec::new()).expect("valid linking")
}

/// A scoring corpus on disk
pub struct Corpus {
    pub dir: TempDir,
    pub answer_key: JsonAnnotationStore,
    pub reference_linking: JsonLinkingStore,
}

impl Corpus {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let answer_key = JsonAnnotationStore::create(dir.path().join("key")).expect("key store");
        let reference_linking =
            JsonLinkingStore::create(dir.path().join("reference")).expect("reference store");
        Self {
            dir,
            answer_key,
            reference_linking,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn add_document(&self, key: &AnswerKey, reference: &ResponseLinking) {
        self.answer_key.write(key).expect("write key");
        self.reference_linking.write(reference).expect("write reference linking");
    }

    /// A system directory with `arguments/` and `linking/` below `root`
    pub fn system(&self, root: &str, name: &str) -> SystemDir {
        SystemDir::create(self.path().join(root).join(name))
    }

    pub fn output_dir(&self, name: &str) -> PathBuf {
        self.path().join("out").join(name)
    }
}

pub struct SystemDir {
    pub path: PathBuf,
    pub arguments: JsonArgumentStore,
    pub linking: JsonLinkingStore,
}

impl SystemDir {
    pub fn create(path: PathBuf) -> Self {
        let arguments = JsonArgumentStore::create(path.join("arguments")).expect("argument store");
        let linking = JsonLinkingStore::create(path.join("linking")).expect("linking store");
        Self {
            path,
            arguments,
            linking,
        }
    }

    pub fn add_document(&self, output: &ArgumentOutput, linking: &ResponseLinking) {
        self.arguments.write(output).expect("write arguments");
        self.linking.write(linking).expect("write linking");
    }
}
