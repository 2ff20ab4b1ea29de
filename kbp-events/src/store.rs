//! Document stores for answer keys, argument output and linkings
//!
//! The traits are what scoring depends on. The JSON stores keep one
//! `<doc_id>.json` file per document in a directory.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::answer_key::{AnswerKey, ArgumentOutput};
use crate::error::{Error, Result};
use crate::linking::ResponseLinking;

/// Source of gold annotation
pub trait AnnotationStore {
    fn doc_ids(&self) -> Result<BTreeSet<String>>;

    /// Load a document's answer key, `None` if the store has none
    fn load(&self, doc_id: &str) -> Result<Option<AnswerKey>>;

    /// Read an answer key that must exist
    fn read(&self, doc_id: &str) -> Result<AnswerKey>;

    fn read_or_empty(&self, doc_id: &str) -> Result<AnswerKey> {
        Ok(self.load(doc_id)?.unwrap_or_else(|| AnswerKey::empty(doc_id)))
    }
}

/// Source of system argument output
pub trait ArgumentStore {
    fn doc_ids(&self) -> Result<BTreeSet<String>>;

    fn load(&self, doc_id: &str) -> Result<Option<ArgumentOutput>>;

    fn read_or_empty(&self, doc_id: &str) -> Result<ArgumentOutput> {
        Ok(self.load(doc_id)?.unwrap_or_else(|| ArgumentOutput::empty(doc_id)))
    }
}

/// Source of response linkings, for either the gold or a system side
pub trait LinkingStore {
    fn read_for_answer_key(&self, key: &AnswerKey) -> Result<Option<ResponseLinking>>;

    fn read_for_argument_output(
        &self,
        output: &ArgumentOutput,
    ) -> Result<Option<ResponseLinking>>;
}

/// A per-document value, filed under its own id
trait StoredDocument {
    fn stored_doc_id(&self) -> &str;
}

impl StoredDocument for AnswerKey {
    fn stored_doc_id(&self) -> &str {
        &self.doc_id
    }
}

impl StoredDocument for ArgumentOutput {
    fn stored_doc_id(&self) -> &str {
        &self.doc_id
    }
}

impl StoredDocument for ResponseLinking {
    fn stored_doc_id(&self) -> &str {
        self.doc_id()
    }
}

/// A directory holding one JSON file per document
#[derive(Debug, Clone)]
struct JsonDirectory {
    root: PathBuf,
}

impl JsonDirectory {
    fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(Error::StoreNotFound(root));
        }
        Ok(Self { root })
    }

    fn create(root: impl AsRef<Path>) -> Result<Self> {
        fs::create_dir_all(root.as_ref())?;
        Self::open(root)
    }

    fn path_for(&self, doc_id: &str) -> PathBuf {
        self.root.join(format!("{}.json", doc_id))
    }

    fn doc_ids(&self) -> Result<BTreeSet<String>> {
        let mut ids = BTreeSet::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.insert(stem.to_string());
                }
            }
        }
        Ok(ids)
    }

    /// Load `<doc_id>.json`; its content must be filed under the same id
    fn load<T: DeserializeOwned + StoredDocument>(&self, doc_id: &str) -> Result<Option<T>> {
        let path = self.path_for(doc_id);
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let value: T = serde_json::from_str(&content).map_err(|source| Error::Json {
            path: path.clone(),
            source,
        })?;
        if value.stored_doc_id() != doc_id {
            return Err(Error::DocIdMismatch {
                path,
                expected: doc_id.to_string(),
                found: value.stored_doc_id().to_string(),
            });
        }
        Ok(Some(value))
    }

    fn write<T: Serialize>(&self, doc_id: &str, value: &T) -> Result<()> {
        let path = self.path_for(doc_id);
        let json = serde_json::to_string_pretty(value).map_err(|source| Error::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Answer keys stored as JSON files
#[derive(Debug, Clone)]
pub struct JsonAnnotationStore {
    dir: JsonDirectory,
}

impl JsonAnnotationStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        Ok(Self { dir: JsonDirectory::open(root)? })
    }

    pub fn create(root: impl AsRef<Path>) -> Result<Self> {
        Ok(Self { dir: JsonDirectory::create(root)? })
    }

    pub fn write(&self, key: &AnswerKey) -> Result<()> {
        self.dir.write(&key.doc_id, key)
    }
}

impl AnnotationStore for JsonAnnotationStore {
    fn doc_ids(&self) -> Result<BTreeSet<String>> {
        self.dir.doc_ids()
    }

    fn load(&self, doc_id: &str) -> Result<Option<AnswerKey>> {
        self.dir.load(doc_id)
    }

    fn read(&self, doc_id: &str) -> Result<AnswerKey> {
        self.load(doc_id)?.ok_or_else(|| Error::MissingDocument {
            store: self.dir.root.clone(),
            doc_id: doc_id.to_string(),
        })
    }
}

/// System argument output stored as JSON files
#[derive(Debug, Clone)]
pub struct JsonArgumentStore {
    dir: JsonDirectory,
}

impl JsonArgumentStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        Ok(Self { dir: JsonDirectory::open(root)? })
    }

    pub fn create(root: impl AsRef<Path>) -> Result<Self> {
        Ok(Self { dir: JsonDirectory::create(root)? })
    }

    pub fn write(&self, output: &ArgumentOutput) -> Result<()> {
        self.dir.write(&output.doc_id, output)
    }
}

impl ArgumentStore for JsonArgumentStore {
    fn doc_ids(&self) -> Result<BTreeSet<String>> {
        self.dir.doc_ids()
    }

    fn load(&self, doc_id: &str) -> Result<Option<ArgumentOutput>> {
        self.dir.load(doc_id)
    }
}

/// Linkings stored as JSON files.
///
/// A read is checked against the answer key or argument output it is read
/// for, so a linking can never mention a response its source lacks.
#[derive(Debug, Clone)]
pub struct JsonLinkingStore {
    dir: JsonDirectory,
}

impl JsonLinkingStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        Ok(Self { dir: JsonDirectory::open(root)? })
    }

    pub fn create(root: impl AsRef<Path>) -> Result<Self> {
        Ok(Self { dir: JsonDirectory::create(root)? })
    }

    pub fn write(&self, linking: &ResponseLinking) -> Result<()> {
        self.dir.write(linking.doc_id(), linking)
    }
}

impl LinkingStore for JsonLinkingStore {
    fn read_for_answer_key(&self, key: &AnswerKey) -> Result<Option<ResponseLinking>> {
        let linking: Option<ResponseLinking> = self.dir.load(&key.doc_id)?;
        if let Some(linking) = &linking {
            linking.check_against_answer_key(key)?;
        }
        Ok(linking)
    }

    fn read_for_argument_output(
        &self,
        output: &ArgumentOutput,
    ) -> Result<Option<ResponseLinking>> {
        let linking: Option<ResponseLinking> = self.dir.load(&output.doc_id)?;
        if let Some(linking) = &linking {
            linking.check_against_argument_output(output)?;
        }
        Ok(linking)
    }
}
