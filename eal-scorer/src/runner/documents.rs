//! Lists of documents to score

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Document ids, one per line. Blank lines and `#` comments are skipped.
pub fn parse_document_list(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn load_documents_to_score(path: impl AsRef<Path>) -> Result<BTreeSet<String>> {
    let path = path.as_ref();
    let documents = parse_document_list(&fs::read_to_string(path)?);
    tracing::info!("Scoring over {} documents specified in {}", documents.len(), path.display());
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let documents = parse_document_list(
            "# eval set\nNYT_ENG_1\n\n  APW_ENG_2  # late addition\nNYT_ENG_1\n",
        );
        assert_eq!(
            documents.into_iter().collect::<Vec<_>>(),
            vec!["APW_ENG_2".to_string(), "NYT_ENG_1".to_string()]
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("docs.txt");
        fs::write(&path, "doc1\ndoc2\n").unwrap();
        assert_eq!(load_documents_to_score(&path).unwrap().len(), 2);
    }
}
