//! Score report files

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::analysis::{CorpusAggregate, DocumentResult};
use crate::error::Result;

pub const SCORES_BY_DOCUMENT: &str = "scores_by_document.txt";
pub const AGGREGATE_SCORE: &str = "aggregate_score.txt";
pub const AGGREGATE_SCORE_JSON: &str = "aggregate_score.json";

/// Per-document table, scores as percentages
pub fn render_scores_by_document(results: &[DocumentResult]) -> String {
    let mut out = format!(
        "{:>40}\t{:>10}\t{:>10}\t{:>10}\t{:>10}\n",
        "Document", "Arg", "Link-P,R,F", "Link", "Combined"
    );
    let rows: Vec<String> = results
        .iter()
        .map(|result| {
            let linking = &result.linking_score;
            format!(
                "{:>40}\t{:>10.2}\t{:>7}{:>7}{:>7}\t{:>10.2}\t{:>10.2}",
                result.doc_id,
                100.0 * result.scaled_argument_score(),
                format!("{:.1}", 100.0 * linking.precision),
                format!("{:.1}", 100.0 * linking.recall),
                format!("{:.1}", 100.0 * linking.f1),
                100.0 * result.scaled_linking_score(),
                100.0 * result.scaled_score()
            )
        })
        .collect();
    out.push_str(&rows.join("\n"));
    out
}

/// The five labelled aggregate lines
pub fn render_aggregate(aggregate: &CorpusAggregate) -> String {
    let mut out = String::new();
    for (label, value) in [
        ("Aggregate argument score", aggregate.argument_score),
        ("Aggregate linking score", aggregate.linking_score),
        ("Overall score", aggregate.overall_score),
        ("Aggregate linking precision", aggregate.linking_precision),
        ("Aggregate linking recall", aggregate.linking_recall),
    ] {
        writeln!(out, "{:>30}:{:>8.2}", label, 100.0 * value).unwrap();
    }
    out
}

/// JSON summary export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub timestamp: String,
    pub lambda: f64,
    pub documents_scored: usize,
    pub aggregate: CorpusAggregate,
    pub documents: Vec<DocumentResult>,
}

impl JsonSummary {
    pub fn new(aggregate: &CorpusAggregate, results: &[DocumentResult]) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            lambda: aggregate.lambda,
            documents_scored: results.len(),
            aggregate: aggregate.clone(),
            documents: results.to_vec(),
        }
    }

    /// Write to JSON file
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }
}

/// Write the score reports of one system into `output_dir`
pub fn write_reports(
    output_dir: &Path,
    results: &[DocumentResult],
    aggregate: &CorpusAggregate,
    json_summary: bool,
) -> Result<()> {
    fs::create_dir_all(output_dir)?;
    fs::write(output_dir.join(SCORES_BY_DOCUMENT), render_scores_by_document(results))?;
    fs::write(output_dir.join(AGGREGATE_SCORE), render_aggregate(aggregate))?;
    if json_summary {
        JsonSummary::new(aggregate, results).write_to_file(output_dir.join(AGGREGATE_SCORE_JSON))?;
    }
    tracing::info!("Wrote score reports to {}", output_dir.display());
    Ok(())
}

/// Print the aggregate scores to stdout
pub fn print_console_report(system: &str, aggregate: &CorpusAggregate) {
    println!("\n=== EAL scores: {} ===\n", system);
    println!("Documents scored: {}\n", aggregate.documents);
    print!("{}", render_aggregate(aggregate));
    println!("\n{:=<50}", "");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ArgumentTally, LinkingScore};

    fn result() -> DocumentResult {
        DocumentResult {
            doc_id: "AFP_ENG_20100101.0001".to_string(),
            unscaled_argument_score: 1.0,
            argument_normalizer: 2.0,
            linking_score: LinkingScore::new(1.0, 0.5),
            linking_normalizer: 2.0,
            lambda: 0.25,
            tally: ArgumentTally::default(),
        }
    }

    #[test]
    fn test_scores_by_document_row() {
        let text = render_scores_by_document(&[result()]);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].trim_start().starts_with("Document"));
        let fields: Vec<&str> = lines[1].split('\t').collect();
        assert_eq!(fields[0].trim(), "AFP_ENG_20100101.0001");
        assert_eq!(fields[1].trim(), "50.00");
        assert_eq!(fields[2], "  100.0   50.0   66.7");
        assert_eq!(fields[3].trim(), "66.67");
    }

    #[test]
    fn test_aggregate_lines() {
        let aggregate = CorpusAggregate::from_results(&[result()], 0.25);
        let text = render_aggregate(&aggregate);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], format!("{:>30}:{:>8}", "Aggregate argument score", "50.00"));
        assert!(lines[2].starts_with("                 Overall score:"));
    }

    #[test]
    fn test_write_reports() {
        let dir = tempfile::TempDir::new().unwrap();
        let results = vec![result()];
        let aggregate = CorpusAggregate::from_results(&results, 0.25);
        write_reports(dir.path(), &results, &aggregate, true).unwrap();

        let json = fs::read_to_string(dir.path().join(AGGREGATE_SCORE_JSON)).unwrap();
        let summary: JsonSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary.documents_scored, 1);
        assert!(dir.path().join(SCORES_BY_DOCUMENT).exists());
        assert!(dir.path().join(AGGREGATE_SCORE).exists());
    }
}
