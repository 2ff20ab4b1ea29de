//! EAL scorer CLI

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use eal_scorer::{
    config::ScorerConfig,
    reporting::print_console_report,
    runner::{load_documents_to_score, run_alignment, EalRunner},
};
use kbp_events::{AnnotationStore, JsonAnnotationStore, JsonArgumentStore, JsonLinkingStore};

#[derive(Parser)]
#[command(name = "eal-scorer")]
#[command(about = "Scores KBP event argument extraction and linking output")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score system output with the combined argument and linking metric
    Score {
        /// Answer key store to score against
        #[arg(long)]
        answer_key: PathBuf,

        /// Reference linking store to score against
        #[arg(long)]
        reference_linking: PathBuf,

        /// A single system's output directory
        #[arg(
            long,
            required_unless_present = "system_outputs_dir",
            conflicts_with = "system_outputs_dir",
            requires = "output"
        )]
        system_output: Option<PathBuf>,

        /// Output directory for a single system
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory whose subdirectories are system outputs
        #[arg(long, requires = "output_root")]
        system_outputs_dir: Option<PathBuf>,

        /// Output root; one subdirectory is written per system
        #[arg(long)]
        output_root: Option<PathBuf>,

        /// File listing the documents to score (default: all answer key documents)
        #[arg(long)]
        documents_to_score: Option<PathBuf>,

        /// Link system arguments by event type instead of reading `linking/`
        #[arg(long)]
        create_default_linking: bool,

        /// Weight of the linking score
        #[arg(long)]
        lambda: Option<f64>,
    },

    /// Align system output with the answer key and run observers
    Align {
        /// Answer key store
        #[arg(long)]
        answer_key: PathBuf,

        /// System argument store
        #[arg(long)]
        system_output: PathBuf,

        /// Output directory for observer reports
        #[arg(short, long)]
        output: PathBuf,

        /// File listing the documents to align (default: every document in either store)
        #[arg(long)]
        documents_to_score: Option<PathBuf>,

        /// Comma-separated observer list (default: from configuration)
        #[arg(long)]
        observers: Option<String>,
    },

    /// Generate sample configuration
    InitConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = "config/scorer.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("eal_scorer=debug,info")
    } else {
        EnvFilter::new("eal_scorer=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    let config = match &cli.config {
        Some(path) => ScorerConfig::from_file(path)?,
        None => ScorerConfig::load_or_default(),
    };

    match cli.command {
        Commands::Score {
            answer_key,
            reference_linking,
            system_output,
            output,
            system_outputs_dir,
            output_root,
            documents_to_score,
            create_default_linking,
            lambda,
        } => {
            let mut config = config;
            if let Some(lambda) = lambda {
                config.scoring.lambda = lambda;
            }
            if create_default_linking {
                config.linking.create_default_linking = true;
            }
            config.validate()?;

            let targets = match (system_output, output, system_outputs_dir, output_root) {
                (Some(system), Some(output), None, _) => ScoreTargets::Single { system, output },
                (None, _, Some(systems), Some(root)) => ScoreTargets::Many { systems, root },
                _ => {
                    return Err("exactly one of --system-output/--output or \
                                --system-outputs-dir/--output-root is required"
                        .into())
                }
            };
            score(config, &answer_key, &reference_linking, targets, documents_to_score.as_deref())?;
        }

        Commands::Align {
            answer_key,
            system_output,
            output,
            documents_to_score,
            observers,
        } => {
            let names: Vec<String> = match observers {
                Some(list) => list
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                None => config.observers.enabled.clone(),
            };
            align(&answer_key, &system_output, &output, documents_to_score.as_deref(), &names)?;
        }

        Commands::InitConfig { output } => {
            init_config(output)?;
        }
    }

    Ok(())
}

enum ScoreTargets {
    Single { system: PathBuf, output: PathBuf },
    Many { systems: PathBuf, root: PathBuf },
}

fn score(
    config: ScorerConfig,
    answer_key: &Path,
    reference_linking: &Path,
    targets: ScoreTargets,
    documents_to_score: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let answer_key = JsonAnnotationStore::open(answer_key)?;
    let reference_linking = JsonLinkingStore::open(reference_linking)?;
    let documents = match documents_to_score {
        Some(path) => load_documents_to_score(path)?,
        None => answer_key.doc_ids()?,
    };
    let runner = EalRunner::new(config);

    match targets {
        ScoreTargets::Single { system, output } => {
            tracing::info!("Scoring single system output {}", system.display());
            let aggregate = runner.score_system_dir(
                &answer_key,
                &reference_linking,
                &system,
                &documents,
                &output,
            )?;
            print_console_report(&system.display().to_string(), &aggregate);
        }
        ScoreTargets::Many { systems, root } => {
            let aggregates = runner.score_systems_dir(
                &answer_key,
                &reference_linking,
                &systems,
                &documents,
                &root,
            )?;
            for (name, aggregate) in &aggregates {
                print_console_report(name, aggregate);
            }
        }
    }
    Ok(())
}

fn align(
    answer_key: &Path,
    system_output: &Path,
    output: &Path,
    documents_to_score: Option<&Path>,
    observers: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let annotations = JsonAnnotationStore::open(answer_key)?;
    let arguments = JsonArgumentStore::open(system_output)?;
    let documents = documents_to_score.map(load_documents_to_score).transpose()?;

    let report = run_alignment(&arguments, &annotations, documents.as_ref(), observers, output)?;
    println!("Aligned {} classes over {} documents", report.classes, report.documents);
    println!("Observer output written to: {}", output.display());
    Ok(())
}

fn init_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = ScorerConfig::default();

    // Ensure parent directory exists
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    config.save_toml(&output)?;
    println!("Configuration written to: {}", output.display());
    Ok(())
}
