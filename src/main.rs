// src/main.rs
use clap::Parser;
use resume_extractor::batch::{self, BatchConfig};
use resume_extractor::llm::DEFAULT_MODEL;
use resume_extractor::utils::{self, AppError};
use std::path::PathBuf;

/// Scan a folder for resumes and extract structured data (name, email, skills)
#[derive(Parser, Debug)]
#[command(name = "resume_extractor", author, version, about, long_about = None)]
struct Args {
    /// Directory to scan for .pdf and .docx resumes
    #[arg(long, default_value = "resumes")]
    input_dir: PathBuf,

    /// Directory for parsed JSON, manifest.json and errors.json
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Directory successfully parsed resumes are moved into
    #[arg(long, default_value = "archive")]
    archive_dir: PathBuf,

    /// Skip archiving processed files
    #[arg(long)]
    no_archive: bool,

    /// Force keyword-only skills extraction, even if an API key is set
    #[arg(long)]
    no_llm: bool,

    /// NER model (local directory or Hub id) for name extraction
    #[arg(long)]
    ner_model: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Gemini model used for LLM skills extraction
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,
}

impl From<Args> for BatchConfig {
    fn from(args: Args) -> Self {
        BatchConfig {
            input_dir: args.input_dir,
            output_dir: args.output_dir,
            archive_dir: args.archive_dir,
            archive: !args.no_archive,
            no_llm: args.no_llm,
            ner_model: args.ner_model,
            api_key: args.api_key,
            model: args.model,
        }
    }
}

fn main() {
    // 1. Load .env (if any) before clap reads GEMINI_* variables
    let dotenv = dotenvy::dotenv();

    // 2. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();
    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    // 3. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!(
        "Starting batch: input={}, output={}, archive={}",
        args.input_dir.display(),
        args.output_dir.display(),
        if args.no_archive { "off".to_string() } else { args.archive_dir.display().to_string() }
    );

    // 4. Run and map the outcome to an exit code
    let code = match run(args.into()) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Batch aborted: {}", e);
            1
        }
    };
    std::process::exit(code);
}

fn run(config: BatchConfig) -> Result<i32, AppError> {
    let summary = batch::run(&config)?;
    Ok(summary.exit_code())
}
