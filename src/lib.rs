use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

pub mod backend;
pub mod config;
pub mod error;
pub mod locator;
pub mod output;
pub mod templates;


pub use backend::{BackendClient, GeneratedTests, Origin};
pub use config::GuardianConfig;
pub use error::{GuardianError, Result};
pub use locator::{extract, extract_many, ExtractRequest, Extractor, ExtractorRegistry, FunctionInfo};

/// Shown whenever no function encloses the cursor
pub const NOT_IN_FUNCTION_MESSAGE: &str = "No function found at the cursor. Place the cursor inside a function";

#[derive(Debug, Parser)]
#[command(name = "guardian", version, about = "Generate unit tests with an LLM backend")]
struct Cli {
    /// TOML config file (defaults plus GUARDIAN_* env overrides otherwise)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the function enclosing a line as JSON
    Locate {
        #[arg(long)]
        file: PathBuf,
        /// 1-based line number
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        line: u64,
        /// Language tag; inferred from the extension when omitted
        #[arg(long)]
        language: Option<String>,
    },
    /// Generate a test file for a whole file, or for the function at --line
    Generate {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        line: Option<u64>,
        #[arg(long)]
        language: Option<String>,
    },
}

// ============ Commands ============

/// Language tag for a file, unless the caller supplied one
pub fn language_for(path: &Path, explicit: Option<&str>) -> String {
    match explicit {
        Some(tag) => tag.to_string(),
        None => locator::language_from_extension(
            path.extension().and_then(|e| e.to_str()).unwrap_or(""),
        ),
    }
}

/// Locate the function enclosing `line` (0-indexed) in a file on disk
pub fn locate_in_file(path: &Path, line: usize, language: &str) -> Result<Option<FunctionInfo>> {
    let content = std::fs::read_to_string(path)?;
    Ok(locator::extract(&content, line, language))
}

/// Config from an optional file, then env overrides, validated
pub fn resolve_config(path: Option<&Path>) -> Result<GuardianConfig> {
    let config = match path {
        Some(path) => GuardianConfig::load(path)?,
        None => GuardianConfig::default(),
    }
    .with_env_overrides();
    config.validate()?;
    Ok(config)
}

/// What `generate` produced
#[derive(Debug)]
pub enum GenerateOutcome {
    Written { path: PathBuf, origin: Origin },
    NotInFunction,
}

/// Ask the backend for tests and write them next to the source file.
///
/// With `line` (0-indexed) only the function at that line is covered.
pub async fn generate_tests(
    config: &GuardianConfig,
    path: &Path,
    line: Option<usize>,
    language: &str,
) -> Result<GenerateOutcome> {
    let content = std::fs::read_to_string(path)?;
    let client = BackendClient::new(config)?;
    let path_str = path.to_string_lossy();

    let generated = match line {
        Some(line) => {
            let Some(function) = locator::extract(&content, line, language) else {
                return Ok(GenerateOutcome::NotInFunction);
            };
            client.generate_for_function(&function, &path_str, None).await?
        }
        None => GeneratedTests {
            test_code: client
                .generate_for_file(&content, language, Some(path_str.as_ref()))
                .await?,
            origin: Origin::Backend,
        },
    };

    let test_path = output::test_file_path(path, language, &config.test_directory);
    output::write_test_file(&test_path, &generated.test_code)?;

    Ok(GenerateOutcome::Written {
        path: test_path,
        origin: generated.origin,
    })
}

// ============ Entry Point ============

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub async fn run() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match execute(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("guardian: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Locate { file, line, language } => {
            let language = language_for(&file, language.as_deref());
            match locate_in_file(&file, (line - 1) as usize, &language)? {
                Some(info) => {
                    println!("{}", serde_json::to_string_pretty(&info)?);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("{NOT_IN_FUNCTION_MESSAGE}");
                    Ok(ExitCode::from(1))
                }
            }
        }
        Command::Generate { file, line, language } => {
            let config = resolve_config(cli.config.as_deref())?;
            let language = language_for(&file, language.as_deref());
            let line = line.map(|l| (l - 1) as usize);

            match generate_tests(&config, &file, line, &language).await? {
                GenerateOutcome::Written { path, origin } => {
                    if origin == Origin::Template {
                        eprintln!("Backend unavailable, wrote a basic test template instead");
                    }
                    println!("{}", path.display());
                    Ok(ExitCode::SUCCESS)
                }
                GenerateOutcome::NotInFunction => {
                    eprintln!("{NOT_IN_FUNCTION_MESSAGE}");
                    Ok(ExitCode::from(1))
                }
            }
        }
    }
}
