//! docspeech - Extract document text and split it into TTS-ready chunks

mod config;
mod response;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::DocspeechConfig;
use doc_text::{DocError, DocumentFormat, DocumentProcessor};
use response::DocumentResponse;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "docspeech")]
#[command(about = "Extract document text and split it into TTS-ready chunks", long_about = None)]
#[command(version)]
struct Args {
    /// Enable debug output
    #[arg(short, long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract and chunk a document, printing the response as JSON
    Process {
        /// Path to a PDF, DOCX, PPTX or TXT file
        file: PathBuf,

        /// Maximum chunk length in characters (default from config)
        #[arg(long, allow_negative_numbers = true)]
        max_chunk_length: Option<i64>,

        /// Characters of extracted text to include in the preview
        #[arg(long)]
        preview_length: Option<usize>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the full text extracted from a document
    Extract {
        /// Path to a PDF, DOCX, PPTX or TXT file
        file: PathBuf,
    },
    /// Split plain text into chunks
    Chunk {
        /// Text file to read (stdin when omitted)
        file: Option<PathBuf>,

        /// Maximum chunk length in characters (default from config)
        #[arg(long, allow_negative_numbers = true)]
        max_chunk_length: Option<i64>,

        /// Print the chunks as a JSON array instead of one per line
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default maximum chunk length
    SetMaxChunkLength {
        /// Value in characters
        value: usize,
    },
    /// Set default preview length
    SetPreviewLength {
        /// Value in characters
        value: usize,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Commands::Process {
            file,
            max_chunk_length,
            preview_length,
            pretty,
        } => {
            let config = DocspeechConfig::load().context("Failed to load configuration")?;
            let max_length = resolve_max_length(max_chunk_length, &config)?;
            let preview_length = preview_length.unwrap_or(config.preview_length);

            let response = process_file(&file, max_length, preview_length)?;
            let json = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{}", json);
        }
        Commands::Extract { file } => {
            let (filename, content) = read_document(&file)?;
            let text = DocumentProcessor::process_document(&content, &filename)
                .with_context(|| format!("Failed to process {}", file.display()))?;
            println!("{}", text);
        }
        Commands::Chunk {
            file,
            max_chunk_length,
            json,
        } => {
            let config = DocspeechConfig::load().context("Failed to load configuration")?;
            let max_length = resolve_max_length(max_chunk_length, &config)?;

            let text = read_plain_text(file.as_deref())?;
            let chunks = DocumentProcessor::format_text_for_tts(&text, max_length)?;
            log::info!("Split text into {} chunks", chunks.len());

            if json {
                println!("{}", serde_json::to_string(&chunks)?);
            } else {
                for chunk in &chunks {
                    println!("{}", chunk);
                }
            }
        }
        Commands::Config { action } => handle_config_command(&action)?,
    }
    Ok(())
}

/// Read a document and derive the filename used for format selection.
fn read_document(path: &Path) -> Result<(String, Vec<u8>)> {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow::anyhow!("Not a file path: {}", path.display()))?;
    let content =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok((filename, content))
}

/// Read plain text from `file` or stdin, decoding it like a `.txt` upload.
fn read_plain_text(file: Option<&Path>) -> Result<String> {
    let (source, content) = match file {
        Some(path) => (
            path.display().to_string(),
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => {
            let mut content = Vec::new();
            std::io::stdin()
                .read_to_end(&mut content)
                .context("Failed to read stdin")?;
            ("stdin".to_string(), content)
        }
    };

    doc_text::extract::extract(DocumentFormat::Txt, &content)
        .with_context(|| format!("Failed to decode {}", source))
}

/// Extract and chunk one document into a response.
fn process_file(path: &Path, max_length: usize, preview_length: usize) -> Result<DocumentResponse> {
    let (filename, content) = read_document(path)?;
    log::info!(
        "Processing document: {}, type: {}",
        filename,
        doc_text::format::file_extension(&filename)
    );

    let text = DocumentProcessor::process_document(&content, &filename)
        .with_context(|| format!("Failed to process {}", filename))?;
    let chunks = DocumentProcessor::format_text_for_tts(&text, max_length)?;

    log::info!(
        "Document processed successfully. Extracted {} text chunks.",
        chunks.len()
    );

    Ok(DocumentResponse::new(&filename, &text, chunks, preview_length))
}

/// Pick the chunk length from the flag or config, rejecting non-positive values.
fn resolve_max_length(flag: Option<i64>, config: &DocspeechConfig) -> Result<usize> {
    match flag {
        None => Ok(config.max_chunk_length),
        Some(value) if value > 0 => Ok(usize::try_from(value)?),
        Some(value) => Err(DocError::InvalidArgument(format!(
            "max_chunk_length must be a positive integer, got {}",
            value
        ))
        .into()),
    }
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = DocspeechConfig::load()?;
            println!(
                "Configuration file: {}",
                DocspeechConfig::config_path().display()
            );
            println!();
            println!("max_chunk_length = {}", config.max_chunk_length);
            println!("preview_length = {}", config.preview_length);
        }
        ConfigAction::SetMaxChunkLength { value } => {
            let mut config = DocspeechConfig::load()?;
            config.max_chunk_length = *value;
            config.save()?;
            println!("Default max chunk length set to: {}", config.max_chunk_length);
        }
        ConfigAction::SetPreviewLength { value } => {
            let mut config = DocspeechConfig::load()?;
            config.preview_length = *value;
            config.save()?;
            println!("Default preview length set to: {}", config.preview_length);
        }
    }
    Ok(())
}
