// TaskGrid CLI - headless task table operations

mod document_io;
mod exit_codes;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use taskgrid_assist::{AssistError, RelayClient};
use taskgrid_config::{RelayConfig, Settings};
use taskgrid_engine::{
    ColumnSpec, ColumnType, Document, Generator, PasteMode, SelectionRange,
};

use document_io::{load_document, options_from, output_path, parse_cell, read_payload, save_document};
use exit_codes::{
    EXIT_INVALID_DOCUMENT, EXIT_IO, EXIT_REJECTED, EXIT_RELAY_BAD_REPLY, EXIT_RELAY_FAILED,
    EXIT_RELAY_NOT_CONFIGURED, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "taskgrid")]
#[command(about = "Task table editing from the command line")]
#[command(long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_COMMIT_HASH"), ")"))]
#[command(version)]
struct Cli {
    /// Settings file (defaults to the user config dir)
    #[arg(long, global = true, env = "TASKGRID_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new document with the default columns
    Init {
        /// Number of empty rows
        #[arg(long, default_value_t = 0)]
        rows: usize,

        /// Where to write the document
        #[arg(long, short = 'o')]
        out: PathBuf,
    },

    /// Print a document as tab-separated values
    Show {
        file: PathBuf,

        /// Print the document JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Paste clipboard-style data into a document
    #[command(after_help = "\
Examples:
  taskgrid paste plan.json --text rows.tsv --at 1,1
  pbpaste | taskgrid paste plan.json --text - --at 3,1 --mode append
  taskgrid paste plan.json --text cells.txt --html cells.html --at 1,1 --to 2,2")]
    Paste {
        file: PathBuf,

        /// Plain-text payload (tab-separated); `-` reads stdin
        #[arg(long)]
        text: PathBuf,

        /// HTML payload; used when it holds a table
        #[arg(long)]
        html: Option<PathBuf>,

        /// replace, insert-rows, insert-columns, append, values-only, formats-only
        #[arg(long)]
        mode: Option<String>,

        /// Selection anchor as ROW,COL counted from 1
        #[arg(long)]
        at: String,

        /// Selection focus as ROW,COL (defaults to the anchor)
        #[arg(long)]
        to: Option<String>,

        /// Write here instead of updating FILE
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Add a column
    AddColumn {
        file: PathBuf,

        #[arg(long)]
        title: String,

        /// text, select, date, number or checkbox
        #[arg(long = "type", default_value = "text")]
        column_type: String,

        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Ask the generation relay for columns and rows and merge them
    Generate {
        file: PathBuf,

        /// What to generate
        #[arg(long)]
        prompt: String,

        /// Relay endpoint (overrides settings)
        #[arg(long)]
        endpoint: Option<String>,

        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Show effective settings and where they are read from
    Settings,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    let result = match cli.command {
        Commands::Init { rows, out } => cmd_init(&settings, rows, out),
        Commands::Show { file, json } => cmd_show(&settings, file, json),
        Commands::Paste { file, text, html, mode, at, to, out } => {
            cmd_paste(&settings, file, text, html, mode, at, to, out)
        }
        Commands::AddColumn { file, title, column_type, out } => {
            cmd_add_column(&settings, file, title, column_type, out)
        }
        Commands::Generate { file, prompt, endpoint, out } => {
            cmd_generate(&settings, file, prompt, endpoint, out)
        }
        Commands::Settings => cmd_settings(&settings, cli.settings),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn document(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INVALID_DOCUMENT, message: msg.into(), hint: None }
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self { code: EXIT_REJECTED, message: msg.into(), hint: None }
    }

    pub fn relay(err: AssistError) -> Self {
        let (code, hint) = match &err {
            AssistError::NotConfigured(_) => (
                EXIT_RELAY_NOT_CONFIGURED,
                Some(format!("edit {}", Settings::config_path_display())),
            ),
            AssistError::ApiError { status: 401 | 403, .. } => (
                EXIT_RELAY_FAILED,
                Some(format!("check the {} environment variable", taskgrid_config::relay::RELAY_KEY_ENV)),
            ),
            AssistError::NetworkError(_) | AssistError::ApiError { .. } => (EXIT_RELAY_FAILED, None),
            AssistError::ParseError(_) | AssistError::InvalidResponse(_) => (EXIT_RELAY_BAD_REPLY, None),
        };
        Self { code, message: err.to_string(), hint }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// init / show
// ============================================================================

fn cmd_init(settings: &Settings, rows: usize, out: PathBuf) -> Result<(), CliError> {
    let doc = Document::with_rows(rows, options_from(settings));
    save_document(&doc, &out)?;
    eprintln!("Created {} ({} rows)", out.display(), rows);
    Ok(())
}

fn cmd_show(settings: &Settings, file: PathBuf, json: bool) -> Result<(), CliError> {
    let doc = load_document(&file, options_from(settings))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let write_err = |e: io::Error| CliError::io(e.to_string());

    if json {
        let text = doc.export_json().map_err(CliError::from)?;
        writeln!(out, "{}", text).map_err(write_err)?;
        return Ok(());
    }

    let columns = doc.grid().columns();
    let header: Vec<&str> = columns.iter().map(|c| c.title.as_str()).collect();
    writeln!(out, "{}", header.join("\t")).map_err(write_err)?;
    for task in doc.grid().tasks() {
        let values: Vec<&str> = columns
            .iter()
            .map(|c| task.get(&c.key).unwrap_or(""))
            .collect();
        writeln!(out, "{}", values.join("\t")).map_err(write_err)?;
    }
    Ok(())
}

// ============================================================================
// paste
// ============================================================================

fn parse_mode(settings: &Settings, mode: Option<String>) -> Result<PasteMode, CliError> {
    let (raw, from_settings) = match mode {
        Some(m) => (m, false),
        None => (settings.default_paste_mode.clone(), true),
    };
    match raw.parse::<PasteMode>() {
        Ok(mode) => Ok(mode),
        Err(e) if from_settings => {
            log::warn!("paste.defaultMode: {}; using replace", e);
            Ok(PasteMode::default())
        }
        Err(e) => {
            let names: Vec<&str> = PasteMode::ALL.iter().map(|m| m.name()).collect();
            Err(CliError::args(e).with_hint(format!("one of: {}", names.join(", "))))
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_paste(
    settings: &Settings,
    file: PathBuf,
    text: PathBuf,
    html: Option<PathBuf>,
    mode: Option<String>,
    at: String,
    to: Option<String>,
    out: Option<PathBuf>,
) -> Result<(), CliError> {
    let mode = parse_mode(settings, mode)?;
    let anchor = parse_cell(&at)?;
    let focus = match to {
        Some(to) => parse_cell(&to)?,
        None => anchor,
    };

    let text = read_payload(&text)?;
    let html = html.map(|p| read_payload(&p)).transpose()?;

    let mut doc = load_document(&file, options_from(settings))?;
    doc.select(SelectionRange::new(anchor, focus)).map_err(CliError::from)?;

    let outcome = doc
        .paste(html.as_deref(), &text, mode)
        .map_err(CliError::from)?;

    let Some(outcome) = outcome else {
        eprintln!("Nothing pasted");
        return Ok(());
    };

    save_document(&doc, &output_path(&file, out))?;
    match outcome.affected {
        Some(range) => eprintln!(
            "Pasted {}x{} ({}), {} rows added, {} columns added",
            range.row_count(),
            range.col_count(),
            mode,
            outcome.rows_added,
            outcome.columns_added
        ),
        None => eprintln!("Nothing pasted"),
    }
    if outcome.columns_clipped > 0 {
        eprintln!(
            "warning: {} pasted column(s) fell outside the grid and were dropped",
            outcome.columns_clipped
        );
    }
    if outcome.rows_clipped > 0 {
        eprintln!(
            "warning: {} pasted row(s) fell outside the grid and were dropped",
            outcome.rows_clipped
        );
    }
    Ok(())
}

// ============================================================================
// add-column
// ============================================================================

fn cmd_add_column(
    settings: &Settings,
    file: PathBuf,
    title: String,
    column_type: String,
    out: Option<PathBuf>,
) -> Result<(), CliError> {
    if title.trim().is_empty() {
        return Err(CliError::args("--title must not be empty"));
    }
    let mut doc = load_document(&file, options_from(settings))?;
    let column = doc
        .add_column(ColumnSpec::new(title.trim()).with_type(ColumnType::from_name(&column_type)))
        .map_err(CliError::from)?;

    save_document(&doc, &output_path(&file, out))?;
    eprintln!("Added column {} (key {}, {})", column.title, column.key, column.column_type.name());
    Ok(())
}

// ============================================================================
// generate
// ============================================================================

fn cmd_generate(
    settings: &Settings,
    file: PathBuf,
    prompt: String,
    endpoint: Option<String>,
    out: Option<PathBuf>,
) -> Result<(), CliError> {
    if prompt.trim().is_empty() {
        return Err(CliError::args("--prompt must not be empty"));
    }
    let mut doc = load_document(&file, options_from(settings))?;

    let mut config = RelayConfig::from_settings(settings);
    if let Some(endpoint) = endpoint {
        config = config.with_endpoint(endpoint);
    }
    log::info!(
        "generation relay {} (model {}, token: {})",
        config.endpoint,
        config.model,
        config.key_source.as_str()
    );

    let client = RelayClient::new(config).map_err(CliError::relay)?;
    let suggestion = client
        .generate(&doc.generation_request(prompt))
        .map_err(CliError::relay)?;

    match doc.merge_suggestion(&suggestion).map_err(CliError::from)? {
        Some(outcome) => {
            save_document(&doc, &output_path(&file, out))?;
            eprintln!(
                "Generated {} rows, {} columns",
                outcome.rows_added, outcome.columns_added
            );
        }
        None => eprintln!("Relay suggested nothing"),
    }
    Ok(())
}

// ============================================================================
// settings
// ============================================================================

fn cmd_settings(settings: &Settings, path: Option<PathBuf>) -> Result<(), CliError> {
    let path = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(Settings::config_path_display);
    let json = serde_json::to_string_pretty(settings).map_err(|e| CliError::io(e.to_string()))?;
    println!("// {}", path);
    println!("{}", json);
    Ok(())
}
