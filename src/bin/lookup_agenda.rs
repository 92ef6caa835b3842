//! lookup_agenda - query the agenda database by column

use std::path::PathBuf;
use std::process::ExitCode;
use clap::{Parser, ValueEnum};
use clap::error::ErrorKind;
use agenda::config::{ensure_db_dir, load_config};
use agenda::query::{LookupColumn, LookupEngine};
use agenda::ui;
use agenda::SqliteStore;

#[derive(Parser)]
#[command(name = "lookup_agenda")]
#[command(version)]
#[command(about = "Look up agenda sessions by column")]
#[command(long_about = r#"
Columns: date, time_start, time_end, title, location, description, speaker

date and time columns must match exactly; the others (and speaker names)
match case-insensitive substrings. A matching session also lists all of its
sub-sessions.

Example usage:
  lookup_agenda location "Room 2"
  lookup_agenda speaker jane
"#)]
struct Cli {
    /// Column to search
    column: String,

    /// Value to look for
    #[arg(allow_hyphen_values = true)]
    value: String,

    /// Path to the database file
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            eprintln!("Error: Invalid number of arguments");
            return ExitCode::from(1);
        }
    };

    // Validated before the database is touched
    let column: LookupColumn = match cli.column.parse() {
        Ok(column) => column,
        Err(e) => {
            ui::error(&format!("Error: {}", e));
            let valid: Vec<_> = LookupColumn::all().iter().map(|c| c.as_str()).collect();
            eprintln!("Valid columns: {}", valid.join(", "));
            return ExitCode::from(1);
        }
    };

    agenda::logging::init(cli.verbose);

    match run(&cli, column) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::error(&format!("An error occurred: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, column: LookupColumn) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?.unwrap_or_default();
    let database = config.database_path(cli.database.as_deref());
    ensure_db_dir(&database)?;

    let store = SqliteStore::open(&database)?;
    let results = LookupEngine::new(&store).find(column, &cli.value)?;

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        OutputFormat::Text => {
            println!("{}\n", ui::query_header(column, &cli.value));
            println!("{}", ui::separator());
            println!("{}", ui::format_results(&results));
        }
    }

    store.close()?;
    Ok(())
}
