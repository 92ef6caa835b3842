//! import_agenda - load a conference agenda spreadsheet into SQLite

use std::path::PathBuf;
use std::process::ExitCode;
use clap::Parser;
use clap::error::ErrorKind;
use agenda::config::{ensure_db_dir, load_config};
use agenda::import::Importer;
use agenda::ui::{self, Icons};
use agenda::SqliteStore;

#[derive(Parser)]
#[command(name = "import_agenda")]
#[command(version)]
#[command(about = "Import a conference agenda spreadsheet into the agenda database")]
#[command(long_about = r#"
Reads the first worksheet of an agenda spreadsheet (.xls, .xlsx, .ods) or a
.csv export. Rows after the header block are read as:

  date, start, end, type, title, location, description, speakers

"Sub-session" rows attach to the closest "Session" row above them. Speakers
are separated by ',' or ';'.

By default the existing database is removed first.

Example usage:
  import_agenda agenda.xls
  import_agenda --header-rows 14 --raw-times agenda.csv
"#)]
struct Cli {
    /// Path to the agenda spreadsheet
    #[arg(allow_hyphen_values = true)]
    path: PathBuf,

    /// Path to the database file
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rows to skip before the agenda starts
    #[arg(long)]
    header_rows: Option<usize>,

    /// Store dates and times exactly as written in the sheet
    #[arg(long)]
    raw_times: bool,

    /// Append to the existing database instead of recreating it
    #[arg(long)]
    keep_existing: bool,

    /// Print import and table statistics when done
    #[arg(long)]
    stats: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
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
            eprintln!("Usage: import_agenda <path_to_agenda.xls>");
            return ExitCode::from(1);
        }
    };

    agenda::logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::error(&format!("An error occurred: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?.unwrap_or_default();
    let database = config.database_path(cli.database.as_deref());
    let options = config.import_options(cli.header_rows, cli.raw_times);

    if !cli.keep_existing && database.exists() {
        std::fs::remove_file(&database)?;
        println!("{} Removed existing database: {}", Icons::DEL, database.display());
    }
    ensure_db_dir(&database)?;

    let store = SqliteStore::open(&database)?;
    tracing::info!("Importing {} into {:?}", cli.path.display(), database);

    let progress = ui::ImportProgress::new();
    let outcome = Importer::new(&store, options)
        .import_file_with(&cli.path, |done, total, row| progress.row_done(done, total, &row.title));
    progress.finish();

    let report = match outcome {
        Ok(report) => report,
        Err(e) if e.is_source_error() => {
            // The store stays created and empty
            ui::failure(&format!("Error: {}", e));
            store.close()?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    ui::success("Agenda import completed successfully.");

    if cli.stats {
        print!("{}", report);
        println!("{} {}", Icons::STATS, ui::dim(&database.display().to_string()));
        println!("{}", ui::stats_table(&store.stats()?));
    }

    store.close()?;
    Ok(())
}
