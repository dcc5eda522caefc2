//! Operator CLI for the local radar store.
//!
//! **Usage:**
//! ```bash
//! techradar [--config <file>] [--log-dir <dir>] <COMMAND>
//! techradar seed --db radar.db --file onsRadarSkeleton.json
//! techradar apply --db radar.db --file update.json --actor review
//! techradar lookup --book addressBook.json --query "octocat, someone@ons.gov.uk"
//! techradar banner add --db radar.db --file banner.json
//! techradar banner toggle --db radar.db --index 0 --show false
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use techradar_core::db::open_db;
use techradar_core::{
    default_log_level, init_logging, load_radar_config, AddressBookService, BannerChange,
    BannerService, MapDirectory, RadarConfig, RadarDataset, RadarDocument, RadarService,
    RadarStore, ServiceError, SqliteBannerStore, SqliteRadarStore,
};

/// Tech radar maintenance tool
#[derive(Parser, Debug)]
#[clap(name = "techradar", version)]
#[clap(about = "Validate and merge tech radar updates against a local store")]
struct Args {
    /// Radar config file (JSON); defaults apply when absent
    #[clap(long, value_name = "FILE", env = "TECHRADAR_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Directory for rolling log files; logging is off when unset
    #[clap(long, value_name = "DIR", env = "TECHRADAR_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[clap(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the core library is linked
    Ping,

    /// Store the initial radar document
    Seed {
        #[clap(long, value_name = "FILE")]
        db: PathBuf,
        /// Radar document (JSON)
        #[clap(long, value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the stored radar document
    Show {
        #[clap(long, value_name = "FILE")]
        db: PathBuf,
    },

    /// Validate a submission and merge it into the stored radar
    Apply {
        #[clap(long, value_name = "FILE")]
        db: PathBuf,
        /// Submission body (JSON)
        #[clap(long, value_name = "FILE")]
        file: PathBuf,
        /// Role recorded in the logs
        #[clap(long, default_value = "admin")]
        actor: String,
    },

    /// Resolve usernames and emails against an address book file
    Lookup {
        /// Address book (JSON with emailToUsername / usernameToEmail)
        #[clap(long, value_name = "FILE")]
        book: PathBuf,
        /// Comma-separated identifiers; may be repeated
        #[clap(long, required = true)]
        query: Vec<String>,
    },

    /// Manage site banners
    Banner {
        #[clap(long, value_name = "FILE", global = true)]
        db: Option<PathBuf>,

        #[clap(subcommand)]
        command: BannerCommand,
    },
}

#[derive(Subcommand, Debug)]
enum BannerCommand {
    /// Print banners (active only unless --all)
    List {
        #[clap(long)]
        all: bool,
    },

    /// Append a banner from a `{"banner": {...}}` file
    Add {
        #[clap(long, value_name = "FILE")]
        file: PathBuf,
    },

    /// Show or hide the banner at an index
    Toggle {
        #[clap(long, allow_negative_numbers = true)]
        index: i64,
        #[clap(long, action = clap::ArgAction::Set)]
        show: bool,
    },

    /// Remove the banner at an index
    Delete {
        #[clap(long, allow_negative_numbers = true)]
        index: i64,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    if let Some(log_dir) = &args.log_dir {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        let log_dir = absolute(log_dir)?;
        init_logging(level, &log_dir.to_string_lossy()).context("failed to initialize logging")?;
    }

    let config = match &args.config {
        Some(path) => load_radar_config(path)
            .with_context(|| format!("failed to load config `{}`", path.display()))?,
        None => RadarConfig::default(),
    };

    match args.command {
        Command::Ping => {
            println!("techradar_core ping={}", techradar_core::ping());
            println!("techradar_core version={}", techradar_core::core_version());
            Ok(ExitCode::SUCCESS)
        }
        Command::Seed { db, file } => seed(&db, &file, &config),
        Command::Show { db } => show(&db, &config),
        Command::Apply { db, file, actor } => apply(&db, &file, &actor, config),
        Command::Lookup { book, query } => lookup(&book, &query),
        Command::Banner { db, command } => {
            let Some(db) = db else {
                bail!("banner commands need --db <FILE>");
            };
            banner(&db, command, &config)
        }
    }
}

fn seed(db: &Path, file: &Path, config: &RadarConfig) -> Result<ExitCode> {
    let document: RadarDocument = serde_json::from_value(read_json(file)?)
        .with_context(|| format!("`{}` is not a radar document", file.display()))?;
    let dataset = RadarDataset::from_document(document)?;

    let conn = open_db(db)?;
    let store = SqliteRadarStore::new(&conn, config.document_key.as_str());
    let revision = store.seed(&dataset)?;
    info!(
        "event=radar_seed module=cli status=ok entries={} revision={revision}",
        dataset.len()
    );
    println!(
        "seeded `{}` with {} entries (revision {revision})",
        store.doc_key(),
        dataset.len()
    );
    Ok(ExitCode::SUCCESS)
}

fn show(db: &Path, config: &RadarConfig) -> Result<ExitCode> {
    let conn = open_db(db)?;
    let stored = SqliteRadarStore::new(&conn, config.document_key.as_str()).load()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&stored.dataset.to_document())?
    );
    Ok(ExitCode::SUCCESS)
}

fn apply(db: &Path, file: &Path, actor: &str, config: RadarConfig) -> Result<ExitCode> {
    let submission = read_json(file)?;
    let conn = open_db(db)?;
    let store = SqliteRadarStore::new(&conn, config.document_key.clone());
    let service = RadarService::new(store, config);

    match service.update_radar(&submission, actor) {
        Ok(summary) => {
            let body = serde_json::json!({
                "updateId": summary.update_id,
                "mode": summary.mode.as_str(),
                "submitted": summary.submitted,
                "replaced": summary.replaced,
                "appended": summary.appended,
                "total": summary.total,
                "revision": summary.revision,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => Ok(report(&err)),
    }
}

fn lookup(book: &Path, query: &[String]) -> Result<ExitCode> {
    let directory = MapDirectory::load(book)
        .with_context(|| format!("failed to load address book `{}`", book.display()))?;
    let service = AddressBookService::new(directory);

    match service.lookup_list(query) {
        Ok(profiles) => {
            println!("{}", serde_json::to_string_pretty(&profiles)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => Ok(report(&err)),
    }
}

fn banner(db: &Path, command: BannerCommand, config: &RadarConfig) -> Result<ExitCode> {
    let conn = open_db(db)?;
    let service = BannerService::new(SqliteBannerStore::new(
        &conn,
        config.banner_document_key.as_str(),
    ));

    let change = match command {
        BannerCommand::List { all } => {
            let listed = if all {
                service.all_banners()
            } else {
                service.active_banners()
            };
            return match listed {
                Ok(banners) => {
                    let body = serde_json::json!({ "messages": banners });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => Ok(report(&err)),
            };
        }
        BannerCommand::Add { file } => service.add_banner(&read_json(&file)?),
        BannerCommand::Toggle { index, show } => {
            service.set_visibility(&serde_json::json!({ "index": index, "show": show }))
        }
        BannerCommand::Delete { index } => {
            service.delete_banner(&serde_json::json!({ "index": index }))
        }
    };

    match change {
        Ok(BannerChange {
            index,
            total,
            revision,
        }) => {
            let body = serde_json::json!({
                "index": index,
                "total": total,
                "revision": revision,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => Ok(report(&err)),
    }
}

/// Prints the public error body; 4xx and 5xx map to distinct exit codes.
fn report(err: &ServiceError) -> ExitCode {
    eprintln!("{}", err.error_body());
    if err.status_code() < 500 {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("`{}` is not valid JSON", path.display()))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        bail!("log dir must not be empty");
    }
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}
