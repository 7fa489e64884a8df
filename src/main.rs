// src/main.rs

//! BookTracker command line.
//!
//! Every subcommand goes through the application command layer; `--json`
//! prints the same DTOs the commands return.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use booktracker::application::commands::{self, CommandResult};
use booktracker::application::dto::{
    BookDto, ReadingStatisticsDto, SearchHitDto, SuccessResponse, UserStatsDto,
};
use booktracker::application::{AppState, ErrorResponse, ErrorType};
use booktracker::config::AppConfig;
use booktracker::db::{
    create_connection_pool, get_connection, get_database_path, get_database_stats,
    initialize_database, verify_database_integrity,
};
use booktracker::domain::Language;
use booktracker::error::AppError;
use booktracker::integrations::{build_catalogs, create_http_client};

#[derive(Parser, Debug)]
#[command(
    name = "booktracker",
    version,
    about = "Track the books you want to read, are reading and have finished"
)]
/// CLI Arguments
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// CLI Commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Search every enabled catalog
    Search {
        query: String,
        /// Preferred language code (es, en)
        #[arg(long)]
        lang: Option<String>,
    },
    /// Search and add one of the results to the library
    Add {
        query: String,
        /// Which result to add (1-based)
        #[arg(long, default_value_t = 1)]
        pick: usize,
        /// Initial status (to-read, reading, finished)
        #[arg(long)]
        status: Option<String>,
    },
    /// List the library
    List {
        #[arg(long)]
        status: Option<String>,
    },
    /// Show one book
    Show { id: String },
    /// Move a book to another status
    Status { id: String, status: String },
    /// Rate a finished book from 1 to 5
    Rate {
        id: String,
        #[arg(required_unless_present = "clear")]
        rating: Option<u8>,
        #[arg(long, conflicts_with = "rating")]
        clear: bool,
    },
    /// Write a review for a finished book
    Review {
        id: String,
        #[arg(required_unless_present = "clear")]
        text: Option<String>,
        #[arg(long, conflicts_with = "text")]
        clear: bool,
    },
    /// Mark or unmark a favorite; toggles without a flag
    Favorite {
        id: String,
        #[arg(long, conflicts_with = "off")]
        on: bool,
        #[arg(long)]
        off: bool,
    },
    /// Set reading dates (YYYY-MM-DD, or "none" to clear)
    Dates {
        id: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        finish: Option<String>,
    },
    /// Remove a book from the library
    Remove { id: String },
    /// Library statistics
    Stats {
        /// Reading statistics for finished books
        #[arg(long)]
        reading: bool,
    },
    /// Write a JSON backup of the library
    Export {
        /// Target directory (defaults to the configured export directory)
        #[arg(long, conflicts_with = "stdout")]
        dir: Option<PathBuf>,
        /// Print the backup instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// Restore a JSON backup
    Import {
        path: PathBuf,
        /// Keep existing books instead of replacing the library
        #[arg(long)]
        merge: bool,
    },
    /// Remove every book
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Inspect or change the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Persist the preferred search language
    SetLanguage { code: String },
}

#[derive(Subcommand, Debug)]
enum DbAction {
    /// Database file size and row counts
    Info,
    /// Run SQLite's integrity check
    Check,
}

/// A command rejected by the application layer
#[derive(Debug, thiserror::Error)]
#[error("{}", .0.message)]
struct CommandFailed(ErrorResponse);

trait OrFail<T> {
    fn or_fail(self) -> Result<T>;
}

impl<T> OrFail<T> for CommandResult<T> {
    fn or_fail(self) -> Result<T> {
        self.map_err(|e| CommandFailed(e).into())
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json = cli.json;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report(&error, json);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => AppConfig::default_path()?,
    };
    let config = AppConfig::load_if_exists(&config_path)?;
    config.validate()?;

    if let Command::Config { action } = cli.command {
        return run_config(action, config, &config_path, cli.json);
    }

    let db_path = match &config.database_path {
        Some(path) => path.clone(),
        None => get_database_path()?,
    };
    let pool = Arc::new(create_connection_pool(&db_path)?);
    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn)?;
    }

    if let Command::Db { action } = cli.command {
        let conn = get_connection(&pool)?;
        return match action {
            DbAction::Info => {
                let stats = get_database_stats(&conn)?;
                render(cli.json, &stats, |s| {
                    println!("Database:  {}", db_path.display());
                    println!("Size:      {} bytes", s.size_bytes);
                    println!("Books:     {}", s.book_count);
                    println!("Snapshots: {}", s.snapshot_count);
                })
            }
            DbAction::Check => {
                verify_database_integrity(&conn)?;
                render(cli.json, &"ok", |_| println!("Database integrity check passed"))
            }
        };
    }

    let http = create_http_client(&config.http)?;
    let sources = build_catalogs(&config.catalogs, &http);
    log::debug!("Searching {} catalog(s)", sources.len());

    let state = AppState::new(pool, sources, config);
    dispatch(&state, cli.command, cli.json).await
}

fn run_config(
    action: ConfigAction,
    config: AppConfig,
    path: &std::path::Path,
    json: bool,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            if json {
                render(true, &config, |_| {})
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
                Ok(())
            }
        }
        ConfigAction::Path => {
            let shown = path.display().to_string();
            render(json, &shown, |p| println!("{}", p))
        }
        ConfigAction::SetLanguage { code } => {
            let config = AppConfig::set_language(path, Language::from_code(&code))
                .with_context(|| format!("Failed to update {}", path.display()))?;
            let language = config.language.code();
            render(json, &language, |l| println!("Search language set to {}", l))
        }
    }
}

async fn dispatch(state: &AppState, command: Command, json: bool) -> Result<()> {
    match command {
        Command::Search { query, lang } => {
            let hits = commands::search_books(state, &query, lang.as_deref())
                .await
                .or_fail()?;
            render(json, &hits, |hits| print_hits(hits))
        }
        Command::Add {
            query,
            pick,
            status,
        } => {
            let book = commands::add_from_search(state, &query, pick, status.as_deref())
                .await
                .or_fail()?;
            render(json, &book, |b| println!("Added {}", book_line(b)))
        }
        Command::List { status } => {
            let books = commands::list_books(state, status.as_deref()).or_fail()?;
            render(json, &books, |books| {
                if books.is_empty() {
                    println!("No books yet");
                }
                for book in books {
                    println!("{}", book_line(book));
                }
            })
        }
        Command::Show { id } => {
            let book = commands::get_book(state, &id)
                .or_fail()?
                .ok_or_else(|| CommandFailed(ErrorResponse::from(AppError::NotFound)))?;
            render(json, &book, print_book_details)
        }
        Command::Status { id, status } => {
            let book = commands::update_status(state, &id, &status).or_fail()?;
            render(json, &book, |b| println!("{}", book_line(b)))
        }
        Command::Rate { id, rating, clear } => {
            let rating = if clear { None } else { rating };
            let book = commands::rate_book(state, &id, rating).or_fail()?;
            render(json, &book, |b| println!("{}", book_line(b)))
        }
        Command::Review { id, text, clear } => {
            let text = if clear { None } else { text };
            let book = commands::review_book(state, &id, text).or_fail()?;
            render(json, &book, |b| match &b.review {
                Some(_) => println!("Review saved for '{}'", b.title),
                None => println!("Review cleared for '{}'", b.title),
            })
        }
        Command::Favorite { id, on, off } => {
            let value = match (on, off) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let is_favorite = commands::set_favorite(state, &id, value).or_fail()?;
            render(json, &is_favorite, |f| {
                println!("{}", if *f { "Marked as favorite" } else { "Not a favorite" })
            })
        }
        Command::Dates { id, start, finish } => {
            let book =
                commands::set_reading_dates(state, &id, start.as_deref(), finish.as_deref())
                    .or_fail()?;
            render(json, &book, print_book_details)
        }
        Command::Remove { id } => {
            commands::remove_book(state, &id).or_fail()?;
            render(json, &id, |id| println!("Removed {}", id))
        }
        Command::Stats { reading } => {
            if reading {
                let stats = commands::get_reading_statistics(state).or_fail()?;
                render(json, &stats, print_reading_statistics)
            } else {
                let stats = commands::get_user_stats(state).or_fail()?;
                render(json, &stats, print_user_stats)
            }
        }
        Command::Export { dir, stdout } => {
            if stdout {
                let backup = commands::export_library_json(state).or_fail()?;
                println!("{}", backup);
                Ok(())
            } else {
                let export = commands::export_library(state, dir.as_deref()).or_fail()?;
                render(json, &export, |e| {
                    println!("Exported {} books to {}", e.book_count, e.path)
                })
            }
        }
        Command::Import { path, merge } => {
            let summary = commands::import_library(state, &path, merge).or_fail()?;
            render(json, &summary, |s| {
                println!("Imported {} books ({} skipped)", s.imported, s.skipped)
            })
        }
        Command::Clear { yes } => {
            if !yes {
                return Err(CommandFailed(ErrorResponse::validation(
                    "This removes every book. Run again with --yes to confirm".to_string(),
                ))
                .into());
            }
            let removed = commands::clear_library(state).or_fail()?;
            render(json, &removed, |n| println!("Removed {} books", n))
        }
        Command::Config { .. } | Command::Db { .. } => Ok(()),
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn render<T: Serialize>(json: bool, value: &T, human: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&SuccessResponse::new(value))?);
    } else {
        human(value);
    }
    Ok(())
}

fn report(error: &anyhow::Error, json: bool) {
    // Startup failures (config, database, HTTP client) never reach the command layer
    let response = match error.downcast_ref::<CommandFailed>() {
        Some(CommandFailed(response)) => response.clone(),
        None => ErrorResponse {
            success: false,
            error_type: ErrorType::Unknown,
            message: format!("{:#}", error),
            details: None,
        },
    };

    if json {
        match serde_json::to_string_pretty(&response) {
            Ok(body) => println!("{}", body),
            Err(_) => eprintln!("Error: {}", response.message),
        }
        return;
    }

    eprintln!("Error: {}", response.message);
    if let Some(details) = &response.details {
        eprintln!("  {}", details);
    }
}

fn book_line(book: &BookDto) -> String {
    let mut line = format!("[{}] {}", book.id, book.title);
    if !book.authors.is_empty() {
        let _ = write!(line, " by {}", book.authors.join(", "));
    }
    let _ = write!(line, " ({})", book.reading_status);
    if let Some(rating) = book.rating {
        let _ = write!(line, " {}/5", rating);
    }
    if book.is_favorite {
        line.push_str(" *");
    }
    line
}

fn print_hits(hits: &[SearchHitDto]) {
    for (index, hit) in hits.iter().enumerate() {
        let mut line = format!("{:>2}. {}", index + 1, hit.book.title);
        if !hit.book.authors.is_empty() {
            let _ = write!(line, " - {}", hit.book.authors.join(", "));
        }
        if !hit.book.languages.is_empty() {
            let _ = write!(line, " [{}]", hit.book.languages.join(","));
        }
        if let Some(status) = &hit.local_status {
            let _ = write!(line, " (in library: {})", status);
        }
        println!("{}", line);
    }
}

fn print_book_details(book: &BookDto) {
    let or_dash = |value: Option<&str>| value.unwrap_or("-").to_string();

    println!("Id:        {}", book.id);
    println!("Title:     {}", book.title);
    println!("Authors:   {}", book.authors.join(", "));
    if !book.subjects.is_empty() {
        println!("Subjects:  {}", book.subjects.join("; "));
    }
    if !book.languages.is_empty() {
        println!("Languages: {}", book.languages.join(", "));
    }
    println!("Status:    {}", book.reading_status);
    println!(
        "Rating:    {}",
        book.rating.map(|r| format!("{}/5", r)).unwrap_or_else(|| "-".into())
    );
    println!("Started:   {}", or_dash(book.start_date.as_deref()));
    println!("Finished:  {}", or_dash(book.finish_date.as_deref()));
    if let Some(days) = book.reading_days {
        println!("Days:      {}", days);
    }
    println!("Favorite:  {}", if book.is_favorite { "yes" } else { "no" });
    println!("Added:     {}", book.date_added);
    if let Some(cover) = &book.cover_url {
        println!("Cover:     {}", cover);
    }
    if let Some(review) = &book.review {
        println!();
        println!("{}", review);
    }
}

fn print_user_stats(stats: &UserStatsDto) {
    println!(
        "Read: {}  Reading: {}  To read: {}",
        stats.total_books_read, stats.total_books_reading, stats.total_books_to_read
    );
    println!("Average rating: {:.1}", stats.average_rating);

    if !stats.currently_reading.is_empty() {
        println!("\nCurrently reading:");
        for book in &stats.currently_reading {
            println!("  {}", book_line(book));
        }
    }
    if !stats.favorite_books.is_empty() {
        println!("\nFavorites:");
        for book in &stats.favorite_books {
            println!("  {}", book_line(book));
        }
    }
}

fn print_reading_statistics(stats: &ReadingStatisticsDto) {
    println!("{} ({} books finished)", stats.reader_title, stats.total_finished);
    println!("Average rating: {:.1}", stats.average_rating);
    if let Some(days) = stats.average_reading_days {
        println!("Average days per book: {:.1}", days);
    }
    if let Some(fastest) = &stats.fastest {
        println!("Fastest: {} ({} days)", fastest.title, fastest.days);
    }
    if let Some(slowest) = &stats.slowest {
        println!("Slowest: {} ({} days)", slowest.title, slowest.days);
    }
    println!(
        "This year: {}  This month: {}",
        stats.books_this_year, stats.books_this_month
    );

    let months = MONTHS
        .iter()
        .zip(&stats.monthly_counts)
        .map(|(month, count)| format!("{} {}", month, count))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", months);
}
