//! Command-line front end for mailrank.
//!
//! Loads a mailbox export, builds the index once, and runs a single search,
//! listing or stats command against it. Results go to stdout as text or JSON;
//! logs go to stderr.

#![forbid(unsafe_code)]

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use mailrank_core::{
    EmailDocument, GroundingContext, JsonMailbox, MailFilter, MailRetriever, RetrievalConfig,
    RetrievalError, RetrievalQuery, ScoredEmail,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "mailrank", version, about = "Ranked retrieval over an exported mailbox")]
pub struct Cli {
    /// Mailbox export: a JSON array of email objects
    #[arg(long, short = 'm', global = true, default_value = "mock_inbox.json")]
    pub mailbox: PathBuf,
    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,
    /// Log at debug level
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Free-text search with optional filters
    Search {
        query: String,
        #[arg(long, short = 'k', allow_negative_numbers = true)]
        top_k: Option<i64>,
        /// Case-insensitive substring of the sender address
        #[arg(long)]
        sender: Option<String>,
        #[arg(long)]
        starred: Option<bool>,
        /// `true` keeps unread mail, `false` keeps read mail
        #[arg(long)]
        unread: Option<bool>,
        #[arg(long)]
        important: Option<bool>,
        #[arg(long)]
        folder: Option<String>,
    },
    /// Emails from a sender
    Sender {
        sender: String,
        #[arg(long, short = 'k', allow_negative_numbers = true)]
        top_k: Option<i64>,
    },
    /// Search by a list of keywords
    Keywords {
        #[arg(required = true, num_args = 1..)]
        keywords: Vec<String>,
        #[arg(long, short = 'k', allow_negative_numbers = true)]
        top_k: Option<i64>,
    },
    /// Mailbox summary counts
    Stats,
    /// List emails carrying a flag
    Flagged {
        #[arg(value_enum)]
        flag: FlagKind,
    },
    /// Render the grounding context for a query
    Context {
        query: String,
        #[arg(long, short = 'k', allow_negative_numbers = true)]
        top_k: Option<i64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FlagKind {
    Unread,
    Starred,
    Important,
}

#[must_use]
pub fn run() -> i32 {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match execute(cli, &mut out) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Run one parsed command, writing results to `out`.
pub fn execute(cli: Cli, out: &mut impl Write) -> CliResult<()> {
    let config = RetrievalConfig::from_env();
    let retriever = MailRetriever::new(config);
    let report = retriever.reindex_from(&JsonMailbox::new(&cli.mailbox))?;
    tracing::debug!(
        mailbox = %cli.mailbox.display(),
        indexed = report.docs_indexed,
        "mailbox indexed"
    );

    match cli.command {
        Commands::Search {
            query,
            top_k,
            sender,
            starred,
            unread,
            important,
            folder,
        } => {
            let filters = MailFilter {
                sender,
                starred,
                unread,
                important,
                folder,
            };
            let query = RetrievalQuery::new(query)
                .with_top_k(resolve_top_k(top_k, &config)?)
                .with_filters(filters);
            print_hits(out, &retriever.retrieve(&query), cli.json)
        }
        Commands::Sender { sender, top_k } => {
            let hits = retriever.search_by_sender(&sender, resolve_top_k(top_k, &config)?);
            print_hits(out, &hits, cli.json)
        }
        Commands::Keywords { keywords, top_k } => {
            let hits = retriever.search_by_keywords(&keywords, resolve_top_k(top_k, &config)?);
            print_hits(out, &hits, cli.json)
        }
        Commands::Stats => {
            let stats = retriever.stats();
            if cli.json {
                serde_json::to_writer_pretty(&mut *out, &stats)?;
                writeln!(out)?;
            } else {
                write!(out, "{}", GroundingContext::new(&[]).with_stats(&stats).render())?;
            }
            Ok(())
        }
        Commands::Flagged { flag } => {
            let docs = match flag {
                FlagKind::Unread => retriever.unread_emails(),
                FlagKind::Starred => retriever.starred_emails(),
                FlagKind::Important => retriever.important_emails(),
            };
            if cli.json {
                serde_json::to_writer_pretty(&mut *out, &docs)?;
                writeln!(out)?;
                return Ok(());
            }
            if docs.is_empty() {
                writeln!(out, "No {flag:?} emails.")?;
                return Ok(());
            }
            for doc in &docs {
                write_email_line(out, doc)?;
            }
            Ok(())
        }
        Commands::Context { query, top_k } => {
            let query = RetrievalQuery::new(query).with_top_k(resolve_top_k(top_k, &config)?);
            let context = retriever.grounding_context(&query);
            if cli.json {
                serde_json::to_writer_pretty(&mut *out, &serde_json::json!({ "context": context }))?;
                writeln!(out)?;
            } else {
                write!(out, "{context}")?;
            }
            Ok(())
        }
    }
}

fn resolve_top_k(top_k: Option<i64>, config: &RetrievalConfig) -> CliResult<usize> {
    top_k.map_or(Ok(config.default_top_k), |k| {
        usize::try_from(k)
            .map_err(|_| CliError::InvalidArgument(format!("--top-k must be >= 0, got {k}")))
    })
}

fn print_hits(out: &mut impl Write, hits: &[ScoredEmail], json: bool) -> CliResult<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, hits)?;
        writeln!(out)?;
        return Ok(());
    }
    if hits.is_empty() {
        writeln!(out, "No matching emails.")?;
        return Ok(());
    }
    writeln!(out, "{:<4} {:<7} {:<14} {:<28} SUBJECT", "RANK", "SCORE", "ID", "FROM")?;
    for (rank, hit) in hits.iter().enumerate() {
        let doc = &hit.document;
        writeln!(
            out,
            "{:<4} {:<7.4} {:<14} {:<28} {}",
            rank + 1,
            hit.score,
            doc.id,
            doc.sender,
            doc.subject
        )?;
    }
    Ok(())
}

fn write_email_line(out: &mut impl Write, doc: &EmailDocument) -> CliResult<()> {
    let date = doc
        .timestamp_utc()
        .map_or_else(String::new, |ts| ts.format("%Y-%m-%d %H:%M").to_string());
    writeln!(
        out,
        "{:<14} {:<16} {:<28} {}",
        doc.id, date, doc.sender, doc.subject
    )?;
    Ok(())
}
