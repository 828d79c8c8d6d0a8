//! Gradebook Shell Binary
//!
//! Interactive menu over the data file.

use std::io;

use clap::Parser;
use gradebook::config::{MalformedLines, SyncMode};
use gradebook::shell::Shell;
use gradebook::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// Gradebook interactive shell
#[derive(Parser, Debug)]
#[command(name = "gradebook-shell")]
#[command(about = "Interactive student record manager")]
#[command(version)]
struct Args {
    /// Data file
    #[arg(short, long, default_value = "etudiants.txt")]
    file: String,

    /// Name buffer size (names keep one character less)
    #[arg(long, default_value = "50")]
    max_name_len: usize,

    /// Maximum scores per student
    #[arg(long, default_value = "20")]
    max_scores: usize,

    /// Skip fsync after writes
    #[arg(long)]
    no_sync: bool,

    /// Drop undecodable lines when rewriting instead of keeping them
    #[arg(long)]
    drop_malformed: bool,
}

fn main() {
    // Logs go to stderr so they never interleave with the menu on stdout
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .data_file(&args.file)
        .max_name_len(args.max_name_len)
        .max_scores(args.max_scores)
        .sync_mode(if args.no_sync { SyncMode::Never } else { SyncMode::Always })
        .malformed_lines(if args.drop_malformed {
            MalformedLines::Drop
        } else {
            MalformedLines::Preserve
        })
        .build();

    let engine = match Engine::open(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Gradebook v{} using {}", gradebook::VERSION, args.file);

    let stdin = io::stdin();
    let mut shell = Shell::new(&engine, stdin.lock(), io::stdout());
    if let Err(e) = shell.run() {
        tracing::error!("Shell error: {}", e);
        std::process::exit(1);
    }
}
