//! Gradebook CLI
//!
//! One-shot commands against the data file.

use clap::{Parser, Subcommand};
use gradebook::command::{Command, Outcome};
use gradebook::config::{MalformedLines, SyncMode};
use gradebook::{Config, Engine, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Gradebook CLI
#[derive(Parser, Debug)]
#[command(name = "gradebook-cli")]
#[command(about = "CLI for the Gradebook student record file")]
#[command(version)]
struct Args {
    /// Data file
    #[arg(short, long, default_value = "etudiants.txt", global = true)]
    file: String,

    /// Name buffer size (names keep one character less)
    #[arg(long, default_value = "50", global = true)]
    max_name_len: usize,

    /// Maximum scores per student
    #[arg(long, default_value = "20", global = true)]
    max_scores: usize,

    /// Skip fsync after writes
    #[arg(long, global = true)]
    no_sync: bool,

    /// Drop undecodable lines when rewriting instead of keeping them
    #[arg(long, global = true)]
    drop_malformed: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Append a student
    Create {
        /// Student ID (not checked for uniqueness)
        id: i64,

        /// Name (whitespace becomes '_')
        name: String,

        /// Initial scores
        #[arg(allow_negative_numbers = true)]
        scores: Vec<f64>,
    },

    /// Show the first student with an ID
    Get {
        /// The ID to look up
        id: i64,
    },

    /// Rename a student and/or add scores
    Update {
        /// The ID to update
        id: i64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// Score to append (repeatable)
        #[arg(long = "add-score", allow_negative_numbers = true)]
        add_scores: Vec<f64>,
    },

    /// Delete every student with an ID
    Delete {
        /// The ID to delete
        id: i64,
    },

    /// Show all students in file order
    List,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
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

    match run(config, args.command) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Execute one subcommand; `Ok(false)` means the ID was not found
fn run(config: Config, command: Commands) -> Result<bool> {
    let engine = Engine::open(config)?;

    match command {
        Commands::Create { id, name, scores } => {
            let mut student = engine.new_student(id, &name);
            for score in scores {
                student.add_score(score);
            }
            engine.execute(Command::Create(student))?;
            tracing::info!(id, "Student created");
            Ok(true)
        }
        Commands::Get { id } => match engine.execute(Command::Read { id })? {
            Outcome::Found(student) => {
                println!("{}", student);
                Ok(true)
            }
            _ => not_found(id),
        },
        Commands::Update {
            id,
            name,
            add_scores,
        } => {
            let mut student = match engine.execute(Command::Read { id })? {
                Outcome::Found(student) => student,
                _ => return not_found(id),
            };
            for score in add_scores {
                student.add_score(score);
            }
            if let Some(name) = name {
                student.rename(&name);
            }
            match engine.execute(Command::Update(student))? {
                Outcome::Updated => {
                    tracing::info!(id, "Student updated");
                    Ok(true)
                }
                _ => not_found(id),
            }
        }
        Commands::Delete { id } => match engine.execute(Command::Delete { id })? {
            Outcome::Deleted => {
                tracing::info!(id, "Student deleted");
                Ok(true)
            }
            _ => not_found(id),
        },
        Commands::List => {
            if let Outcome::Listed(students) = engine.execute(Command::List)? {
                for student in students {
                    println!("{}", student);
                }
            }
            Ok(true)
        }
    }
}

fn not_found(id: i64) -> Result<bool> {
    tracing::warn!(id, "Student not found");
    Ok(false)
}
