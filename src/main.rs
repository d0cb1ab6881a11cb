// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use gemlock::packages::parse_records;
use gemlock::{InstalledIndex, LockResolver, Lockfile, PackageIdentifier, PackageSpecification};
use std::fs;
use std::io::{self, Write};
use tracing::info;

const DEFAULT_DB_PATH: &str = "/var/lib/gemlock/gemlock.db";

#[derive(Parser)]
#[command(name = "gemlock")]
#[command(author, version, about = "Generate a lockdown list of installed gems", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the specification database
    Init {
        /// Database path
        #[arg(short, long, default_value = DEFAULT_DB_PATH)]
        db_path: String,
    },
    /// Register installed specifications from a JSON file
    Import {
        /// JSON array of {name, version, dependencies: [{name, requirement}]}
        file: String,
        /// Database path
        #[arg(short, long, default_value = DEFAULT_DB_PATH)]
        db_path: String,
    },
    /// Generate a lockdown list pinning every dependency of the given gems
    Lock {
        /// Root gems as NAME-VERSION
        #[arg(required = true, value_name = "GEM_NAME-VERSION")]
        gems: Vec<String>,
        /// Fail if unable to satisfy a dependency
        #[arg(short, long, overrides_with = "no_strict")]
        strict: bool,
        /// Record unsatisfied dependencies as comments (default)
        #[arg(long, overrides_with = "strict")]
        no_strict: bool,
        /// Write the lockfile here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
        /// Database path
        #[arg(short, long, default_value = DEFAULT_DB_PATH)]
        db_path: String,
    },
    /// List installed specifications
    Query {
        /// Name pattern (optional, shows all if omitted)
        pattern: Option<String>,
        /// Database path
        #[arg(short, long, default_value = DEFAULT_DB_PATH)]
        db_path: String,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Parse root arguments, failing on the first malformed one
fn parse_roots(gems: &[String]) -> Result<Vec<PackageIdentifier>> {
    Ok(gems
        .iter()
        .map(|gem| PackageIdentifier::parse_full_name(gem))
        .collect::<gemlock::Result<Vec<_>>>()?)
}

/// Read and validate a specification import file
fn load_specifications(path: &str) -> Result<Vec<PackageSpecification>> {
    let text = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;

    parse_records(&text).map_err(|e| anyhow::anyhow!("Failed to import {}: {}", path, e))
}

fn main() -> Result<()> {
    // Logs go to stderr so they never mix with a lockfile on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { db_path }) => {
            info!("Initializing gemlock database at: {}", db_path);
            gemlock::db::init(&db_path)?;
            println!("Database initialized successfully at: {}", db_path);
            Ok(())
        }
        Some(Commands::Import { file, db_path }) => {
            let specs = load_specifications(&file)?;
            info!("Importing {} specification(s) from {}", specs.len(), file);

            let mut conn = gemlock::db::open(&db_path)?;
            gemlock::db::transaction(&mut conn, |tx| {
                for spec in &specs {
                    gemlock::db::register(tx, spec)?;
                }
                Ok(())
            })?;

            println!("Imported {} specification(s)", specs.len());
            Ok(())
        }
        Some(Commands::Lock {
            gems,
            strict,
            no_strict: _,
            output,
            db_path,
        }) => {
            let roots = parse_roots(&gems)?;
            let conn = gemlock::db::open(&db_path)?;
            let index = InstalledIndex::new(&conn);

            // Resolve fully before writing anything, so a strict failure
            // never leaves a truncated lockfile behind
            let resolution = LockResolver::new(&index).resolve(&roots, strict)?;
            let text = Lockfile::from_resolution(&resolution).render();

            match output {
                Some(path) => {
                    fs::write(&path, &text)?;
                    info!("Wrote {} pinned gem(s) to {}", resolution.locked().len(), path);
                }
                None => io::stdout().write_all(text.as_bytes())?,
            }

            Ok(())
        }
        Some(Commands::Query { pattern, db_path }) => {
            let conn = gemlock::db::open(&db_path)?;

            let entries = match pattern {
                Some(pattern) => gemlock::db::models::SpecificationEntry::search(&conn, &pattern)?,
                None => gemlock::db::models::SpecificationEntry::list_all(&conn)?,
            };

            if entries.is_empty() {
                println!("No specifications found.");
            } else {
                println!("Installed specifications:");
                for entry in &entries {
                    println!("  {}-{}", entry.name, entry.version);
                }
                println!("\nTotal: {} specification(s)", entries.len());
            }

            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "gemlock", &mut io::stdout());
            Ok(())
        }
        None => {
            println!("gemlock v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'gemlock --help' for usage information");
            Ok(())
        }
    }
}
