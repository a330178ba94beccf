//! TransitDB CLI
//!
//! Command-line interface over the command layer: one subcommand per
//! operation. Record entry for the insert commands is read from
//! standard input, one comma-separated record per line.

use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use transitdb::commands::{self, JoinResult, Selection};
use transitdb::entity::Entity;
use transitdb::error::{Result, TransitError};
use transitdb::text;
use transitdb::{Config, Line, Vehicle};

/// TransitDB CLI
#[derive(Parser, Debug)]
#[command(name = "transitdb")]
#[command(about = "Single-file relational storage engine for transit data")]
#[command(version)]
struct Args {
    /// Data directory for default store and index paths
    #[arg(short, long, default_value = "./transitdb_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EntityKind {
    Line,
    Vehicle,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import a delimited text file into a fresh record store
    CreateTable {
        entity: EntityKind,

        /// Import file (label line, then one record per line)
        source: PathBuf,

        /// Destination store file (defaults under the data directory)
        destination: Option<PathBuf>,
    },

    /// Print every live record of a store
    SelectAll {
        entity: EntityKind,
        store: Option<PathBuf>,
    },

    /// Print live records whose field equals a value
    SelectWhere {
        entity: EntityKind,
        field: String,
        value: String,
        store: Option<PathBuf>,
    },

    /// Append records read from standard input
    Insert {
        entity: EntityKind,

        /// Number of records to read
        count: usize,

        store: Option<PathBuf>,
    },

    /// Build the ordered index over a line store
    CreateIndex {
        store: Option<PathBuf>,
        index: Option<PathBuf>,
    },

    /// Look one line up by code through the index
    SelectWithIndex {
        key: i32,
        store: Option<PathBuf>,
        index: Option<PathBuf>,
    },

    /// Append line records from standard input, keeping the index current
    InsertWithIndex {
        /// Number of records to read
        count: usize,

        store: Option<PathBuf>,
        index: Option<PathBuf>,
    },

    /// Rewrite a store deleted-tuple-free and ordered by key
    Sort {
        entity: EntityKind,
        source: Option<PathBuf>,
        destination: Option<PathBuf>,
    },

    /// Merge-join sorted vehicle and line stores on the line code
    Join {
        vehicles: Option<PathBuf>,
        lines: Option<PathBuf>,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,transitdb=info"));

    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::builder().data_dir(&args.data_dir).build();
    fs::create_dir_all(&config.data_dir)?;

    match args.command {
        Commands::CreateTable {
            entity,
            source,
            destination,
        } => match entity {
            EntityKind::Line => {
                create_table::<Line>(&source, destination.unwrap_or_else(|| config.line_store()))
            }
            EntityKind::Vehicle => create_table::<Vehicle>(
                &source,
                destination.unwrap_or_else(|| config.vehicle_store()),
            ),
        },

        Commands::SelectAll { entity, store } => match entity {
            EntityKind::Line => {
                print_selection(commands::select_all::<Line>(
                    &store.unwrap_or_else(|| config.line_store()),
                )?)
            }
            EntityKind::Vehicle => {
                print_selection(commands::select_all::<Vehicle>(
                    &store.unwrap_or_else(|| config.vehicle_store()),
                )?)
            }
        },

        Commands::SelectWhere {
            entity,
            field,
            value,
            store,
        } => match entity {
            EntityKind::Line => print_selection(commands::select_where::<Line>(
                &store.unwrap_or_else(|| config.line_store()),
                &field,
                &value,
            )?),
            EntityKind::Vehicle => print_selection(commands::select_where::<Vehicle>(
                &store.unwrap_or_else(|| config.vehicle_store()),
                &field,
                &value,
            )?),
        },

        Commands::Insert {
            entity,
            count,
            store,
        } => match entity {
            EntityKind::Line => {
                let records = read_stdin_records::<Line>(count)?;
                commands::insert(&store.unwrap_or_else(|| config.line_store()), &records)?;
                println!("{} record(s) inserted", records.len());
                Ok(())
            }
            EntityKind::Vehicle => {
                let records = read_stdin_records::<Vehicle>(count)?;
                commands::insert(&store.unwrap_or_else(|| config.vehicle_store()), &records)?;
                println!("{} record(s) inserted", records.len());
                Ok(())
            }
        },

        Commands::CreateIndex { store, index } => {
            let keys = commands::create_index::<Line>(
                &store.unwrap_or_else(|| config.line_store()),
                &index.unwrap_or_else(|| config.line_index()),
            )?;
            println!("{} key(s) indexed", keys);
            Ok(())
        }

        Commands::SelectWithIndex { key, store, index } => print_selection(
            commands::select_with_index::<Line>(
                &store.unwrap_or_else(|| config.line_store()),
                &index.unwrap_or_else(|| config.line_index()),
                key,
            )?,
        ),

        Commands::InsertWithIndex {
            count,
            store,
            index,
        } => {
            let records = read_stdin_records::<Line>(count)?;
            commands::insert_with_index(
                &store.unwrap_or_else(|| config.line_store()),
                &index.unwrap_or_else(|| config.line_index()),
                &records,
            )?;
            println!("{} record(s) inserted", records.len());
            Ok(())
        }

        Commands::Sort {
            entity,
            source,
            destination,
        } => match entity {
            EntityKind::Line => sort::<Line>(
                source.unwrap_or_else(|| config.line_store()),
                destination.unwrap_or_else(|| config.sorted_line_store()),
            ),
            EntityKind::Vehicle => sort::<Vehicle>(
                source.unwrap_or_else(|| config.vehicle_store()),
                destination.unwrap_or_else(|| config.sorted_vehicle_store()),
            ),
        },

        Commands::Join { vehicles, lines } => {
            let result = commands::join(
                &vehicles.unwrap_or_else(|| config.sorted_vehicle_store()),
                &lines.unwrap_or_else(|| config.sorted_line_store()),
            )?;
            print_join(result);
            Ok(())
        }
    }
}

// =============================================================================
// Command helpers
// =============================================================================

fn create_table<E: Entity>(source: &PathBuf, destination: PathBuf) -> Result<()> {
    let stats = commands::create_table::<E>(source, &destination)?;
    println!(
        "{} live and {} removed record(s) imported into {}",
        stats.live,
        stats.removed,
        destination.display()
    );
    Ok(())
}

fn sort<E: Entity>(source: PathBuf, destination: PathBuf) -> Result<()> {
    let stats = commands::sort::<E>(&source, &destination)?;
    println!(
        "{} record(s) kept, {} dropped, written to {}",
        stats.kept,
        stats.dropped,
        destination.display()
    );
    Ok(())
}

fn print_selection<E: Entity>(selection: Selection<E>) -> Result<()> {
    if selection.records.is_empty() {
        println!("No matching records.");
        return Ok(());
    }

    for record in &selection.records {
        print!("{}", record.render(&selection.labels));
        println!();
    }
    Ok(())
}

fn print_join(result: JoinResult) {
    if result.pairs.is_empty() {
        println!("No matching records.");
        return;
    }

    for (vehicle, line) in &result.pairs {
        print!("{}", vehicle.render(&result.vehicle_labels));
        print!("{}", line.render(&result.line_labels));
        println!();
    }
}

/// Read `count` records from standard input, one delimited line each.
fn read_stdin_records<E: Entity>(count: usize) -> Result<Vec<E>> {
    let stdin = io::stdin();
    let mut records = Vec::with_capacity(count);

    for line in stdin.lock().lines().take(count) {
        let row = text::decode_record(&line?);
        records.push(E::from_fields(row.live, &row.fields)?);
    }

    if records.len() < count {
        return Err(TransitError::Parse(format!(
            "expected {} record(s) on standard input, got {}",
            count,
            records.len()
        )));
    }

    Ok(records)
}
