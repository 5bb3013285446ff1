//! AvlStore CLI
//!
//! Command-line interface for working with a store file directly.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use avlstore::{loader, Config, Engine, Record, Result};

/// AvlStore CLI
#[derive(Parser, Debug)]
#[command(name = "avlstore")]
#[command(about = "Embedded record store backed by an on-disk AVL tree")]
#[command(version)]
struct Args {
    /// Store file
    #[arg(short, long, default_value = "./avlstore.dat")]
    file: PathBuf,

    /// Discard any existing store file and start empty
    #[arg(long)]
    truncate: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Bulk-load records from a CSV file (header: id,name,quantity,price,date)
    Load {
        /// The CSV file to load
        csv: PathBuf,
    },

    /// Insert a single record
    Insert {
        id: i32,
        name: String,
        quantity: i32,
        price: f32,
        date: String,
    },

    /// Look up a record by key
    Get {
        /// The key to look up
        id: i32,
    },

    /// Delete a record by key
    Del {
        /// The key to delete
        id: i32,
    },

    /// List records with keys in [low, high], in ascending order
    Range { low: i32, high: i32 },

    /// Dump every slot in file order (detached slots included)
    Scan,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,avlstore=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::builder()
        .file_path(&args.file)
        .truncate(args.truncate)
        .build();

    let engine = Engine::open(config)?;

    match args.command {
        Commands::Load { csv } => {
            let report = loader::load_csv(&engine, &csv)?;
            println!(
                "loaded {} records ({} duplicates rejected)",
                report.inserted, report.rejected
            );
        }
        Commands::Insert {
            id,
            name,
            quantity,
            price,
            date,
        } => {
            engine.insert(Record::new(id, name, quantity, price, date))?;
            println!("inserted {}", id);
        }
        Commands::Get { id } => {
            print_record(&engine.search(id)?);
        }
        Commands::Del { id } => {
            engine.delete(id)?;
            println!("deleted {}", id);
        }
        Commands::Range { low, high } => {
            for record in engine.range_search(low, high)? {
                print_record(&record);
            }
        }
        Commands::Scan => {
            println!("head slot: {}", engine.head_slot()?);
            for record in engine.scan_all()? {
                print_record(&record);
            }
        }
    }

    Ok(())
}

fn print_record(record: &Record) {
    println!(
        "{}\t{}\t{}\t{:.2}\t{}",
        record.id, record.name, record.quantity, record.price, record.date
    );
}
