mod error;
mod index;
mod query;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::{Duration, UNIX_EPOCH};

use crate::index::{BatchLoader, IndexStore};

#[derive(Parser)]
#[command(name = "strix")]
#[command(about = "Trigram-indexed substring search for string collections")]
struct Cli {
    /// Path to the database file
    #[arg(long, default_value = "strix.redb")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty index (drops any previous index of the same name)
    Create {
        /// Index name
        name: String,
    },
    /// Load strings into an index, one per line
    Load {
        /// Index name
        name: String,
        /// File with one string per line
        file: PathBuf,
        /// Strings per transactional batch
        #[arg(short, long, default_value_t = BatchLoader::DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },
    /// Search an index
    Search {
        /// Index name
        name: String,
        /// Query string
        query: String,
        /// Maximum number of results
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
        /// Results to skip
        #[arg(short, long, default_value_t = 0)]
        offset: usize,
    },
    /// Show index statistics
    Stats {
        /// Index name
        name: String,
    },
    /// Run the built-in example corpus and queries
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let store = IndexStore::open(&cli.db)
        .with_context(|| format!("Failed to open database at {}", cli.db.display()))?;

    match cli.command {
        Commands::Create { name } => {
            store.create_table(&name)?;
            println!("Index '{}' created.", name);
        }
        Commands::Load {
            name,
            file,
            batch_size,
        } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let strings: Vec<&str> = content.lines().collect();
            println!("Loading {} strings into '{}'...", strings.len(), name);

            let loader = BatchLoader::with_batch_size(&store, batch_size);
            loader.load(&name, &strings)?;
        }
        Commands::Search {
            name,
            query,
            limit,
            offset,
        } => {
            let hits = store.search(&name, &query, limit, offset)?;
            if hits.is_empty() {
                println!("(no matches)");
            } else {
                for hit in hits {
                    println!("{}", hit);
                }
            }
        }
        Commands::Stats { name } => {
            let meta = store.stats(&name)?;
            println!("Index Statistics");
            println!("================");
            println!();
            println!("Index name:       {}", name);
            println!("Index version:    {}", meta.version);
            println!("Document count:   {}", meta.doc_count);
            println!("Distinct grams:   {}", meta.gram_count);
            println!("Created:          {}", format_timestamp(meta.created_at));
            println!("Updated:          {}", format_timestamp(meta.updated_at));
        }
        Commands::Demo => {
            run_demo(&store)?;
        }
    }

    Ok(())
}

/// Insert a small example corpus and print the results of a few queries.
fn run_demo(store: &IndexStore) -> Result<()> {
    const TABLE: &str = "demo_strings";

    store.create_table(TABLE)?;

    let phrases = ["racecars", "carpet", "cartoon", "scar", "racingcar", "banana"];
    let loader = BatchLoader::new(store);
    loader.load(TABLE, &phrases)?;

    for query in ["car", "a", "race", "scar"] {
        let hits = store.search(TABLE, query, 10, 0)?;
        println!("Query {:?} -> {:?}", query, hits);
    }

    Ok(())
}

/// Format unix timestamp
fn format_timestamp(ts: u64) -> String {
    let datetime = UNIX_EPOCH + Duration::from_secs(ts);
    format!("{:?}", datetime)
}
