//! Stockload CLI - import an inventory export into SQLite
//!
//! ```bash
//! stockload inventario.csv                   # into ./productos.db
//! stockload stock.xlsx --db tienda           # into ./tienda.db
//! stockload export.txt --delimiter '|' --json
//! stockload inventario.csv --aliases aliases.json -vv
//! ```

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use stockload::logs::init_logging;
use stockload::{import_file, ImportOptions};

#[derive(Parser)]
#[command(name = "stockload")]
#[command(about = "Import an inventory CSV or spreadsheet into a SQLite database", long_about = None)]
struct Cli {
    /// Input CSV or spreadsheet file
    input: PathBuf,

    /// Destination database (".db" appended when missing)
    #[arg(long, default_value = "productos.db")]
    db: PathBuf,

    /// JSON alias table replacing the built-in column spellings
    #[arg(long)]
    aliases: Option<PathBuf>,

    /// CSV delimiter (auto-detect if not specified)
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if !cli.input.exists() {
        eprintln!("❌ Error: input file not found: {}", cli.input.display());
        std::process::exit(1);
    }

    if let Err(e) = run(&cli) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = ImportOptions {
        store_path: cli.db.clone(),
        alias_path: cli.aliases.clone(),
        delimiter: cli.delimiter,
    };

    let report = import_file(&cli.input, &options)?;

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.render());
    }

    Ok(())
}
