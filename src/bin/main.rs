//! mptsql CLI - Compile graph queries to SQL over predicate tables
//!
//! Usage:
//!   mptsql compile <query.toml> --config <mptsql.toml> [--dialect <dialect>] [--output sql|json]
//!   mptsql parse <file.nt>
//!
//! Examples:
//!   mptsql compile demos/friends.toml --config demos/mptsql.toml
//!   mptsql compile demos/friends.toml --dialect oracle -v
//!   mptsql parse demos/people.nt

use clap::{Parser, Subcommand, ValueEnum};
use mptsql::compile::compile_query;
use mptsql::config::Settings;
use mptsql::query::document::QueryDocument;
use mptsql::rdf::ntriples;
use mptsql::sql::Dialect;
use sqlparser::dialect::GenericDialect;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

#[derive(Parser)]
#[command(name = "mptsql")]
#[command(about = "mptsql - Compile RDF graph queries to SQL over predicate tables")]
#[command(version)]
struct Cli {
    /// Log planner decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a query document to SQL
    Compile {
        /// Path to the query document (.toml or .json)
        file: PathBuf,

        /// Path to the predicate mapping (defaults to $MPTSQL_CONFIG or ./mptsql.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// SQL dialect to generate (overrides the config file)
        #[arg(short, long)]
        dialect: Option<Dialect>,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        output: OutputFormat,

        /// Check that the generated SQL parses
        #[arg(long)]
        check: bool,
    },

    /// Parse an N-Triples file and print each triple in canonical form
    Parse {
        /// Path to the .nt file
        file: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Output SQL only
    Sql,
    /// Output SQL, targets and dialect as JSON
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    match cli.command {
        Commands::Compile {
            file,
            config,
            dialect,
            output,
            check,
        } => cmd_compile(file, config, dialect, output, check),
        Commands::Parse { file } => cmd_parse(file),
    }
}

fn cmd_compile(
    file: PathBuf,
    config: Option<PathBuf>,
    dialect: Option<Dialect>,
    output: OutputFormat,
    check: bool,
) -> ExitCode {
    let settings = match config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let dialect = match dialect {
        Some(d) => d,
        None => match settings.dialect() {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };
    let tables = match settings.table_manager() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let document = match QueryDocument::from_file(&file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading query '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let query = match document.to_query() {
        Ok(q) => q,
        Err(e) => {
            eprintln!("Invalid query '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let compiled = match compile_query(
        &tables,
        query,
        document.targets.as_slice(),
        document.ordering(),
        dialect,
    ) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if check {
        for sql in &compiled.sql {
            if let Err(e) = sqlparser::parser::Parser::parse_sql(&GenericDialect {}, sql) {
                eprintln!("Generated SQL does not parse: {}\n{}", e, sql);
                return ExitCode::FAILURE;
            }
        }
    }

    match output {
        OutputFormat::Sql => {
            for sql in &compiled.sql {
                println!("{}", sql);
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&compiled) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize output: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}

fn cmd_parse(file: PathBuf) -> ExitCode {
    let source = match fs::read_to_string(&file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let mut failed = false;
    for (number, line) in source.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match ntriples::parse_triple(trimmed) {
            Ok(triple) => println!("{}", triple),
            Err(e) => {
                eprintln!("{}:{}: {}", file.display(), number + 1, e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
