//! vtl - evaluate VTL expressions and programs from the command line

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, ValueEnum};
use std::io::Read;
use std::path::PathBuf;
use vibevtl::{Bindings, CompilerOptions, JoinKeyPolicy, Session, StatementResult, Value};

/// Evaluate VTL expressions against JSON bindings
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Expression or program to evaluate (read from stdin when omitted)
    expression: Option<String>,

    /// Read the program from a file
    #[arg(short, long, conflicts_with = "expression")]
    file: Option<PathBuf>,

    /// JSON file with variable bindings
    #[arg(short, long)]
    bindings: Option<PathBuf>,

    /// Row key construction for dataset joins
    #[arg(long, value_enum, default_value_t = JoinKeys::Typed)]
    join_keys: JoinKeys,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum JoinKeys {
    /// Key rows on the tuple of identifier values
    Typed,
    /// Key rows on the concatenated identifier strings
    Concatenated,
}

impl From<JoinKeys> for JoinKeyPolicy {
    fn from(keys: JoinKeys) -> Self {
        match keys {
            JoinKeys::Typed => JoinKeyPolicy::Typed,
            JoinKeys::Concatenated => JoinKeyPolicy::Concatenated,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let source = read_source(&args)?;

    let bindings = match &args.bindings {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read bindings file {}", path.display()))?;
            Bindings::from_json(&json)
                .with_context(|| format!("Failed to load bindings from {}", path.display()))?
        }
        None => Bindings::new(),
    };
    log::debug!("Loaded {} binding(s)", bindings.len());

    let options = CompilerOptions {
        join_key_policy: args.join_keys.into(),
    };
    let session = Session::with_options(options).with_bindings(bindings);
    let results = session.execute(&source).context("Evaluation failed")?;

    match args.format {
        OutputFormat::Text => {
            for result in &results {
                print_result(result);
            }
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&results).context("Failed to serialize results")?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn read_source(args: &Args) -> Result<String> {
    if let Some(expression) = &args.expression {
        return Ok(expression.clone());
    }
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read program file {}", path.display()));
    }

    let mut source = String::new();
    std::io::stdin()
        .read_to_string(&mut source)
        .context("Failed to read program from stdin")?;
    Ok(source)
}

fn print_result(result: &StatementResult) {
    match result {
        StatementResult::Assigned { name, value } => match value {
            Value::Dataset(dataset) => println!("{} :=\n{}", name, dataset),
            other => println!("{} := {}", name, other),
        },
        StatementResult::Evaluated { value } => println!("{}", value),
    }
}
