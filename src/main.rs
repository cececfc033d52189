use clap::{Parser, Subcommand};
use esfluent::cli::{self, CliError, TranslateOptions};
use std::fs;
use std::io::{self, Read};

#[derive(Parser)]
#[command(name = "esfluent")]
#[command(about = "esfluent - Translate Elasticsearch query JSON into fluent query-builder code")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a query document and print the generated code
    Translate {
        /// Query JSON (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Write the generated code to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Validate that a query document translates cleanly
    Check {
        /// Query JSON (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Translate { input, output } => run_translate(input, output),
        Commands::Check { input } => run_check(input),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_input(input: Option<String>) -> Result<Option<String>, CliError> {
    match input {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn run_translate(input: Option<String>, output: Option<String>) -> Result<(), CliError> {
    let options = TranslateOptions {
        input: read_input(input)?,
    };

    let code = cli::execute_translate(&options)?;
    match output {
        Some(path) => fs::write(path, code).map_err(CliError::Io)?,
        None => println!("{}", code),
    }
    Ok(())
}

fn run_check(input: Option<String>) -> Result<(), CliError> {
    let options = TranslateOptions {
        input: read_input(input)?,
    };

    cli::execute_translate(&options)?;
    println!("Query is valid");
    Ok(())
}
