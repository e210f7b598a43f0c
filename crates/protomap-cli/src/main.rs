//! protomap CLI - Protobuf to Java domain mapper generator
//!
//! Commands:
//! - `protomap generate` - Generate field mappings for a schema
//! - `protomap resolve` - Check whether a domain field needs accessors
//! - `protomap check` - Validate a protomap.toml config

use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod generate;
mod logging;
mod report;
mod resolve;
mod settings;

use generate::{GenerateArgs, Outcome};
use resolve::ResolveArgs;
use settings::ConfigArgs;

#[derive(Parser)]
#[command(name = "protomap")]
#[command(author, version, about = "Generator for protobuf to Java domain mappers", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate field mappings and conversion fragments
    Generate(GenerateArgs),

    /// Resolve the visibility of one domain field
    Resolve(ResolveArgs),

    /// Validate a protomap.toml config
    Check(ConfigArgs),
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config_args = match &cli.command {
        Commands::Generate(args) => &args.config,
        Commands::Resolve(args) => &args.config,
        Commands::Check(args) => args,
    };
    let config = config_args.load()?;
    logging::init(logging::effective_level(
        cli.log_level.as_deref(),
        &config.log_level,
    ));

    match cli.command {
        Commands::Generate(args) => {
            if generate::run(&args, config)? == Outcome::WithErrors {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Resolve(args) => {
            resolve::run(&args, config)?;
        }
        Commands::Check(args) => {
            settings::check(&args)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
