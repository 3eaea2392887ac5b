// Macaroni: rewrite operator syntax into dispatch runtime calls

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use macaroni::interpreter::{EvalError, Interpreter};
use macaroni::parser::{parse_program, printer::print_program, ParseError};
use macaroni::rewrite::{rewrite_program, ConfigError, ImportStyle, RewriteConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StyleArg {
    Eager,
    Lazy,
}

impl From<StyleArg> for ImportStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Eager => ImportStyle::Eager,
            StyleArg::Lazy => ImportStyle::Lazy,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "macaroni")]
#[command(about = "Rewrite JavaScript operators into overloadable runtime calls")]
struct Cli {
    /// JavaScript source file
    input: PathBuf,

    /// TOML file with rewrite options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Form of the inserted runtime import (overrides the config file)
    #[arg(long, value_enum)]
    import_style: Option<StyleArg>,

    /// Do not insert the runtime import
    #[arg(long)]
    skip_import: bool,

    /// Write the result here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Also evaluate the rewritten unit and print its completion value
    #[arg(long)]
    run: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{}: {source}", path.display())]
    Parse { path: PathBuf, source: ParseError },

    #[error("evaluation failed: {0}")]
    Eval(#[from] EvalError),
}

/// Log to stderr, only when `RUST_LOG` asks for it
fn init_tracing() {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(cli: &Cli) -> Result<RewriteConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => RewriteConfig::load(path)?,
        None => RewriteConfig::default(),
    };
    if let Some(style) = cli.import_style {
        config = config.with_import_style(style.into());
    }
    if cli.skip_import {
        config = config.with_skip_import(true);
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli)?;
    debug!(?config, "configuration loaded");

    let source = fs::read_to_string(&cli.input).map_err(|source| CliError::Read {
        path: cli.input.clone(),
        source,
    })?;
    let mut program = parse_program(&source).map_err(|source| CliError::Parse {
        path: cli.input.clone(),
        source,
    })?;

    let outcome = rewrite_program(&mut program, &config);
    info!(
        rewrites = outcome.rewrites,
        import_inserted = outcome.import_inserted,
        "rewrote {}",
        cli.input.display()
    );

    let output = print_program(&program);
    match &cli.output {
        Some(path) => fs::write(path, &output).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?,
        None => print!("{}", output),
    }

    if cli.run {
        let mut interpreter = Interpreter::new();
        let value = interpreter.run(&program)?;
        eprintln!("=> {:?}", value);
    }

    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
