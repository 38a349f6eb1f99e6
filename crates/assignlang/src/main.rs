use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, trace};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use assignlang::{dump_tree, parse, tokenize};

fn main() -> anyhow::Result<()> {
    initialize_logging()?;

    let cli = Assignlang::parse();
    let output = run(cli.subcmd)?;
    print!("{output}");

    Ok(())
}

fn run(subcmd: AssignlangSubcommand) -> anyhow::Result<String> {
    match subcmd {
        AssignlangSubcommand::Tokens(opts) => {
            let source = read_source(&opts.source)?;
            let tokens = tokenize(&source)?;
            debug!(count = tokens.len(), "Tokenized source file");
            Ok(serde_json::to_string_pretty(&tokens)? + "\n")
        }
        AssignlangSubcommand::Parse(opts) => {
            let source = read_source(&opts.source)?;
            let tokens = tokenize(&source)?;
            trace!(count = tokens.len(), "Tokenized source file");
            let ast = parse(tokens)?;
            debug!(statements = ast.len(), "Parsed source file");
            match opts.format {
                OutputFormat::Tree => Ok(dump_tree(&ast)),
                OutputFormat::Json => Ok(serde_json::to_string_pretty(&ast)? + "\n"),
            }
        }
    }
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    trace!(source_len = source.len(), "Read input file");
    Ok(source)
}

fn initialize_logging() -> anyhow::Result<()> {
    let env_filter = env::var("RUST_LOG").unwrap_or_default();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::from_str(&env_filter)?),
        )
        .init();
    Ok(())
}

#[derive(clap::Parser)]
#[clap(about = "Tokenize and parse assignment-language source files.")]
struct Assignlang {
    #[clap(subcommand)]
    subcmd: AssignlangSubcommand,
}

#[derive(clap::Subcommand)]
enum AssignlangSubcommand {
    /// Print the token list as JSON
    Tokens(TokensOpts),
    /// Print the syntax tree
    Parse(ParseOpts),
}

#[derive(clap::Parser)]
struct TokensOpts {
    source: PathBuf,
}

#[derive(clap::Parser)]
struct ParseOpts {
    source: PathBuf,

    /// Output format for the syntax tree
    #[clap(short, long, value_enum, default_value = "tree")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum OutputFormat {
    Tree,
    Json,
}
