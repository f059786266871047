/*!
CBOR Tools - A CLI for working with lean-cbor data

Inspects and composes CBOR restricted to the subset lean-cbor supports:
integers, booleans, single-precision floats, byte and text strings, and
definite-length array and map headers.

# Commands

- `inspect`: Display CBOR data as an item listing or a hex dump
- `compose`: Convert JSON to CBOR binary

# Examples

```bash
# List every item with its offset
cbor inspect data.cbor

# Inspect hex text instead of binary
echo 8301820203820405 | cbor inspect --hex-input -

# Convert JSON to CBOR
echo '{"name": "Alice", "age": 30}' | cbor compose -o data.cbor

# Round-trip test
cbor compose data.json | cbor inspect -
```
*/

use clap::{Parser, Subcommand};

mod compose;
mod inspect;
mod io;

/// A CLI tool for working with lean-cbor data
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "A CLI tool for inspecting and composing CBOR data",
    long_about = "CBOR Tools provides utilities for working with the CBOR subset supported by lean-cbor.\n\n\
                  Tags, indefinite-length items, half and double precision floats\n\
                  and simple values other than booleans are reported as unsupported."
)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_name = "LEVEL")]
    log_level: tracing_subscriber::filter::LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect and display CBOR data
    Inspect(inspect::Command),

    /// Convert JSON to CBOR binary
    Compose(compose::Command),
}

fn init_logger(log_level: tracing_subscriber::filter::LevelFilter) {
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(
            log_level > tracing_subscriber::filter::LevelFilter::from_level(tracing::Level::INFO),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    match cli.command {
        Commands::Inspect(args) => args.exec(),
        Commands::Compose(args) => args.exec(),
    }
}
