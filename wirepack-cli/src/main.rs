mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "wirepack")]
#[command(about = "Wirepack - Typed binary value packer", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a JSON array of typed fields into a binary file
    Pack {
        /// Input JSON file (array of {"type": ..., "value": ...})
        #[arg(short, long)]
        input: String,

        /// Output file for packed bytes
        #[arg(short, long)]
        output: String,

        /// Initial buffer capacity (0 = default)
        #[arg(long, default_value = "0")]
        capacity: usize,
    },

    /// Unpack a binary file into JSON fields
    Unpack {
        /// Input file to unpack ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Comma-separated field kinds, e.g. int32,string,int8
        #[arg(short, long)]
        layout: String,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Hex-dump a binary file, optionally annotated with a layout
    Inspect {
        /// Input file to inspect ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Comma-separated field kinds to annotate
        #[arg(short, long)]
        layout: Option<String>,

        /// Print field spans as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Pack {
            input,
            output,
            capacity,
        } => commands::pack::execute(&input, &output, capacity),

        Commands::Unpack {
            input,
            layout,
            output,
        } => commands::unpack::execute(&input, &layout, output.as_deref()),

        Commands::Inspect {
            input,
            layout,
            json,
        } => commands::inspect::execute(&input, layout.as_deref(), json),
    }
}
