//! gpar: place-and-route and bitstream tools for GreenPAK parts.
//!
//! `gpar build` turns a synthesized JSON netlist into a bitstream file;
//! `gpar decode` reads a bitstream back and lists what each entity does.

#![warn(missing_docs)]

mod build;
mod decode;
mod pipeline;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use gpar_device::TextFormat;

/// gpar: GreenPAK place-and-route.
#[derive(Parser, Debug)]
#[command(name = "gpar", version, about = "GreenPAK place-and-route")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also print informational diagnostics and per-family utilization.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `gpar.toml` file or the directory holding it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Place and route a netlist and write its bitstream.
    Build(BuildArgs),
    /// Load a bitstream and print each entity's state.
    Decode(DecodeArgs),
}

/// Arguments for the `gpar build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// JSON netlist to build. Defaults to `project.netlist` from `gpar.toml`.
    pub netlist: Option<String>,

    /// Top module name.
    #[arg(long)]
    pub top: Option<String>,

    /// Target part, e.g. `SLG46620V`.
    #[arg(short, long)]
    pub part: Option<String>,

    /// Output bitstream path. Defaults to the netlist path with a `.txt`
    /// extension.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Text form of the written bitstream.
    #[arg(short, long, value_enum)]
    pub format: Option<CliFormat>,

    /// Pattern ID to burn into the part (decimal or `0x` hex).
    #[arg(long, value_parser = parse_pattern_id)]
    pub pattern_id: Option<u8>,

    /// Disable configuration read-back.
    #[arg(long)]
    pub read_protect: bool,

    /// Output format for diagnostics.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub report_format: ReportFormat,
}

/// Arguments for the `gpar decode` subcommand.
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// Bitstream file, in either text form.
    pub bitstream: String,

    /// The part the bitstream was built for.
    #[arg(short, long)]
    pub part: String,

    /// List entities left at their power-on state as well.
    #[arg(short, long)]
    pub all: bool,
}

/// Bitstream text form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliFormat {
    /// Indexed lines with a header.
    Indexed,
    /// One bit per line.
    Bits,
}

impl From<CliFormat> for TextFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Indexed => TextFormat::Indexed,
            CliFormat::Bits => TextFormat::Bits,
        }
    }
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print informational output.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn parse_pattern_id(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|_| format!("pattern ID must be 0-255, got '{s}'"))
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Decode(ref args) => decode::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
