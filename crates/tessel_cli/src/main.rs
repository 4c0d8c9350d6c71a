//! Tessel CLI: drives the block pipeline from the command line.
//!
//! Provides `tessel new` for creating blocks from label lists, `tessel generic`
//! for building a composite from a project file, `tessel edit` for applying an
//! edit to a stored block, and `tessel offset` for the anchor calculator.
//! Descriptors are printed to stdout as JSON; status lines and diagnostics go
//! to stderr.

#![warn(missing_docs)]

mod edit;
mod generic;
mod new;
mod offset;
mod report;
mod settings;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Tessel: block label parsing and geometry for circuit editors.
#[derive(Parser, Debug)]
#[command(name = "tessel", version, about = "Tessel block pipeline")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `tessel.toml` file, or a directory containing one.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output format for diagnostics.
    #[arg(short, long, global = true, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create blocks from a label list.
    New(NewArgs),
    /// Build a composite block from a project file.
    Generic(GenericArgs),
    /// Apply an edit to a stored block.
    Edit(EditArgs),
    /// Compute the anchor offset for a width change.
    Offset(OffsetArgs),
}

/// Arguments for the `tessel new` subcommand.
#[derive(Parser, Debug)]
pub struct NewArgs {
    /// The kind of block to create.
    #[command(subcommand)]
    pub kind: NewKind,
}

/// Block kinds `tessel new` can create.
#[derive(Subcommand, Debug)]
pub enum NewKind {
    /// Input ports, e.g. `"a, data[7:0]"`.
    Input {
        /// Comma-separated port labels.
        names: String,
        /// Not bound to an FPGA pin.
        #[arg(long = "virtual")]
        is_virtual: bool,
        /// Mark the inputs as clocks.
        #[arg(long)]
        clock: bool,
    },
    /// Output ports.
    Output {
        /// Comma-separated port labels.
        names: String,
        /// Not bound to an FPGA pin.
        #[arg(long = "virtual")]
        is_virtual: bool,
    },
    /// Input labels.
    InputLabel(LabelArgs),
    /// Output labels.
    OutputLabel(LabelArgs),
    /// Matching input and output labels.
    PairedLabels(LabelArgs),
    /// Constant parameters.
    Constant {
        /// Comma-separated parameter names.
        names: String,
        /// Hide the parameters from enclosing composites.
        #[arg(long)]
        local: bool,
    },
    /// Memory parameters.
    Memory {
        /// Comma-separated parameter names.
        names: String,
        /// Address base: 2, 10 or 16.
        #[arg(long, default_value_t = 10)]
        radix: u8,
        /// Hide the parameters from enclosing composites.
        #[arg(long)]
        local: bool,
    },
    /// A code block.
    Code(CodeArgs),
    /// An empty info block.
    Info,
}

/// Label text and color.
#[derive(Parser, Debug)]
pub struct LabelArgs {
    /// Comma-separated labels.
    pub names: String,
    /// Display color of the label block.
    #[arg(long = "block-color", id = "block_color", default_value = "fuchsia")]
    pub block_color: String,
}

/// The three declaration lists of a code block.
#[derive(Parser, Debug)]
pub struct CodeArgs {
    /// Input ports.
    #[arg(long, default_value = "")]
    pub inputs: String,
    /// Output ports.
    #[arg(long, default_value = "")]
    pub outputs: String,
    /// Parameters.
    #[arg(long, default_value = "")]
    pub params: String,
}

/// Arguments for the `tessel generic` subcommand.
#[derive(Parser, Debug)]
pub struct GenericArgs {
    /// JSON project file describing the composite.
    pub file: String,
    /// Type name for the block; defaults to the file stem.
    #[arg(long = "type")]
    pub type_name: Option<String>,
    /// Fixed width; requires `--height`.
    #[arg(long, requires = "height")]
    pub width: Option<u32>,
    /// Fixed height; requires `--width`.
    #[arg(long, requires = "width")]
    pub height: Option<u32>,
}

/// Arguments for the `tessel edit` subcommand.
#[derive(Parser, Debug)]
pub struct EditArgs {
    /// JSON file holding the block to edit.
    pub block: String,
    /// JSON file holding the wires attached to the block.
    #[arg(long)]
    pub wires: Option<String>,
    /// The edit to apply.
    #[command(subcommand)]
    pub change: EditKind,
}

/// Edits `tessel edit` can apply.
#[derive(Subcommand, Debug)]
pub enum EditKind {
    /// Relabel an input or output port.
    Port {
        /// The new label.
        label: String,
        /// Not bound to an FPGA pin.
        #[arg(long = "virtual")]
        is_virtual: bool,
        /// Mark the input as a clock.
        #[arg(long)]
        clock: bool,
    },
    /// Relabel an input or output label.
    Label(LabelArgs),
    /// Rename a label, keeping its range.
    Rename(LabelArgs),
    /// Rename a constant.
    Constant {
        /// The new name.
        label: String,
        /// Hide the parameter from enclosing composites.
        #[arg(long)]
        local: bool,
    },
    /// Rename a memory or change its address base.
    Memory {
        /// The new name.
        label: String,
        /// Address base: 2, 10 or 16.
        #[arg(long, default_value_t = 10)]
        radix: u8,
        /// Hide the parameter from enclosing composites.
        #[arg(long)]
        local: bool,
    },
    /// Re-declare a code block's ports.
    Code(CodeArgs),
    /// Toggle an info block's read-only flag.
    ToggleInfo,
}

/// Arguments for the `tessel offset` subcommand.
#[derive(Parser, Debug)]
pub struct OffsetArgs {
    /// Pin count before the edit.
    pub old: u32,
    /// Pin count after the edit.
    pub new: u32,
    /// The block was virtual before the edit.
    #[arg(long)]
    pub old_virtual: bool,
    /// The block is virtual after the edit.
    #[arg(long)]
    pub new_virtual: bool,
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
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a config file or directory.
    pub config: Option<String>,
    /// How diagnostics are printed.
    pub format: ReportFormat,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::env::var("TERM").is_ok(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
        format: cli.format,
    };
    init_logger(&global);

    let result = match cli.command {
        Command::New(ref args) => new::run(args, &global),
        Command::Generic(ref args) => generic::run(args, &global),
        Command::Edit(ref args) => edit::run(args, &global),
        Command::Offset(ref args) => offset::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// The log level implied by `--quiet` and `--verbose`.
fn log_level(global: &GlobalArgs) -> log::LevelFilter {
    if global.quiet {
        log::LevelFilter::Warn
    } else if global.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    }
}

fn init_logger(global: &GlobalArgs) {
    env_logger::Builder::new()
        .filter_level(log_level(global))
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}
