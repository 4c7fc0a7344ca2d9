//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};

/// Graphcalc: a calculator that remembers every key
#[derive(Parser, Debug)]
#[command(name = "graphcalc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors-only logging; results are still printed)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Output format
    #[arg(long, default_value = "text", global = true)]
    pub format: FormatArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Press keys and print the display
    ///
    /// Each word is one key: a number, an operation symbol, `M` (memory),
    /// `→M` (store), `MC`, `C`, `undo` or `$name` (bound variable). With no
    /// words, keys are read from stdin and the display is printed per line.
    Eval(EvalArgs),

    /// Press keys, then report the expression as a function of M
    Graph(GraphArgs),

    /// List every operation symbol
    Symbols,
}

/// Arguments for the eval command
#[derive(Parser, Debug)]
pub struct EvalArgs {
    /// Keys to press, in order
    #[arg(allow_negative_numbers = true)]
    pub words: Vec<String>,

    /// Bind a variable before pressing keys (NAME=VALUE, repeatable)
    #[arg(short, long = "bind", value_name = "NAME=VALUE")]
    pub bindings: Vec<String>,
}

/// Arguments for the graph command
#[derive(Parser, Debug)]
pub struct GraphArgs {
    /// Keys to press, in order
    #[arg(allow_negative_numbers = true)]
    pub words: Vec<String>,

    /// Bind a variable before pressing keys (NAME=VALUE, repeatable)
    #[arg(short, long = "bind", value_name = "NAME=VALUE")]
    pub bindings: Vec<String>,

    /// Left end of the intercept scan
    #[arg(long, default_value = "-10", allow_negative_numbers = true)]
    pub from: f64,

    /// Right end of the intercept scan
    #[arg(long, default_value = "10", allow_negative_numbers = true)]
    pub to: f64,

    /// Scan step
    #[arg(long, default_value = "0.001")]
    pub step: f64,

    /// |y| below this counts as a crossing
    #[arg(long, default_value = "0.001")]
    pub tolerance: f64,
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Output format argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

impl From<FormatArg> for crate::config::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}
