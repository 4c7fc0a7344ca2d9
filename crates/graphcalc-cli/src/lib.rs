//! Graphcalc CLI library
//!
//! Command-line front end for the graphcalc engine: words become key presses,
//! and the resulting display, graph summary or symbol table is printed as
//! text or JSON.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]
#![allow(clippy::missing_errors_doc)]
#![cfg_attr(test, allow(clippy::float_cmp))]

mod commands;
mod config;
mod error;
pub mod keys;
pub mod logging;
pub mod output;

pub use commands::{Cli, ColorArg, Commands, EvalArgs, FormatArg, GraphArgs};
pub use config::{parse_binding, CliConfig, ColorChoice, OutputFormat, Verbosity};
pub use error::{CliError, CliResult};
pub use keys::{press_line, Key};
pub use logging::init_logging;
pub use output::{
    render_eval, render_graph, render_symbols, symbol_entries, EvalReport, GraphReport,
    SymbolEntry,
};
