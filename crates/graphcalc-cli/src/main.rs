//! Graphcalc CLI: a calculator that remembers every key
//!
//! ## Usage
//!
//! ```bash
//! graphcalc eval 5 + 3 =                 # 8.0
//! graphcalc eval --bind r=2 '$r' x² =    # 4.0
//! echo "9 √" | graphcalc eval            # one display per line
//! graphcalc graph M x² - 4 =             # intercepts of x² - 4
//! graphcalc symbols                      # keypad listing
//! ```

use clap::Parser;
use graphcalc::prelude::{GraphConfig, Session};
use graphcalc_cli::{
    init_logging, press_line, render_eval, render_graph, render_symbols, Cli, CliConfig,
    CliError, CliResult, ColorChoice, Commands, EvalArgs, EvalReport, GraphArgs, GraphReport,
    Key, OutputFormat, Verbosity,
};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tracing::{debug, info};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let bindings: &[String] = match &cli.command {
        Commands::Eval(args) => args.bindings.as_slice(),
        Commands::Graph(args) => args.bindings.as_slice(),
        Commands::Symbols => &[],
    };
    let config = build_config(&cli, bindings)?;
    init_logging(config.verbosity);
    debug!(?config, "configuration");

    match cli.command {
        Commands::Eval(args) => run_eval(&config, &args),
        Commands::Graph(args) => run_graph(&config, &args),
        Commands::Symbols => run_symbols(&config),
    }
}

fn build_config(cli: &Cli, bindings: &[String]) -> CliResult<CliConfig> {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.clone().into();
    let format: OutputFormat = cli.format.clone().into();

    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_format(format)
        .with_binding_args(bindings)
}

fn new_session(config: &CliConfig) -> Session {
    let mut session = Session::new();
    for (name, value) in &config.bindings {
        session.bind(name.as_str(), *value);
    }
    session
}

fn press_words(session: &mut Session, words: &[String]) {
    for word in words {
        Key::parse(word).press(session);
    }
}

fn report(session: &Session) -> EvalReport {
    EvalReport {
        readout: session.readout(),
        result: session.evaluate(),
        memory: session.memory(),
    }
}

fn run_eval(config: &CliConfig, args: &EvalArgs) -> CliResult<()> {
    let color = config.color.should_color();
    let mut session = new_session(config);

    if !args.words.is_empty() {
        press_words(&mut session, &args.words);
        println!("{}", render_eval(&report(&session), config.format, color)?);
        return Ok(());
    }

    info!("reading keys from stdin");
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut shown: Option<String> = None;
    for line in stdin.lock().lines() {
        let line = line?;
        press_line(&mut session, &line);

        let mut current = report(&session);
        // An absent main text keeps the previous one on screen
        match &current.readout.main {
            Some(text) => shown = Some(text.clone()),
            None if config.format == OutputFormat::Text => {
                current.readout.main.clone_from(&shown);
            }
            None => {}
        }
        writeln!(stdout, "{}", render_eval(&current, config.format, color)?)?;
    }
    Ok(())
}

fn run_graph(config: &CliConfig, args: &GraphArgs) -> CliResult<()> {
    let mut session = new_session(config);
    press_words(&mut session, &args.words);

    let graph = session.graph().ok_or_else(|| {
        CliError::invalid_argument("cannot graph while an operation awaits its right operand")
    })?;

    let graph_config = GraphConfig::new()
        .with_range(args.from, args.to)
        .with_step(args.step)
        .with_tolerance(args.tolerance);
    if !graph_config.is_valid() {
        info!(?graph_config, "unusable scan range, no intercepts");
    }

    let report = GraphReport::new(&graph, graph_config);
    println!(
        "{}",
        render_graph(&report, config.format, config.color.should_color())?
    );
    Ok(())
}

fn run_symbols(config: &CliConfig) -> CliResult<()> {
    println!("{}", render_symbols(config.format)?);
    Ok(())
}
