//! Output rendering

use crate::config::OutputFormat;
use crate::error::CliResult;
use console::style;
use graphcalc::core::float_serde;
use graphcalc::prelude::{format_number, EvaluationResult, Graph, GraphConfig, Operation, Readout};
use serde::Serialize;

/// Everything printed after a batch of key presses
#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    /// Display text
    pub readout: Readout,
    /// Raw evaluation
    pub result: EvaluationResult,
    /// Memory value, if set
    #[serde(with = "float_serde::option")]
    pub memory: Option<f64>,
}

/// Numeric summary of a graph
#[derive(Debug, Clone, Serialize)]
pub struct GraphReport {
    /// Plot title
    pub title: String,
    /// f(0), rounded to hundredths
    #[serde(with = "float_serde")]
    pub y_intercept: f64,
    /// Crossings of the x axis, rounded to hundredths
    pub x_intercepts: Vec<f64>,
    /// Scan settings used
    pub config: GraphConfig,
}

impl GraphReport {
    /// Computes the report for `graph`
    #[must_use]
    pub fn new(graph: &Graph, config: GraphConfig) -> Self {
        Self {
            title: graph.title(),
            y_intercept: graph.y_intercept(),
            x_intercepts: graph.x_intercepts(&config),
            config,
        }
    }
}

/// One row of the symbol listing
#[derive(Debug, Clone, Serialize)]
pub struct SymbolEntry {
    /// Keypad symbol
    pub symbol: &'static str,
    /// Arity class
    pub kind: &'static str,
}

/// Every registered symbol with its kind
#[must_use]
pub fn symbol_entries() -> Vec<SymbolEntry> {
    Operation::symbols()
        .filter_map(|symbol| {
            Operation::lookup(symbol).map(|op| SymbolEntry {
                symbol,
                kind: op.kind().name(),
            })
        })
        .collect()
}

/// Render an evaluation report
pub fn render_eval(report: &EvalReport, format: OutputFormat, color: bool) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(report)?),
        OutputFormat::Text => Ok(render_eval_text(report, color)),
    }
}

fn render_eval_text(report: &EvalReport, color: bool) -> String {
    let main = report.readout.main.as_deref().unwrap_or("");
    let main = if report.readout.error.is_some() && color {
        style(main).red().bold().to_string()
    } else if color {
        style(main).bold().to_string()
    } else {
        main.to_string()
    };

    let mut out = main;
    if !report.readout.description.is_empty() {
        out.push('\n');
        if color {
            out.push_str(&style(&report.readout.description).dim().to_string());
        } else {
            out.push_str(&report.readout.description);
        }
    }
    if let Some(memory) = report.memory {
        out.push_str(&format!("\nM: {}", format_number(memory)));
    }
    out
}

/// Render a graph report
pub fn render_graph(report: &GraphReport, format: OutputFormat, color: bool) -> CliResult<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string(report)?);
    }

    let title = if color {
        style(&report.title).bold().to_string()
    } else {
        report.title.clone()
    };
    let crossings = report
        .x_intercepts
        .iter()
        .map(|x| format_number(*x))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!(
        "{title}\nY: {}\nX: {crossings}",
        format_number(report.y_intercept)
    ))
}

/// Render the symbol listing
pub fn render_symbols(format: OutputFormat) -> CliResult<String> {
    let entries = symbol_entries();
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string(&entries)?);
    }
    Ok(entries
        .iter()
        .map(|e| format!("{:<6} {}", e.symbol, e.kind))
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use graphcalc::prelude::{DomainError, Session};

    fn report(session: &Session) -> EvalReport {
        EvalReport {
            readout: session.readout(),
            result: session.evaluate(),
            memory: session.memory(),
        }
    }

    fn session(build: impl FnOnce(&mut Session)) -> Session {
        let mut s = Session::new();
        build(&mut s);
        s
    }

    #[test]
    fn test_render_eval_text_plain() {
        let s = session(|s| {
            s.enter_operand(5.0);
            s.enter_operation("+");
            s.enter_operand(3.0);
            s.enter_operation("=");
        });
        let out = render_eval(&report(&s), OutputFormat::Text, false).unwrap();
        assert_eq!(out, "8.0\n5.0 + 3.0 =");
    }

    #[test]
    fn test_render_eval_text_with_memory() {
        let s = session(|s| {
            s.recall_memory();
            s.store_memory(2.0);
        });
        let out = render_eval(&report(&s), OutputFormat::Text, false).unwrap();
        assert_eq!(out, "2.0\nM =\nM: 2.0");
    }

    #[test]
    fn test_render_eval_text_error() {
        let s = session(|s| {
            s.enter_operand(0.0);
            s.enter_operation("x⁻¹");
        });
        let out = render_eval(&report(&s), OutputFormat::Text, false).unwrap();
        assert!(out.starts_with("Division by 0"));
    }

    #[test]
    fn test_render_eval_json() {
        let s = session(|s| {
            s.enter_operand(5.0);
            s.enter_operation("+");
        });
        let out = render_eval(&report(&s), OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["result"]["is_pending"], true);
        assert_eq!(value["result"]["description"], "5.0 + ");
        assert_eq!(value["readout"]["description"], "5.0 + ...");
        assert!(value["memory"].is_null());
    }

    #[test]
    fn test_render_eval_json_error_variant() {
        let s = session(|s| {
            s.enter_operand(-1.0);
            s.enter_operation("√");
        });
        let r = report(&s);
        assert_eq!(r.result.error, Some(DomainError::NegativeSquareRoot));
        let out = render_eval(&r, OutputFormat::Json, false).unwrap();
        assert!(out.contains("NegativeSquareRoot"));
    }

    #[test]
    fn test_render_eval_json_keeps_infinite_value() {
        let s = session(|s| {
            s.enter_operand(0.0);
            s.enter_operation("x⁻¹");
            s.store_memory(f64::NEG_INFINITY);
        });
        let out = render_eval(&report(&s), OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["result"]["value"], "inf");
        assert_eq!(value["result"]["error"], "DivisionByZero");
        assert_eq!(value["memory"], "-inf");
    }

    #[test]
    fn test_render_graph_json_keeps_nan_intercept() {
        let s = session(|s| {
            s.recall_memory();
            s.enter_operation("-");
            s.enter_operand(1.0);
            s.enter_operation("=");
            s.enter_operation("√");
        });
        let graph = s.graph().unwrap();
        let config = GraphConfig::new().with_range(-1.0, 1.0);
        let out = render_graph(&GraphReport::new(&graph, config), OutputFormat::Json, false)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["y_intercept"], "NaN");
    }

    #[test]
    fn test_render_graph_text() {
        let s = session(|s| {
            s.recall_memory();
            s.enter_operation("-");
            s.enter_operand(1.0);
            s.enter_operation("=");
        });
        let graph = s.graph().unwrap();
        let config = GraphConfig::new().with_range(-2.0, 2.0);
        let out = render_graph(&GraphReport::new(&graph, config), OutputFormat::Text, false)
            .unwrap();
        assert_eq!(out, "M - 1.0\nY: -1.0\nX: 1.0");
    }

    #[test]
    fn test_render_graph_json() {
        let s = session(|s| s.recall_memory());
        let graph = s.graph().unwrap();
        let config = GraphConfig::new().with_range(-1.0, 1.0);
        let out = render_graph(&GraphReport::new(&graph, config), OutputFormat::Json, false)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["title"], "M");
        assert_eq!(value["x_intercepts"][0], 0.0);
    }

    #[test]
    fn test_symbol_entries_cover_registry() {
        let entries = symbol_entries();
        assert_eq!(entries.len(), Operation::symbols().count());
        assert!(entries
            .iter()
            .any(|e| e.symbol == "÷" && e.kind == "binary"));
    }

    #[test]
    fn test_render_symbols_text() {
        let out = render_symbols(OutputFormat::Text).unwrap();
        assert!(out.lines().any(|l| l.starts_with("√") && l.ends_with("unary")));
        assert!(out.lines().any(|l| l.starts_with("=") && l.ends_with("equals")));
    }
}
