//! Calculator data model
//!
//! The engine keeps an editable log of [`Token`]s and re-evaluates it on demand
//! into an [`EvaluationResult`]. Nothing here is cached: every query folds the
//! whole history again.

pub mod evaluator;
pub mod float_serde;
pub mod history;
pub mod operations;

pub use evaluator::Evaluator;
pub use history::History;
pub use operations::{DomainCheck, Operation};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved variable name that resolves to the engine's stored scalar
pub const STORED_VARIABLE: &str = "M";

/// One atomic user input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    /// A concrete numeric operand
    Literal(#[serde(with = "float_serde")] f64),
    /// An operator or constant identifier, resolved through the operation registry
    Symbol(String),
    /// A reference to an externally bound value, resolved at evaluation time
    VariableRef(String),
}

impl Token {
    /// Creates a symbol token
    #[must_use]
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// Creates a variable reference token
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::VariableRef(name.into())
    }
}

impl From<f64> for Token {
    fn from(value: f64) -> Self {
        Self::Literal(value)
    }
}

/// A computed value together with its textual representation
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    /// Numeric value
    pub value: f64,
    /// How the value is written in the description
    pub text: String,
}

impl Operand {
    /// Creates an operand from a value and its text
    #[must_use]
    pub fn new(value: f64, text: impl Into<String>) -> Self {
        Self {
            value,
            text: text.into(),
        }
    }

    /// Creates an operand whose text is the formatted value
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::new(value, format_number(value))
    }
}

/// Mathematically undefined or numerically unstable operation.
///
/// Domain errors never abort evaluation; they travel next to the (possibly
/// non-finite) value so the caller can decide what to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DomainError {
    /// Square root of a negative operand
    #[error("SQRT of negative number")]
    NegativeSquareRoot,
    /// Inverse of zero, or a divisor too close to zero
    #[error("Division by 0")]
    DivisionByZero,
}

/// Outcome of folding a history against a set of bindings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Current value, absent when nothing has been computed yet
    #[serde(default, with = "float_serde::option")]
    pub value: Option<f64>,
    /// True while a binary operation awaits its right operand
    pub is_pending: bool,
    /// Human-readable expression
    pub description: String,
    /// Last domain error recorded during the fold
    pub error: Option<DomainError>,
}

impl EvaluationResult {
    /// Returns the domain error message, if any
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.map(|e| e.to_string())
    }

    /// True when the description references the stored scalar
    #[must_use]
    pub fn mentions_stored_variable(&self) -> bool {
        self.description.contains(STORED_VARIABLE)
    }
}

/// Formats a value the way descriptions and nullary results show it.
///
/// Whole numbers keep a trailing `.0` (`5.0`), tiny and huge magnitudes switch to
/// exponent notation (`1e-10`).
#[must_use]
pub fn format_number(value: f64) -> String {
    format!("{value:?}")
}
