//! Calculator session
//!
//! Wraps an [`Evaluator`] with the state a front end keeps next to it: the
//! memory slot bound to `M`, and the rules for turning an evaluation into the
//! text shown on the main display and the description line.

use crate::core::{format_number, DomainError, EvaluationResult, Evaluator, STORED_VARIABLE};
use crate::graph::Graph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// What a front end should show after an input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readout {
    /// Main display text. `None` means keep whatever is currently shown.
    pub main: Option<String>,
    /// Description line, suffixed with `...` while pending or ` =` when complete
    pub description: String,
    /// True while a binary operation awaits its right operand
    pub is_pending: bool,
    /// Domain error of the last evaluation
    pub error: Option<DomainError>,
}

/// A calculator session: one engine plus its memory
#[derive(Debug, Clone, Default)]
pub struct Session {
    brain: Evaluator,
    memory: HashMap<String, f64>,
    memory_set: bool,
}

impl Session {
    /// Creates a session with an empty history and no memory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a numeric operand
    pub fn enter_operand(&mut self, value: f64) {
        self.brain.append_operand(value);
    }

    /// Enters an operation symbol
    pub fn enter_operation(&mut self, symbol: &str) {
        self.brain.append_operation(symbol);
    }

    /// Enters a reference to the memory slot (`M` key)
    pub fn recall_memory(&mut self) {
        self.brain.append_variable(STORED_VARIABLE);
    }

    /// Stores `value` in memory (`→M` key)
    pub fn store_memory(&mut self, value: f64) {
        debug!(value, "memory stored");
        self.memory.insert(STORED_VARIABLE.to_string(), value);
        self.memory_set = true;
    }

    /// Binds an arbitrary variable name for `VariableRef` resolution
    pub fn bind(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        if name == STORED_VARIABLE {
            self.store_memory(value);
        } else {
            self.memory.insert(name, value);
        }
    }

    /// Enters a reference to any variable
    pub fn recall_variable(&mut self, name: &str) {
        self.brain.append_variable(name);
    }

    /// Forgets every bound value, `M` included (`MC` key)
    pub fn clear_memory(&mut self) {
        self.memory.clear();
        self.memory_set = false;
    }

    /// Starts over with a fresh engine and empty memory (`C` key)
    pub fn clear(&mut self) {
        self.brain = Evaluator::new();
        self.clear_memory();
    }

    /// Removes the most recent input
    pub fn undo(&mut self) {
        self.brain.undo_last();
    }

    /// Returns the memory value, if one has been stored
    #[must_use]
    pub fn memory(&self) -> Option<f64> {
        self.memory.get(STORED_VARIABLE).copied()
    }

    /// Returns the underlying engine
    #[must_use]
    pub fn evaluator(&self) -> &Evaluator {
        &self.brain
    }

    /// Evaluates the history against the memory bindings
    #[must_use]
    pub fn evaluate(&self) -> EvaluationResult {
        self.brain.evaluate(&self.memory)
    }

    /// Value a `→M` press would store: the current result, or 0
    #[must_use]
    pub fn current_value(&self) -> f64 {
        self.evaluate().value.unwrap_or(0.0)
    }

    /// Builds the display text for the current state
    #[must_use]
    pub fn readout(&self) -> Readout {
        let result = self.evaluate();

        let main = if let Some(error) = result.error {
            Some(error.to_string())
        } else {
            result
                .value
                .filter(|_| self.memory_set || !result.mentions_stored_variable())
                .map(format_number)
        };

        let description = if result.description.is_empty() {
            String::new()
        } else if result.is_pending {
            format!("{}...", result.description)
        } else {
            format!("{} =", result.description)
        };

        Readout {
            main,
            description,
            is_pending: result.is_pending,
            error: result.error,
        }
    }

    /// Hands the current expression to a grapher as a function of `M`.
    ///
    /// Returns `None` while a binary operation is pending.
    #[must_use]
    pub fn graph(&self) -> Option<Graph> {
        if self.brain.is_pending() {
            debug!("graph requested while pending");
            return None;
        }
        Some(Graph::new(self.brain.clone(), self.memory.clone()))
    }
}
