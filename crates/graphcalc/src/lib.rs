//! Graphcalc - token-history calculator engine
//!
//! The engine records every key press as a token and recomputes the result,
//! the pending state, a readable description and any domain error each time it
//! is asked. Binary operations are deferred until their right operand arrives,
//! and the last input can always be undone.
//!
//! # Example
//!
//! ```rust
//! use graphcalc::prelude::*;
//!
//! let mut brain = Evaluator::new();
//! brain.append_operand(5.0);
//! brain.append_operation("+");
//!
//! let pending = brain.evaluate(&NoBindings);
//! assert!(pending.is_pending);
//! assert_eq!(pending.description, "5.0 + ");
//!
//! brain.append_operand(3.0);
//! brain.append_operation("=");
//! assert_eq!(brain.result(), Some(8.0));
//!
//! // Domain errors are reported next to the value, never raised
//! let mut brain = Evaluator::new();
//! brain.append_operand(0.0);
//! brain.append_operation("x⁻¹");
//! let result = brain.evaluate(&NoBindings);
//! assert_eq!(result.error, Some(DomainError::DivisionByZero));
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod core;
pub mod graph;
pub mod session;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::core::evaluator::{Bindings, NoBindings};
    pub use crate::core::operations::OperationKind;
    pub use crate::core::{
        format_number, DomainError, EvaluationResult, Evaluator, History, Operation, Token,
        STORED_VARIABLE,
    };
    pub use crate::graph::{Graph, GraphConfig, MAX_SCAN_POINTS};
    pub use crate::session::{Readout, Session};
}

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub(crate) mod test_utils {
    /// Installs a tracing subscriber at DEBUG level; safe to call repeatedly
    pub fn init_test_logging() {
        use tracing_subscriber::{fmt, EnvFilter};

        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
