//! Evaluator engine
//!
//! Folds the token history left to right through an explicit state machine:
//!
//! - `Empty`: nothing computed yet
//! - `Value`: an accumulator holds a value and its text
//! - `AwaitingRightOperand`: a binary operation captured its left operand; the
//!   right operand may or may not have been entered yet
//!
//! Binary operations are deferred so the intermediate result can be shown before
//! the second operand is known. Structural anomalies (unknown symbols, operators
//! with nothing to apply to) are absorbed as no-ops; domain errors are recorded
//! and the fold carries on.

use crate::core::{
    DomainCheck, DomainError, EvaluationResult, History, Operand, Operation, Token,
    STORED_VARIABLE,
};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use tracing::{debug, trace};

/// Source of externally bound variable values
pub trait Bindings {
    /// Returns the value bound to `name`, if any
    fn lookup(&self, name: &str) -> Option<f64>;
}

impl<S: BuildHasher> Bindings for HashMap<String, f64, S> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl Bindings for BTreeMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

/// No bindings at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBindings;

impl Bindings for NoBindings {
    fn lookup(&self, _name: &str) -> Option<f64> {
        None
    }
}

/// The evaluator engine: an editable token history plus the stored scalar
/// that `M` falls back to.
///
/// Replace the whole value to clear it; there is no other state to reset.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    history: History,
    stored_variable: f64,
}

impl Evaluator {
    /// Creates an engine with an empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a numeric literal
    pub fn append_operand(&mut self, value: f64) {
        self.history.push(Token::Literal(value));
    }

    /// Appends a variable reference; unresolved names default at evaluation time
    pub fn append_variable(&mut self, name: impl Into<String>) {
        self.history.push(Token::VariableRef(name.into()));
    }

    /// Appends an operation symbol. Any string is accepted; unknown ones are inert.
    pub fn append_operation(&mut self, symbol: impl Into<String>) {
        self.history.push(Token::Symbol(symbol.into()));
    }

    /// Appends an already-built token
    pub fn append(&mut self, token: Token) {
        self.history.push(token);
    }

    /// Removes the most recent token; no-op on an empty history
    pub fn undo_last(&mut self) {
        if self.history.pop().is_none() {
            debug!("undo on empty history ignored");
        }
    }

    /// Returns the token history
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns the stored scalar
    #[must_use]
    pub fn stored_variable(&self) -> f64 {
        self.stored_variable
    }

    /// Sets the stored scalar read by `M` when the bindings lack it
    pub fn set_stored_variable(&mut self, value: f64) {
        self.stored_variable = value;
    }

    /// Folds the history against `bindings`. Read-only; call it as often as needed.
    pub fn evaluate<B: Bindings + ?Sized>(&self, bindings: &B) -> EvaluationResult {
        let mut fold = Fold::new(bindings, self.stored_variable);
        for token in &self.history {
            fold.step(token);
        }
        fold.finish()
    }

    /// Current value with no bindings
    #[must_use]
    pub fn result(&self) -> Option<f64> {
        self.evaluate(&NoBindings).value
    }

    /// True while a binary operation awaits its right operand
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.evaluate(&NoBindings).is_pending
    }

    /// Current description with no bindings
    #[must_use]
    pub fn description(&self) -> String {
        self.evaluate(&NoBindings).description
    }
}

/// A binary operation waiting for its right operand
struct PendingOperation<'a> {
    apply: fn(f64, f64) -> f64,
    describe: fn(&str, &str) -> String,
    left: Operand,
    symbol: &'a str,
}

impl PendingOperation<'_> {
    fn perform(&self, right: &Operand) -> Operand {
        Operand::new(
            (self.apply)(self.left.value, right.value),
            (self.describe)(&self.left.text, &right.text),
        )
    }
}

enum State<'a> {
    Empty,
    Value(Operand),
    AwaitingRightOperand {
        pending: PendingOperation<'a>,
        right: Option<Operand>,
    },
}

impl<'a> State<'a> {
    fn accumulator_mut(&mut self) -> Option<&mut Operand> {
        match self {
            Self::Empty => None,
            Self::Value(acc) => Some(acc),
            Self::AwaitingRightOperand { right, .. } => right.as_mut(),
        }
    }

    /// Overwrites the accumulator, keeping any pending operation
    fn with_accumulator(self, operand: Operand) -> Self {
        match self {
            Self::Empty | Self::Value(_) => Self::Value(operand),
            Self::AwaitingRightOperand { pending, .. } => Self::AwaitingRightOperand {
                pending,
                right: Some(operand),
            },
        }
    }

    /// Combines the pending operation with the accumulator when both exist.
    ///
    /// The domain check sees the operands before they are combined.
    fn resolve(self, error: &mut Option<DomainError>) -> Self {
        match self {
            Self::AwaitingRightOperand {
                pending,
                right: Some(right),
            } => {
                if let Some(found) = DomainCheck::lookup(pending.symbol)
                    .and_then(|check| check.check_binary(pending.left.value, right.value))
                {
                    debug!(symbol = pending.symbol, error = %found, "domain error");
                    *error = Some(found);
                }
                Self::Value(pending.perform(&right))
            }
            other => other,
        }
    }

    /// Starts a new pending operation from the accumulator
    fn defer(
        self,
        symbol: &'a str,
        apply: fn(f64, f64) -> f64,
        describe: fn(&str, &str) -> String,
    ) -> Self {
        match self {
            Self::Value(left) => Self::AwaitingRightOperand {
                pending: PendingOperation {
                    apply,
                    describe,
                    left,
                    symbol,
                },
                right: None,
            },
            other => {
                debug!(symbol, "binary operator without a left operand ignored");
                other
            }
        }
    }
}

struct Fold<'a, B: ?Sized> {
    state: State<'a>,
    error: Option<DomainError>,
    bindings: &'a B,
    stored_variable: f64,
}

impl<'a, B: Bindings + ?Sized> Fold<'a, B> {
    fn new(bindings: &'a B, stored_variable: f64) -> Self {
        Self {
            state: State::Empty,
            error: None,
            bindings,
            stored_variable,
        }
    }

    fn set_accumulator(&mut self, operand: Operand) {
        let state = std::mem::replace(&mut self.state, State::Empty);
        self.state = state.with_accumulator(operand);
    }

    fn resolve_pending(&mut self) {
        let state = std::mem::replace(&mut self.state, State::Empty);
        self.state = state.resolve(&mut self.error);
    }

    fn resolve_variable(&self, name: &str) -> Operand {
        if let Some(value) = self.bindings.lookup(name) {
            Operand::new(value, name)
        } else if name == STORED_VARIABLE {
            Operand::new(self.stored_variable, STORED_VARIABLE)
        } else {
            debug!(name, "unbound variable resolved to 0");
            Operand::new(0.0, "0")
        }
    }

    fn step(&mut self, token: &'a Token) {
        trace!(?token, "fold");
        match token {
            Token::Literal(value) => self.set_accumulator(Operand::number(*value)),
            Token::VariableRef(name) => {
                let operand = self.resolve_variable(name);
                self.set_accumulator(operand);
            }
            Token::Symbol(symbol) => match Operation::lookup(symbol) {
                Some(operation) => self.apply(symbol, operation),
                None => debug!(symbol = symbol.as_str(), "unregistered symbol ignored"),
            },
        }
    }

    fn apply(&mut self, symbol: &'a str, operation: Operation) {
        match operation {
            Operation::Constant(value) => self.set_accumulator(Operand::new(value, symbol)),
            Operation::Nullary(generate) => self.set_accumulator(Operand::number(generate())),
            Operation::Unary { apply, describe } => {
                let Some(acc) = self.state.accumulator_mut() else {
                    debug!(symbol, "unary operator without an operand ignored");
                    return;
                };
                if let Some(found) =
                    DomainCheck::lookup(symbol).and_then(|check| check.check_unary(acc.value))
                {
                    debug!(symbol, error = %found, "domain error");
                    self.error = Some(found);
                }
                acc.value = apply(acc.value);
                acc.text = describe(&acc.text);
            }
            Operation::Binary { apply, describe } => {
                self.resolve_pending();
                let state = std::mem::replace(&mut self.state, State::Empty);
                self.state = state.defer(symbol, apply, describe);
            }
            Operation::Equals => self.resolve_pending(),
        }
    }

    fn finish(self) -> EvaluationResult {
        match self.state {
            State::Empty => EvaluationResult {
                value: None,
                is_pending: false,
                description: String::new(),
                error: self.error,
            },
            State::Value(acc) => EvaluationResult {
                value: Some(acc.value),
                is_pending: false,
                description: acc.text,
                error: self.error,
            },
            State::AwaitingRightOperand { pending, right } => EvaluationResult {
                value: right.as_ref().map(|r| r.value),
                is_pending: true,
                description: (pending.describe)(
                    &pending.left.text,
                    right.as_ref().map_or("", |r| r.text.as_str()),
                ),
                error: self.error,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(tokens: &[Token]) -> Evaluator {
        let mut eval = Evaluator::new();
        for token in tokens {
            eval.append(token.clone());
        }
        eval
    }

    fn lit(v: f64) -> Token {
        Token::Literal(v)
    }

    fn sym(s: &str) -> Token {
        Token::symbol(s)
    }

    fn eval(tokens: &[Token]) -> EvaluationResult {
        engine(tokens).evaluate(&NoBindings)
    }

    // ===== Empty and literal states =====

    #[test]
    fn test_empty_history() {
        let result = eval(&[]);
        assert_eq!(result.value, None);
        assert!(!result.is_pending);
        assert_eq!(result.description, "");
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_single_literal() {
        let result = eval(&[lit(5.0)]);
        assert_eq!(result.value, Some(5.0));
        assert_eq!(result.description, "5.0");
    }

    #[test]
    fn test_literal_overwrites_accumulator() {
        let result = eval(&[lit(5.0), lit(7.0)]);
        assert_eq!(result.value, Some(7.0));
        assert_eq!(result.description, "7.0");
    }

    // ===== Binary operations =====

    #[test]
    fn test_left_to_right_chain() {
        let result = eval(&[lit(5.0), sym("+"), lit(3.0), sym("+"), lit(2.0), sym("=")]);
        assert_eq!(result.value, Some(10.0));
        assert_eq!(result.description, "5.0 + 3.0 + 2.0");
        assert!(!result.is_pending);
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_no_precedence_between_operators() {
        // (2 + 3) x 4, not 2 + (3 x 4)
        let result = eval(&[lit(2.0), sym("+"), lit(3.0), sym("x"), lit(4.0), sym("=")]);
        assert_eq!(result.value, Some(20.0));
        assert_eq!(result.description, "2.0 + 3.0 x 4.0");
    }

    #[test]
    fn test_pending_without_right_operand() {
        let result = eval(&[lit(5.0), sym("+")]);
        assert!(result.is_pending);
        assert_eq!(result.value, None);
        assert_eq!(result.description, "5.0 + ");
    }

    #[test]
    fn test_pending_with_right_operand_shows_value() {
        let result = eval(&[lit(5.0), sym("+"), lit(3.0)]);
        assert!(result.is_pending);
        assert_eq!(result.value, Some(3.0));
        assert_eq!(result.description, "5.0 + 3.0");
    }

    #[test]
    fn test_chained_operator_shows_intermediate() {
        let result = eval(&[lit(5.0), sym("+"), lit(3.0), sym("x")]);
        assert!(result.is_pending);
        assert_eq!(result.value, None);
        assert_eq!(result.description, "5.0 + 3.0 x ");
    }

    #[test]
    fn test_binary_on_empty_is_ignored() {
        let result = eval(&[sym("+"), lit(4.0)]);
        assert!(!result.is_pending);
        assert_eq!(result.value, Some(4.0));
        assert_eq!(result.description, "4.0");
    }

    #[test]
    fn test_repeated_binary_keeps_first_pending() {
        let result = eval(&[lit(6.0), sym("+"), sym("-"), lit(2.0), sym("=")]);
        assert_eq!(result.value, Some(8.0));
        assert_eq!(result.description, "6.0 + 2.0");
    }

    #[test]
    fn test_power_description() {
        let result = eval(&[lit(2.0), sym("xʸ"), lit(3.0), sym("=")]);
        assert_eq!(result.value, Some(8.0));
        assert_eq!(result.description, "(2.0) ^ 3.0");
    }

    #[test]
    fn test_equals_without_pending() {
        let result = eval(&[lit(9.0), sym("=")]);
        assert_eq!(result.value, Some(9.0));
        assert_eq!(result.description, "9.0");
    }

    #[test]
    fn test_equals_on_empty() {
        let result = eval(&[sym("=")]);
        assert_eq!(result.value, None);
        assert_eq!(result.description, "");
    }

    #[test]
    fn test_equals_while_awaiting_right_operand() {
        let result = eval(&[lit(4.0), sym("x"), sym("=")]);
        assert!(result.is_pending);
        assert_eq!(result.description, "4.0 x ");
    }

    #[test]
    fn test_continue_after_equals() {
        let result = eval(&[lit(2.0), sym("+"), lit(3.0), sym("="), sym("x"), lit(4.0), sym("=")]);
        assert_eq!(result.value, Some(20.0));
        assert_eq!(result.description, "2.0 + 3.0 x 4.0");
    }

    // ===== Unary operations, constants, generators =====

    #[test]
    fn test_unary_applies_to_accumulator() {
        let result = eval(&[lit(9.0), sym("√")]);
        assert_eq!(result.value, Some(3.0));
        assert_eq!(result.description, "√(9.0)");
    }

    #[test]
    fn test_unary_on_empty_is_ignored() {
        let result = eval(&[sym("√")]);
        assert_eq!(result.value, None);
        assert_eq!(result.description, "");
    }

    #[test]
    fn test_unary_on_right_operand() {
        let result = eval(&[lit(1.0), sym("+"), lit(4.0), sym("√"), sym("=")]);
        assert_eq!(result.value, Some(3.0));
        assert_eq!(result.description, "1.0 + √(4.0)");
    }

    #[test]
    fn test_unary_while_awaiting_right_operand_is_ignored() {
        let result = eval(&[lit(1.0), sym("+"), sym("x²")]);
        assert!(result.is_pending);
        assert_eq!(result.description, "1.0 + ");
    }

    #[test]
    fn test_nested_unary_descriptions() {
        let result = eval(&[lit(3.0), sym("x²"), sym("+/-")]);
        assert_eq!(result.value, Some(-9.0));
        assert_eq!(result.description, "-((3.0)²)");
    }

    #[test]
    fn test_constant_described_by_symbol() {
        let result = eval(&[sym("π"), sym("cos")]);
        assert_eq!(result.value, Some(-1.0));
        assert_eq!(result.description, "cos(π)");
    }

    #[test]
    fn test_constant_as_right_operand() {
        let result = eval(&[lit(2.0), sym("x"), sym("e"), sym("=")]);
        assert_eq!(result.value, Some(2.0 * std::f64::consts::E));
        assert_eq!(result.description, "2.0 x e");
    }

    #[test]
    fn test_rand_described_by_value() {
        let result = eval(&[sym("rand")]);
        let value = result.value.unwrap();
        assert!((0.0..1.0).contains(&value));
        assert_eq!(result.description, format!("{value:?}"));
    }

    // ===== Variables =====

    #[test]
    fn test_unbound_variable_defaults_to_zero() {
        let result = eval(&[Token::variable("Q")]);
        assert_eq!(result.value, Some(0.0));
        assert_eq!(result.description, "0");
    }

    #[test]
    fn test_variable_from_bindings() {
        let eval = engine(&[Token::variable("x"), sym("+"), lit(1.0), sym("=")]);
        let mut bindings = HashMap::new();
        bindings.insert("x".to_string(), 2.5);
        let result = eval.evaluate(&bindings);
        assert_eq!(result.value, Some(3.5));
        assert_eq!(result.description, "x + 1.0");
    }

    #[test]
    fn test_btree_bindings() {
        let eval = engine(&[Token::variable("y")]);
        let bindings = BTreeMap::from([("y".to_string(), 7.0)]);
        assert_eq!(eval.evaluate(&bindings).value, Some(7.0));
    }

    #[test]
    fn test_stored_variable_fallback() {
        let mut eval = engine(&[Token::variable(STORED_VARIABLE), sym("x²")]);
        eval.set_stored_variable(3.0);
        let result = eval.evaluate(&NoBindings);
        assert_eq!(result.value, Some(9.0));
        assert_eq!(result.description, "(M)²");
    }

    #[test]
    fn test_bindings_win_over_stored_variable() {
        let mut eval = engine(&[Token::variable(STORED_VARIABLE)]);
        eval.set_stored_variable(3.0);
        let bindings = HashMap::from([(STORED_VARIABLE.to_string(), 10.0)]);
        assert_eq!(eval.evaluate(&bindings).value, Some(10.0));
    }

    #[test]
    fn test_variable_resolved_at_evaluation_time() {
        let eval = engine(&[Token::variable("x"), sym("x"), lit(2.0), sym("=")]);
        let one = HashMap::from([("x".to_string(), 1.0)]);
        let five = HashMap::from([("x".to_string(), 5.0)]);
        assert_eq!(eval.evaluate(&one).value, Some(2.0));
        assert_eq!(eval.evaluate(&five).value, Some(10.0));
    }

    // ===== Domain errors =====

    #[test]
    fn test_inverse_of_zero() {
        let result = eval(&[lit(0.0), sym("x⁻¹")]);
        assert_eq!(result.error, Some(DomainError::DivisionByZero));
        assert_eq!(result.error_message().as_deref(), Some("Division by 0"));
        assert_eq!(result.value, Some(f64::INFINITY));
        assert_eq!(result.description, "(0.0)⁻¹");
    }

    #[test]
    fn test_sqrt_of_negative() {
        let result = eval(&[lit(-4.0), sym("√")]);
        assert_eq!(result.error, Some(DomainError::NegativeSquareRoot));
        assert!(result.value.unwrap().is_nan());
        assert_eq!(result.description, "√(-4.0)");
    }

    #[test]
    fn test_division_by_near_zero() {
        let result = eval(&[lit(1.0), sym("÷"), lit(0.0000000001), sym("=")]);
        assert_eq!(result.error, Some(DomainError::DivisionByZero));
        assert!((result.value.unwrap() - 1e10).abs() < 1.0);
        assert_eq!(result.description, "1.0 ÷ 1e-10");
    }

    #[test]
    fn test_division_by_zero_still_computes() {
        let result = eval(&[lit(1.0), sym("÷"), lit(0.0), sym("=")]);
        assert_eq!(result.error, Some(DomainError::DivisionByZero));
        assert_eq!(result.value, Some(f64::INFINITY));
    }

    #[test]
    fn test_division_checked_before_combination() {
        // 0 ÷ 0 combines to NaN; the zero divisor is only visible beforehand
        let result = eval(&[lit(0.0), sym("÷"), lit(0.0), sym("=")]);
        assert_eq!(result.error, Some(DomainError::DivisionByZero));
        assert!(result.value.unwrap().is_nan());
    }

    #[test]
    fn test_division_not_checked_until_resolved() {
        let result = eval(&[lit(1.0), sym("÷"), lit(0.0)]);
        assert!(result.is_pending);
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_ordinary_division_has_no_error() {
        let result = eval(&[lit(1.0), sym("÷"), lit(4.0), sym("=")]);
        assert_eq!(result.value, Some(0.25));
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_error_does_not_stop_fold() {
        let result = eval(&[lit(0.0), sym("x⁻¹"), sym("+"), lit(1.0), sym("=")]);
        assert_eq!(result.error, Some(DomainError::DivisionByZero));
        assert_eq!(result.value, Some(f64::INFINITY));
        assert_eq!(result.description, "(0.0)⁻¹ + 1.0");
    }

    #[test]
    fn test_last_error_wins() {
        let result = eval(&[lit(-1.0), sym("√"), sym("+"), lit(1.0), sym("÷"), lit(0.0), sym("=")]);
        assert_eq!(result.error, Some(DomainError::DivisionByZero));
    }

    #[test]
    fn test_clean_operation_keeps_earlier_error() {
        let result = eval(&[lit(-1.0), sym("√"), lit(4.0), sym("√")]);
        assert_eq!(result.error, Some(DomainError::NegativeSquareRoot));
        assert_eq!(result.value, Some(2.0));
    }

    // ===== Structural anomalies =====

    #[test]
    fn test_unknown_symbol_is_inert() {
        assert_eq!(eval(&[lit(5.0), sym("???")]), eval(&[lit(5.0)]));
    }

    #[test]
    fn test_unknown_symbol_inside_pending() {
        let result = eval(&[lit(5.0), sym("+"), sym("mod"), lit(1.0), sym("=")]);
        assert_eq!(result.value, Some(6.0));
    }

    // ===== Mutation =====

    #[test]
    fn test_undo_last() {
        let mut eval = engine(&[lit(5.0), sym("+"), lit(3.0)]);
        eval.undo_last();
        let result = eval.evaluate(&NoBindings);
        assert!(result.is_pending);
        assert_eq!(result.description, "5.0 + ");
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut eval = Evaluator::new();
        eval.undo_last();
        assert!(eval.history().is_empty());
        assert_eq!(eval.result(), None);
    }

    #[test]
    fn test_undo_does_not_touch_stored_variable() {
        let mut eval = engine(&[Token::variable(STORED_VARIABLE)]);
        eval.set_stored_variable(4.0);
        eval.undo_last();
        assert_eq!(eval.stored_variable(), 4.0);
    }

    #[test]
    fn test_append_entry_points() {
        let mut eval = Evaluator::new();
        eval.append_operand(2.0);
        eval.append_operation("x");
        eval.append_variable("M");
        assert_eq!(
            eval.history().as_slice(),
            &[lit(2.0), sym("x"), Token::variable("M")]
        );
    }

    #[test]
    fn test_convenience_accessors() {
        let eval = engine(&[lit(3.0), sym("x")]);
        assert_eq!(eval.result(), None);
        assert!(eval.is_pending());
        assert_eq!(eval.description(), "3.0 x ");
    }

    #[test]
    fn test_evaluate_is_repeatable() {
        let eval = engine(&[lit(1.0), sym("+"), lit(2.0), sym("=")]);
        assert_eq!(eval.evaluate(&NoBindings), eval.evaluate(&NoBindings));
    }
}
