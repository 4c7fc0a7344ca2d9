//! Operation registry
//!
//! Maps keypad symbols to what they do. The table is static and read-only; a
//! symbol missing from it is inert when folded. A second table attaches domain
//! checks to the subset of symbols that can go out of domain.

use crate::core::DomainError;
use rand::Rng;
use std::fmt;

/// Divisors with a smaller magnitude count as zero
pub const DIVISOR_EPSILON: f64 = 1e-8;

/// What a registered symbol does when folded
#[derive(Clone, Copy)]
pub enum Operation {
    /// Named constant, described by its symbol
    Constant(f64),
    /// Zero-argument generator, described by its formatted value
    Nullary(fn() -> f64),
    /// One-argument transform of the accumulator
    Unary {
        /// Value transform
        apply: fn(f64) -> f64,
        /// Description rule applied to the operand text
        describe: fn(&str) -> String,
    },
    /// Two-argument transform, deferred until the right operand is known
    Binary {
        /// Value combination (left, right)
        apply: fn(f64, f64) -> f64,
        /// Infix description rule (left text, right text)
        describe: fn(&str, &str) -> String,
    },
    /// Completes the pending binary operation
    Equals,
}

/// Operation arity, used for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Constant
    Constant,
    /// Nullary generator
    Nullary,
    /// Unary transform
    Unary,
    /// Binary transform
    Binary,
    /// Terminator
    Equals,
}

impl OperationKind {
    /// Lower-case name for display
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Nullary => "nullary",
            Self::Unary => "unary",
            Self::Binary => "binary",
            Self::Equals => "equals",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Nullary(_) => f.write_str("Nullary"),
            Self::Unary { .. } => f.write_str("Unary"),
            Self::Binary { .. } => f.write_str("Binary"),
            Self::Equals => f.write_str("Equals"),
        }
    }
}

static OPERATIONS: &[(&str, Operation)] = &[
    ("π", Operation::Constant(std::f64::consts::PI)),
    ("e", Operation::Constant(std::f64::consts::E)),
    ("rand", Operation::Nullary(random_unit)),
    (
        "√",
        Operation::Unary {
            apply: f64::sqrt,
            describe: |x| format!("√({x})"),
        },
    ),
    (
        "cos",
        Operation::Unary {
            apply: f64::cos,
            describe: |x| format!("cos({x})"),
        },
    ),
    (
        "sin",
        Operation::Unary {
            apply: f64::sin,
            describe: |x| format!("sin({x})"),
        },
    ),
    (
        "tan",
        Operation::Unary {
            apply: f64::tan,
            describe: |x| format!("tan({x})"),
        },
    ),
    (
        "+/-",
        Operation::Unary {
            apply: |x| -x,
            describe: |x| format!("-({x})"),
        },
    ),
    (
        "x⁻¹",
        Operation::Unary {
            apply: |x| 1.0 / x,
            describe: |x| format!("({x})⁻¹"),
        },
    ),
    (
        "x²",
        Operation::Unary {
            apply: |x| x * x,
            describe: |x| format!("({x})²"),
        },
    ),
    (
        "%",
        Operation::Unary {
            apply: |x| x / 100.0,
            describe: |x| format!("%({x})"),
        },
    ),
    (
        "x",
        Operation::Binary {
            apply: |a, b| a * b,
            describe: |a, b| format!("{a} x {b}"),
        },
    ),
    (
        "÷",
        Operation::Binary {
            apply: |a, b| a / b,
            describe: |a, b| format!("{a} ÷ {b}"),
        },
    ),
    (
        "-",
        Operation::Binary {
            apply: |a, b| a - b,
            describe: |a, b| format!("{a} - {b}"),
        },
    ),
    (
        "+",
        Operation::Binary {
            apply: |a, b| a + b,
            describe: |a, b| format!("{a} + {b}"),
        },
    ),
    (
        "xʸ",
        Operation::Binary {
            apply: f64::powf,
            describe: |a, b| format!("({a}) ^ {b}"),
        },
    ),
    ("=", Operation::Equals),
];

fn random_unit() -> f64 {
    rand::thread_rng().gen::<f64>()
}

impl Operation {
    /// Looks up the operation registered under `symbol`.
    ///
    /// Matching is exact: case and glyph sensitive.
    #[must_use]
    pub fn lookup(symbol: &str) -> Option<Self> {
        OPERATIONS
            .iter()
            .find(|(name, _)| *name == symbol)
            .map(|(_, op)| *op)
    }

    /// Every registered symbol, in keypad order
    pub fn symbols() -> impl Iterator<Item = &'static str> {
        OPERATIONS.iter().map(|(name, _)| *name)
    }

    /// Returns the arity class of this operation
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::Constant(_) => OperationKind::Constant,
            Self::Nullary(_) => OperationKind::Nullary,
            Self::Unary { .. } => OperationKind::Unary,
            Self::Binary { .. } => OperationKind::Binary,
            Self::Equals => OperationKind::Equals,
        }
    }
}

/// Domain predicate attached to a registered symbol
#[derive(Clone, Copy)]
pub enum DomainCheck {
    /// Checked against the operand of a unary operation
    Unary(fn(f64) -> Option<DomainError>),
    /// Checked against (left, right) before a binary operation combines them
    Binary(fn(f64, f64) -> Option<DomainError>),
}

impl fmt::Debug for DomainCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unary(_) => f.write_str("DomainCheck::Unary"),
            Self::Binary(_) => f.write_str("DomainCheck::Binary"),
        }
    }
}

static DOMAIN_CHECKS: &[(&str, DomainCheck)] = &[
    (
        "√",
        DomainCheck::Unary(|x| {
            if x < 0.0 {
                Some(DomainError::NegativeSquareRoot)
            } else {
                None
            }
        }),
    ),
    (
        "x⁻¹",
        DomainCheck::Unary(|x| {
            if x == 0.0 {
                Some(DomainError::DivisionByZero)
            } else {
                None
            }
        }),
    ),
    (
        "÷",
        DomainCheck::Binary(|_, divisor| {
            if divisor.abs() < DIVISOR_EPSILON {
                Some(DomainError::DivisionByZero)
            } else {
                None
            }
        }),
    ),
];

impl DomainCheck {
    /// Looks up the domain check registered under `symbol`
    #[must_use]
    pub fn lookup(symbol: &str) -> Option<Self> {
        DOMAIN_CHECKS
            .iter()
            .find(|(name, _)| *name == symbol)
            .map(|(_, check)| *check)
    }

    /// Runs a unary check; binary checks never fire here
    #[must_use]
    pub fn check_unary(&self, operand: f64) -> Option<DomainError> {
        match self {
            Self::Unary(check) => check(operand),
            Self::Binary(_) => None,
        }
    }

    /// Runs a binary check; unary checks never fire here
    #[must_use]
    pub fn check_binary(&self, left: f64, right: f64) -> Option<DomainError> {
        match self {
            Self::Binary(check) => check(left, right),
            Self::Unary(_) => None,
        }
    }
}
