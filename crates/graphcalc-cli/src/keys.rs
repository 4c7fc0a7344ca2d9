//! Word-to-key mapping
//!
//! Each command-line word stands for one calculator key. Anything that is not a
//! number or one of the memory/editing keys is passed through as an operation
//! symbol, so unknown words end up as inert tokens.

use graphcalc::prelude::{Session, STORED_VARIABLE};
use tracing::debug;

/// One key press
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    /// Numeric operand
    Operand(f64),
    /// Operation symbol, registered or not
    Operation(String),
    /// `M`: reference the memory slot
    RecallMemory,
    /// `→M` / `->M`: store the current value in memory
    StoreMemory,
    /// `MC`: forget memory
    ClearMemory,
    /// `C`: start over
    Clear,
    /// `undo`: remove the last input
    Undo,
    /// `$name`: reference a bound variable
    Variable(String),
}

impl Key {
    /// Classify a single word
    #[must_use]
    pub fn parse(word: &str) -> Self {
        if let Ok(value) = word.parse::<f64>() {
            return Self::Operand(value);
        }
        match word {
            STORED_VARIABLE => Self::RecallMemory,
            "→M" | "->M" => Self::StoreMemory,
            "MC" => Self::ClearMemory,
            "C" => Self::Clear,
            "undo" => Self::Undo,
            _ => match word.strip_prefix('$') {
                Some(name) if !name.is_empty() => Self::Variable(name.to_string()),
                _ => Self::Operation(word.to_string()),
            },
        }
    }

    /// Apply this key to a session
    pub fn press(&self, session: &mut Session) {
        debug!(key = ?self, "press");
        match self {
            Self::Operand(value) => session.enter_operand(*value),
            Self::Operation(symbol) => session.enter_operation(symbol),
            Self::RecallMemory => session.recall_memory(),
            Self::StoreMemory => {
                let value = session.current_value();
                session.store_memory(value);
            }
            Self::ClearMemory => session.clear_memory(),
            Self::Clear => session.clear(),
            Self::Undo => session.undo(),
            Self::Variable(name) => session.recall_variable(name),
        }
    }
}

/// Split a line into words and press each one
pub fn press_line(session: &mut Session, line: &str) {
    for word in line.split_whitespace() {
        Key::parse(word).press(session);
    }
}
