//! Token history
//!
//! The history only grows or shrinks at the tail. Malformed sequences are legal;
//! they simply fold into a pending or partial state.

use crate::core::Token;
use serde::{Deserialize, Serialize};

/// Ordered log of every token entered so far
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    tokens: Vec<Token>,
}

impl History {
    /// Creates an empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a token at the tail
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Removes and returns the most recent token, if any
    pub fn pop(&mut self) -> Option<Token> {
        self.tokens.pop()
    }

    /// Returns the number of tokens
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if nothing has been entered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the most recent token
    #[must_use]
    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    /// Iterates oldest first
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Returns the tokens as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Token> for History {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}
