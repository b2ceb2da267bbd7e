//! # Error Types
//!
//! Typed errors for grammar construction and simulation.
//!
//! Construction-time failures (`GrammarError`, [`ConflictError`],
//! `BuildError`) are reported before any parsing attempt; run-time failures
//! (`ParseError`) halt a simulation at the failing step while leaving the
//! trace recorded so far valid and inspectable. Every error carries the
//! context (line, state, token, position) needed for display without
//! re-deriving internal state.
//!
//! When the `diagnostics` feature is enabled, errors additionally derive
//! `miette::Diagnostic` with stable error codes.

use crate::automaton::StateId;
use crate::table::ConflictError;
use compact_str::CompactString;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Errors raised while turning grammar text (or builder input) into a
/// [`Grammar`](crate::grammar::Grammar).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum GrammarError {
    /// A malformed production line: missing arrow, empty or multi-token
    /// left-hand side, or a reserved symbol used on the right-hand side.
    #[error("syntax error on line {line}: {message}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::syntax)))]
    Syntax { line: usize, message: String },

    /// A nonterminal is referenced on a right-hand side (or as the start
    /// symbol) but never appears as a left-hand side.
    #[error("undefined nonterminal `{symbol}` has no production")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::undefined_symbol)))]
    UndefinedSymbol { symbol: CompactString },

    /// A symbol was declared terminal but also has productions of its own.
    #[error("symbol `{symbol}` is marked terminal but appears as a left-hand side")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::terminal_shadowed)))]
    TerminalShadowed { symbol: CompactString },

    /// The grammar contains no productions at all.
    #[error("grammar contains no productions")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::empty)))]
    Empty,
}

impl GrammarError {
    /// Create a syntax error for the given 1-based line number.
    #[must_use]
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Create an undefined-symbol error.
    #[must_use]
    pub fn undefined(symbol: impl Into<CompactString>) -> Self {
        Self::UndefinedSymbol {
            symbol: symbol.into(),
        }
    }
}

/// Any error that can abort the construction pipeline, from text to table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum BuildError {
    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Conflict(#[from] ConflictError),
}

/// Run-time errors raised by a [`Simulation`](crate::simulate::Simulation)
/// step. No recovery is attempted; the simulation is finished once one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum ParseError {
    /// The current input token has no action in the current state.
    #[error("unexpected token `{token}` at position {position} in state {state}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parse::unexpected_token)))]
    UnexpectedToken {
        token: CompactString,
        position: usize,
        state: StateId,
        expected: Vec<String>,
    },

    /// Input ran out while the current state still expected more tokens.
    #[error("unexpected end of input at position {position} in state {state}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parse::unexpected_eof)))]
    UnexpectedEof {
        position: usize,
        state: StateId,
        expected: Vec<String>,
    },

    /// A reduction found no GOTO entry for the new top state. Cannot occur
    /// for tables produced by this crate's builder; reported instead of
    /// panicking when simulating against a foreign table.
    #[error("no GOTO entry for nonterminal `{nonterminal}` in state {state}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parse::missing_goto)))]
    MissingGoto {
        state: StateId,
        nonterminal: CompactString,
    },

    /// A reduce action referenced a production index the grammar does not
    /// have. As with `MissingGoto`, only a table/grammar mismatch can
    /// produce this.
    #[error("reduce action references unknown production {production} in state {state}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parse::invalid_production)))]
    InvalidProduction { state: StateId, production: usize },
}

impl ParseError {
    /// Input position (in tokens) at which the simulation failed.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::UnexpectedToken { position, .. } | Self::UnexpectedEof { position, .. } => {
                Some(*position)
            }
            Self::MissingGoto { .. } | Self::InvalidProduction { .. } => None,
        }
    }

    /// The automaton state in which the failure occurred.
    #[must_use]
    pub const fn state(&self) -> StateId {
        match self {
            Self::UnexpectedToken { state, .. }
            | Self::UnexpectedEof { state, .. }
            | Self::MissingGoto { state, .. }
            | Self::InvalidProduction { state, .. } => *state,
        }
    }

    /// Format the expected lookaheads as a human-readable string.
    #[must_use]
    pub fn format_expected(&self) -> String {
        match self {
            Self::UnexpectedToken { expected, .. } | Self::UnexpectedEof { expected, .. } => {
                Self::format_expected_list(expected)
            }
            Self::MissingGoto { .. } | Self::InvalidProduction { .. } => String::new(),
        }
    }

    /// Format a list of expected tokens as a human-readable string.
    #[must_use]
    pub fn format_expected_list(expected: &[String]) -> String {
        match expected.len() {
            0 => "nothing".to_string(),
            1 => expected[0].clone(),
            2 => format!("{} or {}", expected[0], expected[1]),
            _ => {
                let mut result = expected[..expected.len() - 1].join(", ");
                result.push_str(", or ");
                result.push_str(&expected[expected.len() - 1]);
                result
            }
        }
    }
}
