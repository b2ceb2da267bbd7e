//! # Shift-Reduce Simulation
//!
//! A caller-driven step machine over the parsing table.
//!
//! A [`Simulation`] owns all mutable state: the state stack, the
//! seen-symbol stack, the cursor into the input token sequence, and the
//! trace recorded so far. Each [`step`](Simulation::step) consults
//! `ACTION[top of stack, current token]` and applies exactly one shift,
//! reduce, accept, or error transition, appending one [`TraceEntry`].
//! External drivers (a test harness, an animation front-end) control
//! pacing by calling `step` as often as they like; cancellation is simply
//! not calling it again. [`run`](Simulation::run) is a thin loop over
//! `step` for callers that want the full trace at once.
//!
//! On error the simulation finishes, but the trace recorded up to the
//! failing step stays valid and inspectable.

use crate::automaton::StateId;
use crate::error::ParseError;
use crate::grammar::{END_MARKER, Grammar, Lookahead};
use crate::table::{Action, ParsingTable};
use compact_str::CompactString;
use std::fmt;

/// What a single step did.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepAction {
    /// The current token was consumed and `state` pushed.
    Shift { token: CompactString, state: StateId },
    /// Production `production` was applied: `popped` symbols were replaced
    /// by `lhs`, and the GOTO target `state` pushed.
    Reduce {
        production: usize,
        lhs: CompactString,
        popped: usize,
        state: StateId,
    },
    /// The input was accepted.
    Accept,
}

/// One snapshot of the simulation, taken after its action was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceEntry {
    /// Step index, starting at 0.
    pub step: usize,
    /// State stack, bottom first.
    pub states: Vec<StateId>,
    /// Seen-symbol stack, bottom first.
    pub symbols: Vec<CompactString>,
    /// Remaining input, end marker included.
    pub remaining: Vec<CompactString>,
    /// The action this step applied.
    pub action: StepAction,
}

impl TraceEntry {
    /// Render the entry with the applied production spelled out.
    #[must_use]
    pub const fn display<'a>(&'a self, grammar: &'a Grammar) -> TraceEntryDisplay<'a> {
        TraceEntryDisplay {
            entry: self,
            grammar,
        }
    }
}

/// Display adapter for [`TraceEntry`].
pub struct TraceEntryDisplay<'a> {
    entry: &'a TraceEntry,
    grammar: &'a Grammar,
}

impl fmt::Display for TraceEntryDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |parts: &[CompactString]| {
            parts
                .iter()
                .map(CompactString::as_str)
                .collect::<Vec<_>>()
                .join(" ")
        };
        let states = self
            .entry
            .states
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");

        write!(
            f,
            "{:>3}.  [{states}]  [{}]  [{}]  ",
            self.entry.step,
            join(&self.entry.symbols),
            join(&self.entry.remaining),
        )?;
        match &self.entry.action {
            StepAction::Shift { token, state } => write!(f, "Shift {token} → {state}"),
            StepAction::Reduce { production, state, .. } => {
                write!(f, "Reduce {production}")?;
                if let Some(p) = self.grammar.production(*production) {
                    write!(f, ": {p}")?;
                }
                write!(f, " (goto {state})")
            }
            StepAction::Accept => f.write_str("Accept"),
        }
    }
}

/// A single in-flight shift-reduce parse over one input sequence.
///
/// Borrows the grammar and table; all mutable state lives here, so any
/// number of simulations can share one table (including concurrently —
/// nothing here is global).
#[derive(Debug, Clone)]
pub struct Simulation<'a> {
    grammar: &'a Grammar,
    table: &'a ParsingTable,
    states: Vec<StateId>,
    symbols: Vec<CompactString>,
    input: Vec<CompactString>,
    cursor: usize,
    trace: Vec<TraceEntry>,
    finished: bool,
}

impl<'a> Simulation<'a> {
    /// Create a simulation over a token sequence. The end marker is
    /// implicit; callers pass terminal names only. The state stack starts
    /// at the automaton's start state (state 0 for this crate's builder).
    #[must_use]
    pub fn new<I>(grammar: &'a Grammar, table: &'a ParsingTable, tokens: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CompactString>,
    {
        Self {
            grammar,
            table,
            states: vec![0],
            symbols: Vec::new(),
            input: tokens.into_iter().map(Into::into).collect(),
            cursor: 0,
            trace: Vec::new(),
            finished: false,
        }
    }

    fn current_state(&self) -> StateId {
        self.states.last().map_or(0, |state| *state)
    }

    fn lookahead(&self) -> Lookahead {
        self.input
            .get(self.cursor)
            .map_or(Lookahead::Eof, |token| Lookahead::Token(token.clone()))
    }

    fn expected(&self, state: StateId) -> Vec<String> {
        self.table
            .expected_lookaheads(state)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn remaining(&self) -> Vec<CompactString> {
        let mut remaining = self.input[self.cursor..].to_vec();
        remaining.push(CompactString::const_new(END_MARKER));
        remaining
    }

    fn record(&mut self, action: StepAction) -> &TraceEntry {
        let index = self.trace.len();
        self.trace.push(TraceEntry {
            step: index,
            states: self.states.clone(),
            symbols: self.symbols.clone(),
            remaining: self.remaining(),
            action,
        });
        &self.trace[index]
    }

    /// Apply one parsing action.
    ///
    /// Returns the trace entry for the applied step, or `None` when the
    /// simulation already finished (accepted or failed) — polling past the
    /// end is harmless.
    ///
    /// # Errors
    ///
    /// [`ParseError::UnexpectedToken`] / [`ParseError::UnexpectedEof`] when
    /// the ACTION cell is empty; the offending position, state, and the
    /// expected lookaheads are included, and the trace recorded so far
    /// remains available.
    pub fn step(&mut self) -> Result<Option<&TraceEntry>, ParseError> {
        if self.finished {
            return Ok(None);
        }

        let state = self.current_state();
        let lookahead = self.lookahead();

        match self.table.action(state, &lookahead) {
            Action::Shift(target) => {
                let Lookahead::Token(token) = lookahead else {
                    // A table built by this crate never shifts on Eof.
                    self.finished = true;
                    return Err(ParseError::UnexpectedEof {
                        position: self.cursor,
                        state,
                        expected: self.expected(state),
                    });
                };
                self.symbols.push(token.clone());
                self.states.push(target);
                self.cursor += 1;
                Ok(Some(self.record(StepAction::Shift {
                    token,
                    state: target,
                })))
            }
            Action::Reduce(index) => {
                let Some(production) = self.grammar.production(index) else {
                    self.finished = true;
                    return Err(ParseError::InvalidProduction {
                        state,
                        production: index,
                    });
                };
                let lhs = production.lhs.clone();
                let popped = production.len();

                self.states.truncate(self.states.len().saturating_sub(popped));
                self.symbols
                    .truncate(self.symbols.len().saturating_sub(popped));

                let top = self.current_state();
                let Some(target) = self.table.goto(top, &lhs) else {
                    self.finished = true;
                    return Err(ParseError::MissingGoto {
                        state: top,
                        nonterminal: lhs,
                    });
                };
                self.symbols.push(lhs.clone());
                self.states.push(target);
                Ok(Some(self.record(StepAction::Reduce {
                    production: index,
                    lhs,
                    popped,
                    state: target,
                })))
            }
            Action::Accept => {
                self.finished = true;
                Ok(Some(self.record(StepAction::Accept)))
            }
            Action::Error => {
                self.finished = true;
                let expected = self.expected(state);
                Err(match lookahead {
                    Lookahead::Token(token) => ParseError::UnexpectedToken {
                        token,
                        position: self.cursor,
                        state,
                        expected,
                    },
                    Lookahead::Eof => ParseError::UnexpectedEof {
                        position: self.cursor,
                        state,
                        expected,
                    },
                })
            }
        }
    }

    /// Drive the simulation to acceptance or error.
    ///
    /// # Errors
    ///
    /// Propagates the first [`ParseError`]; the partial trace remains
    /// accessible through [`trace`](Self::trace).
    pub fn run(&mut self) -> Result<(), ParseError> {
        while self.step()?.is_some() {}
        Ok(())
    }

    /// Whether the simulation has accepted or failed.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the input was accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(
            self.trace.last(),
            Some(TraceEntry {
                action: StepAction::Accept,
                ..
            })
        )
    }

    /// Current input position, in tokens.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.cursor
    }

    /// The trace recorded so far.
    #[must_use]
    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    /// Consume the simulation, keeping only the trace.
    #[must_use]
    pub fn into_trace(self) -> Vec<TraceEntry> {
        self.trace
    }

    /// Production indices applied, in reduction order. This is the
    /// sequence a derivation-tree renderer consumes.
    #[must_use]
    pub fn derivation(&self) -> Vec<usize> {
        self.trace
            .iter()
            .filter_map(|entry| match entry.action {
                StepAction::Reduce { production, .. } => Some(production),
                _ => None,
            })
            .collect()
    }
}
