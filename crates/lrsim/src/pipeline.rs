//! One-shot construction pipeline.
//!
//! Runs every construction stage once — grammar → FIRST sets → automaton
//! → parsing table — and keeps the derived immutable artifacts together so
//! repeated simulations reuse them. Each stage consumes only the output of
//! the previous one; a failure in any stage aborts with a typed
//! [`BuildError`] before any parsing is attempted.

use crate::automaton::Automaton;
use crate::error::BuildError;
use crate::grammar::Grammar;
use crate::grammar::first::FirstSets;
use crate::simulate::Simulation;
use crate::table::ParsingTable;

/// Grammar plus all artifacts derived from it, built once and immutable.
#[derive(Debug, Clone)]
pub struct Pipeline {
    grammar: Grammar,
    first: FirstSets,
    automaton: Automaton,
    table: ParsingTable,
}

impl Pipeline {
    /// Build every artifact for a grammar.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Conflict`] when the grammar is not LR(1) —
    /// the table builder found a shift-reduce or reduce-reduce conflict.
    pub fn new(grammar: Grammar) -> Result<Self, BuildError> {
        let first = FirstSets::compute(&grammar);
        let automaton = Automaton::build(&grammar, &first);
        let table = ParsingTable::build(&grammar, &automaton)?;
        Ok(Self {
            grammar,
            first,
            automaton,
            table,
        })
    }

    /// Parse grammar text and build every artifact.
    ///
    /// # Errors
    ///
    /// [`BuildError::Grammar`] for malformed text, [`BuildError::Conflict`]
    /// for non-LR(1) grammars.
    pub fn from_text(text: &str) -> Result<Self, BuildError> {
        Self::new(Grammar::parse(text)?)
    }

    #[must_use]
    pub const fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    #[must_use]
    pub const fn first_sets(&self) -> &FirstSets {
        &self.first
    }

    #[must_use]
    pub const fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    #[must_use]
    pub const fn table(&self) -> &ParsingTable {
        &self.table
    }

    /// Start a simulation over a whitespace-separated token sequence.
    ///
    /// The returned [`Simulation`] borrows the cached table; any number of
    /// simulations can be spawned from one pipeline.
    #[must_use]
    pub fn simulate(&self, input: &str) -> Simulation<'_> {
        Simulation::new(&self.grammar, &self.table, input.split_whitespace())
    }
}
