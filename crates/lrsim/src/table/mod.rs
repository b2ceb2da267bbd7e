//! # Parsing Table
//!
//! ACTION and GOTO tables derived from the LR(1) automaton.
//!
//! The tables are sparse maps; a missing ACTION cell reads as
//! [`Action::Error`]. Construction is deterministic given the automaton,
//! and any competing pair of actions for one cell aborts construction with
//! a [`ConflictError`] — this generator never resolves conflicts silently,
//! so ambiguous grammars are rejected up front.

use crate::automaton::{Automaton, StateId};
use crate::grammar::{Grammar, Lookahead, Symbol};
use compact_str::CompactString;
use hashbrown::HashMap;
use std::fmt;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// A parsing decision for one `(state, lookahead)` cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Consume the token and move to the state.
    Shift(StateId),
    /// Apply the production with this index.
    Reduce(usize),
    /// Input accepted.
    Accept,
    /// No action defined.
    Error,
}

impl fmt::Display for Action {
    /// Compact table-cell rendering: `s3`, `r2`, `acc`, or blank.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shift(state) => write!(f, "s{state}"),
            Self::Reduce(production) => write!(f, "r{production}"),
            Self::Accept => f.write_str("acc"),
            Self::Error => Ok(()),
        }
    }
}

/// Which kind of table conflict was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShiftReduce => f.write_str("shift-reduce"),
            Self::ReduceReduce => f.write_str("reduce-reduce"),
        }
    }
}

/// Two mutually exclusive actions were assigned to the same ACTION cell.
///
/// Carries the state, the lookahead, and both competing actions so the
/// conflict can be displayed without re-deriving the automaton.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
#[cfg_attr(feature = "diagnostics", diagnostic(code(table::conflict)))]
#[error("{kind} conflict in state {state} on `{lookahead}`: {existing} vs {attempted}")]
pub struct ConflictError {
    pub state: StateId,
    pub lookahead: Lookahead,
    pub existing: Action,
    pub attempted: Action,
    pub kind: ConflictKind,
}

type ActionTable = HashMap<(StateId, Lookahead), Action, ahash::RandomState>;
type GotoTable = HashMap<(StateId, CompactString), StateId, ahash::RandomState>;

/// The immutable ACTION/GOTO table for one grammar. Built once, reused
/// across any number of simulations.
#[derive(Debug, Clone)]
pub struct ParsingTable {
    action: ActionTable,
    goto: GotoTable,
    num_states: usize,
}

impl ParsingTable {
    /// Derive the table from an automaton.
    ///
    /// For every state: items with a terminal after the dot become shifts
    /// along the recorded transition; complete items become reductions on
    /// their lookahead; the complete augmented item becomes accept on end
    /// of input; nonterminal transitions fill the GOTO table.
    ///
    /// # Errors
    ///
    /// Returns a [`ConflictError`] for the first cell that would hold two
    /// different actions. No resolution policy is applied.
    pub fn build(grammar: &Grammar, automaton: &Automaton) -> Result<Self, ConflictError> {
        let mut action: ActionTable = HashMap::default();
        let mut goto: GotoTable = HashMap::default();

        for (state_id, state) in automaton.states().iter().enumerate() {
            for item in state {
                match item.next_symbol(grammar) {
                    Some(symbol @ Symbol::Terminal(name)) => {
                        if let Some(target) = automaton.transition(state_id, symbol) {
                            Self::insert_action(
                                &mut action,
                                state_id,
                                Lookahead::Token(name.clone()),
                                Action::Shift(target),
                            )?;
                        }
                    }
                    Some(symbol @ Symbol::Nonterminal(name)) => {
                        // Goto conflicts are impossible: the transition map
                        // holds one target per (state, symbol).
                        if let Some(target) = automaton.transition(state_id, symbol) {
                            goto.insert((state_id, name.clone()), target);
                        }
                    }
                    None => {
                        let decided = if item.production == 0 {
                            Action::Accept
                        } else {
                            Action::Reduce(item.production)
                        };
                        Self::insert_action(
                            &mut action,
                            state_id,
                            item.lookahead.clone(),
                            decided,
                        )?;
                    }
                }
            }
        }

        Ok(Self {
            action,
            goto,
            num_states: automaton.len(),
        })
    }

    fn insert_action(
        table: &mut ActionTable,
        state: StateId,
        lookahead: Lookahead,
        attempted: Action,
    ) -> Result<(), ConflictError> {
        match table.get(&(state, lookahead.clone())) {
            None => {
                table.insert((state, lookahead), attempted);
                Ok(())
            }
            Some(existing) if *existing == attempted => Ok(()),
            Some(existing) => {
                let kind = if matches!(existing, Action::Shift(_))
                    || matches!(attempted, Action::Shift(_))
                {
                    ConflictKind::ShiftReduce
                } else {
                    ConflictKind::ReduceReduce
                };
                Err(ConflictError {
                    state,
                    lookahead,
                    existing: existing.clone(),
                    attempted,
                    kind,
                })
            }
        }
    }

    /// The action for a state and lookahead; unset cells are
    /// [`Action::Error`].
    #[must_use]
    pub fn action(&self, state: StateId, lookahead: &Lookahead) -> Action {
        self.action
            .get(&(state, lookahead.clone()))
            .cloned()
            .unwrap_or(Action::Error)
    }

    /// The GOTO target for a state and nonterminal, if defined.
    #[must_use]
    pub fn goto(&self, state: StateId, nonterminal: &str) -> Option<StateId> {
        self.goto
            .get(&(state, CompactString::from(nonterminal)))
            .copied()
    }

    /// Lookaheads with a defined action in the given state, sorted. Used
    /// for error reporting.
    #[must_use]
    pub fn expected_lookaheads(&self, state: StateId) -> Vec<Lookahead> {
        let mut expected: Vec<Lookahead> = self
            .action
            .keys()
            .filter(|(s, _)| *s == state)
            .map(|(_, lookahead)| lookahead.clone())
            .collect();
        expected.sort_unstable();
        expected
    }

    /// Iterate all defined ACTION cells (the sparse mapping).
    pub fn actions(&self) -> impl Iterator<Item = (StateId, &Lookahead, &Action)> {
        self.action
            .iter()
            .map(|((state, lookahead), action)| (*state, lookahead, action))
    }

    /// Iterate all defined GOTO cells (the sparse mapping).
    pub fn gotos(&self) -> impl Iterator<Item = (StateId, &str, StateId)> {
        self.goto
            .iter()
            .map(|((state, nonterminal), target)| (*state, nonterminal.as_str(), *target))
    }

    /// Number of automaton states the table was built for.
    #[must_use]
    pub const fn num_states(&self) -> usize {
        self.num_states
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::first::FirstSets;

    fn build_table(text: &str) -> Result<(Grammar, Automaton, ParsingTable), ConflictError> {
        let grammar = Grammar::parse(text).unwrap();
        let first = FirstSets::compute(&grammar);
        let automaton = Automaton::build(&grammar, &first);
        ParsingTable::build(&grammar, &automaton).map(|table| (grammar, automaton, table))
    }

    #[test]
    fn sequence_grammar_table_cells() {
        let (_, automaton, table) = build_table("S -> A B\nA -> a\nB -> b").unwrap();
        let start = automaton.start();

        let a = Lookahead::token("a");
        let Action::Shift(after_a) = table.action(start, &a) else {
            panic!("expected shift on `a`");
        };
        // After shifting `a`, lookahead `b` forces the reduce A → a.
        assert_eq!(table.action(after_a, &Lookahead::token("b")), Action::Reduce(1));

        let over_s = table.goto(start, "S").unwrap();
        assert_eq!(table.action(over_s, &Lookahead::Eof), Action::Accept);

        // Unset cells read as errors.
        assert_eq!(table.action(start, &Lookahead::Eof), Action::Error);
    }

    #[test]
    fn repeated_builds_are_identical() {
        let (_, _, first_build) = build_table("S -> A B\nA -> a\nB -> b").unwrap();
        let (_, _, second_build) = build_table("S -> A B\nA -> a\nB -> b").unwrap();
        assert_eq!(first_build.num_states(), second_build.num_states());

        let collect = |table: &ParsingTable| {
            let mut cells: Vec<(StateId, Lookahead, Action)> = table
                .actions()
                .map(|(s, l, a)| (s, l.clone(), a.clone()))
                .collect();
            cells.sort_unstable_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
            cells
        };
        assert_eq!(collect(&first_build), collect(&second_build));
    }

    #[test]
    fn dangling_else_is_a_shift_reduce_conflict() {
        let err = build_table("S -> i S e S | i S | x").unwrap_err();
        assert_eq!(err.kind, ConflictKind::ShiftReduce);
        assert_eq!(err.lookahead, Lookahead::token("e"));
    }

    #[test]
    fn identical_reductions_in_one_cell_are_a_reduce_reduce_conflict() {
        let err = build_table("S -> A | B\nA -> a\nB -> a").unwrap_err();
        assert_eq!(err.kind, ConflictKind::ReduceReduce);
        assert_eq!(err.lookahead, Lookahead::Eof);
    }

    #[test]
    fn conflict_error_names_state_and_actions() {
        let err = build_table("S -> i S e S | i S | x").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("shift-reduce conflict"));
        assert!(message.contains(&format!("state {}", err.state)));
    }

    #[test]
    fn expected_lookaheads_are_sorted_and_complete() {
        let (_, automaton, table) = build_table("S -> A B\nA -> a\nB -> b").unwrap();
        let expected = table.expected_lookaheads(automaton.start());
        assert_eq!(expected, vec![Lookahead::token("a")]);
    }
}
