//! Property-based tests over randomly generated small grammars
//!
//! Grammars are generated as text over a fixed pool of three nonterminals
//! and three terminals, so every left-hand side is defined and the only
//! possible build failure is a genuine LR(1) conflict.

use lrsim::grammar::first::FirstSets;
use lrsim::{Grammar, Pipeline, Symbol};
use proptest::prelude::*;

fn symbol_pool() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["S", "A", "B", "a", "b", "c"])
}

fn terminal_pool() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["a", "b", "c"])
}

/// Random grammar text where S, A, and B each get one to three
/// alternatives of zero to three symbols.
fn grammar_text() -> impl Strategy<Value = String> {
    let alternatives = || prop::collection::vec(prop::collection::vec(symbol_pool(), 0..=3), 1..=3);
    (
        alternatives(),
        alternatives(),
        alternatives(),
    )
        .prop_map(|(s, a, b)| {
            let mut text = String::new();
            for (lhs, alternatives) in [("S", s), ("A", a), ("B", b)] {
                for alternative in alternatives {
                    if alternative.is_empty() {
                        text.push_str(&format!("{lhs} -> ε\n"));
                    } else {
                        text.push_str(&format!("{lhs} -> {}\n", alternative.join(" ")));
                    }
                }
            }
            text
        })
}

proptest! {
    /// Construction either succeeds or fails with a typed error; it never
    /// panics, loops, or resolves a conflict silently.
    #[test]
    fn construction_terminates(text in grammar_text()) {
        let _ = Pipeline::from_text(&text);
    }

    /// FIRST computation is a fixed point: recomputing yields the same
    /// sets and the same nullability.
    #[test]
    fn first_sets_are_stable(text in grammar_text()) {
        let grammar = Grammar::parse(&text).unwrap();
        let once = FirstSets::compute(&grammar);
        let again = FirstSets::compute(&grammar);

        for nonterminal in grammar.nonterminals() {
            let sorted = |first: &FirstSets| {
                let mut names: Vec<String> = first
                    .first(nonterminal)
                    .into_iter()
                    .flatten()
                    .map(ToString::to_string)
                    .collect();
                names.sort_unstable();
                names
            };
            prop_assert_eq!(sorted(&once), sorted(&again));
            prop_assert_eq!(once.is_nullable(nonterminal), again.is_nullable(nonterminal));
        }
    }

    /// The automaton and table are functions of the grammar alone:
    /// repeated builds agree state for state and cell for cell.
    #[test]
    fn successful_builds_are_deterministic(text in grammar_text()) {
        let (Ok(first_build), Ok(second_build)) =
            (Pipeline::from_text(&text), Pipeline::from_text(&text))
        else {
            return Ok(());
        };

        prop_assert_eq!(
            first_build.automaton().states(),
            second_build.automaton().states()
        );

        let edges = |pipeline: &Pipeline| -> Vec<(usize, Symbol, usize)> {
            pipeline
                .automaton()
                .edges()
                .into_iter()
                .map(|(from, symbol, to)| (from, symbol.clone(), to))
                .collect()
        };
        prop_assert_eq!(edges(&first_build), edges(&second_build));

        let cells = |pipeline: &Pipeline| {
            let mut cells: Vec<String> = pipeline
                .table()
                .actions()
                .map(|(state, lookahead, action)| format!("{state}/{lookahead}/{action}"))
                .collect();
            cells.sort_unstable();
            cells
        };
        prop_assert_eq!(cells(&first_build), cells(&second_build));
    }

    /// Simulation never panics, and an accepted input's final reduction
    /// always rebuilds the start symbol.
    #[test]
    fn accepted_runs_reduce_to_the_start_symbol(
        text in grammar_text(),
        tokens in prop::collection::vec(terminal_pool(), 0..6),
    ) {
        let Ok(pipeline) = Pipeline::from_text(&text) else {
            return Ok(());
        };

        let mut simulation = pipeline.simulate(&tokens.join(" "));
        if simulation.run().is_ok() && simulation.is_accepted() {
            let derivation = simulation.derivation();
            prop_assert!(!derivation.is_empty());
            let last = derivation[derivation.len() - 1];
            prop_assert_eq!(
                pipeline.grammar().productions()[last].lhs.as_str(),
                pipeline.grammar().start_symbol()
            );
        }

        // Stack depth always exceeds the symbol stack by exactly one.
        for entry in simulation.trace() {
            prop_assert_eq!(entry.states.len(), entry.symbols.len() + 1);
        }
    }
}
