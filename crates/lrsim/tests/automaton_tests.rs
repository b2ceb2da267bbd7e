//! Tests for canonical LR(1) collection construction

use lrsim::grammar::first::FirstSets;
use lrsim::{Automaton, Grammar, Lookahead, Lr1Item, Symbol};

/// The textbook canonical-LR example: its collection has exactly ten
/// states.
const CC_GRAMMAR: &str = "S -> C C\nC -> c C | d";

fn build(text: &str) -> (Grammar, Automaton) {
    let grammar = Grammar::parse(text).unwrap();
    let first = FirstSets::compute(&grammar);
    let automaton = Automaton::build(&grammar, &first);
    (grammar, automaton)
}

#[test]
fn cc_grammar_has_ten_states_and_thirteen_edges() {
    let (_, automaton) = build(CC_GRAMMAR);
    assert_eq!(automaton.len(), 10);
    assert_eq!(automaton.edges().len(), 13);
}

#[test]
fn start_state_is_the_closure_of_the_augmented_item() {
    let (grammar, automaton) = build(CC_GRAMMAR);
    let start = automaton.state(automaton.start()).unwrap();

    // [S' → · S, $] plus [S → · C C, $] plus C-productions for c and d.
    assert_eq!(start.len(), 6);
    assert!(start.contains(&Lr1Item::new(0, 0, Lookahead::Eof)));
    let nested_c = grammar.productions_of("C")[0];
    assert!(start.contains(&Lr1Item::new(nested_c, 0, Lookahead::token("c"))));
    assert!(start.contains(&Lr1Item::new(nested_c, 0, Lookahead::token("d"))));
}

#[test]
fn states_with_the_same_core_but_different_lookaheads_stay_separate() {
    let (grammar, automaton) = build(CC_GRAMMAR);

    // Canonical LR(1) keeps two `C → d ·` states apart: one with
    // lookaheads {c, d}, one with {$}.
    let d_production = grammar.productions_of("C")[1];
    let complete_d: Vec<&lrsim::ItemSet> = automaton
        .states()
        .iter()
        .filter(|state| {
            state
                .items()
                .iter()
                .all(|item| item.production == d_production && item.dot == 1)
        })
        .collect();
    assert_eq!(complete_d.len(), 2);
    assert_ne!(complete_d[0], complete_d[1]);
}

#[test]
fn transitions_are_recorded_toward_existing_states_too() {
    let (_, automaton) = build(CC_GRAMMAR);

    // `goto(I, c)` from a `C → c · C` state loops back to itself.
    let looping = automaton
        .transitions()
        .any(|(from, symbol, to)| from == to && *symbol == Symbol::terminal("c"));
    assert!(looping);
}

#[test]
fn construction_is_deterministic() {
    let (_, first_build) = build(CC_GRAMMAR);
    let (_, second_build) = build(CC_GRAMMAR);

    assert_eq!(first_build.len(), second_build.len());
    assert_eq!(first_build.states(), second_build.states());

    let edges = |automaton: &Automaton| -> Vec<(usize, Symbol, usize)> {
        automaton
            .edges()
            .into_iter()
            .map(|(from, symbol, to)| (from, symbol.clone(), to))
            .collect()
    };
    assert_eq!(edges(&first_build), edges(&second_build));
}

#[test]
fn state_count_is_invariant_to_alternative_order() {
    let (_, forward) = build("S -> C C\nC -> c C | d");
    let (_, swapped) = build("S -> C C\nC -> d | c C");
    assert_eq!(forward.len(), swapped.len());
}

#[test]
fn every_nonstart_state_is_some_goto_target() {
    let (_, automaton) = build(CC_GRAMMAR);
    for id in 0..automaton.len() {
        if id == automaton.start() {
            continue;
        }
        assert!(
            automaton.transitions().any(|(_, _, to)| to == id),
            "state {id} is unreachable"
        );
    }
}

#[test]
fn display_labels_states() {
    let (grammar, automaton) = build("S -> a");
    let rendered = automaton.display(&grammar).to_string();
    assert!(rendered.starts_with("I0:"));
    assert!(rendered.contains("[S' → · S, $]"));
    assert!(rendered.contains("[S → a ·, $]"));
}
