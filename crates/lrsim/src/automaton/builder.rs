//! Canonical collection construction: closure, goto, worklist.

use crate::automaton::{Automaton, ItemSet, Lr1Item, StateId};
use crate::grammar::first::FirstSets;
use crate::grammar::{Grammar, Lookahead, Symbol};
use hashbrown::{HashMap, HashSet};
use std::collections::BTreeSet;

/// Closure of a set of LR(1) items, computed iteratively with an explicit
/// worklist. For every `[A → α · B β, a]` and every production `B → γ`,
/// the items `[B → · γ, b]` are added for each `b ∈ FIRST(βa)`, until
/// nothing new appears. De-duplication is on the exact
/// (production, dot, lookahead) triple.
pub(crate) fn closure(
    seed: impl IntoIterator<Item = Lr1Item>,
    grammar: &Grammar,
    first: &FirstSets,
) -> ItemSet {
    let mut items: HashSet<Lr1Item, ahash::RandomState> = seed.into_iter().collect();
    let mut work: Vec<Lr1Item> = items.iter().cloned().collect();

    while let Some(item) = work.pop() {
        let Some(Symbol::Nonterminal(next)) = item.next_symbol(grammar) else {
            continue;
        };
        let rhs = &grammar.productions()[item.production].rhs;
        let beta = &rhs[item.dot + 1..];
        let lookaheads = first.first_of_sequence(beta, &item.lookahead);

        for &target in grammar.productions_of(next) {
            for lookahead in &lookaheads {
                let candidate = Lr1Item::new(target, 0, lookahead.clone());
                if items.insert(candidate.clone()) {
                    work.push(candidate);
                }
            }
        }
    }

    ItemSet::new(items)
}

/// Goto: advance every item whose dot reads `symbol`, then take the
/// closure. `None` when no item reads the symbol.
pub(crate) fn goto(
    state: &ItemSet,
    symbol: &Symbol,
    grammar: &Grammar,
    first: &FirstSets,
) -> Option<ItemSet> {
    let advanced: Vec<Lr1Item> = state
        .items()
        .iter()
        .filter(|item| item.next_symbol(grammar) == Some(symbol))
        .map(Lr1Item::advanced)
        .collect();

    if advanced.is_empty() {
        None
    } else {
        Some(closure(advanced, grammar, first))
    }
}

/// Symbols read by any item of the state, in sorted order so that state
/// numbering is deterministic.
fn transition_symbols(state: &ItemSet, grammar: &Grammar) -> BTreeSet<Symbol> {
    state
        .items()
        .iter()
        .filter_map(|item| item.next_symbol(grammar))
        .cloned()
        .collect()
}

/// The canonical collection. State 0 is `closure({[S' → · S, $]})`; new
/// goto targets are appended unless an existing state is set-equal; the
/// transition edge is recorded either way. The item universe is finite,
/// so the worklist drains.
pub(crate) fn build(grammar: &Grammar, first: &FirstSets) -> Automaton {
    let initial = closure([Lr1Item::new(0, 0, Lookahead::Eof)], grammar, first);

    let mut states = vec![initial.clone()];
    let mut ids: HashMap<ItemSet, StateId, ahash::RandomState> = HashMap::default();
    ids.insert(initial, 0);
    let mut transitions: HashMap<(StateId, Symbol), StateId, ahash::RandomState> =
        HashMap::default();

    let mut current = 0;
    while current < states.len() {
        let state = states[current].clone();
        for symbol in transition_symbols(&state, grammar) {
            let Some(next) = goto(&state, &symbol, grammar, first) else {
                continue;
            };
            let id = if let Some(&existing) = ids.get(&next) {
                existing
            } else {
                let id = states.len();
                states.push(next.clone());
                ids.insert(next, id);
                id
            };
            transitions.insert((current, symbol), id);
        }
        current += 1;
    }

    Automaton::from_parts(states, transitions, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence_grammar() -> (Grammar, FirstSets) {
        let grammar = Grammar::parse("S -> A B\nA -> a\nB -> b").unwrap();
        let first = FirstSets::compute(&grammar);
        (grammar, first)
    }

    #[test]
    fn closure_is_idempotent() {
        let (grammar, first) = sequence_grammar();
        let once = closure([Lr1Item::new(0, 0, Lookahead::Eof)], &grammar, &first);
        let twice = closure(once.items().iter().cloned(), &grammar, &first);
        assert_eq!(once, twice);
    }

    #[test]
    fn start_closure_pulls_in_reachable_items() {
        let (grammar, first) = sequence_grammar();
        let start = closure([Lr1Item::new(0, 0, Lookahead::Eof)], &grammar, &first);
        // [S' → · S, $], [S → · A B, $], [A → · a, b]
        assert_eq!(start.len(), 3);
        assert!(start.contains(&Lr1Item::new(0, 0, Lookahead::Eof)));
        assert!(start.contains(&Lr1Item::new(3, 0, Lookahead::Eof)));
        assert!(start.contains(&Lr1Item::new(1, 0, Lookahead::token("b"))));
    }

    #[test]
    fn goto_advances_over_one_symbol() {
        let (grammar, first) = sequence_grammar();
        let start = closure([Lr1Item::new(0, 0, Lookahead::Eof)], &grammar, &first);

        let over_a = goto(&start, &Symbol::terminal("a"), &grammar, &first).unwrap();
        assert_eq!(over_a.items(), &[Lr1Item::new(1, 1, Lookahead::token("b"))]);

        assert!(goto(&start, &Symbol::terminal("b"), &grammar, &first).is_none());
    }

    #[test]
    fn canonical_collection_has_expected_shape() {
        let (grammar, first) = sequence_grammar();
        let automaton = build(&grammar, &first);
        assert_eq!(automaton.len(), 6);
        assert_eq!(automaton.start(), 0);

        // Every recorded edge target exists and goto reproduces it.
        for (from, symbol, to) in automaton.transitions() {
            let state = automaton.state(from).unwrap();
            let target = goto(state, symbol, &grammar, &first).unwrap();
            assert_eq!(automaton.state(to).unwrap(), &target);
        }
    }

    #[test]
    fn duplicate_states_are_merged() {
        let (grammar, first) = sequence_grammar();
        let automaton = build(&grammar, &first);
        for (i, a) in automaton.states().iter().enumerate() {
            for b in &automaton.states()[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
