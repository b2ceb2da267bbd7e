//! End-to-end walkthrough: build every artifact for the classic
//! expression grammar and trace one parse.
//!
//! Run with: `cargo run --example expression`

use lrsim::{Lookahead, Pipeline};

const GRAMMAR: &str = "E -> E + T | T
T -> T * F | F
F -> ( E ) | id";

const INPUT: &str = "id + id * id";

fn main() {
    let pipeline = Pipeline::from_text(GRAMMAR).expect("grammar is LR(1)");
    let grammar = pipeline.grammar();

    println!("Productions:");
    println!("{grammar}");

    println!("\nFIRST sets:");
    let mut nonterminals: Vec<&str> = grammar.nonterminals().collect();
    nonterminals.sort_unstable();
    for nonterminal in nonterminals {
        let mut names: Vec<&str> = pipeline
            .first_sets()
            .first(nonterminal)
            .into_iter()
            .flatten()
            .map(|name| name.as_str())
            .collect();
        names.sort_unstable();
        println!("  FIRST({nonterminal}) = {{{}}}", names.join(", "));
    }

    println!(
        "\nAutomaton: {} states, {} transitions",
        pipeline.automaton().len(),
        pipeline.automaton().edges().len()
    );
    println!("{}", pipeline.automaton().display(grammar));

    println!("Edges:");
    for (from, symbol, to) in pipeline.automaton().edges() {
        println!("  I{from} --{symbol}--> I{to}");
    }

    println!("\nACTION table (sparse):");
    let mut actions: Vec<(usize, Lookahead, String)> = pipeline
        .table()
        .actions()
        .map(|(state, lookahead, action)| (state, lookahead.clone(), action.to_string()))
        .collect();
    actions.sort_unstable_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
    for (state, lookahead, action) in actions {
        println!("  ACTION[I{state}, {lookahead}] = {action}");
    }

    println!("\nTrace for `{INPUT}`:");
    let mut simulation = pipeline.simulate(INPUT);
    while let Some(entry) = simulation.step().expect("input parses") {
        println!("{}", entry.display(grammar));
    }

    println!("\nDerivation (reduction order):");
    for index in simulation.derivation() {
        println!("  {index}. {}", grammar.productions()[index]);
    }
}
