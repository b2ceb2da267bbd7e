//! Export the artifacts a visualization front-end consumes as JSON:
//! the automaton node list, the edge list, the sparse tables, and a
//! parse trace.
//!
//! Run with: `cargo run --example export_json --features serde`

use lrsim::{Pipeline, Symbol};
use serde::Serialize;

#[derive(Serialize)]
struct Export<'a> {
    productions: Vec<String>,
    states: &'a [lrsim::ItemSet],
    edges: Vec<(usize, &'a Symbol, usize)>,
    actions: Vec<(usize, String, String)>,
    gotos: Vec<(usize, &'a str, usize)>,
    trace: &'a [lrsim::TraceEntry],
    derivation: Vec<usize>,
}

fn main() {
    let pipeline = Pipeline::from_text("S -> A B\nA -> a\nB -> b").expect("grammar is LR(1)");
    let mut simulation = pipeline.simulate("a b");
    simulation.run().expect("input parses");

    let export = Export {
        productions: pipeline
            .grammar()
            .productions()
            .iter()
            .map(ToString::to_string)
            .collect(),
        states: pipeline.automaton().states(),
        edges: pipeline.automaton().edges(),
        actions: pipeline
            .table()
            .actions()
            .map(|(state, lookahead, action)| {
                (state, lookahead.to_string(), action.to_string())
            })
            .collect(),
        gotos: pipeline.table().gotos().collect(),
        trace: simulation.trace(),
        derivation: simulation.derivation(),
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&export).expect("artifacts serialize")
    );
}
