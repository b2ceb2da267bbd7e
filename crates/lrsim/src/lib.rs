//! # lrsim
//!
//! Canonical LR(1) automaton and parsing-table construction with a
//! step-wise shift-reduce trace engine.
//!
//! ## Overview
//!
//! `lrsim` turns a textual context-free grammar into the full set of
//! artifacts a parsing visualizer needs:
//!
//! - **Grammar**: typed, numbered productions, augmented with `S' → S`
//! - **FIRST sets**: fixed-point computation with nullability tracking
//! - **Automaton**: canonical LR(1) item sets and transitions
//! - **Parsing table**: sparse ACTION/GOTO with hard conflict reporting
//! - **Simulation**: caller-driven stepping with an inspectable trace and
//!   derivation sequence
//!
//! Every stage is a pure function of the previous one's immutable output;
//! ambiguous grammars are rejected at table-construction time instead of
//! being resolved silently.
//!
//! ## Quick Start
//!
//! ```rust
//! use lrsim::{Pipeline, StepAction};
//!
//! let pipeline = Pipeline::from_text(
//!     "S -> A B
//!      A -> a
//!      B -> b",
//! )
//! .expect("grammar is LR(1)");
//!
//! // The canonical collection and table are built once and cached.
//! assert_eq!(pipeline.automaton().len(), 6);
//!
//! // Simulations borrow the cached artifacts; drive one to completion.
//! let mut simulation = pipeline.simulate("a b");
//! simulation.run().expect("input parses");
//! assert!(simulation.is_accepted());
//!
//! // Reductions in the order they were applied, for tree rendering.
//! let applied: Vec<String> = simulation
//!     .derivation()
//!     .into_iter()
//!     .map(|index| pipeline.grammar().productions()[index].to_string())
//!     .collect();
//! assert_eq!(applied, ["A → a", "B → b", "S → A B"]);
//! # let _ = StepAction::Accept;
//! ```
//!
//! Stepping manually instead of running to completion is what an animated
//! front-end does:
//!
//! ```rust
//! # use lrsim::Pipeline;
//! let pipeline = Pipeline::from_text("S -> a").unwrap();
//! let mut simulation = pipeline.simulate("a");
//! while let Some(entry) = simulation.step().unwrap() {
//!     println!("{}", entry.display(pipeline.grammar()));
//! }
//! ```
//!
//! ## Modules
//!
//! - [`grammar`] - Grammar parsing, building, and FIRST sets
//! - [`automaton`] - LR(1) items, item sets, canonical collection
//! - [`table`] - ACTION/GOTO table and conflict detection
//! - [`simulate`] - Step-wise shift-reduce simulation and tracing
//! - [`pipeline`] - One-shot construction of all artifacts
//! - [`error`] - Typed construction and runtime errors

pub mod automaton;
pub mod error;
pub mod grammar;
pub mod pipeline;
pub mod simulate;
pub mod table;

// Re-export commonly used types
pub use automaton::{Automaton, ItemSet, Lr1Item, StateId};
pub use error::{BuildError, GrammarError, ParseError};
pub use grammar::first::FirstSets;
pub use grammar::{END_MARKER, Grammar, GrammarBuilder, Lookahead, Production, Symbol};
pub use pipeline::Pipeline;
pub use simulate::{Simulation, StepAction, TraceEntry};
pub use table::{Action, ConflictError, ConflictKind, ParsingTable};
