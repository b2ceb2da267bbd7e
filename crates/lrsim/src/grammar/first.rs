//! FIRST-set computation.
//!
//! FIRST(X) is the set of terminals that can begin a string derived from
//! X. Terminals are their own FIRST; nonterminal sets are grown by
//! repeated passes over all productions until a fixed point is reached.
//! Termination is guaranteed because sets only grow and are bounded by the
//! terminal alphabet. Nullability is tracked separately rather than by
//! storing an ε pseudo-terminal inside the sets.

use crate::grammar::{Grammar, Lookahead, Symbol};
use compact_str::CompactString;
use hashbrown::{HashMap, HashSet};

/// Set of terminal names.
pub type TerminalSet = HashSet<CompactString, ahash::RandomState>;

/// Set of lookaheads, as produced by [`FirstSets::first_of_sequence`].
pub type LookaheadSet = HashSet<Lookahead, ahash::RandomState>;

/// FIRST sets and nullability for every nonterminal of one grammar.
#[derive(Debug, Clone)]
pub struct FirstSets {
    first: HashMap<CompactString, TerminalSet, ahash::RandomState>,
    nullable: HashSet<CompactString, ahash::RandomState>,
}

impl FirstSets {
    /// Compute FIRST sets for a grammar by fixed-point iteration.
    #[must_use]
    pub fn compute(grammar: &Grammar) -> Self {
        let mut sets = Self {
            first: grammar
                .nonterminals()
                .map(|name| (CompactString::from(name), TerminalSet::default()))
                .collect(),
            nullable: HashSet::default(),
        };
        while sets.propagate(grammar) {}
        sets
    }

    /// One pass over all productions. Returns whether anything changed;
    /// a `false` result means the fixed point has been reached.
    fn propagate(&mut self, grammar: &Grammar) -> bool {
        let mut changed = false;

        for production in grammar.productions() {
            let mut additions: Vec<CompactString> = Vec::new();
            let mut all_nullable = true;

            for symbol in &production.rhs {
                match symbol {
                    Symbol::Terminal(name) => {
                        additions.push(name.clone());
                        all_nullable = false;
                        break;
                    }
                    Symbol::Nonterminal(name) => {
                        if let Some(first) = self.first.get(name.as_str()) {
                            additions.extend(first.iter().cloned());
                        }
                        if !self.nullable.contains(name.as_str()) {
                            all_nullable = false;
                            break;
                        }
                    }
                }
            }

            let target = self.first.entry(production.lhs.clone()).or_default();
            for terminal in additions {
                changed |= target.insert(terminal);
            }
            if all_nullable {
                changed |= self.nullable.insert(production.lhs.clone());
            }
        }

        changed
    }

    /// FIRST set of a nonterminal. `None` for unknown names.
    #[must_use]
    pub fn first(&self, nonterminal: &str) -> Option<&TerminalSet> {
        self.first.get(nonterminal)
    }

    /// Whether a nonterminal can derive the empty string.
    #[must_use]
    pub fn is_nullable(&self, nonterminal: &str) -> bool {
        self.nullable.contains(nonterminal)
    }

    /// Whether every symbol of a sequence can derive the empty string.
    #[must_use]
    pub fn sequence_nullable(&self, symbols: &[Symbol]) -> bool {
        symbols.iter().all(|symbol| match symbol {
            Symbol::Terminal(_) => false,
            Symbol::Nonterminal(name) => self.is_nullable(name),
        })
    }

    /// FIRST of a symbol sequence followed by an explicit lookahead:
    /// FIRST(βa). When the whole sequence can derive empty, the lookahead
    /// itself is part of the result. This is the closure's lookahead
    /// propagation primitive.
    #[must_use]
    pub fn first_of_sequence(&self, symbols: &[Symbol], lookahead: &Lookahead) -> LookaheadSet {
        let mut result = LookaheadSet::default();

        for symbol in symbols {
            match symbol {
                Symbol::Terminal(name) => {
                    result.insert(Lookahead::Token(name.clone()));
                    return result;
                }
                Symbol::Nonterminal(name) => {
                    if let Some(first) = self.first.get(name.as_str()) {
                        result.extend(first.iter().cloned().map(Lookahead::Token));
                    }
                    if !self.is_nullable(name) {
                        return result;
                    }
                }
            }
        }

        result.insert(lookahead.clone());
        result
    }
}
