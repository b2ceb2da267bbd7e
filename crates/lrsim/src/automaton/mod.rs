//! # LR(1) Automaton
//!
//! Canonical LR(1) item sets and the transition structure between them.
//!
//! An [`Lr1Item`] is a production with a dot position and one lookahead;
//! an [`ItemSet`] is a closure-saturated set of items forming one state;
//! the [`Automaton`] is the canonical collection of all reachable states
//! plus the `(state, symbol) → state` transition map. State identity is
//! structural set equality: the item list is kept in canonical sorted
//! order so two states built in different orders still compare and hash
//! equal, which is what de-duplicates states during construction.

mod builder;

use crate::grammar::{Grammar, Lookahead, Symbol};
use crate::grammar::first::FirstSets;
use hashbrown::HashMap;
use std::fmt;

/// Dense identifier of an automaton state, assigned at discovery order.
pub type StateId = usize;

/// An LR(1) item `[A → α · β, a]`: production index, dot position, and
/// lookahead terminal. Immutable value; equality, hashing, and ordering
/// cover all three fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lr1Item {
    pub production: usize,
    pub dot: usize,
    pub lookahead: Lookahead,
}

impl Lr1Item {
    #[must_use]
    pub const fn new(production: usize, dot: usize, lookahead: Lookahead) -> Self {
        Self {
            production,
            dot,
            lookahead,
        }
    }

    /// The symbol immediately after the dot, or `None` for a complete item.
    #[must_use]
    pub fn next_symbol<'g>(&self, grammar: &'g Grammar) -> Option<&'g Symbol> {
        grammar.production(self.production)?.rhs.get(self.dot)
    }

    /// A copy of this item with the dot advanced one position.
    #[must_use]
    pub fn advanced(&self) -> Self {
        Self::new(self.production, self.dot + 1, self.lookahead.clone())
    }

    /// Whether the dot is at the end of the right-hand side (reduce item).
    #[must_use]
    pub fn is_complete(&self, grammar: &Grammar) -> bool {
        grammar
            .production(self.production)
            .is_none_or(|p| self.dot >= p.len())
    }

    /// Render as `[A → α · β, a]`; needs the grammar to resolve the
    /// production index.
    #[must_use]
    pub const fn display<'a>(&'a self, grammar: &'a Grammar) -> Lr1ItemDisplay<'a> {
        Lr1ItemDisplay {
            item: self,
            grammar,
        }
    }
}

/// Display adapter for [`Lr1Item`].
pub struct Lr1ItemDisplay<'a> {
    item: &'a Lr1Item,
    grammar: &'a Grammar,
}

impl fmt::Display for Lr1ItemDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(production) = self.grammar.production(self.item.production) else {
            return write!(f, "[#{}?, {}]", self.item.production, self.item.lookahead);
        };
        write!(f, "[{} →", production.lhs)?;
        for (position, symbol) in production.rhs.iter().enumerate() {
            if position == self.item.dot {
                write!(f, " ·")?;
            }
            write!(f, " {symbol}")?;
        }
        if self.item.dot >= production.len() {
            write!(f, " ·")?;
        }
        write!(f, ", {}]", self.item.lookahead)
    }
}

/// A state of the automaton: a set of LR(1) items in canonical sorted
/// order. Derived equality and hashing therefore implement set equality,
/// regardless of the order items were produced in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemSet {
    items: Vec<Lr1Item>,
}

impl ItemSet {
    /// Build the canonical form: sorted, de-duplicated.
    pub(crate) fn new(items: impl IntoIterator<Item = Lr1Item>) -> Self {
        let mut items: Vec<Lr1Item> = items.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        Self { items }
    }

    /// Items in canonical order.
    #[must_use]
    pub fn items(&self) -> &[Lr1Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, item: &Lr1Item) -> bool {
        self.items.binary_search(item).is_ok()
    }

    /// Render one item per line.
    #[must_use]
    pub const fn display<'a>(&'a self, grammar: &'a Grammar) -> ItemSetDisplay<'a> {
        ItemSetDisplay { set: self, grammar }
    }
}

impl<'a> IntoIterator for &'a ItemSet {
    type Item = &'a Lr1Item;
    type IntoIter = std::slice::Iter<'a, Lr1Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Display adapter for [`ItemSet`].
pub struct ItemSetDisplay<'a> {
    set: &'a ItemSet,
    grammar: &'a Grammar,
}

impl fmt::Display for ItemSetDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, item) in self.set.items.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", item.display(self.grammar))?;
        }
        Ok(())
    }
}

/// The canonical LR(1) collection: every reachable state plus the
/// transition function `(state, symbol) → state`.
#[derive(Debug, Clone)]
pub struct Automaton {
    states: Vec<ItemSet>,
    transitions: HashMap<(StateId, Symbol), StateId, ahash::RandomState>,
    start: StateId,
}

impl Automaton {
    /// Build the canonical collection for a grammar.
    ///
    /// State 0 is the closure of `[S' → · S, $]`; discovery proceeds from
    /// a worklist, de-duplicating states by structural set equality.
    #[must_use]
    pub fn build(grammar: &Grammar, first: &FirstSets) -> Self {
        builder::build(grammar, first)
    }

    pub(crate) const fn from_parts(
        states: Vec<ItemSet>,
        transitions: HashMap<(StateId, Symbol), StateId, ahash::RandomState>,
        start: StateId,
    ) -> Self {
        Self {
            states,
            transitions,
            start,
        }
    }

    /// All states, indexed by [`StateId`] (the node list).
    #[must_use]
    pub fn states(&self) -> &[ItemSet] {
        &self.states
    }

    /// Look up a state by id.
    #[must_use]
    pub fn state(&self, id: StateId) -> Option<&ItemSet> {
        self.states.get(id)
    }

    /// The start state (always state 0 for this builder).
    #[must_use]
    pub const fn start(&self) -> StateId {
        self.start
    }

    /// Number of states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The transition target for a state and symbol, if any.
    #[must_use]
    pub fn transition(&self, from: StateId, symbol: &Symbol) -> Option<StateId> {
        self.transitions.get(&(from, symbol.clone())).copied()
    }

    /// Iterate all transitions in unspecified order.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, &Symbol, StateId)> {
        self.transitions
            .iter()
            .map(|((from, symbol), to)| (*from, symbol, *to))
    }

    /// The edge list in deterministic order, for diagram rendering.
    #[must_use]
    pub fn edges(&self) -> Vec<(StateId, &Symbol, StateId)> {
        let mut edges: Vec<_> = self.transitions().collect();
        edges.sort_unstable_by(|a, b| (a.0, a.1, a.2).cmp(&(b.0, b.1, b.2)));
        edges
    }

    /// Render every state with its `I0`-style label and items.
    #[must_use]
    pub const fn display<'a>(&'a self, grammar: &'a Grammar) -> AutomatonDisplay<'a> {
        AutomatonDisplay {
            automaton: self,
            grammar,
        }
    }
}

/// Display adapter for [`Automaton`].
pub struct AutomatonDisplay<'a> {
    automaton: &'a Automaton,
    grammar: &'a Grammar,
}

impl fmt::Display for AutomatonDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, state) in self.automaton.states.iter().enumerate() {
            if id > 0 {
                writeln!(f)?;
            }
            writeln!(f, "I{id}:")?;
            for item in state {
                writeln!(f, "  {}", item.display(self.grammar))?;
            }
        }
        Ok(())
    }
}
