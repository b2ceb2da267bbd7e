//! # Grammar Module
//!
//! Typed context-free grammars with a numbered production list.
//!
//! A [`Grammar`] is built either from text (one production per line, see
//! [`Grammar::parse`]) or programmatically through [`GrammarBuilder`]. Both
//! paths produce the same immutable value: productions numbered from 0,
//! where production 0 is always the synthetic augmented start production
//! `S' → S`, plus terminal/nonterminal classification derived from which
//! symbols appear as a left-hand side.
//!
//! The grammar is the only input to every later stage; FIRST sets, the
//! LR(1) automaton, and the parsing table are all pure functions of it.

mod builder;
mod parse;

pub mod first;

pub use builder::GrammarBuilder;

use crate::error::GrammarError;
use compact_str::CompactString;
use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;
use std::fmt;

/// Reserved end-of-input marker, used only for display; the marker itself
/// is modeled as [`Lookahead::Eof`], never as a named terminal.
pub const END_MARKER: &str = "$";

/// A grammar symbol, classified as terminal or nonterminal.
///
/// Classification is a property of the whole grammar: a name is a
/// nonterminal iff some production has it as its left-hand side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Symbol {
    Terminal(CompactString),
    Nonterminal(CompactString),
}

impl Symbol {
    /// Create a terminal symbol.
    #[must_use]
    pub fn terminal(name: impl Into<CompactString>) -> Self {
        Self::Terminal(name.into())
    }

    /// Create a nonterminal symbol.
    #[must_use]
    pub fn nonterminal(name: impl Into<CompactString>) -> Self {
        Self::Nonterminal(name.into())
    }

    /// The symbol's name, without classification.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Terminal(name) | Self::Nonterminal(name) => name,
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    #[must_use]
    pub const fn is_nonterminal(&self) -> bool {
        matches!(self, Self::Nonterminal(_))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A lookahead: a named terminal or the end-of-input marker.
///
/// Used for item lookaheads, FIRST-of-sequence results, and ACTION table
/// keys, so that the end marker never has to masquerade as a terminal with
/// a magic name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Lookahead {
    Token(CompactString),
    Eof,
}

impl Lookahead {
    /// Create a lookahead for a named terminal.
    #[must_use]
    pub fn token(name: impl Into<CompactString>) -> Self {
        Self::Token(name.into())
    }

    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Display name: the terminal name, or `$` for end of input.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Token(name) => name,
            Self::Eof => END_MARKER,
        }
    }
}

impl fmt::Display for Lookahead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Right-hand side of a production. Most grammars keep these short.
pub type Rhs = SmallVec<[Symbol; 4]>;

/// A single production `A → α`, where α may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Production {
    pub lhs: CompactString,
    pub rhs: Rhs,
}

impl Production {
    /// Create a new production.
    #[must_use]
    pub fn new(lhs: impl Into<CompactString>, rhs: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            lhs: lhs.into(),
            rhs: rhs.into_iter().collect(),
        }
    }

    /// Number of symbols on the right-hand side.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rhs.len()
    }

    /// Whether this is an empty (ε) production.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} →", self.lhs)?;
        if self.rhs.is_empty() {
            return write!(f, " ε");
        }
        for symbol in &self.rhs {
            write!(f, " {symbol}")?;
        }
        Ok(())
    }
}

type SymbolSet = HashSet<CompactString, ahash::RandomState>;

/// An immutable context-free grammar with a numbered production list.
///
/// Production 0 is always the augmented start production `S' → S`; the
/// remaining productions are grouped by left-hand side in sorted order,
/// preserving input order within each group. Index positions are stable and
/// used as production identifiers everywhere else in the crate.
#[derive(Debug, Clone)]
pub struct Grammar {
    productions: Vec<Production>,
    start: CompactString,
    augmented_start: CompactString,
    terminals: SymbolSet,
    nonterminals: SymbolSet,
    by_lhs: HashMap<CompactString, Vec<usize>, ahash::RandomState>,
}

/// An unclassified production as read from text or builder input.
#[derive(Debug, Clone)]
pub(crate) struct RawProduction {
    pub(crate) lhs: CompactString,
    pub(crate) rhs: Vec<CompactString>,
}

impl Grammar {
    /// Parse grammar text into a grammar.
    ///
    /// One production per line: `LHS -> RHS1 RHS2 ... | ALT1 ...`, symbols
    /// whitespace-separated, `ε` (or `epsilon`) for an empty right-hand
    /// side, blank lines skipped. The first left-hand side is the start
    /// symbol. The Unicode arrow `→` is accepted as a synonym for `->`.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::Syntax`] for malformed lines and
    /// [`GrammarError::Empty`] when no productions remain.
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        let raw = parse::parse_text(text)?;
        Self::assemble(None, raw)
    }

    /// Start building a grammar programmatically.
    #[must_use]
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::new()
    }

    /// Assemble a grammar from unclassified productions: classify symbols,
    /// augment with the synthetic start production, and number the result.
    pub(crate) fn assemble(
        start: Option<CompactString>,
        raw: Vec<RawProduction>,
    ) -> Result<Self, GrammarError> {
        if raw.is_empty() {
            return Err(GrammarError::Empty);
        }

        let mut lhs_names: SymbolSet = SymbolSet::default();
        for production in &raw {
            lhs_names.insert(production.lhs.clone());
        }

        let start = start.unwrap_or_else(|| raw[0].lhs.clone());
        if !lhs_names.contains(&start) {
            return Err(GrammarError::undefined(start));
        }

        // Fresh augmented name: append apostrophes until nothing collides.
        let mut augmented_start = CompactString::from(format!("{start}'"));
        let collides = |name: &CompactString| {
            lhs_names.contains(name) || raw.iter().any(|p| p.rhs.contains(name))
        };
        while collides(&augmented_start) {
            augmented_start.push('\'');
        }

        let classify = |name: &CompactString| {
            if lhs_names.contains(name) {
                Symbol::Nonterminal(name.clone())
            } else {
                Symbol::Terminal(name.clone())
            }
        };

        let mut productions = Vec::with_capacity(raw.len() + 1);
        productions.push(Production::new(
            augmented_start.clone(),
            [Symbol::Nonterminal(start.clone())],
        ));

        // Numbering follows sorted left-hand sides, input order within each.
        let mut order: Vec<&CompactString> = lhs_names.iter().collect();
        order.sort();
        for lhs in order {
            for production in raw.iter().filter(|p| &p.lhs == lhs) {
                productions.push(Production::new(
                    production.lhs.clone(),
                    production.rhs.iter().map(classify),
                ));
            }
        }

        let mut terminals = SymbolSet::default();
        for production in &productions {
            for symbol in &production.rhs {
                if let Symbol::Terminal(name) = symbol {
                    terminals.insert(name.clone());
                }
            }
        }

        let mut nonterminals = lhs_names;
        nonterminals.insert(augmented_start.clone());

        let mut by_lhs: HashMap<CompactString, Vec<usize>, ahash::RandomState> =
            HashMap::default();
        for (index, production) in productions.iter().enumerate() {
            by_lhs.entry(production.lhs.clone()).or_default().push(index);
        }

        Ok(Self {
            productions,
            start,
            augmented_start,
            terminals,
            nonterminals,
            by_lhs,
        })
    }

    /// The numbered production list; production 0 is the augmented start.
    #[must_use]
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Look up a production by index.
    #[must_use]
    pub fn production(&self, index: usize) -> Option<&Production> {
        self.productions.get(index)
    }

    /// Indices of all productions with the given left-hand side.
    #[must_use]
    pub fn productions_of(&self, lhs: &str) -> &[usize] {
        self.by_lhs.get(lhs).map_or(&[], Vec::as_slice)
    }

    /// The original start symbol, before augmentation.
    #[must_use]
    pub fn start_symbol(&self) -> &str {
        &self.start
    }

    /// The synthetic augmented start symbol `S'`.
    #[must_use]
    pub fn augmented_start(&self) -> &str {
        &self.augmented_start
    }

    #[must_use]
    pub fn is_nonterminal(&self, name: &str) -> bool {
        self.nonterminals.contains(name)
    }

    #[must_use]
    pub fn is_terminal(&self, name: &str) -> bool {
        self.terminals.contains(name)
    }

    /// Iterate the terminal alphabet (unordered).
    pub fn terminals(&self) -> impl Iterator<Item = &str> {
        self.terminals.iter().map(CompactString::as_str)
    }

    /// Iterate the nonterminals, including the augmented start (unordered).
    pub fn nonterminals(&self) -> impl Iterator<Item = &str> {
        self.nonterminals.iter().map(CompactString::as_str)
    }
}

impl fmt::Display for Grammar {
    /// Numbered production listing, one production per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, production) in self.productions.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{index}. {production}")?;
        }
        Ok(())
    }
}
