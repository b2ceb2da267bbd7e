//! Programmatic grammar construction.

use crate::error::GrammarError;
use crate::grammar::{Grammar, RawProduction, Symbol};
use compact_str::CompactString;
use hashbrown::HashSet;

/// Builder for assembling a [`Grammar`] without going through text.
///
/// Unlike the text format, symbol kinds are explicit here, which is where
/// undefined-symbol validation becomes meaningful: a [`Symbol::Nonterminal`]
/// on a right-hand side must have at least one production of its own.
///
/// # Example
///
/// ```
/// use lrsim::{Grammar, Symbol};
///
/// let grammar = Grammar::builder()
///     .start_symbol("S")
///     .production("S", [Symbol::nonterminal("A"), Symbol::terminal("b")])
///     .production("A", [Symbol::terminal("a")])
///     .build()
///     .unwrap();
/// assert_eq!(grammar.start_symbol(), "S");
/// ```
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    start: Option<CompactString>,
    productions: Vec<(CompactString, Vec<Symbol>)>,
}

impl GrammarBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start symbol. Defaults to the first production's left-hand
    /// side when not set.
    #[must_use]
    pub fn start_symbol(mut self, name: impl Into<CompactString>) -> Self {
        self.start = Some(name.into());
        self
    }

    /// Add a production. An empty right-hand side is an ε-production.
    #[must_use]
    pub fn production(
        mut self,
        lhs: impl Into<CompactString>,
        rhs: impl IntoIterator<Item = Symbol>,
    ) -> Self {
        self.productions
            .push((lhs.into(), rhs.into_iter().collect()));
        self
    }

    /// Validate and assemble the grammar.
    ///
    /// # Errors
    ///
    /// - [`GrammarError::Empty`] when no productions were added.
    /// - [`GrammarError::UndefinedSymbol`] when the start symbol or a
    ///   right-hand-side nonterminal has no production.
    /// - [`GrammarError::TerminalShadowed`] when a symbol is used as a
    ///   terminal but also appears as a left-hand side.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        if self.productions.is_empty() {
            return Err(GrammarError::Empty);
        }

        let lhs_names: HashSet<&CompactString, ahash::RandomState> =
            self.productions.iter().map(|(lhs, _)| lhs).collect();

        for (_, rhs) in &self.productions {
            for symbol in rhs {
                match symbol {
                    Symbol::Nonterminal(name) if !lhs_names.contains(name) => {
                        return Err(GrammarError::undefined(name.clone()));
                    }
                    Symbol::Terminal(name) if lhs_names.contains(name) => {
                        return Err(GrammarError::TerminalShadowed {
                            symbol: name.clone(),
                        });
                    }
                    _ => {}
                }
            }
        }

        if let Some(start) = &self.start
            && !lhs_names.contains(start)
        {
            return Err(GrammarError::undefined(start.clone()));
        }

        drop(lhs_names);

        let raw = self
            .productions
            .into_iter()
            .map(|(lhs, rhs)| RawProduction {
                lhs,
                rhs: rhs
                    .into_iter()
                    .map(|symbol| CompactString::from(symbol.name()))
                    .collect(),
            })
            .collect();

        Grammar::assemble(self.start, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_the_same_grammar_as_text() {
        let built = Grammar::builder()
            .production("S", [Symbol::nonterminal("A"), Symbol::nonterminal("B")])
            .production("A", [Symbol::terminal("a")])
            .production("B", [Symbol::terminal("b")])
            .build()
            .unwrap();
        let parsed = Grammar::parse("S -> A B\nA -> a\nB -> b").unwrap();
        assert_eq!(built.productions(), parsed.productions());
        assert_eq!(built.start_symbol(), parsed.start_symbol());
    }

    #[test]
    fn undefined_nonterminal_is_rejected() {
        let err = Grammar::builder()
            .production("S", [Symbol::nonterminal("Missing")])
            .build()
            .unwrap_err();
        assert_eq!(err, GrammarError::undefined("Missing"));
    }

    #[test]
    fn undefined_start_symbol_is_rejected() {
        let err = Grammar::builder()
            .start_symbol("T")
            .production("S", [Symbol::terminal("a")])
            .build()
            .unwrap_err();
        assert_eq!(err, GrammarError::undefined("T"));
    }

    #[test]
    fn terminal_shadowing_a_production_is_rejected() {
        let err = Grammar::builder()
            .production("S", [Symbol::terminal("A")])
            .production("A", [Symbol::terminal("a")])
            .build()
            .unwrap_err();
        assert!(matches!(err, GrammarError::TerminalShadowed { symbol } if symbol == "A"));
    }

    #[test]
    fn empty_builder_is_rejected() {
        assert_eq!(
            Grammar::builder().build().unwrap_err(),
            GrammarError::Empty
        );
    }
}
