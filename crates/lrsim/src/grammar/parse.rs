//! Grammar text parsing.
//!
//! One production per line, `LHS -> RHS | ALT`, symbols whitespace
//! separated. `ε` and `epsilon` are reserved markers for an empty
//! right-hand side; `$` is reserved for the end-of-input marker and may
//! not appear in grammar text.

use crate::error::GrammarError;
use crate::grammar::{END_MARKER, RawProduction};
use compact_str::CompactString;

const ARROW: &str = "->";
const EMPTY_MARKERS: [&str; 2] = ["ε", "epsilon"];

fn is_empty_marker(token: &str) -> bool {
    EMPTY_MARKERS.contains(&token)
}

/// Split grammar text into unclassified productions, preserving line order.
pub(crate) fn parse_text(text: &str) -> Result<Vec<RawProduction>, GrammarError> {
    let mut raw = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let number = index + 1;
        // The Unicode arrow is a display synonym for `->`.
        let line = line.replace('→', ARROW);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((lhs, rhs)) = line.split_once(ARROW) else {
            return Err(GrammarError::syntax(number, "missing `->`"));
        };

        let lhs = lhs.trim();
        if lhs.is_empty() {
            return Err(GrammarError::syntax(number, "empty left-hand side"));
        }
        if lhs.split_whitespace().nth(1).is_some() {
            return Err(GrammarError::syntax(
                number,
                "left-hand side must be a single nonterminal",
            ));
        }
        if is_empty_marker(lhs) || lhs == END_MARKER {
            return Err(GrammarError::syntax(
                number,
                format!("`{lhs}` is reserved and cannot be a nonterminal"),
            ));
        }

        for alternative in rhs.split('|') {
            raw.push(parse_alternative(number, lhs, alternative)?);
        }
    }

    if raw.is_empty() {
        return Err(GrammarError::Empty);
    }
    Ok(raw)
}

fn parse_alternative(
    number: usize,
    lhs: &str,
    alternative: &str,
) -> Result<RawProduction, GrammarError> {
    let tokens: Vec<&str> = alternative.split_whitespace().collect();
    let lhs = CompactString::from(lhs);

    // A bare `ε` (or nothing at all) is the empty production.
    if tokens.is_empty() || (tokens.len() == 1 && is_empty_marker(tokens[0])) {
        return Ok(RawProduction {
            lhs,
            rhs: Vec::new(),
        });
    }

    let mut rhs = Vec::with_capacity(tokens.len());
    for symbol in tokens {
        if is_empty_marker(symbol) {
            return Err(GrammarError::syntax(
                number,
                "`ε` cannot appear alongside other symbols",
            ));
        }
        if symbol == END_MARKER {
            return Err(GrammarError::syntax(
                number,
                format!("`{END_MARKER}` is the reserved end-of-input marker"),
            ));
        }
        rhs.push(CompactString::from(symbol));
    }

    Ok(RawProduction { lhs, rhs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    #[test]
    fn parses_alternatives_and_blank_lines() {
        let raw = parse_text("S -> a S | b\n\nA -> ε\n").unwrap();
        assert_eq!(raw.len(), 3);
        assert_eq!(raw[0].rhs, ["a", "S"]);
        assert_eq!(raw[1].rhs, ["b"]);
        assert!(raw[2].rhs.is_empty());
    }

    #[test]
    fn accepts_unicode_arrow_and_epsilon_word() {
        let raw = parse_text("S → epsilon").unwrap();
        assert!(raw[0].rhs.is_empty());
    }

    #[test]
    fn missing_arrow_is_a_syntax_error() {
        let err = parse_text("S a b").unwrap_err();
        assert!(matches!(err, GrammarError::Syntax { line: 1, .. }));
    }

    #[test]
    fn empty_lhs_is_a_syntax_error() {
        let err = parse_text(" -> a").unwrap_err();
        assert!(matches!(err, GrammarError::Syntax { line: 1, .. }));
    }

    #[test]
    fn multi_symbol_lhs_is_rejected() {
        let err = parse_text("S A -> a").unwrap_err();
        assert!(matches!(err, GrammarError::Syntax { line: 1, .. }));
    }

    #[test]
    fn reserved_markers_are_rejected_in_rhs() {
        assert!(parse_text("S -> a $").is_err());
        assert!(parse_text("S -> a ε b").is_err());
    }

    #[test]
    fn line_numbers_skip_blanks() {
        let err = parse_text("S -> a\n\nbroken").unwrap_err();
        assert!(matches!(err, GrammarError::Syntax { line: 3, .. }));
    }

    #[test]
    fn trailing_empty_alternative_is_an_empty_production() {
        let grammar = Grammar::parse("S -> a S |").unwrap();
        let empties: Vec<_> = grammar
            .productions()
            .iter()
            .filter(|p| p.is_empty())
            .collect();
        assert_eq!(empties.len(), 1);
        assert_eq!(empties[0].lhs, "S");
    }
}
