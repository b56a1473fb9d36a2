//! Parser infrastructure for the OData query grammar.
//!
//! Every combinator is a pure function `(source, pos) -> Option<Token>`
//! (plus a read-only metadata context where the grammar consults it):
//! `None` means the production did not match and nothing was consumed,
//! which is how alternatives backtrack. Only the entry points turn a
//! non-match or a partial match into a [`ParseError`].

pub mod expression;
pub mod lexical;
pub mod literals;
pub mod names;
pub mod query_options;
pub mod resource_path;
pub mod search;
pub mod uri;

use crate::ast::Token;
use crate::diag::{Diag, SourceFile, to_report};
use miette::Report;
use std::fmt;

/// Error returned by the top-level parse entry points.
///
/// Grammar mismatch inside the parser never surfaces here; an error means
/// the whole input was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The entry combinator could not match anything at index 0.
    EmptyParse {
        /// Name of the production the entry point expected.
        rule: &'static str,
    },
    /// The entry combinator matched a prefix but input remained.
    TrailingInput {
        /// Name of the production the entry point expected.
        rule: &'static str,
        /// Index of the first unconsumed byte.
        position: usize,
    },
}

impl ParseError {
    /// Index of the first byte the parser could not account for.
    pub fn position(&self) -> usize {
        match self {
            ParseError::EmptyParse { .. } => 0,
            ParseError::TrailingInput { position, .. } => *position,
        }
    }

    /// Renders this error as a miette report over the original input.
    pub fn to_report(&self, source: &str) -> Report {
        let diag = match self {
            ParseError::EmptyParse { rule } => {
                Diag::error(format!("expected a {rule}"))
                    .with_label(0..0, format!("no {rule} starts here"))
                    .with_code("odata::empty_parse")
            }
            ParseError::TrailingInput { rule, position } => {
                Diag::error(format!("unexpected input after the {rule}"))
                    .with_label(*position..position + 1, "first unconsumed character")
                    .with_help("remove the trailing characters or fix the preceding syntax")
                    .with_code("odata::trailing_input")
            }
        };
        to_report(&diag, &SourceFile::new(source))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyParse { rule } => {
                write!(f, "input does not start with a {rule}")
            }
            ParseError::TrailingInput { rule, position } => {
                write!(f, "unexpected input after the {rule} at position {position}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Runs an entry combinator at index 0 and applies the entry contract:
/// no match is `EmptyParse`, a partial match is `TrailingInput` carrying
/// the first unconsumed index.
pub(crate) fn run_entry(
    source: &str,
    rule: &'static str,
    parse: impl FnOnce(&str, usize) -> Option<Token>,
) -> Result<Token, ParseError> {
    match parse(source, 0) {
        None => Err(ParseError::EmptyParse { rule }),
        Some(token) if token.span.end < source.len() => Err(ParseError::TrailingInput {
            rule,
            position: token.span.end,
        }),
        Some(token) => Ok(token),
    }
}
