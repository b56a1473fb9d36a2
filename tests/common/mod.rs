//! Common test utilities
//!
//! Shared helpers for unwrapping parse results and destructuring token
//! payloads across the integration suites.

#![allow(dead_code)]

use odata_parser::{Token, TokenValue};

/// Parses with the given entry point, panicking with the error on failure
/// and asserting the token covers the full input.
pub fn parse_ok(
    entry: fn(&str) -> Result<Token, odata_parser::ParseError>,
    source: &str,
) -> Token {
    let token = entry(source)
        .unwrap_or_else(|error| panic!("failed to parse `{source}`: {error}"));
    assert_eq!(token.span.start, 0, "token must start at index 0");
    assert_eq!(
        token.span.end,
        source.len(),
        "token must consume all of `{source}`"
    );
    token
}

/// Destructures a binary payload into its operands.
pub fn operands(token: &Token) -> (&Token, &Token) {
    match &token.value {
        TokenValue::Binary { left, right } => (left, right),
        other => panic!("expected a binary payload, got {other:?}"),
    }
}

/// Destructures a single-child payload.
pub fn inner(token: &Token) -> &Token {
    match &token.value {
        TokenValue::Single(inner) => inner,
        other => panic!("expected a single-child payload, got {other:?}"),
    }
}

/// Destructures an item-list payload.
pub fn items(token: &Token) -> &[Token] {
    match &token.value {
        TokenValue::Items(items) => items,
        other => panic!("expected an items payload, got {other:?}"),
    }
}

/// Destructures a query-options payload.
pub fn options(token: &Token) -> &[Token] {
    match &token.value {
        TokenValue::Options(options) => options,
        other => panic!("expected an options payload, got {other:?}"),
    }
}

/// The EDM type name of a literal token.
pub fn edm_type(token: &Token) -> &str {
    match &token.value {
        TokenValue::Literal(edm) => edm.as_str(),
        other => panic!("expected a literal payload, got {other:?}"),
    }
}
