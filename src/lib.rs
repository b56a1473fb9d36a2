//! Pure-Rust OData v4 query parser producing typed token trees.
//!
//! Each entry point is a pure function from a textual query fragment to a
//! [`Token`] tree; downstream layers (query planners, SQL/NoSQL
//! translators) consume the tree through its `kind`/`value` payloads or
//! the [`Visit`] traversal API. The parser is database-agnostic, carries
//! no state, and is trivially sharable across threads.
//!
//! # Parse a `$filter` expression
//!
//! ```
//! use odata_parser::{TokenKind, parse_filter};
//!
//! let token = parse_filter("Name eq 'John'").unwrap();
//! assert_eq!(token.kind, TokenKind::EqualsExpression);
//! assert_eq!(token.raw, "Name eq 'John'");
//! ```
//!
//! # Parse query options
//!
//! ```
//! use odata_parser::{TokenKind, TokenValue, parse_query_options};
//!
//! let token = parse_query_options("$top=10&$skip=20").unwrap();
//! let TokenValue::Options(options) = &token.value else {
//!     unreachable!()
//! };
//! assert_eq!(options.len(), 2);
//! assert_eq!(options[0].kind, TokenKind::Top);
//! ```
//!
//! # Traverse the tree
//!
//! ```
//! use std::ops::ControlFlow;
//! use odata_parser::{Token, TokenKind, Visit, parse_filter, walk_token};
//!
//! struct Literals(Vec<String>);
//!
//! impl Visit for Literals {
//!     type Break = ();
//!
//!     fn visit_token(&mut self, token: &Token) -> ControlFlow<()> {
//!         if token.kind == TokenKind::Literal {
//!             self.0.push(token.raw.clone());
//!         }
//!         walk_token(self, token)
//!     }
//! }
//!
//! let token = parse_filter("Age gt 21 and Name eq 'Jane'").unwrap();
//! let mut literals = Literals(Vec::new());
//! let _ = literals.visit_token(&token);
//! assert_eq!(literals.0, vec!["21", "'Jane'"]);
//! ```

pub mod ast;
pub mod diag;
pub mod metadata;
pub mod parser;

// Re-export the token tree primitives.
pub use ast::{SortDirection, Span, Token, TokenKind, TokenValue, Visit, VisitResult, walk_token};

// Re-export the diagnostic model for callers that render reports.
pub use diag::{Diag, DiagLabel, DiagSeverity, SourceFile};

pub use metadata::Metadata;
pub use parser::ParseError;

use parser::run_entry;

/// Parses a full OData URI: `serviceRoot [resourcePath] ["?" queryOptions]`.
pub fn parse_odata_uri(source: &str) -> Result<Token, ParseError> {
    parse_odata_uri_with(source, &Metadata::new())
}

/// Like [`parse_odata_uri`], resolving names against a schema descriptor.
pub fn parse_odata_uri_with(source: &str, metadata: &Metadata) -> Result<Token, ParseError> {
    run_entry(source, "OData URI", |s, pos| {
        parser::uri::odata_uri(s, pos, metadata)
    })
}

/// Parses a resource path such as `Products(1)/Category`.
pub fn parse_resource_path(source: &str) -> Result<Token, ParseError> {
    parse_resource_path_with(source, &Metadata::new())
}

/// Like [`parse_resource_path`], resolving names against a schema
/// descriptor: the head segment must resolve, and singletons are
/// classified as such.
pub fn parse_resource_path_with(source: &str, metadata: &Metadata) -> Result<Token, ParseError> {
    run_entry(source, "resource path", |s, pos| {
        parser::resource_path::resource_path(s, pos, metadata)
    })
}

/// Parses the query-option list after the `?` of a URI.
pub fn parse_query_options(source: &str) -> Result<Token, ParseError> {
    parse_query_options_with(source, &Metadata::new())
}

/// Like [`parse_query_options`] with a schema descriptor threaded through.
pub fn parse_query_options_with(source: &str, metadata: &Metadata) -> Result<Token, ParseError> {
    run_entry(source, "query option list", |s, pos| {
        parser::query_options::query_options(s, pos, metadata)
    })
}

/// Parses a boolean `$filter` expression.
pub fn parse_filter(source: &str) -> Result<Token, ParseError> {
    parse_filter_with(source, &Metadata::new())
}

/// Like [`parse_filter`] with a schema descriptor threaded through.
pub fn parse_filter_with(source: &str, metadata: &Metadata) -> Result<Token, ParseError> {
    run_entry(source, "filter expression", |s, pos| {
        parser::expression::bool_common_expr(s, pos, metadata)
    })
}

/// Parses a parenthesised key predicate such as `(1)` or `(k1=1,k2='a')`.
pub fn parse_keys(source: &str) -> Result<Token, ParseError> {
    run_entry(source, "key predicate", parser::resource_path::key_predicate)
}

/// Parses a single primitive literal such as `'O''Neil'` or `-INF`.
pub fn parse_literal(source: &str) -> Result<Token, ParseError> {
    run_entry(source, "primitive literal", parser::literals::primitive_literal)
}
