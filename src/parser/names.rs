//! Identifier, namespace, and type-name combinators.

use crate::ast::{Token, TokenKind, TokenValue};
use crate::parser::lexical;

/// Maximum identifier tail length after the leading character.
const MAX_IDENTIFIER_TAIL: usize = 127;

/// Fixed set of primitive type names after the `Edm.` prefix.
const PRIMITIVE_TYPE_NAMES: &[&str] = &[
    "Binary",
    "Boolean",
    "Byte",
    "Date",
    "DateTimeOffset",
    "Decimal",
    "Double",
    "Duration",
    "Guid",
    "Int16",
    "Int32",
    "Int64",
    "SByte",
    "Single",
    "Stream",
    "String",
    "TimeOfDay",
    "Geography",
    "GeographyPoint",
    "GeographyLineString",
    "GeographyPolygon",
    "GeographyCollection",
    "Geometry",
    "GeometryPoint",
    "GeometryLineString",
    "GeometryPolygon",
    "GeometryCollection",
];

/// Consumes an `odataIdentifier`: `(ALPHA / "_")` followed by at most 127
/// Unicode letter/digit/underscore characters.
pub fn odata_identifier(source: &str, pos: usize) -> Option<Token> {
    let end = identifier_end(source, pos)?;
    Some(Token::new(
        TokenKind::ODataIdentifier,
        pos..end,
        source,
        TokenValue::None,
    ))
}

/// Like [`odata_identifier`] but returns only the end cursor.
pub fn identifier_end(source: &str, pos: usize) -> Option<usize> {
    let mut cursor = lexical::identifier_leading_char(source, pos)?;
    let mut tail = 0usize;
    while let Some(next) = lexical::identifier_char(source, cursor) {
        tail += 1;
        if tail > MAX_IDENTIFIER_TAIL {
            return None;
        }
        cursor = next;
    }
    Some(cursor)
}

/// Consumes a qualified type name (`namespace "." odataIdentifier`, at
/// least one dot). `Edm.`-qualified names from the fixed primitive set
/// yield a `PrimitiveTypeName` token; any other well-formed name yields a
/// `QualifiedEntityTypeName` (metadata-less parsing accepts any name).
pub fn qualified_type_name(source: &str, pos: usize) -> Option<Token> {
    let mut cursor = identifier_end(source, pos)?;
    let mut parts = 1usize;
    while let Some(dot) = lexical::literal(source, cursor, ".") {
        match identifier_end(source, dot) {
            Some(end) => {
                cursor = end;
                parts += 1;
            }
            // Trailing dot belongs to the caller (it may be a path
            // separator in another grammar position).
            None => break,
        }
    }
    if parts < 2 {
        return None;
    }

    let raw = &source[pos..cursor];
    let kind = match raw.strip_prefix("Edm.") {
        Some(name) if PRIMITIVE_TYPE_NAMES.contains(&name) => TokenKind::PrimitiveTypeName,
        _ => TokenKind::QualifiedEntityTypeName,
    };
    Some(Token::new(kind, pos..cursor, source, TokenValue::None))
}

/// Consumes one of the fixed `Edm.*` primitive type names.
pub fn primitive_type_name(source: &str, pos: usize) -> Option<Token> {
    let token = qualified_type_name(source, pos)?;
    if token.kind == TokenKind::PrimitiveTypeName {
        Some(token)
    } else {
        None
    }
}
