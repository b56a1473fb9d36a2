//! Full-URI assembly: service root, resource path, query options.

use crate::ast::{Token, TokenKind, TokenValue};
use crate::metadata::Metadata;
use crate::parser::lexical::{self, at};
use crate::parser::query_options::query_options;
use crate::parser::resource_path::resource_path;

/// Parses `serviceRoot [ resourcePath ] [ "?" queryOptions ]`.
///
/// The service root ends at the authority (everything after the host's
/// trailing slash is resource path); callers with a path-prefixed service
/// root should use the resource-path or query-option entry points
/// directly.
pub fn odata_uri(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    let root = service_root(source, pos)?;
    let mut cursor = root.span.end;
    let mut items = vec![root];

    if let Some(path) = resource_path(source, cursor, ctx) {
        cursor = path.span.end;
        items.push(path);
    }
    if let Some(options_pos) = lexical::literal(source, cursor, "?") {
        let options = query_options(source, options_pos, ctx)?;
        cursor = options.span.end;
        items.push(options);
    }

    Some(Token::new(
        TokenKind::ODataUri,
        pos..cursor,
        source,
        TokenValue::Items(items),
    ))
}

/// `scheme "://" host [ ":" port ] [ "/" ]`.
fn service_root(source: &str, pos: usize) -> Option<Token> {
    let mut cursor = pos;
    if !at(source, cursor).is_some_and(lexical::is_alpha) {
        return None;
    }
    while at(source, cursor)
        .is_some_and(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
    {
        cursor += 1;
    }
    cursor = lexical::literal(source, cursor, "://")?;

    let host_start = cursor;
    loop {
        if let Some(next) = lexical::pct_encoded(source, cursor) {
            cursor = next;
            continue;
        }
        match at(source, cursor) {
            Some(byte) if lexical::is_unreserved(byte) || byte == b':' => cursor += 1,
            _ => break,
        }
    }
    if cursor == host_start {
        return None;
    }

    if let Some(end) = lexical::literal(source, cursor, "/") {
        cursor = end;
    }
    Some(Token::new(
        TokenKind::ServiceRoot,
        pos..cursor,
        source,
        TokenValue::None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Metadata {
        Metadata::new()
    }

    fn uri(input: &str) -> Token {
        let token = odata_uri(input, 0, &ctx()).expect("URI should parse");
        assert_eq!(token.span.end, input.len(), "should consume {input:?}");
        token
    }

    #[test]
    fn full_uri_splits_into_three_parts() {
        let token = uri("http://example.com/Products(1)?$top=2&$count=true");
        let kinds: Vec<_> = token.children().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::ServiceRoot,
                TokenKind::ResourcePath,
                TokenKind::QueryOptions,
            ]
        );
        assert_eq!(token.children()[0].raw, "http://example.com/");
    }

    #[test]
    fn service_root_alone_is_a_complete_uri() {
        let token = uri("https://example.com:8080/");
        assert_eq!(token.children().len(), 1);
        let token = uri("https://example.com");
        assert_eq!(token.children().len(), 1);
    }

    #[test]
    fn query_options_without_resource_path() {
        let token = uri("http://example.com/?$format=json");
        let kinds: Vec<_> = token.children().iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![TokenKind::ServiceRoot, TokenKind::QueryOptions]);
    }

    #[test]
    fn question_mark_requires_at_least_one_option() {
        assert!(odata_uri("http://example.com/Products?", 0, &ctx()).is_none());
    }

    #[test]
    fn scheme_is_required() {
        assert!(odata_uri("example.com/Products", 0, &ctx()).is_none());
        assert!(odata_uri("://example.com", 0, &ctx()).is_none());
    }
}
