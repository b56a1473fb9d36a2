//! Resource path combinators: entity-set heads, key predicates, casts,
//! and bound function calls.

use crate::ast::{Token, TokenKind, TokenValue};
use crate::metadata::Metadata;
use crate::parser::lexical::{self, at, bws};
use crate::parser::literals;
use crate::parser::names;
use smol_str::SmolStr;

/// Parses a resource path: an optional type-cast prefix, an entity-set or
/// singleton head, an optional key predicate, then `/`-chained navigation
/// segments (properties, casts, bound function calls).
pub fn resource_path(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    let mut items = Vec::new();
    let mut cursor = pos;

    if let Some(cast) = names::qualified_type_name(source, cursor) {
        if at(source, cast.span.end) == Some(b'/') {
            cursor = cast.span.end + 1;
            items.push(cast);
        }
    }

    let head_end = names::identifier_end(source, cursor)?;
    let head_name = &source[cursor..head_end];
    if !ctx.resolves_head(head_name) {
        return None;
    }
    let head_kind = if ctx.is_singleton(head_name) {
        TokenKind::SingletonEntity
    } else {
        TokenKind::EntitySetName
    };
    items.push(Token::new(head_kind, cursor..head_end, source, TokenValue::None));
    cursor = head_end;

    if let Some(key) = key_predicate(source, cursor) {
        cursor = key.span.end;
        items.push(key);
    }

    loop {
        let Some(seg_pos) = lexical::literal(source, cursor, "/") else {
            break;
        };
        if let Some(call) = function_call(source, seg_pos) {
            cursor = call.span.end;
            items.push(call);
        } else if let Some(cast) = names::qualified_type_name(source, seg_pos) {
            cursor = cast.span.end;
            items.push(cast);
        } else if let Some(end) = names::identifier_end(source, seg_pos) {
            cursor = end;
            items.push(Token::new(
                TokenKind::PropertyPathExpression,
                seg_pos..end,
                source,
                TokenValue::None,
            ));
        } else {
            break;
        }
        if let Some(key) = key_predicate(source, cursor) {
            cursor = key.span.end;
            items.push(key);
        }
    }

    Some(Token::new(
        TokenKind::ResourcePath,
        pos..cursor,
        source,
        TokenValue::Items(items),
    ))
}

/// Parses a key predicate: `(literal)` for a single key or
/// `(k1=v1,k2=v2)` for a compound key with at least one pair.
pub fn key_predicate(source: &str, pos: usize) -> Option<Token> {
    let open = lexical::literal(source, pos, "(")?;

    if let Some((pairs, end)) = compound_keys(source, open) {
        return Some(Token::new(
            TokenKind::KeyPredicate,
            pos..end,
            source,
            TokenValue::Items(pairs),
        ));
    }

    let key = literals::primitive_literal(source, open)?;
    let end = lexical::literal(source, key.span.end, ")")?;
    Some(Token::new(
        TokenKind::KeyPredicate,
        pos..end,
        source,
        TokenValue::Single(Box::new(key)),
    ))
}

fn compound_keys(source: &str, pos: usize) -> Option<(Vec<Token>, usize)> {
    let first = key_value_pair(source, pos)?;
    let mut cursor = first.span.end;
    let mut pairs = vec![first];
    while let Some(next_pos) = lexical::literal(source, cursor, ",") {
        let pair = key_value_pair(source, next_pos)?;
        cursor = pair.span.end;
        pairs.push(pair);
    }
    let end = lexical::literal(source, cursor, ")")?;
    Some((pairs, end))
}

fn key_value_pair(source: &str, pos: usize) -> Option<Token> {
    let key_end = names::identifier_end(source, pos)?;
    let key = Token::new(TokenKind::ODataIdentifier, pos..key_end, source, TokenValue::None);
    let value_pos = lexical::literal(source, key_end, "=")?;
    let value = literals::primitive_literal(source, value_pos)?;
    let span = pos..value.span.end;
    Some(Token::new(
        TokenKind::KeyValuePair,
        span,
        source,
        TokenValue::Pair {
            key: Box::new(key),
            value: Box::new(value),
        },
    ))
}

/// Bound function call in a path: `Namespace.Function(p1=1,p2='x')`.
fn function_call(source: &str, pos: usize) -> Option<Token> {
    let name = names::qualified_type_name(source, pos)?;
    let open = lexical::literal(source, name.span.end, "(")?;
    let mut cursor = bws(source, open);
    let mut parameters = Vec::new();

    if let Some(end) = lexical::literal(source, cursor, ")") {
        cursor = end;
    } else {
        loop {
            let parameter = function_parameter(source, cursor)?;
            cursor = parameter.span.end;
            parameters.push(parameter);
            let comma = bws(source, cursor);
            match lexical::literal(source, comma, ",") {
                Some(next) => cursor = bws(source, next),
                None => break,
            }
        }
        cursor = lexical::literal(source, bws(source, cursor), ")")?;
    }

    let method = SmolStr::new(&name.raw);
    Some(Token::new(
        TokenKind::FunctionExpression,
        pos..cursor,
        source,
        TokenValue::MethodCall { method, parameters },
    ))
}

fn function_parameter(source: &str, pos: usize) -> Option<Token> {
    let key_end = names::identifier_end(source, pos)?;
    let key = Token::new(TokenKind::ODataIdentifier, pos..key_end, source, TokenValue::None);
    let value_pos = lexical::literal(source, key_end, "=")?;
    let value = literals::primitive_literal(source, value_pos)?;
    let span = pos..value.span.end;
    Some(Token::new(
        TokenKind::FunctionParameter,
        span,
        source,
        TokenValue::Pair {
            key: Box::new(key),
            value: Box::new(value),
        },
    ))
}
