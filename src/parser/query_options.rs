//! Query-option combinators: the `&`-separated option list and every
//! system option, plus custom options.
//!
//! System options are tried in a fixed order; an unknown `$`-prefixed name
//! fails the whole option (it never falls through to a custom option, the
//! `$` prefix is reserved).

use crate::ast::{SortDirection, Token, TokenKind, TokenValue};
use crate::metadata::Metadata;
use crate::parser::expression::{bool_common_expr, path_segment};
use crate::parser::lexical::{self, at, bws};
use crate::parser::literals;
use crate::parser::search::search_expr;
use smol_str::SmolStr;

/// Parses `queryOption *( "&" queryOption )`.
pub fn query_options(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    let first = query_option(source, pos, ctx)?;
    let mut cursor = first.span.end;
    let mut options = vec![first];
    while let Some(next_pos) = lexical::literal(source, cursor, "&") {
        let Some(option) = query_option(source, next_pos, ctx) else {
            break;
        };
        cursor = option.span.end;
        options.push(option);
    }
    Some(Token::new(
        TokenKind::QueryOptions,
        pos..cursor,
        source,
        TokenValue::Options(options),
    ))
}

fn query_option(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    system_query_option(source, pos, ctx).or_else(|| custom_query_option(source, pos))
}

fn system_query_option(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    filter_option(source, pos, ctx)
        .or_else(|| select_option(source, pos))
        .or_else(|| expand_option(source, pos, ctx))
        .or_else(|| orderby_option(source, pos, ctx))
        .or_else(|| top_option(source, pos))
        .or_else(|| skip_option(source, pos))
        .or_else(|| count_option(source, pos))
        .or_else(|| search_option(source, pos))
        .or_else(|| format_option(source, pos))
        .or_else(|| skiptoken_option(source, pos))
        .or_else(|| levels_option(source, pos))
}

fn filter_option(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    let expr_pos = lexical::literal(source, pos, "$filter=")?;
    let expr = bool_common_expr(source, expr_pos, ctx)?;
    let span = pos..expr.span.end;
    Some(Token::new(
        TokenKind::Filter,
        span,
        source,
        TokenValue::Single(Box::new(expr)),
    ))
}

fn select_option(source: &str, pos: usize) -> Option<Token> {
    let item_pos = lexical::literal(source, pos, "$select=")?;
    let first = select_item(source, item_pos)?;
    let mut cursor = first.span.end;
    let mut items = vec![first];
    while let Some(next_pos) = lexical::literal(source, cursor, ",") {
        let item = select_item(source, next_pos)?;
        cursor = item.span.end;
        items.push(item);
    }
    Some(Token::new(
        TokenKind::Select,
        pos..cursor,
        source,
        TokenValue::Items(items),
    ))
}

fn select_item(source: &str, pos: usize) -> Option<Token> {
    if let Some(end) = lexical::literal(source, pos, "*") {
        return Some(Token::new(
            TokenKind::SelectItem,
            pos..end,
            source,
            TokenValue::None,
        ));
    }
    let segments = segment_path(source, pos)?;
    let span = pos..segments.last().expect("non-empty path").span.end;
    Some(Token::new(
        TokenKind::SelectItem,
        span,
        source,
        TokenValue::Items(segments),
    ))
}

/// `/`-separated property or type-cast segments.
fn segment_path(source: &str, pos: usize) -> Option<Vec<Token>> {
    let first = path_segment(source, pos)?;
    let mut cursor = first.span.end;
    let mut segments = vec![first];
    loop {
        let Some(seg_pos) = lexical::literal(source, cursor, "/") else {
            break;
        };
        let Some(segment) = path_segment(source, seg_pos) else {
            break;
        };
        cursor = segment.span.end;
        segments.push(segment);
    }
    Some(segments)
}

fn expand_option(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    let item_pos = lexical::literal(source, pos, "$expand=")?;
    let first = expand_item(source, item_pos, ctx)?;
    let mut cursor = first.span.end;
    let mut items = vec![first];
    while let Some(next_pos) = lexical::literal(source, cursor, ",") {
        let item = expand_item(source, next_pos, ctx)?;
        cursor = item.span.end;
        items.push(item);
    }
    Some(Token::new(
        TokenKind::Expand,
        pos..cursor,
        source,
        TokenValue::Items(items),
    ))
}

/// `path [ "(" expandOption *( ";" expandOption ) ")" ]`.
fn expand_item(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    let segments = segment_path(source, pos)?;
    let path_span = pos..segments.last().expect("non-empty path").span.end;
    let path = Token::new(
        TokenKind::ExpandPath,
        path_span.clone(),
        source,
        TokenValue::Items(segments),
    );

    let mut options = Vec::new();
    let mut cursor = path_span.end;
    if let Some(open) = lexical::literal(source, cursor, "(") {
        let first = expand_nested_option(source, open, ctx)?;
        let mut nested_cursor = first.span.end;
        options.push(first);
        while let Some(next_pos) = lexical::literal(source, nested_cursor, ";") {
            let option = expand_nested_option(source, next_pos, ctx)?;
            nested_cursor = option.span.end;
            options.push(option);
        }
        cursor = lexical::literal(source, nested_cursor, ")")?;
    }

    Some(Token::new(
        TokenKind::ExpandItem,
        pos..cursor,
        source,
        TokenValue::ExpandItem {
            path: Box::new(path),
            options,
        },
    ))
}

/// Options permitted inside an `$expand` item. `$count=` is deliberately
/// not among them, nor are `$format`, `$skiptoken`, or custom options.
fn expand_nested_option(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    filter_option(source, pos, ctx)
        .or_else(|| select_option(source, pos))
        .or_else(|| expand_option(source, pos, ctx))
        .or_else(|| orderby_option(source, pos, ctx))
        .or_else(|| top_option(source, pos))
        .or_else(|| skip_option(source, pos))
        .or_else(|| levels_option(source, pos))
        .or_else(|| search_option(source, pos))
}

fn orderby_option(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    let item_pos = lexical::literal(source, pos, "$orderby=")?;
    let first = orderby_item(source, item_pos, ctx)?;
    let mut cursor = first.span.end;
    let mut items = vec![first];
    while let Some(next_pos) = lexical::literal(source, cursor, ",") {
        let item = orderby_item(source, next_pos, ctx)?;
        cursor = item.span.end;
        items.push(item);
    }
    Some(Token::new(
        TokenKind::OrderBy,
        pos..cursor,
        source,
        TokenValue::Items(items),
    ))
}

/// `commonExpr [ RWS ( "asc" / "desc" ) ]`; ascending when absent.
fn orderby_item(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    let expression = bool_common_expr(source, pos, ctx)?;
    let mut direction = SortDirection::Ascending;
    let mut cursor = expression.span.end;
    if let Some(ws) = lexical::rws(source, cursor) {
        for (word, parsed) in [
            ("asc", SortDirection::Ascending),
            ("desc", SortDirection::Descending),
        ] {
            if let Some(end) = lexical::literal(source, ws, word) {
                if !lexical::at_identifier_char(source, end) {
                    direction = parsed;
                    cursor = end;
                    break;
                }
            }
        }
    }
    Some(Token::new(
        TokenKind::OrderByItem,
        pos..cursor,
        source,
        TokenValue::OrderByItem {
            expression: Box::new(expression),
            direction,
        },
    ))
}

fn top_option(source: &str, pos: usize) -> Option<Token> {
    let value_pos = lexical::literal(source, pos, "$top=")?;
    let value = literals::unsigned_integer(source, value_pos)?;
    let span = pos..value.span.end;
    Some(Token::new(
        TokenKind::Top,
        span,
        source,
        TokenValue::Single(Box::new(value)),
    ))
}

fn skip_option(source: &str, pos: usize) -> Option<Token> {
    let value_pos = lexical::literal(source, pos, "$skip=")?;
    let value = literals::unsigned_integer(source, value_pos)?;
    let span = pos..value.span.end;
    Some(Token::new(
        TokenKind::Skip,
        span,
        source,
        TokenValue::Single(Box::new(value)),
    ))
}

fn count_option(source: &str, pos: usize) -> Option<Token> {
    let value_pos = lexical::literal(source, pos, "$count=")?;
    let value = literals::boolean_value(source, value_pos)?;
    let span = pos..value.span.end;
    Some(Token::new(
        TokenKind::InlineCount,
        span,
        source,
        TokenValue::Single(Box::new(value)),
    ))
}

fn search_option(source: &str, pos: usize) -> Option<Token> {
    let expr_pos = lexical::literal(source, pos, "$search=")?;
    let expr = search_expr(source, bws(source, expr_pos))?;
    let span = pos..expr.span.end;
    Some(Token::new(
        TokenKind::Search,
        span,
        source,
        TokenValue::Single(Box::new(expr)),
    ))
}

/// `$format` accepts the short names only; media types are unsupported.
fn format_option(source: &str, pos: usize) -> Option<Token> {
    let value_pos = lexical::literal(source, pos, "$format=")?;
    for word in ["atom", "json", "xml"] {
        if let Some(end) = lexical::literal(source, value_pos, word) {
            if matches!(at(source, end), None | Some(b'&')) {
                return Some(Token::new(
                    TokenKind::Format,
                    pos..end,
                    source,
                    TokenValue::Text(SmolStr::new(word)),
                ));
            }
        }
    }
    None
}

fn skiptoken_option(source: &str, pos: usize) -> Option<Token> {
    let value_pos = lexical::literal(source, pos, "$skiptoken=")?;
    let mut cursor = value_pos;
    while let Some(next) = lexical::qchar_no_amp(source, cursor) {
        cursor = next;
    }
    if cursor == value_pos {
        return None;
    }
    let value = SmolStr::new(&source[value_pos..cursor]);
    Some(Token::new(
        TokenKind::SkipToken,
        pos..cursor,
        source,
        TokenValue::Text(value),
    ))
}

fn levels_option(source: &str, pos: usize) -> Option<Token> {
    let value_pos = lexical::literal(source, pos, "$levels=")?;
    let end = lexical::digits1(source, value_pos)
        .or_else(|| lexical::literal(source, value_pos, "max"))?;
    if lexical::at_identifier_char(source, end) {
        return None;
    }
    let value = SmolStr::new(&source[value_pos..end]);
    Some(Token::new(
        TokenKind::Levels,
        pos..end,
        source,
        TokenValue::Text(value),
    ))
}

/// `name[=value]` where the name must not carry the reserved `$` prefix
/// (nor `@` aliases or `!` names, which are unsupported).
fn custom_query_option(source: &str, pos: usize) -> Option<Token> {
    if matches!(at(source, pos), Some(b'$') | Some(b'@') | Some(b'!')) {
        return None;
    }
    let key_end = custom_chars(source, pos, true);
    if key_end == pos {
        return None;
    }
    let mut cursor = key_end;
    let mut value_range = cursor..cursor;
    if let Some(value_pos) = lexical::literal(source, cursor, "=") {
        cursor = custom_chars(source, value_pos, false);
        value_range = value_pos..cursor;
    }
    Some(Token::new(
        TokenKind::CustomQueryOption,
        pos..cursor,
        source,
        TokenValue::KeyValue {
            key: SmolStr::new(&source[pos..key_end]),
            value: SmolStr::new(&source[value_range]),
        },
    ))
}

/// Consumes `qchar-no-AMP` characters; when `stop_at_eq` the literal `=`
/// also terminates (the key side of a custom option).
fn custom_chars(source: &str, pos: usize, stop_at_eq: bool) -> usize {
    let mut cursor = pos;
    loop {
        if stop_at_eq && at(source, cursor) == Some(b'=') {
            break;
        }
        match lexical::qchar_no_amp(source, cursor) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    cursor
}
