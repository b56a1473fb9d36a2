//! The `$search` mini-grammar: phrases, words, `NOT`, implicit and
//! explicit `AND`, and `OR`.

use crate::ast::{Token, TokenKind, TokenValue};
use crate::parser::lexical::{self, at, rws};

/// Search operator words; these never parse as search words.
const OPERATORS: &[&str] = &["AND", "OR", "NOT"];

fn binary(source: &str, kind: TokenKind, left: Token, right: Token) -> Token {
    let span = left.span.start..right.span.end;
    Token::new(
        kind,
        span,
        source,
        TokenValue::Binary {
            left: Box::new(left),
            right: Box::new(right),
        },
    )
}

/// Parses a search expression (`$search` root).
pub fn search_expr(source: &str, pos: usize) -> Option<Token> {
    search_or_expr(source, pos)
}

fn search_or_expr(source: &str, pos: usize) -> Option<Token> {
    let mut left = search_and_expr(source, pos)?;
    loop {
        let Some(rhs_pos) = rws(source, left.span.end)
            .and_then(|ws| lexical::literal(source, ws, "OR"))
            .and_then(|end| rws(source, end))
        else {
            break;
        };
        let Some(right) = search_and_expr(source, rhs_pos) else {
            break;
        };
        left = binary(source, TokenKind::SearchOrExpression, left, right);
    }
    Some(left)
}

/// Adjacent terms combine with an implicit `AND`; an explicit `AND` word
/// is consumed when present.
fn search_and_expr(source: &str, pos: usize) -> Option<Token> {
    let mut left = search_term(source, pos)?;
    loop {
        let Some(ws) = rws(source, left.span.end) else {
            break;
        };
        let term_pos = lexical::literal(source, ws, "AND")
            .and_then(|end| rws(source, end))
            .unwrap_or(ws);
        let Some(right) = search_term(source, term_pos) else {
            break;
        };
        left = binary(source, TokenKind::SearchAndExpression, left, right);
    }
    Some(left)
}

fn search_term(source: &str, pos: usize) -> Option<Token> {
    if let Some(operand_pos) =
        lexical::literal(source, pos, "NOT").and_then(|end| rws(source, end))
    {
        if let Some(operand) = search_term(source, operand_pos) {
            let span = pos..operand.span.end;
            return Some(Token::new(
                TokenKind::SearchNotExpression,
                span,
                source,
                TokenValue::Single(Box::new(operand)),
            ));
        }
    }
    search_phrase(source, pos).or_else(|| search_word(source, pos))
}

/// A double-quoted phrase; the quotes are part of the token's span.
fn search_phrase(source: &str, pos: usize) -> Option<Token> {
    let mut cursor = lexical::literal(source, pos, "\"")?;
    let content_start = cursor;
    loop {
        match at(source, cursor) {
            Some(b'"') => break,
            Some(b'&') | None => return None,
            Some(byte) if byte < 0x20 => return None,
            Some(_) => {
                let ch = source[cursor..].chars().next()?;
                cursor += ch.len_utf8();
            }
        }
    }
    if cursor == content_start {
        return None;
    }
    Some(Token::new(
        TokenKind::SearchPhrase,
        pos..cursor + 1,
        source,
        TokenValue::None,
    ))
}

/// One or more letters or digits; the operator words themselves are
/// excluded so the AND/OR/NOT lookahead stays unambiguous.
fn search_word(source: &str, pos: usize) -> Option<Token> {
    let mut cursor = pos;
    loop {
        let Some(ch) = source[cursor.min(source.len())..].chars().next() else {
            break;
        };
        if !ch.is_alphanumeric() {
            break;
        }
        cursor += ch.len_utf8();
    }
    if cursor == pos || OPERATORS.contains(&&source[pos..cursor]) {
        return None;
    }
    Some(Token::new(
        TokenKind::SearchWord,
        pos..cursor,
        source,
        TokenValue::None,
    ))
}
