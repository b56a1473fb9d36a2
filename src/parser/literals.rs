//! Primitive literal combinators for the EDM type system.
//!
//! Each recogniser consumes one literal form and yields a `Literal` token
//! whose payload names the EDM type; the literal's value is recovered from
//! `raw` by downstream consumers. [`primitive_literal`] tries the forms in
//! an order that never lets a shorter literal mask a longer one
//! (`Edm.DateTimeOffset` probes before `Edm.Date`, `Edm.TimeOfDay` before
//! the numeric family).

use crate::ast::{Span, Token, TokenKind, TokenValue};
use crate::parser::lexical::{self, at};
use crate::parser::names;
use smol_str::SmolStr;

fn literal_token(source: &str, span: Span, edm_type: &str) -> Token {
    Token::new(
        TokenKind::Literal,
        span,
        source,
        TokenValue::Literal(SmolStr::new(edm_type)),
    )
}

/// Matches an ASCII keyword that must end on a word boundary.
fn keyword(source: &str, pos: usize, word: &str) -> Option<usize> {
    let end = lexical::literal(source, pos, word)?;
    if lexical::at_identifier_char(source, end) {
        None
    } else {
        Some(end)
    }
}

/// Case-insensitive ASCII match (WKT keywords, `SRID`, the `Z` zone).
fn literal_ci(source: &str, pos: usize, word: &str) -> Option<usize> {
    let bytes = source.as_bytes();
    let end = pos.checked_add(word.len())?;
    if end <= bytes.len() && bytes[pos..end].eq_ignore_ascii_case(word.as_bytes()) {
        Some(end)
    } else {
        None
    }
}

/// A single quote, either literal or percent-encoded (`%27`).
fn squote(source: &str, pos: usize) -> Option<usize> {
    lexical::literal(source, pos, "'").or_else(|| lexical::literal(source, pos, "%27"))
}

/// Parses any primitive literal.
///
/// Alternatives are ordered longest-match-first within each leading-prefix
/// family; keyword forms require a word boundary so that member paths such
/// as `trueness` or `nullable` are never shadowed.
pub fn primitive_literal(source: &str, pos: usize) -> Option<Token> {
    null_value(source, pos)
        .or_else(|| boolean_value(source, pos))
        .or_else(|| guid_value(source, pos))
        .or_else(|| date_time_offset_value(source, pos))
        .or_else(|| date_value(source, pos))
        .or_else(|| time_of_day_value(source, pos))
        .or_else(|| duration_value(source, pos))
        .or_else(|| binary_value(source, pos))
        .or_else(|| geo_value(source, pos, "geography", "Geography"))
        .or_else(|| geo_value(source, pos, "geometry", "Geometry"))
        .or_else(|| numeric_value(source, pos))
        .or_else(|| string_value(source, pos))
        .or_else(|| enum_value(source, pos))
}

/// `null`.
pub fn null_value(source: &str, pos: usize) -> Option<Token> {
    let end = keyword(source, pos, "null")?;
    Some(literal_token(source, pos..end, "null"))
}

/// `true` / `false`.
pub fn boolean_value(source: &str, pos: usize) -> Option<Token> {
    let end = keyword(source, pos, "true").or_else(|| keyword(source, pos, "false"))?;
    Some(literal_token(source, pos..end, "Edm.Boolean"))
}

/// `Edm.Guid`: 8-4-4-4-12 hex digits.
pub fn guid_value(source: &str, pos: usize) -> Option<Token> {
    let mut cursor = lexical::hexdigits(source, pos, 8)?;
    for group in [4usize, 4, 4, 12] {
        cursor = lexical::literal(source, cursor, "-")?;
        cursor = lexical::hexdigits(source, cursor, group)?;
    }
    if lexical::at_identifier_char(source, cursor) {
        return None;
    }
    Some(literal_token(source, pos..cursor, "Edm.Guid"))
}

/// `year "-" month "-" day` with the ABNF leading-zero rule.
fn date_end(source: &str, pos: usize) -> Option<usize> {
    let year_start = lexical::literal(source, pos, "-").unwrap_or(pos);
    let year_end = lexical::digits1(source, year_start)?;
    let year_len = year_end - year_start;
    if year_len < 4 || (at(source, year_start) == Some(b'0') && year_len != 4) {
        return None;
    }
    let cursor = lexical::literal(source, year_end, "-")?;
    let cursor = two_digits(source, cursor, 1, 12)?;
    let cursor = lexical::literal(source, cursor, "-")?;
    two_digits(source, cursor, 1, 31)
}

/// Exactly two digits whose value lies in `min..=max`.
fn two_digits(source: &str, pos: usize, min: u32, max: u32) -> Option<usize> {
    let end = lexical::digits(source, pos, 2)?;
    let value: u32 = source[pos..end].parse().ok()?;
    if (min..=max).contains(&value) {
        Some(end)
    } else {
        None
    }
}

/// `hour ":" minute [ ":" second [ "." fraction ] ]`.
fn time_end(source: &str, pos: usize) -> Option<usize> {
    let cursor = two_digits(source, pos, 0, 23)?;
    let cursor = lexical::literal(source, cursor, ":")?;
    let mut cursor = two_digits(source, cursor, 0, 59)?;
    if let Some(colon) = lexical::literal(source, cursor, ":") {
        if let Some(second_end) = two_digits(source, colon, 0, 59) {
            cursor = second_end;
            if let Some(dot) = lexical::literal(source, cursor, ".") {
                if let Some(fraction_end) = lexical::digits1(source, dot) {
                    if fraction_end - dot <= 12 {
                        cursor = fraction_end;
                    }
                }
            }
        }
    }
    Some(cursor)
}

/// `Edm.Date`.
pub fn date_value(source: &str, pos: usize) -> Option<Token> {
    let end = date_end(source, pos)?;
    if lexical::at_identifier_char(source, end) {
        return None;
    }
    Some(literal_token(source, pos..end, "Edm.Date"))
}

/// `Edm.TimeOfDay`.
pub fn time_of_day_value(source: &str, pos: usize) -> Option<Token> {
    let end = time_end(source, pos)?;
    if lexical::at_identifier_char(source, end) {
        return None;
    }
    Some(literal_token(source, pos..end, "Edm.TimeOfDay"))
}

/// `Edm.DateTimeOffset`: date `T` time, then `Z` or a signed offset.
pub fn date_time_offset_value(source: &str, pos: usize) -> Option<Token> {
    let cursor = date_end(source, pos)?;
    let cursor = lexical::literal(source, cursor, "T")?;
    let cursor = time_end(source, cursor)?;
    let end = match at(source, cursor) {
        Some(b'Z') | Some(b'z') => cursor + 1,
        Some(b'+') | Some(b'-') => {
            let offset = two_digits(source, cursor + 1, 0, 23)?;
            let offset = lexical::literal(source, offset, ":")?;
            two_digits(source, offset, 0, 59)?
        }
        _ => return None,
    };
    if lexical::at_identifier_char(source, end) {
        return None;
    }
    Some(literal_token(source, pos..end, "Edm.DateTimeOffset"))
}

/// `Edm.Duration`: `duration'[-]PnDTnHnMn.nS'` with at least one component.
pub fn duration_value(source: &str, pos: usize) -> Option<Token> {
    let cursor = lexical::literal(source, pos, "duration")?;
    let cursor = squote(source, cursor)?;
    let cursor = match at(source, cursor) {
        Some(b'+') | Some(b'-') => cursor + 1,
        _ => cursor,
    };
    let mut cursor = lexical::literal(source, cursor, "P")?;
    let mut components = 0usize;

    if let Some(end) = duration_component(source, cursor, b'D') {
        cursor = end;
        components += 1;
    }
    if let Some(time) = lexical::literal(source, cursor, "T") {
        let mut time_cursor = time;
        let mut time_components = 0usize;
        for unit in [b'H', b'M'] {
            if let Some(end) = duration_component(source, time_cursor, unit) {
                time_cursor = end;
                time_components += 1;
            }
        }
        if let Some(digits_end) = lexical::digits1(source, time_cursor) {
            let mut seconds_end = digits_end;
            if let Some(dot) = lexical::literal(source, seconds_end, ".") {
                seconds_end = lexical::digits1(source, dot)?;
            }
            time_cursor = lexical::literal(source, seconds_end, "S")?;
            time_components += 1;
        }
        if time_components == 0 {
            return None;
        }
        cursor = time_cursor;
        components += time_components;
    }
    if components == 0 {
        return None;
    }

    let end = squote(source, cursor)?;
    Some(literal_token(source, pos..end, "Edm.Duration"))
}

fn duration_component(source: &str, pos: usize, unit: u8) -> Option<usize> {
    let digits_end = lexical::digits1(source, pos)?;
    if at(source, digits_end) == Some(unit) {
        Some(digits_end + 1)
    } else {
        None
    }
}

/// `Edm.Binary`: `binary'<base64url>'` or the legacy `X'<hex>'` form.
pub fn binary_value(source: &str, pos: usize) -> Option<Token> {
    if let Some(open) = lexical::literal(source, pos, "binary").and_then(|p| squote(source, p)) {
        let mut cursor = open;
        while at(source, cursor).is_some_and(is_base64_char) {
            cursor += 1;
        }
        let end = squote(source, cursor)?;
        return Some(literal_token(source, pos..end, "Edm.Binary"));
    }

    let open = literal_ci(source, pos, "X").and_then(|p| squote(source, p))?;
    let mut cursor = open;
    while at(source, cursor).is_some_and(lexical::is_hexdig) {
        cursor += 1;
    }
    if (cursor - open) % 2 != 0 {
        return None;
    }
    let end = squote(source, cursor)?;
    Some(literal_token(source, pos..end, "Edm.Binary"))
}

fn is_base64_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'=')
}

/// Numeric literals: the integer family, `Edm.Decimal`, `Edm.Single`, and
/// `Edm.Double`.
///
/// Classification preserves the minimum-precision rule pinned by the test
/// fixtures: unsuffixed integers are `Edm.Int32` while they fit in 32
/// signed bits, `Edm.Int64` while they fit in 64, `Edm.Decimal` beyond; a
/// fraction makes `Edm.Decimal`, an exponent or `d` suffix `Edm.Double`,
/// an `f` suffix `Edm.Single`. `INF`, `-INF`, and `NaN` are `Edm.Double`.
pub fn numeric_value(source: &str, pos: usize) -> Option<Token> {
    let mut cursor = pos;
    let sign = at(source, cursor).filter(|&b| matches!(b, b'+' | b'-'));
    if sign.is_some() {
        cursor += 1;
    }

    if sign != Some(b'+') {
        if let Some(end) = keyword(source, cursor, "INF") {
            return Some(literal_token(source, pos..end, "Edm.Double"));
        }
    }
    if sign.is_none() {
        if let Some(end) = keyword(source, pos, "NaN") {
            return Some(literal_token(source, pos..end, "Edm.Double"));
        }
    }

    cursor = lexical::digits1(source, cursor)?;
    let mut has_fraction = false;
    if at(source, cursor) == Some(b'.') {
        if let Some(end) = lexical::digits1(source, cursor + 1) {
            cursor = end;
            has_fraction = true;
        }
    }
    let mut has_exponent = false;
    if matches!(at(source, cursor), Some(b'e') | Some(b'E')) {
        let mut exp = cursor + 1;
        if matches!(at(source, exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        if let Some(end) = lexical::digits1(source, exp) {
            cursor = end;
            has_exponent = true;
        }
    }

    let digits_end = cursor;
    let suffix = match at(source, cursor) {
        Some(b'f') | Some(b'F') if !lexical::at_identifier_char(source, cursor + 1) => {
            cursor += 1;
            Some("Edm.Single")
        }
        Some(b'd') | Some(b'D') if !lexical::at_identifier_char(source, cursor + 1) => {
            cursor += 1;
            Some("Edm.Double")
        }
        _ => None,
    };
    if lexical::at_identifier_char(source, cursor) {
        return None;
    }

    let edm_type = if let Some(suffix) = suffix {
        suffix
    } else if has_exponent {
        "Edm.Double"
    } else if has_fraction {
        "Edm.Decimal"
    } else {
        integer_type(&source[pos..digits_end])
    };
    Some(literal_token(source, pos..cursor, edm_type))
}

fn integer_type(digits: &str) -> &'static str {
    match digits.parse::<i128>() {
        Ok(value) if i32::try_from(value).is_ok() => "Edm.Int32",
        Ok(value) if i64::try_from(value).is_ok() => "Edm.Int64",
        _ => "Edm.Decimal",
    }
}

/// An unsigned integer literal, as required by `$top` and `$skip`.
pub fn unsigned_integer(source: &str, pos: usize) -> Option<Token> {
    let end = lexical::digits1(source, pos)?;
    if lexical::at_identifier_char(source, end) {
        return None;
    }
    Some(literal_token(source, pos..end, integer_type(&source[pos..end])))
}

/// `Edm.String`: single-quote delimited; a doubled quote (either `''` or
/// `%27%27`) is the escape for one quote. Raw control characters are
/// rejected.
pub fn string_value(source: &str, pos: usize) -> Option<Token> {
    let mut cursor = squote(source, pos)?;
    loop {
        if let Some(close) = squote(source, cursor) {
            match squote(source, close) {
                // Doubled quote: an escaped quote inside the string.
                Some(escaped) => {
                    cursor = escaped;
                    continue;
                }
                None => return Some(literal_token(source, pos..close, "Edm.String")),
            }
        }
        let ch = source[cursor..].chars().next()?;
        if ch.is_control() {
            return None;
        }
        cursor += ch.len_utf8();
    }
}

/// `Edm.Enum`: `Namespace.EnumType'member[,member...]'` where a member is
/// an identifier or an integer. The payload carries the qualified enum
/// type name.
pub fn enum_value(source: &str, pos: usize) -> Option<Token> {
    let type_name = names::qualified_type_name(source, pos)?;
    let mut cursor = squote(source, type_name.span.end)?;
    cursor = enum_member_end(source, cursor)?;
    while let Some(comma) = lexical::literal(source, cursor, ",") {
        cursor = enum_member_end(source, comma)?;
    }
    let end = squote(source, cursor)?;
    let value = SmolStr::new(&type_name.raw);
    Some(Token::new(
        TokenKind::Literal,
        pos..end,
        source,
        TokenValue::Literal(value),
    ))
}

fn enum_member_end(source: &str, pos: usize) -> Option<usize> {
    if let Some(end) = names::identifier_end(source, pos) {
        return Some(end);
    }
    let cursor = match at(source, pos) {
        Some(b'+') | Some(b'-') => pos + 1,
        _ => pos,
    };
    lexical::digits1(source, cursor)
}

/// Geography / geometry literals with a well-known-text body:
/// `geography'SRID=4326;Point(142.1 64.1)'`.
fn geo_value(source: &str, pos: usize, prefix: &str, edm_prefix: &str) -> Option<Token> {
    let cursor = literal_ci(source, pos, prefix)?;
    let cursor = squote(source, cursor)?;
    let cursor = literal_ci(source, cursor, "SRID")?;
    let cursor = lexical::literal(source, cursor, "=")?;
    let digits_end = lexical::digits1(source, cursor)?;
    if digits_end - cursor > 5 {
        return None;
    }
    let cursor = lexical::literal(source, digits_end, ";")?;
    let (shape, cursor) = wkt_shape(source, cursor)?;
    let end = squote(source, cursor)?;
    let edm_type = format!("Edm.{edm_prefix}{shape}");
    Some(literal_token(source, pos..end, &edm_type))
}

fn wkt_shape(source: &str, pos: usize) -> Option<(&'static str, usize)> {
    if let Some(cursor) = literal_ci(source, pos, "Point") {
        return Some(("Point", wkt_point_data(source, cursor)?));
    }
    if let Some(cursor) = literal_ci(source, pos, "LineString") {
        return Some(("LineString", wkt_line_string_data(source, cursor)?));
    }
    if let Some(cursor) = literal_ci(source, pos, "Polygon") {
        return Some(("Polygon", wkt_polygon_data(source, cursor)?));
    }
    if let Some(cursor) = literal_ci(source, pos, "Collection") {
        return Some(("Collection", wkt_collection_data(source, cursor)?));
    }
    None
}

fn wkt_point_data(source: &str, pos: usize) -> Option<usize> {
    let cursor = lexical::literal(source, pos, "(")?;
    let cursor = wkt_position(source, cursor)?;
    lexical::literal(source, cursor, ")")
}

fn wkt_line_string_data(source: &str, pos: usize) -> Option<usize> {
    let cursor = lexical::literal(source, pos, "(")?;
    let mut cursor = wkt_position(source, cursor)?;
    let mut positions = 1usize;
    while let Some(comma) = wkt_comma(source, cursor) {
        cursor = wkt_position(source, comma)?;
        positions += 1;
    }
    if positions < 2 {
        return None;
    }
    lexical::literal(source, cursor, ")")
}

fn wkt_polygon_data(source: &str, pos: usize) -> Option<usize> {
    let cursor = lexical::literal(source, pos, "(")?;
    let mut cursor = wkt_ring(source, cursor)?;
    while let Some(comma) = wkt_comma(source, cursor) {
        cursor = wkt_ring(source, comma)?;
    }
    lexical::literal(source, cursor, ")")
}

fn wkt_ring(source: &str, pos: usize) -> Option<usize> {
    let cursor = lexical::literal(source, pos, "(")?;
    let mut cursor = wkt_position(source, cursor)?;
    while let Some(comma) = wkt_comma(source, cursor) {
        cursor = wkt_position(source, comma)?;
    }
    lexical::literal(source, cursor, ")")
}

fn wkt_collection_data(source: &str, pos: usize) -> Option<usize> {
    let cursor = lexical::literal(source, pos, "(")?;
    let (_, mut cursor) = wkt_shape(source, cursor)?;
    while let Some(comma) = wkt_comma(source, cursor) {
        let (_, next) = wkt_shape(source, comma)?;
        cursor = next;
    }
    lexical::literal(source, cursor, ")")
}

fn wkt_comma(source: &str, pos: usize) -> Option<usize> {
    let mut cursor = lexical::literal(source, pos, ",")?;
    while at(source, cursor) == Some(b' ') {
        cursor += 1;
    }
    Some(cursor)
}

/// `doubleValue SP doubleValue` inside a WKT body.
fn wkt_position(source: &str, pos: usize) -> Option<usize> {
    let cursor = wkt_number(source, pos)?;
    let mut cursor = lexical::literal(source, cursor, " ")?;
    while at(source, cursor) == Some(b' ') {
        cursor += 1;
    }
    wkt_number(source, cursor)
}

fn wkt_number(source: &str, pos: usize) -> Option<usize> {
    let cursor = match at(source, pos) {
        Some(b'+') | Some(b'-') => pos + 1,
        _ => pos,
    };
    let mut cursor = lexical::digits1(source, cursor)?;
    if at(source, cursor) == Some(b'.') {
        if let Some(end) = lexical::digits1(source, cursor + 1) {
            cursor = end;
        }
    }
    Some(cursor)
}
