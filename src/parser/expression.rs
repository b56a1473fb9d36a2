//! Expression combinators: the precedence ladder for `$filter` and
//! `$orderby` expressions, method calls, member paths, and lambdas.
//!
//! Precedence from loosest to tightest binding: `or`, `and`, comparison,
//! `add`/`sub`, `mul`/`div`/`mod`, unary (`-`, `not`), primary. Binary
//! nodes span `left.start..right.end`, so `raw` always round-trips the
//! operator with its required whitespace.

use crate::ast::{Token, TokenKind, TokenValue};
use crate::metadata::Metadata;
use crate::parser::lexical::{self, at, bws, rws};
use crate::parser::literals;
use crate::parser::names;
use crate::parser::resource_path::key_predicate;
use smol_str::SmolStr;

/// Built-in method table: name, minimum arity, maximum arity.
const METHODS: &[(&str, usize, usize)] = &[
    ("contains", 2, 2),
    ("startswith", 2, 2),
    ("endswith", 2, 2),
    ("indexof", 2, 2),
    ("concat", 2, 2),
    ("substring", 2, 3),
    ("length", 1, 1),
    ("tolower", 1, 1),
    ("toupper", 1, 1),
    ("trim", 1, 1),
    ("year", 1, 1),
    ("month", 1, 1),
    ("day", 1, 1),
    ("hour", 1, 1),
    ("minute", 1, 1),
    ("second", 1, 1),
    ("fractionalseconds", 1, 1),
    ("totaloffsetminutes", 1, 1),
    ("date", 1, 1),
    ("time", 1, 1),
    ("now", 0, 0),
    ("mindatetime", 0, 0),
    ("maxdatetime", 0, 0),
    ("round", 1, 1),
    ("floor", 1, 1),
    ("ceiling", 1, 1),
    ("geo.distance", 2, 2),
    ("geo.intersects", 2, 2),
    ("geo.length", 1, 1),
];

/// Comparison operator table, applied without chaining.
const COMPARISONS: &[(&str, TokenKind)] = &[
    ("eq", TokenKind::EqualsExpression),
    ("ne", TokenKind::NotEqualsExpression),
    ("lt", TokenKind::LesserThanExpression),
    ("le", TokenKind::LesserOrEqualsExpression),
    ("gt", TokenKind::GreaterThanExpression),
    ("ge", TokenKind::GreaterOrEqualsExpression),
    ("has", TokenKind::HasExpression),
    ("in", TokenKind::InExpression),
];

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

/// Parses a boolean common expression (`$filter` root).
pub fn bool_common_expr(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    or_expr(source, pos, ctx)
}

fn or_expr(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    let mut left = and_expr(source, pos, ctx)?;
    loop {
        let Some(op) = rws(source, left.span.end)
            .and_then(|ws| lexical::literal(source, ws, "or"))
            .and_then(|end| rws(source, end))
        else {
            break;
        };
        let Some(right) = and_expr(source, op, ctx) else {
            break;
        };
        left = binary(source, TokenKind::OrExpression, left, right);
    }
    Some(left)
}

fn and_expr(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    let mut left = comparison_expr(source, pos, ctx)?;
    loop {
        let Some(op) = rws(source, left.span.end)
            .and_then(|ws| lexical::literal(source, ws, "and"))
            .and_then(|end| rws(source, end))
        else {
            break;
        };
        let Some(right) = comparison_expr(source, op, ctx) else {
            break;
        };
        left = binary(source, TokenKind::AndExpression, left, right);
    }
    Some(left)
}

fn comparison_expr(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    let left = common_expr(source, pos, ctx)?;
    let Some(ws) = rws(source, left.span.end) else {
        return Some(left);
    };
    for (op, kind) in COMPARISONS {
        let Some(rhs_pos) = lexical::literal(source, ws, op).and_then(|end| rws(source, end))
        else {
            continue;
        };
        let right = if *kind == TokenKind::InExpression {
            list_expr(source, rhs_pos, ctx).or_else(|| common_expr(source, rhs_pos, ctx))
        } else {
            common_expr(source, rhs_pos, ctx)
        };
        let Some(right) = right else {
            continue;
        };
        return Some(binary(source, *kind, left, right));
    }
    Some(left)
}

/// Parses a common (arithmetic) expression.
pub fn common_expr(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    add_expr(source, pos, ctx)
}

fn add_expr(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    let mut left = mul_expr(source, pos, ctx)?;
    loop {
        let Some(ws) = rws(source, left.span.end) else {
            break;
        };
        let op = [
            ("add", TokenKind::AddExpression),
            ("sub", TokenKind::SubExpression),
        ]
        .iter()
        .find_map(|(word, kind)| {
            lexical::literal(source, ws, word)
                .and_then(|end| rws(source, end))
                .map(|rhs_pos| (*kind, rhs_pos))
        });
        let Some((kind, rhs_pos)) = op else {
            break;
        };
        let Some(right) = mul_expr(source, rhs_pos, ctx) else {
            break;
        };
        left = binary(source, kind, left, right);
    }
    Some(left)
}

fn mul_expr(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    let mut left = unary_expr(source, pos, ctx)?;
    loop {
        let Some(ws) = rws(source, left.span.end) else {
            break;
        };
        let op = [
            ("mul", TokenKind::MulExpression),
            ("div", TokenKind::DivExpression),
            ("mod", TokenKind::ModExpression),
        ]
        .iter()
        .find_map(|(word, kind)| {
            lexical::literal(source, ws, word)
                .and_then(|end| rws(source, end))
                .map(|rhs_pos| (*kind, rhs_pos))
        });
        let Some((kind, rhs_pos)) = op else {
            break;
        };
        let Some(right) = unary_expr(source, rhs_pos, ctx) else {
            break;
        };
        left = binary(source, kind, left, right);
    }
    Some(left)
}

fn unary_expr(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    // `not` binds a full unary expression; `notation`-style member paths
    // fall through because the required whitespace is missing.
    if let Some(operand_pos) =
        lexical::literal(source, pos, "not").and_then(|end| rws(source, end))
    {
        if let Some(operand) = unary_expr(source, operand_pos, ctx) {
            let span = pos..operand.span.end;
            return Some(Token::new(
                TokenKind::NotExpression,
                span,
                source,
                TokenValue::Single(Box::new(operand)),
            ));
        }
    }
    if let Some(primary) = primary_expr(source, pos, ctx) {
        return Some(primary);
    }
    // Signed literals are handled by the literal layer, so a surviving `-`
    // negates a non-literal operand.
    if at(source, pos) == Some(b'-') {
        let operand_pos = bws(source, pos + 1);
        if let Some(operand) = unary_expr(source, operand_pos, ctx) {
            let span = pos..operand.span.end;
            return Some(Token::new(
                TokenKind::NegateExpression,
                span,
                source,
                TokenValue::Single(Box::new(operand)),
            ));
        }
    }
    None
}

fn primary_expr(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    paren_expr(source, pos, ctx)
        .or_else(|| method_call_expr(source, pos, ctx))
        .or_else(|| typed_call_expr(source, pos, ctx, "isof", TokenKind::IsOfExpression))
        .or_else(|| typed_call_expr(source, pos, ctx, "cast", TokenKind::CastExpression))
        .or_else(|| literals::primitive_literal(source, pos))
        .or_else(|| root_expr(source, pos, ctx))
        .or_else(|| first_member_expr(source, pos, ctx))
}

fn paren_expr(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    let cursor = lexical::literal(source, pos, "(")?;
    let inner_pos = bws(source, cursor);
    let inner = bool_common_expr(source, inner_pos, ctx)?;
    let close = bws(source, inner.span.end);
    let end = lexical::literal(source, close, ")")?;
    Some(Token::new(
        TokenKind::ParenExpression,
        pos..end,
        source,
        TokenValue::Single(Box::new(inner)),
    ))
}

/// Parenthesised expression list, the right-hand side of `in`.
fn list_expr(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    let cursor = lexical::literal(source, pos, "(")?;
    let item_pos = bws(source, cursor);
    let first = common_expr(source, item_pos, ctx)?;
    let mut items = vec![first];
    let mut cursor = items.last().expect("one item").span.end;
    loop {
        let comma = bws(source, cursor);
        let Some(next_pos) = lexical::literal(source, comma, ",") else {
            break;
        };
        let item = common_expr(source, bws(source, next_pos), ctx)?;
        cursor = item.span.end;
        items.push(item);
    }
    let close = bws(source, cursor);
    let end = lexical::literal(source, close, ")")?;
    Some(Token::new(
        TokenKind::ListExpression,
        pos..end,
        source,
        TokenValue::Items(items),
    ))
}

fn method_call_expr(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    for (name, min, max) in METHODS {
        let Some(open) = lexical::literal(source, pos, name)
            .and_then(|end| lexical::literal(source, end, "("))
        else {
            continue;
        };
        let (parameters, end) = call_parameters(source, open, ctx, *min, *max)?;
        return Some(Token::new(
            TokenKind::MethodCallExpression,
            pos..end,
            source,
            TokenValue::MethodCall {
                method: SmolStr::new(name),
                parameters,
            },
        ));
    }
    None
}

/// Parses `BWS [ arg *( BWS "," BWS arg ) ] BWS ")"` with an arity check.
fn call_parameters(
    source: &str,
    open: usize,
    ctx: &Metadata,
    min: usize,
    max: usize,
) -> Option<(Vec<Token>, usize)> {
    let mut cursor = bws(source, open);
    let mut parameters = Vec::new();
    if let Some(arg) = common_expr(source, cursor, ctx) {
        cursor = arg.span.end;
        parameters.push(arg);
        loop {
            let comma = bws(source, cursor);
            let Some(arg_pos) = lexical::literal(source, comma, ",") else {
                break;
            };
            let arg = common_expr(source, bws(source, arg_pos), ctx)?;
            cursor = arg.span.end;
            parameters.push(arg);
        }
    }
    let close = bws(source, cursor);
    let end = lexical::literal(source, close, ")")?;
    if (min..=max).contains(&parameters.len()) {
        Some((parameters, end))
    } else {
        None
    }
}

/// `cast(...)` / `isof(...)`: an optional expression plus a required type.
fn typed_call_expr(
    source: &str,
    pos: usize,
    ctx: &Metadata,
    name: &str,
    kind: TokenKind,
) -> Option<Token> {
    let open = lexical::literal(source, pos, name)
        .and_then(|end| lexical::literal(source, end, "("))?;
    let inner = bws(source, open);

    let mut parameters = Vec::new();
    let cursor = match names::qualified_type_name(source, inner) {
        Some(type_name)
            if lexical::literal(source, bws(source, type_name.span.end), ")").is_some() =>
        {
            let cursor = bws(source, type_name.span.end);
            parameters.push(type_name);
            cursor
        }
        _ => {
            let expr = common_expr(source, inner, ctx)?;
            let comma = bws(source, expr.span.end);
            let type_pos = bws(source, lexical::literal(source, comma, ",")?);
            let type_name = names::qualified_type_name(source, type_pos)?;
            let cursor = bws(source, type_name.span.end);
            parameters.push(expr);
            parameters.push(type_name);
            cursor
        }
    };
    let end = lexical::literal(source, cursor, ")")?;
    Some(Token::new(
        kind,
        pos..end,
        source,
        TokenValue::MethodCall {
            method: SmolStr::new(name),
            parameters,
        },
    ))
}

/// `$root/EntitySet(key)/Property/...`.
fn root_expr(source: &str, pos: usize, _ctx: &Metadata) -> Option<Token> {
    let cursor = lexical::literal(source, pos, "$root/")?;
    let head_end = names::identifier_end(source, cursor)?;
    let mut items = vec![Token::new(
        TokenKind::EntitySetName,
        cursor..head_end,
        source,
        TokenValue::None,
    )];
    let mut cursor = head_end;
    if let Some(key) = key_predicate(source, cursor) {
        cursor = key.span.end;
        items.push(key);
    }
    loop {
        let Some(seg_pos) = lexical::literal(source, cursor, "/") else {
            break;
        };
        let Some(segment) = path_segment(source, seg_pos) else {
            break;
        };
        cursor = segment.span.end;
        items.push(segment);
        if let Some(key) = key_predicate(source, cursor) {
            cursor = key.span.end;
            items.push(key);
        }
    }
    Some(Token::new(
        TokenKind::RootExpression,
        pos..cursor,
        source,
        TokenValue::Items(items),
    ))
}

/// One member-path segment: a type-cast (qualified name) or a property.
pub(crate) fn path_segment(source: &str, pos: usize) -> Option<Token> {
    if let Some(cast) = names::qualified_type_name(source, pos) {
        return Some(cast);
    }
    let end = names::identifier_end(source, pos)?;
    Some(Token::new(
        TokenKind::PropertyPathExpression,
        pos..end,
        source,
        TokenValue::None,
    ))
}

/// Member path, possibly terminated by an `any`/`all` lambda.
fn first_member_expr(source: &str, pos: usize, ctx: &Metadata) -> Option<Token> {
    let first = path_segment(source, pos)?;
    let mut cursor = first.span.end;
    let mut segments = vec![first];
    loop {
        let Some(seg_pos) = lexical::literal(source, cursor, "/") else {
            break;
        };
        if let Some(lambda) = lambda_expr(source, seg_pos, pos, &segments, ctx) {
            return Some(lambda);
        }
        let Some(segment) = path_segment(source, seg_pos) else {
            break;
        };
        cursor = segment.span.end;
        segments.push(segment);
    }
    Some(Token::new(
        TokenKind::FirstMemberExpression,
        pos..cursor,
        source,
        TokenValue::Items(segments),
    ))
}

/// `any(v: predicate)` / `all(v: predicate)` after a collection path.
/// `any()` and `all()` with an empty body are permitted.
fn lambda_expr(
    source: &str,
    pos: usize,
    path_start: usize,
    segments: &[Token],
    ctx: &Metadata,
) -> Option<Token> {
    let (kind, name_end) = if let Some(end) = lexical::literal(source, pos, "any") {
        (TokenKind::AnyExpression, end)
    } else if let Some(end) = lexical::literal(source, pos, "all") {
        (TokenKind::AllExpression, end)
    } else {
        return None;
    };
    let open = lexical::literal(source, name_end, "(")?;
    let body = bws(source, open);

    let mut variable = None;
    let mut predicate = None;
    let end = if let Some(end) = lexical::literal(source, body, ")") {
        end
    } else {
        let ident_end = names::identifier_end(source, body)?;
        let range_variable = Token::new(
            TokenKind::LambdaVariableExpression,
            body..ident_end,
            source,
            TokenValue::None,
        );
        let colon = bws(source, ident_end);
        let pred_pos = bws(source, lexical::literal(source, colon, ":")?);
        let pred = bool_common_expr(source, pred_pos, ctx)?;
        let close = bws(source, pred.span.end);
        let end = lexical::literal(source, close, ")")?;
        variable = Some(Box::new(range_variable));
        predicate = Some(Box::new(pred));
        end
    };

    let collection_span = path_start..segments.last().expect("non-empty path").span.end;
    let collection = Token::new(
        TokenKind::FirstMemberExpression,
        collection_span,
        source,
        TokenValue::Items(segments.to_vec()),
    );
    Some(Token::new(
        kind,
        path_start..end,
        source,
        TokenValue::Lambda {
            collection: Box::new(collection),
            variable,
            predicate,
        },
    ))
}
