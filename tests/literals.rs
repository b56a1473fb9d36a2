//! Primitive literal fixtures. The integer boundary cases pin the
//! minimum-precision typing rule.

mod common;

use common::parse_ok;
use odata_parser::{ParseError, TokenKind, TokenValue, parse_literal};

fn edm_type_of(source: &str) -> String {
    let token = parse_ok(parse_literal, source);
    assert_eq!(token.kind, TokenKind::Literal);
    match token.value {
        TokenValue::Literal(edm) => edm.to_string(),
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn int32_boundaries() {
    assert_eq!(edm_type_of("2147483647"), "Edm.Int32");
    assert_eq!(edm_type_of("-2147483648"), "Edm.Int32");
    assert_eq!(edm_type_of("2147483648"), "Edm.Int64");
    assert_eq!(edm_type_of("-2147483649"), "Edm.Int64");
}

#[test]
fn int64_boundaries() {
    assert_eq!(edm_type_of("9223372036854775807"), "Edm.Int64");
    assert_eq!(edm_type_of("-9223372036854775808"), "Edm.Int64");
    assert_eq!(edm_type_of("9223372036854775808"), "Edm.Decimal");
    assert_eq!(edm_type_of("170141183460469231731687303715884105728"), "Edm.Decimal");
}

#[test]
fn floating_point_family() {
    assert_eq!(edm_type_of("0.5"), "Edm.Decimal");
    assert_eq!(edm_type_of("1e5"), "Edm.Double");
    assert_eq!(edm_type_of("-1.25e-3"), "Edm.Double");
    assert_eq!(edm_type_of("3.5f"), "Edm.Single");
    assert_eq!(edm_type_of("3.5D"), "Edm.Double");
    assert_eq!(edm_type_of("INF"), "Edm.Double");
    assert_eq!(edm_type_of("-INF"), "Edm.Double");
    assert_eq!(edm_type_of("NaN"), "Edm.Double");
}

#[test]
fn string_with_escaped_quote() {
    let token = parse_ok(parse_literal, "'O''Neil'");
    assert_eq!(token.raw, "'O''Neil'");
    assert_eq!(token.value, TokenValue::Literal("Edm.String".into()));

    let token = parse_ok(parse_literal, "%27O%27%27Neil%27");
    assert_eq!(token.value, TokenValue::Literal("Edm.String".into()));
}

#[test]
fn temporal_fixtures() {
    for (source, expected) in [
        ("2000-12-31", "Edm.Date"),
        ("-0300-03-01", "Edm.Date"),
        ("23:59:59.999", "Edm.TimeOfDay"),
        ("2000-12-31T23:59:59Z", "Edm.DateTimeOffset"),
        ("2000-12-31T23:59:59.999-08:00", "Edm.DateTimeOffset"),
        ("duration'P1DT2H3M4.5S'", "Edm.Duration"),
    ] {
        assert_eq!(edm_type_of(source), expected, "for {source:?}");
    }
}

#[test]
fn identity_binary_geo_enum() {
    assert_eq!(
        edm_type_of("0b3e4bcf-e3e6-4d0a-9a4b-44b12e6b0b3c"),
        "Edm.Guid"
    );
    assert_eq!(edm_type_of("binary'T2RhdGE='"), "Edm.Binary");
    assert_eq!(edm_type_of("X'00FF'"), "Edm.Binary");
    assert_eq!(
        edm_type_of("geography'SRID=4326;Point(142.1 64.1)'"),
        "Edm.GeographyPoint"
    );
    assert_eq!(
        edm_type_of("geometry'SRID=0;Polygon((0 0, 0 1, 1 0, 0 0))'"),
        "Edm.GeometryPolygon"
    );
    assert_eq!(edm_type_of("Sales.Pattern'Yellow,Striped'"), "Sales.Pattern");
}

#[test]
fn keyword_literals_and_null() {
    assert_eq!(edm_type_of("true"), "Edm.Boolean");
    assert_eq!(edm_type_of("false"), "Edm.Boolean");
    assert_eq!(edm_type_of("null"), "null");
}

#[test]
fn trailing_input_after_a_literal() {
    let error = parse_literal("123abc").unwrap_err();
    assert!(matches!(error, ParseError::EmptyParse { .. }));

    let error = parse_literal("'John' ").unwrap_err();
    assert_eq!(
        error,
        ParseError::TrailingInput {
            rule: "primitive literal",
            position: 6,
        }
    );
}

#[test]
fn malformed_literals_do_not_match() {
    for source in [
        "2024-13-40",
        "duration'X'",
        "binary'***'",
        "geography'Point(1 1)'",
        "'unterminated",
    ] {
        assert!(parse_literal(source).is_err(), "for {source:?}");
    }
}
