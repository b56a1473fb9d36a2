//! Resource path and key predicate tests, plus full-URI assembly.

mod common;

use common::{edm_type, inner, items, parse_ok};
use odata_parser::{
    Metadata, ParseError, TokenKind, TokenValue, parse_keys, parse_odata_uri,
    parse_resource_path, parse_resource_path_with,
};

fn path(source: &str) -> odata_parser::Token {
    parse_ok(parse_resource_path, source)
}

#[test]
fn bare_entity_set() {
    let token = path("Products");
    assert_eq!(token.kind, TokenKind::ResourcePath);
    let segments = items(&token);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].kind, TokenKind::EntitySetName);
}

#[test]
fn entity_set_with_keys_of_each_shape() {
    let token = path("Products(42)");
    let key = &items(&token)[1];
    assert_eq!(key.kind, TokenKind::KeyPredicate);
    assert_eq!(edm_type(inner(key)), "Edm.Int32");

    let token = path("Customers('ALFKI')");
    assert_eq!(edm_type(inner(&items(&token)[1])), "Edm.String");

    let token = path("Entries(0b3e4bcf-e3e6-4d0a-9a4b-44b12e6b0b3c)");
    assert_eq!(edm_type(inner(&items(&token)[1])), "Edm.Guid");
}

#[test]
fn compound_keys_require_named_pairs() {
    let token = parse_ok(parse_keys, "(OrderId=1,LineNumber=2)");
    assert_eq!(token.kind, TokenKind::KeyPredicate);
    let pairs = items(&token);
    assert_eq!(pairs.len(), 2);
    let TokenValue::Pair { key, value } = &pairs[0].value else {
        panic!("expected pair payload");
    };
    assert_eq!(key.raw, "OrderId");
    assert_eq!(value.raw, "1");
}

#[test]
fn navigation_with_casts_and_functions() {
    let token = path("Products(1)/Sales.DiscontinuedProduct/ReplacedBy");
    let kinds: Vec<_> = items(&token).iter().map(|segment| segment.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::EntitySetName,
            TokenKind::KeyPredicate,
            TokenKind::QualifiedEntityTypeName,
            TokenKind::PropertyPathExpression,
        ]
    );

    let token = path("Products/Sales.TopSellers(count=3)");
    let call = &items(&token)[1];
    assert_eq!(call.kind, TokenKind::FunctionExpression);
    let TokenValue::MethodCall { method, parameters } = &call.value else {
        panic!("expected call payload");
    };
    assert_eq!(method, "Sales.TopSellers");
    assert_eq!(parameters.len(), 1);
}

#[test]
fn leading_type_cast_prefix() {
    let token = path("Sales.PremiumSet/Products(1)");
    let segments = items(&token);
    assert_eq!(segments[0].kind, TokenKind::QualifiedEntityTypeName);
    assert_eq!(segments[1].kind, TokenKind::EntitySetName);
}

#[test]
fn metadata_restricts_and_classifies_heads() {
    let metadata = Metadata::new()
        .with_entity_set("Products")
        .with_singleton("Company");

    let token = parse_resource_path_with("Company/Name", &metadata).unwrap();
    assert_eq!(items(&token)[0].kind, TokenKind::SingletonEntity);

    assert!(matches!(
        parse_resource_path_with("Unknown(1)", &metadata),
        Err(ParseError::EmptyParse { .. })
    ));
}

#[test]
fn key_errors() {
    assert!(matches!(
        parse_keys(""),
        Err(ParseError::EmptyParse { .. })
    ));
    assert!(matches!(
        parse_keys("()"),
        Err(ParseError::EmptyParse { .. })
    ));
    assert!(matches!(
        parse_keys("(1)x"),
        Err(ParseError::TrailingInput { position: 3, .. })
    ));
}

#[test]
fn full_uri_assembly() {
    let token = parse_ok(parse_odata_uri, "http://example.com/Orders(1)/Items?$top=5");
    let parts = items(&token);
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0].kind, TokenKind::ServiceRoot);
    assert_eq!(parts[0].raw, "http://example.com/");
    assert_eq!(parts[1].kind, TokenKind::ResourcePath);
    assert_eq!(parts[1].raw, "Orders(1)/Items");
    assert_eq!(parts[2].kind, TokenKind::QueryOptions);
    assert_eq!(parts[2].raw, "$top=5");
}

#[test]
fn uri_forms_without_path_or_options() {
    let token = parse_ok(parse_odata_uri, "https://host:8080/");
    assert_eq!(items(&token).len(), 1);

    let token = parse_ok(parse_odata_uri, "https://host/?$count=true");
    let kinds: Vec<_> = items(&token).iter().map(|part| part.kind).collect();
    assert_eq!(kinds, vec![TokenKind::ServiceRoot, TokenKind::QueryOptions]);
}

#[test]
fn uri_with_unparseable_options_fails() {
    assert!(parse_odata_uri("http://host/Products?$foo=1").is_err());
}
