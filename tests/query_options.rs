//! Query-option list tests: system options, custom options, `$expand`
//! nesting, and the `$search` mini-grammar.

mod common;

use common::{edm_type, inner, items, options, parse_ok};
use odata_parser::{ParseError, SortDirection, TokenKind, TokenValue, parse_query_options};

fn query(source: &str) -> odata_parser::Token {
    parse_ok(parse_query_options, source)
}

#[test]
fn top_and_skip_carry_their_integers() {
    let token = query("$top=10&$skip=20");
    let list = options(&token);
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].kind, TokenKind::Top);
    assert_eq!(inner(&list[0]).raw, "10");
    assert_eq!(list[1].kind, TokenKind::Skip);
    assert_eq!(inner(&list[1]).raw, "20");
}

#[test]
fn orderby_with_two_items() {
    let token = query("$orderby=foo,bar");
    let list = options(&token);
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].kind, TokenKind::OrderBy);
    let order_items = items(&list[0]);
    assert_eq!(order_items.len(), 2);
    assert_eq!(order_items[0].raw, "foo");
    assert_eq!(order_items[1].raw, "bar");
}

#[test]
fn orderby_directions_default_to_ascending() {
    let token = query("$orderby=Price desc,Name");
    let order_items = items(&options(&token)[0]);
    let directions: Vec<_> = order_items
        .iter()
        .map(|item| match &item.value {
            TokenValue::OrderByItem { direction, .. } => *direction,
            other => panic!("unexpected payload {other:?}"),
        })
        .collect();
    assert_eq!(
        directions,
        vec![SortDirection::Descending, SortDirection::Ascending]
    );
    assert_eq!(order_items[0].raw, "Price desc");
}

#[test]
fn custom_options_preserve_key_and_value() {
    let token = query("foo=123&bar=foobar");
    let list = options(&token);
    assert_eq!(list.len(), 2);
    assert_eq!(
        list[0].value,
        TokenValue::KeyValue {
            key: "foo".into(),
            value: "123".into(),
        }
    );
    assert_eq!(
        list[1].value,
        TokenValue::KeyValue {
            key: "bar".into(),
            value: "foobar".into(),
        }
    );
}

#[test]
fn dollar_prefixed_unknown_options_never_parse_as_custom() {
    assert!(matches!(
        parse_query_options("$foo=123"),
        Err(ParseError::EmptyParse { .. })
    ));
    // A valid prefix followed by an unknown option leaves trailing input.
    assert!(matches!(
        parse_query_options("$top=1&$foo=2"),
        Err(ParseError::TrailingInput { position: 6, .. })
    ));
}

#[test]
fn filter_and_search_wrap_their_expressions() {
    let token = query("$filter=Price gt 20&$search=blue OR green");
    let list = options(&token);
    assert_eq!(list[0].kind, TokenKind::Filter);
    assert_eq!(inner(&list[0]).kind, TokenKind::GreaterThanExpression);
    assert_eq!(list[1].kind, TokenKind::Search);
    assert_eq!(inner(&list[1]).kind, TokenKind::SearchOrExpression);
}

#[test]
fn search_grammar_shapes() {
    for (source, kind) in [
        ("$search=bike", TokenKind::SearchWord),
        ("$search=\"mountain bike\"", TokenKind::SearchPhrase),
        ("$search=mountain bike", TokenKind::SearchAndExpression),
        ("$search=mountain AND bike", TokenKind::SearchAndExpression),
        ("$search=NOT clothing", TokenKind::SearchNotExpression),
        ("$search=bike OR skateboard", TokenKind::SearchOrExpression),
    ] {
        let token = query(source);
        assert_eq!(inner(&options(&token)[0]).kind, kind, "for {source:?}");
    }
}

#[test]
fn search_phrase_binds_tighter_than_implicit_and() {
    let token = query("$search=\"road bike\" NOT mountain");
    let search = inner(&options(&token)[0]);
    assert_eq!(search.kind, TokenKind::SearchAndExpression);
    let TokenValue::Binary { left, right } = &search.value else {
        panic!("expected binary payload");
    };
    assert_eq!(left.kind, TokenKind::SearchPhrase);
    assert_eq!(right.kind, TokenKind::SearchNotExpression);
}

#[test]
fn select_expand_and_levels() {
    let token = query("$select=Name,Address/City&$expand=Orders($top=2;$levels=max)");
    let list = options(&token);
    assert_eq!(list[0].kind, TokenKind::Select);
    assert_eq!(items(&list[0]).len(), 2);

    assert_eq!(list[1].kind, TokenKind::Expand);
    let expand_items = items(&list[1]);
    let TokenValue::ExpandItem { path, options } = &expand_items[0].value else {
        panic!("expected expand payload");
    };
    assert_eq!(path.raw, "Orders");
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].kind, TokenKind::Top);
    assert_eq!(options[1].kind, TokenKind::Levels);
    assert_eq!(options[1].value, TokenValue::Text("max".into()));
}

#[test]
fn expand_items_nest_recursively() {
    let token = query("$expand=Customer($expand=Orders($filter=Total gt 10))");
    let outer = &items(&options(&token)[0])[0];
    let TokenValue::ExpandItem { options, .. } = &outer.value else {
        panic!("expected expand payload");
    };
    assert_eq!(options[0].kind, TokenKind::Expand);
    let inner_item = &items(&options[0])[0];
    let TokenValue::ExpandItem { options: nested, .. } = &inner_item.value else {
        panic!("expected expand payload");
    };
    assert_eq!(nested[0].kind, TokenKind::Filter);
}

#[test]
fn expand_rejects_nested_count_and_format() {
    assert!(parse_query_options("$expand=Orders($count=true)").is_err());
    assert!(parse_query_options("$expand=Orders($format=json)").is_err());
}

#[test]
fn count_format_skiptoken() {
    let token = query("$count=false&$format=atom&$skiptoken=Id:100");
    let list = options(&token);
    assert_eq!(list[0].kind, TokenKind::InlineCount);
    assert_eq!(edm_type(inner(&list[0])), "Edm.Boolean");
    assert_eq!(list[1].value, TokenValue::Text("atom".into()));
    assert_eq!(list[2].value, TokenValue::Text("Id:100".into()));
}

#[test]
fn format_rejects_media_types() {
    for source in ["$format=application/json", "$format=text/csv"] {
        assert!(parse_query_options(source).is_err(), "for {source:?}");
    }
}

#[test]
fn option_order_is_preserved_and_duplicates_survive() {
    let token = query("$skip=5&$top=3&$skip=7");
    let kinds: Vec<_> = options(&token).iter().map(|option| option.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Skip, TokenKind::Top, TokenKind::Skip]);
}

#[test]
fn filter_with_encoded_whitespace_round_trips() {
    let token = query("$filter=Name%20eq%20%27John%27");
    let filter = inner(&options(&token)[0]);
    assert_eq!(filter.kind, TokenKind::EqualsExpression);
    assert_eq!(filter.raw, "Name%20eq%20%27John%27");
}
