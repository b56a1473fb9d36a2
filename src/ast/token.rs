//! Token node types for the OData query grammar.
//!
//! A [`Token`] is one node of the tree: a discriminant ([`TokenKind`]), the
//! half-open source span it covers, the literal source slice, and a payload
//! ([`TokenValue`]) whose variant is determined by the kind. The kind
//! enumeration is closed; adding a kind is a breaking change for consumers.

use crate::ast::Span;
use smol_str::SmolStr;

/// The kind of a node in the token tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Names and type names
    ODataIdentifier,
    QualifiedEntityTypeName,
    PrimitiveTypeName,
    EntitySetName,
    SingletonEntity,

    /// A typed primitive literal; the payload names the EDM type.
    Literal,

    // Common and boolean common expressions
    OrExpression,
    AndExpression,
    EqualsExpression,
    NotEqualsExpression,
    LesserThanExpression,
    LesserOrEqualsExpression,
    GreaterThanExpression,
    GreaterOrEqualsExpression,
    HasExpression,
    InExpression,
    AddExpression,
    SubExpression,
    MulExpression,
    DivExpression,
    ModExpression,
    NotExpression,
    NegateExpression,
    ParenExpression,
    ListExpression,
    MethodCallExpression,
    CastExpression,
    IsOfExpression,
    FirstMemberExpression,
    PropertyPathExpression,
    RootExpression,
    AnyExpression,
    AllExpression,
    LambdaVariableExpression,

    // Resource paths
    ODataUri,
    ServiceRoot,
    ResourcePath,
    KeyPredicate,
    KeyValuePair,
    FunctionExpression,
    FunctionParameter,

    // Query options
    QueryOptions,
    Filter,
    Select,
    SelectItem,
    Expand,
    ExpandItem,
    ExpandPath,
    OrderBy,
    OrderByItem,
    Top,
    Skip,
    InlineCount,
    Format,
    Search,
    SkipToken,
    Levels,
    CustomQueryOption,

    // $search mini-grammar
    SearchOrExpression,
    SearchAndExpression,
    SearchNotExpression,
    SearchPhrase,
    SearchWord,
}

/// Sort direction of an `$orderby` item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Payload of a token, shaped by its [`TokenKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// No payload beyond the raw slice (identifiers, search words, ...).
    None,
    /// EDM type name of a primitive literal (`Edm.Int32`, `Edm.String`,
    /// ...); enum literals carry their qualified enum type name.
    Literal(SmolStr),
    /// Operands of a binary expression; the operator is implicit in the
    /// kind. `left.span.end <= right.span.start` always holds.
    Binary { left: Box<Token>, right: Box<Token> },
    /// Single wrapped child (unary expressions, option wrappers, simple
    /// key predicates).
    Single(Box<Token>),
    /// Order-significant children ($select items, path segments, compound
    /// keys, ...).
    Items(Vec<Token>),
    /// Query options in source order; duplicates permitted at parse time.
    Options(Vec<Token>),
    /// Scalar text payload ($format, $skiptoken, $levels).
    Text(SmolStr),
    /// Key/value payload of a custom query option.
    KeyValue { key: SmolStr, value: SmolStr },
    /// A `key=value` pair with both sides parsed (compound keys, bound
    /// function parameters).
    Pair { key: Box<Token>, value: Box<Token> },
    /// Built-in method or bound function call.
    MethodCall {
        method: SmolStr,
        parameters: Vec<Token>,
    },
    /// `any`/`all` lambda; `collection` is the navigation path the lambda
    /// is applied to. An empty `any()` has neither variable nor predicate.
    Lambda {
        collection: Box<Token>,
        variable: Option<Box<Token>>,
        predicate: Option<Box<Token>>,
    },
    /// `$orderby` item with its sort direction (ascending when absent).
    OrderByItem {
        expression: Box<Token>,
        direction: SortDirection,
    },
    /// `$expand` item: expand path plus nested options, possibly empty.
    ExpandItem {
        path: Box<Token>,
        options: Vec<Token>,
    },
}

/// A node of the parsed token tree.
///
/// Tokens are immutable once returned. `raw` always equals the literal
/// source slice `source[span.start..span.end]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub raw: String,
    pub value: TokenValue,
}

impl Token {
    /// Creates a token over `span`, materialising `raw` from `source`.
    pub fn new(kind: TokenKind, span: Span, source: &str, value: TokenValue) -> Self {
        let raw = source[span.clone()].to_string();
        Self {
            kind,
            span,
            raw,
            value,
        }
    }

    /// Start index (inclusive) in the source buffer.
    pub fn position(&self) -> usize {
        self.span.start
    }

    /// End index (exclusive) in the source buffer.
    pub fn next(&self) -> usize {
        self.span.end
    }

    /// Child tokens in source order, independent of the payload shape.
    ///
    /// Consumers should traverse through this rather than matching payload
    /// variants when they only need the tree structure.
    pub fn children(&self) -> Vec<&Token> {
        match &self.value {
            TokenValue::None | TokenValue::Literal(_) | TokenValue::Text(_) => Vec::new(),
            TokenValue::KeyValue { .. } => Vec::new(),
            TokenValue::Binary { left, right } => vec![left, right],
            TokenValue::Single(inner) => vec![inner],
            TokenValue::Items(items) | TokenValue::Options(items) => items.iter().collect(),
            TokenValue::Pair { key, value } => vec![key, value],
            TokenValue::MethodCall { parameters, .. } => parameters.iter().collect(),
            TokenValue::Lambda {
                collection,
                variable,
                predicate,
            } => {
                let mut children: Vec<&Token> = vec![collection];
                if let Some(variable) = variable {
                    children.push(variable);
                }
                if let Some(predicate) = predicate {
                    children.push(predicate);
                }
                children
            }
            TokenValue::OrderByItem { expression, .. } => vec![expression],
            TokenValue::ExpandItem { path, options } => {
                let mut children: Vec<&Token> = vec![path];
                children.extend(options.iter());
                children
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_materialises_raw_from_source() {
        let token = Token::new(TokenKind::ODataIdentifier, 4..8, "$it/Name eq 1", TokenValue::None);
        assert_eq!(token.raw, "Name");
        assert_eq!(token.position(), 4);
        assert_eq!(token.next(), 8);
    }

    #[test]
    fn binary_children_in_source_order() {
        let source = "a eq b";
        let left = Token::new(TokenKind::ODataIdentifier, 0..1, source, TokenValue::None);
        let right = Token::new(TokenKind::ODataIdentifier, 5..6, source, TokenValue::None);
        let parent = Token::new(
            TokenKind::EqualsExpression,
            0..6,
            source,
            TokenValue::Binary {
                left: Box::new(left),
                right: Box::new(right),
            },
        );

        let children = parent.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].raw, "a");
        assert_eq!(children[1].raw, "b");
    }

    #[test]
    fn lambda_children_skip_absent_parts() {
        let source = "Tags/any()";
        let collection = Token::new(TokenKind::FirstMemberExpression, 0..4, source, TokenValue::None);
        let lambda = Token::new(
            TokenKind::AnyExpression,
            0..10,
            source,
            TokenValue::Lambda {
                collection: Box::new(collection),
                variable: None,
                predicate: None,
            },
        );
        assert_eq!(lambda.children().len(), 1);
    }

    #[test]
    fn sort_direction_defaults_to_ascending() {
        assert_eq!(SortDirection::default(), SortDirection::Ascending);
    }
}
