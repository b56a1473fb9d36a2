//! Immutable token-tree visitor infrastructure.

use std::ops::ControlFlow;

use crate::ast::Token;

/// Shared type alias for visitor traversal methods.
pub type VisitResult<B> = ControlFlow<B>;

/// Immutable visitor over a parsed token tree.
///
/// The default implementation walks every node depth-first in source order.
/// Override `visit_token` to observe nodes and call [`walk_token`] to
/// descend, or break early with `ControlFlow::Break`.
pub trait Visit {
    /// Early-exit payload produced when traversal stops.
    type Break;

    fn visit_token(&mut self, token: &Token) -> VisitResult<Self::Break> {
        walk_token(self, token)
    }
}

/// Walks all children of `token` in source order.
pub fn walk_token<V>(visitor: &mut V, token: &Token) -> VisitResult<V::Break>
where
    V: Visit + ?Sized,
{
    for child in token.children() {
        match visitor.visit_token(child) {
            ControlFlow::Continue(()) => {}
            ControlFlow::Break(b) => return ControlFlow::Break(b),
        }
    }
    ControlFlow::Continue(())
}
