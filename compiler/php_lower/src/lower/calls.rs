//! Function invocation and the `unset(...)` pseudo-call.

use php_ir::{Callee, ExprKind, ExprRange, Node, Span, VarName};

use super::{unsupported, LowerResult, Lowerer};
use crate::CompileError;

impl Lowerer<'_> {
    pub(super) fn lower_invocation(
        &mut self,
        callee: Callee,
        args: ExprRange,
        span: Span,
    ) -> LowerResult {
        let func = match callee {
            Callee::Named(name) => name,
            Callee::Dynamic(_) => return Err(unsupported("dynamic function call", span)),
        };
        if self.interner.lookup(func).eq_ignore_ascii_case("unset") {
            return self.lower_unset(args, span);
        }

        let src = self.src;
        let mut lowered = Vec::with_capacity(args.len());
        for &arg in src.get_expr_list(args) {
            lowered.push(self.lower_expr(arg)?);
        }
        let args = self.nodes.push_node_list(&lowered);
        Ok(self.push(
            Node::Call {
                func,
                scope: self.scope.id(),
                args,
            },
            span,
        ))
    }

    /// `unset($a, $b)`. Names never bound in this scope have nothing to
    /// clear and are dropped.
    fn lower_unset(&mut self, args: ExprRange, span: Span) -> LowerResult {
        let src = self.src;
        let mut slots = Vec::with_capacity(args.len());
        for &arg in src.get_expr_list(args) {
            let name = match *src.expr_kind(arg) {
                ExprKind::Variable(VarName::Ident(name)) => name,
                other => return Err(invalid_unset(other, src.expr_span(arg))),
            };
            if let Some(slot) = self.scope.resolve_existing(name) {
                slots.push(slot);
            } else {
                tracing::trace!(name = self.interner.lookup(name), "unset of unbound name skipped");
            }
        }
        let slots = self.nodes.push_slot_list(&slots);
        Ok(self.push(Node::Unset(slots), span))
    }
}

#[cold]
fn invalid_unset(kind: ExprKind, span: Span) -> CompileError {
    tracing::warn!(construct = kind.construct_name(), %span, "invalid unset argument");
    CompileError::InvalidUnsetArgument {
        construct: kind.construct_name().to_string(),
        span,
    }
}

