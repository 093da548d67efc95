//! Write targets: assignment, compound assignment and `++`/`--`.

use php_ir::{
    ArrayAccessKind, AssignOp, ExprId, ExprKind, Fixity, IncDecOp, Node, NodeId, Span, VarName,
};

use super::{unsupported, LowerResult, Lowerer};
use crate::operator_table::{self, AssignKind};

impl Lowerer<'_> {
    pub(super) fn lower_assignment(
        &mut self,
        op: AssignOp,
        target: ExprId,
        value: ExprId,
        span: Span,
    ) -> LowerResult {
        let Some(assign) = operator_table::assign_kind(op) else {
            let construct = format!("assignment operator `{}`", op.as_symbol());
            return Err(unsupported(construct, span));
        };

        match *self.src.expr_kind(target) {
            ExprKind::Variable(VarName::Ident(name)) => {
                // The right-hand side is lowered before the target is bound,
                // so `$x = $x` reads a name that may still be unbound.
                let value = match assign {
                    AssignKind::Plain => self.lower_expr(value)?,
                    AssignKind::Compound(op) => {
                        let left = self.lower_expr(target)?;
                        let right = self.lower_expr(value)?;
                        self.push(Node::Binary { op, left, right }, span)
                    }
                };
                let slot = self.scope.resolve_or_define(name);
                Ok(self.push(Node::Assign { slot, value }, span))
            }
            ExprKind::Variable(VarName::Dynamic(_)) => {
                Err(unsupported("dynamic variable", self.src.expr_span(target)))
            }
            ExprKind::ArrayAccess {
                target: container,
                index,
                kind,
            } => {
                if kind == ArrayAccessKind::Hashtable {
                    return Err(unsupported("hashtable access", self.src.expr_span(target)));
                }
                let value = match assign {
                    AssignKind::Plain => self.lower_expr(value)?,
                    AssignKind::Compound(op) => {
                        let left = self.lower_expr(target)?;
                        let right = self.lower_expr(value)?;
                        self.push(Node::Binary { op, left, right }, span)
                    }
                };
                let place = self.lower_place(container)?;
                let index = if index.is_valid() {
                    self.lower_expr(index)?
                } else {
                    NodeId::INVALID
                };
                Ok(self.push(
                    Node::IndexAssign {
                        target: place,
                        index,
                        value,
                    },
                    span,
                ))
            }
            _ => Err(self.invalid_target(target)),
        }
    }

    /// Lower the container part of an element write.
    ///
    /// The result is a `Var` (with a defined slot) optionally wrapped in
    /// `Index` nodes; the evaluator walks it to find the storage to mutate.
    fn lower_place(&mut self, id: ExprId) -> LowerResult {
        let span = self.src.expr_span(id);
        match *self.src.expr_kind(id) {
            ExprKind::Variable(VarName::Ident(name)) => {
                let slot = self.scope.resolve_or_define(name);
                Ok(self.push(Node::Var { name, slot }, span))
            }
            ExprKind::Variable(VarName::Dynamic(_)) => {
                Err(unsupported("dynamic variable", span))
            }
            ExprKind::ArrayAccess {
                kind: ArrayAccessKind::Hashtable,
                ..
            } => Err(unsupported("hashtable access", span)),
            ExprKind::ArrayAccess { index, .. } if !index.is_valid() => {
                Err(unsupported("nested array append", span))
            }
            ExprKind::ArrayAccess { target, index, .. } => {
                let target = self.lower_place(target)?;
                let index = self.lower_expr(index)?;
                Ok(self.push(Node::Index { target, index }, span))
            }
            // `($a)[0] = 1` writes `$a`.
            ExprKind::Parenthesis(inner) => self.lower_place(inner),
            _ => Err(self.invalid_target(id)),
        }
    }

    pub(super) fn lower_inc_dec(
        &mut self,
        op: IncDecOp,
        operand: ExprId,
        fixity: Fixity,
        span: Span,
    ) -> LowerResult {
        let kind = *self.src.expr_kind(operand);
        let ExprKind::Variable(VarName::Ident(name)) = kind else {
            let construct = format!(
                "`{}` applied to {}",
                op.as_symbol(),
                kind.construct_name()
            );
            return Err(unsupported(construct, self.src.expr_span(operand)));
        };
        let slot = self.scope.resolve_or_define(name);
        Ok(self.push(
            Node::IncDec {
                slot,
                delta: op.delta(),
                fixity,
            },
            span,
        ))
    }
}
