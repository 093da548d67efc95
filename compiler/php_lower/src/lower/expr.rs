//! Expression dispatch: the main `lower_expr` match.

use php_ir::{ArrayAccessKind, ExprId, ExprKind, Fixity, Name, Node, ScalarKind, Span, VarName};
use php_stack::ensure_sufficient_stack;

use super::{unsupported, LowerResult, Lowerer};
use crate::literal::{self, Literal};
use crate::operator_table;
use crate::CompileError;

impl Lowerer<'_> {
    /// Lower one expression and return the id of the node built for it.
    pub(crate) fn lower_expr(&mut self, id: ExprId) -> LowerResult {
        ensure_sufficient_stack(|| self.lower_expr_inner(id))
    }

    fn lower_expr_inner(&mut self, id: ExprId) -> LowerResult {
        let kind = *self.src.expr_kind(id);
        let span = self.src.expr_span(id);

        match kind {
            ExprKind::Scalar { kind, text } => self.lower_scalar(kind, text, span),

            ExprKind::Variable(VarName::Ident(name)) => {
                let slot = self.scope.resolve_existing(name).unwrap_or_default();
                Ok(self.push(Node::Var { name, slot }, span))
            }
            ExprKind::Variable(VarName::Dynamic(_)) => Err(unsupported("dynamic variable", span)),

            ExprKind::Infix { op, left, right } => {
                let Some(op) = operator_table::binary_op(op) else {
                    let construct = format!("binary operator `{}`", op.as_symbol());
                    return Err(unsupported(construct, span));
                };
                let left = self.lower_expr(left)?;
                let right = self.lower_expr(right)?;
                Ok(self.push(Node::Binary { op, left, right }, span))
            }
            ExprKind::Unary { op, operand } => {
                let Some(op) = operator_table::unary_op(op) else {
                    let construct = format!("unary operator `{}`", op.as_symbol());
                    return Err(unsupported(construct, span));
                };
                let operand = self.lower_expr(operand)?;
                Ok(self.push(Node::Unary { op, operand }, span))
            }

            ExprKind::Prefix { op, operand } => {
                self.lower_inc_dec(op, operand, Fixity::Prefix, span)
            }
            ExprKind::Postfix { op, operand } => {
                self.lower_inc_dec(op, operand, Fixity::Postfix, span)
            }
            ExprKind::Assignment { op, target, value } => {
                self.lower_assignment(op, target, value, span)
            }

            ExprKind::ArrayCreation(range) => {
                let src = self.src;
                let elements = src.get_elements(range);
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    if element.key.is_valid() {
                        let span = src.expr_span(element.key);
                        return Err(unsupported("keyed array element", span));
                    }
                    items.push(self.lower_expr(element.value)?);
                }
                let range = self.nodes.push_node_list(&items);
                Ok(self.push(Node::List(range), span))
            }
            ExprKind::ArrayAccess {
                target,
                index,
                kind,
            } => self.lower_array_read(target, index, kind, span),

            ExprKind::Invocation { callee, args } => self.lower_invocation(callee, args, span),

            // Grouping has no runtime representation.
            ExprKind::Parenthesis(inner) => self.lower_expr(inner),

            ExprKind::Conditional { .. }
            | ExprKind::Cast { .. }
            | ExprKind::InstanceOf { .. }
            | ExprKind::Closure
            | ExprKind::New { .. }
            | ExprKind::Quote(_)
            | ExprKind::Error => Err(unsupported(kind.construct_name(), span)),
        }
    }

    fn lower_scalar(&mut self, kind: ScalarKind, text: Name, span: Span) -> LowerResult {
        let text = self.interner.lookup(text);
        let literal = match kind {
            ScalarKind::Int => {
                literal::parse_int(text).ok_or_else(|| malformed("integer", text, span))?
            }
            ScalarKind::Real => Literal::Float(
                literal::parse_float(text).ok_or_else(|| malformed("float", text, span))?,
            ),
            ScalarKind::String => match literal::parse_bool(text) {
                Some(b) => Literal::Bool(b),
                None => return Err(unsupported("string scalar", span)),
            },
            ScalarKind::Other => return Err(unsupported("scalar", span)),
        };
        let node = match literal {
            Literal::Int(n) => Node::Int(n),
            Literal::Float(f) => Node::Float(f.to_bits()),
            Literal::Bool(b) => Node::Bool(b),
        };
        Ok(self.push(node, span))
    }

    /// `target[index]` in a read position.
    fn lower_array_read(
        &mut self,
        target: ExprId,
        index: ExprId,
        kind: ArrayAccessKind,
        span: Span,
    ) -> LowerResult {
        if kind == ArrayAccessKind::Hashtable {
            return Err(unsupported("hashtable access", span));
        }
        if !index.is_valid() {
            return Err(unsupported("array append in read context", span));
        }
        let target = self.lower_expr(target)?;
        let index = self.lower_expr(index)?;
        Ok(self.push(Node::Index { target, index }, span))
    }
}

#[cold]
fn malformed(kind: &'static str, text: &str, span: Span) -> CompileError {
    tracing::warn!(kind, text, %span, "malformed literal");
    CompileError::MalformedLiteral {
        kind,
        text: text.to_string(),
        span,
    }
}
