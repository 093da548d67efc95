//! Syntax tree to executable nodes.
//!
//! [`Lowerer::lower_expr`] returns the id of the node it built; there is no
//! out-of-band "current result". Submodules split the dispatch by concern:
//! - `expr`: the central match, literals, operators, array reads
//! - `assign`: assignment targets, compound assignment, `++`/`--`
//! - `calls`: invocation and `unset(...)`

mod assign;
mod calls;
mod expr;

use php_ir::{CompiledExpr, ExprArena, ExprId, Node, NodeArena, NodeId, Span, StringInterner};

use crate::{CompileError, Scope};

type LowerResult = Result<NodeId, CompileError>;

/// Node lists are addressed with a `u16` length.
const MAX_SEQUENCE_LEN: usize = u16::MAX as usize;

/// Compile one expression.
///
/// Variables are bound in `scope`: reads use names already defined there,
/// writes define new slots. On error nothing is returned, though slots
/// defined before the failing construct stay in `scope`.
pub fn compile(
    src: &ExprArena,
    root: ExprId,
    scope: &mut Scope,
    interner: &StringInterner,
) -> Result<CompiledExpr, CompileError> {
    if !root.is_valid() {
        return Err(CompileError::UnsupportedConstruct {
            construct: "missing expression".to_string(),
            span: Span::DUMMY,
        });
    }
    let mut lowerer = Lowerer::new(src, scope, interner);
    let root = lowerer.lower_expr(root)?;
    Ok(lowerer.finish(root))
}

/// Compile a list of expressions into one sequence node.
///
/// Used for comma-separated groups such as `for` init/update lists. The
/// sequence yields the last value, or `null` when `exprs` is empty. More
/// than `u16::MAX` expressions is an unsupported construct.
pub fn compile_sequence(
    src: &ExprArena,
    exprs: &[ExprId],
    scope: &mut Scope,
    interner: &StringInterner,
) -> Result<CompiledExpr, CompileError> {
    let span = match (exprs.first(), exprs.last()) {
        (Some(&first), Some(&last)) if first.is_valid() && last.is_valid() => {
            src.expr_span(first).merge(src.expr_span(last))
        }
        _ => Span::DUMMY,
    };
    if exprs.len() > MAX_SEQUENCE_LEN {
        let construct = format!("expression list of {} entries", exprs.len());
        return Err(unsupported(construct, span));
    }
    let mut lowerer = Lowerer::new(src, scope, interner);
    let mut ids = Vec::with_capacity(exprs.len());
    for &expr in exprs {
        if !expr.is_valid() {
            return Err(unsupported("missing expression", Span::DUMMY));
        }
        ids.push(lowerer.lower_expr(expr)?);
    }
    let range = lowerer.nodes.push_node_list(&ids);
    let root = lowerer.nodes.push(Node::Seq(range), span);
    Ok(lowerer.finish(root))
}

/// Per-expression compiler state.
///
/// Owns the node arena under construction and borrows the scope for the
/// duration of one `compile` call.
pub(crate) struct Lowerer<'a> {
    src: &'a ExprArena,
    scope: &'a mut Scope,
    interner: &'a StringInterner,
    nodes: NodeArena,
}

impl<'a> Lowerer<'a> {
    fn new(src: &'a ExprArena, scope: &'a mut Scope, interner: &'a StringInterner) -> Self {
        Lowerer {
            src,
            scope,
            interner,
            nodes: NodeArena::with_capacity(src.expr_count()),
        }
    }

    fn finish(self, root: NodeId) -> CompiledExpr {
        tracing::debug!(
            nodes = self.nodes.len(),
            slots = self.scope.slot_count(),
            "compiled expression"
        );
        CompiledExpr::new(self.nodes, root)
    }

    #[inline]
    fn push(&mut self, node: Node, span: Span) -> NodeId {
        self.nodes.push(node, span)
    }

    #[cold]
    fn invalid_target(&self, id: ExprId) -> CompileError {
        let construct = self.src.expr_kind(id).construct_name();
        let span = self.src.expr_span(id);
        tracing::warn!(construct, %span, "invalid assignment target");
        CompileError::InvalidAssignmentTarget {
            construct: construct.to_string(),
            span,
        }
    }
}

#[cold]
fn unsupported(construct: impl Into<String>, span: Span) -> CompileError {
    let construct = construct.into();
    tracing::warn!(construct = %construct, %span, "unsupported construct rejected");
    CompileError::UnsupportedConstruct { construct, span }
}
