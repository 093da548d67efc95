//! Convenience construction of syntax trees.
//!
//! Used by tests and by embedders that synthesize expressions without
//! going through the parser. Every expression gets a distinct synthetic
//! span (`n..n+1` for the n-th allocation) unless one is given with
//! [`AstBuilder::alloc_at`].

use super::operators::{AssignOp, IncDecOp, InfixOp, UnaryOpCode};
use super::{
    ArrayAccessKind, ArrayElement, Callee, Expr, ExprArena, ExprId, ExprKind, ScalarKind, VarName,
};
use crate::{Span, StringInterner};

pub struct AstBuilder<'a> {
    arena: ExprArena,
    interner: &'a StringInterner,
}

impl<'a> AstBuilder<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        AstBuilder {
            arena: ExprArena::new(),
            interner,
        }
    }

    /// The arena built so far.
    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    /// Consume the builder, returning the arena.
    pub fn finish(self) -> ExprArena {
        self.arena
    }

    /// Allocate with an explicit span.
    pub fn alloc_at(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc(Expr::new(kind, span))
    }

    /// Allocate with the next synthetic span.
    pub fn alloc(&mut self, kind: ExprKind) -> ExprId {
        let offset = super::to_u32(self.arena.expr_count(), "expressions");
        self.alloc_at(kind, Span::from_start_len(offset, 1))
    }

    fn scalar(&mut self, kind: ScalarKind, text: &str) -> ExprId {
        let text = self.interner.intern(text);
        self.alloc(ExprKind::Scalar { kind, text })
    }

    /// Integer literal, as written (`"42"`, `"0x1F"`).
    pub fn int(&mut self, text: &str) -> ExprId {
        self.scalar(ScalarKind::Int, text)
    }

    /// Float literal, as written (`"1.5"`, `"1e3"`).
    pub fn real(&mut self, text: &str) -> ExprId {
        self.scalar(ScalarKind::Real, text)
    }

    /// String scalar / bare constant (`"true"`, `"hello"`).
    pub fn string(&mut self, text: &str) -> ExprId {
        self.scalar(ScalarKind::String, text)
    }

    /// `$name`
    pub fn var(&mut self, name: &str) -> ExprId {
        let name = self.interner.intern(name);
        self.alloc(ExprKind::Variable(VarName::Ident(name)))
    }

    /// `$$inner`
    pub fn dynamic_var(&mut self, inner: ExprId) -> ExprId {
        self.alloc(ExprKind::Variable(VarName::Dynamic(inner)))
    }

    pub fn infix(&mut self, op: InfixOp, left: ExprId, right: ExprId) -> ExprId {
        self.alloc(ExprKind::Infix { op, left, right })
    }

    pub fn unary(&mut self, op: UnaryOpCode, operand: ExprId) -> ExprId {
        self.alloc(ExprKind::Unary { op, operand })
    }

    pub fn prefix(&mut self, op: IncDecOp, operand: ExprId) -> ExprId {
        self.alloc(ExprKind::Prefix { op, operand })
    }

    pub fn postfix(&mut self, op: IncDecOp, operand: ExprId) -> ExprId {
        self.alloc(ExprKind::Postfix { op, operand })
    }

    /// `target = value`
    pub fn assign(&mut self, target: ExprId, value: ExprId) -> ExprId {
        self.assign_op(AssignOp::Equal, target, value)
    }

    /// `target op= value`
    pub fn assign_op(&mut self, op: AssignOp, target: ExprId, value: ExprId) -> ExprId {
        self.alloc(ExprKind::Assignment { op, target, value })
    }

    /// `[values...]`
    pub fn array(&mut self, values: &[ExprId]) -> ExprId {
        let elements: Vec<ArrayElement> = values
            .iter()
            .map(|&value| ArrayElement {
                key: ExprId::INVALID,
                value,
            })
            .collect();
        let range = self.arena.alloc_elements(&elements);
        self.alloc(ExprKind::ArrayCreation(range))
    }

    /// `[key => value, ...]`
    pub fn keyed_array(&mut self, entries: &[(ExprId, ExprId)]) -> ExprId {
        let elements: Vec<ArrayElement> = entries
            .iter()
            .map(|&(key, value)| ArrayElement { key, value })
            .collect();
        let range = self.arena.alloc_elements(&elements);
        self.alloc(ExprKind::ArrayCreation(range))
    }

    /// `target[index]`
    pub fn index(&mut self, target: ExprId, index: ExprId) -> ExprId {
        self.alloc(ExprKind::ArrayAccess {
            target,
            index,
            kind: ArrayAccessKind::Indexed,
        })
    }

    /// `target[]`
    pub fn append_slot(&mut self, target: ExprId) -> ExprId {
        self.index(target, ExprId::INVALID)
    }

    /// `name(args...)`
    pub fn call(&mut self, name: &str, args: &[ExprId]) -> ExprId {
        let name = self.interner.intern(name);
        let args = self.arena.alloc_expr_list(args);
        self.alloc(ExprKind::Invocation {
            callee: Callee::Named(name),
            args,
        })
    }

    /// `$callee(args...)`
    pub fn dynamic_call(&mut self, callee: ExprId, args: &[ExprId]) -> ExprId {
        let args = self.arena.alloc_expr_list(args);
        self.alloc(ExprKind::Invocation {
            callee: Callee::Dynamic(callee),
            args,
        })
    }

    /// `( inner )`
    pub fn paren(&mut self, inner: ExprId) -> ExprId {
        self.alloc(ExprKind::Parenthesis(inner))
    }
}
