//! Tree-walking interpreter for compiled expressions.
//!
//! `eval_node` is the single dispatch point: it copies the node kind out
//! of the arena, evaluates children in source order, and attaches the
//! node's span to any error that does not have one yet.

mod builder;

pub use builder::InterpreterBuilder;

use smallvec::SmallVec;

use php_ir::{
    BinaryOp, CompiledExpr, Fixity, Name, Node, NodeArena, NodeId, NodeRange, ScopeId, Slot,
    SlotRange, StringInterner,
};
use php_stack::ensure_sufficient_stack;

use crate::errors::{cannot_index, index_out_of_range, invalid_index, undefined_function};
use crate::{
    evaluate_binary, evaluate_unary, increment, undefined_variable, EvalError, EvalResult, Frame,
    FunctionRegistry, UndefinedVariablePolicy, Value,
};

/// Evaluates compiled expressions against frames.
///
/// Holds only shared references and configuration, so one interpreter can
/// serve any number of frames, including from several threads at once.
pub struct Interpreter<'a> {
    interner: &'a StringInterner,
    registry: &'a dyn FunctionRegistry,
    undefined_variables: UndefinedVariablePolicy,
}

impl<'a> Interpreter<'a> {
    /// Interpreter with no functions and strict undefined-variable reads.
    pub fn new(interner: &'a StringInterner) -> Self {
        InterpreterBuilder::new(interner).build()
    }

    pub fn undefined_variable_policy(&self) -> UndefinedVariablePolicy {
        self.undefined_variables
    }

    /// Evaluate `expr`, reading and writing variables in `frame`.
    #[tracing::instrument(level = "trace", skip_all, fields(root = ?expr.root()))]
    pub fn evaluate(&self, expr: &CompiledExpr, frame: &mut Frame) -> EvalResult {
        self.eval_node(expr.nodes(), expr.root(), frame)
    }

    fn eval_node(&self, nodes: &NodeArena, id: NodeId, frame: &mut Frame) -> EvalResult {
        ensure_sufficient_stack(|| {
            self.eval_node_inner(nodes, id, frame)
                .map_err(|e| e.attach_span(nodes.span(id)))
        })
    }

    fn eval_node_inner(&self, nodes: &NodeArena, id: NodeId, frame: &mut Frame) -> EvalResult {
        match *nodes.kind(id) {
            // Literals
            Node::Int(n) => Ok(Value::Int(n)),
            Node::Float(bits) => Ok(Value::Float(f64::from_bits(bits))),
            Node::Bool(b) => Ok(Value::Bool(b)),

            // Variables
            Node::Var { name, slot } => self.read_var(name, slot, frame),
            Node::Assign { slot, value } => {
                let value = self.eval_node(nodes, value, frame)?.copy();
                frame.set(slot, value.clone());
                Ok(value)
            }
            Node::IncDec {
                slot,
                delta,
                fixity,
            } => {
                let current = frame.get(slot).unwrap_or_default();
                let updated = increment(current.clone(), delta)?;
                frame.set(slot, updated.clone());
                Ok(match fixity {
                    Fixity::Prefix => updated,
                    Fixity::Postfix => current,
                })
            }

            // Operators
            Node::Unary { op, operand } => {
                let value = self.eval_node(nodes, operand, frame)?;
                evaluate_unary(value, op)
            }
            Node::Binary { op, left, right } => self.eval_binary(nodes, op, left, right, frame),

            // Arrays
            Node::List(elements) => {
                let items = self.eval_list(nodes, elements, frame)?;
                Ok(Value::array(items))
            }
            Node::Index { target, index } => {
                let target = self.eval_node(nodes, target, frame)?;
                let index = self.eval_node(nodes, index, frame)?;
                read_index(&target, &index)
            }
            Node::IndexAssign {
                target,
                index,
                value,
            } => self.eval_index_assign(nodes, target, index, value, frame),

            // Calls and statements-as-expressions
            Node::Call { func, scope, args } => self.eval_call(nodes, func, scope, args, frame),
            Node::Unset(slots) => {
                unset_slots(nodes, slots, frame);
                Ok(Value::Null)
            }
            Node::Seq(range) => {
                let mut last = Value::Null;
                for &node in nodes.get_node_list(range) {
                    last = self.eval_node(nodes, node, frame)?;
                }
                Ok(last)
            }
        }
    }

    fn read_var(&self, name: Name, slot: Slot, frame: &Frame) -> EvalResult {
        let value = if slot.is_valid() { frame.get(slot) } else { None };
        match value {
            Some(value) => Ok(value),
            None => self.undefined(name),
        }
    }

    #[cold]
    fn undefined(&self, name: Name) -> EvalResult {
        let name = self.interner.lookup(name);
        if self.undefined_variables.is_strict() {
            Err(undefined_variable(name))
        } else {
            tracing::warn!(variable = name, "undefined variable, reading null");
            Ok(Value::Null)
        }
    }

    /// Left then right; `&&`/`||` skip the right side once the left decides.
    fn eval_binary(
        &self,
        nodes: &NodeArena,
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
        frame: &mut Frame,
    ) -> EvalResult {
        let left = self.eval_node(nodes, left, frame)?;
        match op {
            BinaryOp::And if !left.is_truthy() => Ok(Value::Bool(false)),
            BinaryOp::Or if left.is_truthy() => Ok(Value::Bool(true)),
            BinaryOp::And | BinaryOp::Or => {
                let right = self.eval_node(nodes, right, frame)?;
                Ok(Value::Bool(right.is_truthy()))
            }
            _ => {
                let right = self.eval_node(nodes, right, frame)?;
                evaluate_binary(left, right, op)
            }
        }
    }

    fn eval_list(
        &self,
        nodes: &NodeArena,
        range: NodeRange,
        frame: &mut Frame,
    ) -> Result<Vec<Value>, EvalError> {
        nodes
            .get_node_list(range)
            .iter()
            .map(|&node| self.eval_node(nodes, node, frame))
            .collect()
    }

    /// `base[k1]...[kn] = value`.
    ///
    /// Index expressions run left to right, then the value. The path is
    /// checked against the current contents before the frame is touched,
    /// so a failed write leaves the base exactly as it was (still unset,
    /// still vacant, or holding the same array).
    fn eval_index_assign(
        &self,
        nodes: &NodeArena,
        target: NodeId,
        index: NodeId,
        value: NodeId,
        frame: &mut Frame,
    ) -> EvalResult {
        let (base, path) = place_path(nodes, target, index)?;

        let mut keys: SmallVec<[Option<i64>; 4]> = SmallVec::with_capacity(path.len());
        for &key in &path {
            if key.is_valid() {
                let key_value = self.eval_node(nodes, key, frame)?;
                let position = key_value
                    .to_index()
                    .ok_or_else(|| invalid_index(key_value.type_name()))?;
                keys.push(Some(position));
            } else {
                keys.push(None);
            }
        }
        let value = self.eval_node(nodes, value, frame)?.copy();

        {
            let current = frame.get(base).unwrap_or_default();
            check_path(&current, &keys)?;
        }

        let mut place = frame.entry(base);
        if let Some((last, parents)) = keys.split_last() {
            for &key in parents {
                place = element_mut(place, key)?;
            }
            *element_mut(place, *last)? = value.clone();
        }
        Ok(value)
    }

    fn eval_call(
        &self,
        nodes: &NodeArena,
        func: Name,
        scope: ScopeId,
        args: NodeRange,
        frame: &mut Frame,
    ) -> EvalResult {
        let args = self.eval_list(nodes, args, frame)?;
        let name = self.interner.lookup(func);
        let target = self
            .registry
            .lookup(name, scope)
            .ok_or_else(|| undefined_function(name))?;
        tracing::trace!(function = name, argc = args.len(), "invoke");
        self.registry.invoke(target, args)
    }
}

fn unset_slots(nodes: &NodeArena, slots: SlotRange, frame: &mut Frame) {
    for &slot in nodes.get_slots(slots) {
        frame.unset(slot);
    }
}

/// Flatten an assignment place into its base slot and index nodes, outermost
/// container first. `NodeId::INVALID` marks an append.
fn place_path(
    nodes: &NodeArena,
    mut target: NodeId,
    index: NodeId,
) -> Result<(Slot, SmallVec<[NodeId; 4]>), EvalError> {
    let mut path: SmallVec<[NodeId; 4]> = SmallVec::new();
    path.push(index);
    loop {
        match *nodes.kind(target) {
            Node::Var { slot, .. } if slot.is_valid() => {
                path.reverse();
                return Ok((slot, path));
            }
            Node::Index {
                target: inner,
                index,
            } => {
                path.push(index);
                target = inner;
            }
            other => {
                return Err(EvalError::new(format!(
                    "invalid array assignment target: {other:?}"
                )))
            }
        }
    }
}

fn read_index(target: &Value, index: &Value) -> EvalResult {
    let Value::Array(items) = target else {
        return Err(cannot_index(target.type_name()));
    };
    let position = index
        .to_index()
        .ok_or_else(|| invalid_index(index.type_name()))?;
    usize::try_from(position)
        .ok()
        .and_then(|i| items.get(i))
        .cloned()
        .ok_or_else(|| index_out_of_range(position, items.len()))
}

/// Fail the way `element_mut` would along `keys`, without writing.
///
/// `null` and positions about to be appended count as empty arrays.
fn check_path(base: &Value, keys: &[Option<i64>]) -> Result<(), EvalError> {
    let mut place = Some(base);
    for &key in keys {
        let items = match place {
            None | Some(Value::Null) => &[][..],
            Some(value) => value
                .as_array()
                .ok_or_else(|| cannot_index(value.type_name()))?,
        };
        let position = append_position(items.len(), key)?;
        place = items.get(position);
    }
    Ok(())
}

/// Position written by `key` in an array of `len` elements: `len` appends.
fn append_position(len: usize, key: Option<i64>) -> Result<usize, EvalError> {
    match key {
        None => Ok(len),
        Some(key) => usize::try_from(key)
            .ok()
            .filter(|&i| i <= len)
            .ok_or_else(|| index_out_of_range(key, len)),
    }
}

/// Element `key` of the array in `place`, creating it when `key` is the
/// append position (`None` or `len`). A `null` place becomes an empty array.
fn element_mut(place: &mut Value, key: Option<i64>) -> Result<&mut Value, EvalError> {
    if place.is_null() {
        *place = Value::empty_array();
    }
    match place {
        Value::Array(items) => {
            let items = items.make_mut();
            let len = items.len();
            let position = append_position(len, key)?;
            if position == len {
                items.push(Value::Null);
            }
            Ok(&mut items[position])
        }
        other => Err(cannot_index(other.type_name())),
    }
}

#[cfg(test)]
mod tests;
