#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::{EvalErrorKind, FunctionTable};
use php_ir::Span;

/// Hand-built node trees; the compiler is not a dependency of this crate.
struct Fixture {
    interner: StringInterner,
    nodes: NodeArena,
    next: u32,
}

impl Fixture {
    fn new() -> Self {
        Fixture {
            interner: StringInterner::new(),
            nodes: NodeArena::new(),
            next: 1,
        }
    }

    fn push(&mut self, node: Node) -> NodeId {
        let span = Span::from_start_len(self.next, 1);
        self.next += 2;
        self.nodes.push(node, span)
    }

    fn int(&mut self, n: i64) -> NodeId {
        self.push(Node::Int(n))
    }

    fn var(&mut self, name: &str, slot: Slot) -> NodeId {
        let name = self.interner.intern(name);
        self.push(Node::Var { name, slot })
    }

    fn assign(&mut self, slot: Slot, value: NodeId) -> NodeId {
        self.push(Node::Assign { slot, value })
    }

    fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        self.push(Node::Binary { op, left, right })
    }

    fn list(&mut self, items: &[NodeId]) -> NodeId {
        let range = self.nodes.push_node_list(items);
        self.push(Node::List(range))
    }

    fn seq(&mut self, items: &[NodeId]) -> NodeId {
        let range = self.nodes.push_node_list(items);
        self.push(Node::Seq(range))
    }

    fn index(&mut self, target: NodeId, index: NodeId) -> NodeId {
        self.push(Node::Index { target, index })
    }

    fn index_assign(&mut self, target: NodeId, index: NodeId, value: NodeId) -> NodeId {
        self.push(Node::IndexAssign {
            target,
            index,
            value,
        })
    }

    fn call(&mut self, name: &str, args: &[NodeId]) -> NodeId {
        let func = self.interner.intern(name);
        let args = self.nodes.push_node_list(args);
        self.push(Node::Call {
            func,
            scope: ScopeId::ROOT,
            args,
        })
    }

    fn unset(&mut self, slots: &[Slot]) -> NodeId {
        let range = self.nodes.push_slot_list(slots);
        self.push(Node::Unset(range))
    }

    /// Evaluate `root` with a fresh strict interpreter.
    fn eval(&self, root: NodeId, frame: &mut Frame) -> EvalResult {
        let expr = CompiledExpr::new(self.nodes.clone(), root);
        Interpreter::new(&self.interner).evaluate(&expr, frame)
    }

    fn eval_with(&self, interp: &Interpreter<'_>, root: NodeId, frame: &mut Frame) -> EvalResult {
        let expr = CompiledExpr::new(self.nodes.clone(), root);
        interp.evaluate(&expr, frame)
    }
}

const A: Slot = Slot::new(0);
const B: Slot = Slot::new(1);

mod literals {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn float_bits_round_trip() {
        let mut f = Fixture::new();
        let root = f.push(Node::Float(2.5f64.to_bits()));
        assert_eq!(f.eval(root, &mut Frame::new()).unwrap(), Value::Float(2.5));
    }

    #[test]
    fn bool_literal() {
        let mut f = Fixture::new();
        let root = f.push(Node::Bool(true));
        assert_eq!(f.eval(root, &mut Frame::new()).unwrap(), Value::Bool(true));
    }
}

mod variables {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unresolved_read_is_undefined_with_span() {
        let mut f = Fixture::new();
        let root = f.var("x", Slot::INVALID);
        let err = f.eval(root, &mut Frame::new()).unwrap_err();

        assert_eq!(
            err.kind,
            EvalErrorKind::UndefinedVariable {
                name: "x".to_string()
            }
        );
        assert_eq!(err.span, Some(f.nodes.span(root)));
    }

    #[test]
    fn lenient_policy_reads_null() {
        let mut f = Fixture::new();
        let root = f.var("x", Slot::INVALID);
        let interp = InterpreterBuilder::new(&f.interner)
            .undefined_variables(UndefinedVariablePolicy::WarnAndNull)
            .build();

        assert_eq!(
            f.eval_with(&interp, root, &mut Frame::new()).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn assignment_yields_and_stores_value() {
        let mut f = Fixture::new();
        let seven = f.int(7);
        let root = f.assign(A, seven);
        let mut frame = Frame::with_slots(1);

        assert_eq!(f.eval(root, &mut frame).unwrap(), Value::Int(7));
        assert_eq!(frame.get(A), Some(Value::Int(7)));
    }

    #[test]
    fn prefix_and_postfix_increment() {
        let mut f = Fixture::new();
        let pre = f.push(Node::IncDec {
            slot: A,
            delta: 1,
            fixity: Fixity::Prefix,
        });
        let post = f.push(Node::IncDec {
            slot: A,
            delta: 1,
            fixity: Fixity::Postfix,
        });

        let mut frame = Frame::new();
        frame.set(A, Value::Int(5));
        assert_eq!(f.eval(pre, &mut frame).unwrap(), Value::Int(6));
        assert_eq!(frame.get(A), Some(Value::Int(6)));

        let mut frame = Frame::new();
        frame.set(A, Value::Int(5));
        assert_eq!(f.eval(post, &mut frame).unwrap(), Value::Int(5));
        assert_eq!(frame.get(A), Some(Value::Int(6)));
    }

    #[test]
    fn decrement_from_vacant_slot() {
        let mut f = Fixture::new();
        let root = f.push(Node::IncDec {
            slot: A,
            delta: -1,
            fixity: Fixity::Postfix,
        });
        let mut frame = Frame::new();

        assert_eq!(f.eval(root, &mut frame).unwrap(), Value::Null);
        assert_eq!(frame.get(A), Some(Value::Int(-1)));
    }

    #[test]
    fn unset_then_read_is_undefined() {
        let mut f = Fixture::new();
        let unset = f.unset(&[A]);
        let read = f.var("a", A);
        let mut frame = Frame::new();
        frame.set(A, Value::Int(1));

        assert_eq!(f.eval(unset, &mut frame).unwrap(), Value::Null);
        let err = f.eval(read, &mut frame).unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::UndefinedVariable { .. }));
    }
}

mod operators {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn and_short_circuits() {
        let mut f = Fixture::new();
        let left = f.push(Node::Bool(false));
        let one = f.int(1);
        let right = f.assign(A, one);
        let root = f.binary(BinaryOp::And, left, right);
        let mut frame = Frame::with_slots(1);

        assert_eq!(f.eval(root, &mut frame).unwrap(), Value::Bool(false));
        assert_eq!(frame, Frame::with_slots(1));
    }

    #[test]
    fn or_short_circuits() {
        let mut f = Fixture::new();
        let left = f.int(3);
        let one = f.int(1);
        let right = f.assign(A, one);
        let root = f.binary(BinaryOp::Or, left, right);
        let mut frame = Frame::with_slots(1);

        assert_eq!(f.eval(root, &mut frame).unwrap(), Value::Bool(true));
        assert_eq!(frame, Frame::with_slots(1));
    }

    #[test]
    fn logical_result_is_boolean() {
        let mut f = Fixture::new();
        let left = f.int(3);
        let right = f.int(4);
        let root = f.binary(BinaryOp::And, left, right);
        assert_eq!(f.eval(root, &mut Frame::new()).unwrap(), Value::Bool(true));
    }

    #[test]
    fn left_side_effect_visible_to_right() {
        // ($a = 2) * $a
        let mut f = Fixture::new();
        let two = f.int(2);
        let left = f.assign(A, two);
        let right = f.var("a", A);
        let root = f.binary(BinaryOp::Mul, left, right);

        assert_eq!(f.eval(root, &mut Frame::new()).unwrap(), Value::Int(4));
    }

    #[test]
    fn error_span_is_innermost_failing_node() {
        let mut f = Fixture::new();
        let five = f.int(5);
        let zero = f.int(0);
        let div = f.binary(BinaryOp::Div, five, zero);
        let one = f.int(1);
        let root = f.binary(BinaryOp::Add, one, div);

        let err = f.eval(root, &mut Frame::new()).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
        assert_eq!(err.span, Some(f.nodes.span(div)));
    }
}

mod arrays {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_list() {
        let mut f = Fixture::new();
        let root = f.list(&[]);
        assert_eq!(f.eval(root, &mut Frame::new()).unwrap(), Value::empty_array());
    }

    #[test]
    fn list_elements_in_order() {
        // [$a = 1, $a + 1]
        let mut f = Fixture::new();
        let one = f.int(1);
        let first = f.assign(A, one);
        let read = f.var("a", A);
        let one_more = f.int(1);
        let second = f.binary(BinaryOp::Add, read, one_more);
        let root = f.list(&[first, second]);

        assert_eq!(
            f.eval(root, &mut Frame::new()).unwrap(),
            Value::array(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn read_errors() {
        let mut f = Fixture::new();
        let scalar = f.int(3);
        let zero = f.int(0);
        let on_scalar = f.index(scalar, zero);
        let items = f.list(&[]);
        let zero_again = f.int(0);
        let out_of_range = f.index(items, zero_again);
        let items2 = f.list(&[]);
        let key = f.list(&[]);
        let bad_key = f.index(items2, key);

        let mut frame = Frame::new();
        assert!(matches!(
            f.eval(on_scalar, &mut frame).unwrap_err().kind,
            EvalErrorKind::TypeMismatch { .. }
        ));
        assert_eq!(
            f.eval(out_of_range, &mut frame).unwrap_err().kind,
            EvalErrorKind::IndexOutOfRange { index: 0, len: 0 }
        );
        assert!(matches!(
            f.eval(bad_key, &mut frame).unwrap_err().kind,
            EvalErrorKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn append_and_overwrite() {
        let mut f = Fixture::new();
        let target = f.var("a", A);
        let ten = f.int(10);
        let append = f.index_assign(target, NodeId::INVALID, ten);
        let target2 = f.var("a", A);
        let zero = f.int(0);
        let twenty = f.int(20);
        let overwrite = f.index_assign(target2, zero, twenty);

        let mut frame = Frame::new();
        assert_eq!(f.eval(append, &mut frame).unwrap(), Value::Int(10));
        assert_eq!(f.eval(append, &mut frame).unwrap(), Value::Int(10));
        assert_eq!(f.eval(overwrite, &mut frame).unwrap(), Value::Int(20));
        assert_eq!(
            frame.get(A),
            Some(Value::array(vec![Value::Int(20), Value::Int(10)]))
        );
    }

    #[test]
    fn write_past_end_is_out_of_range() {
        let mut f = Fixture::new();
        let target = f.var("a", A);
        let two = f.int(2);
        let one = f.int(1);
        let root = f.index_assign(target, two, one);
        let mut frame = Frame::new();
        frame.set(A, Value::array(vec![Value::Int(0)]));

        assert_eq!(
            f.eval(root, &mut frame).unwrap_err().kind,
            EvalErrorKind::IndexOutOfRange { index: 2, len: 1 }
        );
        assert_eq!(frame.get(A), Some(Value::array(vec![Value::Int(0)])));
    }

    /// `$a[5] = 1` where `$a` holds whatever `frame` has in slot A.
    fn write_at_five(f: &mut Fixture) -> NodeId {
        let target = f.var("a", A);
        let five = f.int(5);
        let one = f.int(1);
        f.index_assign(target, five, one)
    }

    #[test]
    fn failed_write_keeps_unset_base_undefined() {
        let mut f = Fixture::new();
        let root = write_at_five(&mut f);
        let mut frame = Frame::new();
        frame.set(A, Value::Int(7));
        frame.unset(A);
        let before = frame.clone();

        assert_eq!(
            f.eval(root, &mut frame).unwrap_err().kind,
            EvalErrorKind::IndexOutOfRange { index: 5, len: 0 }
        );
        assert_eq!(frame.get(A), None);
        assert_eq!(frame, before);
    }

    #[test]
    fn failed_write_leaves_vacant_base_vacant() {
        let mut f = Fixture::new();
        let root = write_at_five(&mut f);
        let mut frame = Frame::with_slots(1);

        assert!(f.eval(root, &mut frame).is_err());
        assert_eq!(frame, Frame::with_slots(1));
    }

    #[test]
    fn failed_write_leaves_null_base_null() {
        let mut f = Fixture::new();
        let root = write_at_five(&mut f);
        let mut frame = Frame::new();
        frame.set(A, Value::Null);
        let before = frame.clone();

        assert!(f.eval(root, &mut frame).is_err());
        assert_eq!(frame, before);
        assert_eq!(frame.get(A), Some(Value::Null));
    }

    #[test]
    fn failed_nested_write_leaves_outer_array() {
        // $a = [[]]; $a[1][3] = 1
        let mut f = Fixture::new();
        let base = f.var("a", A);
        let one = f.int(1);
        let inner = f.index(base, one);
        let three = f.int(3);
        let value = f.int(1);
        let root = f.index_assign(inner, three, value);
        let mut frame = Frame::new();
        frame.set(A, Value::array(vec![Value::empty_array()]));

        assert_eq!(
            f.eval(root, &mut frame).unwrap_err().kind,
            EvalErrorKind::IndexOutOfRange { index: 3, len: 0 }
        );
        assert_eq!(
            frame.get(A),
            Some(Value::array(vec![Value::empty_array()]))
        );
    }

    #[test]
    fn failed_nested_write_through_scalar_element() {
        // $a = [7]; $a[0][0] = 1
        let mut f = Fixture::new();
        let base = f.var("a", A);
        let zero = f.int(0);
        let inner = f.index(base, zero);
        let zero2 = f.int(0);
        let value = f.int(1);
        let root = f.index_assign(inner, zero2, value);
        let mut frame = Frame::new();
        frame.set(A, Value::array(vec![Value::Int(7)]));
        let before = frame.clone();

        assert!(matches!(
            f.eval(root, &mut frame).unwrap_err().kind,
            EvalErrorKind::TypeMismatch { .. }
        ));
        assert_eq!(frame, before);
    }

    #[test]
    fn write_into_scalar_is_type_mismatch() {
        let mut f = Fixture::new();
        let target = f.var("a", A);
        let zero = f.int(0);
        let one = f.int(1);
        let root = f.index_assign(target, zero, one);
        let mut frame = Frame::new();
        frame.set(A, Value::Int(3));

        assert!(matches!(
            f.eval(root, &mut frame).unwrap_err().kind,
            EvalErrorKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn nested_write_vivifies() {
        // $a[0][0] = 5 on an undefined $a
        let mut f = Fixture::new();
        let base = f.var("a", A);
        let outer_key = f.int(0);
        let inner = f.index(base, outer_key);
        let inner_key = f.int(0);
        let five = f.int(5);
        let root = f.index_assign(inner, inner_key, five);
        let mut frame = Frame::new();

        assert_eq!(f.eval(root, &mut frame).unwrap(), Value::Int(5));
        assert_eq!(
            frame.get(A),
            Some(Value::array(vec![Value::array(vec![Value::Int(5)])]))
        );
    }

    #[test]
    fn write_does_not_alias_copy() {
        // $b = $a; $a[] = 3;
        let mut f = Fixture::new();
        let read_a = f.var("a", A);
        let copy = f.assign(B, read_a);
        let target = f.var("a", A);
        let three = f.int(3);
        let append = f.index_assign(target, NodeId::INVALID, three);
        let root = f.seq(&[copy, append]);

        let mut frame = Frame::new();
        frame.set(A, Value::array(vec![Value::Int(1)]));
        f.eval(root, &mut frame).unwrap();

        assert_eq!(
            frame.get(A),
            Some(Value::array(vec![Value::Int(1), Value::Int(3)]))
        );
        assert_eq!(frame.get(B), Some(Value::array(vec![Value::Int(1)])));
    }
}

mod calls {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn undefined_function() {
        let mut f = Fixture::new();
        let root = f.call("missing", &[]);
        let err = f.eval(root, &mut Frame::new()).unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::UndefinedFunction {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn arguments_evaluated_before_invoke() {
        let mut table = FunctionTable::new();
        table.define("count", |args| {
            Ok(Value::Int(i64::try_from(args.len()).unwrap_or(i64::MAX)))
        });

        let mut f = Fixture::new();
        let one = f.int(1);
        let two = f.int(2);
        let root = f.call("COUNT", &[one, two]);
        let interp = InterpreterBuilder::new(&f.interner).registry(&table).build();

        assert_eq!(
            f.eval_with(&interp, root, &mut Frame::new()).unwrap(),
            Value::Int(2)
        );
    }
}

mod sequences {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_sequence_is_null() {
        let mut f = Fixture::new();
        let root = f.seq(&[]);
        assert_eq!(f.eval(root, &mut Frame::new()).unwrap(), Value::Null);
    }

    #[test]
    fn sequence_yields_last() {
        let mut f = Fixture::new();
        let one = f.int(1);
        let first = f.assign(A, one);
        let two = f.int(2);
        let second = f.assign(B, two);
        let root = f.seq(&[first, second]);
        let mut frame = Frame::new();

        assert_eq!(f.eval(root, &mut frame).unwrap(), Value::Int(2));
        assert_eq!(frame.get(A), Some(Value::Int(1)));
    }
}

mod concurrency {
    use super::*;
    use pretty_assertions::assert_eq;
    use rayon::prelude::*;

    #[test]
    fn frames_evaluate_independently_in_parallel() {
        // $b = $a * 2; $a = $a + 1
        let mut f = Fixture::new();
        let read_a = f.var("a", A);
        let two = f.int(2);
        let doubled = f.binary(BinaryOp::Mul, read_a, two);
        let set_b = f.assign(B, doubled);
        let read_a_again = f.var("a", A);
        let one = f.int(1);
        let bumped = f.binary(BinaryOp::Add, read_a_again, one);
        let set_a = f.assign(A, bumped);
        let root = f.seq(&[set_b, set_a]);

        let expr = CompiledExpr::new(f.nodes.clone(), root);
        let interp = Interpreter::new(&f.interner);

        let results: Vec<(Value, Option<Value>)> = (0..256i64)
            .into_par_iter()
            .map(|n| {
                let mut frame = Frame::with_slots(2);
                frame.set(A, Value::Int(n));
                let last = interp.evaluate(&expr, &mut frame).unwrap();
                (last, frame.get(B))
            })
            .collect();

        for (n, (last, b)) in (0..256i64).zip(results) {
            assert_eq!(last, Value::Int(n + 1));
            assert_eq!(b, Some(Value::Int(n * 2)));
        }
    }
}
