//! End-to-end tests: syntax tree -> `compile` -> `Interpreter::evaluate`.
//!
//! Each test drives a `Session` that keeps one scope and one frame across
//! several compiled expressions, the way a statement layer would.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use php_diagnostic::ErrorCode;
use php_eval::{
    EvalErrorKind, EvalResult, Frame, FunctionTable, InterpreterBuilder,
    UndefinedVariablePolicy, Value,
};
use php_ir::{
    AssignOp, AstBuilder, ExprId, IncDecOp, InfixOp, StringInterner, UnaryOpCode,
};
use php_lower::{compile, compile_sequence, CompileError, Scope};

struct Session {
    interner: StringInterner,
    scope: Scope,
    frame: Frame,
    functions: FunctionTable,
    policy: UndefinedVariablePolicy,
}

impl Session {
    fn new() -> Self {
        Session {
            interner: StringInterner::new(),
            scope: Scope::root(),
            frame: Frame::new(),
            functions: FunctionTable::new(),
            policy: UndefinedVariablePolicy::Error,
        }
    }

    fn run(&mut self, build: impl FnOnce(&mut AstBuilder<'_>) -> ExprId) -> EvalResult {
        let mut b = AstBuilder::new(&self.interner);
        let root = build(&mut b);
        let arena = b.finish();
        let expr = compile(&arena, root, &mut self.scope, &self.interner).unwrap();
        let interpreter = InterpreterBuilder::new(&self.interner)
            .registry(&self.functions)
            .undefined_variables(self.policy)
            .build();
        interpreter.evaluate(&expr, &mut self.frame)
    }

    fn run_all(&mut self, build: impl FnOnce(&mut AstBuilder<'_>) -> Vec<ExprId>) -> EvalResult {
        let mut b = AstBuilder::new(&self.interner);
        let exprs = build(&mut b);
        let arena = b.finish();
        let expr = compile_sequence(&arena, &exprs, &mut self.scope, &self.interner).unwrap();
        let interpreter = InterpreterBuilder::new(&self.interner)
            .registry(&self.functions)
            .undefined_variables(self.policy)
            .build();
        interpreter.evaluate(&expr, &mut self.frame)
    }

    /// `$name = <int literal>`
    fn set_int(&mut self, name: &str, value: &str) {
        self.run(|b| {
            let target = b.var(name);
            let value = b.int(value);
            b.assign(target, value)
        })
        .unwrap();
    }

    fn read(&mut self, name: &str) -> EvalResult {
        self.run(|b| b.var(name))
    }
}

fn ints(values: &[i64]) -> Value {
    Value::array(values.iter().copied().map(Value::Int).collect())
}

mod evaluation_order {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn left_operand_side_effect_visible_to_right() {
        let mut s = Session::new();
        s.set_int("i", "1");

        // $i++ + $i  ==  1 + 2
        let result = s
            .run(|b| {
                let left_var = b.var("i");
                let left = b.postfix(IncDecOp::Inc, left_var);
                let right = b.var("i");
                b.infix(InfixOp::Plus, left, right)
            })
            .unwrap();

        assert_eq!(result, Value::Int(3));
        assert_eq!(s.read("i").unwrap(), Value::Int(2));
    }

    #[test]
    fn array_elements_evaluate_left_to_right() {
        let mut s = Session::new();
        s.set_int("i", "0");

        let result = s
            .run(|b| {
                let a = b.var("i");
                let first = b.prefix(IncDecOp::Inc, a);
                let c = b.var("i");
                let second = b.prefix(IncDecOp::Inc, c);
                b.array(&[first, second])
            })
            .unwrap();

        assert_eq!(result, ints(&[1, 2]));
    }

    #[test]
    fn sequence_yields_last_value() {
        let mut s = Session::new();
        let result = s
            .run_all(|b| {
                let x = b.var("x");
                let one = b.int("1");
                let first = b.assign(x, one);
                let x2 = b.var("x");
                let ten = b.int("10");
                let second = b.assign_op(AssignOp::PlusEqual, x2, ten);
                vec![first, second]
            })
            .unwrap();

        assert_eq!(result, Value::Int(11));
    }
}

mod short_circuit {
    use super::*;
    use pretty_assertions::assert_eq;

    fn counting_session() -> (Session, Arc<AtomicUsize>) {
        let mut s = Session::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        s.functions.define("touch", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Bool(true))
        });
        (s, calls)
    }

    #[test]
    fn and_skips_right_when_left_is_false() {
        let (mut s, calls) = counting_session();
        let result = s
            .run(|b| {
                let left = b.string("false");
                let right = b.call("touch", &[]);
                b.infix(InfixOp::BoolAnd, left, right)
            })
            .unwrap();

        assert_eq!(result, Value::Bool(false));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn or_skips_right_when_left_is_true() {
        let (mut s, calls) = counting_session();
        let result = s
            .run(|b| {
                let left = b.int("1");
                let right = b.call("touch", &[]);
                b.infix(InfixOp::LogicalOr, left, right)
            })
            .unwrap();

        assert_eq!(result, Value::Bool(true));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn and_evaluates_right_when_needed() {
        let (mut s, calls) = counting_session();
        let result = s
            .run(|b| {
                let left = b.string("true");
                let right = b.call("touch", &[]);
                b.infix(InfixOp::BoolAnd, left, right)
            })
            .unwrap();

        assert_eq!(result, Value::Bool(true));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

mod arrays {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn assignment_copies_arrays() {
        let mut s = Session::new();
        s.run(|b| {
            let a = b.var("a");
            let one = b.int("1");
            let two = b.int("2");
            let list = b.array(&[one, two]);
            b.assign(a, list)
        })
        .unwrap();
        s.run(|b| {
            let target = b.var("b");
            let source = b.var("a");
            b.assign(target, source)
        })
        .unwrap();
        s.run(|b| {
            let a = b.var("a");
            let zero = b.int("0");
            let element = b.index(a, zero);
            let nine = b.int("9");
            b.assign(element, nine)
        })
        .unwrap();

        assert_eq!(s.read("a").unwrap(), ints(&[9, 2]));
        assert_eq!(s.read("b").unwrap(), ints(&[1, 2]));
    }

    #[test]
    fn empty_array_creation() {
        let mut s = Session::new();
        assert_eq!(s.run(|b| b.array(&[])).unwrap(), Value::empty_array());
    }

    #[test]
    fn append_builds_array_from_nothing() {
        let mut s = Session::new();
        for value in ["4", "5"] {
            s.run(|b| {
                let a = b.var("list");
                let slot = b.append_slot(a);
                let v = b.int(value);
                b.assign(slot, v)
            })
            .unwrap();
        }
        assert_eq!(s.read("list").unwrap(), ints(&[4, 5]));
    }

    #[test]
    fn compound_assignment_on_element() {
        let mut s = Session::new();
        s.run(|b| {
            let a = b.var("a");
            let ten = b.int("10");
            let list = b.array(&[ten]);
            b.assign(a, list)
        })
        .unwrap();
        let result = s
            .run(|b| {
                let a = b.var("a");
                let zero = b.int("0");
                let element = b.index(a, zero);
                let five = b.int("5");
                b.assign_op(AssignOp::MinusEqual, element, five)
            })
            .unwrap();

        assert_eq!(result, Value::Int(5));
        assert_eq!(s.read("a").unwrap(), ints(&[5]));
    }

    #[test]
    fn read_past_end_is_out_of_range() {
        let mut s = Session::new();
        let err = s
            .run(|b| {
                let one = b.int("1");
                let list = b.array(&[one]);
                let three = b.int("3");
                b.index(list, three)
            })
            .unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::IndexOutOfRange { index: 3, len: 1 });
    }
}

mod increments {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prefix_yields_updated_value() {
        let mut s = Session::new();
        s.set_int("x", "5");
        let result = s
            .run(|b| {
                let x = b.var("x");
                b.prefix(IncDecOp::Inc, x)
            })
            .unwrap();
        assert_eq!(result, Value::Int(6));
        assert_eq!(s.read("x").unwrap(), Value::Int(6));
    }

    #[test]
    fn postfix_yields_previous_value() {
        let mut s = Session::new();
        s.set_int("x", "5");
        let result = s
            .run(|b| {
                let x = b.var("x");
                b.postfix(IncDecOp::Inc, x)
            })
            .unwrap();
        assert_eq!(result, Value::Int(5));
        assert_eq!(s.read("x").unwrap(), Value::Int(6));
    }

    #[test]
    fn decrement_of_fresh_name_starts_from_null() {
        let mut s = Session::new();
        let result = s
            .run(|b| {
                let x = b.var("fresh");
                b.prefix(IncDecOp::Dec, x)
            })
            .unwrap();
        assert_eq!(result, Value::Int(-1));
    }
}

mod variables {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unset_then_read_is_undefined() {
        let mut s = Session::new();
        s.set_int("x", "1");
        let result = s
            .run(|b| {
                let x = b.var("x");
                b.call("unset", &[x])
            })
            .unwrap();
        assert_eq!(result, Value::Null);

        let err = s.read("x").unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::UndefinedVariable {
                name: "x".to_string()
            }
        );
    }

    #[test]
    fn failed_element_write_keeps_unset_variable_undefined() {
        let mut s = Session::new();
        s.set_int("a", "7");
        s.run(|b| {
            let a = b.var("a");
            b.call("unset", &[a])
        })
        .unwrap();

        let err = s
            .run(|b| {
                let a = b.var("a");
                let five = b.int("5");
                let target = b.index(a, five);
                let one = b.int("1");
                b.assign(target, one)
            })
            .unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::IndexOutOfRange { index: 5, len: 0 });

        assert_eq!(
            s.read("a").unwrap_err().kind,
            EvalErrorKind::UndefinedVariable {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn never_written_name_fails_at_evaluation() {
        let mut s = Session::new();
        let err = s.read("ghost").unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::UndefinedVariable {
                name: "ghost".to_string()
            }
        );
        assert_eq!(err.kind.error_code(), ErrorCode::E6001);
    }

    #[test]
    fn lenient_policy_reads_null() {
        let mut s = Session::new();
        s.policy = UndefinedVariablePolicy::WarnAndNull;
        assert_eq!(s.read("ghost").unwrap(), Value::Null);
    }

    #[test]
    fn reassignment_after_unset_is_defined() {
        let mut s = Session::new();
        s.set_int("x", "0");
        s.run(|b| {
            let x = b.var("x");
            b.call("unset", &[x])
        })
        .unwrap();
        s.run(|b| {
            let x = b.var("x");
            let zero = b.int("0");
            b.assign(x, zero)
        })
        .unwrap();
        assert_eq!(s.read("x").unwrap(), Value::Int(0));
    }
}

mod arithmetic {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn int_division_by_zero() {
        let mut s = Session::new();
        let err = s
            .run(|b| {
                let five = b.int("5");
                let zero = b.int("0");
                b.infix(InfixOp::Div, five, zero)
            })
            .unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    }

    #[test]
    fn float_division_by_zero() {
        let mut s = Session::new();
        let err = s
            .run(|b| {
                let five = b.real("5.0");
                let zero = b.int("0");
                b.infix(InfixOp::Div, five, zero)
            })
            .unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    }

    #[test]
    fn runtime_error_carries_node_span() {
        let mut s = Session::new();
        let err = s
            .run(|b| {
                let five = b.int("5");
                let zero = b.int("0");
                b.infix(InfixOp::Div, five, zero)
            })
            .unwrap_err();
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.code, ErrorCode::E6003);
        assert_eq!(diagnostic.primary_span(), err.span);
        assert!(err.span.is_some());
    }

    #[test]
    fn negation_and_shift() {
        let mut s = Session::new();
        let result = s
            .run(|b| {
                let one = b.int("1");
                let four = b.int("4");
                let shifted = b.infix(InfixOp::ShiftLeft, one, four);
                b.unary(UnaryOpCode::Minus, shifted)
            })
            .unwrap();
        assert_eq!(result, Value::Int(-16));
    }

    #[test]
    fn comparison_yields_bool() {
        let mut s = Session::new();
        let result = s
            .run(|b| {
                let two = b.int("2");
                let half = b.real("2.5");
                b.infix(InfixOp::Less, two, half)
            })
            .unwrap();
        assert_eq!(result, Value::Bool(true));
    }
}

mod calls {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn registered_function_receives_arguments() {
        let mut s = Session::new();
        s.functions.define("add", |args| match args {
            [Value::Int(a), Value::Int(b)] => Ok(Value::Int(a + b)),
            _ => Ok(Value::Null),
        });
        s.set_int("x", "40");

        let result = s
            .run(|b| {
                let x = b.var("x");
                let two = b.int("2");
                b.call("Add", &[x, two])
            })
            .unwrap();
        assert_eq!(result, Value::Int(42));
    }

    #[test]
    fn unknown_function_fails_at_evaluation() {
        let mut s = Session::new();
        let err = s.run(|b| b.call("nope", &[])).unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::UndefinedFunction {
                name: "nope".to_string()
            }
        );
    }
}

mod diagnostics {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn compile_error_converts_to_diagnostic() {
        let interner = StringInterner::new();
        let mut b = AstBuilder::new(&interner);
        let one = b.int("1");
        let two = b.int("2");
        let root = b.infix(InfixOp::Pow, one, two);
        let arena = b.finish();

        let err = compile(&arena, root, &mut Scope::root(), &interner).unwrap_err();
        let diagnostic = err.to_diagnostic();

        assert_eq!(diagnostic.code, ErrorCode::E1001);
        assert_eq!(diagnostic.primary_span(), Some(err.span()));
        assert!(diagnostic.code.is_compile_error());
        assert!(matches!(err, CompileError::UnsupportedConstruct { .. }));
    }
}
