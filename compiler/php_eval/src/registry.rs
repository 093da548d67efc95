//! Function lookup and invocation.
//!
//! The evaluator does not own function definitions. An `Invocation` node
//! carries the callee name and the scope it was compiled in; each time it
//! runs, the interpreter asks a [`FunctionRegistry`] to resolve that pair
//! into a [`CallTarget`] and then to invoke it with the evaluated
//! arguments.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use php_ir::ScopeId;

use crate::{EvalError, EvalResult, Value};

/// Opaque handle to a resolved function, chosen by the registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallTarget(u32);

impl CallTarget {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        CallTarget(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// The external function-call collaborator.
pub trait FunctionRegistry: Send + Sync {
    /// Resolve `name` as seen from `scope`. `None` means undefined.
    fn lookup(&self, name: &str, scope: ScopeId) -> Option<CallTarget>;

    /// Run a resolved function with its evaluated arguments.
    fn invoke(&self, target: CallTarget, args: Vec<Value>) -> EvalResult;
}

/// Registry with no functions; every call is undefined.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoFunctions;

impl FunctionRegistry for NoFunctions {
    fn lookup(&self, _name: &str, _scope: ScopeId) -> Option<CallTarget> {
        None
    }

    fn invoke(&self, target: CallTarget, _args: Vec<Value>) -> EvalResult {
        Err(EvalError::new(format!(
            "no function registered for call target {}",
            target.raw()
        )))
    }
}

/// Native function body.
pub type NativeFn = Arc<dyn Fn(&[Value]) -> EvalResult + Send + Sync>;

/// Registry of native functions visible from every scope.
///
/// Names are matched ASCII case-insensitively, as PHP function names are.
#[derive(Clone, Default)]
pub struct FunctionTable {
    by_name: FxHashMap<String, CallTarget>,
    functions: Vec<NativeFn>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `function` under `name`, replacing any earlier definition.
    pub fn define(
        &mut self,
        name: &str,
        function: impl Fn(&[Value]) -> EvalResult + Send + Sync + 'static,
    ) -> CallTarget {
        let key = name.to_ascii_lowercase();
        let function: NativeFn = Arc::new(function);
        if let Some(&target) = self.by_name.get(&key) {
            self.functions[target.0 as usize] = function;
            return target;
        }
        let raw = u32::try_from(self.functions.len())
            .unwrap_or_else(|_| panic!("too many functions: {} exceeds u32::MAX", self.functions.len()));
        let target = CallTarget(raw);
        self.functions.push(function);
        self.by_name.insert(key, target);
        target
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FunctionRegistry for FunctionTable {
    fn lookup(&self, name: &str, _scope: ScopeId) -> Option<CallTarget> {
        self.by_name.get(&name.to_ascii_lowercase()).copied()
    }

    fn invoke(&self, target: CallTarget, args: Vec<Value>) -> EvalResult {
        match self.functions.get(target.0 as usize) {
            Some(function) => function(&args),
            None => Err(EvalError::new(format!(
                "no function registered for call target {}",
                target.raw()
            ))),
        }
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTable")
            .field("functions", &self.by_name.keys().collect::<Vec<_>>())
            .finish()
    }
}
