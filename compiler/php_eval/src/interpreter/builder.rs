//! `InterpreterBuilder` for configuring an `Interpreter`.

use php_ir::StringInterner;

use super::Interpreter;
use crate::{FunctionRegistry, NoFunctions, UndefinedVariablePolicy};

static NO_FUNCTIONS: NoFunctions = NoFunctions;

/// Builder for [`Interpreter`].
///
/// Defaults: no functions (every call is undefined) and
/// [`UndefinedVariablePolicy::Error`].
pub struct InterpreterBuilder<'a> {
    interner: &'a StringInterner,
    registry: Option<&'a dyn FunctionRegistry>,
    undefined_variables: UndefinedVariablePolicy,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        InterpreterBuilder {
            interner,
            registry: None,
            undefined_variables: UndefinedVariablePolicy::default(),
        }
    }

    /// Set the registry that resolves and runs invoked functions.
    #[must_use]
    pub fn registry(mut self, registry: &'a dyn FunctionRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set how reads of undefined variables behave.
    #[must_use]
    pub fn undefined_variables(mut self, policy: UndefinedVariablePolicy) -> Self {
        self.undefined_variables = policy;
        self
    }

    pub fn build(self) -> Interpreter<'a> {
        Interpreter {
            interner: self.interner,
            registry: self.registry.unwrap_or(&NO_FUNCTIONS),
            undefined_variables: self.undefined_variables,
        }
    }
}
