//! The invocation driver: one [`MacroProxy`] per defined macro.

use std::io::Write;
use std::sync::Arc;

use crate::ast::value::Value;
use crate::ast::CallSite;
use crate::config::MacroConfig;
use crate::errors::{Location, VellumError};
use crate::macros::binder::{bind_arguments, ArgumentWarning};
use crate::macros::definition::MacroDefinition;
use crate::macros::guard::CallDepthGuard;
use crate::runtime::context::{Scope, Visibility};
use crate::runtime::eval::Runtime;

/// Result of a successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Lenient-mode argument mismatches that were absorbed.
    pub warnings: Vec<ArgumentWarning>,
}

/// A macro definition bundled with the configuration it is invoked under.
///
/// Configuration is captured when the proxy is built and never re-read.
#[derive(Debug, Clone)]
pub struct MacroProxy {
    definition: Arc<MacroDefinition>,
    strict_arguments: bool,
    visibility: Visibility,
    depth_limit: Option<usize>,
    body_reference: String,
}

impl MacroProxy {
    pub fn new(definition: impl Into<Arc<MacroDefinition>>, config: &MacroConfig) -> Self {
        Self {
            definition: definition.into(),
            strict_arguments: config.strict_arguments,
            visibility: config.visibility(),
            depth_limit: config.depth_limit(),
            body_reference: config.body_reference.clone(),
        }
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn accepted_arg_count(&self) -> usize {
        self.definition.accepted_arg_count()
    }

    /// Invokes the macro for `call`, rendering its body into `sink`.
    ///
    /// The body runs in a fresh scope whose parent is `caller`. Arguments are
    /// bound first, then the call-depth limit is checked, then the body is
    /// rendered through `runtime`. Runtime-level errors from the body pass
    /// through untouched; any other error is wrapped in
    /// [`VellumError::MacroRender`] naming this macro.
    pub fn invoke(
        &self,
        caller: &Scope<'_>,
        sink: &mut dyn Write,
        call: &CallSite,
        location: &Location,
        runtime: &dyn Runtime,
    ) -> Result<Invocation, VellumError> {
        let mut scope = Scope::child(caller, self.visibility);

        if let Some(body) = &call.body {
            scope.put(self.body_reference.as_str(), Value::Body(body.clone()));
        }

        let warnings = bind_arguments(
            &self.definition,
            call,
            caller,
            &mut scope,
            self.strict_arguments,
            runtime,
            location,
        )?;

        let _frame =
            CallDepthGuard::enter(scope.call_stack(), self.name(), self.depth_limit, location)?;

        match runtime.render(self.definition.body(), &mut scope, sink) {
            Ok(()) => Ok(Invocation { warnings }),
            Err(err) if err.is_runtime() => Err(err),
            Err(err) => {
                tracing::error!(
                    macro_name = self.name(),
                    %location,
                    error = %err,
                    "exception while rendering macro #{}()",
                    self.name()
                );
                Err(VellumError::MacroRender {
                    macro_name: self.name().to_string(),
                    location: location.clone(),
                    source: Box::new(err),
                })
            }
        }
    }
}
