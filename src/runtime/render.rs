//! Reference [`Renderer`] for Vellum's template AST.

use std::cell::RefCell;
use std::io::Write;

use crate::ast::value::Value;
use crate::ast::{AstNode, Expr, Node, Span};
use crate::config::MacroConfig;
use crate::errors::{Location, VellumError};
use crate::macros::binder::ArgumentWarning;
use crate::macros::guard::CallDepthGuard;
use crate::macros::registry::MacroRegistry;
use crate::runtime::context::Scope;
use crate::runtime::eval::{Evaluator, ExprEvaluator, Renderer};

/// Walks template nodes, dispatching macro calls through a registry.
///
/// Unresolved (or nil) references render as their literal `$name` text
/// unless marked silent. A reference bound to a captured body block renders
/// that block in the referencing scope, as a `$name` frame on the call stack
/// so a body that refers to itself hits the depth limit.
pub struct TemplateRenderer<'a, E = ExprEvaluator> {
    macros: &'a MacroRegistry,
    evaluator: E,
    depth_limit: Option<usize>,
    warnings: RefCell<Vec<ArgumentWarning>>,
}

impl<'a> TemplateRenderer<'a> {
    pub fn new(macros: &'a MacroRegistry) -> Self {
        Self::with_evaluator(macros, ExprEvaluator)
    }
}

impl<'a, E: Evaluator> TemplateRenderer<'a, E> {
    /// Uses `evaluator` for every argument, default and condition.
    pub fn with_evaluator(macros: &'a MacroRegistry, evaluator: E) -> Self {
        Self {
            macros,
            evaluator,
            depth_limit: MacroConfig::default().depth_limit(),
            warnings: RefCell::new(Vec::new()),
        }
    }

    /// Limit for nested body-block renders; `None` is unlimited.
    pub fn with_depth_limit(mut self, depth_limit: Option<usize>) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Lenient-mode argument warnings collected since the last call.
    pub fn take_warnings(&self) -> Vec<ArgumentWarning> {
        self.warnings.take()
    }

    fn render_all(
        &self,
        nodes: &[AstNode],
        scope: &mut Scope<'_>,
        sink: &mut dyn Write,
    ) -> Result<(), VellumError> {
        for node in nodes {
            self.render(node, scope, sink)?;
        }
        Ok(())
    }

    fn render_reference(
        &self,
        name: &str,
        silent: bool,
        span: Span,
        scope: &mut Scope<'_>,
        sink: &mut dyn Write,
    ) -> Result<(), VellumError> {
        let body = match scope.get(name) {
            Some(Value::Body(body)) => body.clone(),
            Some(value) if !value.is_nil() => return Ok(write!(sink, "{value}")?),
            _ if silent => return Ok(()),
            _ => return Ok(write!(sink, "${name}")?),
        };
        let location = Location::new(scope.template_name().cloned(), span);
        let _frame = CallDepthGuard::enter(
            scope.call_stack(),
            &format!("${name}"),
            self.depth_limit,
            &location,
        )?;
        self.render(&body, scope, sink)
    }
}

impl<E: Evaluator> Evaluator for TemplateRenderer<'_, E> {
    fn evaluate(&self, expr: &Expr, scope: &Scope<'_>) -> Result<Value, VellumError> {
        self.evaluator.evaluate(expr, scope)
    }
}

impl<E: Evaluator> Renderer for TemplateRenderer<'_, E> {
    fn render(
        &self,
        node: &AstNode,
        scope: &mut Scope<'_>,
        sink: &mut dyn Write,
    ) -> Result<(), VellumError> {
        match &*node.value {
            Node::Text { text } => Ok(sink.write_all(text.as_bytes())?),
            Node::Reference { name, silent } => {
                self.render_reference(name, *silent, node.span, scope, sink)
            }
            Node::Call(call) => {
                let location = Location::new(scope.template_name().cloned(), node.span);
                let proxy = self
                    .macros
                    .get(&call.name)
                    .ok_or_else(|| VellumError::UndefinedMacro {
                        name: call.name.clone(),
                        location: location.clone(),
                    })?;
                let invocation = proxy.invoke(scope, sink, call, &location, self)?;
                self.warnings.borrow_mut().extend(invocation.warnings);
                Ok(())
            }
            Node::If {
                condition,
                then,
                otherwise,
            } => {
                if self.evaluate(condition, scope)?.is_truthy() {
                    self.render_all(then, scope, sink)
                } else {
                    self.render_all(otherwise, scope, sink)
                }
            }
            Node::Set { name, value } => {
                let value = self.evaluate(value, scope)?;
                scope.put(name.as_str(), value);
                Ok(())
            }
            Node::Block { children } => self.render_all(children, scope, sink),
        }
    }
}
