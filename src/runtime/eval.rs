//! Collaborator traits for macro invocation, and the expression evaluator.
//!
//! The macro engine never evaluates expressions or walks a body itself: it
//! binds names and hands off to an [`Evaluator`] and a [`Renderer`].
//! [`ExprEvaluator`] is the evaluator for the [`Expr`] language used by
//! Vellum's own templates.

use std::io::Write;

use crate::ast::value::Value;
use crate::ast::{AstNode, BinaryOp, Expr};
use crate::errors::VellumError;
use crate::runtime::context::Scope;

/// Computes the value of an argument or default-value expression.
pub trait Evaluator {
    fn evaluate(&self, expr: &Expr, scope: &Scope<'_>) -> Result<Value, VellumError>;
}

/// Renders a body AST against a scope into a sink.
pub trait Renderer {
    fn render(
        &self,
        node: &AstNode,
        scope: &mut Scope<'_>,
        sink: &mut dyn Write,
    ) -> Result<(), VellumError>;
}

/// Everything a macro invocation needs from its surroundings.
pub trait Runtime: Evaluator + Renderer {}

impl<T: Evaluator + Renderer> Runtime for T {}

/// Evaluator for [`Expr`]. References that resolve to nothing yield `Nil`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprEvaluator;

impl Evaluator for ExprEvaluator {
    fn evaluate(&self, expr: &Expr, scope: &Scope<'_>) -> Result<Value, VellumError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Reference(name) => Ok(scope.get(name).cloned().unwrap_or_default()),
            Expr::List(items) => items
                .iter()
                .map(|item| self.evaluate(item, scope))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Expr::Not(inner) => Ok(Value::Bool(!self.evaluate(inner, scope)?.is_truthy())),
            Expr::Binary { op, lhs, rhs } => self.evaluate_binary(*op, lhs, rhs, scope),
        }
    }
}

impl ExprEvaluator {
    fn evaluate_binary(
        &self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        scope: &Scope<'_>,
    ) -> Result<Value, VellumError> {
        // Short-circuit before touching the right-hand side.
        match op {
            BinaryOp::And => {
                let left = self.evaluate(lhs, scope)?;
                if !left.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                return Ok(Value::Bool(self.evaluate(rhs, scope)?.is_truthy()));
            }
            BinaryOp::Or => {
                let left = self.evaluate(lhs, scope)?;
                if left.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                return Ok(Value::Bool(self.evaluate(rhs, scope)?.is_truthy()));
            }
            _ => {}
        }

        let left = self.evaluate(lhs, scope)?;
        let right = self.evaluate(rhs, scope)?;
        match op {
            BinaryOp::Eq => Ok(Value::Bool(left == right)),
            BinaryOp::Ne => Ok(Value::Bool(left != right)),
            BinaryOp::Add => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(_), _) | (_, Value::String(_)) => {
                    Ok(Value::String(format!("{left}{right}")))
                }
                _ => Err(type_error(op, &left, &right)),
            },
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                let (a, b) = numbers(op, &left, &right)?;
                match op {
                    BinaryOp::Sub => Ok(Value::Number(a - b)),
                    BinaryOp::Mul => Ok(Value::Number(a * b)),
                    _ if b == 0.0 => Err(VellumError::eval(format!(
                        "division by zero in {lhs} / {rhs}"
                    ))),
                    _ => Ok(Value::Number(a / b)),
                }
            }
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let (a, b) = numbers(op, &left, &right)?;
                let result = match op {
                    BinaryOp::Lt => a < b,
                    BinaryOp::Le => a <= b,
                    BinaryOp::Gt => a > b,
                    _ => a >= b,
                };
                Ok(Value::Bool(result))
            }
            BinaryOp::And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
            BinaryOp::Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
        }
    }
}

fn numbers(op: BinaryOp, left: &Value, right: &Value) -> Result<(f64, f64), VellumError> {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(type_error(op, left, right)),
    }
}

fn type_error(op: BinaryOp, left: &Value, right: &Value) -> VellumError {
    VellumError::eval(format!(
        "cannot apply '{}' to {} and {}",
        op.symbol(),
        left.type_name(),
        right.type_name()
    ))
}
