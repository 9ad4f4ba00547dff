//! Shared fixtures for the Vellum integration tests.
#![allow(dead_code)]

use std::cell::Cell;

use vellum::ast::builder::{binary, block, call, if_then, lit, text, var, var_ref};
use vellum::ast::value::Value;
use vellum::ast::{BinaryOp, Expr};
use vellum::config::MacroConfig;
use vellum::engine::Engine;
use vellum::macros::{MacroDefinition, Parameter};
use vellum::runtime::{Evaluator, ExprEvaluator, Scope};
use vellum::VellumError;

/// `#greet($name, $greeting="hi")` rendering `$greeting $name`.
pub fn greet() -> MacroDefinition {
    MacroDefinition::new(
        "greet",
        vec![
            Parameter::required("name"),
            Parameter::optional("greeting", lit("hi")),
        ],
        block(vec![var_ref("greeting"), text(" "), var_ref("name")]),
    )
    .unwrap()
}

/// `#countdown($n)` rendering `$n ` and recursing while `$n > 1`.
pub fn countdown() -> MacroDefinition {
    MacroDefinition::new(
        "countdown",
        vec![Parameter::required("n")],
        block(vec![
            var_ref("n"),
            text(" "),
            if_then(
                binary(BinaryOp::Gt, var("n"), lit(1)),
                vec![call(
                    "countdown",
                    vec![binary(BinaryOp::Sub, var("n"), lit(1))],
                )],
                vec![],
            ),
        ]),
    )
    .unwrap()
}

pub fn engine_with(config: MacroConfig, definitions: Vec<MacroDefinition>) -> Engine {
    let mut engine = Engine::new(config);
    for definition in definitions {
        engine.define(definition);
    }
    engine
}

pub fn strict() -> MacroConfig {
    MacroConfig {
        strict_arguments: true,
        ..MacroConfig::default()
    }
}

pub fn with_depth(max_call_depth: i32) -> MacroConfig {
    MacroConfig {
        max_call_depth,
        ..MacroConfig::default()
    }
}

pub fn no_globals() -> Vec<(String, Value)> {
    Vec::new()
}

/// Wraps [`ExprEvaluator`] and counts how many expressions it evaluated.
#[derive(Default)]
pub struct CountingEvaluator {
    pub calls: Cell<usize>,
}

impl Evaluator for CountingEvaluator {
    fn evaluate(&self, expr: &Expr, scope: &Scope<'_>) -> Result<Value, VellumError> {
        self.calls.set(self.calls.get() + 1);
        ExprEvaluator.evaluate(expr, scope)
    }
}

/// A sink that refuses every write.
pub struct FailingSink;

impl std::io::Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "sink closed",
        ))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
