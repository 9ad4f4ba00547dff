//! Vellum error handling
//!
//! One error type, [`VellumError`], covers every failure of a macro
//! invocation. Variants split into two families:
//!
//! - **runtime-level** errors ([`VellumError::is_runtime`]) are raised by the
//!   engine itself and pass through enclosing macro invocations unchanged;
//! - everything else (sink I/O, external collaborators, configuration) gets
//!   wrapped into [`VellumError::MacroRender`] by the innermost macro whose
//!   body was rendering when it happened.

use std::fmt;
use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;

use crate::ast::Span;

/// Which side of the parameter list a strict-mode argument mismatch fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentCountKind {
    TooMany,
    TooFew,
}

/// Where something happened: template name plus position, when known.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub template: Option<Arc<str>>,
    pub span: Span,
}

impl Location {
    pub fn new(template: Option<Arc<str>>, span: Span) -> Self {
        Self { template, span }
    }

    /// Location for calls that were not made from a template position.
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Formats as `template[line L, column C]`, or just `template` when the
/// position is unknown.
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let template = self.template.as_deref().unwrap_or("<unknown template>");
        if self.span.is_unknown() {
            write!(f, "{template}")
        } else {
            write!(f, "{template}[{}]", self.span)
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum VellumError {
    /// Strict-mode arity failure. `expected` is the accepted count for
    /// `TooMany` and the minimum required count for `TooFew`.
    #[error("{}", arity_message(.kind, .macro_name, .expected, .got, .location))]
    #[diagnostic(
        code(vellum::macros::argument_count),
        help("match the macro's parameter list, or disable strict argument checking")
    )]
    ArgumentCount {
        kind: ArgumentCountKind,
        macro_name: String,
        expected: usize,
        got: usize,
        location: Location,
    },

    #[error("{message}")]
    #[diagnostic(
        code(vellum::macros::recursion_limit),
        help("raise max_call_depth or make the recursion terminate")
    )]
    RecursionLimit { message: String },

    #[error("exception while rendering macro #{macro_name}() at {location}")]
    #[diagnostic(code(vellum::macros::render))]
    MacroRender {
        macro_name: String,
        location: Location,
        #[source]
        source: Box<VellumError>,
    },

    #[error("undefined macro #{name}() at {location}")]
    #[diagnostic(code(vellum::macros::undefined))]
    UndefinedMacro { name: String, location: Location },

    #[error("invalid definition of macro #{macro_name}(): {reason}")]
    #[diagnostic(code(vellum::macros::invalid_definition))]
    InvalidDefinition { macro_name: String, reason: String },

    #[error("evaluation error: {message}")]
    #[diagnostic(code(vellum::eval))]
    Eval { message: String },

    #[error("configuration error: {message}")]
    #[diagnostic(code(vellum::config))]
    Config { message: String },

    #[error("output error: {0}")]
    #[diagnostic(code(vellum::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(vellum::external))]
    External(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl VellumError {
    /// Runtime-level errors propagate through macro invocations untouched;
    /// the rest are wrapped with the name of the macro being rendered.
    pub fn is_runtime(&self) -> bool {
        match self {
            VellumError::ArgumentCount { .. }
            | VellumError::RecursionLimit { .. }
            | VellumError::MacroRender { .. }
            | VellumError::UndefinedMacro { .. }
            | VellumError::InvalidDefinition { .. }
            | VellumError::Eval { .. } => true,
            VellumError::Config { .. } | VellumError::Io(_) | VellumError::External(_) => false,
        }
    }

    pub fn eval(message: impl Into<String>) -> Self {
        VellumError::Eval {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        VellumError::Config {
            message: message.into(),
        }
    }
}

fn arity_message(
    kind: &ArgumentCountKind,
    macro_name: &str,
    expected: &usize,
    got: &usize,
    location: &Location,
) -> String {
    match kind {
        ArgumentCountKind::TooMany => format!(
            "Provided {got} arguments but macro #{macro_name} accepts at most {expected} at {location}"
        ),
        ArgumentCountKind::TooFew => format!(
            "Need at least {expected} arguments for macro #{macro_name} but only {got} were provided at {location}"
        ),
    }
}

/// Prints a VellumError with full miette diagnostics
pub fn print_error(error: VellumError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Report;

    #[test]
    fn too_few_message_names_minimum_and_location() {
        let err = VellumError::ArgumentCount {
            kind: ArgumentCountKind::TooFew,
            macro_name: "greet".into(),
            expected: 1,
            got: 0,
            location: Location::new(Some("page.vm".into()), Span { line: 2, column: 5 }),
        };
        assert_eq!(
            err.to_string(),
            "Need at least 1 arguments for macro #greet but only 0 were provided at page.vm[line 2, column 5]"
        );
    }

    #[test]
    fn unknown_position_prints_template_only() {
        assert_eq!(Location::new(Some("page.vm".into()), Span::default()).to_string(), "page.vm");
        assert_eq!(Location::unknown().to_string(), "<unknown template>");
    }

    #[test]
    fn io_errors_are_not_runtime_level() {
        let io = VellumError::from(std::io::Error::new(std::io::ErrorKind::Other, "closed"));
        assert!(!io.is_runtime());
        assert!(VellumError::eval("boom").is_runtime());
    }

    #[test]
    fn wrapped_render_error_keeps_cause_in_report() {
        let err = VellumError::MacroRender {
            macro_name: "outer".into(),
            location: Location::unknown(),
            source: Box::new(VellumError::from(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "pipe closed",
            ))),
        };
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("#outer()"));
        assert!(output.contains("pipe closed"));
        assert!(output.contains("vellum::macros::render"));
    }
}
