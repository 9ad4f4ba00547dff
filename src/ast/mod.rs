//! AST module for Vellum templates
//!
//! This module provides the node and expression types a template body is made
//! of, with source location tracking. Templates are never parsed from text
//! here; they are assembled with the helpers in [`builder`] or deserialized
//! from YAML/JSON documents.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::value::Value;

pub mod builder;
pub mod value;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Represents a position in a template.
///
/// # Examples
///
/// ```rust
/// use vellum::ast::Span;
/// let span = Span { line: 3, column: 7 };
/// assert_eq!(span.to_string(), "line 3, column 7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

/// Wrapper for carrying source span information with any value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithSpan<T> {
    #[serde(flatten)]
    pub value: T,
    #[serde(default, skip_serializing_if = "Span::is_unknown")]
    pub span: Span,
}

/// Canonical AST node type with shared ownership, so macro bodies and captured
/// body blocks can be handed around without deep copies.
pub type AstNode = WithSpan<Arc<Node>>;

/// One node of a template body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    /// Literal output text.
    Text { text: String },
    /// `$name` (or `$!name` when `silent`). Unresolved references render
    /// literally unless silent.
    Reference {
        name: String,
        #[serde(default)]
        silent: bool,
    },
    /// A macro invocation.
    Call(CallSite),
    If {
        condition: Expr,
        #[serde(default)]
        then: Vec<AstNode>,
        #[serde(default)]
        otherwise: Vec<AstNode>,
    },
    /// Assigns into the current scope.
    Set { name: String, value: Expr },
    Block { children: Vec<AstNode> },
}

/// One textual invocation of a macro.
///
/// `args` never includes the body block: a block-style call carries its body
/// separately and it is bound under the configured body reference name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSite {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Expr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<AstNode>,
}

/// Argument and default-value expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    #[serde(rename = "lit")]
    Literal(Value),
    #[serde(rename = "ref")]
    Reference(String),
    List(Vec<Expr>),
    Not(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl Span {
    /// True for the default span, used when a node was built without a position.
    pub fn is_unknown(&self) -> bool {
        self.line == 0 && self.column == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

impl<T> WithSpan<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }
}

impl Node {
    /// Wraps this node into an [`AstNode`] without a source position.
    pub fn into_ast(self) -> AstNode {
        WithSpan::new(Arc::new(self), Span::default())
    }

    /// Wraps this node into an [`AstNode`] at the given position.
    pub fn at(self, span: Span) -> AstNode {
        WithSpan::new(Arc::new(self), span)
    }
}

impl CallSite {
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            name: name.into(),
            args,
            body: None,
        }
    }

    /// Turns this into a block-style call carrying `body`.
    pub fn with_body(mut self, body: AstNode) -> Self {
        self.body = Some(body);
        self
    }
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// Pretty-prints an expression in template notation.
///
/// # Examples
///
/// ```rust
/// use vellum::ast::builder::{lit, var};
/// assert_eq!(var("name").to_string(), "$name");
/// assert_eq!(lit("hi").to_string(), "\"hi\"");
/// ```
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(Value::String(s)) => write!(f, "\"{s}\""),
            Expr::Literal(v) => write!(f, "{v}"),
            Expr::Reference(name) => write!(f, "${name}"),
            Expr::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Expr::Not(inner) => write!(f, "!{inner}"),
            Expr::Binary { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
        }
    }
}
