//! Constructors for assembling template ASTs in code.
//!
//! ```rust
//! use vellum::ast::builder::{block, call, lit, text, var_ref};
//! let template = block(vec![text("Hello, "), call("greet", vec![lit("Ann")]), var_ref("rest")]);
//! assert!(matches!(&*template.value, vellum::ast::Node::Block { children } if children.len() == 3));
//! ```

use crate::ast::value::Value;
use crate::ast::{AstNode, BinaryOp, CallSite, Expr, Node};

pub fn text(text: impl Into<String>) -> AstNode {
    Node::Text { text: text.into() }.into_ast()
}

/// `$name`
pub fn var_ref(name: impl Into<String>) -> AstNode {
    Node::Reference {
        name: name.into(),
        silent: false,
    }
    .into_ast()
}

/// `$!name`
pub fn quiet_ref(name: impl Into<String>) -> AstNode {
    Node::Reference {
        name: name.into(),
        silent: true,
    }
    .into_ast()
}

pub fn call(name: impl Into<String>, args: Vec<Expr>) -> AstNode {
    Node::Call(CallSite::new(name, args)).into_ast()
}

/// A block-style call whose body is bound under the body reference name.
pub fn call_with_body(name: impl Into<String>, args: Vec<Expr>, body: Vec<AstNode>) -> AstNode {
    Node::Call(CallSite::new(name, args).with_body(block(body))).into_ast()
}

pub fn if_then(condition: Expr, then: Vec<AstNode>, otherwise: Vec<AstNode>) -> AstNode {
    Node::If {
        condition,
        then,
        otherwise,
    }
    .into_ast()
}

pub fn set(name: impl Into<String>, value: Expr) -> AstNode {
    Node::Set {
        name: name.into(),
        value,
    }
    .into_ast()
}

pub fn block(children: Vec<AstNode>) -> AstNode {
    Node::Block { children }.into_ast()
}

pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}

pub fn var(name: impl Into<String>) -> Expr {
    Expr::Reference(name.into())
}

pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
