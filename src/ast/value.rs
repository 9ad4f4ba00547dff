use im::HashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ast::AstNode;

/// Represents a value bound in a template scope.
///
/// # Examples
///
/// ```rust
/// use vellum::ast::value::Value;
/// let n = Value::Number(3.5);
/// assert_eq!(n.type_name(), "Number");
/// let s = Value::from("hello");
/// assert_eq!(s.type_name(), "String");
/// let nil = Value::default();
/// assert!(nil.is_nil());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
    /// A body block captured from a block-style macro call. Rendering a
    /// reference to it renders the block in the referencing scope.
    #[serde(skip)]
    Body(AstNode),
}

impl Value {
    /// Returns the type name of the value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Body(_) => "Body",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// `nil`, `false`, `0`, empty strings and empty collections are falsy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vellum::ast::value::Value;
    /// assert!(!Value::Nil.is_truthy());
    /// assert!(!Value::from("").is_truthy());
    /// assert!(Value::Number(2.0).is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(m) => !m.is_empty(),
            Value::Body(_) => true,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => {
                // whole numbers print without a fraction while i64 holds them
                if n.fract() == 0.0 && n.abs() < 2f64.powi(63) {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::String(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                write!(f, "{{")?;
                for (i, (k, v)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}={v}")?;
                }
                write!(f, "}}")
            }
            Value::Body(_) => write!(f, "<body>"),
        }
    }
}
