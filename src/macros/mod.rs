//! # Vellum Macro Invocation
//!
//! A macro is a named, parameterized body of template content. Invoking one
//! takes four steps, each in its own module:
//!
//! - [`definition`]: the immutable macro description. Parameter slot 0 is the
//!   macro's own name; the remaining slots are its arguments, each with an
//!   optional default expression.
//! - [`binder`]: matches a call site's arguments to those parameters, under
//!   strict or lenient counting.
//! - [`guard`]: the render-wide call stack and the maximum-depth check.
//! - [`proxy`]: ties the steps together and hands the body to the renderer.
//!
//! ## Lenient binding stops at the first gap
//!
//! With strict argument checking off, a parameter that gets neither an
//! argument nor a default ends binding for that call: it and every parameter
//! after it stay unbound, defaults included. This is long-standing observable
//! behavior and is kept as is, although it may have started out as an
//! accident of the binding loop.

pub mod binder;
pub mod definition;
pub mod guard;
pub mod proxy;
pub mod registry;

pub use binder::{bind_arguments, ArgumentWarning};
pub use definition::{MacroDefinition, Parameter};
pub use guard::{CallDepthGuard, CallStack};
pub use proxy::{Invocation, MacroProxy};
pub use registry::MacroRegistry;
