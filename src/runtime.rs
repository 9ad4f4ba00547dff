//! Runtime module for Vellum
//!
//! Scopes, the collaborator traits the macro engine renders through, and the
//! reference implementations of those traits.

pub mod context;
pub mod eval;
pub mod render;

pub use context::{Scope, Visibility};
pub use eval::{Evaluator, ExprEvaluator, Renderer, Runtime};
pub use render::TemplateRenderer;
