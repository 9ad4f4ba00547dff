//! Chained evaluation scopes.
//!
//! Every macro invocation gets a fresh [`Scope`] whose parent is the caller's
//! scope, borrowed for the duration of the call. All scopes of one render
//! share a single [`CallStack`] through an `Rc`, which keeps the stack
//! confined to the thread (and the render) that created it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use crate::ast::value::Value;
use crate::macros::guard::CallStack;

/// How a scope resolves names it has no binding for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Misses stay misses: the macro body sees only its own bindings.
    Local,
    /// Misses fall through to the parent scope.
    Inherited,
}

pub struct Scope<'p> {
    parent: Option<&'p Scope<'p>>,
    bindings: HashMap<String, Value>,
    visibility: Visibility,
    call_stack: Rc<RefCell<CallStack>>,
    template: Option<Arc<str>>,
}

impl Scope<'static> {
    /// A top-level scope with its own, empty call stack.
    pub fn root() -> Self {
        Scope {
            parent: None,
            bindings: HashMap::new(),
            visibility: Visibility::Inherited,
            call_stack: Rc::new(RefCell::new(CallStack::new())),
            template: None,
        }
    }

    /// A top-level scope for rendering the named template.
    pub fn named_root(template: impl Into<Arc<str>>) -> Self {
        Scope {
            template: Some(template.into()),
            ..Scope::root()
        }
    }
}

impl<'p> Scope<'p> {
    /// A nested scope sharing the parent's call stack and template name.
    ///
    /// Nothing is allocated for bindings until the first `put`.
    pub fn child(parent: &'p Scope<'p>, visibility: Visibility) -> Self {
        Scope {
            parent: Some(parent),
            bindings: HashMap::new(),
            visibility,
            call_stack: Rc::clone(&parent.call_stack),
            template: parent.template.clone(),
        }
    }

    /// Resolves `name`, falling through to the parent only for
    /// [`Visibility::Inherited`] scopes.
    pub fn get(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.bindings.get(name) {
            return Some(value);
        }
        match (self.visibility, self.parent) {
            (Visibility::Inherited, Some(parent)) => parent.get(name),
            _ => None,
        }
    }

    /// Binds `name` in this scope. Last write wins.
    pub fn put(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.bindings.insert(name.into(), value)
    }

    pub fn local_bindings(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn template_name(&self) -> Option<&Arc<str>> {
        self.template.as_ref()
    }

    /// The render-wide call stack shared by this scope chain.
    pub fn call_stack(&self) -> &Rc<RefCell<CallStack>> {
        &self.call_stack
    }

    /// Current macro nesting depth of the render this scope belongs to.
    pub fn depth(&self) -> usize {
        self.call_stack.borrow().depth()
    }

    /// Names of the macros currently executing, outermost first.
    pub fn macro_name_stack(&self) -> Vec<String> {
        self.call_stack.borrow().names().to_vec()
    }
}

impl std::fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("bindings", &self.bindings)
            .field("visibility", &self.visibility)
            .field("has_parent", &self.parent.is_some())
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inherited_scope_falls_through_to_parent() {
        let mut root = Scope::root();
        root.put("user", Value::from("ann"));
        let child = Scope::child(&root, Visibility::Inherited);
        assert_eq!(child.get("user"), Some(&Value::from("ann")));
    }

    #[test]
    fn local_scope_hides_parent_bindings() {
        let mut root = Scope::root();
        root.put("user", Value::from("ann"));
        let mut child = Scope::child(&root, Visibility::Local);
        assert_eq!(child.get("user"), None);
        child.put("user", Value::from("bob"));
        assert_eq!(child.get("user"), Some(&Value::from("bob")));
        assert_eq!(root.get("user"), Some(&Value::from("ann")));
    }

    #[test]
    fn children_share_the_call_stack() {
        let root = Scope::named_root("page.vm");
        let child = Scope::child(&root, Visibility::Local);
        child.call_stack().borrow_mut().push("m");
        assert_eq!(root.depth(), 1);
        assert_eq!(child.template_name().map(|t| &**t), Some("page.vm"));
    }

    #[test]
    fn last_write_wins() {
        let mut scope = Scope::root();
        scope.put("x", Value::from(1));
        let previous = scope.put("x", Value::from(2));
        assert_eq!(previous, Some(Value::from(1)));
        assert_eq!(scope.get("x"), Some(&Value::from(2)));
    }
}
