use std::collections::HashMap;

use crate::macros::proxy::MacroProxy;

/// Macro registry: name → proxy.
#[derive(Debug, Clone, Default)]
pub struct MacroRegistry {
    macros: HashMap<String, MacroProxy>,
}

impl MacroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `proxy` under its macro name.
    ///
    /// # Returns
    /// `Some(old_proxy)` if a macro with this name was already registered.
    pub fn register(&mut self, proxy: MacroProxy) -> Option<MacroProxy> {
        self.macros.insert(proxy.name().to_string(), proxy)
    }

    pub fn get(&self, name: &str) -> Option<&MacroProxy> {
        self.macros.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}
