//! Top-level rendering.
//!
//! An [`Engine`] owns the macro registry and the configuration every macro
//! proxy is built with. It is `Send + Sync` and can be shared between
//! threads; each render builds its own root [`Scope`], so each render has
//! its own call stack.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ast::value::Value;
use crate::ast::{AstNode, Node};
use crate::config::{load_by_extension, MacroConfig};
use crate::errors::VellumError;
use crate::macros::{ArgumentWarning, MacroDefinition, MacroProxy, MacroRegistry};
use crate::runtime::context::Scope;
use crate::runtime::eval::Renderer;
use crate::runtime::render::TemplateRenderer;

#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: MacroConfig,
    macros: MacroRegistry,
}

impl Engine {
    pub fn new(config: MacroConfig) -> Self {
        Self {
            config,
            macros: MacroRegistry::new(),
        }
    }

    pub fn config(&self) -> &MacroConfig {
        &self.config
    }

    pub fn macros(&self) -> &MacroRegistry {
        &self.macros
    }

    /// Defines (or redefines) a macro.
    ///
    /// # Returns
    /// The proxy previously registered under the same name, if any.
    pub fn define(&mut self, definition: MacroDefinition) -> Option<MacroProxy> {
        let proxy = MacroProxy::new(definition, &self.config);
        let replaced = self.macros.register(proxy);
        if let Some(old) = &replaced {
            tracing::debug!(macro_name = old.name(), "macro redefined");
        }
        replaced
    }

    /// A renderer dispatching macro calls through this engine's registry.
    pub fn renderer(&self) -> TemplateRenderer<'_> {
        TemplateRenderer::new(&self.macros).with_depth_limit(self.config.depth_limit())
    }

    /// Renders `template` with `globals` in a fresh root scope.
    ///
    /// # Returns
    /// The lenient-mode argument warnings raised along the way.
    pub fn render<I, K>(
        &self,
        template: &AstNode,
        globals: I,
        sink: &mut dyn Write,
    ) -> Result<Vec<ArgumentWarning>, VellumError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut scope = Scope::root();
        for (name, value) in globals {
            scope.put(name, value);
        }
        self.render_in(template, &mut scope, sink)
    }

    /// Renders `template` into a caller-provided scope, which stays
    /// inspectable afterwards.
    pub fn render_in(
        &self,
        template: &AstNode,
        scope: &mut Scope<'_>,
        sink: &mut dyn Write,
    ) -> Result<Vec<ArgumentWarning>, VellumError> {
        let renderer = self.renderer();
        renderer.render(template, scope, sink)?;
        Ok(renderer.take_warnings())
    }

    pub fn render_to_string<I, K>(&self, template: &AstNode, globals: I) -> Result<String, VellumError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut out = Vec::new();
        self.render(template, globals, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Defines the document's macros and renders its template.
    pub fn render_document(
        &mut self,
        document: &Document,
        sink: &mut dyn Write,
    ) -> Result<Vec<ArgumentWarning>, VellumError> {
        for definition in &document.macros {
            self.define(definition.clone());
        }
        let mut scope = match &document.name {
            Some(name) => Scope::named_root(name.as_str()),
            None => Scope::root(),
        };
        for (name, value) in &document.globals {
            scope.put(name.as_str(), value.clone());
        }
        self.render_in(&document.template_node(), &mut scope, sink)
    }
}

/// A self-contained render job: macros, global references and a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub macros: Vec<MacroDefinition>,
    #[serde(default)]
    pub globals: BTreeMap<String, Value>,
    #[serde(default)]
    pub template: Vec<AstNode>,
}

impl Document {
    pub fn from_yaml_str(source: &str) -> Result<Self, VellumError> {
        serde_yaml::from_str(source).map_err(|e| VellumError::config(e.to_string()))
    }

    /// Loads a YAML or JSON document, chosen by extension. Documents without
    /// a name take the file name.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, VellumError> {
        let path = path.as_ref();
        let mut document: Document = load_by_extension(path)?;
        if document.name.is_none() {
            document.name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
        }
        Ok(document)
    }

    pub fn template_node(&self) -> AstNode {
        Node::Block {
            children: self.template.clone(),
        }
        .into_ast()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn engine_can_be_shared_across_threads() {
        assert_send_sync::<Engine>();
    }

    #[test]
    fn redefinition_returns_previous_proxy() {
        let mut engine = Engine::default();
        let def = MacroDefinition::new("m", vec![], crate::ast::builder::block(vec![])).unwrap();
        assert!(engine.define(def.clone()).is_none());
        assert_eq!(engine.define(def).map(|p| p.name().to_string()), Some("m".into()));
        assert_eq!(engine.macros().len(), 1);
    }
}
