use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ast::{AstNode, Expr, Node};
use crate::errors::VellumError;

/// One declared macro parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Expr>,
}

impl Parameter {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn optional(name: impl Into<String>, default: Expr) -> Self {
        Self {
            name: name.into(),
            default: Some(default),
        }
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// The immutable description of a macro.
///
/// Slot 0 of the parameter list holds the macro's own name and is not counted
/// as an argument, so positional argument `i` (1-based) lives at
/// `parameters[i]`.
///
/// # Examples
///
/// ```rust
/// use vellum::ast::builder::{block, lit, var_ref};
/// use vellum::macros::{MacroDefinition, Parameter};
/// let greet = MacroDefinition::new(
///     "greet",
///     vec![Parameter::required("name"), Parameter::optional("greeting", lit("hi"))],
///     block(vec![var_ref("greeting")]),
/// )
/// .unwrap();
/// assert_eq!(greet.accepted_arg_count(), 2);
/// assert_eq!(greet.min_required(), 1);
/// assert_eq!(greet.parameter_at(1).unwrap().name, "name");
/// assert!(greet.parameter_at(0).is_none());
/// assert_eq!(greet.parameters()[0].name, "greet");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MacroSource", into = "MacroSource")]
pub struct MacroDefinition {
    parameters: Vec<Parameter>,
    body: AstNode,
}

impl MacroDefinition {
    /// Builds a definition from its argument parameters (without the name
    /// slot) and body. Rejects empty names and duplicate parameter names.
    pub fn new(
        name: impl Into<String>,
        arguments: Vec<Parameter>,
        body: AstNode,
    ) -> Result<Self, VellumError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(VellumError::InvalidDefinition {
                macro_name: name,
                reason: "macro name is empty".into(),
            });
        }
        let mut seen = HashSet::new();
        for param in &arguments {
            if param.name.trim().is_empty() {
                return Err(VellumError::InvalidDefinition {
                    macro_name: name,
                    reason: "parameter name is empty".into(),
                });
            }
            if !seen.insert(param.name.as_str()) {
                return Err(VellumError::InvalidDefinition {
                    macro_name: name.clone(),
                    reason: format!("duplicate parameter ${}", param.name),
                });
            }
        }

        let mut parameters = Vec::with_capacity(arguments.len() + 1);
        parameters.push(Parameter::required(name));
        parameters.extend(arguments);
        Ok(Self { parameters, body })
    }

    pub fn name(&self) -> &str {
        &self.parameters[0].name
    }

    /// Number of arguments the macro accepts, excluding the name slot.
    pub fn accepted_arg_count(&self) -> usize {
        self.parameters.len() - 1
    }

    /// Number of parameters without a default value.
    pub fn min_required(&self) -> usize {
        self.arguments().iter().filter(|p| !p.has_default()).count()
    }

    /// The parameter for 1-based argument position `i`.
    pub fn parameter_at(&self, i: usize) -> Option<&Parameter> {
        if i == 0 {
            return None;
        }
        self.parameters.get(i)
    }

    /// The full parameter list, name slot included.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// The argument parameters, name slot excluded.
    pub fn arguments(&self) -> &[Parameter] {
        &self.parameters[1..]
    }

    pub fn body(&self) -> &AstNode {
        &self.body
    }

    /// `#greet($name $greeting="hi")`
    pub fn signature(&self) -> String {
        let params = self
            .arguments()
            .iter()
            .map(|p| match &p.default {
                Some(default) => format!("${}={default}", p.name),
                None => format!("${}", p.name),
            })
            .collect::<Vec<_>>()
            .join(" ");
        format!("#{}({params})", self.name())
    }
}

/// Serialized form of a definition: the name is its own field and the body
/// is a list of nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MacroSource {
    name: String,
    #[serde(default)]
    params: Vec<Parameter>,
    #[serde(default)]
    body: Vec<AstNode>,
}

impl TryFrom<MacroSource> for MacroDefinition {
    type Error = VellumError;

    fn try_from(source: MacroSource) -> Result<Self, Self::Error> {
        let body = Node::Block {
            children: source.body,
        }
        .into_ast();
        MacroDefinition::new(source.name, source.params, body)
    }
}

impl From<MacroDefinition> for MacroSource {
    fn from(definition: MacroDefinition) -> Self {
        let body = match &*definition.body.value {
            Node::Block { children } => children.clone(),
            _ => vec![definition.body.clone()],
        };
        let mut parameters = definition.parameters;
        let name = parameters.remove(0).name;
        MacroSource {
            name,
            params: parameters,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::{block, lit, text};

    #[test]
    fn duplicate_parameters_are_rejected() {
        let err = MacroDefinition::new(
            "m",
            vec![Parameter::required("a"), Parameter::required("a")],
            block(vec![]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate parameter $a"));
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(MacroDefinition::new(" ", vec![], block(vec![])).is_err());
    }

    #[test]
    fn signature_lists_defaults() {
        let def = MacroDefinition::new(
            "greet",
            vec![Parameter::required("name"), Parameter::optional("greeting", lit("hi"))],
            block(vec![text("x")]),
        )
        .unwrap();
        assert_eq!(def.signature(), "#greet($name $greeting=\"hi\")");
    }

    #[test]
    fn deserializes_from_yaml() {
        let yaml = r#"
name: greet
params:
  - name: name
  - name: greeting
    default: { lit: hi }
body:
  - { node: text, text: "Hello " }
  - { node: reference, name: name }
"#;
        let def: MacroDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.name(), "greet");
        assert_eq!(def.accepted_arg_count(), 2);
        assert_eq!(def.min_required(), 1);
        match &*def.body().value {
            Node::Block { children } => assert_eq!(children.len(), 2),
            other => panic!("expected a block body, got {other:?}"),
        }
    }
}
