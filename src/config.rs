//! Macro engine configuration.
//!
//! Configuration is read once when an [`Engine`](crate::engine::Engine) is set
//! up and copied into every [`MacroProxy`](crate::macros::MacroProxy); it is
//! never looked up again during rendering.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::VellumError;
use crate::runtime::context::Visibility;

/// Property key for [`MacroConfig::strict_arguments`].
pub const STRICT_ARGUMENTS: &str = "macro.arguments.strict";
/// Property key for [`MacroConfig::local_context_scope`].
pub const LOCAL_CONTEXT_SCOPE: &str = "macro.context.localscope";
/// Property key for [`MacroConfig::max_call_depth`].
pub const MAX_CALL_DEPTH: &str = "macro.max_depth";
/// Property key for [`MacroConfig::body_reference`].
pub const BODY_REFERENCE: &str = "macro.body_reference";

pub const DEFAULT_MAX_CALL_DEPTH: i32 = 20;
pub const DEFAULT_BODY_REFERENCE: &str = "bodyContent";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroConfig {
    /// Argument-count mismatches are errors instead of debug diagnostics.
    pub strict_arguments: bool,
    /// Macro bodies only see their own bindings, never the caller's.
    pub local_context_scope: bool,
    /// Maximum macro nesting depth; zero or negative means unlimited.
    pub max_call_depth: i32,
    /// Name a block-style call's body is bound under inside the macro.
    pub body_reference: String,
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self {
            strict_arguments: false,
            local_context_scope: false,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            body_reference: DEFAULT_BODY_REFERENCE.to_string(),
        }
    }
}

impl MacroConfig {
    pub fn visibility(&self) -> Visibility {
        if self.local_context_scope {
            Visibility::Local
        } else {
            Visibility::Inherited
        }
    }

    /// The effective nesting limit, `None` when unlimited.
    pub fn depth_limit(&self) -> Option<usize> {
        usize::try_from(self.max_call_depth).ok().filter(|d| *d > 0)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, VellumError> {
        serde_yaml::from_str(source).map_err(|e| VellumError::config(e.to_string()))
    }

    /// Loads a YAML or JSON config file, chosen by extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, VellumError> {
        load_by_extension(path.as_ref())
    }

    /// Builds a config from flat dotted properties such as
    /// `macro.arguments.strict = true`. Unrelated keys are ignored.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vellum::config::MacroConfig;
    /// let config = MacroConfig::from_properties([
    ///     ("macro.arguments.strict", "true"),
    ///     ("macro.max_depth", "5"),
    /// ])
    /// .unwrap();
    /// assert!(config.strict_arguments);
    /// assert_eq!(config.max_call_depth, 5);
    /// assert_eq!(config.body_reference, "bodyContent");
    /// ```
    pub fn from_properties<I, K, V>(properties: I) -> Result<Self, VellumError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in properties {
            let (key, value) = (key.as_ref(), value.as_ref().trim());
            match key {
                STRICT_ARGUMENTS => config.strict_arguments = parse_bool(key, value)?,
                LOCAL_CONTEXT_SCOPE => config.local_context_scope = parse_bool(key, value)?,
                MAX_CALL_DEPTH => {
                    config.max_call_depth = value.parse().map_err(|_| {
                        VellumError::config(format!("{key} must be an integer, got '{value}'"))
                    })?
                }
                BODY_REFERENCE => config.body_reference = value.to_string(),
                other => tracing::debug!(key = other, "ignoring unrelated property"),
            }
        }
        Ok(config)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, VellumError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => Err(VellumError::config(format!(
            "{key} must be a boolean, got '{value}'"
        ))),
    }
}

/// Reads `path` and deserializes it as JSON for `.json`, YAML otherwise.
pub(crate) fn load_by_extension<T: DeserializeOwned>(path: &Path) -> Result<T, VellumError> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        VellumError::config(format!("failed to read '{}': {e}", path.display()))
    })?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        serde_json::from_str(&source).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(&source).map_err(|e| e.to_string())
    };
    parsed.map_err(|e| VellumError::config(format!("failed to parse '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_lenient_inherited_and_limited() {
        let config = MacroConfig::default();
        assert!(!config.strict_arguments);
        assert_eq!(config.visibility(), Visibility::Inherited);
        assert_eq!(config.depth_limit(), Some(20));
        assert_eq!(config.body_reference, "bodyContent");
    }

    #[test]
    fn non_positive_depth_means_unlimited() {
        let zero = MacroConfig {
            max_call_depth: 0,
            ..MacroConfig::default()
        };
        let negative = MacroConfig {
            max_call_depth: -3,
            ..MacroConfig::default()
        };
        assert_eq!(zero.depth_limit(), None);
        assert_eq!(negative.depth_limit(), None);
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let config = MacroConfig::from_yaml_str("local_context_scope: true\nmax_call_depth: 3\n")
            .unwrap();
        assert_eq!(config.visibility(), Visibility::Local);
        assert_eq!(config.max_call_depth, 3);
        assert!(!config.strict_arguments);
    }

    #[test]
    fn bad_property_values_are_config_errors() {
        let err = MacroConfig::from_properties([(STRICT_ARGUMENTS, "maybe")]).unwrap_err();
        assert!(matches!(err, VellumError::Config { .. }));
        let err = MacroConfig::from_properties([(MAX_CALL_DEPTH, "deep")]).unwrap_err();
        assert!(err.to_string().contains("macro.max_depth"));
    }

    #[test]
    fn json_file_is_loaded_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vellum.json");
        std::fs::write(&path, r#"{"strict_arguments": true, "body_reference": "content"}"#)
            .unwrap();
        let config = MacroConfig::load(&path).unwrap();
        assert!(config.strict_arguments);
        assert_eq!(config.body_reference, "content");
    }
}
