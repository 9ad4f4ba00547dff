//! Binding a call site's arguments to a macro's parameters.

use std::fmt;

use crate::ast::CallSite;
use crate::errors::{ArgumentCountKind, Location, VellumError};
use crate::macros::definition::MacroDefinition;
use crate::runtime::context::Scope;
use crate::runtime::eval::Evaluator;

/// A lenient-mode argument mismatch that was logged instead of raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentWarning {
    /// Extra arguments were ignored.
    TooMany {
        macro_name: String,
        accepted: usize,
        got: usize,
    },
    /// Binding stopped at the first parameter with neither an argument nor a
    /// default; `unbound` lists it and every parameter after it.
    TooFew {
        macro_name: String,
        accepted: usize,
        got: usize,
        unbound: Vec<String>,
    },
}

impl fmt::Display for ArgumentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (which, macro_name, accepted, got) = match self {
            ArgumentWarning::TooMany {
                macro_name,
                accepted,
                got,
            } => ("many", macro_name, accepted, got),
            ArgumentWarning::TooFew {
                macro_name,
                accepted,
                got,
                ..
            } => ("few", macro_name, accepted, got),
        };
        write!(
            f,
            "VM #{macro_name}: too {which} arguments to macro. Wanted {accepted} got {got}"
        )
    }
}

/// Binds `call`'s arguments into `scope` following `definition`'s parameter
/// list.
///
/// Supplied arguments and defaults are evaluated once each, against `caller`
/// and never against `scope`. In strict mode a count mismatch fails with
/// [`VellumError::ArgumentCount`]; otherwise it is logged at debug level and
/// returned as a warning. A lenient too-few mismatch stops binding at the
/// first parameter that has neither an argument nor a default, even if later
/// parameters declare defaults.
pub fn bind_arguments<E>(
    definition: &MacroDefinition,
    call: &CallSite,
    caller: &Scope<'_>,
    scope: &mut Scope<'_>,
    strict: bool,
    evaluator: &E,
    location: &Location,
) -> Result<Vec<ArgumentWarning>, VellumError>
where
    E: Evaluator + ?Sized,
{
    let macro_name = definition.name();
    let accepted = definition.accepted_arg_count();
    let call_arg_num = call.args.len();
    let mut warnings = Vec::new();

    if call_arg_num > accepted {
        if strict {
            return Err(VellumError::ArgumentCount {
                kind: ArgumentCountKind::TooMany,
                macro_name: macro_name.to_string(),
                expected: accepted,
                got: call_arg_num,
                location: location.clone(),
            });
        }
        let warning = ArgumentWarning::TooMany {
            macro_name: macro_name.to_string(),
            accepted,
            got: call_arg_num,
        };
        tracing::debug!(%location, "{warning}");
        warnings.push(warning);
    }

    for (i, param) in definition.arguments().iter().enumerate() {
        let value = if let Some(arg) = call.args.get(i) {
            evaluator.evaluate(arg, caller)?
        } else if let Some(default) = &param.default {
            evaluator.evaluate(default, caller)?
        } else if strict {
            return Err(VellumError::ArgumentCount {
                kind: ArgumentCountKind::TooFew,
                macro_name: macro_name.to_string(),
                expected: definition.min_required(),
                got: call_arg_num,
                location: location.clone(),
            });
        } else {
            let warning = ArgumentWarning::TooFew {
                macro_name: macro_name.to_string(),
                accepted,
                got: call_arg_num,
                unbound: definition.arguments()[i..]
                    .iter()
                    .map(|p| p.name.clone())
                    .collect(),
            };
            tracing::debug!(%location, "{warning}");
            warnings.push(warning);
            break;
        };
        scope.put(param.name.clone(), value);
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::{block, lit};
    use crate::ast::value::Value;
    use crate::macros::definition::Parameter;
    use crate::runtime::context::Visibility;
    use crate::runtime::eval::ExprEvaluator;

    fn greet() -> MacroDefinition {
        MacroDefinition::new(
            "greet",
            vec![Parameter::required("name"), Parameter::optional("greeting", lit("hi"))],
            block(vec![]),
        )
        .unwrap()
    }

    #[test]
    fn default_fills_missing_optional_argument() {
        let caller = Scope::root();
        let mut scope = Scope::child(&caller, Visibility::Local);
        let call = CallSite::new("greet", vec![lit("Ann")]);
        let warnings = bind_arguments(
            &greet(),
            &call,
            &caller,
            &mut scope,
            true,
            &ExprEvaluator,
            &Location::unknown(),
        )
        .unwrap();
        assert!(warnings.is_empty());
        assert_eq!(scope.get("name"), Some(&Value::from("Ann")));
        assert_eq!(scope.get("greeting"), Some(&Value::from("hi")));
    }

    #[test]
    fn strict_zero_arguments_is_too_few() {
        let caller = Scope::root();
        let mut scope = Scope::child(&caller, Visibility::Local);
        let call = CallSite::new("greet", vec![]);
        let err = bind_arguments(
            &greet(),
            &call,
            &caller,
            &mut scope,
            true,
            &ExprEvaluator,
            &Location::unknown(),
        )
        .unwrap_err();
        match err {
            VellumError::ArgumentCount {
                kind,
                expected,
                got,
                ..
            } => {
                assert_eq!(kind, ArgumentCountKind::TooFew);
                assert_eq!(expected, 1);
                assert_eq!(got, 0);
            }
            other => panic!("expected ArgumentCount, got {other:?}"),
        }
    }

    #[test]
    fn warning_text_matches_log_format() {
        let warning = ArgumentWarning::TooMany {
            macro_name: "greet".into(),
            accepted: 2,
            got: 3,
        };
        assert_eq!(
            warning.to_string(),
            "VM #greet: too many arguments to macro. Wanted 2 got 3"
        );
    }
}
