//! Optional helpers an engine can be created with.

use std::sync::Arc;

use async_trait::async_trait;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use super::helper::{Helper, HelperError, HelperRegistry, HelperResult};
use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Builtin {
    Upper,
    Lower,
    Trim,
    Capitalize,
    Length,
    Eq,
    Not,
    Default,
    Join,
}

/// Registers every built-in helper, replacing helpers of the same name.
pub fn register_builtin_helpers(registry: &HelperRegistry) {
    for builtin in Builtin::iter() {
        registry.register(builtin.to_string(), Arc::new(builtin));
    }
}

#[async_trait]
impl Helper for Builtin {
    async fn call(&self, arguments: Vec<Value>) -> HelperResult {
        self.apply(arguments)
    }
}

impl Builtin {
    pub fn apply(&self, arguments: Vec<Value>) -> HelperResult {
        match self {
            Builtin::Upper => self.map_text(arguments, |s| s.to_uppercase()),
            Builtin::Lower => self.map_text(arguments, |s| s.to_lowercase()),
            Builtin::Trim => self.map_text(arguments, |s| s.trim().to_string()),
            Builtin::Capitalize => self.map_text(arguments, |s| {
                let mut chars = s.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }),
            Builtin::Length => {
                let [value] = self.arguments::<1>(arguments)?;
                match value {
                    Value::String(s) => Ok(Value::from(s.chars().count())),
                    Value::Array(items) => Ok(Value::from(items.len())),
                    Value::Object(map) => Ok(Value::from(map.len())),
                    other => Err(self.invalid(format!("cannot take the length of {:?}", other))),
                }
            }
            Builtin::Eq => {
                let [left, right] = self.arguments::<2>(arguments)?;
                Ok(Value::from(left == right))
            }
            Builtin::Not => {
                let [value] = self.arguments::<1>(arguments)?;
                Ok(Value::from(!value.is_truthy()))
            }
            Builtin::Default => {
                let [value, fallback] = self.arguments::<2>(arguments)?;
                Ok(if value.is_truthy() { value } else { fallback })
            }
            Builtin::Join => {
                if arguments.is_empty() || arguments.len() > 2 {
                    return Err(self.invalid(format!(
                        "expected 1 or 2 arguments, got {}",
                        arguments.len()
                    )));
                }
                let mut arguments = arguments.into_iter();
                let items = match arguments.next() {
                    Some(Value::Array(items)) => items,
                    other => return Err(self.invalid(format!("expected an array, got {:?}", other))),
                };
                let separator = match arguments.next() {
                    None => ",".to_string(),
                    Some(Value::String(s)) => s,
                    Some(other) => {
                        return Err(self.invalid(format!("separator must be a string, got {:?}", other)))
                    }
                };
                Ok(Value::String(
                    items
                        .iter()
                        .map(Value::to_output_string)
                        .collect::<Vec<_>>()
                        .join(&separator),
                ))
            }
        }
    }

    fn invalid(&self, message: String) -> HelperError {
        HelperError::invalid_argument(self.as_ref(), message)
    }

    fn arguments<const N: usize>(&self, arguments: Vec<Value>) -> Result<[Value; N], HelperError> {
        let count = arguments.len();
        arguments
            .try_into()
            .map_err(|_| self.invalid(format!("expected {} argument(s), got {}", N, count)))
    }

    // Scalars are converted to text first; absent values read as "".
    fn map_text(&self, arguments: Vec<Value>, f: impl Fn(&str) -> String) -> HelperResult {
        let [value] = self.arguments::<1>(arguments)?;
        match value {
            Value::Array(_) | Value::Object(_) => {
                Err(self.invalid(format!("expected text, got {:?}", value)))
            }
            scalar => Ok(Value::String(f(&scalar.to_output_string()))),
        }
    }
}
