//! Structured call records for machine clients.
//!
//! Browser clients send `{"Name": "add", "Params": [2, 3]}` instead of
//! `add(2,3)`. The record is flattened into the same `(name, args)` pair the
//! parser produces, so both forms share one dispatch path.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::parser::SyntaxError;

/// A `{Name, Params}` call object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MachineCall {
    /// Operation name.
    #[serde(rename = "Name", alias = "name")]
    pub name: String,

    /// Arguments; scalars of any JSON type.
    #[serde(rename = "Params", alias = "params", default)]
    pub params: Vec<JsonValue>,
}

impl MachineCall {
    /// Decodes a call object from JSON text.
    pub fn from_json(input: &str) -> Result<Self, SyntaxError> {
        serde_json::from_str(input).map_err(|e| SyntaxError::InvalidCall(e.to_string()))
    }

    /// Returns true if the payload looks like a call object rather than
    /// parenthesis syntax.
    pub fn looks_like_json(input: &str) -> bool {
        input.trim_start().starts_with('{')
    }

    /// Returns the arguments in the textual form the dispatcher converts from.
    ///
    /// Strings are taken verbatim, numbers and booleans use their JSON
    /// spelling, and `null` becomes an empty argument.
    pub fn args(&self) -> Vec<String> {
        self.params
            .iter()
            .map(|param| match param {
                JsonValue::String(s) => s.clone(),
                JsonValue::Null => String::new(),
                other => other.to_string(),
            })
            .collect()
    }
}
