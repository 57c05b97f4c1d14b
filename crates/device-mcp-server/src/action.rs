//! Planner action descriptors and their conversion to tool invocations
//!
//! An upstream planner describes device operations as [`ActionDescriptor`]
//! records. Each tool converts a descriptor into a concrete
//! [`ToolInvocation`] through its reverse mapping (see
//! [`crate::tools::DeviceTool::to_invocation`]). Parameters arrive in three
//! shapes, merged in increasing precedence:
//!
//! 1. a bare scalar, mapped to the tool's primary argument;
//! 2. a nested mapping whose recognized keys populate named arguments;
//! 3. a custom override mapping whose recognized keys win over both.
//!
//! The three sources may contribute disjoint fields to the same final
//! argument set. A descriptor is consumed once and discarded.

use rmcp::model::JsonObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single request to execute a named tool with concrete arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Name of the tool to invoke
    pub name: String,
    /// Flat argument mapping; names are case-sensitive
    pub arguments: JsonObject,
}

/// A higher-level action record produced by an upstream planner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Action name; usually the tool name it maps onto
    pub name: String,
    /// Action parameters: a bare scalar, a mapping, or null
    #[serde(default)]
    pub params: Value,
    /// Custom overrides; recognized keys take precedence over `params`
    #[serde(default)]
    pub custom: JsonObject,
}

impl ActionDescriptor {
    /// Creates a descriptor with a bare scalar parameter
    pub fn with_scalar(name: impl Into<String>, scalar: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            params: scalar.into(),
            custom: JsonObject::new(),
        }
    }

    /// Creates a descriptor with mapping parameters
    pub fn with_params(name: impl Into<String>, params: JsonObject) -> Self {
        Self {
            name: name.into(),
            params: Value::Object(params),
            custom: JsonObject::new(),
        }
    }

    /// Adds a custom override value
    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }
}

/// Copies recognized scalar fields from `source` into `arguments`
///
/// Only string, number, and boolean values are carried over; empty strings
/// count as unset and are skipped. Keys already present in `arguments` are
/// overwritten, which is what gives later sources their precedence.
pub fn overlay_recognized(arguments: &mut JsonObject, source: &JsonObject, recognized: &[&str]) {
    for key in recognized {
        let Some(value) = source.get(*key) else {
            continue;
        };
        match value {
            Value::String(s) if s.is_empty() => {}
            Value::String(_) | Value::Bool(_) | Value::Number(_) => {
                arguments.insert((*key).to_string(), value.clone());
            }
            _ => {}
        }
    }
}
