// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use graphwire_common::{OperationType, OperationsPayload};

use crate::error::ClientError;

const INDENT_UNIT: usize = 2;

/// A declared variable: the GraphQL type signature text (`"String!"`,
/// `"[ID]"`) and the eagerly encoded value.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableEntry {
    pub gql_type: String,
    pub value: Value,
}

/// A fully rendered query document, ready to hand to a transport.
#[derive(Debug, Clone)]
pub struct QueryDocument {
    pub operation_type: OperationType,
    pub operation_name: Option<String>,
    pub variables: IndexMap<String, VariableEntry>,
    pub text: String,
}

impl QueryDocument {
    /// Variable values collected into a JSON object, `None` when no
    /// variables were declared.
    pub fn variables_json(&self) -> Option<Map<String, Value>> {
        if self.variables.is_empty() {
            return None;
        }
        Some(
            self.variables
                .iter()
                .map(|(name, entry)| (name.clone(), entry.value.clone()))
                .collect(),
        )
    }

    pub fn to_payload(&self) -> OperationsPayload {
        OperationsPayload {
            operation_name: self.operation_name.clone(),
            query: self.text.clone(),
            variables: self.variables_json(),
        }
    }
}

/// Accumulates a textual selection body while tracking declared variables.
///
/// Indentation is applied lazily at the start of each line, so interleaved
/// `print` calls compose the way they read. The writer is single-task state:
/// it is used by exactly one task for the duration of building one document.
#[derive(Debug, Default)]
pub struct QueryWriter {
    buffer: String,
    indent: usize,
    indented: bool,
    operation_type: Option<OperationType>,
    operation_name: Option<String>,
    variables: IndexMap<String, VariableEntry>,
}

impl QueryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_operation_type(&mut self, operation_type: OperationType) {
        self.operation_type = Some(operation_type);
    }

    pub fn operation_type(&self) -> OperationType {
        self.operation_type.unwrap_or(OperationType::Query)
    }

    pub fn set_operation_name(&mut self, name: impl Into<String>) {
        self.operation_name = Some(name.into());
    }

    pub fn print(&mut self, text: &str) {
        self.apply_indent();
        self.buffer.push_str(text);
    }

    pub fn println(&mut self, text: &str) {
        self.apply_indent();
        self.buffer.push_str(text);
        self.end_of_line();
    }

    pub fn blank_line(&mut self) {
        self.apply_indent();
        self.end_of_line();
    }

    /// Run `f` with the indent increased by one unit, restoring it afterward.
    /// `f` may return any value, so `Result`-returning bodies compose with `?`
    /// at the call site.
    pub fn with_indent<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.indent += INDENT_UNIT;
        let result = f(self);
        self.indent -= INDENT_UNIT;
        result
    }

    /// Declare a variable, returning the name actually assigned. A requested
    /// name that is already taken silently gets an incrementing numeric
    /// suffix (`id`, `id2`, `id3`, ...); the caller must interpolate the
    /// returned name, not the requested one.
    pub fn declare_variable(
        &mut self,
        requested: &str,
        gql_type: &str,
        value: impl Into<Value>,
    ) -> String {
        let actual = self.unique_name(requested);
        self.variables.insert(
            actual.clone(),
            VariableEntry {
                gql_type: gql_type.to_string(),
                value: value.into(),
            },
        );
        actual
    }

    /// Declare a variable whose value needs custom encoding. Encoding happens
    /// now, at declaration time, so failures surface immediately rather than
    /// at send time.
    pub fn declare_variable_encoded<T: Serialize>(
        &mut self,
        requested: &str,
        gql_type: &str,
        value: &T,
    ) -> Result<String, ClientError> {
        let encoded = serde_json::to_value(value).map_err(ClientError::Encode)?;
        Ok(self.declare_variable(requested, gql_type, encoded))
    }

    pub fn variables(&self) -> &IndexMap<String, VariableEntry> {
        &self.variables
    }

    /// Render the complete document. The header carries the operation type,
    /// the operation name, and the variable declarations; an unnamed
    /// operation with variables gets a generated placeholder name, since the
    /// protocol forbids anonymous operations with variable declarations.
    pub fn render(&self) -> QueryDocument {
        let operation_type = self.operation_type();

        let operation_name = match &self.operation_name {
            Some(name) => Some(name.clone()),
            None if !self.variables.is_empty() => Some(format!("Q{}", rand::random::<u32>())),
            None => None,
        };

        let mut text = String::from(operation_type.as_str());

        if let Some(name) = &operation_name {
            text.push(' ');
            text.push_str(name);
        }

        if !self.variables.is_empty() {
            text.push('(');
            let declarations = self
                .variables
                .iter()
                .map(|(name, entry)| format!("${name}: {}", entry.gql_type))
                .collect::<Vec<_>>()
                .join(", ");
            text.push_str(&declarations);
            text.push(')');
        }

        text.push_str(" {");
        if self.buffer.is_empty() {
            text.push_str(" }");
        } else {
            text.push('\n');
            for line in self.buffer.lines() {
                if !line.is_empty() {
                    for _ in 0..INDENT_UNIT {
                        text.push(' ');
                    }
                    text.push_str(line);
                }
                text.push('\n');
            }
            text.push('}');
        }

        QueryDocument {
            operation_type,
            operation_name,
            variables: self.variables.clone(),
            text,
        }
    }

    fn unique_name(&self, requested: &str) -> String {
        let mut actual = requested.to_string();
        let mut index = 1;
        while self.variables.contains_key(&actual) {
            index += 1;
            actual = format!("{requested}{index}");
        }
        actual
    }

    fn apply_indent(&mut self) {
        if !self.indented {
            for _ in 0..self.indent {
                self.buffer.push(' ');
            }
            self.indented = true;
        }
    }

    fn end_of_line(&mut self) {
        self.buffer.push('\n');
        self.indented = false;
    }
}
