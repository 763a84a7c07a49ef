// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Mutex;

use async_graphql_parser::types::{Field, OperationDefinition, Selection, SelectionSet};
use async_graphql_value::Value as GqlValue;
use serde_json::{Map, Value};

use graphwire_common::{ErrorPath, GraphQLError};

use crate::error::{FieldError, ServerError};

/// One mirrored selection: the field name (`None` for the synthetic root,
/// which is a bare selection set), the arguments as written, parent id, and
/// child ids in document order.
#[derive(Debug)]
struct SelectionRecord {
    parent: Option<usize>,
    name: Option<String>,
    arguments: Vec<(String, GqlValue)>,
    children: Vec<usize>,
}

/// Arena owning one request's mirrored selection tree, the request variables,
/// and the shared error list.
///
/// Records are indexed by integer id with parent links, so error paths are
/// computed by walking ids rather than an object graph. The whole arena is
/// owned by the single task resolving the request; the error list mutex is
/// there to keep resolver futures `Send` and is uncontended by construction.
/// A fresh arena (and thus a fresh error list) is built per request.
#[derive(Debug)]
pub struct SelectionArena {
    records: Vec<SelectionRecord>,
    variables: Map<String, Value>,
    errors: Mutex<Vec<GraphQLError>>,
}

impl SelectionArena {
    pub fn from_operation(
        operation: &OperationDefinition,
        variables: Option<Map<String, Value>>,
    ) -> Result<Self, ServerError> {
        Self::from_selection_set(&operation.selection_set.node, variables)
    }

    /// Mirror a parsed selection set. Only named fields are supported;
    /// fragment spreads and inline fragments are outside the protocol
    /// surface and fail up front.
    pub fn from_selection_set(
        selection_set: &SelectionSet,
        variables: Option<Map<String, Value>>,
    ) -> Result<Self, ServerError> {
        let mut arena = Self {
            records: vec![SelectionRecord {
                parent: None,
                name: None,
                arguments: Vec::new(),
                children: Vec::new(),
            }],
            variables: variables.unwrap_or_default(),
            errors: Mutex::new(Vec::new()),
        };

        arena.mirror_children(0, selection_set)?;
        Ok(arena)
    }

    pub fn root(&self) -> SelectionResolver<'_> {
        SelectionResolver { arena: self, id: 0 }
    }

    /// Consume the arena, yielding the errors collected during resolution.
    /// From here on they are immutable envelope content.
    pub fn into_errors(self) -> Vec<GraphQLError> {
        self.errors
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn mirror_children(
        &mut self,
        parent: usize,
        selection_set: &SelectionSet,
    ) -> Result<(), ServerError> {
        for selection in &selection_set.items {
            match &selection.node {
                Selection::Field(field) => {
                    let id = self.push_field(parent, &field.node);
                    self.mirror_children(id, &field.node.selection_set.node)?;
                }
                Selection::FragmentSpread(_) | Selection::InlineFragment(_) => {
                    return Err(ServerError::FragmentsUnsupported(selection.pos));
                }
            }
        }
        Ok(())
    }

    fn push_field(&mut self, parent: usize, field: &Field) -> usize {
        let id = self.records.len();
        self.records.push(SelectionRecord {
            parent: Some(parent),
            name: Some(field.name.node.to_string()),
            arguments: field
                .arguments
                .iter()
                .map(|(name, value)| (name.node.to_string(), value.node.clone()))
                .collect(),
            children: Vec::new(),
        });
        self.records[parent].children.push(id);
        id
    }

    fn push_error(&self, error: GraphQLError) {
        self.errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(error);
    }
}

/// A cheap handle to one selection in the arena.
///
/// This is the explicit context value passed through every resolver call;
/// there is no ambient "current selection" state anywhere.
#[derive(Debug, Clone, Copy)]
pub struct SelectionResolver<'a> {
    arena: &'a SelectionArena,
    id: usize,
}

impl<'a> SelectionResolver<'a> {
    /// The selection's field name. The synthetic root is a bare selection
    /// set and has none.
    pub fn name(&self) -> Result<&'a str, FieldError> {
        self.record().name.as_deref().ok_or(FieldError::NotANamedNode)
    }

    /// Child resolvers in document order, sharing this request's variables
    /// and error list.
    pub fn children(&self) -> Vec<SelectionResolver<'a>> {
        self.record()
            .children
            .iter()
            .map(|&id| SelectionResolver {
                arena: self.arena,
                id,
            })
            .collect()
    }

    pub fn has_children(&self) -> bool {
        !self.record().children.is_empty()
    }

    /// Resolve a declared argument to a JSON value.
    ///
    /// An absent argument resolves to null. A variable reference is looked
    /// up in the request variables. Literal scalars convert to the matching
    /// JSON primitive; literal lists and objects fail loudly rather than
    /// silently coercing.
    pub fn resolve_argument(&self, key: &str) -> Result<Value, FieldError> {
        let Some((_, value)) = self
            .record()
            .arguments
            .iter()
            .find(|(name, _)| name == key)
        else {
            return Ok(Value::Null);
        };

        match value {
            GqlValue::Variable(name) => self
                .arena
                .variables
                .get(name.as_str())
                .cloned()
                .ok_or_else(|| FieldError::UnboundVariable(name.to_string())),
            GqlValue::Null => Ok(Value::Null),
            GqlValue::Number(number) => Ok(Value::Number(number.clone())),
            GqlValue::String(string) => Ok(Value::String(string.clone())),
            GqlValue::Boolean(boolean) => Ok(Value::Bool(*boolean)),
            GqlValue::Enum(name) => Ok(Value::String(name.to_string())),
            GqlValue::Binary(_) => Err(FieldError::UnsupportedLiteral("binary")),
            GqlValue::List(_) => Err(FieldError::UnsupportedLiteral("list")),
            GqlValue::Object(_) => Err(FieldError::UnsupportedLiteral("object")),
        }
    }

    /// Direct access to a request variable.
    pub fn variable(&self, key: &str) -> Result<&'a Value, FieldError> {
        self.arena
            .variables
            .get(key)
            .ok_or_else(|| FieldError::UnboundVariable(key.to_string()))
    }

    /// Record a path-qualified error for this selection. Resolution of
    /// sibling fields continues; callers keep producing partial data.
    pub fn record_error(&self, cause: &(dyn std::error::Error + 'static)) {
        let path = self.path();
        let path = if path.is_empty() { None } else { Some(path) };
        self.arena.push_error(GraphQLError::from_cause(cause, path));
    }

    /// Root-to-leaf field names, computed by walking parent ids. The unnamed
    /// root contributes nothing.
    pub fn path(&self) -> ErrorPath {
        let mut names = Vec::new();
        let mut current = Some(self.id);
        while let Some(id) = current {
            let record = &self.arena.records[id];
            if let Some(name) = &record.name {
                names.push(name.clone());
            }
            current = record.parent;
        }
        names.reverse();
        ErrorPath::from_fields(names)
    }

    fn record(&self) -> &'a SelectionRecord {
        &self.arena.records[self.id]
    }
}
