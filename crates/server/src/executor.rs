// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_graphql_parser::{
    Pos,
    types::{
        DocumentOperations, ExecutableDocument, OperationDefinition,
        OperationType as ParsedOperationType,
    },
};
use async_graphql_value::Name;
use tracing::{error, instrument};

use graphwire_common::{GraphQLResponse, OperationsPayload, assemble};

use crate::dispatch::FieldTable;
use crate::error::ServerError;
use crate::selection::SelectionArena;

/// Drives one request end to end: parse the query text, pick the operation,
/// mirror its selection tree into a fresh arena, resolve against the root
/// dispatch tables, and assemble the envelope.
///
/// The executor itself is immutable and shared; every request gets its own
/// arena and error list.
pub struct Executor<R> {
    query: Arc<FieldTable<R>>,
    mutation: Option<Arc<FieldTable<R>>>,
}

impl<R: Send + Sync> Executor<R> {
    pub fn new(query: FieldTable<R>) -> Self {
        Self {
            query: Arc::new(query),
            mutation: None,
        }
    }

    pub fn with_mutation(mut self, mutation: FieldTable<R>) -> Self {
        self.mutation = Some(Arc::new(mutation));
        self
    }

    /// Execute one request payload against `root`.
    ///
    /// Request-level failures (unparsable query, unmatched operation name,
    /// unsupported operation kind) return `Err`: no envelope exists yet.
    /// Field-level failures never surface here; they are collected during
    /// resolution and land inside the envelope, alongside whatever partial
    /// data the remaining fields produced.
    #[instrument(name = "Executor::execute", skip_all)]
    pub async fn execute(
        &self,
        payload: OperationsPayload,
        root: &R,
    ) -> Result<GraphQLResponse, ServerError> {
        let document = parse_query(&payload.query)?;
        let operation = select_operation(document, payload.operation_name)?;

        let table = match operation.ty {
            ParsedOperationType::Query => &self.query,
            ParsedOperationType::Mutation => self
                .mutation
                .as_ref()
                .ok_or(ServerError::MutationNotConfigured)?,
            ParsedOperationType::Subscription => {
                return Err(ServerError::SubscriptionsUnsupported);
            }
        };

        let arena = SelectionArena::from_operation(&operation, payload.variables)?;
        let data = table.resolve(arena.root(), root).await;
        let errors = arena.into_errors();

        Ok(assemble(data, errors))
    }
}

/// Pick the operation to run: a lone anonymous operation, a lone named one,
/// or the one matching `operation_name` when the document holds several.
fn select_operation(
    document: ExecutableDocument,
    operation_name: Option<String>,
) -> Result<OperationDefinition, ServerError> {
    match document.operations {
        DocumentOperations::Single(operation) => Ok(operation.node),
        DocumentOperations::Multiple(mut operations) => {
            if operations.is_empty() {
                Err(ServerError::NoOperationFound)
            } else {
                match operation_name {
                    None if operations.len() == 1 => {
                        // `operationName` is required only for truly multiple
                        // operations, but the parser reports a single named
                        // operation (`query Foo { ... }`) as `Multiple` too.
                        // This unwrap is okay because we just checked that
                        // there is exactly one operation.
                        Ok(operations.into_iter().next().unwrap().1.node)
                    }
                    None => Err(ServerError::MultipleOperationsNoOperationName),
                    Some(operation_name) => match operations.remove(&Name::new(&operation_name)) {
                        Some(operation) => Ok(operation.node),
                        None => Err(ServerError::MultipleOperationsUnmatchedOperationName(
                            operation_name,
                        )),
                    },
                }
            }
        }
    }
}

#[instrument(name = "executor::parse_query", skip_all)]
fn parse_query(query: &str) -> Result<ExecutableDocument, ServerError> {
    async_graphql_parser::parse_query(query).map_err(|parse_error| {
        error!(%parse_error, "Failed to parse query");
        let (message, first, second) = match parse_error {
            async_graphql_parser::Error::Syntax {
                message,
                start,
                end,
            } => {
                // Syntax messages are multi-line; keep them on one line.
                (format!("Syntax error: {}", message.escape_debug()), start, end)
            }
            async_graphql_parser::Error::MultipleRoots { root, schema, pos } => {
                (format!("Multiple roots of {root} type"), schema, Some(pos))
            }
            async_graphql_parser::Error::MissingQueryRoot { pos } => {
                ("Missing query root".to_string(), pos, None)
            }
            async_graphql_parser::Error::MultipleOperations {
                anonymous,
                operation,
            } => (
                "Multiple operations".to_string(),
                anonymous,
                Some(operation),
            ),
            async_graphql_parser::Error::OperationDuplicated {
                operation: _,
                first,
                second,
            } => ("Operation duplicated".to_string(), first, Some(second)),
            async_graphql_parser::Error::FragmentDuplicated {
                fragment,
                first,
                second,
            } => (
                format!("Fragment {fragment} duplicated"),
                first,
                Some(second),
            ),
            async_graphql_parser::Error::MissingOperation => {
                ("Missing operation".to_string(), Pos::default(), None)
            }
            _ => ("Unknown error".to_string(), Pos::default(), None),
        };

        ServerError::QueryParsingFailed(message, first, second)
    })
}
