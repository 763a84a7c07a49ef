// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::Pos;
use thiserror::Error;

use graphwire_common::{Location, PayloadError};

/// Request-level failures. No envelope exists when one of these occurs; the
/// HTTP shim maps them to non-2xx statuses.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    QueryParsingFailed(String, Pos, Option<Pos>),

    #[error("{0}")]
    Payload(#[from] PayloadError),

    #[error("No operation found")]
    NoOperationFound,

    #[error("Must provide operation name if query contains multiple operations")]
    MultipleOperationsNoOperationName,

    #[error("operationName '{0}' doesn't match any operation")]
    MultipleOperationsUnmatchedOperationName(String),

    #[error("Subscriptions are not supported")]
    SubscriptionsUnsupported,

    #[error("Fragments are not supported")]
    FragmentsUnsupported(Pos),

    #[error("No mutation root is configured")]
    MutationNotConfigured,
}

impl ServerError {
    /// Document positions attributable to this failure, for the `locations`
    /// key of the reported error.
    pub fn positions(&self) -> Vec<Location> {
        let to_location = |pos: &Pos| Location {
            line: pos.line as u32,
            column: pos.column as u32,
        };

        match self {
            ServerError::QueryParsingFailed(_, first, second) => {
                let mut positions = vec![to_location(first)];
                if let Some(second) = second {
                    positions.push(to_location(second));
                }
                positions
            }
            ServerError::FragmentsUnsupported(pos) => vec![to_location(pos)],
            _ => vec![],
        }
    }
}

/// Per-field failures. These are recorded into the request's shared error
/// list during resolution, never propagated: sibling fields keep resolving
/// and partial data survives.
#[derive(Error, Debug)]
pub enum FieldError {
    #[error("Variable '{0}' is not bound")]
    UnboundVariable(String),

    #[error("Literal {0} arguments are not supported; pass the value as a variable instead")]
    UnsupportedLiteral(&'static str),

    #[error("Selection has no field name")]
    NotANamedNode,

    #[error("Field '{field}' is not valid for type '{type_name}'")]
    UnknownField { field: String, type_name: String },

    #[error("{0}")]
    Resolver(String),
}

impl FieldError {
    /// Wrap an application-level resolver failure.
    pub fn resolver(message: impl std::fmt::Display) -> Self {
        FieldError::Resolver(message.to_string())
    }
}
