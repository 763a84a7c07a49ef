// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

use graphwire_common::GraphQLError;

/// Failures a caller of the client half can observe.
///
/// `Transport` and `Status` occur before any envelope exists and carry no
/// field path; `Field` is raised lazily when an accessor checks a field whose
/// path matches a recorded error.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned status {status}")]
    Status { status: http::StatusCode },

    #[error("Response was malformed: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("{0}")]
    Field(GraphQLError),

    #[error("Variable could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl ClientError {
    /// The protocol-level error behind this failure, if there is one.
    pub fn graphql_error(&self) -> Option<&GraphQLError> {
        match self {
            ClientError::Field(error) => Some(error),
            _ => None,
        }
    }
}
