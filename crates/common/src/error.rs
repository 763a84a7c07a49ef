// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::path::ErrorPath;

/// A location in the request document that triggered an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

/// A single protocol-level error as it appears in the `errors` list of a
/// response envelope.
///
/// `path` is the dot/bracket-addressable route from the operation root to the
/// field that failed; its absence means the error is not attributable to one
/// field (a transport or request-level failure).
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
pub struct GraphQLError {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub locations: Option<Vec<Location>>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub path: Option<ErrorPath>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub extensions: Option<serde_json::Value>,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: None,
            path: None,
            extensions: None,
        }
    }

    pub fn with_locations(mut self, locations: Vec<Location>) -> Self {
        self.locations = Some(locations);
        self
    }

    pub fn with_path(mut self, path: ErrorPath) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_extensions(mut self, extensions: serde_json::Value) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// Build an error from a resolver failure. The message is the failure's
    /// display form; the underlying source chain, if any, is preserved under
    /// a `causes` extension so it survives the trip through the envelope.
    pub fn from_cause(cause: &(dyn std::error::Error + 'static), path: Option<ErrorPath>) -> Self {
        let mut causes = Vec::new();
        let mut source = cause.source();
        while let Some(inner) = source {
            causes.push(inner.to_string());
            source = inner.source();
        }

        let extensions = if causes.is_empty() {
            None
        } else {
            Some(json!({ "causes": causes }))
        };

        Self {
            message: cause.to_string(),
            locations: None,
            path,
            extensions,
        }
    }
}
