// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use http::Method;
use serde_json::Value;
use url::Url;

use graphwire_common::OperationType;

use crate::error::ClientError;
use crate::writer::QueryDocument;

/// A transport-agnostic request: method, full URL, and an optional JSON body.
///
/// Queries travel as GET with `query` and (if present) `variables` as
/// url-encoded parameters; mutations travel as POST with the JSON body
/// `{query, operationName?, variables?}`. Building the parts is pure, so the
/// routing rule is testable without a network.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParts {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
}

impl RequestParts {
    pub fn from_document(endpoint: &str, document: &QueryDocument) -> Result<Self, ClientError> {
        let payload = document.to_payload();

        match document.operation_type {
            OperationType::Query => {
                let mut url = Url::parse(endpoint)?;
                {
                    let mut pairs = url.query_pairs_mut();
                    pairs.append_pair("query", &payload.query);
                    if let Some(variables) = &payload.variables {
                        pairs.append_pair(
                            "variables",
                            &Value::Object(variables.clone()).to_string(),
                        );
                    }
                }

                Ok(Self {
                    method: Method::GET,
                    url: url.into(),
                    body: None,
                })
            }
            OperationType::Mutation => {
                // Validates the endpoint even though the URL passes through untouched.
                let url = Url::parse(endpoint)?;

                Ok(Self {
                    method: Method::POST,
                    url: url.into(),
                    body: Some(payload.to_json().to_string()),
                })
            }
        }
    }
}
