// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use http::Method;
use tracing::{debug, instrument};

use crate::error::ClientError;
use crate::request::RequestParts;
use crate::response::QueryResult;
use crate::writer::{QueryDocument, QueryWriter};

/// A reqwest-backed GraphQL client.
///
/// Builds the document with a [`QueryWriter`], routes queries over GET and
/// mutations over POST, and parses the envelope into a [`QueryResult`].
/// Headers (auth and the like) are configured on the underlying
/// `reqwest::Client` via [`GraphQLClient::with_http_client`].
pub struct GraphQLClient {
    endpoint: String,
    http: reqwest::Client,
}

impl GraphQLClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_http_client(endpoint, reqwest::Client::new())
    }

    pub fn with_http_client(endpoint: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            http,
        }
    }

    /// Build and execute a document. The closure receives a fresh writer; the
    /// operation name, when given, lands in the document header.
    pub async fn execute(
        &self,
        name: Option<&str>,
        build: impl FnOnce(&mut QueryWriter),
    ) -> Result<QueryResult, ClientError> {
        let mut writer = QueryWriter::new();
        if let Some(name) = name {
            writer.set_operation_name(name);
        }
        build(&mut writer);

        self.send(&writer.render()).await
    }

    /// Send an already rendered document.
    ///
    /// Transport failures and non-2xx statuses surface as errors with no
    /// field path; anything carried inside a 200 envelope is left for the
    /// [`QueryResult`] to correlate per field.
    #[instrument(name = "GraphQLClient::send", skip_all, fields(operation_type = %document.operation_type))]
    pub async fn send(&self, document: &QueryDocument) -> Result<QueryResult, ClientError> {
        let parts = RequestParts::from_document(&self.endpoint, document)?;
        debug!(method = %parts.method, url = %parts.url, "Sending GraphQL request");

        let request = match parts.method {
            Method::POST => self
                .http
                .post(&parts.url)
                .header("content-type", "application/json")
                .body(parts.body.unwrap_or_default()),
            _ => self.http.get(&parts.url),
        }
        .header("accept", "application/json");

        let response = request.send().await.map_err(ClientError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { status });
        }

        let bytes = response.bytes().await.map_err(ClientError::Transport)?;
        QueryResult::from_slice(&bytes)
    }
}
