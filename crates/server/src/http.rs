// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use http::{Method, StatusCode};
use serde_json::{Value, json};
use tracing::{error, instrument};

use graphwire_common::{GraphQLError, OperationsPayload, PayloadError};

use crate::error::ServerError;
use crate::executor::Executor;

/// What the hosting framework sends back: a status code and a JSON body.
/// Connection handling, TLS, and content-type negotiation stay with the
/// framework; the body is always `application/json`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponseParts {
    pub status: StatusCode,
    pub body: Value,
}

/// Method-routed entry point for HTTP transports.
///
/// GET carries `query`/`operationName`/`variables` as query-string
/// parameters, POST carries them as a JSON body. Per the protocol
/// convention, GraphQL-level failure (partial or total) is still a 200 with
/// the failure inside the envelope; non-2xx statuses are reserved for
/// requests that never reached GraphQL processing: 400 for malformed
/// requests, 404 for an unconfigured root, 405 for other methods.
#[instrument(name = "http::handle", skip_all, fields(method = %method))]
pub async fn handle<R: Send + Sync>(
    executor: &Executor<R>,
    root: &R,
    method: Method,
    query_string: Option<&str>,
    body: Option<&[u8]>,
) -> HttpResponseParts {
    let payload = if method == Method::GET {
        OperationsPayload::from_query_params(query_string.unwrap_or(""))
    } else if method == Method::POST {
        decode_body(body)
    } else {
        return HttpResponseParts {
            status: StatusCode::METHOD_NOT_ALLOWED,
            body: Value::Null,
        };
    };

    let payload = match payload {
        Ok(payload) => payload,
        Err(payload_error) => {
            error!(%payload_error, "Malformed GraphQL request");
            return error_response(StatusCode::BAD_REQUEST, ServerError::Payload(payload_error));
        }
    };

    match executor.execute(payload, root).await {
        Ok(envelope) => HttpResponseParts {
            status: StatusCode::OK,
            body: serde_json::to_value(&envelope)
                .expect("envelope serialization cannot fail"),
        },
        Err(server_error) => {
            error!(%server_error, "Request failed before resolution");
            let status = match &server_error {
                ServerError::MutationNotConfigured => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            };
            error_response(status, server_error)
        }
    }
}

fn decode_body(body: Option<&[u8]>) -> Result<OperationsPayload, PayloadError> {
    let body = body.unwrap_or_default();
    let json: Value = serde_json::from_slice(body)?;
    OperationsPayload::from_json(json)
}

/// A bare error envelope: no `data` key, since resolution never started.
fn error_response(status: StatusCode, server_error: ServerError) -> HttpResponseParts {
    let mut graphql_error = GraphQLError::new(server_error.to_string());
    let positions = server_error.positions();
    if !positions.is_empty() {
        graphql_error.locations = Some(positions);
    }

    HttpResponseParts {
        status,
        body: json!({ "errors": [graphql_error] }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::dispatch::FieldTable;
    use crate::error::FieldError;

    struct Nothing;

    fn executor() -> Executor<Nothing> {
        Executor::new(
            FieldTable::new("Query")
                .field("greeting", |_, _| {
                    Box::pin(async move { Ok(json!("hello")) })
                })
                .field("broken", |_, _| {
                    Box::pin(async move { Err(FieldError::resolver("nope")) })
                }),
        )
        .with_mutation(FieldTable::new("Mutation").field("touch", |_, _| {
            Box::pin(async move { Ok(json!(true)) })
        }))
    }

    #[tokio::test]
    async fn get_resolves_from_query_parameters() {
        let response = handle(
            &executor(),
            &Nothing,
            Method::GET,
            Some("query=%7B%20greeting%20%7D"),
            None,
        )
        .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, json!({ "data": { "greeting": "hello" } }));
    }

    #[tokio::test]
    async fn post_resolves_from_json_body() {
        let body = json!({ "query": "mutation { touch }" }).to_string();
        let response = handle(
            &executor(),
            &Nothing,
            Method::POST,
            None,
            Some(body.as_bytes()),
        )
        .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, json!({ "data": { "touch": true } }));
    }

    #[tokio::test]
    async fn field_failure_is_still_a_200() {
        let body = json!({ "query": "{ broken greeting }" }).to_string();
        let response = handle(
            &executor(),
            &Nothing,
            Method::POST,
            None,
            Some(body.as_bytes()),
        )
        .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.body["data"],
            json!({ "broken": null, "greeting": "hello" })
        );
        assert_eq!(response.body["errors"][0]["path"], json!(["broken"]));
    }

    #[tokio::test]
    async fn missing_query_is_a_400() {
        let response = handle(&executor(), &Nothing, Method::GET, Some(""), None).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.body["errors"][0]["message"].is_string());
        assert_eq!(response.body.get("data"), None);
    }

    #[tokio::test]
    async fn unparsable_body_is_a_400() {
        let response = handle(
            &executor(),
            &Nothing,
            Method::POST,
            None,
            Some(b"not json at all"),
        )
        .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unparsable_query_reports_locations() {
        let body = json!({ "query": "query {{{" }).to_string();
        let response = handle(
            &executor(),
            &Nothing,
            Method::POST,
            None,
            Some(body.as_bytes()),
        )
        .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.body["errors"][0]["locations"].is_array());
    }

    #[tokio::test]
    async fn other_methods_are_405() {
        let response = handle(&executor(), &Nothing, Method::PUT, None, None).await;
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn unconfigured_mutation_root_is_a_404() {
        let lone_query = Executor::new(FieldTable::<Nothing>::new("Query"));
        let body = json!({ "query": "mutation { touch }" }).to_string();

        let response = handle(
            &lone_query,
            &Nothing,
            Method::POST,
            None,
            Some(body.as_bytes()),
        )
        .await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}
