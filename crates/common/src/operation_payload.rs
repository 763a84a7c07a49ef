// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// The wire-level request: a query document plus its externalized variables.
///
/// Over POST this is the JSON body `{query, operationName?, variables?}`;
/// over GET the same three fields travel as url-encoded query parameters,
/// with `variables` carrying JSON text.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationsPayload {
    pub operation_name: Option<String>,
    pub query: String,
    pub variables: Option<Map<String, Value>>,
}

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Request body is not valid JSON: {0}")]
    InvalidBodyJson(#[from] serde_json::Error),

    #[error("Request did not contain a query document")]
    MissingQuery,

    #[error("Variables could not be parsed: {0}")]
    MalformedVariables(String),
}

impl OperationsPayload {
    /// Decode a POST request body.
    pub fn from_json(json: Value) -> Result<Self, PayloadError> {
        #[derive(Debug, Deserialize)]
        struct RawOperationsPayload {
            #[serde(rename = "operationName")]
            operation_name: Option<String>,
            query: Option<String>,
            variables: Option<Map<String, Value>>,
        }

        let raw: RawOperationsPayload = serde_json::from_value(json)?;

        Ok(Self {
            operation_name: raw.operation_name,
            query: raw.query.ok_or(PayloadError::MissingQuery)?,
            variables: raw.variables,
        })
    }

    /// Decode a GET request's query string (`query=...&variables=...`).
    pub fn from_query_params(params: &str) -> Result<Self, PayloadError> {
        let mut query = None;
        let mut operation_name = None;
        let mut variables = None;

        for (key, value) in url::form_urlencoded::parse(params.as_bytes()) {
            match &*key {
                "query" => query = Some(value.into_owned()),
                "operationName" => operation_name = Some(value.into_owned()),
                "variables" => {
                    let parsed: Value = serde_json::from_str(&value)
                        .map_err(|e| PayloadError::MalformedVariables(e.to_string()))?;
                    match parsed {
                        Value::Object(map) => variables = Some(map),
                        other => {
                            return Err(PayloadError::MalformedVariables(format!(
                                "expected a JSON object, got {other}"
                            )));
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(Self {
            operation_name,
            query: query.ok_or(PayloadError::MissingQuery)?,
            variables,
        })
    }

    /// Encode as a POST body. Optional fields are omitted, not null.
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("query".to_string(), Value::String(self.query.clone()));
        if let Some(name) = &self.operation_name {
            body.insert("operationName".to_string(), Value::String(name.clone()));
        }
        if let Some(variables) = &self.variables {
            body.insert("variables".to_string(), Value::Object(variables.clone()));
        }
        Value::Object(body)
    }

    /// Encode as a GET query string.
    pub fn to_query_params(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("query", &self.query);
        if let Some(name) = &self.operation_name {
            serializer.append_pair("operationName", name);
        }
        if let Some(variables) = &self.variables {
            serializer.append_pair(
                "variables",
                &Value::Object(variables.clone()).to_string(),
            );
        }
        serializer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn sample() -> OperationsPayload {
        OperationsPayload {
            operation_name: Some("GetPerson".to_string()),
            query: "query GetPerson($id: ID!) { person(id: $id) { name } }".to_string(),
            variables: Some(
                json!({ "id": "1002" })
                    .as_object()
                    .cloned()
                    .unwrap(),
            ),
        }
    }

    #[test]
    fn post_body_round_trip() {
        let payload = sample();
        let decoded = OperationsPayload::from_json(payload.to_json()).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn get_params_round_trip() {
        let payload = sample();
        let decoded = OperationsPayload::from_query_params(&payload.to_query_params()).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn missing_query_is_rejected() {
        assert!(matches!(
            OperationsPayload::from_json(json!({ "variables": {} })),
            Err(PayloadError::MissingQuery)
        ));
        assert!(matches!(
            OperationsPayload::from_query_params("variables=%7B%7D"),
            Err(PayloadError::MissingQuery)
        ));
    }

    #[test]
    fn non_object_variables_are_rejected() {
        assert!(matches!(
            OperationsPayload::from_query_params("query=%7B%20a%20%7D&variables=42"),
            Err(PayloadError::MalformedVariables(_))
        ));
    }

    #[test]
    fn optional_fields_omitted_from_post_body() {
        let payload = OperationsPayload {
            operation_name: None,
            query: "{ a }".to_string(),
            variables: None,
        };
        assert_eq!(payload.to_json(), json!({ "query": "{ a }" }));
    }
}
