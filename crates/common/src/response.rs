// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GraphQLError;

/// The top-level `{data, errors}` response wrapper.
///
/// `data` is always serialized, even when null; the `errors` key appears only
/// when at least one error was collected. Both may be populated at once:
/// partial results are a normal outcome, not an edge case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLResponse {
    #[serde(default)]
    pub data: Value,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<GraphQLError>,
}

impl GraphQLResponse {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Combine resolved data and collected errors into the wire envelope.
///
/// Pure and transport-agnostic: the same assembly runs behind HTTP GET, POST,
/// or a non-HTTP event source.
pub fn assemble(data: Value, errors: Vec<GraphQLError>) -> GraphQLResponse {
    GraphQLResponse { data, errors }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn errors_key_absent_when_empty() {
        let envelope = assemble(json!({ "a": 1 }), vec![]);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "data": { "a": 1 } })
        );
    }

    #[test]
    fn null_data_with_errors() {
        let envelope = assemble(Value::Null, vec![GraphQLError::new("total failure")]);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "data": null,
                "errors": [{ "message": "total failure" }]
            })
        );
    }

    #[test]
    fn partial_failure_keeps_both_keys() {
        let envelope = assemble(
            json!({ "name": "Creed", "age": null }),
            vec![GraphQLError::new("age unavailable")],
        );

        let serialized = serde_json::to_value(&envelope).unwrap();
        assert_eq!(serialized["data"]["name"], json!("Creed"));
        assert_eq!(serialized["errors"][0]["message"], json!("age unavailable"));
    }

    #[test]
    fn missing_errors_key_parses_as_empty() {
        let envelope: GraphQLResponse =
            serde_json::from_value(json!({ "data": { "a": 1 } })).unwrap();
        assert!(!envelope.has_errors());
    }
}
