// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use graphwire_common::{GraphQLError, GraphQLResponse};

use crate::error::ClientError;

/// An error-aware view over one position in the response tree.
///
/// The view holds the dot-joined path from the operation root and an index of
/// every error keyed by its own dot-joined path. Child views share the index
/// through an `Arc`; navigating never recomputes it and never mutates the
/// parent. Checking is per field, so reading an unaffected sibling never
/// fails even when another field errored.
#[derive(Debug, Clone)]
pub struct ResponseView {
    path: String,
    errors: Arc<HashMap<String, GraphQLError>>,
}

impl ResponseView {
    /// Build the root view, precomputing the path index.
    pub fn root(errors: &[GraphQLError]) -> Self {
        Self::new("", errors)
    }

    /// Build a view at an arbitrary dot-joined prefix, precomputing the path
    /// index. Errors without a path index under the empty string (root-level
    /// failures); the first error at a given path wins.
    pub fn new(path_prefix: impl Into<String>, errors: &[GraphQLError]) -> Self {
        let mut index = HashMap::new();
        for error in errors {
            let key = error
                .path
                .as_ref()
                .map(|path| path.dotted())
                .unwrap_or_default();
            index.entry(key).or_insert_with(|| error.clone());
        }

        Self {
            path: path_prefix.into(),
            errors: Arc::new(index),
        }
    }

    /// A child view rooted at `name` under this view's path.
    pub fn for_field(&self, name: &str) -> ResponseView {
        ResponseView {
            path: self.child_path(name),
            errors: Arc::clone(&self.errors),
        }
    }

    /// Check whether an error was recorded exactly at the would-be child
    /// path, surfacing it as a `ClientError::Field`. Generated accessors call
    /// this before reading the field's JSON value.
    pub fn check_field(&self, name: &str) -> Result<(), ClientError> {
        match self.errors.get(&self.child_path(name)) {
            Some(error) => Err(ClientError::Field(error.clone())),
            None => Ok(()),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn child_path(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{name}", self.path)
        }
    }
}

/// A parsed response envelope plus its root [`ResponseView`].
#[derive(Debug, Clone)]
pub struct QueryResult {
    envelope: GraphQLResponse,
    root: ResponseView,
}

impl QueryResult {
    pub fn from_envelope(envelope: GraphQLResponse) -> Self {
        let root = ResponseView::root(&envelope.errors);
        Self { envelope, root }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ClientError> {
        let envelope: GraphQLResponse =
            serde_json::from_slice(bytes).map_err(ClientError::MalformedResponse)?;
        Ok(Self::from_envelope(envelope))
    }

    pub fn from_value(value: Value) -> Result<Self, ClientError> {
        let envelope: GraphQLResponse =
            serde_json::from_value(value).map_err(ClientError::MalformedResponse)?;
        Ok(Self::from_envelope(envelope))
    }

    pub fn data(&self) -> &Value {
        &self.envelope.data
    }

    /// The full error list, for callers that want to fail fast on any error
    /// before constructing field views.
    pub fn errors(&self) -> &[GraphQLError] {
        &self.envelope.errors
    }

    pub fn view(&self) -> ResponseView {
        self.root.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn result_with_person_name_error() -> QueryResult {
        QueryResult::from_value(json!({
            "data": { "person": { "name": null, "age": 43 } },
            "errors": [{ "message": "x", "path": ["person", "name"] }]
        }))
        .unwrap()
    }

    #[test]
    fn error_surfaces_at_exact_path_only() {
        let result = result_with_person_name_error();
        let person = result.view().for_field("person");

        let failure = person.check_field("name").unwrap_err();
        match failure {
            ClientError::Field(error) => assert_eq!(error.message, "x"),
            other => panic!("unexpected error {other:?}"),
        }

        person.check_field("age").unwrap();
        result.view().check_field("person").unwrap();
    }

    #[test]
    fn sibling_navigation_is_unaffected() {
        let result = result_with_person_name_error();
        let sibling = result.view().for_field("company");
        sibling.check_field("name").unwrap();
    }

    #[test]
    fn child_views_share_the_index() {
        let result = result_with_person_name_error();
        let root = result.view();
        let person = root.for_field("person");

        assert!(Arc::ptr_eq(&root.errors, &person.errors));
        assert_eq!(person.path(), "person");
        assert_eq!(root.path(), "");
    }

    #[test]
    fn root_level_error_keys_on_empty_path() {
        let result = QueryResult::from_value(json!({
            "data": null,
            "errors": [{ "message": "request refused" }]
        }))
        .unwrap();

        assert_eq!(result.errors().len(), 1);
        assert!(result.view().errors.contains_key(""));
    }

    #[test]
    fn index_paths_include_list_positions() {
        let result = QueryResult::from_value(json!({
            "data": { "friends": [{ "name": "a" }, { "name": null }] },
            "errors": [{ "message": "gone", "path": ["friends", 1, "name"] }]
        }))
        .unwrap();

        let entry = result
            .view()
            .for_field("friends")
            .for_field("1")
            .check_field("name");
        assert!(entry.is_err());
    }

    #[test]
    fn data_accessible_alongside_errors() {
        let result = result_with_person_name_error();
        assert_eq!(result.data()["person"]["age"], json!(43));
        assert_eq!(result.errors().len(), 1);
    }
}
