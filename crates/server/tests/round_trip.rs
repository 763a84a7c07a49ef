// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! End-to-end exercise of both protocol halves: a document built by the
//! client crate, routed per its operation type, executed by the server
//! crate, and read back through the client's error-aware view.

use http::{Method, StatusCode};
use serde_json::{Map, Value, json};
use url::Url;

use graphwire_client::{ClientError, QueryResult, QueryWriter, RequestParts};
use graphwire_common::OperationType;
use graphwire_server::{Executor, FieldError, FieldTable, handle};

struct Directory;

fn executor() -> Executor<Directory> {
    let query = FieldTable::new("Query").field("person", |selection, _: &Directory| {
        Box::pin(async move {
            let id = selection.resolve_argument("id")?;
            let mut person = Map::new();
            for child in selection.children() {
                match child.name()? {
                    "id" => {
                        person.insert("id".into(), id.clone());
                    }
                    "age" => {
                        person.insert("age".into(), json!(43));
                    }
                    "name" => {
                        child.record_error(&FieldError::resolver("name lookup failed"));
                        person.insert("name".into(), Value::Null);
                    }
                    other => {
                        child.record_error(&FieldError::UnknownField {
                            field: other.to_string(),
                            type_name: "Person".to_string(),
                        });
                        person.insert(other.to_string(), Value::Null);
                    }
                }
            }
            Ok(Value::Object(person))
        })
    });

    let mutation = FieldTable::new("Mutation").field("rename", |selection, _: &Directory| {
        Box::pin(async move { selection.resolve_argument("name") })
    });

    Executor::new(query).with_mutation(mutation)
}

#[tokio::test]
async fn query_round_trips_with_partial_failure() {
    let mut writer = QueryWriter::new();
    writer.set_operation_name("FindPerson");
    let id = writer.declare_variable("id", "ID!", "1002");
    writer.println(&format!("person(id: ${id}) {{"));
    writer.with_indent(|w| {
        w.println("id");
        w.println("name");
        w.println("age");
    });
    writer.println("}");

    let document = writer.render();
    assert_eq!(document.operation_type, OperationType::Query);

    let parts = RequestParts::from_document("http://people.example/graphql", &document).unwrap();
    assert_eq!(parts.method, Method::GET);

    let url = Url::parse(&parts.url).unwrap();
    let response = handle(&executor(), &Directory, Method::GET, url.query(), None).await;
    assert_eq!(response.status, StatusCode::OK);

    let result = QueryResult::from_value(response.body).unwrap();
    assert_eq!(result.data()["person"]["id"], json!("1002"));
    assert_eq!(result.data()["person"]["age"], json!(43));
    assert_eq!(result.data()["person"]["name"], Value::Null);

    // The failed field surfaces exactly where its path points; the sibling
    // that succeeded stays readable.
    let person = result.view().for_field("person");
    person.check_field("age").unwrap();
    match person.check_field("name") {
        Err(ClientError::Field(error)) => {
            assert_eq!(error.message, "name lookup failed");
            assert_eq!(error.path.as_ref().unwrap().dotted(), "person.name");
        }
        other => panic!("expected a field error, got {other:?}"),
    }
}

#[tokio::test]
async fn mutation_round_trips_over_post() {
    let mut writer = QueryWriter::new();
    writer.set_operation_type(OperationType::Mutation);
    writer.set_operation_name("Rename");
    let name = writer.declare_variable("name", "String!", "Schrute");
    writer.println(&format!("rename(name: ${name})"));

    let parts =
        RequestParts::from_document("http://people.example/graphql", &writer.render()).unwrap();
    assert_eq!(parts.method, Method::POST);

    let body = parts.body.unwrap();
    let response = handle(
        &executor(),
        &Directory,
        Method::POST,
        None,
        Some(body.as_bytes()),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);

    let result = QueryResult::from_value(response.body).unwrap();
    assert!(result.errors().is_empty());
    assert_eq!(result.data()["rename"], json!("Schrute"));
}
