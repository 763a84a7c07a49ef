// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;

use futures::future::BoxFuture;
use serde_json::{Map, Value};

use crate::error::FieldError;
use crate::selection::SelectionResolver;

/// The resolution closure for one field: receives the field's selection
/// resolver (the explicit per-request context) and the application root.
pub type FieldFn<R> = Box<
    dyn for<'a> Fn(SelectionResolver<'a>, &'a R) -> BoxFuture<'a, Result<Value, FieldError>>
        + Send
        + Sync,
>;

/// An explicit per-type dispatch table from field name to resolution
/// closure. Built once per type and shared (wrap in `Arc`) across requests;
/// per-request state travels in the [`SelectionResolver`].
pub struct FieldTable<R> {
    type_name: &'static str,
    fields: HashMap<&'static str, FieldFn<R>>,
}

impl<R: Send + Sync> FieldTable<R> {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: HashMap::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn field<F>(mut self, name: &'static str, resolve: F) -> Self
    where
        F: for<'a> Fn(SelectionResolver<'a>, &'a R) -> BoxFuture<'a, Result<Value, FieldError>>
            + Send
            + Sync
            + 'static,
    {
        self.fields.insert(name, Box::new(resolve));
        self
    }

    /// Resolve every child selection of `resolver`, sequentially and in
    /// document order, so error paths and side effects are deterministic.
    ///
    /// A failing field records its error and contributes null for its own
    /// subtree only; siblings still resolve and their data is kept. A field
    /// with no table entry is recorded as unknown and contributes null.
    pub async fn resolve(&self, resolver: SelectionResolver<'_>, root: &R) -> Value {
        let mut object = Map::new();

        for child in resolver.children() {
            let name = match child.name() {
                Ok(name) => name.to_string(),
                Err(error) => {
                    child.record_error(&error);
                    continue;
                }
            };

            let value = match self.fields.get(name.as_str()) {
                Some(resolve_field) => match resolve_field(child, root).await {
                    Ok(value) => value,
                    Err(error) => {
                        child.record_error(&error);
                        Value::Null
                    }
                },
                None => {
                    child.record_error(&FieldError::UnknownField {
                        field: name.clone(),
                        type_name: self.type_name.to_string(),
                    });
                    Value::Null
                }
            };

            object.insert(name, value);
        }

        Value::Object(object)
    }
}
