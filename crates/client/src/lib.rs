// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Client half of the wire protocol: build a query document with
//! externalized variables, route it over GET or POST, and read the
//! `{data, errors}` envelope back with per-field error correlation.

pub mod request;
pub mod response;
pub mod writer;

mod error;
mod http_client;

pub use error::ClientError;
pub use http_client::GraphQLClient;
pub use request::RequestParts;
pub use response::{QueryResult, ResponseView};
pub use writer::{QueryDocument, QueryWriter, VariableEntry};
