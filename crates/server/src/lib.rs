// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Server half of the wire protocol: walk a parsed selection tree, resolve
//! arguments, collect path-qualified errors, and assemble the `{data,
//! errors}` envelope. Document parsing is delegated to
//! `async-graphql-parser`; HTTP mechanics to the hosting framework.

pub mod dispatch;
pub mod executor;
pub mod http;
pub mod selection;

mod error;
mod logging_tracing;

pub use crate::http::{HttpResponseParts, handle};
pub use dispatch::{FieldFn, FieldTable};
pub use error::{FieldError, ServerError};
pub use executor::Executor;
pub use logging_tracing::init_tracing;
