// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Shared wire-protocol model: errors, error paths, the `{data, errors}`
//! response envelope, and the request payload carried over GET/POST.

pub mod error;
pub mod path;
pub mod response;

mod operation_payload;
mod operation_type;

pub use error::{GraphQLError, Location};
pub use operation_payload::{OperationsPayload, PayloadError};
pub use operation_type::OperationType;
pub use path::{ErrorPath, PathSegment};
pub use response::{GraphQLResponse, assemble};
