// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Tracing configuration.
//!
//! The server code is instrumented with Rust's `tracing` framework. Calling
//! [`init_tracing`] installs a global subscriber configured by the
//! `GRAPHWIRE_LOG` environment variable, which follows the same conventions
//! as `RUST_LOG`.

use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*};

/// Initialize the global tracing subscriber with compact console output.
/// Call once at process startup; embedding hosts that install their own
/// subscriber should skip this.
pub fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer().compact();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("GRAPHWIRE_LOG")
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
