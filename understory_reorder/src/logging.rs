// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logging shims.
//!
//! With the `tracing` feature the macros below are `tracing`'s own, renamed;
//! without it they expand to nothing. The `log_` prefix keeps them clear of
//! the built-in `warn` lint attribute.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug as log_debug, trace as log_trace, warn as log_warn};

#[cfg(not(feature = "tracing"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use {log_debug, log_trace, log_warn};
