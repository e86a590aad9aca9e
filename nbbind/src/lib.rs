//! Expose nbbind's internals for integration tests and benchmarks. The binary
//! is the supported interface; this API may change without notice.
pub mod cli;
pub mod convert;
pub mod error;
pub mod pipeline;
pub mod snapshot;
