//! shimgen - generates the nolyfill shim packages
//!
//! This crate provides the core library functionality for shimgen:
//! package descriptors, file generation, override manifest synthesis,
//! size enrichment and the `sync` pipeline that ties them together.

pub mod builder;
pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test utilities and mocks for shimgen unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides mock implementations for the size lookup
/// service and the package installer.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    catalog::Catalog, descriptor::PackageDescriptor, errors::SynthError,
    manifest::OverrideManifest,
};

pub use util::context::GlobalContext;
