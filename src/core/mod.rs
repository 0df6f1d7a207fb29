//! Core data structures for shimgen.
//!
//! This module contains the foundational types used throughout shimgen:
//! - Package descriptors and the catalog that holds them
//! - The override manifest and the project manifest it extends
//! - The fatal error taxonomy shared by every phase

pub mod catalog;
pub mod descriptor;
pub mod errors;
pub mod manifest;

pub use catalog::Catalog;
pub use descriptor::{
    DescriptorKind, EsShimDescriptor, ManualDescriptor, PackageDescriptor, SingleFileDescriptor,
    DEFAULT_NODE_VERSION,
};
pub use errors::SynthError;
pub use manifest::{synthesize, BaseManifest, OverrideManifest};
