//! High-level operations.
//!
//! This module contains the implementation of shimgen commands.

pub mod aggregate;
pub mod install;
pub mod sync;

pub use aggregate::render_data_module;
pub use install::{Installer, ProcessInstaller};
pub use sync::{generate_packages, overrides, prepare, sync, SyncOptions, SyncReport};
