//! Package size sources.
//!
//! The size of every original package is looked up on a remote service so
//! the generated data module can report what each swap saves.

pub mod enrich;
pub mod http;

pub use enrich::{enrich, SizeReport};
pub use http::{FetchError, HttpSizeFetcher, SizeFetcher};
