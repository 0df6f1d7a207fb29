//! Test utilities and mocks for shimgen unit tests.
//!
//! This module provides mock implementations for the two seams that reach
//! outside the process: the size lookup service and the package installer.
//!
//! # Example
//!
//! ```rust,ignore
//! use shimgen::test_support::{MockSizeFetcher, MockSizeResponse};
//!
//! #[test]
//! fn test_example() {
//!     let fetcher = MockSizeFetcher::sized(|_| (100, 200))
//!         .with_response("has", MockSizeResponse::NetworkError("reset".into()));
//!
//!     // Pass `&fetcher` to `enrich` or `sync`...
//! }
//! ```

pub mod fixtures;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{json, Value};

use crate::core::errors::SynthError;
use crate::ops::install::Installer;
use crate::sources::http::{FetchError, SizeFetcher};

// Re-export fixtures for convenience
pub use fixtures::*;

/// Canned response for one package.
#[derive(Debug, Clone)]
pub enum MockSizeResponse {
    /// Transport failure
    NetworkError(String),
    /// Body that is not JSON
    Malformed(String),
    /// Arbitrary JSON body
    Json(Value),
}

/// Start and end of one request, as positions in a global sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchEvent {
    pub name: String,
    pub started: usize,
    pub finished: usize,
}

type SizeFn = Box<dyn Fn(&str) -> (u64, u64) + Send + Sync>;

/// Mock size lookup service.
///
/// Answers every request from a size function unless a canned response was
/// registered for the package. Records every URL it was asked for and how
/// many requests overlapped.
pub struct MockSizeFetcher {
    sizes: SizeFn,
    responses: HashMap<String, MockSizeResponse>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
    events: Mutex<Vec<FetchEvent>>,
    sequence: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockSizeFetcher {
    /// Answer every package with `sizes(name) = (publish, install)`.
    pub fn sized(sizes: impl Fn(&str) -> (u64, u64) + Send + Sync + 'static) -> Self {
        MockSizeFetcher {
            sizes: Box::new(sizes),
            responses: HashMap::new(),
            delay: None,
            calls: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
            sequence: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Hold every request open for `ms` milliseconds.
    pub fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay = Some(Duration::from_millis(ms));
        self
    }

    /// Override the answer for one package.
    pub fn with_response(mut self, name: &str, response: MockSizeResponse) -> Self {
        self.responses.insert(name.to_string(), response);
        self
    }

    /// Every requested URL, in arrival order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Every completed request.
    pub fn events(&self) -> Vec<FetchEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Highest number of requests that were open at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn respond(&self, name: &str) -> Result<Value, FetchError> {
        match self.responses.get(name) {
            Some(MockSizeResponse::NetworkError(message)) => Err(FetchError::Network(message.clone())),
            Some(MockSizeResponse::Malformed(body)) => {
                serde_json::from_str(body).map_err(|e| FetchError::Malformed(format!("invalid JSON: {}", e)))
            }
            Some(MockSizeResponse::Json(value)) => Ok(value.clone()),
            None => {
                let (publish, install) = (self.sizes)(name);
                Ok(json!({ "name": name, "publishSize": publish, "installSize": install }))
            }
        }
    }
}

impl SizeFetcher for MockSizeFetcher {
    fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, FetchError> {
        let url = url::Url::parse_with_params(endpoint, params)
            .map_err(|e| FetchError::Network(format!("invalid endpoint '{}': {}", endpoint, e)))?;
        self.calls.lock().unwrap().push(url.to_string());

        let name = params
            .iter()
            .find(|(key, _)| *key == "p")
            .map(|(_, value)| value.to_string())
            .unwrap_or_default();

        let started = self.sequence.fetch_add(1, Ordering::SeqCst);
        let open = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(open, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        let result = self.respond(&name);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let finished = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.events.lock().unwrap().push(FetchEvent {
            name,
            started,
            finished,
        });

        result
    }
}

/// Installer that records where it was run instead of spawning anything.
#[derive(Debug, Default)]
pub struct RecordingInstaller {
    runs: Mutex<Vec<PathBuf>>,
    exit_code: Option<i32>,
}

impl RecordingInstaller {
    /// An installer that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// An installer that exits with `code`.
    pub fn failing(code: i32) -> Self {
        RecordingInstaller {
            runs: Mutex::new(Vec::new()),
            exit_code: Some(code),
        }
    }

    /// Directories the installer was run in.
    pub fn runs(&self) -> Vec<PathBuf> {
        self.runs.lock().unwrap().clone()
    }
}

impl Installer for RecordingInstaller {
    fn install(&self, root: &Path) -> Result<(), SynthError> {
        self.runs.lock().unwrap().push(root.to_path_buf());
        match self.exit_code {
            Some(code) => Err(SynthError::InstallationFailure {
                command: "pnpm i".to_string(),
                code: Some(code),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_fetcher_default_body() {
        let fetcher = MockSizeFetcher::sized(|_| (3, 4));
        let body = fetcher
            .get_json("https://example.test/api.json", &[("p", "has")])
            .unwrap();

        assert_eq!(body["publishSize"], 3);
        assert_eq!(body["installSize"], 4);
        assert_eq!(fetcher.calls(), vec!["https://example.test/api.json?p=has"]);
        assert_eq!(fetcher.max_in_flight(), 1);
    }

    #[test]
    fn test_mock_fetcher_canned_failures() {
        let fetcher = MockSizeFetcher::sized(|_| (0, 0))
            .with_response("a", MockSizeResponse::NetworkError("reset".into()))
            .with_response("b", MockSizeResponse::Malformed("<html>".into()));

        assert!(matches!(
            fetcher.get_json("https://example.test/", &[("p", "a")]),
            Err(FetchError::Network(_))
        ));
        assert!(matches!(
            fetcher.get_json("https://example.test/", &[("p", "b")]),
            Err(FetchError::Malformed(_))
        ));
        assert_eq!(fetcher.events().len(), 2);
    }

    #[test]
    fn test_recording_installer() {
        let installer = RecordingInstaller::failing(3);
        let err = installer.install(Path::new("/project")).unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert_eq!(installer.runs(), vec![PathBuf::from("/project")]);
    }
}
