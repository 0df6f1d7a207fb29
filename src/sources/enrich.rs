//! Size enrichment.
//!
//! Looks up the publish and install size of every original package so the
//! CLI can report how much a swap saves. Requests go out in fixed-size
//! windows: every request of a window runs at once, and the next window
//! starts only when the current one has fully settled.

use serde_json::{Map, Value};

use crate::core::errors::SynthError;
use crate::sources::http::{FetchError, SizeFetcher};

/// Default number of concurrent lookups.
pub const DEFAULT_WINDOW: usize = 8;

/// Default lookup service.
pub const DEFAULT_ENDPOINT: &str = "https://packagephobia.com/api.json";

/// Sizes of one original package, in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeReport {
    pub name: String,
    pub publish_size: u64,
    pub install_size: u64,
}

/// `name -> { publish, install }`, in report order.
pub fn size_table(reports: &[SizeReport]) -> Value {
    let table: Map<String, Value> = reports
        .iter()
        .map(|r| {
            (
                r.name.clone(),
                serde_json::json!({ "publish": r.publish_size, "install": r.install_size }),
            )
        })
        .collect();
    Value::Object(table)
}

/// Split names into consecutive windows of at most `window` names.
pub fn windows(names: &[String], window: usize) -> std::slice::Chunks<'_, String> {
    names.chunks(window.max(1))
}

/// Look up every name, `window` at a time.
///
/// The first failed lookup aborts the whole pipeline; nothing partial is
/// returned. Reports come back in the order of `names`.
pub fn enrich(
    names: &[String],
    fetcher: &dyn SizeFetcher,
    endpoint: &str,
    window: usize,
) -> Result<Vec<SizeReport>, SynthError> {
    let window = window.max(1);
    let total = names.len().div_ceil(window);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(window)
        .thread_name(|i| format!("shimgen-fetch-{}", i))
        .build()
        .map_err(|e| SynthError::FetchPool {
            message: e.to_string(),
        })?;

    let mut reports = Vec::with_capacity(names.len());
    for (index, batch) in windows(names, window).enumerate() {
        tracing::info!(
            "Fetching package size ({}/{}): {}",
            index + 1,
            total,
            batch.join(", ")
        );

        let settled: Vec<Result<SizeReport, SynthError>> = pool.install(|| {
            use rayon::prelude::*;
            batch
                .par_iter()
                .map(|name| fetch_size(fetcher, endpoint, name))
                .collect()
        });

        for report in settled {
            reports.push(report?);
        }
    }

    Ok(reports)
}

/// Look up one package.
pub fn fetch_size(
    fetcher: &dyn SizeFetcher,
    endpoint: &str,
    name: &str,
) -> Result<SizeReport, SynthError> {
    let body = fetcher
        .get_json(endpoint, &[("p", name)])
        .map_err(|e| match e {
            FetchError::Network(message) => SynthError::NetworkFailure {
                package: name.to_string(),
                message,
            },
            FetchError::Malformed(message) => SynthError::MalformedResponse {
                package: name.to_string(),
                message,
            },
        })?;

    let field = |key: &str| {
        body.get(key)
            .and_then(Value::as_u64)
            .ok_or_else(|| SynthError::MalformedResponse {
                package: name.to_string(),
                message: format!("missing non-negative integer `{}`", key),
            })
    };

    Ok(SizeReport {
        name: name.to_string(),
        publish_size: field("publishSize")?,
        install_size: field("installSize")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockSizeFetcher, MockSizeResponse};

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("pkg-{:02}", i)).collect()
    }

    #[test]
    fn test_windows_of_seventeen() {
        let names = names(17);
        let sizes: Vec<_> = windows(&names, 8).map(<[String]>::len).collect();
        assert_eq!(sizes, vec![8, 8, 1]);
    }

    #[test]
    fn test_windows_never_empty_size() {
        let names = names(3);
        assert_eq!(windows(&names, 0).count(), 3);
    }

    #[test]
    fn test_enrich_preserves_order() {
        let names = names(17);
        let fetcher = MockSizeFetcher::sized(|name| {
            let n: u64 = name.trim_start_matches("pkg-").parse().unwrap();
            (n * 10, n * 100)
        });

        let reports = enrich(&names, &fetcher, DEFAULT_ENDPOINT, 8).unwrap();
        let got: Vec<_> = reports.iter().map(|r| r.name.clone()).collect();
        assert_eq!(got, names);
        assert_eq!(reports[3].publish_size, 30);
        assert_eq!(reports[3].install_size, 300);
        assert_eq!(fetcher.calls().len(), 17);
    }

    #[test]
    fn test_enrich_windows_do_not_overlap() {
        let names = names(17);
        let fetcher = MockSizeFetcher::sized(|_| (1, 2)).with_delay_ms(20);

        enrich(&names, &fetcher, DEFAULT_ENDPOINT, 8).unwrap();

        assert!(fetcher.max_in_flight() <= 8);
        assert!(fetcher.max_in_flight() > 1);

        let events = fetcher.events();
        let last_end = |window: &[String]| {
            window
                .iter()
                .map(|n| events.iter().find(|e| &e.name == n).unwrap().finished)
                .max()
                .unwrap()
        };
        let first_start = |window: &[String]| {
            window
                .iter()
                .map(|n| events.iter().find(|e| &e.name == n).unwrap().started)
                .min()
                .unwrap()
        };

        let batches: Vec<&[String]> = windows(&names, 8).collect();
        assert!(last_end(batches[0]) < first_start(batches[1]));
        assert!(last_end(batches[1]) < first_start(batches[2]));
    }

    #[test]
    fn test_enrich_sends_name_as_p() {
        let names = vec!["object.assign".to_string()];
        let fetcher = MockSizeFetcher::sized(|_| (5, 6));

        enrich(&names, &fetcher, "https://example.test/api.json", 8).unwrap();
        assert_eq!(
            fetcher.calls(),
            vec!["https://example.test/api.json?p=object.assign".to_string()]
        );
    }

    #[test]
    fn test_single_failure_aborts_everything() {
        let names = names(17);
        let fetcher = MockSizeFetcher::sized(|_| (1, 1))
            .with_response("pkg-09", MockSizeResponse::NetworkError("connection reset".into()));

        let err = enrich(&names, &fetcher, DEFAULT_ENDPOINT, 8).unwrap_err();
        assert!(matches!(err, SynthError::NetworkFailure { ref package, .. } if package == "pkg-09"));

        // the third window is never dispatched
        assert!(!fetcher.calls().iter().any(|c| c.ends_with("pkg-16")));
    }

    #[test]
    fn test_non_json_body_is_malformed() {
        let names = vec!["has".to_string()];
        let fetcher = MockSizeFetcher::sized(|_| (1, 1))
            .with_response("has", MockSizeResponse::Malformed("<html>".into()));

        let err = enrich(&names, &fetcher, DEFAULT_ENDPOINT, 8).unwrap_err();
        assert!(matches!(err, SynthError::MalformedResponse { .. }));
    }

    #[test]
    fn test_missing_size_field_is_malformed() {
        let names = vec!["has".to_string()];
        let fetcher = MockSizeFetcher::sized(|_| (1, 1))
            .with_response("has", MockSizeResponse::Json(serde_json::json!({ "publishSize": 10 })));

        let err = enrich(&names, &fetcher, DEFAULT_ENDPOINT, 8).unwrap_err();
        match err {
            SynthError::MalformedResponse { package, message } => {
                assert_eq!(package, "has");
                assert!(message.contains("installSize"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_size_table_shape() {
        let table = size_table(&[
            SizeReport {
                name: "has".into(),
                publish_size: 10,
                install_size: 20,
            },
            SizeReport {
                name: "gopd".into(),
                publish_size: 1,
                install_size: 2,
            },
        ]);

        let keys: Vec<_> = table.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["has", "gopd"]);
        assert_eq!(table["has"], serde_json::json!({ "publish": 10, "install": 20 }));
    }

    #[test]
    fn test_enrich_empty() {
        let fetcher = MockSizeFetcher::sized(|_| (1, 1));
        assert!(enrich(&[], &fetcher, DEFAULT_ENDPOINT, 8).unwrap().is_empty());
    }
}
