//! Unified JSON test-results decoder.
//!
//! Decodes the single-document schema emitted by the test runner: one JSON
//! object carrying `tests`, `summary`, `coverage`, and timing fields. The
//! schema is permissive on purpose — any absent field defaults to its zero
//! value so older or partial result documents remain renderable — but a
//! document that is not well-formed JSON is a hard failure.

use apexsum_types::{CoverageSummary, ReportModel, TestCaseResult, TestRunSummary};
use chrono::DateTime;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Decode failures for unified-results and standalone-coverage documents.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResultsError {
    /// The results document is not well-formed JSON.
    #[error("invalid results JSON: {0}")]
    InvalidJson(String),

    /// The standalone coverage document is not well-formed JSON.
    #[error("invalid coverage JSON: {0}")]
    InvalidCoverage(String),
}

// ============================================================================
// Wire Schema
// ============================================================================

/// Top-level wire shape of a unified results document.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ResultsDoc {
    tests: Vec<TestCaseResult>,
    summary: TestRunSummary,
    coverage: CoverageSummary,
    start_time: Option<String>,
    end_time: Option<String>,
    total_duration_ms: Option<f64>,
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode a unified results document into a [`ReportModel`].
///
/// # Errors
///
/// Returns [`ResultsError::InvalidJson`] when the text is not well-formed
/// JSON. Missing fields are never an error.
///
/// # Example
///
/// ```rust
/// use apexsum_adapters_results::parse_results;
///
/// let model = parse_results(r#"{"summary": {"total": 1, "passed": 1}}"#).unwrap();
/// assert_eq!(model.summary.total, 1);
/// ```
pub fn parse_results(text: &str) -> Result<ReportModel, ResultsError> {
    let doc: ResultsDoc =
        serde_json::from_str(text).map_err(|e| ResultsError::InvalidJson(e.to_string()))?;

    let duration_ms = resolve_duration(&doc);

    Ok(ReportModel {
        summary: doc.summary,
        tests: doc.tests,
        coverage: doc.coverage,
        duration_ms,
    })
}

/// Decode a standalone coverage document (the `coverage` object on its own).
///
/// # Errors
///
/// Returns [`ResultsError::InvalidCoverage`] when the text is not
/// well-formed JSON.
pub fn parse_coverage(text: &str) -> Result<CoverageSummary, ResultsError> {
    serde_json::from_str(text).map_err(|e| ResultsError::InvalidCoverage(e.to_string()))
}

/// Pick the run duration from the richest timing source available.
///
/// Precedence: an explicit positive `totalDurationMs`, then the span
/// between RFC 3339 `startTime`/`endTime` when both parse and the span is
/// non-negative, then the sum of per-test durations.
fn resolve_duration(doc: &ResultsDoc) -> f64 {
    if let Some(total) = doc.total_duration_ms {
        if total > 0.0 {
            return total;
        }
    }

    if let (Some(start), Some(end)) = (doc.start_time.as_deref(), doc.end_time.as_deref()) {
        if let (Ok(start), Ok(end)) = (
            DateTime::parse_from_rfc3339(start),
            DateTime::parse_from_rfc3339(end),
        ) {
            let span_ms = (end - start).num_milliseconds();
            if span_ms >= 0 {
                return span_ms as f64;
            }
        }
    }

    doc.tests.iter().map(|t| t.duration_ms).sum()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_DOC: &str = r#"{
        "tests": [
            {
                "testName": "Alpha.testOne",
                "className": "Alpha",
                "methodName": "testOne",
                "passed": true,
                "durationMs": 120.5
            },
            {
                "testName": "Beta.testTwo",
                "className": "Beta",
                "methodName": "testTwo",
                "passed": false,
                "durationMs": 42.0,
                "errorMessage": "System.AssertException: expected 1"
            }
        ],
        "summary": {"total": 2, "passed": 1, "failed": 1},
        "coverage": {
            "classes": [
                {
                    "className": "Alpha",
                    "totalLines": 40,
                    "coveredCount": 28,
                    "uncoveredCount": 12,
                    "percentage": 70.0,
                    "topLevel": true
                }
            ],
            "overallCoverage": 70.0,
            "totalLines": 40,
            "coveredLines": 28,
            "uncoveredLines": 12
        },
        "totalDurationMs": 1650.0
    }"#;

    // ========================================================================
    // parse_results
    // ========================================================================

    #[test]
    fn test_full_document_decodes() {
        let model = parse_results(FULL_DOC).unwrap();

        assert_eq!(model.summary.total, 2);
        assert_eq!(model.summary.passed, 1);
        assert_eq!(model.summary.failed, 1);

        assert_eq!(model.tests.len(), 2);
        assert_eq!(model.tests[0].qualified_name(), "Alpha.testOne");
        assert!(model.tests[0].passed);
        assert!(!model.tests[1].passed);
        assert_eq!(
            model.tests[1].error_message.as_deref(),
            Some("System.AssertException: expected 1")
        );

        assert_eq!(model.coverage.classes.len(), 1);
        assert_eq!(model.coverage.classes[0].class_name, "Alpha");
        assert!(model.coverage.classes[0].top_level);
        assert_eq!(model.coverage.overall_coverage, 70.0);

        assert_eq!(model.duration_ms, 1650.0);
    }

    #[test]
    fn test_empty_object_decodes_to_default_model() {
        let model = parse_results("{}").unwrap();
        assert_eq!(model, ReportModel::default());
    }

    #[test]
    fn test_missing_fields_default() {
        let model = parse_results(r#"{"tests": [{"className": "Alpha"}]}"#).unwrap();
        assert_eq!(model.tests.len(), 1);
        assert_eq!(model.tests[0].method_name, "");
        assert!(!model.tests[0].passed);
        assert_eq!(model.summary.total, 0);
        assert_eq!(model.coverage.total_lines, 0);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = parse_results("{not json").unwrap_err();
        assert!(matches!(err, ResultsError::InvalidJson(_)));
    }

    #[test]
    fn test_non_object_root_is_an_error() {
        assert!(parse_results("[]").is_err());
        assert!(parse_results("42").is_err());
    }

    // ========================================================================
    // Duration resolution
    // ========================================================================

    #[test]
    fn test_explicit_total_duration_wins() {
        let doc = r#"{
            "tests": [{"durationMs": 5.0}],
            "startTime": "2026-08-01T10:00:00Z",
            "endTime": "2026-08-01T10:01:00Z",
            "totalDurationMs": 1234.0
        }"#;
        assert_eq!(parse_results(doc).unwrap().duration_ms, 1234.0);
    }

    #[test]
    fn test_timestamps_used_when_total_absent() {
        let doc = r#"{
            "tests": [{"durationMs": 5.0}],
            "startTime": "2026-08-01T10:00:00Z",
            "endTime": "2026-08-01T10:01:30Z"
        }"#;
        assert_eq!(parse_results(doc).unwrap().duration_ms, 90_000.0);
    }

    #[test]
    fn test_timestamps_used_when_total_is_zero() {
        let doc = r#"{
            "startTime": "2026-08-01T10:00:00Z",
            "endTime": "2026-08-01T10:00:02Z",
            "totalDurationMs": 0.0
        }"#;
        assert_eq!(parse_results(doc).unwrap().duration_ms, 2000.0);
    }

    #[test]
    fn test_sum_of_tests_when_no_timing_fields() {
        let doc = r#"{"tests": [{"durationMs": 5.0}, {"durationMs": 7.5}]}"#;
        assert_eq!(parse_results(doc).unwrap().duration_ms, 12.5);
    }

    #[test]
    fn test_sum_fallback_when_timestamps_unparseable() {
        let doc = r#"{
            "tests": [{"durationMs": 3.0}],
            "startTime": "yesterday",
            "endTime": "today"
        }"#;
        assert_eq!(parse_results(doc).unwrap().duration_ms, 3.0);
    }

    #[test]
    fn test_sum_fallback_when_span_negative() {
        let doc = r#"{
            "tests": [{"durationMs": 3.0}],
            "startTime": "2026-08-01T10:01:00Z",
            "endTime": "2026-08-01T10:00:00Z"
        }"#;
        assert_eq!(parse_results(doc).unwrap().duration_ms, 3.0);
    }

    // ========================================================================
    // parse_coverage
    // ========================================================================

    #[test]
    fn test_standalone_coverage_decodes() {
        let doc = r#"{
            "classes": [
                {"className": "Outer.Inner", "totalLines": 10, "coveredCount": 8}
            ],
            "overallCoverage": 80.0,
            "totalLines": 10,
            "coveredLines": 8,
            "uncoveredLines": 2
        }"#;
        let cov = parse_coverage(doc).unwrap();
        assert_eq!(cov.classes.len(), 1);
        assert_eq!(cov.classes[0].class_name, "Outer.Inner");
        assert_eq!(cov.overall_coverage, 80.0);
    }

    #[test]
    fn test_empty_coverage_object_decodes() {
        let cov = parse_coverage("{}").unwrap();
        assert!(cov.classes.is_empty());
        assert_eq!(cov.total_lines, 0);
    }

    #[test]
    fn test_malformed_coverage_is_distinct_error() {
        let err = parse_coverage("not json").unwrap_err();
        assert!(matches!(err, ResultsError::InvalidCoverage(_)));
        assert!(err.to_string().starts_with("invalid coverage JSON"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
