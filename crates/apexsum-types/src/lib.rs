//! Core types and DTOs for apexsum.
//!
//! This crate defines the internal report model shared by the decoders,
//! the coverage aggregator, and the renderer. The serde attributes match
//! the wire schema of the existing producers field-for-field; every field
//! defaults when absent so that older or partial result documents remain
//! renderable.

use serde::{Deserialize, Serialize};

// ============================================================================
// Enums
// ============================================================================

/// How per-class coverage rows are collapsed to top-level classes.
///
/// The decode path picks the mode: the unified JSON producer supplies
/// pre-aggregated top-level rows (`Filter`), while the JUnit pairing
/// supplies only disaggregated rows that must be summed (`Merge`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollupMode {
    /// Keep producer-supplied top-level rows as-is; never merge counts.
    Filter,
    /// Group by owning top-level class and sum line counts.
    Merge,
}

impl RollupMode {
    /// String representation used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            RollupMode::Filter => "filter",
            RollupMode::Merge => "merge",
        }
    }
}

/// Severity tier for a coverage percentage.
///
/// Exactly four tiers with boundaries inclusive on the lower bound:
/// >= 80 good, >= 60 fair, >= 40 poor, else critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageTier {
    Good,
    Fair,
    Poor,
    Critical,
}

impl CoverageTier {
    /// Classify a coverage percentage into its tier.
    pub fn for_percentage(pct: f64) -> Self {
        if pct >= 80.0 {
            CoverageTier::Good
        } else if pct >= 60.0 {
            CoverageTier::Fair
        } else if pct >= 40.0 {
            CoverageTier::Poor
        } else {
            CoverageTier::Critical
        }
    }

    /// The glyph rendered next to coverage figures.
    pub fn glyph(&self) -> &'static str {
        match self {
            CoverageTier::Good => "🟢",
            CoverageTier::Fair => "🟡",
            CoverageTier::Poor => "🟠",
            CoverageTier::Critical => "🔴",
        }
    }

    /// Human-readable tier label.
    pub fn label(&self) -> &'static str {
        match self {
            CoverageTier::Good => "good",
            CoverageTier::Fair => "fair",
            CoverageTier::Poor => "poor",
            CoverageTier::Critical => "critical",
        }
    }
}

// ============================================================================
// Structs
// ============================================================================

/// One executed test method.
///
/// Constructed once during decoding and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestCaseResult {
    /// Fully qualified test name (e.g. `AccountServiceTest.testInsert`).
    pub test_name: String,
    /// Owning test class name.
    pub class_name: String,
    /// Test method name.
    pub method_name: String,
    /// Whether the test passed.
    pub passed: bool,
    /// Execution duration in milliseconds.
    pub duration_ms: f64,
    /// Error message, present only when the test failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl TestCaseResult {
    /// `ClassName.MethodName` as displayed in the report.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.class_name, self.method_name)
    }
}

/// Aggregate counts for a run, taken from the producer verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestRunSummary {
    /// Total number of tests executed.
    pub total: u32,
    /// Number of passing tests.
    pub passed: u32,
    /// Number of failing tests. Nonzero iff the run failed overall.
    pub failed: u32,
}

/// Coverage for one class, top-level or nested.
///
/// A dotted `class_name` (e.g. `Outer.Inner`) denotes nesting. The
/// `top_level` flag and `top_level_class` owner name are optional producer
/// metadata; legacy records carry neither.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassCoverageRecord {
    /// Class name, possibly dotted for nested classes.
    pub class_name: String,
    /// Covered line numbers, when the producer supplies them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub covered_lines: Vec<u32>,
    /// Uncovered line numbers, when the producer supplies them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub uncovered_lines: Vec<u32>,
    /// Total coverable lines.
    pub total_lines: u64,
    /// Covered line count. Invariant: never exceeds `total_lines`.
    pub covered_count: u64,
    /// Uncovered line count (`total_lines - covered_count`).
    pub uncovered_count: u64,
    /// Coverage percentage, 0 when `total_lines` is 0.
    pub percentage: f64,
    /// Explicit top-level marker, when the producer supplies one.
    #[serde(skip_serializing_if = "is_false")]
    pub top_level: bool,
    /// Explicit owning top-level class name, when supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_level_class: Option<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Run-wide coverage aggregate.
///
/// The overall figures are supplied directly by the producer and are never
/// recomputed from `classes`; the two may legitimately disagree when the
/// producer weights overall coverage differently.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverageSummary {
    /// Per-class coverage records in producer order.
    pub classes: Vec<ClassCoverageRecord>,
    /// Overall coverage percentage, verbatim from the producer.
    pub overall_coverage: f64,
    /// Overall coverable line count.
    pub total_lines: u64,
    /// Overall covered line count.
    pub covered_lines: u64,
    /// Overall uncovered line count.
    pub uncovered_lines: u64,
}

/// The unified view the renderer consumes.
///
/// Constructed fresh per invocation from decoded input; never shared or
/// mutated across invocations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportModel {
    /// Aggregate pass/fail counts.
    pub summary: TestRunSummary,
    /// Every executed test in input order.
    pub tests: Vec<TestCaseResult>,
    /// Run-wide coverage, possibly empty when no coverage input was given.
    pub coverage: CoverageSummary,
    /// Total run duration in milliseconds.
    pub duration_ms: f64,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries_inclusive_on_lower_bound() {
        assert_eq!(CoverageTier::for_percentage(80.0), CoverageTier::Good);
        assert_eq!(CoverageTier::for_percentage(79.9), CoverageTier::Fair);
        assert_eq!(CoverageTier::for_percentage(60.0), CoverageTier::Fair);
        assert_eq!(CoverageTier::for_percentage(59.9), CoverageTier::Poor);
        assert_eq!(CoverageTier::for_percentage(40.0), CoverageTier::Poor);
        assert_eq!(CoverageTier::for_percentage(39.9), CoverageTier::Critical);
        assert_eq!(CoverageTier::for_percentage(100.0), CoverageTier::Good);
        assert_eq!(CoverageTier::for_percentage(0.0), CoverageTier::Critical);
    }

    #[test]
    fn test_tier_glyphs_and_labels() {
        assert_eq!(CoverageTier::Good.glyph(), "🟢");
        assert_eq!(CoverageTier::Fair.glyph(), "🟡");
        assert_eq!(CoverageTier::Poor.glyph(), "🟠");
        assert_eq!(CoverageTier::Critical.glyph(), "🔴");
        assert_eq!(CoverageTier::Good.label(), "good");
        assert_eq!(CoverageTier::Critical.label(), "critical");
    }

    #[test]
    fn test_rollup_mode_as_str() {
        assert_eq!(RollupMode::Filter.as_str(), "filter");
        assert_eq!(RollupMode::Merge.as_str(), "merge");
    }

    #[test]
    fn test_test_case_qualified_name() {
        let tc = TestCaseResult {
            class_name: "AccountServiceTest".to_string(),
            method_name: "testInsert".to_string(),
            ..Default::default()
        };
        assert_eq!(tc.qualified_name(), "AccountServiceTest.testInsert");
    }

    #[test]
    fn test_test_case_wire_names() {
        let json = r#"{
            "testName": "Alpha.testOne",
            "className": "Alpha",
            "methodName": "testOne",
            "passed": true,
            "durationMs": 120.5
        }"#;
        let tc: TestCaseResult = serde_json::from_str(json).unwrap();
        assert_eq!(tc.test_name, "Alpha.testOne");
        assert_eq!(tc.class_name, "Alpha");
        assert_eq!(tc.method_name, "testOne");
        assert!(tc.passed);
        assert_eq!(tc.duration_ms, 120.5);
        assert!(tc.error_message.is_none());
    }

    #[test]
    fn test_test_case_missing_fields_default() {
        let tc: TestCaseResult = serde_json::from_str("{}").unwrap();
        assert_eq!(tc.test_name, "");
        assert!(!tc.passed);
        assert_eq!(tc.duration_ms, 0.0);
        assert!(tc.error_message.is_none());
    }

    #[test]
    fn test_class_record_wire_names() {
        let json = r#"{
            "className": "Outer.Inner",
            "uncoveredLines": [3, 7],
            "totalLines": 10,
            "coveredCount": 8,
            "uncoveredCount": 2,
            "percentage": 80.0,
            "topLevel": false,
            "topLevelClass": "Outer"
        }"#;
        let cls: ClassCoverageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(cls.class_name, "Outer.Inner");
        assert_eq!(cls.uncovered_lines, vec![3, 7]);
        assert_eq!(cls.total_lines, 10);
        assert_eq!(cls.covered_count, 8);
        assert!(!cls.top_level);
        assert_eq!(cls.top_level_class.as_deref(), Some("Outer"));
    }

    #[test]
    fn test_class_record_legacy_fields_default() {
        // Legacy records carry no topLevel metadata and no line arrays.
        let cls: ClassCoverageRecord =
            serde_json::from_str(r#"{"className": "Gamma", "totalLines": 10}"#).unwrap();
        assert!(!cls.top_level);
        assert!(cls.top_level_class.is_none());
        assert!(cls.covered_lines.is_empty());
        assert_eq!(cls.percentage, 0.0);
    }

    #[test]
    fn test_class_record_optional_fields_not_serialized() {
        let cls = ClassCoverageRecord {
            class_name: "Gamma".to_string(),
            total_lines: 10,
            ..Default::default()
        };
        let json = serde_json::to_string(&cls).unwrap();
        assert!(!json.contains("topLevel"));
        assert!(!json.contains("topLevelClass"));
        assert!(!json.contains("coveredLines"));
    }

    #[test]
    fn test_coverage_summary_wire_names() {
        let json = r#"{
            "classes": [{"className": "Alpha"}],
            "overallCoverage": 75.1234,
            "totalLines": 40,
            "coveredLines": 30,
            "uncoveredLines": 10
        }"#;
        let cov: CoverageSummary = serde_json::from_str(json).unwrap();
        assert_eq!(cov.classes.len(), 1);
        assert_eq!(cov.overall_coverage, 75.1234);
        assert_eq!(cov.total_lines, 40);
        assert_eq!(cov.covered_lines, 30);
        assert_eq!(cov.uncovered_lines, 10);
    }

    #[test]
    fn test_coverage_summary_empty_document() {
        let cov: CoverageSummary = serde_json::from_str("{}").unwrap();
        assert!(cov.classes.is_empty());
        assert_eq!(cov.total_lines, 0);
    }

    #[test]
    fn test_run_summary_roundtrip() {
        let summary = TestRunSummary {
            total: 5,
            passed: 4,
            failed: 1,
        };
        let json = serde_json::to_string(&summary).unwrap();
        let parsed: TestRunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary, parsed);
    }

    #[test]
    fn test_report_model_default_is_empty() {
        let model = ReportModel::default();
        assert_eq!(model.summary.total, 0);
        assert!(model.tests.is_empty());
        assert_eq!(model.coverage.total_lines, 0);
        assert_eq!(model.duration_ms, 0.0);
    }
}
