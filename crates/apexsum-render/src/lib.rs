//! Markdown rendering for apexsum reports.
//!
//! This crate converts a [`ReportModel`] plus the rolled-up per-class
//! coverage into the final job-summary document. Sections appear in a
//! fixed order and each is gated on data availability: a section with
//! unmet preconditions is omitted entirely, never emitted empty.
//!
//! # Example
//!
//! ```rust
//! use apexsum_render::render_summary;
//! use apexsum_types::ReportModel;
//!
//! let model = ReportModel::default();
//! let markdown = render_summary(&model, &[]);
//! assert!(markdown.starts_with("# "));
//! ```

use std::cmp::Ordering;

use apexsum_types::{ClassCoverageRecord, CoverageTier, ReportModel, TestCaseResult};

/// Width of the run-wide coverage bar chart.
pub const OVERVIEW_BAR_WIDTH: usize = 50;

/// Width of the per-class mini bar.
pub const CLASS_BAR_WIDTH: usize = 10;

/// Number of rows in the slowest-tests ranking.
pub const MAX_SLOWEST_TESTS: usize = 10;

// ============================================================================
// Formatting Helpers
// ============================================================================

/// Format a millisecond duration for display.
///
/// Below one second: whole milliseconds. Below one minute: seconds to two
/// decimals. Otherwise minutes plus seconds to one decimal.
///
/// # Examples
///
/// ```
/// use apexsum_render::format_duration_ms;
///
/// assert_eq!(format_duration_ms(250.0), "250ms");
/// assert_eq!(format_duration_ms(1500.0), "1.50s");
/// assert_eq!(format_duration_ms(90_500.0), "1m 30.5s");
/// ```
pub fn format_duration_ms(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{:.0}ms", ms)
    } else if ms < 60_000.0 {
        format!("{:.2}s", ms / 1000.0)
    } else {
        let seconds = ms / 1000.0;
        let minutes = (seconds / 60.0) as u64;
        let secs = seconds - (minutes * 60) as f64;
        format!("{}m {:.1}s", minutes, secs)
    }
}

/// Number of filled cells for a proportional bar.
///
/// Round half up, then clamp into `[0, width]` so out-of-range
/// percentages still render a valid bar.
pub fn bar_fill(percentage: f64, width: usize) -> usize {
    let filled = (percentage / 100.0 * width as f64).round();
    filled.clamp(0.0, width as f64) as usize
}

/// Render a proportional bar of filled/empty glyphs at the given width.
pub fn coverage_bar(percentage: f64, width: usize) -> String {
    let filled = bar_fill(percentage, width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Pass/fail glyph for a single test.
fn test_glyph(test: &TestCaseResult) -> &'static str {
    if test.passed {
        "✅"
    } else {
        "❌"
    }
}

// ============================================================================
// Summary Rendering
// ============================================================================

/// Render the full job-summary document.
///
/// `classes` is the aggregator's rolled-up output; the model's own class
/// list is not consulted so decoding and display stay decoupled. The
/// model's overall coverage figures are rendered verbatim, never
/// recomputed from `classes`.
pub fn render_summary(model: &ReportModel, classes: &[ClassCoverageRecord]) -> String {
    let mut out = String::new();

    render_header(&mut out, model);
    render_summary_table(&mut out, model);
    render_coverage_overview(&mut out, model, classes);
    render_failed_tests(&mut out, model);
    render_slowest_tests(&mut out, model);
    render_all_tests(&mut out, model);

    out
}

fn render_header(out: &mut String, model: &ReportModel) {
    let all_passed = model.summary.failed == 0;
    let (glyph, text) = if all_passed {
        ("✅", "All Tests Passed")
    } else {
        ("❌", "Some Tests Failed")
    };
    out.push_str(&format!("# {} Apex Test Results: {}\n\n", glyph, text));
}

fn render_summary_table(out: &mut String, model: &ReportModel) {
    let summary = &model.summary;
    if summary.total == 0 {
        return;
    }

    out.push_str("## 📊 Test Summary\n\n");
    out.push_str("| Metric | Value |\n");
    out.push_str("|--------|-------|\n");
    out.push_str(&format!("| Total Tests | **{}** |\n", summary.total));
    out.push_str(&format!("| ✅ Passed | **{}** |\n", summary.passed));
    out.push_str(&format!("| ❌ Failed | **{}** |\n", summary.failed));
    out.push_str(&format!(
        "| ⏱️ Duration | **{}** |\n",
        format_duration_ms(model.duration_ms)
    ));

    if model.coverage.total_lines > 0 {
        let pct = model.coverage.overall_coverage;
        let tier = CoverageTier::for_percentage(pct);
        out.push_str(&format!(
            "| {} Code Coverage | **{:.2}%** |\n",
            tier.glyph(),
            pct
        ));
        out.push_str(&format!(
            "| Lines Covered | **{}** / **{}** |\n",
            model.coverage.covered_lines, model.coverage.total_lines
        ));
    }

    out.push('\n');
}

fn render_coverage_overview(out: &mut String, model: &ReportModel, classes: &[ClassCoverageRecord]) {
    if model.coverage.total_lines == 0 {
        return;
    }

    let pct = model.coverage.overall_coverage;
    out.push_str("## 📈 Coverage Overview\n\n");
    out.push_str(&format!(
        "```\nCoverage: {:.2}% [{}]\n```\n\n",
        pct,
        coverage_bar(pct, OVERVIEW_BAR_WIDTH)
    ));

    if classes.is_empty() {
        return;
    }

    out.push_str("### Coverage by Class\n\n");
    out.push_str("<details>\n");
    out.push_str(&format!("<summary>View {} classes</summary>\n\n", classes.len()));
    out.push_str("| Class | Coverage | Lines Covered |\n");
    out.push_str("|-------|----------|---------------|\n");

    // Stable sort: equal percentages keep their rollup order.
    let mut sorted: Vec<&ClassCoverageRecord> = classes.iter().collect();
    sorted.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(Ordering::Equal)
    });

    for cls in sorted {
        let tier = CoverageTier::for_percentage(cls.percentage);
        out.push_str(&format!(
            "| `{}` | {} {:.1}% `{}` | {} / {} |\n",
            cls.class_name,
            tier.glyph(),
            cls.percentage,
            coverage_bar(cls.percentage, CLASS_BAR_WIDTH),
            cls.covered_count,
            cls.total_lines
        ));
    }

    out.push_str("\n</details>\n\n");
}

fn render_failed_tests(out: &mut String, model: &ReportModel) {
    if model.summary.failed == 0 {
        return;
    }

    out.push_str("## ❌ Failed Tests\n\n");
    for test in model.tests.iter().filter(|t| !t.passed) {
        out.push_str(&format!("### {}\n\n", test.qualified_name()));
        if let Some(message) = test.error_message.as_deref() {
            if !message.is_empty() {
                out.push_str(&format!("```\n{}\n```\n\n", message));
            }
        }
    }
}

fn render_slowest_tests(out: &mut String, model: &ReportModel) {
    if model.tests.is_empty() {
        return;
    }

    out.push_str("## ⏱️ Test Performance\n\n");

    // Stable sort keeps input order for equal durations.
    let mut sorted: Vec<&TestCaseResult> = model.tests.iter().collect();
    sorted.sort_by(|a, b| {
        b.duration_ms
            .partial_cmp(&a.duration_ms)
            .unwrap_or(Ordering::Equal)
    });

    out.push_str("<details>\n");
    out.push_str("<summary>Top 10 Slowest Tests</summary>\n\n");
    out.push_str("| Test | Duration |\n");
    out.push_str("|------|----------|\n");

    for test in sorted.iter().take(MAX_SLOWEST_TESTS) {
        out.push_str(&format!(
            "| {} `{}` | {} |\n",
            test_glyph(test),
            test.qualified_name(),
            format_duration_ms(test.duration_ms)
        ));
    }

    out.push_str("\n</details>\n\n");
}

fn render_all_tests(out: &mut String, model: &ReportModel) {
    if model.tests.is_empty() {
        return;
    }

    out.push_str("## 📋 All Tests\n\n");
    out.push_str("<details>\n");
    out.push_str(&format!("<summary>View all {} tests</summary>\n\n", model.tests.len()));
    out.push_str("| Status | Test | Duration |\n");
    out.push_str("|--------|------|----------|\n");

    for test in &model.tests {
        out.push_str(&format!(
            "| {} | `{}` | {} |\n",
            test_glyph(test),
            test.qualified_name(),
            format_duration_ms(test.duration_ms)
        ));
    }

    out.push_str("\n</details>\n\n");
}

// ============================================================================
// Tests
// ============================================================================


// ============================================================================
// Property-Based Tests
// ============================================================================
