//! Orchestration layer: decode, roll up, render.
//!
//! The CLI hands this crate raw document text plus the input shape; this
//! crate picks the decoder and the rollup mode, runs the pipeline, and
//! returns the rendered markdown alongside the decoded model. All file and
//! environment I/O stays in the CLI.

use apexsum_adapters_junit::JunitError;
use apexsum_adapters_results::ResultsError;
use apexsum_domain::rollup;
use apexsum_render::render_summary;
use apexsum_types::{ReportModel, RollupMode};
use thiserror::Error;

// ============================================================================
// Requests and Results
// ============================================================================

/// One summary-generation request, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryRequest {
    /// A single unified JSON results document.
    Unified { results_text: String },
    /// A JUnit suite and/or a standalone coverage document. The two are
    /// independent; either may be absent.
    Junit {
        suite_text: Option<String>,
        coverage_text: Option<String>,
    },
}

/// The rendered report plus the model it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryResult {
    /// The rendered markdown document.
    pub markdown: String,
    /// The decoded model, with coverage classes already rolled up.
    pub model: ReportModel,
    /// The rollup mode the pipeline selected.
    pub mode: RollupMode,
}

/// Pipeline failures, all of which abort the invocation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error(transparent)]
    Results(#[from] ResultsError),

    #[error(transparent)]
    Junit(#[from] JunitError),
}

// ============================================================================
// Pipeline
// ============================================================================

/// Run the full pipeline for one request.
///
/// Unified documents carry producer-aggregated coverage rows, so they get
/// filter rollup; JUnit pairings carry disaggregated rows that need merge
/// rollup. A missing JUnit suite yields an empty model whose test sections
/// render as absent, not as an error.
///
/// # Errors
///
/// Propagates the decoder error for whichever supplied document failed to
/// parse.
pub fn generate(request: &SummaryRequest) -> Result<SummaryResult, AppError> {
    let (mut model, mode) = match request {
        SummaryRequest::Unified { results_text } => (
            apexsum_adapters_results::parse_results(results_text)?,
            RollupMode::Filter,
        ),
        SummaryRequest::Junit {
            suite_text,
            coverage_text,
        } => {
            let mut model = match suite_text.as_deref() {
                Some(text) => apexsum_adapters_junit::parse_suite(text)?,
                None => ReportModel::default(),
            };
            if let Some(text) = coverage_text.as_deref() {
                model.coverage = apexsum_adapters_results::parse_coverage(text)?;
            }
            (model, RollupMode::Merge)
        }
    };

    let classes = rollup(&model.coverage.classes, mode);
    model.coverage.classes = classes;
    let markdown = render_summary(&model, &model.coverage.classes);

    Ok(SummaryResult {
        markdown,
        model,
        mode,
    })
}

// ============================================================================
// Tests
// ============================================================================
