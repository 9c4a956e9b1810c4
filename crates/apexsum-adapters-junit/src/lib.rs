//! JUnit XML test-suite decoder.
//!
//! Decodes a `<testsuite>` document into a [`ReportModel`]. Suite and case
//! attributes are parsed permissively — absent or non-numeric attributes
//! default to zero — but the document itself must be well-formed XML with a
//! `<testsuite>` root. Times arrive in seconds and are normalized to
//! milliseconds here so the rest of the pipeline deals in one unit.

use apexsum_types::{ReportModel, TestCaseResult, TestRunSummary};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Decode failures for JUnit suite documents.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JunitError {
    /// The document is not well-formed XML or has no `<testsuite>` root.
    #[error("invalid JUnit XML: {0}")]
    InvalidXml(String),
}

// ============================================================================
// Decoding
// ============================================================================

/// In-flight state for the `<testcase>` currently being read.
#[derive(Default)]
struct CaseState {
    name: String,
    classname: String,
    duration_ms: f64,
    failure_count: usize,
    messages: Vec<String>,
}

impl CaseState {
    fn finish(self) -> TestCaseResult {
        let passed = self.failure_count == 0;
        let message = self.messages.join("\n\n");
        TestCaseResult {
            test_name: format!("{}.{}", self.classname, self.name),
            class_name: self.classname,
            method_name: self.name,
            passed,
            duration_ms: self.duration_ms,
            error_message: if message.is_empty() {
                None
            } else {
                Some(message)
            },
        }
    }
}

/// In-flight state for a `<failure>` element with body text.
#[derive(Default)]
struct FailureState {
    message: Option<String>,
    body: String,
}

impl FailureState {
    /// The attribute message wins over body text when both are present.
    fn into_message(self) -> Option<String> {
        match self.message {
            Some(msg) if !msg.is_empty() => Some(msg),
            _ => {
                let body = self.body.trim();
                if body.is_empty() {
                    None
                } else {
                    Some(body.to_string())
                }
            }
        }
    }
}

/// Decode a JUnit `<testsuite>` document into a [`ReportModel`].
///
/// Summary counts come from the suite's `tests`/`failures` attributes, not
/// from counting cases; the passed count saturates at zero when the
/// attributes disagree. A `<testcase>` is failed when it contains at least
/// one `<failure>` element, message or not.
///
/// # Errors
///
/// Returns [`JunitError::InvalidXml`] on malformed XML or when no
/// `<testsuite>` root element is present.
pub fn parse_suite(text: &str) -> Result<ReportModel, JunitError> {
    let mut reader = Reader::from_str(text);

    let mut saw_suite = false;
    let mut suite_total: u32 = 0;
    let mut suite_failed: u32 = 0;
    let mut suite_time_ms: f64 = 0.0;

    let mut tests: Vec<TestCaseResult> = Vec::new();
    let mut case: Option<CaseState> = None;
    let mut failure: Option<FailureState> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| JunitError::InvalidXml(e.to_string()))?;

        match event {
            Event::Start(ref tag) => match tag.name().as_ref() {
                b"testsuite" => {
                    saw_suite = true;
                    (suite_total, suite_failed, suite_time_ms) = suite_attrs(tag);
                }
                b"testcase" => case = Some(begin_case(tag)),
                b"failure" if case.is_some() => {
                    failure = Some(FailureState {
                        message: attr(tag, b"message"),
                        body: String::new(),
                    });
                }
                _ => {}
            },
            Event::Empty(ref tag) => match tag.name().as_ref() {
                b"testsuite" => {
                    saw_suite = true;
                    (suite_total, suite_failed, suite_time_ms) = suite_attrs(tag);
                }
                b"testcase" => tests.push(begin_case(tag).finish()),
                b"failure" => {
                    if let Some(case) = case.as_mut() {
                        case.failure_count += 1;
                        let entry = FailureState {
                            message: attr(tag, b"message"),
                            body: String::new(),
                        };
                        if let Some(msg) = entry.into_message() {
                            case.messages.push(msg);
                        }
                    }
                }
                _ => {}
            },
            Event::Text(ref t) => {
                if let Some(failure) = failure.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| JunitError::InvalidXml(e.to_string()))?;
                    failure.body.push_str(&text);
                }
            }
            Event::CData(t) => {
                if let Some(failure) = failure.as_mut() {
                    let raw = t.into_inner();
                    failure.body.push_str(&String::from_utf8_lossy(&raw));
                }
            }
            Event::End(ref tag) => match tag.name().as_ref() {
                b"failure" => {
                    if let (Some(case), Some(entry)) = (case.as_mut(), failure.take()) {
                        case.failure_count += 1;
                        if let Some(msg) = entry.into_message() {
                            case.messages.push(msg);
                        }
                    }
                }
                b"testcase" => {
                    if let Some(case) = case.take() {
                        tests.push(case.finish());
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_suite {
        return Err(JunitError::InvalidXml(
            "missing <testsuite> root element".to_string(),
        ));
    }

    Ok(ReportModel {
        summary: TestRunSummary {
            total: suite_total,
            passed: suite_total.saturating_sub(suite_failed),
            failed: suite_failed,
        },
        tests,
        coverage: Default::default(),
        duration_ms: suite_time_ms,
    })
}

fn suite_attrs(tag: &BytesStart<'_>) -> (u32, u32, f64) {
    (
        parse_attr(tag, b"tests"),
        parse_attr(tag, b"failures"),
        parse_float_attr(tag, b"time") * 1000.0,
    )
}

fn begin_case(tag: &BytesStart<'_>) -> CaseState {
    CaseState {
        name: attr(tag, b"name").unwrap_or_default(),
        classname: attr(tag, b"classname").unwrap_or_default(),
        duration_ms: parse_float_attr(tag, b"time") * 1000.0,
        failure_count: 0,
        messages: Vec::new(),
    }
}

/// Read an attribute as an owned string, unescaping entities.
fn attr(tag: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    tag.try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

/// Parse an integer attribute, defaulting to zero when absent or invalid.
fn parse_attr(tag: &BytesStart<'_>, name: &[u8]) -> u32 {
    attr(tag, name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

/// Parse a float attribute, defaulting to zero when absent or invalid.
fn parse_float_attr(tag: &BytesStart<'_>, name: &[u8]) -> f64 {
    attr(tag, name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0.0)
}

// ============================================================================
// Tests
// ============================================================================


// ============================================================================
// Property-Based Tests
// ============================================================================
