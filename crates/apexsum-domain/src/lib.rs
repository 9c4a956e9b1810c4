//! Pure coverage aggregation logic for apexsum.
//!
//! This crate collapses a flat list of per-class coverage records, which
//! may mix top-level and nested classes, into one record per top-level
//! class for display. It has no side effects and depends only on the
//! data model.
//!
//! Two rollup modes exist because the two input generations disagree on
//! who aggregates:
//!
//! - [`RollupMode::Filter`]: the unified-JSON producer already supplies
//!   authoritative top-level rows, so merging again would double count;
//!   nested rows are simply discarded.
//! - [`RollupMode::Merge`]: the JUnit-paired coverage document supplies
//!   only disaggregated rows, so counts are summed by owning class here.
//!
//! The caller selects the mode based on which decode path produced the
//! data; it is never re-inferred from the records themselves.

use std::collections::HashMap;

use apexsum_types::{ClassCoverageRecord, RollupMode};

// ============================================================================
// Rollup
// ============================================================================

/// Collapse per-class coverage records into one record per top-level class.
///
/// Output order: filter mode preserves input order of the surviving rows;
/// merge mode emits groups in first-encounter order. Both are deterministic
/// so that the renderer's stable percentage sort is reproducible.
///
/// # Examples
///
/// ```
/// use apexsum_domain::rollup;
/// use apexsum_types::{ClassCoverageRecord, RollupMode};
///
/// let classes = vec![
///     ClassCoverageRecord {
///         class_name: "Outer".to_string(),
///         total_lines: 30,
///         covered_count: 20,
///         ..Default::default()
///     },
///     ClassCoverageRecord {
///         class_name: "Outer.Inner".to_string(),
///         total_lines: 10,
///         covered_count: 8,
///         ..Default::default()
///     },
/// ];
///
/// let rolled = rollup(&classes, RollupMode::Merge);
/// assert_eq!(rolled.len(), 1);
/// assert_eq!(rolled[0].class_name, "Outer");
/// assert_eq!(rolled[0].covered_count, 28);
/// assert_eq!(rolled[0].total_lines, 40);
/// ```
pub fn rollup(classes: &[ClassCoverageRecord], mode: RollupMode) -> Vec<ClassCoverageRecord> {
    match mode {
        RollupMode::Filter => filter_top_level(classes),
        RollupMode::Merge => merge_by_owner(classes),
    }
}

/// Keep producer-supplied top-level rows unmodified.
///
/// When at least one record carries an explicit `top_level` flag, exactly
/// the flagged records survive. Otherwise fall back to treating undotted
/// names as top-level and dropping every dotted name.
fn filter_top_level(classes: &[ClassCoverageRecord]) -> Vec<ClassCoverageRecord> {
    let has_flags = classes.iter().any(|cls| cls.top_level);
    classes
        .iter()
        .filter(|cls| {
            if has_flags {
                cls.top_level
            } else {
                !cls.class_name.contains('.')
            }
        })
        .cloned()
        .collect()
}

/// Owning top-level identity for a record: the explicit owner name when
/// present, else the name prefix before the first `.`, else the full name.
fn owner_name(cls: &ClassCoverageRecord) -> &str {
    if let Some(owner) = cls.top_level_class.as_deref() {
        if !owner.is_empty() {
            return owner;
        }
    }
    match cls.class_name.find('.') {
        Some(dot) => &cls.class_name[..dot],
        None => &cls.class_name,
    }
}

/// Group records by owning top-level class and sum line counts.
///
/// After summing, covered is clamped to total, then uncovered and
/// percentage are recomputed from the clamped counts.
fn merge_by_owner(classes: &[ClassCoverageRecord]) -> Vec<ClassCoverageRecord> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, (u64, u64)> = HashMap::new();

    for cls in classes {
        let owner = owner_name(cls).to_string();
        let entry = groups.entry(owner.clone()).or_insert_with(|| {
            order.push(owner);
            (0, 0)
        });
        entry.0 += cls.total_lines;
        entry.1 += cls.covered_count;
    }

    order
        .into_iter()
        .map(|name| {
            let (total, covered) = groups[&name];
            let covered = covered.min(total);
            let percentage = if total > 0 {
                covered as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            ClassCoverageRecord {
                class_name: name,
                total_lines: total,
                covered_count: covered,
                uncovered_count: total - covered,
                percentage,
                ..Default::default()
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================


// ============================================================================
// Property-Based Tests
// ============================================================================
