//! Page planning for "missing values sort last" ordering.
//!
//! A sorted page is read in two passes. The first pass walks records that
//! have a value for the sort field, in sort order. The second pass walks
//! records without one, in persisted order, and fills whatever the first pass
//! left. The offset is shared: records skipped by the offset are counted
//! against the defined records first and only the remainder spills into the
//! missing records.
//!
//! [`plan_two_pass`] computes both windows from the defined-record count so
//! storage backends only need to run two bounded scans.

/// A bounded slice of one pass: skip `offset` records, then take `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub limit: usize,
}

/// The windows to read from each pass. A `None` pass is skipped entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoPassPlan {
    pub defined: Option<Window>,
    pub missing: Option<Window>,
}

/// Plan a page of `limit` records starting at `offset` over `defined_count`
/// records with a sort value followed by the records without one.
#[must_use]
pub fn plan_two_pass(limit: usize, offset: usize, defined_count: usize) -> TwoPassPlan {
    if limit == 0 {
        return TwoPassPlan {
            defined: None,
            missing: None,
        };
    }

    let defined = (offset < defined_count).then(|| Window {
        offset,
        limit: limit.min(defined_count - offset),
    });
    let taken = defined.map_or(0, |w| w.limit);
    let missing = (taken < limit).then(|| Window {
        offset: offset.saturating_sub(defined_count),
        limit: limit - taken,
    });

    TwoPassPlan { defined, missing }
}

/// Apply a [`TwoPassPlan`] to in-memory slices.
///
/// `defined` must already be in sort order and `missing` in persisted order.
#[must_use]
pub fn page_two_pass<T: Clone>(
    defined: &[T],
    missing: &[T],
    limit: usize,
    offset: usize,
) -> Vec<T> {
    let plan = plan_two_pass(limit, offset, defined.len());
    let mut page = Vec::with_capacity(limit.min(defined.len() + missing.len()));
    if let Some(window) = plan.defined {
        page.extend(defined.iter().skip(window.offset).take(window.limit).cloned());
    }
    if let Some(window) = plan.missing {
        page.extend(missing.iter().skip(window.offset).take(window.limit).cloned());
    }
    page
}
