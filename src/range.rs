//! Row range expressions.
//!
//! A range expression is a comma separated list of terms:
//!
//! ```text
//! 3        row 3 only
//! 10-20    rows 10 through 20, inclusive
//! 8-       row 8 and every row after it
//! ```
//!
//! Terms may overlap and may come in any order; the resulting [`RangeSet`]
//! is their union. Parsing normalizes the terms into sorted, disjoint spans,
//! so `"3-,0"` and `"0,3-,4"` produce equal sets.
//!
//! An empty expression parses to the empty set, which contains nothing.
//! [`RowFilter`] treats an empty set as "no filter" (see its docs).

use crate::error::{CsvToolError, Result};
use std::fmt;
use std::str::FromStr;

/// Inclusive span of row indices; `end == None` is open ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: u64,
    end: Option<u64>,
}

impl Span {
    fn covers(&self, n: u64) -> bool {
        n >= self.start && self.end.is_none_or(|end| n <= end)
    }

    /// Can `next` (which starts at or after `self`) be merged into `self`?
    fn touches(&self, next: &Span) -> bool {
        match self.end {
            None => true,
            Some(end) => next.start <= end.saturating_add(1),
        }
    }
}

/// Parsed membership predicate over 0-based row indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    spans: Vec<Span>,
}

impl RangeSet {
    /// The set that contains nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a range expression.
    ///
    /// # Example
    /// ```
    /// use csvtool::RangeSet;
    ///
    /// let set = RangeSet::parse("0,3-").unwrap();
    /// assert!(set.contains(0));
    /// assert!(!set.contains(2));
    /// assert!(set.contains(1_000));
    /// ```
    pub fn parse(expr: &str) -> Result<Self> {
        let mut spans = Vec::new();
        for term in expr.split(',') {
            let term = term.trim();
            if term.is_empty() {
                continue;
            }
            spans.push(parse_term(term)?);
        }
        Ok(Self::normalized(spans))
    }

    fn normalized(mut spans: Vec<Span>) -> Self {
        spans.sort_by_key(|s| (s.start, s.end.unwrap_or(u64::MAX)));

        let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
        for span in spans {
            match merged.last_mut() {
                Some(last) if last.touches(&span) => {
                    last.end = match (last.end, span.end) {
                        (Some(a), Some(b)) => Some(a.max(b)),
                        _ => None,
                    };
                }
                _ => merged.push(span),
            }
        }
        Self { spans: merged }
    }

    /// Is `n` matched by any term?
    pub fn contains(&self, n: u64) -> bool {
        // Spans are sorted and disjoint: only the last span starting at or
        // before `n` can cover it.
        let idx = self.spans.partition_point(|s| s.start <= n);
        idx > 0 && self.spans[idx - 1].covers(n)
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

impl FromStr for RangeSet {
    type Err = CsvToolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            match span.end {
                Some(end) if end == span.start => write!(f, "{}", span.start)?,
                Some(end) => write!(f, "{}-{}", span.start, end)?,
                None => write!(f, "{}-", span.start)?,
            }
        }
        Ok(())
    }
}

fn malformed(term: &str, reason: &str) -> CsvToolError {
    CsvToolError::MalformedRange {
        term: term.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bound(term: &str, text: &str) -> Result<u64> {
    let text = text.trim();
    if text.starts_with('-') {
        return Err(malformed(term, "bounds must be non-negative"));
    }
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(term, "bound is not a non-negative integer"));
    }
    text.parse()
        .map_err(|_| malformed(term, "bound is not a non-negative integer"))
}

/// Parse one term: `n`, `a-b` or `a-`.
fn parse_term(term: &str) -> Result<Span> {
    let Some((lower, upper)) = term.split_once('-') else {
        let n = parse_bound(term, term)?;
        return Ok(Span {
            start: n,
            end: Some(n),
        });
    };

    if lower.trim().is_empty() {
        return Err(malformed(
            term,
            "missing lower bound (bounds must be non-negative)",
        ));
    }
    if upper.contains('-') {
        return Err(malformed(term, "expected 'n', 'a-b' or 'a-'"));
    }

    let start = parse_bound(term, lower)?;
    if upper.trim().is_empty() {
        return Ok(Span { start, end: None });
    }

    let end = parse_bound(term, upper)?;
    if start > end {
        return Err(malformed(term, "lower bound exceeds upper bound"));
    }
    Ok(Span {
        start,
        end: Some(end),
    })
}

/// Row retention decision: a [`RangeSet`] plus the invert flag.
///
/// An empty set means no filter was given. The filter is then bypassed and
/// every row is kept, with or without `invert`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    ranges: RangeSet,
    invert: bool,
}

impl RowFilter {
    pub fn new(ranges: RangeSet, invert: bool) -> Self {
        Self { ranges, invert }
    }

    /// Keep every row.
    pub fn pass_all() -> Self {
        Self::default()
    }

    /// Build from an optional expression, as supplied on the command line.
    pub fn from_expr(expr: Option<&str>, invert: bool) -> Result<Self> {
        let ranges = match expr {
            Some(expr) => RangeSet::parse(expr)?,
            None => RangeSet::empty(),
        };
        Ok(Self::new(ranges, invert))
    }

    pub fn keeps(&self, row: u64) -> bool {
        if self.ranges.is_empty() {
            return true;
        }
        self.ranges.contains(row) != self.invert
    }

    pub fn is_bypassed(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &RangeSet {
        &self.ranges
    }

    pub fn invert(&self) -> bool {
        self.invert
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn members(set: &RangeSet, upto: u64) -> Vec<u64> {
        (0..upto).filter(|&n| set.contains(n)).collect()
    }

    fn kept(filter: &RowFilter, upto: u64) -> Vec<u64> {
        (0..upto).filter(|&n| filter.keeps(n)).collect()
    }

    #[test]
    fn test_single_value() {
        let set = RangeSet::parse("3").unwrap();
        assert_eq!(members(&set, 10), vec![3]);
    }

    #[test]
    fn test_bounded_range() {
        let set = RangeSet::parse("2-4").unwrap();
        assert_eq!(members(&set, 10), vec![2, 3, 4]);
    }

    #[test]
    fn test_open_range() {
        let set = RangeSet::parse("8-").unwrap();
        assert_eq!(members(&set, 10), vec![8, 9]);
        assert!(set.contains(u64::MAX));
    }

    #[test]
    fn test_mixed_terms() {
        let set = RangeSet::parse("0,2-4,8-").unwrap();
        assert_eq!(members(&set, 10), vec![0, 2, 3, 4, 8, 9]);
    }

    #[test]
    fn test_whitespace_and_empty_terms() {
        let set = RangeSet::parse(" 1 , ,3- 4,").unwrap();
        assert_eq!(members(&set, 10), vec![1, 3, 4]);
    }

    #[test]
    fn test_empty_expression_matches_nothing() {
        let set = RangeSet::parse("").unwrap();
        assert!(set.is_empty());
        assert!(!set.contains(0));
        assert_eq!(set, RangeSet::empty());
    }

    #[test]
    fn test_normalization_merges() {
        assert_eq!(RangeSet::parse("0,1").unwrap().to_string(), "0-1");
        assert_eq!(
            RangeSet::parse("4,0-4,6,8,10-").unwrap().to_string(),
            "0-4,6,8,10-"
        );
        assert_eq!(
            RangeSet::parse("0-4,6-8,7-11,10-").unwrap().to_string(),
            "0-4,6-"
        );
        assert_eq!(RangeSet::parse("5-,2-").unwrap().to_string(), "2-");
    }

    #[test]
    fn test_lower_exceeds_upper() {
        let err = RangeSet::parse("3-1").unwrap_err();
        match err {
            CsvToolError::MalformedRange { term, reason } => {
                assert_eq!(term, "3-1");
                assert!(reason.contains("exceeds"), "Got: {reason}");
            }
            other => panic!("Expected MalformedRange, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_terms() {
        for expr in [
            "-3", "x", "1-x", "1-2-3", "0,-", "1.5", "--1", "+3", "1-+5", "+0-",
        ] {
            let result = RangeSet::parse(expr);
            assert!(
                matches!(result, Err(CsvToolError::MalformedRange { .. })),
                "Expected MalformedRange for '{expr}', got {result:?}"
            );
        }
    }

    #[test]
    fn test_from_str() {
        let set: RangeSet = "1,3".parse().unwrap();
        assert_eq!(members(&set, 5), vec![1, 3]);
    }

    #[test]
    fn test_filter_keeps_selected_rows() {
        let filter = RowFilter::from_expr(Some("0,3-"), false).unwrap();
        assert_eq!(kept(&filter, 5), vec![0, 3, 4]);
    }

    #[test]
    fn test_filter_inverted() {
        let filter = RowFilter::from_expr(Some("0,3-"), true).unwrap();
        assert_eq!(kept(&filter, 5), vec![1, 2]);
    }

    #[test]
    fn test_filter_inverted_small_cases() {
        let filter = RowFilter::from_expr(Some("1"), true).unwrap();
        assert_eq!(kept(&filter, 3), vec![0, 2]);
        let filter = RowFilter::from_expr(Some("0,2-4,8-"), true).unwrap();
        assert_eq!(kept(&filter, 10), vec![1, 5, 6, 7]);
    }

    #[test]
    fn test_no_filter_passes_everything() {
        let filter = RowFilter::from_expr(None, false).unwrap();
        assert!(filter.is_bypassed());
        assert_eq!(kept(&filter, 4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_invert_without_ranges_passes_everything() {
        let filter = RowFilter::from_expr(None, true).unwrap();
        assert_eq!(kept(&filter, 4), vec![0, 1, 2, 3]);
        let filter = RowFilter::from_expr(Some(""), true).unwrap();
        assert_eq!(kept(&filter, 4), vec![0, 1, 2, 3]);
    }

    fn term() -> impl Strategy<Value = String> {
        prop_oneof![
            (0u64..40).prop_map(|n| n.to_string()),
            (0u64..40, 0u64..10).prop_map(|(a, w)| format!("{a}-{}", a + w)),
            (0u64..40).prop_map(|a| format!("{a}-")),
        ]
    }

    proptest! {
        #[test]
        fn prop_term_order_does_not_matter(mut terms in prop::collection::vec(term(), 1..6)) {
            let forward = RangeSet::parse(&terms.join(",")).unwrap();
            terms.reverse();
            let backward = RangeSet::parse(&terms.join(",")).unwrap();
            prop_assert_eq!(members(&forward, 60), members(&backward, 60));
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn prop_duplicate_terms_do_not_matter(terms in prop::collection::vec(term(), 1..6)) {
            let once = RangeSet::parse(&terms.join(",")).unwrap();
            let doubled: Vec<String> = terms.iter().chain(terms.iter()).cloned().collect();
            let twice = RangeSet::parse(&doubled.join(",")).unwrap();
            prop_assert_eq!(members(&once, 60), members(&twice, 60));
        }

        #[test]
        fn prop_display_reparses_to_same_set(terms in prop::collection::vec(term(), 0..6)) {
            let set = RangeSet::parse(&terms.join(",")).unwrap();
            let again = RangeSet::parse(&set.to_string()).unwrap();
            prop_assert_eq!(set, again);
        }
    }
}
