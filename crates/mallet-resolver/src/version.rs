//! Maven-style version ordering, reduced to what conflict resolution needs:
//! a deterministic total order for same-depth tie-breaks.
//!
//! Segments split on `.` and `-`; numeric segments compare as numbers;
//! known qualifiers order `alpha < beta < milestone < rc < snapshot <
//! "" (release) < sp`; anything else compares lexically above `sp`.

use std::cmp::Ordering;
use std::fmt;

/// A parsed version with comparable segments.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    pub original: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Segment {
    Numeric(u64),
    Qualifier(QualifierKind),
    Text(String),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
enum QualifierKind {
    Alpha,
    Beta,
    Milestone,
    Rc,
    Snapshot,
    Release,
    Sp,
}

impl MavenVersion {
    pub fn parse(version: &str) -> Self {
        let segments = version
            .split(['.', '-'])
            .filter(|s| !s.is_empty())
            .map(|s| {
                if let Ok(n) = s.parse::<u64>() {
                    Segment::Numeric(n)
                } else {
                    match s.to_ascii_lowercase().as_str() {
                        "alpha" | "a" => Segment::Qualifier(QualifierKind::Alpha),
                        "beta" | "b" => Segment::Qualifier(QualifierKind::Beta),
                        "milestone" | "m" => Segment::Qualifier(QualifierKind::Milestone),
                        "rc" | "cr" => Segment::Qualifier(QualifierKind::Rc),
                        "snapshot" => Segment::Qualifier(QualifierKind::Snapshot),
                        "ga" | "final" | "release" => Segment::Qualifier(QualifierKind::Release),
                        "sp" => Segment::Qualifier(QualifierKind::Sp),
                        other => Segment::Text(other.to_string()),
                    }
                }
            })
            .collect();
        Self {
            original: version.to_string(),
            segments,
        }
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let ordering = cmp_segments(self.segments.get(i), other.segments.get(i));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

/// A missing segment counts as zero against numbers and as a bare release
/// against qualifiers, so `1.0` == `1` and `1.0` > `1.0-alpha`.
fn cmp_segments(a: Option<&Segment>, b: Option<&Segment>) -> Ordering {
    use Segment::*;
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(Numeric(n))) => 0u64.cmp(n),
        (None, Some(Qualifier(q))) => QualifierKind::Release.cmp(q),
        (None, Some(Text(_))) => Ordering::Less,
        (Some(_), None) => cmp_segments(b, a).reverse(),
        (Some(Numeric(x)), Some(Numeric(y))) => x.cmp(y),
        (Some(Qualifier(x)), Some(Qualifier(y))) => x.cmp(y),
        (Some(Text(x)), Some(Text(y))) => x.cmp(y),
        // Numbers beat any qualifier or free text
        (Some(Numeric(_)), Some(_)) => Ordering::Greater,
        (Some(_), Some(Numeric(_))) => Ordering::Less,
        // Free text sorts above the known qualifiers
        (Some(Text(_)), Some(Qualifier(_))) => Ordering::Greater,
        (Some(Qualifier(_)), Some(Text(_))) => Ordering::Less,
    }
}
