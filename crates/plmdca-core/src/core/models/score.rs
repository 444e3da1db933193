use serde::Serialize;
use std::fmt;

/// An unordered pair of distinct sites, stored with `i < j`.
///
/// The derived ordering is lexicographic on `(i, j)`, which coincides with the
/// pair enumeration order of the parameter layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SitePair {
    pub i: usize,
    pub j: usize,
}

impl SitePair {
    pub fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }

    #[inline]
    pub fn contains(&self, site: usize) -> bool {
        self.i == site || self.j == site
    }
}

impl From<(usize, usize)> for SitePair {
    fn from((i, j): (usize, usize)) -> Self {
        Self { i, j }
    }
}

impl fmt::Display for SitePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairScore {
    pub pair: SitePair,
    pub score: f64,
}

impl PairScore {
    pub fn new(pair: impl Into<SitePair>, score: f64) -> Self {
        Self {
            pair: pair.into(),
            score,
        }
    }
}

/// Sorts scores from highest to lowest; equal scores keep enumeration order.
pub fn sort_descending(scores: &mut [PairScore]) {
    scores.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.pair.cmp(&b.pair)));
}
