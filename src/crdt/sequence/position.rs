//! PositionId: dense, totally ordered addresses for characters
//!
//! A position is a path of `u32` digits plus the `(site, counter)` of the
//! operation that created it. Paths live in a virtual tree where every level
//! spans `[0, u32::MAX]`; a new position between two neighbors is found by
//! walking down the levels until there is room for a fresh digit.

use crate::SiteID;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Smallest digit at any level (start-of-document boundary)
pub const MIN_DIGIT: u32 = 0;

/// Largest digit at any level (end-of-document boundary)
pub const MAX_DIGIT: u32 = u32::MAX;

/// Fewest free digits a level must offer before a new digit is drawn from it.
///
/// Narrower gaps are skipped by going one level deeper, where the range is
/// wide again. Replicas picking concurrently in the same gap then draw from
/// at least `MIN_FREE_DIGITS / 3` candidates and almost never collide.
pub const MIN_FREE_DIGITS: u64 = 1 << 16;

/// Identity of one operation issued by a replica
///
/// Every local insert and delete ticks the replica's counter, so a
/// `(site, counter)` pair names exactly one operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpId {
    pub site: SiteID,
    pub counter: u64,
}

impl OpId {
    pub fn new(site: impl Into<SiteID>, counter: u64) -> Self {
        Self {
            site: site.into(),
            counter,
        }
    }
}

impl std::fmt::Display for OpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.site, self.counter)
    }
}

/// Unique, totally ordered position of a character
///
/// # Ordering
///
/// 1. `path`, digit by digit; a strict prefix sorts first
/// 2. `site`, lexicographically
/// 3. `counter`
///
/// The order depends only on the identifiers themselves, so every replica
/// sorts the same set of characters the same way.
///
/// # Example
///
/// ```rust
/// use lseq_text::crdt::sequence::PositionId;
///
/// let a = PositionId::new(vec![5], "a".to_string(), 1);
/// let b = PositionId::new(vec![5, 10], "a".to_string(), 2);
/// let c = PositionId::new(vec![6], "a".to_string(), 3);
///
/// assert!(a < b);
/// assert!(b < c);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionId {
    /// Digits in the virtual position tree
    pub path: Vec<u32>,

    /// Replica that generated this position
    pub site: SiteID,

    /// Counter of the generating insert operation
    pub counter: u64,
}

impl PositionId {
    pub fn new(path: Vec<u32>, site: SiteID, counter: u64) -> Self {
        Self {
            path,
            site,
            counter,
        }
    }

    /// Identity of the insert operation that created this position
    pub fn op_id(&self) -> OpId {
        OpId::new(self.site.clone(), self.counter)
    }
}

impl Ord for PositionId {
    fn cmp(&self, other: &Self) -> Ordering {
        // Vec<u32> compares lexicographically with shorter prefixes first
        self.path
            .cmp(&other.path)
            .then_with(|| self.site.cmp(&other.site))
            .then_with(|| self.counter.cmp(&other.counter))
    }
}

impl PartialOrd for PositionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for PositionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits: Vec<String> = self.path.iter().map(|d| d.to_string()).collect();
        write!(f, "[{}]{}@{}", digits.join("."), self.site, self.counter)
    }
}

/// Which part of the free interval a new digit is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bias {
    /// Lowest third: inserting at the start of the document
    Low,
    /// Whole interval
    Uniform,
    /// Highest third: appending at the end of the document
    High,
}

impl Bias {
    fn for_neighbors(left: Option<&PositionId>, right: Option<&PositionId>) -> Self {
        match (left, right) {
            (None, Some(_)) => Bias::Low,
            (Some(_), None) => Bias::High,
            _ => Bias::Uniform,
        }
    }
}

/// Pick a digit strictly inside `(low, high)`.
///
/// Requires at least one free candidate. Biased zones are a third of the
/// free candidates but never empty.
fn choose_digit<R: Rng + ?Sized>(rng: &mut R, low: u32, high: u32, bias: Bias) -> u32 {
    let candidates = u64::from(high) - u64::from(low) - 1;
    let zone = (candidates / 3).max(1);

    let digit = match bias {
        Bias::Low => u64::from(low) + 1 + rng.gen_range(0..zone),
        Bias::High => u64::from(high) - 1 - rng.gen_range(0..zone),
        Bias::Uniform => u64::from(low) + 1 + rng.gen_range(0..candidates),
    };

    // Always inside (low, high), which is inside the u32 range
    digit as u32
}

/// Generate a position strictly between `left` and `right` using the
/// thread-local RNG.
///
/// `None` on the left means start-of-document, `None` on the right means
/// end-of-document. See [`generate_between_with`].
pub fn generate_between(
    left: Option<&PositionId>,
    right: Option<&PositionId>,
    site: &str,
    counter: u64,
) -> PositionId {
    generate_between_with(&mut rand::thread_rng(), left, right, site, counter)
}

/// Generate a position strictly between `left` and `right`.
///
/// Walks the levels of both paths. At each depth the bounds are the
/// neighbors' digits (or the level boundaries when a path is exhausted). If
/// at least [`MIN_FREE_DIGITS`] digits fit strictly between them one is
/// chosen and the path ends there; otherwise the left digit is copied and
/// the walk goes one level deeper.
///
/// Once the new path has fallen strictly below `right`'s prefix, `right` no
/// longer constrains deeper levels.
///
/// Neighbors with identical paths (differing only in site or counter) have
/// no identifier between them; the result then extends `left`'s path and
/// sorts after both. Generated paths only share a last digit when two picks
/// from a gap of at least [`MIN_FREE_DIGITS`] candidates coincide.
pub fn generate_between_with<R: Rng + ?Sized>(
    rng: &mut R,
    left: Option<&PositionId>,
    right: Option<&PositionId>,
    site: &str,
    counter: u64,
) -> PositionId {
    let bias = Bias::for_neighbors(left, right);
    let left_path: &[u32] = left.map(|id| id.path.as_slice()).unwrap_or(&[]);
    let right_path: &[u32] = right.map(|id| id.path.as_slice()).unwrap_or(&[]);

    let mut path = Vec::with_capacity(left_path.len() + 1);
    let mut bounded_by_right = right.is_some();
    let mut depth = 0;

    loop {
        let low = left_path.get(depth).copied().unwrap_or(MIN_DIGIT);
        let high = if bounded_by_right {
            right_path.get(depth).copied().unwrap_or(MAX_DIGIT)
        } else {
            MAX_DIGIT
        };

        let free = u64::from(high).saturating_sub(u64::from(low) + 1);
        if free >= MIN_FREE_DIGITS {
            path.push(choose_digit(rng, low, high, bias));
            break;
        }

        path.push(low);
        if low != high {
            bounded_by_right = false;
        }
        depth += 1;
    }

    PositionId::new(path, site.to_string(), counter)
}
