//! Introspection snapshots.

/// Geometry and chain-length distribution of a [`LinearHash`](crate::LinearHash)
/// at one point in time.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    pub modulus: usize,
    /// Number of buckets, always `modulus + split_pointer`.
    pub capacity: usize,
    /// Live entries.
    pub size: usize,
    pub split_pointer: usize,
    pub max_chain_length: usize,
    /// Chain length of every bucket, in bucket order.
    pub chain_lengths: Vec<usize>,
}

/// Order statistics over chain lengths. Percentiles use the nearest-rank
/// method, so every reported value is an observed chain length.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainSummary {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub q1: usize,
    pub median: usize,
    pub q3: usize,
    pub p90: usize,
}

impl Stats {
    /// Entries per bucket.
    pub fn load_factor(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.size as f64 / self.capacity as f64
    }

    /// Longest chain, or 0 when there are no buckets.
    pub fn longest_chain(&self) -> usize {
        self.chain_lengths.iter().copied().max().unwrap_or(0)
    }

    pub fn empty_buckets(&self) -> usize {
        self.chain_lengths.iter().filter(|&&n| n == 0).count()
    }

    pub fn summary(&self) -> Option<ChainSummary> {
        if self.chain_lengths.is_empty() {
            return None;
        }
        let mut sorted = self.chain_lengths.clone();
        sorted.sort_unstable();
        let total: usize = sorted.iter().sum();
        Some(ChainSummary {
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean: total as f64 / sorted.len() as f64,
            q1: nearest_rank(&sorted, 25),
            median: nearest_rank(&sorted, 50),
            q3: nearest_rank(&sorted, 75),
            p90: nearest_rank(&sorted, 90),
        })
    }
}

// `sorted` is non-empty and ascending; `pct` is in 1..=100.
fn nearest_rank(sorted: &[usize], pct: usize) -> usize {
    let rank = (pct * sorted.len()).div_ceil(100);
    sorted[rank.saturating_sub(1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_with(chain_lengths: Vec<usize>) -> Stats {
        Stats {
            capacity: chain_lengths.len(),
            size: chain_lengths.iter().sum(),
            chain_lengths,
            ..Stats::default()
        }
    }

    #[test]
    fn summary_of_empty_is_none() {
        assert!(Stats::default().summary().is_none());
        assert_eq!(Stats::default().load_factor(), 0.0);
        assert_eq!(Stats::default().longest_chain(), 0);
    }

    #[test]
    fn nearest_rank_percentiles() {
        let s = stats_with(vec![7, 1, 3, 5, 9, 2, 4, 6, 8, 10]);
        let sum = s.summary().unwrap();
        assert_eq!(sum.min, 1);
        assert_eq!(sum.max, 10);
        assert_eq!(sum.q1, 3);
        assert_eq!(sum.median, 5);
        assert_eq!(sum.q3, 8);
        assert_eq!(sum.p90, 9);
        assert!((sum.mean - 5.5).abs() < f64::EPSILON);
    }

    #[test]
    fn single_bucket_summary() {
        let sum = stats_with(vec![4]).summary().unwrap();
        assert_eq!((sum.min, sum.q1, sum.median, sum.q3, sum.p90, sum.max), (4, 4, 4, 4, 4, 4));
    }

    #[test]
    fn derived_counts() {
        let s = stats_with(vec![0, 2, 0, 4]);
        assert_eq!(s.empty_buckets(), 2);
        assert_eq!(s.longest_chain(), 4);
        assert!((s.load_factor() - 1.5).abs() < f64::EPSILON);
    }
}
