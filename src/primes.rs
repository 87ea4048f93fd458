//! Prime generation and the residue-class partition mod 4.
//!
//! Every prime is assigned to exactly one of three classes:
//!
//! - **Euclidean**: primes `p ≡ 1 (mod 4)`, contributing a positive weight.
//! - **Hyperbolic**: primes `p ≡ 3 (mod 4)`, contributing a negative weight.
//! - **Anchor**: the even prime 2, contributing a positive weight.
//!
//! The partition is a pure filter over the output of [`generate_primes`], so
//! disjointness and completeness hold by construction.

use serde::Serialize;

/// Returns all primes `p <= limit` in strictly increasing order.
///
/// Uses the sieve of Eratosthenes: for each prime `p` up to `sqrt(limit)`, the
/// multiples `p², p² + p, ...` are struck out. A limit below 2 yields an empty
/// sequence.
pub fn generate_primes(limit: usize) -> Vec<u64> {
    if limit < 2 {
        return Vec::new();
    }

    let mut is_prime = vec![true; limit + 1];
    is_prime[0] = false;
    is_prime[1] = false;

    let mut p = 2;
    while p * p <= limit {
        if is_prime[p] {
            let mut multiple = p * p;
            while multiple <= limit {
                is_prime[multiple] = false;
                multiple += p;
            }
        }
        p += 1;
    }

    is_prime
        .iter()
        .enumerate()
        .filter_map(|(n, &prime)| prime.then_some(n as u64))
        .collect()
}

/// The class a prime falls into under the mod-4 partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimeClass {
    /// `p ≡ 1 (mod 4)`.
    Euclidean,
    /// `p ≡ 3 (mod 4)`.
    Hyperbolic,
    /// The prime 2.
    Anchor,
}

impl PrimeClass {
    /// Classifies a prime by its residue modulo 4.
    ///
    /// Primality is not checked: any odd value above 1 gets the class of its
    /// residue, so `of(9)` is `Euclidean`. Returns `None` for 0, 1 and even
    /// values other than 2.
    pub fn of(p: u64) -> Option<Self> {
        match p {
            2 => Some(Self::Anchor),
            _ if p % 4 == 1 && p > 1 => Some(Self::Euclidean),
            _ if p % 4 == 3 => Some(Self::Hyperbolic),
            _ => None,
        }
    }

    /// The sign a prime of this class contributes to the potential.
    pub fn sign(self) -> f64 {
        match self {
            Self::Euclidean | Self::Anchor => 1.0,
            Self::Hyperbolic => -1.0,
        }
    }
}

/// The three disjoint prime classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimePartition {
    /// Primes `≡ 1 (mod 4)`, ascending.
    pub euclidean: Vec<u64>,
    /// Primes `≡ 3 (mod 4)`, ascending.
    pub hyperbolic: Vec<u64>,
    /// `[2]` when 2 was among the input primes, otherwise empty.
    pub anchor: Vec<u64>,
}

/// Counts and ratios describing a [`PrimePartition`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionStatistics {
    pub euclidean_count: usize,
    pub hyperbolic_count: usize,
    pub anchor_count: usize,
    pub total_count: usize,
    /// `hyperbolic_count / euclidean_count`; tends to 1 by Dirichlet's theorem.
    /// `None` when there are no Euclidean primes.
    pub balance_ratio: Option<f64>,
    pub euclidean_fraction: f64,
    pub hyperbolic_fraction: f64,
}

impl PrimePartition {
    /// Splits an ascending prime sequence into its three classes.
    pub fn new(primes: &[u64]) -> Self {
        let mut partition = Self::default();
        for &p in primes {
            match PrimeClass::of(p) {
                Some(PrimeClass::Euclidean) => partition.euclidean.push(p),
                Some(PrimeClass::Hyperbolic) => partition.hyperbolic.push(p),
                Some(PrimeClass::Anchor) => partition.anchor.push(p),
                None => log::warn!("Skipping value {p}: neither 2 nor an odd number above 1."),
            }
        }
        partition
    }

    /// Sieves up to `limit` and partitions the result.
    pub fn up_to(limit: usize) -> Self {
        Self::new(&generate_primes(limit))
    }

    /// Iterates over every prime with its class, class by class.
    pub fn iter(&self) -> impl Iterator<Item = (PrimeClass, u64)> + '_ {
        let tag = |class: PrimeClass| move |&p: &u64| (class, p);
        self.euclidean
            .iter()
            .map(tag(PrimeClass::Euclidean))
            .chain(self.hyperbolic.iter().map(tag(PrimeClass::Hyperbolic)))
            .chain(self.anchor.iter().map(tag(PrimeClass::Anchor)))
    }

    /// Total number of primes across all classes.
    pub fn len(&self) -> usize {
        self.euclidean.len() + self.hyperbolic.len() + self.anchor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn statistics(&self) -> PartitionStatistics {
        let total = self.len();
        let fraction = |count: usize| {
            if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            }
        };
        PartitionStatistics {
            euclidean_count: self.euclidean.len(),
            hyperbolic_count: self.hyperbolic.len(),
            anchor_count: self.anchor.len(),
            total_count: total,
            balance_ratio: (!self.euclidean.is_empty())
                .then(|| self.hyperbolic.len() as f64 / self.euclidean.len() as f64),
            euclidean_fraction: fraction(self.euclidean.len()),
            hyperbolic_fraction: fraction(self.hyperbolic.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_prime_by_trial_division(n: u64) -> bool {
        n >= 2 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
    }

    #[test]
    fn test_small_sieve() {
        assert_eq!(generate_primes(10), vec![2, 3, 5, 7]);
        assert_eq!(generate_primes(2), vec![2]);
        assert_eq!(generate_primes(13), vec![2, 3, 5, 7, 11, 13]);
    }

    #[test]
    fn test_limit_below_two_is_empty() {
        assert!(generate_primes(0).is_empty());
        assert!(generate_primes(1).is_empty());
    }

    #[test]
    fn test_sieve_matches_trial_division() {
        let primes = generate_primes(5000);
        assert!(primes.windows(2).all(|w| w[0] < w[1]));
        assert!(primes.iter().all(|&p| is_prime_by_trial_division(p)));
        assert!(*primes.last().unwrap() <= 5000);
        let expected = (2..=5000).filter(|&n| is_prime_by_trial_division(n)).count();
        assert_eq!(primes.len(), expected);
    }

    #[test]
    fn test_partition_up_to_twenty() {
        let partition = PrimePartition::up_to(20);
        assert_eq!(partition.euclidean, vec![5, 13, 17]);
        assert_eq!(partition.hyperbolic, vec![3, 7, 11, 19]);
        assert_eq!(partition.anchor, vec![2]);
    }

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let primes = generate_primes(3000);
        let partition = PrimePartition::new(&primes);
        assert_eq!(partition.len(), primes.len());

        let mut merged: Vec<u64> = partition.iter().map(|(_, p)| p).collect();
        merged.sort_unstable();
        assert_eq!(merged, primes);

        for (class, p) in partition.iter() {
            assert_eq!(PrimeClass::of(p), Some(class));
        }
    }

    #[test]
    fn test_class_signs() {
        assert_eq!(PrimeClass::Euclidean.sign(), 1.0);
        assert_eq!(PrimeClass::Hyperbolic.sign(), -1.0);
        assert_eq!(PrimeClass::Anchor.sign(), 1.0);
    }

    #[test]
    fn test_class_of_uses_residue_only() {
        assert_eq!(PrimeClass::of(0), None);
        assert_eq!(PrimeClass::of(1), None);
        assert_eq!(PrimeClass::of(10), None);
        // Odd composites are classified by residue, not rejected.
        assert_eq!(PrimeClass::of(9), Some(PrimeClass::Euclidean));
        assert_eq!(PrimeClass::of(15), Some(PrimeClass::Hyperbolic));
    }

    #[test]
    fn test_statistics() {
        let stats = PrimePartition::up_to(20).statistics();
        assert_eq!(stats.euclidean_count, 3);
        assert_eq!(stats.hyperbolic_count, 4);
        assert_eq!(stats.anchor_count, 1);
        assert_eq!(stats.total_count, 8);
        assert_eq!(stats.balance_ratio, Some(4.0 / 3.0));
        assert!((stats.euclidean_fraction - 0.375).abs() < 1e-15);
        assert!((stats.hyperbolic_fraction - 0.5).abs() < 1e-15);

        let empty = PrimePartition::up_to(1).statistics();
        assert_eq!(empty.total_count, 0);
        assert_eq!(empty.balance_ratio, None);
        assert_eq!(empty.euclidean_fraction, 0.0);
    }
}
