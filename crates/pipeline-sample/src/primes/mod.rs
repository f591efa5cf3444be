//! # Prime Filter
//!
//! The pipeline stage used by the demo: numbers go in, primes come out.

use actor_pipeline::Stage;
use async_trait::async_trait;
use std::time::Duration;

/// Trial division. Good enough for the small ranges the demo feeds it.
pub fn is_prime(n: u64) -> bool {
    match n {
        0 | 1 => false,
        2 | 3 => true,
        _ if n % 2 == 0 || n % 3 == 0 => false,
        _ => {
            let mut divisor = 5;
            while within_root(divisor, n) {
                if n % divisor == 0 || n % (divisor + 2) == 0 {
                    return false;
                }
                divisor += 6;
            }
            true
        }
    }
}

/// `divisor * divisor <= n` without overflowing near `u64::MAX`.
fn within_root(divisor: u64, n: u64) -> bool {
    divisor <= n / divisor
}

/// Keeps primes and drops everything else.
///
/// `work_delay` stands in for real per-item work, which makes the interleaving of
/// workers visible in the logs.
#[derive(Debug, Clone, Default)]
pub struct PrimeFilter {
    work_delay: Duration,
}

impl PrimeFilter {
    pub fn new(work_delay: Duration) -> Self {
        Self { work_delay }
    }
}

#[async_trait]
impl Stage for PrimeFilter {
    type Input = u64;
    type Output = u64;

    async fn process(&self, n: u64) -> Option<u64> {
        if !self.work_delay.is_zero() {
            tokio::time::sleep(self.work_delay).await;
        }
        is_prime(n).then_some(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_primes() {
        let primes: Vec<u64> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_prime_count_below_272() {
        assert_eq!((0..272).filter(|&n| is_prime(n)).count(), 58);
        assert!(is_prime(271));
        assert!(!is_prime(25));
        assert!(!is_prime(49));
    }

    #[test]
    fn test_root_bound_near_u64_max() {
        let past_root = (1u64 << 32) + 1;
        assert!(!within_root(past_root, u64::MAX));
        assert!(within_root(u32::MAX as u64, u64::MAX));
        assert!(within_root(5, 25));
        assert!(!within_root(5, 24));
    }

    #[test]
    fn test_large_composites() {
        assert!(!is_prime(u64::MAX));
        assert!(!is_prime(u64::MAX - 1));
        // 4294967291 is the largest prime below 2^32.
        assert!(!is_prime(4294967291 * 5));
    }

    #[tokio::test]
    async fn test_filter_stage() {
        let stage = PrimeFilter::default();
        assert_eq!(stage.process(97).await, Some(97));
        assert_eq!(stage.process(91).await, None);
    }
}
