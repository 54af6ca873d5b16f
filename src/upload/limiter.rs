//! Counting admission gate for concurrent uploads.
//!
//! Wraps a tokio [`Semaphore`] and adds holder accounting, so callers can
//! observe how many uploads are in flight and the highest concurrency the
//! gate ever admitted.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::debug;
use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LimiterError {
    #[error("concurrency limit must be at least 1")]
    ZeroCapacity,
}

/// Bounds the number of uploads that may run at the same time.
///
/// Cloning is cheap and every clone shares the same slots.
#[derive(Clone, Debug)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    counters: Arc<Counters>,
    capacity: usize,
}

#[derive(Debug, Default)]
struct Counters {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyLimiter {
    pub fn new(capacity: usize) -> Result<Self, LimiterError> {
        if capacity == 0 {
            return Err(LimiterError::ZeroCapacity);
        }
        Ok(ConcurrencyLimiter {
            semaphore: Arc::new(Semaphore::new(capacity)),
            counters: Arc::new(Counters::default()),
            capacity,
        })
    }

    /// Wait until fewer than `capacity` holders are admitted, then admit one.
    ///
    /// The returned permit gives the slot back when dropped.
    pub async fn acquire(&self) -> LimiterPermit {
        let permit = match Arc::clone(&self.semaphore).acquire_owned().await {
            Ok(permit) => permit,
            // The semaphore is private to the limiter and never closed
            Err(_) => unreachable!("limiter semaphore closed"),
        };

        let now = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.peak.fetch_max(now, Ordering::SeqCst);
        debug!("Limiter admitted holder ({}/{})", now, self.capacity);

        LimiterPermit {
            _permit: permit,
            counters: Arc::clone(&self.counters),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn in_flight(&self) -> usize {
        self.counters.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous holders seen so far.
    pub fn peak(&self) -> usize {
        self.counters.peak.load(Ordering::SeqCst)
    }
}

/// One admitted slot. Dropping it releases the slot and wakes one waiter.
#[derive(Debug)]
pub struct LimiterPermit {
    _permit: OwnedSemaphorePermit,
    counters: Arc<Counters>,
}

impl LimiterPermit {
    /// Give the slot back explicitly.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for LimiterPermit {
    fn drop(&mut self) {
        // Counter is decremented before the semaphore permit is returned,
        // so a newly admitted holder never observes a stale count.
        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::task::JoinSet;

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(ConcurrencyLimiter::new(0).unwrap_err(), LimiterError::ZeroCapacity);
    }

    #[tokio::test]
    async fn test_acquire_and_release() {
        let limiter = ConcurrencyLimiter::new(2).unwrap();
        assert_eq!(limiter.capacity(), 2);

        let p1 = limiter.acquire().await;
        assert_eq!(limiter.available(), 1);
        let p2 = limiter.acquire().await;
        assert_eq!(limiter.available(), 0);
        assert_eq!(limiter.in_flight(), 2);

        p1.release();
        assert_eq!(limiter.available(), 1);
        drop(p2);
        assert_eq!(limiter.available(), 2);
        assert_eq!(limiter.in_flight(), 0);
        assert_eq!(limiter.peak(), 2);
    }

    #[tokio::test]
    async fn test_acquire_blocks_until_release() {
        let limiter = ConcurrencyLimiter::new(1).unwrap();
        let held = limiter.acquire().await;

        let waiter = {
            let limiter = limiter.clone();
            tokio::spawn(async move {
                limiter.acquire().await;
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(held);
        let result = tokio::time::timeout(Duration::from_secs(5), waiter).await;
        assert!(matches!(result, Ok(Ok(()))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_peak_never_exceeds_capacity() {
        for capacity in [1usize, 3, 8] {
            let limiter = ConcurrencyLimiter::new(capacity).unwrap();
            let mut tasks = JoinSet::new();

            for i in 0..capacity * 6 {
                let permit = limiter.acquire().await;
                let limiter = limiter.clone();
                tasks.spawn(async move {
                    assert!(limiter.in_flight() <= limiter.capacity());
                    tokio::time::sleep(Duration::from_millis((i % 4) as u64 * 3)).await;
                    drop(permit);
                });
            }
            while let Some(res) = tasks.join_next().await {
                res.unwrap();
            }

            assert!(limiter.peak() <= capacity);
            assert!(limiter.peak() >= 1);
            assert_eq!(limiter.in_flight(), 0);
            assert_eq!(limiter.available(), capacity);
        }
    }
}
