//! Fetch budget: the global cap on in-flight fetches
//!
//! Every fetch unit (fetch + parse of one page) holds one permit for its
//! whole duration. Permits are RAII guards, so a unit that fails or is
//! cancelled gives its permit back on drop. The semaphore is fair, so a
//! released permit goes straight to the longest waiter.

use crate::ScrapeError;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Semaphore, SemaphorePermit};

/// Counting permit pool with in-flight instrumentation
#[derive(Debug)]
pub struct FetchBudget {
    /// Semaphore sized to the configured maximum
    semaphore: Semaphore,

    /// Configured maximum
    capacity: usize,

    /// Permits currently held
    in_flight: AtomicUsize,

    /// Highest `in_flight` ever observed
    peak: AtomicUsize,
}

/// A held permit; dropping it releases the slot
#[derive(Debug)]
pub struct FetchPermit<'a> {
    budget: &'a FetchBudget,
    _permit: SemaphorePermit<'a>,
}

impl FetchBudget {
    /// Creates a budget of `capacity` permits (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        Self {
            semaphore: Semaphore::new(capacity),
            capacity,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Waits for a free permit
    ///
    /// # Returns
    ///
    /// * `Ok(FetchPermit)` - The permit, held until dropped
    /// * `Err(ScrapeError::BudgetClosed)` - The budget was closed
    pub async fn acquire(&self) -> Result<FetchPermit<'_>, ScrapeError> {
        let permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ScrapeError::BudgetClosed)?;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        Ok(FetchPermit {
            budget: self,
            _permit: permit,
        })
    }

    /// Stops handing out permits; pending and future `acquire` calls fail
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Drop for FetchPermit<'_> {
    fn drop(&mut self) {
        // Runs before the semaphore permit field is dropped, so in_flight
        // never exceeds the permits actually held.
        self.budget.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let budget = FetchBudget::new(0);
        assert_eq!(budget.capacity(), 1);
    }

    #[tokio::test]
    async fn test_acquire_and_release() {
        let budget = FetchBudget::new(2);

        let first = budget.acquire().await.unwrap();
        let second = budget.acquire().await.unwrap();
        assert_eq!(budget.in_flight(), 2);

        drop(first);
        assert_eq!(budget.in_flight(), 1);

        drop(second);
        assert_eq!(budget.in_flight(), 0);
        assert_eq!(budget.peak(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_budget_blocks() {
        let budget = FetchBudget::new(1);
        let held = budget.acquire().await.unwrap();

        let blocked = tokio::time::timeout(Duration::from_millis(20), budget.acquire()).await;
        assert!(blocked.is_err());

        drop(held);
        let resumed = tokio::time::timeout(Duration::from_millis(20), budget.acquire()).await;
        assert!(resumed.is_ok());
    }

    #[tokio::test]
    async fn test_failed_unit_releases_permit() {
        let budget = FetchBudget::new(1);

        let unit = async {
            let _permit = budget.acquire().await?;
            Err::<(), _>(ScrapeError::Timeout {
                url: "https://example.com/".to_string(),
            })
        };
        assert!(unit.await.is_err());

        assert_eq!(budget.in_flight(), 0);
        let reacquired = tokio::time::timeout(Duration::from_millis(20), budget.acquire()).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn test_closed_budget_rejects() {
        let budget = FetchBudget::new(1);
        budget.close();
        assert!(matches!(
            budget.acquire().await,
            Err(ScrapeError::BudgetClosed)
        ));
    }

    #[tokio::test]
    async fn test_peak_never_exceeds_capacity() {
        let budget = FetchBudget::new(8);

        let units = (0..200).map(|_| async {
            let _permit = budget.acquire().await.unwrap();
            tokio::task::yield_now().await;
        });
        futures::future::join_all(units).await;

        assert!(budget.peak() <= 8);
        assert_eq!(budget.in_flight(), 0);
    }
}
