//! Cooldown gate tripped by upstream HTTP 429 responses

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Shared rate-limit flag with timed reset
#[derive(Clone)]
pub struct RateLimitGuard {
    limited: Arc<AtomicBool>,
    cooldown: Duration,
}

impl RateLimitGuard {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            limited: Arc::new(AtomicBool::new(false)),
            cooldown,
        }
    }

    pub fn is_limited(&self) -> bool {
        self.limited.load(Ordering::SeqCst)
    }

    /// Set the flag and schedule its reset.
    ///
    /// Every call spawns its own reset task, so overlapping trips each clear
    /// the flag when their own cooldown ends. Must be called inside a tokio
    /// runtime.
    pub fn trip(&self) -> JoinHandle<()> {
        self.limited.store(true, Ordering::SeqCst);
        tracing::warn!("Rate limited by upstream, pausing requests for {:?}", self.cooldown);

        let limited = Arc::clone(&self.limited);
        let cooldown = self.cooldown;
        tokio::spawn(async move {
            tokio::time::sleep(cooldown).await;
            limited.store(false, Ordering::SeqCst);
            tracing::info!("Rate limit cooldown elapsed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_trip_and_reset() {
        let guard = RateLimitGuard::new(Duration::from_secs(180));
        assert!(!guard.is_limited());

        let _timer = guard.trip();
        assert!(guard.is_limited());

        tokio::time::sleep(Duration::from_secs(179)).await;
        assert!(guard.is_limited());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!guard.is_limited());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_trips_each_reset() {
        let guard = RateLimitGuard::new(Duration::from_secs(180));
        let first = guard.trip();
        tokio::time::sleep(Duration::from_secs(60)).await;
        let second = guard.trip();

        // first timer fires at 180s and clears the flag even though the second is pending
        tokio::time::sleep(Duration::from_secs(121)).await;
        assert!(!guard.is_limited());
        assert!(first.is_finished());
        assert!(!second.is_finished());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(second.is_finished());
        assert!(!guard.is_limited());
    }

    #[tokio::test(start_paused = true)]
    async fn test_aborted_timer_keeps_flag() {
        let guard = RateLimitGuard::new(Duration::from_secs(10));
        let timer = guard.trip();
        timer.abort();

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(guard.is_limited());
    }
}
