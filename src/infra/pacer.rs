use crate::app::ports::PacerPort;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Waits a fixed delay before every request. Rows are processed one at a
/// time, so this bounds the request rate to one per `delay`.
#[derive(Debug, Clone)]
pub struct FixedDelayPacer {
    delay: Duration,
}

impl FixedDelayPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PacerPort for FixedDelayPacer {
    async fn wait_turn(&self) {
        if self.delay.is_zero() {
            return;
        }
        debug!("Waiting {:?} before next registry request", self.delay);
        tokio::time::sleep(self.delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_waits_full_delay() {
        let pacer = FixedDelayPacer::new(Duration::from_secs(3));
        let start = tokio::time::Instant::now();
        pacer.wait_turn().await;
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_returns_immediately() {
        let pacer = FixedDelayPacer::new(Duration::ZERO);
        let start = tokio::time::Instant::now();
        pacer.wait_turn().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
