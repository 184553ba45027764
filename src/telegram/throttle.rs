use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// Keeps a minimum gap between consecutive outgoing requests
pub struct Throttle {
    interval: Duration,
    last_sent: Option<Instant>,
}

impl Throttle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            last_sent: None,
        }
    }

    pub async fn wait(&mut self) {
        if let Some(ready_at) = self.ready_at() {
            sleep_until(ready_at).await;
        }
        self.last_sent = Some(Instant::now());
    }

    fn ready_at(&self) -> Option<Instant> {
        self.last_sent.map(|last| last + self.interval)
    }
}
