//! Sliding-window admission throttle shared by every outbound call to the job board.
//!
//! At most `burst` admissions are granted in any trailing one-second window. The
//! limiter is held once in `AppState` behind an `Arc`, so the page pool and the
//! detail pool of every running search draw from the same budget.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::trace;

use crate::config::RateLimitConfig;

const WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct RateLimiter {
    rps: usize,
    burst: usize,
    admissions: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Zero values are clamped to 1 so the limiter can always admit.
    pub fn new(rps: u32, burst: u32) -> Self {
        let rps = rps.max(1) as usize;
        let burst = burst.max(1) as usize;
        Self {
            rps,
            burst,
            admissions: Mutex::new(VecDeque::with_capacity(burst)),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.rps, config.burst)
    }

    pub fn rps(&self) -> usize {
        self.rps
    }

    pub fn burst(&self) -> usize {
        self.burst
    }

    /// Waits until a slot in the current window is free, then records the admission.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut admissions = self.admissions.lock().await;
                let now = Instant::now();
                while admissions
                    .front()
                    .is_some_and(|oldest| now.duration_since(*oldest) >= WINDOW)
                {
                    admissions.pop_front();
                }
                if admissions.len() < self.burst {
                    admissions.push_back(now);
                    return;
                }
                // Non-empty: len >= burst >= 1.
                match admissions.front() {
                    Some(oldest) => WINDOW.saturating_sub(now.duration_since(*oldest)),
                    None => Duration::ZERO,
                }
            };
            trace!("Rate limiter full, waiting {}ms", wait.as_millis());
            sleep(wait).await;
        }
    }
}
