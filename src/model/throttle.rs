use std::time::{Duration, Instant};

/// Rate limiter for interval-change notifications during a drag.
///
/// A notification offered inside the quiet period is remembered as pending
/// so the last interval of a gesture still reaches the filter.
#[derive(Debug, Clone)]
pub struct Throttle {
    period: Duration,
    last_emit: Option<Instant>,
    pending: bool,
}

impl Throttle {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_emit: None,
            pending: false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Offer a notification at `now`; `true` means emit it.
    pub fn offer(&mut self, now: Instant) -> bool {
        if self.is_open(now) {
            self.emit(now);
            true
        } else {
            self.pending = true;
            false
        }
    }

    /// Emit a pending notification once the quiet period has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.pending && self.is_open(now) {
            self.emit(now);
            true
        } else {
            false
        }
    }

    /// Emit a pending notification immediately (end of gesture).
    pub fn flush(&mut self, now: Instant) -> bool {
        if self.pending {
            self.emit(now);
            true
        } else {
            false
        }
    }

    /// Record an emission that bypassed the throttle.
    pub fn emit(&mut self, now: Instant) {
        self.last_emit = Some(now);
        self.pending = false;
    }

    fn is_open(&self, now: Instant) -> bool {
        match self.last_emit {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.period,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(50);

    #[test]
    fn first_offer_passes_and_burst_is_held() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(PERIOD);
        assert!(throttle.offer(t0));
        assert!(!throttle.offer(t0 + Duration::from_millis(10)));
        assert!(!throttle.offer(t0 + Duration::from_millis(49)));
        assert!(throttle.is_pending());
        assert!(throttle.offer(t0 + Duration::from_millis(50)));
        assert!(!throttle.is_pending());
    }

    #[test]
    fn poll_releases_pending_after_period() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(PERIOD);
        throttle.offer(t0);
        throttle.offer(t0 + Duration::from_millis(5));
        assert!(!throttle.poll(t0 + Duration::from_millis(20)));
        assert!(throttle.poll(t0 + Duration::from_millis(60)));
        assert!(!throttle.poll(t0 + Duration::from_millis(200)));
    }

    #[test]
    fn flush_emits_only_when_pending() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(PERIOD);
        assert!(!throttle.flush(t0));
        throttle.offer(t0);
        throttle.offer(t0 + Duration::from_millis(1));
        assert!(throttle.flush(t0 + Duration::from_millis(2)));
        assert!(!throttle.is_pending());
    }
}
