use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct PendingEmission<T> {
    due_at: Instant,
    value: T,
}

/// Holds a value that only changes once its source has been quiet for the
/// requested delay.
///
/// At most one emission is pending at any time: every `observe` replaces the
/// previous one, so a burst of changes yields a single emission carrying the
/// last value. The debouncer never reads a clock itself; callers pass `now`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    stable: T,
    pending: Option<PendingEmission<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(initial: T) -> Self {
        Self {
            stable: initial,
            pending: None,
        }
    }

    pub fn value(&self) -> &T {
        &self.stable
    }

    pub fn observe(&mut self, value: T, delay: Duration, now: Instant) {
        self.pending = Some(PendingEmission {
            due_at: now + delay,
            value,
        });
    }

    /// Emits the pending value once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<&T> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.due_at <= now);
        if !due {
            return None;
        }

        let pending = self.pending.take()?;
        self.stable = pending.value;
        Some(&self.stable)
    }

    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due_at)
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        match self.deadline() {
            Some(due_at) => due_at.saturating_duration_since(now).min(default_timeout),
            None => default_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Debouncer;
    use std::time::{Duration, Instant};

    const DELAY: Duration = Duration::from_millis(250);

    #[test]
    fn starts_with_initial_value_and_nothing_pending() {
        let debouncer = Debouncer::new(String::new());
        assert_eq!(debouncer.value(), "");
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn does_not_emit_before_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(0);
        debouncer.observe(7, DELAY, start);

        assert_eq!(debouncer.poll(start + Duration::from_millis(249)), None);
        assert_eq!(*debouncer.value(), 0);
        assert_eq!(debouncer.poll(start + DELAY), Some(&7));
        assert_eq!(*debouncer.value(), 7);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn burst_emits_once_with_last_value_after_last_change() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new("");
        let mut emissions = Vec::new();

        for (offset_ms, value) in [(0, "g"), (100, "gh"), (200, "gha")] {
            let now = start + Duration::from_millis(offset_ms);
            if let Some(value) = debouncer.poll(now) {
                emissions.push(*value);
            }
            debouncer.observe(value, DELAY, now);
        }

        for offset_ms in (200..=700).step_by(10) {
            if let Some(value) = debouncer.poll(start + Duration::from_millis(offset_ms)) {
                emissions.push(*value);
                assert!(offset_ms >= 450, "emitted early at {offset_ms}ms");
            }
        }

        assert_eq!(emissions, vec!["gha"]);
    }

    #[test]
    fn cancel_drops_pending_emission() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(1);
        debouncer.observe(2, DELAY, start);

        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());
        assert_eq!(debouncer.poll(start + DELAY * 4), None);
        assert_eq!(*debouncer.value(), 1);
    }

    #[test]
    fn poll_timeout_is_bounded_by_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(0);
        let idle = Duration::from_millis(120);
        assert_eq!(debouncer.poll_timeout(start, idle), idle);

        debouncer.observe(1, Duration::from_millis(50), start);
        assert_eq!(
            debouncer.poll_timeout(start + Duration::from_millis(20), idle),
            Duration::from_millis(30)
        );
        assert_eq!(
            debouncer.poll_timeout(start + Duration::from_millis(90), idle),
            Duration::ZERO
        );
    }
}
