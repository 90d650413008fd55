//! Debounced search controller.
//!
//! Coalesces a burst of search keystrokes into a single filter evaluation that
//! runs once input has been quiet for the configured period (300 ms by
//! default).
//!
//! # Timer Model
//!
//! Zellij timers cannot be cancelled: every `set_timeout` eventually produces
//! a `Timer` event. The controller therefore owns the only authoritative
//! timer handle, a single pending slot with a deadline, and treats host timers
//! as wake-ups. A wake-up before the deadline reports how long is left so the
//! host can re-arm; a wake-up after it fires the pending search exactly once.
//!
//! ```text
//! keystroke("A")   t=0    → slot{A, due 300}    arm 300ms
//! keystroke("Al")  t=120  → slot{Al, due 420}   arm 300ms
//! keystroke("Alb") t=250  → slot{Alb, due 550}  arm 300ms
//! poll             t=300  → Waiting(250ms)
//! poll             t=550  → Fire("Alb"), slot emptied
//! poll             t=560  → Idle
//! ```

use std::time::{Duration, Instant};

/// Default quiet period before a search fires.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// The pending search, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingSearch {
    term: String,
    deadline: Instant,
    generation: u64,
}

/// Result of polling the controller on a timer wake-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll {
    /// Nothing is scheduled.
    Idle,
    /// A search is scheduled but not yet due.
    Waiting(Duration),
    /// The quiet period elapsed; run the search with this term.
    Fire(String),
}

/// Single-slot debouncer for the name search.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet_period: Duration,
    pending: Option<PendingSearch>,
    generation: u64,
    disposed: bool,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Debouncer {
    #[must_use]
    pub const fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
            generation: 0,
            disposed: false,
        }
    }

    #[must_use]
    pub const fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Records an input change and (re)schedules the search.
    ///
    /// Any previously pending search is replaced. Returns the delay the host
    /// should arm a timer for, or `None` once the controller is disposed.
    ///
    /// # Examples
    ///
    /// ```
    /// use country_browser::debounce::{Debouncer, Poll};
    /// use std::time::{Duration, Instant};
    ///
    /// let start = Instant::now();
    /// let mut debouncer = Debouncer::new(Duration::from_millis(300));
    /// debouncer.keystroke("A", start);
    /// debouncer.keystroke("Al", start + Duration::from_millis(100));
    ///
    /// assert_eq!(
    ///     debouncer.poll(start + Duration::from_millis(400)),
    ///     Poll::Fire("Al".to_string())
    /// );
    /// assert_eq!(debouncer.poll(start + Duration::from_millis(900)), Poll::Idle);
    /// ```
    pub fn keystroke(&mut self, term: &str, now: Instant) -> Option<Duration> {
        if self.disposed {
            tracing::debug!("keystroke after dispose ignored");
            return None;
        }

        self.generation = self.generation.wrapping_add(1);
        let replaced = self.pending.replace(PendingSearch {
            term: term.to_string(),
            deadline: now + self.quiet_period,
            generation: self.generation,
        });

        tracing::trace!(
            generation = self.generation,
            replaced = replaced.is_some(),
            term_len = term.len(),
            "search rescheduled"
        );

        Some(self.quiet_period)
    }

    /// Checks the pending slot against `now`.
    pub fn poll(&mut self, now: Instant) -> Poll {
        if self.disposed {
            return Poll::Idle;
        }

        let Some(pending) = self.pending.as_ref() else {
            return Poll::Idle;
        };

        if now < pending.deadline {
            return Poll::Waiting(pending.deadline - now);
        }

        match self.pending.take() {
            Some(due) => {
                tracing::debug!(generation = due.generation, "debounced search fired");
                Poll::Fire(due.term)
            }
            None => Poll::Idle,
        }
    }

    /// Drops the pending search without firing it.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!("pending search cancelled");
        }
    }

    /// Cancels any pending search and refuses all further scheduling.
    pub fn dispose(&mut self) {
        self.cancel();
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn burst_of_keystrokes_fires_once_with_final_term() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();

        assert_eq!(d.keystroke("A", t0), Some(ms(300)));
        assert_eq!(d.keystroke("Al", t0 + ms(100)), Some(ms(300)));
        assert_eq!(d.keystroke("Alb", t0 + ms(200)), Some(ms(300)));

        let mut fired = vec![];
        // One wake-up per armed timer, plus a late straggler.
        for at in [300, 400, 500, 510] {
            if let Poll::Fire(term) = d.poll(t0 + ms(at)) {
                fired.push(term);
            }
        }
        assert_eq!(fired, vec!["Alb".to_string()]);
    }

    #[test]
    fn early_wake_up_reports_remaining_time() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        d.keystroke("Al", t0 + ms(100));

        assert_eq!(d.poll(t0 + ms(300)), Poll::Waiting(ms(100)));
        assert!(d.is_pending());
    }

    #[test]
    fn clearing_the_input_still_fires_with_empty_term() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        d.keystroke("A", t0);
        d.keystroke("", t0 + ms(50));

        assert_eq!(d.poll(t0 + ms(350)), Poll::Fire(String::new()));
    }

    #[test]
    fn cancel_drops_pending_search() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        d.keystroke("Chad", t0);
        d.cancel();

        assert_eq!(d.poll(t0 + ms(1_000)), Poll::Idle);
    }

    #[test]
    fn disposed_controller_never_fires() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        d.keystroke("Peru", t0);
        d.dispose();

        assert!(d.is_disposed());
        assert_eq!(d.poll(t0 + ms(1_000)), Poll::Idle);
        assert_eq!(d.keystroke("Peru", t0 + ms(1_100)), None);
        assert_eq!(d.poll(t0 + ms(2_000)), Poll::Idle);
    }

    #[test]
    fn custom_quiet_period_is_honored() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(50));
        assert_eq!(d.quiet_period(), ms(50));
        d.keystroke("x", t0);
        assert_eq!(d.poll(t0 + ms(50)), Poll::Fire("x".to_string()));
    }
}
