/// Time source and idle primitive for the loop driver.
///
/// The loop never reads wall-clock time directly: it asks a `Clock`, which is
/// monotonic and starts at zero. Tests swap in a clock they advance by hand.

use std::time::{Duration, Instant};

use serde::Deserialize;

pub trait Clock {
    /// Time elapsed since the clock was created. Never decreases.
    fn now(&self) -> Duration;

    /// Give up the CPU until roughly the next deadline.
    fn idle(&mut self, how: Idle);
}

/// How the loop waits when nothing is due.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Idle {
    /// `thread::yield_now`: lowest latency, keeps a core busy.
    Yield,
    /// Short sleep.
    Sleep(Duration),
}

impl Idle {
    pub fn from_config(kind: IdleKind, sleep_ms: u64) -> Self {
        match kind {
            IdleKind::Yield => Idle::Yield,
            IdleKind::Sleep => Idle::Sleep(Duration::from_millis(sleep_ms.max(1))),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdleKind {
    Yield,
    Sleep,
}

pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock { start: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        MonotonicClock::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn idle(&mut self, how: Idle) {
        match how {
            Idle::Yield => std::thread::yield_now(),
            Idle::Sleep(d) => std::thread::sleep(d),
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Clock that only moves when told to. Idling advances it by `idle_step`
    /// so a loop waiting on a deadline still makes progress.
    #[derive(Clone)]
    pub struct ManualClock {
        now: Rc<Cell<Duration>>,
        pub idle_step: Duration,
        pub idles: Rc<Cell<usize>>,
    }

    impl ManualClock {
        pub fn new(idle_step: Duration) -> Self {
            ManualClock {
                now: Rc::new(Cell::new(Duration::ZERO)),
                idle_step,
                idles: Rc::new(Cell::new(0)),
            }
        }

        pub fn advance(&self, d: Duration) {
            self.now.set(self.now.get() + d);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Duration {
            self.now.get()
        }

        fn idle(&mut self, _how: Idle) {
            self.idles.set(self.idles.get() + 1);
            self.advance(self.idle_step);
        }
    }

    #[test]
    fn manual_clock_shares_time_between_clones() {
        let a = ManualClock::new(Duration::from_millis(1));
        let mut b = a.clone();
        a.advance(Duration::from_millis(10));
        b.idle(Idle::Yield);
        assert_eq!(a.now(), Duration::from_millis(11));
        assert_eq!(a.idles.get(), 1);
    }
}
