//! Timer APIs (setTimeout, clearTimeout).
//!
//! `TimerQueue` runs on a virtual clock that only moves when the host calls
//! [`TimerQueue::advance`], which keeps delay-driven behavior deterministic.

use parking_lot::Mutex;
use std::time::Duration;
use tracing::trace;

/// Handle returned by [`TimerApi::set_timeout`], used to cancel the timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u32);

impl TimerHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Callback run once when a timer fires.
pub type TimerCallback = Box<dyn FnOnce() + Send>;

/// Schedule/cancel seam for delayed callbacks.
pub trait TimerApi: Send + Sync {
    /// Schedule `callback` to run once after `delay`.
    fn set_timeout(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;

    /// Cancel a pending timer. Cancelling a fired or unknown timer does nothing.
    fn clear_timeout(&self, handle: TimerHandle);
}

/// A pending timer.
struct Timer {
    id: u32,
    deadline: Duration,
    callback: TimerCallback,
}

struct QueueState {
    now: Duration,
    timer_counter: u32,
    timers: Vec<Timer>,
}

/// Timer queue driven by a virtual clock.
pub struct TimerQueue {
    state: Mutex<QueueState>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                now: Duration::ZERO,
                timer_counter: 0,
                timers: Vec::new(),
            }),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Number of timers waiting to fire.
    pub fn pending(&self) -> usize {
        self.state.lock().timers.len()
    }

    /// Get the next timer deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.state.lock().timers.iter().map(|t| t.deadline).min()
    }

    /// Move the clock forward by `by`, firing every timer that comes due.
    ///
    /// Timers fire in deadline order (ties in scheduling order). Callbacks run
    /// without the queue lock held, so they may schedule or cancel timers;
    /// timers they schedule inside the window also fire. Returns the number of
    /// callbacks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut fired = 0;

        loop {
            let next = {
                let mut state = self.state.lock();
                let due = state
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.deadline <= target)
                    .min_by_key(|(_, t)| (t.deadline, t.id))
                    .map(|(index, _)| index);

                due.map(|index| {
                    let timer = state.timers.remove(index);
                    state.now = timer.deadline;
                    timer
                })
            };

            match next {
                Some(timer) => {
                    trace!(timer = timer.id, at = ?timer.deadline, "timer fired");
                    (timer.callback)();
                    fired += 1;
                }
                None => break,
            }
        }

        let mut state = self.state.lock();
        if state.now < target {
            state.now = target;
        }
        fired
    }

    /// Advance to each pending deadline in turn until no timers remain.
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0;
        while let Some(deadline) = self.next_deadline() {
            let now = self.now();
            fired += self.advance(deadline.saturating_sub(now));
        }
        fired
    }
}

impl TimerApi for TimerQueue {
    fn set_timeout(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let mut state = self.state.lock();
        state.timer_counter = state.timer_counter.wrapping_add(1);
        let id = state.timer_counter;
        let deadline = state.now + delay;

        state.timers.push(Timer {
            id,
            deadline,
            callback,
        });

        TimerHandle(id)
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.state.lock().timers.retain(|t| t.id != handle.0);
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}
