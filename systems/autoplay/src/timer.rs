//! Cooperative timers driven by simulated time.

use std::time::Duration;

/// Handle identifying a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug)]
struct TimerEntry<T> {
    handle: TimerHandle,
    deadline: Duration,
    payload: T,
}

/// Single-threaded timer queue advanced explicitly by the owner.
///
/// Nothing fires on its own. [`TimerQueue::advance`] extends the horizon of
/// delivered time and [`TimerQueue::pop_due`] hands out timers whose deadline
/// falls within it, one at a time and in deadline order. Popping a timer moves
/// the clock to its deadline, so a timer scheduled in response starts counting
/// from the moment its predecessor fired rather than from the end of the
/// tick. Cancelled timers never fire.
#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    horizon: Duration,
    next_handle: u64,
    entries: Vec<TimerEntry<T>>,
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue whose clock starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            horizon: Duration::ZERO,
            next_handle: 0,
            entries: Vec::new(),
        }
    }

    /// Current position of the queue's clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Total simulated time delivered through [`TimerQueue::advance`].
    #[must_use]
    pub fn horizon(&self) -> Duration {
        self.horizon
    }

    /// Number of timers that are still pending.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no timer is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Schedules `payload` to fire once `delay` has elapsed from the clock.
    pub fn schedule(&mut self, delay: Duration, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.entries.push(TimerEntry {
            handle,
            deadline: self.now.saturating_add(delay),
            payload,
        });
        handle
    }

    /// Payload of a pending timer.
    #[must_use]
    pub fn get(&self, handle: TimerHandle) -> Option<&T> {
        self.entries
            .iter()
            .find(|entry| entry.handle == handle)
            .map(|entry| &entry.payload)
    }

    /// Cancels the timer, returning its payload if it was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.handle == handle)?;
        Some(self.entries.remove(index).payload)
    }

    /// Cancels every pending timer, returning how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.entries.len();
        self.entries.clear();
        cancelled
    }

    /// Extends the horizon by `dt` without firing anything.
    pub fn advance(&mut self, dt: Duration) {
        self.horizon = self.horizon.saturating_add(dt);
    }

    /// Removes the earliest timer due within the horizon, ties broken by
    /// scheduling order, and moves the clock to its deadline.
    ///
    /// When nothing is due the clock catches up with the horizon.
    pub fn pop_due(&mut self) -> Option<(TimerHandle, T)> {
        let horizon = self.horizon;
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.deadline <= horizon)
            .min_by_key(|(_, entry)| (entry.deadline, entry.handle))
            .map(|(index, _)| index);

        let Some(index) = index else {
            self.now = horizon;
            return None;
        };
        let entry = self.entries.remove(index);
        self.now = self.now.max(entry.deadline);
        Some((entry.handle, entry.payload))
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<T>(queue: &mut TimerQueue<T>) -> Vec<T> {
        std::iter::from_fn(|| queue.pop_due())
            .map(|(_, payload)| payload)
            .collect()
    }

    #[test]
    fn timers_fire_once_their_deadline_passes() {
        let mut queue = TimerQueue::new();
        let _ = queue.schedule(Duration::from_millis(300), "late");
        let _ = queue.schedule(Duration::from_millis(100), "early");

        queue.advance(Duration::from_millis(99));
        assert!(drain(&mut queue).is_empty());

        queue.advance(Duration::from_millis(200));
        assert_eq!(drain(&mut queue), vec!["early"]);
        assert_eq!(queue.len(), 1);

        queue.advance(Duration::from_millis(1));
        assert_eq!(drain(&mut queue), vec!["late"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn equal_deadlines_fire_in_scheduling_order() {
        let mut queue = TimerQueue::new();
        let first = queue.schedule(Duration::from_secs(1), 1);
        let second = queue.schedule(Duration::from_secs(1), 2);

        queue.advance(Duration::from_secs(1));
        assert_eq!(queue.pop_due(), Some((first, 1)));
        assert_eq!(queue.pop_due(), Some((second, 2)));
        assert_eq!(queue.pop_due(), None);
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule(Duration::from_millis(10), 'a');
        let _ = queue.schedule(Duration::from_millis(10), 'b');

        assert_eq!(queue.cancel(handle), Some('a'));
        assert_eq!(queue.cancel(handle), None);

        queue.advance(Duration::from_secs(1));
        assert_eq!(drain(&mut queue), vec!['b']);
    }

    #[test]
    fn delays_start_from_the_current_clock() {
        let mut queue = TimerQueue::new();
        queue.advance(Duration::from_secs(5));
        assert_eq!(queue.pop_due(), None);
        assert_eq!(queue.now(), Duration::from_secs(5));
        let _ = queue.schedule(Duration::from_secs(1), ());

        queue.advance(Duration::from_millis(999));
        assert_eq!(queue.pop_due(), None);
        queue.advance(Duration::from_millis(1));
        assert!(queue.pop_due().is_some());
        assert_eq!(queue.now(), Duration::from_secs(6));
    }

    #[test]
    fn follow_up_counts_from_the_parent_deadline() {
        let mut queue = TimerQueue::new();
        let _ = queue.schedule(Duration::from_millis(150), "first");

        queue.advance(Duration::from_millis(400));
        assert!(queue.pop_due().is_some());
        assert_eq!(queue.now(), Duration::from_millis(150));

        let _ = queue.schedule(Duration::from_millis(150), "second");
        assert_eq!(queue.pop_due().map(|(_, payload)| payload), Some("second"));
        assert_eq!(queue.now(), Duration::from_millis(300));

        let _ = queue.schedule(Duration::from_millis(150), "third");
        assert_eq!(queue.pop_due(), None);
        assert_eq!(queue.now(), queue.horizon());
        queue.advance(Duration::from_millis(50));
        assert_eq!(drain(&mut queue), vec!["third"]);
    }

    #[test]
    fn cancel_all_empties_the_queue() {
        let mut queue = TimerQueue::new();
        let _ = queue.schedule(Duration::from_secs(1), ());
        let _ = queue.schedule(Duration::from_secs(2), ());
        assert_eq!(queue.cancel_all(), 2);
        queue.advance(Duration::from_secs(3));
        assert_eq!(queue.pop_due(), None);
    }
}
