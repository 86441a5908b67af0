//! Wall-clock timers
//!
//! [`TimerQueue`] holds one-shot and fixed-period timers carrying a payload.
//! The host advances it to the current time and handles each fired timer in
//! due order. Timers scheduled while handling a fired timer take part in the
//! same advance if they are already due.

use crate::clock::Timestamp;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle for a scheduled timer
    pub struct TimerId;
}

#[derive(Debug)]
struct TimerEntry<T> {
    due: Timestamp,
    /// Period in milliseconds for repeating timers
    period_ms: Option<u64>,
    /// Scheduling order, breaks ties between timers due at the same instant
    seq: u64,
    payload: T,
}

/// A timer that came due
#[derive(Clone, Debug, PartialEq)]
pub struct FiredTimer<T> {
    pub id: TimerId,
    /// The instant the timer was due (not the instant it was polled)
    pub due: Timestamp,
    pub payload: T,
}

/// Queue of pending timers
#[derive(Debug)]
pub struct TimerQueue<T> {
    timers: SlotMap<TimerId, TimerEntry<T>>,
    next_seq: u64,
}

impl<T: Clone> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    /// Fire once at `due`
    pub fn schedule_at(&mut self, due: Timestamp, payload: T) -> TimerId {
        self.insert(due, None, payload)
    }

    /// Fire every `period_ms`, first at `now + period_ms`
    ///
    /// # Panics
    ///
    /// Panics if `period_ms` is zero.
    pub fn schedule_every(&mut self, now: Timestamp, period_ms: u64, payload: T) -> TimerId {
        assert!(period_ms > 0, "repeating timer needs a non-zero period");
        self.insert(now.add_millis(period_ms), Some(period_ms), payload)
    }

    fn insert(&mut self, due: Timestamp, period_ms: Option<u64>, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(TimerEntry {
            due,
            period_ms,
            seq,
            payload,
        })
    }

    /// Cancel a timer. Returns false if it already fired (one-shot) or was
    /// canceled before.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Earliest due instant among pending timers
    pub fn next_due(&self) -> Option<Timestamp> {
        self.timers.values().map(|t| t.due).min()
    }

    /// Pop the earliest timer due at or before `now`.
    ///
    /// One-shot timers are removed; repeating timers are rescheduled one
    /// period after their due instant and keep their id.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<FiredTimer<T>> {
        let (id, _) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(_, t)| (t.due, t.seq))?;

        let entry = self.timers.get_mut(id)?;
        let due = entry.due;
        let period_ms = entry.period_ms;
        match period_ms {
            Some(period) => {
                let payload = entry.payload.clone();
                entry.due = due.add_millis(period);
                entry.seq = self.next_seq;
                self.next_seq += 1;
                Some(FiredTimer { id, due, payload })
            }
            None => {
                let entry = self.timers.remove(id)?;
                Some(FiredTimer {
                    id,
                    due,
                    payload: entry.payload,
                })
            }
        }
    }

    /// Cancel everything
    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

impl<T: Clone> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(queue: &mut TimerQueue<&'static str>, now: Timestamp) -> Vec<(u64, &'static str)> {
        let mut fired = Vec::new();
        while let Some(timer) = queue.pop_due(now) {
            fired.push((timer.due.as_micros() / 1_000, timer.payload));
        }
        fired
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut queue = TimerQueue::new();
        queue.schedule_at(Timestamp::from_millis(300), "c");
        queue.schedule_at(Timestamp::from_millis(100), "a");
        queue.schedule_at(Timestamp::from_millis(200), "b");

        assert_eq!(queue.next_due(), Some(Timestamp::from_millis(100)));
        assert_eq!(
            drain(&mut queue, Timestamp::from_millis(250)),
            vec![(100, "a"), (200, "b")]
        );
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_ties_break_by_scheduling_order() {
        let mut queue = TimerQueue::new();
        queue.schedule_at(Timestamp::from_millis(100), "first");
        queue.schedule_at(Timestamp::from_millis(100), "second");
        assert_eq!(
            drain(&mut queue, Timestamp::from_millis(100)),
            vec![(100, "first"), (100, "second")]
        );
    }

    #[test]
    fn test_repeating_timer_catches_up() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule_every(Timestamp::zero(), 800, "tick");
        let fired = drain(&mut queue, Timestamp::from_millis(2500));
        assert_eq!(fired, vec![(800, "tick"), (1600, "tick"), (2400, "tick")]);
        assert!(queue.is_scheduled(id));
        assert_eq!(queue.next_due(), Some(Timestamp::from_millis(3200)));
    }

    #[test]
    fn test_cancel() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule_at(Timestamp::from_millis(10), "x");
        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert!(queue.pop_due(Timestamp::from_millis(20)).is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_one_shot_handle_is_dead_after_firing() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule_at(Timestamp::from_millis(10), "x");
        let fired = queue.pop_due(Timestamp::from_millis(10)).unwrap();
        assert_eq!(fired.id, id);
        assert!(!queue.is_scheduled(id));
        assert!(!queue.cancel(id));
    }
}
