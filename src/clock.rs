//! Deadline-based timers driving a game session
//!
//! There is one slot per kind of [`Timer`].  Arming a slot replaces whatever
//! was pending in it, so a timer can never fire on behalf of state that has
//! since been replaced.  The clock never looks at the system time itself;
//! every operation is given the current `Instant` by the caller.
use enum_map::{Enum, EnumMap};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(crate) enum Timer {
    /// Advance the game by one step.  Repeats every tick period.
    Tick,

    /// Show the next number of the resume countdown, or finish it
    Countdown,

    /// Remove an uneaten power-up
    PowerUpExpiry,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Slot {
    deadline: Instant,
    /// `Some` for a repeating timer
    period: Option<Duration>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Clock {
    slots: EnumMap<Timer, Option<Slot>>,
}

impl Clock {
    pub(crate) fn new() -> Clock {
        Clock::default()
    }

    /// Arm `timer` to fire once, `delay` after `now`
    pub(crate) fn once(&mut self, timer: Timer, now: Instant, delay: Duration) {
        self.slots[timer] = Some(Slot {
            deadline: now + delay,
            period: None,
        });
    }

    /// Arm `timer` to fire every `period`, starting one period after `now`
    pub(crate) fn every(&mut self, timer: Timer, now: Instant, period: Duration) {
        self.slots[timer] = Some(Slot {
            deadline: now + period,
            period: Some(period),
        });
    }

    /// Disarm `timer`.  Returns `true` if it was armed.
    pub(crate) fn cancel(&mut self, timer: Timer) -> bool {
        self.slots[timer].take().is_some()
    }

    pub(crate) fn cancel_all(&mut self) {
        self.slots.clear();
    }

    pub(crate) fn is_armed(&self, timer: Timer) -> bool {
        self.slots[timer].is_some()
    }

    /// Return the earliest deadline of any armed timer
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.slots.values().flatten().map(|slot| slot.deadline).min()
    }

    /// If any timer is due at `now`, return the one with the earliest
    /// deadline and either disarm it (one-shot) or schedule its next firing
    /// (repeating).  A repeating timer that has fallen more than a period
    /// behind skips the missed firings rather than bursting.
    pub(crate) fn pop_due(&mut self, now: Instant) -> Option<Timer> {
        let (timer, slot) = self
            .slots
            .iter()
            .filter_map(|(timer, slot)| slot.map(|s| (timer, s)))
            .filter(|(_, slot)| slot.deadline <= now)
            .min_by_key(|(_, slot)| slot.deadline)?;
        self.slots[timer] = slot.period.map(|period| {
            let mut deadline = slot.deadline + period;
            if deadline <= now {
                deadline = now + period;
            }
            Slot {
                deadline,
                period: Some(period),
            }
        });
        Some(timer)
    }
}
