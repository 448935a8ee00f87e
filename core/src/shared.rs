//! A game clock shared between threads (e.g. a render loop and a
//! network command thread).
//!
//! RULE: Each operation is a single critical section. Its events join
//! the dispatch queue before the clock lock is released, so the queue
//! holds events in commit order.
//!
//! One thread at a time drains the queue, with no lock held while a
//! handler runs. A caller that finds a delivery already in progress
//! leaves its events to that thread and returns. This includes a
//! listener calling back into the clock, whose events are delivered
//! after the one it is handling.

use crate::{
    calendar::GameDate,
    clock::GameClock,
    command::ClockCommand,
    error::{ClockError, ClockResult},
    event::{ClockEvent, EventBus},
    pause::Transition,
    snapshot::ClockSnapshot,
    speed::GameSpeed,
    types::{Seconds, SimDays},
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Dispatch {
    queue:      VecDeque<ClockEvent>,
    delivering: bool,
}

#[derive(Clone)]
pub struct SharedGameClock {
    inner:    Arc<Mutex<GameClock>>,
    dispatch: Arc<Mutex<Dispatch>>,
    bus:      Arc<EventBus>,
}

/// Hands the delivery role back if a handler panics mid-delivery.
struct DeliveryTurn<'a> {
    dispatch: &'a Mutex<Dispatch>,
    armed:    bool,
}

impl Drop for DeliveryTurn<'_> {
    fn drop(&mut self) {
        if self.armed {
            lock_dispatch(self.dispatch).delivering = false;
        }
    }
}

// No handler runs while the dispatch lock is held, so a poisoned
// queue is still in a consistent state.
fn lock_dispatch(dispatch: &Mutex<Dispatch>) -> MutexGuard<'_, Dispatch> {
    dispatch.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SharedGameClock {
    pub fn new(mut clock: GameClock) -> Self {
        clock.defer_events();
        let bus = Arc::clone(clock.bus());
        Self {
            inner:    Arc::new(Mutex::new(clock)),
            dispatch: Arc::new(Mutex::new(Dispatch::default())),
            bus,
        }
    }

    /// Run `op` under the lock, then deliver queued events in commit order.
    pub fn with<T>(&self, op: impl FnOnce(&mut GameClock) -> T) -> ClockResult<T> {
        let mut clock = self.inner.lock().map_err(|_| ClockError::LockPoisoned)?;
        let result = op(&mut *clock);
        let events = clock.drain_events();
        // Enqueue before the clock lock is released.
        let mut dispatch = lock_dispatch(&self.dispatch);
        dispatch.queue.extend(events);
        drop(clock);
        if dispatch.delivering || dispatch.queue.is_empty() {
            return Ok(result);
        }
        dispatch.delivering = true;
        drop(dispatch);
        self.deliver();
        Ok(result)
    }

    /// Drain the queue. Only the thread holding the delivery role calls this.
    fn deliver(&self) {
        let mut turn = DeliveryTurn { dispatch: &self.dispatch, armed: true };
        loop {
            let next = {
                let mut dispatch = lock_dispatch(&self.dispatch);
                match dispatch.queue.pop_front() {
                    Some(event) => event,
                    None => {
                        dispatch.delivering = false;
                        turn.armed = false;
                        return;
                    }
                }
            };
            self.bus.raise(&next);
        }
    }

    pub fn bus(&self) -> &Arc<EventBus> { &self.bus }

    pub fn pause(&self) -> ClockResult<Transition> {
        self.with(GameClock::pause)
    }

    pub fn resume(&self) -> ClockResult<Transition> {
        self.with(GameClock::resume)
    }

    pub fn set_speed(&self, speed: GameSpeed) -> ClockResult<bool> {
        self.with(|clock| clock.set_speed(speed))
    }

    pub fn apply(&self, command: ClockCommand) -> ClockResult<bool> {
        self.with(|clock| clock.apply(command))
    }

    pub fn date(&self) -> ClockResult<GameDate> {
        self.with(GameClock::date)
    }

    pub fn accumulated_days(&self) -> ClockResult<SimDays> {
        self.with(GameClock::accumulated_days)
    }

    pub fn real_time_less_time_paused(&self) -> ClockResult<Seconds> {
        self.with(|clock| clock.real_time_less_time_paused())
    }

    pub fn snapshot(&self) -> ClockResult<ClockSnapshot> {
        self.with(GameClock::snapshot)
    }
}
