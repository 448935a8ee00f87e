//! The event bus: how the clock tells the rest of the game what changed.
//!
//! RULE: The clock raises events only after its own state is consistent.
//! Listeners never observe a half-applied pause or speed change.
//!
//! Handlers for a kind run synchronously, in registration order. The
//! handler list is snapshotted before dispatch, so a handler may
//! subscribe or unsubscribe (itself included) while it runs.

use crate::{calendar::GameDate, speed::GameSpeed};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

/// Every event the clock raises.
/// Variants are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClockEvent {
    PauseChanged {
        paused: bool,
    },
    SpeedChanged {
        previous: GameSpeed,
        current:  GameSpeed,
    },
    DateChanged {
        previous: GameDate,
        current:  GameDate,
    },
}

impl ClockEvent {
    pub fn kind(&self) -> ClockEventKind {
        match self {
            ClockEvent::PauseChanged { .. } => ClockEventKind::PauseChanged,
            ClockEvent::SpeedChanged { .. } => ClockEventKind::SpeedChanged,
            ClockEvent::DateChanged { .. }  => ClockEventKind::DateChanged,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ClockEventKind {
    PauseChanged,
    SpeedChanged,
    DateChanged,
}

impl ClockEventKind {
    /// Stable name, used in logs and IPC output.
    pub fn name(self) -> &'static str {
        match self {
            ClockEventKind::PauseChanged => "pause_changed",
            ClockEventKind::SpeedChanged => "speed_changed",
            ClockEventKind::DateChanged  => "date_changed",
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

pub type Handler = Arc<dyn Fn(&ClockEvent) + Send + Sync>;

struct Registration {
    id:      ListenerId,
    kind:    ClockEventKind,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id:       u64,
    registrations: Vec<Registration>,
}

#[derive(Default)]
pub struct EventBus {
    registry: Mutex<Registry>,
}

impl EventBus {
    pub fn new() -> Self { Self::default() }

    pub fn subscribe<F>(&self, kind: ClockEventKind, handler: F) -> ListenerId
    where
        F: Fn(&ClockEvent) + Send + Sync + 'static,
    {
        let mut registry = self.lock();
        registry.next_id += 1;
        let id = ListenerId(registry.next_id);
        registry.registrations.push(Registration {
            id,
            kind,
            handler: Arc::new(handler),
        });
        log::debug!("listener {id:?} subscribed to {}", kind.name());
        id
    }

    /// Returns false if `id` was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut registry = self.lock();
        let before = registry.registrations.len();
        registry.registrations.retain(|r| r.id != id);
        registry.registrations.len() != before
    }

    pub fn listener_count(&self, kind: ClockEventKind) -> usize {
        self.lock().registrations.iter().filter(|r| r.kind == kind).count()
    }

    /// Invoke every handler registered for the event's kind.
    pub fn raise(&self, event: &ClockEvent) {
        let kind = event.kind();
        let handlers: Vec<Handler> = self
            .lock()
            .registrations
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| Arc::clone(&r.handler))
            .collect();
        log::debug!("raising {} to {} listener(s)", kind.name(), handlers.len());
        for handler in handlers {
            handler(event);
        }
    }

    pub fn raise_all(&self, events: &[ClockEvent]) {
        for event in events {
            self.raise(event);
        }
    }

    // A panicking handler never runs while the registry lock is held,
    // so a poisoned registry is still structurally sound.
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.lock().registrations.len())
            .finish()
    }
}
