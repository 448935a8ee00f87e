//! Listeners observe clock changes after the clock is consistent.

use starclock_core::{
    calendar::GameDate,
    clock::GameClock,
    command::ClockCommand,
    config::ClockConfig,
    event::{ClockEvent, ClockEventKind, EventBus},
    real_time::ManualTimeSource,
    speed::GameSpeed,
};
use std::sync::{Arc, Mutex};

fn recorder(bus: &EventBus, kind: ClockEventKind) -> Arc<Mutex<Vec<ClockEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    bus.subscribe(kind, move |event| sink.lock().unwrap().push(event.clone()));
    seen
}

fn build_clock(bus: Arc<EventBus>) -> (GameClock, ManualTimeSource) {
    let time = ManualTimeSource::new(0.0);
    let clock = GameClock::new(&ClockConfig::default(), time.clone(), bus).unwrap();
    (clock, time)
}

#[test]
fn pause_and_resume_raise_one_event_each() {
    let bus = Arc::new(EventBus::new());
    let seen = recorder(&bus, ClockEventKind::PauseChanged);
    let (mut clock, _) = build_clock(Arc::clone(&bus));

    clock.pause();
    clock.pause();
    clock.resume();
    clock.resume();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            ClockEvent::PauseChanged { paused: true },
            ClockEvent::PauseChanged { paused: false },
        ]
    );
}

#[test]
fn speed_events_carry_previous_and_current() {
    let bus = Arc::new(EventBus::new());
    let seen = recorder(&bus, ClockEventKind::SpeedChanged);
    let (mut clock, _) = build_clock(Arc::clone(&bus));

    clock.apply(ClockCommand::SpeedUp);
    clock.apply(ClockCommand::SetSpeed { speed: GameSpeed::Fast });
    clock.apply(ClockCommand::SlowDown);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            ClockEvent::SpeedChanged { previous: GameSpeed::Normal, current: GameSpeed::Fast },
            ClockEvent::SpeedChanged { previous: GameSpeed::Fast, current: GameSpeed::Normal },
        ]
    );
}

#[test]
fn rejected_speed_raises_nothing() {
    let bus = Arc::new(EventBus::new());
    let seen = recorder(&bus, ClockEventKind::SpeedChanged);
    let (mut clock, _) = build_clock(Arc::clone(&bus));

    assert!(clock.try_set_speed("99").is_err());
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn date_change_is_raised_on_read() {
    let bus = Arc::new(EventBus::new());
    let seen = recorder(&bus, ClockEventKind::DateChanged);
    let (mut clock, time) = build_clock(Arc::clone(&bus));

    time.advance(0.5);
    clock.date();
    assert!(seen.lock().unwrap().is_empty());

    time.advance(2.0);
    clock.date();
    clock.date();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![ClockEvent::DateChanged {
            previous: GameDate::new(2700, 1),
            current:  GameDate::new(2700, 3),
        }]
    );
}

#[test]
fn commands_report_whether_state_changed() {
    let (mut clock, _) = build_clock(Arc::new(EventBus::new()));
    assert!(clock.apply(ClockCommand::Pause));
    assert!(!clock.apply(ClockCommand::Pause));
    assert!(clock.apply(ClockCommand::TogglePause));
    assert!(!clock.apply(ClockCommand::Resume));
    assert!(!clock.apply(ClockCommand::SetSpeed { speed: GameSpeed::Normal }));
}
