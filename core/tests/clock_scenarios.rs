//! End-to-end clock scenarios driven by a manual time source.

use starclock_core::{
    calendar::GameDate,
    clock::GameClock,
    config::ClockConfig,
    event::EventBus,
    pause::Transition,
    real_time::ManualTimeSource,
    speed::GameSpeed,
};
use std::sync::Arc;

const EPS: f64 = 1e-9;

fn build_clock() -> (GameClock, ManualTimeSource) {
    let _ = env_logger::builder().is_test(true).try_init();
    let time = ManualTimeSource::new(0.0);
    let clock = GameClock::new(&ClockConfig::default(), time.clone(), Arc::new(EventBus::new()))
        .expect("default config is valid");
    (clock, time)
}

#[test]
fn ten_seconds_at_normal_is_ten_days() {
    let (mut clock, time) = build_clock();
    time.advance(10.0);
    assert!((clock.accumulated_days() - 10.0).abs() < EPS);
    assert_eq!(clock.date(), GameDate::new(2700, 11));
}

#[test]
fn pause_interval_contributes_nothing() {
    let (mut clock, time) = build_clock();
    clock.set_speed(GameSpeed::Fast);
    time.advance(5.0);
    clock.pause();
    time.advance(100.0);
    clock.resume();
    time.advance(5.0);
    assert!((clock.accumulated_days() - 20.0).abs() < EPS);
}

#[test]
fn repeated_sync_without_elapsed_time_is_idempotent() {
    let (mut clock, time) = build_clock();
    time.advance(3.5);
    let first = clock.accumulated_days();
    for _ in 0..10 {
        assert_eq!(clock.sync(), 0.0);
    }
    assert_eq!(clock.accumulated_days(), first);
}

#[test]
fn real_time_less_paused_is_restored_after_resume() {
    let (mut clock, time) = build_clock();
    time.advance(7.0);
    let before = clock.real_time_less_time_paused();
    clock.pause();
    time.advance(42.0);
    assert!((clock.real_time_less_time_paused() - before).abs() < EPS);
    clock.resume();
    assert!((clock.real_time_less_time_paused() - before).abs() < EPS);
}

#[test]
fn accumulator_frozen_while_paused() {
    let (mut clock, time) = build_clock();
    time.advance(2.0);
    clock.pause();
    let frozen = clock.accumulated_days();
    time.advance(30.0);
    assert_eq!(clock.accumulated_days(), frozen);
    assert_eq!(clock.sync(), 0.0);
}

#[test]
fn double_pause_and_double_resume_are_harmless() {
    let (mut clock, time) = build_clock();
    time.advance(1.0);
    assert_eq!(clock.pause(), Transition::Applied);
    time.advance(5.0);
    assert_eq!(clock.pause(), Transition::AlreadyPaused);
    time.advance(5.0);
    assert_eq!(clock.resume(), Transition::Applied);
    assert_eq!(clock.resume(), Transition::NotPaused);
    time.advance(1.0);
    assert!((clock.accumulated_days() - 2.0).abs() < EPS);
    assert!((clock.real_time_less_time_paused() - 2.0).abs() < EPS);
}

#[test]
fn multiplier_applies_only_from_the_change_onward() {
    let (mut clock, time) = build_clock();
    time.advance(4.0);
    clock.set_speed(GameSpeed::Slowest);
    time.advance(4.0);
    clock.set_speed(GameSpeed::Fastest);
    time.advance(1.0);
    // 4×1.0 + 4×0.25 + 1×4.0
    assert!((clock.accumulated_days() - 9.0).abs() < EPS);
}

#[test]
fn setting_the_current_speed_does_not_double_count() {
    let (mut clock, time) = build_clock();
    time.advance(6.0);
    assert!(!clock.set_speed(GameSpeed::Normal));
    assert!(!clock.set_speed(GameSpeed::Normal));
    assert!((clock.accumulated_days() - 6.0).abs() < EPS);
}

#[test]
fn speed_change_while_paused_takes_effect_on_resume() {
    let (mut clock, time) = build_clock();
    time.advance(1.0);
    clock.pause();
    time.advance(10.0);
    clock.set_speed(GameSpeed::Fastest);
    time.advance(10.0);
    clock.resume();
    time.advance(1.0);
    assert!((clock.accumulated_days() - 5.0).abs() < EPS);
}

#[test]
fn date_never_goes_backward() {
    let (mut clock, time) = build_clock();
    let mut last = clock.date();
    for step in 0..500 {
        time.advance(0.37);
        match step % 7 {
            0 => { clock.toggle_pause(); }
            3 => { clock.speed_up(); }
            5 => { clock.slow_down(); }
            _ => {}
        }
        let now = clock.date();
        assert!(now >= last, "date went backward: {last} -> {now}");
        last = now;
    }
}

#[test]
fn year_rolls_over_at_configured_length() {
    let time = ManualTimeSource::new(0.0);
    let config = ClockConfig { days_per_year: 100, starting_year: 1, ..ClockConfig::default() };
    let mut clock = GameClock::new(&config, time.clone(), Arc::new(EventBus::new())).unwrap();
    time.advance(99.0);
    assert_eq!(clock.date(), GameDate::new(1, 100));
    time.advance(1.0);
    assert_eq!(clock.date(), GameDate::new(2, 1));
}

#[test]
fn conversion_constant_scales_accumulation() {
    let time = ManualTimeSource::new(0.0);
    let config = ClockConfig { days_per_real_second: 0.5, ..ClockConfig::default() };
    let mut clock = GameClock::new(&config, time.clone(), Arc::new(EventBus::new())).unwrap();
    clock.set_speed(GameSpeed::Fast);
    time.advance(10.0);
    assert!((clock.accumulated_days() - 10.0).abs() < EPS);
}

#[test]
fn source_epoch_need_not_be_zero() {
    let time = ManualTimeSource::new(1_000.0);
    let mut clock = GameClock::new(&ClockConfig::default(), time.clone(), Arc::new(EventBus::new())).unwrap();
    assert_eq!(clock.accumulated_days(), 0.0);
    assert_eq!(clock.real_time_less_time_paused(), 0.0);
    time.advance(3.0);
    assert!((clock.accumulated_days() - 3.0).abs() < EPS);
    assert!((clock.real_time_less_time_paused() - 3.0).abs() < EPS);
}
