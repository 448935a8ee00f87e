//! clock-runner: headless driver for a starclock session.
//!
//! Usage:
//!   clock-runner --seconds 30
//!   clock-runner --config clock.json --prefs prefs.db --ipc-mode --manual-time

use anyhow::{bail, Result};
use starclock_core::{
    calendar::GameDate,
    clock::GameClock,
    command::ClockCommand,
    config::ClockConfig,
    event::{ClockEventKind, EventBus},
    real_time::{ManualTimeSource, RealTimeSource, SystemTimeSource},
    speed::GameSpeed,
    store::ClockStore,
    types::{Seconds, SimDays},
};
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    GetState,
    Advance { seconds: Seconds },
    Command { command: ClockCommand },
    Snapshot,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    session_id:       String,
    date:             GameDate,
    accumulated_days: SimDays,
    speed:            GameSpeed,
    paused:           bool,
    real_time_less_time_paused: Seconds,
}

/// Either source, so the runner can pick one at startup.
#[derive(Clone)]
enum RunnerTime {
    System(SystemTimeSource),
    Manual(ManualTimeSource),
}

impl RealTimeSource for RunnerTime {
    fn now(&self) -> Seconds {
        match self {
            RunnerTime::System(s) => s.now(),
            RunnerTime::Manual(m) => m.now(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let manual_time = !ipc_mode || args.iter().any(|a| a == "--manual-time");
    let seconds = parse_arg(&args, "--seconds", 30.0f64);
    let prefs_db = find_arg(&args, "--prefs").unwrap_or(":memory:");

    let config = match find_arg(&args, "--config") {
        Some(path) => ClockConfig::load(path)?,
        None       => ClockConfig::default(),
    };

    let store = ClockStore::open(prefs_db)?;
    store.migrate()?;

    let time = if manual_time {
        RunnerTime::Manual(ManualTimeSource::new(0.0))
    } else {
        RunnerTime::System(SystemTimeSource::new())
    };

    let bus = Arc::new(EventBus::new());
    let mut clock = GameClock::from_prefs(&config, &store, time.clone(), Arc::clone(&bus))?;

    if ipc_mode {
        run_ipc_loop(&mut clock, &time, &store)?;
    } else {
        println!("starclock: clock-runner");
        println!("  epoch:   {}", clock.calendar().epoch());
        println!("  year:    {} days", clock.calendar().days_per_year());
        println!("  speed:   {}", clock.speed());
        println!("  seconds: {seconds}");
        println!();
        bus.subscribe(ClockEventKind::SpeedChanged, |event| println!("  event: {event:?}"));
        bus.subscribe(ClockEventKind::PauseChanged, |event| println!("  event: {event:?}"));
        let RunnerTime::Manual(manual) = &time else {
            bail!("demo mode needs manual time");
        };
        run_demo(&mut clock, manual, seconds);
        print_summary(&mut clock);
    }

    Ok(())
}

/// Scripted session: a quarter at normal speed, a pause, then the rest
/// split across faster settings.
fn run_demo(clock: &mut GameClock, time: &ManualTimeSource, seconds: Seconds) {
    let quarter = seconds / 4.0;
    time.advance(quarter);
    clock.apply(ClockCommand::Pause);
    time.advance(quarter);
    clock.apply(ClockCommand::Resume);
    clock.apply(ClockCommand::SpeedUp);
    time.advance(quarter);
    clock.apply(ClockCommand::SetSpeed { speed: GameSpeed::Fastest });
    time.advance(quarter);
}

fn run_ipc_loop(clock: &mut GameClock, time: &RunnerTime, store: &ClockStore) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let request: IpcRequest = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match request {
            IpcRequest::Quit => break,
            IpcRequest::GetState => {}
            IpcRequest::Advance { seconds } => match time {
                RunnerTime::Manual(manual) => manual.advance(seconds),
                RunnerTime::System(_) => {
                    write_error(&mut stdout, "advance requires --manual-time")?;
                    continue;
                }
            },
            IpcRequest::Command { command } => {
                clock.apply(command);
            }
            IpcRequest::Snapshot => {
                if let Err(e) = store.save_snapshot(&clock.snapshot()) {
                    write_error(&mut stdout, &e.to_string())?;
                    continue;
                }
            }
        }
        let state = build_ui_state(clock);
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn build_ui_state(clock: &mut GameClock) -> UiState {
    UiState {
        session_id:       clock.session_id().to_string(),
        date:             clock.date(),
        accumulated_days: clock.accumulated_days(),
        speed:            clock.speed(),
        paused:           clock.is_paused(),
        real_time_less_time_paused: clock.real_time_less_time_paused(),
    }
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{err_json}")?;
    stdout.flush()?;
    Ok(())
}

fn print_summary(clock: &mut GameClock) {
    println!();
    println!("── Summary ─────────────────────────────");
    println!("  session:          {}", clock.session_id());
    println!("  date:             {}", clock.date());
    println!("  simulated days:   {:.3}", clock.accumulated_days());
    println!("  speed:            {} (×{})", clock.speed(), clock.multiplier());
    println!("  real time, unpaused: {:.3}s", clock.real_time_less_time_paused());
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    find_arg(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
