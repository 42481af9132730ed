//! MooreFSM scanner demo: host entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  MonotonicClock    LogDiagnostics      LogStrip              │
//! │  (TimeSource)      (DiagnosticsSink)   (LedStripPort)        │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │            ControlLoop (pure logic)                    │  │
//! │  │  Scanners · MooreFsm · LifecycleScript                 │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `moorefsm [run_secs] [config.json] [-v]`
//!
//! `-v` logs every rendered strip frame.

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use log::info;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use moorefsm::adapters::diagnostics::LogDiagnostics;
use moorefsm::adapters::strip::LogStrip;
use moorefsm::adapters::time::MonotonicClock;
use moorefsm::app::ports::TimeSource;
use moorefsm::app::service::ControlLoop;
use moorefsm::config::SystemConfig;

const DEFAULT_RUN_SECS: f64 = 20.0;

#[derive(Debug)]
struct Args {
    run_secs: f64,
    config_path: Option<String>,
    verbose: bool,
}

/// Parse everything after the program name.  Runs before the logger is
/// installed, so problems are returned rather than logged.
fn parse_args(argv: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut args = Args {
        run_secs: DEFAULT_RUN_SECS,
        config_path: None,
        verbose: false,
    };
    let mut positional = 0;
    for arg in argv {
        if arg == "-v" || arg == "--verbose" {
            args.verbose = true;
            continue;
        }
        match positional {
            0 => {
                args.run_secs = arg
                    .parse()
                    .with_context(|| format!("run_secs must be a number, got '{arg}'"))?;
            }
            1 => args.config_path = Some(arg),
            _ => bail!("unexpected extra argument '{arg}'"),
        }
        positional += 1;
    }
    Ok(args)
}

fn load_config(path: Option<&str>) -> Result<SystemConfig> {
    let Some(path) = path else {
        return Ok(SystemConfig::default());
    };
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    SystemConfig::from_json(&json).with_context(|| format!("parsing {path}"))
}

fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;

    info!("MooreFSM scanner demo v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(args.config_path.as_deref())?;
    let mut app = ControlLoop::new(&config)?;

    let clock = MonotonicClock::new();
    let mut diagnostics = LogDiagnostics::new();
    let mut strip = LogStrip::new();
    let period = Duration::from_millis(u64::from(config.cycle_period_ms));

    info!("running for {:.1}s", args.run_secs);
    while clock.now_secs() < args.run_secs {
        app.cycle(&clock, &mut diagnostics, &mut strip);
        thread::sleep(period);
    }

    info!(
        "done: {} cycles, {} transitions",
        app.cycle_count(),
        app.transition_count()
    );
    for scanner in app.scanners() {
        info!(
            "scanner '{}': {:?} after {} active ticks",
            scanner.name(),
            scanner.current(),
            scanner.fsm().cycles()
        );
    }
    Ok(())
}
