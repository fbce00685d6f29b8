//! Neon Apex headless runner
//!
//! Plays a seeded session on autopilot without a window. Useful for balance
//! checks and for reproducing a run from its seed.
//!
//! Usage: neon-apex [--seed N] [--frames N] [--tuning PATH] [--settings PATH] [--events]

#[cfg(not(target_arch = "wasm32"))]
use std::io::Write;

#[cfg(not(target_arch = "wasm32"))]
use neon_apex::{
    Settings, Tuning,
    audio::{AudioManager, SoundSink, Tone},
    renderer,
    sim::{GameState, TickInput, tick},
    ui::Hud,
};

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_FRAMES: u64 = 60 * 60 * 3;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
struct Options {
    seed: u64,
    frames: u64,
    tuning: Option<String>,
    settings: Option<String>,
    events: bool,
}

#[cfg(not(target_arch = "wasm32"))]
impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut opts = Options {
            seed: 0,
            frames: DEFAULT_FRAMES,
            tuning: None,
            settings: None,
            events: false,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => opts.seed = parse_number(&arg, args.next())?,
                "--frames" => opts.frames = parse_number(&arg, args.next())?,
                "--tuning" => opts.tuning = Some(args.next().ok_or("--tuning needs a path")?),
                "--settings" => opts.settings = Some(args.next().ok_or("--settings needs a path")?),
                "--events" => opts.events = true,
                other => return Err(format!("unknown argument: {other}")),
            }
        }
        Ok(opts)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_number(flag: &str, value: Option<String>) -> Result<u64, String> {
    let value = value.ok_or_else(|| format!("{flag} needs a value"))?;
    value
        .parse()
        .map_err(|err| format!("invalid value for {flag}: {value} ({err})"))
}

/// Counts tones instead of synthesizing them
#[cfg(not(target_arch = "wasm32"))]
#[derive(Default)]
struct ToneCounter {
    played: usize,
}

#[cfg(not(target_arch = "wasm32"))]
impl SoundSink for ToneCounter {
    fn play_tone(&mut self, _tone: &Tone, _volume: f32) {
        self.played += 1;
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let opts = match Options::parse(std::env::args().skip(1)) {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("{err}");
            eprintln!(
                "usage: neon-apex [--seed N] [--frames N] [--tuning PATH] [--settings PATH] [--events]"
            );
            std::process::exit(2);
        }
    };

    let tuning = match &opts.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("Failed to load tuning {path}: {err}");
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };
    let settings = opts
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();

    log::info!(
        "Neon Apex (headless) starting: seed {}, {} frames",
        opts.seed,
        opts.frames
    );

    let mut state = GameState::new(opts.seed, tuning);
    let mut hud = Hud::default();
    let mut audio = AudioManager::from_settings(&settings);
    let mut sink = ToneCounter::default();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for frame in 0..opts.frames {
        let input = TickInput {
            start: frame == 0,
            idle_mode: true,
            ..TickInput::default()
        };
        tick(&mut state, &input);

        let events = state.drain_events();
        let now_ms = state.time_ticks as f64 * 1000.0 / 60.0;
        audio.dispatch(&events, now_ms, &mut sink);
        hud.apply_all(&events);

        if opts.events {
            for event in &events {
                match serde_json::to_string(event) {
                    Ok(line) => {
                        if writeln!(out, "{line}").is_err() {
                            return;
                        }
                    }
                    Err(err) => log::warn!("Failed to encode event: {err}"),
                }
            }
        }

        if state.is_over() {
            break;
        }
    }

    let vertices = renderer::build_frame(&state, &settings);
    log::info!(
        "Finished after {} frames: score {}, weapon {}, phase {:?}, {} tones, {} vertices in last frame",
        state.time_ticks,
        hud.score,
        hud.weapon_label(),
        state.phase,
        sink.played,
        vertices.len()
    );
    if !opts.events {
        println!(
            "score={} weapon_level={} frames={} game_over={}",
            state.score,
            state.agent.weapon_level,
            state.time_ticks,
            state.is_over()
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive the library directly
}
