//! lifeterm - Conway's Game of Life in the terminal
//!
//! Seeds a random grid, then repeatedly draws it and computes the next
//! generation until every cell is dead. Only cells that changed are
//! redrawn each frame.
//!
//! # Quick Start
//!
//! ```text
//! lifeterm                 # Run continuously with ~/.lifeterm/config.toml
//! lifeterm --step          # Wait for a key between generations
//! lifeterm --seed 42       # Reproducible starting population
//! ```
//!
//! Press `q`, `Esc` or `Ctrl+C` to quit.

use std::env;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use lifeterm::config::{home_dir, Config};
use lifeterm::grid::random_grid;
use lifeterm::{App, CellStyle, Renderer, TerminalGuard, Tick};

/// Command line options
#[derive(Debug, Default)]
struct Options {
    /// Wait for a key press between generations
    step: bool,
    /// RNG seed for the initial population
    seed: Option<u64>,
    /// Stop after this many generations
    generations: Option<u64>,
    /// Overrides the configured seeding probability
    probability: Option<f64>,
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    eprintln!("lifeterm {} - Game of Life in the terminal", VERSION);
    eprintln!();
    eprintln!("Usage: lifeterm [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --step                Wait for a key press between generations");
    eprintln!("  --seed <N>            Seed for the random starting population");
    eprintln!("  --generations <N>     Stop after N generations");
    eprintln!("  --probability <P>     Chance (0 to 1) that a cell starts alive");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Keys: q / Esc / Ctrl+C quit; any other key advances in --step mode");
    eprintln!();
    eprintln!("Configuration: ~/.lifeterm/config.toml");
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, name: &str) -> Result<T, String> {
    let raw = args
        .get(i)
        .ok_or_else(|| format!("Missing value for {}", name))?;
    raw.parse()
        .map_err(|_| format!("Invalid value for {}: {}", name, raw))
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                eprintln!("lifeterm {}", VERSION);
                std::process::exit(0);
            }
            "--step" => options.step = true,
            "--seed" => {
                i += 1;
                options.seed = Some(parse_value(args, i, "--seed")?);
            }
            "--generations" => {
                i += 1;
                options.generations = Some(parse_value(args, i, "--generations")?);
            }
            "--probability" => {
                i += 1;
                options.probability = Some(parse_value(args, i, "--probability")?);
            }
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(options)
}

/// Log to a file; the terminal belongs to the renderer
fn init_logging() {
    let log_path = home_dir()
        .map(|h| h.join(".lifeterm").join("lifeterm.log"))
        .unwrap_or_else(|| PathBuf::from("lifeterm.log"));

    if let Some(parent) = log_path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    init_logging();
    info!("lifeterm {} starting...", VERSION);

    let mut config = Config::load();
    if let Some(probability) = options.probability {
        config.probability = probability;
    }
    config.validate()?;

    match run(&config, &options) {
        Ok(summary) => {
            info!("{}", summary);
            eprintln!("{}", summary);
            Ok(())
        }
        Err(e) => {
            error!("Run aborted: {:#}", e);
            Err(e)
        }
    }
}

/// Run the simulation until extinction, the generation limit, or quit.
///
/// Returns a one-line summary for the user.
fn run(config: &Config, options: &Options) -> anyhow::Result<String> {
    info!(
        "Grid {}x{}, cell {}x{}, probability {}, step mode {}",
        config.rows,
        config.columns,
        config.cell_width,
        config.cell_height,
        config.probability,
        options.step
    );

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let grid = random_grid(config.rows, config.columns, config.probability, &mut rng)
        .context("Failed to create grid")?;

    let out = BufWriter::with_capacity(65536, io::stdout());
    let renderer = Renderer::new(config.rows, config.columns, config.render_options(), out)
        .context("Failed to create display")?;
    let screen_size = renderer.screen_size();
    let mut app = App::new(grid, renderer, CellStyle::from_config(config))?;

    let _guard = TerminalGuard::enter(screen_size).context("Failed to set up terminal")?;
    app.clear()?;

    let delay = Duration::from_millis(config.delay_ms);
    loop {
        app.draw()?;

        let generation = app.simulation().generation();
        if options.generations.is_some_and(|limit| generation >= limit) {
            return Ok(format!("Stopped after {} generations", generation));
        }

        let timeout = if options.step { None } else { Some(delay) };
        if wait_for_input(timeout)? == Input::Quit {
            return Ok(format!("Quit at generation {}", generation));
        }

        if app.tick()? == Tick::Extinct {
            return Ok(format!(
                "Population died out after {} generations",
                app.simulation().generation()
            ));
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Continue,
    Quit,
}

/// Wait for the next generation.
///
/// With a timeout, returns `Continue` once it elapses; without one, any
/// key press continues. Quit keys end the wait either way.
fn wait_for_input(timeout: Option<Duration>) -> io::Result<Input> {
    let deadline = timeout.map(|t| Instant::now() + t);

    loop {
        let evt = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if !event::poll(remaining)? {
                    return Ok(Input::Continue);
                }
                event::read()?
            }
            None => event::read()?,
        };

        let Event::Key(key_event) = evt else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Input::Quit),
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(Input::Quit)
            }
            _ if deadline.is_none() => return Ok(Input::Continue),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("lifeterm")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_defaults() {
        let options = parse_args(&args(&[])).unwrap();
        assert!(!options.step);
        assert_eq!(options.seed, None);
        assert_eq!(options.generations, None);
    }

    #[test]
    fn test_parse_options() {
        let options = parse_args(&args(&[
            "--step",
            "--seed",
            "42",
            "--generations",
            "10",
            "--probability",
            "0.5",
        ]))
        .unwrap();
        assert!(options.step);
        assert_eq!(options.seed, Some(42));
        assert_eq!(options.generations, Some(10));
        assert_eq!(options.probability, Some(0.5));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["--seed"])).is_err());
        assert!(parse_args(&args(&["--generations", "ten"])).is_err());
    }
}
