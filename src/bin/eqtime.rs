use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use equation_of_time::config::{SimulationConfig, load_simulation_config};
use equation_of_time::simulator::{Engine, Simulator};

/// Run the equation-of-time simulation headless and print the report.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Equation-of-time report generator (sunrise/noon/sunset deltas)"
)]
struct Cli {
    /// Optional YAML settings file; the flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start day of month (applied to the 2014 reference year)
    #[arg(long)]
    day: Option<u32>,

    /// Start month
    #[arg(long)]
    month: Option<u32>,

    /// Observer latitude in degrees
    #[arg(long)]
    latitude: Option<f64>,

    /// Obliquity in degrees
    #[arg(long)]
    obliquity: Option<f64>,

    /// Orbital eccentricity (approximation holds below 0.1)
    #[arg(long)]
    eccentricity: Option<f64>,

    /// Power-of-two speed exponent: dt = 0.01 * 2^SPEED seconds
    #[arg(long)]
    speed: Option<i32>,

    /// Use the compressed classroom demo parameter set
    #[arg(long)]
    demo: bool,

    /// Halt exactly at the next interpolated solar noon
    #[arg(long)]
    noon_stop: bool,

    /// Simulated days to cover before stopping
    #[arg(long, default_value_t = 3.0)]
    days: f64,

    /// Wall-clock budget in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_simulation_config(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(day) = cli.day {
        config.day = day;
    }
    if let Some(month) = cli.month {
        config.month = month;
    }
    if let Some(latitude) = cli.latitude {
        config.latitude_deg = latitude;
    }
    if let Some(obliquity) = cli.obliquity {
        config.obliquity_deg = obliquity;
    }
    if let Some(eccentricity) = cli.eccentricity {
        config.eccentricity = eccentricity;
    }
    if let Some(speed) = cli.speed {
        config.speed_index = speed;
    }
    if cli.demo {
        config.demo = true;
    }

    let engine = Engine::from_config(&config)?;
    let mut simulator = Simulator::new(engine);

    let start_time = simulator.snapshot().state.time;
    let budget = cli.days * one_day_for(&config);

    simulator.start(cli.noon_stop);
    let deadline = Instant::now() + Duration::from_secs(cli.timeout);
    loop {
        thread::sleep(Duration::from_millis(25));
        if !simulator.is_busy() {
            break;
        }
        let snapshot = simulator.snapshot();
        if (snapshot.state.time - start_time).abs() >= budget {
            break;
        }
        if Instant::now() >= deadline {
            eprintln!("wall-clock budget exhausted after {} s", cli.timeout);
            break;
        }
    }
    simulator.stop();

    println!("{}", simulator.snapshot().report);
    Ok(())
}

fn one_day_for(config: &SimulationConfig) -> f64 {
    equation_of_time::config::ModeConfig::for_mode(config.demo).one_day
}
