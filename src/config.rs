//! Run configuration: mode parameter records and YAML-loadable settings.

use std::f64::consts::TAU;
use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::units::{SECONDS_PER_DAY, SIDEREAL_YEAR_SECONDS, dhms_to_seconds};

/// Constants that differ between real and demo mode. Selected once at
/// initialization; the algorithms are identical in both modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeConfig {
    /// Mean angular velocity of Earth around the sun (rad/s).
    pub mean_orbital_rate: f64,
    /// Length of one solar day in seconds.
    pub one_day: f64,
    /// Affects report layout: orbit-degree lines and wider delta fields.
    pub demo: bool,
}

impl ModeConfig {
    /// Real constants: sidereal year, 24-hour solar day.
    pub fn real() -> Self {
        Self {
            mean_orbital_rate: TAU / SIDEREAL_YEAR_SECONDS,
            one_day: SECONDS_PER_DAY,
            demo: false,
        }
    }

    /// Classroom demo constants: the year is compressed into ten days,
    /// which stretches the solar day 9309 seconds past 24 hours.
    pub fn demo() -> Self {
        Self {
            mean_orbital_rate: TAU / dhms_to_seconds(10.0, 0.0, 0.0, 0.0),
            one_day: dhms_to_seconds(1.0, 0.0, 0.0, 9_309.0),
            demo: true,
        }
    }

    pub fn for_mode(demo: bool) -> Self {
        if demo { Self::demo() } else { Self::real() }
    }
}

/// Adjustable simulation settings, loadable from a YAML manifest.
/// Missing fields fall back to the defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Start day of month (applied to the 2014 reference year).
    pub day: u32,
    /// Start month.
    pub month: u32,
    /// Observer latitude in degrees, e.g. Greenwich.
    pub latitude_deg: f64,
    /// Angle between the ecliptic and the celestial equator, degrees.
    pub obliquity_deg: f64,
    /// Orbital eccentricity. The model approximation holds for e < 0.1.
    pub eccentricity: f64,
    /// Power-of-two speed exponent: dt = 0.01 * 2^speed_index seconds.
    pub speed_index: i32,
    /// Use the exaggerated demo parameter set.
    pub demo: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            day: 21,
            month: 12,
            latitude_deg: 51.0,
            obliquity_deg: 23.44,
            eccentricity: 0.0167,
            speed_index: 0,
            demo: false,
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read YAML: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load simulation settings from a YAML file.
pub fn load_simulation_config<P: AsRef<Path>>(path: P) -> Result<SimulationConfig, ConfigError> {
    let reader = File::open(path)?;
    Ok(serde_yaml::from_reader(reader)?)
}
