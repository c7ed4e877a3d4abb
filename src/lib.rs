//! Equation-of-time simulator core.
//!
//! Models the day-to-day discrepancy between apparent and mean solar
//! time caused by Earth's axial tilt and orbital eccentricity: a
//! closed-form orbital model, a solar-event detector with sub-sample
//! interpolation, and a background time-stepping driver. Keeping the
//! logic in a library crate lets front-ends (CLI, 3D viewers) share it;
//! rendering and input handling stay outside.

pub mod config;
pub mod events;
pub mod model;
pub mod report;
pub mod simulator;
pub mod units;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
