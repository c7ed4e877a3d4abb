//! Closed-form orbital model: Earth orientation and position as a pure
//! function of simulated time.
//!
//! The orbital angle uses a first-order equation-of-center correction,
//! `mean - 2e·sin(mean - offset)`, which approximates the true anomaly
//! for small eccentricities only. Accuracy degrades above e ≈ 0.1; that
//! is a stated approximation boundary, not a defect.

use std::f64::consts::TAU;

use nalgebra::{Point3, UnitQuaternion, Vector3};

use crate::units::SIDEREAL_DAY_SECONDS;

/// Angular velocity of Earth's rotation about its own axis (rad/s).
pub const EARTH_SPIN_RATE: f64 = TAU / SIDEREAL_DAY_SECONDS;

/// Radius of the circle Earth is placed on. The orbit is drawn circular;
/// only the angular position carries the eccentricity correction, and
/// that decoupling is intentional.
pub const ORBIT_RADIUS: f64 = 3.0;

/// Earth's instantaneous orientation and position. Recomputed every step;
/// no history is retained.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    /// Simulated seconds since the reference epoch. Signed; the
    /// simulation may run backward.
    pub time: f64,
    /// Rotation about the polar (+Z) axis.
    pub earth_rotation: UnitQuaternion<f64>,
    /// Tilt of the rotation axis, about +Y by the negative obliquity.
    pub axial_tilt: UnitQuaternion<f64>,
    /// Position angle on the orbit, in radians. Continuous in time.
    pub orbital_angle: f64,
    /// Earth's position on the radius-3 display circle.
    pub earth_position: Point3<f64>,
}

/// Parameters of the closed-form model. The orbital rate and day length
/// come from the active mode; obliquity and eccentricity are adjustable.
#[derive(Debug, Clone)]
pub struct OrbitalModel {
    /// Angle between the equatorial and orbital planes, in degrees.
    pub obliquity_deg: f64,
    /// Eccentricity of the orbit. Valid range of the approximation is
    /// roughly e < 0.1; larger values are accepted but inaccurate.
    pub eccentricity: f64,
    /// Mean angular velocity of Earth around the sun (rad/s).
    pub mean_orbital_rate: f64,
    /// Length of one solar day in seconds for the active mode.
    pub one_day: f64,
}

impl OrbitalModel {
    /// Derive the full state for the given simulated time.
    pub fn recompute(&self, time: f64) -> SimulationState {
        let earth_rotation =
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), EARTH_SPIN_RATE * time);

        let axial_tilt =
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -self.obliquity_deg.to_radians());

        // Ellipse with perihelion in early January: the major axis is
        // anchored 15 solar days before the mean-rate zero point.
        let mean_angle = self.mean_orbital_rate * time;
        let phase_offset = 15.0 * self.mean_orbital_rate * self.one_day;
        let orbital_angle =
            mean_angle - 2.0 * self.eccentricity * (mean_angle - phase_offset).sin();

        let earth_position = Point3::new(
            ORBIT_RADIUS * orbital_angle.cos(),
            ORBIT_RADIUS * orbital_angle.sin(),
            0.0,
        );

        SimulationState {
            time,
            earth_rotation,
            axial_tilt,
            orbital_angle,
            earth_position,
        }
    }
}
