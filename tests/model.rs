use std::f64::consts::TAU;

use equation_of_time::config::ModeConfig;
use equation_of_time::model::{EARTH_SPIN_RATE, ORBIT_RADIUS, OrbitalModel};
use equation_of_time::units::{
    SECONDS_PER_DAY, SIDEREAL_DAY_SECONDS, SIDEREAL_YEAR_SECONDS, dhms_to_seconds,
};
use nalgebra::Vector3;

fn real_model(eccentricity: f64) -> OrbitalModel {
    let mode = ModeConfig::real();
    OrbitalModel {
        obliquity_deg: 23.44,
        eccentricity,
        mean_orbital_rate: mode.mean_orbital_rate,
        one_day: mode.one_day,
    }
}

#[test]
fn named_constants_match_dhms_breakdown() {
    assert!((dhms_to_seconds(0.0, 23.0, 56.0, 4.1) - SIDEREAL_DAY_SECONDS).abs() < 1e-6);
    assert!((dhms_to_seconds(365.0, 6.0, 9.0, 9.54) - SIDEREAL_YEAR_SECONDS).abs() < 1e-6);
    assert_eq!(dhms_to_seconds(1.0, 0.0, 0.0, 0.0), SECONDS_PER_DAY);
}

#[test]
fn quaternions_stay_unit_across_time() {
    let model = real_model(0.0167);
    for &t in &[-1.0e8, -12_345.678, 0.0, 1.0, SECONDS_PER_DAY, 3.1e7, 9.9e9] {
        let state = model.recompute(t);
        assert!((state.earth_rotation.quaternion().norm() - 1.0).abs() < 1e-9);
        assert!((state.axial_tilt.quaternion().norm() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn orbital_angle_is_continuous_through_zero() {
    let model = real_model(0.0167);
    let rate = model.mean_orbital_rate;
    let dt = 1.0;
    // The correction term slews the angular rate by at most 2e.
    let bound = rate * dt * (1.0 + 2.0 * model.eccentricity) + 1e-12;

    let mut t = -2.0 * SECONDS_PER_DAY;
    while t < 2.0 * SECONDS_PER_DAY {
        let a0 = model.recompute(t).orbital_angle;
        let a1 = model.recompute(t + dt).orbital_angle;
        assert!((a1 - a0).abs() <= bound, "jump at t = {t}");
        t += 977.0;
    }
}

#[test]
fn zero_eccentricity_reduces_to_mean_motion() {
    let model = real_model(0.0);
    for &t in &[-4.0e6, 0.0, 1.0e5, 2.9e7] {
        let state = model.recompute(t);
        let mean = model.mean_orbital_rate * t;
        assert!((state.orbital_angle - mean).abs() < 1e-12);
    }
}

#[test]
fn correction_vanishes_at_the_anchor_point() {
    // The major axis is anchored 15 solar days after the epoch, so the
    // eccentricity correction is zero exactly there.
    let model = real_model(0.0167);
    let t = 15.0 * model.one_day;
    let state = model.recompute(t);
    assert!((state.orbital_angle - model.mean_orbital_rate * t).abs() < 1e-12);
}

#[test]
fn earth_sits_on_the_display_circle() {
    let model = real_model(0.0167);
    for &t in &[-9.9e6, 0.0, 4.2e5, 1.6e7] {
        let p = model.recompute(t).earth_position;
        assert_eq!(p.z, 0.0);
        assert!((p.coords.norm() - ORBIT_RADIUS).abs() < 1e-9);
    }
}

#[test]
fn rotation_tracks_the_sidereal_rate() {
    let model = real_model(0.0167);
    let t = 1_234.5;
    let rotated = model.recompute(t).earth_rotation.transform_vector(&Vector3::x());
    let angle = EARTH_SPIN_RATE * t;
    assert!((rotated.x - angle.cos()).abs() < 1e-9);
    assert!((rotated.y - angle.sin()).abs() < 1e-9);
    assert!(rotated.z.abs() < 1e-12);
}

#[test]
fn axial_tilt_leans_the_pole_by_the_obliquity() {
    let model = real_model(0.0);
    let tilted = model.recompute(0.0).axial_tilt.transform_vector(&Vector3::z());
    let lean = tilted.dot(&Vector3::z()).acos().to_degrees();
    assert!((lean - 23.44).abs() < 1e-9);
}

#[test]
fn one_sidereal_day_is_a_full_rotation() {
    let model = real_model(0.0);
    let s0 = model.recompute(0.0);
    let s1 = model.recompute(SIDEREAL_DAY_SECONDS);
    let v0 = s0.earth_rotation.transform_vector(&Vector3::x());
    let v1 = s1.earth_rotation.transform_vector(&Vector3::x());
    assert!((v0 - v1).norm() < 1e-6);
    let check = TAU / EARTH_SPIN_RATE;
    assert!((check - SIDEREAL_DAY_SECONDS).abs() < 1e-6);
}
