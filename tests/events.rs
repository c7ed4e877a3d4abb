use std::f64::consts::PI;

use equation_of_time::config::ModeConfig;
use equation_of_time::events::{
    self, EventDetector, EventSample, ObserverLocation, Phase, SolarEvent,
};
use equation_of_time::model::{EARTH_SPIN_RATE, OrbitalModel};

fn sample_at(time: f64, angle: f64, dist: f64) -> EventSample {
    EventSample { time, angle, dist }
}

#[test]
fn first_sample_only_records() {
    let mut detector = EventDetector::new();
    let outcome = detector.check(sample_at(100.0, 80.0, 1.0), false);
    assert!(outcome.crossings.is_empty());
    assert!(outcome.noon_stop.is_none());
}

#[test]
fn sunrise_time_is_recovered_by_interpolation() {
    // The angle falls through 90° exactly halfway between the samples.
    let mut detector = EventDetector::new();
    detector.check(sample_at(100.0, 92.0, -5.0), false);
    let outcome = detector.check(sample_at(101.0, 88.0, -4.0), false);

    assert_eq!(outcome.crossings.len(), 1);
    assert_eq!(outcome.crossings[0].event, SolarEvent::Sunrise);
    assert!((outcome.crossings[0].time - 100.5).abs() < 1e-12);
}

#[test]
fn interpolation_scales_with_the_sample_interval() {
    // dist crosses zero a quarter of the way into a 10-second interval.
    let mut detector = EventDetector::new();
    detector.check(sample_at(0.0, 50.0, -1.0), false);
    let outcome = detector.check(sample_at(10.0, 50.0, 3.0), false);

    assert_eq!(outcome.crossings.len(), 1);
    assert_eq!(outcome.crossings[0].event, SolarEvent::Noon);
    assert!((outcome.crossings[0].time - 2.5).abs() < 1e-12);
}

#[test]
fn crossings_come_in_the_fixed_order() {
    // Sunrise and noon in one tick: sunrise is reported first even
    // though both interpolate to the same instant.
    let mut detector = EventDetector::new();
    detector.check(sample_at(0.0, 92.0, -1.0), false);
    let outcome = detector.check(sample_at(1.0, 88.0, 1.0), false);

    let events: Vec<SolarEvent> = outcome.crossings.iter().map(|c| c.event).collect();
    assert_eq!(events, vec![SolarEvent::Sunrise, SolarEvent::Noon]);
}

#[test]
fn noon_stop_skips_the_remaining_checks() {
    let before = sample_at(0.0, 88.0, -1.0);
    let after = sample_at(1.0, 92.0, 1.0);

    let mut plain = EventDetector::new();
    plain.check(before, false);
    let outcome = plain.check(after, false);
    let events: Vec<SolarEvent> = outcome.crossings.iter().map(|c| c.event).collect();
    assert_eq!(events, vec![SolarEvent::Noon, SolarEvent::Sunset]);
    assert!(outcome.noon_stop.is_none());

    let mut stopping = EventDetector::new();
    stopping.check(before, true);
    let outcome = stopping.check(after, true);
    let events: Vec<SolarEvent> = outcome.crossings.iter().map(|c| c.event).collect();
    assert_eq!(events, vec![SolarEvent::Noon]);
    assert!((outcome.noon_stop.expect("noon stop") - 0.5).abs() < 1e-12);
}

#[test]
fn reset_discards_the_previous_sample() {
    let mut detector = EventDetector::new();
    detector.check(sample_at(0.0, 92.0, -1.0), false);
    detector.reset();
    let outcome = detector.check(sample_at(1.0, 88.0, 1.0), false);
    assert!(outcome.crossings.is_empty());
}

#[test]
fn events_map_to_their_phases() {
    assert_eq!(SolarEvent::Sunrise.phase(), Phase::Forenoon);
    assert_eq!(SolarEvent::Noon.phase(), Phase::Afternoon);
    assert_eq!(SolarEvent::Sunset.phase(), Phase::ForeMidnight);
    assert_eq!(SolarEvent::Midnight.phase(), Phase::AfterMidnight);
}

#[test]
fn identity_transform_means_no_observer() {
    assert!(ObserverLocation::identity().is_identity());
    assert!(!ObserverLocation::from_latitude_deg(51.0).is_identity());
    assert!(!ObserverLocation::from_latitude_deg(0.0).is_identity());
}

#[test]
fn latitude_places_the_observer_on_the_unit_sphere() {
    let observer = ObserverLocation::from_latitude_deg(51.0);
    let p = observer.local_position();
    let lat = 51f64.to_radians();
    assert!((p.x - lat.cos()).abs() < 1e-12);
    assert!(p.y.abs() < 1e-12);
    assert!((p.z - lat.sin()).abs() < 1e-12);
}

/// Model with a stationary Earth so the observer geometry can be probed
/// at chosen rotation angles.
fn pinned_model() -> OrbitalModel {
    OrbitalModel {
        obliquity_deg: 0.0,
        eccentricity: 0.0,
        mean_orbital_rate: 0.0,
        one_day: ModeConfig::real().one_day,
    }
}

#[test]
fn equatorial_observer_starts_at_solar_midnight() {
    // At time zero the observer sits on the far side of Earth from the
    // sun: zenith angle 180°, sun in the meridian plane.
    let state = pinned_model().recompute(0.0);
    let observer = ObserverLocation::from_latitude_deg(0.0);
    let s = events::sample(&state, &observer);
    assert!((s.angle - 180.0).abs() < 1e-9);
    assert!(s.dist.abs() < 1e-9);
}

#[test]
fn meridian_distance_flips_sign_at_noon() {
    let model = pinned_model();
    let observer = ObserverLocation::from_latitude_deg(0.0);

    // Half a rotation turns the observer toward the sun.
    let before = model.recompute((PI - 0.01) / EARTH_SPIN_RATE);
    let after = model.recompute((PI + 0.01) / EARTH_SPIN_RATE);

    let s_before = events::sample(&before, &observer);
    let s_after = events::sample(&after, &observer);
    assert!(s_before.dist < 0.0);
    assert!(s_after.dist > 0.0);
    assert!(s_before.angle < 90.0);
}
