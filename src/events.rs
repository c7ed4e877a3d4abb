//! Solar-event detection: projects an observer through the Earth
//! transform and finds sunrise, noon, sunset, and midnight crossings
//! with sub-sample precision.

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

use crate::model::SimulationState;

/// Part of the solar day the observer is currently in. Transitions only
/// at detected event crossings and persists across ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Between sunrise and noon.
    Forenoon,
    /// Between noon and sunset.
    Afternoon,
    /// Between sunset and midnight.
    ForeMidnight,
    /// Between midnight and sunrise.
    AfterMidnight,
}

/// One of the four daily solar events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolarEvent {
    Sunrise,
    Noon,
    Sunset,
    Midnight,
}

impl SolarEvent {
    /// Phase entered when this event occurs.
    pub fn phase(self) -> Phase {
        match self {
            SolarEvent::Sunrise => Phase::Forenoon,
            SolarEvent::Noon => Phase::Afternoon,
            SolarEvent::Sunset => Phase::ForeMidnight,
            SolarEvent::Midnight => Phase::AfterMidnight,
        }
    }
}

/// Fixed observer position on Earth's surface, expressed as a transform
/// from the observer frame into the Earth-local frame. The identity
/// transform means "no observer"; event detection is then disabled.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverLocation {
    transform: Isometry3<f64>,
}

impl ObserverLocation {
    /// No observer; detection disabled.
    pub fn identity() -> Self {
        Self {
            transform: Isometry3::identity(),
        }
    }

    /// Observer at the given latitude on the unit sphere, at longitude
    /// zero: translate to (1, 0, 0), then rotate about +Y by the
    /// negative latitude.
    pub fn from_latitude_deg(latitude_deg: f64) -> Self {
        let spin: Isometry3<f64> = Isometry3::from_parts(
            Translation3::identity(),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -latitude_deg.to_radians()),
        );
        Self {
            transform: spin * Isometry3::translation(1.0, 0.0, 0.0),
        }
    }

    /// Observer with an arbitrary local-to-Earth transform, as supplied
    /// by the visualization layer.
    pub fn from_transform(transform: Isometry3<f64>) -> Self {
        Self { transform }
    }

    pub fn is_identity(&self) -> bool {
        self.transform == Isometry3::identity()
    }

    /// Observer position in the Earth-local frame.
    pub fn local_position(&self) -> Point3<f64> {
        self.transform.transform_point(&Point3::origin())
    }
}

/// Detection-tick measurement pair. Only the previous tick's sample is
/// retained, for interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventSample {
    /// Simulated time the sample was taken at.
    pub time: f64,
    /// Angle between the direction to the sun and the observer's zenith,
    /// in degrees. Crosses 90° at sunrise and sunset.
    pub angle: f64,
    /// Signed distance of the sun from the observer's meridian plane
    /// (Hesse normal form). Crosses zero at noon and midnight.
    pub dist: f64,
}

/// Measure the observer's sun angle and meridian distance for a state.
pub fn sample(state: &SimulationState, observer: &ObserverLocation) -> EventSample {
    let attitude = state.axial_tilt * state.earth_rotation;
    let local = observer.local_position();

    let location = state.earth_position + attitude.transform_vector(&local.coords);
    let dir_sun = -state.earth_position.coords;
    let zenith = location - state.earth_position;
    let angle = dir_sun.angle(&zenith).to_degrees();

    // The meridian plane is spanned by the rotation axis and the
    // observer's longitude; its normal is the Earth-local +Y axis
    // carried through the full attitude.
    let normal = attitude.transform_vector(&Vector3::y());
    let dist = normal.dot(&state.earth_position.coords);

    EventSample {
        time: state.time,
        angle,
        dist,
    }
}

/// A detected event with its interpolated time of occurrence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub event: SolarEvent,
    pub time: f64,
}

/// Result of one detection tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckOutcome {
    /// Crossings in the fixed sunrise → noon → sunset → midnight order.
    /// More than one can fire in a tick when the time step is large; the
    /// order determines their interleaving in the report.
    pub crossings: Vec<Crossing>,
    /// Set when noon fired while a noon-stop was requested: the driver
    /// must rewind time to this instant and halt. Checks after noon are
    /// skipped in that tick.
    pub noon_stop: Option<f64>,
}

/// Edge-triggered crossing detector over successive samples.
#[derive(Debug, Default)]
pub struct EventDetector {
    prev: Option<EventSample>,
}

impl EventDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the previous sample. The next check only records, so no
    /// crossing is detected against stale or opposite-direction data.
    pub fn reset(&mut self) {
        self.prev = None;
    }

    /// Compare against the previous sample and report any crossings,
    /// with times recovered by linear interpolation between the two
    /// sample instants.
    pub fn check(&mut self, sample: EventSample, stop_at_noon: bool) -> CheckOutcome {
        let mut outcome = CheckOutcome::default();
        let Some(prev) = self.prev else {
            self.prev = Some(sample);
            return outcome;
        };

        if sample.angle <= 90.0 && prev.angle > 90.0 {
            outcome.crossings.push(Crossing {
                event: SolarEvent::Sunrise,
                time: interpolate(&prev, &sample, (sample.angle - 90.0) / (sample.angle - prev.angle)),
            });
        }

        if sample.dist >= 0.0 && prev.dist < 0.0 {
            let time = interpolate(&prev, &sample, sample.dist / (sample.dist - prev.dist));
            outcome.crossings.push(Crossing {
                event: SolarEvent::Noon,
                time,
            });
            if stop_at_noon {
                outcome.noon_stop = Some(time);
                return outcome;
            }
        }

        if sample.angle >= 90.0 && prev.angle < 90.0 {
            outcome.crossings.push(Crossing {
                event: SolarEvent::Sunset,
                time: interpolate(&prev, &sample, (sample.angle - 90.0) / (sample.angle - prev.angle)),
            });
        }

        if sample.dist <= 0.0 && prev.dist > 0.0 {
            outcome.crossings.push(Crossing {
                event: SolarEvent::Midnight,
                time: interpolate(&prev, &sample, sample.dist / (sample.dist - prev.dist)),
            });
        }

        self.prev = Some(sample);
        outcome
    }
}

/// Step back from the current sample time by the given fraction of the
/// interval between the two samples. Exact for piecewise-linear signals.
fn interpolate(prev: &EventSample, current: &EventSample, fraction: f64) -> f64 {
    current.time - fraction * (current.time - prev.time)
}
