//! Time-stepping driver: a deterministic `Engine` core and the
//! `Simulator` wrapper that runs it on a cancellable background task.
//!
//! The engine is the single writer of all simulation state. The
//! presentation layer reads consistent copies through [`Simulator::snapshot`];
//! the mutex around the engine is the publication point, so readers can
//! never observe a half-updated tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::config::{ModeConfig, SimulationConfig};
use crate::events::{self, EventDetector, ObserverLocation, Phase};
use crate::model::{OrbitalModel, SimulationState};
use crate::report::Report;
use crate::units::reference_epoch;

/// Base time step in seconds; speed settings scale it by powers of two.
const BASE_STEP_SECONDS: f64 = 0.01;

/// Warm-up subtracted from the start offset so a run begins shortly
/// before midnight and the first detected event is a clean one.
const REAL_WARMUP_SECONDS: f64 = 1_800.0;
const DEMO_WARMUP_SECONDS: f64 = 200.0;

/// Steps executed per lock acquisition by the background task.
/// Cancellation is polled between slices.
const STEPS_PER_SLICE: u32 = 256;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid start date: day {day}, month {month}")]
    InvalidDate { day: u32, month: u32 },
}

/// Consistent copy of everything the presentation layer reads per frame.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub state: SimulationState,
    pub phase: Phase,
    pub report: String,
    pub count: u64,
}

/// Synchronous simulation core: advances time by a signed step,
/// recomputes the orbital model, and runs event detection once per
/// whole simulated second.
#[derive(Debug)]
pub struct Engine {
    model: OrbitalModel,
    mode: ModeConfig,
    observer: ObserverLocation,
    detector: EventDetector,
    report: Report,
    state: SimulationState,
    phase: Phase,
    time: f64,
    dt: f64,
    last_check: f64,
    count: u64,
    stop_next_noon: bool,
}

impl Engine {
    pub fn new(
        mode: ModeConfig,
        obliquity_deg: f64,
        eccentricity: f64,
        observer: ObserverLocation,
    ) -> Self {
        let model = OrbitalModel {
            obliquity_deg,
            eccentricity,
            mean_orbital_rate: mode.mean_orbital_rate,
            one_day: mode.one_day,
        };
        let state = model.recompute(0.0);
        Self {
            model,
            mode,
            observer,
            detector: EventDetector::new(),
            report: Report::new(mode),
            state,
            phase: Phase::ForeMidnight,
            time: 0.0,
            dt: BASE_STEP_SECONDS,
            last_check: 0.0,
            count: 0,
            stop_next_noon: false,
        }
    }

    /// Build an engine from loaded settings: mode, observer latitude,
    /// speed, and start date applied in one go.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let mut engine = Self::new(
            ModeConfig::for_mode(config.demo),
            config.obliquity_deg,
            config.eccentricity,
            ObserverLocation::from_latitude_deg(config.latitude_deg),
        );
        engine.set_speed(config.speed_index);
        engine.init_time(config.day, config.month)?;
        Ok(engine)
    }

    /// Reset simulated time to the given date in the reference year,
    /// minus the mode's warm-up offset.
    pub fn init_time(&mut self, day: u32, month: u32) -> Result<(), SimulationError> {
        let date = NaiveDate::from_ymd_opt(2014, month, day)
            .ok_or(SimulationError::InvalidDate { day, month })?;
        let offset = (date.and_time(NaiveTime::MIN) - reference_epoch()).num_seconds() as f64;
        let warmup = if self.mode.demo {
            DEMO_WARMUP_SECONDS
        } else {
            REAL_WARMUP_SECONDS
        };
        self.time = offset - warmup;
        self.phase = Phase::ForeMidnight;
        self.detector.reset();
        self.update();
        Ok(())
    }

    /// Set the step magnitude to `0.01 * 2^index` seconds. Also resets
    /// the step direction to forward.
    pub fn set_speed(&mut self, index: i32) {
        self.dt = BASE_STEP_SECONDS * 2f64.powi(index);
    }

    /// Flip the sign of the time step. The detector's previous sample
    /// is discarded so no crossing fires against opposite-direction data.
    pub fn invert_time(&mut self) {
        self.dt = -self.dt;
        self.detector.reset();
        self.last_check = 0.0;
    }

    pub fn set_obliquity(&mut self, obliquity_deg: f64) {
        self.model.obliquity_deg = obliquity_deg;
        self.update();
    }

    pub fn set_eccentricity(&mut self, eccentricity: f64) {
        self.model.eccentricity = eccentricity;
        self.update();
    }

    pub fn set_observer(&mut self, observer: ObserverLocation) {
        self.observer = observer;
        self.detector.reset();
    }

    /// Swap in the other mode's constants. Same algorithm, different
    /// orbital rate, day length, and report layout.
    pub fn set_demo_mode(&mut self, demo: bool) {
        self.mode = ModeConfig::for_mode(demo);
        self.model.mean_orbital_rate = self.mode.mean_orbital_rate;
        self.model.one_day = self.mode.one_day;
        self.report.set_mode(self.mode);
        self.update();
    }

    pub fn request_noon_stop(&mut self, stop: bool) {
        self.stop_next_noon = stop;
    }

    /// Reset per-run state: report, deltas, detector history, counter.
    pub fn begin_run(&mut self, stop_next_noon: bool) {
        self.report.clear();
        self.detector.reset();
        self.count = 0;
        self.last_check = 0.0;
        self.stop_next_noon = stop_next_noon;
    }

    /// Advance one step. Returns `false` when a noon-stop halts the run;
    /// simulated time has then been rewound to the interpolated noon and
    /// the state recomputed there.
    pub fn step(&mut self) -> bool {
        self.count += 1;
        self.time += self.dt;
        self.update();

        // Detection runs once per whole simulated second, in either
        // stepping direction.
        if (self.time - self.last_check).abs() >= 1.0 {
            if !self.check_events() {
                return false;
            }
            self.last_check = self.time;
        }
        true
    }

    fn check_events(&mut self) -> bool {
        if self.observer.is_identity() {
            return true;
        }

        let sample = events::sample(&self.state, &self.observer);
        let outcome = self.detector.check(sample, self.stop_next_noon);

        for crossing in &outcome.crossings {
            self.phase = crossing.event.phase();
            self.report
                .record(crossing.event, crossing.time, self.state.orbital_angle);
        }

        if let Some(noon) = outcome.noon_stop {
            self.stop_next_noon = false;
            self.time = noon;
            self.update();
            return false;
        }
        true
    }

    fn update(&mut self) {
        self.state = self.model.recompute(self.time);
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn report_text(&self) -> &str {
        self.report.text()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mode(&self) -> ModeConfig {
        self.mode
    }

    pub fn observer(&self) -> &ObserverLocation {
        &self.observer
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state.clone(),
            phase: self.phase,
            report: self.report.text().to_string(),
            count: self.count,
        }
    }
}

/// Background driver. At most one step loop runs per simulator;
/// `start` while running is a no-op and `stop` blocks until the loop
/// has fully exited.
pub struct Simulator {
    engine: Arc<Mutex<Engine>>,
    cancel: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Simulator {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            cancel: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Spawn the step loop. No-op if it is already running.
    pub fn start(&mut self, stop_at_noon: bool) {
        if self.is_busy() {
            return;
        }
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }

        self.cancel.store(false, Ordering::Relaxed);
        lock(&self.engine).begin_run(stop_at_noon);

        let engine = Arc::clone(&self.engine);
        let cancel = Arc::clone(&self.cancel);
        self.worker = Some(std::thread::spawn(move || {
            while !cancel.load(Ordering::Relaxed) {
                let mut engine = lock(&engine);
                for _ in 0..STEPS_PER_SLICE {
                    if !engine.step() {
                        return;
                    }
                }
            }
        }));
    }

    /// Request cancellation and join the worker before returning.
    pub fn stop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
        self.cancel.store(false, Ordering::Relaxed);
        lock(&self.engine).request_noon_stop(false);
    }

    pub fn is_busy(&self) -> bool {
        self.worker.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Consistent copy of the latest published state for the
    /// presentation layer.
    pub fn snapshot(&self) -> Snapshot {
        lock(&self.engine).snapshot()
    }

    pub fn init_time(&self, day: u32, month: u32) -> Result<(), SimulationError> {
        lock(&self.engine).init_time(day, month)
    }

    pub fn set_speed(&self, index: i32) {
        lock(&self.engine).set_speed(index);
    }

    pub fn invert_time(&self) {
        lock(&self.engine).invert_time();
    }

    pub fn set_demo_mode(&self, demo: bool) {
        lock(&self.engine).set_demo_mode(demo);
    }

    pub fn set_observer(&self, observer: ObserverLocation) {
        lock(&self.engine).set_observer(observer);
    }

    /// Arm (or disarm) the noon-stop flag on a running simulation.
    pub fn request_noon_stop(&self, stop: bool) {
        lock(&self.engine).request_noon_stop(stop);
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

fn lock(engine: &Mutex<Engine>) -> MutexGuard<'_, Engine> {
    engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
