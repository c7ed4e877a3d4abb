//! Day-over-day event report: an append-only text buffer with one line
//! per calendar date (real mode) or orbit degree (demo mode).
//!
//! Nothing is emitted until the first midnight opens a line; event
//! columns are then appended in the order the crossings are detected.

use chrono::{Datelike, Duration, Timelike};

use crate::config::ModeConfig;
use crate::events::SolarEvent;
use crate::units::reference_epoch;

const REAL_HEADER: &str = "Date    Sunrise  Diff  Noon     Diff  Sunset   Diff";
const DEMO_HEADER: &str = "Orbit   Noon      Diff";

/// Demo-mode noon lands at 12:00:09.5 without this correction. The
/// offset is empirical and unexplained; kept as-is for compatibility.
const DEMO_NOON_OFFSET: f64 = 9.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Sunrise,
    Noon,
    Sunset,
}

/// Report buffer plus the per-event last-occurrence times used to
/// compute the next day-over-day delta. Reset at the start of each run.
#[derive(Debug, Clone)]
pub struct Report {
    mode: ModeConfig,
    text: String,
    last_sunrise: Option<f64>,
    last_noon: Option<f64>,
    last_sunset: Option<f64>,
}

impl Report {
    pub fn new(mode: ModeConfig) -> Self {
        Self {
            mode,
            text: String::new(),
            last_sunrise: None,
            last_noon: None,
            last_sunset: None,
        }
    }

    /// Switch report layout constants along with the simulation mode.
    pub fn set_mode(&mut self, mode: ModeConfig) {
        self.mode = mode;
    }

    /// Empty the buffer and forget all last-occurrence times.
    pub fn clear(&mut self) {
        self.text.clear();
        self.last_sunrise = None;
        self.last_noon = None;
        self.last_sunset = None;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Record a detected event at its interpolated time. Midnight opens
    /// a new line (and the header, the first time); the other events
    /// append a time/delta column pair.
    pub fn record(&mut self, event: SolarEvent, corr_time: f64, orbital_angle: f64) {
        match event {
            SolarEvent::Sunrise => self.append_column(Column::Sunrise, corr_time),
            SolarEvent::Noon => self.append_column(Column::Noon, corr_time),
            SolarEvent::Sunset => self.append_column(Column::Sunset, corr_time),
            SolarEvent::Midnight => self.begin_line(corr_time, orbital_angle),
        }
    }

    fn append_column(&mut self, column: Column, corr_time: f64) {
        let mut corr_time = corr_time;
        if self.mode.demo {
            if column != Column::Noon {
                return;
            }
            corr_time -= DEMO_NOON_OFFSET;
        }

        let last = match column {
            Column::Sunrise => &mut self.last_sunrise,
            Column::Noon => &mut self.last_noon,
            Column::Sunset => &mut self.last_sunset,
        };
        let previous = last.replace(corr_time);

        // Delta tracking starts right away, but nothing is printed
        // before the first midnight has opened a line.
        if self.text.is_empty() {
            return;
        }

        let diff = match previous {
            None => " ---".to_string(),
            Some(prev) => self.format_diff(corr_time - prev),
        };
        let time = self.format_time(corr_time);
        self.text.push_str(&format!("  {time} {diff}"));
    }

    fn begin_line(&mut self, corr_time: f64, orbital_angle: f64) {
        if self.mode.demo {
            if self.text.is_empty() {
                self.text.push_str(DEMO_HEADER);
            }
            let degrees = orbital_angle.to_degrees() % 360.0;
            self.text.push_str(&format!("\n{:03}°: ", degrees.round() as i64));
        } else {
            if self.text.is_empty() {
                self.text.push_str(REAL_HEADER);
            }
            let mut now =
                reference_epoch() + Duration::milliseconds((corr_time * 1000.0).round() as i64);
            // An interpolated midnight can land just before the date
            // boundary; bump it across so the line carries the new date.
            if now.hour() == 23 {
                now += Duration::hours(1);
            }
            self.text
                .push_str(&format!("\n{:02}.{:02}.", now.day(), now.month()));
        }
    }

    /// Signed deviation, in whole seconds, of an event interval from the
    /// nominal day length. Zero prints with a blank sign.
    fn format_diff(&self, interval: f64) -> String {
        let diff = (interval - self.mode.one_day).round() as i64;
        let sign = if diff == 0 {
            ' '
        } else if diff < 0 {
            '-'
        } else {
            '+'
        };
        let width = if self.mode.demo { 4 } else { 3 };
        format!("{sign}{:0width$}", diff.abs())
    }

    /// Time of day as HH:MM:SS, truncating whole days off the rounded
    /// second count.
    fn format_time(&self, seconds: f64) -> String {
        let mut t = seconds.round() / self.mode.one_day;
        t -= t.trunc();

        t *= 24.0;
        let h = t.trunc();
        t -= h;

        t *= 60.0;
        let m = t.trunc();
        t -= m;

        t *= 60.0;
        let s = t.trunc();

        format!("{:02}:{:02}:{:02}", h as i64, m as i64, s as i64)
    }
}
