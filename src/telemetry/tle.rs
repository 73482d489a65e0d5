//! Two-line element parsing and a circular-orbit ground-track approximation.
//!
//! This is deliberately coarse: no drag, no J2, eccentricity ignored. It is
//! good enough to place the spacecraft on a plausible sub-satellite point for
//! the decision loop, not for conjunction screening.

use crate::error::RiskError;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::f64::consts::PI;

const EARTH_MU_KM3_S2: f64 = 398_600.441_8;
const EARTH_RADIUS_KM: f64 = 6_378.137;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Built-in element set used when the live catalogue is unreachable.
pub const FALLBACK_TLE: (&str, &str) = (
    "1 25544U 98067A   24100.50000000  .00016717  00000-0  10270-3 0  9002",
    "2 25544  51.6400 208.9163 0002894 121.1600 239.0100 15.49999029999990",
);

#[derive(Debug, Clone, PartialEq)]
pub struct ElementSet {
    pub line1: String,
    pub line2: String,
    pub epoch: DateTime<Utc>,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub arg_perigee_deg: f64,
    pub mean_anomaly_deg: f64,
    pub mean_motion_rev_per_day: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_km: f64,
}

fn field<'a>(line: &'a str, range: std::ops::Range<usize>, name: &str) -> Result<&'a str, RiskError> {
    line.get(range)
        .map(str::trim)
        .ok_or_else(|| RiskError::InvalidTle(format!("line too short for {name}")))
}

fn number(line: &str, range: std::ops::Range<usize>, name: &str) -> Result<f64, RiskError> {
    let raw = field(line, range, name)?;
    raw.parse::<f64>()
        .map_err(|_| RiskError::InvalidTle(format!("{name} is not numeric: {raw:?}")))
}

fn parse_epoch(line1: &str) -> Result<DateTime<Utc>, RiskError> {
    let year = number(line1, 18..20, "epoch year")?;
    let day_of_year = number(line1, 20..32, "epoch day")?;
    if !(0.0..100.0).contains(&year) || year.fract() != 0.0 {
        return Err(RiskError::InvalidTle(format!("epoch year out of range: {year}")));
    }
    if !(1.0..367.0).contains(&day_of_year) {
        return Err(RiskError::InvalidTle(format!(
            "epoch day out of range: {day_of_year}"
        )));
    }
    // Two-digit years: 57..99 are 1900s, 00..56 are 2000s.
    #[allow(clippy::cast_possible_truncation)]
    let year = year as i32;
    let full_year = if year < 57 { 2000 + year } else { 1900 + year };
    let start = Utc
        .with_ymd_and_hms(full_year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| RiskError::InvalidTle(format!("invalid epoch year {full_year}")))?;
    #[allow(clippy::cast_possible_truncation)]
    let offset_ms = ((day_of_year - 1.0) * SECONDS_PER_DAY * 1_000.0).round() as i64;
    Duration::try_milliseconds(offset_ms)
        .and_then(|offset| start.checked_add_signed(offset))
        .ok_or_else(|| RiskError::InvalidTle(format!("epoch day overflows: {day_of_year}")))
}

impl ElementSet {
    pub fn parse(line1: &str, line2: &str) -> Result<Self, RiskError> {
        let line1 = line1.trim();
        let line2 = line2.trim();
        if !line1.starts_with('1') || !line2.starts_with('2') {
            return Err(RiskError::InvalidTle(
                "expected line numbers 1 and 2".to_string(),
            ));
        }

        let mean_motion_rev_per_day = number(line2, 52..63, "mean motion")?;
        if mean_motion_rev_per_day <= 0.0 {
            return Err(RiskError::InvalidTle("mean motion must be positive".into()));
        }

        Ok(Self {
            line1: line1.to_string(),
            line2: line2.to_string(),
            epoch: parse_epoch(line1)?,
            inclination_deg: number(line2, 8..16, "inclination")?,
            raan_deg: number(line2, 17..25, "right ascension")?,
            arg_perigee_deg: number(line2, 34..42, "argument of perigee")?,
            mean_anomaly_deg: number(line2, 43..51, "mean anomaly")?,
            mean_motion_rev_per_day,
        })
    }

    fn mean_motion_rad_s(&self) -> f64 {
        self.mean_motion_rev_per_day * 2.0 * PI / SECONDS_PER_DAY
    }

    /// Altitude of the equivalent circular orbit.
    pub fn altitude_km(&self) -> f64 {
        let n = self.mean_motion_rad_s();
        (EARTH_MU_KM3_S2 / (n * n)).cbrt() - EARTH_RADIUS_KM
    }

    /// Sub-satellite point at `at`.
    pub fn ground_point_at(&self, at: DateTime<Utc>) -> GroundPoint {
        #[allow(clippy::cast_precision_loss)]
        let elapsed_s = (at - self.epoch).num_milliseconds() as f64 / 1_000.0;
        let inclination = self.inclination_deg.to_radians();
        let arg_latitude = (self.arg_perigee_deg + self.mean_anomaly_deg).to_radians()
            + self.mean_motion_rad_s() * elapsed_s;

        let latitude = (inclination.sin() * arg_latitude.sin()).asin().to_degrees();
        let inertial_longitude = self.raan_deg
            + (inclination.cos() * arg_latitude.sin())
                .atan2(arg_latitude.cos())
                .to_degrees();
        let longitude = wrap_degrees(inertial_longitude - greenwich_sidereal_deg(at));

        GroundPoint {
            latitude: round_to(latitude, 6),
            longitude: round_to(longitude, 6),
            altitude_km: round_to(self.altitude_km(), 3),
        }
    }
}

fn greenwich_sidereal_deg(at: DateTime<Utc>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let julian_day = at.timestamp_millis() as f64 / (SECONDS_PER_DAY * 1_000.0) + 2_440_587.5;
    (280.460_618_37 + 360.985_647_366_29 * (julian_day - 2_451_545.0)).rem_euclid(360.0)
}

fn wrap_degrees(value: f64) -> f64 {
    (value + 180.0).rem_euclid(360.0) - 180.0
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Find `name` in a three-line TLE catalogue and return its two element lines.
pub fn find_in_catalogue(catalogue: &str, name: &str) -> Option<(String, String)> {
    let lines: Vec<&str> = catalogue
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    lines
        .iter()
        .position(|line| line.eq_ignore_ascii_case(name))
        .and_then(|index| {
            let line1 = lines.get(index + 1)?;
            let line2 = lines.get(index + 2)?;
            Some(((*line1).to_string(), (*line2).to_string()))
        })
}
