//! Pre-write validation of batch records and query arguments.
//!
//! The first failing constraint aborts the check; a batch is accepted whole
//! or not at all.

use crate::limits::Limits;
use crate::locale::{Locale, Strings};
use crate::models::{LonLat, NearbyQuery, NewRiskPoint};
use thiserror::Error;

/// Which coordinate a violation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointRef {
    /// Index into the batch
    Record(usize),
    GravityPoint,
    LocationPoint,
}

/// The constraint that failed
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    BatchSize { len: usize, min: usize, max: usize },
    Title { index: usize },
    Longitude { at: PointRef, value: f64 },
    Latitude { at: PointRef, value: f64 },
    Radius { index: usize, value: i64, min: i64, max: i64 },
    Risk { index: usize, value: i64, min: i64, max: i64 },
    Delta { value: f64, max: f64 },
}

/// "Wrong data format" error with a localized message
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub violation: Violation,
    pub message: String,
}

impl ValidationError {
    pub fn new(violation: Violation, locale: Locale) -> Self {
        let strings = locale.strings();
        let message = format!("{}: {}", strings.wrong_data_format, describe(&violation, strings));
        Self { violation, message }
    }
}

fn describe_ref(at: PointRef, s: &Strings) -> String {
    match at {
        PointRef::Record(index) => format!("{} {}", s.record, index),
        PointRef::GravityPoint => s.gravity_point.to_string(),
        PointRef::LocationPoint => s.location_point.to_string(),
    }
}

fn describe(violation: &Violation, s: &Strings) -> String {
    match violation {
        Violation::BatchSize { len, min, max } => {
            format!("{} {} {} {} {} {}", s.batch_size, len, s.must_be_between, min, s.and, max)
        }
        Violation::Title { index } => {
            format!("{} {}: {} {}", s.record, index, s.title, s.is_invalid)
        }
        Violation::Longitude { at, value } => format!(
            "{}: {} {} {} -180 {} 180",
            describe_ref(*at, s),
            s.longitude,
            value,
            s.must_be_between,
            s.and
        ),
        Violation::Latitude { at, value } => format!(
            "{}: {} {} {} -90 {} 90",
            describe_ref(*at, s),
            s.latitude,
            value,
            s.must_be_between,
            s.and
        ),
        Violation::Radius { index, value, min, max } => format!(
            "{} {}: {} {} {} {} {} {}",
            s.record, index, s.radius, value, s.must_be_between, min, s.and, max
        ),
        Violation::Risk { index, value, min, max } => format!(
            "{} {}: {} {} {} {} {} {}",
            s.record, index, s.risk, value, s.must_be_between, min, s.and, max
        ),
        Violation::Delta { value, max } => {
            format!("{} {} {} 0 {} {}", s.delta, value, s.must_be_between, s.and, max)
        }
    }
}

/// Validates risk point input against configured limits
#[derive(Debug, Clone)]
pub struct GeoPointValidator {
    limits: Limits,
    locale: Locale,
}

impl GeoPointValidator {
    pub fn new(limits: Limits, locale: Locale) -> Self {
        Self { limits, locale }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    fn fail(&self, violation: Violation) -> Result<(), ValidationError> {
        Err(ValidationError::new(violation, self.locale))
    }

    /// Check every record of a batch insert
    pub fn validate_batch(&self, records: &[NewRiskPoint]) -> Result<(), ValidationError> {
        let (min, max) = (self.limits.add_batch_min, self.limits.add_batch_max);
        if records.len() < min || records.len() > max {
            return self.fail(Violation::BatchSize { len: records.len(), min, max });
        }

        for (index, record) in records.iter().enumerate() {
            self.validate_record(index, record)?;
        }
        Ok(())
    }

    fn validate_record(&self, index: usize, record: &NewRiskPoint) -> Result<(), ValidationError> {
        if !self.is_medium_string(&record.title) {
            return self.fail(Violation::Title { index });
        }

        self.validate_locpoint(&record.locpoint, PointRef::Record(index))?;

        let (min, max) = (self.limits.radius_min, self.limits.radius_max);
        if record.radius < min || record.radius > max {
            return self.fail(Violation::Radius { index, value: record.radius, min, max });
        }

        let (min, max) = (self.limits.risk_min, self.limits.risk_max);
        if record.risk < min || record.risk > max {
            return self.fail(Violation::Risk { index, value: record.risk, min, max });
        }

        Ok(())
    }

    /// Check a `[lon, lat]` pair
    pub fn validate_locpoint(&self, point: &LonLat, at: PointRef) -> Result<(), ValidationError> {
        let [lon, lat] = *point;
        if !is_longitude(lon) {
            return self.fail(Violation::Longitude { at, value: lon });
        }
        if !is_latitude(lat) {
            return self.fail(Violation::Latitude { at, value: lat });
        }
        Ok(())
    }

    /// Check nearby-search arguments; `locpoint` only when present
    pub fn validate_nearby_query(&self, query: &NearbyQuery) -> Result<(), ValidationError> {
        if let Some(locpoint) = &query.locpoint {
            self.validate_locpoint(locpoint, PointRef::LocationPoint)?;
        }
        self.validate_locpoint(&query.grvpoint, PointRef::GravityPoint)?;

        let delta = query.delta;
        if !(delta.is_finite() && delta > 0.0 && delta <= self.limits.delta_max) {
            return self.fail(Violation::Delta { value: delta, max: self.limits.delta_max });
        }
        Ok(())
    }

    /// Non-blank, single-line, at most `title_max_len` characters
    fn is_medium_string(&self, value: &str) -> bool {
        let trimmed = value.trim();
        !trimmed.is_empty()
            && trimmed.chars().count() <= self.limits.title_max_len
            && !trimmed.chars().any(char::is_control)
    }
}

fn is_longitude(value: f64) -> bool {
    value.is_finite() && (-180.0..=180.0).contains(&value)
}

fn is_latitude(value: f64) -> bool {
    value.is_finite() && (-90.0..=90.0).contains(&value)
}
