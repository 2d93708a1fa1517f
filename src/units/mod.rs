//! Angle and speed parsing used by the option normalizers
//!
//! Angles are accepted as numbers (radians) or strings such as `"30deg"`,
//! `"1.2rad"` or `"0.5"`. Speeds are accepted as numbers (radians per
//! second) or strings such as `"2rpm"` or `"10 degrees per second"`.

use regex::Regex;
use serde_json::Value;
use std::f64::consts::PI;
use thiserror::Error;

const FULL_TURN: f64 = PI * 2.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    #[error("Unknown angle \"{0}\"")]
    UnknownAngle(String),
    #[error("Unknown angle unit \"{0}\"")]
    UnknownAngleUnit(String),
    #[error("Unknown speed \"{0}\"")]
    UnknownSpeed(String),
    #[error("Unknown speed unit \"{0}\"")]
    UnknownSpeedUnit(String),
    #[error("Invalid unit pattern: {0}")]
    Pattern(String),
}

/// Target interval of a normalized angle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleRange {
    /// `[0, 2π)`, for longitude-like values
    Full,
    /// `[-π/2, π/2]`, for latitude-like values
    Half,
}

/// Parse an angle and normalize it into `range`
pub fn parse_angle(value: &Value, range: AngleRange) -> Result<f64, UnitError> {
    let radians = match value {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| UnitError::UnknownAngle(number.to_string()))?,
        Value::String(text) => parse_angle_str(text)?,
        other => return Err(UnitError::UnknownAngle(other.to_string())),
    };

    Ok(normalize_angle(radians, range))
}

/// Normalize an angle expressed in radians into `range`
pub fn normalize_angle(radians: f64, range: AngleRange) -> f64 {
    let shifted = match range {
        AngleRange::Full => radians,
        AngleRange::Half => radians + PI,
    };

    let mut wrapped = shifted % FULL_TURN;
    if wrapped < 0.0 {
        wrapped += FULL_TURN;
    }

    match range {
        AngleRange::Full => wrapped,
        AngleRange::Half => (wrapped - PI).clamp(-PI / 2.0, PI / 2.0),
    }
}

fn parse_angle_str(text: &str) -> Result<f64, UnitError> {
    let pattern = Regex::new(r"^(-?[0-9]+(?:\.[0-9]*)?)(.*)$")
        .map_err(|e| UnitError::Pattern(e.to_string()))?;

    let lowered = text.trim().to_lowercase();
    let captures = pattern
        .captures(&lowered)
        .ok_or_else(|| UnitError::UnknownAngle(text.to_string()))?;

    let amount: f64 = captures[1]
        .parse()
        .map_err(|_| UnitError::UnknownAngle(text.to_string()))?;

    match &captures[2] {
        "" | "rad" | "rads" => Ok(amount),
        "deg" | "degs" => Ok(amount.to_radians()),
        unit => Err(UnitError::UnknownAngleUnit(unit.to_string())),
    }
}

/// Parse a rotation speed into radians per second
pub fn parse_speed(value: &Value) -> Result<f64, UnitError> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| UnitError::UnknownSpeed(number.to_string())),
        Value::String(text) => parse_speed_str(text),
        other => Err(UnitError::UnknownSpeed(other.to_string())),
    }
}

fn parse_speed_str(text: &str) -> Result<f64, UnitError> {
    let pattern = Regex::new(r"^(-?[0-9]+(?:\.[0-9]*)?)(.*)$")
        .map_err(|e| UnitError::Pattern(e.to_string()))?;

    let trimmed = text.trim();
    let captures = pattern
        .captures(trimmed)
        .ok_or_else(|| UnitError::UnknownSpeed(text.to_string()))?;

    let mut amount: f64 = captures[1]
        .parse()
        .map_err(|_| UnitError::UnknownSpeed(text.to_string()))?;
    let unit = captures[2].trim();

    if unit.ends_with("pm") || unit.ends_with("per minute") {
        amount /= 60.0;
    }

    match unit {
        "dpm" | "degrees per minute" | "dps" | "degrees per second" => Ok(amount.to_radians()),
        "rdpm" | "radians per minute" | "rdps" | "radians per second" => Ok(amount),
        "rpm" | "revolutions per minute" | "rps" | "revolutions per second" => {
            Ok(amount * FULL_TURN)
        }
        other => Err(UnitError::UnknownSpeedUnit(other.to_string())),
    }
}
