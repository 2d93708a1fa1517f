use super::schema::{default_keyboard, default_lang, OptionKey, DEFAULT_ADAPTER};
use super::warnings::{ConfigWarning, WarningSink};
use super::ConfigTree;
use crate::units::{parse_angle, parse_speed, AngleRange, UnitError};
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

static NULL: Value = Value::Null;

/// Smallest and largest field of view accepted, in degrees
pub const FOV_BOUNDS: (f64, f64) = (1.0, 179.0);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("No value given for container.")]
    MissingContainer,
    #[error("Unknown option {0}")]
    UnknownOption(String),
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: OptionKey, reason: String },
    #[error("Options must be an object, got {0}")]
    NotAnObject(String),
}

impl ConfigError {
    fn invalid(key: OptionKey, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key,
            reason: reason.into(),
        }
    }

    fn from_unit(key: OptionKey) -> impl Fn(UnitError) -> Self {
        move |e| ConfigError::invalid(key, e.to_string())
    }
}

/// Normalizer for a single option.
///
/// Receives the merged value of the option and the whole merged tree as it
/// was before any normalizer ran. Sibling lookups therefore always see raw
/// values, never the output of another normalizer.
pub type OptionParser = fn(&Value, &ConfigTree, &dyn WarningSink) -> Result<Value, ConfigError>;

/// Maps each option key to its normalizer. Keys without one are copied
/// through unchanged.
#[derive(Clone)]
pub struct ParserRegistry {
    parsers: HashMap<OptionKey, OptionParser>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        let entries: [(OptionKey, OptionParser); 12] = [
            (OptionKey::Container, parse_container),
            (OptionKey::Adapter, parse_adapter),
            (OptionKey::DefaultLong, parse_default_long),
            (OptionKey::DefaultLat, parse_default_lat),
            (OptionKey::MinFov, parse_min_fov),
            (OptionKey::MaxFov, parse_max_fov),
            (OptionKey::Lang, parse_lang),
            (OptionKey::Keyboard, parse_keyboard),
            (OptionKey::AutorotateLat, parse_autorotate_lat),
            (OptionKey::AutorotateSpeed, parse_autorotate_speed),
            (OptionKey::Fisheye, parse_fisheye),
            (OptionKey::Plugins, parse_plugins),
        ];

        Self {
            parsers: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, key: OptionKey) -> Option<OptionParser> {
        self.parsers.get(&key).copied()
    }

    pub fn has_parser(&self, key: OptionKey) -> bool {
        self.parsers.contains_key(&key)
    }

    /// Normalize `value` for `key`, reading siblings from `snapshot`
    pub fn parse(
        &self,
        key: OptionKey,
        value: &Value,
        snapshot: &ConfigTree,
        sink: &dyn WarningSink,
    ) -> Result<Value, ConfigError> {
        match self.get(key) {
            Some(parser) => parser(value, snapshot, sink),
            None => Ok(value.clone()),
        }
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Truthiness as the viewer front end evaluates it: null, false, zero,
/// NaN and the empty string are falsy.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f == 0.0 || f.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Normalized numbers keep their integer form when they have no fractional
/// part, so `50` stays `50` rather than becoming `50.0`.
fn number_value(number: f64) -> Value {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    if number.fract() == 0.0 && number.abs() < MAX_EXACT {
        Value::from(number as i64)
    } else {
        Value::from(number)
    }
}

fn parse_container(value: &Value, _: &ConfigTree, _: &dyn WarningSink) -> Result<Value, ConfigError> {
    if is_falsy(value) {
        return Err(ConfigError::MissingContainer);
    }
    Ok(value.clone())
}

fn parse_adapter(value: &Value, _: &ConfigTree, _: &dyn WarningSink) -> Result<Value, ConfigError> {
    if is_falsy(value) {
        Ok(json!([DEFAULT_ADAPTER]))
    } else if value.is_array() {
        Ok(value.clone())
    } else {
        Ok(json!([value]))
    }
}

fn parse_default_long(value: &Value, _: &ConfigTree, _: &dyn WarningSink) -> Result<Value, ConfigError> {
    parse_angle(value, AngleRange::Full)
        .map(number_value)
        .map_err(ConfigError::from_unit(OptionKey::DefaultLong))
}

fn parse_default_lat(value: &Value, _: &ConfigTree, _: &dyn WarningSink) -> Result<Value, ConfigError> {
    parse_angle(value, AngleRange::Half)
        .map(number_value)
        .map_err(ConfigError::from_unit(OptionKey::DefaultLat))
}

fn fov_value(key: OptionKey, value: &Value) -> Result<f64, ConfigError> {
    value
        .as_f64()
        .ok_or_else(|| ConfigError::invalid(key, format!("expected a number, got {}", value)))
}

/// Sibling FOV bound from the snapshot. A non-numeric sibling is reported by
/// its own normalizer, so it is ignored here.
fn snapshot_fov(snapshot: &ConfigTree, key: OptionKey) -> Option<f64> {
    snapshot.get(key.as_str()).and_then(Value::as_f64)
}

fn parse_min_fov(value: &Value, snapshot: &ConfigTree, sink: &dyn WarningSink) -> Result<Value, ConfigError> {
    let mut min_fov = fov_value(OptionKey::MinFov, value)?;

    if let Some(max_fov) = snapshot_fov(snapshot, OptionKey::MaxFov) {
        if max_fov < min_fov {
            sink.warn(&ConfigWarning::FovBoundsInverted { min_fov, max_fov });
            min_fov = max_fov;
        }
    }

    Ok(number_value(min_fov.clamp(FOV_BOUNDS.0, FOV_BOUNDS.1)))
}

fn parse_max_fov(value: &Value, snapshot: &ConfigTree, _: &dyn WarningSink) -> Result<Value, ConfigError> {
    let mut max_fov = fov_value(OptionKey::MaxFov, value)?;

    if let Some(min_fov) = snapshot_fov(snapshot, OptionKey::MinFov) {
        if max_fov < min_fov {
            max_fov = min_fov;
        }
    }

    Ok(number_value(max_fov.clamp(FOV_BOUNDS.0, FOV_BOUNDS.1)))
}

fn parse_lang(value: &Value, _: &ConfigTree, sink: &dyn WarningSink) -> Result<Value, ConfigError> {
    let mut lang = value
        .as_object()
        .cloned()
        .ok_or_else(|| ConfigError::invalid(OptionKey::Lang, format!("expected an object, got {}", value)))?;

    let mut resolved = default_lang();

    if let Some(Value::Array(entries)) = lang.get("twoFingers") {
        sink.warn(&ConfigWarning::TwoFingersArray);
        let first = entries
            .first()
            .cloned()
            .or_else(|| resolved.get("twoFingers").cloned())
            .unwrap_or(Value::Null);
        lang.insert("twoFingers".to_string(), first);
    }

    resolved.extend(lang);
    Ok(Value::Object(resolved))
}

fn parse_keyboard(value: &Value, _: &ConfigTree, _: &dyn WarningSink) -> Result<Value, ConfigError> {
    match value {
        Value::Bool(true) => Ok(Value::Object(default_keyboard())),
        other => Ok(other.clone()),
    }
}

fn parse_autorotate_lat(value: &Value, snapshot: &ConfigTree, _: &dyn WarningSink) -> Result<Value, ConfigError> {
    let source = if value.is_null() {
        snapshot
            .get(OptionKey::DefaultLat.as_str())
            .unwrap_or(&NULL)
    } else {
        value
    };

    parse_angle(source, AngleRange::Half)
        .map(number_value)
        .map_err(ConfigError::from_unit(OptionKey::AutorotateLat))
}

fn parse_autorotate_speed(value: &Value, _: &ConfigTree, _: &dyn WarningSink) -> Result<Value, ConfigError> {
    parse_speed(value)
        .map(number_value)
        .map_err(ConfigError::from_unit(OptionKey::AutorotateSpeed))
}

fn parse_fisheye(value: &Value, _: &ConfigTree, _: &dyn WarningSink) -> Result<Value, ConfigError> {
    match value {
        Value::Bool(true) => Ok(json!(1)),
        Value::Bool(false) => Ok(json!(0)),
        other => Ok(other.clone()),
    }
}

fn parse_plugins(value: &Value, _: &ConfigTree, _: &dyn WarningSink) -> Result<Value, ConfigError> {
    let entries = match value {
        Value::Null => return Ok(json!([])),
        Value::Array(entries) => entries,
        other => {
            return Err(ConfigError::invalid(
                OptionKey::Plugins,
                format!("expected a list, got {}", other),
            ))
        }
    };

    let plugins = entries
        .iter()
        .map(|entry| match entry {
            Value::Array(_) => entry.clone(),
            bare => json!([bare]),
        })
        .filter(|entry| !entry.get(0).map_or(true, is_falsy))
        .collect();

    Ok(Value::Array(plugins))
}
