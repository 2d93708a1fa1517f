use serde::Serialize;
use std::fmt;
use std::sync::Mutex;
use tracing::warn;

/// Non-fatal problem found while resolving options; resolution continues
/// with a corrected value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigWarning {
    /// A retired option was supplied and dropped
    DeprecatedOption { key: String, message: String },
    /// `maxFov` was lower than `minFov`; `minFov` was lowered to `max_fov`
    FovBoundsInverted { min_fov: f64, max_fov: f64 },
    /// `lang.twoFingers` was given as a list; only the first entry was kept
    TwoFingersArray,
    /// An option that cannot change after construction was part of an update
    ReadonlyOption { key: String, message: String },
}

impl ConfigWarning {
    /// Option key the warning is about
    pub fn key(&self) -> &str {
        match self {
            ConfigWarning::DeprecatedOption { key, .. } => key,
            ConfigWarning::FovBoundsInverted { .. } => "minFov",
            ConfigWarning::TwoFingersArray => "lang",
            ConfigWarning::ReadonlyOption { key, .. } => key,
        }
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::DeprecatedOption { message, .. } => write!(f, "{}", message),
            ConfigWarning::FovBoundsInverted { .. } => {
                write!(f, "maxFov cannot be lower than minFov")
            }
            ConfigWarning::TwoFingersArray => write!(f, "lang.twoFingers must not be an array"),
            ConfigWarning::ReadonlyOption { message, .. } => write!(f, "{}", message),
        }
    }
}

/// Side channel receiving warnings emitted during resolution
#[cfg_attr(test, mockall::automock)]
pub trait WarningSink: Send + Sync {
    fn warn(&self, warning: &ConfigWarning);
}

/// Forwards warnings to the `tracing` subscriber at WARN level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&self, warning: &ConfigWarning) {
        warn!(option = warning.key(), "{}", warning);
    }
}

/// Keeps every warning so callers can inspect or report them afterwards
#[derive(Debug, Default)]
pub struct CollectingSink {
    warnings: Mutex<Vec<ConfigWarning>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the warnings received so far
    pub fn warnings(&self) -> Vec<ConfigWarning> {
        match self.warnings.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Remove and return the warnings received so far
    pub fn take(&self) -> Vec<ConfigWarning> {
        match self.warnings.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl WarningSink for CollectingSink {
    fn warn(&self, warning: &ConfigWarning) {
        match self.warnings.lock() {
            Ok(mut guard) => guard.push(warning.clone()),
            Err(poisoned) => poisoned.into_inner().push(warning.clone()),
        }
    }
}
