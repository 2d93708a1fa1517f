use super::merge::deep_merge;
use super::parser::{ConfigError, ParserRegistry};
use super::schema::{default_tree, deprecation_message, OptionKey};
use super::warnings::{ConfigWarning, TracingSink, WarningSink};
use super::ConfigTree;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::ops::Index;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, instrument};

static NULL: Value = Value::Null;

/// Fully populated option tree: every legal option is present and no
/// unknown or deprecated option remains.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    tree: ConfigTree,
}

impl ResolvedConfig {
    pub fn get(&self, key: OptionKey) -> &Value {
        self.tree.get(key.as_str()).unwrap_or(&NULL)
    }

    pub fn as_tree(&self) -> &ConfigTree {
        &self.tree
    }

    pub fn into_tree(self) -> ConfigTree {
        self.tree
    }

    pub fn container(&self) -> &Value {
        self.get(OptionKey::Container)
    }

    /// Adapter identifiers, the first entry being the adapter in use
    pub fn adapter(&self) -> &[Value] {
        self.get(OptionKey::Adapter)
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Plugins as `[plugin]` or `[plugin, options]` entries
    pub fn plugins(&self) -> &[Value] {
        self.get(OptionKey::Plugins)
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn min_fov(&self) -> f64 {
        self.number(OptionKey::MinFov)
    }

    pub fn max_fov(&self) -> f64 {
        self.number(OptionKey::MaxFov)
    }

    /// Default longitude, radians in `[0, 2π)`
    pub fn default_long(&self) -> f64 {
        self.number(OptionKey::DefaultLong)
    }

    /// Default latitude, radians in `[-π/2, π/2]`
    pub fn default_lat(&self) -> f64 {
        self.number(OptionKey::DefaultLat)
    }

    pub fn autorotate_lat(&self) -> f64 {
        self.number(OptionKey::AutorotateLat)
    }

    /// Radians per second
    pub fn autorotate_speed(&self) -> f64 {
        self.number(OptionKey::AutorotateSpeed)
    }

    /// Fisheye strength, `0` meaning a plain rectilinear projection.
    /// `None` when the option holds something other than a number or a
    /// boolean, since non-boolean values pass through resolution unchanged.
    pub fn fisheye(&self) -> Option<f64> {
        self.get(OptionKey::Fisheye).as_f64()
    }

    /// Options read through here always resolve to numbers; a value of
    /// another type only appears if the tree was built by hand and reads
    /// as `0.0`.
    fn number(&self, key: OptionKey) -> f64 {
        self.get(key).as_f64().unwrap_or(0.0)
    }
}

impl Index<OptionKey> for ResolvedConfig {
    type Output = Value;

    fn index(&self, key: OptionKey) -> &Value {
        self.get(key)
    }
}

impl Serialize for ResolvedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.tree.serialize(serializer)
    }
}

impl From<ResolvedConfig> for Value {
    fn from(config: ResolvedConfig) -> Self {
        Value::Object(config.tree)
    }
}

/// Turns partial option trees into [`ResolvedConfig`]s
#[derive(Clone)]
pub struct ConfigResolver {
    parsers: ParserRegistry,
    sink: Arc<dyn WarningSink>,
}

impl ConfigResolver {
    /// Resolver reporting warnings through `tracing`
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    pub fn with_sink(sink: Arc<dyn WarningSink>) -> Self {
        Self {
            parsers: ParserRegistry::new(),
            sink,
        }
    }

    /// Resolve a partial option tree against the defaults.
    ///
    /// Options are processed in declaration order, followed by any option
    /// not in the schema. Every normalizer sees the merged tree as it was
    /// before normalization started.
    #[instrument(skip_all, fields(options = input.len()))]
    pub fn resolve(&self, input: &ConfigTree) -> Result<ResolvedConfig, ConfigError> {
        let merged = merge_onto_defaults(input);

        let mut tree = ConfigTree::new();
        for (name, value) in &merged {
            if let Some(message) = deprecation_message(name) {
                self.sink.warn(&ConfigWarning::DeprecatedOption {
                    key: name.clone(),
                    message: message.to_string(),
                });
                continue;
            }

            let key = OptionKey::from_str(name)
                .map_err(|_| ConfigError::UnknownOption(name.clone()))?;
            let parsed = self.parsers.parse(key, value, &merged, self.sink.as_ref())?;
            tree.insert(name.clone(), parsed);
        }

        debug!(options = tree.len(), "Options resolved");
        Ok(ResolvedConfig { tree })
    }

    /// Resolve any JSON value; it must be an object
    pub fn resolve_value(&self, input: &Value) -> Result<ResolvedConfig, ConfigError> {
        match input {
            Value::Object(map) => self.resolve(map),
            other => Err(ConfigError::NotAnObject(value_kind(other).to_string())),
        }
    }

    /// Apply runtime changes to an already resolved configuration.
    ///
    /// Read-only options are skipped with a warning. The normalizers see
    /// `current` overlaid with `changes`, so e.g. a new `maxFov` is checked
    /// against the current `minFov`.
    #[instrument(skip_all, fields(changes = changes.len()))]
    pub fn update(
        &self,
        current: &ResolvedConfig,
        changes: &ConfigTree,
    ) -> Result<ResolvedConfig, ConfigError> {
        let mut snapshot = current.tree.clone();
        snapshot.extend(changes.iter().map(|(k, v)| (k.clone(), v.clone())));

        let mut tree = current.tree.clone();
        for (name, value) in changes {
            if let Some(message) = deprecation_message(name) {
                self.sink.warn(&ConfigWarning::DeprecatedOption {
                    key: name.clone(),
                    message: message.to_string(),
                });
                continue;
            }

            let key = OptionKey::from_str(name)
                .map_err(|_| ConfigError::UnknownOption(name.clone()))?;

            if let Some(message) = key.readonly_message() {
                self.sink.warn(&ConfigWarning::ReadonlyOption {
                    key: name.clone(),
                    message: message.to_string(),
                });
                continue;
            }

            let parsed = self.parsers.parse(key, value, &snapshot, self.sink.as_ref())?;
            tree.insert(name.clone(), parsed);
        }

        debug!(options = tree.len(), "Options updated");
        Ok(ResolvedConfig { tree })
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Defaults with `input` deep-merged on top. Options whose default table is
/// replaced rather than extended take the input object as given.
fn merge_onto_defaults(input: &ConfigTree) -> ConfigTree {
    let mut merged = default_tree();
    deep_merge(&mut merged, input);

    for (name, value) in input {
        let replaces = OptionKey::from_str(name).map_or(false, OptionKey::replaces_default);
        if replaces && value.is_object() {
            merged.insert(name.clone(), value.clone());
        }
    }

    merged
}

/// Resolve `input` with a tracing-backed resolver
pub fn resolve(input: &ConfigTree) -> Result<ResolvedConfig, ConfigError> {
    ConfigResolver::new().resolve(input)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
