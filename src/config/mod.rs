//! Option resolution for the panorama viewer

pub mod loader;
pub mod merge;
pub mod parser;
pub mod resolver;
pub mod schema;
pub mod warnings;

pub use loader::{load_file, parse_str, LoadError, OptionsFormat};
pub use merge::deep_merge;
pub use parser::{is_falsy, ConfigError, OptionParser, ParserRegistry, FOV_BOUNDS};
pub use resolver::{resolve, ConfigResolver, ResolvedConfig};
pub use schema::{
    default_keyboard, default_lang, default_tree, defaults, deprecation_message,
    KeyboardAction, OptionKey, DEFAULT_ADAPTER, DEPRECATED_OPTIONS,
};
pub use warnings::{CollectingSink, ConfigWarning, TracingSink, WarningSink};

/// Option name to value mapping, kept in insertion order
pub type ConfigTree = serde_json::Map<String, serde_json::Value>;
