//! Tests for loading option documents from disk
//!
//! Covers JSON and TOML documents, extension-based format detection and
//! resolution of loaded documents.

use panoptions::{load_file, resolve, LoadError, OptionKey};
use serde_json::json;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

fn write_options(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_and_resolve_json_options() {
    let file = write_options(
        ".json",
        r##"{
  "container": "#viewer",
  "panorama": "images/lake.jpg",
  "caption": "Lake <b>Tahoe</b>",
  "defaultZoomLvl": 0,
  "navbar": ["zoom", "caption", "fullscreen"],
  "plugins": [["markers", {"markers": [{"id": "a", "longitude": 0.2}]}]]
}"##,
    );

    let options = load_file(file.path()).unwrap();
    let config = resolve(&options).unwrap();

    assert_eq!(config.container(), &json!("#viewer"));
    assert_eq!(config[OptionKey::DefaultZoomLvl], json!(0));
    assert_eq!(config[OptionKey::Navbar], json!(["zoom", "caption", "fullscreen"]));
    assert_eq!(config.plugins()[0][0], json!("markers"));
}

#[test]
fn test_load_and_resolve_toml_options() {
    let file = write_options(
        ".toml",
        r##"
container = "#viewer"
panorama = "images/lake.jpg"
minFov = 10
maxFov = 120
defaultLong = "100deg"
autorotateSpeed = "3dps"
plugins = [["compass", { size = "90px" }]]

[lang]
zoomIn = "Agrandir"
"##,
    );

    let options = load_file(file.path()).unwrap();
    let config = resolve(&options).unwrap();

    assert_eq!(config.min_fov(), 10.0);
    assert_eq!(config.max_fov(), 120.0);
    assert!((config.default_long() - 100f64.to_radians()).abs() < 1e-9);
    assert!((config.autorotate_speed() - 3f64.to_radians()).abs() < 1e-9);
    assert_eq!(config[OptionKey::Lang]["zoomIn"], json!("Agrandir"));
    assert_eq!(config[OptionKey::Lang]["zoomOut"], json!("Zoom out"));
    assert_eq!(config[OptionKey::Plugins], json!([["compass", {"size": "90px"}]]));
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let file = write_options(".yaml", "container: viewer\n");
    assert!(matches!(
        load_file(file.path()),
        Err(LoadError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_malformed_documents_report_parser_errors() {
    let json_file = write_options(".json", "{\"container\": ");
    assert!(matches!(load_file(json_file.path()), Err(LoadError::Json(_))));

    let toml_file = write_options(".toml", "container = \n");
    assert!(matches!(load_file(toml_file.path()), Err(LoadError::Toml(_))));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    assert!(matches!(load_file(&missing), Err(LoadError::Io(_))));
}
