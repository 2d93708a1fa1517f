//! Tests for option resolution
//!
//! Covers the required container, unknown and deprecated options, the FOV
//! bound corrections, per-option normalizers and idempotence.

use mockall::{mock, predicate::function};
use panoptions::{
    default_keyboard, defaults, CollectingSink, ConfigError, ConfigResolver, ConfigTree,
    ConfigWarning, OptionKey, WarningSink, DEPRECATED_OPTIONS,
};
use panoptions::units::{normalize_angle, AngleRange};
use serde_json::{json, Value};
use std::sync::Arc;

mock! {
    pub Sink {}

    impl WarningSink for Sink {
        fn warn(&self, warning: &ConfigWarning);
    }
}

fn options(value: Value) -> ConfigTree {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {}", other),
    }
}

fn resolver() -> (Arc<CollectingSink>, ConfigResolver) {
    let sink = Arc::new(CollectingSink::new());
    (sink.clone(), ConfigResolver::with_sink(sink))
}

#[test]
fn test_missing_container_fails() {
    let (_, resolver) = resolver();

    for input in [
        json!({}),
        json!({"panorama": "sphere.jpg"}),
        json!({"container": null}),
        json!({"container": ""}),
    ] {
        assert_eq!(
            resolver.resolve(&options(input)),
            Err(ConfigError::MissingContainer)
        );
    }
}

#[test]
fn test_unknown_option_fails_even_with_valid_siblings() {
    let (_, resolver) = resolver();
    let result = resolver.resolve(&options(json!({
        "container": "viewer",
        "panorama": "sphere.jpg",
        "minFov": 20,
        "autoRotate": true,
    })));

    let err = result.unwrap_err();
    assert_eq!(err, ConfigError::UnknownOption("autoRotate".to_string()));
    assert_eq!(err.to_string(), "Unknown option autoRotate");
}

#[test]
fn test_deprecated_options_warn_once_each_and_are_dropped() {
    let mut input = options(json!({"container": "viewer"}));
    for (name, _) in DEPRECATED_OPTIONS {
        input.insert(name.to_string(), json!(2));
    }

    let (sink, resolver) = resolver();
    let config = resolver.resolve(&input).unwrap();

    let warnings = sink.warnings();
    assert_eq!(warnings.len(), DEPRECATED_OPTIONS.len());
    for (name, message) in DEPRECATED_OPTIONS {
        assert!(!config.as_tree().contains_key(*name));
        assert!(warnings.contains(&ConfigWarning::DeprecatedOption {
            key: name.to_string(),
            message: message.to_string(),
        }));
    }
}

#[test]
fn test_inverted_fov_bounds_are_corrected_independently() {
    let mut sink = MockSink::new();
    sink.expect_warn()
        .with(function(|w: &ConfigWarning| {
            *w == ConfigWarning::FovBoundsInverted {
                min_fov: 100.0,
                max_fov: 50.0,
            }
        }))
        .times(1)
        .return_const(());

    let resolver = ConfigResolver::with_sink(Arc::new(sink));
    let config = resolver
        .resolve(&options(json!({"container": "viewer", "minFov": 100, "maxFov": 50})))
        .unwrap();

    assert_eq!(config.min_fov(), 50.0);
    assert_eq!(config.max_fov(), 100.0);
    assert_eq!(config[OptionKey::MinFov], json!(50));
    assert_eq!(config[OptionKey::MaxFov], json!(100));
}

#[test]
fn test_fov_bounds_stay_within_limits() {
    let (_, resolver) = resolver();
    let pairs = [
        (0.0, 0.5),
        (-40.0, 400.0),
        (200.0, 300.0),
        (30.0, 90.0),
        (179.5, 1.0),
        (90.0, 90.0),
    ];

    for (min_fov, max_fov) in pairs {
        let config = resolver
            .resolve(&options(json!({
                "container": "viewer",
                "minFov": min_fov,
                "maxFov": max_fov,
            })))
            .unwrap();

        for fov in [config.min_fov(), config.max_fov()] {
            assert!((1.0..=179.0).contains(&fov), "{} out of range for {:?}", fov, (min_fov, max_fov));
        }
    }
}

#[test]
fn test_fisheye_strength() {
    let (_, resolver) = resolver();
    for (input, expected) in [
        (json!(true), Some(1.0)),
        (json!(false), Some(0.0)),
        (json!(0.5), Some(0.5)),
        (json!("strong"), None),
    ] {
        let config = resolver
            .resolve(&options(json!({"container": "viewer", "fisheye": input})))
            .unwrap();
        assert_eq!(config.fisheye(), expected);
    }
}

#[test]
fn test_keyboard_true_is_an_independent_copy_of_defaults() {
    let (_, resolver) = resolver();
    let config = resolver
        .resolve(&options(json!({"container": "viewer", "keyboard": true})))
        .unwrap();

    assert_eq!(config[OptionKey::Keyboard], Value::Object(default_keyboard()));

    let mut tree = config.into_tree();
    if let Some(Value::Object(keyboard)) = tree.get_mut("keyboard") {
        keyboard.insert("ArrowUp".to_string(), json!("ZOOM_IN"));
        keyboard.remove("Minus");
    }
    assert_eq!(defaults()["keyboard"]["ArrowUp"], json!("ROTATE_LAT_UP"));
    assert_eq!(defaults()["keyboard"]["Minus"], json!("ZOOM_OUT"));
}

#[test]
fn test_custom_keyboard_table_replaces_defaults() {
    let (_, resolver) = resolver();
    let config = resolver
        .resolve(&options(json!({"container": "viewer", "keyboard": {"h": "ZOOM_IN"}})))
        .unwrap();
    assert_eq!(config[OptionKey::Keyboard], json!({"h": "ZOOM_IN"}));

    let cleared = resolver
        .resolve(&options(json!({"container": "viewer", "keyboard": {}})))
        .unwrap();
    assert_eq!(cleared[OptionKey::Keyboard], json!({}));
}

#[test]
fn test_lang_still_merges_onto_defaults() {
    let (_, resolver) = resolver();
    let config = resolver
        .resolve(&options(json!({"container": "viewer", "lang": {"zoom": "Zoomer"}})))
        .unwrap();

    assert_eq!(config[OptionKey::Lang]["zoom"], json!("Zoomer"));
    assert_eq!(config[OptionKey::Lang]["menu"], json!("Menu"));
}

#[test]
fn test_keyboard_can_be_disabled() {
    let (_, resolver) = resolver();
    let config = resolver
        .resolve(&options(json!({"container": "viewer", "keyboard": false})))
        .unwrap();
    assert_eq!(config[OptionKey::Keyboard], json!(false));
}

#[test]
fn test_autorotate_lat_derives_from_default_lat() {
    let (_, resolver) = resolver();
    let config = resolver
        .resolve(&options(json!({
            "container": "viewer",
            "autorotateLat": null,
            "defaultLat": 0.3,
        })))
        .unwrap();

    let expected = normalize_angle(0.3, AngleRange::Half);
    assert!((config.autorotate_lat() - expected).abs() < 1e-12);
    assert!((config.default_lat() - expected).abs() < 1e-12);
}

#[test]
fn test_angles_are_normalized() {
    let (_, resolver) = resolver();
    let config = resolver
        .resolve(&options(json!({
            "container": "viewer",
            "defaultLong": "-90deg",
            "defaultLat": "120deg",
            "autorotateLat": "-10deg",
        })))
        .unwrap();

    assert!((config.default_long() - 270f64.to_radians()).abs() < 1e-9);
    assert!((config.default_lat() - 90f64.to_radians()).abs() < 1e-9);
    assert!((config.autorotate_lat() + 10f64.to_radians()).abs() < 1e-9);
}

#[test]
fn test_invalid_angle_is_fatal() {
    let (_, resolver) = resolver();
    let result = resolver.resolve(&options(json!({"container": "viewer", "defaultLong": "east"})));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue {
            key: OptionKey::DefaultLong,
            ..
        })
    ));
}

#[test]
fn test_default_autorotate_speed_is_two_rpm() {
    let (_, resolver) = resolver();
    let config = resolver
        .resolve(&options(json!({"container": "viewer"})))
        .unwrap();
    assert!((config.autorotate_speed() - std::f64::consts::PI / 15.0).abs() < 1e-12);
}

#[test]
fn test_lang_two_fingers_list() {
    let (sink, resolver) = resolver();
    let config = resolver
        .resolve(&options(json!({"container": "viewer", "lang": {"twoFingers": ["a", "b"]}})))
        .unwrap();

    assert_eq!(config[OptionKey::Lang]["twoFingers"], json!("a"));
    assert_eq!(config[OptionKey::Lang]["loadError"], json!("The panorama can't be loaded"));
    assert_eq!(sink.warnings(), vec![ConfigWarning::TwoFingersArray]);
}

#[test]
fn test_plugins_are_normalized() {
    let (_, resolver) = resolver();
    let config = resolver
        .resolve(&options(json!({
            "container": "viewer",
            "plugins": ["pluginA", ["pluginB", {"opt": 1}], null],
        })))
        .unwrap();

    assert_eq!(
        config[OptionKey::Plugins],
        json!([["pluginA"], ["pluginB", {"opt": 1}]])
    );
    assert_eq!(config.plugins().len(), 2);
}

#[test]
fn test_adapter_defaults_to_equirectangular() {
    let (_, resolver) = resolver();
    let config = resolver
        .resolve(&options(json!({"container": "viewer"})))
        .unwrap();
    assert_eq!(config[OptionKey::Adapter], json!(["equirectangular"]));

    let custom = resolver
        .resolve(&options(json!({"container": "viewer", "adapter": "cubemap"})))
        .unwrap();
    assert_eq!(custom.adapter(), &[json!("cubemap")]);
}

#[test]
fn test_navbar_list_replaces_default() {
    let (_, resolver) = resolver();
    let config = resolver
        .resolve(&options(json!({"container": "viewer", "navbar": ["zoom"]})))
        .unwrap();
    assert_eq!(config[OptionKey::Navbar], json!(["zoom"]));
}

#[test]
fn test_resolution_is_idempotent() {
    let (_, resolver) = resolver();
    let first = resolver
        .resolve(&options(json!({
            "container": "viewer",
            "adapter": ["cubemap", {"flipTopBottom": true}],
            "plugins": ["markers", ["compass", {"size": "10vh"}]],
            "minFov": 100,
            "maxFov": 50,
            "defaultLong": "45deg",
            "defaultLat": "-20deg",
            "autorotateSpeed": "1rpm",
            "fisheye": true,
            "keyboard": true,
            "lang": {"twoFingers": ["Two fingers"]},
        })))
        .unwrap();

    let second = resolver.resolve(first.as_tree()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_resolved_config_does_not_alias_input() {
    let (_, resolver) = resolver();
    let mut input = options(json!({"container": "viewer", "navbar": ["zoom", "move"]}));
    let config = resolver.resolve(&input).unwrap();

    input.insert("navbar".to_string(), json!([]));
    assert_eq!(config[OptionKey::Navbar], json!(["zoom", "move"]));
}

#[test]
fn test_resolver_is_shareable_across_threads() {
    let (_, resolver) = resolver();
    let resolver = Arc::new(resolver);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let resolver = Arc::clone(&resolver);
            std::thread::spawn(move || {
                resolver
                    .resolve(&options(json!({"container": format!("viewer-{}", i)})))
                    .map(|config| config.container().clone())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let container = handle.join().unwrap().unwrap();
        assert_eq!(container, json!(format!("viewer-{}", i)));
    }
}

#[test]
fn test_update_respects_readonly_options() {
    let (sink, resolver) = resolver();
    let current = resolver
        .resolve(&options(json!({"container": "viewer", "plugins": ["markers"]})))
        .unwrap();

    let updated = resolver
        .update(&current, &options(json!({"plugins": [], "fisheye": true})))
        .unwrap();

    assert_eq!(updated[OptionKey::Plugins], json!([["markers"]]));
    assert_eq!(updated.fisheye(), Some(1.0));
    assert_eq!(
        sink.warnings(),
        vec![ConfigWarning::ReadonlyOption {
            key: "plugins".to_string(),
            message: "Cannot change plugins".to_string(),
        }]
    );
}
