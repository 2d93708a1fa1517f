//! Canonical option schema: the legal option keys in declaration order,
//! their default values, and the deprecated and read-only key tables.

use super::ConfigTree;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Identifier of the adapter used when none is configured
pub const DEFAULT_ADAPTER: &str = "equirectangular";

/// Legal option names, in canonical declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionKey {
    Panorama,
    Container,
    Adapter,
    Plugins,
    Caption,
    Description,
    DownloadUrl,
    LoadingImg,
    LoadingTxt,
    Size,
    Fisheye,
    MinFov,
    MaxFov,
    DefaultZoomLvl,
    DefaultLong,
    DefaultLat,
    SphereCorrection,
    MoveSpeed,
    ZoomSpeed,
    AutorotateDelay,
    AutorotateIdle,
    AutorotateSpeed,
    AutorotateLat,
    MoveInertia,
    Mousewheel,
    Mousemove,
    MousewheelCtrlKey,
    TouchmoveTwoFingers,
    UseXmpData,
    PanoData,
    RequestHeaders,
    CanvasBackground,
    WithCredentials,
    Navbar,
    Lang,
    Keyboard,
}

impl OptionKey {
    pub const ALL: [OptionKey; 36] = [
        OptionKey::Panorama,
        OptionKey::Container,
        OptionKey::Adapter,
        OptionKey::Plugins,
        OptionKey::Caption,
        OptionKey::Description,
        OptionKey::DownloadUrl,
        OptionKey::LoadingImg,
        OptionKey::LoadingTxt,
        OptionKey::Size,
        OptionKey::Fisheye,
        OptionKey::MinFov,
        OptionKey::MaxFov,
        OptionKey::DefaultZoomLvl,
        OptionKey::DefaultLong,
        OptionKey::DefaultLat,
        OptionKey::SphereCorrection,
        OptionKey::MoveSpeed,
        OptionKey::ZoomSpeed,
        OptionKey::AutorotateDelay,
        OptionKey::AutorotateIdle,
        OptionKey::AutorotateSpeed,
        OptionKey::AutorotateLat,
        OptionKey::MoveInertia,
        OptionKey::Mousewheel,
        OptionKey::Mousemove,
        OptionKey::MousewheelCtrlKey,
        OptionKey::TouchmoveTwoFingers,
        OptionKey::UseXmpData,
        OptionKey::PanoData,
        OptionKey::RequestHeaders,
        OptionKey::CanvasBackground,
        OptionKey::WithCredentials,
        OptionKey::Navbar,
        OptionKey::Lang,
        OptionKey::Keyboard,
    ];

    /// Name of the option as written in option documents
    pub fn as_str(self) -> &'static str {
        match self {
            OptionKey::Panorama => "panorama",
            OptionKey::Container => "container",
            OptionKey::Adapter => "adapter",
            OptionKey::Plugins => "plugins",
            OptionKey::Caption => "caption",
            OptionKey::Description => "description",
            OptionKey::DownloadUrl => "downloadUrl",
            OptionKey::LoadingImg => "loadingImg",
            OptionKey::LoadingTxt => "loadingTxt",
            OptionKey::Size => "size",
            OptionKey::Fisheye => "fisheye",
            OptionKey::MinFov => "minFov",
            OptionKey::MaxFov => "maxFov",
            OptionKey::DefaultZoomLvl => "defaultZoomLvl",
            OptionKey::DefaultLong => "defaultLong",
            OptionKey::DefaultLat => "defaultLat",
            OptionKey::SphereCorrection => "sphereCorrection",
            OptionKey::MoveSpeed => "moveSpeed",
            OptionKey::ZoomSpeed => "zoomSpeed",
            OptionKey::AutorotateDelay => "autorotateDelay",
            OptionKey::AutorotateIdle => "autorotateIdle",
            OptionKey::AutorotateSpeed => "autorotateSpeed",
            OptionKey::AutorotateLat => "autorotateLat",
            OptionKey::MoveInertia => "moveInertia",
            OptionKey::Mousewheel => "mousewheel",
            OptionKey::Mousemove => "mousemove",
            OptionKey::MousewheelCtrlKey => "mousewheelCtrlKey",
            OptionKey::TouchmoveTwoFingers => "touchmoveTwoFingers",
            OptionKey::UseXmpData => "useXmpData",
            OptionKey::PanoData => "panoData",
            OptionKey::RequestHeaders => "requestHeaders",
            OptionKey::CanvasBackground => "canvasBackground",
            OptionKey::WithCredentials => "withCredentials",
            OptionKey::Navbar => "navbar",
            OptionKey::Lang => "lang",
            OptionKey::Keyboard => "keyboard",
        }
    }

    /// Message explaining why the option cannot change once the viewer exists,
    /// or `None` if it can be updated at runtime
    pub fn readonly_message(self) -> Option<&'static str> {
        match self {
            OptionKey::Panorama | OptionKey::PanoData => {
                Some("Use setPanorama method to change the panorama")
            }
            OptionKey::Container => Some("Cannot change viewer container"),
            OptionKey::Adapter => Some("Cannot change adapter"),
            OptionKey::Plugins => Some("Cannot change plugins"),
            _ => None,
        }
    }

    pub fn is_readonly(self) -> bool {
        self.readonly_message().is_some()
    }

    /// Whether an object given for this option replaces the default table
    /// instead of being merged onto it
    pub fn replaces_default(self) -> bool {
        matches!(self, OptionKey::Keyboard)
    }

    fn default_value(self) -> Value {
        match self {
            OptionKey::Plugins => json!([]),
            OptionKey::LoadingTxt => json!("Loading..."),
            OptionKey::Fisheye => json!(false),
            OptionKey::MinFov => json!(30),
            OptionKey::MaxFov => json!(90),
            OptionKey::DefaultZoomLvl => json!(50),
            OptionKey::DefaultLong => json!(0),
            OptionKey::DefaultLat => json!(0),
            OptionKey::MoveSpeed => json!(1),
            OptionKey::ZoomSpeed => json!(1),
            OptionKey::AutorotateIdle => json!(false),
            OptionKey::AutorotateSpeed => json!("2rpm"),
            OptionKey::MoveInertia => json!(true),
            OptionKey::Mousewheel => json!(true),
            OptionKey::Mousemove => json!(true),
            OptionKey::MousewheelCtrlKey => json!(false),
            OptionKey::TouchmoveTwoFingers => json!(false),
            OptionKey::UseXmpData => json!(true),
            OptionKey::CanvasBackground => json!("#000"),
            OptionKey::WithCredentials => json!(false),
            OptionKey::Navbar => json!([
                "autorotate",
                "zoom",
                "move",
                "download",
                "description",
                "caption",
                "fullscreen"
            ]),
            OptionKey::Lang => Value::Object(default_lang()),
            OptionKey::Keyboard => Value::Object(default_keyboard()),
            _ => Value::Null,
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown option {}", s))
    }
}

/// Retired option names and the guidance shown when one is used
pub const DEPRECATED_OPTIONS: &[(&str, &str)] = &[
    (
        "zoomButtonIncrement",
        "zoomButtonIncrement is deprecated, use zoomSpeed",
    ),
    (
        "mousewheelSpeed",
        "mousewheelSpeed is deprecated, use zoomSpeed",
    ),
    (
        "sphereCorrectionReorder",
        "sphereCorrectionReorder is deprecated",
    ),
];

/// Guidance for a deprecated option, or `None` if `key` is not deprecated
pub fn deprecation_message(key: &str) -> Option<&'static str> {
    DEPRECATED_OPTIONS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, message)| *message)
}

/// Actions a key can be bound to in the `keyboard` option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyboardAction {
    RotateLatUp,
    RotateLatDown,
    RotateLongRight,
    RotateLongLeft,
    ZoomIn,
    ZoomOut,
    ToggleAutorotate,
}

/// Default key bindings, keyed by `KeyboardEvent.key` names
pub fn default_keyboard() -> ConfigTree {
    [
        ("ArrowUp", KeyboardAction::RotateLatUp),
        ("ArrowDown", KeyboardAction::RotateLatDown),
        ("ArrowRight", KeyboardAction::RotateLongRight),
        ("ArrowLeft", KeyboardAction::RotateLongLeft),
        ("PageUp", KeyboardAction::ZoomIn),
        ("PageDown", KeyboardAction::ZoomOut),
        ("Plus", KeyboardAction::ZoomIn),
        ("Minus", KeyboardAction::ZoomOut),
        (" ", KeyboardAction::ToggleAutorotate),
    ]
    .into_iter()
    .filter_map(|(key, action)| {
        serde_json::to_value(action)
            .ok()
            .map(|value| (key.to_string(), value))
    })
    .collect()
}

/// Default interface strings
pub fn default_lang() -> ConfigTree {
    [
        ("autorotate", "Automatic rotation"),
        ("zoom", "Zoom"),
        ("zoomOut", "Zoom out"),
        ("zoomIn", "Zoom in"),
        ("move", "Move"),
        ("download", "Download"),
        ("fullscreen", "Fullscreen"),
        ("menu", "Menu"),
        ("twoFingers", "Use two fingers to navigate"),
        ("ctrlZoom", "Use ctrl + scroll to zoom the image"),
        ("loadError", "The panorama can't be loaded"),
    ]
    .into_iter()
    .map(|(key, text)| (key.to_string(), Value::from(text)))
    .collect()
}

/// Process-wide default option tree. Never handed out mutably; use
/// [`default_tree`] to get a copy to work on.
pub fn defaults() -> &'static ConfigTree {
    static DEFAULTS: OnceLock<ConfigTree> = OnceLock::new();
    DEFAULTS.get_or_init(|| {
        OptionKey::ALL
            .iter()
            .map(|key| (key.as_str().to_string(), key.default_value()))
            .collect()
    })
}

/// Deep, independent copy of the default option tree
pub fn default_tree() -> ConfigTree {
    defaults().clone()
}
