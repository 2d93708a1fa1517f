use super::ConfigTree;
use serde_json::Value;

/// Deep merge `overlay` into `base`. Objects are merged key by key; arrays
/// and scalars from the overlay replace whatever `base` held.
pub fn deep_merge(base: &mut ConfigTree, overlay: &ConfigTree) {
    for (key, overlay_val) in overlay {
        match (base.get_mut(key), overlay_val) {
            (Some(Value::Object(base_map)), Value::Object(overlay_map)) => {
                deep_merge(base_map, overlay_map);
            }
            _ => {
                base.insert(key.clone(), overlay_val.clone());
            }
        }
    }
}
