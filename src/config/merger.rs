//! Layered merge of YAML configuration values.
//!
//! `.trellis/config.local.yml` is laid over `.trellis/config.yml`:
//!
//! - Mappings merge key by key, recursively
//! - Sequences are replaced whole (a local `rules:` list replaces the shared one)
//! - A `null` in the overlay deletes the key
//! - Any other overlay value replaces the base value

use serde_yaml::Value;

/// Merge `overlay` over `base` and return the result.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    let mut merged = base.clone();
    merge_into(&mut merged, overlay);
    merged
}

/// Merge layers in order; later layers win.
pub fn merge_configs(layers: &[Value]) -> Value {
    let mut merged = Value::Mapping(Default::default());
    for layer in layers {
        merge_into(&mut merged, layer);
    }
    merged
}

fn merge_into(target: &mut Value, overlay: &Value) {
    match (target, overlay) {
        (Value::Mapping(target_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                if value.is_null() {
                    target_map.remove(key);
                    continue;
                }
                match target_map.get_mut(key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        target_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, overlay) => *target = overlay.clone(),
    }
}
