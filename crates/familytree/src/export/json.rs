//! JSON export of computed layouts.
//!
//! Produces `{ "positions": { id: {x, y} }, "connectors": [ {type, x1, y1, x2, y2, persons} ] }`.

use crate::error::{FamilyTreeError, Result};
use crate::layout::FamilyLayout;
use serde_json::{json, Value};

/// Export a layout as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`FamilyTreeError::Serialization`] if the layout cannot be converted.
pub fn export_layout_json(layout: &FamilyLayout) -> Result<String> {
    let value = layout_to_value(layout)?;
    serde_json::to_string_pretty(&value)
        .map_err(|e| FamilyTreeError::serialization("Failed to serialize layout JSON", Some(e)))
}

/// Layout as a JSON value, with node sizes merged into the positions.
///
/// # Errors
///
/// Returns [`FamilyTreeError::Serialization`] if the layout cannot be converted.
pub fn layout_to_value(layout: &FamilyLayout) -> Result<Value> {
    let mut value = serde_json::to_value(layout)
        .map_err(|e| FamilyTreeError::serialization("Failed to convert layout to JSON", Some(e)))?;

    if let Some(positions) = value.get_mut("positions").and_then(Value::as_object_mut) {
        for (id, entry) in positions.iter_mut() {
            if let (Some(size), Some(object)) = (layout.sizes.get(id), entry.as_object_mut()) {
                object.insert("width".to_string(), json!(size.width));
                object.insert("height".to_string(), json!(size.height));
            }
        }
    }

    Ok(value)
}
