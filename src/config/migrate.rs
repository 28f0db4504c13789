//! Bring an existing configuration file up to date with the current keys.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Add every key the file is missing, with its default value.
///
/// Existing values are never touched. Returns the names of the keys that
/// were added; the file is only rewritten when that list is not empty.
pub fn add_missing_fields(path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;

    let mut yaml: Value = if content.trim().is_empty() {
        Value::Mapping(Default::default())
    } else {
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?
    };

    let Some(map) = yaml.as_mapping_mut() else {
        return Err(AppError::Config(format!(
            "{}: top level is not a mapping",
            path.display()
        )));
    };

    let defaults = serde_yaml::to_value(Config::default()).map_err(|_| AppError::ConfigSave)?;
    let Some(defaults) = defaults.as_mapping() else {
        return Err(AppError::ConfigSave);
    };

    let mut added = Vec::new();
    for (key, value) in defaults {
        if !map.contains_key(key) {
            map.insert(key.clone(), value.clone());
            if let Some(k) = key.as_str() {
                added.push(k.to_string());
            }
        }
    }

    if !added.is_empty() {
        let serialized = serde_yaml::to_string(&yaml).map_err(|_| AppError::ConfigSave)?;
        fs::write(path, serialized)?;
    }

    Ok(added)
}
