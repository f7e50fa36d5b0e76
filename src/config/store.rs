// Config store persistence
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FeedbackError, Result};

/// Key-value configuration with dotted keys (`"themes.Cats.sound_effect"`).
///
/// `load` is the only way new persisted values become visible.
pub trait ConfigStore: Send {
    /// Refresh from persisted storage
    fn load(&mut self) -> Result<()>;

    fn get(&self, key: &str) -> Option<Value>;
}

/// File-backed store: shipped defaults plus a user override file
pub struct JsonConfigStore {
    defaults_path: PathBuf,
    overrides_path: PathBuf,
    defaults: Value,
    overrides: Value,
    merged: Value,
}

impl JsonConfigStore {
    pub fn new(defaults_path: PathBuf, overrides_path: PathBuf) -> Self {
        Self {
            defaults_path,
            overrides_path,
            defaults: Value::Object(Map::new()),
            overrides: Value::Object(Map::new()),
            merged: Value::Object(Map::new()),
        }
    }

    /// Standard layout: `config.json` next to the add-on code, overrides in
    /// `user_files/config.json` so they survive add-on updates
    pub fn in_addon_dir(addon_dir: &Path) -> Self {
        Self::new(
            addon_dir.join("config.json"),
            addon_dir.join("user_files").join("config.json"),
        )
    }

    /// Write a value into the override layer. Takes effect immediately for
    /// this store; call `save` to persist it.
    pub fn set(&mut self, key: &str, value: Value) {
        let mut node = &mut self.overrides;
        let mut parts = key.split('.').peekable();
        while let Some(part) = parts.next() {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            let Some(map) = node.as_object_mut() else {
                return;
            };
            if parts.peek().is_none() {
                map.insert(part.to_string(), value);
                break;
            }
            node = map
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        self.merged = merged_values(&self.defaults, &self.overrides);
    }

    /// Save the override layer to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.overrides_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.overrides)?;
        fs::write(&self.overrides_path, content)?;
        log::info!("[Config] Saved config to {:?}", self.overrides_path);
        Ok(())
    }
}

impl ConfigStore for JsonConfigStore {
    fn load(&mut self) -> Result<()> {
        // Parse both layers before touching state so a bad file leaves the
        // previous values in place
        let defaults = read_object(&self.defaults_path)?;
        let overrides = read_object(&self.overrides_path)?;
        self.merged = merged_values(&defaults, &overrides);
        self.defaults = defaults;
        self.overrides = overrides;
        log::debug!("[Config] Loaded config from {:?}", self.defaults_path);
        Ok(())
    }

    fn get(&self, key: &str) -> Option<Value> {
        key.split('.')
            .try_fold(&self.merged, |node, part| node.get(part))
            .cloned()
    }
}

/// Read a JSON object from disk. A missing file is an empty object.
fn read_object(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(Value::Object(Map::new()));
    }
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    if !value.is_object() {
        return Err(FeedbackError::Config(format!(
            "{} must contain a JSON object",
            path.display()
        )));
    }
    Ok(value)
}

/// Deep merge: objects merge key by key, anything else in `overrides` wins
fn merged_values(defaults: &Value, overrides: &Value) -> Value {
    match (defaults, overrides) {
        (Value::Object(base), Value::Object(over)) => {
            let mut out = base.clone();
            for (key, value) in over {
                let merged = match base.get(key) {
                    Some(existing) => merged_values(existing, value),
                    None => value.clone(),
                };
                out.insert(key.clone(), merged);
            }
            Value::Object(out)
        }
        (_, over) => over.clone(),
    }
}
