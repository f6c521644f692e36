//! Target configuration: loading, overrides, validation and persistence.
//!
//! Loading and validation are separate steps so callers can load a document,
//! apply command-line overrides and only then validate the result.

use crate::{CapturedPoint, Error, MonitorPoint, Result};
use serde_json::{json, Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "data/config/coordinates.json";
pub const DEFAULT_LOOPS: u32 = 10;
pub const DEFAULT_WAIT_BETWEEN_CLICKS: f64 = 1.0;
pub const DEFAULT_WAIT_BETWEEN_LOOPS: f64 = 2.0;

const LOOPS: &str = "loops";
const WAIT_BETWEEN_CLICKS: &str = "wait_between_clicks";
const WAIT_BETWEEN_LOOPS: &str = "wait_between_loops";
const COORDINATES: &str = "coordinates";

/// A validated replay configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetConfig {
    pub loops: u32,
    /// Seconds.
    pub wait_between_clicks: f64,
    /// Seconds.
    pub wait_between_loops: f64,
    pub coordinates: Vec<MonitorPoint>,
}

impl TargetConfig {
    pub fn click_interval(&self) -> Duration {
        seconds(self.wait_between_clicks)
    }

    pub fn loop_interval(&self) -> Duration {
        seconds(self.wait_between_loops)
    }
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::MAX)
}

/// Caller-supplied replacements for the scalar settings.
///
/// Coordinates are deliberately absent: they only come from the document.
/// Values are taken as given; [`ConfigDocument::validate`] rejects bad ones.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Overrides {
    pub loops: Option<i64>,
    pub wait_between_clicks: Option<f64>,
    pub wait_between_loops: Option<f64>,
}

/// A configuration document as stored on disk, before validation.
///
/// Unknown top-level keys are carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    fields: Map<String, Value>,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        let mut document = Self { fields: Map::new() };
        document.apply_defaults();
        document
    }
}

impl ConfigDocument {
    /// Load a document and fill in defaults for absent settings.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::NotFound(path.to_path_buf()))
            }
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let document = Self::parse(&text).map_err(|source| Error::ConfigFormat {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(?path, "loaded configuration");
        Ok(document)
    }

    /// Like [`ConfigDocument::load`], but a missing file yields the defaults.
    ///
    /// The empty coordinate list is then rejected by validation.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(Error::NotFound(_)) => {
                warn!(?path, "configuration file not found, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Parse document text and fill in defaults for absent settings.
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(fields) = value else {
            return Err(serde::de::Error::custom(
                "expected a JSON object at the top level",
            ));
        };
        let mut document = Self { fields };
        document.apply_defaults();
        Ok(document)
    }

    fn apply_defaults(&mut self) {
        let defaults = [
            (LOOPS, json!(DEFAULT_LOOPS)),
            (WAIT_BETWEEN_CLICKS, json!(DEFAULT_WAIT_BETWEEN_CLICKS)),
            (WAIT_BETWEEN_LOOPS, json!(DEFAULT_WAIT_BETWEEN_LOOPS)),
            (COORDINATES, json!([])),
        ];
        for (key, value) in defaults {
            self.fields.entry(key).or_insert(value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(loops) = overrides.loops {
            self.fields.insert(LOOPS.into(), json!(loops));
        }
        if let Some(wait) = overrides.wait_between_clicks {
            self.fields.insert(WAIT_BETWEEN_CLICKS.into(), json!(wait));
        }
        if let Some(wait) = overrides.wait_between_loops {
            self.fields.insert(WAIT_BETWEEN_LOOPS.into(), json!(wait));
        }
    }

    /// Check every setting and produce a typed configuration.
    ///
    /// Fails on the first offending field.
    pub fn validate(&self) -> Result<TargetConfig> {
        let loops = match self.fields.get(LOOPS) {
            None => DEFAULT_LOOPS,
            Some(value) => value
                .as_u64()
                .filter(|n| *n >= 1)
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| {
                    Error::validation(LOOPS, format!("must be a positive integer, got {value}"))
                })?,
        };

        let wait_between_clicks = self.wait(WAIT_BETWEEN_CLICKS, DEFAULT_WAIT_BETWEEN_CLICKS)?;
        let wait_between_loops = self.wait(WAIT_BETWEEN_LOOPS, DEFAULT_WAIT_BETWEEN_LOOPS)?;

        let entries = match self.fields.get(COORDINATES) {
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                return Err(Error::validation(
                    COORDINATES,
                    format!("must be a list, got {other}"),
                ))
            }
            None => return Err(Error::validation(COORDINATES, "must be a list")),
        };
        if entries.is_empty() {
            return Err(Error::validation(
                COORDINATES,
                "must contain at least one coordinate",
            ));
        }

        let coordinates = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| validate_coordinate(index, entry))
            .collect::<Result<Vec<_>>>()?;

        Ok(TargetConfig {
            loops,
            wait_between_clicks,
            wait_between_loops,
            coordinates,
        })
    }

    fn wait(&self, key: &str, default: f64) -> Result<f64> {
        match self.fields.get(key) {
            None => Ok(default),
            Some(value) => non_negative_number(value)
                .ok_or_else(|| Error::validation(key, format!("must be a non-negative number, got {value}"))),
        }
    }

    /// Append points to the coordinate list, keeping existing entries first.
    fn append(&mut self, points: &[CapturedPoint]) -> std::result::Result<(), String> {
        let entries = self
            .fields
            .entry(COORDINATES)
            .or_insert_with(|| json!([]));
        let Value::Array(entries) = entries else {
            return Err("existing coordinates field is not a list".into());
        };
        entries.extend(points.iter().map(|p| {
            json!({
                "monitor": p.monitor,
                "x": p.x,
                "y": p.y,
            })
        }));
        Ok(())
    }

    pub fn to_json_pretty(&self) -> String {
        // A map of JSON values always serializes.
        serde_json::to_string_pretty(&self.fields).unwrap_or_default()
    }
}

fn non_negative_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite() && *n >= 0.0)
}

fn validate_coordinate(index: usize, entry: &Value) -> Result<MonitorPoint> {
    let field = |name: &str| format!("{COORDINATES}[{index}].{name}");

    let Value::Object(record) = entry else {
        return Err(Error::validation(
            format!("{COORDINATES}[{index}]"),
            format!("must be an object with monitor, x and y, got {entry}"),
        ));
    };

    for name in ["monitor", "x", "y"] {
        if !record.contains_key(name) {
            return Err(Error::validation(field(name), "is missing"));
        }
    }

    let monitor = &record["monitor"];
    let monitor = monitor
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            Error::validation(
                field("monitor"),
                format!("must be a non-negative integer, got {monitor}"),
            )
        })?;

    let axis = |name: &str| {
        let value = &record[name];
        non_negative_number(value).ok_or_else(|| {
            Error::validation(
                field(name),
                format!("must be a non-negative number, got {value}"),
            )
        })
    };
    let x = axis("x")?;
    let y = axis("y")?;

    Ok(MonitorPoint { monitor, x, y })
}

/// Write captured points to a configuration document.
///
/// With `merge`, an existing document keeps its settings and coordinates and
/// the new points are appended. A missing or blank file starts from the
/// defaults; any other unparsable content aborts without writing. Without
/// `merge`, the file is replaced by a default document holding only `points`.
///
/// There is no locking against concurrent writers.
pub fn persist(points: &[CapturedPoint], path: &Path, merge: bool) -> Result<()> {
    let persist_error = |reason: String| Error::Persist {
        path: path.to_path_buf(),
        reason,
    };

    let mut document = if merge {
        match fs::read_to_string(path) {
            Ok(text) if text.trim().is_empty() => ConfigDocument::default(),
            Ok(text) => ConfigDocument::parse(&text).map_err(|e| {
                persist_error(format!("existing file is not a valid configuration: {e}"))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => ConfigDocument::default(),
            Err(e) => return Err(persist_error(format!("cannot read existing file: {e}"))),
        }
    } else {
        ConfigDocument::default()
    };

    document.append(points).map_err(persist_error)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| persist_error(e.to_string()))?;
            info!(?parent, "Created configuration directory");
        }
    }

    let mut text = document.to_json_pretty();
    text.push('\n');
    fs::write(path, text).map_err(|e| persist_error(e.to_string()))?;

    info!(count = points.len(), ?path, merge, "Saved coordinates");
    Ok(())
}
