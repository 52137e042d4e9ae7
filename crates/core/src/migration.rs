//! Startup normalization of legacy listing records.
//!
//! Older deployments wrote several record shapes into the JSON file: a single
//! `image` string instead of an `images` array, `type` instead of `category`,
//! numeric timestamp ids, and numeric fields stored as form strings. The
//! functions here are pure over [`serde_json::Value`] so the file store can
//! apply them as a mapping pass and only rewrite the file when something
//! actually changed.
//!
//! Every migrated record decodes as a current listing: entries that are not
//! objects are dropped and fields of the wrong type are coerced or cleared.

use serde_json::{Map, Value};

use crate::listing::parse_flag;
use crate::types::generate_record_id;

/// Category assigned to records that never had one.
pub const DEFAULT_CATEGORY: &str = "buyers";

/// Numeric fields that must hold whole numbers.
const INTEGER_FIELDS: &[&str] = &["bedrooms", "bathrooms"];

/// Numeric fields that may hold fractional values.
const DECIMAL_FIELDS: &[&str] = &["price", "carpetArea", "builtupArea", "area"];

/// Free-text fields that must hold strings.
const TEXT_FIELDS: &[&str] = &["title", "description", "location"];

/// Optional RFC 3339 timestamps written by the database export.
const TIMESTAMP_FIELDS: &[&str] = &["createdAt", "updatedAt"];

/// Largest value a count field can store.
const MAX_COUNT: f64 = i32::MAX as f64;

/// Summary of one migration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Records inspected.
    pub total: usize,
    /// Records rewritten into the current shape.
    pub changed: usize,
    /// Entries that were not JSON objects and were removed.
    pub dropped: usize,
}

impl MigrationReport {
    pub fn has_changes(&self) -> bool {
        self.changed > 0 || self.dropped > 0
    }
}

/// Normalize a whole collection. Returns the migrated object records in
/// their original order together with a report.
pub fn migrate_records(records: Vec<Value>) -> (Vec<Value>, MigrationReport) {
    let mut report = MigrationReport {
        total: records.len(),
        ..MigrationReport::default()
    };

    let migrated = records
        .into_iter()
        .filter_map(|record| {
            if !record.is_object() {
                report.dropped += 1;
                return None;
            }
            let (record, changed) = normalize_record(record);
            if changed {
                report.changed += 1;
            }
            Some(record)
        })
        .collect();

    (migrated, report)
}

/// Normalize a single record. The flag reports whether anything changed.
///
/// Non-object values are returned unchanged.
pub fn normalize_record(mut record: Value) -> (Value, bool) {
    let Some(obj) = record.as_object_mut() else {
        return (record, false);
    };

    let mut changed = false;
    changed |= normalize_id(obj);
    changed |= fold_legacy_image(obj);
    changed |= coerce_list(obj, "images");
    changed |= coerce_list(obj, "videos");
    changed |= normalize_category(obj);
    changed |= normalize_flag(obj, "negotiable");
    for field in INTEGER_FIELDS {
        changed |= coerce_number(obj, field, true);
    }
    for field in DECIMAL_FIELDS {
        changed |= coerce_number(obj, field, false);
    }
    for field in TEXT_FIELDS {
        changed |= coerce_text(obj, field);
    }
    for field in TIMESTAMP_FIELDS {
        changed |= drop_invalid_timestamp(obj, field);
    }

    (record, changed)
}

// ---------------------------------------------------------------------------
// Individual rules
// ---------------------------------------------------------------------------

/// Ids must be non-empty strings; numeric legacy ids are stringified.
fn normalize_id(obj: &mut Map<String, Value>) -> bool {
    match obj.get("id") {
        Some(Value::String(id)) if !id.is_empty() => false,
        Some(Value::Number(n)) => {
            let id = n.to_string();
            obj.insert("id".into(), Value::String(id));
            true
        }
        _ => {
            obj.insert("id".into(), Value::String(generate_record_id()));
            true
        }
    }
}

/// `image: "x"` becomes `images: ["x"]` when no `images` exist.
fn fold_legacy_image(obj: &mut Map<String, Value>) -> bool {
    let Some(image) = obj.remove("image") else {
        return false;
    };
    let has_images = obj.get("images").is_some_and(|v| !v.is_null());
    if !has_images && !image.is_null() {
        obj.insert("images".into(), Value::Array(vec![image]));
    }
    true
}

/// Make `field` an array of strings: a string is wrapped, missing/null
/// become `[]` and non-string elements are removed.
fn coerce_list(obj: &mut Map<String, Value>, field: &str) -> bool {
    let normalized: Vec<Value> = match obj.get(field) {
        Some(Value::Array(items)) if items.iter().all(Value::is_string) => return false,
        Some(Value::Array(items)) => items.iter().filter(|v| v.is_string()).cloned().collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![Value::String(s.clone())],
        _ => Vec::new(),
    };
    obj.insert(field.to_string(), Value::Array(normalized));
    true
}

/// Text fields hold strings: `null` and containers become `""`, other
/// scalars their display form.
fn coerce_text(obj: &mut Map<String, Value>, field: &str) -> bool {
    let text = match obj.get(field) {
        None | Some(Value::String(_)) => return false,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(_) => String::new(),
    };
    obj.insert(field.to_string(), Value::String(text));
    true
}

/// Checkbox values were stored as `"on"`, `"true"`, `1` and the like.
fn normalize_flag(obj: &mut Map<String, Value>, field: &str) -> bool {
    let flag = match obj.get(field) {
        None | Some(Value::Bool(_)) => return false,
        Some(Value::String(s)) => parse_flag(s),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(_) => false,
    };
    obj.insert(field.to_string(), Value::Bool(flag));
    true
}

/// Remove timestamps that are not RFC 3339 strings.
fn drop_invalid_timestamp(obj: &mut Map<String, Value>, field: &str) -> bool {
    let valid = match obj.get(field) {
        None => return false,
        Some(Value::String(s)) => chrono::DateTime::parse_from_rfc3339(s).is_ok(),
        Some(_) => false,
    };
    if !valid {
        obj.remove(field);
    }
    !valid
}

/// Move legacy `type` into `category` and default a missing one.
fn normalize_category(obj: &mut Map<String, Value>) -> bool {
    let mut changed = false;
    if let Some(legacy) = obj.remove("type") {
        changed = true;
        if !has_text(obj.get("category")) && has_text(Some(&legacy)) {
            obj.insert("category".into(), legacy);
        }
    }
    if !has_text(obj.get("category")) {
        obj.insert("category".into(), Value::String(DEFAULT_CATEGORY.into()));
        changed = true;
    }
    changed
}

fn has_text(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if !s.trim().is_empty())
}

/// Form values were historically stored verbatim; turn numeric strings into
/// numbers and anything unparseable into `null`. Counts outside
/// `0..=i32::MAX` become `null`.
fn coerce_number(obj: &mut Map<String, Value>, field: &str, integer: bool) -> bool {
    let Some(value) = obj.get(field) else {
        return false;
    };

    let parsed = match value {
        Value::Null => return false,
        Value::Number(n) => match n.as_f64() {
            Some(f) if integer && (n.is_f64() || !(0.0..=MAX_COUNT).contains(&f)) => f,
            _ => return false,
        },
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(f) if f.is_finite() => f,
            _ => {
                obj.insert(field.to_string(), Value::Null);
                return true;
            }
        },
        _ => {
            obj.insert(field.to_string(), Value::Null);
            return true;
        }
    };

    let normalized = if integer {
        if (0.0..=MAX_COUNT).contains(&parsed) && parsed.fract() == 0.0 {
            Value::from(parsed as i64)
        } else {
            Value::Null
        }
    } else {
        Value::from(parsed)
    };
    obj.insert(field.to_string(), normalized);
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
