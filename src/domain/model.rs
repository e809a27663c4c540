use crate::utils::error::{PrepError, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One dictionary entry. Key order is kept as read from disk.
pub type WordRecord = Map<String, Value>;

pub const NAME_FIELD: &str = "name";

pub const DEFAULT_TRACKED_FIELDS: [&str; 4] =
    ["usphone", "ukphone", "sentences", "detailed_translations"];

pub fn default_tracked_fields() -> Vec<String> {
    DEFAULT_TRACKED_FIELDS.iter().map(|f| f.to_string()).collect()
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `null`, `false`, zero, and empty strings, arrays and objects all count as missing.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    SingleObject,
    List,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceDocument {
    Single(WordRecord),
    Many(Vec<WordRecord>),
}

impl SourceDocument {
    pub fn from_value(path: &str, value: Value) -> Result<Self> {
        match value {
            Value::Object(record) => Ok(SourceDocument::Single(record)),
            Value::Array(items) => {
                let mut records = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(record) => records.push(record),
                        other => {
                            return Err(PrepError::UnexpectedRoot {
                                path: path.to_string(),
                                expected: "an array of objects",
                                found: json_type_name(&other),
                            })
                        }
                    }
                }
                Ok(SourceDocument::Many(records))
            }
            other => Err(PrepError::UnexpectedRoot {
                path: path.to_string(),
                expected: "an object or an array of objects",
                found: json_type_name(&other),
            }),
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            SourceDocument::Single(_) => Shape::SingleObject,
            SourceDocument::Many(_) => Shape::List,
        }
    }

    pub fn records_mut(&mut self) -> &mut [WordRecord] {
        match self {
            SourceDocument::Single(record) => std::slice::from_mut(record),
            SourceDocument::Many(records) => records.as_mut_slice(),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            SourceDocument::Single(record) => Value::Object(record),
            SourceDocument::Many(records) => {
                Value::Array(records.into_iter().map(Value::Object).collect())
            }
        }
    }

    /// Two-space indented rendering with non-ASCII text left unescaped.
    pub fn to_pretty_string(&self) -> Result<String> {
        let text = match self {
            SourceDocument::Single(record) => serde_json::to_string_pretty(record)?,
            SourceDocument::Many(records) => serde_json::to_string_pretty(records)?,
        };
        Ok(text)
    }
}

/// Canonical entries keyed by `name`. Later duplicates replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceIndex {
    entries: HashMap<String, WordRecord>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(path: &str, value: Value) -> Result<Self> {
        let mut index = Self::new();
        match value {
            Value::Array(items) => {
                for (position, item) in items.into_iter().enumerate() {
                    index.insert_value(path, position, item)?;
                }
            }
            Value::Object(record) => {
                index.insert_value(path, 0, Value::Object(record))?;
            }
            other => {
                return Err(PrepError::UnexpectedRoot {
                    path: path.to_string(),
                    expected: "an object or an array of objects",
                    found: json_type_name(&other),
                })
            }
        }
        Ok(index)
    }

    fn insert_value(&mut self, path: &str, position: usize, item: Value) -> Result<()> {
        let record = match item {
            Value::Object(record) => record,
            other => {
                return Err(PrepError::InvalidReference {
                    path: path.to_string(),
                    message: format!(
                        "entry {} is {}, not an object",
                        position,
                        json_type_name(&other)
                    ),
                })
            }
        };

        let name = match record.get(NAME_FIELD) {
            Some(Value::String(name)) => name.clone(),
            Some(other) => {
                return Err(PrepError::InvalidReference {
                    path: path.to_string(),
                    message: format!(
                        "entry {} has a {} \"name\", expected a string",
                        position,
                        json_type_name(other)
                    ),
                })
            }
            None => {
                return Err(PrepError::InvalidReference {
                    path: path.to_string(),
                    message: format!("entry {} has no \"name\" field", position),
                })
            }
        };

        self.insert(name, record);
        Ok(())
    }

    pub fn insert(&mut self, name: String, record: WordRecord) -> Option<WordRecord> {
        self.entries.insert(name, record)
    }

    pub fn get(&self, name: &str) -> Option<&WordRecord> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    pub output_path: String,
    pub lines_written: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    MissingName,
    NoReferenceMatch,
    Enriched { fields_filled: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileOutcome {
    pub file_name: String,
    pub records: usize,
    pub records_enriched: usize,
    pub records_without_name: usize,
    pub records_unmatched: usize,
    pub fields_filled: usize,
    pub written: bool,
}

impl FileOutcome {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: RecordOutcome) {
        self.records += 1;
        match outcome {
            RecordOutcome::MissingName => self.records_without_name += 1,
            RecordOutcome::NoReferenceMatch => self.records_unmatched += 1,
            RecordOutcome::Enriched { fields_filled } => {
                self.records_enriched += 1;
                self.fields_filled += fields_filled;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub file_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichReport {
    pub reference_entries: usize,
    pub files: Vec<FileOutcome>,
    pub skipped: Vec<SkippedFile>,
    pub dry_run: bool,
}

impl EnrichReport {
    pub fn files_written(&self) -> usize {
        self.files.iter().filter(|f| f.written).count()
    }

    pub fn records_enriched(&self) -> usize {
        self.files.iter().map(|f| f.records_enriched).sum()
    }

    pub fn fields_filled(&self) -> usize {
        self.files.iter().map(|f| f.fields_filled).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_falsy_values() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(is_falsy(&value), "{} should be falsy", value);
        }
        for value in [json!(true), json!(1), json!(" "), json!(["x"]), json!({"a": 1})] {
            assert!(!is_falsy(&value), "{} should not be falsy", value);
        }
    }

    #[test]
    fn test_document_shape_follows_root() {
        let single = SourceDocument::from_value("a.json", json!({"name": "dog"})).unwrap();
        assert_eq!(single.shape(), Shape::SingleObject);
        assert_eq!(single.into_value(), json!({"name": "dog"}));

        let many = SourceDocument::from_value("b.json", json!([{"name": "dog"}])).unwrap();
        assert_eq!(many.shape(), Shape::List);
        assert_eq!(many.into_value(), json!([{"name": "dog"}]));
    }

    #[test]
    fn test_document_rejects_scalar_root() {
        let err = SourceDocument::from_value("c.json", json!("dog")).unwrap_err();
        assert!(matches!(err, PrepError::UnexpectedRoot { found: "string", .. }));

        let err = SourceDocument::from_value("d.json", json!([{"name": "dog"}, 3])).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_pretty_string_keeps_non_ascii() {
        let doc = SourceDocument::from_value("e.json", json!({"name": "苹果"})).unwrap();
        assert_eq!(doc.to_pretty_string().unwrap(), "{\n  \"name\": \"苹果\"\n}");
    }

    #[test]
    fn test_reference_index_last_duplicate_wins() {
        let index = ReferenceIndex::from_value(
            "ref.json",
            json!([
                {"name": "cat", "usphone": "first"},
                {"name": "dog"},
                {"name": "cat", "usphone": "second"}
            ]),
        )
        .unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("cat").unwrap()["usphone"], json!("second"));
    }

    #[test]
    fn test_reference_index_from_single_object() {
        let index = ReferenceIndex::from_value("ref.json", json!({"name": "cat"})).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.get("cat").is_some());
    }

    #[test]
    fn test_reference_index_requires_names() {
        let err = ReferenceIndex::from_value("ref.json", json!([{"usphone": "x"}])).unwrap_err();
        assert!(matches!(err, PrepError::InvalidReference { .. }));

        let err = ReferenceIndex::from_value("ref.json", json!(42)).unwrap_err();
        assert!(matches!(err, PrepError::UnexpectedRoot { .. }));
    }
}
