//! Fills missing word fields from a canonical reference dataset.
//!
//! `EnrichBatch` builds the reference index once and then runs a
//! `FileEnricher` pipeline for every other `*.json` file in the directory.
//! A file that fails to parse, or whose root is not an object or an array of
//! objects, is skipped with a warning; the rest of the batch carries on.

use crate::adapters::storage::LocalStorage;
use crate::config::EnrichSettings;
use crate::core::runner::PipelineRunner;
use crate::core::{
    EnrichReport, FileOutcome, Pipeline, RecordOutcome, ReferenceIndex, SourceDocument, Storage,
    WordRecord,
};
use crate::domain::model::{is_falsy, SkippedFile, NAME_FIELD};
use crate::utils::error::{PrepError, Result};
use crate::utils::validation::Validate;
use serde_json::Value;

const JSON_SUFFIX: &str = ".json";

/// Copies each tracked field the record lacks (absent or falsy) from its
/// reference entry. A field the reference entry lacks as well becomes `null`.
pub fn enrich_record(
    record: &mut WordRecord,
    index: &ReferenceIndex,
    tracked_fields: &[String],
) -> RecordOutcome {
    let name = match record.get(NAME_FIELD) {
        Some(value) if !is_falsy(value) => value,
        _ => return RecordOutcome::MissingName,
    };

    let Some(reference) = name.as_str().and_then(|name| index.get(name)) else {
        return RecordOutcome::NoReferenceMatch;
    };

    let mut fields_filled = 0;
    for field in tracked_fields {
        let needs_fill = record.get(field).map(is_falsy).unwrap_or(true);
        if needs_fill {
            let value = reference.get(field).cloned().unwrap_or(Value::Null);
            record.insert(field.clone(), value);
            fields_filled += 1;
        }
    }

    RecordOutcome::Enriched { fields_filled }
}

/// Enriches every candidate file in `settings.dir` in place.
pub fn enrich_directory(settings: EnrichSettings) -> Result<EnrichReport> {
    settings.validate()?;
    let storage = LocalStorage::new(settings.dir.as_str());
    EnrichBatch::new(storage, settings).run()
}

pub struct FileEnricher<'a, S: Storage> {
    storage: &'a S,
    index: &'a ReferenceIndex,
    tracked_fields: &'a [String],
    file_name: String,
    dry_run: bool,
}

impl<'a, S: Storage> FileEnricher<'a, S> {
    pub fn new(
        storage: &'a S,
        index: &'a ReferenceIndex,
        tracked_fields: &'a [String],
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            index,
            tracked_fields,
            file_name: file_name.into(),
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl<S: Storage> Pipeline for FileEnricher<'_, S> {
    type Extracted = SourceDocument;
    type Transformed = (SourceDocument, FileOutcome);
    type Output = FileOutcome;

    fn name(&self) -> &str {
        &self.file_name
    }

    fn extract(&self) -> Result<SourceDocument> {
        let data = self.storage.read_file(&self.file_name)?;
        let root: Value =
            serde_json::from_slice(&data).map_err(|source| PrepError::InvalidJson {
                path: self.file_name.clone(),
                source,
            })?;
        SourceDocument::from_value(&self.file_name, root)
    }

    fn transform(&self, mut data: SourceDocument) -> Result<(SourceDocument, FileOutcome)> {
        // 補全每個單詞缺少的欄位
        let mut outcome = FileOutcome::new(self.file_name.as_str());
        for record in data.records_mut() {
            outcome.record(enrich_record(record, self.index, self.tracked_fields));
        }

        tracing::debug!(
            "{}: {} of {} records enriched ({} fields filled)",
            self.file_name,
            outcome.records_enriched,
            outcome.records,
            outcome.fields_filled
        );
        Ok((data, outcome))
    }

    fn load(&self, (document, mut outcome): (SourceDocument, FileOutcome)) -> Result<FileOutcome> {
        if self.dry_run {
            tracing::info!("Dry run: leaving {} untouched", self.file_name);
            return Ok(outcome);
        }

        // 寫回原檔案，保留原本的物件或陣列結構
        let text = document.to_pretty_string()?;
        self.storage.write_file(&self.file_name, text.as_bytes())?;
        outcome.written = true;
        Ok(outcome)
    }
}

pub struct EnrichBatch<S: Storage> {
    storage: S,
    settings: EnrichSettings,
}

impl<S: Storage> EnrichBatch<S> {
    pub fn new(storage: S, settings: EnrichSettings) -> Self {
        Self { storage, settings }
    }

    pub fn load_reference(&self) -> Result<ReferenceIndex> {
        let path = &self.settings.reference_file;
        let data = self.storage.read_file(path)?;
        let root: Value =
            serde_json::from_slice(&data).map_err(|source| PrepError::InvalidJson {
                path: path.clone(),
                source,
            })?;
        let index = ReferenceIndex::from_value(path, root)?;
        if index.is_empty() {
            tracing::warn!("⚠️ Reference file {} has no entries; nothing will be filled", path);
        }
        tracing::info!("Loaded {} reference entries from {}", index.len(), path);
        Ok(index)
    }

    /// Every `*.json` file except the reference file, in listing order.
    /// `reference_file` is a bare file name inside the storage root.
    pub fn candidate_files(&self) -> Result<Vec<String>> {
        let reference = self.settings.reference_file.as_str();
        let files = self
            .storage
            .list_files()?
            .into_iter()
            .filter(|name| name.ends_with(JSON_SUFFIX) && name != reference)
            .collect();
        Ok(files)
    }

    pub fn run(&self) -> Result<EnrichReport> {
        let index = self.load_reference()?;
        let candidates = self.candidate_files()?;
        self.run_with_index(&index, &candidates)
    }

    pub fn run_with_index(
        &self,
        index: &ReferenceIndex,
        candidates: &[String],
    ) -> Result<EnrichReport> {
        let mut report = EnrichReport {
            reference_entries: index.len(),
            dry_run: self.settings.dry_run,
            ..EnrichReport::default()
        };

        for file_name in candidates {
            tracing::info!("Processing file: {}", file_name);

            // 每個檔案獨立處理，互不影響
            let pipeline = FileEnricher::new(
                &self.storage,
                index,
                &self.settings.tracked_fields,
                file_name.as_str(),
            )
            .dry_run(self.settings.dry_run);

            match PipelineRunner::new(pipeline).run() {
                Ok(outcome) => report.files.push(outcome),
                // 單一檔案失敗只記錄並跳過，繼續處理下一個
                Err(e) => {
                    if e.is_recoverable() {
                        tracing::warn!("⚠️ Skipping {}: {}", file_name, e);
                    } else {
                        tracing::error!("❌ Skipping {}: {}", file_name, e);
                    }
                    report.skipped.push(SkippedFile {
                        file_name: file_name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        // 輸出處理摘要
        tracing::info!(
            "✅ All files processed: {} written, {} skipped, {} records enriched",
            report.files_written(),
            report.skipped.len(),
            report.records_enriched()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::MockStorage;
    use crate::domain::model::default_tracked_fields;
    use serde_json::json;

    const REFERENCE: &str = "KEYBR.officialwordlibraries.json";

    fn cat_index() -> ReferenceIndex {
        ReferenceIndex::from_value(
            REFERENCE,
            json!({"name": "cat", "usphone": "/kæt/", "sentences": ["I have a cat."]}),
        )
        .unwrap()
    }

    fn record(value: Value) -> WordRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    fn batch(storage: &MockStorage) -> EnrichBatch<&MockStorage> {
        EnrichBatch::new(storage, EnrichSettings::default())
    }

    #[test]
    fn test_enrich_record_fills_falsy_and_missing_fields() {
        let mut word = record(json!({"name": "cat", "usphone": ""}));

        let outcome = enrich_record(&mut word, &cat_index(), &default_tracked_fields());

        assert_eq!(outcome, RecordOutcome::Enriched { fields_filled: 4 });
        assert_eq!(
            Value::Object(word),
            json!({
                "name": "cat",
                "usphone": "/kæt/",
                "ukphone": null,
                "sentences": ["I have a cat."],
                "detailed_translations": null
            })
        );
    }

    #[test]
    fn test_enrich_record_keeps_truthy_fields() {
        let mut word = record(json!({
            "name": "cat",
            "usphone": "/kat/",
            "ukphone": "/kæt/",
            "sentences": ["Mine."],
            "detailed_translations": [{"chinese": "猫"}]
        }));
        let before = word.clone();

        let outcome = enrich_record(&mut word, &cat_index(), &default_tracked_fields());

        assert_eq!(outcome, RecordOutcome::Enriched { fields_filled: 0 });
        assert_eq!(word, before);
    }

    #[test]
    fn test_enrich_record_skips_missing_or_unknown_names() {
        let index = cat_index();
        let fields = default_tracked_fields();

        let mut nameless = record(json!({"usphone": ""}));
        assert_eq!(enrich_record(&mut nameless, &index, &fields), RecordOutcome::MissingName);
        assert_eq!(Value::Object(nameless), json!({"usphone": ""}));

        let mut empty_name = record(json!({"name": ""}));
        assert_eq!(enrich_record(&mut empty_name, &index, &fields), RecordOutcome::MissingName);

        let mut unknown = record(json!({"name": "dog", "usphone": ""}));
        assert_eq!(
            enrich_record(&mut unknown, &index, &fields),
            RecordOutcome::NoReferenceMatch
        );
        assert_eq!(Value::Object(unknown), json!({"name": "dog", "usphone": ""}));

        let mut numeric = record(json!({"name": 7}));
        assert_eq!(
            enrich_record(&mut numeric, &index, &fields),
            RecordOutcome::NoReferenceMatch
        );
    }

    #[test]
    fn test_candidate_files_excludes_reference_and_other_extensions() {
        let storage = MockStorage::new()
            .with_file(REFERENCE, "[]")
            .with_file("a.json", "[]")
            .with_file("b.jsonl", "")
            .with_file("notes.txt", "")
            .with_file("c.JSON", "[]");

        let candidates = batch(&storage).candidate_files().unwrap();
        assert_eq!(candidates, vec!["a.json".to_string()]);
    }

    #[test]
    fn test_run_preserves_shapes_and_skips_bad_files() {
        let storage = MockStorage::new()
            .with_file(
                REFERENCE,
                r#"[{"name": "cat", "usphone": "/kæt/", "sentences": ["I have a cat."]}]"#,
            )
            .with_file("a_list.json", r#"[{"name": "cat", "usphone": ""}]"#)
            .with_file("b_single.json", r#"{"name": "dog"}"#)
            .with_file("c_broken.json", r#"{"name": "#)
            .with_file("d_scalar.json", "42");

        let report = batch(&storage).run().unwrap();

        assert_eq!(report.reference_entries, 1);
        assert_eq!(report.files_written(), 2);
        assert_eq!(report.records_enriched(), 1);
        assert_eq!(report.fields_filled(), 4);
        let skipped: Vec<&str> = report.skipped.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(skipped, vec!["c_broken.json", "d_scalar.json"]);

        let list: Value = serde_json::from_str(&storage.get_file("a_list.json").unwrap()).unwrap();
        assert_eq!(
            list,
            json!([{
                "name": "cat",
                "usphone": "/kæt/",
                "sentences": ["I have a cat."],
                "ukphone": null,
                "detailed_translations": null
            }])
        );

        assert_eq!(
            storage.get_file("b_single.json").unwrap(),
            "{\n  \"name\": \"dog\"\n}"
        );
        assert_eq!(storage.get_file("c_broken.json").unwrap(), r#"{"name": "#);
        assert_eq!(storage.get_file("d_scalar.json").unwrap(), "42");
        assert!(!storage.writes.borrow().iter().any(|w| w == REFERENCE));
    }

    #[test]
    fn test_run_is_idempotent() {
        let storage = MockStorage::new()
            .with_file(REFERENCE, r#"{"name": "cat", "ukphone": "/kæt/"}"#)
            .with_file("words.json", r#"[{"name": "cat", "sentences": []}, {"name": "猫"}]"#);

        batch(&storage).run().unwrap();
        let first = storage.get_file("words.json").unwrap();
        batch(&storage).run().unwrap();
        let second = storage.get_file("words.json").unwrap();

        assert_eq!(first, second);
        assert!(first.contains("\"猫\""));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let storage = MockStorage::new()
            .with_file(REFERENCE, r#"{"name": "cat", "ukphone": "/kæt/"}"#)
            .with_file("words.json", r#"[{"name": "cat"}]"#);
        let settings = EnrichSettings {
            dry_run: true,
            ..EnrichSettings::default()
        };

        let report = EnrichBatch::new(&storage, settings).run().unwrap();

        assert!(report.dry_run);
        assert_eq!(report.files_written(), 0);
        assert_eq!(report.records_enriched(), 1);
        assert!(storage.writes.borrow().is_empty());
    }

    #[test]
    fn test_custom_tracked_fields() {
        let storage = MockStorage::new()
            .with_file(REFERENCE, r#"{"name": "cat", "usphone": "/kæt/", "ukphone": "/kat/"}"#)
            .with_file("words.json", r#"{"name": "cat"}"#);
        let settings = EnrichSettings {
            tracked_fields: vec!["ukphone".to_string()],
            ..EnrichSettings::default()
        };

        EnrichBatch::new(&storage, settings).run().unwrap();

        let word: Value = serde_json::from_str(&storage.get_file("words.json").unwrap()).unwrap();
        assert_eq!(word, json!({"name": "cat", "ukphone": "/kat/"}));
    }

    #[test]
    fn test_large_integers_survive_rewrite() {
        let storage = MockStorage::new()
            .with_file(REFERENCE, r#"{"name": "cat", "usphone": "/kæt/"}"#)
            .with_file(
                "words.json",
                r#"[{"name": "cat", "id": 123456789012345678901234567890, "freq": 0.1}]"#,
            );

        batch(&storage).run().unwrap();

        let text = storage.get_file("words.json").unwrap();
        assert!(text.contains("\"id\": 123456789012345678901234567890"));
        assert!(text.contains("\"freq\": 0.1"));
        assert!(text.contains("\"usphone\": \"/kæt/\""));
    }

    #[test]
    fn test_reference_path_outside_dir_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("ref.json"), r#"{"name": "cat"}"#).unwrap();
        let settings = EnrichSettings {
            dir: dir.path().to_string_lossy().into_owned(),
            reference_file: "../ref.json".to_string(),
            ..EnrichSettings::default()
        };

        let err = enrich_directory(settings).unwrap_err();

        assert!(matches!(err, PrepError::InvalidConfigValueError { .. }));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("ref.json")).unwrap(),
            r#"{"name": "cat"}"#
        );
    }

    #[test]
    fn test_missing_reference_is_fatal() {
        let storage = MockStorage::new().with_file("words.json", "[]");

        let err = batch(&storage).run().unwrap_err();
        assert!(matches!(err, PrepError::InputNotFound { .. }));
        assert!(storage.writes.borrow().is_empty());
    }
}
