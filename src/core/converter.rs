//! JSON array → JSON Lines conversion.
//!
//! The whole input is parsed and checked before anything is written, so a
//! missing file, malformed JSON or a non-array root never leaves a partial
//! output file behind.

use crate::adapters::storage::LocalStorage;
use crate::config::ConvertSettings;
use crate::core::runner::PipelineRunner;
use crate::core::{ConvertReport, Pipeline, Storage};
use crate::domain::model::json_type_name;
use crate::utils::error::{PrepError, Result};
use serde_json::Value;

pub struct JsonlBatch {
    pub text: String,
    pub lines: usize,
}

pub struct JsonlConverter<S: Storage> {
    storage: S,
    input: String,
    output: String,
}

impl<S: Storage> JsonlConverter<S> {
    pub fn new(storage: S, input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            storage,
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Converts `settings.input` into `settings.output`, both relative to the
/// current directory unless absolute.
pub fn convert_file(settings: &ConvertSettings) -> Result<ConvertReport> {
    let pipeline = JsonlConverter::new(
        LocalStorage::new(""),
        settings.input.as_str(),
        settings.output.as_str(),
    );
    PipelineRunner::new(pipeline).run()
}

/// Renders each value as one compact line terminated by `\n`.
pub fn render_jsonl(items: &[Value]) -> Result<String> {
    let mut text = String::new();
    for item in items {
        text.push_str(&serde_json::to_string(item)?);
        text.push('\n');
    }
    Ok(text)
}

impl<S: Storage> Pipeline for JsonlConverter<S> {
    type Extracted = Vec<Value>;
    type Transformed = JsonlBatch;
    type Output = ConvertReport;

    fn name(&self) -> &str {
        "convert"
    }

    fn extract(&self) -> Result<Vec<Value>> {
        // 讀取整個輸入檔案並確認根元素是陣列
        let data = self.storage.read_file(&self.input)?;
        tracing::debug!("Read {} bytes from {}", data.len(), self.input);

        let root: Value =
            serde_json::from_slice(&data).map_err(|source| PrepError::InvalidJson {
                path: self.input.clone(),
                source,
            })?;

        match root {
            Value::Array(items) => Ok(items),
            other => Err(PrepError::UnexpectedRoot {
                path: self.input.clone(),
                expected: "an array",
                found: json_type_name(&other),
            }),
        }
    }

    fn transform(&self, data: Vec<Value>) -> Result<JsonlBatch> {
        // 每個元素輸出成一行，不轉義中文字元
        let text = render_jsonl(&data)?;
        Ok(JsonlBatch {
            text,
            lines: data.len(),
        })
    }

    fn load(&self, result: JsonlBatch) -> Result<ConvertReport> {
        self.storage.write_file(&self.output, result.text.as_bytes())?;
        tracing::debug!("Wrote {} lines to {}", result.lines, self.output);

        Ok(ConvertReport {
            output_path: self.output.clone(),
            lines_written: result.lines,
        })
    }
}
