pub mod converter;
pub mod enricher;
pub mod runner;

pub use crate::domain::model::{
    ConvertReport, EnrichReport, FileOutcome, RecordOutcome, ReferenceIndex, SourceDocument,
    WordRecord,
};
pub use crate::domain::ports::{Pipeline, Storage};
pub use crate::utils::error::Result;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::Storage;
    use crate::utils::error::{PrepError, Result};
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    /// In-memory storage; files are listed in name order.
    #[derive(Default)]
    pub struct MockStorage {
        files: RefCell<BTreeMap<String, Vec<u8>>>,
        pub writes: RefCell<Vec<String>>,
    }

    impl MockStorage {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_file(self, path: &str, content: &str) -> Self {
            self.files
                .borrow_mut()
                .insert(path.to_string(), content.as_bytes().to_vec());
            self
        }

        pub fn get_file(&self, path: &str) -> Option<String> {
            self.files
                .borrow()
                .get(path)
                .map(|data| String::from_utf8_lossy(data).into_owned())
        }
    }

    impl Storage for MockStorage {
        fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| PrepError::InputNotFound {
                    path: path.to_string(),
                })
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.writes.borrow_mut().push(path.to_string());
            self.files
                .borrow_mut()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }

        fn list_files(&self) -> Result<Vec<String>> {
            Ok(self.files.borrow().keys().cloned().collect())
        }
    }
}
