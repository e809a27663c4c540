pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{ConvertSettings, EnrichSettings, PrepConfig};

pub use adapters::storage::LocalStorage;
pub use core::{
    converter::{convert_file, JsonlConverter},
    enricher::{enrich_directory, enrich_record, EnrichBatch, FileEnricher},
    runner::PipelineRunner,
};
pub use domain::model::{
    ConvertReport, EnrichReport, ReferenceIndex, Shape, SourceDocument, WordRecord,
};
pub use utils::error::{PrepError, Result};
