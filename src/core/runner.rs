use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct PipelineRunner<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> PipelineRunner<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run(&self) -> Result<P::Output> {
        let name = self.pipeline.name();

        tracing::debug!("[{}] extracting", name);
        let extracted = self.pipeline.extract()?;

        tracing::debug!("[{}] transforming", name);
        let transformed = self.pipeline.transform(extracted)?;

        tracing::debug!("[{}] loading", name);
        let output = self.pipeline.load(transformed)?;

        tracing::debug!("[{}] done", name);
        Ok(output)
    }

    pub fn into_inner(self) -> P {
        self.pipeline
    }
}
