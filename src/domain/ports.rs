use crate::utils::error::Result;

/// File access for the pipelines. Paths are resolved against the storage root.
pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
    /// Names of the regular files directly under the root, in listing order.
    fn list_files(&self) -> Result<Vec<String>>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        (**self).read_file(path)
    }

    fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        (**self).write_file(path, data)
    }

    fn list_files(&self) -> Result<Vec<String>> {
        (**self).list_files()
    }
}

pub trait Pipeline {
    type Extracted;
    type Transformed;
    type Output;

    fn name(&self) -> &str;
    fn extract(&self) -> Result<Self::Extracted>;
    fn transform(&self, data: Self::Extracted) -> Result<Self::Transformed>;
    fn load(&self, result: Self::Transformed) -> Result<Self::Output>;
}
