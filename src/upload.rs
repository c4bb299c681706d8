use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Scoped handle for an uploaded image.
///
/// The backing file is uniquely named per request and removed when the handle
/// drops, whichever way the request ends.
#[derive(Debug)]
pub struct TempImage {
    file: NamedTempFile,
}

impl TempImage {
    /// Stages the uploaded bytes in the system temp directory.
    pub fn new(bytes: &[u8]) -> std::io::Result<Self> {
        let mut file = NamedTempFile::new()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(TempImage { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
