use std::path::{Path, PathBuf};

use tempfile::TempPath;

/// Directory holding per-request waveform files
///
/// Every waveform gets a unique name and is removed when its [`TempPath`]
/// is dropped, whichever way the request ends.
#[derive(Debug, Clone)]
pub(crate) struct Scratch {
    dir: PathBuf,
}

impl Scratch {
    /// Use `dir`, or the system temp directory, creating it when missing
    pub fn new(dir: Option<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.unwrap_or_else(std::env::temp_dir);
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reserve a fresh, empty waveform file
    pub fn waveform(&self) -> std::io::Result<TempPath> {
        Ok(tempfile::Builder::new()
            .prefix("murmur-")
            .suffix(".wav")
            .tempfile_in(&self.dir)?
            .into_temp_path())
    }
}
