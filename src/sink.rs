use std::path::PathBuf;

/// Destination for decoded snapshots kept for debugging.
///
/// Persisting is best effort: the orchestrator logs a failed write and carries on.
pub trait ImageSink: Send + Sync {
    fn persist(&self, bytes: &[u8]) -> std::io::Result<()>;
}

/// Discards every image.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl ImageSink for NullSink {
    fn persist(&self, _bytes: &[u8]) -> std::io::Result<()> {
        Ok(())
    }
}

/// Overwrites a single file with the latest image. Concurrent writers race; the last one wins.
#[derive(Clone, Debug)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Writes to `path`, replacing whatever is there.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ImageSink for FileSink {
    fn persist(&self, bytes: &[u8]) -> std::io::Result<()> {
        std::fs::write(&self.path, bytes)?;
        log::debug!("Saved snapshot to {}", self.path.display());
        Ok(())
    }
}
