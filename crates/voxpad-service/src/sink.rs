use std::io::Write;
use std::path::PathBuf;

/// Appends every transcription result as one line to a file.
pub struct TranscriptSink {
    path: PathBuf,
}

impl TranscriptSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn append(&self, text: &str) -> std::io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", text)?;
        Ok(())
    }
}
