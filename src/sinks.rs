use std::{
    fs::File,
    io::{LineWriter, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use eyre::Context;

/// Destination for rendered log lines.
///
/// Each call to [`LogSink::write_line`] holds the sink's lock for the whole
/// line, so lines written to the same sink never interleave.
pub trait LogSink: Sync + Send {
    fn write_line(&self, line: &str) -> eyre::Result<()>;
    fn flush(&self) -> eyre::Result<()>;
}

pub type SharedSink = Arc<dyn LogSink>;

pub struct StdoutSink {
    handle: std::io::Stdout,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            handle: std::io::stdout(),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) -> eyre::Result<()> {
        let mut writer = self.handle.lock();

        writeln!(writer, "{}", line)?;
        writer.flush().context("Can't flush stdout")
    }

    fn flush(&self) -> eyre::Result<()> {
        self.handle.lock().flush().context("Can't flush stdout")
    }
}

pub struct StderrSink {
    handle: std::io::Stderr,
}

impl StderrSink {
    pub fn new() -> Self {
        Self {
            handle: std::io::stderr(),
        }
    }
}

impl Default for StderrSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for StderrSink {
    fn write_line(&self, line: &str) -> eyre::Result<()> {
        let mut writer = self.handle.lock();

        writeln!(writer, "{}", line)?;
        writer.flush().context("Can't flush stderr")
    }

    fn flush(&self) -> eyre::Result<()> {
        self.handle.lock().flush().context("Can't flush stderr")
    }
}

/// Appends lines to a file, creating it when missing.
pub struct FileSink {
    file: Mutex<LineWriter<File>>,
    file_path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed opening or creating log file {}", path.display()))?;

        Ok(Self {
            file: Mutex::new(LineWriter::new(file)),
            file_path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl LogSink for FileSink {
    fn write_line(&self, line: &str) -> eyre::Result<()> {
        let mut file = self.file.lock().map_err(|e| eyre::eyre!(e.to_string()))?;
        writeln!(file, "{}", line)?;
        file.flush().context("Can't flush file")
    }

    fn flush(&self) -> eyre::Result<()> {
        let mut file = self.file.lock().map_err(|e| eyre::eyre!(e.to_string()))?;
        file.flush().context("Can't flush file")
    }
}

/// Keeps everything written in memory, for capturing output in tests.
///
/// Clones share the same buffer.
#[derive(Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        match self.buffer.lock() {
            Ok(buffer) => buffer.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.contents().is_empty()
    }

    pub fn clear(&self) {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.clear();
        }
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) -> eyre::Result<()> {
        let mut buffer = self.buffer.lock().map_err(|e| eyre::eyre!(e.to_string()))?;
        buffer.push_str(line);
        buffer.push('\n');
        Ok(())
    }

    fn flush(&self) -> eyre::Result<()> {
        Ok(())
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NullSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for NullSink {
    fn write_line(&self, _line: &str) -> eyre::Result<()> {
        Ok(())
    }

    fn flush(&self) -> eyre::Result<()> {
        Ok(())
    }
}
