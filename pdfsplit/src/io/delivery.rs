//! Output delivery.
//!
//! The splitter hands every assembled [`OutputDocument`] to a [`Delivery`]
//! implementation, in range order. Two are provided:
//!
//! - [`FileDelivery`] persists each output under a directory, writing to a
//!   temporary file first and renaming it into place.
//! - [`MemoryDelivery`] keeps the outputs in memory, for embedding the
//!   splitter in another program.
//!
//! # Examples
//!
//! ```no_run
//! use pdfsplit::config::OverwriteMode;
//! use pdfsplit::io::delivery::FileDelivery;
//!
//! let delivery = FileDelivery::new("out").with_overwrite_mode(OverwriteMode::Force);
//! assert_eq!(delivery.output_path("a.pdf"), std::path::Path::new("out/a.pdf"));
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::OverwriteMode;
use crate::error::{Result, SplitError};
use crate::split::{DeliveredOutput, OutputDocument};

/// Receives assembled outputs and persists them.
pub trait Delivery {
    /// Deliver one output document.
    ///
    /// Called once per range, in processing order.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be persisted.
    fn deliver(&mut self, output: &OutputDocument) -> Result<DeliveredOutput>;
}

impl<D: Delivery + ?Sized> Delivery for &mut D {
    fn deliver(&mut self, output: &OutputDocument) -> Result<DeliveredOutput> {
        (**self).deliver(output)
    }
}

impl<D: Delivery + ?Sized> Delivery for Box<D> {
    fn deliver(&mut self, output: &OutputDocument) -> Result<DeliveredOutput> {
        (**self).deliver(output)
    }
}

/// Options for writing output files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            buffer_size: 8192,
        }
    }
}

/// Writes outputs into a directory.
#[derive(Debug, Clone)]
pub struct FileDelivery {
    dir: PathBuf,
    overwrite_mode: OverwriteMode,
    options: WriteOptions,
}

impl FileDelivery {
    /// Deliver into `dir`, refusing to replace existing files.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overwrite_mode: OverwriteMode::NoClobber,
            options: WriteOptions::default(),
        }
    }

    /// Set how existing files are treated.
    ///
    /// [`OverwriteMode::Prompt`] behaves like [`OverwriteMode::NoClobber`]
    /// here; asking the user is the caller's job, before splitting starts.
    pub fn with_overwrite_mode(mut self, mode: OverwriteMode) -> Self {
        self.overwrite_mode = mode;
        self
    }

    /// Replace the write options.
    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    /// The directory outputs are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where an output with the given name ends up.
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.write_with(path, |writer| writer.write_all(bytes))
    }

    /// Write `path` through `fill`. In atomic mode the temporary file is
    /// removed again if any step fails.
    fn write_with<F>(&self, path: &Path, fill: F) -> Result<()>
    where
        F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
    {
        let write_path = if self.options.atomic {
            path.with_extension("pdf.tmp")
        } else {
            path.to_path_buf()
        };

        let file = std::fs::File::create(&write_path).map_err(|e| SplitError::FailedToWrite {
            path: write_path.clone(),
            source: e,
        })?;

        let mut writer = std::io::BufWriter::with_capacity(self.options.buffer_size, file);
        if let Err(e) = fill(&mut writer).and_then(|()| writer.flush()) {
            drop(writer);
            if self.options.atomic {
                let _ = std::fs::remove_file(&write_path);
            }
            return Err(SplitError::FailedToWrite {
                path: write_path,
                source: e,
            });
        }
        drop(writer);

        if self.options.atomic {
            std::fs::rename(&write_path, path).map_err(|e| {
                // Leave nothing half-written behind.
                let _ = std::fs::remove_file(&write_path);
                SplitError::FailedToWrite {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
        }

        Ok(())
    }
}

impl Delivery for FileDelivery {
    fn deliver(&mut self, output: &OutputDocument) -> Result<DeliveredOutput> {
        let path = self.output_path(&output.name);

        if path.exists() && self.overwrite_mode != OverwriteMode::Force {
            return Err(SplitError::output_exists(path));
        }

        self.write(&path, &output.bytes)?;
        debug!(path = %path.display(), bytes = output.bytes.len(), "wrote output");

        Ok(DeliveredOutput {
            index: output.index,
            range: output.range.to_string(),
            name: output.name.clone(),
            path: Some(path),
            size: output.bytes.len(),
        })
    }
}

/// Collects outputs in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDelivery {
    outputs: Vec<OutputDocument>,
}

impl MemoryDelivery {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Outputs received so far, in delivery order.
    pub fn outputs(&self) -> &[OutputDocument] {
        &self.outputs
    }

    /// Consume the collector and return the outputs.
    pub fn into_outputs(self) -> Vec<OutputDocument> {
        self.outputs
    }
}

impl Delivery for MemoryDelivery {
    fn deliver(&mut self, output: &OutputDocument) -> Result<DeliveredOutput> {
        self.outputs.push(output.clone());

        Ok(DeliveredOutput {
            index: output.index,
            range: output.range.to_string(),
            name: output.name.clone(),
            path: None,
            size: output.bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::PageRange;
    use tempfile::TempDir;

    fn output(name: &str, bytes: &[u8]) -> OutputDocument {
        OutputDocument {
            index: 0,
            range: PageRange::new(1, 2).unwrap(),
            name: name.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_file_delivery_writes() {
        let temp_dir = TempDir::new().unwrap();
        let mut delivery = FileDelivery::new(temp_dir.path());

        let delivered = delivery.deliver(&output("a.pdf", b"%PDF-1.4\n")).unwrap();

        let path = temp_dir.path().join("a.pdf");
        assert_eq!(delivered.path.as_deref(), Some(path.as_path()));
        assert_eq!(delivered.size, 9);
        assert_eq!(delivered.range, "1-2");
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4\n");
        assert!(!temp_dir.path().join("a.pdf.tmp").exists());
    }

    #[test]
    fn test_file_delivery_no_clobber() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.pdf"), b"old").unwrap();

        let mut delivery = FileDelivery::new(temp_dir.path());
        let result = delivery.deliver(&output("a.pdf", b"new"));

        assert!(matches!(result, Err(SplitError::OutputExists { .. })));
        assert_eq!(std::fs::read(temp_dir.path().join("a.pdf")).unwrap(), b"old");
    }

    #[test]
    fn test_file_delivery_force() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.pdf"), b"old").unwrap();

        let mut delivery =
            FileDelivery::new(temp_dir.path()).with_overwrite_mode(OverwriteMode::Force);
        delivery.deliver(&output("a.pdf", b"new")).unwrap();

        assert_eq!(std::fs::read(temp_dir.path().join("a.pdf")).unwrap(), b"new");
    }

    #[test]
    fn test_failed_write_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let delivery = FileDelivery::new(dir.path());
        let path = delivery.output_path("a.pdf");

        let err = delivery
            .write_with(&path, |writer| {
                writer.write_all(b"%PDF-1.4\n")?;
                Err(std::io::Error::other("disk full"))
            })
            .unwrap_err();

        assert!(matches!(err, SplitError::FailedToWrite { .. }));
        assert!(!path.exists());
        assert!(!path.with_extension("pdf.tmp").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_file_delivery_non_atomic() {
        let temp_dir = TempDir::new().unwrap();
        let mut delivery = FileDelivery::new(temp_dir.path()).with_options(WriteOptions {
            atomic: false,
            buffer_size: 16,
        });

        delivery.deliver(&output("b.pdf", b"bytes")).unwrap();
        assert_eq!(std::fs::read(temp_dir.path().join("b.pdf")).unwrap(), b"bytes");
    }

    #[test]
    fn test_file_delivery_missing_directory() {
        let mut delivery = FileDelivery::new("/nonexistent/output/dir");
        let result = delivery.deliver(&output("a.pdf", b"x"));
        assert!(matches!(result, Err(SplitError::FailedToWrite { .. })));
    }

    #[test]
    fn test_memory_delivery() {
        let mut delivery = MemoryDelivery::new();
        let delivered = delivery.deliver(&output("a.pdf", b"abc")).unwrap();

        assert_eq!(delivered.path, None);
        assert_eq!(delivered.size, 3);
        assert_eq!(delivery.outputs().len(), 1);
        assert_eq!(delivery.into_outputs()[0].bytes, b"abc");
    }
}
