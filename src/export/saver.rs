//! File save capabilities.
//!
//! Exported bytes leave the process through a [`FileSaver`]. Two variants
//! exist, mirroring the two ways a host can accept a download:
//!
//! - [`DirectSaver`]: the legacy path, a single "save these bytes under this
//!   name" call
//! - [`StagedSaver`]: the general path, a transient hidden object holding the
//!   bytes is created, activated once under the suggested name, and gone
//!
//! [`detect_saver`] picks one from configuration and what the environment
//! supports.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::{ExportConfig, SaveMode};
use crate::storage::{CsvDocument, ExportError, ExportResult, CSV_MIME_TYPE};

/// Prefix of transient staging files; the leading dot hides them
const STAGING_PREFIX: &str = ".halo-export-";
const STAGING_SUFFIX: &str = ".partial";

/// Bytes tagged with a MIME type, ready to hand to a saver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvBlob {
    bytes: Vec<u8>,
    mime_type: &'static str,
}

impl CsvBlob {
    pub fn new(document: CsvDocument) -> Self {
        CsvBlob {
            bytes: document.into_bytes(),
            mime_type: CSV_MIME_TYPE,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<CsvDocument> for CsvBlob {
    fn from(document: CsvDocument) -> Self {
        CsvBlob::new(document)
    }
}

/// Host capability that stores a blob under a suggested file name
pub trait FileSaver: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Save `blob` under `filename`, used verbatim
    fn save(&self, blob: &CsvBlob, filename: &str) -> io::Result<()>;
}

impl<T: FileSaver + ?Sized> FileSaver for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn save(&self, blob: &CsvBlob, filename: &str) -> io::Result<()> {
        (**self).save(blob, filename)
    }
}

impl<T: FileSaver + ?Sized> FileSaver for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn save(&self, blob: &CsvBlob, filename: &str) -> io::Result<()> {
        (**self).save(blob, filename)
    }
}

/// Legacy path: write the bytes straight to the target name
#[derive(Debug, Clone)]
pub struct DirectSaver {
    download_dir: PathBuf,
}

impl DirectSaver {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        DirectSaver {
            download_dir: download_dir.into(),
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }
}

impl FileSaver for DirectSaver {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn save(&self, blob: &CsvBlob, filename: &str) -> io::Result<()> {
        let target = self.download_dir.join(filename);
        fs::write(&target, blob.bytes())?;
        debug!(target = %target.display(), bytes = blob.len(), "direct_save_complete");
        Ok(())
    }
}

/// General path: stage the bytes in a hidden transient file, then activate
/// it once by moving it to the target name
#[derive(Debug, Clone)]
pub struct StagedSaver {
    download_dir: PathBuf,
}

impl StagedSaver {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        StagedSaver {
            download_dir: download_dir.into(),
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }
}

impl FileSaver for StagedSaver {
    fn name(&self) -> &'static str {
        "staged"
    }

    fn save(&self, blob: &CsvBlob, filename: &str) -> io::Result<()> {
        let target = self.download_dir.join(filename);
        // Stage next to the target so the final rename stays on one filesystem
        let staging_dir = target.parent().unwrap_or(self.download_dir.as_path());

        let mut staged = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(staging_dir)?;
        staged.write_all(blob.bytes())?;
        staged.flush()?;

        // On failure the staged file is dropped, which removes it
        staged.persist(&target).map_err(|e| e.error)?;
        debug!(target = %target.display(), bytes = blob.len(), "staged_save_complete");
        Ok(())
    }
}

/// Pick a saver for `config`, creating the download directory if needed
pub fn detect_saver(config: &ExportConfig) -> ExportResult<Box<dyn FileSaver>> {
    let dir = &config.download_dir;
    prepare_download_dir(dir)?;

    let mode = match config.save_mode {
        SaveMode::Auto if config.legacy_direct_save => SaveMode::Direct,
        SaveMode::Auto => SaveMode::Staged,
        explicit => explicit,
    };

    let saver: Box<dyn FileSaver> = match mode {
        SaveMode::Direct => Box::new(DirectSaver::new(dir.clone())),
        _ => {
            if !staging_supported(dir) {
                return Err(ExportError::PlatformUnsupported(format!(
                    "cannot create transient files in '{}'",
                    dir.display()
                )));
            }
            Box::new(StagedSaver::new(dir.clone()))
        }
    };

    debug!(saver = saver.name(), dir = %dir.display(), "saver_selected");
    Ok(saver)
}

fn prepare_download_dir(dir: &Path) -> ExportResult<()> {
    let unavailable = |e: io::Error| {
        ExportError::PlatformUnsupported(format!(
            "download directory '{}' is unavailable: {e}",
            dir.display()
        ))
    };
    fs::create_dir_all(dir).map_err(unavailable)?;
    let metadata = fs::metadata(dir).map_err(unavailable)?;
    if !metadata.is_dir() {
        return Err(ExportError::PlatformUnsupported(format!(
            "download target '{}' is not a directory",
            dir.display()
        )));
    }
    if metadata.permissions().readonly() {
        return Err(ExportError::PlatformUnsupported(format!(
            "download directory '{}' is read-only",
            dir.display()
        )));
    }
    Ok(())
}

fn staging_supported(dir: &Path) -> bool {
    tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(STAGING_SUFFIX)
        .tempfile_in(dir)
        .is_ok()
}
