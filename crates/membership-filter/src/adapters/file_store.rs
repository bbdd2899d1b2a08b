//! File-backed filter store
//!
//! Writes go to a `<file name>.tmp` sibling that is synced and then renamed
//! over the target, so a crash mid-save leaves the previous file intact. A
//! failed save removes the sibling.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::domain::MembershipFilter;
use crate::error::FilterError;
use crate::ports::FilterStore;

/// Persists one filter at a fixed path
#[derive(Clone, Debug)]
pub struct FileFilterStore {
    path: PathBuf,
}

impl FileFilterStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if a saved filter exists at the store path
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// `<file name>.tmp` beside the target; never equal to the target
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_then_rename(&self, bytes: &[u8], temp_path: &Path) -> std::io::Result<()> {
        let mut file = File::create(temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(temp_path, &self.path)
    }
}

impl FilterStore for FileFilterStore {
    fn save(&self, filter: &MembershipFilter) -> Result<(), FilterError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let bytes = filter.to_bytes();
        let temp_path = self.temp_path();

        if let Err(err) = self.write_then_rename(&bytes, &temp_path) {
            if temp_path.exists() {
                if let Err(cleanup) = fs::remove_file(&temp_path) {
                    warn!(
                        path = %temp_path.display(),
                        error = %cleanup,
                        "Failed to remove temp file after failed save"
                    );
                }
            }
            return Err(err.into());
        }

        info!(
            path = %self.path.display(),
            bytes = bytes.len(),
            filled_bits = filter.filled_bits(),
            "Saved membership filter"
        );
        Ok(())
    }

    fn load(&self) -> Result<MembershipFilter, FilterError> {
        debug!(path = %self.path.display(), "Loading membership filter");
        let bytes = fs::read(&self.path)?;
        let filter = MembershipFilter::from_bytes(&bytes)?;

        info!(
            path = %self.path.display(),
            bit_count = filter.bit_count(),
            filled_bits = filter.filled_bits(),
            "Loaded membership filter"
        );
        Ok(filter)
    }
}
