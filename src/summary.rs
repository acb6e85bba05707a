//! Human-readable summary of the recorded package changes.

use crate::engine::PackageManager;
use crate::error::{StageError, StorageError};
use std::fs;
use std::path::Path;

impl PackageManager {
    /// Added packages prefixed with `+ `, then removed ones with `- `, one per
    /// line. Empty while the gate is closed.
    pub fn summary(&self) -> Result<String, StorageError> {
        if self.check_status().is_err() {
            return Ok(String::new());
        }

        let mut summary = String::new();
        for pkg in self.add_packages()? {
            summary.push_str(&format!("+ {pkg}\n"));
        }
        for pkg in self.remove_packages()? {
            summary.push_str(&format!("- {pkg}\n"));
        }
        Ok(summary)
    }

    /// Write [`summary`](Self::summary) to `path`. Nothing is written when
    /// there is nothing to report.
    pub fn write_summary(&self, path: &Path) -> Result<bool, StageError> {
        let summary = self.summary()?;
        if summary.is_empty() {
            return Ok(false);
        }

        fs::write(path, summary).map_err(|err| StorageError::from_io(path, err))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o644))
                .map_err(|err| StorageError::from_io(path, err))?;
        }
        Ok(true)
    }
}
