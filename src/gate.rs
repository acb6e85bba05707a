//! Access gate guarding whether staging is permitted at all.

use crate::error::{StageError, StorageError};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Package manager status, fixed for the lifetime of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateStatus {
    #[default]
    Disabled,
    Enabled,
    RequiresAgreement,
}

impl GateStatus {
    /// Map a legacy integer status code. Unknown codes disable the gate.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Enabled,
            2 => Self::RequiresAgreement,
            _ => Self::Disabled,
        }
    }

    /// Whether staged changes should be reported to the user.
    pub fn is_active(self) -> bool {
        self != Self::Disabled
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Enabled => "enabled",
            Self::RequiresAgreement => "requires-agreement",
        }
    }
}

impl std::fmt::Display for GateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GateStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(i64),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(code) => Ok(Self::from_code(code)),
            Raw::Name(name) => match name.as_str() {
                "disabled" => Ok(Self::Disabled),
                "enabled" => Ok(Self::Enabled),
                "requires-agreement" => Ok(Self::RequiresAgreement),
                other => Err(serde::de::Error::unknown_variant(
                    other,
                    &["disabled", "enabled", "requires-agreement"],
                )),
            },
        }
    }
}

pub struct AccessGate {
    status: GateStatus,
    agreement_file: PathBuf,
}

impl AccessGate {
    pub fn new(status: GateStatus, agreement_file: impl Into<PathBuf>) -> Self {
        Self {
            status,
            agreement_file: agreement_file.into(),
        }
    }

    pub fn status(&self) -> GateStatus {
        self.status
    }

    pub fn agreement_file(&self) -> &Path {
        &self.agreement_file
    }

    pub fn check_status(&self) -> Result<(), StageError> {
        match self.status {
            GateStatus::Disabled => {
                tracing::debug!("package manager is disabled");
                Ok(())
            }
            GateStatus::Enabled => Ok(()),
            GateStatus::RequiresAgreement => {
                if self.agreement_accepted() {
                    Ok(())
                } else {
                    tracing::debug!("package manager agreement not accepted");
                    Err(StageError::AgreementRequired)
                }
            }
        }
    }

    /// Record the user agreement. Only meaningful in agreement mode.
    pub fn accept_agreement(&self) -> Result<(), StorageError> {
        if self.status != GateStatus::RequiresAgreement {
            tracing::debug!(status = %self.status, "not in agreement mode, nothing to accept");
            return Ok(());
        }

        let stamp = chrono::Local::now().to_rfc3339();
        fs::write(&self.agreement_file, stamp)
            .map_err(|err| StorageError::from_io(&self.agreement_file, err))?;
        tracing::info!(path = %self.agreement_file.display(), "user agreement accepted");
        Ok(())
    }

    pub fn agreement_accepted(&self) -> bool {
        if self.status != GateStatus::RequiresAgreement {
            return true;
        }
        self.agreement_file.exists()
    }
}
