//! The staging and reconciliation engine.
//!
//! `PackageManager` owns the three persisted change sets and is their only
//! writer. Every mutation is a full read-modify-write of flat files without
//! locking; callers must serialize staging calls against one base directory
//! (the root-swap transaction layer does this).
//!
//! Writes are not transactional. A failure while writing one list after
//! another has been written leaves the earlier write in place.

use crate::catalog::{PackageCatalog, RepoCatalog};
use crate::change::{self, ChangeEntry, Operation};
use crate::command::{CommandSynthesizer, Mode};
use crate::config::EngineConfig;
use crate::error::{StageError, StorageError};
use crate::gate::{AccessGate, GateStatus};
use crate::storage::{ChangeSetStore, ListKind};
use std::path::Path;

pub struct PackageManager {
    store: ChangeSetStore,
    gate: AccessGate,
    catalog: Box<dyn PackageCatalog>,
    synthesizer: CommandSynthesizer,
}

impl PackageManager {
    /// Build an engine from configuration, using the HTTP catalog.
    pub fn new(config: &EngineConfig) -> Result<Self, StageError> {
        let catalog = RepoCatalog::new(config.catalog_url());
        Self::with_catalog(config, Box::new(catalog))
    }

    pub fn with_catalog(
        config: &EngineConfig,
        catalog: Box<dyn PackageCatalog>,
    ) -> Result<Self, StageError> {
        let store = ChangeSetStore::open(config.base_dir())?;
        let gate = AccessGate::new(config.status, config.agreement_file());
        tracing::debug!(
            base_dir = %store.base_dir().display(),
            status = %gate.status(),
            dry_run = config.dry_run,
            "package manager ready"
        );

        Ok(Self {
            store,
            gate,
            catalog,
            synthesizer: CommandSynthesizer::from_config(config),
        })
    }

    pub fn status(&self) -> GateStatus {
        self.gate.status()
    }

    pub fn base_dir(&self) -> &Path {
        self.store.base_dir()
    }

    pub fn check_status(&self) -> Result<(), StageError> {
        self.gate.check_status()
    }

    pub fn accept_agreement(&self) -> Result<(), StageError> {
        Ok(self.gate.accept_agreement()?)
    }

    pub fn agreement_accepted(&self) -> bool {
        self.gate.agreement_accepted()
    }

    /// Stage a package for installation.
    ///
    /// A package previously staged for removal is simply unset: it leaves the
    /// remove set without entering the add set, and the catalog is not
    /// consulted since removed packages need not exist upstream any more.
    pub fn stage_add(&self, name: &str) -> Result<(), StageError> {
        let name = validate_name(name)?;
        self.check_status()?;

        let mut removed = self.remove_packages()?;
        if let Some(idx) = removed.iter().position(|p| p == name) {
            self.push_unstaged(ChangeEntry::add(name))?;
            removed.remove(idx);
            tracing::info!(package = name, "unsetting manually removed package");
            return Ok(self.store.store(ListKind::Remove, &removed)?);
        }

        self.ensure_exists(name)?;
        self.push_unstaged(ChangeEntry::add(name))?;
        self.record(Operation::Add, name)
    }

    /// Stage a package for removal.
    ///
    /// Only the catalog is consulted, not the installed system, so a package
    /// that is not installed can still be staged for removal.
    pub fn stage_remove(&self, name: &str) -> Result<(), StageError> {
        let name = validate_name(name)?;
        self.check_status()?;
        self.ensure_exists(name)?;
        self.push_unstaged(ChangeEntry::remove(name))?;

        let mut added = self.add_packages()?;
        if let Some(idx) = added.iter().position(|p| p == name) {
            added.remove(idx);
            tracing::info!(package = name, "removing manually added package");
            return Ok(self.store.store(ListKind::Add, &added)?);
        }

        self.record(Operation::Remove, name)
    }

    pub fn add_packages(&self) -> Result<Vec<String>, StorageError> {
        self.store.load(ListKind::Add)
    }

    pub fn remove_packages(&self) -> Result<Vec<String>, StorageError> {
        self.store.load(ListKind::Remove)
    }

    pub fn unstaged(&self) -> Result<Vec<ChangeEntry>, StorageError> {
        self.store.load_unstaged()
    }

    pub fn unstaged_names(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.unstaged()?.into_iter().map(|e| e.name).collect())
    }

    pub fn add_packages_string(&self, sep: &str) -> Result<String, StorageError> {
        Ok(self.add_packages()?.join(sep))
    }

    pub fn remove_packages_string(&self, sep: &str) -> Result<String, StorageError> {
        Ok(self.remove_packages()?.join(sep))
    }

    /// Drop every unstaged entry. Called once a transaction has consumed them.
    pub fn clear_unstaged(&self) -> Result<(), StorageError> {
        tracing::debug!("clearing unstaged packages");
        self.store.store_unstaged(Vec::new()).map(|_| ())
    }

    /// The command to run for `mode`, or an empty string if nothing changes.
    /// Stored state is left untouched; call [`clear_unstaged`] after an apply.
    ///
    /// [`clear_unstaged`]: Self::clear_unstaged
    pub fn final_command(&self, mode: Mode) -> Result<String, StorageError> {
        let cmd = match mode {
            Mode::Apply => {
                let unstaged = self.unstaged()?;
                let (add, remove) = change::partition(&unstaged);
                self.synthesizer.synthesize(&add, &remove)
            }
            Mode::Upgrade => {
                let add = self.add_packages()?;
                let remove = self.remove_packages()?;
                self.synthesizer.synthesize(&add, &remove)
            }
        };

        if cmd.is_empty() {
            tracing::debug!(?mode, "no packages to install or remove");
        } else {
            tracing::debug!(?mode, %cmd, "synthesized package command");
        }
        Ok(cmd)
    }

    fn ensure_exists(&self, name: &str) -> Result<(), StageError> {
        for token in name.split_whitespace() {
            self.catalog.exists(token)?;
        }
        Ok(())
    }

    fn push_unstaged(&self, entry: ChangeEntry) -> Result<(), StorageError> {
        let mut entries = self.store.load_unstaged()?;
        entries.push(entry);
        self.store.store_unstaged(entries).map(|_| ())
    }

    /// Add `name` to the set for `operation` unless already present.
    fn record(&self, operation: Operation, name: &str) -> Result<(), StageError> {
        let kind = list_for(operation);
        let mut names = self.store.load(kind)?;
        if names.iter().any(|p| p == name) {
            tracing::info!(package = name, ?operation, "package already staged");
            return Ok(());
        }

        names.push(name.to_string());
        tracing::info!(package = name, ?operation, "writing {}", kind.file_name());
        Ok(self.store.store(kind, &names)?)
    }
}

fn list_for(operation: Operation) -> ListKind {
    match operation {
        Operation::Add => ListKind::Add,
        Operation::Remove => ListKind::Remove,
    }
}

fn validate_name(name: &str) -> Result<&str, StageError> {
    let name = name.trim();
    if name.is_empty() || name.contains('\n') {
        return Err(StageError::Parse(format!("invalid package name: '{name}'")));
    }
    Ok(name)
}
