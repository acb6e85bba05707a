//! pkgstage - stage package changes for atomic systems
//!
//! Records the packages a user wants added to or removed from the next
//! system root, reconciles contradicting requests, and synthesizes the single
//! package manager command a transaction runs when the root is built.
//!
//! Three lists are kept under the state directory:
//!
//! - `packages.add`: packages the user wants present
//! - `packages.remove`: packages the user wants gone
//! - `packages.unstaged`: changes not yet applied to a root, as `+ name` / `- name`
//!
//! An apply transaction consumes only the unstaged changes; an upgrade
//! replays the full add and remove lists.

pub mod catalog;
pub mod change;
pub mod cli;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod output;
pub mod storage;
mod summary;

pub use catalog::{PackageCatalog, PackageInfo, RepoCatalog};
pub use change::{ChangeEntry, Operation};
pub use command::{CommandSynthesizer, Mode};
pub use config::EngineConfig;
pub use engine::PackageManager;
pub use error::{ConfigError, StageError, StorageError};
pub use gate::{AccessGate, GateStatus};
