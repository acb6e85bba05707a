//! Pending package changes and the unstaged log.
//!
//! An unstaged entry is a package change waiting to be applied to the next
//! root. Every apply or upgrade consumes the whole log.

use crate::error::StageError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Remove,
}

impl Operation {
    /// Tag used in the persisted unstaged file.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Remove => '-',
        }
    }
}

impl FromStr for Operation {
    type Err = StageError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "+" => Ok(Self::Add),
            "-" => Ok(Self::Remove),
            other => Err(StageError::Parse(format!("unknown operation tag: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    pub name: String,
    pub operation: Operation,
}

impl ChangeEntry {
    pub fn new(name: impl Into<String>, operation: Operation) -> Self {
        Self {
            name: name.into(),
            operation,
        }
    }

    pub fn add(name: impl Into<String>) -> Self {
        Self::new(name, Operation::Add)
    }

    pub fn remove(name: impl Into<String>) -> Self {
        Self::new(name, Operation::Remove)
    }
}

/// Persisted form: `"<op> <name>"`.
impl fmt::Display for ChangeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operation.symbol(), self.name)
    }
}

impl FromStr for ChangeEntry {
    type Err = StageError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (tag, name) = line
            .trim()
            .split_once(' ')
            .ok_or_else(|| StageError::Parse(format!("malformed unstaged entry: '{line}'")))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(StageError::Parse(format!(
                "unstaged entry without a name: '{line}'"
            )));
        }
        Ok(Self::new(name, tag.parse()?))
    }
}

/// Fold an unstaged log left to right.
///
/// A repeated entry for a name is dropped; an entry with the opposite
/// operation cancels the earlier one and neither survives. A name cancelled
/// earlier in the pass may be staged again by a later entry.
pub fn fold(entries: impl IntoIterator<Item = ChangeEntry>) -> Vec<ChangeEntry> {
    let mut cleaned: Vec<ChangeEntry> = Vec::new();
    for entry in entries {
        match cleaned.iter().position(|c| c.name == entry.name) {
            Some(idx) if cleaned[idx].operation != entry.operation => {
                cleaned.remove(idx);
            }
            Some(_) => {}
            None => cleaned.push(entry),
        }
    }
    cleaned
}

/// Split a log into add names and remove names, preserving order.
pub fn partition(entries: &[ChangeEntry]) -> (Vec<&str>, Vec<&str>) {
    let mut add = Vec::new();
    let mut remove = Vec::new();
    for entry in entries {
        match entry.operation {
            Operation::Add => add.push(entry.name.as_str()),
            Operation::Remove => remove.push(entry.name.as_str()),
        }
    }
    (add, remove)
}
