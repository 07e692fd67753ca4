use crate::manifest::ManifestError;
use crate::types::{CheckoutPath, DepId, Pin};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One dependency: where it comes from, what it is pinned to, where it lands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyEntry {
    pub id: DepId,
    pub version: Pin,
    pub path: CheckoutPath,
}

impl DependencyEntry {
    pub fn new(
        id: impl Into<DepId>,
        version: impl Into<Pin>,
        path: impl Into<CheckoutPath>,
    ) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            path: path.into(),
        }
    }

    pub fn pin_kind(&self) -> PinKind {
        PinKind::of(&self.version)
    }
}

/// Display classification of a pin token. Never used for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinKind {
    /// Full 40- or 64-character hex commit hash.
    Commit,
    /// `version:` tagged package release.
    Version,
    /// `git_revision:` tagged package build.
    GitRevision,
    Other,
}

impl PinKind {
    pub fn of(token: &str) -> Self {
        let token = token.trim();
        if token.starts_with("version:") {
            PinKind::Version
        } else if token.starts_with("git_revision:") {
            PinKind::GitRevision
        } else if matches!(token.len(), 40 | 64) && token.bytes().all(|b| b.is_ascii_hexdigit()) {
            PinKind::Commit
        } else {
            PinKind::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PinKind::Commit => "commit",
            PinKind::Version => "version",
            PinKind::GitRevision => "git_revision",
            PinKind::Other => "other",
        }
    }
}

impl fmt::Display for PinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insertion-ordered mapping from id to entry, as read from a manifest.
///
/// Every entry is stored under its own id; inserting a second entry with an
/// id already present fails with [`ManifestError::DuplicateId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestTable {
    entries: Vec<DependencyEntry>,
    index: BTreeMap<DepId, usize>,
}

impl ManifestTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: DependencyEntry) -> Result<(), ManifestError> {
        if self.index.contains_key(&entry.id) {
            return Err(ManifestError::DuplicateId(entry.id.into_inner()));
        }
        self.index.insert(entry.id.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&DependencyEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, DependencyEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[DependencyEntry] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a ManifestTable {
    type Item = &'a DependencyEntry;
    type IntoIter = std::slice::Iter<'a, DependencyEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl TryFrom<Vec<DependencyEntry>> for ManifestTable {
    type Error = ManifestError;

    fn try_from(entries: Vec<DependencyEntry>) -> Result<Self, Self::Error> {
        let mut table = ManifestTable::new();
        for entry in entries {
            table.insert(entry)?;
        }
        Ok(table)
    }
}
