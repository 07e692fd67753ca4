use crate::table::{DependencyEntry, ManifestTable};
use crate::types::{CheckoutPath, DepId, Pin};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("invalid id '{id}': {reason}")]
    InvalidId { id: String, reason: &'static str },
    #[error("path '{path}' is claimed by both '{first}' and '{second}'")]
    DuplicatePath {
        path: String,
        first: String,
        second: String,
    },
    #[error("'{id}': version must not be empty")]
    InvalidVersion { id: String },
    #[error("'{id}': invalid path '{path}': {reason}")]
    InvalidPath {
        id: String,
        path: String,
        reason: &'static str,
    },
}

/// Canonical table: validated, normalized, sorted by id.
///
/// Only [`resolve`] constructs one, so every value of this type upholds
/// non-empty trimmed unique ids, unique paths and non-empty versions.
/// Emitters rely on that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTable {
    entries: Vec<DependencyEntry>,
}

impl ResolvedTable {
    /// Entries in ascending id order.
    pub fn entries(&self) -> &[DependencyEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DependencyEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&DependencyEntry> {
        self.entries
            .binary_search_by(|e| e.id.as_str().cmp(id))
            .ok()
            .map(|i| &self.entries[i])
    }

    /// Entry that materializes into `path`, if any.
    pub fn by_path(&self, path: &str) -> Option<&DependencyEntry> {
        self.entries.iter().find(|e| e.path == path)
    }
}

impl<'a> IntoIterator for &'a ResolvedTable {
    type Item = &'a DependencyEntry;
    type IntoIter = std::slice::Iter<'a, DependencyEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for ResolvedTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

/// Validate a manifest table and produce its canonical form.
///
/// Checks run in sorted-id order so the reported error does not depend on
/// manifest order either.
pub fn resolve(table: &ManifestTable) -> Result<ResolvedTable, ResolveError> {
    let mut entries: Vec<DependencyEntry> = table.iter().cloned().collect();
    entries.sort_by(|a, b| a.id.cmp(&b.id));

    let mut claimed: BTreeMap<String, DepId> = BTreeMap::new();
    for entry in &mut entries {
        if entry.id.is_empty() {
            return Err(ResolveError::InvalidId {
                id: entry.id.to_string(),
                reason: "must not be empty",
            });
        }
        if entry.id.trim() != entry.id.as_str() {
            return Err(ResolveError::InvalidId {
                id: entry.id.to_string(),
                reason: "must not have surrounding whitespace",
            });
        }

        let version = entry.version.trim();
        if version.is_empty() {
            return Err(ResolveError::InvalidVersion {
                id: entry.id.to_string(),
            });
        }
        entry.version = Pin::new(version);

        let path = normalize_path(&entry.id, &entry.path)?;
        if let Some(first) = claimed.get(&path) {
            return Err(ResolveError::DuplicatePath {
                path,
                first: first.to_string(),
                second: entry.id.to_string(),
            });
        }
        claimed.insert(path.clone(), entry.id.clone());
        entry.path = CheckoutPath::new(path);
    }

    debug!("resolved {} dependencies", entries.len());
    Ok(ResolvedTable { entries })
}

/// Trim, drop empty and `.` segments, reject escapes.
///
/// Only `/` separates segments; `\` is an ordinary filename byte on POSIX and
/// is kept as written.
fn normalize_path(id: &DepId, raw: &str) -> Result<String, ResolveError> {
    let invalid = |reason| ResolveError::InvalidPath {
        id: id.to_string(),
        path: raw.to_owned(),
        reason,
    };

    let trimmed = raw.trim();
    if trimmed.starts_with('/') || has_drive_prefix(&trimmed) {
        return Err(invalid("must be relative"));
    }

    let mut segments = Vec::new();
    for segment in trimmed.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(invalid("must not contain '..'")),
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        return Err(invalid("must not be empty"));
    }
    Ok(segments.join("/"))
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::load_table_str;

    fn table(entries: &[(&str, &str, &str)]) -> ManifestTable {
        ManifestTable::try_from(
            entries
                .iter()
                .map(|(id, v, p)| DependencyEntry::new(*id, *v, *p))
                .collect::<Vec<_>>(),
        )
        .unwrap()
    }

    #[test]
    fn sorts_by_id() {
        let resolved = resolve(&table(&[("b", "2", "y"), ("a", "1", "x")])).unwrap();
        let ids: Vec<&str> = resolved.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn permuted_inputs_resolve_identically() {
        let rows = [
            ("skia.googlesource.com/skcms", "1", "third_party/externals/skcms"),
            ("chromium.googlesource.com/angle/angle", "2", "third_party/externals/angle2"),
            ("skia/tools/sk", "git_revision:3c89", "bin"),
            ("android.googlesource.com/platform/external/piex", "4", "third_party/externals/piex"),
        ];
        let forward = resolve(&table(&rows)).unwrap();
        let mut reversed = rows;
        reversed.reverse();
        let backward = resolve(&table(&reversed)).unwrap();
        let mut rotated = rows;
        rotated.rotate_left(2);
        let middle = resolve(&table(&rotated)).unwrap();

        assert_eq!(forward, backward);
        assert_eq!(forward, middle);
    }

    #[test]
    fn rejects_duplicate_path() {
        let err = resolve(&table(&[
            ("skia/tools/sk", "1", "bin"),
            ("gn", "version:2@1.12.1", "bin"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ResolveError::DuplicatePath {
                path: "bin".to_owned(),
                first: "gn".to_owned(),
                second: "skia/tools/sk".to_owned(),
            }
        );
    }

    #[test]
    fn duplicate_path_detected_after_normalization() {
        let err = resolve(&table(&[
            ("a", "1", "third_party/zlib/"),
            ("b", "2", "./third_party//zlib"),
        ]))
        .unwrap_err();
        assert!(
            matches!(err, ResolveError::DuplicatePath { ref path, .. } if path == "third_party/zlib")
        );
    }

    #[test]
    fn rejects_empty_version() {
        let err = resolve(&table(&[("a/b", "", "p")])).unwrap_err();
        assert_eq!(err, ResolveError::InvalidVersion { id: "a/b".to_owned() });

        let err = resolve(&table(&[("a/b", "  \t", "p")])).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidVersion { .. }));
    }

    #[test]
    fn rejects_bad_paths() {
        for bad in ["", "  ", "/abs/path", "C:/x", "a/../../b", "..", "./"] {
            let err = resolve(&table(&[("a", "1", bad)])).unwrap_err();
            assert!(
                matches!(err, ResolveError::InvalidPath { .. }),
                "path {bad:?} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn normalizes_fields() {
        let resolved = resolve(&table(&[("a", "  v1 ", " third_party/./externals//x/")])).unwrap();
        let entry = resolved.get("a").unwrap();
        assert_eq!(entry.version, "v1");
        assert_eq!(entry.path, "third_party/externals/x");
        assert_eq!(resolved.by_path("third_party/externals/x").unwrap().id, "a");
    }

    #[test]
    fn backslash_is_not_a_separator() {
        let resolved = resolve(&table(&[("a", "1", "odd\\name"), ("b", "2", "odd/name")])).unwrap();
        assert_eq!(resolved.get("a").unwrap().path, "odd\\name");
        assert_eq!(resolved.get("b").unwrap().path, "odd/name");
    }

    #[test]
    fn rejects_empty_id() {
        let err = resolve(&table(&[("", "v1", "p"), ("a", "v1", "r")])).unwrap_err();
        assert_eq!(
            err,
            ResolveError::InvalidId {
                id: String::new(),
                reason: "must not be empty",
            }
        );
    }

    #[test]
    fn rejects_untrimmed_id() {
        let err = resolve(&table(&[(" a ", "v1", "q"), ("a", "v1", "r")])).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidId { ref id, .. } if id == " a "));
    }

    #[test]
    fn first_error_is_deterministic() {
        let a = resolve(&table(&[("z", "", "p1"), ("m", "", "p2")])).unwrap_err();
        let b = resolve(&table(&[("m", "", "p2"), ("z", "", "p1")])).unwrap_err();
        assert_eq!(a, b);
        assert_eq!(a, ResolveError::InvalidVersion { id: "m".to_owned() });
    }

    #[test]
    fn single_entry_survives_unchanged() {
        let table = load_table_str(
            "manifest_version = 1\n[[deps]]\nid = \"a/b\"\nversion = \"v1\"\npath = \"p\"\n",
        )
        .unwrap();
        let resolved = resolve(&table).unwrap();
        assert_eq!(resolved.entries(), &[DependencyEntry::new("a/b", "v1", "p")]);
    }

    #[test]
    fn empty_table_resolves() {
        let resolved = resolve(&ManifestTable::new()).unwrap();
        assert!(resolved.is_empty());
    }
}
