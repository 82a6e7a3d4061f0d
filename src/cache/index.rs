//! Cache index: the text ledger mapping cache keys to artifacts
//!
//! One line per live artifact: `key:filename:digest`. The key itself is
//! `component:artifact-filename`, so lines are parsed from the right.

use crate::error::{DevkitError, DevkitResult};

/// A single index record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Cache key, exact string match (`component:artifact-filename`)
    pub key: String,
    /// Artifact filename inside the cache directory
    pub filename: String,
    /// SHA-256 digest of the artifact contents, lowercase hex
    pub digest: String,
}

/// In-memory view of the cache index file
#[derive(Debug, Clone, Default)]
pub struct CacheIndex {
    entries: Vec<IndexEntry>,
}

impl CacheIndex {
    /// Parse the index from file contents. Blank lines are ignored.
    pub fn parse(content: &str) -> DevkitResult<Self> {
        let mut entries = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            entries.push(parse_line(line)?);
        }
        Ok(Self { entries })
    }

    /// Serialize back to file contents, one record per line.
    pub fn to_contents(&self) -> String {
        let mut out = String::new();
        for e in &self.entries {
            out.push_str(&format!("{}:{}:{}\n", e.key, e.filename, e.digest));
        }
        out
    }

    /// Look up a record by exact key match.
    pub fn get(&self, key: &str) -> Option<&IndexEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Insert or replace the record for a key. Returns the filename of a
    /// replaced artifact, if it differs from the new one.
    pub fn upsert(&mut self, entry: IndexEntry) -> Option<String> {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.key == entry.key) {
            let old = (existing.filename != entry.filename).then(|| existing.filename.clone());
            *existing = entry;
            return old;
        }
        self.entries.push(entry);
        None
    }

    /// Remove the record for a key, returning it if present.
    pub fn remove(&mut self, key: &str) -> Option<IndexEntry> {
        let pos = self.entries.iter().position(|e| e.key == key)?;
        Some(self.entries.remove(pos))
    }

    /// All records in insertion order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Parse `key:filename:digest` where the key may contain colons.
fn parse_line(line: &str) -> DevkitResult<IndexEntry> {
    let mut parts = line.rsplitn(3, ':');
    let digest = parts.next();
    let filename = parts.next();
    let key = parts.next();

    match (key, filename, digest) {
        (Some(key), Some(filename), Some(digest))
            if !key.is_empty() && !filename.is_empty() && !digest.is_empty() =>
        {
            Ok(IndexEntry {
                key: key.to_string(),
                filename: filename.to_string(),
                digest: digest.to_string(),
            })
        }
        _ => Err(DevkitError::CacheIndexParse {
            line: line.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_line_with_colon_in_key() {
        let entry = parse_line("node:nodesource.gpg:nodesource.gpg:abc123").unwrap();
        assert_eq!(entry.key, "node:nodesource.gpg");
        assert_eq!(entry.filename, "nodesource.gpg");
        assert_eq!(entry.digest, "abc123");
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(parse_line("no-separators").is_err());
        assert!(parse_line("only:one").is_err());
        assert!(parse_line("empty:field:").is_err());
    }

    #[test]
    fn roundtrip_preserves_order() {
        let content = "a:f1:d1\nb:f2:d2\n";
        let index = CacheIndex::parse(content).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.to_contents(), content);
    }

    #[test]
    fn parse_skips_blank_lines() {
        let index = CacheIndex::parse("a:f1:d1\n\n  \nb:f2:d2\n").unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn upsert_replaces_existing_key() {
        let mut index = CacheIndex::parse("k:old.gpg:d1\n").unwrap();
        let replaced = index.upsert(IndexEntry {
            key: "k".to_string(),
            filename: "new.gpg".to_string(),
            digest: "d2".to_string(),
        });
        assert_eq!(replaced.as_deref(), Some("old.gpg"));
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("k").unwrap().digest, "d2");
    }

    #[test]
    fn upsert_same_filename_returns_none() {
        let mut index = CacheIndex::parse("k:f.gpg:d1\n").unwrap();
        let replaced = index.upsert(IndexEntry {
            key: "k".to_string(),
            filename: "f.gpg".to_string(),
            digest: "d2".to_string(),
        });
        assert!(replaced.is_none());
    }

    #[test]
    fn remove_missing_returns_none() {
        let mut index = CacheIndex::default();
        assert!(index.remove("ghost").is_none());
    }
}
