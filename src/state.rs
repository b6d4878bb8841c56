//! Seen-ID persistence for the dedup-file variant.
//!
//! The state is a flat text file, one entry identifier per line. It is read
//! whole at startup and rewritten whole at the end of the run. A missing
//! file means a first run and yields an empty set.

use std::collections::HashSet;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// The persisted set of already-posted entry identifiers.
#[derive(Debug)]
pub struct SeenFile {
    path: PathBuf,
    ids: HashSet<String>,
}

impl SeenFile {
    /// An empty set bound to `path`, without touching the filesystem.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ids: HashSet::new(),
        }
    }

    /// Load the set from `path`. A missing file is an empty set.
    ///
    /// # Errors
    ///
    /// Returns an error for any I/O failure other than the file not
    /// existing (e.g. permission denied), so a real problem is not silently
    /// treated as "first run".
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        let ids = match fs::read_to_string(path).await {
            Ok(contents) => contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Seen file not found; starting with an empty set");
                HashSet::new()
            }
            Err(e) => return Err(e.into()),
        };
        info!(count = ids.len(), "Loaded seen IDs");
        Ok(Self {
            path: path.to_path_buf(),
            ids,
        })
    }

    /// Whether `id` has already been posted.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Record `id` as posted. Returns `false` if it was already present.
    pub fn insert(&mut self, id: String) -> bool {
        self.ids.insert(id)
    }

    /// Number of identifiers in the set.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Rewrite the whole file, one identifier per line.
    ///
    /// Lines are sorted so consecutive runs produce stable diffs. The parent
    /// directory is created if needed. The contents go to a sibling temp
    /// file first and are renamed over the target, so a crash mid-write
    /// cannot leave a truncated set behind.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn save(&self) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let mut lines: Vec<&str> = self.ids.iter().map(String::as_str).collect();
        lines.sort_unstable();
        let mut contents = lines.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }

        let mut tmp_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "seen".into());
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, contents).await?;
        fs::rename(&tmp_path, &self.path).await?;
        info!(count = self.ids.len(), "Saved seen IDs");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_missing_file_yields_empty_set() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.txt");

        let seen = SeenFile::load(&path).await.unwrap();
        assert_eq!(seen.len(), 0);
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.txt");

        let mut seen = SeenFile::empty(&path);
        assert!(seen.insert("feed::id::b".to_string()));
        assert!(seen.insert("feed::id::a".to_string()));
        assert!(!seen.insert("feed::id::a".to_string()));
        seen.save().await.unwrap();

        let reloaded = SeenFile::load(&path).await.unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("feed::id::a"));
        assert!(reloaded.contains("feed::id::b"));
    }

    #[tokio::test]
    async fn test_save_writes_sorted_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.txt");

        let mut seen = SeenFile::empty(&path);
        seen.insert("z".to_string());
        seen.insert("a".to_string());
        seen.save().await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "a\nz\n");
    }

    #[tokio::test]
    async fn test_save_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/state/seen.txt");

        let mut seen = SeenFile::empty(&path);
        seen.insert("only".to_string());
        seen.save().await.unwrap();

        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_save_replaces_existing_file_without_leftover_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.txt");
        std::fs::write(&path, "stale\n").unwrap();

        let mut seen = SeenFile::empty(&path);
        seen.insert("fresh".to_string());
        seen.save().await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
        assert!(!dir.path().join("seen.txt.tmp").exists());
    }

    #[tokio::test]
    async fn test_load_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.txt");
        std::fs::write(&path, "one\n\n  \ntwo\n").unwrap();

        let seen = SeenFile::load(&path).await.unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.contains("one"));
        assert!(seen.contains("two"));
    }
}
