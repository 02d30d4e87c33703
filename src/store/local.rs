//! Filesystem-backed object store
//!
//! Maps object keys onto paths below a root directory, with `/` as the key
//! separator and directories playing the role of prefixes.

use bytes::Bytes;
use log::debug;
use std::path::{Component, Path, PathBuf};

use super::errors::{StoreError, StoreResult};
use super::types::{ListPage, ListRequest, ObjectEntry};
use super::{Listed, ObjectStore, paginate, roll_up};

const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    page_size: usize,
}

impl LocalObjectStore {
    /// Open a store rooted at `root`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if `root` is not an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::Config(format!(
                "store root {} is not a directory",
                root.display()
            )));
        }
        Ok(Self {
            root,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to a path, refusing anything that escapes the root
    fn resolve(&self, key: &str) -> StoreResult<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(StoreError::Permanent(format!("key '{key}' escapes store root")));
        }
        Ok(self.root.join(relative))
    }

    /// Directory that contains every key starting with `prefix`
    fn prefix_dir(&self, prefix: &str) -> StoreResult<(PathBuf, String)> {
        match prefix.rfind('/') {
            Some(idx) => Ok((self.resolve(&prefix[..idx])?, prefix[..=idx].to_string())),
            None => Ok((self.root.clone(), String::new())),
        }
    }

    /// Files and child directories directly inside `dir`
    ///
    /// Keys are `key_base` plus the entry name; directory keys end with `/`.
    /// A missing directory reads as empty.
    async fn read_level(&self, dir: &Path, key_base: &str) -> StoreResult<Level> {
        let mut level = Level::default();
        let mut reader = match tokio::fs::read_dir(dir).await {
            Ok(reader) => reader,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(level),
            Err(e) => return Err(StoreError::from_io(key_base, &e)),
        };

        while let Some(dirent) = reader
            .next_entry()
            .await
            .map_err(|e| StoreError::from_io(key_base, &e))?
        {
            let name = dirent.file_name().to_string_lossy().into_owned();
            let key = format!("{key_base}{name}");
            let file_type = dirent
                .file_type()
                .await
                .map_err(|e| StoreError::from_io(&key, &e))?;

            if file_type.is_dir() {
                level.dirs.push((dirent.path(), format!("{key}/")));
            } else if file_type.is_file() {
                let size = dirent
                    .metadata()
                    .await
                    .map_err(|e| StoreError::from_io(&key, &e))?
                    .len();
                level.files.push(ObjectEntry { key, size });
            }
        }

        Ok(level)
    }

    /// Every file key below `start`, sorted
    async fn walk(&self, start: PathBuf, key_base: String) -> StoreResult<Vec<ObjectEntry>> {
        let mut found = Vec::new();
        let mut pending = vec![(start, key_base)];

        while let Some((dir, base)) = pending.pop() {
            let level = self.read_level(&dir, &base).await?;
            found.extend(level.files);
            pending.extend(level.dirs);
        }

        found.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(found)
    }

    /// Rows for an undelimited listing, or one with a delimiter other than `/`
    async fn rows_from_walk(&self, request: &ListRequest) -> StoreResult<Vec<Listed>> {
        let (dir, key_base) = self.prefix_dir(&request.prefix)?;
        let files = self.walk(dir, key_base).await?;

        let mut rows = Vec::new();
        for entry in files {
            if !entry.key.starts_with(&request.prefix) {
                continue;
            }
            match roll_up(&entry.key, &request.prefix, request.delimiter.as_deref()) {
                Some(sub_prefix) => {
                    let duplicate = matches!(rows.last(), Some(Listed::Prefix(p)) if *p == sub_prefix);
                    if !duplicate {
                        rows.push(Listed::Prefix(sub_prefix));
                    }
                }
                None => rows.push(Listed::Entry(entry)),
            }
        }
        Ok(rows)
    }

    /// Rows for a `/`-delimited listing: one directory read, no descent
    ///
    /// Every child directory becomes a sub-prefix, including empty ones.
    async fn rows_from_level(&self, prefix: &str) -> StoreResult<Vec<Listed>> {
        let (dir, key_base) = self.prefix_dir(prefix)?;
        let level = self.read_level(&dir, &key_base).await?;

        let mut rows: Vec<(String, Listed)> = level
            .files
            .into_iter()
            .filter(|entry| entry.key.starts_with(prefix))
            .map(|entry| (entry.key.clone(), Listed::Entry(entry)))
            .chain(
                level
                    .dirs
                    .into_iter()
                    .filter(|(_, key)| key.starts_with(prefix))
                    .map(|(_, key)| (key.clone(), Listed::Prefix(key))),
            )
            .collect();

        rows.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }
}

#[derive(Default)]
struct Level {
    files: Vec<ObjectEntry>,
    /// Path and `/`-terminated key of each child directory
    dirs: Vec<(PathBuf, String)>,
}

impl ObjectStore for LocalObjectStore {
    async fn list(&self, request: ListRequest) -> StoreResult<ListPage> {
        let rows = match request.delimiter.as_deref() {
            Some("/") => self.rows_from_level(&request.prefix).await?,
            _ => self.rows_from_walk(&request).await?,
        };

        debug!(
            "Listed {} rows under '{}' in {}",
            rows.len(),
            request.prefix,
            self.root.display()
        );

        paginate(rows, request.continuation_token.as_deref(), self.page_size)
    }

    async fn get_object(&self, key: &str) -> StoreResult<Bytes> {
        let path = self.resolve(key)?;
        tokio::fs::read(&path)
            .await
            .map(Bytes::from)
            .map_err(|e| StoreError::from_io(key, &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree() -> (TempDir, LocalObjectStore) {
        let dir = TempDir::new().unwrap();
        let season = dir.path().join("friends/season-1/extras");
        std::fs::create_dir_all(&season).unwrap();
        std::fs::write(dir.path().join("friends/pilot.srt"), "a").unwrap();
        std::fs::write(dir.path().join("friends/season-1/e01.srt"), "b").unwrap();
        std::fs::write(season.join("blooper.srt"), "c").unwrap();
        std::fs::create_dir_all(dir.path().join("joey")).unwrap();
        let store = LocalObjectStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn keys(page: &ListPage) -> Vec<&str> {
        page.entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[tokio::test]
    async fn delimited_list_stays_on_one_level() {
        let (_dir, store) = tree();

        let page = store.list(ListRequest::delimited("friends/", "/")).await.unwrap();

        assert_eq!(keys(&page), vec!["friends/pilot.srt"]);
        assert_eq!(page.sub_prefixes, vec!["friends/season-1/".to_string()]);
        assert!(page.next_token.is_none());
    }

    #[tokio::test]
    async fn delimited_list_honours_partial_prefix() {
        let (_dir, store) = tree();

        let page = store.list(ListRequest::delimited("friends/se", "/")).await.unwrap();

        assert!(page.entries.is_empty());
        assert_eq!(page.sub_prefixes, vec!["friends/season-1/".to_string()]);
    }

    #[tokio::test]
    async fn root_level_lists_child_directories() {
        let (_dir, store) = tree();
        let store = store.with_page_size(1);

        let first = store.list(ListRequest::delimited("", "/")).await.unwrap();
        assert_eq!(first.sub_prefixes, vec!["friends/".to_string()]);

        let second = store
            .list(ListRequest::delimited("", "/").with_token(first.next_token))
            .await
            .unwrap();
        assert_eq!(second.sub_prefixes, vec!["joey/".to_string()]);
        assert!(second.next_token.is_none());
    }

    #[tokio::test]
    async fn flat_list_walks_the_whole_subtree() {
        let (_dir, store) = tree();

        let page = store.list(ListRequest::flat("friends/")).await.unwrap();

        assert_eq!(
            keys(&page),
            vec![
                "friends/pilot.srt",
                "friends/season-1/e01.srt",
                "friends/season-1/extras/blooper.srt",
            ]
        );
        assert!(page.sub_prefixes.is_empty());
    }

    #[tokio::test]
    async fn escaping_key_is_rejected() {
        let (_dir, store) = tree();
        let err = store.get_object("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, StoreError::Permanent(_)));
    }
}
