//! Reader sources: in-memory and JSON snapshot file.

use affinity_types::{ReaderId, ReaderRecord, ReaderSource, ReaderSourceError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory reader source; readers keyed by id. Cheap to clone (shared state).
#[derive(Clone, Default)]
pub struct InMemoryReaderSource {
    readers: Arc<RwLock<HashMap<ReaderId, ReaderRecord>>>,
}

impl InMemoryReaderSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn from_readers(readers: impl IntoIterator<Item = ReaderRecord>) -> Self {
        let source = Self::new();
        for r in readers {
            source.upsert(r).await;
        }
        source
    }

    /// Insert or replace a reader by id.
    pub async fn upsert(&self, reader: ReaderRecord) {
        self.readers.write().await.insert(reader.id.clone(), reader);
    }

    pub async fn remove(&self, id: &str) -> Option<ReaderRecord> {
        self.readers.write().await.remove(id)
    }

    /// Declare a friendship on `from`'s record. Returns false when `from` is unknown.
    pub async fn befriend(&self, from: &str, to: &str) -> bool {
        let mut guard = self.readers.write().await;
        match guard.get_mut(from) {
            Some(reader) => {
                if !reader.connections.iter().any(|c| c == to) {
                    reader.connections.push(to.to_string());
                }
                true
            }
            None => false,
        }
    }

    /// Drop a declared friendship from both records.
    pub async fn unfriend(&self, a: &str, b: &str) {
        let mut guard = self.readers.write().await;
        if let Some(reader) = guard.get_mut(a) {
            reader.connections.retain(|c| c != b);
        }
        if let Some(reader) = guard.get_mut(b) {
            reader.connections.retain(|c| c != a);
        }
    }
}

#[async_trait::async_trait]
impl ReaderSource for InMemoryReaderSource {
    async fn load_readers(&self) -> Result<Vec<ReaderRecord>, ReaderSourceError> {
        let guard = self.readers.read().await;
        let mut out: Vec<ReaderRecord> = guard.values().cloned().collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(out)
    }

    async fn get_reader(&self, id: &str) -> Result<Option<ReaderRecord>, ReaderSourceError> {
        Ok(self.readers.read().await.get(id).cloned())
    }
}

/// Reader source backed by a JSON file holding an array of reader records.
/// The file is re-read on every load so a refresh picks up external edits.
pub struct JsonFileReaderSource {
    path: PathBuf,
}

impl JsonFileReaderSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl ReaderSource for JsonFileReaderSource {
    async fn load_readers(&self) -> Result<Vec<ReaderRecord>, ReaderSourceError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %self.path.display(),
                    "reader snapshot not found, treating as empty"
                );
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn get_reader(&self, id: &str) -> Result<Option<ReaderRecord>, ReaderSourceError> {
        Ok(self.load_readers().await?.into_iter().find(|r| r.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_befriend_and_unfriend() {
        let source = InMemoryReaderSource::from_readers([
            ReaderRecord::with_id("a", "ana"),
            ReaderRecord::with_id("b", "ben"),
        ])
        .await;
        assert!(source.befriend("a", "b").await);
        assert!(source.befriend("a", "b").await);
        assert!(!source.befriend("zz", "a").await);

        let a = source.get_reader("a").await.unwrap().unwrap();
        assert_eq!(a.connections, vec!["b".to_string()]);

        source.unfriend("b", "a").await;
        let a = source.get_reader("a").await.unwrap().unwrap();
        assert!(a.connections.is_empty());
    }

    #[tokio::test]
    async fn in_memory_load_is_sorted() {
        let source = InMemoryReaderSource::from_readers([
            ReaderRecord::with_id("c", "cat"),
            ReaderRecord::with_id("a", "ana"),
        ])
        .await;
        let ids: Vec<String> = source
            .load_readers()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(source.remove("a").await.is_some());
        assert!(source.get_reader("a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn json_file_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileReaderSource::new(dir.path().join("absent.json"));
        assert!(source.load_readers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn json_file_bad_content_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readers.json");
        tokio::fs::write(&path, "{not json").await.unwrap();
        let source = JsonFileReaderSource::new(&path);
        assert!(matches!(
            source.load_readers().await,
            Err(ReaderSourceError::Parse(_))
        ));
    }
}
