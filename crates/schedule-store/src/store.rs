//! Document storage backends.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use schedule_core::{Result, ScheduleDocument};

/// Trait for whole-document storage backends.
///
/// Backends never merge or patch: a read returns the full document and a
/// write replaces it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads and parses the stored document.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    async fn read(&self) -> Result<Option<ScheduleDocument>>;

    /// Replaces the stored document.
    async fn save(&self, document: &ScheduleDocument) -> Result<()>;

    /// Short description of where the document lives, for logs.
    fn location(&self) -> String;

    /// Loads the document, falling back to [`ScheduleDocument::seed`].
    ///
    /// Read and parse failures are logged and never reach the caller.
    async fn load(&self) -> ScheduleDocument {
        match self.read().await {
            Ok(Some(document)) => document,
            Ok(None) => {
                tracing::debug!(location = %self.location(), "No stored schedule, using defaults");
                ScheduleDocument::seed()
            },
            Err(e) => {
                tracing::warn!(
                    location = %self.location(),
                    error = %e,
                    "Failed to load schedule, using defaults"
                );
                ScheduleDocument::seed()
            },
        }
    }
}

/// Store backed by a single pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store for the file at `path`. Nothing is touched on disk yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns `true` if the backing file exists.
    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    async fn write(&self, document: &ScheduleDocument) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let text = serde_json::to_string_pretty(document)?;
        tokio::fs::write(&self.path, text).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn read(&self) -> Result<Option<ScheduleDocument>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let document = serde_json::from_str(&text)?;
        Ok(Some(document))
    }

    async fn save(&self, document: &ScheduleDocument) -> Result<()> {
        let result = self.write(document).await;

        match &result {
            Ok(()) => tracing::debug!(
                path = %self.path.display(),
                lessons = document.lessons.len(),
                "Schedule saved"
            ),
            Err(e) => tracing::error!(
                path = %self.path.display(),
                error = %e,
                "Failed to save schedule"
            ),
        }
        result
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory store (for development/testing).
///
/// Holds the serialised text rather than the parsed document so that corrupt
/// contents can be simulated.
pub struct InMemoryStore {
    contents: parking_lot::RwLock<Option<String>>,
    fail_saves: AtomicBool,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            contents: parking_lot::RwLock::new(None),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Creates a store holding `document`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialised.
    pub fn with_document(document: &ScheduleDocument) -> Result<Self> {
        let store = Self::new();
        *store.contents.write() = Some(serde_json::to_string_pretty(document)?);
        Ok(store)
    }

    /// Creates a store holding arbitrary text.
    #[must_use]
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let store = Self::new();
        *store.contents.write() = Some(contents.into());
        store
    }

    /// Makes every following save fail (or succeed again).
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn read(&self) -> Result<Option<ScheduleDocument>> {
        let contents = self.contents.read();
        match contents.as_deref() {
            Some(text) => Ok(Some(serde_json::from_str(text)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, document: &ScheduleDocument) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            let err = io::Error::new(io::ErrorKind::PermissionDenied, "store is read-only");
            tracing::error!(error = %err, "Failed to save schedule");
            return Err(err.into());
        }

        let text = serde_json::to_string_pretty(document)?;
        *self.contents.write() = Some(text);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedule_core::NewLesson;

    #[tokio::test]
    async fn test_missing_file_loads_seed() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("schedule_data.json"));

        assert!(!store.exists().await);
        assert!(store.read().await.unwrap().is_none());

        let doc = store.load().await;
        assert_eq!(doc.groups.len(), 5);
        assert_eq!(doc.days.len(), 6);
        assert_eq!(doc.time_slots.len(), 6);
        assert_eq!(doc.lessons.len(), 3);
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule_data.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.read().await.is_err());
        assert_eq!(store.load().await, ScheduleDocument::seed());
    }

    #[tokio::test]
    async fn test_loose_stored_values_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule_data.json");
        let mut raw = serde_json::to_value(ScheduleDocument::empty()).unwrap();
        raw["groups"] = serde_json::json!(["A"]);
        raw["lessons"] = serde_json::json!([
            { "id": 10, "group": "A", "day": "Среда", "time_slot": 1, "room": "1", "type": "лекция" },
            { "id": 11, "group": "A", "day": "Среда", "time_slot": "2", "room": 101, "type": null }
        ]);
        std::fs::write(&path, raw.to_string()).unwrap();

        let store = JsonFileStore::new(&path);
        let doc = store.read().await.unwrap().unwrap();
        assert_eq!(doc.groups, vec!["A".to_string()]);
        assert_eq!(doc.lessons.len(), 2);
        assert_eq!(doc.lessons[1].room, "101");
        assert_eq!(doc.lessons[1].kind, "");
        assert_eq!(doc.lessons[1].time_slot, 2);
    }

    #[tokio::test]
    async fn test_save_creates_parent_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data").join("schedule_data.json"));

        let mut doc = ScheduleDocument::seed();
        doc.add_lesson(NewLesson::new().with_group("ПРОГ-402").with_subject("Сети"));
        store.save(&doc).await.unwrap();

        let loaded = store.load().await;
        assert_eq!(loaded, doc);

        store.save(&loaded).await.unwrap();
        assert_eq!(store.load().await, doc);
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule_data.json");
        let store = JsonFileStore::new(&path);

        store.save(&ScheduleDocument::seed()).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"groups\": ["));
        assert!(text.contains("Понедельник"));
    }

    #[tokio::test]
    async fn test_save_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in place of the file makes the write fail.
        let store = JsonFileStore::new(dir.path());

        assert!(store.save(&ScheduleDocument::seed()).await.is_err());
    }

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryStore::new();
        assert_eq!(store.load().await.lessons.len(), 3);

        let mut doc = ScheduleDocument::empty();
        doc.add_lesson(NewLesson::new());
        store.save(&doc).await.unwrap();
        assert_eq!(store.load().await.lessons.len(), 1);

        store.fail_saves(true);
        assert!(store.save(&ScheduleDocument::seed()).await.is_err());
        assert_eq!(store.load().await.lessons.len(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_corrupt_contents() {
        let store = InMemoryStore::with_contents("[]");
        assert_eq!(store.load().await, ScheduleDocument::seed());
    }
}
