//! Request-scoped schedule operations over a [`DocumentStore`].

use chrono::{Datelike, Timelike};
use schedule_core::{
    CurrentLesson, Lesson, LessonId, LessonQuery, NewLesson, Result, ScheduleDocument, TimeSlot,
};
use tokio::sync::Mutex;

use crate::store::DocumentStore;

/// Lessons matching a query plus the document's reference lists.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonListing {
    /// Matching lessons in document order.
    pub lessons: Vec<Lesson>,
    /// All registered groups.
    pub groups: Vec<String>,
    /// All weekday names.
    pub days: Vec<String>,
    /// All time slots.
    pub time_slots: Vec<TimeSlot>,
}

impl LessonListing {
    /// Number of matching lessons.
    #[must_use]
    pub fn total(&self) -> usize {
        self.lessons.len()
    }
}

/// The schedule service.
///
/// Every call reloads the whole document from the store; nothing is cached.
/// Mutations hold a writer lock for the full load, modify and save cycle so
/// that two requests in this process cannot overwrite each other's changes.
pub struct Schedule {
    store: Box<dyn DocumentStore>,
    writer: Mutex<()>,
}

impl Schedule {
    /// Creates a schedule over `store`.
    pub fn new(store: impl DocumentStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            writer: Mutex::new(()),
        }
    }

    /// Loads the full document.
    pub async fn document(&self) -> ScheduleDocument {
        self.store.load().await
    }

    /// Returns the lessons matching `query` with the reference lists.
    pub async fn find(&self, query: &LessonQuery) -> LessonListing {
        let document = self.store.load().await;
        let lessons = document.query(query).into_iter().cloned().collect();

        LessonListing {
            lessons,
            groups: document.groups,
            days: document.days,
            time_slots: document.time_slots,
        }
    }

    /// Creates a lesson and persists the document.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the document cannot be saved. The lesson
    /// is not kept in that case.
    pub async fn add_lesson(&self, new: NewLesson) -> Result<Lesson> {
        let _guard = self.writer.lock().await;

        let mut document = self.store.load().await;
        let lesson = document.add_lesson(new);
        self.store.save(&document).await?;

        tracing::info!(
            id = lesson.id,
            group = %lesson.group,
            day = %lesson.day,
            time_slot = lesson.time_slot,
            "Lesson added"
        );
        Ok(lesson)
    }

    /// Deletes a lesson and persists the document.
    ///
    /// # Errors
    ///
    /// Returns [`schedule_core::Error::LessonNotFound`] if no lesson has
    /// `id` (nothing is written), or the store's error if saving fails.
    pub async fn remove_lesson(&self, id: LessonId) -> Result<Lesson> {
        let _guard = self.writer.lock().await;

        let mut document = self.store.load().await;
        let removed = document.remove_lesson(id)?;
        self.store.save(&document).await?;

        tracing::info!(id, group = %removed.group, "Lesson removed");
        Ok(removed)
    }

    /// Returns the lesson considered current at `now`.
    pub async fn current_lesson<T>(&self, now: &T) -> Option<CurrentLesson>
    where
        T: Datelike + Timelike + Sync,
    {
        let document = self.store.load().await;
        schedule_core::current_lesson(&document, now)
    }

    /// Overwrites the stored document with the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns the store's error if saving fails.
    pub async fn reset(&self) -> Result<ScheduleDocument> {
        let _guard = self.writer.lock().await;

        let document = ScheduleDocument::seed();
        self.store.save(&document).await?;
        tracing::info!(location = %self.store.location(), "Schedule reset to defaults");
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;
    use crate::store::{InMemoryStore, JsonFileStore};
    use chrono::NaiveDate;
    use schedule_core::Error;

    #[tokio::test]
    async fn test_find_with_filters() {
        let schedule = Schedule::new(InMemoryStore::new());

        let listing = schedule
            .find(&LessonQuery::new().with_day("Понедельник"))
            .await;
        assert_eq!(listing.total(), 2);
        assert_eq!(listing.groups.len(), 5);
        assert_eq!(listing.days.len(), 6);
        assert_eq!(listing.time_slots.len(), 6);

        let none = schedule.find(&LessonQuery::new().with_group("ИСП-999")).await;
        assert_eq!(none.total(), 0);
    }

    #[tokio::test]
    async fn test_add_lesson_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule_data.json");
        let schedule = Schedule::new(JsonFileStore::new(&path));

        let lesson = schedule
            .add_lesson(
                NewLesson::new()
                    .with_group("ИСП-401")
                    .with_day("Понедельник")
                    .with_time_slot(2)
                    .with_subject("Физика")
                    .with_teacher("Смирнов")
                    .with_room("101"),
            )
            .await
            .unwrap();
        assert_eq!(lesson.id, 4);

        // A fresh service over the same file sees the change.
        let reopened = Schedule::new(JsonFileStore::new(&path));
        let doc = reopened.document().await;
        assert_eq!(doc.lessons.len(), 4);
        assert_eq!(doc.groups, ScheduleDocument::seed().groups);
    }

    #[tokio::test]
    async fn test_add_lesson_save_failure() {
        let store = InMemoryStore::new();
        store.fail_saves(true);
        let schedule = Schedule::new(store);

        let err = schedule.add_lesson(NewLesson::new()).await.unwrap_err();
        assert!(!err.is_client_error());
        assert_eq!(schedule.document().await.lessons.len(), 3);
    }

    #[tokio::test]
    async fn test_remove_missing_lesson_writes_nothing() {
        let schedule = Schedule::new(InMemoryStore::new());

        let err = schedule.remove_lesson(999).await.unwrap_err();
        assert!(matches!(err, Error::LessonNotFound { id: 999 }));
        assert_eq!(schedule.document().await.lessons.len(), 3);
    }

    #[tokio::test]
    async fn test_remove_lesson_save_failure() {
        let store = InMemoryStore::new();
        store.fail_saves(true);
        let schedule = Schedule::new(store);

        let err = schedule.remove_lesson(2).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_client_error());
        assert!(schedule.document().await.lesson(2).is_some());
    }

    #[tokio::test]
    async fn test_add_keeps_lessons_with_loose_stored_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule_data.json");
        let mut raw = serde_json::to_value(ScheduleDocument::empty()).unwrap();
        raw["groups"] = serde_json::json!(["A"]);
        raw["lessons"] = serde_json::json!([
            { "id": 10, "group": "A", "day": "Среда", "time_slot": 1, "room": "1", "type": "лекция" },
            { "id": 11, "group": "A", "day": "Среда", "time_slot": 2, "room": 101, "type": null }
        ]);
        std::fs::write(&path, raw.to_string()).unwrap();

        let schedule = Schedule::new(JsonFileStore::new(&path));
        let lesson = schedule
            .add_lesson(NewLesson::new().with_group("A").with_subject("Сети"))
            .await
            .unwrap();
        assert_eq!(lesson.id, 12);

        let doc = Schedule::new(JsonFileStore::new(&path)).document().await;
        assert_eq!(
            doc.lessons.iter().map(|l| l.id).collect::<Vec<_>>(),
            vec![10, 11, 12]
        );
        assert_eq!(doc.groups, vec!["A".to_string()]);
        assert_eq!(doc.lessons[1].room, "101");
    }

    #[tokio::test]
    async fn test_remove_lesson() {
        let schedule = Schedule::new(InMemoryStore::new());

        let removed = schedule.remove_lesson(2).await.unwrap();
        assert_eq!(removed.subject, "Базы данных");

        let doc = schedule.document().await;
        assert_eq!(doc.lessons.iter().map(|l| l.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let schedule = Arc::new(Schedule::new(JsonFileStore::new(
            dir.path().join("schedule_data.json"),
        )));

        let mut handles = Vec::new();
        for n in 0..8 {
            let schedule = Arc::clone(&schedule);
            handles.push(tokio::spawn(async move {
                schedule
                    .add_lesson(NewLesson::new().with_subject(format!("Предмет {n}")))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let doc = schedule.document().await;
        assert_eq!(doc.lessons.len(), 11);
        let ids: HashSet<_> = doc.lessons.iter().map(|l| l.id).collect();
        assert_eq!(ids.len(), 11);
    }

    #[tokio::test]
    async fn test_current_lesson_and_reset() {
        let schedule = Schedule::new(InMemoryStore::with_document(&ScheduleDocument::empty()).unwrap());
        let monday = NaiveDate::from_ymd_opt(2024, 9, 2)
            .and_then(|d| d.and_hms_opt(10, 30, 0))
            .unwrap();

        assert!(schedule.current_lesson(&monday).await.is_none());

        schedule.reset().await.unwrap();
        let current = schedule.current_lesson(&monday).await.unwrap();
        assert_eq!(current.lesson.id, 1);
        assert_eq!(current.current_time, "10:30");
    }
}
