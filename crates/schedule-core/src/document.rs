//! The persisted schedule document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::query::LessonQuery;
use crate::types::{Lesson, LessonId, NewLesson, TimeSlot};

/// Label shown for a lesson whose time slot is not in the document.
pub const UNKNOWN_TIME_SLOT: &str = "Не указано";

/// Root object holding all groups, days, time slots and lessons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    /// Group names in registration order.
    pub groups: Vec<String>,
    /// Weekday names.
    pub days: Vec<String>,
    /// Periods of the day.
    pub time_slots: Vec<TimeSlot>,
    /// Scheduled lessons in insertion order.
    pub lessons: Vec<Lesson>,
    /// Top-level keys written by other tools, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ScheduleDocument {
    fn default() -> Self {
        Self::seed()
    }
}

impl ScheduleDocument {
    /// Creates a document with no groups, days, slots or lessons.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            groups: Vec::new(),
            days: Vec::new(),
            time_slots: Vec::new(),
            lessons: Vec::new(),
            extra: Map::new(),
        }
    }

    /// The built-in document served when no data file can be read.
    #[must_use]
    pub fn seed() -> Self {
        let strings = |items: &[&str]| -> Vec<String> {
            items.iter().map(|s| (*s).to_string()).collect()
        };

        let lesson = |id: LessonId,
                      day: &str,
                      time_slot: i64,
                      subject: &str,
                      teacher: &str,
                      room: &str,
                      kind: &str| {
            Lesson {
                id,
                group: "ИСП-401".to_string(),
                day: day.to_string(),
                time_slot,
                subject: subject.to_string(),
                teacher: teacher.to_string(),
                room: room.to_string(),
                kind: kind.to_string(),
                extra: Map::new(),
            }
        };

        Self {
            groups: strings(&["ИСП-401", "ИСП-402", "ИСП-403", "ПРОГ-401", "ПРОГ-402"]),
            days: strings(&[
                "Понедельник",
                "Вторник",
                "Среда",
                "Четверг",
                "Пятница",
                "Суббота",
            ]),
            time_slots: vec![
                TimeSlot::new(1, "8:30 - 10:00"),
                TimeSlot::new(2, "10:10 - 11:40"),
                TimeSlot::new(3, "12:00 - 13:30"),
                TimeSlot::new(4, "13:40 - 15:10"),
                TimeSlot::new(5, "15:20 - 16:50"),
                TimeSlot::new(6, "17:00 - 18:30"),
            ],
            lessons: vec![
                lesson(1, "Понедельник", 1, "Программирование", "Иванова А.П.", "401", "лекция"),
                lesson(2, "Понедельник", 2, "Базы данных", "Петров С.И.", "302", "практика"),
                lesson(3, "Вторник", 1, "Веб-разработка", "Сидорова М.К.", "405", "лабораторная"),
            ],
            extra: Map::new(),
        }
    }

    /// Returns the id the next created lesson receives.
    ///
    /// Ids are never reused: this is one past the current maximum, or 1.
    #[must_use]
    pub fn next_lesson_id(&self) -> LessonId {
        self.lessons.iter().map(|l| l.id).max().unwrap_or(0) + 1
    }

    /// Appends a lesson built from `new` and registers its group.
    ///
    /// Returns a copy of the stored lesson.
    pub fn add_lesson(&mut self, new: NewLesson) -> Lesson {
        let lesson = Lesson::from_new(self.next_lesson_id(), new);

        if !self.groups.contains(&lesson.group) {
            tracing::debug!(group = %lesson.group, "Registering new group");
            self.groups.push(lesson.group.clone());
        }
        self.lessons.push(lesson.clone());
        lesson
    }

    /// Removes the first lesson with `id`.
    ///
    /// Groups are left untouched even if no lesson references them anymore.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LessonNotFound`] if no lesson has that id.
    pub fn remove_lesson(&mut self, id: LessonId) -> Result<Lesson> {
        let index = self
            .lessons
            .iter()
            .position(|l| l.id == id)
            .ok_or(Error::LessonNotFound { id })?;
        Ok(self.lessons.remove(index))
    }

    /// Looks up a lesson by id.
    #[must_use]
    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == id)
    }

    /// Returns the lessons matching `query` in document order.
    #[must_use]
    pub fn query(&self, query: &LessonQuery) -> Vec<&Lesson> {
        query.filter(&self.lessons)
    }

    /// Returns the time text of a slot, or [`UNKNOWN_TIME_SLOT`].
    #[must_use]
    pub fn time_slot_label(&self, id: i64) -> &str {
        self.time_slots
            .iter()
            .find(|slot| slot.id == id)
            .map_or(UNKNOWN_TIME_SLOT, |slot| slot.time.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seed_shape() {
        let doc = ScheduleDocument::seed();

        assert_eq!(doc.groups.len(), 5);
        assert_eq!(doc.days.len(), 6);
        assert_eq!(doc.time_slots.len(), 6);
        assert_eq!(doc.lessons.len(), 3);
        assert_eq!(doc, ScheduleDocument::default());
    }

    #[test]
    fn test_next_id_on_empty_document() {
        let mut doc = ScheduleDocument::empty();
        assert_eq!(doc.next_lesson_id(), 1);

        let lesson = doc.add_lesson(NewLesson::new().with_group("ИСП-403"));
        assert_eq!(lesson.id, 1);
    }

    #[test]
    fn test_next_id_follows_maximum_not_length() {
        let mut doc = ScheduleDocument::seed();
        doc.remove_lesson(2).unwrap();

        let lesson = doc.add_lesson(NewLesson::new());
        assert_eq!(lesson.id, 4);
    }

    #[test]
    fn test_add_lesson_registers_new_group_once() {
        let mut doc = ScheduleDocument::seed();

        doc.add_lesson(NewLesson::new().with_group("ИСП-501"));
        doc.add_lesson(NewLesson::new().with_group("ИСП-501"));

        let count = doc.groups.iter().filter(|g| *g == "ИСП-501").count();
        assert_eq!(count, 1);
        assert_eq!(doc.groups.last().map(String::as_str), Some("ИСП-501"));
        assert_eq!(doc.groups.len(), 6);
    }

    #[test]
    fn test_add_lesson_existing_group_not_duplicated() {
        let mut doc = ScheduleDocument::seed();

        let lesson = doc.add_lesson(
            NewLesson::new()
                .with_group("ИСП-401")
                .with_day("Понедельник")
                .with_time_slot(2)
                .with_subject("Физика")
                .with_teacher("Смирнов")
                .with_room("101")
                .with_kind("лекция"),
        );

        assert_eq!(lesson.id, 4);
        assert_eq!(doc.lessons.len(), 4);
        assert_eq!(doc.groups, ScheduleDocument::seed().groups);
    }

    #[test]
    fn test_remove_missing_lesson() {
        let mut doc = ScheduleDocument::seed();

        let err = doc.remove_lesson(999).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(doc.lessons.len(), 3);
    }

    #[test]
    fn test_remove_takes_exactly_one() {
        let mut doc = ScheduleDocument::seed();
        let mut duplicate = doc.lessons[0].clone();
        duplicate.subject = "Дубликат".to_string();
        doc.lessons.push(duplicate);

        let removed = doc.remove_lesson(1).unwrap();
        assert_eq!(removed.subject, "Программирование");
        assert_eq!(doc.lessons.len(), 3);
        assert!(doc.lesson(1).is_some());
    }

    #[test]
    fn test_remove_keeps_orphaned_group() {
        let mut doc = ScheduleDocument::seed();
        let added = doc.add_lesson(NewLesson::new().with_group("ПРОГ-501"));

        doc.remove_lesson(added.id).unwrap();
        assert!(doc.groups.iter().any(|g| g == "ПРОГ-501"));
    }

    #[test]
    fn test_time_slot_label() {
        let doc = ScheduleDocument::seed();

        assert_eq!(doc.time_slot_label(2), "10:10 - 11:40");
        assert_eq!(doc.time_slot_label(42), UNKNOWN_TIME_SLOT);
    }

    #[test]
    fn test_missing_top_level_key_is_rejected() {
        let raw = json!({ "groups": [], "days": [], "lessons": [] });
        assert!(serde_json::from_value::<ScheduleDocument>(raw).is_err());
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        let mut doc = ScheduleDocument::seed();
        doc.extra.insert("version".to_string(), json!(2));

        let text = serde_json::to_string_pretty(&doc).unwrap();
        let parsed: ScheduleDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, doc);
    }
}
