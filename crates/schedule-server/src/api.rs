//! JSON API types.
//!
//! Field names and messages are part of the public contract with the
//! browser front-end and must not change.

use schedule_core::{CurrentLesson, Lesson, TimeSlot};
use schedule_store::LessonListing;
use serde::Serialize;

/// Message returned after a lesson is created.
pub const LESSON_ADDED: &str = "Пара успешно добавлена";
/// Message returned after a lesson is deleted.
pub const LESSON_DELETED: &str = "Пара успешно удалена";
/// Message returned when a lesson id is unknown.
pub const LESSON_NOT_FOUND: &str = "Пара не найдена";
/// Message returned when the document could not be written.
pub const SAVE_FAILED: &str = "Ошибка сохранения данных";
/// Message returned for a body that is not a usable JSON object.
pub const INVALID_REQUEST: &str = "Некорректный запрос";

// === Schedule listing ===

/// Response of `GET /api/schedule`.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResponse {
    /// Always `true`.
    pub success: bool,
    /// The listing.
    pub data: ScheduleData,
}

/// Payload of [`ScheduleResponse`].
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleData {
    /// Lessons matching the filters.
    pub lessons: Vec<Lesson>,
    /// Number of matching lessons.
    pub total: usize,
    /// All registered groups.
    pub groups: Vec<String>,
    /// All weekday names.
    pub days: Vec<String>,
    /// All time slots.
    pub time_slots: Vec<TimeSlot>,
}

impl From<LessonListing> for ScheduleResponse {
    fn from(listing: LessonListing) -> Self {
        Self {
            success: true,
            data: ScheduleData {
                total: listing.total(),
                lessons: listing.lessons,
                groups: listing.groups,
                days: listing.days,
                time_slots: listing.time_slots,
            },
        }
    }
}

// === Mutations ===

/// Response of a successful `POST /api/schedule`.
#[derive(Debug, Clone, Serialize)]
pub struct LessonCreatedResponse {
    /// Always `true`.
    pub success: bool,
    /// Human readable outcome.
    pub message: String,
    /// The stored lesson with its assigned id.
    pub lesson: Lesson,
}

impl LessonCreatedResponse {
    /// Wraps a freshly created lesson.
    #[must_use]
    pub fn new(lesson: Lesson) -> Self {
        Self {
            success: true,
            message: LESSON_ADDED.to_string(),
            lesson,
        }
    }
}

/// Outcome message used by deletes and by every error.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human readable outcome.
    pub message: String,
}

impl MessageResponse {
    /// A successful outcome.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// A failed outcome.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

// === Current lesson ===

/// Response of `GET /api/current-lesson`.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentLessonResponse {
    /// The running lesson, `null` if none.
    pub current_lesson: Option<Lesson>,
    /// Server clock as `H:MM`, only present with a lesson.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_time: Option<String>,
}

impl From<Option<CurrentLesson>> for CurrentLessonResponse {
    fn from(current: Option<CurrentLesson>) -> Self {
        match current {
            Some(current) => Self {
                current_lesson: Some(current.lesson),
                current_time: Some(current.current_time),
            },
            None => Self {
                current_lesson: None,
                current_time: None,
            },
        }
    }
}
