//! Lesson filtering.

use serde::{Deserialize, Serialize};

use crate::types::Lesson;

/// Optional filters applied to a lesson list.
///
/// All supplied filters must match (logical AND). An empty string is the same
/// as not supplying the filter. Results keep the list's insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonQuery {
    /// Exact group match.
    #[serde(default)]
    pub group: Option<String>,
    /// Exact day match.
    #[serde(default)]
    pub day: Option<String>,
    /// Case-insensitive substring of the teacher name.
    #[serde(default)]
    pub teacher: Option<String>,
    /// Exact room match.
    #[serde(default)]
    pub room: Option<String>,
}

impl LessonQuery {
    /// Creates a query that matches every lesson.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one group.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Restricts to one day.
    #[must_use]
    pub fn with_day(mut self, day: impl Into<String>) -> Self {
        self.day = Some(day.into());
        self
    }

    /// Restricts to teachers whose name contains `teacher`, ignoring case.
    #[must_use]
    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teacher = Some(teacher.into());
        self
    }

    /// Restricts to one room.
    #[must_use]
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Returns `true` if no filter is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        active(&self.group).is_none()
            && active(&self.day).is_none()
            && active(&self.teacher).is_none()
            && active(&self.room).is_none()
    }

    /// Returns `true` if `lesson` satisfies every active filter.
    #[must_use]
    pub fn matches(&self, lesson: &Lesson) -> bool {
        if active(&self.group).is_some_and(|group| lesson.group != group) {
            return false;
        }
        if active(&self.day).is_some_and(|day| lesson.day != day) {
            return false;
        }
        if active(&self.room).is_some_and(|room| lesson.room != room) {
            return false;
        }
        if let Some(teacher) = active(&self.teacher) {
            let needle = teacher.to_lowercase();
            if !lesson.teacher.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }

    /// Returns the matching lessons in their original order.
    #[must_use]
    pub fn filter<'a>(&self, lessons: &'a [Lesson]) -> Vec<&'a Lesson> {
        lessons.iter().filter(|lesson| self.matches(lesson)).collect()
    }
}

fn active(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().filter(|value| !value.is_empty())
}
