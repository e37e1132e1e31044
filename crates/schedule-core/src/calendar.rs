//! Wall-clock helpers: weekday names and the current-lesson lookup.

use std::ops::RangeInclusive;

use chrono::{Datelike, Timelike, Weekday};
use serde::Serialize;

use crate::document::ScheduleDocument;
use crate::types::Lesson;

/// Teaching-day names, Monday through Saturday.
pub const WEEKDAYS: [&str; 6] = [
    "Понедельник",
    "Вторник",
    "Среда",
    "Четверг",
    "Пятница",
    "Суббота",
];

/// Local hours during which some lesson of the day counts as current.
///
/// Coarse gate only: time slot boundaries are not consulted.
pub const TEACHING_HOURS: RangeInclusive<u32> = 8..=18;

/// Maps a weekday to its schedule name. Sunday has none.
#[must_use]
pub fn day_name(weekday: Weekday) -> Option<&'static str> {
    let index = weekday.num_days_from_monday() as usize;
    WEEKDAYS.get(index).copied()
}

/// The lesson reported as running right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentLesson {
    /// The matched lesson.
    pub lesson: Lesson,
    /// Clock reading as `H:MM`.
    pub current_time: String,
}

/// Finds the first lesson of today's weekday while inside [`TEACHING_HOURS`].
///
/// `now` is taken as a parameter so callers decide the clock; the server
/// passes local time.
#[must_use]
pub fn current_lesson<T>(document: &ScheduleDocument, now: &T) -> Option<CurrentLesson>
where
    T: Datelike + Timelike,
{
    let day = day_name(now.weekday())?;
    if !TEACHING_HOURS.contains(&now.hour()) {
        return None;
    }

    document
        .lessons
        .iter()
        .find(|lesson| lesson.day == day)
        .map(|lesson| CurrentLesson {
            lesson: lesson.clone(),
            current_time: format!("{}:{:02}", now.hour(), now.minute()),
        })
}
