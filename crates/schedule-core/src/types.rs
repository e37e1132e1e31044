//! Lesson and time-slot records.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Identifier of a lesson within a document.
pub type LessonId = i64;

/// Lesson type used when a new lesson does not name one.
pub const DEFAULT_LESSON_KIND: &str = "лекция";

/// Time slot used when a new lesson does not name one.
pub const DEFAULT_TIME_SLOT: i64 = 1;

fn default_time_slot() -> i64 {
    DEFAULT_TIME_SLOT
}

/// Reads a stored text field with the same rules as a client payload.
fn stored_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    coerce_text("lesson", &value).map_err(de::Error::custom)
}

/// Reads a stored time slot; `null` falls back to the default slot.
fn stored_time_slot<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(DEFAULT_TIME_SLOT),
        value => coerce_time_slot(&value).map_err(de::Error::custom),
    }
}

/// A numbered period of the day, shared by every group and day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Slot number, unique within the document.
    pub id: i64,
    /// Human readable interval, e.g. `8:30 - 10:00`.
    pub time: String,
}

impl TimeSlot {
    /// Creates a new time slot.
    #[must_use]
    pub fn new(id: i64, time: impl Into<String>) -> Self {
        Self {
            id,
            time: time.into(),
        }
    }
}

/// One scheduled class occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    /// Lesson id, unique within the document.
    pub id: LessonId,
    /// Student group name.
    #[serde(default, deserialize_with = "stored_text")]
    pub group: String,
    /// Weekday name, expected to match an entry of the document's `days`.
    #[serde(default, deserialize_with = "stored_text")]
    pub day: String,
    /// Referenced time slot id. Never validated against the document.
    #[serde(default = "default_time_slot", deserialize_with = "stored_time_slot")]
    pub time_slot: i64,
    /// Subject taught.
    #[serde(default, deserialize_with = "stored_text")]
    pub subject: String,
    /// Teacher name.
    #[serde(default, deserialize_with = "stored_text")]
    pub teacher: String,
    /// Room label.
    #[serde(default, deserialize_with = "stored_text")]
    pub room: String,
    /// Lesson type (lecture, practice, lab...).
    #[serde(rename = "type", default, deserialize_with = "stored_text")]
    pub kind: String,
    /// Keys written by other tools, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Lesson {
    /// Builds a full lesson from a partial payload and a freshly assigned id.
    #[must_use]
    pub fn from_new(id: LessonId, new: NewLesson) -> Self {
        Self {
            id,
            group: new.group.unwrap_or_default(),
            day: new.day.unwrap_or_default(),
            time_slot: new.time_slot.unwrap_or(DEFAULT_TIME_SLOT),
            subject: new.subject.unwrap_or_default(),
            teacher: new.teacher.unwrap_or_default(),
            room: new.room.unwrap_or_default(),
            kind: new
                .kind
                .unwrap_or_else(|| DEFAULT_LESSON_KIND.to_string()),
            extra: Map::new(),
        }
    }
}

/// A partial lesson as submitted by a client.
///
/// Every field is optional; [`Lesson::from_new`] fills in the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewLesson {
    /// Student group name.
    pub group: Option<String>,
    /// Weekday name.
    pub day: Option<String>,
    /// Time slot id.
    pub time_slot: Option<i64>,
    /// Subject taught.
    pub subject: Option<String>,
    /// Teacher name.
    pub teacher: Option<String>,
    /// Room label.
    pub room: Option<String>,
    /// Lesson type.
    pub kind: Option<String>,
}

impl NewLesson {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON payload, coercing loosely typed fields.
    ///
    /// Text fields accept strings, numbers and booleans; `null` reads as an
    /// empty string. `time_slot` accepts integers, floats (truncated) and
    /// numeric strings. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if the payload is not an object and
    /// [`Error::InvalidField`] if a field cannot be coerced.
    pub fn from_json(payload: &Value) -> Result<Self> {
        let object = payload
            .as_object()
            .ok_or_else(|| Error::invalid_request("lesson payload must be a JSON object"))?;

        let text = |field: &str| -> Result<Option<String>> {
            object
                .get(field)
                .map(|value| coerce_text(field, value))
                .transpose()
        };

        Ok(Self {
            group: text("group")?,
            day: text("day")?,
            time_slot: object.get("time_slot").map(coerce_time_slot).transpose()?,
            subject: text("subject")?,
            teacher: text("teacher")?,
            room: text("room")?,
            kind: text("type")?,
        })
    }

    /// Sets the group.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets the day.
    #[must_use]
    pub fn with_day(mut self, day: impl Into<String>) -> Self {
        self.day = Some(day.into());
        self
    }

    /// Sets the time slot.
    #[must_use]
    pub fn with_time_slot(mut self, time_slot: i64) -> Self {
        self.time_slot = Some(time_slot);
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the teacher.
    #[must_use]
    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teacher = Some(teacher.into());
        self
    }

    /// Sets the room.
    #[must_use]
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Sets the lesson type.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

fn coerce_text(field: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => {
            Err(Error::invalid_field(field, "expected a text value"))
        },
    }
}

fn coerce_time_slot(value: &Value) -> Result<i64> {
    let invalid = || Error::invalid_field("time_slot", "expected an integer");

    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            let f = n.as_f64().ok_or_else(invalid)?;
            // Float-to-int casts saturate, so bound-check before truncating.
            if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                #[allow(clippy::cast_possible_truncation)]
                Ok(f.trunc() as i64)
            } else {
                Err(invalid())
            }
        },
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid()),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_new_applies_defaults() {
        let lesson = Lesson::from_new(4, NewLesson::new().with_group("ИСП-402"));

        assert_eq!(lesson.id, 4);
        assert_eq!(lesson.group, "ИСП-402");
        assert_eq!(lesson.day, "");
        assert_eq!(lesson.time_slot, 1);
        assert_eq!(lesson.kind, "лекция");
    }

    #[test]
    fn test_payload_coerces_numeric_string_time_slot() {
        let new = NewLesson::from_json(&json!({
            "group": "ИСП-401",
            "time_slot": " 2 ",
            "room": 101
        }))
        .unwrap();

        assert_eq!(new.time_slot, Some(2));
        assert_eq!(new.room.as_deref(), Some("101"));
        assert_eq!(new.kind, None);
    }

    #[test]
    fn test_payload_truncates_float_time_slot() {
        let new = NewLesson::from_json(&json!({ "time_slot": 3.9 })).unwrap();
        assert_eq!(new.time_slot, Some(3));
    }

    #[test]
    fn test_payload_rejects_bad_time_slot() {
        for bad in [json!("second"), json!(null), json!([1]), json!("2.5")] {
            let err = NewLesson::from_json(&json!({ "time_slot": bad })).unwrap_err();
            assert!(matches!(err, Error::InvalidField { ref field, .. } if field == "time_slot"));
        }
    }

    #[test]
    fn test_payload_rejects_non_object() {
        let err = NewLesson::from_json(&json!(["group"])).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest { .. }));
    }

    #[test]
    fn test_payload_rejects_nested_text_field() {
        let err = NewLesson::from_json(&json!({ "teacher": { "name": "x" } })).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_lesson_keeps_unknown_keys() {
        let raw = json!({
            "id": 9,
            "group": "ПРОГ-401",
            "day": "Среда",
            "time_slot": 2,
            "subject": "Алгоритмы",
            "teacher": "Смирнов Д.В.",
            "room": "305",
            "type": "практика",
            "note": "перенос"
        });

        let lesson: Lesson = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(lesson.kind, "практика");
        assert_eq!(lesson.extra.get("note"), Some(&json!("перенос")));
        assert_eq!(serde_json::to_value(&lesson).unwrap(), raw);
    }

    #[test]
    fn test_stored_lesson_tolerates_loose_values() {
        let raw = json!({
            "id": 11,
            "group": "A",
            "day": "Среда",
            "time_slot": "3",
            "subject": "Сети",
            "teacher": null,
            "room": 101,
            "type": null
        });

        let lesson: Lesson = serde_json::from_value(raw).unwrap();
        assert_eq!(lesson.time_slot, 3);
        assert_eq!(lesson.room, "101");
        assert_eq!(lesson.teacher, "");
        assert_eq!(lesson.kind, "");

        let null_slot: Lesson = serde_json::from_value(json!({ "id": 1, "time_slot": null })).unwrap();
        assert_eq!(null_slot.time_slot, DEFAULT_TIME_SLOT);
    }
}
