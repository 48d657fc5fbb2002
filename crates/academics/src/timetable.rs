use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campuserp_core::{CourseId, DomainError, DomainResult};

/// Identifier of a timetable slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimetableSlotId(Uuid);

campuserp_core::impl_uuid_newtype!(TimetableSlotId, "TimetableSlotId");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// A scheduled lecture slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableSlot {
    pub id: TimetableSlotId,
    pub course_id: CourseId,
    pub day: Weekday,
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
    pub room: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTimetableSlot {
    pub course_id: CourseId,
    pub day: Weekday,
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
    pub room: String,
}

impl TimetableSlot {
    pub fn create(new: NewTimetableSlot) -> DomainResult<Self> {
        if new.ends_at <= new.starts_at {
            return Err(DomainError::validation("ends_at must be after starts_at"));
        }
        let room = new.room.trim().to_string();
        if room.is_empty() {
            return Err(DomainError::validation("room cannot be empty"));
        }
        Ok(Self {
            id: TimetableSlotId::new(),
            course_id: new.course_id,
            day: new.day,
            starts_at: new.starts_at,
            ends_at: new.ends_at,
            room,
        })
    }

    /// Whether two slots contend for the same room at the same time.
    pub fn clashes_with(&self, other: &TimetableSlot) -> bool {
        self.day == other.day
            && self.room == other.room
            && self.starts_at < other.ends_at
            && other.starts_at < self.ends_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: Weekday, start: &str, end: &str, room: &str) -> TimetableSlot {
        TimetableSlot::create(NewTimetableSlot {
            course_id: CourseId::new(),
            day,
            starts_at: start.parse().unwrap(),
            ends_at: end.parse().unwrap(),
            room: room.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn rejects_inverted_times() {
        let result = TimetableSlot::create(NewTimetableSlot {
            course_id: CourseId::new(),
            day: Weekday::Monday,
            starts_at: "10:00:00".parse().unwrap(),
            ends_at: "09:00:00".parse().unwrap(),
            room: "LT1".to_string(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn clash_detection() {
        let a = slot(Weekday::Monday, "09:00:00", "11:00:00", "LT1");
        let overlapping = slot(Weekday::Monday, "10:00:00", "12:00:00", "LT1");
        let other_room = slot(Weekday::Monday, "10:00:00", "12:00:00", "LT2");
        let other_day = slot(Weekday::Tuesday, "10:00:00", "12:00:00", "LT1");
        let adjacent = slot(Weekday::Monday, "11:00:00", "13:00:00", "LT1");

        assert!(a.clashes_with(&overlapping));
        assert!(!a.clashes_with(&other_room));
        assert!(!a.clashes_with(&other_day));
        assert!(!a.clashes_with(&adjacent));
    }
}
