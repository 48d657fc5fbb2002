use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campuserp_core::{DomainError, DomainResult, StaffId};

use crate::enrollment::EnrollmentId;

/// Identifier of a grade row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradeId(Uuid);

campuserp_core::impl_uuid_newtype!(GradeId, "GradeId");

/// Letter grade on the 5-point scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradeLetter {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl GradeLetter {
    pub fn from_score(score: u8) -> GradeLetter {
        match score {
            70..=100 => GradeLetter::A,
            60..=69 => GradeLetter::B,
            50..=59 => GradeLetter::C,
            45..=49 => GradeLetter::D,
            40..=44 => GradeLetter::E,
            _ => GradeLetter::F,
        }
    }

    /// Grade point used for GPA computation.
    pub fn points(&self) -> u8 {
        match self {
            GradeLetter::A => 5,
            GradeLetter::B => 4,
            GradeLetter::C => 3,
            GradeLetter::D => 2,
            GradeLetter::E => 1,
            GradeLetter::F => 0,
        }
    }
}

/// A recorded score for one enrollment.
///
/// `graded_by` is the staff record of the lecturer who recorded it; the
/// action layer verifies course ownership before any grade is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub id: GradeId,
    pub enrollment_id: EnrollmentId,
    pub score: u8,
    pub letter: GradeLetter,
    pub graded_by: StaffId,
    pub graded_at: DateTime<Utc>,
}

impl Grade {
    pub fn record(
        enrollment_id: EnrollmentId,
        score: u8,
        graded_by: StaffId,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if score > 100 {
            return Err(DomainError::validation("score must be 0..=100"));
        }
        Ok(Self {
            id: GradeId::new(),
            enrollment_id,
            score,
            letter: GradeLetter::from_score(score),
            graded_by,
            graded_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_boundaries() {
        assert_eq!(GradeLetter::from_score(100), GradeLetter::A);
        assert_eq!(GradeLetter::from_score(70), GradeLetter::A);
        assert_eq!(GradeLetter::from_score(69), GradeLetter::B);
        assert_eq!(GradeLetter::from_score(60), GradeLetter::B);
        assert_eq!(GradeLetter::from_score(59), GradeLetter::C);
        assert_eq!(GradeLetter::from_score(50), GradeLetter::C);
        assert_eq!(GradeLetter::from_score(49), GradeLetter::D);
        assert_eq!(GradeLetter::from_score(45), GradeLetter::D);
        assert_eq!(GradeLetter::from_score(44), GradeLetter::E);
        assert_eq!(GradeLetter::from_score(40), GradeLetter::E);
        assert_eq!(GradeLetter::from_score(39), GradeLetter::F);
        assert_eq!(GradeLetter::from_score(0), GradeLetter::F);
    }

    #[test]
    fn record_rejects_out_of_range_score() {
        let result = Grade::record(EnrollmentId::new(), 101, StaffId::new(), Utc::now());
        assert!(result.is_err());
    }

    #[test]
    fn record_derives_letter() {
        let g = Grade::record(EnrollmentId::new(), 63, StaffId::new(), Utc::now()).unwrap();
        assert_eq!(g.letter, GradeLetter::B);
        assert_eq!(g.letter.points(), 4);
    }
}
