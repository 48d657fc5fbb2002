use serde::{Deserialize, Serialize};

use campuserp_core::{CourseId, StudentId};

use crate::grade::GradeLetter;

/// One graded course on a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub course_id: CourseId,
    pub course_code: String,
    pub course_title: String,
    pub credit_units: u8,
    pub score: u8,
    pub letter: GradeLetter,
    pub points: u8,
}

/// A student's transcript, derived from their graded enrollments.
///
/// Not persisted; recomputed on demand from courses + grades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub student_id: StudentId,
    pub entries: Vec<TranscriptEntry>,
    /// Grade point average: Σ(points × units) / Σ(units), two decimals.
    /// `None` when no graded courses exist.
    pub gpa: Option<f64>,
}

impl Transcript {
    pub fn compute(student_id: StudentId, entries: Vec<TranscriptEntry>) -> Self {
        let total_units: u32 = entries.iter().map(|e| u32::from(e.credit_units)).sum();
        let gpa = if total_units == 0 {
            None
        } else {
            let weighted: u32 = entries
                .iter()
                .map(|e| u32::from(e.points) * u32::from(e.credit_units))
                .sum();
            Some((f64::from(weighted) / f64::from(total_units) * 100.0).round() / 100.0)
        };
        Self {
            student_id,
            entries,
            gpa,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(units: u8, score: u8) -> TranscriptEntry {
        let letter = GradeLetter::from_score(score);
        TranscriptEntry {
            course_id: CourseId::new(),
            course_code: "CSC101".to_string(),
            course_title: "Intro".to_string(),
            credit_units: units,
            score,
            letter,
            points: letter.points(),
        }
    }

    #[test]
    fn empty_transcript_has_no_gpa() {
        let t = Transcript::compute(StudentId::new(), vec![]);
        assert_eq!(t.gpa, None);
    }

    #[test]
    fn gpa_is_unit_weighted() {
        // A (5 pts) on 3 units + C (3 pts) on 1 unit = 18 / 4 = 4.5
        let t = Transcript::compute(StudentId::new(), vec![entry(3, 80), entry(1, 52)]);
        assert_eq!(t.gpa, Some(4.5));
    }

    #[test]
    fn gpa_rounds_to_two_decimals() {
        // 5 + 4 + 0 over 3 units = 3.0; 5 + 4 over 3+3 = 1.5 — use uneven case:
        // A(5)×2 + B(4)×1 = 14 / 3 = 4.666... -> 4.67
        let t = Transcript::compute(StudentId::new(), vec![entry(2, 75), entry(1, 65)]);
        assert_eq!(t.gpa, Some(4.67));
    }
}
