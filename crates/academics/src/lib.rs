//! `campuserp-academics` — programs, courses, enrollments, grades,
//! transcripts and timetable slots.

pub mod course;
pub mod enrollment;
pub mod grade;
pub mod program;
pub mod timetable;
pub mod transcript;

pub use course::{Course, CourseUpdate, NewCourse, Semester};
pub use enrollment::{Enrollment, EnrollmentId};
pub use grade::{Grade, GradeId, GradeLetter};
pub use program::{NewProgram, Program, ProgramUpdate};
pub use timetable::{NewTimetableSlot, TimetableSlot, TimetableSlotId, Weekday};
pub use transcript::{Transcript, TranscriptEntry};
