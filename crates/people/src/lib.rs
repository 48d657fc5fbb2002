//! `campuserp-people` — student and staff records.

pub mod staff;
pub mod student;

pub use campuserp_core::{StaffId, StudentId};
pub use staff::{NewStaff, Staff, StaffStatus, StaffUpdate};
pub use student::{NewStudent, Student, StudentContactUpdate, StudentStatus, StudentUpdate};
