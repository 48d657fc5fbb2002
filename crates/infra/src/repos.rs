//! Repository traits.
//!
//! Every method returns `DomainResult`; stores map their internal failures
//! onto the domain taxonomy (duplicate key -> `Conflict`, missing row ->
//! `NotFound`, anything unexpected -> `Internal`). Read-modify-write methods
//! take the update struct so the store can apply it atomically.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use campuserp_academics::{
    Course, CourseUpdate, Enrollment, Grade, NewCourse, NewProgram, NewTimetableSlot, Program,
    ProgramUpdate, TimetableSlot, TimetableSlotId,
};
use campuserp_auth::{NewUserAccount, UserAccount, UserAccountUpdate};
use campuserp_billing::{Invoice, InvoiceId, NewInvoice, Payment, PaymentMethod};
use campuserp_core::{CourseId, DomainResult, ProgramId, StaffId, StudentId, UserId};
use campuserp_people::{
    NewStaff, NewStudent, Staff, StaffUpdate, Student, StudentContactUpdate, StudentUpdate,
};

#[async_trait]
pub trait IdentityRepo: Send + Sync {
    /// `Conflict` when the email is already taken.
    async fn create_user(&self, new: NewUserAccount) -> DomainResult<UserAccount>;
    async fn find_user_by_email(&self, email: &str) -> DomainResult<Option<UserAccount>>;
    async fn get_user(&self, id: UserId) -> DomainResult<UserAccount>;
    async fn list_users(&self) -> DomainResult<Vec<UserAccount>>;
    async fn update_user(&self, id: UserId, update: UserAccountUpdate)
        -> DomainResult<UserAccount>;
    async fn delete_user(&self, id: UserId) -> DomainResult<()>;
}

#[async_trait]
pub trait PeopleRepo: Send + Sync {
    /// `Conflict` when the registration number is already taken.
    async fn create_student(&self, new: NewStudent) -> DomainResult<Student>;
    async fn get_student(&self, id: StudentId) -> DomainResult<Student>;
    async fn list_students(&self) -> DomainResult<Vec<Student>>;
    async fn update_student(&self, id: StudentId, update: StudentUpdate) -> DomainResult<Student>;
    /// Self-service path: only contact fields can change.
    async fn update_student_contact(
        &self,
        id: StudentId,
        update: StudentContactUpdate,
    ) -> DomainResult<Student>;
    async fn delete_student(&self, id: StudentId) -> DomainResult<()>;
    /// Ownership resolution: the student record linked to a user account.
    async fn find_student_by_user(&self, user_id: UserId) -> DomainResult<Option<Student>>;

    async fn create_staff(&self, new: NewStaff) -> DomainResult<Staff>;
    async fn get_staff(&self, id: StaffId) -> DomainResult<Staff>;
    async fn list_staff(&self) -> DomainResult<Vec<Staff>>;
    async fn update_staff(&self, id: StaffId, update: StaffUpdate) -> DomainResult<Staff>;
    async fn delete_staff(&self, id: StaffId) -> DomainResult<()>;
    async fn find_staff_by_user(&self, user_id: UserId) -> DomainResult<Option<Staff>>;
}

#[async_trait]
pub trait AcademicsRepo: Send + Sync {
    async fn create_program(&self, new: NewProgram) -> DomainResult<Program>;
    async fn get_program(&self, id: ProgramId) -> DomainResult<Program>;
    async fn list_programs(&self) -> DomainResult<Vec<Program>>;
    async fn update_program(&self, id: ProgramId, update: ProgramUpdate) -> DomainResult<Program>;
    async fn delete_program(&self, id: ProgramId) -> DomainResult<()>;

    async fn create_course(&self, new: NewCourse) -> DomainResult<Course>;
    async fn get_course(&self, id: CourseId) -> DomainResult<Course>;
    async fn list_courses(&self) -> DomainResult<Vec<Course>>;
    async fn list_courses_by_lecturer(&self, lecturer_id: StaffId) -> DomainResult<Vec<Course>>;
    async fn update_course(&self, id: CourseId, update: CourseUpdate) -> DomainResult<Course>;
    async fn delete_course(&self, id: CourseId) -> DomainResult<()>;

    /// Enroll every listed student in one transaction. Any unknown student
    /// or duplicate `(course, student, session)` aborts the whole batch.
    async fn enroll_batch(
        &self,
        course_id: CourseId,
        student_ids: &[StudentId],
        session: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<Enrollment>>;
    async fn list_enrollments_for_course(&self, course_id: CourseId)
        -> DomainResult<Vec<Enrollment>>;
    async fn list_enrollments_for_student(
        &self,
        student_id: StudentId,
    ) -> DomainResult<Vec<Enrollment>>;

    /// One grade per enrollment; a second insert is a `Conflict` unless
    /// `replace` is set.
    async fn record_grade(&self, grade: Grade, replace: bool) -> DomainResult<Grade>;
    async fn list_grades_for_student(&self, student_id: StudentId) -> DomainResult<Vec<Grade>>;
    /// Graded courses for a student, the raw material of a transcript.
    async fn list_graded_courses(
        &self,
        student_id: StudentId,
    ) -> DomainResult<Vec<(Course, Grade)>>;

    /// `Conflict` when the slot clashes with an existing one (same day, same
    /// room, overlapping times).
    async fn add_timetable_slot(&self, new: NewTimetableSlot) -> DomainResult<TimetableSlot>;
    async fn list_timetable_slots(&self) -> DomainResult<Vec<TimetableSlot>>;
    async fn delete_timetable_slot(&self, id: TimetableSlotId) -> DomainResult<()>;
}

#[async_trait]
pub trait BillingRepo: Send + Sync {
    async fn create_invoice(&self, new: NewInvoice) -> DomainResult<Invoice>;
    async fn get_invoice(&self, id: InvoiceId) -> DomainResult<Invoice>;
    async fn list_invoices(&self) -> DomainResult<Vec<Invoice>>;
    async fn list_invoices_for_student(&self, student_id: StudentId)
        -> DomainResult<Vec<Invoice>>;
    async fn void_invoice(&self, id: InvoiceId) -> DomainResult<Invoice>;

    /// Apply the payment to the invoice and append the payment row in one
    /// step; overpayment and void/settled invoices are rejected before
    /// anything is written.
    async fn record_payment(
        &self,
        invoice_id: InvoiceId,
        amount: u64,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> DomainResult<(Invoice, Payment)>;
    async fn list_payments_for_student(&self, student_id: StudentId)
        -> DomainResult<Vec<Payment>>;
}
