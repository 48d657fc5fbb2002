//! In-memory store.
//!
//! The default backing store for development and tests. One `RwLock` guards
//! the whole state, so multi-row writes (batch enrollment, payment
//! application) are naturally atomic: the write guard is the transaction.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use campuserp_academics::{
    Course, CourseUpdate, Enrollment, EnrollmentId, Grade, NewCourse, NewProgram,
    NewTimetableSlot, Program, ProgramUpdate, TimetableSlot, TimetableSlotId,
};
use campuserp_auth::{NewUserAccount, UserAccount, UserAccountUpdate};
use campuserp_billing::{Invoice, InvoiceId, NewInvoice, Payment, PaymentId, PaymentMethod};
use campuserp_core::{
    CourseId, DomainError, DomainResult, ProgramId, StaffId, StudentId, UserId,
};
use campuserp_people::{
    NewStaff, NewStudent, Staff, StaffUpdate, Student, StudentContactUpdate, StudentUpdate,
};

use crate::repos::{AcademicsRepo, BillingRepo, IdentityRepo, PeopleRepo};

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, UserAccount>,
    students: HashMap<StudentId, Student>,
    staff: HashMap<StaffId, Staff>,
    programs: HashMap<ProgramId, Program>,
    courses: HashMap<CourseId, Course>,
    enrollments: HashMap<EnrollmentId, Enrollment>,
    grades: HashMap<EnrollmentId, Grade>,
    timetable: HashMap<TimetableSlotId, TimetableSlot>,
    invoices: HashMap<InvoiceId, Invoice>,
    payments: HashMap<PaymentId, Payment>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| DomainError::internal("store lock poisoned"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| DomainError::internal("store lock poisoned"))
    }
}

#[async_trait]
impl IdentityRepo for InMemoryStore {
    async fn create_user(&self, new: NewUserAccount) -> DomainResult<UserAccount> {
        let account = UserAccount::create(new, Utc::now())?;
        let mut state = self.write()?;
        if state.users.values().any(|u| u.email == account.email) {
            return Err(DomainError::conflict("email already registered"));
        }
        state.users.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_user_by_email(&self, email: &str) -> DomainResult<Option<UserAccount>> {
        let email = email.trim().to_lowercase();
        let state = self.read()?;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn get_user(&self, id: UserId) -> DomainResult<UserAccount> {
        self.read()?
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("user not found"))
    }

    async fn list_users(&self) -> DomainResult<Vec<UserAccount>> {
        let mut users: Vec<_> = self.read()?.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn update_user(
        &self,
        id: UserId,
        update: UserAccountUpdate,
    ) -> DomainResult<UserAccount> {
        let mut state = self.write()?;
        if let Some(email) = &update.email {
            let email = email.trim().to_lowercase();
            if state.users.values().any(|u| u.email == email && u.id != id) {
                return Err(DomainError::conflict("email already registered"));
            }
        }
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("user not found"))?;
        user.apply_update(update)?;
        Ok(user.clone())
    }

    async fn delete_user(&self, id: UserId) -> DomainResult<()> {
        self.write()?
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("user not found"))
    }
}

#[async_trait]
impl PeopleRepo for InMemoryStore {
    async fn create_student(&self, new: NewStudent) -> DomainResult<Student> {
        let student = Student::create(new, Utc::now())?;
        let mut state = self.write()?;
        if state.students.values().any(|s| s.reg_no == student.reg_no) {
            return Err(DomainError::conflict("registration number already taken"));
        }
        if state
            .students
            .values()
            .any(|s| s.user_id == student.user_id)
        {
            return Err(DomainError::conflict(
                "user already linked to a student record",
            ));
        }
        state.students.insert(student.id, student.clone());
        Ok(student)
    }

    async fn get_student(&self, id: StudentId) -> DomainResult<Student> {
        self.read()?
            .students
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("student not found"))
    }

    async fn list_students(&self) -> DomainResult<Vec<Student>> {
        let mut students: Vec<_> = self.read()?.students.values().cloned().collect();
        students.sort_by(|a, b| a.reg_no.cmp(&b.reg_no));
        Ok(students)
    }

    async fn update_student(&self, id: StudentId, update: StudentUpdate) -> DomainResult<Student> {
        let mut state = self.write()?;
        let student = state
            .students
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("student not found"))?;
        student.apply_update(update, Utc::now())?;
        Ok(student.clone())
    }

    async fn update_student_contact(
        &self,
        id: StudentId,
        update: StudentContactUpdate,
    ) -> DomainResult<Student> {
        let mut state = self.write()?;
        let student = state
            .students
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("student not found"))?;
        student.apply_contact_update(update, Utc::now())?;
        Ok(student.clone())
    }

    async fn delete_student(&self, id: StudentId) -> DomainResult<()> {
        self.write()?
            .students
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("student not found"))
    }

    async fn find_student_by_user(&self, user_id: UserId) -> DomainResult<Option<Student>> {
        let state = self.read()?;
        Ok(state
            .students
            .values()
            .find(|s| s.user_id == user_id)
            .cloned())
    }

    async fn create_staff(&self, new: NewStaff) -> DomainResult<Staff> {
        let staff = Staff::create(new, Utc::now())?;
        let mut state = self.write()?;
        if state.staff.values().any(|s| s.staff_no == staff.staff_no) {
            return Err(DomainError::conflict("staff number already taken"));
        }
        if state.staff.values().any(|s| s.user_id == staff.user_id) {
            return Err(DomainError::conflict(
                "user already linked to a staff record",
            ));
        }
        state.staff.insert(staff.id, staff.clone());
        Ok(staff)
    }

    async fn get_staff(&self, id: StaffId) -> DomainResult<Staff> {
        self.read()?
            .staff
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("staff not found"))
    }

    async fn list_staff(&self) -> DomainResult<Vec<Staff>> {
        let mut staff: Vec<_> = self.read()?.staff.values().cloned().collect();
        staff.sort_by(|a, b| a.staff_no.cmp(&b.staff_no));
        Ok(staff)
    }

    async fn update_staff(&self, id: StaffId, update: StaffUpdate) -> DomainResult<Staff> {
        let mut state = self.write()?;
        let staff = state
            .staff
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("staff not found"))?;
        staff.apply_update(update, Utc::now())?;
        Ok(staff.clone())
    }

    async fn delete_staff(&self, id: StaffId) -> DomainResult<()> {
        self.write()?
            .staff
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("staff not found"))
    }

    async fn find_staff_by_user(&self, user_id: UserId) -> DomainResult<Option<Staff>> {
        let state = self.read()?;
        Ok(state.staff.values().find(|s| s.user_id == user_id).cloned())
    }
}

#[async_trait]
impl AcademicsRepo for InMemoryStore {
    async fn create_program(&self, new: NewProgram) -> DomainResult<Program> {
        let program = Program::create(new, Utc::now())?;
        let mut state = self.write()?;
        if state.programs.values().any(|p| p.code == program.code) {
            return Err(DomainError::conflict("program code already taken"));
        }
        state.programs.insert(program.id, program.clone());
        Ok(program)
    }

    async fn get_program(&self, id: ProgramId) -> DomainResult<Program> {
        self.read()?
            .programs
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("program not found"))
    }

    async fn list_programs(&self) -> DomainResult<Vec<Program>> {
        let mut programs: Vec<_> = self.read()?.programs.values().cloned().collect();
        programs.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(programs)
    }

    async fn update_program(
        &self,
        id: ProgramId,
        update: ProgramUpdate,
    ) -> DomainResult<Program> {
        let mut state = self.write()?;
        let program = state
            .programs
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("program not found"))?;
        program.apply_update(update)?;
        Ok(program.clone())
    }

    async fn delete_program(&self, id: ProgramId) -> DomainResult<()> {
        let mut state = self.write()?;
        if state.courses.values().any(|c| c.program_id == id) {
            return Err(DomainError::conflict("program still has courses"));
        }
        state
            .programs
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("program not found"))
    }

    async fn create_course(&self, new: NewCourse) -> DomainResult<Course> {
        let course = Course::create(new, Utc::now())?;
        let mut state = self.write()?;
        if !state.programs.contains_key(&course.program_id) {
            return Err(DomainError::not_found("program not found"));
        }
        if state.courses.values().any(|c| c.code == course.code) {
            return Err(DomainError::conflict("course code already taken"));
        }
        state.courses.insert(course.id, course.clone());
        Ok(course)
    }

    async fn get_course(&self, id: CourseId) -> DomainResult<Course> {
        self.read()?
            .courses
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("course not found"))
    }

    async fn list_courses(&self) -> DomainResult<Vec<Course>> {
        let mut courses: Vec<_> = self.read()?.courses.values().cloned().collect();
        courses.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(courses)
    }

    async fn list_courses_by_lecturer(&self, lecturer_id: StaffId) -> DomainResult<Vec<Course>> {
        let mut courses: Vec<_> = self
            .read()?
            .courses
            .values()
            .filter(|c| c.is_taught_by(lecturer_id))
            .cloned()
            .collect();
        courses.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(courses)
    }

    async fn update_course(&self, id: CourseId, update: CourseUpdate) -> DomainResult<Course> {
        let mut state = self.write()?;
        let course = state
            .courses
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("course not found"))?;
        course.apply_update(update)?;
        Ok(course.clone())
    }

    async fn delete_course(&self, id: CourseId) -> DomainResult<()> {
        let mut state = self.write()?;
        if state.enrollments.values().any(|e| e.course_id == id) {
            return Err(DomainError::conflict("course still has enrollments"));
        }
        state
            .courses
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("course not found"))
    }

    async fn enroll_batch(
        &self,
        course_id: CourseId,
        student_ids: &[StudentId],
        session: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<Enrollment>> {
        let mut state = self.write()?;
        if !state.courses.contains_key(&course_id) {
            return Err(DomainError::not_found("course not found"));
        }

        // Validate the whole batch before writing anything. Student ids are
        // resolved by the caller against the people repo.
        let mut batch = Vec::with_capacity(student_ids.len());
        for student_id in student_ids {
            let enrollment = Enrollment::create(course_id, *student_id, session, now)?;
            let duplicate = state
                .enrollments
                .values()
                .chain(batch.iter())
                .any(|e: &Enrollment| e.key() == enrollment.key());
            if duplicate {
                return Err(DomainError::conflict(format!(
                    "student {student_id} already enrolled for {session}"
                )));
            }
            batch.push(enrollment);
        }

        for enrollment in &batch {
            state.enrollments.insert(enrollment.id, enrollment.clone());
        }
        Ok(batch)
    }

    async fn list_enrollments_for_course(
        &self,
        course_id: CourseId,
    ) -> DomainResult<Vec<Enrollment>> {
        let mut enrollments: Vec<_> = self
            .read()?
            .enrollments
            .values()
            .filter(|e| e.course_id == course_id)
            .cloned()
            .collect();
        enrollments.sort_by(|a, b| a.enrolled_at.cmp(&b.enrolled_at));
        Ok(enrollments)
    }

    async fn list_enrollments_for_student(
        &self,
        student_id: StudentId,
    ) -> DomainResult<Vec<Enrollment>> {
        let mut enrollments: Vec<_> = self
            .read()?
            .enrollments
            .values()
            .filter(|e| e.student_id == student_id)
            .cloned()
            .collect();
        enrollments.sort_by(|a, b| a.enrolled_at.cmp(&b.enrolled_at));
        Ok(enrollments)
    }

    async fn record_grade(&self, grade: Grade, replace: bool) -> DomainResult<Grade> {
        let mut state = self.write()?;
        if !state.enrollments.contains_key(&grade.enrollment_id) {
            return Err(DomainError::not_found("enrollment not found"));
        }
        if state.grades.contains_key(&grade.enrollment_id) && !replace {
            return Err(DomainError::conflict("enrollment already graded"));
        }
        state.grades.insert(grade.enrollment_id, grade.clone());
        Ok(grade)
    }

    async fn list_grades_for_student(&self, student_id: StudentId) -> DomainResult<Vec<Grade>> {
        let state = self.read()?;
        let mut grades: Vec<_> = state
            .enrollments
            .values()
            .filter(|e| e.student_id == student_id)
            .filter_map(|e| state.grades.get(&e.id))
            .cloned()
            .collect();
        grades.sort_by(|a, b| a.graded_at.cmp(&b.graded_at));
        Ok(grades)
    }

    async fn list_graded_courses(
        &self,
        student_id: StudentId,
    ) -> DomainResult<Vec<(Course, Grade)>> {
        let state = self.read()?;
        let mut rows = Vec::new();
        for enrollment in state
            .enrollments
            .values()
            .filter(|e| e.student_id == student_id)
        {
            if let (Some(grade), Some(course)) = (
                state.grades.get(&enrollment.id),
                state.courses.get(&enrollment.course_id),
            ) {
                rows.push((course.clone(), grade.clone()));
            }
        }
        rows.sort_by(|a, b| a.0.code.cmp(&b.0.code));
        Ok(rows)
    }

    async fn add_timetable_slot(&self, new: NewTimetableSlot) -> DomainResult<TimetableSlot> {
        let slot = TimetableSlot::create(new)?;
        let mut state = self.write()?;
        if !state.courses.contains_key(&slot.course_id) {
            return Err(DomainError::not_found("course not found"));
        }
        if let Some(existing) = state.timetable.values().find(|s| s.clashes_with(&slot)) {
            return Err(DomainError::conflict(format!(
                "room {} already booked at that time by another slot ({})",
                slot.room, existing.id
            )));
        }
        state.timetable.insert(slot.id, slot.clone());
        Ok(slot)
    }

    async fn list_timetable_slots(&self) -> DomainResult<Vec<TimetableSlot>> {
        let mut slots: Vec<_> = self.read()?.timetable.values().cloned().collect();
        slots.sort_by(|a, b| a.room.cmp(&b.room).then(a.starts_at.cmp(&b.starts_at)));
        Ok(slots)
    }

    async fn delete_timetable_slot(&self, id: TimetableSlotId) -> DomainResult<()> {
        self.write()?
            .timetable
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("timetable slot not found"))
    }
}

#[async_trait]
impl BillingRepo for InMemoryStore {
    async fn create_invoice(&self, new: NewInvoice) -> DomainResult<Invoice> {
        let invoice = Invoice::create(new, Utc::now())?;
        let mut state = self.write()?;
        if state
            .invoices
            .values()
            .any(|i| i.reference == invoice.reference)
        {
            return Err(DomainError::conflict("invoice reference already taken"));
        }
        state.invoices.insert(invoice.id, invoice.clone());
        Ok(invoice)
    }

    async fn get_invoice(&self, id: InvoiceId) -> DomainResult<Invoice> {
        self.read()?
            .invoices
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("invoice not found"))
    }

    async fn list_invoices(&self) -> DomainResult<Vec<Invoice>> {
        let mut invoices: Vec<_> = self.read()?.invoices.values().cloned().collect();
        invoices.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(invoices)
    }

    async fn list_invoices_for_student(
        &self,
        student_id: StudentId,
    ) -> DomainResult<Vec<Invoice>> {
        let mut invoices: Vec<_> = self
            .read()?
            .invoices
            .values()
            .filter(|i| i.student_id == student_id)
            .cloned()
            .collect();
        invoices.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(invoices)
    }

    async fn void_invoice(&self, id: InvoiceId) -> DomainResult<Invoice> {
        let mut state = self.write()?;
        let invoice = state
            .invoices
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("invoice not found"))?;
        invoice.void()?;
        Ok(invoice.clone())
    }

    async fn record_payment(
        &self,
        invoice_id: InvoiceId,
        amount: u64,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> DomainResult<(Invoice, Payment)> {
        let payment = Payment::record(
            campuserp_billing::NewPayment {
                invoice_id,
                amount,
                method,
            },
            now,
        )?;
        let mut state = self.write()?;
        let invoice = state
            .invoices
            .get_mut(&invoice_id)
            .ok_or_else(|| DomainError::not_found("invoice not found"))?;
        invoice.register_payment(amount)?;
        let invoice = invoice.clone();
        state.payments.insert(payment.id, payment.clone());
        Ok((invoice, payment))
    }

    async fn list_payments_for_student(
        &self,
        student_id: StudentId,
    ) -> DomainResult<Vec<Payment>> {
        let state = self.read()?;
        let mut payments: Vec<_> = state
            .payments
            .values()
            .filter(|p| {
                state
                    .invoices
                    .get(&p.invoice_id)
                    .is_some_and(|i| i.student_id == student_id)
            })
            .cloned()
            .collect();
        payments.sort_by(|a, b| a.received_at.cmp(&b.received_at));
        Ok(payments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campuserp_academics::Semester;
    use campuserp_auth::Role;

    async fn seed_student(store: &InMemoryStore, reg_no: &str) -> Student {
        store
            .create_student(NewStudent {
                user_id: UserId::new(),
                reg_no: reg_no.to_string(),
                first_name: "Ada".to_string(),
                last_name: "Obi".to_string(),
                email: format!("{}@example.edu", reg_no.to_lowercase()),
                program_id: None,
                level: 200,
            })
            .await
            .unwrap()
    }

    async fn seed_course(store: &InMemoryStore, code: &str) -> Course {
        let program = store
            .create_program(NewProgram {
                code: format!("P-{code}"),
                title: "Computer Science".to_string(),
                department: "Computing".to_string(),
                duration_years: 4,
            })
            .await
            .unwrap();
        store
            .create_course(NewCourse {
                code: code.to_string(),
                title: "Course".to_string(),
                program_id: program.id,
                lecturer_id: None,
                semester: Semester::First,
                credit_units: 3,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = InMemoryStore::new();
        let new = NewUserAccount {
            email: "reg@example.edu".to_string(),
            password_hash: "$2b$04$stub".to_string(),
            role: Role::Registrar,
            display_name: "Registrar".to_string(),
        };
        store.create_user(new.clone()).await.unwrap();
        let err = store.create_user(new).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn batch_enrollment_is_all_or_nothing() {
        let store = InMemoryStore::new();
        let course = seed_course(&store, "CSC201").await;
        let a = seed_student(&store, "REG001").await;
        let b = seed_student(&store, "REG002").await;

        // Second batch repeats student `a`: whole batch must abort, leaving
        // `b`'s second enrollment unwritten.
        store
            .enroll_batch(course.id, &[a.id], "2025/2026", Utc::now())
            .await
            .unwrap();
        let err = store
            .enroll_batch(course.id, &[b.id, a.id], "2025/2026", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let enrolled = store.list_enrollments_for_course(course.id).await.unwrap();
        assert_eq!(enrolled.len(), 1);
        assert_eq!(enrolled[0].student_id, a.id);
    }

    #[tokio::test]
    async fn duplicate_within_batch_aborts_batch() {
        let store = InMemoryStore::new();
        let course = seed_course(&store, "CSC202").await;
        let a = seed_student(&store, "REG003").await;

        let err = store
            .enroll_batch(course.id, &[a.id, a.id], "2025/2026", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(store
            .list_enrollments_for_course(course.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn regrade_requires_replace_flag() {
        let store = InMemoryStore::new();
        let course = seed_course(&store, "CSC203").await;
        let student = seed_student(&store, "REG004").await;
        let enrollment = store
            .enroll_batch(course.id, &[student.id], "2025/2026", Utc::now())
            .await
            .unwrap()
            .remove(0);

        let first = Grade::record(enrollment.id, 55, StaffId::new(), Utc::now()).unwrap();
        store.record_grade(first, false).await.unwrap();

        let second = Grade::record(enrollment.id, 72, StaffId::new(), Utc::now()).unwrap();
        let err = store.record_grade(second.clone(), false).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        store.record_grade(second, true).await.unwrap();
        let grades = store.list_grades_for_student(student.id).await.unwrap();
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].score, 72);
    }

    #[tokio::test]
    async fn clashing_timetable_slot_is_a_conflict() {
        let store = InMemoryStore::new();
        let course = seed_course(&store, "CSC204").await;

        store
            .add_timetable_slot(NewTimetableSlot {
                course_id: course.id,
                day: campuserp_academics::Weekday::Monday,
                starts_at: "09:00:00".parse().unwrap(),
                ends_at: "11:00:00".parse().unwrap(),
                room: "LT1".to_string(),
            })
            .await
            .unwrap();

        let err = store
            .add_timetable_slot(NewTimetableSlot {
                course_id: course.id,
                day: campuserp_academics::Weekday::Monday,
                starts_at: "10:00:00".parse().unwrap(),
                ends_at: "12:00:00".parse().unwrap(),
                room: "LT1".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn payment_updates_invoice_atomically() {
        let store = InMemoryStore::new();
        let student = seed_student(&store, "REG005").await;
        let invoice = store
            .create_invoice(NewInvoice {
                student_id: student.id,
                reference: "INV-0001".to_string(),
                description: "Tuition".to_string(),
                amount: 500,
                due_date: "2026-01-31".parse().unwrap(),
            })
            .await
            .unwrap();

        let (invoice, payment) = store
            .record_payment(invoice.id, 200, PaymentMethod::Transfer, Utc::now())
            .await
            .unwrap();
        assert_eq!(invoice.amount_paid, 200);
        assert_eq!(payment.amount, 200);

        // Overpayment is rejected and leaves no payment row behind.
        let err = store
            .record_payment(invoice.id, 400, PaymentMethod::Cash, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        let payments = store.list_payments_for_student(student.id).await.unwrap();
        assert_eq!(payments.len(), 1);
    }
}
