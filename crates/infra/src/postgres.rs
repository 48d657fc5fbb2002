//! Postgres-backed stores for the identity and people tables.
//!
//! Duplicate keys surface as `Conflict` (unique-violation 23505), missing
//! rows as `NotFound`, and anything else is logged and mapped to `Internal`
//! so no driver detail leaks past the store boundary. Read-modify-write
//! updates run inside a transaction with `FOR UPDATE` row locks.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use campuserp_auth::{NewUserAccount, Role, UserAccount, UserAccountUpdate};
use campuserp_core::{DomainError, DomainResult, StaffId, StudentId, UserId};
use campuserp_people::{
    NewStaff, NewStudent, Staff, StaffStatus, StaffUpdate, Student, StudentContactUpdate,
    StudentStatus, StudentUpdate,
};

use crate::repos::{IdentityRepo, PeopleRepo};

fn map_sqlx_error(op: &str, err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some("23505") {
            return DomainError::conflict("duplicate key");
        }
    }
    tracing::error!(operation = op, error = %err, "database operation failed");
    DomainError::internal(format!("database operation failed: {op}"))
}

fn parse_role(raw: &str) -> DomainResult<Role> {
    Role::parse(raw).ok_or_else(|| DomainError::internal(format!("unknown role in store: {raw}")))
}

fn decode_status<T: serde::de::DeserializeOwned>(raw: String) -> DomainResult<T> {
    serde_json::from_value(serde_json::Value::String(raw.clone()))
        .map_err(|_| DomainError::internal(format!("unknown status in store: {raw}")))
}

fn encode_status<T: serde::Serialize>(status: &T) -> String {
    match serde_json::to_value(status) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

/// `users` table.
#[derive(Debug, Clone)]
pub struct PostgresIdentityStore {
    pool: Arc<PgPool>,
}

impl PostgresIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the backing table when it does not exist yet.
    pub async fn ensure_schema(&self) -> DomainResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                display_name TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema(users)", e))?;
        Ok(())
    }

    fn row_to_user(row: &PgRow) -> DomainResult<UserAccount> {
        Ok(UserAccount {
            id: UserId::from_uuid(row.get::<Uuid, _>("id")),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            role: parse_role(row.get::<String, _>("role").as_str())?,
            display_name: row.get("display_name"),
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl IdentityRepo for PostgresIdentityStore {
    async fn create_user(&self, new: NewUserAccount) -> DomainResult<UserAccount> {
        let account = UserAccount::create(new, Utc::now())?;
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, display_name, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(&account.display_name)
        .bind(account.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_user", e))?;
        Ok(account)
    }

    async fn find_user_by_email(&self, email: &str) -> DomainResult<Option<UserAccount>> {
        let email = email.trim().to_lowercase();
        let row = sqlx::query("SELECT * FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user_by_email", e))?;
        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn get_user(&self, id: UserId) -> DomainResult<UserAccount> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_user", e))?
            .ok_or_else(|| DomainError::not_found("user not found"))?;
        Self::row_to_user(&row)
    }

    async fn list_users(&self) -> DomainResult<Vec<UserAccount>> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_users", e))?;
        rows.iter().map(Self::row_to_user).collect()
    }

    async fn update_user(
        &self,
        id: UserId,
        update: UserAccountUpdate,
    ) -> DomainResult<UserAccount> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("update_user", e))?;
        let row = sqlx::query("SELECT * FROM users WHERE id = $1 FOR UPDATE")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_user", e))?
            .ok_or_else(|| DomainError::not_found("user not found"))?;
        let mut account = Self::row_to_user(&row)?;
        account.apply_update(update)?;
        sqlx::query(
            r#"
            UPDATE users
            SET email = $2, password_hash = $3, role = $4, display_name = $5
            WHERE id = $1
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(&account.display_name)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_user", e))?;
        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("update_user", e))?;
        Ok(account)
    }

    async fn delete_user(&self, id: UserId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_user", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("user not found"));
        }
        Ok(())
    }
}

/// `students` and `staff` tables.
#[derive(Debug, Clone)]
pub struct PostgresPeopleStore {
    pool: Arc<PgPool>,
}

impl PostgresPeopleStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn ensure_schema(&self) -> DomainResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS students (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL UNIQUE,
                reg_no TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL,
                program_id UUID,
                level SMALLINT NOT NULL,
                phone TEXT,
                address TEXT,
                status TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema(students)", e))?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS staff (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL UNIQUE,
                staff_no TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL,
                department TEXT NOT NULL,
                designation TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema(staff)", e))?;
        Ok(())
    }

    fn row_to_student(row: &PgRow) -> DomainResult<Student> {
        Ok(Student {
            id: StudentId::from_uuid(row.get::<Uuid, _>("id")),
            user_id: UserId::from_uuid(row.get::<Uuid, _>("user_id")),
            reg_no: row.get("reg_no"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            email: row.get("email"),
            program_id: row
                .get::<Option<Uuid>, _>("program_id")
                .map(campuserp_core::ProgramId::from_uuid),
            level: row.get::<i16, _>("level") as u16,
            phone: row.get("phone"),
            address: row.get("address"),
            status: decode_status::<StudentStatus>(row.get("status"))?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    fn row_to_staff(row: &PgRow) -> DomainResult<Staff> {
        Ok(Staff {
            id: StaffId::from_uuid(row.get::<Uuid, _>("id")),
            user_id: UserId::from_uuid(row.get::<Uuid, _>("user_id")),
            staff_no: row.get("staff_no"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            email: row.get("email"),
            department: row.get("department"),
            designation: row.get("designation"),
            status: decode_status::<StaffStatus>(row.get("status"))?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    async fn write_student(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        student: &Student,
    ) -> DomainResult<()> {
        sqlx::query(
            r#"
            UPDATE students
            SET first_name = $2, last_name = $3, email = $4, program_id = $5,
                level = $6, phone = $7, address = $8, status = $9, updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(student.id.as_uuid())
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(&student.email)
        .bind(student.program_id.map(Uuid::from))
        .bind(student.level as i16)
        .bind(&student.phone)
        .bind(&student.address)
        .bind(encode_status(&student.status))
        .bind(student.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("write_student", e))?;
        Ok(())
    }
}

#[async_trait]
impl PeopleRepo for PostgresPeopleStore {
    async fn create_student(&self, new: NewStudent) -> DomainResult<Student> {
        let student = Student::create(new, Utc::now())?;
        sqlx::query(
            r#"
            INSERT INTO students
                (id, user_id, reg_no, first_name, last_name, email, program_id,
                 level, phone, address, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(student.id.as_uuid())
        .bind(student.user_id.as_uuid())
        .bind(&student.reg_no)
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(&student.email)
        .bind(student.program_id.map(Uuid::from))
        .bind(student.level as i16)
        .bind(&student.phone)
        .bind(&student.address)
        .bind(encode_status(&student.status))
        .bind(student.created_at)
        .bind(student.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_student", e))?;
        Ok(student)
    }

    async fn get_student(&self, id: StudentId) -> DomainResult<Student> {
        let row = sqlx::query("SELECT * FROM students WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_student", e))?
            .ok_or_else(|| DomainError::not_found("student not found"))?;
        Self::row_to_student(&row)
    }

    async fn list_students(&self) -> DomainResult<Vec<Student>> {
        let rows = sqlx::query("SELECT * FROM students ORDER BY reg_no")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_students", e))?;
        rows.iter().map(Self::row_to_student).collect()
    }

    async fn update_student(&self, id: StudentId, update: StudentUpdate) -> DomainResult<Student> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("update_student", e))?;
        let row = sqlx::query("SELECT * FROM students WHERE id = $1 FOR UPDATE")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_student", e))?
            .ok_or_else(|| DomainError::not_found("student not found"))?;
        let mut student = Self::row_to_student(&row)?;
        student.apply_update(update, Utc::now())?;
        self.write_student(&mut tx, &student).await?;
        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("update_student", e))?;
        Ok(student)
    }

    async fn update_student_contact(
        &self,
        id: StudentId,
        update: StudentContactUpdate,
    ) -> DomainResult<Student> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("update_student_contact", e))?;
        let row = sqlx::query("SELECT * FROM students WHERE id = $1 FOR UPDATE")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_student_contact", e))?
            .ok_or_else(|| DomainError::not_found("student not found"))?;
        let mut student = Self::row_to_student(&row)?;
        student.apply_contact_update(update, Utc::now())?;
        self.write_student(&mut tx, &student).await?;
        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("update_student_contact", e))?;
        Ok(student)
    }

    async fn delete_student(&self, id: StudentId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_student", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("student not found"));
        }
        Ok(())
    }

    async fn find_student_by_user(&self, user_id: UserId) -> DomainResult<Option<Student>> {
        let row = sqlx::query("SELECT * FROM students WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_student_by_user", e))?;
        row.as_ref().map(Self::row_to_student).transpose()
    }

    async fn create_staff(&self, new: NewStaff) -> DomainResult<Staff> {
        let staff = Staff::create(new, Utc::now())?;
        sqlx::query(
            r#"
            INSERT INTO staff
                (id, user_id, staff_no, first_name, last_name, email,
                 department, designation, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(staff.id.as_uuid())
        .bind(staff.user_id.as_uuid())
        .bind(&staff.staff_no)
        .bind(&staff.first_name)
        .bind(&staff.last_name)
        .bind(&staff.email)
        .bind(&staff.department)
        .bind(&staff.designation)
        .bind(encode_status(&staff.status))
        .bind(staff.created_at)
        .bind(staff.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_staff", e))?;
        Ok(staff)
    }

    async fn get_staff(&self, id: StaffId) -> DomainResult<Staff> {
        let row = sqlx::query("SELECT * FROM staff WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_staff", e))?
            .ok_or_else(|| DomainError::not_found("staff not found"))?;
        Self::row_to_staff(&row)
    }

    async fn list_staff(&self) -> DomainResult<Vec<Staff>> {
        let rows = sqlx::query("SELECT * FROM staff ORDER BY staff_no")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_staff", e))?;
        rows.iter().map(Self::row_to_staff).collect()
    }

    async fn update_staff(&self, id: StaffId, update: StaffUpdate) -> DomainResult<Staff> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("update_staff", e))?;
        let row = sqlx::query("SELECT * FROM staff WHERE id = $1 FOR UPDATE")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_staff", e))?
            .ok_or_else(|| DomainError::not_found("staff not found"))?;
        let mut staff = Self::row_to_staff(&row)?;
        staff.apply_update(update, Utc::now())?;
        sqlx::query(
            r#"
            UPDATE staff
            SET first_name = $2, last_name = $3, email = $4, department = $5,
                designation = $6, status = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(staff.id.as_uuid())
        .bind(&staff.first_name)
        .bind(&staff.last_name)
        .bind(&staff.email)
        .bind(&staff.department)
        .bind(&staff.designation)
        .bind(encode_status(&staff.status))
        .bind(staff.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_staff", e))?;
        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("update_staff", e))?;
        Ok(staff)
    }

    async fn delete_staff(&self, id: StaffId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM staff WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_staff", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("staff not found"));
        }
        Ok(())
    }

    async fn find_staff_by_user(&self, user_id: UserId) -> DomainResult<Option<Staff>> {
        let row = sqlx::query("SELECT * FROM staff WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_staff_by_user", e))?;
        row.as_ref().map(Self::row_to_staff).transpose()
    }
}
