//! Request/response DTOs and JSON mapping helpers.

use serde::Deserialize;
use serde_json::{json, Value};

use campuserp_academics::EnrollmentId;
use campuserp_auth::{Role, UserAccount};
use campuserp_billing::PaymentMethod;
use campuserp_core::StudentId;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub display_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnrollBatchRequest {
    pub student_ids: Vec<StudentId>,
    pub session: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordGradeRequest {
    pub enrollment_id: EnrollmentId,
    pub score: u8,
    /// Replace an existing grade instead of conflicting.
    #[serde(default)]
    pub replace: bool,
}

#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub amount: u64,
    pub method: PaymentMethod,
}

pub fn user_to_json(user: &UserAccount) -> Value {
    json!({
        "id": user.id,
        "email": user.email,
        "role": user.role,
        "display_name": user.display_name,
        "created_at": user.created_at,
    })
}
