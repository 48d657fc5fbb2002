use std::sync::Arc;

use chrono::Utc;
use reqwest::StatusCode;
use serde_json::json;

use campuserp_api::app::services::AppServices;
use campuserp_auth::{
    hash_password_with_cost, NewUserAccount, Principal, Role, SessionCodec, UserAccount,
};
use campuserp_people::{NewStaff, NewStudent, Staff, Student};

const SECRET: &str = "black-box-test-secret";

struct TestServer {
    base_url: String,
    services: Arc<AppServices>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory stores, ephemeral port.
        let codec = SessionCodec::new(SECRET).unwrap();
        let services = Arc::new(AppServices::in_memory(codec));
        let app = campuserp_api::app::build_app_with_services(services.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            services,
            handle,
        }
    }

    async fn seed_user(&self, email: &str, password: &str, role: Role) -> UserAccount {
        // Low bcrypt cost keeps the suite fast.
        let hash = hash_password_with_cost(password, 4).unwrap();
        self.services
            .identity
            .create_user(NewUserAccount {
                email: email.to_string(),
                password_hash: hash,
                role,
                display_name: email.to_string(),
            })
            .await
            .unwrap()
    }

    async fn seed_student(&self, user: &UserAccount, reg_no: &str) -> Student {
        self.services
            .people
            .create_student(NewStudent {
                user_id: user.id,
                reg_no: reg_no.to_string(),
                first_name: "Ada".to_string(),
                last_name: "Obi".to_string(),
                email: user.email.clone(),
                program_id: None,
                level: 200,
            })
            .await
            .unwrap()
    }

    async fn seed_staff(&self, user: &UserAccount, staff_no: &str) -> Staff {
        self.services
            .people
            .create_staff(NewStaff {
                user_id: user.id,
                staff_no: staff_no.to_string(),
                first_name: "Bola".to_string(),
                last_name: "Ade".to_string(),
                email: user.email.clone(),
                department: "Computing".to_string(),
                designation: "Lecturer I".to_string(),
            })
            .await
            .unwrap()
    }

    fn token_for(&self, user: &UserAccount) -> String {
        self.services
            .codec
            .issue(&Principal {
                user_id: user.id,
                email: user.email.clone(),
                role: user.role,
            })
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A structurally valid token whose expiry is already in the past.
fn mint_expired_token(user: &UserAccount) -> String {
    #[derive(serde::Serialize)]
    struct Claims {
        sub: String,
        email: String,
        role: String,
        iat: i64,
        exp: i64,
    }
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        iat: now - 3600,
        exp: now - 1800,
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn login_returns_token_and_sets_cookie() {
    let srv = TestServer::spawn().await;
    srv.seed_user("admin@example.edu", "correct horse", Role::Admin)
        .await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "admin@example.edu", "password": "correct horse" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .expect("login must set the session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    let body: serde_json::Value = res.json().await.unwrap();
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
async fn login_with_wrong_password_is_uniform_401() {
    let srv = TestServer::spawn().await;
    srv.seed_user("admin@example.edu", "correct horse", Role::Admin)
        .await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "admin@example.edu", "password": "wrong" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get(reqwest::header::SET_COOKIE).is_none());
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid credentials" }));

    // Unknown email must be indistinguishable.
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "nobody@example.edu", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid credentials" }));
}

#[tokio::test]
async fn malformed_login_body_is_a_validation_error() {
    let srv = TestServer::spawn().await;
    srv.seed_user("admin@example.edu", "correct horse", Role::Admin)
        .await;

    // Missing field: a shape problem must answer 400, not 422.
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "admin@example.edu" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    // Non-JSON body likewise.
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .body("email=admin@example.edu")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/students", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Health stays public.
    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_role_is_forbidden_not_an_error() {
    let srv = TestServer::spawn().await;
    let lecturer = srv
        .seed_user("lect@example.edu", "pw-lecturer", Role::Lecturer)
        .await;
    let token = srv.token_for(&lecturer);

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/students", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn only_admin_may_patch_users() {
    let srv = TestServer::spawn().await;
    let admin = srv.seed_user("admin@example.edu", "pw-admin", Role::Admin).await;
    let registrar = srv
        .seed_user("reg@example.edu", "pw-registrar", Role::Registrar)
        .await;

    let client = reqwest::Client::new();
    let url = format!("{}/users/{}", srv.base_url, registrar.id);

    let res = client
        .patch(&url)
        .bearer_auth(srv.token_for(&admin))
        .json(&json!({ "display_name": "Registry Office" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["display_name"], "Registry Office");

    let res = client
        .patch(&url)
        .bearer_auth(srv.token_for(&registrar))
        .json(&json!({ "display_name": "Sneaky" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let srv = TestServer::spawn().await;
    let user = srv
        .seed_user("stud@example.edu", "pw-student", Role::Student)
        .await;
    srv.seed_student(&user, "REG100").await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/students/me", srv.base_url))
        .bearer_auth(mint_expired_token(&user))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn self_scoped_update_only_touches_own_row() {
    let srv = TestServer::spawn().await;
    let user_a = srv.seed_user("a@example.edu", "pw-a-student", Role::Student).await;
    let user_b = srv.seed_user("b@example.edu", "pw-b-student", Role::Student).await;
    let a = srv.seed_student(&user_a, "REG200").await;
    let b = srv.seed_student(&user_b, "REG201").await;

    // Foreign id and admin-only fields in the payload must be ignored; the
    // target row comes from the caller's own profile.
    let client = reqwest::Client::new();
    let res = client
        .patch(format!("{}/students/me", srv.base_url))
        .bearer_auth(srv.token_for(&user_a))
        .json(&json!({
            "id": b.id,
            "phone": "+2348000000000",
            "status": "graduated",
            "level": 900,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["id"], json!(a.id));
    assert_eq!(body["phone"], "+2348000000000");
    assert_eq!(body["status"], "active");
    assert_eq!(body["level"], 200);

    let b_after = srv.services.people.get_student(b.id).await.unwrap();
    assert_eq!(b_after.phone, None);
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let srv = TestServer::spawn().await;
    srv.seed_user("admin@example.edu", "pw-admin", Role::Admin)
        .await;

    let client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap();

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "admin@example.edu", "password": "pw-admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/auth/logout", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn batch_enrollment_is_atomic_over_http() {
    let srv = TestServer::spawn().await;
    let registrar = srv
        .seed_user("reg@example.edu", "pw-registrar", Role::Registrar)
        .await;
    let token = srv.token_for(&registrar);

    let user_a = srv.seed_user("a@example.edu", "pw-a-student", Role::Student).await;
    let user_b = srv.seed_user("b@example.edu", "pw-b-student", Role::Student).await;
    let a = srv.seed_student(&user_a, "REG300").await;
    let b = srv.seed_student(&user_b, "REG301").await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/programs", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "code": "CSC", "title": "Computer Science",
            "department": "Computing", "duration_years": 4,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let program: serde_json::Value = res.json().await.unwrap();

    let res = client
        .post(format!("{}/courses", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "code": "CSC201", "title": "Data Structures",
            "program_id": program["id"], "lecturer_id": null,
            "semester": "first", "credit_units": 3,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let course: serde_json::Value = res.json().await.unwrap();
    let enroll_url = format!("{}/courses/{}/enrollments", srv.base_url, course["id"].as_str().unwrap());

    let res = client
        .post(&enroll_url)
        .bearer_auth(&token)
        .json(&json!({ "student_ids": [a.id], "session": "2025/2026" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // `a` is already enrolled, so the second batch must fail whole.
    let res = client
        .post(&enroll_url)
        .bearer_auth(&token)
        .json(&json!({ "student_ids": [b.id, a.id], "session": "2025/2026" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .get(&enroll_url)
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn lecturer_can_only_grade_their_own_course() {
    let srv = TestServer::spawn().await;
    let registrar = srv
        .seed_user("reg@example.edu", "pw-registrar", Role::Registrar)
        .await;
    let reg_token = srv.token_for(&registrar);

    let owner_user = srv
        .seed_user("owner@example.edu", "pw-owner", Role::Lecturer)
        .await;
    let other_user = srv
        .seed_user("other@example.edu", "pw-other", Role::Lecturer)
        .await;
    let owner = srv.seed_staff(&owner_user, "STF100").await;
    srv.seed_staff(&other_user, "STF101").await;

    let student_user = srv.seed_user("s@example.edu", "pw-s-student", Role::Student).await;
    let student = srv.seed_student(&student_user, "REG400").await;

    let client = reqwest::Client::new();
    let program: serde_json::Value = client
        .post(format!("{}/programs", srv.base_url))
        .bearer_auth(&reg_token)
        .json(&json!({
            "code": "MTH", "title": "Mathematics",
            "department": "Science", "duration_years": 4,
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let course: serde_json::Value = client
        .post(format!("{}/courses", srv.base_url))
        .bearer_auth(&reg_token)
        .json(&json!({
            "code": "MTH101", "title": "Calculus",
            "program_id": program["id"], "lecturer_id": owner.id,
            "semester": "first", "credit_units": 4,
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let course_id = course["id"].as_str().unwrap();

    let res = client
        .post(format!("{}/courses/{}/enrollments", srv.base_url, course_id))
        .bearer_auth(&reg_token)
        .json(&json!({ "student_ids": [student.id], "session": "2025/2026" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let enrollments: serde_json::Value = res.json().await.unwrap();
    let enrollment_id = enrollments["items"][0]["id"].clone();

    let grade_url = format!("{}/courses/{}/grades", srv.base_url, course_id);

    // Not the assigned lecturer: forbidden.
    let res = client
        .post(&grade_url)
        .bearer_auth(srv.token_for(&other_user))
        .json(&json!({ "enrollment_id": enrollment_id, "score": 80 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // The assigned lecturer records the grade.
    let res = client
        .post(&grade_url)
        .bearer_auth(srv.token_for(&owner_user))
        .json(&json!({ "enrollment_id": enrollment_id, "score": 80 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let grade: serde_json::Value = res.json().await.unwrap();
    assert_eq!(grade["letter"], "A");

    // The student sees it on their transcript.
    let res = client
        .get(format!("{}/transcripts/me", srv.base_url))
        .bearer_auth(srv.token_for(&student_user))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let transcript: serde_json::Value = res.json().await.unwrap();
    assert_eq!(transcript["gpa"], 5.0);
    assert_eq!(transcript["entries"][0]["course_code"], "MTH101");
}

#[tokio::test]
async fn overpayment_is_rejected() {
    let srv = TestServer::spawn().await;
    let bursar = srv
        .seed_user("bursar@example.edu", "pw-bursar", Role::Accountant)
        .await;
    let token = srv.token_for(&bursar);

    let student_user = srv.seed_user("s@example.edu", "pw-s-student", Role::Student).await;
    let student = srv.seed_student(&student_user, "REG500").await;

    let client = reqwest::Client::new();
    let invoice: serde_json::Value = client
        .post(format!("{}/invoices", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "student_id": student.id,
            "reference": "INV-0001",
            "description": "Tuition",
            "amount": 1000,
            "due_date": "2026-01-31",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let pay_url = format!(
        "{}/invoices/{}/payments",
        srv.base_url,
        invoice["id"].as_str().unwrap()
    );

    let res = client
        .post(&pay_url)
        .bearer_auth(&token)
        .json(&json!({ "amount": 1200, "method": "transfer" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(&pay_url)
        .bearer_auth(&token)
        .json(&json!({ "amount": 400, "method": "transfer" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["invoice"]["status"], "partially_paid");

    // The student sees their own invoice and payment.
    let res = client
        .get(format!("{}/payments/mine", srv.base_url))
        .bearer_auth(srv.token_for(&student_user))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}
