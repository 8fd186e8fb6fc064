use std::env;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use rand::Rng;
use sqlx::{PgPool, Row};
use tower::ServiceExt;

// Full intake and verification flow against a live database. Skipped
// when DATABASE_URL is not provided.
async fn setup_app() -> Option<(Router, PgPool)> {
    dotenvy::dotenv().ok();
    let Ok(_) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping intake flow tests");
        return None;
    };

    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("PUBLIC_BASE_URL", "http://localhost:8080");
    env::set_var(
        "UPLOADS_DIR",
        std::env::temp_dir()
            .join("intake-test-uploads")
            .to_string_lossy()
            .to_string(),
    );
    env::set_var("ADMIN_EMAIL", "admin@example.com");
    env::set_var("ADMIN_API_KEY", "test_admin_key");
    env::set_var("PUBLIC_RPS", "100");

    let _ = intake_backend::config::init_config();

    let pool = intake_backend::database::pool::create_pool()
        .await
        .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    let state = intake_backend::AppState::new(pool.clone());
    let app = Router::new()
        .route(
            "/api/applicants",
            post(intake_backend::routes::applicant_routes::submit_application),
        )
        .route(
            "/api/verify-email",
            get(intake_backend::routes::verification_routes::verify_email),
        )
        .with_state(state);

    Some((app, pool))
}

fn random_phone() -> String {
    let digits: u64 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("(3{:02}) {:03}-{:04}", digits % 100, (digits / 100) % 1000, digits % 10_000)
}

const BOUNDARY: &str = "intake-test-boundary";

fn text_part(body: &mut Vec<u8>, name: &str, value: &str) {
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            BOUNDARY, name, value
        )
        .as_bytes(),
    );
}

fn file_part(body: &mut Vec<u8>, name: &str, filename: &str, mime: &str, data: &[u8]) {
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            BOUNDARY, name, filename, mime
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
}

fn submission_body(phone: &str, email: &str) -> Vec<u8> {
    let mut body = Vec::new();
    text_part(&mut body, "full_name", "Jane Doe");
    text_part(&mut body, "email", email);
    text_part(&mut body, "email_confirmed", email);
    text_part(&mut body, "phone", phone);
    text_part(&mut body, "position", "Administrative");
    text_part(&mut body, "experience_years", "3");
    text_part(&mut body, "utm_source", "test-suite");
    file_part(
        &mut body,
        "resume",
        "resume.pdf",
        "application/pdf",
        b"%PDF-1.4 fake resume content",
    );
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn submit_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/applicants")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn end_to_end_intake_and_verification() {
    let Some((app, pool)) = setup_app().await else {
        return;
    };

    let phone = random_phone();
    let normalized: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    let email = format!("jane+{}@x.com", normalized);

    let resp = app
        .clone()
        .oneshot(submit_request(submission_body(&phone, &email)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["status"].as_str(), Some("new"));

    let row = sqlx::query(
        "SELECT phone_normalized, status, email_verified, email_verification_token, token_expiry \
         FROM applicants WHERE email = $1",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .expect("applicant row");
    assert_eq!(row.get::<String, _>("phone_normalized"), normalized);
    assert_eq!(row.get::<String, _>("status"), "new");
    assert!(!row.get::<bool, _>("email_verified"));
    let token: Option<String> = row.get("email_verification_token");
    let token = token.expect("token should be set before verification");
    assert!(row.get::<Option<chrono::DateTime<chrono::Utc>>, _>("token_expiry").is_some());

    // One verification log row, not yet consumed.
    let log = sqlx::query("SELECT verified_at FROM email_verification_log WHERE token = $1")
        .bind(&token)
        .fetch_one(&pool)
        .await
        .expect("verification log row");
    assert!(log
        .get::<Option<chrono::DateTime<chrono::Utc>>, _>("verified_at")
        .is_none());

    // Fresh token: success, flag flipped, token pair nulled.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/verify-email?token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let verified = body_json(resp).await;
    assert_eq!(verified["state"].as_str(), Some("success"));

    let row = sqlx::query(
        "SELECT email_verified, email_verification_token, token_expiry \
         FROM applicants WHERE email = $1",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(row.get::<bool, _>("email_verified"));
    assert!(row.get::<Option<String>, _>("email_verification_token").is_none());
    assert!(row.get::<Option<chrono::DateTime<chrono::Utc>>, _>("token_expiry").is_none());

    let first_stamp: chrono::DateTime<chrono::Utc> =
        sqlx::query("SELECT verified_at FROM email_verification_log WHERE token = $1")
            .bind(&token)
            .fetch_one(&pool)
            .await
            .unwrap()
            .get::<Option<chrono::DateTime<chrono::Utc>>, _>("verified_at")
            .expect("verified_at stamped");

    // Re-visiting the same link is idempotent.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/verify-email?token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let revisited = body_json(resp).await;
    assert_eq!(revisited["state"].as_str(), Some("already_verified"));

    let second_stamp: chrono::DateTime<chrono::Utc> =
        sqlx::query("SELECT verified_at FROM email_verification_log WHERE token = $1")
            .bind(&token)
            .fetch_one(&pool)
            .await
            .unwrap()
            .get::<Option<chrono::DateTime<chrono::Utc>>, _>("verified_at")
            .expect("verified_at still stamped");
    assert_eq!(first_stamp, second_stamp);
}

#[tokio::test]
async fn duplicate_phone_submission_returns_existing_summary() {
    let Some((app, pool)) = setup_app().await else {
        return;
    };

    let phone = random_phone();
    let normalized: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    let email = format!("first+{}@x.com", normalized);

    let resp = app
        .clone()
        .oneshot(submit_request(submission_body(&phone, &email)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Same phone, differently formatted, different email.
    let reformatted = format!("+{} ", normalized);
    let second_email = format!("second+{}@x.com", normalized);
    let resp = app
        .clone()
        .oneshot(submit_request(submission_body(&reformatted, &second_email)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let conflict = body_json(resp).await;
    assert_eq!(conflict["error"].as_str(), Some("duplicate_applicant"));
    assert_eq!(conflict["existing"]["email"].as_str(), Some(email.as_str()));

    let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM applicants WHERE phone_normalized = $1")
        .bind(&normalized)
        .fetch_one(&pool)
        .await
        .unwrap()
        .get("n");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn unknown_token_yields_error_state() {
    let Some((app, _pool)) = setup_app().await else {
        return;
    };

    let resp = app
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/api/verify-email?token={}",
                    "0".repeat(64)
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["state"].as_str(), Some("error"));
}

#[tokio::test]
async fn invalid_form_reports_field_errors() {
    let Some((app, _pool)) = setup_app().await else {
        return;
    };

    let mut body = Vec::new();
    text_part(&mut body, "full_name", "J");
    text_part(&mut body, "email", "not-an-email");
    text_part(&mut body, "email_confirmed", "other");
    text_part(&mut body, "phone", "12345");
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    let resp = app.oneshot(submit_request(body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json = body_json(resp).await;
    assert_eq!(json["error"].as_str(), Some("validation_failed"));
    let fields: Vec<&str> = json["fields"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f["field"].as_str())
        .collect();
    assert!(fields.contains(&"full_name"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"phone"));
    assert!(fields.contains(&"resume"));
}
