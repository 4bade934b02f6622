use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, StatusCode},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        answers::{get_sheet, list_sheets, update_evaluation, upload_sheet},
        auth::{get_profile, login, register, update_profile},
        health::health,
        notes::{create_notes, delete_notes, export_notes, get_notes, list_notes},
        performance::{create_record, export_report, list_records, student_analytics},
        questions::{create_paper, delete_paper, export_paper, get_paper, list_papers},
    },
    rate_limit::rate_limit,
    state::AppState,
};

/// Generous request timeout; generation calls are slow.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // API routes with CORS, body cap, and per-IP rate limiting
    let api_routes = Router::new()
        // Auth routes
        .route("/auth/register", axum::routing::post(register))
        .route("/auth/login", axum::routing::post(login))
        .route("/auth/profile", get(get_profile).put(update_profile))
        // Question paper routes
        .route("/questions", get(list_papers).post(create_paper))
        .route("/questions/{id}", get(get_paper).delete(delete_paper))
        .route("/questions/{id}/export", get(export_paper))
        // Notes routes
        .route("/notes", get(list_notes).post(create_notes))
        .route("/notes/{id}", get(get_notes).delete(delete_notes))
        .route("/notes/{id}/export", get(export_notes))
        // Answer sheet routes
        .route("/answers", get(list_sheets).post(upload_sheet))
        .route("/answers/{id}", get(get_sheet).put(update_evaluation))
        // Performance routes
        .route("/performance", get(list_records).post(create_record))
        .route("/performance/student/{student_id}", get(student_analytics))
        .route("/performance/{id}/export", get(export_report))
        .layer(cors)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    // Main application router
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn authed(mut request: Request<Body>, token: &str) -> Request<Body> {
        request.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        request
    }

    /// Registers a user and returns their bearer token.
    async fn register_user(app: &Router, email: &str, role: &str) -> String {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                serde_json::json!({
                    "name": "Asha",
                    "email": email,
                    "password": "secret1",
                    "role": role,
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        json["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let app = create_app(AppState::default());
        register_user(&app, "asha@example.com", "teacher").await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                serde_json::json!({
                    "email": "asha@example.com",
                    "password": "secret1",
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["user"]["role"], "teacher");
        assert!(json["token"].as_str().is_some());
        assert!(json["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_401() {
        let app = create_app(AppState::default());
        register_user(&app, "asha@example.com", "teacher").await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                serde_json::json!({
                    "email": "asha@example.com",
                    "password": "wrong-password",
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let app = create_app(AppState::default());
        register_user(&app, "asha@example.com", "teacher").await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                serde_json::json!({
                    "name": "Other",
                    "email": "Asha@Example.com",
                    "password": "secret2",
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_profile_requires_token() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/auth/profile")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_profile() {
        let app = create_app(AppState::default());
        let token = register_user(&app, "asha@example.com", "teacher").await;

        let response = app
            .oneshot(authed(
                json_request(
                    "PUT",
                    "/api/auth/profile",
                    serde_json::json!({
                        "name": "Asha Rao",
                        "subjects": ["Physics"],
                        "classes": [9, 10],
                    }),
                ),
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["user"]["name"], "Asha Rao");
        assert_eq!(json["user"]["classes"], serde_json::json!([9, 10]));
    }

    #[tokio::test]
    async fn test_student_cannot_create_paper() {
        let app = create_app(AppState::default());
        let token = register_user(&app, "student@example.com", "student").await;

        let response = app
            .oneshot(authed(
                json_request(
                    "POST",
                    "/api/questions",
                    serde_json::json!({
                        "board": "CBSE",
                        "class": 9,
                        "subject": "Mathematics",
                        "chapter": "Polynomials",
                        "difficulty": "medium",
                    }),
                ),
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_generate_list_and_export_paper() {
        let app = create_app(AppState::default());
        let token = register_user(&app, "asha@example.com", "teacher").await;

        // Generate (mock completions: 1+2+5 marks)
        let response = app
            .clone()
            .oneshot(authed(
                json_request(
                    "POST",
                    "/api/questions",
                    serde_json::json!({
                        "board": "CBSE",
                        "class": 9,
                        "subject": "Mathematics",
                        "chapter": "Polynomials",
                        "difficulty": "medium",
                    }),
                ),
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        let paper = &json["questionPaper"];
        assert_eq!(paper["total_marks"], 8);
        assert_eq!(paper["class"], 9);
        let paper_id = paper["id"].as_str().unwrap().to_string();

        // List
        let response = app
            .clone()
            .oneshot(authed(
                Request::builder()
                    .uri("/api/questions?page=1&limit=10")
                    .body(Body::empty())
                    .unwrap(),
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["pagination"]["total"], 1);
        assert_eq!(json["pagination"]["pages"], 1);
        assert_eq!(json["questionPapers"].as_array().unwrap().len(), 1);

        // Export
        let response = app
            .oneshot(authed(
                Request::builder()
                    .uri(format!("/api/questions/{paper_id}/export"))
                    .body(Body::empty())
                    .unwrap(),
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE.as_str()],
            "application/pdf"
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_get_missing_paper_is_404() {
        let app = create_app(AppState::default());
        let token = register_user(&app, "asha@example.com", "teacher").await;

        let response = app
            .oneshot(authed(
                Request::builder()
                    .uri(format!("/api/questions/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_generate_and_delete_notes() {
        let app = create_app(AppState::default());
        let token = register_user(&app, "asha@example.com", "teacher").await;

        let response = app
            .clone()
            .oneshot(authed(
                json_request(
                    "POST",
                    "/api/notes",
                    serde_json::json!({
                        "board": "CBSE",
                        "class": 8,
                        "subject": "Science",
                        "chapter": "Cells",
                        "language": "en",
                    }),
                ),
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        let notes_id = json["notes"]["id"].as_str().unwrap().to_string();
        assert!(json["notes"]["content"].as_str().unwrap().contains("Cells"));

        let response = app
            .clone()
            .oneshot(authed(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/notes/{notes_id}"))
                    .body(Body::empty())
                    .unwrap(),
                &token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Gone afterwards.
        let response = app
            .oneshot(authed(
                Request::builder()
                    .uri(format!("/api/notes/{notes_id}"))
                    .body(Body::empty())
                    .unwrap(),
                &token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_record_performance_and_analytics() {
        let app = create_app(AppState::default());
        let token = register_user(&app, "asha@example.com", "teacher").await;
        let student_id = Uuid::new_v4();

        for (test_name, obtained, topics) in [
            ("Unit test 1", 80.0, serde_json::json!([{"topic": "math", "marks": 80.0, "total": 100.0}])),
            ("Unit test 2", 60.0, serde_json::json!([{"topic": "math", "marks": 20.0, "total": 20.0}])),
        ] {
            let response = app
                .clone()
                .oneshot(authed(
                    json_request(
                        "POST",
                        "/api/performance",
                        serde_json::json!({
                            "student_id": student_id,
                            "subject": "Mathematics",
                            "test_name": test_name,
                            "marks_obtained": obtained,
                            "total_marks": 100.0,
                            "topic_wise_performance": topics,
                        }),
                    ),
                    &token,
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .oneshot(authed(
                Request::builder()
                    .uri(format!("/api/performance/student/{student_id}"))
                    .body(Body::empty())
                    .unwrap(),
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["total_tests"], 2);
        assert_eq!(json["average_percentage"], 70.0);
        assert_eq!(json["strong_topics"][0]["topic"], "math");
        assert_eq!(json["strong_topics"][0]["percentage"], 83.33);
        assert_eq!(json["progress"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_analytics_for_unknown_student_is_empty() {
        let app = create_app(AppState::default());
        let token = register_user(&app, "asha@example.com", "teacher").await;

        let response = app
            .oneshot(authed(
                Request::builder()
                    .uri(format!("/api/performance/student/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["total_tests"], 0);
        assert_eq!(json["average_percentage"], 0.0);
        assert_eq!(json["progress"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_upload_answer_sheet_and_update_evaluation() {
        let app = create_app(AppState::default());
        let token = register_user(&app, "asha@example.com", "teacher").await;
        let student_id = Uuid::new_v4();

        let boundary = "gurukul-test-boundary";
        let mut body = String::new();
        for (name, value) in [
            ("student_id", student_id.to_string()),
            ("subject", "Biology".to_string()),
            ("question", "What is the powerhouse of the cell?".to_string()),
            ("model_answer", "The mitochondria.".to_string()),
            ("total_marks", "10".to_string()),
        ] {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"answer_sheet\"; \
             filename=\"scan.png\"\r\nContent-Type: image/png\r\n\r\nfake-png-bytes\r\n\
             --{boundary}--\r\n"
        ));

        let response = app
            .clone()
            .oneshot(authed(
                Request::builder()
                    .method("POST")
                    .uri("/api/answers")
                    .header(
                        "Content-Type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["ocr_confidence"], 87.5);
        let sheet = &json["answerSheet"];
        assert_eq!(sheet["status"], "checked");
        assert_eq!(sheet["evaluation"]["marks"], 5.0);
        let sheet_id = sheet["id"].as_str().unwrap().to_string();

        // Manual override of the evaluation.
        let response = app
            .clone()
            .oneshot(authed(
                json_request(
                    "PUT",
                    &format!("/api/answers/{sheet_id}"),
                    serde_json::json!({
                        "marks": 8.0,
                        "feedback": "Better than the model thought.",
                        "topic_mistakes": ["Organelles"],
                    }),
                ),
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["answerSheet"]["evaluation"]["marks"], 8.0);

        // Listing with the checked filter finds it.
        let response = app
            .oneshot(authed(
                Request::builder()
                    .uri("/api/answers?status=checked")
                    .body(Body::empty())
                    .unwrap(),
                &token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn test_upload_without_file_is_400() {
        let app = create_app(AppState::default());
        let token = register_user(&app, "asha@example.com", "teacher").await;

        let boundary = "gurukul-test-boundary";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"subject\"\r\n\r\nBiology\r\n\
             --{boundary}--\r\n"
        );

        let response = app
            .oneshot(authed(
                Request::builder()
                    .method("POST")
                    .uri("/api/answers")
                    .header(
                        "Content-Type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "No file uploaded");
    }

    #[tokio::test]
    async fn test_malformed_completion_is_502() {
        use crate::services::MockCompletions;
        use std::sync::Arc;

        let mut state = AppState::default();
        state.completions = Arc::new(MockCompletions { malformed: true });
        let app = create_app(state);
        let token = register_user(&app, "asha@example.com", "teacher").await;

        let response = app
            .oneshot(authed(
                json_request(
                    "POST",
                    "/api/questions",
                    serde_json::json!({
                        "board": "CBSE",
                        "class": 9,
                        "subject": "Mathematics",
                        "chapter": "Polynomials",
                        "difficulty": "medium",
                    }),
                ),
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains("malformed completion"));
    }

    #[tokio::test]
    async fn test_invalid_payload_is_400() {
        let app = create_app(AppState::default());
        let token = register_user(&app, "asha@example.com", "teacher").await;

        // Class 5 is below the supported range.
        let response = app
            .oneshot(authed(
                json_request(
                    "POST",
                    "/api/questions",
                    serde_json::json!({
                        "board": "CBSE",
                        "class": 5,
                        "subject": "Mathematics",
                        "chapter": "Numbers",
                        "difficulty": "easy",
                    }),
                ),
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
