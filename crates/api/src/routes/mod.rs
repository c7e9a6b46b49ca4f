//! HTTP route handlers for the diary API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness check
//! GET    /health/ready                    - Readiness check (store reachable)
//!
//! # Exercise catalog
//! GET    /api/exercises                   - Every exercise
//! GET    /api/exercises/{id}              - One exercise
//!
//! # Diary (requires auth)
//! GET    /api/diary/{date}?page=&limit=   - Caller's entries for a date
//! POST   /api/diary                       - Log an exercise
//! DELETE /api/diary/{date}/{exercise_id}  - Remove one logged exercise
//!
//! # Users (requires auth)
//! GET    /api/users/current               - Caller's account and profile
//! PUT    /api/users/params                - Replace profile parameters
//! PATCH  /api/users/name                  - Rename the caller
//! ```

pub mod diary;
pub mod exercises;
pub mod users;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post, put},
};

use crate::state::AppState;

/// Create the exercise catalog router.
pub fn exercise_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(exercises::index))
        .route("/{id}", get(exercises::show))
}

/// Create the diary router.
pub fn diary_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(diary::create))
        .route("/{date}", get(diary::index))
        .route("/{date}/{exercise_id}", delete(diary::destroy))
}

/// Create the user router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/current", get(users::current))
        .route("/params", put(users::update_params))
        .route("/name", patch(users::update_name))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/exercises", exercise_routes())
        .nest("/api/diary", diary_routes())
        .nest("/api/users", user_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store backend is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.stores().ping().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            tracing::warn!(error = %err, backend = state.stores().backend_name(), "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use chrono::{Datelike, Utc};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use fitness_diary_core::{Email, NewExercise};

    use crate::config::DiaryConfig;
    use crate::db::{MemoryStore, Stores};
    use crate::models::NewUser;
    use crate::state::AppState;

    const ALICE: &str = "alice-token";
    const BOB: &str = "bob-token";

    fn exercise(name: &str) -> NewExercise {
        NewExercise {
            name: name.to_string(),
            body_part: "waist".to_string(),
            target: "abs".to_string(),
            equipment: "body weight".to_string(),
            gif_url: String::new(),
            burned_calories: 220,
            time_minutes: 3,
        }
    }

    async fn test_app() -> Router {
        let store = MemoryStore::with_exercises([exercise("crunch"), exercise("plank")]);
        let stores = Stores::memory(store);
        for (name, email, token) in [
            ("Alice", "alice@example.com", ALICE),
            ("Bob", "bob@example.com", BOB),
        ] {
            stores
                .users
                .create(NewUser {
                    name: name.to_string(),
                    email: Email::parse(email).unwrap(),
                    token: token.to_string(),
                })
                .await
                .unwrap();
        }
        let config = DiaryConfig::in_memory("127.0.0.1".parse().unwrap(), 0);
        crate::app(AppState::new(config, stores))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn entry_body(date: &str, exercise_id: i64) -> Value {
        json!({
            "date": date,
            "exerciseId": exercise_id,
            "durationSecs": 180,
            "calories": 25,
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app().await;
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_with_memory_backend() {
        let app = test_app().await;
        let (status, _) = send(&app, Method::GET, "/health/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_catalog_routes() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::GET, "/api/exercises", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (status, body) = send(&app, Method::GET, "/api/exercises/2", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "plank");
        assert_eq!(body["bodyPart"], "waist");

        let (status, _) = send(&app, Method::GET, "/api/exercises/99", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_diary_requires_auth() {
        let app = test_app().await;

        let (status, _) = send(&app, Method::GET, "/api/diary/2024-03-15", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app,
            Method::GET,
            "/api/diary/2024-03-15",
            Some("wrong-token"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_add_ignores_owner_in_body() {
        let app = test_app().await;
        let mut body = entry_body("2024-03-15", 1);
        body["owner"] = json!(2);

        let (status, created) = send(&app, Method::POST, "/api/diary", Some(ALICE), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["owner"], 1);

        let (_, bobs) = send(&app, Method::GET, "/api/diary/2024-03-15", Some(BOB), None).await;
        assert!(bobs.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_bad_quantities_and_unknown_exercise() {
        let app = test_app().await;

        let mut body = entry_body("2024-03-15", 1);
        body["durationSecs"] = json!(0);
        body["calories"] = json!(-1);
        let (status, errors) = send(&app, Method::POST, "/api/diary", Some(ALICE), Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(errors["errors"].as_array().unwrap().len(), 2);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/diary",
            Some(ALICE),
            Some(entry_body("2024-03-15", 99)),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let app = test_app().await;
        for _ in 0..5 {
            let (status, _) = send(
                &app,
                Method::POST,
                "/api/diary",
                Some(ALICE),
                Some(entry_body("2024-03-15", 1)),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, page) = send(
            &app,
            Method::GET,
            "/api/diary/2024-03-15?page=2&limit=10",
            Some(ALICE),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(page.as_array().unwrap().is_empty());

        let (_, page) = send(
            &app,
            Method::GET,
            "/api/diary/2024-03-15?page=2&limit=2",
            Some(ALICE),
            None,
        )
        .await;
        assert_eq!(page.as_array().unwrap().len(), 2);

        let (status, _) = send(
            &app,
            Method::GET,
            "/api/diary/2024-03-15?page=0",
            Some(ALICE),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(&app, Method::GET, "/api/diary/not-a-date", Some(ALICE), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_is_owner_scoped() {
        let app = test_app().await;
        let (_, first) = send(
            &app,
            Method::POST,
            "/api/diary",
            Some(ALICE),
            Some(entry_body("2024-03-15", 1)),
        )
        .await;
        let (_, second) = send(
            &app,
            Method::POST,
            "/api/diary",
            Some(ALICE),
            Some(entry_body("2024-03-15", 1)),
        )
        .await;
        assert_ne!(first["id"], second["id"]);

        let (status, _) = send(&app, Method::DELETE, "/api/diary/2024-03-15/1", Some(BOB), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) =
            send(&app, Method::DELETE, "/api/diary/2024-03-15/1", Some(ALICE), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Delete success");

        let (_, remaining) =
            send(&app, Method::GET, "/api/diary/2024-03-15", Some(ALICE), None).await;
        let remaining = remaining.as_array().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0]["id"], second["id"]);
    }

    #[tokio::test]
    async fn test_update_params() {
        let app = test_app().await;
        let params = json!({
            "height": 180,
            "currentWeight": 80,
            "desiredWeight": 75,
            "birthday": "1990-05-20",
            "blood": 2,
            "sex": "female",
            "levelActivity": 3,
        });

        let (status, user) =
            send(&app, Method::PUT, "/api/users/params", Some(ALICE), Some(params)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["params"]["sex"], "female");
        assert_eq!(user["params"]["blood"], 2);

        let (status, current) = send(&app, Method::GET, "/api/users/current", Some(ALICE), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(current["email"], "alice@example.com");
        assert_eq!(current["params"]["height"], 180.0);
    }

    #[tokio::test]
    async fn test_update_params_reports_every_violation() {
        let app = test_app().await;
        let today = Utc::now().date_naive();
        let under_age = today
            .with_year(today.year() - 17)
            .unwrap_or_else(|| today - chrono::Days::new(17 * 365));
        let params = json!({
            "height": 149,
            "currentWeight": 80,
            "desiredWeight": 75,
            "birthday": under_age.to_string(),
            "blood": 7,
            "levelActivity": 3,
        });

        let (status, body) =
            send(&app, Method::PUT, "/api/users/params", Some(ALICE), Some(params)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let kinds: Vec<(String, String)> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| {
                (
                    e["field"].as_str().unwrap().to_string(),
                    e["kind"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert!(kinds.contains(&("height".to_string(), "range_violation".to_string())));
        assert!(kinds.contains(&("birthday".to_string(), "minimum_age_violation".to_string())));
        assert!(kinds.contains(&("blood".to_string(), "enum_violation".to_string())));
        assert!(kinds.contains(&("sex".to_string(), "missing_field".to_string())));

        let (_, current) = send(&app, Method::GET, "/api/users/current", Some(ALICE), None).await;
        assert!(current.get("params").is_none_or(Value::is_null));
    }

    #[tokio::test]
    async fn test_update_params_mistyped_fields_are_listed() {
        let app = test_app().await;
        let params = json!({
            "height": 149,
            "currentWeight": 20,
            "desiredWeight": 75,
            "birthday": "1990-05-20",
            "blood": "2",
            "sex": true,
            "levelActivity": 2.0,
        });

        let (status, body) =
            send(&app, Method::PUT, "/api/users/params", Some(ALICE), Some(params)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let errors = body["errors"].as_array().unwrap();
        let fields: Vec<&str> = errors.iter().map(|e| e["field"].as_str().unwrap()).collect();
        assert_eq!(fields, ["height", "currentWeight", "sex"]);
        assert_eq!(errors[2]["kind"], "enum_violation");
    }

    #[tokio::test]
    async fn test_update_name() {
        let app = test_app().await;

        let (status, user) = send(
            &app,
            Method::PATCH,
            "/api/users/name",
            Some(ALICE),
            Some(json!({ "name": "  Alice Cooper " })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["name"], "Alice Cooper");

        let (_, current) = send(&app, Method::GET, "/api/users/current", Some(ALICE), None).await;
        assert_eq!(current["name"], "Alice Cooper");
    }

    #[tokio::test]
    async fn test_update_name_rejects_blank() {
        let app = test_app().await;

        for body in [json!({ "name": "   " }), json!({})] {
            let (status, body) =
                send(&app, Method::PATCH, "/api/users/name", Some(ALICE), Some(body)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(body["errors"][0]["field"], "name");
            assert_eq!(body["errors"][0]["kind"], "missing_field");
        }

        let (status, _) = send(
            &app,
            Method::PATCH,
            "/api/users/name",
            None,
            Some(json!({ "name": "Mallory" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, current) = send(&app, Method::GET, "/api/users/current", Some(ALICE), None).await;
        assert_eq!(current["name"], "Alice");
    }
}
