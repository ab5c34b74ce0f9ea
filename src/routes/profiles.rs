//! Profile routes
//!
//! Save and fetch the caller's own profile. The profile id is always the
//! verified token subject; the body never carries it.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::{MessageResponse, ValidJson};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::profiles::{Profile, ProfileResponse, SaveProfileRequest};
use crate::error::ApiResult;

/// POST /api/save-user
///
/// Create the caller's profile, or overwrite it if it already exists.
pub async fn save_user(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    ValidJson(req): ValidJson<SaveProfileRequest>,
) -> ApiResult<MessageResponse> {
    let profile = Profile::new(auth.user_id.clone(), req);

    state.profiles.save(&profile).await?;

    tracing::info!(user_id = %auth.user_id, "User saved");
    Ok(MessageResponse::new("User saved successfully"))
}

/// GET /api/user-profile
pub async fn get_user_profile(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state.profiles.get(&auth.user_id).await?;
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use crate::app::testing::app_with;
    use crate::auth::verifier::tests::{mint, token_for, SECRET};
    use crate::services::profile_store::memory::{MemoryProfileStore, UnreachableProfileStore};
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use jsonwebtoken::get_current_timestamp;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn save_request(auth: Option<&str>, body: impl Into<Body>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/api/save-user")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(body.into()).unwrap()
    }

    fn profile_request(auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/user-profile");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn ann() -> String {
        json!({ "firstName": "Ann", "lastName": "Lee", "mobileNumber": "555-0100" }).to_string()
    }

    #[tokio::test]
    async fn save_then_fetch_round_trip() {
        let store = Arc::new(MemoryProfileStore::default());
        let app = app_with(store.clone());
        let auth = format!("Bearer {}", token_for("u1"));

        let (status, body) = send(&app, save_request(Some(&auth), ann())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "User saved successfully" }));

        let (status, body) = send(&app, profile_request(Some(&auth))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "firstName": "Ann",
                "lastName": "Lee",
                "mobileNumber": "555-0100",
                "isSocialLogin": true
            })
        );

        let row = store.row("u1").unwrap();
        assert_eq!(row.password, None);
    }

    #[tokio::test]
    async fn save_without_authorization_writes_nothing() {
        let store = Arc::new(MemoryProfileStore::default());
        let app = app_with(store.clone());

        let (status, body) = send(&app, save_request(None, ann())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(body["detail"], "Missing or invalid token");
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn auth_is_checked_before_the_body() {
        let store = Arc::new(MemoryProfileStore::default());
        let app = app_with(store.clone());

        let (status, _) = send(&app, save_request(None, "{ definitely not json")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn forged_token_is_unauthorized() {
        let store = Arc::new(MemoryProfileStore::default());
        let app = app_with(store.clone());
        let forged = mint(
            json!({ "sub": "u1", "aud": "authenticated", "exp": get_current_timestamp() + 60 }),
            "not-the-secret",
        );
        let auth = format!("Bearer {forged}");

        let (status, body) = send(&app, save_request(Some(&auth), ann())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Token verification failed"));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn token_without_subject_is_unauthorized() {
        let app = app_with(Arc::new(MemoryProfileStore::default()));
        let token = mint(
            json!({ "aud": "authenticated", "exp": get_current_timestamp() + 60 }),
            SECRET,
        );

        let (status, body) = send(&app, profile_request(Some(&format!("Bearer {token}")))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Invalid token payload");
    }

    #[tokio::test]
    async fn second_save_overwrites_first() {
        let store = Arc::new(MemoryProfileStore::default());
        let app = app_with(store.clone());
        let auth = format!("Bearer {}", token_for("u1"));

        send(&app, save_request(Some(&auth), ann())).await;
        let updated = json!({
            "firstName": "Anna",
            "lastName": "Lee-Park",
            "mobileNumber": "555-0199",
            "password": "hunter2"
        })
        .to_string();
        let (status, _) = send(&app, save_request(Some(&auth), updated)).await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(store.len(), 1);
        let row = store.row("u1").unwrap();
        assert_eq!(row.first_name, "Anna");
        assert_eq!(row.last_name, "Lee-Park");
        assert_eq!(row.number, "555-0199");
        assert_eq!(row.password.as_deref(), Some("hunter2"));
        assert!(!row.is_social_login);
    }

    #[tokio::test]
    async fn subjects_are_isolated() {
        let store = Arc::new(MemoryProfileStore::default());
        let app = app_with(store.clone());

        send(&app, save_request(Some(&format!("Bearer {}", token_for("u1"))), ann())).await;

        let (status, body) = send(
            &app,
            profile_request(Some(&format!("Bearer {}", token_for("u2")))),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["detail"], "User not found");
    }

    #[tokio::test]
    async fn missing_fields_are_rejected_before_storage() {
        let store = Arc::new(MemoryProfileStore::default());
        let app = app_with(store.clone());
        let auth = format!("Bearer {}", token_for("u1"));

        let body = json!({ "firstName": "Ann", "mobileNumber": "555-0100" }).to_string();
        let (status, body) = send(&app, save_request(Some(&auth), body)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(
            body["detail"].as_str().unwrap().contains("lastName"),
            "{body}"
        );
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn malformed_json_gets_the_error_body() {
        let store = Arc::new(MemoryProfileStore::default());
        let app = app_with(store.clone());
        let auth = format!("Bearer {}", token_for("u1"));

        let (status, body) = send(&app, save_request(Some(&auth), "{oops")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["detail"].is_string());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn non_json_content_type_gets_the_error_body() {
        let store = Arc::new(MemoryProfileStore::default());
        let app = app_with(store.clone());
        let auth = format!("Bearer {}", token_for("u1"));

        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/save-user")
            .header(header::CONTENT_TYPE, "text/plain")
            .header(header::AUTHORIZATION, auth)
            .body(Body::from(ann()))
            .unwrap();
        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["detail"].is_string());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn token_without_audience_is_unauthorized() {
        let store = Arc::new(MemoryProfileStore::default());
        let app = app_with(store.clone());
        let token = mint(
            json!({ "sub": "u1", "exp": get_current_timestamp() + 60 }),
            SECRET,
        );

        let (status, body) = send(&app, save_request(Some(&format!("Bearer {token}")), ann())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn storage_failures_are_500_with_cause() {
        let app = app_with(Arc::new(UnreachableProfileStore));
        let auth = format!("Bearer {}", token_for("u1"));

        let (status, body) = send(&app, save_request(Some(&auth), ann())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "DATABASE_ERROR");
        assert_eq!(body["detail"], "Database error: connection refused");

        let (status, _) = send(&app, profile_request(Some(&auth))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn fetch_without_authorization_is_401() {
        let app = app_with(Arc::new(MemoryProfileStore::default()));
        let (status, _) = send(&app, profile_request(Some("Basic dTE6cHc="))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
