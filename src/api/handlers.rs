//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    ChatRequest, ChatResponse, ErrorResponse, PersonaRequest, PersonaResponse, RecommendResponse,
    ReloadResponse, SchemeLookupResponse, SchemeQuery, SuccessResponse,
};
use super::AppState;
use crate::catalog::{source_from_location, CitizenProfile, Recommendation};
use crate::persona::Persona;
use crate::session::{DialogueHandle, SessionError, SessionSnapshot};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

const MAX_RECOMMENDATIONS: usize = 3;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        // Session lifecycle
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/close", post(close_session))
        // Host events
        .route("/api/sessions/:id/chat", post(send_chat))
        .route("/api/sessions/:id/persona", post(select_persona))
        // Observation
        .route("/api/sessions/:id/stream", get(stream_session))
        // Knowledge base
        .route("/api/schemes", get(lookup_scheme))
        .route("/api/catalog/reload", post(reload_catalog))
        .route("/api/recommend", post(recommend))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Seva chat service is running" }))
}

// ============================================================
// Sessions
// ============================================================

async fn create_session(State(state): State<AppState>) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.create().await;
    Ok(Json(handle.snapshot().await?))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = session(&state, &id).await?;
    Ok(Json(handle.snapshot().await?))
}

async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    if state.sessions.close(&id).await {
        Ok(Json(SuccessResponse { success: true }))
    } else {
        Err(AppError::NotFound(format!("Session not found: {id}")))
    }
}

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let handle = session(&state, &id).await?;
    let queued = handle.submit(req.text).await?;
    Ok(Json(ChatResponse { queued }))
}

async fn select_persona(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PersonaRequest>,
) -> Result<Json<PersonaResponse>, AppError> {
    let persona: Persona = req
        .persona
        .parse()
        .map_err(|e: crate::persona::InvalidPersona| AppError::BadRequest(e.to_string()))?;
    let handle = session(&state, &id).await?;
    handle.switch_persona(persona).await?;
    Ok(Json(PersonaResponse { persona }))
}

async fn stream_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let handle = session(&state, &id).await?;
    // Subscribe before the snapshot so nothing falls between them
    let broadcast_rx = handle.subscribe();
    let init = handle.snapshot().await?;
    Ok(sse_stream(init, broadcast_rx).into_response())
}

async fn session(state: &AppState, id: &str) -> Result<DialogueHandle, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {id}")))
}

// ============================================================
// Knowledge base
// ============================================================

async fn lookup_scheme(
    State(state): State<AppState>,
    Query(query): Query<SchemeQuery>,
) -> Json<SchemeLookupResponse> {
    Json(SchemeLookupResponse {
        scheme: state.catalog().find(&query.q),
    })
}

async fn reload_catalog(State(state): State<AppState>) -> Result<Json<ReloadResponse>, AppError> {
    let source = source_from_location(&state.schemes_source);
    let count = state
        .catalog()
        .load(source.as_ref())
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;
    Ok(Json(ReloadResponse { count }))
}

async fn recommend(
    State(state): State<AppState>,
    Json(profile): Json<CitizenProfile>,
) -> Json<RecommendResponse> {
    let results: Vec<Recommendation> = state
        .catalog()
        .eligible_for(&profile)
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|scheme| Recommendation::new(scheme, &profile.name))
        .collect();

    let message = results.is_empty().then(|| {
        "No specific schemes found for your criteria, but check out general schemes.".to_string()
    });

    Json(RecommendResponse {
        message,
        count: results.len(),
        results,
    })
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Gone(String),
    Upstream(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Gone(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Gone(msg) => (StatusCode::GONE, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogOrder, SchemeCatalog, SchemeRecord};
    use crate::resolver::ResponseResolver;
    use crate::session::{SessionManager, ThinkingDelay};
    use axum::body::Body;
    use axum::http::{header, Request};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_state(source: &str) -> AppState {
        let catalog = SchemeCatalog::new(CatalogOrder::Source);
        catalog
            .replace(vec![
                SchemeRecord::new("pmk", "PM-KISAN")
                    .with_benefit("₹6000/year")
                    .with_categories(["farmer"])
                    .with_max_income(200_000.0),
                SchemeRecord::new("apy", "Atal Pension Yojana").with_benefit("Pension after 60"),
            ])
            .unwrap();
        let sessions = SessionManager::new(
            ResponseResolver::new(catalog),
            ThinkingDelay::Fixed(Duration::from_millis(1)),
        );
        AppState::new(Arc::new(sessions), source)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_session_flow() {
        let app = create_router(test_state("unused.json"));

        let (status, created) = call(&app, "POST", "/api/sessions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["persona"], "general");
        let id = created["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/sessions/{id}/persona"),
            Some(json!({ "persona": "scheme" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["persona"], "scheme");

        let (_, body) = call(
            &app,
            "POST",
            &format!("/api/sessions/{id}/chat"),
            Some(json!({ "text": "pm-kisan" })),
        )
        .await;
        assert_eq!(body["queued"], true);

        let mut snapshot = Value::Null;
        for _ in 0..200 {
            let (_, body) = call(&app, "GET", &format!("/api/sessions/{id}"), None).await;
            snapshot = body;
            if snapshot["messages"].as_array().unwrap().len() == 4 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(
            snapshot["messages"][3]["text"],
            "**PM-KISAN**: ₹6000/year. It is for farmer"
        );
        assert_eq!(snapshot["messages"][3]["sender"], "bot");
    }

    #[tokio::test]
    async fn test_blank_chat_not_queued() {
        let app = create_router(test_state("unused.json"));
        let (_, created) = call(&app, "POST", "/api/sessions", None).await;
        let id = created["id"].as_str().unwrap();

        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/sessions/{id}/chat"),
            Some(json!({ "text": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["queued"], false);
    }

    #[tokio::test]
    async fn test_invalid_persona_rejected() {
        let app = create_router(test_state("unused.json"));
        let (_, created) = call(&app, "POST", "/api/sessions", None).await;
        let id = created["id"].as_str().unwrap();

        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/sessions/{id}/persona"),
            Some(json!({ "persona": "weather" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("weather"));

        let (_, snapshot) = call(&app, "GET", &format!("/api/sessions/{id}"), None).await;
        assert_eq!(snapshot["persona"], "general");
        assert_eq!(snapshot["messages"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_and_closed_sessions() {
        let app = create_router(test_state("unused.json"));

        let (status, _) = call(&app, "GET", "/api/sessions/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, created) = call(&app, "POST", "/api/sessions", None).await;
        let id = created["id"].as_str().unwrap();
        let (status, _) = call(&app, "POST", &format!("/api/sessions/{id}/close"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(
            &app,
            "POST",
            &format!("/api/sessions/{id}/chat"),
            Some(json!({ "text": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_scheme_lookup() {
        let app = create_router(test_state("unused.json"));

        let (_, body) = call(&app, "GET", "/api/schemes?q=pension", None).await;
        assert_eq!(body["scheme"]["id"], "apy");

        let (_, body) = call(&app, "GET", "/api/schemes?q=zzz", None).await;
        assert!(body["scheme"].is_null());
    }

    #[tokio::test]
    async fn test_reload_failure_keeps_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let app = create_router(test_state(missing.to_str().unwrap()));

        let (status, body) = call(&app, "POST", "/api/catalog/reload", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].is_string());

        let (_, body) = call(&app, "GET", "/api/schemes?q=kisan", None).await;
        assert_eq!(body["scheme"]["id"], "pmk");
    }

    #[tokio::test]
    async fn test_recommend() {
        let app = create_router(test_state("unused.json"));
        let profile = json!({
            "name": "Ramesh Gupta",
            "age": 45,
            "income": 120000,
            "occupation": "Farmer",
            "state": "Uttar Pradesh",
            "category": "farmer"
        });

        let (status, body) = call(&app, "POST", "/api/recommend", Some(profile)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["results"][0]["scheme_id"], "pmk");
        assert!(body["results"][0]["explanation"]
            .as_str()
            .unwrap()
            .starts_with("Hello Ramesh Gupta"));
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn test_recommend_none_eligible() {
        let state = test_state("unused.json");
        state
            .catalog()
            .replace(vec![
                SchemeRecord::new("s", "Scholarship").with_categories(["student"])
            ])
            .unwrap();
        let app = create_router(state);
        let profile = json!({
            "name": "Asha", "age": 70, "income": 50000,
            "occupation": "retired", "state": "Goa", "category": "senior"
        });

        let (_, body) = call(&app, "POST", "/api/recommend", Some(profile)).await;
        assert_eq!(body["count"], 0);
        assert!(body["message"].as_str().unwrap().starts_with("No specific schemes"));
    }
}
