use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use studyplan_core::catalog::{self, Catalog};
use studyplan_core::clock::{Clock, SystemClock};
use studyplan_core::plan::{StudyPlan, StudyPlanRequest, generate_study_plan};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    body: Value,
}

impl AppError {
    /// 400 for a missing or malformed `mode`/`answers`.
    pub fn invalid_data() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: serde_json::json!({ "message": "invalid data" }),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: serde_json::json!({ "success": false, "message": "not found" }),
        }
    }

    /// 500 with a generic message. The cause is logged, never returned.
    pub fn internal(err: anyhow::Error) -> Self {
        tracing::error!("internal error: {err:#}");
        Self::internal_generic()
    }

    fn internal_generic() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: serde_json::json!({ "success": false, "message": "internal server error" }),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub plan: StudyPlan,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Shared, immutable handler state.
#[derive(Clone)]
pub struct AppState {
    pub clock: Arc<dyn Clock>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            clock: Arc::new(SystemClock),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/study-plan/config", get(get_config))
        .route("/study-plan/generate", post(generate_plan))
        .fallback(fallback)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(bind: &str, port: u16) -> Result<()> {
    let app = build_router(AppState::default());
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("studyplan serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("studyplan serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl+C: {e}");
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("handler panicked: {detail}");
    AppError::internal_generic().into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_config() -> Result<Json<Catalog>, AppError> {
    let catalog = catalog::load_catalog().map_err(|e| AppError::internal(e.into()))?;
    Ok(Json(catalog))
}

async fn generate_plan(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!("rejected generate body: {rejection}");
        AppError::invalid_data()
    })?;

    let request = StudyPlanRequest::from_json(&body).map_err(|e| {
        tracing::debug!("invalid generate request: {e}");
        AppError::invalid_data()
    })?;

    let plan = generate_study_plan(&request.mode, &request.answers, state.clock.now());
    tracing::info!(
        mode = %request.mode,
        days_until_target = ?plan.summary.days_until_target,
        "study plan generated"
    );

    Ok(Json(GenerateResponse {
        success: true,
        plan,
        message: "Study plan generated successfully".to_string(),
    }))
}

async fn fallback() -> AppError {
    AppError::not_found()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::{DateTime, NaiveDate, Utc};
    use serde_json::json;
    use tower::ServiceExt;

    use studyplan_core::clock::{Clock, FixedClock};

    use super::AppState;

    struct PanickingClock;

    impl Clock for PanickingClock {
        fn now(&self) -> DateTime<Utc> {
            panic!("clock unavailable");
        }
    }

    // -----------------------------------------------------------------------
    // HTTP helpers
    // -----------------------------------------------------------------------

    fn fixed_state() -> AppState {
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        AppState {
            clock: Arc::new(FixedClock::at_date(today)),
        }
    }

    async fn send(state: AppState, request: Request<Body>) -> axum::response::Response {
        let app = super::build_router(state);
        app.oneshot(request).await.unwrap()
    }

    async fn get(uri: &str) -> axum::response::Response {
        send(
            fixed_state(),
            Request::builder().uri(uri).body(Body::empty()).unwrap(),
        )
        .await
    }

    fn post_json(body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/study-plan/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // -----------------------------------------------------------------------
    // GET /study-plan/config
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_config_returns_catalog() {
        let resp = get("/study-plan/config").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;

        let modes = json["modes"].as_array().expect("modes should be an array");
        assert_eq!(modes.len(), 2);
        assert_eq!(modes[0]["id"], "APRU_1b");
        assert_eq!(modes[1]["id"], "APRU_REASONING");
        for mode in modes {
            assert!(mode.get("name").is_some());
            assert!(mode.get("description").is_some());
            assert!(mode.get("color").is_some());
        }

        let questions = json["questions"]
            .as_array()
            .expect("questions should be an array");
        assert_eq!(questions.len(), 4);
        assert_eq!(questions[2]["options"].as_array().unwrap().len(), 13);
        assert_eq!(questions[3]["options"].as_array().unwrap().len(), 3);
    }

    // -----------------------------------------------------------------------
    // POST /study-plan/generate
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_generate_success() {
        let body = json!({
            "mode": "APRU_1b",
            "answers": {
                "hoursPerDay": 4,
                "targetDate": "2026-10-27",
                "subjects": ["Matemática"],
                "difficulty": "Avançado"
            }
        });
        let resp = send(fixed_state(), post_json(&body)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["success"], true);
        assert!(json["message"].is_string());
        let plan = &json["plan"];
        assert_eq!(plan["weeklySchedule"].as_array().unwrap().len(), 7);
        assert_eq!(plan["summary"]["daysUntilTarget"], 10);
        assert_eq!(plan["summary"]["totalStudyHours"], 40);
        assert_eq!(plan["recommendations"][0]["title"], "Focus on exercises");
    }

    #[tokio::test]
    async fn test_generate_wrongly_typed_answers_fall_back_to_defaults() {
        let body = json!({
            "mode": "APRU_1b",
            "answers": {
                "hoursPerDay": true,
                "targetDate": 1_793_059_200_000_i64,
                "subjects": "Física",
                "difficulty": 3
            }
        });
        let resp = send(fixed_state(), post_json(&body)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let plan = &body_json(resp).await["plan"];
        let slots = plan["weeklySchedule"][0]["subjects"].as_array().unwrap();
        assert_eq!(slots.len(), 1);
        assert!(plan["summary"]["daysUntilTarget"].is_null());
        assert!(plan["summary"]["totalStudyHours"].is_null());
        assert_eq!(plan["summary"]["subjects"], json!(["Matemática", "Português"]));
        assert_eq!(plan["summary"]["difficulty"], "Intermediário");
    }

    #[tokio::test]
    async fn test_generate_missing_mode_is_400() {
        let resp = send(fixed_state(), post_json(&json!({ "answers": {} }))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, json!({ "message": "invalid data" }));
    }

    #[tokio::test]
    async fn test_generate_missing_answers_is_400() {
        let resp = send(fixed_state(), post_json(&json!({ "mode": "APRU_1b" }))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, json!({ "message": "invalid data" }));
    }

    #[tokio::test]
    async fn test_generate_missing_answers_does_not_touch_clock() {
        // The plan is never computed, so the panicking clock is never read.
        let state = AppState {
            clock: Arc::new(PanickingClock),
        };
        let resp = send(state, post_json(&json!({ "mode": "APRU_1b" }))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_malformed_json_is_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/study-plan/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let resp = send(fixed_state(), request).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, json!({ "message": "invalid data" }));
    }

    #[tokio::test]
    async fn test_generate_without_content_type_is_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/study-plan/generate")
            .body(Body::from(r#"{"mode":"APRU_1b","answers":{}}"#))
            .unwrap();
        let resp = send(fixed_state(), request).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_internal_failure_is_500() {
        let state = AppState {
            clock: Arc::new(PanickingClock),
        };
        let body = json!({ "mode": "APRU_1b", "answers": {} });
        let resp = send(state, post_json(&body)).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
        assert!(json["message"].is_string());
        assert!(json.get("plan").is_none());
    }

    #[tokio::test]
    async fn test_generate_rejects_get() {
        let resp = get("/study-plan/generate").await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let resp = get("/nope").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
    }
}
