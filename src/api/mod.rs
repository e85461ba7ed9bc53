mod session;

use axum::{
    Router,
    extract::{
        Json, Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::{
    AnalysisError, AnalysisResult, FieldErrors, RawRecord, analyze, compute, example_record,
};

pub use session::{DEFAULT_SESSION_CAPACITY, Recalled, SessionStore};

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<FieldErrors>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    session_id: String,
    record: RawRecord,
    analysis: AnalysisResult,
}

/// Parses a flat JSON object into a raw record. Field values stay untyped.
pub fn parse_raw_record(json: &str) -> Result<RawRecord, serde_json::Error> {
    serde_json::from_str::<RawRecord>(json)
}

fn raw_record_from_query(params: HashMap<String, String>) -> RawRecord {
    params
        .into_iter()
        .map(|(key, value)| (key, serde_json::Value::String(value)))
        .collect()
}

pub fn router(sessions: Arc<SessionStore>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/analyze",
            get(analyze_get_handler).post(analyze_post_handler),
        )
        .route("/api/example", get(example_handler))
        .route(
            "/api/sessions/:session_id",
            get(session_get_handler)
                .put(session_put_handler)
                .delete(session_delete_handler),
        )
        .fallback(not_found_handler)
        .with_state(sessions)
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let app = router(Arc::new(SessionStore::new()));

    let listener = TcpListener::bind(addr).await?;
    log::info!("rent-vs-buy API listening on http://{addr}");

    axum::serve(listener, app).await
}

async fn health_handler() -> impl IntoResponse {
    with_cache_control("ok")
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn example_handler() -> Response {
    json_response(StatusCode::OK, example_record())
}

async fn analyze_get_handler(
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Response {
    match params {
        Ok(Query(params)) => analysis_response(raw_record_from_query(params)),
        Err(rejection) => error_response(rejection.status(), &rejection.body_text()),
    }
}

async fn analyze_post_handler(raw: Result<Json<RawRecord>, JsonRejection>) -> Response {
    match raw {
        Ok(Json(raw)) => analysis_response(raw),
        Err(rejection) => error_response(rejection.status(), &rejection.body_text()),
    }
}

fn analysis_response(raw: RawRecord) -> Response {
    match analyze(&raw) {
        Ok(result) => {
            log::debug!(
                "analysis complete: {} years, breakeven {:?}, investment breakeven {:?}",
                result.projection.len(),
                result.breakeven_point,
                result.investment_breakeven_point
            );
            json_response(StatusCode::OK, result)
        }
        Err(AnalysisError::Validation(fields)) => {
            log::warn!("rejected analysis input: {fields}");
            validation_error_response(fields)
        }
        Err(err @ AnalysisError::ContractViolation(_)) => {
            log::error!("{err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

async fn session_put_handler(
    State(sessions): State<Arc<SessionStore>>,
    session_id: Result<Path<String>, PathRejection>,
    raw: Result<Json<RawRecord>, JsonRejection>,
) -> Response {
    let Path(session_id) = match session_id {
        Ok(path) => path,
        Err(rejection) => return error_response(rejection.status(), &rejection.body_text()),
    };
    let Json(raw) = match raw {
        Ok(json) => json,
        Err(rejection) => return error_response(rejection.status(), &rejection.body_text()),
    };
    match sessions.remember(&session_id, raw.clone()) {
        Ok(profile) => {
            log::debug!("stored input for session {session_id}");
            json_response(
                StatusCode::OK,
                SessionResponse {
                    session_id,
                    record: raw,
                    analysis: compute(&profile),
                },
            )
        }
        Err(fields) => {
            log::warn!("session {session_id} input rejected: {fields}");
            validation_error_response(fields)
        }
    }
}

async fn session_get_handler(
    State(sessions): State<Arc<SessionStore>>,
    Path(session_id): Path<String>,
) -> Response {
    let Some(Recalled { record, profile }) = sessions.recall(&session_id) else {
        return error_response(StatusCode::NOT_FOUND, "Unknown session");
    };
    match profile {
        Ok(profile) => json_response(
            StatusCode::OK,
            SessionResponse {
                session_id,
                record,
                analysis: compute(&profile),
            },
        ),
        Err(fields) => {
            log::warn!("stored input for session {session_id} no longer validates: {fields}");
            validation_error_response(fields)
        }
    }
}

async fn session_delete_handler(
    State(sessions): State<Arc<SessionStore>>,
    Path(session_id): Path<String>,
) -> Response {
    if sessions.forget(&session_id) {
        log::debug!("cleared session {session_id}");
    }
    with_cache_control(StatusCode::NO_CONTENT)
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
            fields: None,
        },
    )
}

fn validation_error_response(fields: FieldErrors) -> Response {
    json_response(
        StatusCode::BAD_REQUEST,
        ErrorResponse {
            error: "Invalid input".to_string(),
            fields: Some(fields),
        },
    )
}
