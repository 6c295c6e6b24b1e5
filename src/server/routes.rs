use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use log::{info, warn};
use serde_json::{json, Value};

use super::error::AppError;
use crate::config::Config;
use crate::remote::{ValidateRequest, ValidateResponse};

/// Case-insensitive comparison against the configured password. Without a
/// configured password nothing matches.
pub fn password_matches(config: &Config, password: &str) -> bool {
    config
        .password
        .as_deref()
        .is_some_and(|expected| expected.to_uppercase() == password.to_uppercase())
}

pub async fn validate_handler(
    State(config): State<Arc<Config>>,
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<Json<ValidateResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("rejected validation payload: {rejection}");
        AppError::MalformedPayload(rejection.body_text())
    })?;

    let response = if password_matches(&config, &request.password) {
        info!("password accepted");
        ValidateResponse {
            success: true,
            message: Some("Password accepted".into()),
        }
    } else {
        info!("password refused");
        ValidateResponse {
            success: false,
            message: Some("Incorrect password".into()),
        }
    };

    Ok(Json(response))
}

pub async fn validate_usage_handler() -> Json<Value> {
    Json(json!({
        "message": "Validation endpoint is up",
        "timestamp": Utc::now().to_rfc3339(),
        "route": "/validate",
        "instructions": r#"Use POST with { "password": "..." }"#,
    }))
}

pub async fn liveness_handler() -> Json<Value> {
    Json(json!({
        "message": "Test endpoint is up",
        "timestamp": Utc::now().to_rfc3339(),
        "status": "OK",
    }))
}
