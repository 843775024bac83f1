use axum::{
    extract::{ rejection::JsonRejection, State },
    http::{ header, HeaderValue, Method },
    middleware,
    routing::{ get, post },
    Json,
    Router,
};
use log::{ info, warn };
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{ AllowOrigin, CorsLayer };

use super::error::{ ApiError, INVALID_BODY_MESSAGE };
use super::rate_limit::{ self, RateLimiter };
use crate::chat::{ ChatError, ChatOutcome, ChatRelay };
use crate::forms::{ FormInput, FormRelay };
use crate::models::api::{ ApiResponse, HealthResponse };
use crate::models::chat::{ ChatRequest, ChatResponse };
use crate::models::forms::{ ContactForm, PartnershipForm, VolunteerForm };

#[derive(Clone)]
pub struct AppState {
    pub forms: Arc<FormRelay>,
    pub chat: Arc<ChatRelay>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(forms: Arc<FormRelay>, chat: Arc<ChatRelay>, limiter: Arc<RateLimiter>) -> Self {
        Self { forms, chat, limiter }
    }
}

pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let limiter = state.limiter.clone();

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/contact", post(form_handler::<ContactForm>))
        .route("/api/partnership", post(form_handler::<PartnershipForm>))
        .route("/api/volunteer", post(form_handler::<VolunteerForm>))
        .route("/api/chat", post(chat_handler))
        .fallback(not_found_handler)
        .method_not_allowed_fallback(not_found_handler)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(allowed_origins))
                .layer(middleware::from_fn_with_state(limiter, rate_limit::limit))
        )
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| {
            warn!("Rejected request body: {}", rejection.body_text());
            ApiError::BadRequest(INVALID_BODY_MESSAGE.to_string())
        })
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn form_handler<F>(
    State(state): State<AppState>,
    payload: Result<Json<F>, JsonRejection>,
) -> Result<Json<ApiResponse>, ApiError>
    where F: FormInput + DeserializeOwned + Send + 'static
{
    let kind = F::KIND;
    let submission = json_body(payload)?
        .validate()
        .map_err(|e| {
            warn!("Rejected {} submission: {}", kind, e);
            ApiError::BadRequest(e.to_string())
        })?;

    state.forms
        .relay(&submission)
        .await
        .map_err(|e| ApiError::internal(kind.failure_message(), format!("{} form error: {}", kind, e)))?;

    Ok(Json(ApiResponse::ok(kind.success_message())))
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = json_body(payload)?;
    let prompts = state.chat.prompts();

    let (message, is_filtered) = match state.chat.respond(request).await {
        Ok(ChatOutcome::Reply(text)) => (text, false),
        Ok(ChatOutcome::Filtered(text)) => (text, true),
        Err(ChatError::EmptyMessage) => {
            return Err(ApiError::BadRequest(ChatError::EmptyMessage.to_string()));
        }
        Err(e @ ChatError::MissingApiKey) => {
            return Err(ApiError::internal(prompts.missing_key_reply.clone(), e));
        }
        Err(e @ ChatError::Upstream(_)) => {
            return Err(ApiError::internal(prompts.error_reply.clone(), e));
        }
    };

    info!("Chat reply sent (filtered: {})", is_filtered);
    Ok(Json(ChatResponse { success: true, message, is_filtered }))
}

async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}
