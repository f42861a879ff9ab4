use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use log::{error, info};

use crate::error::AppError;
use crate::types::{
    now_iso8601, ExampleRequest, HealthResponse, ImageRequest, SendResponse, TextRequest,
    UsageResponse,
};
use crate::whatsapp::{SendError, WhatsAppSender};

pub struct AppState {
    pub sender: Arc<dyn WhatsAppSender>,
}

/// Runs a send on the blocking pool so the reactor keeps serving requests.
async fn run_blocking<F>(send: F) -> anyhow::Result<()>
where
    F: FnOnce() -> Result<(), SendError> + Send + 'static,
{
    match tokio::task::spawn_blocking(send).await {
        Ok(result) => Ok(result?),
        Err(join) => Err(anyhow::anyhow!("send task aborted: {}", join)),
    }
}

fn failed(context: &'static str, err: anyhow::Error) -> AppError {
    let err = AppError::send(context, err);
    error!("{}", err.detail());
    err
}

pub async fn send_text(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    info!("Sending message to {}: {}", req.phone, req.message);

    let sender = state.sender.clone();
    let phone = req.phone.clone();
    run_blocking(move || sender.send_text(&phone, &req.message))
        .await
        .map_err(|e| failed("Failed to send message", e))?;

    info!("Message sent successfully");
    Ok(Json(SendResponse {
        status: "success",
        message: "Message sent successfully",
        phone: req.phone,
        timestamp: now_iso8601(),
    }))
}

pub async fn send_image(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    info!("Sending image to {}: {}", req.phone, req.img_path);

    let sender = state.sender.clone();
    let phone = req.phone.clone();
    let caption = req.caption.unwrap_or_default();
    run_blocking(move || sender.send_image(&phone, &req.img_path, &caption))
        .await
        .map_err(|e| failed("Failed to send Image", e))?;

    info!("Image sent successfully");
    Ok(Json(SendResponse {
        status: "success",
        message: "Image sent successfully",
        phone: req.phone,
        timestamp: now_iso8601(),
    }))
}

pub async fn root() -> impl IntoResponse {
    Json(UsageResponse {
        message: "WhatsApp API is running!",
        instructions: "Use POST /send-whatsapp-text to send messages and POST /send-whatsapp-img to send images",
        example_request: ExampleRequest {
            phone: "+917014451730",
            message: "Hello from the WhatsApp API!",
        },
    })
}

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        timestamp: now_iso8601(),
    })
}
