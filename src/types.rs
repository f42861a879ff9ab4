use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct TextRequest {
    /// Phone number with country code, e.g. "+917014451730"
    pub phone: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct ImageRequest {
    pub phone: String,
    pub img_path: String,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Serialize)]
pub struct SendResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub phone: String,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct UsageResponse {
    pub message: &'static str,
    pub instructions: &'static str,
    pub example_request: ExampleRequest,
}

#[derive(Serialize)]
pub struct ExampleRequest {
    pub phone: &'static str,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

pub fn now_iso8601() -> String {
    chrono::Local::now().to_rfc3339()
}
