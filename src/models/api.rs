use serde::Serialize;

/// Body shared by the form endpoints and every error response.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: &'static str,
}
