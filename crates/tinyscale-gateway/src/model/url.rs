use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Body of every `/tiny/` and `/long/` response, successful or not.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiResponse {
    #[serde(rename = "Code")]
    pub code: u16,
    #[serde(rename = "Msg")]
    pub msg: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            msg: msg.into(),
        }
    }
}
