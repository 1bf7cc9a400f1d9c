use serde::{Deserialize, Serialize};

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Body of `GET /api/dbstate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbStateResponse {
    /// 0 = disconnected, 1 = connected, 2 = connecting
    pub ready_state: u8,
    pub uri: String,
}
