pub mod analytics;
pub mod bets;
pub mod dashboard;
pub mod health;
pub mod metrics;

use serde::Serialize;

/// Envelope shared by the ledger endpoints.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}
