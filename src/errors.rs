use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;

/// Rejections raised by the settlement calculator before any math runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettlementError {
    #[error("American odds must be non-zero")]
    InvalidOdds,

    #[error("Unknown result {0:?}, expected one of Open, Win, Loss, Push")]
    InvalidResult(String),

    #[error("Stake must be non-negative, got {0}")]
    NegativeStake(Decimal),

    #[error("Profit boost must be non-negative, got {0}%")]
    NegativeProfitBoost(Decimal),

    #[error("{0} is out of range")]
    AmountOutOfRange(&'static str),
}

/// Errors surfaced by the row store.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Settlement(#[from] SettlementError),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Unknown {field} {value:?}, expected one of {}", .options.join(", "))]
    InvalidChoice {
        field: &'static str,
        value: String,
        options: &'static [&'static str],
    },

    #[error("Bet {0} does not exist")]
    RowNotFound(i64),

    #[error("No bets selected")]
    EmptySelection,

    #[error("Stored bet is unreadable: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl LedgerError {
    /// True for failures the caller can fix by correcting its input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LedgerError::Settlement(_)
                | LedgerError::MissingField(_)
                | LedgerError::InvalidChoice { .. }
                | LedgerError::EmptySelection
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".into()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl From<SettlementError> for AppError {
    fn from(e: SettlementError) -> Self {
        metrics::counter!("validation_failures_total").increment(1);
        AppError::BadRequest(e.to_string())
    }
}

impl From<LedgerError> for AppError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::RowNotFound(_) => AppError::NotFound(e.to_string()),
            e if e.is_validation() => {
                metrics::counter!("validation_failures_total").increment(1);
                AppError::BadRequest(e.to_string())
            }
            e => AppError::Internal(e.into()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let resp = AppError::from(LedgerError::RowNotFound(7)).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = AppError::from(LedgerError::Settlement(SettlementError::InvalidOdds)).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::from(SettlementError::AmountOutOfRange("stake")).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::from(LedgerError::MissingField("sportsbook")).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::from(LedgerError::Corrupt("stake".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(LedgerError::RowNotFound(3).to_string(), "Bet 3 does not exist");
        assert!(SettlementError::NegativeStake(Decimal::from(-5))
            .to_string()
            .contains("-5"));
    }
}
