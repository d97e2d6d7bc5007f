//! Error types for dockpeek

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// 401 / 403 from the inventory service.
    #[error("Authorization Error ({status}): {detail}")]
    Authorization { status: u16, detail: &'static str },

    /// Any 5xx. Only 500 has dedicated wording.
    #[error("{}", server_message(.status, .reason))]
    Server { status: u16, reason: String },

    #[error("HTTP Error: {status} {reason}")]
    GenericHttp { status: u16, reason: String },

    #[error("Network Error: Could not connect to backend service")]
    Network(#[source] reqwest::Error),

    #[error("{0}")]
    ActionFailure(String),

    #[error("{0}")]
    LogFetchFailure(String),

    #[error("Invalid response from backend: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DashboardError {
    /// Map a non-2xx status to the operator-facing message table.
    pub fn from_status(status: u16, reason: &str) -> Self {
        match status {
            401 => DashboardError::Authorization {
                status,
                detail: "Please log in again",
            },
            403 => DashboardError::Authorization {
                status,
                detail: "Access denied",
            },
            500..=599 => DashboardError::Server {
                status,
                reason: reason.to_string(),
            },
            _ => DashboardError::GenericHttp {
                status,
                reason: reason.to_string(),
            },
        }
    }
}

fn server_message(status: &u16, reason: &str) -> String {
    if *status == 500 {
        format!("Server Error ({}): Please try again later", status)
    } else {
        format!("HTTP Error: {} {}", status, reason)
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_table_wording() {
        assert_eq!(
            DashboardError::from_status(401, "Unauthorized").to_string(),
            "Authorization Error (401): Please log in again"
        );
        assert_eq!(
            DashboardError::from_status(403, "Forbidden").to_string(),
            "Authorization Error (403): Access denied"
        );
        assert_eq!(
            DashboardError::from_status(500, "Internal Server Error").to_string(),
            "Server Error (500): Please try again later"
        );
        assert_eq!(
            DashboardError::from_status(404, "Not Found").to_string(),
            "HTTP Error: 404 Not Found"
        );
        assert_eq!(
            DashboardError::from_status(502, "Bad Gateway").to_string(),
            "HTTP Error: 502 Bad Gateway"
        );
    }
}
