use commission_storage::StorageError;

use crate::status::Status;

/// Every failure a caller of the submission store can observe.
///
/// `Display` is the human-readable message returned to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum CommissionError {
    /// A bad or missing intake field. User-correctable.
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("Submission not found")]
    NotFound { id: String },

    #[error(
        "Invalid status transition from \"{from}\" to \"{to}\". Allowed: {}.",
        join_statuses(.allowed)
    )]
    InvalidTransition {
        from: Status,
        to: Status,
        allowed: Vec<Status>,
    },

    #[error("Too many submissions. Try again later.")]
    RateLimited { retry_after_secs: u64 },

    #[error("Unauthorized")]
    Unauthorized,

    /// Communication with the backing table failed.
    #[error(transparent)]
    Backend(#[from] StorageError),
}

impl CommissionError {
    pub fn required(field: &str) -> Self {
        CommissionError::Validation {
            field: field.to_string(),
            message: format!("Field \"{}\" is required.", field),
        }
    }

    pub fn invalid_transition(from: Status, to: Status) -> Self {
        CommissionError::InvalidTransition {
            from,
            to,
            allowed: from.allowed_targets().to_vec(),
        }
    }
}

fn join_statuses(statuses: &[Status]) -> String {
    if statuses.is_empty() {
        return "none".to_string();
    }
    statuses
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
