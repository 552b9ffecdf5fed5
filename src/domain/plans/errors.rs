//! Plan-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, PlanId, ProductId};

/// Errors raised by plan operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// Plan was not found.
    NotFound(PlanId),

    /// A member product no longer exists.
    ProductNotFound(ProductId),

    /// The discount value is outside the allowed range for its type.
    InvalidDiscount { reason: String },

    /// The plan's time window is inconsistent.
    InvalidWindow { reason: String },

    /// Invalid lifecycle state for the requested operation.
    InvalidState { current: String, attempted: String },

    /// Validation failed for a field.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error (store unreachable, write failed).
    Infrastructure(String),
}

impl PlanError {
    pub fn not_found(id: PlanId) -> Self {
        PlanError::NotFound(id)
    }

    pub fn product_not_found(id: ProductId) -> Self {
        PlanError::ProductNotFound(id)
    }

    pub fn invalid_discount(reason: impl Into<String>) -> Self {
        PlanError::InvalidDiscount {
            reason: reason.into(),
        }
    }

    pub fn invalid_window(reason: impl Into<String>) -> Self {
        PlanError::InvalidWindow {
            reason: reason.into(),
        }
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        PlanError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PlanError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        PlanError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PlanError::NotFound(_) => ErrorCode::PlanNotFound,
            PlanError::ProductNotFound(_) => ErrorCode::ProductNotFound,
            PlanError::InvalidDiscount { .. } => ErrorCode::OutOfRange,
            PlanError::InvalidWindow { .. } => ErrorCode::ValidationFailed,
            PlanError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            PlanError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            PlanError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a log-friendly error message.
    pub fn message(&self) -> String {
        match self {
            PlanError::NotFound(id) => format!("Plan not found: {}", id),
            PlanError::ProductNotFound(id) => format!("Product not found: {}", id),
            PlanError::InvalidDiscount { reason } => format!("Invalid discount: {}", reason),
            PlanError::InvalidWindow { reason } => format!("Invalid plan window: {}", reason),
            PlanError::InvalidState { current, attempted } => {
                format!("Cannot {} plan in {} state", attempted, current)
            }
            PlanError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            PlanError::Infrastructure(msg) => format!("Store error: {}", msg),
        }
    }

    /// Returns true if the next scheduler tick should naturally retry
    /// the failed operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PlanError::Infrastructure(_))
    }
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for PlanError {}

impl From<DomainError> for PlanError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InvalidStateTransition => PlanError::InvalidState {
                current: "unknown".to_string(),
                attempted: err.to_string(),
            },
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => PlanError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.to_string(),
            },
            _ => PlanError::Infrastructure(err.to_string()),
        }
    }
}

impl From<PlanError> for DomainError {
    fn from(err: PlanError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_plan_id() {
        let id = PlanId::new();
        let err = PlanError::not_found(id);
        assert!(matches!(err, PlanError::NotFound(i) if i == id));
        assert_eq!(err.code(), ErrorCode::PlanNotFound);
        assert!(err.message().contains(&id.to_string()));
    }

    #[test]
    fn product_not_found_carries_product_id() {
        let id = ProductId::new();
        let err = PlanError::product_not_found(id);
        assert_eq!(err.code(), ErrorCode::ProductNotFound);
        assert!(err.message().contains(&id.to_string()));
    }

    #[test]
    fn invalid_state_names_both_states() {
        let err = PlanError::invalid_state("Expired", "activate");
        let msg = err.message();
        assert!(msg.contains("Expired"));
        assert!(msg.contains("activate"));
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn only_infrastructure_is_retryable() {
        assert!(PlanError::infrastructure("connection reset").is_retryable());
        assert!(!PlanError::invalid_discount("too big").is_retryable());
        assert!(!PlanError::not_found(PlanId::new()).is_retryable());
    }

    #[test]
    fn display_matches_message() {
        let err = PlanError::invalid_window("end before start");
        assert_eq!(format!("{}", err), err.message());
    }

    #[test]
    fn converts_to_domain_error_and_back() {
        let err = PlanError::infrastructure("db down");
        let domain: DomainError = err.clone().into();
        assert_eq!(domain.code, ErrorCode::DatabaseError);

        let back: PlanError = domain.into();
        assert!(matches!(back, PlanError::Infrastructure(_)));
    }

    #[test]
    fn validation_conversion_preserves_field_detail() {
        let domain = DomainError::validation("end_date", "must be after start_date");
        let err: PlanError = domain.into();
        assert!(matches!(
            err,
            PlanError::ValidationFailed { ref field, .. } if field == "end_date"
        ));
    }
}
