use crate::types::Category;
use thiserror::Error;

/// Main error type for the itinerary planner
#[derive(Error, Debug)]
pub enum ItineraryError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Infeasible budget: {0}")]
    InfeasibleBudget(String),

    #[error("Budget exceeded by {amount_over:.2}")]
    BudgetExceeded { amount_over: f64 },

    #[error("No {0} options available in catalog")]
    EmptyCategoryCatalog(Category),

    #[error("Unresolved disruption: {0}")]
    UnresolvedDisruption(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Event bus error: {0}")]
    Bus(String),

    #[error("No active plan for session {0}")]
    NoActivePlan(String),

    #[error("Unknown session: {0}")]
    UnknownSession(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ItineraryError>;

impl ItineraryError {
    /// Check if this error aborts the whole request rather than degrading a plan
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ItineraryError::Config(_)
                | ItineraryError::InfeasibleBudget(_)
                | ItineraryError::Serialization(_)
                | ItineraryError::Io(_)
                | ItineraryError::Validation(_)
        )
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ItineraryError::Config(_) => "CONFIG_ERROR",
            ItineraryError::InfeasibleBudget(_) => "INFEASIBLE_BUDGET",
            ItineraryError::BudgetExceeded { .. } => "BUDGET_EXCEEDED",
            ItineraryError::EmptyCategoryCatalog(_) => "EMPTY_CATEGORY_CATALOG",
            ItineraryError::UnresolvedDisruption(_) => "UNRESOLVED_DISRUPTION",
            ItineraryError::Catalog(_) => "CATALOG_ERROR",
            ItineraryError::Serialization(_) => "SERIALIZATION_ERROR",
            ItineraryError::Io(_) => "IO_ERROR",
            ItineraryError::Validation(_) => "VALIDATION_ERROR",
            ItineraryError::Bus(_) => "BUS_ERROR",
            ItineraryError::NoActivePlan(_) => "NO_ACTIVE_PLAN",
            ItineraryError::UnknownSession(_) => "UNKNOWN_SESSION",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "fatal": self.is_fatal()
            }
        })
    }
}
