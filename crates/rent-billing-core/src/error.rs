use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RentBillingError {
    #[error("Invalid meter reading: {field} — {reason}")]
    InvalidReading { field: String, reason: String },

    #[error("Missing rate configuration: {0}")]
    MissingRateConfiguration(String),

    #[error("Invalid occupant count: {0} (at least one occupant required)")]
    InvalidOccupantCount(i64),

    #[error("Invalid tier configuration: {0}")]
    InvalidTierConfiguration(String),

    #[error("Invalid usage: {0} (usage cannot be negative)")]
    InvalidUsage(i64),

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RentBillingError {
    fn from(e: serde_json::Error) -> Self {
        RentBillingError::SerializationError(e.to_string())
    }
}
