pub mod error;
pub mod money_text;
pub mod types;

#[cfg(feature = "billing")]
pub mod billing;

#[cfg(feature = "debt")]
pub mod debt;

pub use error::RentBillingError;
pub use types::*;

/// Standard result type for all rent-billing operations
pub type RentBillingResult<T> = Result<T, RentBillingError>;
